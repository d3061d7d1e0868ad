//! Post-hoc consistency check over filtered output.
//!
//! Re-derives each survivor's threshold key and confirms the filter's
//! invariant. This exists to catch mismatches between snapshot construction
//! and filtering logic during development; it runs in the test suite, not
//! on the production path.

use crate::input::{Habitat, Hardware};
use crate::truncation::filter::FilteredDetections;
use crate::truncation::snapshot::ThresholdSnapshot;

/// A surviving detection that violates its own threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsistencyViolation {
    /// Species code of the offending detection.
    pub species: String,
    /// Habitat class the threshold was keyed on.
    pub habitat: Habitat,
    /// Recorder generation the threshold was keyed on.
    pub hardware: Hardware,
    /// Measured amplitude of the offending detection in dBFS.
    pub amplitude_dbfs: f64,
    /// The threshold it should have met, in dBFS.
    pub threshold_dbfs: f64,
}

impl std::fmt::Display for ConsistencyViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} in {} habitat on {} hardware: amplitude {} dBFS below threshold {} dBFS",
            self.species, self.habitat, self.hardware, self.amplitude_dbfs, self.threshold_dbfs
        )
    }
}

/// Verify that every survivor satisfies the threshold that produced it.
///
/// Survivors in the age-11 gap or outside the snapshot's species set are
/// themselves violations of the filter contract and are reported against
/// the cell they would have been keyed on.
pub fn verify(
    filtered: &FilteredDetections,
    snapshot: &ThresholdSnapshot,
) -> Result<(), ConsistencyViolation> {
    for detection in &filtered.detections {
        let Some(habitat) = detection.habitat() else {
            return Err(ConsistencyViolation {
                species: detection.species.clone(),
                habitat: Habitat::Open,
                hardware: detection.hardware,
                amplitude_dbfs: detection.amplitude_dbfs,
                threshold_dbfs: f64::NAN,
            });
        };

        if let Some(thresholds) = snapshot.thresholds(&detection.species)
            && let Some(threshold) = thresholds.get(habitat, detection.hardware)
            && detection.amplitude_dbfs < threshold
        {
            return Err(ConsistencyViolation {
                species: detection.species.clone(),
                habitat,
                hardware: detection.hardware,
                amplitude_dbfs: detection.amplitude_dbfs,
                threshold_dbfs: threshold,
            });
        }
    }

    Ok(())
}
