//! Queryable amplitude prediction surface.

use std::collections::HashMap;

use crate::constants::distance::SNAP_TOLERANCE_M;
use crate::input::{AmplitudeRecord, Habitat, Hardware};

/// Predicted amplitude at one distance of one stratum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdEstimate {
    /// Point estimate in dBFS.
    pub predicted_dbfs: f64,
    /// Lower interval bound in dBFS.
    pub lower_dbfs: f64,
    /// Upper interval bound in dBFS.
    pub upper_dbfs: f64,
}

/// Immutable lookup surface over the fitted attenuation model.
///
/// Records are grouped by (species, habitat, recorder generation) stratum;
/// within a stratum the source file order is preserved so that
/// nearest-distance ties resolve to the earlier record.
#[derive(Debug, Clone, Default)]
pub struct AmplitudePredictionTable {
    strata: HashMap<(String, Habitat, Hardware), Vec<(f64, ThresholdEstimate)>>,
}

impl AmplitudePredictionTable {
    /// Build the surface from parsed records, preserving record order.
    pub fn from_records(records: impl IntoIterator<Item = AmplitudeRecord>) -> Self {
        let mut strata: HashMap<_, Vec<_>> = HashMap::new();
        for record in records {
            strata
                .entry((record.species, record.habitat, record.hardware))
                .or_default()
                .push((
                    record.distance_m,
                    ThresholdEstimate {
                        predicted_dbfs: record.predicted_dbfs,
                        lower_dbfs: record.lower_dbfs,
                        upper_dbfs: record.upper_dbfs,
                    },
                ));
        }
        Self { strata }
    }

    /// Number of (species, habitat, hardware) strata in the surface.
    pub fn stratum_count(&self) -> usize {
        self.strata.len()
    }

    /// Predicted amplitude at the table distance nearest to `distance_m`
    /// for the given stratum.
    ///
    /// Returns `None` when the stratum is absent or its nearest distance is
    /// more than the snap tolerance away from the query. Equidistant
    /// candidates resolve to the record that appears first in the source
    /// table.
    pub fn nearest(
        &self,
        distance_m: u32,
        species: &str,
        habitat: Habitat,
        hardware: Hardware,
    ) -> Option<&ThresholdEstimate> {
        let entries = self
            .strata
            .get(&(species.to_string(), habitat, hardware))?;

        let query = f64::from(distance_m);
        let mut best: Option<(f64, &ThresholdEstimate)> = None;

        for (entry_distance, estimate) in entries {
            let gap = (entry_distance - query).abs();
            // Strict comparison keeps the earlier record on ties.
            if best.is_none_or(|(best_gap, _)| gap < best_gap) {
                best = Some((gap, estimate));
            }
        }

        best.and_then(|(gap, estimate)| (gap <= SNAP_TOLERANCE_M).then_some(estimate))
    }
}
