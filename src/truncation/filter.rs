//! Detection filtering against a threshold snapshot.

use tracing::debug;

use crate::input::Detection;
use crate::truncation::snapshot::ThresholdSnapshot;

/// Records dropped by one filtering pass, by reason.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterDrops {
    /// Detections of species outside the working set.
    pub unknown_species: u64,
    /// Detections at sites in the excluded age-11 band.
    pub age_gap: u64,
    /// Detections below the calibrated threshold.
    pub below_threshold: u64,
}

impl FilterDrops {
    /// Total dropped detections.
    pub fn total(&self) -> u64 {
        self.unknown_species + self.age_gap + self.below_threshold
    }
}

/// Detections surviving the filter at one truncation distance.
#[derive(Debug, Clone)]
pub struct FilteredDetections {
    /// The truncation distance the snapshot was built for.
    pub distance_m: u32,
    /// Surviving detection records.
    pub detections: Vec<Detection>,
    /// Drop accounting for this pass.
    pub drops: FilterDrops,
}

/// Filter detections against a snapshot's thresholds.
///
/// A detection survives when its measured amplitude is at least the
/// threshold of its (species, habitat, hardware) cell, or when that cell
/// carries no calibrated threshold at all: missing calibration admits, it
/// never excludes. Species outside the working set are dropped, as are
/// records in the age-11 habitat gap.
pub fn filter_detections(
    detections: &[Detection],
    snapshot: &ThresholdSnapshot,
) -> FilteredDetections {
    let mut surviving = Vec::new();
    let mut drops = FilterDrops::default();

    for detection in detections {
        let Some(thresholds) = snapshot.thresholds(&detection.species) else {
            drops.unknown_species += 1;
            continue;
        };

        let Some(habitat) = detection.habitat() else {
            drops.age_gap += 1;
            continue;
        };

        match thresholds.get(habitat, detection.hardware) {
            Some(threshold) if detection.amplitude_dbfs < threshold => {
                drops.below_threshold += 1;
            }
            _ => surviving.push(detection.clone()),
        }
    }

    debug!(
        distance_m = snapshot.distance_m(),
        surviving = surviving.len(),
        below_threshold = drops.below_threshold,
        unknown_species = drops.unknown_species,
        age_gap = drops.age_gap,
        "filtered detections"
    );

    FilteredDetections {
        distance_m: snapshot.distance_m(),
        detections: surviving,
        drops,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::input::{AmplitudeRecord, Habitat, Hardware};
    use crate::truncation::reference::ReferenceSpeciesMap;
    use crate::truncation::table::AmplitudePredictionTable;
    use chrono::NaiveDate;

    fn detection(species: &str, amplitude: f64, years: u32, hardware: Hardware) -> Detection {
        Detection {
            site: "C-012".to_string(),
            visit: NaiveDate::from_ymd_opt(2019, 6, 14)
                .unwrap()
                .and_hms_opt(5, 12, 0)
                .unwrap(),
            species: species.to_string(),
            amplitude_dbfs: amplitude,
            years_since_harvest: years,
            hardware,
        }
    }

    fn snapshot_at(distance: u32) -> ThresholdSnapshot {
        let table = AmplitudePredictionTable::from_records([AmplitudeRecord {
            distance_m: 100.0,
            species: "OVEN".to_string(),
            habitat: Habitat::Open,
            hardware: Hardware::Legacy,
            predicted_dbfs: -30.0,
            lower_dbfs: -33.0,
            upper_dbfs: -27.0,
        }]);
        ThresholdSnapshot::build(
            distance,
            &["OVEN".to_string()],
            &table,
            &ReferenceSpeciesMap::default(),
        )
    }

    #[test]
    fn test_amplitude_at_threshold_passes() {
        let snapshot = snapshot_at(100);
        let result = filter_detections(
            &[detection("OVEN", -30.0, 8, Hardware::Legacy)],
            &snapshot,
        );
        assert_eq!(result.detections.len(), 1);
        assert_eq!(result.distance_m, 100);
    }

    #[test]
    fn test_amplitude_below_threshold_dropped() {
        let snapshot = snapshot_at(100);
        let result = filter_detections(
            &[detection("OVEN", -30.1, 8, Hardware::Legacy)],
            &snapshot,
        );
        assert!(result.detections.is_empty());
        assert_eq!(result.drops.below_threshold, 1);
    }

    #[test]
    fn test_missing_threshold_admits() {
        let snapshot = snapshot_at(100);
        // Forested/modern has no calibrated cell; a very quiet song passes.
        let result = filter_detections(
            &[detection("OVEN", -75.0, 40, Hardware::Modern)],
            &snapshot,
        );
        assert_eq!(result.detections.len(), 1);
    }

    #[test]
    fn test_unknown_species_dropped_and_counted() {
        let snapshot = snapshot_at(100);
        let result = filter_detections(
            &[detection("CORA", -20.0, 8, Hardware::Legacy)],
            &snapshot,
        );
        assert!(result.detections.is_empty());
        assert_eq!(result.drops.unknown_species, 1);
    }

    #[test]
    fn test_age_gap_record_excluded() {
        let snapshot = snapshot_at(100);
        let result = filter_detections(
            &[detection("OVEN", -10.0, 11, Hardware::Legacy)],
            &snapshot,
        );
        assert!(result.detections.is_empty());
        assert_eq!(result.drops.age_gap, 1);
    }

    #[test]
    fn test_uncalibrated_snapshot_admits_working_species() {
        // Snapshot at a distance with no table entry within tolerance:
        // every cell absent, every working-set detection passes.
        let snapshot = snapshot_at(250);
        let result = filter_detections(
            &[detection("OVEN", -80.0, 8, Hardware::Legacy)],
            &snapshot,
        );
        assert_eq!(result.detections.len(), 1);
        assert_eq!(result.drops.total(), 0);
    }
}
