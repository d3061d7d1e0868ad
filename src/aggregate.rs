//! Abundance aggregation.
//!
//! Turns filtered per-song detections into per-site/per-visit/per-species
//! integer counts, reconciled against the full set of surveyed site-visits
//! so that zero-detection visits are not silently dropped.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use chrono::NaiveDateTime;
use tracing::warn;

use crate::input::SiteVisit;
use crate::truncation::FilteredDetections;

/// One row of an abundance matrix: counts for a single survey occasion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbundanceRow {
    /// Site identifier.
    pub site: String,
    /// Visit timestamp.
    pub visit: NaiveDateTime,
    /// Counts parallel to the matrix's species column order.
    pub counts: Vec<u32>,
}

/// Site x visit x species integer counts at one truncation distance.
///
/// Every (site, visit) pair of the universe appears exactly once, in
/// (site, visit) order; species absent from the filtered detections stay
/// at zero.
#[derive(Debug, Clone)]
pub struct AbundanceMatrix {
    /// The truncation distance the counts were filtered at.
    pub distance_m: u32,
    /// Species column order.
    pub species: Vec<String>,
    /// One row per survey occasion in the universe.
    pub rows: Vec<AbundanceRow>,
    /// Detections dropped for excluded sites.
    pub dropped_excluded_site: u64,
    /// Detections dropped for survey occasions outside the universe.
    pub dropped_outside_universe: u64,
}

impl AbundanceMatrix {
    /// Number of all-zero rows (visits with no surviving detection).
    pub fn zero_rows(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| row.counts.iter().all(|&c| c == 0))
            .count()
    }
}

/// Aggregate filtered detections into an abundance matrix.
///
/// Detections at sites in `excluded_sites` are removed first. Grouped
/// counts are then reconciled against `universe`: occasions in the
/// universe with no surviving detection become all-zero rows, and
/// detections whose occasion is not in the universe are dropped (the
/// universe is authoritative) and tallied for auditability.
pub fn aggregate(
    filtered: &FilteredDetections,
    universe: &BTreeSet<SiteVisit>,
    species: &[String],
    excluded_sites: &HashSet<String>,
) -> AbundanceMatrix {
    let species_index: HashMap<&str, usize> = species
        .iter()
        .enumerate()
        .map(|(idx, code)| (code.as_str(), idx))
        .collect();

    // Seed every universe occasion with zeros so reconciliation is a
    // property of construction rather than a fix-up pass.
    let mut counts: BTreeMap<&SiteVisit, Vec<u32>> = universe
        .iter()
        .map(|occasion| (occasion, vec![0; species.len()]))
        .collect();

    let mut dropped_excluded_site = 0;
    let mut dropped_outside_universe = 0;

    for detection in &filtered.detections {
        if excluded_sites.contains(&detection.site) {
            dropped_excluded_site += 1;
            continue;
        }

        let occasion = SiteVisit::of(detection);
        let Some(row) = counts.get_mut(&occasion) else {
            dropped_outside_universe += 1;
            continue;
        };

        if let Some(&idx) = species_index.get(detection.species.as_str()) {
            row[idx] += 1;
        }
    }

    if dropped_outside_universe > 0 {
        warn!(
            distance_m = filtered.distance_m,
            dropped = dropped_outside_universe,
            "dropped detections for survey occasions outside the site-visit universe"
        );
    }

    let rows = counts
        .into_iter()
        .map(|(occasion, counts)| AbundanceRow {
            site: occasion.site.clone(),
            visit: occasion.visit,
            counts,
        })
        .collect();

    AbundanceMatrix {
        distance_m: filtered.distance_m,
        species: species.to_vec(),
        rows,
        dropped_excluded_site,
        dropped_outside_universe,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::input::{Detection, Hardware};
    use crate::truncation::FilterDrops;
    use chrono::NaiveDate;

    fn visit(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2019, 6, day)
            .unwrap()
            .and_hms_opt(5, 0, 0)
            .unwrap()
    }

    fn detection(site: &str, day: u32, species: &str) -> Detection {
        Detection {
            site: site.to_string(),
            visit: visit(day),
            species: species.to_string(),
            amplitude_dbfs: -30.0,
            years_since_harvest: 8,
            hardware: Hardware::Legacy,
        }
    }

    fn occasion(site: &str, day: u32) -> SiteVisit {
        SiteVisit {
            site: site.to_string(),
            visit: visit(day),
        }
    }

    fn filtered(detections: Vec<Detection>) -> FilteredDetections {
        FilteredDetections {
            distance_m: 100,
            detections,
            drops: FilterDrops::default(),
        }
    }

    fn species() -> Vec<String> {
        vec!["OVEN".to_string(), "TEWA".to_string()]
    }

    #[test]
    fn test_counts_grouped_and_pivoted() {
        let universe = BTreeSet::from([occasion("C-012", 14)]);
        let input = filtered(vec![
            detection("C-012", 14, "OVEN"),
            detection("C-012", 14, "OVEN"),
            detection("C-012", 14, "TEWA"),
        ]);

        let matrix = aggregate(&input, &universe, &species(), &HashSet::new());
        assert_eq!(matrix.rows.len(), 1);
        assert_eq!(matrix.rows[0].counts, vec![2, 1]);
    }

    #[test]
    fn test_zero_detection_visit_kept_as_zero_row() {
        let universe = BTreeSet::from([occasion("C-012", 14), occasion("C-019", 15)]);
        let input = filtered(vec![detection("C-012", 14, "OVEN")]);

        let matrix = aggregate(&input, &universe, &species(), &HashSet::new());
        assert_eq!(matrix.rows.len(), 2);
        assert_eq!(matrix.rows[1].site, "C-019");
        assert_eq!(matrix.rows[1].counts, vec![0, 0]);
        assert_eq!(matrix.zero_rows(), 1);
    }

    #[test]
    fn test_occasions_outside_universe_dropped_and_counted() {
        let universe = BTreeSet::from([occasion("C-012", 14)]);
        let input = filtered(vec![
            detection("C-012", 14, "OVEN"),
            detection("C-044", 14, "OVEN"),
        ]);

        let matrix = aggregate(&input, &universe, &species(), &HashSet::new());
        assert_eq!(matrix.rows.len(), 1);
        assert_eq!(matrix.dropped_outside_universe, 1);
    }

    #[test]
    fn test_excluded_sites_removed_before_counting() {
        let universe = BTreeSet::from([occasion("C-012", 14), occasion("C-087", 14)]);
        let input = filtered(vec![
            detection("C-012", 14, "OVEN"),
            detection("C-087", 14, "OVEN"),
        ]);
        let excluded = HashSet::from(["C-087".to_string()]);

        let matrix = aggregate(&input, &universe, &species(), &excluded);
        assert_eq!(matrix.dropped_excluded_site, 1);
        // The excluded site's occasion row still reflects the universe
        // handed in; callers exclude sites from the universe as well.
        let row = matrix.rows.iter().find(|r| r.site == "C-087").unwrap();
        assert_eq!(row.counts, vec![0, 0]);
    }

    #[test]
    fn test_rows_ordered_by_site_then_visit() {
        let universe = BTreeSet::from([
            occasion("C-019", 15),
            occasion("C-012", 15),
            occasion("C-012", 14),
        ]);
        let matrix = aggregate(&filtered(vec![]), &universe, &species(), &HashSet::new());

        let order: Vec<(String, NaiveDateTime)> = matrix
            .rows
            .iter()
            .map(|r| (r.site.clone(), r.visit))
            .collect();
        assert_eq!(
            order,
            vec![
                ("C-012".to_string(), visit(14)),
                ("C-012".to_string(), visit(15)),
                ("C-019".to_string(), visit(15)),
            ]
        );
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let universe = BTreeSet::from([occasion("C-012", 14), occasion("C-019", 15)]);
        let input = filtered(vec![
            detection("C-012", 14, "OVEN"),
            detection("C-012", 14, "TEWA"),
        ]);

        let first = aggregate(&input, &universe, &species(), &HashSet::new());
        let second = aggregate(&input, &universe, &species(), &HashSet::new());
        assert_eq!(first.rows, second.rows);
    }
}
