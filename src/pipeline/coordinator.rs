//! Pipeline coordination.
//!
//! Loads the three input tables, derives the eligible-site list and the
//! site-visit universe, then runs the truncation core once per selected
//! distance. All reads happen at entry, all writes at exit; distances are
//! independent of one another.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::PathBuf;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::aggregate::{AbundanceMatrix, aggregate};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::input::{
    Detection, SiteVisit, eligible_sites, read_amplitude_table, read_detections,
    read_site_visit_counts,
};
use crate::output::{DistanceSummary, RunSummary, progress, write_matrix, write_summary};
use crate::truncation::{
    AmplitudePredictionTable, FilteredDetections, ReferenceSpeciesMap, ThresholdSnapshot,
    filter_detections,
};

/// Resolved options for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Detection table path.
    pub detections: PathBuf,
    /// Amplitude prediction table path.
    pub amplitude_table: PathBuf,
    /// Site-visit count table path.
    pub site_visits: PathBuf,
    /// Directory abundance matrices are written to.
    pub output_dir: PathBuf,
    /// Truncation distances to process, ascending.
    pub distances: Vec<u32>,
    /// Minimum transcribed visits for site eligibility.
    pub min_visits: u32,
    /// Prepend a UTF-8 BOM to abundance CSVs.
    pub csv_bom: bool,
    /// Show the distance progress bar.
    pub show_progress: bool,
}

/// Outcome of one truncation distance.
#[derive(Debug, Clone)]
pub struct DistanceResult {
    /// Detections surviving the filter at this distance.
    pub filtered: FilteredDetections,
    /// The reconciled abundance matrix.
    pub matrix: AbundanceMatrix,
}

/// Totals reported after a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    /// Abundance matrices written.
    pub matrices_written: usize,
    /// Survey occasions in the reconciliation universe.
    pub universe_size: usize,
    /// Path of the JSON run summary.
    pub summary_path: PathBuf,
}

/// Distinct survey occasions of the raw detection table, restricted to
/// eligible sites and minus excluded sites.
///
/// Every transcribed visit carries at least one tag (target species or
/// not), so the raw table covers the universe.
pub fn site_visit_universe(
    detections: &[Detection],
    eligible: &HashSet<String>,
    excluded: &HashSet<String>,
) -> BTreeSet<SiteVisit> {
    detections
        .iter()
        .filter(|d| eligible.contains(&d.site) && !excluded.contains(&d.site))
        .map(SiteVisit::of)
        .collect()
}

/// Run the truncation core at one distance.
pub fn process_distance(
    distance_m: u32,
    detections: &[Detection],
    table: &AmplitudePredictionTable,
    reference: &ReferenceSpeciesMap,
    species: &[String],
    universe: &BTreeSet<SiteVisit>,
    excluded: &HashSet<String>,
) -> DistanceResult {
    let snapshot = ThresholdSnapshot::build(distance_m, species, table, reference);
    if snapshot.is_uncalibrated() {
        debug!(distance_m, "no calibrated threshold at this distance");
    }
    let filtered = filter_detections(detections, &snapshot);
    let matrix = aggregate(&filtered, universe, species, excluded);
    DistanceResult { filtered, matrix }
}

/// Run the truncation core over every selected distance.
///
/// Returns an ordered map from distance to its result, built once and
/// read-only downstream, so no state is shared between distance runs.
pub fn truncate_all(
    detections: &[Detection],
    table: &AmplitudePredictionTable,
    reference: &ReferenceSpeciesMap,
    species: &[String],
    universe: &BTreeSet<SiteVisit>,
    excluded: &HashSet<String>,
    distances: &[u32],
) -> BTreeMap<u32, DistanceResult> {
    distances
        .iter()
        .map(|&distance_m| {
            (
                distance_m,
                process_distance(
                    distance_m, detections, table, reference, species, universe, excluded,
                ),
            )
        })
        .collect()
}

/// Execute a full pipeline run: read inputs, process every selected
/// distance, write one abundance matrix per distance plus a JSON summary.
pub fn run_pipeline(options: &PipelineOptions, config: &Config) -> Result<PipelineReport> {
    let detections = read_detections(&options.detections)?;
    let amplitude_records = read_amplitude_table(&options.amplitude_table)?;
    let visit_counts = read_site_visit_counts(&options.site_visits)?;

    info!(
        "Loaded {} detections, {} amplitude predictions, {} site visit counts",
        detections.len(),
        amplitude_records.len(),
        visit_counts.len()
    );

    let eligible = eligible_sites(&visit_counts, options.min_visits);
    let excluded: HashSet<String> = config.exclusions.sites.iter().cloned().collect();
    let universe = site_visit_universe(&detections, &eligible, &excluded);
    if universe.is_empty() {
        return Err(Error::NoEligibleSites {
            minimum_visits: options.min_visits,
        });
    }

    info!(
        "Universe: {} survey occasions across {} eligible site(s), {} site(s) excluded",
        universe.len(),
        eligible.len(),
        excluded.len()
    );

    let species = config.species.working.clone();
    let reference = config.reference.to_map();
    let table = AmplitudePredictionTable::from_records(amplitude_records);

    audit_unknown_species(&detections, &species);

    std::fs::create_dir_all(&options.output_dir).map_err(|e| Error::OutputDirCreate {
        path: options.output_dir.clone(),
        source: e,
    })?;

    let bar = progress::create_distance_progress(options.distances.len(), options.show_progress);
    let mut summaries = Vec::with_capacity(options.distances.len());

    for &distance_m in &options.distances {
        let result = process_distance(
            distance_m, &detections, &table, &reference, &species, &universe, &excluded,
        );
        write_matrix(&result.matrix, &options.output_dir, options.csv_bom)?;

        summaries.push(DistanceSummary {
            distance_m,
            surviving: result.filtered.detections.len(),
            below_threshold: result.filtered.drops.below_threshold,
            unknown_species: result.filtered.drops.unknown_species,
            age_gap: result.filtered.drops.age_gap,
            matrix_rows: result.matrix.rows.len(),
            zero_rows: result.matrix.zero_rows(),
            outside_universe: result.matrix.dropped_outside_universe,
        });
        progress::inc_progress(bar.as_ref());
    }

    progress::finish_progress(bar, "Complete");

    let summary = RunSummary {
        generated_at: Utc::now(),
        detections_read: detections.len(),
        eligible_sites: eligible.len(),
        universe_size: universe.len(),
        excluded_sites: config.exclusions.sites.clone(),
        species,
        distances: summaries,
    };
    let summary_path = options
        .output_dir
        .join(crate::constants::output_files::SUMMARY);
    write_summary(&summary, &summary_path)?;

    Ok(PipelineReport {
        matrices_written: options.distances.len(),
        universe_size: universe.len(),
        summary_path,
    })
}

/// Log species present in the detections but absent from the working set.
///
/// Expected data scope rather than corruption; logged for auditability.
fn audit_unknown_species(detections: &[Detection], species: &[String]) {
    let working: HashSet<&str> = species.iter().map(String::as_str).collect();
    let unknown: BTreeSet<&str> = detections
        .iter()
        .map(|d| d.species.as_str())
        .filter(|code| !working.contains(code))
        .collect();

    if !unknown.is_empty() {
        warn!(
            "{} species outside the working set will be ignored: {}",
            unknown.len(),
            unknown.iter().copied().collect::<Vec<_>>().join(", ")
        );
    }
}
