//! JSON run summary.
//!
//! A machine-readable envelope written beside the abundance matrices so
//! that downstream analysis scripts can audit what the run kept and
//! dropped without re-parsing logs.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{Error, Result};

/// Per-distance accounting for one truncation pass.
#[derive(Debug, Clone, Serialize)]
pub struct DistanceSummary {
    /// Truncation distance in meters.
    pub distance_m: u32,
    /// Detections surviving the filter.
    pub surviving: usize,
    /// Detections dropped below their calibrated threshold.
    pub below_threshold: u64,
    /// Detections of species outside the working set.
    pub unknown_species: u64,
    /// Detections in the excluded age-11 band.
    pub age_gap: u64,
    /// Rows in the abundance matrix.
    pub matrix_rows: usize,
    /// All-zero rows (visits with no surviving detection).
    pub zero_rows: usize,
    /// Detections dropped for occasions outside the universe.
    pub outside_universe: u64,
}

/// Whole-run accounting written as `truncation_summary.json`.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// When the run finished.
    pub generated_at: DateTime<Utc>,
    /// Detections read from the input table.
    pub detections_read: usize,
    /// Sites meeting the minimum-visit requirement.
    pub eligible_sites: usize,
    /// Survey occasions in the reconciliation universe.
    pub universe_size: usize,
    /// Sites excluded before aggregation.
    pub excluded_sites: Vec<String>,
    /// Working species column order.
    pub species: Vec<String>,
    /// One entry per truncation distance processed.
    pub distances: Vec<DistanceSummary>,
}

/// Write the run summary as pretty-printed JSON.
pub fn write_summary(summary: &RunSummary, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, summary).map_err(|e| Error::SummaryWrite {
        path: path.to_path_buf(),
        source: e,
    })
}
