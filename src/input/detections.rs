//! Detection table parsing.
//!
//! Parses the per-song detection export of the acoustic annotation
//! platform. Uses the `csv` crate for robust parsing.

use std::path::Path;

use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::Error;
use crate::input::{Detection, Hardware};

/// Internal record for CSV deserialization.
#[derive(Debug, Deserialize)]
struct DetectionRow {
    #[serde(rename = "Site")]
    site: String,
    #[serde(rename = "Visit")]
    visit: NaiveDateTime,
    #[serde(rename = "Species")]
    species: String,
    #[serde(rename = "Mean amplitude (dBFS)")]
    amplitude: f64,
    #[serde(rename = "Years since harvest")]
    years_since_harvest: u32,
    #[serde(rename = "Recorder")]
    recorder: String,
}

/// Parse a detection table and return its records.
///
/// Expected columns:
/// - Site, Visit, Species, Mean amplitude (dBFS), Years since harvest, Recorder
///
/// The Recorder column accepts `legacy`/`modern` and the unit aliases
/// `SM2`/`SM4`, case-insensitively. Handles UTF-8 BOM if present and
/// quoted fields with embedded commas.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be read
/// - Required columns are missing
/// - Values cannot be parsed
///
/// Returns `Ok(vec![])` if the file contains no records (empty or header-only).
pub fn read_detections(path: &Path) -> Result<Vec<Detection>, Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| Error::DetectionRead {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

    let mut detections = Vec::new();

    for (line_num, result) in reader.deserialize::<DetectionRow>().enumerate() {
        let row = result.map_err(|e| Error::InvalidDetectionFormat {
            message: format!("line {}: {e}", line_num + 2),
        })?;

        if !row.amplitude.is_finite() {
            return Err(Error::InvalidDetectionFormat {
                message: format!(
                    "line {}: amplitude must be finite, got {}",
                    line_num + 2,
                    row.amplitude
                ),
            });
        }

        let hardware: Hardware =
            row.recorder
                .parse()
                .map_err(|e: String| Error::InvalidDetectionFormat {
                    message: format!("line {}: {e}", line_num + 2),
                })?;

        detections.push(Detection {
            site: row.site,
            visit: row.visit,
            species: row.species,
            amplitude_dbfs: row.amplitude,
            years_since_harvest: row.years_since_harvest,
            hardware,
        });
    }

    Ok(detections)
}
