//! Amplitude prediction table parsing.
//!
//! Reads the fitted attenuation surface exported by the playback model.
//! The table is read-only input; the pipeline never refits it.

use std::path::Path;

use serde::Deserialize;

use crate::Error;
use crate::input::{AmplitudeRecord, Habitat, Hardware};

/// Internal record for CSV deserialization.
#[derive(Debug, Deserialize)]
struct AmplitudeRow {
    #[serde(rename = "Distance (m)")]
    distance: f64,
    #[serde(rename = "Species")]
    species: String,
    #[serde(rename = "Habitat")]
    habitat: String,
    #[serde(rename = "Recorder")]
    recorder: String,
    #[serde(rename = "Predicted amplitude (dBFS)")]
    predicted: f64,
    #[serde(rename = "Lower bound (dBFS)")]
    lower: f64,
    #[serde(rename = "Upper bound (dBFS)")]
    upper: f64,
}

/// Parse an amplitude prediction table and return its records in file order.
///
/// Expected columns:
/// - Distance (m), Species, Habitat, Recorder,
///   Predicted amplitude (dBFS), Lower bound (dBFS), Upper bound (dBFS)
///
/// Record order is preserved; nearest-distance lookups break ties toward
/// the earlier record.
///
/// # Errors
///
/// Returns an error if the file cannot be read, required columns are
/// missing, or a row carries a non-positive or non-finite distance.
pub fn read_amplitude_table(path: &Path) -> Result<Vec<AmplitudeRecord>, Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| Error::AmplitudeTableRead {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

    let mut records = Vec::new();

    for (line_num, result) in reader.deserialize::<AmplitudeRow>().enumerate() {
        let row = result.map_err(|e| Error::InvalidAmplitudeFormat {
            message: format!("line {}: {e}", line_num + 2),
        })?;

        if !row.distance.is_finite() || row.distance <= 0.0 {
            return Err(Error::InvalidAmplitudeFormat {
                message: format!(
                    "line {}: distance must be positive, got {}",
                    line_num + 2,
                    row.distance
                ),
            });
        }

        let habitat: Habitat =
            row.habitat
                .parse()
                .map_err(|e: String| Error::InvalidAmplitudeFormat {
                    message: format!("line {}: {e}", line_num + 2),
                })?;
        let hardware: Hardware =
            row.recorder
                .parse()
                .map_err(|e: String| Error::InvalidAmplitudeFormat {
                    message: format!("line {}: {e}", line_num + 2),
                })?;

        records.push(AmplitudeRecord {
            distance_m: row.distance,
            species: row.species,
            habitat,
            hardware,
            predicted_dbfs: row.predicted,
            lower_dbfs: row.lower,
            upper_dbfs: row.upper,
        });
    }

    Ok(records)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "Distance (m),Species,Habitat,Recorder,\
                          Predicted amplitude (dBFS),Lower bound (dBFS),Upper bound (dBFS)";

    #[test]
    fn test_read_preserves_file_order() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{HEADER}").unwrap();
        writeln!(file, "99.6,OVEN,open,SM2,-30.1,-33.0,-27.2").unwrap();
        writeln!(file, "100.4,OVEN,open,SM2,-30.4,-33.4,-27.5").unwrap();
        file.flush().unwrap();

        let records = read_amplitude_table(file.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert!((records[0].distance_m - 99.6).abs() < 1e-9);
        assert!((records[1].distance_m - 100.4).abs() < 1e-9);
        assert_eq!(records[0].habitat, Habitat::Open);
        assert_eq!(records[0].hardware, Hardware::Legacy);
    }

    #[test]
    fn test_non_positive_distance_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{HEADER}").unwrap();
        writeln!(file, "0.0,OVEN,open,SM2,-30.1,-33.0,-27.2").unwrap();
        file.flush().unwrap();

        let result = read_amplitude_table(file.path());
        assert!(matches!(result, Err(Error::InvalidAmplitudeFormat { .. })));
    }

    #[test]
    fn test_unknown_habitat_errors_with_line() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{HEADER}").unwrap();
        writeln!(file, "50.0,OVEN,riparian,SM2,-30.1,-33.0,-27.2").unwrap();
        file.flush().unwrap();

        match read_amplitude_table(file.path()) {
            Err(Error::InvalidAmplitudeFormat { message }) => {
                assert!(message.contains("line 2"));
            }
            other => panic!("expected format error, got {other:?}"),
        }
    }
}
