//! Abundance matrix CSV writer.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::aggregate::AbundanceMatrix;
use crate::constants::{UTF8_BOM, VISIT_FORMAT, output_files};
use crate::error::{Error, Result};

/// Filename of the matrix for one truncation distance.
pub fn matrix_file_name(distance_m: u32) -> String {
    format!(
        "{}{distance_m}{}",
        output_files::MATRIX_PREFIX,
        output_files::MATRIX_SUFFIX
    )
}

/// Write one abundance matrix as CSV into `dir`.
///
/// Columns are Site, Visit, then one integer column per working species.
/// With `include_bom`, a UTF-8 BOM is prepended for Excel compatibility.
///
/// Returns the path of the written file.
pub fn write_matrix(matrix: &AbundanceMatrix, dir: &Path, include_bom: bool) -> Result<PathBuf> {
    let path = dir.join(matrix_file_name(matrix.distance_m));
    let file = File::create(&path).map_err(|e| Error::MatrixWrite {
        path: path.clone(),
        source: e,
    })?;
    let mut writer = BufWriter::new(file);

    let result = write_contents(&mut writer, matrix, include_bom);
    result.map_err(|e| Error::MatrixWrite {
        path: path.clone(),
        source: e,
    })?;

    Ok(path)
}

fn write_contents(
    writer: &mut impl Write,
    matrix: &AbundanceMatrix,
    include_bom: bool,
) -> std::io::Result<()> {
    if include_bom {
        writer.write_all(UTF8_BOM)?;
    }

    let mut header = "Site,Visit".to_string();
    for species in &matrix.species {
        header.push(',');
        header.push_str(&escape_csv(species));
    }
    writeln!(writer, "{header}")?;

    for row in &matrix.rows {
        write!(
            writer,
            "{},{}",
            escape_csv(&row.site),
            row.visit.format(VISIT_FORMAT)
        )?;
        for count in &row.counts {
            write!(writer, ",{count}")?;
        }
        writeln!(writer)?;
    }

    writer.flush()
}

/// Escape a value for CSV output.
fn escape_csv(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::aggregate::AbundanceRow;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn matrix() -> AbundanceMatrix {
        AbundanceMatrix {
            distance_m: 100,
            species: vec!["OVEN".to_string(), "TEWA".to_string()],
            rows: vec![AbundanceRow {
                site: "C-012".to_string(),
                visit: NaiveDate::from_ymd_opt(2019, 6, 14)
                    .unwrap()
                    .and_hms_opt(5, 12, 0)
                    .unwrap(),
                counts: vec![2, 0],
            }],
            dropped_excluded_site: 0,
            dropped_outside_universe: 0,
        }
    }

    #[test]
    fn test_matrix_file_name() {
        assert_eq!(matrix_file_name(100), "abundance_100m.csv");
    }

    #[test]
    fn test_write_matrix_contents() {
        let dir = tempdir().unwrap();
        let path = write_matrix(&matrix(), dir.path(), false).unwrap();

        let contents = std::fs::read_to_string(path).unwrap();
        assert_eq!(
            contents,
            "Site,Visit,OVEN,TEWA\nC-012,2019-06-14T05:12:00,2,0\n"
        );
    }

    #[test]
    fn test_write_matrix_with_bom() {
        let dir = tempdir().unwrap();
        let path = write_matrix(&matrix(), dir.path(), true).unwrap();

        let bytes = std::fs::read(path).unwrap();
        assert_eq!(&bytes[..3], UTF8_BOM);
    }

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("simple"), "simple");
        assert_eq!(escape_csv("with,comma"), "\"with,comma\"");
        assert_eq!(escape_csv("with\"quote"), "\"with\"\"quote\"");
    }
}
