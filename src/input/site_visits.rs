//! Site-visit count table parsing and eligibility.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::Error;
use crate::input::SiteVisitCount;

/// Internal record for CSV deserialization.
#[derive(Debug, Deserialize)]
struct SiteVisitRow {
    #[serde(rename = "Site")]
    site: String,
    #[serde(rename = "Visits")]
    visits: u32,
}

/// Parse a site-visit count table.
///
/// Expected columns: Site, Visits.
///
/// # Errors
///
/// Returns an error if the file cannot be read or a row cannot be parsed.
pub fn read_site_visit_counts(path: &Path) -> Result<Vec<SiteVisitCount>, Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| Error::SiteVisitRead {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

    let mut counts = Vec::new();

    for (line_num, result) in reader.deserialize::<SiteVisitRow>().enumerate() {
        let row = result.map_err(|e| Error::InvalidSiteVisitFormat {
            message: format!("line {}: {e}", line_num + 2),
        })?;

        counts.push(SiteVisitCount {
            site: row.site,
            visits: row.visits,
        });
    }

    Ok(counts)
}

/// Sites with enough transcribed visits to enter the analysis.
pub fn eligible_sites(counts: &[SiteVisitCount], minimum_visits: u32) -> HashSet<String> {
    counts
        .iter()
        .filter(|c| c.visits >= minimum_visits)
        .map(|c| c.site.clone())
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_counts() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Site,Visits").unwrap();
        writeln!(file, "C-012,14").unwrap();
        writeln!(file, "C-019,9").unwrap();
        file.flush().unwrap();

        let counts = read_site_visit_counts(file.path()).unwrap();
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0].site, "C-012");
        assert_eq!(counts[1].visits, 9);
    }

    #[test]
    fn test_eligible_sites_threshold_inclusive() {
        let counts = vec![
            SiteVisitCount {
                site: "C-012".to_string(),
                visits: 10,
            },
            SiteVisitCount {
                site: "C-019".to_string(),
                visits: 9,
            },
        ];

        let eligible = eligible_sites(&counts, 10);
        assert!(eligible.contains("C-012"));
        assert!(!eligible.contains("C-019"));
    }

    #[test]
    fn test_missing_column_errors() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Site").unwrap();
        writeln!(file, "C-012").unwrap();
        file.flush().unwrap();

        let result = read_site_visit_counts(file.path());
        assert!(matches!(
            result,
            Err(Error::InvalidSiteVisitFormat { .. })
        ));
    }
}
