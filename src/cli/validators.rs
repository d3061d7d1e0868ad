//! CLI argument validators.
//!
//! Shared validation functions for CLI argument parsing.

use crate::constants::distance::{MAX_M, MIN_M};

/// A resolved set of truncation distances, sorted and deduplicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceSelection(pub Vec<u32>);

/// Parse a truncation distance selection.
///
/// Accepts a single distance (`100`), an inclusive range (`30-500`), or a
/// comma-separated list (`50,100,150`). Every distance must lie in the
/// working range.
pub fn parse_distance_selection(s: &str) -> Result<DistanceSelection, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("distance selection is empty".to_string());
    }

    let mut distances = if let Some((start, end)) = s.split_once('-') {
        let start = parse_distance(start)?;
        let end = parse_distance(end)?;
        if start > end {
            return Err(format!("range start {start} is greater than end {end}"));
        }
        (start..=end).collect::<Vec<u32>>()
    } else {
        s.split(',')
            .map(parse_distance)
            .collect::<Result<Vec<u32>, String>>()?
    };

    distances.sort_unstable();
    distances.dedup();
    Ok(DistanceSelection(distances))
}

fn parse_distance(s: &str) -> Result<u32, String> {
    let value: u32 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a valid distance in meters", s.trim()))?;

    if !(MIN_M..=MAX_M).contains(&value) {
        return Err(format!(
            "distance must be between {MIN_M} and {MAX_M} meters, got {value}"
        ));
    }

    Ok(value)
}
