//! Application-wide constants.
//!
//! All magic numbers and strings are defined here to ensure consistency
//! and make changes easy to track.

/// Application name used for config directories and user-facing messages.
pub const APP_NAME: &str = "attenua";

/// Truncation distance constants.
pub mod distance {
    /// Smallest working truncation distance in meters.
    pub const MIN_M: u32 = 30;

    /// Largest working truncation distance in meters.
    pub const MAX_M: u32 = 500;

    /// Maximum gap between a query distance and the nearest table entry.
    ///
    /// The attenuation model was evaluated on a dense but not necessarily
    /// integer-aligned distance grid; exact-match lookups would miss most
    /// integer queries, so the nearest entry within this tolerance is used.
    pub const SNAP_TOLERANCE_M: f64 = 1.0;
}

/// Habitat classification from stand age.
///
/// Sites aged exactly 11 years fall in neither class. The study design
/// guarantees no site has that age; records carrying it are excluded
/// rather than merged into either class.
pub mod habitat {
    /// Sites harvested fewer than this many years ago are classed open.
    pub const OPEN_BELOW_YEARS: u32 = 11;

    /// Sites at least this many years post-harvest are classed forested.
    pub const FORESTED_FROM_YEARS: u32 = 12;
}

/// Survey effort requirements.
pub mod effort {
    /// Minimum transcribed visits for a site to enter the analysis.
    pub const MIN_VISITS: u32 = 10;
}

/// Output file naming.
pub mod output_files {
    /// Prefix of per-distance abundance matrix filenames.
    pub const MATRIX_PREFIX: &str = "abundance_";

    /// Suffix of per-distance abundance matrix filenames.
    pub const MATRIX_SUFFIX: &str = "m.csv";

    /// Run summary filename.
    pub const SUMMARY: &str = "truncation_summary.json";
}

/// Timestamp format for visit columns in input and output tables.
pub const VISIT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// UTF-8 Byte Order Mark for Excel compatibility in CSV files.
pub const UTF8_BOM: &[u8; 3] = b"\xEF\xBB\xBF";
