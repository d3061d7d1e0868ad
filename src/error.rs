//! Error types for attenua.

/// Result type alias for attenua operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for attenua.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration directory could not be determined.
    #[error("could not determine configuration directory for this platform")]
    ConfigDirNotFound,

    /// Failed to read configuration file.
    #[error("failed to read config file '{path}'")]
    ConfigRead {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}'")]
    ConfigParse {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// Failed to write configuration file.
    #[error("failed to write config file '{path}'")]
    ConfigWrite {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize configuration.
    #[error("failed to serialize config")]
    ConfigSerialize {
        /// Underlying serialization error.
        #[source]
        source: toml::ser::Error,
    },

    /// Failed to read detection table.
    #[error("failed to read detection table '{path}'")]
    DetectionRead {
        /// Path to the detection table.
        path: std::path::PathBuf,
        /// Underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Invalid detection table contents.
    #[error("invalid detection table: {message}")]
    InvalidDetectionFormat {
        /// Description of the format error.
        message: String,
    },

    /// Failed to read amplitude prediction table.
    #[error("failed to read amplitude prediction table '{path}'")]
    AmplitudeTableRead {
        /// Path to the amplitude prediction table.
        path: std::path::PathBuf,
        /// Underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Invalid amplitude prediction table contents.
    #[error("invalid amplitude prediction table: {message}")]
    InvalidAmplitudeFormat {
        /// Description of the format error.
        message: String,
    },

    /// Failed to read site-visit count table.
    #[error("failed to read site-visit table '{path}'")]
    SiteVisitRead {
        /// Path to the site-visit table.
        path: std::path::PathBuf,
        /// Underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Invalid site-visit count table contents.
    #[error("invalid site-visit table: {message}")]
    InvalidSiteVisitFormat {
        /// Description of the format error.
        message: String,
    },

    /// Invalid truncation distance specification.
    #[error("invalid distance specification '{value}': {message}")]
    InvalidDistanceSpec {
        /// The rejected specification string.
        value: String,
        /// Description of the parse failure.
        message: String,
    },

    /// No site satisfied the minimum-visit requirement.
    #[error("no site has at least {minimum_visits} transcribed visits")]
    NoEligibleSites {
        /// The minimum-visit requirement in effect.
        minimum_visits: u32,
    },

    /// Failed to create output directory.
    #[error("failed to create output directory '{path}'")]
    OutputDirCreate {
        /// Path to the output directory.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write an abundance matrix file.
    #[error("failed to write abundance matrix '{path}'")]
    MatrixWrite {
        /// Path to the matrix file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the run summary file.
    #[error("failed to write run summary '{path}'")]
    SummaryWrite {
        /// Path to the summary file.
        path: std::path::PathBuf,
        /// Underlying serialization error.
        #[source]
        source: serde_json::Error,
    },

    /// Internal error (for unexpected failures).
    #[error("internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}
