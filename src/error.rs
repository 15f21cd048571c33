//! Error types for the trace-metal-analysis crate.
use std::path::PathBuf;
use thiserror::Error;

/// Error type for the crate.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The source table does not exist.
    #[error("Source file not found: {}", .0.display())]
    MissingFile(PathBuf),
    /// A column that is required for this analysis is missing, or is not numeric.
    #[error("Missing column required for the analysis: {0}")]
    MissingColumn(String),
    /// The metal has no entry in the crustal ratio table.
    #[error("Unsupported metal '{0}', choose from: Fe, Mn, Co, Zn, Cd, Ni, Cu")]
    UnsupportedMetal(String),
    /// Unrecognized result mode for the lithogenic calculation.
    #[error("Invalid mode '{0}', choose 'percent' or 'absolute'")]
    InvalidMode(String),
    /// Unrecognized summary statistic layout.
    #[error("Invalid summary kind '{0}', choose 'mean', 'mean_sd', 'median', 'median_n' or 'mean_range'")]
    InvalidSummaryKind(String),
    /// Derived corrections no longer describe the table they are applied to.
    #[error("Corrections for {0} do not match the table")]
    StaleCorrection(String),
    /// Bad pipeline configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Forward an error from the csv crate
    #[error("Error bubbled up from csv crate: {0}")]
    Csv(#[from] csv::Error),
    /// Forward an error from the regex crate
    #[error("Error bubbled up from regex crate: {0}")]
    Regex(#[from] regex::Error),
    /// Forward an I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand for results.
pub type Result<T> = ::std::result::Result<T, AnalysisError>;

impl From<toml::de::Error> for AnalysisError {
    fn from(err: toml::de::Error) -> Self {
        AnalysisError::Config(err.to_string())
    }
}
