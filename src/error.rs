use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading and normalizing receipt data.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The input file expected for a group does not exist.
    #[error("Source not found for {group}: {path}")]
    SourceNotFound { group: String, path: PathBuf },

    /// A receipt date did not match `M/D/YY[ H:MM]`.
    #[error("Invalid date {input:?}: {reason}")]
    Format { input: String, reason: &'static str },

    /// A numeric column held something that is not a number.
    #[error("Invalid number in {column}: {value:?}")]
    Conversion { column: String, value: String },

    /// The CSV reader rejected a file.
    #[error("Failed to parse CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
