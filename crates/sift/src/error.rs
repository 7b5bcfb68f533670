//! Error types for the sift library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for sift operations.
///
/// Only loading and configuration fail. Filtering and summarising degrade to
/// "no filter", "no rows" or "nothing to summarize" instead of erroring.
#[derive(Debug, Error)]
pub enum SiftError {
    /// Error reading or accessing a local file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A remote source could not be fetched or answered with a non-2xx status.
    #[error("Source unavailable '{source_name}': {message}")]
    SourceUnavailable {
        source_name: String,
        message: String,
    },

    /// Error parsing delimited text.
    #[error("Parse error at row {row}: {message}")]
    Parse { row: usize, message: String },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Empty input or no columns to explore.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// A column name that the table does not contain.
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for sift operations.
pub type Result<T> = std::result::Result<T, SiftError>;
