//! Common error types for the EPG dataset tools

use thiserror::Error;

/// Common result type for EPG dataset operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the EPG dataset tools
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error (wraps serde_json::Error)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A dataset line that is not valid JSON or does not match the record
    /// shape. The whole run fails; there is no partial recovery.
    #[error("{path}:{line}: malformed JSONL record: {source}")]
    MalformedLine {
        path: String,
        line: usize,
        source: serde_json::Error,
    },

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}
