//! Subset builder error types

use thiserror::Error;

/// Failures specific to subset generation
#[derive(Error, Debug)]
pub enum SubsetError {
    /// No eligible programme survived filtering. Nothing is written in this
    /// case; an empty subset file would silently poison downstream tooling.
    #[error("no eligible programmes remain after filtering; nothing to sample")]
    EmptyInput,

    /// The weighted draw itself failed (invalid weight in the pool)
    #[error("weighted sampling failed: {0}")]
    Sampling(String),
}
