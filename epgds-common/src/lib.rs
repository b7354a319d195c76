//! # EPG Dataset Common Library
//!
//! Shared code for the EPG dataset tools including:
//! - Programme record models (full dataset and annotation subset)
//! - JSON Lines file I/O
//! - Broadcast category classification (terrestrial / BS / CS)
//! - ARIB genre policy constants
//! - Programme title/description text normalization

pub mod channels;
pub mod dataset;
pub mod error;
pub mod genres;
pub mod jsonl;
pub mod text;

pub use error::{Error, Result};
