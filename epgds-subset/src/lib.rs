//! epgds-subset library - stratified subset generation
//!
//! Builds an annotation-ready subset of the full EPG dataset in three
//! stages: filter (exclusion rules + duplicate suppression + category
//! tagging), stratified weighted sampling (fixed category proportions,
//! without replacement), and emission (strip raw payload, sort by id,
//! overwrite the destination).

pub mod error;
pub mod filter;
pub mod quota;
pub mod sampler;
pub mod stats;
pub mod weights;

pub use error::SubsetError;
