//! epgds-extract library - EPG dataset extraction
//!
//! Queries an EDCB recording server for historical (and, when the range
//! reaches into the future, scheduled) EPG data and turns the returned
//! events into programme records for the JSONL dataset.

pub mod edcb;
pub mod extract;
