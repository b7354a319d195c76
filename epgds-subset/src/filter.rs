//! Filtering stage
//!
//! Pure pass over the loaded dataset producing the candidate set: every
//! record either survives (tagged with its broadcast category and sampling
//! weight) or is dropped for exactly one reason. The predicates are
//! independent; a record failing any one is out.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, FixedOffset};
use tracing::{debug, info};

use epgds_common::channels::{categorize, BroadcastCategory};
use epgds_common::dataset::SubsetRecord;
use epgds_common::genres::{is_known_major_genre, GENRE_UNSET, SHOPPING_GENRE};

use crate::weights::sampling_weight;

/// Optional date window for candidate selection
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    pub start_date: Option<DateTime<FixedOffset>>,
    pub end_date: Option<DateTime<FixedOffset>>,
}

/// A record that survived filtering, tagged for the sampling stage
#[derive(Debug, Clone)]
pub struct Candidate {
    pub record: SubsetRecord,
    pub category: BroadcastCategory,
    pub weight: f64,
}

/// Why a record was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    OutsideWindow,
    Shopping,
    UnknownGenre,
    MissingGenre,
    EmptyTitle,
    Duplicate,
    Uncategorized,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RejectReason::OutsideWindow => "outside date window",
            RejectReason::Shopping => "shopping programme",
            RejectReason::UnknownGenre => "unknown genre code",
            RejectReason::MissingGenre => "genre absent",
            RejectReason::EmptyTitle => "empty title",
            RejectReason::Duplicate => "duplicate broadcast",
            RejectReason::Uncategorized => "network outside all categories",
        };
        f.write_str(label)
    }
}

/// Duplicate signature: normalized title + schedule slot + network.
///
/// Two records with the same signature describe the same underlying
/// broadcast instance; rebroadcasts on another day or channel keep their
/// own signature and survive.
fn duplicate_signature(record: &SubsetRecord) -> (String, i64, u16) {
    (
        record.title.clone(),
        record.start_time.timestamp(),
        record.network_id,
    )
}

fn stateless_reject(record: &SubsetRecord, options: &FilterOptions) -> Option<RejectReason> {
    if let Some(start) = options.start_date {
        if record.start_time < start {
            return Some(RejectReason::OutsideWindow);
        }
    }
    if let Some(end) = options.end_date {
        if record.start_time > end {
            return Some(RejectReason::OutsideWindow);
        }
    }
    if (record.major_genre_id, record.middle_genre_id) == SHOPPING_GENRE {
        return Some(RejectReason::Shopping);
    }
    if record.major_genre_id == GENRE_UNSET || record.middle_genre_id == GENRE_UNSET {
        return Some(RejectReason::MissingGenre);
    }
    if !is_known_major_genre(record.major_genre_id) {
        return Some(RejectReason::UnknownGenre);
    }
    if record.title.trim().is_empty() {
        return Some(RejectReason::EmptyTitle);
    }
    None
}

/// Apply the exclusion rules and tag survivors with category and weight.
pub fn filter_candidates(records: Vec<SubsetRecord>, options: &FilterOptions) -> Vec<Candidate> {
    let total = records.len();
    let mut seen_signatures = HashSet::new();
    let mut candidates = Vec::new();
    let mut rejected = 0usize;

    let skip = |id: &str, reason: RejectReason| {
        debug!(id, %reason, "skipping record");
    };

    for record in records {
        if let Some(reason) = stateless_reject(&record, options) {
            skip(&record.id, reason);
            rejected += 1;
            continue;
        }
        if !seen_signatures.insert(duplicate_signature(&record)) {
            skip(&record.id, RejectReason::Duplicate);
            rejected += 1;
            continue;
        }
        let Some(category) = categorize(record.network_id, record.service_id) else {
            skip(&record.id, RejectReason::Uncategorized);
            rejected += 1;
            continue;
        };

        let weight = sampling_weight(&record);
        candidates.push(Candidate {
            record,
            category,
            weight,
        });
    }

    info!(
        total,
        rejected,
        candidates = candidates.len(),
        "filtering complete"
    );
    candidates
}
