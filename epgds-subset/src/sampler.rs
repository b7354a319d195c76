//! Stratified weighted sampling stage
//!
//! Draws each category's quota uniformly-by-weight without replacement. A
//! category with fewer candidates than its target is taken whole; the
//! shortfall is not redistributed, so the final subset may be smaller than
//! requested (degraded but successful).

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};

use epgds_common::channels::BroadcastCategory;
use epgds_common::dataset::SubsetRecord;

use crate::error::SubsetError;
use crate::filter::Candidate;
use crate::quota::allocate_quotas;

/// Select up to `subset_size` records from the candidates, respecting the
/// fixed category proportions. The result is sorted ascending by id.
pub fn sample_subset(
    candidates: Vec<Candidate>,
    subset_size: usize,
    rng: &mut impl Rng,
) -> Result<Vec<SubsetRecord>, SubsetError> {
    if candidates.is_empty() {
        return Err(SubsetError::EmptyInput);
    }

    let mut pools: HashMap<BroadcastCategory, Vec<Candidate>> = HashMap::new();
    for candidate in candidates {
        pools.entry(candidate.category).or_default().push(candidate);
    }

    let mut selected = Vec::new();
    for (category, target) in allocate_quotas(subset_size) {
        let pool = pools.remove(&category).unwrap_or_default();
        let available = pool.len();

        if available <= target {
            // Short category: take everything, do not backfill elsewhere
            if available < target {
                debug!(
                    category = category.label(),
                    target, available, "category shortfall; taking all candidates"
                );
            }
            selected.extend(pool.into_iter().map(|c| c.record));
            continue;
        }

        let picked: Vec<SubsetRecord> = pool
            .choose_multiple_weighted(rng, target, |candidate| candidate.weight)
            .map_err(|e| SubsetError::Sampling(e.to_string()))?
            .map(|candidate| candidate.record.clone())
            .collect();
        info!(
            category = category.label(),
            target,
            available,
            "category sampled"
        );
        selected.extend(picked);
    }

    selected.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(selected)
}
