//! Per-category sampling quotas
//!
//! Category proportions are compiled-in policy. Quotas are reconciled with
//! the largest-remainder method so the three targets always sum exactly to
//! the requested subset size: floor every share, then hand the leftover
//! units out by descending fractional remainder (ties: larger proportion
//! first, then declaration order).

use epgds_common::channels::BroadcastCategory;

/// Fixed category proportions of a subset
pub const CATEGORY_PROPORTIONS: [(BroadcastCategory, f64); 3] = [
    (BroadcastCategory::Terrestrial, 0.65),
    (BroadcastCategory::BsFree, 0.25),
    (BroadcastCategory::BsPaidOrCs, 0.10),
];

/// Allocate per-category target counts for a subset of `subset_size`.
pub fn allocate_quotas(subset_size: usize) -> [(BroadcastCategory, usize); 3] {
    let mut targets = [0usize; 3];
    let mut remainders = [0f64; 3];

    for (index, (_, proportion)) in CATEGORY_PROPORTIONS.iter().enumerate() {
        let share = proportion * subset_size as f64;
        targets[index] = share.floor() as usize;
        remainders[index] = share - share.floor();
    }

    let assigned: usize = targets.iter().sum();
    let mut leftover = subset_size.saturating_sub(assigned);

    // At most two units remain with three categories; one ordered pass
    // hands them all out
    let mut order: Vec<usize> = (0..CATEGORY_PROPORTIONS.len()).collect();
    order.sort_by(|&a, &b| {
        remainders[b]
            .total_cmp(&remainders[a])
            .then(CATEGORY_PROPORTIONS[b].1.total_cmp(&CATEGORY_PROPORTIONS[a].1))
            .then(a.cmp(&b))
    });
    for index in order {
        if leftover == 0 {
            break;
        }
        targets[index] += 1;
        leftover -= 1;
    }

    [
        (CATEGORY_PROPORTIONS[0].0, targets[0]),
        (CATEGORY_PROPORTIONS[1].0, targets[1]),
        (CATEGORY_PROPORTIONS[2].0, targets[2]),
    ]
}
