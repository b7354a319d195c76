//! Subset distribution report
//!
//! Logged before the subset is written so an operator can sanity-check the
//! category/period/genre balance of a draw without opening the file.

use std::collections::BTreeMap;

use chrono::Datelike;
use tracing::info;

use epgds_common::channels::categorize;
use epgds_common::dataset::SubsetRecord;
use epgds_common::genres::major_genre_name;

fn percentage(count: usize, total: usize) -> f64 {
    count as f64 / total as f64 * 100.0
}

/// Log the category, year, month, and genre distribution of the subset.
pub fn log_distribution(records: &[SubsetRecord]) {
    let total = records.len();
    if total == 0 {
        return;
    }

    let mut category_counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    let mut year_counts: BTreeMap<i32, usize> = BTreeMap::new();
    let mut month_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut major_counts: BTreeMap<i16, usize> = BTreeMap::new();
    let mut middle_counts: BTreeMap<(i16, i16), usize> = BTreeMap::new();

    for record in records {
        if let Some(category) = categorize(record.network_id, record.service_id) {
            *category_counts.entry(category.label()).or_default() += 1;
        }
        *year_counts.entry(record.start_time.year()).or_default() += 1;
        *month_counts
            .entry(record.start_time.format("%Y-%m").to_string())
            .or_default() += 1;
        *major_counts.entry(record.major_genre_id).or_default() += 1;
        *middle_counts
            .entry((record.major_genre_id, record.middle_genre_id))
            .or_default() += 1;
    }

    info!(total, "subset distribution");
    for (&label, &count) in &category_counts {
        info!(
            category = label,
            count,
            percent = %format!("{:.2}", percentage(count, total)),
            "category share"
        );
    }
    for (&year, &count) in &year_counts {
        info!(
            year,
            count,
            percent = %format!("{:.2}", percentage(count, total)),
            "year share"
        );
    }
    for (month, &count) in &month_counts {
        info!(
            month = %month,
            count,
            percent = %format!("{:.2}", percentage(count, total)),
            "month share"
        );
    }
    for (&major, &count) in &major_counts {
        info!(
            genre = major_genre_name(major),
            count,
            percent = %format!("{:.2}", percentage(count, total)),
            "major genre share"
        );
    }
    for (&(major, middle), &count) in &middle_counts {
        info!(
            genre = major_genre_name(major),
            middle = %format!("0x{middle:X}"),
            count,
            percent = %format!("{:.2}", percentage(count, total)),
            "middle genre share"
        );
    }
}
