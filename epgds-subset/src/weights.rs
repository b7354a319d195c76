//! Sampling weights
//!
//! A candidate's weight is a recency factor (newer programmes are more
//! valuable training data) times a genre adjustment that corrects for how
//! over- or under-represented each genre is in raw EPG data relative to
//! what actually gets recorded.

use chrono::{Datelike, Timelike};

use epgds_common::channels::{is_free_bs, is_terrestrial, CS2_NETWORK_ID};
use epgds_common::dataset::SubsetRecord;

/// Recency baseline: 2019-10 weighs 1.0
const RECENCY_BASE_YEAR: i32 = 2019;
const RECENCY_BASE_MONTH: u32 = 10;
/// Months over which the recency factor climbs by 1.0 (2024-10 weighs 2.0)
const RECENCY_SCALE_MONTHS: f64 = 60.0;

/// AT-X service id on CS2
const ATX_SERVICE_ID: u16 = 333;

/// Compute the sampling weight for one candidate record.
pub fn sampling_weight(record: &SubsetRecord) -> f64 {
    recency_factor(record) * genre_adjustment(record)
}

fn recency_factor(record: &SubsetRecord) -> f64 {
    let months = (record.start_time.year() - RECENCY_BASE_YEAR) * 12
        + record.start_time.month() as i32
        - RECENCY_BASE_MONTH as i32;
    f64::from(months.max(0)) / RECENCY_SCALE_MONTHS + 1.0
}

/// Genre adjustment table; the first matching rule wins.
fn genre_adjustment(record: &SubsetRecord) -> f64 {
    let major = record.major_genre_id;
    let middle = record.middle_genre_id;
    let terrestrial = is_terrestrial(record.network_id);
    let free_bs = is_free_bs(record.network_id, record.service_id);
    let hour = record.start_time.hour();

    if major == 0x0 && middle == 0x0 {
        // Scheduled news: rarely recorded
        0.7
    } else if major == 0x1 && terrestrial {
        // Sports on terrestrial
        1.5
    } else if major == 0x3 && middle == 0x0 && terrestrial {
        // Domestic drama on terrestrial, excluding the 04:00-17:00
        // rerun/afternoon-drama block
        if (4..=17).contains(&hour) {
            1.0
        } else {
            3.2
        }
    } else if major == 0x3 && middle == 0x0 && !terrestrial {
        // Domestic drama off terrestrial: dominated by old detective reruns
        0.25
    } else if major == 0x3 && middle == 0x1 {
        // Foreign drama
        0.25
    } else if major == 0x5 && terrestrial {
        // Variety on terrestrial
        1.1
    } else if major == 0x6 && (terrestrial || free_bs) {
        // Movies, scarce but important; anime movies even more so
        if middle == 0x2 {
            2.2 * 1.7
        } else {
            2.2
        }
    } else if major == 0x7 && middle == 0x0 && (terrestrial || free_bs) {
        // Domestic anime: boost late-night broadcasts only
        if (4..=20).contains(&hour) {
            1.0
        } else {
            2.2
        }
    } else if major == 0x8 && terrestrial {
        // Documentary / culture on terrestrial
        1.1
    } else if major == 0xA {
        // Hobby / education
        0.8
    } else if record.network_id == CS2_NETWORK_ID
        && record.service_id == ATX_SERVICE_ID
        && major == 0x7
    {
        // AT-X anime
        1.3
    } else {
        1.0
    }
}
