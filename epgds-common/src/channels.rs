//! Broadcast category classification
//!
//! Programmes are grouped into three categories derived purely from
//! `(network_id, service_id)` membership in fixed ranges. The ranges follow
//! the Japanese digital broadcasting network layout: terrestrial networks
//! occupy a contiguous ONID range, BS is a single network whose paid
//! channels (WOWOW, STAR CHANNEL) sit in known service-id ranges, and the
//! two CS networks are always paid.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Terrestrial network id range
pub const TERRESTRIAL_NETWORK_IDS: RangeInclusive<u16> = 0x7880..=0x7FE8;

/// BS satellite network id
pub const BS_NETWORK_ID: u16 = 0x0004;
/// CS1 satellite network id
pub const CS1_NETWORK_ID: u16 = 0x0006;
/// CS2 satellite network id
pub const CS2_NETWORK_ID: u16 = 0x0007;

/// Paid BS service id ranges (WOWOW and STAR CHANNEL)
const PAID_BS_SERVICE_IDS: [RangeInclusive<u16>; 2] = [191..=209, 234..=256];

/// Broadcast category of a programme, the sampling stratum key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BroadcastCategory {
    Terrestrial,
    BsFree,
    BsPaidOrCs,
}

impl BroadcastCategory {
    /// All categories, in policy declaration order
    pub const ALL: [BroadcastCategory; 3] = [
        BroadcastCategory::Terrestrial,
        BroadcastCategory::BsFree,
        BroadcastCategory::BsPaidOrCs,
    ];

    /// Human-readable label for reports
    pub fn label(&self) -> &'static str {
        match self {
            BroadcastCategory::Terrestrial => "terrestrial",
            BroadcastCategory::BsFree => "bs_free",
            BroadcastCategory::BsPaidOrCs => "bs_paid_or_cs",
        }
    }
}

/// Terrestrial network?
pub fn is_terrestrial(network_id: u16) -> bool {
    TERRESTRIAL_NETWORK_IDS.contains(&network_id)
}

fn is_paid_bs_service(service_id: u16) -> bool {
    PAID_BS_SERVICE_IDS
        .iter()
        .any(|range| range.contains(&service_id))
}

/// Free-to-air BS channel?
pub fn is_free_bs(network_id: u16, service_id: u16) -> bool {
    network_id == BS_NETWORK_ID && !is_paid_bs_service(service_id)
}

/// Paid BS channel or any CS channel?
pub fn is_paid_bs_cs(network_id: u16, service_id: u16) -> bool {
    network_id == CS1_NETWORK_ID
        || network_id == CS2_NETWORK_ID
        || (network_id == BS_NETWORK_ID && is_paid_bs_service(service_id))
}

/// Classify a programme by `(network_id, service_id)`.
///
/// Returns `None` for networks outside all three groups (such programmes
/// never enter a subset).
pub fn categorize(network_id: u16, service_id: u16) -> Option<BroadcastCategory> {
    if is_terrestrial(network_id) {
        Some(BroadcastCategory::Terrestrial)
    } else if is_free_bs(network_id, service_id) {
        Some(BroadcastCategory::BsFree)
    } else if is_paid_bs_cs(network_id, service_id) {
        Some(BroadcastCategory::BsPaidOrCs)
    } else {
        None
    }
}
