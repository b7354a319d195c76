//! Programme record construction
//!
//! Turns enumerated EDCB events into dataset records: service/network
//! filtering, id construction, title normalization, genre extraction, and
//! cross-run duplicate suppression.

use std::collections::HashSet;

use chrono::{DateTime, FixedOffset};
use tracing::debug;

use epgds_common::dataset::ProgrammeRecord;
use epgds_common::genres::GENRE_UNSET;
use epgds_common::text::{format_string, remove_symbols};
use epgds_common::Result;

use crate::edcb::ServiceEventInfo;

/// ARIB service type of digital TV services; one-seg and data services are
/// not collected
const DIGITAL_TV_SERVICE_TYPE: u8 = 0x01;

/// Default extraction targets: BS, CS1, CS2 and the Tokyo-area terrestrial
/// networks
pub const DEFAULT_INCLUDE_NETWORK_IDS: &[u16] = &[
    0x0004, // BS
    0x0006, // CS1
    0x0007, // CS2
    32736,  // NHK総合1・東京
    32737,  // NHKEテレ1東京
    32738,  // 日テレ
    32741,  // テレビ朝日
    32739,  // TBS
    32742,  // テレビ東京
    32740,  // フジテレビ
    32391,  // TOKYO MX
];

/// Build the programme id: `YYYYMMDDHHMM-NIDnnnnn-SIDnnnnn-EIDnnnnn`.
/// The leading start time makes the id unique and chronologically sortable.
pub fn programme_id(start_time: &DateTime<FixedOffset>, onid: u16, sid: u16, eid: u16) -> String {
    format!(
        "{}-NID{:05}-SID{:05}-EID{:05}",
        start_time.format("%Y%m%d%H%M"),
        onid,
        sid,
        eid
    )
}

/// Convert enumerated services into dataset records.
///
/// `seen_ids` persists across chunks so a programme returned twice (archive
/// overlap, or by both archive and schedule enumeration) is written once.
/// Returned records are in enumeration order; the caller sorts per chunk.
pub fn build_records(
    services: &[ServiceEventInfo],
    include_network_ids: &[u16],
    seen_ids: &mut HashSet<String>,
) -> Result<Vec<ProgrammeRecord>> {
    let mut records = Vec::new();

    for service in services {
        if service.service_info.service_type != DIGITAL_TV_SERVICE_TYPE {
            continue;
        }

        for event in &service.event_list {
            if !include_network_ids.contains(&event.onid) {
                continue;
            }
            let Some(short_info) = &event.short_info else {
                // No title/description means the record is useless downstream
                continue;
            };
            let (Some(start_time), Some(duration)) = (event.start_time, event.duration_sec)
            else {
                debug!(
                    onid = event.onid,
                    eid = event.eid,
                    "skipping event without schedule fields"
                );
                continue;
            };

            let id = programme_id(&start_time, event.onid, event.sid, event.eid);
            if !seen_ids.insert(id.clone()) {
                debug!(id = %id, "skipping duplicate programme id");
                continue;
            }

            let title = format_string(&short_info.event_name);
            let description = format_string(&short_info.text_char);

            // First genre nibble only; -1 marks an absent genre descriptor
            let (major_genre_id, middle_genre_id) = event
                .content_info
                .as_ref()
                .and_then(|info| info.nibble_list.first())
                .map(|nibble| {
                    (
                        (nibble.content_nibble >> 8) as i16,
                        (nibble.content_nibble & 0xF) as i16,
                    )
                })
                .unwrap_or((GENRE_UNSET, GENRE_UNSET));

            records.push(ProgrammeRecord {
                id,
                network_id: event.onid,
                service_id: event.sid,
                transport_stream_id: event.tsid,
                event_id: event.eid,
                start_time,
                duration,
                title_without_symbols: remove_symbols(&title),
                title,
                description_without_symbols: remove_symbols(&description),
                description,
                major_genre_id,
                middle_genre_id,
                raw: serde_json::to_value(event)?,
            });
        }
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edcb::types::{ContentData, ContentInfo, EventInfo, ServiceInfo, ShortInfo};
    use epgds_common::dataset::parse_jst_datetime;

    fn service(service_type: u8, events: Vec<EventInfo>) -> ServiceEventInfo {
        ServiceEventInfo {
            service_info: ServiceInfo {
                onid: 32736,
                tsid: 32736,
                sid: 1024,
                service_type,
                partial_reception_flag: 0,
                service_provider_name: "NHK".into(),
                service_name: "ＮＨＫ総合１・東京".into(),
                network_name: "NHK".into(),
                ts_name: "NHK".into(),
                remote_control_key_id: 1,
            },
            event_list: events,
        }
    }

    fn event(onid: u16, eid: u16) -> EventInfo {
        EventInfo {
            onid,
            tsid: 32736,
            sid: 1024,
            eid,
            start_time: Some(parse_jst_datetime("2023-01-01T12:30:00").unwrap()),
            duration_sec: Some(1800),
            short_info: Some(ShortInfo {
                event_name: "ニュース".into(),
                text_char: "昼のニュース".into(),
            }),
            ext_info: None,
            content_info: Some(ContentInfo {
                nibble_list: vec![ContentData {
                    content_nibble: 0x0001,
                    user_nibble: 0xFFFF,
                }],
            }),
        }
    }

    #[test]
    fn programme_id_format() {
        let start = parse_jst_datetime("2023-01-01T12:30:00").unwrap();
        assert_eq!(
            programme_id(&start, 32736, 1024, 535),
            "202301011230-NID32736-SID01024-EID00535"
        );
    }

    #[test]
    fn builds_record_with_genre_nibbles() {
        let mut event = event(32736, 1);
        event.content_info = Some(ContentInfo {
            nibble_list: vec![ContentData {
                content_nibble: 0x0301,
                user_nibble: 0xFFFF,
            }],
        });
        let services = vec![service(0x01, vec![event])];

        let mut seen = HashSet::new();
        let records = build_records(&services, DEFAULT_INCLUDE_NETWORK_IDS, &mut seen).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].major_genre_id, 0x3);
        assert_eq!(records[0].middle_genre_id, 0x1);
        assert_eq!(records[0].title, "ニュース");
        assert!(records[0].raw.get("onid").is_some());
    }

    #[test]
    fn missing_genre_descriptor_maps_to_unset() {
        let mut event = event(32736, 1);
        event.content_info = None;
        let services = vec![service(0x01, vec![event])];

        let mut seen = HashSet::new();
        let records = build_records(&services, DEFAULT_INCLUDE_NETWORK_IDS, &mut seen).unwrap();
        assert_eq!(records[0].major_genre_id, GENRE_UNSET);
        assert_eq!(records[0].middle_genre_id, GENRE_UNSET);
    }

    #[test]
    fn skips_non_tv_services_and_excluded_networks() {
        let oneseg = service(0xC0, vec![event(32736, 1)]);
        let excluded_network = service(0x01, vec![event(0x7FFF, 2)]);
        let services = vec![oneseg, excluded_network];

        let mut seen = HashSet::new();
        let records = build_records(&services, DEFAULT_INCLUDE_NETWORK_IDS, &mut seen).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn skips_events_without_short_info() {
        let mut bare = event(32736, 1);
        bare.short_info = None;
        let services = vec![service(0x01, vec![bare])];

        let mut seen = HashSet::new();
        let records = build_records(&services, DEFAULT_INCLUDE_NETWORK_IDS, &mut seen).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn duplicate_ids_are_written_once_across_chunks() {
        let services = vec![service(0x01, vec![event(32736, 1)])];

        let mut seen = HashSet::new();
        let first = build_records(&services, DEFAULT_INCLUDE_NETWORK_IDS, &mut seen).unwrap();
        let second = build_records(&services, DEFAULT_INCLUDE_NETWORK_IDS, &mut seen).unwrap();
        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
    }
}
