//! Programme record models shared by all three tools
//!
//! The full dataset and the annotation subset share one JSON Lines container:
//! one record per line. `ProgrammeRecord` is what the Extractor writes;
//! `SubsetRecord` is the same record with the opaque `raw` payload stripped
//! and the three manual annotation fields added.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// All EPG timestamps are Japan Standard Time (UTC+9)
pub fn jst() -> FixedOffset {
    FixedOffset::east_opt(9 * 3600).expect("UTC+9 is a valid offset")
}

/// One programme as extracted from EDCB, one line of the full dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgrammeRecord {
    /// `YYYYMMDDHHMM-NIDnnnnn-SIDnnnnn-EIDnnnnn`; the leading start time
    /// makes the id globally unique and gives the dataset a stable sort key
    pub id: String,
    pub network_id: u16,
    pub service_id: u16,
    pub transport_stream_id: u16,
    pub event_id: u16,
    pub start_time: DateTime<FixedOffset>,
    /// Programme duration in seconds
    pub duration: u32,
    pub title: String,
    pub title_without_symbols: String,
    pub description: String,
    pub description_without_symbols: String,
    /// ARIB major genre code, -1 when the genre descriptor is absent upstream
    #[serde(default = "genre_unset")]
    pub major_genre_id: i16,
    /// ARIB middle genre code, -1 when the genre descriptor is absent upstream
    #[serde(default = "genre_unset")]
    pub middle_genre_id: i16,
    /// Opaque upstream event payload, carried in the full dataset only
    pub raw: serde_json::Value,
}

/// One programme of the annotation subset.
///
/// Deserializing a full-dataset line into this type drops `raw` (unknown
/// fields are ignored) and leaves the annotation fields unset, which is
/// exactly the Subset Builder's emission contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubsetRecord {
    pub id: String,
    pub network_id: u16,
    pub service_id: u16,
    pub transport_stream_id: u16,
    pub event_id: u16,
    pub start_time: DateTime<FixedOffset>,
    pub duration: u32,
    pub title: String,
    pub title_without_symbols: String,
    pub description: String,
    pub description_without_symbols: String,
    #[serde(default = "genre_unset")]
    pub major_genre_id: i16,
    #[serde(default = "genre_unset")]
    pub middle_genre_id: i16,
    /// Series title of the programme, filled in by the Annotator
    #[serde(default)]
    pub series_title: String,
    /// Episode number string, `・`-delimited for multi-episode broadcasts
    #[serde(default)]
    pub episode_number: Option<String>,
    /// Subtitle string, `／`-delimited for multi-part broadcasts
    #[serde(default)]
    pub subtitle: Option<String>,
}

fn genre_unset() -> i16 {
    crate::genres::GENRE_UNSET
}

impl From<ProgrammeRecord> for SubsetRecord {
    fn from(record: ProgrammeRecord) -> Self {
        Self {
            id: record.id,
            network_id: record.network_id,
            service_id: record.service_id,
            transport_stream_id: record.transport_stream_id,
            event_id: record.event_id,
            start_time: record.start_time,
            duration: record.duration,
            title: record.title,
            title_without_symbols: record.title_without_symbols,
            description: record.description,
            description_without_symbols: record.description_without_symbols,
            major_genre_id: record.major_genre_id,
            middle_genre_id: record.middle_genre_id,
            series_title: String::new(),
            episode_number: None,
            subtitle: None,
        }
    }
}

/// Parse a CLI datetime value as JST.
///
/// Naive values are always UTC+9 (the broadcast schedule timezone), so the
/// offset is attached, not converted to. Accepts `YYYY-MM-DDTHH:MM:SS`,
/// `YYYY-MM-DD HH:MM:SS`, or a bare date (midnight).
pub fn parse_jst_datetime(value: &str) -> std::result::Result<DateTime<FixedOffset>, String> {
    let naive = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S"))
        .or_else(|_| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .map(|d| NaiveDateTime::new(d, NaiveTime::MIN))
        })
        .map_err(|e| format!("invalid datetime {value:?}: {e}"))?;
    naive
        .and_local_timezone(jst())
        .single()
        .ok_or_else(|| format!("invalid datetime {value:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_line() -> &'static str {
        r#"{"id":"202301011230-NID32736-SID01024-EID00535","network_id":32736,"service_id":1024,"transport_stream_id":32736,"event_id":535,"start_time":"2023-01-01T12:30:00+09:00","duration":1800,"title":"ニュース","title_without_symbols":"ニュース","description":"昼のニュース","description_without_symbols":"昼のニュース","major_genre_id":0,"middle_genre_id":0,"raw":{"onid":32736}}"#
    }

    #[test]
    fn programme_record_roundtrip() {
        let record: ProgrammeRecord = serde_json::from_str(sample_line()).unwrap();
        assert_eq!(record.id, "202301011230-NID32736-SID01024-EID00535");
        assert_eq!(record.start_time.offset().local_minus_utc(), 9 * 3600);

        let json = serde_json::to_string(&record).unwrap();
        let again: ProgrammeRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(again.id, record.id);
        assert_eq!(again.start_time, record.start_time);
    }

    #[test]
    fn subset_record_drops_raw_and_defaults_annotations() {
        let record: SubsetRecord = serde_json::from_str(sample_line()).unwrap();
        assert_eq!(record.series_title, "");
        assert_eq!(record.episode_number, None);
        assert_eq!(record.subtitle, None);

        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("\"raw\""));
    }

    #[test]
    fn missing_genre_fields_deserialize_as_unset() {
        let line = r#"{"id":"x","network_id":4,"service_id":101,"transport_stream_id":16400,"event_id":1,"start_time":"2023-01-01T12:30:00+09:00","duration":60,"title":"t","title_without_symbols":"t","description":"d","description_without_symbols":"d"}"#;
        let record: SubsetRecord = serde_json::from_str(line).unwrap();
        assert_eq!(record.major_genre_id, crate::genres::GENRE_UNSET);
        assert_eq!(record.middle_genre_id, crate::genres::GENRE_UNSET);
    }

    #[test]
    fn parse_jst_datetime_attaches_offset() {
        let dt = parse_jst_datetime("2023-04-01T05:00:00").unwrap();
        assert_eq!(dt.to_rfc3339(), "2023-04-01T05:00:00+09:00");

        let midnight = parse_jst_datetime("2023-04-01").unwrap();
        assert_eq!(midnight.to_rfc3339(), "2023-04-01T00:00:00+09:00");

        assert!(parse_jst_datetime("not a date").is_err());
    }
}
