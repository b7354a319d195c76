//! Service/event structures returned by EDCB's EPG enumeration
//!
//! Field names follow EDCB's own vocabulary (onid/tsid/sid/eid). The types
//! derive `Serialize` because the full event is carried verbatim into the
//! dataset's `raw` payload.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use super::codec::CmdReader;
use super::EdcbResult;

/// One service and its enumerated events
#[derive(Debug, Clone, Serialize)]
pub struct ServiceEventInfo {
    pub service_info: ServiceInfo,
    pub event_list: Vec<EventInfo>,
}

/// Service (channel) identification
#[derive(Debug, Clone, Serialize)]
pub struct ServiceInfo {
    pub onid: u16,
    pub tsid: u16,
    pub sid: u16,
    /// ARIB service type; 0x01 is a digital TV service
    pub service_type: u8,
    pub partial_reception_flag: u8,
    pub service_provider_name: String,
    pub service_name: String,
    pub network_name: String,
    pub ts_name: String,
    pub remote_control_key_id: u8,
}

/// One EPG event
#[derive(Debug, Clone, Serialize)]
pub struct EventInfo {
    pub onid: u16,
    pub tsid: u16,
    pub sid: u16,
    pub eid: u16,
    /// Absent when the event carries no valid start time
    pub start_time: Option<DateTime<FixedOffset>>,
    /// Absent when the event carries no valid duration
    pub duration_sec: Option<u32>,
    pub short_info: Option<ShortInfo>,
    pub ext_info: Option<ExtInfo>,
    pub content_info: Option<ContentInfo>,
}

/// Short event descriptor: title and one-line description
#[derive(Debug, Clone, Serialize)]
pub struct ShortInfo {
    pub event_name: String,
    pub text_char: String,
}

/// Extended event descriptor text
#[derive(Debug, Clone, Serialize)]
pub struct ExtInfo {
    pub text_char: String,
}

/// Content (genre) descriptor
#[derive(Debug, Clone, Serialize)]
pub struct ContentInfo {
    pub nibble_list: Vec<ContentData>,
}

/// One genre nibble pair: `content_nibble` packs the major genre in the
/// high byte and the middle genre in the low byte
#[derive(Debug, Clone, Serialize)]
pub struct ContentData {
    pub content_nibble: u16,
    pub user_nibble: u16,
}

impl ServiceEventInfo {
    pub(crate) fn read(reader: &mut CmdReader<'_>) -> EdcbResult<Self> {
        let service_info = reader.read_struct(ServiceInfo::read)?;
        let event_list = reader.read_struct_vector(EventInfo::read)?;
        Ok(Self {
            service_info,
            event_list,
        })
    }
}

impl ServiceInfo {
    pub(crate) fn read(reader: &mut CmdReader<'_>) -> EdcbResult<Self> {
        Ok(Self {
            onid: reader.read_u16()?,
            tsid: reader.read_u16()?,
            sid: reader.read_u16()?,
            service_type: reader.read_u8()?,
            partial_reception_flag: reader.read_u8()?,
            service_provider_name: reader.read_string()?,
            service_name: reader.read_string()?,
            network_name: reader.read_string()?,
            ts_name: reader.read_string()?,
            remote_control_key_id: reader.read_u8()?,
        })
    }
}

impl EventInfo {
    pub(crate) fn read(reader: &mut CmdReader<'_>) -> EdcbResult<Self> {
        let onid = reader.read_u16()?;
        let tsid = reader.read_u16()?;
        let sid = reader.read_u16()?;
        let eid = reader.read_u16()?;

        // SYSTEMTIME and duration bytes are always present on the wire; the
        // flags say whether they hold valid values
        let start_time_flag = reader.read_u8()?;
        let start_time_raw = reader.read_systemtime();
        let start_time = if start_time_flag != 0 {
            Some(start_time_raw?)
        } else {
            None
        };
        let duration_flag = reader.read_u8()?;
        let duration_sec = Some(reader.read_u32()?).filter(|_| duration_flag != 0);

        let short_info = reader.read_optional_struct(ShortInfo::read)?;
        let ext_info = reader.read_optional_struct(ExtInfo::read)?;
        let content_info = reader.read_optional_struct(ContentInfo::read)?;
        // Component/audio/group descriptors follow on the wire; the dataset
        // does not use them and read_struct skips them via the size headers.

        Ok(Self {
            onid,
            tsid,
            sid,
            eid,
            start_time,
            duration_sec,
            short_info,
            ext_info,
            content_info,
        })
    }
}

impl ShortInfo {
    pub(crate) fn read(reader: &mut CmdReader<'_>) -> EdcbResult<Self> {
        Ok(Self {
            event_name: reader.read_string()?,
            text_char: reader.read_string()?,
        })
    }
}

impl ExtInfo {
    pub(crate) fn read(reader: &mut CmdReader<'_>) -> EdcbResult<Self> {
        Ok(Self {
            text_char: reader.read_string()?,
        })
    }
}

impl ContentInfo {
    pub(crate) fn read(reader: &mut CmdReader<'_>) -> EdcbResult<Self> {
        Ok(Self {
            nibble_list: reader.read_struct_vector(ContentData::read)?,
        })
    }
}

impl ContentData {
    pub(crate) fn read(reader: &mut CmdReader<'_>) -> EdcbResult<Self> {
        let nibble_level_1 = reader.read_u8()?;
        let nibble_level_2 = reader.read_u8()?;
        let user_nibble_1 = reader.read_u8()?;
        let user_nibble_2 = reader.read_u8()?;
        Ok(Self {
            content_nibble: (u16::from(nibble_level_1) << 8) | u16::from(nibble_level_2),
            user_nibble: (u16::from(user_nibble_1) << 8) | u16::from(user_nibble_2),
        })
    }
}
