//! Little-endian primitives for EDCB's serialized forms
//!
//! Everything on the wire is little-endian. Strings are UTF-16LE with a
//! leading u32 byte size that counts the size field itself and a trailing
//! NUL. Structs and vectors carry a leading u32 byte size as well, which
//! lets a reader skip fields appended by newer server versions; an optional
//! nested struct with size 4 is absent.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

use epgds_common::dataset::jst;

use super::{EdcbError, EdcbResult};

/// Seconds between the FILETIME epoch (1601-01-01) and the Unix epoch
const FILETIME_UNIX_OFFSET_SECS: i64 = 11_644_473_600;

/// FILETIME ticks per second (100ns units)
const FILETIME_TICKS_PER_SEC: i64 = 10_000_000;

/// Convert a JST datetime to the local-time FILETIME EDCB expects in
/// enumeration parameters.
pub fn to_edcb_filetime(dt: &DateTime<FixedOffset>) -> i64 {
    let local_secs = dt.timestamp() + i64::from(dt.offset().local_minus_utc());
    (local_secs + FILETIME_UNIX_OFFSET_SECS) * FILETIME_TICKS_PER_SEC
}

/// Request payload builder
#[derive(Debug, Default)]
pub struct CmdWriter {
    buf: Vec<u8>,
}

impl CmdWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn write_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_i64(&mut self, value: i64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Vector of i64: u32 total byte size (header included), u32 element
    /// count, then the elements.
    pub fn write_i64_vector(&mut self, values: &[i64]) {
        let size = 8 + 8 * values.len() as u32;
        self.write_u32(size);
        self.write_u32(values.len() as u32);
        for value in values {
            self.write_i64(*value);
        }
    }
}

/// Response payload reader
pub struct CmdReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> CmdReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn take(&mut self, len: usize) -> EdcbResult<&'a [u8]> {
        if self.pos + len > self.buf.len() {
            return Err(EdcbError::Decode(format!(
                "unexpected end of payload at offset {} (wanted {} bytes of {})",
                self.pos,
                len,
                self.buf.len()
            )));
        }
        let slice = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> EdcbResult<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> EdcbResult<u16> {
        let bytes = self.take(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_u32(&mut self) -> EdcbResult<u32> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Size-prefixed UTF-16LE string
    pub fn read_string(&mut self) -> EdcbResult<String> {
        let size = self.read_u32()? as usize;
        if size < 4 || size % 2 != 0 {
            return Err(EdcbError::Decode(format!("invalid string size {size}")));
        }
        let bytes = self.take(size - 4)?;
        let units: Vec<u16> = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        let mut text = char::decode_utf16(units.iter().copied())
            .collect::<Result<String, _>>()
            .map_err(|e| EdcbError::Decode(format!("invalid UTF-16 string: {e}")))?;
        // Trailing NUL terminator
        if text.ends_with('\0') {
            text.pop();
        }
        Ok(text)
    }

    /// SYSTEMTIME (8 x u16, local JST wall clock)
    pub fn read_systemtime(&mut self) -> EdcbResult<DateTime<FixedOffset>> {
        let year = self.read_u16()?;
        let month = self.read_u16()?;
        let _day_of_week = self.read_u16()?;
        let day = self.read_u16()?;
        let hour = self.read_u16()?;
        let minute = self.read_u16()?;
        let second = self.read_u16()?;
        let _millis = self.read_u16()?;

        let date = NaiveDate::from_ymd_opt(i32::from(year), u32::from(month), u32::from(day))
            .ok_or_else(|| {
                EdcbError::Decode(format!("invalid SYSTEMTIME date {year}-{month}-{day}"))
            })?;
        let time = NaiveTime::from_hms_opt(u32::from(hour), u32::from(minute), u32::from(second))
            .ok_or_else(|| {
                EdcbError::Decode(format!("invalid SYSTEMTIME clock {hour}:{minute}:{second}"))
            })?;
        match jst().from_local_datetime(&NaiveDateTime::new(date, time)) {
            chrono::LocalResult::Single(dt) => Ok(dt),
            _ => Err(EdcbError::Decode("ambiguous SYSTEMTIME".into())),
        }
    }

    /// Size-prefixed struct: parse the body with `f`, then skip whatever the
    /// parser left unread (fields from newer server versions).
    pub fn read_struct<T>(
        &mut self,
        f: impl FnOnce(&mut CmdReader<'a>) -> EdcbResult<T>,
    ) -> EdcbResult<T> {
        let size = self.read_u32()? as usize;
        if size < 4 || self.pos + (size - 4) > self.buf.len() {
            return Err(EdcbError::Decode(format!("invalid struct size {size}")));
        }
        let end = self.pos + (size - 4);
        let mut body = CmdReader {
            buf: &self.buf[..end],
            pos: self.pos,
        };
        let value = f(&mut body)?;
        self.pos = end;
        Ok(value)
    }

    /// Optional nested struct: size 4 means absent.
    pub fn read_optional_struct<T>(
        &mut self,
        f: impl FnOnce(&mut CmdReader<'a>) -> EdcbResult<T>,
    ) -> EdcbResult<Option<T>> {
        if self.pos + 4 > self.buf.len() {
            return Err(EdcbError::Decode(
                "unexpected end of payload reading struct size".into(),
            ));
        }
        let mut size_bytes = [0u8; 4];
        size_bytes.copy_from_slice(&self.buf[self.pos..self.pos + 4]);
        if u32::from_le_bytes(size_bytes) == 4 {
            self.pos += 4;
            return Ok(None);
        }
        self.read_struct(f).map(Some)
    }

    /// Size+count-prefixed vector of size-prefixed structs
    pub fn read_struct_vector<T>(
        &mut self,
        mut f: impl FnMut(&mut CmdReader<'a>) -> EdcbResult<T>,
    ) -> EdcbResult<Vec<T>> {
        let _size = self.read_u32()?;
        let count = self.read_u32()? as usize;
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            items.push(self.read_struct(&mut f)?);
        }
        Ok(items)
    }
}
