//! CtrlCmd TCP client
//!
//! One connection per command, matching how EDCB's own tools drive the
//! protocol. Requests and responses share the same 8-byte frame header:
//! command/result code (u32 LE) followed by payload byte length (u32 LE).

use std::time::Duration;

use chrono::{DateTime, FixedOffset};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::debug;

use super::codec::{to_edcb_filetime, CmdReader, CmdWriter};
use super::types::ServiceEventInfo;
use super::{EdcbError, EdcbResult};

/// Default CtrlCmd port
pub const DEFAULT_PORT: u16 = 4510;

/// Archive enumeration can take a long while on large recordings
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(60);

/// Enumerate archived (past) EPG events
const CMD_ENUM_PG_ARC: u32 = 1030;
/// Enumerate current/future EPG events
const CMD_ENUM_PG_INFO_EX: u32 = 1029;

/// Successful command result code
const CMD_SUCCESS: u32 = 1;

/// Match-everything mask for the network/TS/service id filter. The filter
/// key packs `onid << 32 | tsid << 16 | sid`; all-ones selects every service
/// and the per-network filtering happens client side.
const SERVICE_KEY_ALL: i64 = 0xFFFF_FFFF_FFFF;

/// EDCB CtrlCmd client
pub struct CtrlCmdClient {
    host: String,
    port: u16,
    connect_timeout: Duration,
}

impl CtrlCmdClient {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    /// Enumerate archived EPG events whose start time falls in
    /// `[min_start, max_start)`.
    pub async fn enum_pg_arc(
        &self,
        min_start: &DateTime<FixedOffset>,
        max_start: &DateTime<FixedOffset>,
    ) -> EdcbResult<Vec<ServiceEventInfo>> {
        self.enum_services(CMD_ENUM_PG_ARC, min_start, max_start)
            .await
    }

    /// Enumerate current/future EPG events whose start time falls in
    /// `[min_start, max_start)`.
    pub async fn enum_pg_info_ex(
        &self,
        min_start: &DateTime<FixedOffset>,
        max_start: &DateTime<FixedOffset>,
    ) -> EdcbResult<Vec<ServiceEventInfo>> {
        self.enum_services(CMD_ENUM_PG_INFO_EX, min_start, max_start)
            .await
    }

    async fn enum_services(
        &self,
        cmd: u32,
        min_start: &DateTime<FixedOffset>,
        max_start: &DateTime<FixedOffset>,
    ) -> EdcbResult<Vec<ServiceEventInfo>> {
        let mut writer = CmdWriter::new();
        writer.write_i64_vector(&[
            SERVICE_KEY_ALL,
            SERVICE_KEY_ALL,
            to_edcb_filetime(min_start),
            to_edcb_filetime(max_start),
        ]);

        let payload = self.send_command(cmd, writer.into_bytes()).await?;

        let mut reader = CmdReader::new(&payload);
        let services = reader.read_struct_vector(ServiceEventInfo::read)?;
        debug!(cmd, services = services.len(), "EPG enumeration complete");
        Ok(services)
    }

    async fn send_command(&self, cmd: u32, data: Vec<u8>) -> EdcbResult<Vec<u8>> {
        debug!(cmd, host = %self.host, port = self.port, "sending CtrlCmd request");

        let mut stream = timeout(
            self.connect_timeout,
            TcpStream::connect((self.host.as_str(), self.port)),
        )
        .await
        .map_err(|_| EdcbError::Timeout(self.connect_timeout))??;

        let mut request = Vec::with_capacity(8 + data.len());
        request.extend_from_slice(&cmd.to_le_bytes());
        request.extend_from_slice(&(data.len() as u32).to_le_bytes());
        request.extend_from_slice(&data);
        stream.write_all(&request).await?;

        let mut header = [0u8; 8];
        stream.read_exact(&mut header).await?;
        let result = u32::from_le_bytes(header[0..4].try_into().expect("4-byte slice"));
        let length = u32::from_le_bytes(header[4..8].try_into().expect("4-byte slice")) as usize;

        let mut payload = vec![0u8; length];
        stream.read_exact(&mut payload).await?;

        if result != CMD_SUCCESS {
            return Err(EdcbError::Command(result));
        }
        Ok(payload)
    }
}
