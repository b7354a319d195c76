//! EDCB CtrlCmd protocol client
//!
//! EDCB (EpgDataCap_Bon's recording server) exposes its EPG archive over a
//! binary request/response protocol on TCP port 4510. The wire format is
//! owned by EDCB; this module implements only the consumer side needed for
//! EPG enumeration:
//!
//! - `codec`: little-endian primitives for EDCB's serialized forms
//!   (size-prefixed UTF-16LE strings, SYSTEMTIME, size+count vectors,
//!   size-prefixed structs)
//! - `types`: the service/event structures returned by EPG enumeration
//! - `client`: TCP framing and the two enumeration commands

pub mod client;
pub mod codec;
pub mod types;

pub use client::CtrlCmdClient;
pub use types::{ContentData, EventInfo, ServiceEventInfo, ServiceInfo, ShortInfo};

use thiserror::Error;

/// Result type for EDCB protocol operations
pub type EdcbResult<T> = std::result::Result<T, EdcbError>;

/// EDCB protocol errors
#[derive(Error, Debug)]
pub enum EdcbError {
    /// Network I/O failure
    #[error("EDCB connection error: {0}")]
    Io(#[from] std::io::Error),

    /// Connect or request deadline exceeded
    #[error("EDCB request timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Server answered with a non-success command result
    #[error("EDCB command failed with result code {0}")]
    Command(u32),

    /// Response payload did not decode as the expected structure
    #[error("EDCB response decode error: {0}")]
    Decode(String),
}
