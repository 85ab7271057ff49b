//! Error types for the capture tool

use hid_xbox_one_protocol::{ProtocolError, TransferError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Device not found: VID=0x{vid:04X} PID=0x{pid:04X}")]
    DeviceNotFound { vid: u16, pid: u16 },

    #[error("Protocol error")]
    Protocol(#[from] ProtocolError),

    #[error("Transport error")]
    Transport(#[from] TransferError),

    #[error("Handshake frame {frame} failed")]
    Handshake {
        frame: usize,
        source: TransferError,
    },

    #[error("Failed to claim interface {interface}")]
    Claim {
        interface: u8,
        source: TransferError,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid capture file: {0}")]
    InvalidCapture(String),

    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("JSON error")]
    Json(#[from] serde_json::Error),

    #[error("USB error")]
    Usb(#[from] rusb::Error),
}

pub type CaptureResult<T> = Result<T, CaptureError>;

impl CaptureError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            CaptureError::DeviceNotFound { .. } => 2,
            CaptureError::Protocol(ProtocolError::EndpointNotFound) => 3,
            CaptureError::InvalidConfig(_)
            | CaptureError::InvalidCapture(_)
            | CaptureError::Json(_) => 4,
            _ => 1,
        }
    }
}
