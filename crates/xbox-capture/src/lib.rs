//! Raw-USB reader for the Xbox One Controller (1537).
//!
//! Glues the I/O-free [`hid_xbox_one_protocol`] core to a real transport:
//! a [`Session`] resolves the interrupt endpoints, claims the interface,
//! sends the handshake and then streams decoded reports to a sink. The
//! `xbox-capture` binary wires this to `rusb` and the terminal.

#![deny(static_mut_refs)]
#![deny(clippy::unwrap_used)]

pub mod capture_file;
pub mod config;
pub mod error;
pub mod output;
pub mod session;
pub mod usb;

pub use capture_file::{CaptureFile, CaptureReport};
pub use config::{HandshakePolicy, SessionConfig};
pub use error::{CaptureError, CaptureResult};
pub use session::{FrameOutcome, ReportEvent, Session, SessionStats};
pub use usb::{RusbChannel, UsbDeviceInfo};
