//! Session configuration.
//!
//! Defaults follow the reference reader: 500 ms transfer timeouts, one
//! 64-byte packet per read and a 20 ms pause between handshake frames.

use crate::{CaptureError, CaptureResult};
use hid_xbox_one_protocol::{MAX_REPORT_LEN, MIN_REPORT_LEN};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(500);
pub const DEFAULT_HANDSHAKE_TIMEOUT: Duration = Duration::from_millis(500);
pub const DEFAULT_HANDSHAKE_DELAY: Duration = Duration::from_millis(20);

/// What to do when a handshake frame cannot be sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HandshakePolicy {
    /// Abort the session.
    #[default]
    Strict,
    /// Log and carry on with the next frame. Some firmware revisions NAK
    /// frames they do not need and still start streaming.
    Lenient,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub read_timeout: Duration,
    pub handshake_timeout: Duration,
    pub handshake_delay: Duration,
    pub buffer_capacity: usize,
    pub handshake_policy: HandshakePolicy,
    /// Stop after this many reports.
    pub max_reports: Option<u64>,
    /// Stop once this much time has passed since the read loop started.
    pub duration: Option<Duration>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            read_timeout: DEFAULT_READ_TIMEOUT,
            handshake_timeout: DEFAULT_HANDSHAKE_TIMEOUT,
            handshake_delay: DEFAULT_HANDSHAKE_DELAY,
            buffer_capacity: MAX_REPORT_LEN,
            handshake_policy: HandshakePolicy::Strict,
            max_reports: None,
            duration: None,
        }
    }
}

impl SessionConfig {
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn with_handshake_timeout(mut self, timeout: Duration) -> Self {
        self.handshake_timeout = timeout;
        self
    }

    pub fn with_handshake_delay(mut self, delay: Duration) -> Self {
        self.handshake_delay = delay;
        self
    }

    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    pub fn with_handshake_policy(mut self, policy: HandshakePolicy) -> Self {
        self.handshake_policy = policy;
        self
    }

    pub fn with_max_reports(mut self, max_reports: Option<u64>) -> Self {
        self.max_reports = max_reports;
        self
    }

    pub fn with_duration(mut self, duration: Option<Duration>) -> Self {
        self.duration = duration;
        self
    }

    /// Whether the read loop ends on its own.
    pub fn is_bounded(&self) -> bool {
        self.max_reports.is_some() || self.duration.is_some()
    }

    pub fn validate(&self) -> CaptureResult<()> {
        // libusb treats a zero timeout as "wait forever".
        if self.read_timeout.is_zero() {
            return Err(CaptureError::InvalidConfig(
                "read timeout must be greater than zero".to_string(),
            ));
        }
        if self.handshake_timeout.is_zero() {
            return Err(CaptureError::InvalidConfig(
                "handshake timeout must be greater than zero".to_string(),
            ));
        }
        if !(MIN_REPORT_LEN..=MAX_REPORT_LEN).contains(&self.buffer_capacity) {
            return Err(CaptureError::InvalidConfig(format!(
                "buffer capacity must be between {MIN_REPORT_LEN} and {MAX_REPORT_LEN} bytes, got {}",
                self.buffer_capacity
            )));
        }
        if self.max_reports == Some(0) {
            return Err(CaptureError::InvalidConfig(
                "max reports must be at least 1".to_string(),
            ));
        }
        if self.duration.is_some_and(|d| d.is_zero()) {
            return Err(CaptureError::InvalidConfig(
                "duration must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
