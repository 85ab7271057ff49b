//! JSON capture files.
//!
//! A capture records every report of a session together with the endpoint
//! pair it was read from, so it can be replayed through the decoder later.

use crate::output::{hex_string, parse_hex_bytes};
use crate::{CaptureError, CaptureResult, ReportEvent};
use hid_xbox_one_protocol::{decode, DecodedState, EndpointPair};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureReport {
    /// Microseconds since the read loop started.
    pub timestamp_us: u64,
    /// Space-separated hex bytes.
    pub data: String,
    pub state: Option<DecodedState>,
}

impl CaptureReport {
    pub fn from_event(event: &ReportEvent<'_>) -> Self {
        Self {
            timestamp_us: u64::try_from(event.elapsed.as_micros()).unwrap_or(u64::MAX),
            data: hex_string(event.raw),
            state: event.state,
        }
    }

    pub fn bytes(&self) -> CaptureResult<Vec<u8>> {
        parse_hex_bytes(&self.data).map_err(CaptureError::InvalidCapture)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureFile {
    pub vendor_id: String,
    pub product_id: String,
    pub endpoints: EndpointPair,
    pub captures: Vec<CaptureReport>,
}

impl CaptureFile {
    pub fn new(vid: u16, pid: u16, endpoints: EndpointPair) -> Self {
        Self {
            vendor_id: format!("0x{vid:04X}"),
            product_id: format!("0x{pid:04X}"),
            endpoints,
            captures: Vec::new(),
        }
    }

    pub fn push(&mut self, event: &ReportEvent<'_>) {
        self.captures.push(CaptureReport::from_event(event));
    }

    pub fn save(&self, path: &Path) -> CaptureResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn load(path: &Path) -> CaptureResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Decode every stored report again from its raw bytes.
    pub fn replay(&self) -> CaptureResult<Vec<Option<DecodedState>>> {
        self.captures
            .iter()
            .map(|report| Ok(decode(&report.bytes()?)))
            .collect()
    }

    /// Indices of reports whose stored state disagrees with a fresh decode.
    pub fn mismatches(&self) -> CaptureResult<Vec<usize>> {
        Ok(self
            .replay()?
            .into_iter()
            .zip(&self.captures)
            .enumerate()
            .filter(|(_, (fresh, report))| *fresh != report.state)
            .map(|(index, _)| index)
            .collect())
    }
}
