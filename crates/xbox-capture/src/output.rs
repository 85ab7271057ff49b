//! Terminal output for raw and decoded reports.

use crate::ReportEvent;
use hid_xbox_one_protocol::{DecodedState, DescriptorTree, Direction, EndpointPair};
use serde::{Deserialize, Serialize};

/// Space-separated lowercase hex, e.g. `05 20 00`.
pub fn hex_string(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse the output of [`hex_string`]. A single `0x` prefix on each byte is accepted.
pub fn parse_hex_bytes(s: &str) -> Result<Vec<u8>, String> {
    s.split_whitespace()
        .map(|token| {
            let digits = token
                .strip_prefix("0x")
                .or_else(|| token.strip_prefix("0X"))
                .unwrap_or(token);
            u8::from_str_radix(digits, 16).map_err(|e| format!("invalid hex byte '{token}': {e}"))
        })
        .collect()
}

/// `RAW[NN]: xx xx ...`
pub fn format_raw(raw: &[u8]) -> String {
    let bytes: String = raw.iter().map(|b| format!(" {b:02x}")).collect();
    format!("RAW[{:02}]:{bytes}", raw.len())
}

/// `DECODE: btn=0x00ff pressed=[...] LT=.. RT=.. LX=.. LY=.. RX=.. RY=..`
pub fn format_decoded(state: &DecodedState) -> String {
    format!(
        "DECODE: btn=0x{:04x} pressed=[{}] LT={} RT={} LX={} LY={} RX={} RY={}",
        state.buttons,
        state.pressed_names().join(", "),
        state.left_trigger,
        state.right_trigger,
        state.left_x,
        state.left_y,
        state.right_x,
        state.right_y,
    )
}

/// JSON-lines record for one report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRecord {
    pub elapsed_us: u64,
    pub len: usize,
    pub raw: String,
    pub state: Option<DecodedState>,
}

impl From<&ReportEvent<'_>> for ReportRecord {
    fn from(event: &ReportEvent<'_>) -> Self {
        Self {
            elapsed_us: u64::try_from(event.elapsed.as_micros()).unwrap_or(u64::MAX),
            len: event.raw.len(),
            raw: hex_string(event.raw),
            state: event.state,
        }
    }
}

/// Human-readable lines for a report: the raw dump, then the decode if any.
pub fn format_event(event: &ReportEvent<'_>) -> Vec<String> {
    let mut lines = vec![format_raw(event.raw)];
    if let Some(state) = &event.state {
        lines.push(format_decoded(state));
    }
    lines
}

/// Indented dump of a descriptor tree, marking the resolved endpoints.
pub fn format_tree(tree: &DescriptorTree, pair: Option<&EndpointPair>) -> String {
    let mut out = String::new();
    for interface in &tree.interfaces {
        out.push_str(&format!("Interface {}\n", interface.number));
        for alt in &interface.alt_settings {
            out.push_str(&format!("  Alt setting {}\n", alt.setting_number));
            for ep in &alt.endpoints {
                let direction = match ep.direction {
                    Direction::In => "IN ",
                    Direction::Out => "OUT",
                };
                let selected = pair.is_some_and(|p| {
                    p.interface_number == alt.interface_number
                        && (p.ep_in == ep.address || p.ep_out == ep.address)
                });
                out.push_str(&format!(
                    "    EP 0x{:02x} {direction} {:?}{}\n",
                    ep.address,
                    ep.transfer_type,
                    if selected { " *" } else { "" }
                ));
            }
        }
    }
    match pair {
        Some(p) => out.push_str(&format!(
            "Interface={} EP_IN=0x{:02x} EP_OUT=0x{:02x}",
            p.interface_number, p.ep_in, p.ep_out
        )),
        None => out.push_str("No interrupt IN/OUT endpoint pair found"),
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use hid_xbox_one_protocol::decode;
    use std::time::Duration;

    const SAMPLE: [u8; 16] = [
        0x00, 0x00, 0x00, 0x00, 0xFF, 0x00, 0x10, 0x20, 0x01, 0x00, 0xFE, 0xFF, 0x00, 0x01, 0xFF,
        0x7F,
    ];

    #[test]
    fn raw_line_format() {
        assert_eq!(format_raw(&[0x20, 0x00, 0x0a]), "RAW[03]: 20 00 0a");
        assert_eq!(format_raw(&[]), "RAW[00]:");
    }

    #[test]
    fn decoded_line_format() -> Result<(), String> {
        let state = decode(&SAMPLE).ok_or("sample must decode")?;
        assert_eq!(
            format_decoded(&state),
            "DECODE: btn=0x00ff pressed=[DPAD_UP, DPAD_DOWN, DPAD_LEFT, DPAD_RIGHT, MENU, VIEW, LS, RS] \
             LT=16 RT=32 LX=1 LY=-2 RX=256 RY=32767"
        );
        Ok(())
    }

    #[test]
    fn hex_round_trip() -> Result<(), String> {
        assert_eq!(hex_string(&SAMPLE[..4]), "00 00 00 00");
        assert_eq!(parse_hex_bytes("05 20 0x01 0X00")?, vec![0x05, 0x20, 0x01, 0x00]);
        assert_eq!(parse_hex_bytes("")?, Vec::<u8>::new());
        Ok(())
    }

    #[test]
    fn invalid_hex_rejected() {
        assert!(parse_hex_bytes("zz").is_err());
        assert!(parse_hex_bytes("100").is_err());
        assert!(parse_hex_bytes("0x0x05").is_err());
        assert!(parse_hex_bytes("0X0x05").is_err());
    }

    #[test]
    fn short_event_prints_raw_only() {
        let event = ReportEvent {
            elapsed: Duration::from_millis(3),
            raw: &[0x03, 0x20],
            state: None,
        };
        assert_eq!(format_event(&event), vec!["RAW[02]: 03 20".to_string()]);
        let record = ReportRecord::from(&event);
        assert_eq!(record.elapsed_us, 3000);
        assert_eq!(record.len, 2);
        assert_eq!(record.state, None);
    }
}
