//! Input report decoding.
//!
//! Reports shorter than [`MIN_REPORT_LEN`] are keepalive or status traffic
//! and decode to `None`. Only bytes 4–15 are interpreted; the header bytes
//! and anything past byte 15 are left alone.

use crate::buttons::{pressed_buttons, pressed_names, Button};
use serde::{Deserialize, Serialize};

/// Shortest report that carries controller state.
pub const MIN_REPORT_LEN: usize = 16;

/// Largest report the IN endpoint delivers (one full-speed packet).
pub const MAX_REPORT_LEN: usize = 64;

const BUTTONS: usize = 4;
const LEFT_TRIGGER: usize = 6;
const RIGHT_TRIGGER: usize = 7;
const LEFT_X: usize = 8;
const LEFT_Y: usize = 10;
const RIGHT_X: usize = 12;
const RIGHT_Y: usize = 14;

/// Controller state carried by one input report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DecodedState {
    /// Button bitmask, see [`Button`] for bit positions.
    pub buttons: u16,
    pub left_trigger: u8,
    pub right_trigger: u8,
    pub left_x: i16,
    pub left_y: i16,
    pub right_x: i16,
    pub right_y: i16,
}

impl DecodedState {
    pub fn is_pressed(&self, button: Button) -> bool {
        self.buttons & button.mask() != 0
    }

    pub fn pressed(&self) -> impl Iterator<Item = Button> {
        pressed_buttons(self.buttons)
    }

    pub fn pressed_names(&self) -> Vec<&'static str> {
        pressed_names(self.buttons)
    }
}

/// Decode a raw input report.
///
/// Returns `None` when the report is shorter than [`MIN_REPORT_LEN`] bytes.
pub fn decode(raw: &[u8]) -> Option<DecodedState> {
    let payload: &[u8; MIN_REPORT_LEN] = raw.get(..MIN_REPORT_LEN)?.try_into().ok()?;

    let u16_at = |offset: usize| -> Option<u16> {
        let bytes = payload.get(offset..offset + 2)?;
        Some(u16::from_le_bytes(bytes.try_into().ok()?))
    };
    let i16_at = |offset: usize| -> Option<i16> {
        let bytes = payload.get(offset..offset + 2)?;
        Some(i16::from_le_bytes(bytes.try_into().ok()?))
    };

    Some(DecodedState {
        buttons: u16_at(BUTTONS)?,
        left_trigger: *payload.get(LEFT_TRIGGER)?,
        right_trigger: *payload.get(RIGHT_TRIGGER)?,
        left_x: i16_at(LEFT_X)?,
        left_y: i16_at(LEFT_Y)?,
        right_x: i16_at(RIGHT_X)?,
        right_y: i16_at(RIGHT_Y)?,
    })
}
