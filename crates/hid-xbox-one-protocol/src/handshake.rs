//! Vendor handshake frames.
//!
//! The controller stays silent until these three frames have been written to
//! its interrupt OUT endpoint, in this order, once per session.

/// First frame: `05 20 00 01 00`.
pub const HANDSHAKE_1: &[u8] = &[0x05, 0x20, 0x00, 0x01, 0x00];

/// Second frame: `01 20`.
pub const HANDSHAKE_2: &[u8] = &[0x01, 0x20];

/// Third frame: `05 20 01 00 00`.
pub const HANDSHAKE_3: &[u8] = &[0x05, 0x20, 0x01, 0x00, 0x00];

/// Number of frames in the handshake sequence.
pub const HANDSHAKE_FRAME_COUNT: usize = 3;

/// The handshake frames in transmission order.
pub fn handshake_frames() -> [&'static [u8]; HANDSHAKE_FRAME_COUNT] {
    [HANDSHAKE_1, HANDSHAKE_2, HANDSHAKE_3]
}
