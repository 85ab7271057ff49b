//! Xbox One Controller (model 1537) USB protocol.
//!
//! The controller enumerates as `045e:02d1` and talks over a pair of
//! interrupt endpoints rather than standard HID reports. Before it starts
//! streaming input it expects three vendor frames on the OUT endpoint.
//!
//! This crate is I/O-free: it finds the endpoint pair in a descriptor tree,
//! provides the handshake bytes, and decodes input reports. Moving bytes is
//! left to an implementation of [`UsbChannel`].
//!
//! # Input report layout
//! | Offset | Size | Field         | Encoding        |
//! |--------|------|---------------|-----------------|
//! | 0–3    | 4    | header        | not interpreted |
//! | 4–5    | u16  | buttons       | LE bitmask      |
//! | 6      | u8   | left trigger  | 0–255           |
//! | 7      | u8   | right trigger | 0–255           |
//! | 8–9    | i16  | left stick X  | LE, signed      |
//! | 10–11  | i16  | left stick Y  | LE, signed      |
//! | 12–13  | i16  | right stick X | LE, signed      |
//! | 14–15  | i16  | right stick Y | LE, signed      |

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(static_mut_refs)]
#![deny(clippy::unwrap_used)]

pub mod buttons;
pub mod descriptor;
pub mod endpoints;
pub mod handshake;
pub mod ids;
pub mod input;
pub mod transport;

pub use buttons::{pressed_buttons, pressed_names, Button};
pub use descriptor::{AltSetting, DescriptorTree, Direction, EndpointDescriptor, Interface, TransferType};
pub use endpoints::{resolve, EndpointPair};
pub use handshake::{handshake_frames, HANDSHAKE_1, HANDSHAKE_2, HANDSHAKE_3};
pub use ids::{is_xbox_one_controller, product_name, PRODUCT_XBOX_ONE_1537, VENDOR_ID};
pub use input::{decode, DecodedState, MAX_REPORT_LEN, MIN_REPORT_LEN};
pub use transport::{TransferError, UsbChannel};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("no alt-setting exposes both an interrupt IN and an interrupt OUT endpoint")]
    EndpointNotFound,

    #[error("transport error")]
    Transport(#[from] TransferError),
}

pub type ProtocolResult<T> = Result<T, ProtocolError>;
