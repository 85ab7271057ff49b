//! Interrupt endpoint pair discovery.

use crate::descriptor::{AltSetting, DescriptorTree, Direction};
use crate::{ProtocolError, ProtocolResult};
use serde::{Deserialize, Serialize};

/// The interface and interrupt endpoints a session talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EndpointPair {
    pub interface_number: u8,
    pub ep_in: u8,
    pub ep_out: u8,
}

/// Find the first alt-setting exposing both an interrupt IN and an interrupt
/// OUT endpoint.
///
/// Interfaces and alt-settings are visited in descriptor order and the
/// search stops at the first match. Within an alt-setting the first endpoint
/// of each direction wins. Address `0` belongs to the control pipe and is
/// never reported.
pub fn resolve(tree: &DescriptorTree) -> ProtocolResult<EndpointPair> {
    tree.alt_settings()
        .find_map(interrupt_pair)
        .ok_or(ProtocolError::EndpointNotFound)
}

fn interrupt_pair(alt: &AltSetting) -> Option<EndpointPair> {
    let first = |direction: Direction| {
        alt.endpoints
            .iter()
            .filter(|ep| ep.is_interrupt() && ep.direction == direction && ep.address != 0)
            .map(|ep| ep.address)
            .next()
    };

    Some(EndpointPair {
        interface_number: alt.interface_number,
        ep_in: first(Direction::In)?,
        ep_out: first(Direction::Out)?,
    })
}
