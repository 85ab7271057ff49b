//! Read-only model of a USB configuration's interface/endpoint tree.
//!
//! Transports build a [`DescriptorTree`] from whatever their USB stack hands
//! out; the resolver only ever reads it.

use serde::{Deserialize, Serialize};

/// Bit 7 of `bEndpointAddress`: set for device-to-host endpoints.
pub const ENDPOINT_DIR_MASK: u8 = 0x80;

/// Low two bits of `bmAttributes`: the transfer type.
pub const TRANSFER_TYPE_MASK: u8 = 0x03;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Device to host.
    In,
    /// Host to device.
    Out,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransferType {
    Control,
    Isochronous,
    Bulk,
    Interrupt,
}

impl TransferType {
    /// Decode the transfer type from an endpoint's `bmAttributes`.
    pub fn from_attributes(attributes: u8) -> Self {
        match attributes & TRANSFER_TYPE_MASK {
            0 => TransferType::Control,
            1 => TransferType::Isochronous,
            2 => TransferType::Bulk,
            _ => TransferType::Interrupt,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointDescriptor {
    pub address: u8,
    pub direction: Direction,
    pub transfer_type: TransferType,
}

impl EndpointDescriptor {
    pub fn new(address: u8, direction: Direction, transfer_type: TransferType) -> Self {
        Self {
            address,
            direction,
            transfer_type,
        }
    }

    /// Build a descriptor from raw `bEndpointAddress` and `bmAttributes`.
    pub fn from_raw(address: u8, attributes: u8) -> Self {
        let direction = if address & ENDPOINT_DIR_MASK != 0 {
            Direction::In
        } else {
            Direction::Out
        };
        Self::new(address, direction, TransferType::from_attributes(attributes))
    }

    pub fn is_interrupt(&self) -> bool {
        self.transfer_type == TransferType::Interrupt
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AltSetting {
    pub interface_number: u8,
    pub setting_number: u8,
    pub endpoints: Vec<EndpointDescriptor>,
}

impl AltSetting {
    pub fn new(interface_number: u8, setting_number: u8) -> Self {
        Self {
            interface_number,
            setting_number,
            endpoints: Vec::new(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: EndpointDescriptor) -> Self {
        self.endpoints.push(endpoint);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Interface {
    pub number: u8,
    pub alt_settings: Vec<AltSetting>,
}

impl Interface {
    pub fn new(number: u8) -> Self {
        Self {
            number,
            alt_settings: Vec::new(),
        }
    }

    pub fn with_alt_setting(mut self, alt_setting: AltSetting) -> Self {
        self.alt_settings.push(alt_setting);
        self
    }
}

/// Snapshot of the active configuration's interfaces, in descriptor order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DescriptorTree {
    pub interfaces: Vec<Interface>,
}

impl DescriptorTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_interface(mut self, interface: Interface) -> Self {
        self.interfaces.push(interface);
        self
    }

    /// All alt-settings in traversal order.
    pub fn alt_settings(&self) -> impl Iterator<Item = &AltSetting> {
        self.interfaces.iter().flat_map(|i| i.alt_settings.iter())
    }

    pub fn endpoint_count(&self) -> usize {
        self.alt_settings().map(|a| a.endpoints.len()).sum()
    }
}
