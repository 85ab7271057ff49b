//! `rusb` (libusb) implementation of [`UsbChannel`].
//!
//! Kernel driver handling is best effort: some platforms cannot report or
//! detach the bound driver, and claiming may still work there. Only a failed
//! claim is fatal.

use crate::{CaptureError, CaptureResult};
use hid_xbox_one_protocol::{
    is_xbox_one_controller, product_name, AltSetting, DescriptorTree, Direction,
    EndpointDescriptor, Interface, TransferError, TransferType, UsbChannel,
};
use rusb::{Context, DeviceHandle, UsbContext};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

pub struct RusbChannel {
    handle: DeviceHandle<Context>,
    claimed: Option<u8>,
    reattach_kernel_driver: bool,
}

impl RusbChannel {
    /// Open the first device matching `vid`/`pid`.
    pub fn open(vid: u16, pid: u16) -> CaptureResult<Self> {
        let context = Context::new()?;
        let handle = context
            .open_device_with_vid_pid(vid, pid)
            .ok_or(CaptureError::DeviceNotFound { vid, pid })?;
        info!(
            vid = %format!("0x{vid:04X}"),
            pid = %format!("0x{pid:04X}"),
            "Opened USB device"
        );
        Ok(Self {
            handle,
            claimed: None,
            reattach_kernel_driver: false,
        })
    }

    fn detach_kernel_driver(&mut self, interface_number: u8) {
        match self.handle.kernel_driver_active(interface_number) {
            Ok(true) => match self.handle.detach_kernel_driver(interface_number) {
                Ok(()) => {
                    info!(interface = interface_number, "Detached kernel driver");
                    self.reattach_kernel_driver = true;
                }
                Err(e) => {
                    warn!(
                        interface = interface_number,
                        error = %e,
                        "Could not detach kernel driver, continuing"
                    );
                }
            },
            Ok(false) => {}
            Err(rusb::Error::NotSupported) => {
                debug!("Kernel driver query not supported on this platform");
            }
            Err(e) => {
                warn!(
                    interface = interface_number,
                    error = %e,
                    "Kernel driver query failed, continuing"
                );
            }
        }
    }
}

impl UsbChannel for RusbChannel {
    fn descriptor_tree(&self) -> Result<DescriptorTree, TransferError> {
        let config = self
            .handle
            .device()
            .active_config_descriptor()
            .map_err(transfer_error)?;

        Ok(config
            .interfaces()
            .fold(DescriptorTree::new(), |tree, interface| {
                let converted = interface.descriptors().fold(
                    Interface::new(interface.number()),
                    |iface, desc| {
                        let alt = desc.endpoint_descriptors().fold(
                            AltSetting::new(desc.interface_number(), desc.setting_number()),
                            |alt, ep| alt.with_endpoint(convert_endpoint(&ep)),
                        );
                        iface.with_alt_setting(alt)
                    },
                );
                tree.with_interface(converted)
            }))
    }

    fn claim(&mut self, interface_number: u8) -> Result<(), TransferError> {
        self.detach_kernel_driver(interface_number);
        self.handle
            .claim_interface(interface_number)
            .map_err(transfer_error)?;
        self.claimed = Some(interface_number);
        info!(interface = interface_number, "Claimed interface");
        Ok(())
    }

    fn send(
        &mut self,
        endpoint: u8,
        data: &[u8],
        timeout: Duration,
    ) -> Result<usize, TransferError> {
        self.handle
            .write_interrupt(endpoint, data, timeout)
            .map_err(transfer_error)
    }

    fn receive(
        &mut self,
        endpoint: u8,
        capacity: usize,
        timeout: Duration,
    ) -> Result<Vec<u8>, TransferError> {
        let mut buf = vec![0u8; capacity];
        let len = self
            .handle
            .read_interrupt(endpoint, &mut buf, timeout)
            .map_err(transfer_error)?;
        buf.truncate(len);
        Ok(buf)
    }
}

impl Drop for RusbChannel {
    fn drop(&mut self) {
        let Some(interface_number) = self.claimed.take() else {
            return;
        };
        if let Err(e) = self.handle.release_interface(interface_number) {
            warn!(interface = interface_number, error = %e, "Failed to release interface");
        }
        if self.reattach_kernel_driver {
            if let Err(e) = self.handle.attach_kernel_driver(interface_number) {
                warn!(interface = interface_number, error = %e, "Failed to reattach kernel driver");
            }
        }
    }
}

/// Map a libusb error onto the transport error the protocol understands.
pub fn transfer_error(error: rusb::Error) -> TransferError {
    match error {
        rusb::Error::Timeout => TransferError::Timeout,
        rusb::Error::NoDevice => TransferError::Disconnected,
        other => TransferError::Failure(other.to_string()),
    }
}

fn convert_endpoint(ep: &rusb::EndpointDescriptor<'_>) -> EndpointDescriptor {
    let direction = match ep.direction() {
        rusb::Direction::In => Direction::In,
        rusb::Direction::Out => Direction::Out,
    };
    let transfer_type = match ep.transfer_type() {
        rusb::TransferType::Control => TransferType::Control,
        rusb::TransferType::Isochronous => TransferType::Isochronous,
        rusb::TransferType::Bulk => TransferType::Bulk,
        rusb::TransferType::Interrupt => TransferType::Interrupt,
    };
    EndpointDescriptor::new(ep.address(), direction, transfer_type)
}

/// A USB device seen during enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsbDeviceInfo {
    pub bus_number: u8,
    pub address: u8,
    pub vendor_id: u16,
    pub product_id: u16,
}

impl UsbDeviceInfo {
    pub fn is_supported(&self) -> bool {
        is_xbox_one_controller(self.vendor_id, self.product_id)
    }

    pub fn display_name(&self) -> String {
        if self.is_supported() {
            if let Some(name) = product_name(self.product_id) {
                return name.to_string();
            }
        }
        format!("{:04x}:{:04x}", self.vendor_id, self.product_id)
    }
}

/// Enumerate every USB device libusb can see.
pub fn list_devices() -> CaptureResult<Vec<UsbDeviceInfo>> {
    let context = Context::new()?;
    let devices = context.devices()?;
    Ok(devices
        .iter()
        .filter_map(|device| {
            let desc = device.device_descriptor().ok()?;
            Some(UsbDeviceInfo {
                bus_number: device.bus_number(),
                address: device.address(),
                vendor_id: desc.vendor_id(),
                product_id: desc.product_id(),
            })
        })
        .collect())
}
