//! Microsoft USB vendor and product ID constants.
//!
//! The Xbox One Controller model 1537 (first revision, micro-USB, no
//! Bluetooth) enumerates as `045e:02d1`. On USB it speaks the vendor
//! interrupt protocol rather than plain HID, which is why the rest of this
//! crate works on raw endpoints.
//!
//! Sources:
//! - usb.ids: `045e Microsoft Corp.`, `02d1 Xbox One Controller`
//! - Linux kernel `drivers/input/joystick/xpad.c` device table

/// Microsoft Corp. USB Vendor ID.
pub const VENDOR_ID: u16 = 0x045E;

/// Xbox One Controller, model 1537.
pub const PRODUCT_XBOX_ONE_1537: u16 = 0x02D1;

/// Returns `true` if the VID/PID pair identifies a supported controller.
pub fn is_xbox_one_controller(vid: u16, pid: u16) -> bool {
    vid == VENDOR_ID && matches!(pid, PRODUCT_XBOX_ONE_1537)
}

/// Returns the product name for a supported PID, or `None`.
pub fn product_name(pid: u16) -> Option<&'static str> {
    match pid {
        PRODUCT_XBOX_ONE_1537 => Some("Xbox One Controller (1537)"),
        _ => None,
    }
}
