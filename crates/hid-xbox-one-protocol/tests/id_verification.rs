//! Cross-checks the USB identifiers against the published values.

use hid_xbox_one_protocol as xbox;

#[test]
fn vendor_id_is_microsoft() {
    assert_eq!(xbox::VENDOR_ID, 0x045E);
}

#[test]
fn product_id_is_model_1537() {
    assert_eq!(xbox::PRODUCT_XBOX_ONE_1537, 0x02D1);
}

#[test]
fn recognised_only_with_both_ids() {
    assert!(xbox::is_xbox_one_controller(0x045E, 0x02D1));
    assert!(!xbox::is_xbox_one_controller(0x045E, 0x028E));
    assert!(!xbox::is_xbox_one_controller(0x046D, 0x02D1));
}

#[test]
fn product_name_for_known_pid() {
    assert_eq!(
        xbox::product_name(0x02D1),
        Some("Xbox One Controller (1537)")
    );
    assert_eq!(xbox::product_name(0x028E), None);
}
