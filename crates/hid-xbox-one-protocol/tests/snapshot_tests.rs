//! Snapshot tests for the Xbox One controller protocol.
//!
//! These lock in the wire format to catch accidental protocol regressions.

use hid_xbox_one_protocol as xbox;
use insta::{assert_debug_snapshot, assert_snapshot, assert_yaml_snapshot};

const SAMPLE: [u8; 16] = [
    0x00, 0x00, 0x00, 0x00, 0xFF, 0x00, 0x10, 0x20, 0x01, 0x00, 0xFE, 0xFF, 0x00, 0x01, 0xFF, 0x7F,
];

#[test]
fn test_snapshot_handshake_frames() {
    assert_snapshot!(
        format!("{:02x?}", xbox::handshake_frames()),
        @"[[05, 20, 00, 01, 00], [01, 20], [05, 20, 01, 00, 00]]"
    );
}

#[test]
fn test_snapshot_decode_sample() {
    assert_debug_snapshot!(xbox::decode(&SAMPLE), @r"
    Some(
        DecodedState {
            buttons: 255,
            left_trigger: 16,
            right_trigger: 32,
            left_x: 1,
            left_y: -2,
            right_x: 256,
            right_y: 32767,
        },
    )
    ");
}

#[test]
fn test_snapshot_decode_sample_yaml() -> Result<(), String> {
    let state = xbox::decode(&SAMPLE).ok_or("sample must decode")?;
    assert_yaml_snapshot!(state, @r"
    buttons: 255
    left_trigger: 16
    right_trigger: 32
    left_x: 1
    left_y: -2
    right_x: 256
    right_y: 32767
    ");
    Ok(())
}

#[test]
fn test_snapshot_neutral_report() {
    let mut report = [0u8; 18];
    report[0] = 0x20;
    assert_debug_snapshot!(xbox::decode(&report), @r"
    Some(
        DecodedState {
            buttons: 0,
            left_trigger: 0,
            right_trigger: 0,
            left_x: 0,
            left_y: 0,
            right_x: 0,
            right_y: 0,
        },
    )
    ");
}

#[test]
fn test_snapshot_all_button_names() {
    assert_snapshot!(
        xbox::pressed_names(0xFFFF).join(","),
        @"DPAD_UP,DPAD_DOWN,DPAD_LEFT,DPAD_RIGHT,MENU,VIEW,LS,RS,LB,RB,XBOX,A,B,X,Y"
    );
}

#[test]
fn test_snapshot_face_buttons_yaml() {
    assert_yaml_snapshot!(xbox::pressed_names(0xF000), @r"
    - A
    - B
    - X
    - Y
    ");
}

#[test]
fn test_snapshot_resolved_pair() -> Result<(), xbox::ProtocolError> {
    let tree = xbox::DescriptorTree::new().with_interface(
        xbox::Interface::new(0).with_alt_setting(
            xbox::AltSetting::new(0, 0)
                .with_endpoint(xbox::EndpointDescriptor::from_raw(0x02, 0x03))
                .with_endpoint(xbox::EndpointDescriptor::from_raw(0x82, 0x03)),
        ),
    );
    assert_debug_snapshot!(xbox::resolve(&tree)?, @r"
    EndpointPair {
        interface_number: 0,
        ep_in: 130,
        ep_out: 2,
    }
    ");
    Ok(())
}
