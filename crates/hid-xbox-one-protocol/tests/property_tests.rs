//! Property tests for the Xbox One controller protocol.
//!
//! Verifies invariants across a wide range of inputs using `proptest`.

use hid_xbox_one_protocol as xbox;
use proptest::prelude::*;
use xbox::{AltSetting, DescriptorTree, EndpointDescriptor, EndpointPair, Interface};

/// Raw `(bEndpointAddress, bmAttributes)` pairs per alt-setting per interface.
type RawTree = Vec<Vec<Vec<(u8, u8)>>>;

fn build_tree(raw: &RawTree) -> DescriptorTree {
    raw.iter()
        .enumerate()
        .fold(DescriptorTree::new(), |tree, (i, alts)| {
            let number = i as u8;
            let interface = alts
                .iter()
                .enumerate()
                .fold(Interface::new(number), |iface, (s, eps)| {
                    let alt = eps.iter().fold(AltSetting::new(number, s as u8), |a, &(addr, attrs)| {
                        a.with_endpoint(EndpointDescriptor::from_raw(addr, attrs))
                    });
                    iface.with_alt_setting(alt)
                });
            tree.with_interface(interface)
        })
}

/// Nested-loop reference search over the raw bytes.
fn reference_resolve(raw: &RawTree) -> Option<EndpointPair> {
    for (i, alts) in raw.iter().enumerate() {
        for eps in alts {
            let mut ep_in = 0u8;
            let mut ep_out = 0u8;
            for &(addr, attrs) in eps {
                if attrs & 0x03 != 0x03 {
                    continue;
                }
                if addr & 0x80 != 0 {
                    if ep_in == 0 {
                        ep_in = addr;
                    }
                } else if ep_out == 0 {
                    ep_out = addr;
                }
            }
            if ep_in != 0 && ep_out != 0 {
                return Some(EndpointPair {
                    interface_number: i as u8,
                    ep_in,
                    ep_out,
                });
            }
        }
    }
    None
}

fn raw_tree() -> impl Strategy<Value = RawTree> {
    let endpoint = (
        prop_oneof![Just(0x00u8), Just(0x01), Just(0x02), Just(0x81), Just(0x82), any::<u8>()],
        0u8..4,
    );
    let alt = proptest::collection::vec(endpoint, 0..5);
    let interface = proptest::collection::vec(alt, 0..3);
    proptest::collection::vec(interface, 0..4)
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(500))]

    /// Decoding any byte sequence up to a full packet never panics.
    #[test]
    fn prop_decode_never_panics(
        data in proptest::collection::vec(any::<u8>(), 0..=xbox::MAX_REPORT_LEN),
    ) {
        let _state = xbox::decode(&data);
    }

    /// Every report shorter than 16 bytes decodes to nothing.
    #[test]
    fn prop_short_reports_decode_to_none(
        data in proptest::collection::vec(any::<u8>(), 0..xbox::MIN_REPORT_LEN),
    ) {
        prop_assert_eq!(xbox::decode(&data), None);
    }

    /// Reports of 16 bytes or more always decode, field by field.
    #[test]
    fn prop_long_reports_decode_fields(
        data in proptest::collection::vec(any::<u8>(), xbox::MIN_REPORT_LEN..=xbox::MAX_REPORT_LEN),
    ) {
        let state = xbox::decode(&data);
        prop_assert!(state.is_some());
        if let (Some(state), Some(b)) = (state, data.get(..16)) {
            prop_assert_eq!(state.buttons, u16::from_le_bytes([b[4], b[5]]));
            prop_assert_eq!(state.left_trigger, b[6]);
            prop_assert_eq!(state.right_trigger, b[7]);
            prop_assert_eq!(state.left_x, i16::from_le_bytes([b[8], b[9]]));
            prop_assert_eq!(state.left_y, i16::from_le_bytes([b[10], b[11]]));
            prop_assert_eq!(state.right_x, i16::from_le_bytes([b[12], b[13]]));
            prop_assert_eq!(state.right_y, i16::from_le_bytes([b[14], b[15]]));
        }
    }

    /// Bytes 0–3 and 16+ never change the decoded state.
    #[test]
    fn prop_uninterpreted_bytes_ignored(
        body in proptest::collection::vec(any::<u8>(), 12usize),
        header in proptest::collection::vec(any::<u8>(), 4usize),
        tail in proptest::collection::vec(any::<u8>(), 0..48usize),
    ) {
        let mut plain = vec![0u8; 4];
        plain.extend_from_slice(&body);
        let mut noisy = header;
        noisy.extend_from_slice(&body);
        noisy.extend_from_slice(&tail);
        prop_assert_eq!(xbox::decode(&plain), xbox::decode(&noisy));
    }

    /// Decoding is a pure function of its input.
    #[test]
    fn prop_decode_idempotent(
        data in proptest::collection::vec(any::<u8>(), 0..=xbox::MAX_REPORT_LEN),
    ) {
        prop_assert_eq!(xbox::decode(&data), xbox::decode(&data));
    }

    /// Names come out in ascending bit order, one per named set bit.
    #[test]
    fn prop_pressed_names_ordered(mask in any::<u16>()) {
        let buttons: Vec<xbox::Button> = xbox::pressed_buttons(mask).collect();
        let bits: Vec<u8> = buttons.iter().map(|b| b.bit()).collect();
        prop_assert!(bits.windows(2).all(|w| w[0] < w[1]));
        prop_assert_eq!(buttons.len() as u32, (mask & !(1 << 11)).count_ones());
        let names: Vec<&str> = buttons.iter().map(|b| b.name()).collect();
        prop_assert_eq!(xbox::pressed_names(mask), names);
    }

    /// The reserved bit never contributes a name.
    #[test]
    fn prop_reserved_bit_has_no_name(mask in any::<u16>()) {
        prop_assert_eq!(
            xbox::pressed_names(mask | (1 << 11)),
            xbox::pressed_names(mask & !(1 << 11))
        );
    }

    /// The resolver agrees with a plain nested-loop search.
    #[test]
    fn prop_resolve_matches_reference(raw in raw_tree()) {
        let tree = build_tree(&raw);
        prop_assert_eq!(xbox::resolve(&tree).ok(), reference_resolve(&raw));
    }

    /// Trees without interrupt endpoints never resolve.
    #[test]
    fn prop_no_interrupt_endpoints_not_found(raw in raw_tree()) {
        let stripped: RawTree = raw
            .iter()
            .map(|alts| {
                alts.iter()
                    .map(|eps| eps.iter().map(|&(addr, attrs)| (addr, attrs & 0x02)).collect())
                    .collect()
            })
            .collect();
        prop_assert_eq!(
            xbox::resolve(&build_tree(&stripped)),
            Err(xbox::ProtocolError::EndpointNotFound)
        );
    }

    /// A resolved pair never contains the control address.
    #[test]
    fn prop_resolved_addresses_non_zero(raw in raw_tree()) {
        if let Ok(pair) = xbox::resolve(&build_tree(&raw)) {
            prop_assert_ne!(pair.ep_in, 0);
            prop_assert_ne!(pair.ep_out, 0);
            prop_assert!(pair.ep_in & 0x80 != 0);
            prop_assert!(pair.ep_out & 0x80 == 0);
        }
    }
}
