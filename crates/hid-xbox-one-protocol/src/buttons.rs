//! Button bit positions and names.

use serde::{Deserialize, Serialize};

/// A named button in the input report bitmask.
///
/// Bit 11 is reserved and has no variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Button {
    DpadUp,
    DpadDown,
    DpadLeft,
    DpadRight,
    Menu,
    View,
    /// Left stick click.
    Ls,
    /// Right stick click.
    Rs,
    Lb,
    Rb,
    /// Guide button.
    Xbox,
    A,
    B,
    X,
    Y,
}

impl Button {
    /// Every named button, in ascending bit order.
    pub const ALL: [Button; 15] = [
        Button::DpadUp,
        Button::DpadDown,
        Button::DpadLeft,
        Button::DpadRight,
        Button::Menu,
        Button::View,
        Button::Ls,
        Button::Rs,
        Button::Lb,
        Button::Rb,
        Button::Xbox,
        Button::A,
        Button::B,
        Button::X,
        Button::Y,
    ];

    /// The button at `bit`, or `None` for reserved and out-of-range bits.
    pub fn from_bit(bit: u8) -> Option<Self> {
        match bit {
            0 => Some(Button::DpadUp),
            1 => Some(Button::DpadDown),
            2 => Some(Button::DpadLeft),
            3 => Some(Button::DpadRight),
            4 => Some(Button::Menu),
            5 => Some(Button::View),
            6 => Some(Button::Ls),
            7 => Some(Button::Rs),
            8 => Some(Button::Lb),
            9 => Some(Button::Rb),
            10 => Some(Button::Xbox),
            12 => Some(Button::A),
            13 => Some(Button::B),
            14 => Some(Button::X),
            15 => Some(Button::Y),
            _ => None,
        }
    }

    pub fn bit(self) -> u8 {
        match self {
            Button::DpadUp => 0,
            Button::DpadDown => 1,
            Button::DpadLeft => 2,
            Button::DpadRight => 3,
            Button::Menu => 4,
            Button::View => 5,
            Button::Ls => 6,
            Button::Rs => 7,
            Button::Lb => 8,
            Button::Rb => 9,
            Button::Xbox => 10,
            Button::A => 12,
            Button::B => 13,
            Button::X => 14,
            Button::Y => 15,
        }
    }

    pub fn mask(self) -> u16 {
        1u16 << self.bit()
    }

    /// Canonical upper-case name, e.g. `"DPAD_UP"`.
    pub fn name(self) -> &'static str {
        match self {
            Button::DpadUp => "DPAD_UP",
            Button::DpadDown => "DPAD_DOWN",
            Button::DpadLeft => "DPAD_LEFT",
            Button::DpadRight => "DPAD_RIGHT",
            Button::Menu => "MENU",
            Button::View => "VIEW",
            Button::Ls => "LS",
            Button::Rs => "RS",
            Button::Lb => "LB",
            Button::Rb => "RB",
            Button::Xbox => "XBOX",
            Button::A => "A",
            Button::B => "B",
            Button::X => "X",
            Button::Y => "Y",
        }
    }
}

impl core::fmt::Display for Button {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Pressed buttons in ascending bit order. Set bits without a name are skipped.
pub fn pressed_buttons(mask: u16) -> impl Iterator<Item = Button> {
    (0u8..16)
        .filter(move |&bit| mask & (1u16 << bit) != 0)
        .filter_map(Button::from_bit)
}

/// Names of the pressed buttons in ascending bit order.
pub fn pressed_names(mask: u16) -> Vec<&'static str> {
    pressed_buttons(mask).map(Button::name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dpad_up_and_down() {
        assert_eq!(pressed_names(0x0003), vec!["DPAD_UP", "DPAD_DOWN"]);
    }

    #[test]
    fn reserved_bit_is_skipped() {
        assert!(pressed_names(1 << 11).is_empty());
        assert_eq!(pressed_names((1 << 11) | (1 << 12)), vec!["A"]);
    }

    #[test]
    fn all_bits_set() {
        let names = pressed_names(0xFFFF);
        assert_eq!(names.len(), 15);
        assert_eq!(names.first(), Some(&"DPAD_UP"));
        assert_eq!(names.last(), Some(&"Y"));
    }

    #[test]
    fn no_bits_set() {
        assert!(pressed_names(0).is_empty());
    }

    #[test]
    fn bit_and_from_bit_agree() {
        for button in Button::ALL {
            assert_eq!(Button::from_bit(button.bit()), Some(button));
        }
        assert_eq!(Button::from_bit(11), None);
        assert_eq!(Button::from_bit(16), None);
    }

    #[test]
    fn all_is_in_ascending_bit_order() {
        let bits: Vec<u8> = Button::ALL.iter().map(|b| b.bit()).collect();
        let mut sorted = bits.clone();
        sorted.sort_unstable();
        assert_eq!(bits, sorted);
    }

    #[test]
    fn display_uses_canonical_name() {
        assert_eq!(Button::DpadRight.to_string(), "DPAD_RIGHT");
        assert_eq!(Button::Xbox.to_string(), "XBOX");
    }
}
