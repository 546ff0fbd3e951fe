//! LED grid color types.
//!
//! The device exposes its LED grid as a JSON array of `[R, G, B]` integer
//! triples in device index order, and only supports full-state replace: the
//! entire array is resent on every write.
//!
//! The all-zero triple is the canonical "LED off" value on the device side.
//! Because a picker control showing true black reads as broken, the UI
//! displays "off" as a neutral gray sentinel instead; the two encodings are
//! translated at the device boundary in both directions.

use serde::{Deserialize, Serialize};

/// An RGB color triple, serialized on the wire as a 3-element array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedColor(pub u8, pub u8, pub u8);

impl LedColor {
    /// The canonical device-side "LED off" value.
    pub const OFF: LedColor = LedColor(0, 0, 0);

    /// The default display sentinel standing in for "off" in the UI.
    pub const OFF_SENTINEL: LedColor = LedColor(120, 120, 120);

    /// Red component.
    pub fn r(self) -> u8 {
        self.0
    }

    /// Green component.
    pub fn g(self) -> u8 {
        self.1
    }

    /// Blue component.
    pub fn b(self) -> u8 {
        self.2
    }

    /// Device → display translation: black becomes the given sentinel, any
    /// other triple passes through unchanged.
    pub fn to_display(self, sentinel: LedColor) -> LedColor {
        if self == Self::OFF { sentinel } else { self }
    }

    /// Display → device translation: the sentinel becomes black, any other
    /// triple passes through unchanged. Inverse of [`Self::to_display`].
    pub fn to_device(self, sentinel: LedColor) -> LedColor {
        if self == sentinel { Self::OFF } else { self }
    }

    /// Hex color code, e.g. `#0A141E`.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

impl std::fmt::Display for LedColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Full LED grid state: one color per addressable LED, index = device LED
/// index. Element order is significant end-to-end; reordering or dropping
/// elements corrupts device state.
pub type LedGridState = Vec<LedColor>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_format_is_rgb_array() {
        let color: LedColor = serde_json::from_str("[10, 20, 30]").unwrap();
        assert_eq!(color, LedColor(10, 20, 30));
        assert_eq!(serde_json::to_string(&color).unwrap(), "[10,20,30]");
    }

    #[test]
    fn grid_round_trips_in_order() {
        let grid: LedGridState = serde_json::from_str("[[0,0,0],[10,20,30]]").unwrap();
        assert_eq!(grid, vec![LedColor::OFF, LedColor(10, 20, 30)]);
        assert_eq!(serde_json::to_string(&grid).unwrap(), "[[0,0,0],[10,20,30]]");
    }

    #[test]
    fn off_displays_as_sentinel() {
        let sentinel = LedColor::OFF_SENTINEL;
        assert_eq!(LedColor::OFF.to_display(sentinel), sentinel);
        assert_eq!(LedColor(10, 20, 30).to_display(sentinel), LedColor(10, 20, 30));
    }

    #[test]
    fn sentinel_applies_as_off() {
        let sentinel = LedColor::OFF_SENTINEL;
        assert_eq!(sentinel.to_device(sentinel), LedColor::OFF);
        assert_eq!(LedColor(10, 20, 30).to_device(sentinel), LedColor(10, 20, 30));
    }

    #[test]
    fn translation_is_inverse_for_non_colliding_values() {
        let sentinel = LedColor(100, 100, 100);
        for color in [LedColor::OFF, LedColor(1, 2, 3), LedColor(255, 255, 255)] {
            assert_eq!(color.to_display(sentinel).to_device(sentinel), color);
        }
    }

    #[test]
    fn hex_rendering() {
        assert_eq!(LedColor(10, 20, 30).to_hex(), "#0A141E");
        assert_eq!(LedColor::OFF.to_hex(), "#000000");
        assert_eq!(LedColor(255, 255, 255).to_hex(), "#FFFFFF");
    }
}
