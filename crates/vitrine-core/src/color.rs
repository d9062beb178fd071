//! Hex color strings as edited by the user.

use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A color kept in the `#rrggbb` form the editor produces.
///
/// The original string is preserved verbatim; [`HexColor::to_color`] resolves
/// it for rendering, falling back to black when it cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HexColor(String);

impl HexColor {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn black() -> Self {
        Self::new("#000000")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` into RGBA8 components.
    pub fn rgba8(&self) -> Option<[u8; 4]> {
        let hex = self.0.trim().strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
        match hex.len() {
            3 => {
                let r = channel(0..1)? * 17;
                let g = channel(1..2)? * 17;
                let b = channel(2..3)? * 17;
                Some([r, g, b, 255])
            }
            6 => Some([channel(0..2)?, channel(2..4)?, channel(4..6)?, 255]),
            8 => Some([channel(0..2)?, channel(2..4)?, channel(4..6)?, channel(6..8)?]),
            _ => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.rgba8().is_some()
    }

    /// Resolve to a peniko color. Unparseable strings render black.
    pub fn to_color(&self) -> Color {
        let [r, g, b, a] = self.rgba8().unwrap_or_else(|| {
            log::warn!("Unparseable color {:?}, using black", self.0);
            [0, 0, 0, 255]
        });
        Color::from_rgba8(r, g, b, a)
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HexColor {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_forms() {
        assert_eq!(HexColor::from("#f0fff4").rgba8(), Some([0xf0, 0xff, 0xf4, 255]));
        assert_eq!(HexColor::from("#fff").rgba8(), Some([255, 255, 255, 255]));
        assert_eq!(HexColor::from("#00000080").rgba8(), Some([0, 0, 0, 0x80]));
    }

    #[test]
    fn test_invalid() {
        assert!(!HexColor::from("red").is_valid());
        assert!(!HexColor::from("#12345").is_valid());
        assert!(!HexColor::from("#gg0000").is_valid());
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let json = serde_json::to_string(&HexColor::from("#2d3748")).unwrap();
        assert_eq!(json, "\"#2d3748\"");
    }
}
