//! Colour helpers for the `color` control kind. Colour pickers report
//! `#rrggbb` strings; drawing code wants channel values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("colour `{0}` must start with `#`")]
    MissingHash(String),
    #[error("colour `{0}` must have 3 or 6 hex digits")]
    BadLength(String),
    #[error("colour `{0}` contains a non-hex digit")]
    BadDigit(String),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        hex_to_rgb(s)
    }
}

/// Parses `#rrggbb` or the `#rgb` shorthand. Case insensitive.
pub fn hex_to_rgb(hex: &str) -> Result<Rgb, ColorParseError> {
    let digits = hex
        .trim()
        .strip_prefix('#')
        .ok_or_else(|| ColorParseError::MissingHash(hex.to_string()))?;

    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ColorParseError::BadDigit(hex.to_string()));
    }

    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_string(),
        _ => return Err(ColorParseError::BadLength(hex.to_string())),
    };

    let channel = |i: usize| {
        u8::from_str_radix(&expanded[i..i + 2], 16)
            .map_err(|_| ColorParseError::BadDigit(hex.to_string()))
    };

    Ok(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
}

pub fn is_hex_color(s: &str) -> bool {
    hex_to_rgb(s).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_to_rgb() {
        assert_eq!(hex_to_rgb("#ff8000"), Ok(Rgb::new(255, 128, 0)));
        assert_eq!(hex_to_rgb("#FF8000"), Ok(Rgb::new(255, 128, 0)));
        assert_eq!(hex_to_rgb("#f80"), Ok(Rgb::new(255, 136, 0)));
    }

    #[test]
    fn test_hex_to_rgb_errors() {
        assert!(matches!(
            hex_to_rgb("ff8000"),
            Err(ColorParseError::MissingHash(_))
        ));
        assert!(matches!(
            hex_to_rgb("#ff80"),
            Err(ColorParseError::BadLength(_))
        ));
        assert!(matches!(
            hex_to_rgb("#gg0000"),
            Err(ColorParseError::BadDigit(_))
        ));
        assert!(matches!(hex_to_rgb("#é00"), Err(ColorParseError::BadDigit(_))));
    }

    #[test]
    fn test_hex_and_display() {
        let rgb = Rgb::new(255, 0, 51);
        assert_eq!(rgb.to_hex(), "#ff0033");
        assert_eq!(rgb.to_string(), "rgb(255,0,51)");
    }
}
