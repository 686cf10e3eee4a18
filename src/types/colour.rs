//! Colour value type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{JopError, Result};

/// An RGBA colour with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Colour {
    /// Create a new colour from RGBA components.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create a new opaque colour from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Fully transparent colour.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    pub const BLACK: Self = Self::rgb(0, 0, 0);

    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Parse a hex colour string: `#RRGGBB` or `#RRGGBBAA`, `#` optional.
    pub fn from_hex(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);

        let channel = |i: usize| -> Result<u8> {
            hex.get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| invalid_hex(trimmed))
        };

        match hex.len() {
            6 => Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Ok(Self::new(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => Err(invalid_hex(trimmed)),
        }
    }

    pub const fn from_rgba(rgba: [u8; 4]) -> Self {
        Self::new(rgba[0], rgba[1], rgba[2], rgba[3])
    }

    pub const fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// The same colour with full opacity.
    pub const fn opaque(self) -> Self {
        Self::rgb(self.r, self.g, self.b)
    }

    /// Check if the colour is fully transparent.
    pub fn is_transparent(self) -> bool {
        self.a == 0
    }

    /// Check if the colour is fully opaque.
    pub fn is_opaque(self) -> bool {
        self.a == 255
    }

    /// Squared Euclidean distance in RGB space. Alpha is ignored.
    pub fn distance_sq(self, other: Colour) -> u32 {
        let dr = self.r as i32 - other.r as i32;
        let dg = self.g as i32 - other.g as i32;
        let db = self.b as i32 - other.b as i32;
        (dr * dr + dg * dg + db * db) as u32
    }

    /// Whether two colours share the same RGB channels.
    pub fn same_rgb(self, other: Colour) -> bool {
        self.r == other.r && self.g == other.g && self.b == other.b
    }
}

fn invalid_hex(s: &str) -> JopError {
    JopError::Parse {
        message: format!("Invalid hex colour: {}", s),
        help: Some("Use #RRGGBB or #RRGGBBAA format".to_string()),
    }
}

impl FromStr for Colour {
    type Err = JopError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

impl Serialize for Colour {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Colour {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Colour::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex_6digit() {
        assert_eq!(Colour::from_hex("#F9801D").unwrap(), Colour::rgb(0xF9, 0x80, 0x1D));
        assert_eq!(Colour::from_hex("1d1d21").unwrap(), Colour::rgb(0x1D, 0x1D, 0x21));
    }

    #[test]
    fn test_from_hex_8digit() {
        assert_eq!(Colour::from_hex("#FF000080").unwrap(), Colour::new(255, 0, 0, 128));
    }

    #[test]
    fn test_from_hex_invalid() {
        assert!(Colour::from_hex("#GGGGGG").is_err());
        assert!(Colour::from_hex("#F00").is_err());
        assert!(Colour::from_hex("").is_err());
    }

    #[test]
    fn test_display_round_trips() {
        let c = Colour::new(0x3A, 0xB3, 0xDA, 0x40);
        assert_eq!(c.to_string(), "#3AB3DA40");
        assert_eq!(c.to_string().parse::<Colour>().unwrap(), c);
        assert_eq!(Colour::rgb(1, 2, 3).to_string(), "#010203");
    }

    #[test]
    fn test_distance_ignores_alpha() {
        let a = Colour::new(10, 20, 30, 0);
        let b = Colour::rgb(13, 24, 30);
        assert_eq!(a.distance_sq(b), 9 + 16);
        assert_eq!(a.distance_sq(a.opaque()), 0);
    }

    #[test]
    fn test_serde_as_hex_string() {
        let json = serde_json::to_string(&Colour::rgb(255, 0, 0)).unwrap();
        assert_eq!(json, "\"#FF0000\"");
        let back: Colour = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Colour::rgb(255, 0, 0));
    }
}
