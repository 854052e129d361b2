// Canvas domain model
// A canvas is an immutable, creator-attributed collection of pixels stored
// by the external contract. Ids are dense, 1-based and assigned in creation
// order by the store; a canvas is never mutated or deleted once stored.

mod codec;

use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use chrono::{DateTime, Utc};
use serde::{de::Error as SerdeError, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::crypto::Address;

pub use codec::{decode_pixels, encode_pixels, CodecError, DecodeMode, PIXEL_RECORD_SIZE};

/// Maximum representable coordinate on either axis (2-byte wire field)
pub const MAX_COORDINATE: u16 = u16::MAX;

#[derive(Debug, Clone, Error)]
pub enum ColorError {
    #[error("expected a 6 hex digit color, got {} digits", _0)]
    InvalidLength(usize),
    #[error("invalid hex in color: {}", _0)]
    InvalidHex(#[from] hex::FromHexError),
}

/// 24-bit RGB color, parsed from and displayed as `#RRGGBB`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color([u8; 3]);

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    pub const fn from_bytes(bytes: [u8; 3]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 3] {
        &self.0
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", hex::encode(self.0))
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let stripped = s.strip_prefix('#').unwrap_or(s);
        if stripped.len() != 6 {
            return Err(ColorError::InvalidLength(stripped.len()));
        }
        let mut bytes = [0u8; 3];
        hex::decode_to_slice(stripped, &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(SerdeError::custom)
    }
}

/// One colored cell within a canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pixel {
    pub x: u16,
    pub y: u16,
    pub color: Color,
}

impl Pixel {
    pub const fn new(x: u16, y: u16, color: Color) -> Self {
        Self { x, y, color }
    }
}

/// A stored canvas as reconstructed from the contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Canvas {
    pub id: u64,
    pub pixels: Vec<Pixel>,
    pub metadata: String,
    pub creator: Address,
    /// Unix timestamp (seconds) assigned by the store at creation
    pub timestamp: u64,
}

impl Canvas {
    /// Creation time of the canvas, if the store timestamp is representable
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp as i64, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_parse() {
        let color: Color = "#AABBCC".parse().unwrap();
        assert_eq!(color, Color::new(0xaa, 0xbb, 0xcc));
        assert_eq!(color.to_string(), "#aabbcc");
        // the '#' prefix is optional, matching what the encoder strips
        assert_eq!("aabbcc".parse::<Color>().unwrap(), color);
    }

    #[test]
    fn test_color_rejects_bad_input() {
        assert!(matches!(
            "#abc".parse::<Color>(),
            Err(ColorError::InvalidLength(3))
        ));
        assert!(matches!(
            "#gggggg".parse::<Color>(),
            Err(ColorError::InvalidHex(_))
        ));
    }

    #[test]
    fn test_canvas_created_at() {
        let canvas = Canvas {
            id: 1,
            pixels: Vec::new(),
            metadata: String::new(),
            creator: Address::zero(),
            timestamp: 1_700_000_000,
        };
        assert_eq!(
            canvas.created_at().unwrap().timestamp(),
            1_700_000_000
        );
    }
}
