// Pixel wire codec
// Each pixel is packed into a fixed 7-byte record: x (2 bytes, big endian),
// y (2 bytes, big endian), color (3 raw RGB bytes). Records are concatenated
// in insertion order with no separator and no length prefix; the pixel count
// is implicit in the payload length. This layout must be preserved exactly
// for interoperability with the deployed store.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Color, Pixel};

/// Size of one encoded pixel record in bytes
pub const PIXEL_RECORD_SIZE: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error(
        "payload length {} is not a multiple of {} bytes",
        _0,
        PIXEL_RECORD_SIZE
    )]
    TruncatedPayload(usize),
}

/// How to treat a payload whose length is not a multiple of the record size
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodeMode {
    /// Drop the trailing partial record silently (behavior of the deployed store)
    #[default]
    Lenient,
    /// Reject the payload, trailing garbage may mask upstream corruption
    Strict,
}

/// Encode pixels into their wire representation
///
/// Deterministic and order preserving; round-trips exactly through
/// [`decode_pixels`]. An empty slice encodes to an empty payload.
pub fn encode_pixels(pixels: &[Pixel]) -> Vec<u8> {
    let mut payload = Vec::with_capacity(pixels.len() * PIXEL_RECORD_SIZE);
    for pixel in pixels {
        payload.extend_from_slice(&pixel.x.to_be_bytes());
        payload.extend_from_slice(&pixel.y.to_be_bytes());
        payload.extend_from_slice(pixel.color.as_bytes());
    }
    payload
}

/// Decode a payload back into pixels
///
/// Reads 7-byte records from the start of the payload. In lenient mode a
/// trailing record shorter than 7 bytes is dropped; in strict mode it is an
/// error. An empty payload decodes to no pixels.
pub fn decode_pixels(payload: &[u8], mode: DecodeMode) -> Result<Vec<Pixel>, CodecError> {
    if mode == DecodeMode::Strict && payload.len() % PIXEL_RECORD_SIZE != 0 {
        return Err(CodecError::TruncatedPayload(payload.len()));
    }

    let pixels = payload
        .chunks_exact(PIXEL_RECORD_SIZE)
        .map(|record| Pixel {
            x: u16::from_be_bytes([record[0], record[1]]),
            y: u16::from_be_bytes([record[2], record[3]]),
            color: Color::from_bytes([record[4], record[5], record[6]]),
        })
        .collect();
    Ok(pixels)
}
