//! Watermark frame construction and capacity arithmetic.
//!
//! ```text
//! [H bytes] magic header (default "CERT:")
//! [N bytes] payload (must not contain 0x00)
//! [1 byte ] 0x00 terminator
//! ```
//!
//! Each frame byte becomes eight carrier bits, most-significant bit first.

use crate::config::CodecConfig;
use crate::error::{GhostError, Result};

/// Frame terminator byte.
pub const TERMINATOR: u8 = 0x00;

/// Number of carrier bits needed for a payload of `payload_len` bytes.
pub fn frame_bit_len(header_len: usize, payload_len: usize) -> usize {
    (header_len + payload_len + 1) * 8
}

/// Largest payload that fits in `pixel_count` pixels, or `None` when even an
/// empty payload does not fit.
pub fn max_payload_len(header_len: usize, pixel_count: usize) -> Option<usize> {
    (pixel_count / 8).checked_sub(header_len + 1)
}

/// Build `header || payload || 0x00`.
///
/// Rejects payloads that contain a NUL byte (it would end the frame early) or
/// that are longer than the extraction bound allows to be read back.
pub fn build_frame(config: &CodecConfig, payload: &[u8]) -> Result<Vec<u8>> {
    if let Some(position) = payload.iter().position(|&b| b == TERMINATOR) {
        return Err(GhostError::PayloadContainsTerminator { position });
    }

    let readable = config
        .max_extract_len
        .saturating_sub(config.magic_header.len());
    if payload.len() > readable {
        return Err(GhostError::PayloadTooLarge {
            len: payload.len(),
            max: readable,
        });
    }

    let mut frame = Vec::with_capacity(config.magic_header.len() + payload.len() + 1);
    frame.extend_from_slice(&config.magic_header);
    frame.extend_from_slice(payload);
    frame.push(TERMINATOR);
    Ok(frame)
}

/// Expand bytes into bits, most-significant bit first.
pub fn frame_bits(frame: &[u8]) -> impl Iterator<Item = u8> + '_ {
    frame
        .iter()
        .flat_map(|&byte| (0..8).rev().map(move |shift| (byte >> shift) & 1))
}
