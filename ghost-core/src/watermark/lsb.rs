//! Blue-channel least-significant-bit codec.
//!
//! Bit `i` of the frame is stored in the LSB of pixel `i`'s blue sample:
//! `blue' = (blue & !1) | bit`. Red, green, alpha and the upper seven bits of
//! blue are never touched.

use tracing::{debug, warn};

use super::frame::{build_frame, frame_bit_len, frame_bits, max_payload_len, TERMINATOR};
use super::pixels::PixelBuffer;
use crate::config::{CodecConfig, OverflowPolicy};
use crate::error::{GhostError, Result};

/// Outcome of an in-place embed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbedReport {
    /// Carrier bits rewritten.
    pub bits_written: usize,
    /// Bits the full frame required.
    pub frame_bits: usize,
}

impl EmbedReport {
    /// True when the frame did not fit and was cut short.
    pub fn truncated(&self) -> bool {
        self.bits_written < self.frame_bits
    }
}

/// LSB watermark codec bound to one framing configuration.
#[derive(Debug, Clone, Default)]
pub struct LsbCodec {
    config: CodecConfig,
}

impl LsbCodec {
    /// Create a codec, validating the configuration.
    pub fn new(config: CodecConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Largest payload, in bytes, that `carrier` can hold.
    pub fn capacity(&self, carrier: &PixelBuffer) -> Option<usize> {
        let by_pixels = max_payload_len(self.config.magic_header.len(), carrier.pixel_count())?;
        let by_bound = self
            .config
            .max_extract_len
            .saturating_sub(self.config.magic_header.len());
        Some(by_pixels.min(by_bound))
    }

    /// Embed `payload` into a copy of `carrier`.
    pub fn embed(&self, carrier: &PixelBuffer, payload: &[u8]) -> Result<PixelBuffer> {
        let mut stego = carrier.clone();
        self.embed_in_place(&mut stego, payload)?;
        Ok(stego)
    }

    /// Embed `payload` directly into `carrier`.
    ///
    /// Under `OverflowPolicy::Reject` the capacity check happens before any
    /// pixel is modified, so on error `carrier` is unchanged.
    pub fn embed_in_place(&self, carrier: &mut PixelBuffer, payload: &[u8]) -> Result<EmbedReport> {
        let frame = build_frame(&self.config, payload)?;
        let required_bits = frame_bit_len(self.config.magic_header.len(), payload.len());
        let available_bits = carrier.pixel_count();

        if required_bits > available_bits {
            match self.config.overflow {
                OverflowPolicy::Reject => {
                    return Err(GhostError::CapacityExceeded {
                        required_bits,
                        available_bits,
                    });
                }
                OverflowPolicy::Truncate => {
                    warn!(
                        required_bits,
                        available_bits, "Frame exceeds carrier capacity, truncating"
                    );
                }
            }
        }

        let mut bits_written = 0;
        for (blue, bit) in carrier.blue_samples_mut().zip(frame_bits(&frame)) {
            *blue = (*blue & !1) | bit;
            bits_written += 1;
        }

        debug!(
            payload_bytes = payload.len(),
            bits_written,
            pixel_count = available_bits,
            "Embedded watermark frame"
        );

        Ok(EmbedReport {
            bits_written,
            frame_bits: required_bits,
        })
    }

    /// Recover the payload embedded in `stego`.
    ///
    /// Returns `None` when no terminated frame starting with the magic header
    /// is found within the extraction bound. Absence is not an error.
    pub fn extract(&self, stego: &PixelBuffer) -> Option<Vec<u8>> {
        let mut output = Vec::new();
        let mut current = 0u8;
        let mut bit_count = 0;
        let mut terminated = false;

        for blue in stego.blue_samples() {
            current = (current << 1) | (blue & 1);
            bit_count += 1;

            if bit_count == 8 {
                if current == TERMINATOR {
                    terminated = true;
                    break;
                }
                output.push(current);
                current = 0;
                bit_count = 0;

                if output.len() > self.config.max_extract_len {
                    debug!(
                        bound = self.config.max_extract_len,
                        "Extraction bound exceeded without terminator"
                    );
                    break;
                }
            }
        }

        if !terminated || !output.starts_with(&self.config.magic_header) {
            debug!(
                terminated,
                scanned_bytes = output.len(),
                "No watermark found"
            );
            return None;
        }

        output.drain(..self.config.magic_header.len());
        debug!(payload_bytes = output.len(), "Extracted watermark payload");
        Some(output)
    }
}

/// Embed with the default configuration (`CERT:` header, reject on overflow).
pub fn embed(carrier: &PixelBuffer, payload: &[u8]) -> Result<PixelBuffer> {
    LsbCodec::default().embed(carrier, payload)
}

/// Extract with the default configuration.
pub fn extract(stego: &PixelBuffer) -> Option<Vec<u8>> {
    LsbCodec::default().extract(stego)
}
