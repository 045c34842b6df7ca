//! RGBA pixel buffers used as watermark carriers.

use crate::error::{GhostError, Result};

/// Number of channels per pixel (red, green, blue, alpha).
pub const CHANNELS: usize = 4;

/// Offset of the blue channel within a pixel.
pub const BLUE_CHANNEL: usize = 2;

/// A row-major RGBA8 image held in memory.
///
/// Dimensions are fixed at construction; the codec only ever rewrites the
/// least-significant bit of each blue sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw RGBA bytes.
    ///
    /// Fails if the image is empty or `data.len() != width * height * 4`.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = rgba_len(width, height)?;

        if expected == 0 {
            return Err(GhostError::InvalidPixelBuffer(format!(
                "empty image ({width}x{height})"
            )));
        }

        if data.len() != expected {
            return Err(GhostError::InvalidPixelBuffer(format!(
                "expected {expected} bytes for {width}x{height} RGBA, got {}",
                data.len()
            )));
        }

        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Create a buffer where every pixel has the same color.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self> {
        let pixels = rgba_len(width, height)? / CHANNELS;
        let data = rgba.repeat(pixels);
        Self::from_rgba(width, height, data)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels, which is also the number of embeddable bits.
    pub fn pixel_count(&self) -> usize {
        self.data.len() / CHANNELS
    }

    /// Raw RGBA bytes.
    pub fn as_rgba(&self) -> &[u8] {
        &self.data
    }

    pub fn into_rgba(self) -> Vec<u8> {
        self.data
    }

    /// RGBA value of pixel `index` in row-major order.
    pub fn pixel(&self, index: usize) -> Option<[u8; 4]> {
        let start = index.checked_mul(CHANNELS)?;
        let end = start.checked_add(CHANNELS)?;
        let px = self.data.get(start..end)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Iterate over the blue sample of every pixel.
    pub(crate) fn blue_samples(&self) -> impl Iterator<Item = u8> + '_ {
        self.data
            .chunks_exact(CHANNELS)
            .map(|px| px[BLUE_CHANNEL])
    }

    /// Mutable access to the blue sample of every pixel.
    pub(crate) fn blue_samples_mut(&mut self) -> impl Iterator<Item = &mut u8> + '_ {
        self.data
            .chunks_exact_mut(CHANNELS)
            .map(|px| &mut px[BLUE_CHANNEL])
    }
}

/// Byte length of a `width` x `height` RGBA buffer.
fn rgba_len(width: u32, height: u32) -> Result<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(CHANNELS))
        .ok_or_else(|| {
            GhostError::InvalidPixelBuffer(format!("dimensions overflow ({width}x{height})"))
        })
}
