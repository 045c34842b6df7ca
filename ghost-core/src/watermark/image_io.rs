//! Conversion between encoded image files and [`PixelBuffer`].
//!
//! Stego images must be persisted losslessly. `encode_png` is the only encoder
//! offered here; JPEG and other lossy formats erase the watermark.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, RgbaImage};
use tracing::debug;

use super::pixels::PixelBuffer;
use crate::error::{GhostError, Result};

impl PixelBuffer {
    /// Decode an encoded image (PNG, JPEG, GIF, WebP) into RGBA pixels.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| GhostError::ImageDecode(format!("Failed to decode image: {e}")))?;

        debug!(
            width = image.width(),
            height = image.height(),
            "Decoded carrier image"
        );

        Self::from_image(&image)
    }

    /// Convert any decoded image to an RGBA8 pixel buffer.
    pub fn from_image(image: &DynamicImage) -> Result<Self> {
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self::from_rgba(width, height, rgba.into_raw())
    }

    /// Convert back into an `image` buffer.
    pub fn to_rgba_image(&self) -> Result<RgbaImage> {
        RgbaImage::from_raw(self.width(), self.height(), self.as_rgba().to_vec()).ok_or_else(
            || GhostError::InvalidPixelBuffer("buffer does not match its dimensions".into()),
        )
    }

    /// Encode as PNG bytes.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let image = self.to_rgba_image()?;
        let mut buffer = Cursor::new(Vec::new());
        image
            .write_to(&mut buffer, ImageFormat::Png)
            .map_err(|e| GhostError::ImageEncode(format!("Failed to encode PNG: {e}")))?;
        Ok(buffer.into_inner())
    }

    /// Check if the provided bytes appear to be a supported image format.
    pub fn is_supported_format(data: &[u8]) -> bool {
        image::guess_format(data).is_ok()
    }
}

impl TryFrom<RgbaImage> for PixelBuffer {
    type Error = GhostError;

    fn try_from(image: RgbaImage) -> Result<Self> {
        let (width, height) = image.dimensions();
        Self::from_rgba(width, height, image.into_raw())
    }
}
