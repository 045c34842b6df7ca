//! Fragile LSB watermark for certificate images.
//!
//! A payload is framed as `MAGIC_HEADER || payload || 0x00` and written one
//! bit per pixel into the least-significant bit of the blue channel.
//!
//! # Components
//!
//! - **pixels**: the RGBA carrier buffer
//! - **frame**: framing and capacity arithmetic
//! - **lsb**: the embed/extract codec
//! - **image_io**: PNG/JPEG decode and lossless PNG encode (`image-io` feature)
//!
//! The watermark is fragile: any lossy re-encoding, resize or pixel edit
//! corrupts or erases it.

pub mod frame;
#[cfg(feature = "image-io")]
mod image_io;
pub mod lsb;
pub mod pixels;

pub use frame::{frame_bit_len, max_payload_len, TERMINATOR};
pub use lsb::{embed, extract, EmbedReport, LsbCodec};
pub use pixels::PixelBuffer;
