#![no_main]

//! Fuzz target for LSB watermark extraction
//!
//! Arbitrary bytes are treated as RGBA samples of a single-row image. The
//! extractor must never panic and must never return more than the bound.
//!
//! Run with: cargo +nightly fuzz run fuzz_extract

use ghost_core::{extract, PixelBuffer, DEFAULT_MAX_EXTRACT_LEN};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let usable = data.len() - data.len() % 4;
    if usable == 0 {
        return;
    }

    let width = (usable / 4) as u32;
    let Ok(buffer) = PixelBuffer::from_rgba(width, 1, data[..usable].to_vec()) else {
        return;
    };

    if let Some(payload) = extract(&buffer) {
        assert!(payload.len() <= DEFAULT_MAX_EXTRACT_LEN);
        assert!(!payload.contains(&0));
    }
});
