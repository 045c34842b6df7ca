//! Capacity command implementation.

use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use ghost_core::LsbCodec;

use crate::utils::{load_config, load_image};
use crate::OutputFormat;

/// Execute the capacity command.
pub fn execute(image: PathBuf, format: OutputFormat, quiet: bool) -> Result<()> {
    let config = load_config()?;
    let carrier = load_image(&image)?;
    let codec = LsbCodec::new(config.codec)?;
    let capacity = codec.capacity(&carrier);

    match format {
        OutputFormat::Json => {
            let summary = serde_json::json!({
                "width": carrier.width(),
                "height": carrier.height(),
                "pixels": carrier.pixel_count(),
                "availableBits": carrier.pixel_count(),
                "maxPayloadBytes": capacity,
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        OutputFormat::Text if quiet => {
            println!("{}", capacity.unwrap_or(0));
        }
        OutputFormat::Text => {
            println!();
            println!(
                "   {} {}x{}",
                "Dimensions:".dimmed(),
                carrier.width(),
                carrier.height()
            );
            println!("   {} {}", "Pixels:".dimmed(), carrier.pixel_count());
            match capacity {
                Some(max) => println!("   {} {} bytes", "Max payload:".dimmed(), max),
                None => println!(
                    "   {} {}",
                    "Max payload:".dimmed(),
                    "carrier too small for the watermark header".red()
                ),
            }
        }
    }

    Ok(())
}
