//! Extract command implementation.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use ghost_core::LsbCodec;
use tracing::info;

use crate::utils::{load_config, load_image};
use crate::OutputFormat;

/// Execute the extract command.
///
/// Prints the payload exactly as embedded; nothing is parsed or verified.
pub fn execute(image: PathBuf, format: OutputFormat) -> Result<()> {
    let config = load_config()?;
    let stego = load_image(&image)?;
    let codec = LsbCodec::new(config.codec)?;

    let payload = codec
        .extract(&stego)
        .with_context(|| format!("No watermark found in {}", image.display()))?;

    info!(path = %image.display(), bytes = payload.len(), "Extracted payload");

    match format {
        OutputFormat::Json => {
            let summary = serde_json::json!({
                "bytes": payload.len(),
                "payload": String::from_utf8_lossy(&payload),
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        OutputFormat::Text => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(&payload)
                .and_then(|()| stdout.write_all(b"\n"))
                .context("Failed to write payload to stdout")?;
        }
    }

    Ok(())
}
