//! Common utility functions shared across CLI commands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ghost_core::{ExportedKeypair, GhostConfig, MlDsaSigner, PixelBuffer};
use tracing::debug;

/// Load codec and digest settings from `GHOST_*` environment variables.
pub fn load_config() -> Result<GhostConfig> {
    let config = GhostConfig::from_env();
    config.validate().context("Invalid configuration")?;
    debug!(
        header_len = config.codec.magic_header.len(),
        max_extract_len = config.codec.max_extract_len,
        digest = %config.integrity.digest,
        "Loaded configuration"
    );
    Ok(config)
}

/// Read and decode an image file into RGBA pixels.
pub fn load_image(path: &Path) -> Result<PixelBuffer> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    let buffer = PixelBuffer::decode(&bytes)
        .with_context(|| format!("Failed to decode image: {}", path.display()))?;

    debug!(
        path = %path.display(),
        width = buffer.width(),
        height = buffer.height(),
        "Loaded image"
    );
    Ok(buffer)
}

/// Load an ML-DSA keypair written by `ghost keygen`.
pub fn load_keypair(path: &Path) -> Result<MlDsaSigner> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read keypair file: {}", path.display()))?;
    let exported: ExportedKeypair =
        serde_json::from_str(&json).context("Failed to parse keypair file")?;
    MlDsaSigner::from_exported(&exported).context("Failed to load keypair")
}

/// Write `bytes` to `path`.
pub fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes)
        .with_context(|| format!("Failed to write output file: {}", path.display()))
}

/// Write secret material to `path`, readable by the owner only.
///
/// On unix the file is created with mode 0600 and an existing file is
/// narrowed to 0600 before any bytes are written.
pub fn write_secret(path: &Path, bytes: &[u8]) -> Result<()> {
    use std::io::Write;

    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options
        .open(path)
        .with_context(|| format!("Failed to write output file: {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(0o600))
            .with_context(|| format!("Failed to write permissions: {}", path.display()))?;
    }

    file.write_all(bytes)
        .and_then(|()| file.sync_all())
        .with_context(|| format!("Failed to write output file: {}", path.display()))
}

/// Build the default stego output path from the carrier path.
///
/// Transforms `diploma.jpg` into `diploma.cert.png`. The output is always PNG.
pub fn build_output_path(carrier: &Path) -> PathBuf {
    let stem = carrier
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("certificate");
    carrier.with_file_name(format!("{stem}.cert.png"))
}

/// True if `path` has a `.png` extension (case-insensitive).
pub fn is_png_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("png"))
}

/// Shorten a long key or signature for display.
pub fn abbreviate(value: &str, keep: usize) -> String {
    if value.chars().count() <= keep * 2 {
        return value.to_string();
    }
    let head: String = value.chars().take(keep).collect();
    let tail: String = value
        .chars()
        .skip(value.chars().count() - keep)
        .collect();
    format!("{head}...{tail}")
}
