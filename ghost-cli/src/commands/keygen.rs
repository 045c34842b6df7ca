//! Keygen command implementation.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use colored::Colorize;
use ghost_core::MlDsaSigner;
use tracing::info;

use crate::utils::{abbreviate, write_secret};
use crate::OutputFormat;

/// Execute the keygen command.
pub fn execute(output: PathBuf, force: bool, format: OutputFormat, quiet: bool) -> Result<()> {
    if output.exists() && !force {
        bail!(
            "Keypair file already exists: {} (use --force to overwrite)",
            output.display()
        );
    }

    let signer = MlDsaSigner::generate();
    let exported = signer.export();
    let json = serde_json::to_string_pretty(&exported).context("Failed to serialize keypair")?;
    write_secret(&output, json.as_bytes())?;

    info!(path = %output.display(), algorithm = %exported.algorithm, "Keypair saved");

    match format {
        OutputFormat::Json => {
            let summary = serde_json::json!({
                "algorithm": exported.algorithm,
                "publicKey": exported.public_key,
                "path": output.display().to_string(),
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        OutputFormat::Text if !quiet => {
            println!();
            println!("{}", "Issuer keypair generated".green().bold());
            println!();
            println!("   {} {}", "Algorithm:".dimmed(), exported.algorithm);
            println!("   {} {}", "Saved to:".dimmed(), output.display());
            println!(
                "   {} {}",
                "Public key:".dimmed(),
                abbreviate(&exported.public_key, 16)
            );
            println!();
            println!(
                "   {}",
                "Keep this file private. Verifiers only need the public key.".yellow()
            );
        }
        OutputFormat::Text => println!("{}", output.display()),
    }

    Ok(())
}
