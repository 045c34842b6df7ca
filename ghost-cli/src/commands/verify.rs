//! Verify command implementation.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use colored::Colorize;
use ghost_core::{
    verify_certificate, CertificateRecord, CredentialVerification, MlDsaVerifier,
    PlaceholderVerifier, SignatureVerifier,
};
use tracing::{debug, error, info};

use crate::utils::{abbreviate, load_config, load_image, load_keypair};
use crate::OutputFormat;

/// Risk scores above this are highlighted.
const RISK_WARNING_THRESHOLD: u32 = 20;

/// Execute the verify command.
pub fn execute(
    image: PathBuf,
    issuer_key: Option<String>,
    keypair: Option<PathBuf>,
    format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    let config = load_config()?;
    let stego = load_image(&image)?;

    let issuer_key = match (issuer_key, keypair) {
        (Some(key), _) => Some(key),
        (None, Some(path)) => Some(load_keypair(&path)?.public_key_base64()),
        (None, None) => None,
    };

    // An explicit issuer key means real signatures
    let verifier: Box<dyn SignatureVerifier> = if issuer_key.is_some() {
        Box::new(MlDsaVerifier)
    } else {
        Box::new(PlaceholderVerifier)
    };
    debug!(scheme = verifier.scheme(), "Selected verifier");

    let result = verify_certificate(&stego, verifier.as_ref(), issuer_key.as_deref(), &config)
        .context("Failed to verify certificate")?;

    match format {
        OutputFormat::Json => {
            let report = result.to_report(verifier.scheme(), &config);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text if !quiet => print_result(&result, verifier.scheme()),
        OutputFormat::Text => {
            println!("{}", if result.is_valid() { "VALID" } else { "INVALID" });
        }
    }

    if result.is_valid() {
        info!(path = %image.display(), "Verification successful");
        Ok(())
    } else {
        error!(path = %image.display(), reason = %result.description(), "Verification failed");
        bail!("Verification failed: {}", result.description())
    }
}

fn print_result(result: &CredentialVerification, scheme: &str) {
    println!();
    if result.is_valid() {
        println!("{}", "╔════════════════════════════════════════╗".green());
        println!(
            "{}",
            "║                VALID                   ║".green().bold()
        );
        println!("{}", "╚════════════════════════════════════════╝".green());
    } else {
        println!("{}", "╔════════════════════════════════════════╗".red());
        println!(
            "{}",
            "║               INVALID                  ║".red().bold()
        );
        println!("{}", "╚════════════════════════════════════════╝".red());
    }
    println!();

    let (watermark, signature) = match result {
        CredentialVerification::Authentic { .. } => ("Found".green(), "Valid".green()),
        CredentialVerification::SignatureInvalid { .. } => ("Found".green(), "INVALID".red()),
        CredentialVerification::Corrupted { .. } => ("Corrupted".red(), "Not checked".dimmed()),
        CredentialVerification::NoWatermark => ("Not found".red(), "Not checked".dimmed()),
    };
    println!("   {} {}", "Watermark:".dimmed(), watermark);
    println!("   {} {} ({})", "Signature:".dimmed(), signature, scheme);

    if let Some(record) = result.record() {
        print_record(record);
    }
    if let Some(digest) = result.digest() {
        println!("   {} {}", "Digest:".dimmed(), abbreviate(digest, 8));
    }
    if !result.is_valid() {
        println!();
        println!("   {}", result.description().red());
    }
}

fn print_record(record: &CertificateRecord) {
    println!("   {} {}", "Credential ID:".dimmed(), record.id);
    println!("   {} {}", "Issuer:".dimmed(), record.issuer_did);
    println!("   {} {}", "Course:".dimmed(), record.course_name);
    println!("   {} {}", "Issued:".dimmed(), record.issue_date);
    println!(
        "   {} {}",
        "Recipient hash:".dimmed(),
        abbreviate(&record.recipient_hash, 8)
    );

    let risk = format!("{} / 100", record.risk_score);
    let risk = if record.risk_score > RISK_WARNING_THRESHOLD {
        risk.yellow()
    } else {
        risk.green()
    };
    println!("   {} {}", "Risk score:".dimmed(), risk);

    if let Some(tx_hash) = &record.tx_hash {
        println!("   {} {}", "Tx hash:".dimmed(), tx_hash);
    }
}
