//! Issue command implementation.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use ghost_core::{
    issue_certificate, CertificateBuilder, CredentialSigner, LsbCodec, PlaceholderSigner,
};
use tracing::{debug, info, warn};

use crate::utils::{
    abbreviate, build_output_path, is_png_path, load_config, load_image, load_keypair,
    write_output,
};
use crate::OutputFormat;

/// Issuer DID used when none is given.
pub const DEFAULT_ISSUER_DID: &str = "did:ethr:0x1234567890abcdef1234567890abcdef12345678";

#[derive(Args, Debug)]
pub struct IssueArgs {
    /// Blank certificate image to embed into
    #[arg(value_name = "CARRIER")]
    pub carrier: PathBuf,

    /// Learner name (only its hash is stored)
    #[arg(long)]
    pub recipient: String,

    /// Course the credential is awarded for
    #[arg(long)]
    pub course: String,

    /// DID of the issuing institution
    #[arg(long, default_value = DEFAULT_ISSUER_DID)]
    pub issuer_did: String,

    /// Proctoring risk score (0-100)
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u32).range(0..=100))]
    pub risk_score: u32,

    /// Sign with an ML-DSA-65 keypair instead of the placeholder signer
    #[arg(long, value_name = "FILE")]
    pub keypair: Option<PathBuf>,

    /// Anchoring transaction hash to record
    #[arg(long)]
    pub tx_hash: Option<String>,

    /// Output PNG path (defaults to <CARRIER>.cert.png)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Show what would be issued without writing anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

/// Execute the issue command.
pub fn execute(args: IssueArgs, format: OutputFormat, quiet: bool) -> Result<()> {
    let config = load_config()?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| build_output_path(&args.carrier));
    if !is_png_path(&output) {
        bail!(
            "Output must be a PNG file, lossy formats erase the watermark: {}",
            output.display()
        );
    }

    let carrier = load_image(&args.carrier)?;

    let (signer, pqc_signature): (Box<dyn CredentialSigner>, Option<&str>) = match &args.keypair
    {
        Some(path) => (Box::new(load_keypair(path)?), None),
        None => {
            warn!("No keypair given, signing with the placeholder signer");
            (
                Box::new(PlaceholderSigner::new(&args.issuer_did)),
                Some(PlaceholderSigner::MOCK_PQC_SIGNATURE),
            )
        }
    };
    debug!(scheme = signer.scheme(), "Selected signer");

    let mut builder = CertificateBuilder::new(&args.issuer_did, &args.recipient, &args.course)
        .with_risk_score(args.risk_score)
        .with_digest(config.integrity.digest);
    if let Some(signature) = pqc_signature {
        builder = builder.with_pqc_signature(signature);
    }
    if let Some(tx_hash) = &args.tx_hash {
        builder = builder.with_tx_hash(tx_hash);
    }

    let record = builder
        .build(signer.as_ref())
        .context("Failed to build certificate record")?;
    let payload_len = record.to_payload()?.len();

    if args.dry_run {
        let capacity = LsbCodec::new(config.codec.clone())?.capacity(&carrier);
        println!("{}", "[DRY RUN] Would perform the following:".cyan().bold());
        println!();
        println!("   {} {}", "Carrier:".dimmed(), args.carrier.display());
        println!("   {} {}", "Output file:".dimmed(), output.display());
        println!("   {} {}", "Signer:".dimmed(), signer.scheme());
        println!("   {} {} bytes", "Payload:".dimmed(), payload_len);
        match capacity {
            Some(max) => println!("   {} {} bytes", "Capacity:".dimmed(), max),
            None => println!("   {} {}", "Capacity:".dimmed(), "carrier too small".red()),
        }
        return Ok(());
    }

    let stego = issue_certificate(&carrier, &record, &config)
        .context("Failed to embed certificate")?;
    let png = stego.encode_png().context("Failed to encode PNG")?;
    write_output(&output, &png)?;

    info!(
        id = %record.id,
        path = %output.display(),
        payload_bytes = payload_len,
        "Certificate issued"
    );

    match format {
        OutputFormat::Json => {
            let summary = serde_json::json!({
                "output": output.display().to_string(),
                "signatureScheme": signer.scheme(),
                "issuerKey": signer.issuer_key(),
                "payloadBytes": payload_len,
                "record": record,
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        OutputFormat::Text if !quiet => {
            println!();
            println!("{}", "Certificate issued".green().bold());
            println!();
            println!("   {} {}", "Saved to:".dimmed(), output.display());
            println!("   {} {}", "Credential ID:".dimmed(), record.id);
            println!("   {} {}", "Course:".dimmed(), record.course_name);
            println!("   {} {}", "Issued:".dimmed(), record.issue_date);
            println!(
                "   {} {}",
                "Recipient hash:".dimmed(),
                abbreviate(&record.recipient_hash, 8)
            );
            println!("   {} {}", "Signature:".dimmed(), signer.scheme());
            println!("   {} {} bytes", "Payload:".dimmed(), payload_len);
        }
        OutputFormat::Text => println!("{}", output.display()),
    }

    Ok(())
}
