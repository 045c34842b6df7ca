//! Ghost CLI - issue and verify watermarked credentials.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

mod commands;
mod exit_codes;
mod utils;

use exit_codes::ExitCode;

const EXIT_CODES_HELP: &str = "\
Exit codes:
  0   Success
  1   General error
  64  Usage or configuration error
  65  Verification failed (no watermark, invalid signature)
  66  Input file not found
  74  Cannot write output file";

#[derive(Parser)]
#[command(name = "ghost")]
#[command(author, version, about = "Fragile watermarking for verifiable credentials", long_about = None)]
#[command(after_help = EXIT_CODES_HELP)]
struct Cli {
    /// Only print essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// How command results are printed on stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an ML-DSA-65 issuer keypair
    Keygen {
        /// Where to write the keypair JSON
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Overwrite an existing keypair file
        #[arg(long)]
        force: bool,
    },

    /// Sign a certificate record and hide it in a carrier image
    Issue(commands::issue::IssueArgs),

    /// Verify the credential hidden in an image
    Verify {
        /// Path to the certificate image
        #[arg(value_name = "IMAGE")]
        image: PathBuf,

        /// Base64 ML-DSA-65 public key of the issuer
        #[arg(long, conflicts_with = "keypair")]
        issuer_key: Option<String>,

        /// Take the issuer public key from a keypair file
        #[arg(long, value_name = "FILE")]
        keypair: Option<PathBuf>,
    },

    /// Print the raw payload hidden in an image
    Extract {
        /// Path to the certificate image
        #[arg(value_name = "IMAGE")]
        image: PathBuf,
    },

    /// Show how many payload bytes an image can carry
    Capacity {
        /// Path to the carrier image
        #[arg(value_name = "IMAGE")]
        image: PathBuf,
    },
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        _ => "trace",
    };

    // RUST_LOG takes precedence over -v
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("ghost={level},ghost_core={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    let quiet = cli.quiet;

    match cli.command {
        Commands::Keygen { output, force } => {
            commands::keygen::execute(output, force, format, quiet)
        }
        Commands::Issue(args) => commands::issue::execute(args, format, quiet),
        Commands::Verify {
            image,
            issuer_key,
            keypair,
        } => commands::verify::execute(image, issuer_key, keypair, format, quiet),
        Commands::Extract { image } => commands::extract::execute(image, format),
        Commands::Capacity { image } => commands::capacity::execute(image, format, quiet),
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            std::process::exit(exit_codes::USAGE_ERROR);
        }
        // --help and --version
        Err(e) => e.exit(),
    };

    init_tracing(cli.verbose, cli.quiet);

    let exit = match run(cli) {
        Ok(()) => ExitCode::success(),
        Err(e) => ExitCode::from_anyhow(&e),
    };

    if let Some(message) = &exit.message {
        eprintln!("{} {}", "Error:".red().bold(), message);
    }
    std::process::exit(exit.code);
}
