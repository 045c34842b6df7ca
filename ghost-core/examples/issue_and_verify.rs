//! Example issuing a credential into a blank certificate and verifying it.
//!
//! Run with: cargo run -p ghost-core --example issue_and_verify

use ghost_core::{
    extract, issue_certificate, verify_certificate, CertificateBuilder, GhostConfig, LsbCodec,
    PixelBuffer, PlaceholderSigner, PlaceholderVerifier,
};
use tracing_subscriber::{fmt, EnvFilter};

fn main() {
    // Initialize tracing subscriber with debug level for the codec
    fmt()
        .with_env_filter(EnvFilter::new("ghost_core=debug,info"))
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    println!("=== Ghost Credential Demo ===\n");

    let issuer = "did:ethr:0x1234567890abcdef1234567890abcdef12345678";
    let config = GhostConfig::default();

    let record = match CertificateBuilder::new(issuer, "Ada Lovelace", "Applied Cryptography")
        .with_risk_score(5)
        .build(&PlaceholderSigner::new(issuer))
    {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Failed to build record: {}", e);
            return;
        }
    };
    println!("Record: {:#?}\n", record);

    let carrier = match PixelBuffer::filled(320, 240, [250, 248, 240, 255]) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to create carrier: {}", e);
            return;
        }
    };

    match LsbCodec::new(config.codec.clone()) {
        Ok(codec) => println!("Capacity: {:?} payload bytes\n", codec.capacity(&carrier)),
        Err(e) => eprintln!("Invalid codec config: {}", e),
    }

    let stego = match issue_certificate(&carrier, &record, &config) {
        Ok(s) => s,
        Err(e) => {
            println!("\n❌ Embedding failed: {}", e);
            return;
        }
    };

    if let Some(payload) = extract(&stego) {
        println!("Extracted: {}\n", String::from_utf8_lossy(&payload));
    }

    match verify_certificate(&stego, &PlaceholderVerifier, None, &config) {
        Ok(result) if result.is_valid() => {
            println!("✅ {}", result.description());
        }
        Ok(result) => {
            println!("❌ {}", result.description());
        }
        Err(e) => {
            println!("❌ Verification failed: {}", e);
        }
    }
}
