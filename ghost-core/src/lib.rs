//! Ghost Core - fragile watermarking and integrity checks for credentials
//!
//! This crate hides a signed certificate record inside a certificate image
//! and recovers and validates it again.
//!
//! # Features
//!
//! - Blue-channel LSB watermark with magic header, NUL terminator and
//!   explicit capacity checks
//! - Canonical JSON hashing (SHA-256 or SHA3-256), independent of key order
//! - Pluggable signature verification, with an ML-DSA-65 implementation
//! - Lossless PNG carrier I/O through the `image` crate
//!
//! # Example
//!
//! ```no_run
//! use ghost_core::{
//!     issue_certificate, verify_certificate, CertificateBuilder, GhostConfig, PixelBuffer,
//!     PlaceholderSigner, PlaceholderVerifier,
//! };
//!
//! # fn example() -> ghost_core::Result<()> {
//! let issuer = "did:ethr:0x1234567890abcdef1234567890abcdef12345678";
//! let config = GhostConfig::default();
//!
//! let record = CertificateBuilder::new(issuer, "Ada Lovelace", "Applied Cryptography")
//!     .with_risk_score(5)
//!     .build(&PlaceholderSigner::new(issuer))?;
//!
//! let carrier = PixelBuffer::filled(256, 256, [255, 255, 255, 255])?;
//! let stego = issue_certificate(&carrier, &record, &config)?;
//!
//! let result = verify_certificate(&stego, &PlaceholderVerifier, None, &config)?;
//! assert!(result.is_valid());
//! # Ok(())
//! # }
//! ```

pub mod certificate;
pub mod config;
pub mod credential;
pub mod error;
pub mod integrity;
pub mod watermark;

// Re-export main types for convenience
pub use certificate::{recipient_hash, signing_digest_of, CertificateBuilder, CertificateRecord};
pub use config::{CodecConfig, GhostConfig, IntegrityConfig, OverflowPolicy};
pub use credential::{
    issue_certificate, verify_certificate, CredentialVerification, IntegrityChecks,
    VerificationReport,
};
pub use error::{GhostError, Result, DEFAULT_MAGIC_HEADER, DEFAULT_MAX_EXTRACT_LEN};
pub use integrity::{
    canonical_hash, verify, CanonicalBytes, CredentialSigner, DigestAlgorithm, PlaceholderSigner,
    PlaceholderVerifier, SignatureVerifier,
};
pub use watermark::{embed, extract, EmbedReport, LsbCodec, PixelBuffer};

// Post-quantum signature exports (not available in Wasm)
#[cfg(feature = "ml-dsa")]
pub use integrity::{ExportedKeypair, MlDsaSigner, MlDsaVerifier};
