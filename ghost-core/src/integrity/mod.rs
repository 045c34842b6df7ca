//! Canonical hashing and signature verification for certificate records.
//!
//! A verifier recomputes the canonical hash of the record it extracted and
//! hands it to a [`SignatureVerifier`]. The reference verifier is a
//! placeholder; ML-DSA-65 is available behind the `ml-dsa` feature.

mod canonical;
#[cfg(feature = "ml-dsa")]
mod mldsa;
mod signature;

pub use canonical::{canonical_hash, CanonicalBytes, DigestAlgorithm};
#[cfg(feature = "ml-dsa")]
pub use mldsa::{
    ExportedKeypair, MlDsaSigner, MlDsaVerifier, MLDSA65_PUBLIC_KEY_BYTES,
    MLDSA65_SECRET_KEY_BYTES, MLDSA65_SIGNATURE_BYTES,
};
pub use signature::{
    CredentialSigner, PlaceholderSigner, PlaceholderVerifier, SignatureVerifier,
    INVALID_SIGNATURE_SENTINEL, PLACEHOLDER_MIN_SIGNATURE_LEN,
};

/// Verify `signature` over `digest` with the given predicate.
pub fn verify(
    verifier: &dyn SignatureVerifier,
    digest: &str,
    signature: &str,
    issuer_key: &str,
) -> bool {
    verifier.verify(digest, signature, issuer_key)
}
