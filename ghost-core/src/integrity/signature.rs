//! Signature verification boundary.
//!
//! The integrity layer only knows the shape `(digest, signature, issuer_key)
//! -> bool`. Which scheme sits behind it is chosen by the caller.

use crate::error::Result;

/// Signature value the reference predicate always rejects.
pub const INVALID_SIGNATURE_SENTINEL: &str = "INVALID";

/// Signatures must be strictly longer than this to pass the reference predicate.
pub const PLACEHOLDER_MIN_SIGNATURE_LEN: usize = 10;

/// Checks a signature over a canonical digest.
///
/// Implementations must be thread-safe (`Send + Sync`).
pub trait SignatureVerifier: Send + Sync {
    /// Return true when `signature` is a valid signature of `digest` by `issuer_key`.
    fn verify(&self, digest: &str, signature: &str, issuer_key: &str) -> bool;

    /// Short scheme name for logs and reports.
    fn scheme(&self) -> &'static str;
}

impl<F> SignatureVerifier for F
where
    F: Fn(&str, &str, &str) -> bool + Send + Sync,
{
    fn verify(&self, digest: &str, signature: &str, issuer_key: &str) -> bool {
        self(digest, signature, issuer_key)
    }

    fn scheme(&self) -> &'static str {
        "custom"
    }
}

/// Produces signatures over canonical digests.
pub trait CredentialSigner: Send + Sync {
    /// Sign `digest` and return the signature in its textual form.
    fn sign(&self, digest: &str) -> Result<String>;

    /// Key identifier a verifier passes back as `issuer_key`.
    fn issuer_key(&self) -> String;

    fn scheme(&self) -> &'static str;
}

/// Reference predicate: accepts any signature longer than ten characters that
/// is not the `INVALID` sentinel.
///
/// WARNING: this performs no cryptography. The digest and key are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderVerifier;

impl SignatureVerifier for PlaceholderVerifier {
    fn verify(&self, _digest: &str, signature: &str, _issuer_key: &str) -> bool {
        signature.len() > PLACEHOLDER_MIN_SIGNATURE_LEN && signature != INVALID_SIGNATURE_SENTINEL
    }

    fn scheme(&self) -> &'static str {
        "placeholder"
    }
}

/// Emits the fixed demo signatures the placeholder predicate accepts.
///
/// WARNING: for demos and tests only.
#[derive(Debug, Clone, Default)]
pub struct PlaceholderSigner {
    issuer_did: String,
}

impl PlaceholderSigner {
    pub const MOCK_SIGNATURE: &'static str = "0x123456...mock_ecdsa_signature...";
    pub const MOCK_PQC_SIGNATURE: &'static str = "0x987654...mock_dilithium_signature...";

    pub fn new(issuer_did: impl Into<String>) -> Self {
        Self {
            issuer_did: issuer_did.into(),
        }
    }
}

impl CredentialSigner for PlaceholderSigner {
    fn sign(&self, _digest: &str) -> Result<String> {
        Ok(Self::MOCK_SIGNATURE.to_string())
    }

    fn issuer_key(&self) -> String {
        self.issuer_did.clone()
    }

    fn scheme(&self) -> &'static str {
        "placeholder"
    }
}
