//! ML-DSA-65 (FIPS 204) signer and verifier for credential digests.
//!
//! Signatures are detached, computed over the UTF-8 bytes of the hex digest
//! and base64 encoded so a signed record still fits under the default
//! extraction bound. The issuer key is the base64 encoded public key.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use pqcrypto_mldsa::mldsa65;
use pqcrypto_traits::sign::{DetachedSignature as _, PublicKey as _, SecretKey as _};
use serde::{Deserialize, Serialize};
use tracing::debug;
use zeroize::Zeroizing;

use super::signature::{CredentialSigner, SignatureVerifier};
use crate::error::{GhostError, Result};

/// Expected size of an ML-DSA-65 public key in bytes.
pub const MLDSA65_PUBLIC_KEY_BYTES: usize = 1952;

/// Expected size of an ML-DSA-65 secret key in bytes.
pub const MLDSA65_SECRET_KEY_BYTES: usize = 4032;

/// Expected size of an ML-DSA-65 detached signature in bytes.
pub const MLDSA65_SIGNATURE_BYTES: usize = 3309;

/// Base64 encoded keypair, as written to disk by the CLI.
#[derive(Clone, Serialize, Deserialize)]
pub struct ExportedKeypair {
    pub algorithm: String,
    pub public_key: String,
    pub secret_key: String,
}

impl std::fmt::Debug for ExportedKeypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportedKeypair")
            .field("algorithm", &self.algorithm)
            .field("public_key", &self.public_key)
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}

/// ML-DSA-65 credential signer.
///
/// The secret key bytes are wiped from memory on drop.
pub struct MlDsaSigner {
    public_key: mldsa65::PublicKey,
    secret_key: Zeroizing<Vec<u8>>,
}

impl MlDsaSigner {
    pub const ALGORITHM: &'static str = "ML-DSA-65";

    /// Generate a fresh keypair.
    pub fn generate() -> Self {
        let (public_key, secret_key) = mldsa65::keypair();
        Self {
            public_key,
            secret_key: Zeroizing::new(secret_key.as_bytes().to_vec()),
        }
    }

    /// Rebuild a signer from raw key bytes.
    pub fn from_bytes(public_key: &[u8], secret_key: &[u8]) -> Result<Self> {
        let public_key = mldsa65::PublicKey::from_bytes(public_key).map_err(|_| {
            GhostError::SignatureError(format!(
                "Invalid public key: expected {MLDSA65_PUBLIC_KEY_BYTES} bytes, got {}",
                public_key.len()
            ))
        })?;
        mldsa65::SecretKey::from_bytes(secret_key).map_err(|_| {
            GhostError::SignatureError(format!(
                "Invalid secret key: expected {MLDSA65_SECRET_KEY_BYTES} bytes, got {}",
                secret_key.len()
            ))
        })?;

        Ok(Self {
            public_key,
            secret_key: Zeroizing::new(secret_key.to_vec()),
        })
    }

    /// Rebuild a signer from its base64 export.
    pub fn from_exported(exported: &ExportedKeypair) -> Result<Self> {
        if exported.algorithm != Self::ALGORITHM {
            return Err(GhostError::SignatureError(format!(
                "Unsupported key algorithm: {}",
                exported.algorithm
            )));
        }
        let public_key = BASE64
            .decode(&exported.public_key)
            .map_err(|e| GhostError::SignatureError(format!("Invalid public key encoding: {e}")))?;
        let secret_key = Zeroizing::new(
            BASE64
                .decode(&exported.secret_key)
                .map_err(|e| GhostError::SignatureError(format!("Invalid secret key encoding: {e}")))?,
        );
        Self::from_bytes(&public_key, &secret_key)
    }

    pub fn export(&self) -> ExportedKeypair {
        ExportedKeypair {
            algorithm: Self::ALGORITHM.to_string(),
            public_key: self.public_key_base64(),
            secret_key: BASE64.encode(self.secret_key.as_slice()),
        }
    }

    pub fn public_key_base64(&self) -> String {
        BASE64.encode(self.public_key.as_bytes())
    }
}

impl CredentialSigner for MlDsaSigner {
    fn sign(&self, digest: &str) -> Result<String> {
        let secret_key = mldsa65::SecretKey::from_bytes(&self.secret_key)
            .map_err(|_| GhostError::SignatureError("Invalid secret key".into()))?;
        let signature = mldsa65::detached_sign(digest.as_bytes(), &secret_key);
        Ok(BASE64.encode(signature.as_bytes()))
    }

    fn issuer_key(&self) -> String {
        self.public_key_base64()
    }

    fn scheme(&self) -> &'static str {
        Self::ALGORITHM
    }
}

/// ML-DSA-65 verifier: `issuer_key` and `signature` are base64 strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct MlDsaVerifier;

impl SignatureVerifier for MlDsaVerifier {
    fn verify(&self, digest: &str, signature: &str, issuer_key: &str) -> bool {
        let Ok(key_bytes) = BASE64.decode(issuer_key) else {
            debug!("Issuer key is not valid base64");
            return false;
        };
        let Ok(sig_bytes) = BASE64.decode(signature) else {
            debug!("Signature is not valid base64");
            return false;
        };
        let Ok(public_key) = mldsa65::PublicKey::from_bytes(&key_bytes) else {
            debug!(len = key_bytes.len(), "Issuer key has wrong length");
            return false;
        };
        let Ok(signature) = mldsa65::DetachedSignature::from_bytes(&sig_bytes) else {
            debug!(len = sig_bytes.len(), "Signature has wrong length");
            return false;
        };

        mldsa65::verify_detached_signature(&signature, digest.as_bytes(), &public_key).is_ok()
    }

    fn scheme(&self) -> &'static str {
        MlDsaSigner::ALGORITHM
    }
}
