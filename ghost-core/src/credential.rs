//! Issue and verify pipelines tying the watermark codec to the integrity layer.
//!
//! Issuing: record → canonical payload → [`LsbCodec::embed`].
//! Verifying: [`LsbCodec::extract`] → parse → signing digest → signature check.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::certificate::{signing_digest_of, CertificateRecord};
use crate::config::GhostConfig;
use crate::error::Result;
use crate::integrity::SignatureVerifier;
use crate::watermark::{LsbCodec, PixelBuffer};

/// Embed `record` into a copy of `carrier`.
pub fn issue_certificate(
    carrier: &PixelBuffer,
    record: &CertificateRecord,
    config: &GhostConfig,
) -> Result<PixelBuffer> {
    let codec = LsbCodec::new(config.codec.clone())?;
    let payload = record.to_payload()?;

    info!(
        id = %record.id,
        payload_bytes = payload.len(),
        pixel_count = carrier.pixel_count(),
        "Issuing certificate"
    );

    codec.embed(carrier, &payload)
}

/// Outcome of verifying a certificate image.
#[derive(Debug, Clone, PartialEq)]
pub enum CredentialVerification {
    /// Watermark found and signature accepted.
    Authentic {
        record: CertificateRecord,
        digest: String,
    },
    /// Watermark found but the signature does not match the recomputed digest.
    SignatureInvalid {
        record: CertificateRecord,
        digest: String,
    },
    /// A watermark is present but its payload is not a certificate record.
    Corrupted { reason: String, payload: Vec<u8> },
    /// No watermark in the image.
    NoWatermark,
}

impl CredentialVerification {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Authentic { .. })
    }

    pub fn record(&self) -> Option<&CertificateRecord> {
        match self {
            Self::Authentic { record, .. } | Self::SignatureInvalid { record, .. } => Some(record),
            _ => None,
        }
    }

    pub fn digest(&self) -> Option<&str> {
        match self {
            Self::Authentic { digest, .. } | Self::SignatureInvalid { digest, .. } => {
                Some(digest)
            }
            _ => None,
        }
    }

    /// Human-readable description.
    pub fn description(&self) -> String {
        match self {
            Self::Authentic { .. } => "Credential is authentic".to_string(),
            Self::SignatureInvalid { .. } => {
                "Integrity check failed: signature does not match the credential".to_string()
            }
            Self::Corrupted { reason, .. } => format!("Watermark corrupted: {reason}"),
            Self::NoWatermark => {
                "No secure watermark found. File may be tampered.".to_string()
            }
        }
    }

    /// Flatten into a serializable report.
    pub fn to_report(&self, scheme: &str, config: &GhostConfig) -> VerificationReport {
        let stego_match = matches!(
            self,
            Self::Authentic { .. } | Self::SignatureInvalid { .. }
        );
        VerificationReport {
            is_valid: self.is_valid(),
            integrity: IntegrityChecks {
                stego_match,
                signature_valid: self.is_valid(),
            },
            signature_scheme: scheme.to_string(),
            digest_algorithm: config.integrity.digest.identifier().to_string(),
            digest: self.digest().map(str::to_string),
            details: self.record().cloned(),
            error: (!self.is_valid()).then(|| self.description()),
        }
    }
}

/// Individual checks behind a verification result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrityChecks {
    /// A well-formed certificate record was recovered from the image
    pub stego_match: bool,
    pub signature_valid: bool,
}

/// Serializable verification result for CLI and Wasm consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationReport {
    pub is_valid: bool,
    pub integrity: IntegrityChecks,
    pub signature_scheme: String,
    pub digest_algorithm: String,
    pub digest: Option<String>,
    pub details: Option<CertificateRecord>,
    pub error: Option<String>,
}

/// Extract, parse and check the certificate embedded in `stego`.
///
/// `issuer_key` overrides the key handed to `verifier`; by default the
/// record's `issuerDid` is used. Only an invalid configuration is an error;
/// every verification outcome is a [`CredentialVerification`] value.
pub fn verify_certificate(
    stego: &PixelBuffer,
    verifier: &dyn SignatureVerifier,
    issuer_key: Option<&str>,
    config: &GhostConfig,
) -> Result<CredentialVerification> {
    let codec = LsbCodec::new(config.codec.clone())?;

    let Some(payload) = codec.extract(stego) else {
        info!("No watermark found");
        return Ok(CredentialVerification::NoWatermark);
    };

    let value: Value = match serde_json::from_slice(&payload) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "Watermark payload is not JSON");
            return Ok(CredentialVerification::Corrupted {
                reason: e.to_string(),
                payload,
            });
        }
    };

    let record: CertificateRecord = match serde_json::from_value(value.clone()) {
        Ok(record) => record,
        Err(e) => {
            warn!(error = %e, "Watermark payload is not a certificate record");
            return Ok(CredentialVerification::Corrupted {
                reason: e.to_string(),
                payload,
            });
        }
    };

    // Hash the payload as extracted so unknown fields and explicit nulls count
    let digest = signing_digest_of(value, config.integrity.digest)?;
    let key = issuer_key.unwrap_or(record.issuer_did.as_str());
    let signature_valid = verifier.verify(&digest, &record.signature, key);

    debug!(
        id = %record.id,
        scheme = verifier.scheme(),
        digest_algorithm = %config.integrity.digest,
        signature_valid,
        "Checked credential signature"
    );

    if signature_valid {
        info!(id = %record.id, "Credential authentic");
        Ok(CredentialVerification::Authentic { record, digest })
    } else {
        warn!(id = %record.id, "Credential signature rejected");
        Ok(CredentialVerification::SignatureInvalid { record, digest })
    }
}
