//! Certificate records: the payload embedded in a credential image.
//!
//! Records are built and signed with [`CertificateBuilder`] and serialized as
//! canonical JSON before embedding.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{GhostError, Result};
use crate::integrity::{
    canonical_hash, CanonicalBytes, CredentialSigner, DigestAlgorithm, SignatureVerifier,
};

/// Field excluded from the value that gets signed.
pub const SIGNATURE_FIELD: &str = "signature";

/// Highest valid risk score.
pub const MAX_RISK_SCORE: u32 = 100;

/// A learner's credential, embedded in the certificate image.
///
/// Optional fields are omitted from the serialized form when absent. An
/// absent field and an explicit `null` hash differently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRecord {
    /// UUID of the credential
    pub id: String,
    /// DID of the issuing institution
    pub issuer_did: String,
    /// Canonical hash of the recipient's identifying data
    pub recipient_hash: String,
    /// RFC 3339 issue timestamp
    pub issue_date: String,
    pub course_name: String,
    /// Proctoring risk score, 0 (clean) to 100
    pub risk_score: u32,
    /// Signature over the canonical hash of the record without this field
    pub signature: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pqc_signature: Option<String>,
    /// Anchoring transaction hash
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
}

impl CertificateRecord {
    /// Canonical JSON bytes to embed in the carrier.
    pub fn to_payload(&self) -> Result<Vec<u8>> {
        Ok(CanonicalBytes::new(self)?.into_bytes())
    }

    /// Parse an extracted payload.
    pub fn from_payload(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| GhostError::InvalidRecord(e.to_string()))
    }

    /// Canonical hash of the full record, signature included.
    pub fn canonical_digest(&self, algorithm: DigestAlgorithm) -> Result<String> {
        canonical_hash(self, algorithm)
    }

    /// Canonical hash of the record without its `signature` field.
    pub fn signing_digest(&self, algorithm: DigestAlgorithm) -> Result<String> {
        let value = serde_json::to_value(self)?;
        signing_digest_of(value, algorithm)
    }

    /// Check `signature` against the signing digest.
    ///
    /// `issuer_key` defaults to the record's own `issuerDid`.
    pub fn verify_signature(
        &self,
        verifier: &dyn SignatureVerifier,
        issuer_key: Option<&str>,
        algorithm: DigestAlgorithm,
    ) -> Result<bool> {
        let digest = self.signing_digest(algorithm)?;
        let key = issuer_key.unwrap_or(self.issuer_did.as_str());
        Ok(verifier.verify(&digest, &self.signature, key))
    }
}

/// Signing digest of an arbitrary record value.
///
/// Hashes `value` exactly as given, minus its top-level `signature` key, so
/// fields unknown to [`CertificateRecord`] are still covered.
pub fn signing_digest_of(mut value: Value, algorithm: DigestAlgorithm) -> Result<String> {
    match value.as_object_mut() {
        Some(map) => {
            map.remove(SIGNATURE_FIELD);
        }
        None => {
            return Err(GhostError::InvalidRecord(
                "certificate record must be a JSON object".into(),
            ))
        }
    }
    canonical_hash(&value, algorithm)
}

/// Hash of learner-identifying input: the canonical hash of `{"name": name}`.
pub fn recipient_hash(name: &str, algorithm: DigestAlgorithm) -> Result<String> {
    canonical_hash(&serde_json::json!({ "name": name }), algorithm)
}

/// Builder for issuing signed [`CertificateRecord`]s.
pub struct CertificateBuilder {
    id: Option<String>,
    issuer_did: String,
    recipient_name: String,
    course_name: String,
    issue_date: Option<DateTime<Utc>>,
    risk_score: u32,
    pqc_signature: Option<String>,
    tx_hash: Option<String>,
    digest: DigestAlgorithm,
}

impl CertificateBuilder {
    pub fn new(
        issuer_did: impl Into<String>,
        recipient_name: impl Into<String>,
        course_name: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            issuer_did: issuer_did.into(),
            recipient_name: recipient_name.into(),
            course_name: course_name.into(),
            issue_date: None,
            risk_score: 0,
            pqc_signature: None,
            tx_hash: None,
            digest: DigestAlgorithm::default(),
        }
    }

    /// Use a fixed id instead of a random UUID.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Use a fixed issue date instead of now.
    pub fn with_issue_date(mut self, date: DateTime<Utc>) -> Self {
        self.issue_date = Some(date);
        self
    }

    pub fn with_risk_score(mut self, score: u32) -> Self {
        self.risk_score = score;
        self
    }

    pub fn with_pqc_signature(mut self, signature: impl Into<String>) -> Self {
        self.pqc_signature = Some(signature.into());
        self
    }

    pub fn with_tx_hash(mut self, tx_hash: impl Into<String>) -> Self {
        self.tx_hash = Some(tx_hash.into());
        self
    }

    pub fn with_digest(mut self, digest: DigestAlgorithm) -> Self {
        self.digest = digest;
        self
    }

    /// Build the record and sign its signing digest.
    pub fn build(self, signer: &dyn CredentialSigner) -> Result<CertificateRecord> {
        if self.recipient_name.trim().is_empty() {
            return Err(GhostError::InvalidRecord("recipient name is empty".into()));
        }
        if self.risk_score > MAX_RISK_SCORE {
            return Err(GhostError::InvalidRecord(format!(
                "risk score {} exceeds {MAX_RISK_SCORE}",
                self.risk_score
            )));
        }

        let id = self
            .id
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let issue_date = self
            .issue_date
            .unwrap_or_else(Utc::now)
            .to_rfc3339_opts(SecondsFormat::Millis, true);

        let mut record = CertificateRecord {
            id,
            issuer_did: self.issuer_did,
            recipient_hash: recipient_hash(&self.recipient_name, self.digest)?,
            issue_date,
            course_name: self.course_name,
            risk_score: self.risk_score,
            signature: String::new(),
            pqc_signature: self.pqc_signature,
            tx_hash: self.tx_hash,
        };

        let digest = record.signing_digest(self.digest)?;
        record.signature = signer.sign(&digest)?;

        debug!(
            id = %record.id,
            scheme = signer.scheme(),
            digest = &digest[..16],
            "Signed certificate record"
        );

        Ok(record)
    }
}
