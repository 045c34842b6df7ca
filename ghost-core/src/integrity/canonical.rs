//! Canonical serialization and hashing of certificate records.
//!
//! Canonical form is compact JSON with object keys sorted byte-wise at every
//! nesting level. Arrays keep their order. Two records with the same content
//! produce the same bytes no matter how their keys were ordered or spaced.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::Sha256;
use sha3::{Digest, Sha3_256};

use crate::error::{GhostError, Result};

/// Digest applied to canonical bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DigestAlgorithm {
    /// SHA-256, the reference digest.
    #[default]
    #[serde(rename = "sha-256")]
    Sha256,
    #[serde(rename = "sha3-256")]
    Sha3_256,
}

impl DigestAlgorithm {
    /// Stable identifier, e.g. `sha-256`.
    pub fn identifier(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha-256",
            Self::Sha3_256 => "sha3-256",
        }
    }

    /// Hash `data` and return the raw digest.
    pub fn digest(&self, data: &[u8]) -> Vec<u8> {
        match self {
            Self::Sha256 => Sha256::digest(data).to_vec(),
            Self::Sha3_256 => Sha3_256::digest(data).to_vec(),
        }
    }

    /// Hash `data` and render the digest as lowercase hex.
    pub fn hex_digest(&self, data: &[u8]) -> String {
        hex::encode(self.digest(data))
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

impl FromStr for DigestAlgorithm {
    type Err = GhostError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sha-256" | "sha256" => Ok(Self::Sha256),
            "sha3-256" | "sha3_256" => Ok(Self::Sha3_256),
            other => Err(GhostError::InvalidConfig(format!(
                "unknown digest algorithm: {other}"
            ))),
        }
    }
}

/// Bytes produced by canonical serialization.
///
/// The inner buffer is private; `CanonicalBytes::new` is the only way to get
/// one, so every digest goes through the same serialization path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Canonicalize any serializable value.
    pub fn new(obj: &impl Serialize) -> Result<Self> {
        let value = serde_json::to_value(obj)?;
        Self::from_value(&value)
    }

    /// Canonicalize a JSON document given as text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<Self> {
        let mut out = Vec::new();
        write_canonical(value, &mut out)?;
        Ok(Self(out))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Digest of these bytes as lowercase hex.
    pub fn hash(&self, algorithm: DigestAlgorithm) -> String {
        algorithm.hex_digest(&self.0)
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Canonical hash of `record` as lowercase hex.
pub fn canonical_hash(record: &impl Serialize, algorithm: DigestAlgorithm) -> Result<String> {
    Ok(CanonicalBytes::new(record)?.hash(algorithm))
}

fn write_canonical(value: &Value, out: &mut Vec<u8>) -> Result<()> {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_unstable_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

            out.push(b'{');
            for (i, (key, val)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                serde_json::to_writer(&mut *out, key)?;
                out.push(b':');
                write_canonical(val, out)?;
            }
            out.push(b'}');
        }
        Value::Array(items) => {
            out.push(b'[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_canonical(item, out)?;
            }
            out.push(b']');
        }
        scalar => serde_json::to_writer(&mut *out, scalar)?,
    }
    Ok(())
}
