//! Codec and integrity configuration.
//!
//! Handles loading configuration from environment variables with sensible defaults.

use crate::error::{GhostError, Result, DEFAULT_MAGIC_HEADER, DEFAULT_MAX_EXTRACT_LEN};
use crate::integrity::DigestAlgorithm;

/// What `embed` does when the frame does not fit in the carrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Fail with `CapacityExceeded` before touching any pixel.
    #[default]
    Reject,
    /// Write as many bits as fit and drop the rest. The terminator is lost,
    /// so the result never extracts as a watermark.
    Truncate,
}

impl std::str::FromStr for OverflowPolicy {
    type Err = GhostError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "truncate" => Ok(Self::Truncate),
            other => Err(GhostError::InvalidConfig(format!(
                "unknown overflow policy: {other}"
            ))),
        }
    }
}

/// Framing parameters shared by `embed` and `extract`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecConfig {
    /// Marker bytes identifying a valid watermark (default: `CERT:`)
    pub magic_header: Vec<u8>,
    /// Maximum bytes accumulated by `extract` before giving up (default: 5000)
    pub max_extract_len: usize,
    /// Behavior when a frame exceeds carrier capacity (default: reject)
    pub overflow: OverflowPolicy,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            magic_header: DEFAULT_MAGIC_HEADER.to_vec(),
            max_extract_len: DEFAULT_MAX_EXTRACT_LEN,
            overflow: OverflowPolicy::Reject,
        }
    }
}

impl CodecConfig {
    /// Check the invariants `embed` and `extract` rely on.
    pub fn validate(&self) -> Result<()> {
        if self.magic_header.is_empty() {
            return Err(GhostError::InvalidConfig(
                "magic header must not be empty".into(),
            ));
        }
        if let Some(position) = self.magic_header.iter().position(|&b| b == 0) {
            return Err(GhostError::InvalidConfig(format!(
                "magic header contains NUL at offset {position}"
            )));
        }
        if self.max_extract_len < self.magic_header.len() {
            return Err(GhostError::InvalidConfig(format!(
                "extraction bound {} is shorter than the {}-byte magic header",
                self.max_extract_len,
                self.magic_header.len()
            )));
        }
        Ok(())
    }
}

/// Integrity layer parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IntegrityConfig {
    /// Digest used by `canonical_hash` (default: SHA-256)
    pub digest: DigestAlgorithm,
}

/// Complete configuration for issuing and verifying credentials.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GhostConfig {
    pub codec: CodecConfig,
    pub integrity: IntegrityConfig,
}

impl GhostConfig {
    /// Load configuration from environment variables.
    ///
    /// - `GHOST_MAGIC_HEADER`: watermark marker (default `CERT:`)
    /// - `GHOST_MAX_EXTRACT_BYTES`: extraction bound (default 5000)
    /// - `GHOST_DIGEST`: `sha-256` or `sha3-256` (default `sha-256`)
    /// - `GHOST_OVERFLOW`: `reject` or `truncate` (default `reject`)
    ///
    /// Unparseable values fall back to their defaults.
    pub fn from_env() -> Self {
        let defaults = CodecConfig::default();

        let magic_header = std::env::var("GHOST_MAGIC_HEADER")
            .ok()
            .filter(|h| !h.is_empty())
            .map(String::into_bytes)
            .unwrap_or(defaults.magic_header);

        let max_extract_len = std::env::var("GHOST_MAX_EXTRACT_BYTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.max_extract_len);

        let overflow = std::env::var("GHOST_OVERFLOW")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_default();

        let digest = std::env::var("GHOST_DIGEST")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_default();

        Self {
            codec: CodecConfig {
                magic_header,
                max_extract_len,
                overflow,
            },
            integrity: IntegrityConfig { digest },
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.codec.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GhostConfig::default();
        assert_eq!(config.codec.magic_header, b"CERT:");
        assert_eq!(config.codec.max_extract_len, 5000);
        assert_eq!(config.codec.overflow, OverflowPolicy::Reject);
        assert_eq!(config.integrity.digest, DigestAlgorithm::Sha256);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_header() {
        let config = CodecConfig {
            magic_header: Vec::new(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(GhostError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_rejects_nul_in_header() {
        let config = CodecConfig {
            magic_header: b"CE\0RT".to_vec(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bound_below_header() {
        let config = CodecConfig {
            max_extract_len: 3,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overflow_policy_parse() {
        assert_eq!("reject".parse::<OverflowPolicy>().unwrap(), OverflowPolicy::Reject);
        assert_eq!(
            " Truncate ".parse::<OverflowPolicy>().unwrap(),
            OverflowPolicy::Truncate
        );
        assert!("drop".parse::<OverflowPolicy>().is_err());
    }
}
