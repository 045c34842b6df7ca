//! WebAssembly bindings for Ghost credential verification.
//!
//! This module provides client-side verification of watermarked certificate
//! images directly in the browser without uploading them to a server.

use ghost_core::{
    canonical_hash, verify_certificate, DigestAlgorithm, GhostConfig, IntegrityChecks,
    LsbCodec, PixelBuffer, PlaceholderVerifier, SignatureVerifier, VerificationReport,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Verify the credential embedded in an encoded image (PNG recommended).
///
/// # Arguments
/// * `image_bytes` - The certificate image file content
///
/// # Returns
/// A JSON string with the verification report (camelCase fields:
/// `isValid`, `integrity`, `details`, `error`, ...)
#[wasm_bindgen]
pub fn verify_certificate_wasm(image_bytes: &[u8]) -> String {
    let config = GhostConfig::default();
    let verifier = PlaceholderVerifier;

    let report = match verify_internal(image_bytes, &verifier, &config) {
        Ok(report) => report,
        Err(e) => failed_report(verifier.scheme(), &config, e),
    };

    to_json(&report)
}

fn verify_internal(
    image_bytes: &[u8],
    verifier: &dyn SignatureVerifier,
    config: &GhostConfig,
) -> Result<VerificationReport, String> {
    let stego = PixelBuffer::decode(image_bytes).map_err(|e| e.to_string())?;
    let result = verify_certificate(&stego, verifier, None, config)
        .map_err(|e| format!("Verification error: {}", e))?;
    Ok(result.to_report(verifier.scheme(), config))
}

fn failed_report(scheme: &str, config: &GhostConfig, error: String) -> VerificationReport {
    VerificationReport {
        is_valid: false,
        integrity: IntegrityChecks {
            stego_match: false,
            signature_valid: false,
        },
        signature_scheme: scheme.to_string(),
        digest_algorithm: config.integrity.digest.identifier().to_string(),
        digest: None,
        details: None,
        error: Some(error),
    }
}

fn to_json(value: &impl Serialize) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        format!(
            r#"{{"isValid":false,"error":"Serialization error: {}"}}"#,
            e.to_string().replace('"', "'")
        )
    })
}

/// Return the raw embedded payload as text, or `undefined` if there is none.
#[wasm_bindgen]
pub fn extract_payload_wasm(image_bytes: &[u8]) -> Option<String> {
    let stego = PixelBuffer::decode(image_bytes).ok()?;
    let payload = LsbCodec::default().extract(&stego)?;
    Some(String::from_utf8_lossy(&payload).into_owned())
}

/// Canonical SHA-256 hash of a JSON document, as hex.
///
/// Returns `undefined` if `json` does not parse.
#[wasm_bindgen]
pub fn canonical_hash_wasm(json: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(json).ok()?;
    canonical_hash(&value, DigestAlgorithm::Sha256).ok()
}

/// Get the library version.
#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ghost_core::{issue_certificate, CertificateBuilder, PlaceholderSigner};

    const ISSUER: &str = "did:ethr:0x1234567890abcdef1234567890abcdef12345678";

    fn issued_png() -> Vec<u8> {
        let record = CertificateBuilder::new(ISSUER, "Ada Lovelace", "Applied Cryptography")
            .with_risk_score(5)
            .build(&PlaceholderSigner::new(ISSUER))
            .unwrap();
        let carrier = PixelBuffer::filled(128, 128, [255, 255, 255, 255]).unwrap();
        issue_certificate(&carrier, &record, &GhostConfig::default())
            .unwrap()
            .encode_png()
            .unwrap()
    }

    #[test]
    fn test_verify_issued_image() {
        let json = verify_certificate_wasm(&issued_png());
        let report: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(report["isValid"], true);
        assert_eq!(report["integrity"]["stegoMatch"], true);
        assert_eq!(report["details"]["courseName"], "Applied Cryptography");
        assert_eq!(report["details"]["riskScore"], 5);
    }

    #[test]
    fn test_verify_unmarked_image() {
        let blank = PixelBuffer::filled(64, 64, [0, 0, 0, 255])
            .unwrap()
            .encode_png()
            .unwrap();
        let report: serde_json::Value =
            serde_json::from_str(&verify_certificate_wasm(&blank)).unwrap();

        assert_eq!(report["isValid"], false);
        assert_eq!(report["integrity"]["stegoMatch"], false);
        assert!(report["error"]
            .as_str()
            .unwrap()
            .contains("No secure watermark found"));
    }

    #[test]
    fn test_verify_garbage_bytes() {
        let report: serde_json::Value =
            serde_json::from_str(&verify_certificate_wasm(b"not an image")).unwrap();

        assert_eq!(report["isValid"], false);
        assert!(report["error"].as_str().unwrap().contains("decode"));
    }

    #[test]
    fn test_extract_payload() {
        let payload = extract_payload_wasm(&issued_png()).unwrap();
        assert!(payload.starts_with('{'));
        assert!(payload.contains("\"issuerDid\""));

        assert_eq!(extract_payload_wasm(b"not an image"), None);
    }

    #[test]
    fn test_canonical_hash_ignores_key_order() {
        let a = canonical_hash_wasm(r#"{"b":1,"a":2}"#).unwrap();
        let b = canonical_hash_wasm(r#"{ "a": 2, "b": 1 }"#).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            canonical_hash_wasm("{}").unwrap(),
            "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
        );
        assert_eq!(canonical_hash_wasm("{"), None);
    }
}
