//! Capacity and configuration tests for the issue/verify pipeline.

use ghost_core::{
    issue_certificate, verify_certificate, CertificateBuilder, CredentialVerification,
    DigestAlgorithm, GhostConfig, LsbCodec, MlDsaSigner, MlDsaVerifier, OverflowPolicy,
    PixelBuffer, PlaceholderSigner, PlaceholderVerifier, DEFAULT_MAGIC_HEADER,
    DEFAULT_MAX_EXTRACT_LEN,
};

const ISSUER: &str = "did:ethr:0x1234567890abcdef1234567890abcdef12345678";
const TX_HASH: &str = "5VERv8NMvzbJMEkV8xnrLkEaWRtSz9CosKDYjCJjBRnbJLgp8uirBgmQpjKhoR4tjF3ZpRzrFmBV6UjKdiSZkQUW";

fn white(width: u32, height: u32) -> PixelBuffer {
    PixelBuffer::filled(width, height, [255, 255, 255, 255]).unwrap()
}

#[test]
fn test_mldsa_record_fits_extraction_bound() {
    let signer = MlDsaSigner::generate();
    let record = CertificateBuilder::new(ISSUER, "Ada Lovelace", "Applied Cryptography")
        .with_risk_score(12)
        .with_tx_hash(TX_HASH)
        .build(&signer)
        .unwrap();

    let payload = record.to_payload().unwrap();
    assert!(
        payload.len() <= DEFAULT_MAX_EXTRACT_LEN - DEFAULT_MAGIC_HEADER.len(),
        "Signed record is {} bytes",
        payload.len()
    );

    let config = GhostConfig::default();
    let stego = issue_certificate(&white(256, 256), &record, &config).unwrap();
    let key = signer.public_key_base64();
    let result = verify_certificate(&stego, &MlDsaVerifier, Some(&key), &config).unwrap();

    assert!(result.is_valid(), "{}", result.description());
    assert_eq!(result.record(), Some(&record));
}

#[test]
fn test_sha3_digest_end_to_end() {
    let signer = MlDsaSigner::generate();
    let key = signer.public_key_base64();

    let mut config = GhostConfig::default();
    config.integrity.digest = DigestAlgorithm::Sha3_256;

    let record = CertificateBuilder::new(ISSUER, "Grace Hopper", "Compilers")
        .with_digest(DigestAlgorithm::Sha3_256)
        .build(&signer)
        .unwrap();
    let stego = issue_certificate(&white(256, 256), &record, &config).unwrap();

    let result = verify_certificate(&stego, &MlDsaVerifier, Some(&key), &config).unwrap();
    assert!(result.is_valid());

    // Same image checked with the SHA-256 digest
    let sha256 = GhostConfig::default();
    let result = verify_certificate(&stego, &MlDsaVerifier, Some(&key), &sha256).unwrap();
    assert!(matches!(
        result,
        CredentialVerification::SignatureInvalid { .. }
    ));
}

#[test]
fn test_reject_policy_reports_capacity() {
    let record = CertificateBuilder::new(ISSUER, "Ada", "Rust")
        .build(&PlaceholderSigner::new(ISSUER))
        .unwrap();
    let carrier = white(32, 32);

    let err = issue_certificate(&carrier, &record, &GhostConfig::default()).unwrap_err();
    assert!(err.to_string().contains("Capacity exceeded"));
}

#[test]
fn test_truncate_policy_never_yields_a_watermark() {
    let record = CertificateBuilder::new(ISSUER, "Ada", "Rust")
        .build(&PlaceholderSigner::new(ISSUER))
        .unwrap();

    let mut config = GhostConfig::default();
    config.codec.overflow = OverflowPolicy::Truncate;

    let stego = issue_certificate(&white(32, 32), &record, &config).unwrap();
    let result = verify_certificate(&stego, &PlaceholderVerifier, None, &config).unwrap();

    assert_eq!(result, CredentialVerification::NoWatermark);
}

#[test]
fn test_capacity_matches_embeddable_payload() {
    let codec = LsbCodec::default();
    let carrier = white(64, 48);
    let max = codec.capacity(&carrier).unwrap();

    let fits = vec![b'x'; max];
    assert!(codec.embed(&carrier, &fits).is_ok());

    let too_big = vec![b'x'; max + 1];
    assert!(codec.embed(&carrier, &too_big).is_err());
}
