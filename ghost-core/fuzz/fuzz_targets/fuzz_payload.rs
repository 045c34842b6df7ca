#![no_main]

//! Fuzz target for extracted payload parsing
//!
//! Exercises record parsing and the signing digest over arbitrary JSON to
//! find panics in the canonical serializer.
//!
//! Run with: cargo +nightly fuzz run fuzz_payload

use ghost_core::{signing_digest_of, CanonicalBytes, CertificateRecord, DigestAlgorithm};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(record) = CertificateRecord::from_payload(data) {
        // A parsed record must always be hashable
        let _ = record.signing_digest(DigestAlgorithm::Sha256);
        let _ = record.canonical_digest(DigestAlgorithm::Sha3_256);
    }

    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) {
        let _ = signing_digest_of(value.clone(), DigestAlgorithm::Sha256);
        if let Ok(canonical) = CanonicalBytes::from_value(&value) {
            // Canonical output is a fixed point
            let again = CanonicalBytes::from_json_str(
                std::str::from_utf8(canonical.as_bytes()).unwrap_or_default(),
            );
            if let Ok(again) = again {
                assert_eq!(again.as_bytes(), canonical.as_bytes());
            }
        }
    }
});
