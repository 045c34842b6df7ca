//! End-to-end workflow tests for ghost-cli.
//!
//! These tests verify complete user workflows involving multiple commands:
//! keygen, issue, verify and extract, plus the fragility of the watermark.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use image::{ImageBuffer, Rgb, Rgba, RgbaImage};
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Get a Command for the ghost binary.
fn ghost() -> Command {
    let mut cmd: Command = cargo_bin_cmd!("ghost").into();
    for var in [
        "GHOST_MAGIC_HEADER",
        "GHOST_MAX_EXTRACT_BYTES",
        "GHOST_DIGEST",
        "GHOST_OVERFLOW",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

/// Write a certificate-like carrier with gradients and a border.
fn write_carrier(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    let img: RgbaImage = ImageBuffer::from_fn(width, height, |x, y| {
        let border = x < 4 || y < 4 || x >= width - 4 || y >= height - 4;
        if border {
            Rgba([180, 150, 60, 255])
        } else {
            Rgba([
                (x * 255 / width) as u8,
                (y * 255 / height) as u8,
                ((x + y) * 200 / (width + height)) as u8,
                255,
            ])
        }
    });
    img.save(&path).unwrap();
    path
}

fn issue(carrier: &Path, extra: &[&str]) -> PathBuf {
    let mut args = vec![
        "issue",
        carrier.to_str().unwrap(),
        "--recipient",
        "Ada Lovelace",
        "--course",
        "Applied Cryptography",
    ];
    args.extend_from_slice(extra);
    ghost().args(&args).assert().success();

    let stem = carrier.file_stem().unwrap().to_str().unwrap();
    carrier.with_file_name(format!("{stem}.cert.png"))
}

// ============================================================================
// Complete Workflow Tests: Issue → Verify → Extract
// ============================================================================

#[test]
fn test_e2e_issue_verify_extract() {
    let temp = TempDir::new().unwrap();
    let carrier = write_carrier(temp.path(), "diploma.png", 160, 120);

    // Step 1: Issue
    let issued = issue(&carrier, &["--risk-score", "5", "--tx-hash", "0xfeed"]);
    assert!(issued.exists());

    // Step 2: Verify
    ghost()
        .args(["verify", issued.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("VALID"))
        .stdout(predicate::str::contains("INVALID").not())
        .stdout(predicate::str::contains("Applied Cryptography"))
        .stdout(predicate::str::contains("0xfeed"));

    // Step 3: Extract the raw payload
    let output = ghost()
        .args(["extract", issued.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success());

    let payload: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(payload["courseName"], "Applied Cryptography");
    assert_eq!(payload["riskScore"], 5);
    assert_eq!(payload["txHash"], "0xfeed");
    assert_eq!(
        payload["pqcSignature"],
        "0x987654...mock_dilithium_signature..."
    );
    // Only the hash of the learner's name is embedded
    assert!(!String::from_utf8_lossy(&output.stdout).contains("Ada Lovelace"));
}

#[test]
fn test_e2e_original_carrier_is_untouched() {
    let temp = TempDir::new().unwrap();
    let carrier = write_carrier(temp.path(), "diploma.png", 128, 128);
    let before = fs::read(&carrier).unwrap();

    issue(&carrier, &[]);

    assert_eq!(fs::read(&carrier).unwrap(), before);
}

#[test]
fn test_e2e_json_report() {
    let temp = TempDir::new().unwrap();
    let carrier = write_carrier(temp.path(), "diploma.png", 128, 128);
    let issued = issue(&carrier, &["--issuer-did", "did:ethr:0xabc"]);

    let output = ghost()
        .args(["--json", "verify", issued.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["isValid"], true);
    assert_eq!(report["integrity"]["stegoMatch"], true);
    assert_eq!(report["integrity"]["signatureValid"], true);
    assert_eq!(report["signatureScheme"], "placeholder");
    assert_eq!(report["digestAlgorithm"], "sha-256");
    assert_eq!(report["details"]["issuerDid"], "did:ethr:0xabc");
    assert_eq!(report["digest"].as_str().unwrap().len(), 64);
    assert!(report["error"].is_null());
}

#[test]
fn test_e2e_json_report_for_unmarked_image() {
    let temp = TempDir::new().unwrap();
    let carrier = write_carrier(temp.path(), "blank.png", 64, 64);

    let output = ghost()
        .args(["--json", "verify", carrier.to_str().unwrap()])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(65));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["isValid"], false);
    assert_eq!(report["integrity"]["stegoMatch"], false);
    assert!(report["details"].is_null());
}

// ============================================================================
// ML-DSA Keypair Workflow
// ============================================================================

#[test]
fn test_e2e_keygen_issue_verify_with_keypair() {
    let temp = TempDir::new().unwrap();
    let keypair = temp.path().join("issuer.key.json");
    let carrier = write_carrier(temp.path(), "diploma.png", 256, 256);

    ghost()
        .args(["keygen", "--output", keypair.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("ML-DSA-65"));

    let exported: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&keypair).unwrap()).unwrap();
    assert_eq!(exported["algorithm"], "ML-DSA-65");
    let public_key = exported["public_key"].as_str().unwrap().to_string();

    let issued = issue(&carrier, &["--keypair", keypair.to_str().unwrap()]);

    // Key taken from the keypair file
    ghost()
        .args([
            "verify",
            "--keypair",
            keypair.to_str().unwrap(),
            issued.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("ML-DSA-65"));

    // Key given directly
    ghost()
        .args(["verify", "--issuer-key", &public_key, issued.to_str().unwrap()])
        .assert()
        .success();
}

#[test]
fn test_e2e_wrong_issuer_key_is_rejected() {
    let temp = TempDir::new().unwrap();
    let issuer = temp.path().join("issuer.json");
    let impostor = temp.path().join("impostor.json");
    let carrier = write_carrier(temp.path(), "diploma.png", 256, 256);

    for path in [&issuer, &impostor] {
        ghost()
            .args(["--quiet", "keygen", "--output", path.to_str().unwrap()])
            .assert()
            .success();
    }

    let issued = issue(&carrier, &["--keypair", issuer.to_str().unwrap()]);

    ghost()
        .args([
            "verify",
            "--keypair",
            impostor.to_str().unwrap(),
            issued.to_str().unwrap(),
        ])
        .assert()
        .code(65)
        .stderr(predicate::str::contains("signature does not match"));
}

#[test]
fn test_e2e_keygen_refuses_overwrite() {
    let temp = TempDir::new().unwrap();
    let keypair = temp.path().join("issuer.json");
    fs::write(&keypair, b"existing").unwrap();

    ghost()
        .args(["keygen", "--output", keypair.to_str().unwrap()])
        .assert()
        .code(64)
        .stderr(predicate::str::contains("--force"));

    assert_eq!(fs::read(&keypair).unwrap(), b"existing");

    ghost()
        .args(["keygen", "--force", "--output", keypair.to_str().unwrap()])
        .assert()
        .success();
}

#[cfg(unix)]
#[test]
fn test_e2e_keygen_writes_owner_only_file() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let keypair = temp.path().join("issuer.json");

    ghost()
        .args(["--quiet", "keygen", "--output", keypair.to_str().unwrap()])
        .assert()
        .success();
    let mode = fs::metadata(&keypair).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600, "Secret key must not be group/world readable");

    // Overwriting a world-readable file narrows it as well
    fs::set_permissions(&keypair, fs::Permissions::from_mode(0o644)).unwrap();
    ghost()
        .args(["--quiet", "keygen", "--force", "--output", keypair.to_str().unwrap()])
        .assert()
        .success();
    let mode = fs::metadata(&keypair).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn test_e2e_missing_keypair_returns_input_error() {
    let temp = TempDir::new().unwrap();
    let carrier = write_carrier(temp.path(), "diploma.png", 256, 256);

    ghost()
        .args([
            "issue",
            carrier.to_str().unwrap(),
            "--recipient",
            "Ada",
            "--course",
            "Rust",
            "--keypair",
            temp.path().join("nope.json").to_str().unwrap(),
        ])
        .assert()
        .code(66)
        .stderr(predicate::str::contains("Failed to read keypair file"));
}

// ============================================================================
// Fragility: lossy re-encoding destroys the credential
// ============================================================================

#[test]
fn test_e2e_jpeg_reencode_destroys_watermark() {
    let temp = TempDir::new().unwrap();
    let carrier = write_carrier(temp.path(), "diploma.png", 160, 120);
    let issued = issue(&carrier, &[]);

    let reencoded = temp.path().join("diploma.cert.jpg");
    let rgb: ImageBuffer<Rgb<u8>, Vec<u8>> = image::open(&issued).unwrap().to_rgb8();
    rgb.save(&reencoded).unwrap();

    ghost()
        .args(["verify", reencoded.to_str().unwrap()])
        .assert()
        .code(65)
        .stdout(predicate::str::contains("INVALID"));
}

#[test]
fn test_e2e_single_pixel_edit_is_detected() {
    let temp = TempDir::new().unwrap();
    let carrier = write_carrier(temp.path(), "diploma.png", 160, 120);
    let issued = issue(&carrier, &[]);

    // Flip the blue LSB of the first pixel: header byte 'C' becomes 'C' ^ 0x80
    let mut img = image::open(&issued).unwrap().to_rgba8();
    img.get_pixel_mut(0, 0).0[2] ^= 1;
    img.save(&issued).unwrap();

    ghost()
        .args(["verify", issued.to_str().unwrap()])
        .assert()
        .code(65);
}

// ============================================================================
// Configuration through the environment
// ============================================================================

#[test]
fn test_e2e_custom_header_must_match() {
    let temp = TempDir::new().unwrap();
    let carrier = write_carrier(temp.path(), "diploma.png", 160, 120);

    ghost()
        .env("GHOST_MAGIC_HEADER", "GHOST1:")
        .args([
            "issue",
            carrier.to_str().unwrap(),
            "--recipient",
            "Ada",
            "--course",
            "Rust",
        ])
        .assert()
        .success();
    let issued = temp.path().join("diploma.cert.png");

    ghost()
        .env("GHOST_MAGIC_HEADER", "GHOST1:")
        .args(["verify", issued.to_str().unwrap()])
        .assert()
        .success();

    // Default header does not see the watermark
    ghost()
        .args(["verify", issued.to_str().unwrap()])
        .assert()
        .code(65);
}

#[test]
fn test_e2e_sha3_digest_with_keypair() {
    let temp = TempDir::new().unwrap();
    let keypair = temp.path().join("issuer.json");
    let carrier = write_carrier(temp.path(), "diploma.png", 256, 256);

    ghost()
        .args(["--quiet", "keygen", "--output", keypair.to_str().unwrap()])
        .assert()
        .success();

    ghost()
        .env("GHOST_DIGEST", "sha3-256")
        .args([
            "issue",
            carrier.to_str().unwrap(),
            "--recipient",
            "Ada",
            "--course",
            "Rust",
            "--keypair",
            keypair.to_str().unwrap(),
        ])
        .assert()
        .success();
    let issued = temp.path().join("diploma.cert.png");

    ghost()
        .env("GHOST_DIGEST", "sha3-256")
        .args([
            "verify",
            "--keypair",
            keypair.to_str().unwrap(),
            issued.to_str().unwrap(),
        ])
        .assert()
        .success();

    // Signed over the SHA3 digest, so SHA-256 verification fails
    ghost()
        .args([
            "verify",
            "--keypair",
            keypair.to_str().unwrap(),
            issued.to_str().unwrap(),
        ])
        .assert()
        .code(65);
}
