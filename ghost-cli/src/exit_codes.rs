//! Exit codes following sysexits.h conventions.
//!
//! These codes provide semantic meaning for different failure modes,
//! enabling scripts and CI systems to handle errors appropriately.

use ghost_core::GhostError;

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// General error (catch-all).
pub const GENERAL_ERROR: i32 = 1;

/// Command line usage error (invalid arguments, bad configuration).
/// Maps to EX_USAGE from sysexits.h.
pub const USAGE_ERROR: i32 = 64;

/// Data format error (no watermark, invalid signature, corrupted payload).
/// Maps to EX_DATAERR from sysexits.h.
pub const VERIFICATION_FAILED: i32 = 65;

/// Cannot open input file.
/// Maps to EX_NOINPUT from sysexits.h.
pub const INPUT_ERROR: i32 = 66;

/// I/O error (cannot write output file).
/// Maps to EX_IOERR from sysexits.h.
pub const IO_ERROR: i32 = 74;

/// Represents an exit code with optional error context.
#[derive(Debug)]
pub struct ExitCode {
    pub code: i32,
    pub message: Option<String>,
}

impl ExitCode {
    pub const fn success() -> Self {
        Self {
            code: SUCCESS,
            message: None,
        }
    }

    pub fn error(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: Some(message.into()),
        }
    }

    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        let message = format!("{err:#}");

        let config_error = err.chain().any(|cause| {
            matches!(
                cause.downcast_ref::<GhostError>(),
                Some(GhostError::InvalidConfig(_))
            )
        });

        // Classify error by inspecting the chain
        let code = if message.contains("Failed to read file")
            || message.contains("Failed to read keypair")
        {
            INPUT_ERROR
        } else if message.contains("Failed to write") {
            IO_ERROR
        } else if message.contains("Verification failed") || message.contains("No watermark") {
            VERIFICATION_FAILED
        } else if config_error
            || message.contains("Invalid configuration")
            || message.contains("Output must be")
            || message.contains("already exists")
        {
            USAGE_ERROR
        } else {
            GENERAL_ERROR
        };

        Self::error(code, message)
    }
}
