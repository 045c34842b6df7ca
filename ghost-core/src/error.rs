use thiserror::Error;

/// Default watermark marker written in front of every embedded payload.
pub const DEFAULT_MAGIC_HEADER: &[u8] = b"CERT:";

/// Default extraction safety bound, in bytes, before giving up on a terminator.
pub const DEFAULT_MAX_EXTRACT_LEN: usize = 5000;

#[derive(Error, Debug)]
pub enum GhostError {
    #[error("Capacity exceeded: frame needs {required_bits} bits, carrier has {available_bits}")]
    CapacityExceeded {
        required_bits: usize,
        available_bits: usize,
    },

    #[error("Payload too large: {len} bytes exceeds the extraction bound of {max} bytes")]
    PayloadTooLarge { len: usize, max: usize },

    #[error("Payload contains a NUL terminator byte at offset {position}")]
    PayloadContainsTerminator { position: usize },

    #[error("Invalid pixel buffer: {0}")]
    InvalidPixelBuffer(String),

    #[error("Image decode error: {0}")]
    ImageDecode(String),

    #[error("Image encode error: {0}")]
    ImageEncode(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Signature error: {0}")]
    SignatureError(String),

    #[error("Invalid certificate record: {0}")]
    InvalidRecord(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<serde_json::Error> for GhostError {
    fn from(err: serde_json::Error) -> Self {
        GhostError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GhostError>;
