use std::path::PathBuf;

use enough::StopReason;

use crate::pnm::PnmFormat;

/// Errors from buffer allocation, PNM decoding and encoding, and pattern generation.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AnymapError {
    #[error("invalid dimension: {0}")]
    InvalidDimension(String),

    #[error("unsupported max value {0} (8-bit samples require 1..=255)")]
    UnsupportedMaxValue(u32),

    #[error("unrecognized format magic bytes")]
    BadMagic,

    #[error("malformed header: {0}")]
    MalformedHeader(String),

    #[error("unexpected end of sample data")]
    TruncatedData,

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: String, actual: String },

    #[error("format mismatch: expected {expected:?}, got {actual:?}")]
    FormatMismatch {
        expected: PnmFormat,
        actual: PnmFormat,
    },

    #[error("sample value {value} exceeds max value {max_value}")]
    SampleOutOfRange { value: u32, max_value: u32 },

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("cannot derive output path from {0:?}")]
    InvalidOutputPath(PathBuf),

    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

impl From<StopReason> for AnymapError {
    fn from(r: StopReason) -> Self {
        AnymapError::Cancelled(r)
    }
}
