//! Error types for the decode layer.

use thiserror::Error;

/// Errors that can occur while decoding a stored key or record value.
///
/// Each variant aborts the decode of the entry that produced it; callers
/// driving a scan are expected to record the failure and move on.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("input truncated at offset {offset}: {needed} more byte(s) needed")]
    TruncatedInput { offset: usize, needed: usize },

    #[error("varint at offset {offset} exceeds the 64-bit range")]
    VarintOverflow { offset: usize },

    #[error("key is {len} bytes, expected {expected} (1-byte prefix + 32-byte hash)")]
    InvalidKey { len: usize, expected: usize },

    #[error("record declared {expected} bytes but decoding consumed {actual}")]
    SizeMismatch { expected: usize, actual: usize },
}
