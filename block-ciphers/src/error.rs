//! Error types for block cipher and mode operations

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CipherError {
    #[error("Invalid key length: {actual} bytes (expected {expected})")]
    InvalidKeyLength { expected: &'static str, actual: usize },

    #[error("Invalid block size: {actual} bytes (expected {expected})")]
    InvalidBlockSize { expected: usize, actual: usize },

    #[error("Invalid IV: {actual} bytes (expected {expected})")]
    InvalidIv { expected: usize, actual: usize },

    #[error("Invalid ciphertext length: {actual} bytes is not a positive multiple of {block_size}")]
    InvalidCiphertextLength { block_size: usize, actual: usize },

    /// Deliberately opaque: the caller learns that unpadding failed, not why.
    #[error("Padding error")]
    PaddingError,

    #[error("Unsupported mode: {0}")]
    UnsupportedMode(String),

    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid hex input: {0}")]
    InvalidHex(String),

    #[error("Invalid base64 input: {0}")]
    InvalidBase64(String),
}

impl CipherError {
    /// True for failures detected while parsing textual input (hex/base64),
    /// as opposed to failures of the cipher itself.
    pub fn is_encoding_error(&self) -> bool {
        matches!(self, CipherError::InvalidHex(_) | CipherError::InvalidBase64(_))
    }
}

pub type Result<T> = std::result::Result<T, CipherError>;
