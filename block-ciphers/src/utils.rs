//! Utility functions: block XOR, hex/base64 codecs and key input helpers

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{CipherError, Result};

/// XOR `src` into `dst` in place; both slices have the cipher's block size.
pub(crate) fn xor_in_place(dst: &mut [u8], src: &[u8]) {
    for (d, s) in dst.iter_mut().zip(src) {
        *d ^= s;
    }
}

/// Decodes a hexadecimal string, ignoring all whitespace (spaces, newlines).
pub fn parse_hex(input: &str) -> Result<Vec<u8>> {
    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    hex::decode(&compact).map_err(|e| CipherError::InvalidHex(e.to_string()))
}

/// Lowercase hex encoding without separators
pub fn to_hex(data: &[u8]) -> String {
    hex::encode(data)
}

/// Standard (padded) base64 decoding, ignoring whitespace
pub fn parse_base64(input: &str) -> Result<Vec<u8>> {
    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| CipherError::InvalidBase64(e.to_string()))
}

pub fn to_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Textual representation of ciphertext at the API boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextFormat {
    #[default]
    Hex,
    Base64,
}

impl TextFormat {
    pub fn encode(self, data: &[u8]) -> String {
        match self {
            TextFormat::Hex => to_hex(data),
            TextFormat::Base64 => to_base64(data),
        }
    }

    pub fn decode(self, input: &str) -> Result<Vec<u8>> {
        match self {
            TextFormat::Hex => parse_hex(input),
            TextFormat::Base64 => parse_base64(input),
        }
    }
}

impl FromStr for TextFormat {
    type Err = CipherError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hex" => Ok(TextFormat::Hex),
            "b64" | "base64" => Ok(TextFormat::Base64),
            other => Err(CipherError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for TextFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextFormat::Hex => f.write_str("hex"),
            TextFormat::Base64 => f.write_str("base64"),
        }
    }
}

/// Uses the raw bytes of a passphrase directly as a key.
///
/// There is no key stretching here: the key has only as much entropy as the
/// passphrase itself. Kept for interoperability with tools that accept
/// "plaintext keys"; prefer random hex keys.
pub fn key_from_passphrase(passphrase: &str, allowed_lengths: &[usize]) -> Result<Vec<u8>> {
    let bytes = passphrase.as_bytes();
    if !allowed_lengths.contains(&bytes.len()) {
        let expected = match allowed_lengths {
            [8] => "8",
            [16, 24, 32] => "16, 24 or 32",
            _ => "a supported key size",
        };
        return Err(CipherError::InvalidKeyLength {
            expected,
            actual: bytes.len(),
        });
    }
    Ok(bytes.to_vec())
}
