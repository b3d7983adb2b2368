//! Byte- and text-level entry points for AES and DES
//!
//! Mirrors the `encrypt(plaintext, key, mode, iv?) -> (ciphertext, iv_used)`
//! and `decrypt(ciphertext, key, mode, iv) -> plaintext` contract for both
//! algorithms. Keys are validated and expanded once per call.

use std::fmt;
use std::str::FromStr;

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use tracing::debug;

use crate::aes::Aes;
use crate::des::Des;
use crate::error::{CipherError, Result};
use crate::modes::{CipherModes, Encrypted, Mode};
use crate::utils::TextFormat;

/// Block cipher family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Aes,
    Des,
}

impl Algorithm {
    pub fn block_size(self) -> usize {
        match self {
            Algorithm::Aes => crate::aes::BLOCK_SIZE,
            Algorithm::Des => crate::des::BLOCK_SIZE,
        }
    }

    pub fn key_sizes(self) -> &'static [usize] {
        match self {
            Algorithm::Aes => &crate::aes::KEY_SIZES,
            Algorithm::Des => &[crate::des::KEY_SIZE],
        }
    }

    /// Encrypts with a fresh IV from the OS random source when CBC is used
    /// without one.
    pub fn encrypt(self, plaintext: &[u8], key: &[u8], mode: Mode, iv: Option<&[u8]>) -> Result<Encrypted> {
        self.encrypt_with_rng(plaintext, key, mode, iv, &mut OsRng)
    }

    pub fn encrypt_with_rng<R: RngCore + CryptoRng>(
        self,
        plaintext: &[u8],
        key: &[u8],
        mode: Mode,
        iv: Option<&[u8]>,
        rng: &mut R,
    ) -> Result<Encrypted> {
        debug!(algorithm = %self, %mode, bytes = plaintext.len(), "encrypting");
        match self {
            Algorithm::Aes => CipherModes::encrypt(&Aes::new(key)?, plaintext, mode, iv, rng),
            Algorithm::Des => CipherModes::encrypt(&Des::new(key)?, plaintext, mode, iv, rng),
        }
    }

    pub fn decrypt(self, ciphertext: &[u8], key: &[u8], mode: Mode, iv: Option<&[u8]>) -> Result<Vec<u8>> {
        debug!(algorithm = %self, %mode, bytes = ciphertext.len(), "decrypting");
        match self {
            Algorithm::Aes => CipherModes::decrypt(&Aes::new(key)?, ciphertext, mode, iv),
            Algorithm::Des => CipherModes::decrypt(&Des::new(key)?, ciphertext, mode, iv),
        }
    }

    /// Encrypts and renders the ciphertext as hex or base64.
    pub fn encrypt_to_text(
        self,
        plaintext: &[u8],
        key: &[u8],
        mode: Mode,
        iv: Option<&[u8]>,
        format: TextFormat,
    ) -> Result<(String, Option<Vec<u8>>)> {
        let Encrypted { ciphertext, iv } = self.encrypt(plaintext, key, mode, iv)?;
        Ok((format.encode(&ciphertext), iv))
    }

    /// Decodes hex or base64 ciphertext and decrypts it. Decoding failures
    /// surface as `InvalidHex`/`InvalidBase64` before any cipher work.
    pub fn decrypt_from_text(
        self,
        ciphertext: &str,
        key: &[u8],
        mode: Mode,
        iv: Option<&[u8]>,
        format: TextFormat,
    ) -> Result<Vec<u8>> {
        let raw = format.decode(ciphertext)?;
        self.decrypt(&raw, key, mode, iv)
    }
}

impl FromStr for Algorithm {
    type Err = CipherError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AES" => Ok(Algorithm::Aes),
            "DES" => Ok(Algorithm::Des),
            other => Err(CipherError::UnsupportedAlgorithm(other.to_string())),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Aes => f.write_str("AES"),
            Algorithm::Des => f.write_str("DES"),
        }
    }
}

/// AES (128/192/256 by key length) under ECB or CBC
pub fn aes_encrypt(plaintext: &[u8], key: &[u8], mode: Mode, iv: Option<&[u8]>) -> Result<Encrypted> {
    Algorithm::Aes.encrypt(plaintext, key, mode, iv)
}

pub fn aes_decrypt(ciphertext: &[u8], key: &[u8], mode: Mode, iv: Option<&[u8]>) -> Result<Vec<u8>> {
    Algorithm::Aes.decrypt(ciphertext, key, mode, iv)
}

/// DES under ECB or CBC
pub fn des_encrypt(plaintext: &[u8], key: &[u8], mode: Mode, iv: Option<&[u8]>) -> Result<Encrypted> {
    Algorithm::Des.encrypt(plaintext, key, mode, iv)
}

pub fn des_decrypt(ciphertext: &[u8], key: &[u8], mode: Mode, iv: Option<&[u8]>) -> Result<Vec<u8>> {
    Algorithm::Des.decrypt(ciphertext, key, mode, iv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_cbc_generates_iv_when_missing() {
        let encrypted = aes_encrypt(b"secret", &[1u8; 16], Mode::Cbc, None).unwrap();
        let iv = encrypted.iv.expect("CBC must report the IV it used");
        assert_eq!(iv.len(), 16);
        let decrypted = aes_decrypt(&encrypted.ciphertext, &[1u8; 16], Mode::Cbc, Some(&iv)).unwrap();
        assert_eq!(decrypted, b"secret");
    }

    #[test]
    fn test_seeded_rng_gives_reproducible_iv() {
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        let x = Algorithm::Des.encrypt_with_rng(b"data", &[3u8; 8], Mode::Cbc, None, &mut a).unwrap();
        let y = Algorithm::Des.encrypt_with_rng(b"data", &[3u8; 8], Mode::Cbc, None, &mut b).unwrap();
        assert_eq!(x, y);
    }

    #[test]
    fn test_ecb_reports_no_iv() {
        let encrypted = des_encrypt(b"data", &[3u8; 8], Mode::Ecb, Some(&[0u8; 8])).unwrap();
        assert!(encrypted.iv.is_none());
    }

    #[test]
    fn test_cbc_decrypt_requires_iv() {
        let encrypted = des_encrypt(b"data", &[3u8; 8], Mode::Cbc, None).unwrap();
        assert_eq!(
            des_decrypt(&encrypted.ciphertext, &[3u8; 8], Mode::Cbc, None),
            Err(CipherError::InvalidIv { expected: 8, actual: 0 })
        );
    }

    #[test]
    fn test_text_roundtrip_base64() {
        let (text, iv) = Algorithm::Aes
            .encrypt_to_text(b"payload", &[9u8; 24], Mode::Cbc, Some(&[0u8; 16]), TextFormat::Base64)
            .unwrap();
        assert_eq!(iv, Some(vec![0u8; 16]));
        let plain = Algorithm::Aes
            .decrypt_from_text(&text, &[9u8; 24], Mode::Cbc, Some(&[0u8; 16]), TextFormat::Base64)
            .unwrap();
        assert_eq!(plain, b"payload");
    }

    #[test]
    fn test_malformed_hex_is_not_a_cipher_error() {
        let err = Algorithm::Aes
            .decrypt_from_text("not hex", &[0u8; 16], Mode::Ecb, None, TextFormat::Hex)
            .unwrap_err();
        assert!(err.is_encoding_error());
    }

    #[test]
    fn test_algorithm_parsing() {
        assert_eq!("aes".parse::<Algorithm>().unwrap(), Algorithm::Aes);
        assert_eq!(Algorithm::Des.key_sizes(), &[8]);
        assert_eq!(Algorithm::Aes.block_size(), 16);
    }
}
