//! Cipher modes implementation

pub mod cbc;
pub mod ecb;

use std::fmt;
use std::str::FromStr;

use rand::{CryptoRng, RngCore};

use crate::cipher::BlockCipher;
use crate::error::{CipherError, Result};
use crate::utils::parse_hex;

/// Main struct for cipher modes
pub struct CipherModes;

/// Mode of operation, parsed once at the API boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Electronic Code Book: blocks encrypted independently, no IV
    Ecb,
    /// Cipher Block Chaining: each block XORed with the previous ciphertext
    Cbc,
}

impl Mode {
    pub fn requires_iv(self) -> bool {
        matches!(self, Mode::Cbc)
    }

    /// Decodes a hex IV given on the command line.
    ///
    /// Modes without an IV reject one instead of silently dropping it, so
    /// `ECB` with an IV is reported as `InvalidIv { expected: 0, .. }`.
    pub fn parse_iv(self, iv: Option<&str>) -> Result<Option<Vec<u8>>> {
        let iv = iv.map(parse_hex).transpose()?;
        match iv {
            Some(bytes) if !self.requires_iv() => Err(CipherError::InvalidIv {
                expected: 0,
                actual: bytes.len(),
            }),
            iv => Ok(iv),
        }
    }
}

impl FromStr for Mode {
    type Err = CipherError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ECB" => Ok(Mode::Ecb),
            "CBC" => Ok(Mode::Cbc),
            other => Err(CipherError::UnsupportedMode(other.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Ecb => f.write_str("ECB"),
            Mode::Cbc => f.write_str("CBC"),
        }
    }
}

/// Result of an encryption: the ciphertext and the IV actually used
/// (`None` for ECB).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encrypted {
    pub ciphertext: Vec<u8>,
    pub iv: Option<Vec<u8>>,
}

impl CipherModes {
    /// Validate IV length for modes that require it
    pub fn validate_iv_length(iv: &[u8], block_size: usize) -> Result<()> {
        if iv.len() != block_size {
            Err(CipherError::InvalidIv {
                expected: block_size,
                actual: iv.len(),
            })
        } else {
            Ok(())
        }
    }

    /// Ciphertext must be a positive multiple of the block size
    pub fn validate_ciphertext_length(ciphertext: &[u8], block_size: usize) -> Result<()> {
        if ciphertext.is_empty() || ciphertext.len() % block_size != 0 {
            Err(CipherError::InvalidCiphertextLength {
                block_size,
                actual: ciphertext.len(),
            })
        } else {
            Ok(())
        }
    }

    /// Encrypts under `mode`. For CBC a missing IV is drawn from `rng`;
    /// for ECB any supplied IV is ignored.
    pub fn encrypt<C, R>(
        cipher: &C,
        plaintext: &[u8],
        mode: Mode,
        iv: Option<&[u8]>,
        rng: &mut R,
    ) -> Result<Encrypted>
    where
        C: BlockCipher,
        R: RngCore + CryptoRng,
    {
        match mode {
            Mode::Ecb => Ok(Encrypted {
                ciphertext: Self::ecb_encrypt(cipher, plaintext)?,
                iv: None,
            }),
            Mode::Cbc => {
                let iv = match iv {
                    Some(iv) => iv.to_vec(),
                    None => {
                        let mut fresh = vec![0u8; cipher.block_size()];
                        rng.fill_bytes(&mut fresh);
                        fresh
                    }
                };
                let ciphertext = Self::cbc_encrypt(cipher, plaintext, &iv)?;
                Ok(Encrypted {
                    ciphertext,
                    iv: Some(iv),
                })
            }
        }
    }

    /// Decrypts under `mode`; CBC requires the IV used for encryption.
    pub fn decrypt<C: BlockCipher>(
        cipher: &C,
        ciphertext: &[u8],
        mode: Mode,
        iv: Option<&[u8]>,
    ) -> Result<Vec<u8>> {
        match mode {
            Mode::Ecb => Self::ecb_decrypt(cipher, ciphertext),
            Mode::Cbc => {
                let iv = iv.ok_or(CipherError::InvalidIv {
                    expected: cipher.block_size(),
                    actual: 0,
                })?;
                Self::cbc_decrypt(cipher, ciphertext, iv)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parsing_is_case_insensitive() {
        assert_eq!("ecb".parse::<Mode>().unwrap(), Mode::Ecb);
        assert_eq!(" CBC ".parse::<Mode>().unwrap(), Mode::Cbc);
    }

    #[test]
    fn test_unsupported_mode() {
        assert_eq!(
            "OFB".parse::<Mode>(),
            Err(CipherError::UnsupportedMode("OFB".to_string()))
        );
    }

    #[test]
    fn test_validation_functions() {
        assert!(CipherModes::validate_iv_length(&[0u8; 16], 16).is_ok());
        assert!(matches!(
            CipherModes::validate_iv_length(&[0u8; 8], 16),
            Err(CipherError::InvalidIv { expected: 16, actual: 8 })
        ));
        assert!(CipherModes::validate_ciphertext_length(&[0u8; 32], 16).is_ok());
        assert!(CipherModes::validate_ciphertext_length(&[], 16).is_err());
        assert!(CipherModes::validate_ciphertext_length(&[0u8; 17], 16).is_err());
    }

    #[test]
    fn test_requires_iv() {
        assert!(Mode::Cbc.requires_iv());
        assert!(!Mode::Ecb.requires_iv());
    }

    #[test]
    fn test_parse_iv_per_mode() {
        let iv = "00112233445566778899aabbccddeeff";
        assert_eq!(Mode::Cbc.parse_iv(Some(iv)).unwrap().map(|v| v.len()), Some(16));
        assert_eq!(Mode::Cbc.parse_iv(None).unwrap(), None);
        assert_eq!(Mode::Ecb.parse_iv(None).unwrap(), None);
        assert_eq!(
            Mode::Ecb.parse_iv(Some(iv)),
            Err(CipherError::InvalidIv { expected: 0, actual: 16 })
        );
        assert!(matches!(Mode::Cbc.parse_iv(Some("xyz")), Err(CipherError::InvalidHex(_))));
    }
}
