//! ECB (Electronic Code Book) mode implementation

use crate::padding::{pkcs7_pad, pkcs7_unpad};
use crate::{BlockCipher, Result};

use super::CipherModes;

impl CipherModes {
    /// ECB mode encryption: PKCS#7 pad, then encrypt every block independently
    pub fn ecb_encrypt<C: BlockCipher>(cipher: &C, plaintext: &[u8]) -> Result<Vec<u8>> {
        let block_size = cipher.block_size();
        let mut data = pkcs7_pad(plaintext, block_size);

        for chunk in data.chunks_mut(block_size) {
            cipher.encrypt_block(chunk)?;
        }

        Ok(data)
    }

    /// ECB mode decryption
    pub fn ecb_decrypt<C: BlockCipher>(cipher: &C, ciphertext: &[u8]) -> Result<Vec<u8>> {
        let block_size = cipher.block_size();
        Self::validate_ciphertext_length(ciphertext, block_size)?;

        let mut data = ciphertext.to_vec();
        for chunk in data.chunks_mut(block_size) {
            cipher.decrypt_block(chunk)?;
        }

        pkcs7_unpad(&data, block_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Aes, CipherError, Des};

    #[test]
    fn test_ecb_identical_blocks_leak() {
        let cipher = Aes::new(b"YELLOW SUBMARINE").unwrap();
        let ciphertext = CipherModes::ecb_encrypt(&cipher, &[0x41; 32]).unwrap();
        assert_eq!(ciphertext.len(), 48);
        assert_eq!(ciphertext[..16], ciphertext[16..32]);
    }

    #[test]
    fn test_ecb_roundtrip_des() {
        let cipher = Des::new(b"8bytekey").unwrap();
        let plaintext = b"Hello World! This is a test message.";
        let ciphertext = CipherModes::ecb_encrypt(&cipher, plaintext).unwrap();
        assert_eq!(ciphertext.len() % 8, 0);
        assert_eq!(CipherModes::ecb_decrypt(&cipher, &ciphertext).unwrap(), plaintext);
    }

    #[test]
    fn test_ecb_rejects_partial_block() {
        let cipher = Aes::new(&[0u8; 16]).unwrap();
        assert_eq!(
            CipherModes::ecb_decrypt(&cipher, &[0u8; 20]),
            Err(CipherError::InvalidCiphertextLength { block_size: 16, actual: 20 })
        );
    }
}
