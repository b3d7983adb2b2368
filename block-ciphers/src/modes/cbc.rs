//! CBC (Cipher Block Chaining) mode implementation

use crate::padding::{pkcs7_pad, pkcs7_unpad};
use crate::utils::xor_in_place;
use crate::{BlockCipher, Result};

use super::CipherModes;

impl CipherModes {
    /// CBC mode encryption
    ///
    /// C_0 = E(P_0 ⊕ IV), C_i = E(P_i ⊕ C_{i-1})
    pub fn cbc_encrypt<C: BlockCipher>(cipher: &C, plaintext: &[u8], iv: &[u8]) -> Result<Vec<u8>> {
        let block_size = cipher.block_size();
        Self::validate_iv_length(iv, block_size)?;

        let mut data = pkcs7_pad(plaintext, block_size);
        let mut previous = iv.to_vec();

        for chunk in data.chunks_mut(block_size) {
            xor_in_place(chunk, &previous);
            cipher.encrypt_block(chunk)?;
            previous.copy_from_slice(chunk);
        }

        Ok(data)
    }

    /// CBC mode decryption
    ///
    /// P_i = D(C_i) ⊕ C_{i-1}, with C_{-1} = IV
    pub fn cbc_decrypt<C: BlockCipher>(cipher: &C, ciphertext: &[u8], iv: &[u8]) -> Result<Vec<u8>> {
        let block_size = cipher.block_size();
        Self::validate_iv_length(iv, block_size)?;
        Self::validate_ciphertext_length(ciphertext, block_size)?;

        let mut plaintext = ciphertext.to_vec();
        for (i, chunk) in plaintext.chunks_mut(block_size).enumerate() {
            cipher.decrypt_block(chunk)?;
            let previous = if i == 0 {
                iv
            } else {
                &ciphertext[(i - 1) * block_size..i * block_size]
            };
            xor_in_place(chunk, previous);
        }

        pkcs7_unpad(&plaintext, block_size)
    }
}
