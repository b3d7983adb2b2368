//! Generic block cipher trait

use crate::error::Result;

/// A keyed block cipher: the key schedule is derived once at construction
/// and every block operation reuses it.
pub trait BlockCipher {
    /// Encrypts a single block in place
    fn encrypt_block(&self, block: &mut [u8]) -> Result<()>;

    /// Decrypts a single block in place
    fn decrypt_block(&self, block: &mut [u8]) -> Result<()>;

    /// Returns the block size of the cipher in bytes
    fn block_size(&self) -> usize;
}
