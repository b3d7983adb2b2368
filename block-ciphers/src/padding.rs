//! PKCS#7 padding

use crate::error::{CipherError, Result};

/// Appends `n` bytes of value `n`, where `1 <= n <= block_size`.
/// A block-aligned input always gains a full block of padding.
pub fn pkcs7_pad(data: &[u8], block_size: usize) -> Vec<u8> {
    let pad_len = block_size - (data.len() % block_size);
    let mut padded = Vec::with_capacity(data.len() + pad_len);
    padded.extend_from_slice(data);
    padded.resize(data.len() + pad_len, pad_len as u8);
    padded
}

/// Strips PKCS#7 padding, checking that the last `pad_len` bytes all equal
/// `pad_len` and that `1 <= pad_len <= block_size`.
pub fn pkcs7_unpad(data: &[u8], block_size: usize) -> Result<Vec<u8>> {
    let pad_len = *data.last().ok_or(CipherError::PaddingError)? as usize;

    if pad_len == 0 || pad_len > block_size || pad_len > data.len() {
        return Err(CipherError::PaddingError);
    }

    let (body, padding) = data.split_at(data.len() - pad_len);
    if padding.iter().any(|&b| b as usize != pad_len) {
        return Err(CipherError::PaddingError);
    }

    Ok(body.to_vec())
}
