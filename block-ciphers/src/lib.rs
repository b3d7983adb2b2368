//! # Block Ciphers Library
//!
//! From-scratch AES and DES with the modes of operation used to apply them
//! to whole messages.
//!
//! ## Supported Ciphers
//!
//! - **AES** (FIPS-197) with 128-, 192- and 256-bit keys
//! - **DES** (FIPS 46-3) with 64-bit keys (parity bits ignored)
//!
//! ## Supported Modes
//!
//! - **ECB** (Electronic Code Book) - Simple but leaks repeated blocks
//! - **CBC** (Cipher Block Chaining) - Requires an IV, generated if absent on encrypt
//!
//! Both modes use PKCS#7 padding. There is no authentication and no
//! resistance to timing side channels.
//!
//! ## Usage
//!
//! ```rust
//! use block_ciphers::{aes_decrypt, aes_encrypt, Mode};
//!
//! let key = b"YELLOW SUBMARINE";
//! let iv = [0u8; 16];
//!
//! let encrypted = aes_encrypt(b"Hello World!", key, Mode::Cbc, Some(&iv))?;
//! assert_eq!(encrypted.ciphertext.len(), 16);
//!
//! let decrypted = aes_decrypt(&encrypted.ciphertext, key, Mode::Cbc, Some(&iv))?;
//! assert_eq!(decrypted, b"Hello World!");
//! # Ok::<(), block_ciphers::CipherError>(())
//! ```

pub mod aes;
pub mod api;
pub mod cipher;
pub mod des;
pub mod error;
pub mod modes;
pub mod padding;
pub mod utils;

pub use aes::Aes;
pub use api::{aes_decrypt, aes_encrypt, des_decrypt, des_encrypt, Algorithm};
pub use cipher::BlockCipher;
pub use des::Des;
pub use error::{CipherError, Result};
pub use modes::{CipherModes, Encrypted, Mode};
pub use padding::{pkcs7_pad, pkcs7_unpad};
pub use utils::{key_from_passphrase, parse_hex, to_hex, TextFormat};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
