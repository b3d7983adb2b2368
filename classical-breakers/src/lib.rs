//! # Classical Breakers
//!
//! Automated key recovery for classical ciphers:
//!
//! - **Caesar**: brute force over 26 shifts, chi-square against English
//! - **Vigenère**: key length by index of coincidence, then one Caesar break per column
//! - **Substitution**: random-restart hill climbing scored by an n-gram
//!   language model plus a dictionary bonus
//!
//! A charset filter normalizes input before breaking. Breakers never fail on
//! odd input; weak results show up in the returned score instead.
//!
//! ```rust
//! use classical_breakers::{break_caesar, caesar};
//!
//! let plaintext = "Cryptanalysis is the art of reading messages that were never meant for you.";
//! let result = break_caesar(&caesar::shift(plaintext, 5));
//! assert_eq!(result.key, 5);
//! assert_eq!(result.plaintext, plaintext);
//! ```

pub mod caesar;
pub mod charset;
pub mod config;
pub mod error;
pub mod frequency;
pub mod language;
pub mod substitution;
pub mod vigenere;

pub use caesar::{break_caesar, CaesarResult};
pub use charset::{charset_info, filter_charset, validate_and_filter, CharsetReport};
pub use config::{SubstitutionConfig, VigenereConfig};
pub use error::{BreakerError, Result};
pub use frequency::{chi_square_text, index_of_coincidence, ENGLISH_FREQ, ENGLISH_IC};
pub use language::{LanguageModel, NgramCounts};
pub use substitution::{break_substitution, SubstitutionKey, SubstitutionResult};
pub use vigenere::{break_vigenere, break_vigenere_with, VigenereResult};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
