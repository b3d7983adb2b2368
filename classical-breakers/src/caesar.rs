//! Caesar cipher breaker
//!
//! Brute force over all 26 shifts, each candidate scored by chi-square
//! against English letter frequencies.

use tracing::debug;

use crate::frequency::{chi_square_shifted, count_frequencies, ALPHABET_LEN};

/// Outcome of breaking a Caesar ciphertext
#[derive(Debug, Clone, PartialEq)]
pub struct CaesarResult {
    /// Shift that was used to encrypt (0..25)
    pub key: u8,
    pub plaintext: String,
    /// Chi-square of the plaintext; infinite when there were no letters
    pub score: f64,
}

fn rotate(c: char, shift: u8) -> char {
    if c.is_ascii_alphabetic() {
        let base = if c.is_ascii_uppercase() { b'A' } else { b'a' };
        ((c as u8 - base + shift % 26) % 26 + base) as char
    } else {
        c
    }
}

/// Shifts a single letter back by `key` positions, preserving case.
pub fn shift_char(c: char, key: u8) -> char {
    rotate(c, 26 - key % 26)
}

/// Encrypts by shifting every letter forward by `key`.
pub fn shift(text: &str, key: u8) -> String {
    text.chars().map(|c| rotate(c, key)).collect()
}

/// Decrypts with a known key. Non-letters pass through untouched.
pub fn decrypt_with_key(ciphertext: &str, key: u8) -> String {
    ciphertext.chars().map(|c| shift_char(c, key)).collect()
}

/// Tries all 26 keys and keeps the one with the lowest chi-square.
///
/// The scan runs 0..25 with a strict comparison, so ties go to the smaller
/// key and a ciphertext without letters yields key 0.
pub fn break_caesar(ciphertext: &str) -> CaesarResult {
    let counts = count_frequencies(ciphertext);

    let mut best_key = 0u8;
    let mut best_score = f64::INFINITY;
    for key in 0..ALPHABET_LEN as u8 {
        let score = chi_square_shifted(&counts, key);
        if score < best_score {
            best_score = score;
            best_key = key;
        }
    }

    debug!(key = best_key, chi_square = best_score, "caesar key selected");

    CaesarResult {
        key: best_key,
        plaintext: decrypt_with_key(ciphertext, best_key),
        score: best_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decrypt_preserves_case_and_symbols() {
        assert_eq!(decrypt_with_key("Khoor, Zruog! 42", 3), "Hello, World! 42");
    }

    #[test]
    fn test_shift_wraps_around() {
        assert_eq!(shift("xyz XYZ", 3), "abc ABC");
        assert_eq!(decrypt_with_key("abc", 3), "xyz");
    }

    #[test]
    fn test_key_zero_is_identity() {
        assert_eq!(shift("Attack at dawn", 0), "Attack at dawn");
        assert_eq!(decrypt_with_key("Attack at dawn", 26), "Attack at dawn");
    }

    #[test]
    fn test_break_recovers_key() {
        let plaintext = "It was the best of times, it was the worst of times, it was the age of wisdom, \
                         it was the age of foolishness, it was the epoch of belief.";
        for key in [1u8, 7, 13, 25] {
            let result = break_caesar(&shift(plaintext, key));
            assert_eq!(result.key, key);
            assert_eq!(result.plaintext, plaintext);
        }
    }

    #[test]
    fn test_break_pangram() {
        let plaintext = "THE QUICK BROWN FOX JUMPS OVER THE LAZY DOG";
        let result = break_caesar(&shift(plaintext, 5));
        assert_eq!(result.key, 5);
        assert_eq!(result.plaintext, plaintext);
    }

    #[test]
    fn test_no_letters_gives_key_zero() {
        let result = break_caesar("12345 !?");
        assert_eq!(result.key, 0);
        assert_eq!(result.plaintext, "12345 !?");
        assert!(result.score.is_infinite());

        let empty = break_caesar("");
        assert_eq!(empty.key, 0);
        assert_eq!(empty.plaintext, "");
    }
}
