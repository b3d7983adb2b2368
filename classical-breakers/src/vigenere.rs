//! Vigenère cipher breaker
//!
//! Key length is estimated from the index of coincidence of interleaved
//! columns; each column is then broken as a Caesar cipher by chi-square.
//! The few best key lengths are decrypted in full and the plaintext with the
//! lowest overall chi-square wins.

use tracing::{debug, warn};

use crate::config::VigenereConfig;
use crate::error::{BreakerError, Result};
use crate::frequency::{chi_square, chi_square_shifted, count_letters, index_of_coincidence, only_letters, ENGLISH_IC};

/// Outcome of breaking a Vigenère ciphertext
#[derive(Debug, Clone, PartialEq)]
pub struct VigenereResult {
    /// Uppercase key, reduced to its shortest period
    pub key: String,
    pub plaintext: String,
    /// Chi-square of the whole plaintext; infinite when the text was too short
    pub score: f64,
}

fn parse_key(key: &str) -> Result<Vec<u8>> {
    if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(BreakerError::InvalidKey(format!(
            "Vigenère key must be a non-empty run of letters, got {:?}",
            key
        )));
    }
    Ok(only_letters(key))
}

/// Applies per-letter shifts, advancing the key only on letters.
fn apply_shifts(text: &str, shifts: &[u8], decrypt: bool) -> String {
    let mut key_index = 0;
    text.chars()
        .map(|c| {
            if !c.is_ascii_alphabetic() {
                return c;
            }
            let base = if c.is_ascii_lowercase() { b'a' } else { b'A' };
            let k = shifts[key_index % shifts.len()];
            key_index += 1;
            let k = if decrypt { 26 - k } else { k };
            ((c as u8 - base + k) % 26 + base) as char
        })
        .collect()
}

/// Encrypts text using the Vigenère cipher, preserving case and non-letters.
pub fn encrypt(plaintext: &str, key: &str) -> Result<String> {
    Ok(apply_shifts(plaintext, &parse_key(key)?, false))
}

/// Decrypts Vigenère cipher text with the given key.
pub fn decrypt(ciphertext: &str, key: &str) -> Result<String> {
    Ok(apply_shifts(ciphertext, &parse_key(key)?, true))
}

/// Splits letters into `key_length` interleaved columns.
/// Column `i` holds positions `i, i + L, i + 2L, ...`.
pub fn split_text_by_key_length(letters: &[u8], key_length: usize) -> Vec<Vec<u8>> {
    let mut columns = vec![Vec::with_capacity(letters.len() / key_length + 1); key_length];
    for (i, &l) in letters.iter().enumerate() {
        columns[i % key_length].push(l);
    }
    columns
}

/// Mean index of coincidence over the columns for one key length.
pub fn average_ic(letters: &[u8], key_length: usize) -> f64 {
    let columns = split_text_by_key_length(letters, key_length);
    columns.iter().map(|c| index_of_coincidence(c)).sum::<f64>() / key_length as f64
}

/// A multiple of the true key length scores about as well as the length
/// itself; a divisor within this fraction of a length's IC replaces it.
const SHORTER_KEY_TOLERANCE: f64 = 0.95;

/// Ranks candidate key lengths by how close their average IC is to English.
///
/// Each length is first collapsed to its shortest divisor whose average IC
/// is comparable, so 10 and 15 do not crowd out a true length of 5. Returns
/// at most `config.candidates` distinct `(length, average_ic)` pairs, best
/// first. Equal distances keep the shorter length first.
pub fn rank_key_lengths(letters: &[u8], config: &VigenereConfig) -> Vec<(usize, f64)> {
    let ics: Vec<(usize, f64)> = config
        .key_lengths(letters.len())
        .map(|len| (len, average_ic(letters, len)))
        .collect();

    let mut by_distance = ics.clone();
    by_distance.sort_by(|a, b| (a.1 - ENGLISH_IC).abs().total_cmp(&(b.1 - ENGLISH_IC).abs()));

    let mut ranked: Vec<(usize, f64)> = Vec::with_capacity(config.candidates);
    for (len, ic) in by_distance {
        let collapsed = ics
            .iter()
            .find(|&&(d, d_ic)| d < len && len % d == 0 && d_ic >= ic * SHORTER_KEY_TOLERANCE)
            .copied()
            .unwrap_or((len, ic));

        if !ranked.iter().any(|&(l, _)| l == collapsed.0) {
            ranked.push(collapsed);
        }
        if ranked.len() == config.candidates {
            break;
        }
    }
    ranked
}

/// Finds the Caesar shift of one column by minimum chi-square.
pub fn best_shift(column: &[u8]) -> u8 {
    let counts = count_letters(column);
    let mut best = 0u8;
    let mut best_chi = f64::INFINITY;
    for shift in 0..26u8 {
        let chi = chi_square_shifted(&counts, shift);
        if chi < best_chi {
            best_chi = chi;
            best = shift;
        }
    }
    best
}

/// Shortest prefix of `key` that repeats exactly to form the whole key.
pub fn minimal_period(key: &[u8]) -> &[u8] {
    let n = key.len();
    (1..n)
        .filter(|p| n % p == 0)
        .find(|&p| key.chunks(p).all(|chunk| chunk == &key[..p]))
        .map_or(key, |p| &key[..p])
}

fn shifts_to_key(shifts: &[u8]) -> String {
    shifts.iter().map(|&s| (b'A' + s) as char).collect()
}

/// Whole-text chi-square of the letters after removing `shifts`.
fn decrypted_chi_square(letters: &[u8], shifts: &[u8]) -> f64 {
    let plain: Vec<u8> = letters
        .iter()
        .enumerate()
        .map(|(i, &l)| (l + 26 - shifts[i % shifts.len()]) % 26)
        .collect();
    chi_square(&count_letters(&plain))
}

/// Breaks a Vigenère ciphertext with the default configuration.
pub fn break_vigenere(ciphertext: &str) -> VigenereResult {
    break_vigenere_with(ciphertext, &VigenereConfig::default())
}

/// Breaks a Vigenère ciphertext.
///
/// Texts with fewer than `config.min_letters` letters are returned unchanged
/// under the no-op key `"A"` with an infinite score.
pub fn break_vigenere_with(ciphertext: &str, config: &VigenereConfig) -> VigenereResult {
    let letters = only_letters(ciphertext);
    let ranked = if letters.len() < config.min_letters {
        Vec::new()
    } else {
        rank_key_lengths(&letters, config)
    };

    if ranked.is_empty() {
        warn!(letters = letters.len(), "ciphertext too short for key length estimation");
        return VigenereResult {
            key: "A".to_string(),
            plaintext: ciphertext.to_string(),
            score: f64::INFINITY,
        };
    }

    let mut best_shifts = vec![0u8];
    let mut best_score = f64::INFINITY;
    for (len, ic) in ranked {
        let shifts: Vec<u8> = split_text_by_key_length(&letters, len)
            .iter()
            .map(|column| best_shift(column))
            .collect();
        let score = decrypted_chi_square(&letters, &shifts);
        debug!(key_length = len, average_ic = ic, key = %shifts_to_key(&shifts), chi_square = score, "key length candidate");

        if score < best_score {
            best_score = score;
            best_shifts = shifts;
        }
    }

    let shifts = minimal_period(&best_shifts).to_vec();
    let score = decrypted_chi_square(&letters, &shifts);
    let key = shifts_to_key(&shifts);
    debug!(%key, chi_square = score, "vigenere key selected");

    VigenereResult {
        plaintext: apply_shifts(ciphertext, &shifts, true),
        key,
        score,
    }
}
