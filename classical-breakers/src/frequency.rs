//! English letter statistics
//!
//! Letter counting, chi-square goodness of fit and the index of coincidence.
//! Letters are handled as indices `0..26` (A = 0) so callers can work on the
//! extracted letter stream without re-checking case.

pub const ALPHABET_LEN: usize = 26;

/// Standard English letter frequencies in percent, A through Z
pub const ENGLISH_FREQ: [f64; ALPHABET_LEN] = [
    8.17, 1.49, 2.78, 4.25, 12.70, 2.23, 2.02, 6.09, 6.97, 0.15, 0.77, 4.03, 2.41,
    6.75, 7.51, 1.93, 0.10, 5.99, 6.33, 9.06, 2.76, 0.98, 2.36, 0.15, 1.97, 0.07,
];

/// Index of coincidence of ordinary English text
pub const ENGLISH_IC: f64 = 0.065;

/// Index of coincidence of uniformly random letters (1/26)
pub const RANDOM_IC: f64 = 1.0 / ALPHABET_LEN as f64;

/// Maps an ASCII letter of either case to its alphabet index.
pub fn letter_index(c: char) -> Option<u8> {
    if c.is_ascii_alphabetic() {
        Some(c.to_ascii_uppercase() as u8 - b'A')
    } else {
        None
    }
}

/// Extracts the ASCII letters of `text` as alphabet indices.
pub fn only_letters(text: &str) -> Vec<u8> {
    text.chars().filter_map(letter_index).collect()
}

/// Counts the frequency of each letter in the given text.
pub fn count_frequencies(text: &str) -> [u32; ALPHABET_LEN] {
    let mut frequencies = [0u32; ALPHABET_LEN];
    for index in text.chars().filter_map(letter_index) {
        frequencies[index as usize] += 1;
    }
    frequencies
}

/// Counts alphabet indices that were already extracted.
pub fn count_letters(letters: &[u8]) -> [u32; ALPHABET_LEN] {
    let mut frequencies = [0u32; ALPHABET_LEN];
    for &l in letters {
        frequencies[l as usize] += 1;
    }
    frequencies
}

/// Chi-square distance between observed counts and the English table.
///
/// Returns `f64::INFINITY` when there are no letters at all.
pub fn chi_square(counts: &[u32; ALPHABET_LEN]) -> f64 {
    chi_square_shifted(counts, 0)
}

/// Chi-square of the text obtained by shifting every letter back by `shift`,
/// computed from the ciphertext counts without re-decrypting.
pub fn chi_square_shifted(counts: &[u32; ALPHABET_LEN], shift: u8) -> f64 {
    let total: u32 = counts.iter().sum();
    if total == 0 {
        return f64::INFINITY;
    }

    let total = total as f64;
    (0..ALPHABET_LEN)
        .map(|plain| {
            let observed = counts[(plain + shift as usize) % ALPHABET_LEN] as f64;
            let expected = ENGLISH_FREQ[plain] * total / 100.0;
            (observed - expected).powi(2) / expected
        })
        .sum()
}

/// Chi-square of a text against English letter frequencies.
pub fn chi_square_text(text: &str) -> f64 {
    chi_square(&count_frequencies(text))
}

/// Calculates the Index of Coincidence: `Σ f(f-1) / (N(N-1))`.
///
/// Returns 0.0 for fewer than two letters.
pub fn index_of_coincidence(letters: &[u8]) -> f64 {
    let n = letters.len();
    if n < 2 {
        return 0.0;
    }

    let numerator: u64 = count_letters(letters)
        .iter()
        .map(|&f| f as u64 * (f as u64).saturating_sub(1))
        .sum();
    numerator as f64 / (n as u64 * (n as u64 - 1)) as f64
}

/// Index of coincidence of the letters in `text`.
pub fn calc_ic(text: &str) -> f64 {
    index_of_coincidence(&only_letters(text))
}
