//! Monoalphabetic substitution breaker
//!
//! Random-restart hill climbing over the 26! keys. Each climb starts from a
//! frequency-matched or random key and repeatedly takes the first of the 325
//! letter-pair swaps that improves the language-model score. The best key
//! over all restarts wins; the search stops early once the same best score
//! keeps coming back.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};

use crate::config::SubstitutionConfig;
use crate::error::{BreakerError, Result};
use crate::frequency::{count_letters, letter_index, only_letters, ALPHABET_LEN};
use crate::language::{LanguageModel, WORD_PATTERN};

const ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// A permutation of the alphabet: `key[c]` is the plaintext letter for
/// ciphertext letter `c`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubstitutionKey([u8; ALPHABET_LEN]);

impl SubstitutionKey {
    pub fn identity() -> Self {
        let mut key = [0u8; ALPHABET_LEN];
        for (i, k) in key.iter_mut().enumerate() {
            *k = i as u8;
        }
        Self(key)
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut key = Self::identity();
        key.0.shuffle(rng);
        key
    }

    /// Maps ciphertext letters, most frequent first, onto `ranking`.
    ///
    /// Letters tied on count keep the order of their first appearance;
    /// letters that never appear are appended alphabetically.
    pub fn frequency_seed(letters: &[u8], ranking: &[u8; ALPHABET_LEN]) -> Self {
        if letters.is_empty() {
            return Self::identity();
        }

        let counts = count_letters(letters);
        let mut order: Vec<u8> = Vec::with_capacity(ALPHABET_LEN);
        for &l in letters {
            if !order.contains(&l) {
                order.push(l);
            }
        }
        order.sort_by_key(|&l| std::cmp::Reverse(counts[l as usize]));
        for l in 0..ALPHABET_LEN as u8 {
            if !order.contains(&l) {
                order.push(l);
            }
        }

        let mut key = [0u8; ALPHABET_LEN];
        for (cipher, &plain) in order.iter().zip(ranking.iter()) {
            key[*cipher as usize] = plain;
        }
        Self(key)
    }

    /// Parses the plaintext column of a mapping: 26 distinct letters, the
    /// i-th being the plaintext for the i-th ciphertext letter.
    pub fn from_plain_alphabet(plain: &str) -> Result<Self> {
        let letters: Vec<u8> = plain
            .chars()
            .map(letter_index)
            .collect::<Option<_>>()
            .ok_or_else(|| BreakerError::InvalidKey(format!("{:?} contains non-letters", plain)))?;

        if letters.len() != ALPHABET_LEN {
            return Err(BreakerError::InvalidKey(format!(
                "expected 26 letters, got {}",
                letters.len()
            )));
        }
        let mut seen = [false; ALPHABET_LEN];
        for &l in &letters {
            if std::mem::replace(&mut seen[l as usize], true) {
                return Err(BreakerError::InvalidKey(format!(
                    "letter {} appears twice",
                    (b'A' + l) as char
                )));
            }
        }

        let mut key = [0u8; ALPHABET_LEN];
        key.copy_from_slice(&letters);
        Ok(Self(key))
    }

    /// Plaintext letter for ciphertext letter `cipher`.
    pub fn plain_for(&self, cipher: u8) -> u8 {
        self.0[cipher as usize]
    }

    pub fn swap(&mut self, i: usize, j: usize) {
        self.0.swap(i, j);
    }

    pub fn swapped(&self, i: usize, j: usize) -> Self {
        let mut key = *self;
        key.swap(i, j);
        key
    }

    /// The key that maps plaintext back to ciphertext.
    pub fn invert(&self) -> Self {
        let mut inverse = [0u8; ALPHABET_LEN];
        for (cipher, &plain) in self.0.iter().enumerate() {
            inverse[plain as usize] = cipher as u8;
        }
        Self(inverse)
    }

    /// Substitutes every letter of `text`, preserving case and non-letters.
    pub fn apply(&self, text: &str) -> String {
        text.chars()
            .map(|c| match letter_index(c) {
                Some(l) => {
                    let p = (b'A' + self.plain_for(l)) as char;
                    if c.is_ascii_lowercase() {
                        p.to_ascii_lowercase()
                    } else {
                        p
                    }
                }
                None => c,
            })
            .collect()
    }

    /// Encrypts plaintext under this key, i.e. applies the inverse mapping.
    pub fn encrypt(&self, plaintext: &str) -> String {
        self.invert().apply(plaintext)
    }

    /// Uppercase plaintext alphabet in ciphertext order
    pub fn plain_alphabet(&self) -> String {
        self.0.iter().map(|&p| (b'A' + p) as char).collect()
    }

    pub fn cipher_line(&self) -> String {
        format!("CIPHER: {}", ALPHABET)
    }

    pub fn plain_line(&self) -> String {
        format!("PLAIN : {}", self.plain_alphabet())
    }

    /// Single-line mapping: `CIPHER: ABC..Z | PLAIN : <key>`
    pub fn mapping(&self) -> String {
        format!("{} | {}", self.cipher_line(), self.plain_line())
    }
}

impl Default for SubstitutionKey {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Display for SubstitutionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.plain_alphabet())
    }
}

impl FromStr for SubstitutionKey {
    type Err = BreakerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_plain_alphabet(s.trim())
    }
}

/// Prefix of the ciphertext that candidates are scored on
struct Sample {
    letters: Vec<u8>,
    /// Word spans as ranges into `letters`
    words: Vec<Range<usize>>,
    text_len: usize,
}

impl Sample {
    fn new(ciphertext: &str, max_letters: usize) -> Self {
        let mut end = ciphertext.len();
        let mut seen = 0;
        for (i, c) in ciphertext.char_indices() {
            if c.is_ascii_alphabetic() {
                if seen == max_letters {
                    end = i;
                    break;
                }
                seen += 1;
            }
        }
        let text = &ciphertext[..end];

        let mut words = Vec::new();
        let mut byte_cursor = 0;
        let mut letter_cursor = 0;
        for m in WORD_PATTERN.find_iter(text) {
            letter_cursor += text[byte_cursor..m.start()]
                .bytes()
                .filter(u8::is_ascii_alphabetic)
                .count();
            let len = m.as_str().len();
            words.push(letter_cursor..letter_cursor + len);
            letter_cursor += len;
            byte_cursor = m.end();
        }

        Self {
            letters: only_letters(text),
            words,
            text_len: text.chars().count(),
        }
    }
}

/// Scores keys against a fixed sample without building strings.
///
/// `score(key)` equals `model.score(&key.apply(sample_text))`.
struct Scorer<'a> {
    model: &'a LanguageModel,
    sample: Sample,
    buffer: Vec<u8>,
}

impl<'a> Scorer<'a> {
    fn new(model: &'a LanguageModel, sample: Sample) -> Self {
        let buffer = Vec::with_capacity(sample.letters.len());
        Self { model, sample, buffer }
    }

    fn score(&mut self, key: &SubstitutionKey) -> f64 {
        self.buffer.clear();
        self.buffer.extend(self.sample.letters.iter().map(|&l| key.plain_for(l)));

        let matched = self
            .sample
            .words
            .iter()
            .filter(|span| self.model.contains_word(&self.buffer[(*span).clone()]))
            .count();

        self.model.ngram_score(&self.buffer)
            + self
                .model
                .word_bonus_for(matched, self.sample.words.len(), self.sample.text_len)
    }
}

/// One first-improvement climb from `start`; returns the best key it saw.
///
/// With annealing, a non-improving swap is accepted with probability
/// `exp(delta / T)` while `T > 0.1`, and `T` cools after every move.
fn hill_climb<R: Rng + ?Sized>(
    scorer: &mut Scorer<'_>,
    start: SubstitutionKey,
    config: &SubstitutionConfig,
    anneal: bool,
    rng: &mut R,
) -> (f64, SubstitutionKey) {
    let mut current = start;
    let mut current_score = scorer.score(&current);
    let mut best = current;
    let mut best_score = current_score;
    let mut temperature = if anneal { config.initial_temperature } else { 0.0 };

    for _ in 0..config.max_iterations {
        let mut moved = false;

        'scan: for i in 0..ALPHABET_LEN - 1 {
            for j in i + 1..ALPHABET_LEN {
                let candidate = current.swapped(i, j);
                let score = scorer.score(&candidate);

                if score > current_score {
                    current = candidate;
                    current_score = score;
                    moved = true;
                    if score > best_score {
                        best = candidate;
                        best_score = score;
                    }
                    break 'scan;
                }

                if anneal
                    && temperature > 0.1
                    && rng.gen::<f64>() < ((score - current_score) / temperature).exp()
                {
                    current = candidate;
                    current_score = score;
                    moved = true;
                    break 'scan;
                }
            }
        }

        if !moved {
            break;
        }
        if anneal {
            temperature *= config.cooling_rate;
        }
    }

    (best_score, best)
}

/// Outcome of breaking a substitution ciphertext
#[derive(Debug, Clone, PartialEq)]
pub struct SubstitutionResult {
    /// Language-model score of the scored sample under `key`
    pub score: f64,
    pub key: SubstitutionKey,
    pub plaintext: String,
    /// Hill-climbing rounds actually run
    pub rounds: usize,
}

impl SubstitutionResult {
    pub fn mapping(&self) -> String {
        self.key.mapping()
    }
}

/// Breaks a monoalphabetic substitution cipher.
///
/// Round 0 starts from the frequency-matched key, later rounds from random
/// keys drawn from `rng`. The winning key is applied to the whole
/// ciphertext, not only the scored sample. A ciphertext without letters
/// yields the identity key, score 0 and the text unchanged.
pub fn break_substitution<R: Rng + ?Sized>(
    ciphertext: &str,
    model: &LanguageModel,
    config: &SubstitutionConfig,
    rng: &mut R,
) -> Result<SubstitutionResult> {
    config.validate()?;

    let letters = only_letters(ciphertext);
    if letters.is_empty() {
        return Ok(SubstitutionResult {
            score: 0.0,
            key: SubstitutionKey::identity(),
            plaintext: ciphertext.to_string(),
            rounds: 0,
        });
    }

    let sample_len = config.sample_size(letters.len());
    let seed = SubstitutionKey::frequency_seed(&letters[..sample_len], model.ranking());
    let mut scorer = Scorer::new(model, Sample::new(ciphertext, sample_len));
    debug!(letters = letters.len(), sample = sample_len, "starting substitution search");

    let mut best_key = SubstitutionKey::identity();
    let mut best_score = f64::NEG_INFINITY;
    let mut hits = 0;
    let mut stale = 0;
    let mut rounds = 0;

    for round in 0..config.rounds {
        rounds = round + 1;
        let start = if round == 0 { seed } else { SubstitutionKey::random(rng) };
        let (score, key) = hill_climb(&mut scorer, start, config, config.anneals(round), rng);
        debug!(round, score, best = best_score, "substitution round finished");

        // Round 0 always seeds the best key; with fewer than two letters every
        // score is -inf and equal scores must still count as hits.
        if round == 0 || score > best_score + config.score_tolerance {
            best_score = score;
            best_key = key;
            hits = 1;
            stale = 0;
        } else if score == best_score || (score - best_score).abs() < config.score_tolerance {
            hits += 1;
            if score > best_score {
                best_score = score;
                best_key = key;
            }
            if hits >= config.consolidate {
                debug!(round, hits, "best score confirmed, stopping early");
                break;
            }
        } else {
            stale += 1;
        }

        if stale > config.max_stale_rounds {
            debug!(round, stale, "no progress, stopping early");
            break;
        }
    }

    info!(score = best_score, rounds, key = %best_key, "substitution key selected");

    Ok(SubstitutionResult {
        score: best_score,
        key: best_key,
        plaintext: best_key.apply(ciphertext),
        rounds,
    })
}
