//! English language model for scoring candidate plaintexts
//!
//! A model is a set of dense n-gram log-probability tables plus a word list.
//! It is built once and only read afterwards, so one instance can be shared
//! by every breaker call. [`LanguageModel::english`] is the process-wide
//! default built from the corpus and word list embedded in this crate;
//! tests and callers with their own data build models directly.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, info};

use crate::error::{BreakerError, Result};
use crate::frequency::{letter_index, only_letters, ALPHABET_LEN};

const CORPUS: &str = include_str!("../data/corpus.txt");
const WORDLIST: &str = include_str!("../data/wordlist.txt");

/// Letters by descending English frequency, used when no monogram counts exist
pub const FALLBACK_RANKING: &str = "etaoinshrdlcumwfgypbvkjxqz";

pub const BIGRAM_WEIGHT: f64 = 0.10;
pub const TRIGRAM_WEIGHT: f64 = 0.20;
pub const QUADGRAM_WEIGHT: f64 = 0.60;

/// Scale of the dictionary bonus at full length factor
pub const WORD_BONUS_WEIGHT: f64 = 150.0;

lazy_static! {
    /// Alphabetic runs long enough to be checked against the word list
    pub static ref WORD_PATTERN: Regex = Regex::new(r"[a-zA-Z]{3,}").unwrap();

    static ref ENGLISH: LanguageModel = LanguageModel::from_corpus(CORPUS, WORDLIST.lines());
}

fn gram_index(gram: &[u8]) -> usize {
    gram.iter().fold(0, |acc, &l| acc * ALPHABET_LEN + l as usize)
}

fn parse_gram(gram: &str, order: usize) -> Option<Vec<u8>> {
    let letters: Vec<u8> = gram.chars().map(letter_index).collect::<Option<_>>()?;
    (letters.len() == order).then_some(letters)
}

/// Raw n-gram counts for orders 1 to 4, keyed by lowercase gram
#[derive(Debug, Clone, Default)]
pub struct NgramCounts {
    pub monograms: HashMap<String, u64>,
    pub bigrams: HashMap<String, u64>,
    pub trigrams: HashMap<String, u64>,
    pub quadgrams: HashMap<String, u64>,
}

impl NgramCounts {
    /// Counts every n-gram of the letter stream of `text`, ignoring word
    /// boundaries and case.
    pub fn from_corpus(text: &str) -> Self {
        let letters: String = only_letters(text).iter().map(|&l| (b'a' + l) as char).collect();
        let mut counts = Self::default();
        for order in 1..=4 {
            let table = counts.table_mut(order);
            for i in 0..letters.len().saturating_sub(order - 1) {
                *table.entry(letters[i..i + order].to_string()).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Adds `count` occurrences of `gram`. Grams that are not made of exactly
    /// 1 to 4 ASCII letters are ignored; returns whether it was kept.
    pub fn add(&mut self, gram: &str, count: u64) -> bool {
        let order = gram.chars().count();
        if !(1..=4).contains(&order) || parse_gram(gram, order).is_none() {
            return false;
        }
        *self.table_mut(order).entry(gram.to_ascii_lowercase()).or_insert(0) += count;
        true
    }

    fn table_mut(&mut self, order: usize) -> &mut HashMap<String, u64> {
        match order {
            1 => &mut self.monograms,
            2 => &mut self.bigrams,
            3 => &mut self.trigrams,
            _ => &mut self.quadgrams,
        }
    }
}

/// Dense log-probability table over all `26^n` grams of one order
#[derive(Debug, Clone)]
pub struct NgramTable {
    order: usize,
    log_probs: Vec<f64>,
    populated: bool,
}

impl NgramTable {
    /// Add-one smoothed table: `ln((count + 1) / (total + V))` for seen grams
    /// and `ln(1 / (total + V))` for the rest, V being the number of distinct
    /// grams. Without any counts every gram gets the uniform `ln(26^-n)`.
    pub fn from_counts(order: usize, counts: &HashMap<String, u64>) -> Self {
        let size = ALPHABET_LEN.pow(order as u32);
        let grams: Vec<(Vec<u8>, u64)> = counts
            .iter()
            .filter_map(|(g, &c)| parse_gram(g, order).map(|letters| (letters, c)))
            .collect();
        let total: u64 = grams.iter().map(|(_, c)| c).sum();

        if total == 0 {
            return Self {
                order,
                log_probs: vec![-(size as f64).ln(); size],
                populated: false,
            };
        }

        let denominator = (total + grams.len() as u64) as f64;
        let mut log_probs = vec![(1.0 / denominator).ln(); size];
        for (letters, count) in grams {
            log_probs[gram_index(&letters)] = ((count + 1) as f64 / denominator).ln();
        }

        Self { order, log_probs, populated: true }
    }

    pub fn order(&self) -> usize {
        self.order
    }

    /// False when the table was built without counts and is uniform.
    pub fn is_populated(&self) -> bool {
        self.populated
    }

    pub fn log_prob(&self, gram: &[u8]) -> f64 {
        self.log_probs[gram_index(gram)]
    }

    /// Sum of log-probabilities over every window of the letter stream.
    pub fn score(&self, letters: &[u8]) -> f64 {
        letters.windows(self.order).map(|w| self.log_prob(w)).sum()
    }
}

/// N-gram tables, letter ranking and word list used to score English
#[derive(Debug, Clone)]
pub struct LanguageModel {
    bigrams: NgramTable,
    trigrams: NgramTable,
    quadgrams: NgramTable,
    ranking: [u8; ALPHABET_LEN],
    words: HashSet<Vec<u8>>,
}

impl LanguageModel {
    /// Shared model built from the embedded English corpus and word list.
    pub fn english() -> &'static LanguageModel {
        &ENGLISH
    }

    pub fn from_counts<I, S>(counts: &NgramCounts, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words: HashSet<Vec<u8>> = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_string())
            .filter(|w| w.len() >= 3)
            .filter_map(|w| parse_gram(&w, w.len()))
            .collect();

        Self {
            bigrams: NgramTable::from_counts(2, &counts.bigrams),
            trigrams: NgramTable::from_counts(3, &counts.trigrams),
            quadgrams: NgramTable::from_counts(4, &counts.quadgrams),
            ranking: Self::ranking_from(&counts.monograms),
            words,
        }
    }

    /// Trains the n-gram tables on `corpus`.
    pub fn from_corpus<I, S>(corpus: &str, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_counts(&NgramCounts::from_corpus(corpus), words)
    }

    /// Loads `english_{monograms,bigrams,trigrams,quadgrams}.txt` (one
    /// `NGRAM COUNT` pair per line) and a word list from `dir`.
    ///
    /// Missing files leave the matching table empty. `wordlist_enhanced.txt`
    /// is preferred over `wordlist.txt` when it exists and is non-empty.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let mut counts = NgramCounts::default();
        for (order, name) in [
            (1, "english_monograms.txt"),
            (2, "english_bigrams.txt"),
            (3, "english_trigrams.txt"),
            (4, "english_quadgrams.txt"),
        ] {
            let table = read_counts(&dir.join(name), order)?;
            debug!(file = name, grams = table.len(), "loaded n-gram counts");
            *counts.table_mut(order) = table;
        }

        let mut words = Vec::new();
        for name in ["wordlist_enhanced.txt", "wordlist.txt"] {
            if let Some(text) = read_optional(&dir.join(name))? {
                words = text.lines().map(str::to_string).collect();
                if !words.is_empty() {
                    break;
                }
            }
        }

        let model = Self::from_counts(&counts, words);
        info!(dir = %dir.display(), words = model.word_count(), "language model loaded");
        Ok(model)
    }

    fn ranking_from(monograms: &HashMap<String, u64>) -> [u8; ALPHABET_LEN] {
        let fallback = only_letters(FALLBACK_RANKING);

        let mut seen: Vec<(u8, u64)> = monograms
            .iter()
            .filter_map(|(g, &c)| parse_gram(g, 1).map(|l| (l[0], c)))
            .collect();
        // Ties resolve in fallback order so the ranking is deterministic.
        seen.sort_by_key(|&(l, c)| (std::cmp::Reverse(c), fallback.iter().position(|&f| f == l)));

        let mut ranking: Vec<u8> = Vec::with_capacity(ALPHABET_LEN);
        for l in seen.into_iter().map(|(l, _)| l).chain(fallback) {
            if !ranking.contains(&l) {
                ranking.push(l);
            }
        }

        let mut out = [0u8; ALPHABET_LEN];
        out.copy_from_slice(&ranking);
        out
    }

    /// English letters, most frequent first
    pub fn ranking(&self) -> &[u8; ALPHABET_LEN] {
        &self.ranking
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Checks a word given as alphabet indices.
    pub fn contains_word(&self, letters: &[u8]) -> bool {
        self.words.contains(letters)
    }

    /// Weighted bigram, trigram and quadgram log-likelihood of a letter stream.
    ///
    /// Fewer than two letters score negative infinity.
    pub fn ngram_score(&self, letters: &[u8]) -> f64 {
        if letters.len() < 2 {
            return f64::NEG_INFINITY;
        }
        BIGRAM_WEIGHT * self.bigrams.score(letters)
            + TRIGRAM_WEIGHT * self.trigrams.score(letters)
            + QUADGRAM_WEIGHT * self.quadgrams.score(letters)
    }

    /// Dictionary bonus: `150 * matched_ratio * min(text_len / 2000, 2)`.
    pub fn word_bonus_for(&self, matched: usize, total_words: usize, text_len: usize) -> f64 {
        if total_words == 0 || self.words.is_empty() {
            return 0.0;
        }
        let ratio = matched as f64 / total_words as f64;
        let length_factor = (text_len as f64 / 2000.0).min(2.0);
        WORD_BONUS_WEIGHT * ratio * length_factor
    }

    /// Dictionary bonus over the alphabetic runs of `text`.
    pub fn word_bonus(&self, text: &str) -> f64 {
        let mut total = 0;
        let mut matched = 0;
        for m in WORD_PATTERN.find_iter(text) {
            total += 1;
            if self.contains_word(&only_letters(m.as_str())) {
                matched += 1;
            }
        }
        self.word_bonus_for(matched, total, text.chars().count())
    }

    /// Full score of a candidate plaintext: n-gram likelihood plus word bonus.
    pub fn score(&self, text: &str) -> f64 {
        self.ngram_score(&only_letters(text)) + self.word_bonus(text)
    }
}

fn read_optional(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "language data file missing");
            Ok(None)
        }
        Err(source) => Err(BreakerError::Io { path: path.to_path_buf(), source }),
    }
}

fn read_counts(path: &Path, order: usize) -> Result<HashMap<String, u64>> {
    let mut counts = HashMap::new();
    let Some(text) = read_optional(path)? else {
        return Ok(counts);
    };

    for (n, line) in text.lines().enumerate() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let [gram, count] = parts.as_slice() else {
            continue;
        };
        if parse_gram(gram, order).is_none() {
            continue;
        }
        let count: u64 = count.parse().map_err(|_| BreakerError::Parse {
            path: path.to_path_buf(),
            line: n + 1,
            reason: format!("count {:?} is not a number", count),
        })?;
        *counts.entry(gram.to_ascii_lowercase()).or_insert(0) += count;
    }

    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letters(s: &str) -> Vec<u8> {
        only_letters(s)
    }

    #[test]
    fn test_smoothing_matches_formula() {
        let mut counts = HashMap::new();
        counts.insert("th".to_string(), 3);
        counts.insert("he".to_string(), 1);
        let table = NgramTable::from_counts(2, &counts);

        // total 4, V 2
        assert!((table.log_prob(&letters("th")) - (4.0f64 / 6.0).ln()).abs() < 1e-12);
        assert!((table.log_prob(&letters("he")) - (2.0f64 / 6.0).ln()).abs() < 1e-12);
        assert!((table.log_prob(&letters("qz")) - (1.0f64 / 6.0).ln()).abs() < 1e-12);
    }

    #[test]
    fn test_empty_table_is_uniform() {
        let table = NgramTable::from_counts(3, &HashMap::new());
        assert!(!table.is_populated());
        assert!((table.log_prob(&letters("abc")) - (1.0f64 / 17576.0).ln()).abs() < 1e-12);
    }

    #[test]
    fn test_corpus_counts() {
        let counts = NgramCounts::from_corpus("The the.");
        assert_eq!(counts.monograms["t"], 2);
        assert_eq!(counts.bigrams["th"], 2);
        assert_eq!(counts.bigrams["et"], 1);
        assert_eq!(counts.quadgrams.len(), 3);
    }

    #[test]
    fn test_add_rejects_non_letters() {
        let mut counts = NgramCounts::default();
        assert!(counts.add("TION", 5));
        assert!(!counts.add("t1on", 5));
        assert!(!counts.add("abcde", 5));
        assert_eq!(counts.quadgrams["tion"], 5);
    }

    #[test]
    fn test_ranking_defaults_to_fallback() {
        let model = LanguageModel::from_counts(&NgramCounts::default(), Vec::<String>::new());
        assert_eq!(model.ranking().to_vec(), only_letters(FALLBACK_RANKING));
    }

    #[test]
    fn test_partial_monograms_are_completed() {
        let mut counts = NgramCounts::default();
        counts.add("z", 10);
        counts.add("q", 5);
        let model = LanguageModel::from_counts(&counts, Vec::<String>::new());
        let ranking = model.ranking();
        assert_eq!(ranking[0], 25);
        assert_eq!(ranking[1], 16);
        assert_eq!(ranking[2], 4); // 'e' leads the remaining fallback letters

        let mut sorted = ranking.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..26).collect::<Vec<u8>>());
    }

    #[test]
    fn test_word_bonus() {
        let model = LanguageModel::from_counts(&NgramCounts::default(), ["the", "cat", "sat", "on", "x1z"]);
        assert_eq!(model.word_count(), 3);

        // Two of three runs match; "on" is too short to count.
        let text = "The cat xyz on";
        let expected = 150.0 * (2.0 / 3.0) * (14.0 / 2000.0);
        assert!((model.word_bonus(text) - expected).abs() < 1e-12);
        assert_eq!(model.word_bonus("no words here at all!"), 0.0);
    }

    #[test]
    fn test_short_text_scores_negative_infinity() {
        let model = LanguageModel::english();
        assert_eq!(model.ngram_score(&letters("a")), f64::NEG_INFINITY);
    }

    #[test]
    fn test_english_model_prefers_english() {
        let model = LanguageModel::english();
        assert!(model.word_count() > 500);
        assert_eq!(model.ranking()[0], 4);

        let english = model.score("the weather was cold and the river ran quickly past the old mill");
        let scrambled = model.score("qjx zkvwpy kbd fgyq bmw qjx ltzxn nbm ewtfdgs ybdq qjx gyv hlyy");
        assert!(english > scrambled);
    }

    #[test]
    fn test_load_dir_missing_files_fall_back() {
        let dir = std::env::temp_dir().join(format!("classical-breakers-empty-{}", std::process::id()));
        let model = LanguageModel::load_dir(&dir).unwrap();
        assert_eq!(model.word_count(), 0);
        assert_eq!(model.ranking().to_vec(), only_letters(FALLBACK_RANKING));
    }
}
