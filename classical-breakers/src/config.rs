//! Tuning parameters for the searching breakers

use crate::error::{BreakerError, Result};

/// Configuration for the random-restart substitution search
///
/// The early-stop thresholds are empirical; they trade run time for the
/// chance of confirming the best key more than once.
#[derive(Debug, Clone, PartialEq)]
pub struct SubstitutionConfig {
    /// Maximum number of hill-climbing restarts
    pub rounds: usize,

    /// Upper bound on the number of letters scored per candidate
    pub sample_letters: usize,

    /// Stop once the best score has been reached this many times
    pub consolidate: usize,

    /// Scores within this distance count as "the same" optimum
    pub score_tolerance: f64,

    /// Stop after this many rounds that neither improve nor confirm the best
    pub max_stale_rounds: usize,

    /// Cap on accepted swaps within one climb
    pub max_iterations: usize,

    /// Every n-th round (after the first) runs with simulated annealing; 0 disables it
    pub anneal_every: usize,

    pub initial_temperature: f64,

    pub cooling_rate: f64,
}

impl Default for SubstitutionConfig {
    fn default() -> Self {
        Self {
            rounds: 80,
            sample_letters: 8000,
            consolidate: 6,
            score_tolerance: 0.3,
            max_stale_rounds: 20,
            max_iterations: 2000,
            anneal_every: 0,
            initial_temperature: 30.0,
            cooling_rate: 0.995,
        }
    }
}

impl SubstitutionConfig {
    pub fn builder() -> SubstitutionConfigBuilder {
        SubstitutionConfigBuilder::default()
    }

    /// Number of letters to score for a ciphertext with `letter_count` letters.
    ///
    /// Very long texts are scored on a 6000-letter prefix, long ones on up to
    /// 7000 letters, and short ones in full; `sample_letters` caps all three.
    pub fn sample_size(&self, letter_count: usize) -> usize {
        let size = if letter_count > 8000 {
            6000
        } else if letter_count > 4000 {
            7000
        } else {
            letter_count
        };
        size.min(self.sample_letters).min(letter_count)
    }

    /// Whether `round` (0-based) uses simulated annealing.
    pub fn anneals(&self, round: usize) -> bool {
        self.anneal_every > 0 && round > 0 && round % self.anneal_every == 0
    }

    pub fn validate(&self) -> Result<()> {
        if self.rounds == 0 {
            return Err(BreakerError::InvalidConfig("rounds must be positive".to_string()));
        }
        if self.sample_letters < 4 {
            return Err(BreakerError::InvalidConfig(
                "sample_letters must cover at least one quadgram".to_string(),
            ));
        }
        if self.consolidate == 0 {
            return Err(BreakerError::InvalidConfig("consolidate must be positive".to_string()));
        }
        if !(self.score_tolerance >= 0.0) {
            return Err(BreakerError::InvalidConfig(
                "score_tolerance must be non-negative".to_string(),
            ));
        }
        if self.max_iterations == 0 {
            return Err(BreakerError::InvalidConfig("max_iterations must be positive".to_string()));
        }
        if self.anneal_every > 0 {
            if !(self.initial_temperature > 0.0) {
                return Err(BreakerError::InvalidConfig(
                    "initial_temperature must be positive".to_string(),
                ));
            }
            if !(self.cooling_rate > 0.0 && self.cooling_rate < 1.0) {
                return Err(BreakerError::InvalidConfig(
                    "cooling_rate must lie in (0, 1)".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Builder for [`SubstitutionConfig`]
#[derive(Debug, Default)]
pub struct SubstitutionConfigBuilder {
    config: SubstitutionConfig,
}

impl SubstitutionConfigBuilder {
    pub fn rounds(mut self, rounds: usize) -> Self {
        self.config.rounds = rounds;
        self
    }

    pub fn sample_letters(mut self, letters: usize) -> Self {
        self.config.sample_letters = letters;
        self
    }

    pub fn consolidate(mut self, hits: usize) -> Self {
        self.config.consolidate = hits;
        self
    }

    pub fn score_tolerance(mut self, tolerance: f64) -> Self {
        self.config.score_tolerance = tolerance;
        self
    }

    pub fn max_stale_rounds(mut self, rounds: usize) -> Self {
        self.config.max_stale_rounds = rounds;
        self
    }

    pub fn max_iterations(mut self, iterations: usize) -> Self {
        self.config.max_iterations = iterations;
        self
    }

    /// Enable annealing on every `every`-th round
    pub fn anneal_every(mut self, every: usize) -> Self {
        self.config.anneal_every = every;
        self
    }

    pub fn initial_temperature(mut self, temperature: f64) -> Self {
        self.config.initial_temperature = temperature;
        self
    }

    pub fn cooling_rate(mut self, rate: f64) -> Self {
        self.config.cooling_rate = rate;
        self
    }

    pub fn build(self) -> Result<SubstitutionConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Configuration for the Vigenère key-length search
#[derive(Debug, Clone, PartialEq)]
pub struct VigenereConfig {
    pub min_key_len: usize,
    pub max_key_len: usize,
    /// How many of the best-ranked key lengths are fully decrypted and compared
    pub candidates: usize,
    /// Below this many letters the text is returned undecrypted
    pub min_letters: usize,
}

impl Default for VigenereConfig {
    fn default() -> Self {
        Self {
            min_key_len: 2,
            max_key_len: 30,
            candidates: 5,
            min_letters: 20,
        }
    }
}

impl VigenereConfig {
    /// Key lengths worth testing for a text with `letter_count` letters.
    ///
    /// Each column needs at least two letters, so lengths above half the
    /// letter count are skipped.
    pub fn key_lengths(&self, letter_count: usize) -> std::ops::RangeInclusive<usize> {
        let max = self.max_key_len.min(letter_count / 2);
        self.min_key_len..=max
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_key_len == 0 {
            return Err(BreakerError::InvalidConfig("min_key_len must be positive".to_string()));
        }
        if self.max_key_len < self.min_key_len {
            return Err(BreakerError::InvalidConfig(format!(
                "max_key_len {} is below min_key_len {}",
                self.max_key_len, self.min_key_len
            )));
        }
        if self.candidates == 0 {
            return Err(BreakerError::InvalidConfig("candidates must be positive".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SubstitutionConfig::default();
        assert_eq!(config.rounds, 80);
        assert_eq!(config.consolidate, 6);
        assert!(config.validate().is_ok());
        assert!(VigenereConfig::default().validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = SubstitutionConfig::builder()
            .rounds(10)
            .anneal_every(4)
            .build()
            .unwrap();
        assert_eq!(config.rounds, 10);
        assert!(!config.anneals(0));
        assert!(!config.anneals(3));
        assert!(config.anneals(4));
        assert!(config.anneals(8));
    }

    #[test]
    fn test_annealing_off_by_default() {
        let config = SubstitutionConfig::default();
        assert!((0..80).all(|round| !config.anneals(round)));
    }

    #[test]
    fn test_invalid_config() {
        assert!(SubstitutionConfig::builder().rounds(0).build().is_err());
        assert!(SubstitutionConfig::builder().anneal_every(2).cooling_rate(1.5).build().is_err());
        assert!(SubstitutionConfig::builder().score_tolerance(f64::NAN).build().is_err());

        let vigenere = VigenereConfig { min_key_len: 10, max_key_len: 5, ..Default::default() };
        assert!(matches!(vigenere.validate(), Err(BreakerError::InvalidConfig(_))));
    }

    #[test]
    fn test_sample_size_rule() {
        let config = SubstitutionConfig::default();
        assert_eq!(config.sample_size(1200), 1200);
        assert_eq!(config.sample_size(4000), 4000);
        assert_eq!(config.sample_size(5000), 5000);
        assert_eq!(config.sample_size(7500), 7000);
        assert_eq!(config.sample_size(20_000), 6000);

        let small = SubstitutionConfig { sample_letters: 500, ..Default::default() };
        assert_eq!(small.sample_size(3000), 500);
    }

    #[test]
    fn test_key_lengths_capped_by_text() {
        let config = VigenereConfig::default();
        assert_eq!(config.key_lengths(1000), 2..=30);
        assert_eq!(config.key_lengths(24), 2..=12);
    }
}
