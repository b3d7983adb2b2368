//! Monoalphabetic substitution breaker
//!
//! Writes the search score, the two-line key mapping and the recovered
//! plaintext to the output file.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use classical_breakers::{break_substitution, validate_and_filter, LanguageModel, SubstitutionConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Command-line arguments for the substitution breaker.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Path to the input file containing encrypted text
    #[arg(short, long)]
    file: PathBuf,

    /// Path to the output file for score, mapping and plaintext
    #[arg(short, long)]
    output: PathBuf,

    /// Number of hill-climbing restarts
    #[arg(long, default_value_t = 150)]
    rounds: usize,

    /// Maximum number of letters used for scoring
    #[arg(long, default_value_t = 10_000)]
    sample: usize,

    /// Stop once the best score has been reached this many times
    #[arg(long, default_value_t = 8)]
    consolidate: usize,

    /// Run every n-th restart with simulated annealing (0 = never)
    #[arg(long, default_value_t = 4)]
    anneal_every: usize,

    /// Seed for the random restarts; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Directory with english_*grams.txt count files and a word list,
    /// used instead of the built-in English model
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Replace characters outside the allowed charset with spaces before breaking
    #[arg(long)]
    filter: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
    let cli = Cli::parse();

    let config = SubstitutionConfig::builder()
        .rounds(cli.rounds)
        .sample_letters(cli.sample)
        .consolidate(cli.consolidate)
        .anneal_every(cli.anneal_every)
        .build()
        .context("Invalid search parameters")?;

    let loaded;
    let model = match &cli.data_dir {
        Some(dir) => {
            loaded = LanguageModel::load_dir(dir)?;
            &loaded
        }
        None => LanguageModel::english(),
    };

    let mut ciphertext = fs::read_to_string(&cli.file)
        .with_context(|| format!("Failed to read {}", cli.file.display()))?;
    if cli.filter {
        let report = validate_and_filter(&ciphertext);
        if let Some(warning) = &report.warning {
            warn!("{}", warning);
        }
        ciphertext = report.filtered;
    }

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let result = break_substitution(&ciphertext, model, &config, &mut rng)?;
    info!(score = result.score, rounds = result.rounds, "substitution search finished");

    let cipher_line = result.key.cipher_line();
    let plain_line = result.key.plain_line();
    let report = format!(
        "Score / Log-likelihood: {:.2}\n{}\n{}\n{}",
        result.score, cipher_line, plain_line, result.plaintext
    );
    fs::write(&cli.output, report).with_context(|| format!("Failed to write {}", cli.output.display()))?;

    println!("Score / Log-likelihood = {:.2}", result.score);
    println!("Mapping:");
    println!("    {}", cipher_line);
    println!("    {}", plain_line);
    Ok(())
}
