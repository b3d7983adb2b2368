use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use classical_breakers::{break_vigenere_with, validate_and_filter, VigenereConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Command-line arguments for the Vigenère breaker.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Path to the input file containing encrypted text
    #[arg(short, long)]
    file: PathBuf,

    /// Path to the output file for the key and decrypted text
    #[arg(short, long)]
    output: PathBuf,

    /// Shortest key length to consider
    #[arg(long, default_value_t = 2)]
    min_key_len: usize,

    /// Longest key length to consider
    #[arg(long, default_value_t = 30)]
    max_key_len: usize,

    /// Number of best key lengths that are decrypted and compared
    #[arg(long, default_value_t = 5)]
    candidates: usize,

    /// Replace characters outside the allowed charset with spaces before breaking
    #[arg(long)]
    filter: bool,

    /// Also write the chi-square score of the plaintext
    #[arg(long)]
    score: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
    let cli = Cli::parse();

    let config = VigenereConfig {
        min_key_len: cli.min_key_len,
        max_key_len: cli.max_key_len,
        candidates: cli.candidates,
        ..Default::default()
    };
    config.validate()?;

    let input = fs::read_to_string(&cli.file)
        .with_context(|| format!("Failed to read {}", cli.file.display()))?;
    let input = if cli.filter {
        let report = validate_and_filter(&input);
        if let Some(warning) = &report.warning {
            warn!("{}", warning);
        }
        report.filtered
    } else {
        input
    };

    let result = break_vigenere_with(&input, &config);
    info!(key = %result.key, key_length = result.key.len(), chi_square = result.score, "vigenere key recovered");

    // Key to stdout, then key + plaintext to the output file
    println!("{}", result.key);
    let mut output = format!("{}\n", result.key);
    if cli.score {
        output.push_str(&format!("Chi-square: {:.2}\n", result.score));
    }
    output.push_str(&result.plaintext);

    fs::write(&cli.output, output).with_context(|| format!("Failed to write {}", cli.output.display()))?;
    Ok(())
}
