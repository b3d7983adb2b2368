use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use classical_breakers::{break_caesar, validate_and_filter};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Command-line arguments for the Caesar breaker.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Path to the input file containing encrypted text
    #[arg(short, long)]
    file: PathBuf,

    /// Path to the output file for the key and decrypted text
    #[arg(short, long)]
    output: PathBuf,

    /// Replace characters outside the allowed charset with spaces before breaking
    #[arg(long)]
    filter: bool,
}

/// Main entry point for the Caesar breaker.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
    let cli = Cli::parse();

    let mut content = fs::read_to_string(&cli.file)
        .with_context(|| format!("Failed to read {}", cli.file.display()))?;

    if cli.filter {
        let report = validate_and_filter(&content);
        if let Some(warning) = &report.warning {
            warn!("{}", warning);
        }
        content = report.filtered;
    }

    let result = break_caesar(&content);
    info!(key = result.key, chi_square = result.score, "caesar key recovered");
    println!("Detected cipher key: {}", result.key);

    // Line 1: key, then the plaintext
    fs::write(&cli.output, format!("{}\n{}", result.key, result.plaintext))
        .with_context(|| format!("Failed to write {}", cli.output.display()))?;

    Ok(())
}
