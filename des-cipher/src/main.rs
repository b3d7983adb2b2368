//! DES file encryption
//!
//! Single DES with a 64-bit key (parity bits ignored) in ECB or CBC mode.
//! DES is broken by exhaustive search; this tool exists for coursework and
//! interoperability with legacy data.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use block_ciphers::{key_from_passphrase, parse_hex, to_hex, Algorithm, Mode, TextFormat};
use clap::{Parser, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Command-line arguments for the DES cipher program.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Path to the input file
    #[arg(short, long)]
    file: PathBuf,

    /// Path to the output file
    #[arg(short, long)]
    output: PathBuf,

    /// Key as hex (8 bytes)
    #[arg(short, long, conflicts_with = "passphrase", required_unless_present = "passphrase")]
    key: Option<String>,

    /// Use the raw bytes of an 8 character passphrase as key (no key stretching)
    #[arg(long)]
    passphrase: Option<String>,

    /// Operation (encrypt/decrypt)
    #[arg(short, long)]
    mode: Operation,

    /// Block mode of operation
    #[arg(short, long, value_enum, default_value_t = BlockMode::Cbc)]
    block_mode: BlockMode,

    /// Initialization vector as hex (CBC only, 8 bytes)
    #[arg(long)]
    iv: Option<String>,

    /// Text encoding of the ciphertext
    #[arg(long, value_enum, default_value_t = Encoding::Hex)]
    format: Encoding,
}

#[derive(Clone, Debug, ValueEnum)]
enum Operation {
    Encrypt,
    Decrypt,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BlockMode {
    Ecb,
    Cbc,
}

impl From<BlockMode> for Mode {
    fn from(mode: BlockMode) -> Self {
        match mode {
            BlockMode::Ecb => Mode::Ecb,
            BlockMode::Cbc => Mode::Cbc,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Encoding {
    Hex,
    Base64,
}

impl From<Encoding> for TextFormat {
    fn from(encoding: Encoding) -> Self {
        match encoding {
            Encoding::Hex => TextFormat::Hex,
            Encoding::Base64 => TextFormat::Base64,
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn read_key(cli: &Cli) -> Result<Vec<u8>> {
    let key = match (&cli.key, &cli.passphrase) {
        (Some(hex_key), _) => parse_hex(hex_key).context("Invalid key")?,
        (None, Some(passphrase)) => {
            warn!("using passphrase bytes directly as DES key");
            key_from_passphrase(passphrase, Algorithm::Des.key_sizes())?
        }
        (None, None) => bail!("Either --key or --passphrase is required"),
    };
    Ok(key)
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let key = read_key(&cli)?;
    let mode = Mode::from(cli.block_mode);
    let format = TextFormat::from(cli.format);
    let iv = mode.parse_iv(cli.iv.as_deref()).context("Invalid IV")?;

    match cli.mode {
        Operation::Encrypt => {
            let plaintext = fs::read(&cli.file)
                .with_context(|| format!("Failed to read {}", cli.file.display()))?;
            let (ciphertext, iv_used) =
                Algorithm::Des.encrypt_to_text(&plaintext, &key, mode, iv.as_deref(), format)?;
            fs::write(&cli.output, ciphertext)
                .with_context(|| format!("Failed to write {}", cli.output.display()))?;

            if let (Some(iv_used), None) = (iv_used, &iv) {
                println!("IV: {}", to_hex(&iv_used));
            }
            info!(bytes = plaintext.len(), %mode, "encrypted");
        }
        Operation::Decrypt => {
            let ciphertext = fs::read_to_string(&cli.file)
                .with_context(|| format!("Failed to read {}", cli.file.display()))?;
            let plaintext = Algorithm::Des.decrypt_from_text(&ciphertext, &key, mode, iv.as_deref(), format)?;
            fs::write(&cli.output, &plaintext)
                .with_context(|| format!("Failed to write {}", cli.output.display()))?;
            info!(bytes = plaintext.len(), %mode, "decrypted");
        }
    }

    Ok(())
}
