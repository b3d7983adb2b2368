//! AES file encryption
//!
//! Encrypts a file under AES-128/192/256 (chosen by key length) in ECB or
//! CBC mode with PKCS#7 padding, writing the ciphertext as hex or base64.
//! Decryption reverses this. For CBC without `--iv` a random IV is drawn
//! and printed, since it is needed again for decryption.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use block_ciphers::{key_from_passphrase, parse_hex, to_hex, Algorithm, Mode, TextFormat};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command-line arguments for the AES cipher program.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Path to the input file
    #[arg(short, long)]
    file: PathBuf,

    /// Path to the output file
    #[arg(short, long)]
    output: PathBuf,

    /// Key as hex (16, 24 or 32 bytes)
    #[arg(short, long, conflicts_with = "passphrase", required_unless_present = "passphrase")]
    key: Option<String>,

    /// Use the raw bytes of a 16, 24 or 32 character passphrase as key (no key stretching)
    #[arg(long)]
    passphrase: Option<String>,

    /// Operation (encrypt/decrypt)
    #[arg(short, long)]
    mode: Operation,

    /// Block mode of operation
    #[arg(short, long, value_enum, default_value_t = BlockMode::Cbc)]
    block_mode: BlockMode,

    /// Initialization vector as hex (CBC only, 16 bytes)
    #[arg(long)]
    iv: Option<String>,

    /// Text encoding of the ciphertext
    #[arg(long, value_enum, default_value_t = Encoding::Hex)]
    format: Encoding,

    /// Treat the plaintext file as hex instead of raw bytes
    #[arg(long)]
    hex_plaintext: bool,
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
    let algorithm = Algorithm::Aes;
    let key = match (&cli.key, &cli.passphrase) {
        (Some(hex_key), _) => parse_hex(hex_key).context("Invalid key")?,
        (None, Some(passphrase)) => key_from_passphrase(passphrase, algorithm.key_sizes())?,
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
            let input = fs::read(&cli.file)
                .with_context(|| format!("Failed to read {}", cli.file.display()))?;
            let plaintext = if cli.hex_plaintext {
                parse_hex(&String::from_utf8_lossy(&input)).context("Plaintext file is not valid hex")?
            } else {
                input
            };

            let (ciphertext, iv_used) =
                Algorithm::Aes.encrypt_to_text(&plaintext, &key, mode, iv.as_deref(), format)?;
            fs::write(&cli.output, ciphertext)
                .with_context(|| format!("Failed to write {}", cli.output.display()))?;

            if let Some(iv_used) = iv_used {
                if iv.is_none() {
                    println!("IV: {}", to_hex(&iv_used));
                }
            }
            info!(bytes = plaintext.len(), %mode, key_bits = key.len() * 8, "encrypted");
        }
        Operation::Decrypt => {
            let input = fs::read_to_string(&cli.file)
                .with_context(|| format!("Failed to read {}", cli.file.display()))?;
            let plaintext = Algorithm::Aes.decrypt_from_text(&input, &key, mode, iv.as_deref(), format)?;

            let output = if cli.hex_plaintext { to_hex(&plaintext).into_bytes() } else { plaintext };
            fs::write(&cli.output, &output)
                .with_context(|| format!("Failed to write {}", cli.output.display()))?;
            info!(bytes = output.len(), %mode, "decrypted");
        }
    }

    Ok(())
}
