//! Error types for the classical breakers

use std::path::PathBuf;

use thiserror::Error;

/// Breaking itself never fails; these cover configuration and reference data.
#[derive(Error, Debug)]
pub enum BreakerError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}:{line}: {reason}")]
    Parse { path: PathBuf, line: usize, reason: String },
}

pub type Result<T> = std::result::Result<T, BreakerError>;
