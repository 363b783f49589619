use thiserror::Error;

use crate::config::ConfigError;

/// Durable preference storage failures
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Serialize error: {0}")]
    Serialize(toml::ser::Error),
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Crate-level error
#[derive(Debug, Error)]
pub enum InclinometerError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, InclinometerError>;
