//! Error types for configuration building and JSON environment expansion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors returned while loading sources or expanding environment overrides.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading a config file failed.
    #[error("failed to read config: {0}")]
    ReadFailed(#[from] std::io::Error),
    /// Parsing a config file failed.
    #[error("failed to parse config: {0}")]
    ParseFailed(#[from] json5::Error),
    /// Converting JSON values failed.
    #[error("failed to decode config: {0}")]
    DecodeFailed(#[from] serde_json::Error),
    /// An eligible environment variable held malformed JSON.
    #[error("failed to parse JSON in environment variable {variable}: {source}")]
    InvalidEnvironmentJson {
        variable: String,
        #[source]
        source: serde_json::Error,
    },
    /// A config file root was a scalar instead of an object or array.
    #[error("invalid config at {}: root must be an object or array", path.display())]
    InvalidFileRoot { path: PathBuf },
    /// No extension is registered under the requested name.
    #[error("unknown extension: {0}")]
    UnknownExtension(String),
    /// Generic validation failure.
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Name of the environment variable that caused the failure, if any.
    pub fn variable(&self) -> Option<&str> {
        match self {
            Self::InvalidEnvironmentJson { variable, .. } => Some(variable),
            _ => None,
        }
    }
}
