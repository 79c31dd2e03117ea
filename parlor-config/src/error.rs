// Error types for client configuration

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("unsupported config file `{0}`; expected .toml, .json or .env")]
    UnsupportedFormat(String),

    #[error("invalid {format} config: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },

    #[error("invalid `{field}`: {reason}")]
    Invalid { field: String, reason: String },

    #[error("cannot encode `{key}`: {message}")]
    Encode { key: String, message: String },

    #[error("settings do not match the expected shape: {0}")]
    Decode(String),

    #[error("cannot load .env file: {0}")]
    DotEnv(#[from] dotenvy::Error),
}

impl ConfigError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
