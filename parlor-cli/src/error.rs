//! Error types for the Parlor CLI.

use std::fmt;

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// CLI error types.
#[derive(Debug)]
pub enum CliError {
    /// IO error (terminal input and output)
    Io(std::io::Error),

    /// Configuration could not be loaded or failed validation
    Config(String),

    /// Chat client error (endpoint construction, message encoding)
    Chat(String),

    /// Logging setup error
    Log(String),

    /// Invalid argument
    InvalidArgument(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "IO error: {}", e),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Chat(msg) => write!(f, "Chat error: {}", msg),
            CliError::Log(msg) => write!(f, "Logging error: {}", msg),
            CliError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
        }
    }
}

impl std::error::Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}

impl From<parlor_config::ConfigError> for CliError {
    fn from(e: parlor_config::ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<parlor_websocket::ChatError> for CliError {
    fn from(e: parlor_websocket::ChatError) -> Self {
        CliError::Chat(e.to_string())
    }
}

impl From<parlor_log::InitError> for CliError {
    fn from(e: parlor_log::InitError) -> Self {
        CliError::Log(e.to_string())
    }
}
