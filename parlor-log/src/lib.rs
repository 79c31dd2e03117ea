//! Parlor Logging
//!
//! Installs a `tracing` subscriber for the Parlor binaries. Library crates log
//! through `tracing` macros; this crate decides level, format, and colour.
//!
//! Output goes to stderr so it never mixes with the chat log on stdout.
//!
//! # Environment Variables
//!
//! - `PARLOR_DEBUG=1` - Enable debug logging
//! - `PARLOR_LOG_LEVEL=trace|debug|info|warn|error|off` - Set log level
//! - `PARLOR_LOG_FORMAT=pretty|compact|json` - Set output format
//! - `PARLOR_LOG_COLOR=1|0` - Enable/disable colors
//! - `RUST_LOG` - Full filter directive; wins over the level above
//!
//! # Usage
//!
//! ```rust,no_run
//! let config = parlor_log::LogConfig::from_env();
//! parlor_log::init(&config).ok();
//! tracing::info!("client started");
//! ```

use std::env;
use std::fmt;
use tracing_subscriber::{fmt as subscriber_fmt, prelude::*, EnvFilter};

// ============================================================================
// Log Levels
// ============================================================================

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    /// Trace level (most verbose)
    Trace,
    /// Debug level
    Debug,
    /// Info level
    Info,
    /// Warning level
    Warn,
    /// Error level (least verbose)
    Error,
    /// Off (no logging)
    Off,
}

impl Level {
    /// Parse a level name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Some(Level::Trace),
            "debug" => Some(Level::Debug),
            "info" => Some(Level::Info),
            "warn" | "warning" => Some(Level::Warn),
            "error" => Some(Level::Error),
            "off" | "none" => Some(Level::Off),
            _ => None,
        }
    }

    /// Filter directive for this level.
    pub fn as_directive(&self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Off => "off",
        }
    }

    /// One step more verbose, saturating at trace.
    pub fn more_verbose(self) -> Self {
        match self {
            Level::Off => Level::Error,
            Level::Error => Level::Warn,
            Level::Warn => Level::Info,
            Level::Info => Level::Debug,
            Level::Debug | Level::Trace => Level::Trace,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_directive())
    }
}

// ============================================================================
// Log Format
// ============================================================================

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Multi-line, human oriented
    Pretty,
    /// Single line per event
    Compact,
    /// One JSON object per event
    Json,
}

impl Format {
    /// Parse a format name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Some(Format::Pretty),
            "compact" => Some(Format::Compact),
            "json" => Some(Format::Json),
            _ => None,
        }
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Minimum level
    pub level: Level,
    /// Output format
    pub format: Format,
    /// Whether to emit ANSI colours
    pub color: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::Warn,
            format: Format::Compact,
            color: false,
        }
    }
}

impl LogConfig {
    /// Read configuration from `PARLOR_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read configuration through a variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let flag = |key: &str| lookup(key).map(|v| v == "1" || v.eq_ignore_ascii_case("true"));
        let defaults = Self::default();

        let debug = flag("PARLOR_DEBUG").unwrap_or(false);

        let level = lookup("PARLOR_LOG_LEVEL")
            .and_then(|s| Level::parse(&s))
            .unwrap_or(if debug { Level::Debug } else { defaults.level });

        let format = lookup("PARLOR_LOG_FORMAT")
            .and_then(|s| Format::parse(&s))
            .unwrap_or(defaults.format);

        let color = flag("PARLOR_LOG_COLOR")
            .unwrap_or_else(|| lookup("NO_COLOR").is_none() && lookup("TERM").is_some());

        Self {
            level,
            format,
            color,
        }
    }

    /// Replace the level.
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }
}

/// Error returned when a global subscriber is already installed.
#[derive(Debug)]
pub struct InitError(String);

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to install log subscriber: {}", self.0)
    }
}

impl std::error::Error for InitError {}

// ============================================================================
// Subscriber
// ============================================================================

/// Build the filter for a config. `RUST_LOG`, when set and valid, wins.
pub fn filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.level.as_directive()))
}

/// Install the global subscriber.
///
/// # Errors
///
/// Returns [`InitError`] if a global subscriber was already set.
pub fn init(config: &LogConfig) -> Result<(), InitError> {
    let registry = tracing_subscriber::registry().with(filter(config));
    let layer = subscriber_fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(config.color);

    let result = match config.format {
        Format::Pretty => registry.with(layer.pretty()).try_init(),
        Format::Compact => registry.with(layer.compact()).try_init(),
        Format::Json => registry.with(layer.json()).try_init(),
    };

    result.map_err(|e| InitError(e.to_string()))
}

// ============================================================================
// Tests
// ============================================================================
