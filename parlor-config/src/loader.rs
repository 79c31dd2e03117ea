// Configuration file loaders

use crate::{ConfigError, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FileFormat {
    Json,
    Toml,
    Env,
}

impl FileFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(FileFormat::Json),
            "toml" => Some(FileFormat::Toml),
            "env" => Some(FileFormat::Env),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileFormat::Json => "JSON",
            FileFormat::Toml => "TOML",
            FileFormat::Env => ".env",
        }
    }
}

/// Configuration file loader
pub struct ConfigLoader {
    format: FileFormat,
}

impl ConfigLoader {
    pub fn new(format: FileFormat) -> Self {
        Self { format }
    }

    /// Auto-detect format from file extension
    pub fn auto(path: &Path) -> Result<Self> {
        let format = path
            .extension()
            .and_then(|s| s.to_str())
            .and_then(FileFormat::from_extension)
            .ok_or_else(|| ConfigError::UnsupportedFormat(path.display().to_string()))?;

        Ok(Self::new(format))
    }

    /// Load configuration from file
    pub fn load_file(&self, path: &Path) -> Result<Value> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        self.parse(&content)
    }

    /// Parse configuration from string; the result is always a JSON object
    pub fn parse(&self, content: &str) -> Result<Value> {
        let value = match self.format {
            FileFormat::Json => parse_json(content)?,
            FileFormat::Toml => parse_toml(content)?,
            FileFormat::Env => parse_env(content),
        };

        if !value.is_object() {
            return Err(ConfigError::Parse {
                format: self.format.as_str(),
                message: "the root must be a table of settings".to_string(),
            });
        }
        Ok(value)
    }
}

fn parse_json(content: &str) -> Result<Value> {
    serde_json::from_str(content).map_err(|e| ConfigError::Parse {
        format: "JSON",
        message: e.to_string(),
    })
}

fn parse_toml(content: &str) -> Result<Value> {
    let parse_error = |message: String| ConfigError::Parse {
        format: "TOML",
        message,
    };
    let table: toml::Table = toml::from_str(content).map_err(|e| parse_error(e.to_string()))?;

    serde_json::to_value(table).map_err(|e| parse_error(e.to_string()))
}

// KEY=value lines; keys are lowercased so `SERVER_URL` maps to `server_url`.
// Values stay strings, as they do when read from the environment.
fn parse_env(content: &str) -> Value {
    let mut map = serde_json::Map::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim().to_lowercase();
            let value = value.trim().trim_matches('"').trim_matches('\'');
            map.insert(key, Value::String(value.to_string()));
        }
    }

    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json() {
        let loader = ConfigLoader::new(FileFormat::Json);
        let result = loader
            .parse(r#"{"server_url": "ws://localhost:9000", "reconnect_delay_ms": 500}"#)
            .unwrap();
        assert_eq!(result["reconnect_delay_ms"], 500);
    }

    #[test]
    fn test_parse_toml() {
        let loader = ConfigLoader::new(FileFormat::Toml);
        let toml = r#"
            server_url = "wss://chat.example.com"
            connect_timeout_ms = 5000
        "#;

        let result = loader.parse(toml).unwrap();
        assert_eq!(result["server_url"], "wss://chat.example.com");
        assert_eq!(result["connect_timeout_ms"], 5000);
    }

    #[test]
    fn test_parse_env() {
        let loader = ConfigLoader::new(FileFormat::Env);
        let env = r#"
            SERVER_URL="ws://10.0.0.2:8000"
            RECONNECT_DELAY_MS=750
            # Comment
            PATH_PREFIX='sockets'
        "#;

        let result = loader.parse(env).unwrap();
        assert_eq!(result["server_url"], "ws://10.0.0.2:8000");
        assert_eq!(result["reconnect_delay_ms"], "750");
        assert_eq!(result["path_prefix"], "sockets");
    }

    #[test]
    fn test_non_table_root_is_rejected() {
        let loader = ConfigLoader::new(FileFormat::Json);
        assert!(matches!(loader.parse("[1, 2]"), Err(ConfigError::Parse { .. })));
        assert!(matches!(loader.parse("{"), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(FileFormat::from_extension("json"), Some(FileFormat::Json));
        assert_eq!(FileFormat::from_extension("TOML"), Some(FileFormat::Toml));
        assert_eq!(FileFormat::from_extension("env"), Some(FileFormat::Env));
        assert_eq!(FileFormat::from_extension("yaml"), None);

        assert!(ConfigLoader::auto(Path::new("parlor.toml")).is_ok());
        assert!(ConfigLoader::auto(Path::new("parlor")).is_err());
    }
}
