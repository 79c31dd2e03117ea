// Chat client settings

use crate::validation::{ConfigValidator, Validate};
use crate::Result;
use serde::{Deserialize, Deserializer, Serialize, de};
use std::time::Duration;

/// Settings for connecting to a chat server.
///
/// Missing keys fall back to their defaults, so a partial file or a single
/// environment variable is enough to override one setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Server origin, `ws://` or `wss://`
    pub server_url: String,
    /// Socket route prefix placed before `chat/<room>/`
    pub path_prefix: String,
    /// Fixed delay before reconnecting after any close
    #[serde(deserialize_with = "millis")]
    pub reconnect_delay_ms: u64,
    /// Handshake timeout for one connection attempt
    #[serde(deserialize_with = "millis")]
    pub connect_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: "ws://127.0.0.1:8000".to_string(),
            path_prefix: "ws".to_string(),
            reconnect_delay_ms: 2_000,
            connect_timeout_ms: 30_000,
        }
    }
}

impl ClientConfig {
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

// Environment and `.env` values arrive as strings.
fn millis<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Millis {
        Number(u64),
        Text(String),
    }

    match Millis::deserialize(deserializer)? {
        Millis::Number(ms) => Ok(ms),
        Millis::Text(text) => text.trim().parse().map_err(|_| {
            de::Error::custom(format!("expected milliseconds, got `{}`", text))
        }),
    }
}

impl Validate for ClientConfig {
    fn validate(&self) -> Result<()> {
        ConfigValidator::not_empty(&self.server_url, "server_url")?;
        ConfigValidator::is_ws_url(&self.server_url, "server_url")?;
        ConfigValidator::is_path(&self.path_prefix, "path_prefix")?;
        ConfigValidator::in_range(self.reconnect_delay_ms, 1, 3_600_000, "reconnect_delay_ms")?;
        ConfigValidator::in_range(self.connect_timeout_ms, 100, 600_000, "connect_timeout_ms")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.reconnect_delay(), Duration::from_secs(2));
        assert_eq!(config.connect_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_partial_input_keeps_defaults() {
        let config: ClientConfig =
            serde_json::from_value(serde_json::json!({"server_url": "wss://chat.example.com"}))
                .unwrap();
        assert_eq!(config.server_url, "wss://chat.example.com");
        assert_eq!(config.path_prefix, "ws");
        assert_eq!(config.reconnect_delay_ms, 2_000);
    }

    #[test]
    fn test_millis_accept_numbers_and_strings() {
        let config: ClientConfig = serde_json::from_value(serde_json::json!({
            "reconnect_delay_ms": "1500",
            "connect_timeout_ms": 4000,
            "path_prefix": "2",
        }))
        .unwrap();
        assert_eq!(config.reconnect_delay_ms, 1500);
        assert_eq!(config.connect_timeout_ms, 4000);
        assert_eq!(config.path_prefix, "2");

        let err = serde_json::from_value::<ClientConfig>(
            serde_json::json!({"reconnect_delay_ms": "soon"}),
        )
        .unwrap_err();
        assert!(err.to_string().contains("expected milliseconds"));
    }

    #[test]
    fn test_blank_server_url_is_rejected() {
        let config = ClientConfig {
            server_url: "  ".to_string(),
            ..ClientConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("cannot be empty"));
    }

    #[test]
    fn test_invalid_values() {
        let config = ClientConfig {
            server_url: "https://chat.example.com".to_string(),
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());

        let config = ClientConfig {
            reconnect_delay_ms: 0,
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
