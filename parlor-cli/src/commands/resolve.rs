//! Resolve command - turn a room-selection label into its addresses.

use colored::Colorize;
use parlor_config::ClientConfig;
use parlor_websocket::{RoomEndpoint, RoomId};
use url::Url;

use crate::error::{CliError, CliResult};

/// Where a selected room lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub room: RoomId,
    pub page_path: String,
    pub endpoint: Url,
}

/// Resolve a label such as `lobby (3 online)`.
pub fn resolve(selection: &str, config: &ClientConfig) -> CliResult<Resolution> {
    let room = RoomId::from_selection(selection);
    if room.as_str().trim().is_empty() {
        return Err(CliError::InvalidArgument(format!(
            "no room name in `{}`",
            selection
        )));
    }

    let endpoint = RoomEndpoint::new(&config.server_url, &config.path_prefix)?.for_room(&room);

    Ok(Resolution {
        page_path: room.page_path(),
        room,
        endpoint,
    })
}

/// Print the resolution of a selection label.
pub fn run(selection: &str, config: &ClientConfig) -> CliResult<()> {
    let resolution = resolve(selection, config)?;

    println!("  {} {}", "Room:".bright_white().bold(), resolution.room.as_str().cyan());
    println!("  {} {}", "Page:".bright_white().bold(), resolution.page_path);
    println!("  {} {}", "Socket:".bright_white().bold(), resolution.endpoint);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_selection_label() {
        let resolution = resolve("lobby (3 online)", &ClientConfig::default()).unwrap();

        assert_eq!(resolution.room.as_str(), "lobby");
        assert_eq!(resolution.page_path, "chat/lobby/");
        assert_eq!(
            resolution.endpoint.as_str(),
            "ws://127.0.0.1:8000/ws/chat/lobby/"
        );
    }

    #[test]
    fn test_resolve_plain_name_with_custom_server() {
        let config = ClientConfig {
            server_url: "wss://chat.example.com".to_string(),
            path_prefix: "live".to_string(),
            ..ClientConfig::default()
        };
        let resolution = resolve("night owls", &config).unwrap();

        assert_eq!(
            resolution.endpoint.as_str(),
            "wss://chat.example.com/live/chat/night%20owls/"
        );
    }

    #[test]
    fn test_resolve_rejects_blank_selection() {
        assert!(matches!(
            resolve(" (0 online)", &ClientConfig::default()),
            Err(CliError::InvalidArgument(_))
        ));
    }
}
