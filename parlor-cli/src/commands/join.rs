//! Join command - chat in a room from the terminal.
//!
//! One task drives everything: stdin lines, inbound frames, and state
//! changes are selected in turn, and each is handled to completion before
//! the next is taken.

use colored::Colorize;
use parlor_config::ClientConfig;
use parlor_websocket::{
    ChatError, ConnectionManager, ConnectionState, EventRouter, ManagerConfig, OutboundMessage,
    RoomId, TungsteniteConnector,
};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::error::CliResult;
use crate::terminal::TerminalView;

/// A line typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input<'a> {
    /// Text to send to the room
    Say(&'a str),
    /// `/who`: print the roster
    Who,
    /// `/quit`: leave
    Quit,
    /// Blank line
    Nothing,
}

impl<'a> Input<'a> {
    pub fn parse(line: &'a str) -> Self {
        match line.trim() {
            "" => Input::Nothing,
            "/who" => Input::Who,
            "/quit" => Input::Quit,
            _ => Input::Say(line),
        }
    }
}

/// Join `room` and run until `/quit`, end of input, or Ctrl-C.
pub async fn run(room: &str, config: &ClientConfig) -> CliResult<()> {
    let room = RoomId::from_selection(room);
    let connector = TungsteniteConnector::new().connect_timeout(config.connect_timeout());
    let manager = ConnectionManager::new(
        connector,
        ManagerConfig {
            server_url: config.server_url.clone(),
            path_prefix: config.path_prefix.clone(),
            reconnect_delay: config.reconnect_delay(),
        },
    )?;

    let (handle, mut frames) = manager.open(room);
    let mut state = handle.watch_state();
    let router = EventRouter::new();
    let mut view = TerminalView::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    eprintln!(
        "  {} {} {}",
        "Joining".bright_cyan().bold(),
        handle.room().as_str().cyan(),
        format!("({})", handle.url()).dimmed()
    );

    loop {
        tokio::select! {
            frame = frames.recv() => match frame {
                Some(frame) => {
                    router.handle(&frame, &mut view);
                }
                None => break,
            },

            line = lines.next_line() => match line? {
                Some(line) => match Input::parse(&line) {
                    Input::Quit => break,
                    Input::Who => view.print_roster()?,
                    Input::Nothing => {}
                    Input::Say(text) => say(&handle, text),
                },
                None => break,
            },

            Ok(()) = state.changed() => {
                let current = *state.borrow_and_update();
                print_state(current, config);
            }

            _ = tokio::signal::ctrl_c() => break,
        }
    }

    tracing::info!(room = %handle.room(), "Leaving room");
    Ok(())
}

fn say(handle: &parlor_websocket::ConnectionHandle, text: &str) {
    match OutboundMessage::new(text) {
        Ok(message) => {
            if !handle.send(&message) {
                eprintln!("  {}", "Not connected; message not sent.".yellow());
            }
        }
        Err(ChatError::EmptyMessage) => {}
        Err(e) => tracing::warn!(error = %e, "Could not build message"),
    }
}

fn print_state(state: ConnectionState, config: &ClientConfig) {
    match state {
        ConnectionState::Connected => eprintln!("  {}", "Connected.".green()),
        ConnectionState::Reconnecting => eprintln!(
            "  {}",
            format!(
                "Connection lost; reconnecting in {} ms.",
                config.reconnect_delay_ms
            )
            .yellow()
        ),
        ConnectionState::Connecting | ConnectionState::Disconnected => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Input::parse("/who"), Input::Who);
        assert_eq!(Input::parse("  /quit "), Input::Quit);
        assert_eq!(Input::parse("   "), Input::Nothing);
        assert_eq!(Input::parse(""), Input::Nothing);
    }

    #[test]
    fn test_text_is_kept_as_typed() {
        assert_eq!(Input::parse(" hi there "), Input::Say(" hi there "));
        assert_eq!(Input::parse("/whois"), Input::Say("/whois"));
    }
}
