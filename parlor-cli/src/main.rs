//! Parlor CLI - chat in real-time rooms from the terminal.
//!
//! # Commands
//!
//! - `parlor join <room>` - Join a room; type a line and press Enter to send
//! - `parlor resolve <selection>` - Show the page path and socket for a room label
//!
//! Inside a room, `/who` lists the users online and `/quit` leaves.

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use parlor_log::{Level, LogConfig};
use std::path::PathBuf;

mod commands;
mod error;
mod settings;
mod terminal;

use commands::{join, resolve};
use error::CliResult;
use settings::Overrides;

/// Parlor - real-time chat rooms in your terminal
#[derive(Parser)]
#[command(name = "parlor")]
#[command(author = "Pegasus Heavy Industries LLC")]
#[command(version)]
#[command(about = "Terminal client for Parlor chat rooms")]
#[command(long_about = None)]
#[command(propagate_version = true)]
#[command(after_help = format!(
    "{}\n  {} parlor join lobby\n  {} parlor join \"night owls\" --server wss://chat.example.com\n  {} parlor resolve \"lobby (3 online)\"",
    "Examples:".bright_cyan().bold(),
    "$".dimmed(),
    "$".dimmed(),
    "$".dimmed(),
))]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Enable verbose output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Join a chat room
    #[command(alias = "j")]
    Join(JoinArgs),

    /// Resolve a room-selection label to its page path and socket endpoint
    #[command(alias = "r")]
    Resolve(ResolveArgs),
}

/// Settings shared by every command
#[derive(Args)]
struct ConnectionArgs {
    /// Server origin (ws:// or wss://)
    #[arg(short, long, env = "PARLOR_SERVER_URL")]
    server: Option<String>,

    /// Configuration file (.toml, .json or .env)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Args)]
struct JoinArgs {
    /// Room to join; a label like "lobby (3 online)" also works
    room: String,

    #[command(flatten)]
    connection: ConnectionArgs,

    /// Milliseconds to wait before reconnecting after a disconnect
    #[arg(long)]
    reconnect_delay_ms: Option<u64>,
}

#[derive(Args)]
struct ResolveArgs {
    /// Room-selection label, e.g. "lobby (3 online)"
    selection: String,

    #[command(flatten)]
    connection: ConnectionArgs,
}

fn log_config(cli: &Cli) -> LogConfig {
    let config = LogConfig::from_env();
    if cli.quiet {
        config.with_level(Level::Error)
    } else if cli.verbose {
        let level = config.level.more_verbose().more_verbose();
        config.with_level(level)
    } else {
        config
    }
}

async fn dispatch(cli: Cli) -> CliResult<()> {
    parlor_log::init(&log_config(&cli))?;

    match cli.command {
        Commands::Join(args) => {
            let overrides = Overrides {
                server_url: args.connection.server,
                reconnect_delay_ms: args.reconnect_delay_ms,
            };
            let config = settings::load(args.connection.config.as_deref(), &overrides)?;
            join::run(&args.room, &config).await
        }

        Commands::Resolve(args) => {
            let overrides = Overrides {
                server_url: args.connection.server,
                ..Overrides::default()
            };
            let config = settings::load(args.connection.config.as_deref(), &overrides)?;
            resolve::run(&args.selection, &config)
        }
    }
}

// =============================================================================
// MAIN
// =============================================================================

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    // Handle color preferences
    if cli.no_color {
        colored::control::set_override(false);
    }

    let code = match dispatch(cli).await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("\n  {} {}\n", "Error:".red().bold(), e);
            1
        }
    };

    // A pending stdin read would otherwise keep the runtime alive.
    std::process::exit(code);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_join() {
        let cli = Cli::parse_from([
            "parlor",
            "join",
            "lobby",
            "--server",
            "ws://localhost:9000",
            "--reconnect-delay-ms",
            "500",
        ]);
        match cli.command {
            Commands::Join(args) => {
                assert_eq!(args.room, "lobby");
                assert_eq!(args.connection.server.as_deref(), Some("ws://localhost:9000"));
                assert_eq!(args.reconnect_delay_ms, Some(500));
            }
            Commands::Resolve(_) => panic!("expected join"),
        }
    }

    #[test]
    fn test_quiet_wins_log_level() {
        let cli = Cli::parse_from(["parlor", "--quiet", "resolve", "lobby"]);
        assert_eq!(log_config(&cli).level, Level::Error);
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["parlor", "-v", "-q", "resolve", "lobby"]).is_err());
    }
}
