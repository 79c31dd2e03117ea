//! Client settings assembled from file, environment, and flags.

use parlor_config::{ClientConfig, ConfigManager};
use std::path::Path;

use crate::error::CliResult;

/// Prefix for settings read from the environment, e.g. `PARLOR_SERVER_URL`.
pub const ENV_PREFIX: &str = "PARLOR";

/// Values given on the command line. They win over every other source.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub server_url: Option<String>,
    pub reconnect_delay_ms: Option<u64>,
}

/// Load and validate the client settings.
///
/// Later sources win: config file, `.env`, `PARLOR_*` variables, flags.
pub fn load(config_file: Option<&Path>, overrides: &Overrides) -> CliResult<ClientConfig> {
    let manager = ConfigManager::with_prefix(ENV_PREFIX);

    if let Some(path) = config_file {
        manager.load_file(path)?;
    }

    manager.load_dotenv(None)?;
    apply(&manager, overrides)?;

    for key in manager.keys() {
        if let Some(layer) = manager.layer_of(&key) {
            tracing::debug!(key = %key, layer = %layer, "Setting source");
        }
    }

    let config = manager.load_validated()?;
    tracing::debug!(?config, "Loaded client settings");
    Ok(config)
}

fn apply(manager: &ConfigManager, overrides: &Overrides) -> CliResult<()> {
    if let Some(url) = &overrides.server_url {
        manager.set("server_url", url)?;
    }
    if let Some(delay) = overrides.reconnect_delay_ms {
        manager.set("reconnect_delay_ms", delay)?;
    }
    Ok(())
}
