// Layered configuration for the Parlor chat client
//
// Values are merged in the order they are loaded and later layers win. The
// client loads a file, then `.env`, then the process environment, and finally
// applies command line overrides with `set`.

pub mod client;
pub mod env;
pub mod error;
pub mod loader;
pub mod validation;

pub use client::ClientConfig;
pub use env::EnvLoader;
pub use error::{ConfigError, Result};
pub use loader::{ConfigLoader, FileFormat};
pub use validation::{ConfigValidator, Validate};

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Where a setting came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    /// A configuration file
    File,
    /// The process environment, including variables loaded from `.env`
    Env,
    /// An explicit `set`, typically a command line flag
    Override,
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Layer::File => "file",
            Layer::Env => "environment",
            Layer::Override => "override",
        })
    }
}

#[derive(Debug, Clone)]
struct Entry {
    value: Value,
    layer: Layer,
}

/// Settings merged from every layer loaded so far.
#[derive(Clone, Default)]
pub struct ConfigManager {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
    env_prefix: Option<String>,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only variables named `<PREFIX>_<KEY>` are read from the environment.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            env_prefix: Some(prefix.into()),
            ..Self::default()
        }
    }

    /// Merge a file, detecting the format from its extension.
    pub fn load_file(&self, path: &Path) -> Result<()> {
        let loader = ConfigLoader::auto(path)?;
        self.merge_object(loader.load_file(path)?, Layer::File);
        Ok(())
    }

    /// Merge environment variables.
    pub fn load_env(&self) {
        let loader = EnvLoader::new(self.env_prefix.clone());
        self.merge(loader.load(), Layer::Env);
    }

    /// Export a `.env` file into the process environment, then merge the
    /// environment. With no path, a missing `./.env` is not an error.
    pub fn load_dotenv(&self, path: Option<&Path>) -> Result<()> {
        match path {
            Some(path) => {
                dotenvy::from_path(path)?;
            }
            None => {
                dotenvy::dotenv().ok();
            }
        }
        self.load_env();
        Ok(())
    }

    /// Override a single setting.
    pub fn set<T: serde::Serialize>(&self, key: &str, value: T) -> Result<()> {
        let value = serde_json::to_value(value).map_err(|e| ConfigError::Encode {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        self.merge([(key.to_string(), value)], Layer::Override);
        Ok(())
    }

    /// Layer that supplied the current value of `key`.
    pub fn layer_of(&self, key: &str) -> Option<Layer> {
        self.entries.read().get(key).map(|entry| entry.layer)
    }

    /// Known keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Build a typed settings struct from every layer and validate it.
    pub fn load_validated<T: DeserializeOwned + Validate>(&self) -> Result<T> {
        let object: serde_json::Map<String, Value> = self
            .entries
            .read()
            .iter()
            .map(|(key, entry)| (key.clone(), entry.value.clone()))
            .collect();

        let settings: T = serde_json::from_value(Value::Object(object))
            .map_err(|e| ConfigError::Decode(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    fn merge_object(&self, value: Value, layer: Layer) {
        if let Value::Object(map) = value {
            self.merge(map, layer);
        }
    }

    fn merge<I>(&self, values: I, layer: Layer)
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let mut entries = self.entries.write();
        for (key, value) in values {
            entries.insert(key, Entry { value, layer });
        }
    }
}
