// Environment variable loading

use serde_json::Value;
use std::collections::HashMap;
use std::env;

/// Environment variable loader
pub struct EnvLoader {
    prefix: Option<String>,
}

impl EnvLoader {
    /// Create a new environment loader
    pub fn new(prefix: Option<String>) -> Self {
        Self { prefix }
    }

    /// Load matching environment variables, keyed by lowercase name without
    /// the prefix. Values stay strings; typed fields parse them on load.
    pub fn load(&self) -> HashMap<String, Value> {
        self.collect(env::vars())
    }

    fn collect<I>(&self, vars: I) -> HashMap<String, Value>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut config = HashMap::new();

        for (key, value) in vars {
            let key = match self.prefix {
                Some(ref prefix) => match key.strip_prefix(prefix.as_str()) {
                    Some(rest) if rest.starts_with('_') => rest.trim_start_matches('_'),
                    _ => continue,
                },
                None => key.as_str(),
            };
            config.insert(key.to_lowercase(), Value::String(value));
        }

        config
    }
}
