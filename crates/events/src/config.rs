use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::ConfigError;

/// Listener limit applied per event name when nothing else is configured
pub const DEFAULT_MAX_LISTENERS: usize = 10;

/// Emitter settings, usually embedded in a host application's own config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    /// How many listeners a single event name may accumulate
    pub max_listeners: usize,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            max_listeners: DEFAULT_MAX_LISTENERS,
        }
    }
}

impl EmitterConfig {
    /// Parse config from a JSON document
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Read config from a JSON file, falling back to defaults
    pub fn read(path: &Path) -> Self {
        if !path.exists() {
            debug!(path = %path.display(), "Config file does not exist, using defaults");
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match Self::from_json(&content) {
                Ok(config) => {
                    debug!(path = %path.display(), max_listeners = config.max_listeners, "Config loaded successfully");
                    config
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read config file, using defaults");
                Self::default()
            }
        }
    }

    /// Write config to a JSON file
    pub fn write(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        debug!(path = %path.display(), "Config saved");
        Ok(())
    }
}
