//! Application configuration management.
//!
//! Holds the rental service URL and the offline-mode flag.
//! Configuration is stored at `~/.config/fleetdeck/config.json`; the
//! `FLEETDECK_SERVER` environment variable overrides the saved URL.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "fleetdeck";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Default rental service URL for local development
const DEFAULT_SERVER_URL: &str = "http://localhost:8080";

/// Environment variable overriding the saved server URL
const SERVER_ENV_VAR: &str = "FLEETDECK_SERVER";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server_url: String,
    #[serde(default)]
    pub offline_mode: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            offline_mode: false,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            Self::default()
        };
        if let Ok(url) = std::env::var(SERVER_ENV_VAR) {
            if !url.is_empty() {
                config.server_url = url;
            }
        }
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir =
            dirs::cache_dir().ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server_url, "http://localhost:8080");
        assert!(!config.offline_mode);
    }

    #[test]
    fn test_config_parse_without_offline_flag() {
        let json = r#"{"server_url":"http://rental.example.com"}"#;
        let config: Config = serde_json::from_str(json).expect("Failed to parse config");
        assert_eq!(config.server_url, "http://rental.example.com");
        assert!(!config.offline_mode);
    }
}
