//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the base URLs of the two backend services and the last
//! used username.
//!
//! Configuration is stored at `~/.config/couriersync/config.json`. The
//! `COURIERSYNC_AUTH_URL` and `COURIERSYNC_INVENTORY_URL` environment
//! variables override the stored URLs.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/state directory paths
const APP_NAME: &str = "couriersync";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Default base URL of the authentication service
const DEFAULT_AUTH_URL: &str = "https://fabricaescuela-p6f4-backend.onrender.com/api";

/// Default base URL of the inventory service
const DEFAULT_INVENTORY_URL: &str = "https://fabricaescuela-p6f4-inventary-service.onrender.com/api";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub auth_url: String,
    pub inventory_url: String,
    pub last_username: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            auth_url: DEFAULT_AUTH_URL.to_string(),
            inventory_url: DEFAULT_INVENTORY_URL.to_string(),
            last_username: None,
        }
    }
}

impl Config {
    /// Load the config file if present, then apply environment overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            Self::default()
        };

        if let Ok(url) = std::env::var("COURIERSYNC_AUTH_URL") {
            config.auth_url = url;
        }
        if let Ok(url) = std::env::var("COURIERSYNC_INVENTORY_URL") {
            config.inventory_url = url;
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
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory holding the persisted session keys.
    pub fn state_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }
}
