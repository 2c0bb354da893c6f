//! Client configuration.
//!
//! Loaded from `~/.wireline/config.toml` when present; every field has a
//! sensible default so a bare `wireline` invocation works against a local
//! gateway.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

use crate::gateway;

/// Default gateway when nothing is configured: a local dev gateway.
const DEFAULT_GATEWAY: &str = "http://127.0.0.1:8765";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Settings directory
    pub settings_dir: PathBuf,
    /// Gateway base URL (`http(s)://` or `ws(s)://`); the websocket
    /// endpoint is derived from it
    pub gateway_url: Option<String>,
    /// Blank rows between transcript messages in the TUI
    pub message_spacing: u16,
}

impl Default for Config {
    fn default() -> Self {
        let home_dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            settings_dir: home_dir.join(".wireline"),
            gateway_url: None,
            message_spacing: 1,
        }
    }
}

impl Config {
    /// Load configuration from file, falling back to defaults when the
    /// file does not exist.
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = if let Some(p) = path {
            p
        } else {
            let home_dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
            home_dir.join(".wireline").join("config.toml")
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("failed to read {}", config_path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("failed to parse {}", config_path.display()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration to file.
    pub fn save(&self, path: Option<PathBuf>) -> Result<()> {
        let config_path = if let Some(p) = path {
            p
        } else {
            self.settings_dir.join("config.toml")
        };

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    /// The configured gateway base URL, parsed.
    pub fn gateway_base(&self) -> Result<Url> {
        let raw = self.gateway_url.as_deref().unwrap_or(DEFAULT_GATEWAY);
        Url::parse(raw).with_context(|| format!("invalid gateway URL `{raw}`"))
    }

    /// The fully derived websocket endpoint.
    pub fn gateway_endpoint(&self) -> Result<Url> {
        gateway::endpoint_url(&self.gateway_base()?)
    }
}
