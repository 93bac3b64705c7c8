use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::render::DEFAULT_SUGGESTIONS;

pub const APP_NAME: &str = "nittany-chat";
pub const DEFAULT_RELAY_URL: &str = "http://127.0.0.1:3000/api/claude-chat";

/// Settings for the terminal chat client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    pub relay_url: String,
    pub log_level: Option<String>,
    pub suggestions: Vec<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            relay_url: DEFAULT_RELAY_URL.to_string(),
            log_level: None,
            suggestions: DEFAULT_SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ClientConfig {
    /// Loads configuration from a file if it exists, otherwise returns the default config
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// `~/.config/nittany-chat/config.toml`
    pub fn default_path() -> Result<PathBuf> {
        nittany_core::get_default_config_file(APP_NAME)
            .context("Could not determine config file location")
    }
}
