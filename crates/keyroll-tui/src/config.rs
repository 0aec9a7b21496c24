//! Configuration file handling.
//!
//! Reads from `~/.config/keyroll/keyroll.toml`

use anyhow::{Context, Result};
use keyroll_core::Locale;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding one record file per scope.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Key of the record list to edit.
    #[serde(default = "default_scope")]
    pub scope: String,
    /// Language for validation messages.
    #[serde(default)]
    pub locale: Locale,
    /// Whether passwords are shown unmasked by default.
    #[serde(default)]
    pub reveal_secrets: bool,
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("keyroll")
}

fn default_scope() -> String {
    "accounts".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            scope: default_scope(),
            locale: Locale::default(),
            reveal_secrets: false,
        }
    }
}

impl Config {
    /// Load configuration from the config file.
    ///
    /// If `custom_path` is provided, load from that path.
    /// Otherwise, load from the default XDG config location.
    /// Creates a default config file if it doesn't exist (only for default path).
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self> {
        let is_custom = custom_path.is_some();
        let config_path = match custom_path {
            Some(path) => path,
            None => Self::config_path()?,
        };

        if !config_path.exists() {
            if !is_custom {
                let config = Config::default();
                config.save_to(&config_path)?;
                tracing::info!("Created default config: {:?}", config);
                return Ok(config);
            } else {
                anyhow::bail!("Config file not found: {}", config_path.display());
            }
        }

        let contents = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        tracing::info!("Loaded config from {}: {:?}", config_path.display(), config);
        Ok(config)
    }

    /// Save configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Get the path to the config file.
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;

        Ok(config_dir.join("keyroll").join("keyroll.toml"))
    }
}
