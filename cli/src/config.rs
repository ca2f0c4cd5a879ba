// Configuration management for the msgmap CLI
//
// Cross-platform config stored in:
// - macOS: ~/Library/Application Support/msgmap/config.json
// - Linux: ~/.config/msgmap/config.json
// - Windows: %APPDATA%\msgmap\config.json

use anyhow::{Context, Result};
use msgmap_core::StoreKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the store files (None = platform data dir)
    pub data_dir: Option<String>,

    /// Store used when --kind is not given
    pub default_kind: StoreKind,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            default_kind: StoreKind::Invoice,
        }
    }
}

impl Config {
    /// Get the config directory path (cross-platform)
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join("msgmap");

        std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;

        Ok(config_dir)
    }

    /// Get the platform data directory (cross-platform)
    pub fn default_data_dir() -> Result<PathBuf> {
        let data_dir = dirs::data_local_dir()
            .context("Failed to determine data directory")?
            .join("msgmap");

        Ok(data_dir)
    }

    /// Get the config file path
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Load config from the platform location, creating defaults if missing
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file()?)
    }

    /// Save config to the platform location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("Failed to read config file")?;
            let config: Config =
                serde_json::from_str(&contents).context("Failed to parse config file")?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, contents).context("Failed to write config file")?;
        Ok(())
    }

    /// Directory the store files live in
    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(PathBuf::from(dir)),
            None => Self::default_data_dir(),
        }
    }

    /// Set a config value (caller saves)
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "data_dir" => {
                self.data_dir = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                };
            }
            "default_kind" => {
                self.default_kind = value
                    .parse::<StoreKind>()
                    .map_err(anyhow::Error::msg)
                    .context("Invalid store kind")?;
            }
            _ => anyhow::bail!("Unknown config key: {}", key),
        }
        Ok(())
    }

    /// Get a config value
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "data_dir" => self.data_dir.clone(),
            "default_kind" => Some(self.default_kind.to_string()),
            _ => None,
        }
    }

    /// List all config values
    pub fn list(&self) -> Vec<(String, String)> {
        vec![
            (
                "data_dir".to_string(),
                self.data_dir.clone().unwrap_or_else(|| "(auto)".to_string()),
            ),
            ("default_kind".to_string(), self.default_kind.to_string()),
        ]
    }
}
