use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use bucketscope_core::{Environment, StorageConfig};

const CONFIG_FILE: &str = "bucketscope.toml";

/// Settings persisted by `bucketscope init`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<Environment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dev_user: Option<String>,
    pub storage: StorageConfig,
}

impl AppConfig {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("bucketscope")
            .join(CONFIG_FILE)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("config not found at {}", path.display()))?;
        toml::from_str(&content).context("failed to parse config")
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("failed to write config to {}", path.display()))?;
        Ok(())
    }

    /// The saved config if one exists, otherwise settings from the process
    /// environment.
    pub fn load_or_env() -> Result<Self> {
        let path = Self::config_path();
        if path.is_file() {
            return Self::load_from(&path);
        }
        Ok(Self {
            environment: None,
            dev_user: None,
            storage: StorageConfig::from_env(),
        })
    }
}
