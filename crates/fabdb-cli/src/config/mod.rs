//! Configuration management.

use anyhow::{Context as _, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::output::OutputFormat;

/// Overrides the config file location
pub const CONFIG_ENV: &str = "FABDB_CONFIG";

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Public API key.
    pub api_key: Option<String>,

    /// Secret key paired with the API key.
    pub secret_key: Option<String>,

    /// API root.
    pub base_url: Option<String>,

    /// Default output format.
    pub output_format: Option<OutputFormat>,

    /// Records requested per search page.
    pub page_size: Option<u32>,
}

impl Config {
    /// Get the config file path.
    pub fn path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Ok(PathBuf::from(path));
        }

        let dirs = ProjectDirs::from("net", "fabdb", "fabdb")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Load configuration from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load configuration from `path`; a missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Self =
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Save configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Set one key from its textual value.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api_key" => self.api_key = Some(value.to_string()),
            "secret_key" => self.secret_key = Some(value.to_string()),
            "base_url" => self.base_url = Some(value.to_string()),
            "output_format" | "output" => self.output_format = Some(value.parse()?),
            "page_size" => {
                let size: u32 = value
                    .parse()
                    .with_context(|| format!("page_size must be a positive integer, got `{value}`"))?;
                anyhow::ensure!(size > 0, "page_size must be at least 1");
                self.page_size = Some(size);
            }
            _ => {
                anyhow::bail!(
                    "Unknown config key: {}\n\n\
                     Available keys:\n  \
                     api_key        - Your fabdb.net API key\n  \
                     secret_key     - The secret paired with the API key\n  \
                     base_url       - API root (default https://api.fabdb.net)\n  \
                     output_format  - Default output format (pretty/json/yaml)\n  \
                     page_size      - Records requested per search page",
                    key
                );
            }
        }
        Ok(())
    }
}
