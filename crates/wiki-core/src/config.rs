//! Configuration types for wiki-search.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

use crate::types::Operator;

/// Main configuration for wiki-search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Term index configuration.
    #[serde(default)]
    pub index: IndexConfig,

    /// Query configuration.
    #[serde(default)]
    pub query: QueryDefaults,

    /// Output configuration.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Term index configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Path to the index: a `.json` count file or a SQLite database.
    #[serde(default = "default_index_path")]
    pub path: PathBuf,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            path: default_index_path(),
        }
    }
}

/// Defaults applied to multi-term queries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryDefaults {
    /// Operator used to fold query terms.
    #[serde(default)]
    pub default_operator: Operator,

    /// Keep only this many best entries (all if unset).
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Output configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Print ranked entries as JSON.
    #[serde(default)]
    pub json: bool,
}

fn default_index_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wiki-search")
        .join("index.json")
}

impl SearchConfig {
    /// Load configuration from file.
    pub fn load(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> crate::error::Result<Self> {
        toml::from_str(content).map_err(|e| {
            crate::error::SearchError::config(format!("Failed to parse config: {}", e))
        })
    }

    /// Load configuration from default paths.
    pub fn load_default() -> crate::error::Result<Self> {
        // Try user config first
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("wiki-search").join("config.toml");
            if user_config.exists() {
                return Self::load(&user_config);
            }
        }

        // Try local config
        let local_config = PathBuf::from("wiki-search.toml");
        if local_config.exists() {
            return Self::load(&local_config);
        }

        debug!("No config file found, using built-in defaults");
        Ok(Self::default())
    }
}
