//! Configuration for the pre-image builder.
//!
//! Search bounds and result ordering are stored in TOML format. Every field
//! has a default, so an empty file (or a file with only some keys) is a
//! valid configuration.
//!
//! ```toml
//! max_tries = 100000
//! max_inputs = 1000
//! timeout_ms = 30000
//! result_input_order = "bip69"
//! ```

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::pre_image::selector::{
    SearchLimits, DEFAULT_MAX_INPUTS, DEFAULT_MAX_TRIES, DEFAULT_TIMEOUT,
};
use crate::pre_image::sorter::SortOrder;

/// Tunables of one [`BranchAndBoundPreImageBuilder`](crate::pre_image::BranchAndBoundPreImageBuilder)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuilderConfig {
    /// Maximum number of search nodes visited per call
    #[serde(default = "default_max_tries")]
    pub max_tries: usize,

    /// Input count above which the greedy fallback replaces the search
    #[serde(default = "default_max_inputs")]
    pub max_inputs: usize,

    /// Wall-clock budget of one search in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Order of the inputs in the returned transaction
    #[serde(default)]
    pub result_input_order: SortOrder,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            max_tries: default_max_tries(),
            max_inputs: default_max_inputs(),
            timeout_ms: default_timeout_ms(),
            result_input_order: SortOrder::default(),
        }
    }
}

impl BuilderConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path.display(), e))?;

        let config: BuilderConfig =
            toml::from_str(&content).map_err(|e| anyhow!("Failed to parse config file: {}", e))?;

        config.validate()?;
        log::debug!("Loaded builder configuration from {}", path.display());

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| anyhow!("Failed to serialize config: {}", e))?;

        fs::write(path, content).map_err(|e| anyhow!("Failed to write config file: {}", e))?;

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.max_tries == 0 {
            return Err(anyhow!("Invalid max_tries: must be greater than 0"));
        }

        if self.max_inputs == 0 {
            return Err(anyhow!("Invalid max_inputs: must be greater than 0"));
        }

        if self.timeout_ms == 0 {
            anyhow::bail!("Invalid timeout_ms: must be greater than 0");
        }

        Ok(())
    }

    /// Search bounds described by this configuration
    pub fn limits(&self) -> SearchLimits {
        SearchLimits {
            max_tries: self.max_tries,
            max_inputs: self.max_inputs,
            timeout: Duration::from_millis(self.timeout_ms),
        }
    }
}

/// Ensure a configuration file exists at the specified path
/// If it doesn't exist, create it with default values
pub fn ensure_config_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        let content = toml::to_string_pretty(&BuilderConfig::default())
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)
                    .map_err(|e| anyhow!("Failed to create config directory: {}", e))?;
            }
        }

        fs::write(path, content)
            .map_err(|e| anyhow!("Failed to write default config file: {}", e))?;
    }

    Ok(())
}

// Default value functions

fn default_max_tries() -> usize {
    DEFAULT_MAX_TRIES
}

fn default_max_inputs() -> usize {
    DEFAULT_MAX_INPUTS
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT.as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_search_defaults() {
        let config = BuilderConfig::default();
        assert_eq!(config.limits(), SearchLimits::default());
        assert_eq!(config.result_input_order, SortOrder::Bip69);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: BuilderConfig = toml::from_str("max_tries = 42").unwrap();
        assert_eq!(config.max_tries, 42);
        assert_eq!(config.max_inputs, DEFAULT_MAX_INPUTS);
        assert_eq!(config.timeout_ms, 30_000);
    }

    #[test]
    fn test_order_is_snake_case() {
        let config: BuilderConfig =
            toml::from_str("result_input_order = \"amount_descending\"").unwrap();
        assert_eq!(config.result_input_order, SortOrder::AmountDescending);
    }

    #[test]
    fn test_validation_rejects_zero_bounds() {
        let config = BuilderConfig {
            max_tries: 0,
            ..BuilderConfig::default()
        };
        assert!(config.validate().is_err());

        let config = BuilderConfig {
            timeout_ms: 0,
            ..BuilderConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("builder.toml");

        let config = BuilderConfig {
            max_tries: 5_000,
            result_input_order: SortOrder::AmountDescending,
            ..BuilderConfig::default()
        };
        config.save(&path).unwrap();

        assert_eq!(BuilderConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_ensure_config_exists_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("builder.toml");

        ensure_config_exists(&path).unwrap();
        assert!(path.exists());
        assert_eq!(BuilderConfig::load(&path).unwrap(), BuilderConfig::default());
    }
}
