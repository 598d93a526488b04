//! Configuration module for the kmerctl CLI.
//!
//! This module handles loading, saving, and managing configuration
//! settings for the kmerctl application.

use dirs::{config_dir, home_dir};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{CliError, Result};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "kmerctl.toml";

/// Application configuration structure.
///
/// Mirrors [`kmer_index::IndexConfig`] field-for-field so a config file can
/// pin down the index sizing parameters the CLI uses to build it, plus
/// CLI-only settings (verbosity, JSON output).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Global verbose setting.
    #[serde(default)]
    pub verbose: bool,

    /// Emit structured JSON instead of human-readable output.
    #[serde(default)]
    pub json: bool,

    /// K-mer length, in bases.
    #[serde(default = "default_k")]
    pub k: usize,

    /// Number of SPMD worker threads.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Per-worker heap stripe capacity, in records.
    #[serde(default = "default_heap_block_size")]
    pub heap_block_size: u64,

    /// Bucket table load factor.
    #[serde(default = "default_load_factor")]
    pub load_factor: f64,
}

fn default_k() -> usize {
    51
}

fn default_workers() -> usize {
    num_cpus::get().max(1)
}

fn default_heap_block_size() -> u64 {
    1 << 20
}

fn default_load_factor() -> f64 {
    1.0
}

impl Default for Config {
    fn default() -> Self {
        Self {
            verbose: false,
            json: false,
            k: default_k(),
            workers: default_workers(),
            heap_block_size: default_heap_block_size(),
            load_factor: default_load_factor(),
        }
    }
}

impl Config {
    /// Build an [`kmer_index::IndexConfig`] from this CLI configuration.
    pub fn to_index_config(&self) -> kmer_index::IndexConfig {
        kmer_index::IndexConfig {
            k: self.k,
            load_factor: self.load_factor,
            workers: self.workers,
            heap_block_size: self.heap_block_size,
            verbose: self.verbose,
            ..Default::default()
        }
    }

    /// Load configuration from the default location.
    ///
    /// Searches for configuration in the following order:
    /// 1. Current directory
    /// 2. User's home directory
    /// 3. System configuration directory
    ///
    /// Returns the default configuration if no config file is found.
    pub fn load() -> Result<Self> {
        let config_path = Self::find_config_file()?;

        match config_path {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CliError::Config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| CliError::Config(format!("Failed to parse configuration: {}", e)))?;

        Ok(config)
    }

    /// Save configuration to a specific path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize configuration: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    fn check_current_dir_config() -> Option<PathBuf> {
        let path = PathBuf::from(CONFIG_FILE_NAME);
        path.exists().then_some(path)
    }

    fn check_home_config() -> Option<PathBuf> {
        home_dir()
            .map(|dir| dir.join(".config").join("kmerctl").join(CONFIG_FILE_NAME))
            .filter(|path| path.exists())
    }

    fn check_system_config() -> Option<PathBuf> {
        config_dir()
            .map(|dir| dir.join("kmerctl").join(CONFIG_FILE_NAME))
            .filter(|path| path.exists())
    }

    fn find_config_file() -> Result<Option<PathBuf>> {
        Ok(Self::check_current_dir_config()
            .or_else(Self::check_home_config)
            .or_else(Self::check_system_config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.verbose);
        assert_eq!(config.k, 51);
        assert_eq!(config.load_factor, 1.0);
    }

    #[test]
    fn test_config_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test_config.toml");

        let original = Config {
            verbose: true,
            json: true,
            k: 21,
            workers: 4,
            heap_block_size: 1024,
            load_factor: 1.0,
        };
        original.save_to_path(&config_path).unwrap();

        let loaded = Config::load_from_path(&config_path).unwrap();
        assert_eq!(original, loaded);
    }

    #[test]
    fn test_load_from_nonexistent_path() {
        let result = Config::load_from_path(Path::new("/nonexistent/path/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_to_index_config_carries_fields() {
        let config = Config {
            k: 21,
            workers: 2,
            heap_block_size: 512,
            load_factor: 1.0,
            ..Default::default()
        };
        let index_config = config.to_index_config();
        assert_eq!(index_config.k, 21);
        assert_eq!(index_config.workers, 2);
        assert_eq!(index_config.heap_block_size, 512);
    }
}
