//! Scheduler configuration: scope-containment policy and boundary enforcement.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SchedulerError};
use crate::ownership::ScopePolicy;

/// Complete scheduler configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Scope-containment policy used by the ownership validator.
    #[serde(default)]
    pub scope: ScopePolicy,
    /// Whether boundary-audit violations should fail validation.
    ///
    /// Off by default: boundaries are informational and audit findings are
    /// surfaced as warnings. Turning this on makes the CLI treat them like
    /// conflicts.
    #[serde(default)]
    pub enforce_boundary: bool,
}

impl SchedulerConfig {
    /// Get the default config directory path (`~/.waveplan`)
    ///
    /// # Errors
    /// Returns an error if the home directory cannot be determined
    pub fn config_dir() -> Result<PathBuf> {
        use dirs::home_dir;
        let home = home_dir()
            .ok_or_else(|| SchedulerError::Config("Could not determine home directory".to_owned()))?;
        Ok(home.join(".waveplan"))
    }

    /// Get the default config file path (`~/.waveplan/config.toml`)
    ///
    /// # Errors
    /// Returns an error if the home directory cannot be determined
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load config from the default location (`~/.waveplan/config.toml`)
    /// If the config doesn't exist, creates it with default values
    ///
    /// # Errors
    /// Returns an error if the config cannot be read or created
    pub fn load_or_create() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path)
        } else {
            let config = Self::default();
            config.save_to_file(&config_path)?;
            Ok(config)
        }
    }

    /// Load config from a specific file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    pub fn load_from_file(path: &Path) -> Result<Self> {
        use toml::from_str;
        let contents = fs::read_to_string(path)
            .map_err(|error| SchedulerError::Config(format!("Failed to read config: {error}")))?;
        from_str(&contents)
            .map_err(|error| SchedulerError::Config(format!("Failed to parse config: {error}")))
    }

    /// Save config to a specific file
    ///
    /// # Errors
    /// Returns an error if the file cannot be written
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        use toml::to_string_pretty;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|error| {
                SchedulerError::Config(format!("Failed to create config directory: {error}"))
            })?;
        }

        let contents = to_string_pretty(self)
            .map_err(|error| SchedulerError::Config(format!("Failed to serialize config: {error}")))?;

        let header = "# Waveplan Configuration File\n\
                      # This file is automatically generated on first run\n\
                      # Edit this file to customize your settings\n\n";

        fs::write(path, format!("{header}{contents}"))
            .map_err(|error| SchedulerError::Config(format!("Failed to write config: {error}")))?;

        Ok(())
    }
}
