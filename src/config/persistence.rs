// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Configuration persistence (file locations, save/load).

use crate::config::AppConfig;
use directories::ProjectDirs;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    NoConfigDir,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Manages configuration file persistence.
pub struct ConfigManager {
    config_dir: PathBuf,
    data_dir: PathBuf,
}

impl ConfigManager {
    /// Create a new config manager, initializing directories.
    pub fn new() -> Result<Self, ConfigError> {
        let project_dirs = ProjectDirs::from("", "", "pwsink").ok_or(ConfigError::NoConfigDir)?;

        let config_dir = project_dirs.config_dir().to_path_buf();
        let data_dir = project_dirs.data_dir().to_path_buf();

        // Ensure directories exist
        fs::create_dir_all(&config_dir)?;
        fs::create_dir_all(&data_dir)?;

        Ok(Self {
            config_dir,
            data_dir,
        })
    }

    /// Get the path to the main config file.
    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    /// Get the path to the persisted slot settings.
    pub fn slots_path(&self) -> PathBuf {
        self.config_dir.join("slots.toml")
    }

    /// Get the path to the favourites file.
    pub fn favourites_path(&self) -> PathBuf {
        self.config_dir.join("favourites.json")
    }

    /// Icon assets directory, honoring the config override.
    pub fn assets_dir(&self, config: &AppConfig) -> PathBuf {
        config
            .assets_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join("assets"))
    }

    /// Load the application config.
    pub fn load_config(&self) -> Result<AppConfig, ConfigError> {
        let path = self.config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            Ok(AppConfig::from_toml(&content)?)
        } else {
            Ok(AppConfig::default())
        }
    }

    /// Save the application config.
    pub fn save_config(&self, config: &AppConfig) -> Result<(), ConfigError> {
        let content = config.to_toml()?;
        fs::write(self.config_path(), content)?;
        Ok(())
    }
}
