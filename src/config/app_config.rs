// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! User-tunable application settings.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Switch behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwitchConfig {
    /// Extra attempts after the first failed switch.
    #[serde(default = "default_retries")]
    pub retries: u32,
    /// Reconnect a Bluetooth device whose sink is missing before retrying.
    #[serde(default = "default_reconnect")]
    pub reconnect: bool,
}

fn default_retries() -> u32 {
    3
}

fn default_reconnect() -> bool {
    true
}

impl Default for SwitchConfig {
    fn default() -> Self {
        Self {
            retries: default_retries(),
            reconnect: default_reconnect(),
        }
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub switch: SwitchConfig,
    /// Override for the icon assets directory.
    #[serde(default)]
    pub assets_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Load config from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.switch.retries, 3);
        assert!(config.switch.reconnect);
        assert!(config.assets_dir.is_none());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = AppConfig::from_toml("[switch]\nretries = 1\n").unwrap();
        assert_eq!(config.switch.retries, 1);
        assert!(config.switch.reconnect);

        let empty = AppConfig::from_toml("").unwrap();
        assert_eq!(empty.switch.retries, 3);
        assert!(empty.switch.reconnect);
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = AppConfig::default();
        config.switch.retries = 5;
        config.assets_dir = Some(PathBuf::from("/opt/pwsink/assets"));

        let parsed = AppConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed.switch.retries, 5);
        assert_eq!(parsed.assets_dir, Some(PathBuf::from("/opt/pwsink/assets")));
    }
}
