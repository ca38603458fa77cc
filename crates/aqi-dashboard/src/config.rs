//! Configuration file management.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use aqi_core::{DEFAULT_BASE_URL, PollConfig};
use aqi_types::PaletteColor;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the prediction backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Time between poll cycles in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Number of history entries requested per cycle
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Also poll the raw sensor history
    #[serde(default)]
    pub raw_history: bool,

    /// Number of raw sensor samples requested per cycle
    #[serde(default = "default_raw_history_limit")]
    pub raw_history_limit: usize,

    /// Ring the terminal bell around a color spin
    #[serde(default = "default_true")]
    pub sound: bool,

    /// Accent color selected at startup (palette hex or name)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_color: Option<PaletteColor>,
}

fn default_poll_interval_ms() -> u64 {
    2000
}

fn default_history_limit() -> usize {
    20
}

fn default_raw_history_limit() -> usize {
    50
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: None,
            poll_interval_ms: default_poll_interval_ms(),
            history_limit: default_history_limit(),
            raw_history: false,
            raw_history_limit: default_raw_history_limit(),
            sound: true,
            default_color: None,
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("aqi-dashboard")
            .join("config.toml")
    }

    /// Load config from the default location, or return default if not found
    pub fn load() -> Self {
        Self::load_from(&Self::path())
    }

    /// Load config from `path`, falling back to defaults on any error.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => return config,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to parse config, using defaults");
                }
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read config, using defaults");
            }
        }
        Self::default()
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path())
    }

    /// Save config to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Polling parameters derived from this config.
    pub fn poll_config(&self) -> PollConfig {
        PollConfig::default()
            .interval(Duration::from_millis(self.poll_interval_ms))
            .history_limit(self.history_limit.max(1))
            .raw_history_limit(self.raw_history.then_some(self.raw_history_limit.max(1)))
    }

    /// Accent color to start with.
    pub fn accent(&self) -> PaletteColor {
        self.default_color.unwrap_or_default()
    }
}

/// Resolve the backend URL from flag/env, then config, then the default.
pub fn resolve_api_url(flag: Option<&str>, config: &Config) -> String {
    flag.filter(|url| !url.trim().is_empty())
        .or(config.api_url.as_deref())
        .unwrap_or(DEFAULT_BASE_URL)
        .to_string()
}

/// Default log file used in TUI mode.
pub fn default_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("aqi-dashboard")
        .join("dashboard.log")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.poll_interval_ms, 2000);
        assert_eq!(config.history_limit, 20);
        assert!(!config.raw_history);
        assert_eq!(config.raw_history_limit, 50);
        assert!(config.sound);
        assert_eq!(config.accent(), PaletteColor::default());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file() {
        let config: Config = toml::from_str(
            r##"
api_url = "http://sensor.local:5000"
sound = false
default_color = "#E74C3C"
"##,
        )
        .unwrap();
        assert_eq!(config.api_url.as_deref(), Some("http://sensor.local:5000"));
        assert!(!config.sound);
        assert_eq!(config.accent().name(), "Red");
        assert_eq!(config.history_limit, 20);
    }

    #[test]
    fn test_color_by_name() {
        let config: Config = toml::from_str(r#"default_color = "pink""#).unwrap();
        assert_eq!(config.accent().to_string(), "#E91E63");
    }

    #[test]
    fn test_invalid_color_rejected() {
        let result: std::result::Result<Config, _> = toml::from_str(r##"default_color = "#123456""##);
        assert!(result.is_err());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            api_url: Some("http://10.0.0.2:5000".to_string()),
            raw_history: true,
            default_color: PaletteColor::from_index(3),
            ..Default::default()
        };

        config.save_to(&path).unwrap();
        assert!(path.exists());
        assert_eq!(Config::load_from(&path), config);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml"));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_invalid_file_falls_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "poll_interval_ms = \"fast\"").unwrap();
        assert_eq!(Config::load_from(&path), Config::default());
    }

    #[test]
    fn test_poll_config() {
        let config = Config {
            poll_interval_ms: 500,
            history_limit: 0,
            ..Default::default()
        };
        let poll = config.poll_config();
        assert_eq!(poll.interval, Duration::from_millis(500));
        assert_eq!(poll.history_limit, 1);
        assert_eq!(poll.raw_history_limit, None);

        let config = Config {
            raw_history: true,
            ..Default::default()
        };
        assert_eq!(config.poll_config().raw_history_limit, Some(50));
    }

    #[test]
    fn test_resolve_api_url_prefers_flag() {
        let config = Config {
            api_url: Some("http://config:5000".to_string()),
            ..Default::default()
        };
        assert_eq!(
            resolve_api_url(Some("http://flag:5000"), &config),
            "http://flag:5000"
        );
    }

    #[test]
    fn test_resolve_api_url_falls_back_to_config() {
        let config = Config {
            api_url: Some("http://config:5000".to_string()),
            ..Default::default()
        };
        assert_eq!(resolve_api_url(None, &config), "http://config:5000");
        assert_eq!(resolve_api_url(Some("  "), &config), "http://config:5000");
    }

    #[test]
    fn test_resolve_api_url_default() {
        assert_eq!(resolve_api_url(None, &Config::default()), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_paths() {
        assert!(Config::path().ends_with("aqi-dashboard/config.toml"));
        assert!(default_log_path().ends_with("aqi-dashboard/dashboard.log"));
    }
}
