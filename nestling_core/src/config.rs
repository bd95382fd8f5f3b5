//! Configuration file support for Nestling.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/nestling/config.toml`.

use crate::{AlertThresholds, Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub pregnancy: PregnancyConfig,

    #[serde(default)]
    pub alerts: AlertThresholds,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Pregnancy details
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct PregnancyConfig {
    /// Estimated due date (`YYYY-MM-DD`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| home_dir().join(".local/share"));
    base.join("nestling")
}

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Reject thresholds that could never (or would always) trigger
    pub fn validate(&self) -> Result<()> {
        let alerts = &self.alerts;
        if !(alerts.max_interval_seconds.is_finite() && alerts.max_interval_seconds > 0.0) {
            return Err(Error::Config(format!(
                "alerts.max_interval_seconds must be positive, got {}",
                alerts.max_interval_seconds
            )));
        }
        if !(alerts.min_duration_seconds.is_finite() && alerts.min_duration_seconds >= 0.0) {
            return Err(Error::Config(format!(
                "alerts.min_duration_seconds must not be negative, got {}",
                alerts.min_duration_seconds
            )));
        }
        Ok(())
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| home_dir().join(".config"));
        base.join("nestling").join("config.toml")
    }

    /// Path of the persisted contraction timer session
    pub fn timer_session_path(data_dir: &Path) -> PathBuf {
        data_dir.join("timer").join("session.json")
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
