//! Configuration file support for runlog.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/runlog/config.toml`.

use crate::series::DEFAULT_MOVING_AVERAGE_WINDOW;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub report: ReportConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Input data configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct DataConfig {
    /// Run log used when no file is given on the command line
    #[serde(default)]
    pub default_csv: Option<PathBuf>,
}

/// Report rendering configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_moving_average_window")]
    pub moving_average_window: usize,

    /// Emit JSON instead of text by default
    #[serde(default)]
    pub json: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            moving_average_window: default_moving_average_window(),
            json: false,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// Default value functions
fn default_moving_average_window() -> usize {
    DEFAULT_MOVING_AVERAGE_WINDOW
}

fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> Result<PathBuf> {
        let base = match dirs::config_dir() {
            Some(dir) => dir,
            None => {
                let home = std::env::var("HOME").map_err(|_| {
                    Error::Config("HOME is not set and no config directory was found".into())
                })?;
                PathBuf::from(home).join(".config")
            }
        };
        Ok(base.join("runlog").join("config.toml"))
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

    fn validate(&self) -> Result<()> {
        if self.report.moving_average_window == 0 {
            return Err(Error::Config(
                "report.moving_average_window must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
