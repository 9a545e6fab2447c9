//! Configuration loading and data directory resolution
//!
//! Settings live in `config.toml` inside the data directory unless `--config`
//! names another file. Every field has a default, so a missing file or a partial
//! file is fine.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::views::{DEFAULT_DATE_FORMAT, LIST_PREVIEW_LEN, TABLE_PREVIEW_LEN};

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "TASKTRACKER_DIR";
/// Config file name inside the data directory
pub const CONFIG_FILE: &str = "config.toml";
/// Log file used while the terminal UI owns the screen
pub const LOG_FILE: &str = "tasktracker.log";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,

    #[serde(default)]
    pub notifications: NotificationConfig,
}

/// Table and date rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Description preview length in the table view
    #[serde(default = "default_table_preview")]
    pub table_preview: usize,

    /// Description preview length in the compact list view
    #[serde(default = "default_list_preview")]
    pub list_preview: usize,

    /// strftime pattern for dates
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

fn default_table_preview() -> usize {
    TABLE_PREVIEW_LEN
}

fn default_list_preview() -> usize {
    LIST_PREVIEW_LEN
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            table_preview: default_table_preview(),
            list_preview: default_list_preview(),
            date_format: default_date_format(),
        }
    }
}

/// Dashboard settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Months shown in the activity trend
    #[serde(default = "default_trend_months")]
    pub trend_months: u32,
}

fn default_trend_months() -> u32 {
    6
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            trend_months: default_trend_months(),
        }
    }
}

/// Toast notifications in the terminal UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Seconds before a toast disappears
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    3
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    /// Load from `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Config::default());
            }
            Err(source) => {
                return Err(Error::ConfigRead {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.display.table_preview == 0 || self.display.list_preview == 0 {
            return Err(Error::InvalidConfig(
                "preview lengths must be greater than zero".to_string(),
            ));
        }
        if self.dashboard.trend_months == 0 || self.dashboard.trend_months > 120 {
            return Err(Error::InvalidConfig(
                "dashboard.trend_months must be between 1 and 120".to_string(),
            ));
        }
        Ok(())
    }
}

/// Resolve the data directory: explicit flag (or env), platform data dir, then `$HOME/.tasktracker`.
pub fn resolve_data_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }
    if let Some(dirs) = ProjectDirs::from("", "", "tasktracker") {
        return dirs.data_dir().to_path_buf();
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".tasktracker")
}
