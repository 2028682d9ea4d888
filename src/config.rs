//! Configuration management for Keystroke Stats
//!
//! Configuration is loaded from a platform-specific TOML file; a missing
//! file means defaults.
//!
//! ## Config File Locations
//!
//! | Platform | Path |
//! |----------|------|
//! | Linux | `~/.config/keystroke-stats/config.toml` |
//! | macOS | `~/Library/Application Support/keystroke-stats/config.toml` |
//! | Windows | `%APPDATA%\keystroke-stats\config.toml` |
//!
//! ## Example
//!
//! ```no_run
//! use keystroke_stats::Config;
//!
//! let mut config = Config::load().unwrap_or_default();
//! config.stats.daily_history_days = 14;
//! config.save().expect("Failed to save config");
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Error type for configuration operations
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to determine config directory
    #[error("Could not determine config directory")]
    NoConfigDir,
    /// IO error reading or writing config file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Failed to parse config file
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Failed to serialize config
    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// Values that parse but cannot be used
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Returns the path to the config file.
///
/// Creates the config directory if it doesn't exist.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    let app_dir = config_dir.join("keystroke-stats");

    if !app_dir.exists() {
        fs::create_dir_all(&app_dir)?;
    }

    Ok(app_dir.join("config.toml"))
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Statistics engine settings
    #[serde(default)]
    pub stats: StatsConfig,
    /// Where persisted statistics live
    #[serde(default)]
    pub storage: StorageConfig,
    /// Front-end settings
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Statistics engine configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StatsConfig {
    /// How many most-used keys a snapshot reports
    pub top_keys_count: usize,
    /// Size of the per-position heatmap
    pub max_key_positions: usize,
    /// Days kept in the rolling history
    pub daily_history_days: usize,
    /// Hours of uptime before the first day boundary is shifted
    pub day_rollover_hour: u32,
    /// Window for the current WPM estimate
    pub wpm_window_ms: u64,
    /// Idle time after which a new session starts
    pub session_timeout_ms: u64,
    /// Quiet period before a requested save is written
    pub save_debounce_ms: u64,
    /// Safety-net save period
    pub save_interval_ms: u64,
    pub enable_session_tracking: bool,
    pub enable_wpm: bool,
    pub enable_key_heatmap: bool,
    pub enable_daily_history: bool,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            top_keys_count: 10,
            max_key_positions: 128,
            daily_history_days: 7,
            day_rollover_hour: 0,
            wpm_window_ms: 5_000,
            session_timeout_ms: 300_000,
            save_debounce_ms: 30_000,
            save_interval_ms: 3_600_000,
            enable_session_tracking: true,
            enable_wpm: true,
            enable_key_heatmap: true,
            enable_daily_history: true,
        }
    }
}

impl StatsConfig {
    /// Reject values the engine cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.enable_key_heatmap && self.max_key_positions == 0 {
            return Err(ConfigError::Invalid(
                "max_key_positions must be at least 1".to_string(),
            ));
        }
        if self.daily_history_days > u8::MAX as usize {
            return Err(ConfigError::Invalid(format!(
                "daily_history_days must be at most {}",
                u8::MAX
            )));
        }
        if self.wpm_window_ms == 0 {
            return Err(ConfigError::Invalid("wpm_window_ms must be positive".to_string()));
        }
        if self.save_debounce_ms == 0 || self.save_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "save_debounce_ms and save_interval_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct StorageConfig {
    /// Override for the data directory
    pub data_dir: Option<PathBuf>,
}

/// How statistics are presented
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DisplayMode {
    /// Full-screen terminal dashboard
    Dashboard,
    /// No screen; statistics are written to the log
    Headless,
}

/// Color theme options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

/// Display configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    pub mode: DisplayMode,
    /// Refresh rate for dashboard redraws (in Hz)
    pub refresh_rate_hz: u32,
    pub theme: Theme,
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            mode: DisplayMode::Dashboard,
            refresh_rate_hz: 30,
            theme: Theme::Dark,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default config file.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = config_path()?;
        self.save_to(&path)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.stats.validate()?;
        if self.display.refresh_rate_hz == 0 {
            return Err(ConfigError::Invalid("refresh_rate_hz must be positive".to_string()));
        }
        Ok(())
    }

    /// Directory holding persisted statistics and the log file
    pub fn data_dir(&self) -> Option<PathBuf> {
        self.storage
            .data_dir
            .clone()
            .or_else(crate::storage::FileStore::default_root)
    }

    /// Dashboard redraw interval as Duration
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_micros(1_000_000 / self.display.refresh_rate_hz.max(1) as u64)
    }
}
