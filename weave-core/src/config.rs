//! User configuration loaded from `~/.config/weave/config.toml`.

use crate::auto_time::AutoTimer;
use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeaveConfig {
    #[serde(default)]
    pub lyrics: LyricsConfig,
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LyricsConfig {
    /// Where lyric locations are resolved: a directory, or an http(s) base URL
    #[serde(default = "default_asset_base")]
    pub asset_base: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default)]
    pub auto_time: AutoTimer,
}

fn default_asset_base() -> String {
    ".".to_string()
}

const fn default_request_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    concat!("Weave/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for LyricsConfig {
    fn default() -> Self {
        Self {
            asset_base: default_asset_base(),
            request_timeout_secs: default_request_timeout(),
            user_agent: default_user_agent(),
            auto_time: AutoTimer::default(),
        }
    }
}

impl LyricsConfig {
    /// Whether `asset_base` points at a web server rather than a directory
    #[must_use]
    pub fn is_remote(&self) -> bool {
        self.asset_base.starts_with("http://") || self.asset_base.starts_with("https://")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// How often the simulated transport reports the clock
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,
}

const fn default_tick_interval() -> u64 {
    250
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub file_enabled: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_enabled: false,
        }
    }
}

impl WeaveConfig {
    /// Get the configuration directory path (~/.config/weave/)
    #[must_use]
    pub fn config_dir() -> PathBuf {
        crate::paths::config_dir()
    }

    /// Get the config file path (~/.config/weave/config.toml)
    #[must_use]
    pub fn config_path() -> PathBuf {
        crate::paths::config_path()
    }

    /// Load config from the default location or create a template on first run
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ConfigNotFound`] after writing the template, or an
    /// error if the file cannot be read, parsed or validated.
    pub fn load_or_create() -> Result<Self> {
        Self::load_or_create_at(&Self::config_path())
    }

    /// Load config from `config_path`, writing the template if it is missing
    ///
    /// # Errors
    ///
    /// Same as [`WeaveConfig::load_or_create`].
    pub fn load_or_create_at(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            // Create config directory if it doesn't exist
            if let Some(parent) = config_path.parent() {
                fs::create_dir_all(parent)?;
            }

            fs::write(config_path, CONFIG_TEMPLATE)?;

            return Err(CoreError::ConfigNotFound {
                path: config_path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(config_path)?;
        Self::parse(&content)
    }

    /// Parse and validate config text
    ///
    /// # Errors
    ///
    /// Returns an error on invalid TOML or out-of-range values.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let auto_time = &self.lyrics.auto_time;
        let spacing = [
            ("lyrics.auto_time.lead_in_secs", auto_time.lead_in_secs),
            ("lyrics.auto_time.min_span_secs", auto_time.min_span_secs),
            ("lyrics.auto_time.tail_secs", auto_time.tail_secs),
        ];
        for (field, value) in spacing {
            if !value.is_finite() || value < 0.0 {
                return Err(CoreError::ConfigInvalid {
                    message: format!("{field} must be a non-negative number, got {value}"),
                });
            }
        }

        if self.lyrics.asset_base.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "lyrics.asset_base must not be empty".to_string(),
            });
        }

        if self.playback.tick_interval_ms == 0 {
            return Err(CoreError::ConfigInvalid {
                message: "playback.tick_interval_ms must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}

const CONFIG_TEMPLATE: &str = r##"# Weave Configuration
# ~/.config/weave/config.toml

[lyrics]
# Directory or http(s) base URL that lyric locations are resolved against
asset_base = "."
request_timeout_secs = 10

[lyrics.auto_time]
# Spacing used when only plain-text lyrics exist (seconds)
lead_in_secs = 0.25
min_span_secs = 0.25
tail_secs = 0.75

[playback]
tick_interval_ms = 250

[logging]
# Used when RUST_LOG is not set
level = "info"
file_enabled = false
"##;
