//! Configuration
//!
//! User settings live in `config.toml` under the platform config directory
//! (`~/.config/notecue/` on Linux), or under `$NOTECUE_CONFIG_DIR` when set.
//! Every section and field has a default, so a missing or partial file
//! still loads.

mod migrate;

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub use migrate::{migrate_config, MigrateResult};

use crate::directive::PlaybackSettings;
use crate::engine::{EngineConfig, RestorePolicy};

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "NOTECUE_CONFIG_DIR";

/// Top-level configuration file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub playback: PlaybackConfig,
    pub engine: EngineTuning,
    pub stamp: StampConfig,
    pub log: LogConfig,
}

/// `[playback]`: what segment exits restore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Volume restored under the `defaults` policy (0-100)
    pub default_volume: u8,
    /// Speed restored under the `defaults` policy
    pub default_speed: f64,
    /// `defaults` or `prior-settings`
    pub restore_policy: RestorePolicy,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            default_volume: 100,
            default_speed: 1.0,
            restore_policy: RestorePolicy::default(),
        }
    }
}

/// `[engine]`: scheduler timing knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineTuning {
    /// Slack on window bounds, seconds
    pub tolerance: f64,
    /// Jumps larger than this are user seeks, seconds
    pub manual_seek_threshold: f64,
    pub guard_debounce_ms: u64,
    pub min_auto_jump_delay_ms: u64,
    pub settle_delay_ms: u64,
    pub suppress_window_ms: u64,
    /// Seeks beyond this distance may reload the buffer, seconds
    pub short_seek_distance: f64,
    pub poll_interval_ms: u64,
}

impl Default for EngineTuning {
    fn default() -> Self {
        let engine = EngineConfig::default();
        Self {
            tolerance: engine.tolerance,
            manual_seek_threshold: engine.manual_seek_threshold,
            guard_debounce_ms: millis(engine.guard_debounce),
            min_auto_jump_delay_ms: millis(engine.min_auto_jump_delay),
            settle_delay_ms: millis(engine.settle_delay),
            suppress_window_ms: millis(engine.suppress_window),
            short_seek_distance: engine.short_seek_distance,
            poll_interval_ms: 16,
        }
    }
}

/// `[stamp]`: new directive defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StampConfig {
    /// Length of a newly stamped window, seconds
    pub default_duration: f64,
}

impl Default for StampConfig {
    fn default() -> Self {
        Self {
            default_duration: 5.0,
        }
    }
}

/// `[log]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter when `RUST_LOG` is unset (e.g. "warn", "notecue=debug")
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl Config {
    /// Load from the default location, falling back to defaults when the
    /// file does not exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load from `path`, falling back to defaults when it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Write to the default location, creating the directory if needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| {
                    format!("Failed to create config directory: {}", parent.display())
                })?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Directory holding `config.toml`.
    pub fn config_dir() -> Result<PathBuf> {
        if let Ok(dir) = env::var(CONFIG_DIR_ENV) {
            if !dir.is_empty() {
                return Ok(PathBuf::from(dir));
            }
        }
        dirs::config_dir()
            .map(|dir| dir.join("notecue"))
            .context("Could not determine config directory")
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Engine parameters derived from `[playback]` and `[engine]`.
    ///
    /// Out-of-range values are clamped rather than rejected: volume to 100,
    /// non-positive speeds and negative distances to their defaults.
    pub fn engine_settings(&self) -> EngineConfig {
        let fallback = EngineConfig::default();
        let configured = self.playback.default_speed;
        let speed = if configured.is_finite() && configured > 0.0 {
            configured
        } else {
            fallback.defaults.speed
        };
        let non_negative = |value: f64, default: f64| {
            if value.is_finite() && value >= 0.0 {
                value
            } else {
                default
            }
        };

        EngineConfig {
            defaults: PlaybackSettings::new(self.playback.default_volume.min(100), speed),
            restore_policy: self.playback.restore_policy,
            tolerance: non_negative(self.engine.tolerance, fallback.tolerance),
            manual_seek_threshold: non_negative(
                self.engine.manual_seek_threshold,
                fallback.manual_seek_threshold,
            ),
            guard_debounce: Duration::from_millis(self.engine.guard_debounce_ms),
            min_auto_jump_delay: Duration::from_millis(self.engine.min_auto_jump_delay_ms),
            settle_delay: Duration::from_millis(self.engine.settle_delay_ms),
            suppress_window: Duration::from_millis(self.engine.suppress_window_ms),
            short_seek_distance: non_negative(
                self.engine.short_seek_distance,
                fallback.short_seek_distance,
            ),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.engine.poll_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_match_engine_defaults() {
        let config = Config::default();
        assert_eq!(config.engine_settings(), EngineConfig::default());
        assert_eq!(config.poll_interval(), Duration::from_millis(16));
        assert_eq!(config.stamp.default_duration, 5.0);
        assert_eq!(config.log.level, "warn");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config: Config = toml::from_str(
            r#"
[playback]
default_volume = 70
restore_policy = "prior-settings"

[engine]
suppress_window_ms = 1500
"#,
        )
        .unwrap();

        let engine = config.engine_settings();
        assert_eq!(engine.defaults, PlaybackSettings::new(70, 1.0));
        assert_eq!(engine.restore_policy, RestorePolicy::PriorSettings);
        assert_eq!(engine.suppress_window, Duration::from_millis(1500));
        assert_eq!(engine.guard_debounce, Duration::from_millis(100));
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let mut config = Config::default();
        config.playback.default_volume = 250;
        config.playback.default_speed = 0.0;
        config.engine.tolerance = -1.0;

        let engine = config.engine_settings();
        assert_eq!(engine.defaults, PlaybackSettings::new(100, 1.0));
        assert_eq!(engine.tolerance, 0.01);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.stamp.default_duration = 8.0;
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn invalid_file_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[playback\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
