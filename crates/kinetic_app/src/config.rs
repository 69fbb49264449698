//! Kinetic configuration file handling (kinetic.toml)

use crate::error::{AppError, Result};
use crate::headless_runtime::HeadlessRunConfig;
use kinetic_core::Size;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in a directory
pub const CONFIG_FILE: &str = "kinetic.toml";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub viewport: ViewportConfig,
    #[serde(default)]
    pub headless: HeadlessConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// Logical viewport the page is laid out in
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ViewportConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
}

fn default_width() -> u32 {
    1280
}

fn default_height() -> u32 {
    720
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

/// Headless frame loop settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HeadlessConfig {
    /// Logical milliseconds per frame
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    /// Watched ranges are checked every N frames
    #[serde(default = "default_probe_every")]
    pub probe_every_frames: u32,
}

fn default_tick_ms() -> u64 {
    16
}

fn default_probe_every() -> u32 {
    4
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            probe_every_frames: default_probe_every(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LogConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_filter() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

impl AppConfig {
    /// Parse from TOML text and validate
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file, or from `kinetic.toml` inside a directory
    pub fn load(path: &Path) -> Result<Self> {
        let config_path = resolve_path(path);
        let content = fs::read_to_string(&config_path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %config_path.display(), "loaded config");
        Ok(config)
    }

    /// Load if the file exists, otherwise use defaults
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if resolve_path(path).is_file() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Err(AppError::InvalidConfig(
                "viewport dimensions must be non-zero".to_string(),
            ));
        }
        if self.headless.tick_ms == 0 {
            return Err(AppError::InvalidConfig("tick_ms must be > 0".to_string()));
        }
        Ok(())
    }

    pub fn viewport_size(&self) -> Size {
        Size::new(self.viewport.width as f32, self.viewport.height as f32)
    }

    /// Frame loop settings for a headless run
    pub fn run_config(&self) -> HeadlessRunConfig {
        HeadlessRunConfig {
            width: self.viewport.width,
            height: self.viewport.height,
            tick_ms: self.headless.tick_ms,
            probe_every_frames: self.headless.probe_every_frames,
            ..HeadlessRunConfig::default()
        }
    }
}

fn resolve_path(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(CONFIG_FILE)
    } else {
        path.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.viewport_size(), Size::new(1280.0, 720.0));
        assert_eq!(config.run_config().tick_ms, 16);
    }

    #[test]
    fn test_partial_sections() {
        let config = AppConfig::from_toml_str(
            r#"
            [viewport]
            height = 900

            [log]
            filter = "kinetic_motion=debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.viewport.width, 1280);
        assert_eq!(config.viewport.height, 900);
        assert_eq!(config.log.filter, "kinetic_motion=debug");
        assert_eq!(config.headless.probe_every_frames, 4);
    }

    #[test]
    fn test_rejects_zero_tick() {
        let err = AppConfig::from_toml_str("[headless]\ntick_ms = 0").unwrap_err();
        assert!(matches!(err, AppError::InvalidConfig(_)));
    }

    #[test]
    fn test_round_trips_through_toml() {
        let config = AppConfig::default();
        let text = config.to_toml().unwrap();
        assert_eq!(AppConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let crate_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
        assert_eq!(AppConfig::load_or_default(crate_dir).unwrap(), AppConfig::default());
        assert!(AppConfig::load(crate_dir).is_err());
    }
}
