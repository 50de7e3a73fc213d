//! Desktop runtime configuration.
//!
//! Every field has a default, so a partial JSON document only overrides what it names.

use platform_host::{parse_absolute_path, FS_STATE_KEY, THEME_KEY, WINDOW_LAYOUT_KEY};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::WindowRect;

/// Window placement and sizing rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowGeometry {
    pub default_width: i32,
    pub default_height: i32,
    pub cascade_origin_x: i32,
    pub cascade_origin_y: i32,
    pub cascade_step: i32,
    /// Number of cascade positions before the offset wraps to the origin.
    pub cascade_slots: i32,
    pub min_width: i32,
    pub min_height: i32,
    pub title_bar_height: i32,
    /// Horizontal title bar span that must stay inside the viewport after a move.
    pub min_visible_title: i32,
    /// First z value handed out by a fresh window manager.
    pub z_base: u32,
}

impl Default for WindowGeometry {
    fn default() -> Self {
        Self {
            default_width: 420,
            default_height: 300,
            cascade_origin_x: 120,
            cascade_origin_y: 80,
            cascade_step: 30,
            cascade_slots: 8,
            min_width: 200,
            min_height: 120,
            title_bar_height: 32,
            min_visible_title: 48,
            z_base: 100,
        }
    }
}

/// Key-value store keys for each persisted store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageKeys {
    pub filesystem: String,
    pub windows: String,
    pub theme: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            filesystem: FS_STATE_KEY.to_string(),
            windows: WINDOW_LAYOUT_KEY.to_string(),
            theme: THEME_KEY.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesktopConfig {
    pub viewport: WindowRect,
    pub window: WindowGeometry,
    pub storage: StorageKeys,
    pub terminal_history_limit: usize,
    /// Terminal start directory as a display path.
    pub home_dir: String,
}

impl Default for DesktopConfig {
    fn default() -> Self {
        Self {
            viewport: WindowRect {
                x: 0,
                y: 0,
                w: 1280,
                h: 720,
            },
            window: WindowGeometry::default(),
            storage: StorageKeys::default(),
            terminal_history_limit: system_shell::DEFAULT_HISTORY_LIMIT,
            home_dir: "/home/admin".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid desktop config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid desktop config: {0}")]
    Invalid(String),
}

impl DesktopConfig {
    /// Parses a JSON config document and validates it.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let geometry = &self.window;
        if self.viewport.w <= 0 || self.viewport.h <= 0 {
            return Err(ConfigError::Invalid("viewport must have a positive size".into()));
        }
        if geometry.min_width <= 0 || geometry.min_height <= 0 {
            return Err(ConfigError::Invalid("minimum window size must be positive".into()));
        }
        if geometry.default_width < geometry.min_width
            || geometry.default_height < geometry.min_height
        {
            return Err(ConfigError::Invalid(
                "default window size is below the minimum".into(),
            ));
        }
        if geometry.cascade_slots <= 0 {
            return Err(ConfigError::Invalid("cascade_slots must be at least 1".into()));
        }
        if !self.home_dir.starts_with('/') {
            return Err(ConfigError::Invalid(format!(
                "home_dir must be absolute, got `{}`",
                self.home_dir
            )));
        }
        Ok(())
    }

    pub fn home_segments(&self) -> Vec<String> {
        parse_absolute_path(&self.home_dir)
    }
}
