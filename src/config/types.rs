//! Configuration type definitions and defaults

use serde::{Deserialize, Serialize};

use crate::options::{PlayerOptions, DEFAULT_FONT_SIZE, DEFAULT_IDLE_QUIET, DEFAULT_THEME};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Defaults applied to every playback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    #[serde(default = "default_speed")]
    pub speed: f64,
    /// Restart from the beginning when playback finishes
    #[serde(default, rename = "loop")]
    pub loop_playback: bool,
    #[serde(default = "default_auto_play")]
    pub auto_play: bool,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_font_size")]
    pub font_size: String,
    /// Seconds without input before the status bar hides
    #[serde(default = "default_idle_quiet")]
    pub idle_quiet: f64,
}

pub fn default_speed() -> f64 {
    1.0
}

pub fn default_auto_play() -> bool {
    true
}

pub fn default_theme() -> String {
    DEFAULT_THEME.to_string()
}

pub fn default_font_size() -> String {
    DEFAULT_FONT_SIZE.to_string()
}

pub fn default_idle_quiet() -> f64 {
    DEFAULT_IDLE_QUIET
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            speed: default_speed(),
            loop_playback: false,
            auto_play: default_auto_play(),
            theme: default_theme(),
            font_size: default_font_size(),
            idle_quiet: default_idle_quiet(),
        }
    }
}

impl PlayerConfig {
    /// Player options seeded from these defaults.
    pub fn to_options(&self) -> PlayerOptions {
        PlayerOptions {
            speed: self.speed,
            loop_playback: self.loop_playback,
            auto_play: self.auto_play,
            theme: self.theme.clone(),
            font_size: self.font_size.clone(),
            idle_quiet: self.idle_quiet,
            ..PlayerOptions::default()
        }
    }
}

/// Diagnostic log settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing` filter directive used when no environment override is set
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

pub fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}
