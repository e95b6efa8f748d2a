//! Player options.
//!
//! Options arrive from embedders as loosely keyed maps (`autoPlay`,
//! `auto_play`, `auto-play` all mean the same thing), from the config file,
//! and from the command line. They are normalized to kebab-case keys and
//! validated once at player creation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{PlayerError, Result};
use crate::screen::Line;

pub const DEFAULT_FONT_SIZE: &str = "small";
pub const DEFAULT_THEME: &str = "asciinema";
/// Seconds without input before the user is considered idle.
pub const DEFAULT_IDLE_QUIET: f64 = 3.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct PlayerOptions {
    /// Terminal width override; the recording's own size wins otherwise
    pub width: Option<usize>,
    pub height: Option<usize>,
    pub speed: f64,
    /// Screen shown before the recording is loaded
    pub snapshot: Vec<Line>,
    pub font_size: String,
    pub theme: String,
    /// Initial position in seconds
    pub start_at: f64,
    #[serde(rename = "loop")]
    pub loop_playback: bool,
    pub auto_play: bool,
    pub title: Option<String>,
    pub author: Option<String>,
    pub author_url: Option<String>,
    pub author_img_url: Option<String>,
    pub idle_quiet: f64,
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            speed: 1.0,
            snapshot: Vec::new(),
            font_size: DEFAULT_FONT_SIZE.to_string(),
            theme: DEFAULT_THEME.to_string(),
            start_at: 0.0,
            loop_playback: false,
            auto_play: false,
            title: None,
            author: None,
            author_url: None,
            author_img_url: None,
            idle_quiet: DEFAULT_IDLE_QUIET,
        }
    }
}

impl PlayerOptions {
    /// Build options from a map with arbitrarily cased keys.
    ///
    /// Unknown keys are ignored; missing keys take their defaults.
    pub fn from_json_map(map: Map<String, Value>) -> Result<Self> {
        let normalized: Map<String, Value> = map
            .into_iter()
            .map(|(key, value)| (normalize_key(&key), value))
            .collect();
        let options: PlayerOptions =
            serde_json::from_value(Value::Object(normalized)).map_err(|e| {
                PlayerError::InvalidOption {
                    name: "options".to_string(),
                    reason: e.to_string(),
                }
            })?;
        options.validate()?;
        Ok(options)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if !(self.speed.is_finite() && self.speed > 0.0) {
            return Err(invalid("speed", "must be a positive number"));
        }
        if !(self.start_at.is_finite() && self.start_at >= 0.0) {
            return Err(invalid("start-at", "must be zero or a positive number"));
        }
        if !(self.idle_quiet.is_finite() && self.idle_quiet > 0.0) {
            return Err(invalid("idle-quiet", "must be a positive number"));
        }
        if self.width == Some(0) || self.height == Some(0) {
            return Err(invalid("width/height", "must be at least 1"));
        }
        Ok(())
    }
}

fn invalid(name: &str, reason: &str) -> PlayerError {
    PlayerError::InvalidOption {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

/// Normalize a camelCase or snake_case key to kebab-case.
///
/// Acronym runs stay together: `authorImgURL` becomes `author-img-url`.
pub fn normalize_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let mut out = String::with_capacity(key.len() + 4);
    for (idx, &ch) in chars.iter().enumerate() {
        if ch == '_' || ch == '-' {
            if !out.is_empty() && !out.ends_with('-') {
                out.push('-');
            }
            continue;
        }
        if ch.is_uppercase() && idx > 0 && !out.ends_with('-') {
            let prev = chars[idx - 1];
            let next_is_lower = chars.get(idx + 1).is_some_and(|c| c.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower) {
                out.push('-');
            }
        }
        out.extend(ch.to_lowercase());
    }
    out
}
