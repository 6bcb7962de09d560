//! Match settings
//!
//! Whatever the settings store hands over is trusted only after
//! `match_config` has replaced out-of-range values with defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::MatchConfig;

/// Raw settings as the store keeps them
///
/// Fields are signed so that nonsense like a negative time limit survives
/// parsing and is replaced by its default instead of failing the whole load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Hull size (percent of the arena) that counts as trapped
    pub close_percent: i64,
    /// Time allowed per match
    pub time_limit_ms: i64,
    /// Ball speed at level 1, in px/s
    pub base_speed: f32,
    /// Selected level (1-5), each step 10% faster
    pub level: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            close_percent: DEFAULT_CLOSE_PERCENT as i64,
            time_limit_ms: DEFAULT_TIME_LIMIT_MS as i64,
            base_speed: DEFAULT_SPEED,
            level: MIN_LEVEL as i64,
        }
    }
}

impl Settings {
    /// Parse from JSON, falling back to defaults on malformed input
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("Malformed settings ({}), using defaults", err);
                Self::default()
            }
        }
    }

    /// Build from text fields; anything unparsable keeps its default
    pub fn from_raw(close_percent: &str, time_limit_ms: &str, base_speed: &str, level: &str) -> Self {
        let defaults = Self::default();
        Self {
            close_percent: parse_or(close_percent, defaults.close_percent),
            time_limit_ms: parse_or(time_limit_ms, defaults.time_limit_ms),
            base_speed: parse_or(base_speed, defaults.base_speed),
            level: parse_or(level, defaults.level),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Load from a JSON file, or defaults if it is missing or unreadable
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => {
                log::info!("Loaded settings from {}", path.display());
                Self::from_json(&json)
            }
            Err(err) => {
                log::info!("No settings at {} ({}), using defaults", path.display(), err);
                Self::default()
            }
        }
    }

    /// Level clamped to the playable range
    pub fn effective_level(&self) -> u32 {
        self.level.clamp(MIN_LEVEL as i64, MAX_LEVEL as i64) as u32
    }

    /// Base speed scaled for the selected level
    pub fn level_speed(&self) -> f32 {
        let steps = (self.effective_level() - MIN_LEVEL) as f32;
        self.base_speed * (1.0 + steps * LEVEL_SPEED_STEP)
    }

    /// Match parameters with every invalid value replaced by its default
    pub fn match_config(&self) -> MatchConfig {
        MatchConfig {
            speed_px_per_sec: self.level_speed(),
            close_percent: u32::try_from(self.close_percent).unwrap_or(0),
            time_limit_ms: u64::try_from(self.time_limit_ms).unwrap_or(0),
            level: self.effective_level(),
        }
        .sanitized()
    }
}

fn parse_or<T: std::str::FromStr>(raw: &str, default: T) -> T {
    raw.trim().parse().unwrap_or(default)
}
