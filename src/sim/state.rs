//! Match state and core simulation types

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Current phase of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Waiting for a usable arena size
    Idle,
    /// Ball in play, ticks advance the simulation
    Running,
    /// Barriers enclosed the configured share of the arena in time
    Won,
    /// Time limit reached first
    Lost,
    /// Host abandoned the match; no result is produced
    Cancelled,
}

impl MatchPhase {
    /// No further ticks are processed once terminal
    pub fn is_terminal(&self) -> bool {
        matches!(self, MatchPhase::Won | MatchPhase::Lost | MatchPhase::Cancelled)
    }
}

/// The drawable surface the ball is confined to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Both dimensions finite and strictly positive
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// The ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Ball {
    /// Ball resting at `pos`
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius: BALL_RADIUS,
        }
    }

    /// Launch along one of the four diagonals at `speed`
    pub fn launch(&mut self, speed: f32, rng: &mut Pcg32) {
        let sx = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        let sy = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        self.vel = Vec2::new(sx, sy).normalize() * speed;
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}

/// Parameters for one match, fixed once it starts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    pub speed_px_per_sec: f32,
    /// Winning hull size as a percentage of the arena (1-100)
    pub close_percent: u32,
    pub time_limit_ms: u64,
    pub level: u32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            speed_px_per_sec: DEFAULT_SPEED,
            close_percent: DEFAULT_CLOSE_PERCENT,
            time_limit_ms: DEFAULT_TIME_LIMIT_MS,
            level: MIN_LEVEL,
        }
    }
}

impl MatchConfig {
    /// Replace every out-of-range field with its default
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let mut config = self;

        if !(config.speed_px_per_sec.is_finite() && config.speed_px_per_sec > 0.0) {
            log::warn!(
                "Invalid speed {} px/s, using {}",
                config.speed_px_per_sec,
                defaults.speed_px_per_sec
            );
            config.speed_px_per_sec = defaults.speed_px_per_sec;
        }
        if config.close_percent == 0 || config.close_percent > 100 {
            log::warn!(
                "Invalid close percent {}, using {}",
                config.close_percent,
                defaults.close_percent
            );
            config.close_percent = defaults.close_percent;
        }
        if config.time_limit_ms == 0 {
            log::warn!("Invalid time limit 0 ms, using {}", defaults.time_limit_ms);
            config.time_limit_ms = defaults.time_limit_ms;
        }
        config.level = config.level.clamp(MIN_LEVEL, MAX_LEVEL);

        config
    }
}

/// Who is playing, and what they have to beat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub username: String,
    /// Best winning time on this level before the match, if any
    pub prior_best_ms: Option<u64>,
}

impl Player {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            prior_best_ms: None,
        }
    }

    pub fn with_prior_best(mut self, best_ms: Option<u64>) -> Self {
        self.prior_best_ms = best_ms;
        self
    }

    /// Strictly faster than the prior best (any win beats no record)
    pub fn is_improvement(&self, elapsed_ms: u64) -> bool {
        self.prior_best_ms.is_none_or(|best| elapsed_ms < best)
    }
}

/// Final outcome of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub won: bool,
    pub elapsed_ms: u64,
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}
