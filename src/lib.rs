//! Ball Trap - a single-screen enclosure reflex game
//!
//! Core modules:
//! - `sim`: Real-time simulation (geometry, collisions, match state machine, traces)
//! - `settings`: Match parameters with fallback to safe defaults
//! - `records`: In-memory best times and replay archive fed by match outcomes
//! - `error`: The few failures the engine reports upward

pub mod error;
pub mod records;
pub mod settings;
pub mod sim;

pub use error::MatchError;
pub use records::Records;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Nominal tick period of the host scheduler (~60 Hz)
    pub const TICK_MS: u64 = 16;
    /// Largest step the resolver integrates in one tick (seconds)
    pub const MAX_TICK_DT: f32 = 0.05;

    /// Minimum spacing between recorded ball positions
    pub const SAMPLE_INTERVAL_MS: u64 = 50;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 14.0;
    /// Slack added to the radius when testing barrier contact
    pub const CONTACT_EPSILON: f32 = 1.0;

    /// Settings defaults
    pub const DEFAULT_CLOSE_PERCENT: u32 = 80;
    pub const DEFAULT_TIME_LIMIT_MS: u64 = 30_000;
    pub const DEFAULT_SPEED: f32 = 300.0;

    /// Levels scale the base speed by 10% per step above level 1
    pub const MIN_LEVEL: u32 = 1;
    pub const MAX_LEVEL: u32 = 5;
    pub const LEVEL_SPEED_STEP: f32 = 0.1;
}

/// Milliseconds as seconds, for feeding the resolver
#[inline]
pub fn ms_to_secs(ms: u64) -> f32 {
    ms as f32 / 1000.0
}

/// Format a duration in milliseconds as seconds with two decimals ("12.34 s")
pub fn format_seconds(ms: u64) -> String {
    format!("{:.2} s", ms as f64 / 1000.0)
}
