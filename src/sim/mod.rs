//! Real-time simulation module
//!
//! All gameplay logic lives here. Nothing in this module renders, reads input
//! devices or touches storage:
//! - Time comes in from the host as wall-clock milliseconds
//! - Randomness comes from a seed handed in at match creation
//! - Barriers keep their draw order

pub mod barrier;
pub mod collision;
pub mod geometry;
pub mod outcome;
pub mod state;
pub mod tick;
pub mod trace;

pub use barrier::{BarrierSet, Segment};
pub use collision::{CollisionReport, clamp_dt, resolve_barriers, resolve_walls, step_ball};
pub use geometry::{convex_hull, cross, point_segment_distance, polygon_area, reflect};
pub use outcome::{MatchHost, MatchOutcome, ReplayStoreRequest, ScoreUpdateRequest};
pub use state::{Arena, Ball, MatchConfig, MatchPhase, MatchResult, Player};
pub use tick::{FrameView, MatchState, TickInput, tick};
pub use trace::{PositionSample, Replay, TraceRecorder};
