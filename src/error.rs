//! Errors the engine reports upward
//!
//! Everything else (bad settings, degenerate barriers, stalled ticks) is
//! recovered where it happens.

use thiserror::Error;

use crate::sim::MatchPhase;

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum MatchError {
    /// Arena has no usable area yet; the host should retry once it is laid out
    #[error("arena not ready: {width}x{height}")]
    InvalidArena { width: f32, height: f32 },

    /// `start` called on a match that already left `Idle`
    #[error("match already started (phase {phase:?})")]
    NotIdle { phase: MatchPhase },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = MatchError::InvalidArena {
            width: 0.0,
            height: 600.0,
        };
        assert_eq!(err.to_string(), "arena not ready: 0x600");

        let err = MatchError::NotIdle {
            phase: MatchPhase::Running,
        };
        assert_eq!(err.to_string(), "match already started (phase Running)");

        let boxed: Box<dyn std::error::Error> = Box::new(err);
        assert!(boxed.source().is_none());
    }
}
