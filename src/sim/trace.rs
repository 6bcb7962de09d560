//! Replay traces: sampled ball positions plus the barriers drawn

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::barrier::{BarrierSet, Segment};
use crate::consts::SAMPLE_INTERVAL_MS;

/// Ball position at a moment of the match
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionSample {
    /// Milliseconds since the match started
    pub t_offset_ms: u64,
    pub position: Vec2,
}

/// Everything needed to play a won match back
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Replay {
    pub positions: Vec<PositionSample>,
    pub lines: Vec<Segment>,
}

impl Replay {
    /// Total recorded duration (offset of the last sample)
    pub fn duration_ms(&self) -> u64 {
        self.positions.last().map(|s| s.t_offset_ms).unwrap_or(0)
    }
}

/// Samples ball positions on its own cadence, independent of the tick rate
#[derive(Debug, Clone)]
pub struct TraceRecorder {
    interval_ms: u64,
    positions: Vec<PositionSample>,
    last_sample_ms: Option<u64>,
}

impl Default for TraceRecorder {
    fn default() -> Self {
        Self::new(SAMPLE_INTERVAL_MS)
    }
}

impl TraceRecorder {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            positions: Vec::new(),
            last_sample_ms: None,
        }
    }

    /// Record `position` if at least one interval has passed since the last sample
    ///
    /// `t_offset_ms` is time since match start. Returns whether a sample was taken.
    pub fn sample(&mut self, t_offset_ms: u64, position: Vec2) -> bool {
        let due = self
            .last_sample_ms
            .is_none_or(|last| t_offset_ms.saturating_sub(last) >= self.interval_ms);
        if !due {
            return false;
        }
        self.positions.push(PositionSample {
            t_offset_ms,
            position,
        });
        self.last_sample_ms = Some(t_offset_ms);
        true
    }

    pub fn positions(&self) -> &[PositionSample] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Immutable replay of what has been recorded, with `barriers` as they are now
    pub fn snapshot(&self, barriers: &BarrierSet) -> Replay {
        Replay {
            positions: self.positions.clone(),
            lines: barriers.snapshot(),
        }
    }

    pub fn clear(&mut self) {
        self.positions.clear();
        self.last_sample_ms = None;
    }
}
