//! Player-drawn barriers and the enclosure they form

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{convex_hull, polygon_area};

/// A finalized barrier: the straight chord of one drag gesture
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub a: Vec2,
    pub b: Vec2,
}

impl Segment {
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self { a, b }
    }

    /// Segment from drag start to drag end; the path in between is discarded
    pub fn from_gesture(start: Vec2, end: Vec2) -> Self {
        Self::new(start, end)
    }

    /// Whether both endpoints are finite numbers
    pub fn is_finite(&self) -> bool {
        self.a.is_finite() && self.b.is_finite()
    }
}

/// Barriers in draw order
///
/// Append-only for the life of a match. Order is kept for replay fidelity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BarrierSet {
    segments: Vec<Segment>,
}

impl BarrierSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn as_slice(&self) -> &[Segment] {
        &self.segments
    }

    /// Owned copy for collaborators outside the match
    pub fn snapshot(&self) -> Vec<Segment> {
        self.segments.clone()
    }

    /// Both endpoints of every segment, in draw order
    pub fn endpoints(&self) -> Vec<Vec2> {
        self.segments.iter().flat_map(|s| [s.a, s.b]).collect()
    }

    /// Convex hull of all barrier endpoints
    pub fn hull(&self) -> Vec<Vec2> {
        convex_hull(&self.endpoints())
    }

    /// Number of distinct barrier endpoints
    pub fn distinct_endpoints(&self) -> usize {
        let mut pts = self.endpoints();
        pts.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
        pts.dedup();
        pts.len()
    }

    /// Hull area as a percentage of `arena_area`, once a hull can be formed
    ///
    /// `None` while there are fewer than three distinct endpoints or when the
    /// arena has no area. Collinear endpoints form a flat hull and give `Some(0.0)`.
    pub fn enclosure(&self, arena_area: f32) -> Option<f32> {
        if arena_area <= 0.0 || self.distinct_endpoints() < 3 {
            return None;
        }
        Some(polygon_area(&self.hull()) / arena_area * 100.0)
    }

    /// Hull area as a percentage of `arena_area`; 0 means "not enclosed yet"
    pub fn enclosed_area_ratio(&self, arena_area: f32) -> f32 {
        self.enclosure(arena_area).unwrap_or(0.0)
    }

    pub(crate) fn clear(&mut self) {
        self.segments.clear();
    }
}
