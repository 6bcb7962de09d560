//! Per-tick ball integration and collision response
//!
//! Explicit Euler with a clamped step, then walls, then barriers. Barrier
//! contact is a proximity test against zero-thickness segments; there is no
//! sweep and no sub-stepping.

use glam::Vec2;

use super::barrier::Segment;
use super::geometry::{point_segment_distance, reflect, segment_normal};
use super::state::{Arena, Ball};
use crate::consts::{CONTACT_EPSILON, MAX_TICK_DT};

/// What the ball touched during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionReport {
    pub wall_hits: u32,
    pub barrier_hits: u32,
}

impl CollisionReport {
    pub fn any(&self) -> bool {
        self.wall_hits > 0 || self.barrier_hits > 0
    }
}

/// Clamp a raw tick interval so a stalled scheduler cannot tunnel the ball
#[inline]
pub fn clamp_dt(dt: f32) -> f32 {
    if dt.is_finite() { dt.clamp(0.0, MAX_TICK_DT) } else { 0.0 }
}

/// Advance the ball by `dt` seconds and resolve every contact
pub fn step_ball(ball: &mut Ball, arena: &Arena, barriers: &[Segment], dt: f32) -> CollisionReport {
    ball.pos += ball.vel * clamp_dt(dt);

    CollisionReport {
        wall_hits: resolve_walls(ball, arena),
        barrier_hits: resolve_barriers(ball, barriers),
    }
}

/// Bounce off the arena edges, one axis at a time
///
/// A corner hit flips both components independently.
pub fn resolve_walls(ball: &mut Ball, arena: &Arena) -> u32 {
    let r = ball.radius;
    let mut hits = 0;

    if ball.pos.x - r < 0.0 {
        ball.pos.x = r;
        ball.vel.x = -ball.vel.x;
        hits += 1;
    }
    if ball.pos.x + r > arena.width {
        ball.pos.x = arena.width - r;
        ball.vel.x = -ball.vel.x;
        hits += 1;
    }
    if ball.pos.y - r < 0.0 {
        ball.pos.y = r;
        ball.vel.y = -ball.vel.y;
        hits += 1;
    }
    if ball.pos.y + r > arena.height {
        ball.pos.y = arena.height - r;
        ball.vel.y = -ball.vel.y;
        hits += 1;
    }

    hits
}

/// Whether the ball is close enough to `segment` to bounce
#[inline]
pub fn touches(ball_pos: Vec2, ball_radius: f32, segment: &Segment) -> bool {
    point_segment_distance(ball_pos, segment.a, segment.b) <= ball_radius + CONTACT_EPSILON
}

/// Reflect off every barrier the ball overlaps, in draw order
///
/// Each overlapping segment reflects the velocity in turn, so two barriers
/// meeting at a vertex can cancel each other out.
pub fn resolve_barriers(ball: &mut Ball, barriers: &[Segment]) -> u32 {
    let mut hits = 0;
    for segment in barriers {
        if !touches(ball.pos, ball.radius, segment) {
            continue;
        }
        // Zero-length barriers have no surface to bounce off
        if let Some(normal) = segment_normal(segment.a, segment.b) {
            ball.vel = reflect(ball.vel, normal);
            hits += 1;
        }
    }
    hits
}
