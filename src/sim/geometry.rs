//! Geometry kernel
//!
//! Pure helpers shared by the collision resolver and the enclosure check.
//! Nothing here holds state.

use glam::Vec2;

/// Signed (doubled) area of the triangle (a, b, c)
///
/// Positive for a counter-clockwise turn a -> b -> c, negative for clockwise,
/// zero when collinear. Every turn-direction test goes through here.
#[inline]
pub fn cross(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n. `normal` must be unit length.
#[inline]
pub fn reflect(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Distance from `p` to the closest point on segment `a`-`b`
///
/// A zero-length segment degenerates to the distance to `a`.
pub fn point_segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    let t = if len_sq == 0.0 {
        0.0
    } else {
        ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0)
    };
    let closest = a + ab * t;
    (p - closest).length()
}

/// Unit normal of segment `a`-`b`, or `None` for a zero-length segment
///
/// Orientation is arbitrary; reflection does not care which side it faces.
#[inline]
pub fn segment_normal(a: Vec2, b: Vec2) -> Option<Vec2> {
    let dir = b - a;
    Vec2::new(-dir.y, dir.x).try_normalize()
}

/// Convex hull by Andrew's monotone chain
///
/// Points are deduplicated by exact equality and sorted by (x, y). The hull is
/// returned counter-clockwise without a repeated closing point; collinear
/// boundary points are dropped. Fewer than three distinct points come back
/// sorted and deduplicated, with no other change; their area is 0.
pub fn convex_hull(points: &[Vec2]) -> Vec<Vec2> {
    let mut pts: Vec<Vec2> = points.to_vec();
    pts.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    pts.dedup();

    if pts.len() < 3 {
        return pts;
    }

    let mut lower: Vec<Vec2> = Vec::with_capacity(pts.len());
    for &p in &pts {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0 {
            lower.pop();
        }
        lower.push(p);
    }

    let mut upper: Vec<Vec2> = Vec::with_capacity(pts.len());
    for &p in pts.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0 {
            upper.pop();
        }
        upper.push(p);
    }

    // Each chain ends where the other begins
    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

/// Area of a simple polygon by the shoelace formula
pub fn polygon_area(points: &[Vec2]) -> f32 {
    if points.len() < 3 {
        return 0.0;
    }
    let twice: f32 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(p, q)| p.x * q.y - q.x * p.y)
        .sum();
    twice.abs() / 2.0
}
