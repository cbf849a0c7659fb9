//! Segment-based collision detection.
//!
//! Every test here takes the segment travelled during one simulation step
//! (`p1` → `p2`) instead of a single position, so a fast projectile cannot
//! skip over a thin target between two samples.

use crate::types::{constants, Vec3};

/// Roots of `|p1 + t·(p2 − p1) − center|² = radius²`.
///
/// Returns `None` when the line misses the sphere. Callers handle
/// degenerate segments first; an exactly zero-length one has no roots.
fn sphere_roots(p1: &Vec3, p2: &Vec3, center: &Vec3, radius: f64) -> Option<(f64, f64)> {
    let d = *p2 - *p1;
    let f = *p1 - *center;

    let a = d.magnitude_squared();
    if a == 0.0 {
        return None;
    }
    let b = 2.0 * f.dot(&d);
    let c = f.magnitude_squared() - radius * radius;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrt_disc = discriminant.sqrt();
    let t1 = (-b - sqrt_disc) / (2.0 * a);
    let t2 = (-b + sqrt_disc) / (2.0 * a);
    Some((t1, t2))
}

fn point_in_sphere(p: &Vec3, center: &Vec3, radius: f64) -> bool {
    (*p - *center).magnitude_squared() <= radius * radius
}

/// Test whether the segment `p1 → p2` intersects a sphere.
///
/// Hits when either intersection parameter lies in `[0, 1]`, or when the
/// sphere contains the whole segment (`t1 < 0 && t2 > 1`). A near
/// zero-length segment reduces to point-in-sphere tests on both endpoints.
pub fn segment_hits_sphere(p1: &Vec3, p2: &Vec3, center: &Vec3, radius: f64) -> bool {
    if (*p2 - *p1).magnitude_squared() < constants::EPSILON {
        return point_in_sphere(p1, center, radius) || point_in_sphere(p2, center, radius);
    }

    match sphere_roots(p1, p2, center, radius) {
        None => false,
        Some((t1, t2)) => {
            let in_segment = |t: f64| (0.0..=1.0).contains(&t);
            in_segment(t1) || in_segment(t2) || (t1 < 0.0 && t2 > 1.0)
        }
    }
}

/// Point on the segment `p1 → p2` closest to `point`.
pub fn closest_point_on_segment(p1: &Vec3, p2: &Vec3, point: &Vec3) -> Vec3 {
    let d = *p2 - *p1;
    let len_sq = d.magnitude_squared();
    if len_sq < constants::EPSILON {
        return *p1;
    }
    let t = ((*point - *p1).dot(&d) / len_sq).clamp(0.0, 1.0);
    *p1 + d * t
}

/// Distance from a position to a sphere's surface, zero inside.
pub fn distance_to_target(pos: &Vec3, center: &Vec3, radius: f64) -> f64 {
    (pos.distance(center) - radius).max(0.0)
}

/// Fraction along `p1 → p2` where the segment crosses the plane `x = plane_x`
/// going in +X.
pub fn crossing_fraction_x(p1: &Vec3, p2: &Vec3, plane_x: f64) -> Option<f64> {
    if p1.x < plane_x && p2.x >= plane_x {
        Some((plane_x - p1.x) / (p2.x - p1.x))
    } else {
        None
    }
}

// =============================================================================
// Tests
// =============================================================================
