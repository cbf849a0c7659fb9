//! Elevated hoop scoring.
//!
//! The projectile must come *down* through the rim plane: one sample above
//! the rim, the next below it, crossing inside the rim circle.
//!
//! ```text
//!   prev ●          rim + tol
//!   ─────╲───────── rim height
//!         ╲         rim - tol
//!          ● curr
//! ```

use serde::{Deserialize, Serialize};

use super::HitResult;
use crate::types::Vec3;

/// Regulation rim height above the hoop base (10 ft).
pub const RIM_HEIGHT: f64 = 3.048;

/// Regulation rim radius (9 in).
pub const RIM_RADIUS: f64 = 0.2286;

/// Vertical band around the rim plane the two samples must straddle.
///
/// Zero means a plain downward crossing of the rim plane. A fine timestep
/// moves the ball only a few centimetres per step, so a wide band would need
/// coarse samples.
pub const RIM_TOLERANCE: f64 = 0.0;

/// Crossings within this fraction of the rim radius count as clean.
pub const CLEAN_SHOT_FRACTION: f64 = 0.5;
pub const CLEAN_SHOT_BONUS: u32 = 25;

/// Shot distance bands: (upper bound in metres, zone, points).
const DISTANCE_BANDS: [(f64, &str, u32); 5] = [
    (5.0, "layup", 30),
    (16.0, "free-throw", 50),
    (24.0, "mid-range", 75),
    (32.0, "3-pointer", 100),
    (48.0, "deep-3", 200),
];
const BEYOND_BANDS: (&str, u32) = ("half-court", 500);

/// A hoop standing at `position` with its rim `rim_height` above it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoopTarget {
    pub id: String,
    pub position: Vec3,
    #[serde(default = "default_rim_height")]
    pub rim_height: f64,
    #[serde(default = "default_rim_radius")]
    pub rim_radius: f64,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// Where the shot is taken from, for distance banding.
    #[serde(default)]
    pub launch_point: Vec3,
}

fn default_rim_height() -> f64 {
    RIM_HEIGHT
}

fn default_rim_radius() -> f64 {
    RIM_RADIUS
}

fn default_tolerance() -> f64 {
    RIM_TOLERANCE
}

impl HoopTarget {
    pub fn new(id: impl Into<String>, position: Vec3) -> Self {
        Self {
            id: id.into(),
            position,
            rim_height: RIM_HEIGHT,
            rim_radius: RIM_RADIUS,
            tolerance: RIM_TOLERANCE,
            launch_point: Vec3::ZERO,
        }
    }

    /// World-space center of the rim.
    pub fn rim_center(&self) -> Vec3 {
        self.position + Vec3::new(0.0, self.rim_height, 0.0)
    }

    /// Horizontal distance from the launch point to the hoop.
    pub fn shot_distance(&self) -> f64 {
        (self.position - self.launch_point).horizontal_magnitude()
    }

    /// Zone and base points for the shot distance.
    pub fn distance_band(&self) -> (&'static str, u32) {
        let distance = self.shot_distance();
        DISTANCE_BANDS
            .iter()
            .find(|(limit, _, _)| distance < *limit)
            .map(|(_, zone, points)| (*zone, *points))
            .unwrap_or(BEYOND_BANDS)
    }

    pub fn check(&self, prev: &Vec3, curr: &Vec3) -> HitResult {
        let rim = self.rim_center();
        let above = prev.y > rim.y + self.tolerance;
        let below = curr.y < rim.y - self.tolerance;
        if !(above && below) {
            return HitResult::miss(&self.id);
        }

        // Where the segment passes the rim plane
        let fraction = (prev.y - rim.y) / (prev.y - curr.y);
        let crossing = prev.lerp(curr, fraction);
        let offset = (crossing - rim).horizontal_magnitude();
        if offset >= self.rim_radius {
            return HitResult::miss(&self.id);
        }

        let (zone, points) = self.distance_band();
        if offset < self.rim_radius * CLEAN_SHOT_FRACTION {
            HitResult::hit(&self.id, format!("{}-swish", zone), points + CLEAN_SHOT_BONUS)
        } else {
            HitResult::hit(&self.id, zone, points)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
