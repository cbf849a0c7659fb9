//! Goal-mouth scoring.
//!
//! The goal is an upright rectangle in the plane `x = position.x`, centered
//! on `position.z` and standing on `position.y`. A shot scores when it
//! crosses that plane inside the frame; the crossing point is located by
//! interpolating the step that crossed it.

use serde::{Deserialize, Serialize};

use super::HitResult;
use crate::collision::crossing_fraction_x;
use crate::types::{constants, Vec3};

pub const GOAL_WIDTH: f64 = 7.32;
pub const GOAL_HEIGHT: f64 = 2.44;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalTarget {
    pub id: String,
    pub position: Vec3,
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
}

fn default_width() -> f64 {
    GOAL_WIDTH
}

fn default_height() -> f64 {
    GOAL_HEIGHT
}

impl GoalTarget {
    pub fn new(id: impl Into<String>, position: Vec3) -> Self {
        Self {
            id: id.into(),
            position,
            width: GOAL_WIDTH,
            height: GOAL_HEIGHT,
        }
    }

    /// Point where this step meets the goal line.
    ///
    /// A zero-length step already on or past the line is evaluated where it
    /// stands; otherwise the step must cross the line going down-range.
    fn crossing_point(&self, prev: &Vec3, curr: &Vec3) -> Option<Vec3> {
        if let Some(fraction) = crossing_fraction_x(prev, curr, self.position.x) {
            return Some(prev.lerp(curr, fraction));
        }
        let stationary = (*curr - *prev).magnitude_squared() < constants::EPSILON;
        (stationary && curr.x >= self.position.x).then_some(*curr)
    }

    /// Zone for a point inside the frame, highest value first.
    fn zone(&self, point: &Vec3) -> (&'static str, u32) {
        // 0 on the center line, 1 at a post
        let nz = (point.z - self.position.z).abs() / (self.width / 2.0);
        // 0 on the ground, 1 at the crossbar
        let ny = (point.y - self.position.y) / self.height;

        if ny > 0.6 && nz > 0.6 {
            ("top-corner", 200)
        } else if ny > 0.7 {
            ("upper-90", 150)
        } else if nz > 0.7 {
            ("side-netting", 125)
        } else if ny < 0.4 && nz > 0.6 {
            ("low-corner", 100)
        } else if nz < 0.3 {
            ("center", 50)
        } else {
            ("goal", 75)
        }
    }

    pub fn check(&self, prev: &Vec3, curr: &Vec3) -> HitResult {
        let Some(point) = self.crossing_point(prev, curr) else {
            return HitResult::miss(&self.id);
        };

        let inside_width = (point.z - self.position.z).abs() < self.width / 2.0;
        let height = point.y - self.position.y;
        let inside_height = height > 0.0 && height < self.height;
        if !(inside_width && inside_height) {
            return HitResult::miss(&self.id);
        }

        let (zone, points) = self.zone(&point);
        HitResult::hit(&self.id, zone, points)
    }
}

// =============================================================================
// Tests
// =============================================================================
