//! Shooting range targets: paper bullseye, humanoid silhouette, steel plate.
//!
//! Range targets are flat boards facing the shooter (normal along -X). Only
//! positions within `depth_tolerance` of the board plane score; scoring uses
//! the 2D offset `(dy, dz)` from the board center.

use serde::{Deserialize, Serialize};

use super::ring::RingTable;
use super::HitResult;
use crate::collision::crossing_fraction_x;
use crate::types::Vec3;

pub const DEPTH_TOLERANCE: f64 = 0.5;

/// Silhouette zones in priority order: (zone, center height offset, radius, points).
const SILHOUETTE_CIRCLES: [(&str, f64, f64, u32); 2] =
    [("headshot", 0.45, 0.12, 150), ("center-mass", 0.1, 0.12, 100)];
const SILHOUETTE_BODY_POINTS: u32 = 50;

const PLATE_CENTER_OFFSET: f64 = 0.15;
const PLATE_HALF_HEIGHT: f64 = 0.25;
const PLATE_HALF_WIDTH: f64 = 0.2;
const PLATE_POINTS: u32 = 75;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RangeFace {
    Bullseye,
    Silhouette,
    SteelPlate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeTarget {
    pub id: String,
    pub position: Vec3,
    pub face: RangeFace,
    #[serde(default = "default_depth_tolerance")]
    pub depth_tolerance: f64,
    /// Scoring rings for the bullseye face.
    #[serde(default = "RingTable::bullseye")]
    pub rings: RingTable,
}

fn default_depth_tolerance() -> f64 {
    DEPTH_TOLERANCE
}

impl RangeTarget {
    pub fn new(id: impl Into<String>, position: Vec3, face: RangeFace) -> Self {
        Self {
            id: id.into(),
            position,
            face,
            depth_tolerance: DEPTH_TOLERANCE,
            rings: RingTable::bullseye(),
        }
    }

    /// Point of this step on the board plane, if any.
    fn board_point(&self, prev: &Vec3, curr: &Vec3) -> Option<Vec3> {
        if let Some(fraction) = crossing_fraction_x(prev, curr, self.position.x) {
            return Some(prev.lerp(curr, fraction));
        }
        ((curr.x - self.position.x).abs() <= self.depth_tolerance).then_some(*curr)
    }

    pub fn check(&self, prev: &Vec3, curr: &Vec3) -> HitResult {
        let Some(point) = self.board_point(prev, curr) else {
            return HitResult::miss(&self.id);
        };
        let dy = point.y - self.position.y;
        let dz = point.z - self.position.z;

        let scored = match self.face {
            RangeFace::Bullseye => self
                .rings
                .classify(dy.hypot(dz))
                .map(|ring| (ring.zone.clone(), ring.points)),
            RangeFace::Silhouette => silhouette_zone(dy, dz).map(|(z, p)| (z.to_string(), p)),
            RangeFace::SteelPlate => {
                let on_plate = (dy - PLATE_CENTER_OFFSET).abs() < PLATE_HALF_HEIGHT
                    && dz.abs() < PLATE_HALF_WIDTH;
                on_plate.then(|| ("plate".to_string(), PLATE_POINTS))
            }
        };

        match scored {
            Some((zone, points)) => HitResult::hit(&self.id, zone, points),
            None => HitResult::miss(&self.id),
        }
    }
}

fn silhouette_zone(dy: f64, dz: f64) -> Option<(&'static str, u32)> {
    for (zone, offset, radius, points) in SILHOUETTE_CIRCLES {
        if (dy - offset).hypot(dz) <= radius {
            return Some((zone, points));
        }
    }
    let in_body = dz.abs() < 0.2 && dy > -0.4 && dy < 0.8;
    in_body.then_some(("body", SILHOUETTE_BODY_POINTS))
}

// =============================================================================
// Tests
// =============================================================================
