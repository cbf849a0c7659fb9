//! Concentric ring scoring.
//!
//! A `RingTable` maps a distance from the target center to a scoring ring.
//! Rings are kept sorted by radius, so the innermost ring containing the hit
//! always wins.

use serde::{Deserialize, Serialize};

use super::HitResult;
use crate::collision::segment_hits_sphere;
use crate::types::{constants, Vec3};

/// One scoring ring: everything within `radius` of the center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ring {
    pub radius: f64,
    pub points: u32,
    pub zone: String,
}

impl Ring {
    pub fn new(radius: f64, points: u32, zone: impl Into<String>) -> Self {
        Self {
            radius,
            points,
            zone: zone.into(),
        }
    }
}

/// Rings sorted innermost first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Ring>", into = "Vec<Ring>")]
pub struct RingTable {
    rings: Vec<Ring>,
}

impl RingTable {
    pub fn new(mut rings: Vec<Ring>) -> Self {
        rings.sort_by(|a, b| a.radius.total_cmp(&b.radius));
        Self { rings }
    }

    /// Field target: 1 / 2 / 3 m rings worth 100 / 50 / 25.
    pub fn classic() -> Self {
        Self::new(vec![
            Ring::new(1.0, 100, "bullseye"),
            Ring::new(2.0, 50, "middle-ring"),
            Ring::new(3.0, 25, "outer-ring"),
        ])
    }

    /// Paper target: ten 5 cm rings, 100 points in the center down to 10.
    pub fn bullseye() -> Self {
        let rings = (1..=10u32)
            .map(|k| {
                let zone = if k == 1 {
                    "bullseye".to_string()
                } else {
                    format!("{}-ring", 11 - k)
                };
                Ring::new(0.05 * k as f64, 110 - 10 * k, zone)
            })
            .collect();
        Self::new(rings)
    }

    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    /// Radius of the outermost ring (0 for an empty table).
    pub fn outer_radius(&self) -> f64 {
        self.rings.last().map(|r| r.radius).unwrap_or(0.0)
    }

    /// Innermost ring containing `distance`.
    pub fn classify(&self, distance: f64) -> Option<&Ring> {
        self.rings.iter().find(|r| distance <= r.radius)
    }
}

impl From<Vec<Ring>> for RingTable {
    fn from(rings: Vec<Ring>) -> Self {
        Self::new(rings)
    }
}

impl From<RingTable> for Vec<Ring> {
    fn from(table: RingTable) -> Self {
        table.rings
    }
}

impl Default for RingTable {
    fn default() -> Self {
        Self::classic()
    }
}

/// Ground ring target, scored where the shot comes down on it.
///
/// The ring lies in the horizontal plane through `position`. A step scores
/// when it descends through that plane within the outer ring; the ring is
/// picked from the 3D distance between the crossing point and the center. A
/// zero-length step is scored where it stands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RingTarget {
    pub id: String,
    pub position: Vec3,
    #[serde(default)]
    pub rings: RingTable,
}

impl RingTarget {
    pub fn new(id: impl Into<String>, position: Vec3) -> Self {
        Self {
            id: id.into(),
            position,
            rings: RingTable::classic(),
        }
    }

    fn landing_point(&self, prev: &Vec3, curr: &Vec3) -> Option<Vec3> {
        let plane = self.position.y;
        if (*curr - *prev).magnitude_squared() < constants::EPSILON {
            return Some(*curr);
        }
        if prev.y > plane && curr.y <= plane {
            let fraction = (prev.y - plane) / (prev.y - curr.y);
            return Some(prev.lerp(curr, fraction));
        }
        None
    }

    pub fn check(&self, prev: &Vec3, curr: &Vec3) -> HitResult {
        // Cheap rejection before locating the landing point
        if !segment_hits_sphere(prev, curr, &self.position, self.rings.outer_radius()) {
            return HitResult::miss(&self.id);
        }

        let ring = self
            .landing_point(prev, curr)
            .and_then(|p| self.rings.classify(p.distance(&self.position)));
        match ring {
            Some(ring) => HitResult::hit(&self.id, ring.zone.clone(), ring.points),
            None => HitResult::miss(&self.id),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
