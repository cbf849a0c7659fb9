//! Moving targets.
//!
//! The solver never owns target positions. Whoever animates the scene hands
//! the scan a [`PositionLookup`]; the scan asks it where a target is at the
//! time of each step. A renderer can pass a per-tick snapshot
//! (`HashMap<String, Vec3>`), or the scan can evaluate the motion itself
//! through [`AnimatedTargets`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::Vec3;

/// Position of a target by id at a given time since launch.
///
/// `None` means "use the target's declared position".
pub trait PositionLookup {
    fn position_of(&self, id: &str, time: f64) -> Option<Vec3>;
}

/// Lookup for scenes where nothing moves.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticPositions;

impl PositionLookup for StaticPositions {
    fn position_of(&self, _id: &str, _time: f64) -> Option<Vec3> {
        None
    }
}

/// Snapshot taken on one animation tick; time is ignored.
impl PositionLookup for HashMap<String, Vec3> {
    fn position_of(&self, id: &str, _time: f64) -> Option<Vec3> {
        self.get(id).copied()
    }
}

// =============================================================================
// Target Motion
// =============================================================================

fn default_speed() -> f64 {
    1.0
}

fn default_orbit_radius() -> f64 {
    5.0
}

fn default_vertical_range() -> f64 {
    3.0
}

fn default_horizontal_range() -> f64 {
    5.0
}

/// How a target moves over time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "behavior", rename_all = "kebab-case")]
pub enum TargetMotion {
    #[default]
    Static,
    /// Circle in the horizontal plane.
    Orbit {
        /// Orbit center; the target's base position when absent.
        #[serde(default)]
        center: Option<Vec3>,
        #[serde(default = "default_orbit_radius")]
        radius: f64,
        /// Angular speed (rad/s).
        #[serde(default = "default_speed")]
        speed: f64,
    },
    /// Hops above its base height: `|sin(t·speed)|·range`.
    BounceVertical {
        #[serde(default = "default_vertical_range")]
        range: f64,
        #[serde(default = "default_speed")]
        speed: f64,
    },
    /// Sways down-range and back: `sin(t·speed)·range` along X.
    BounceHorizontal {
        #[serde(default = "default_horizontal_range")]
        range: f64,
        #[serde(default = "default_speed")]
        speed: f64,
    },
}

impl TargetMotion {
    pub fn position_at(&self, base: Vec3, time: f64) -> Vec3 {
        match self {
            TargetMotion::Static => base,
            TargetMotion::Orbit {
                center,
                radius,
                speed,
            } => {
                let c = center.unwrap_or(base);
                let angle = time * speed;
                Vec3::new(c.x + angle.cos() * radius, c.y, c.z + angle.sin() * radius)
            }
            TargetMotion::BounceVertical { range, speed } => {
                let offset = (time * speed).sin() * range;
                Vec3::new(base.x, base.y + offset.abs(), base.z)
            }
            TargetMotion::BounceHorizontal { range, speed } => {
                let offset = (time * speed).sin() * range;
                Vec3::new(base.x + offset, base.y, base.z)
            }
        }
    }
}

// =============================================================================
// Animated Targets
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
struct AnimatedEntry {
    base: Vec3,
    motion: TargetMotion,
}

/// Target motions evaluated on the scene clock.
///
/// `clock_at_launch` is the animation time when the shot was fired; a lookup
/// at flight time `t` evaluates each motion at `clock_at_launch + t`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimatedTargets {
    entries: HashMap<String, AnimatedEntry>,
    clock_at_launch: f64,
}

impl AnimatedTargets {
    pub fn new(clock_at_launch: f64) -> Self {
        Self {
            entries: HashMap::new(),
            clock_at_launch,
        }
    }

    pub fn insert(&mut self, id: impl Into<String>, base: Vec3, motion: TargetMotion) {
        self.entries.insert(id.into(), AnimatedEntry { base, motion });
    }

    pub fn with(mut self, id: impl Into<String>, base: Vec3, motion: TargetMotion) -> Self {
        self.insert(id, base, motion);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PositionLookup for AnimatedTargets {
    fn position_of(&self, id: &str, time: f64) -> Option<Vec3> {
        let entry = self.entries.get(id)?;
        Some(entry.motion.position_at(entry.base, self.clock_at_launch + time))
    }
}

// =============================================================================
// Tests
// =============================================================================
