//! Core types for the projectile simulation.
//!
//! All units are SI:
//! - Position: meters (m)
//! - Velocity: meters per second (m/s)
//! - Acceleration: meters per second squared (m/s²)
//! - Mass: kilograms (kg)
//! - Area: square meters (m²)
//! - Time: seconds (s)

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

// =============================================================================
// Vec3 - 3D Vector
// =============================================================================

/// A 3D vector used for positions, velocities and accelerations.
///
/// Coordinate system:
/// - X: horizontal, down-range (positive away from the launcher)
/// - Y: vertical (positive upward, ground plane at y = 0)
/// - Z: horizontal, lateral
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Squared magnitude (avoids sqrt for comparisons)
    pub fn magnitude_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Magnitude (length) of the vector
    pub fn magnitude(&self) -> f64 {
        self.magnitude_squared().sqrt()
    }

    /// Length of the projection onto the ground plane (x/z).
    pub fn horizontal_magnitude(&self) -> f64 {
        (self.x * self.x + self.z * self.z).sqrt()
    }

    /// Returns a unit vector in the same direction, or zero if magnitude is zero
    pub fn normalized(&self) -> Self {
        let mag = self.magnitude();
        if mag < constants::EPSILON {
            Self::ZERO
        } else {
            *self / mag
        }
    }

    /// Dot product
    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Self) -> f64 {
        (*self - *other).magnitude()
    }

    /// Linear interpolation between two vectors
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        *self + (*other - *self) * t
    }

    /// True when every component is finite (not NaN, not infinite).
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

// Operator overloads for Vec3
impl Add for Vec3 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
        self.z += other.z;
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl SubAssign for Vec3 {
    fn sub_assign(&mut self, other: Self) {
        self.x -= other.x;
        self.y -= other.y;
        self.z -= other.z;
    }
}

impl Mul<f64> for Vec3 {
    type Output = Self;
    fn mul(self, scalar: f64) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
            z: self.z * scalar,
        }
    }
}

impl Div<f64> for Vec3 {
    type Output = Self;
    fn div(self, scalar: f64) -> Self {
        Self {
            x: self.x / scalar,
            y: self.y / scalar,
            z: self.z / scalar,
        }
    }
}

impl Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

impl Default for Vec3 {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

// =============================================================================
// Projectile State
// =============================================================================

/// Kinematic state of the projectile at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileState {
    pub pos: Vec3,
    pub vel: Vec3,
}

impl ProjectileState {
    pub fn new(pos: Vec3, vel: Vec3) -> Self {
        Self { pos, vel }
    }

    /// Projectile at rest at a given position
    pub fn at_rest(pos: Vec3) -> Self {
        Self {
            pos,
            vel: Vec3::ZERO,
        }
    }
}

impl Default for ProjectileState {
    fn default() -> Self {
        Self::at_rest(Vec3::ZERO)
    }
}

// =============================================================================
// Simulation Parameters
// =============================================================================

/// Everything the solver needs to integrate one shot.
///
/// Wind is the ambient air velocity; drag acts on the velocity relative to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationParams {
    pub gravity: Vec3,
    pub wind: Vec3,
    pub drag_coefficient: f64,
    pub air_density: f64,
    pub projectile_area: f64,
    pub projectile_mass: f64,
    pub initial_position: Vec3,
    pub initial_velocity: Vec3,
    pub time_step: f64,
    pub max_time: f64,
}

impl SimulationParams {
    /// Vacuum shot: gravity only, no drag, no wind.
    pub fn vacuum(initial_position: Vec3, initial_velocity: Vec3) -> Self {
        Self {
            drag_coefficient: 0.0,
            air_density: 0.0,
            initial_position,
            initial_velocity,
            ..Self::default()
        }
    }

    /// Combined drag constant `0.5 * rho * A * Cd`.
    pub fn drag_factor(&self) -> f64 {
        0.5 * self.air_density * self.projectile_area * self.drag_coefficient
    }
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -constants::GRAVITY, 0.0),
            wind: Vec3::ZERO,
            drag_coefficient: 0.47, // sphere
            air_density: constants::AIR_DENSITY,
            projectile_area: 0.01,
            projectile_mass: 1.0,
            initial_position: Vec3::ZERO,
            initial_velocity: Vec3::ZERO,
            time_step: 0.01,
            max_time: 100.0,
        }
    }
}

// =============================================================================
// Trajectory Output
// =============================================================================

/// One recorded point of the trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySample {
    pub time: f64,
    pub position: Vec3,
    pub velocity: Vec3,
}

impl TrajectorySample {
    pub fn new(time: f64, position: Vec3, velocity: Vec3) -> Self {
        Self {
            time,
            position,
            velocity,
        }
    }
}

/// Highest recorded sample (sample resolution).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ApexEvent {
    pub time: f64,
    pub position: Vec3,
}

/// Ground crossing, localized between two integration steps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactEvent {
    pub time: f64,
    pub position: Vec3,
    pub velocity: Vec3,
    /// Degrees below horizontal: 0 = grazing, 90 = straight down.
    pub angle: f64,
}

/// Output of a solver run.
///
/// `impact` is `None` when the projectile is still airborne at `max_time`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub trajectory: Vec<TrajectorySample>,
    pub apex: ApexEvent,
    pub impact: Option<ImpactEvent>,
}

// =============================================================================
// Physical Constants
// =============================================================================

/// Physical constants used in the simulation.
pub mod constants {
    /// Gravitational acceleration (m/s²)
    pub const GRAVITY: f64 = 9.81;

    /// Air density at sea level, 15°C (kg/m³)
    pub const AIR_DENSITY: f64 = 1.225;

    /// Small value for floating-point comparisons
    pub const EPSILON: f64 = 1e-10;

    /// Relative air speed below which drag is skipped (m/s)
    pub const DRAG_SPEED_EPSILON: f64 = 1e-6;

    /// Upper bound on integration steps for a single shot
    pub const MAX_STEPS: usize = 10_000_000;
}

// =============================================================================
// Tests
// =============================================================================
