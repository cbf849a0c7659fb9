//! Launch inputs and shot presets.
//!
//! Players aim with three numbers: speed, elevation and azimuth. This module
//! turns them into [`SimulationParams`], and offers a few named presets plus
//! a speed suggestion for hitting a given point.
//!
//! ```text
//!          y
//!          │   ╱ velocity
//!          │  ╱ elevation (angle_deg, above horizontal)
//!  height ─●─────────── x (azimuth 0)
//!         ╱
//!        z   azimuth rotates +X toward +Z
//! ```

use serde::{Deserialize, Serialize};

use crate::presets::{EnvironmentPreset, ProjectileProperties};
use crate::types::{SimulationParams, Vec3};

/// How the player aims a shot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaunchParams {
    /// Muzzle speed (m/s)
    pub speed: f64,
    /// Elevation above horizontal (degrees)
    pub angle_deg: f64,
    /// Heading in the ground plane, 0 = down-range +X (degrees)
    #[serde(default)]
    pub azimuth_deg: f64,
    /// Release height above the ground (m)
    #[serde(default)]
    pub height: f64,
}

impl LaunchParams {
    pub fn new(speed: f64, angle_deg: f64) -> Self {
        Self {
            speed,
            angle_deg,
            azimuth_deg: 0.0,
            height: 0.0,
        }
    }

    pub fn with_height(self, height: f64) -> Self {
        Self { height, ..self }
    }

    pub fn with_azimuth(self, azimuth_deg: f64) -> Self {
        Self { azimuth_deg, ..self }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::new(0.0, self.height, 0.0)
    }

    pub fn velocity(&self) -> Vec3 {
        let elevation = self.angle_deg.to_radians();
        let azimuth = self.azimuth_deg.to_radians();
        let horizontal = self.speed * elevation.cos();
        Vec3::new(
            horizontal * azimuth.cos(),
            self.speed * elevation.sin(),
            horizontal * azimuth.sin(),
        )
    }
}

impl SimulationParams {
    /// Full solver input for a shot fired in `environment` with `projectile`.
    pub fn from_launch(
        launch: &LaunchParams,
        environment: &EnvironmentPreset,
        projectile: &ProjectileProperties,
        time_step: f64,
        max_time: f64,
    ) -> Self {
        Self {
            gravity: Vec3::new(0.0, -environment.gravity, 0.0),
            wind: environment.wind,
            drag_coefficient: projectile.drag_coefficient,
            air_density: environment.air_density,
            projectile_area: projectile.area,
            projectile_mass: projectile.mass,
            initial_position: launch.position(),
            initial_velocity: launch.velocity(),
            time_step,
            max_time,
        }
    }
}

// =============================================================================
// Presets
// =============================================================================

/// Named speed / angle / gravity combination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaunchPreset {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub speed: f64,
    pub angle_deg: f64,
    /// Gravity magnitude (m/s²)
    pub gravity: f64,
}

impl LaunchPreset {
    pub fn launch(&self) -> LaunchParams {
        LaunchParams::new(self.speed, self.angle_deg)
    }
}

pub const LAUNCH_PRESETS: [LaunchPreset; 6] = [
    LaunchPreset {
        id: "gentle-lob",
        name: "Gentle Lob",
        description: "Soft, high arc for close targets",
        speed: 15.0,
        angle_deg: 60.0,
        gravity: 9.81,
    },
    LaunchPreset {
        id: "perfect-arc",
        name: "Perfect Arc",
        description: "Balanced 45 degree trajectory",
        speed: 25.0,
        angle_deg: 45.0,
        gravity: 9.81,
    },
    LaunchPreset {
        id: "laser-shot",
        name: "Laser Shot",
        description: "Fast and flat, minimal drop",
        speed: 50.0,
        angle_deg: 15.0,
        gravity: 9.81,
    },
    LaunchPreset {
        id: "moon-gravity",
        name: "Moon Gravity",
        description: "Low gravity for extreme range",
        speed: 25.0,
        angle_deg: 45.0,
        gravity: 1.62,
    },
    LaunchPreset {
        id: "jupiter-heavy",
        name: "Jupiter Heavy",
        description: "High gravity, shots drop fast",
        speed: 35.0,
        angle_deg: 55.0,
        gravity: 24.79,
    },
    LaunchPreset {
        id: "zero-g",
        name: "Zero Gravity",
        description: "Nearly weightless, almost straight lines",
        speed: 20.0,
        angle_deg: 30.0,
        gravity: 0.1,
    },
];

/// Matches further than this (normalized units) are not reported.
const PRESET_MATCH_THRESHOLD: f64 = 0.3;

pub fn launch_preset(id: &str) -> Option<&'static LaunchPreset> {
    LAUNCH_PRESETS.iter().find(|p| p.id == id)
}

/// Preset nearest to the given settings, if any is reasonably close.
///
/// Distance is Euclidean after scaling speed by 50 m/s, angle by 90° and
/// gravity by 30 m/s².
pub fn find_closest_preset(speed: f64, angle_deg: f64, gravity: f64) -> Option<&'static LaunchPreset> {
    let distance = |p: &LaunchPreset| {
        let ds = (p.speed - speed) / 50.0;
        let da = (p.angle_deg - angle_deg) / 90.0;
        let dg = (p.gravity - gravity) / 30.0;
        (ds * ds + da * da + dg * dg).sqrt()
    };

    LAUNCH_PRESETS
        .iter()
        .map(|p| (p, distance(p)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .filter(|(_, d)| *d < PRESET_MATCH_THRESHOLD)
        .map(|(p, _)| p)
}

/// Starting preset for a target at `target_distance` metres.
pub fn recommended_preset(target_distance: f64) -> &'static LaunchPreset {
    let index = if target_distance < 30.0 {
        0
    } else if target_distance < 60.0 {
        1
    } else {
        2
    };
    &LAUNCH_PRESETS[index]
}

/// Vacuum launch speed for a 45° shot from `launch_height` to `target`.
///
/// Solves `Δh = d·tanθ − g·d² / (2·v²·cos²θ)` for `v`, with `d` the
/// horizontal distance to the target. Rounded to 0.1 m/s. `None` when no
/// 45° shot reaches the target.
pub fn suggest_launch_speed(target: &Vec3, launch_height: f64, gravity: f64) -> Option<f64> {
    let distance = target.horizontal_magnitude();
    let height_diff = target.y - launch_height;
    let angle = std::f64::consts::FRAC_PI_4;

    let denominator = 2.0 * angle.cos().powi(2) * (distance * angle.tan() - height_diff);
    if denominator <= 0.0 {
        return None;
    }
    let speed_sq = gravity * distance * distance / denominator;
    if speed_sq <= 0.0 || !speed_sq.is_finite() {
        return None;
    }
    Some((speed_sq.sqrt() * 10.0).round() / 10.0)
}

/// Closed-form vacuum flight over flat ground.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightStats {
    pub max_height: f64,
    pub range: f64,
    pub flight_time: f64,
}

/// Vacuum flight numbers for `launch` fired from ground level.
///
/// `T = 2v·sinθ / g`, `R = v²·sin2θ / g`, `H = v²·sin²θ / 2g`. The release
/// height and azimuth are ignored.
pub fn theoretical_values(launch: &LaunchParams, gravity: f64) -> FlightStats {
    let theta = launch.angle_deg.to_radians();
    let v = launch.speed;
    FlightStats {
        max_height: (v * theta.sin()).powi(2) / (2.0 * gravity),
        range: v * v * (2.0 * theta).sin() / gravity,
        flight_time: 2.0 * v * theta.sin() / gravity,
    }
}

// =============================================================================
// Tests
// =============================================================================
