//! Forces acting on the projectile.
//!
//! This module implements the `ForceModel` trait for a point-mass projectile:
//!
//! - **Gravity**: constant acceleration vector (any direction, any planet)
//! - **Drag**: quadratic air resistance opposing the velocity *relative to
//!   the wind*
//!
//! ```text
//!   wind ──────→
//!        ●  v_projectile
//!         \
//!          v_rel = v_projectile - wind
//!   F_drag = -0.5 * ρ * A * Cd * |v_rel| * v_rel
//! ```

use crate::integrator::ForceModel;
use crate::types::{constants, ProjectileState, SimulationParams, Vec3};

/// Gravity plus quadratic drag against a uniform wind field.
#[derive(Debug, Clone, PartialEq)]
pub struct AerodynamicForces {
    /// Gravity vector (default: -9.81 in Y)
    pub gravity: Vec3,

    /// Ambient air velocity (m/s)
    pub wind: Vec3,

    /// Precomputed `0.5 * ρ * A * Cd`
    pub drag_factor: f64,

    /// Projectile mass (kg)
    pub mass: f64,
}

impl AerodynamicForces {
    /// Build the force model for a shot.
    pub fn from_params(params: &SimulationParams) -> Self {
        Self {
            gravity: params.gravity,
            wind: params.wind,
            drag_factor: params.drag_factor(),
            mass: params.projectile_mass,
        }
    }

    /// Gravity only, no air.
    pub fn gravity_only(gravity: Vec3) -> Self {
        Self {
            gravity,
            wind: Vec3::ZERO,
            drag_factor: 0.0,
            mass: 1.0,
        }
    }

    /// Drag acceleration: `-(k * |v_rel| * v_rel) / m`.
    ///
    /// Skipped below `DRAG_SPEED_EPSILON` relative air speed.
    pub fn drag_acceleration(&self, state: &ProjectileState) -> Vec3 {
        if self.drag_factor == 0.0 {
            return Vec3::ZERO;
        }

        let rel_vel = state.vel - self.wind;
        let speed = rel_vel.magnitude();
        if speed < constants::DRAG_SPEED_EPSILON {
            return Vec3::ZERO;
        }

        rel_vel * (-self.drag_factor * speed / self.mass)
    }
}

impl ForceModel for AerodynamicForces {
    fn linear_acceleration(&self, state: &ProjectileState) -> Vec3 {
        self.gravity + self.drag_acceleration(state)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrator::SemiImplicitEuler;

    fn drag_only() -> AerodynamicForces {
        AerodynamicForces {
            gravity: Vec3::ZERO,
            wind: Vec3::ZERO,
            drag_factor: 0.5 * 1.225 * 0.01 * 0.47,
            mass: 0.1,
        }
    }

    #[test]
    fn test_gravity_only() {
        let forces = AerodynamicForces::gravity_only(Vec3::new(0.0, -constants::GRAVITY, 0.0));
        let state = ProjectileState::new(Vec3::ZERO, Vec3::new(30.0, 10.0, 0.0));

        let acc = forces.linear_acceleration(&state);

        assert!((acc.x).abs() < constants::EPSILON);
        assert!((acc.y + constants::GRAVITY).abs() < constants::EPSILON);
        assert!((acc.z).abs() < constants::EPSILON);
    }

    #[test]
    fn test_drag_opposes_motion() {
        let forces = drag_only();
        let state = ProjectileState::new(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0));

        let acc = forces.linear_acceleration(&state);

        assert!(acc.x < 0.0, "Drag should oppose motion, got ax={}", acc.x);
        assert!(acc.y.abs() < constants::EPSILON);
        assert!(acc.z.abs() < constants::EPSILON);
    }

    #[test]
    fn test_drag_is_quadratic_in_speed() {
        let forces = drag_only();

        let slow = ProjectileState::new(Vec3::ZERO, Vec3::new(5.0, 0.0, 0.0));
        let fast = ProjectileState::new(Vec3::ZERO, Vec3::new(20.0, 0.0, 0.0));

        let acc_slow = forces.linear_acceleration(&slow);
        let acc_fast = forces.linear_acceleration(&fast);

        // 4x speed -> 16x drag
        let ratio = acc_fast.x / acc_slow.x;
        assert!((ratio - 16.0).abs() < 1e-9, "Expected ratio 16, got {}", ratio);
    }

    #[test]
    fn test_drag_uses_relative_velocity() {
        let forces = AerodynamicForces {
            wind: Vec3::new(10.0, 0.0, 0.0),
            ..drag_only()
        };

        // Moving with the wind: no relative air speed, no drag
        let riding = ProjectileState::new(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(forces.drag_acceleration(&riding), Vec3::ZERO);

        // At rest in a tailwind: pushed along the wind
        let resting = ProjectileState::at_rest(Vec3::ZERO);
        let acc = forces.drag_acceleration(&resting);
        assert!(acc.x > 0.0, "Wind should push projectile, got ax={}", acc.x);
    }

    #[test]
    fn test_drag_magnitude() {
        let forces = drag_only();
        let state = ProjectileState::new(Vec3::ZERO, Vec3::new(0.0, -10.0, 0.0));

        let acc = forces.drag_acceleration(&state);

        // k * v^2 / m, directed up
        let expected = forces.drag_factor * 100.0 / forces.mass;
        assert!((acc.y - expected).abs() < 1e-12);
    }

    #[test]
    fn test_drag_shortens_range() {
        let params = SimulationParams {
            initial_velocity: Vec3::new(20.0, 20.0, 0.0),
            drag_coefficient: 0.47,
            projectile_area: 0.05,
            projectile_mass: 0.5,
            ..SimulationParams::default()
        };
        let with_drag = AerodynamicForces::from_params(&params);
        let vacuum = AerodynamicForces::gravity_only(params.gravity);

        let start = ProjectileState::new(params.initial_position, params.initial_velocity);
        let a = SemiImplicitEuler::step_n(&start, &with_drag, 0.01, 200).state;
        let b = SemiImplicitEuler::step_n(&start, &vacuum, 0.01, 200).state;

        assert!(
            a.pos.x < b.pos.x,
            "Drag should reduce down-range travel: drag={}, vacuum={}",
            a.pos.x,
            b.pos.x
        );
    }
}
