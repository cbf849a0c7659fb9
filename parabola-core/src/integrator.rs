//! Numerical integrator for advancing the projectile in time.
//!
//! The solver uses semi-implicit (symplectic) Euler. It is first-order like
//! explicit Euler, but bounded in energy error and fully deterministic, which
//! keeps replays bit-for-bit reproducible.
//!
//! ## Algorithm
//!
//! Given position x, velocity v, and acceleration function a(x, v):
//!
//! ```text
//! 1. a     = a(x, v)
//! 2. v_new = v + a*dt
//! 3. x_new = x + v_new*dt   // uses the updated velocity
//! ```

use crate::types::{ProjectileState, Vec3};

/// Result of an integration step, containing the new state and metadata.
#[derive(Debug, Clone, Copy)]
pub struct IntegrationResult {
    pub state: ProjectileState,
    pub acceleration: Vec3,
}

/// Trait for computing accelerations on the projectile.
///
/// Implementations provide the physics model (gravity, drag, wind, ...).
pub trait ForceModel {
    /// Compute linear acceleration given current state.
    fn linear_acceleration(&self, state: &ProjectileState) -> Vec3;
}

/// Semi-implicit Euler integrator.
pub struct SemiImplicitEuler;

impl SemiImplicitEuler {
    /// Advance the projectile state by one time step.
    ///
    /// # Arguments
    /// * `state` - Current projectile state (position, velocity)
    /// * `forces` - Force model providing accelerations
    /// * `dt` - Time step in seconds
    pub fn step<F: ForceModel>(state: &ProjectileState, forces: &F, dt: f64) -> IntegrationResult {
        let acceleration = forces.linear_acceleration(state);

        let new_vel = state.vel + acceleration * dt;
        let new_pos = state.pos + new_vel * dt;

        IntegrationResult {
            state: ProjectileState {
                pos: new_pos,
                vel: new_vel,
            },
            acceleration,
        }
    }

    /// Advance the projectile state by multiple substeps.
    ///
    /// Total time advanced is `substeps * dt`.
    pub fn step_n<F: ForceModel>(
        state: &ProjectileState,
        forces: &F,
        dt: f64,
        substeps: usize,
    ) -> IntegrationResult {
        let mut current = IntegrationResult {
            state: *state,
            acceleration: Vec3::ZERO,
        };

        for _ in 0..substeps {
            current = Self::step(&current.state, forces, dt);
        }

        current
    }
}

// =============================================================================
// Tests
// =============================================================================
