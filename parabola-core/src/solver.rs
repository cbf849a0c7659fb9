//! Trajectory solver.
//!
//! Integrates one shot from launch to ground impact with a fixed timestep and
//! records the state before every step. The ground crossing is localized
//! inside the last step by linear interpolation, so the impact sample always
//! sits exactly on `y = 0`.
//!
//! ```text
//!  y
//!  │        . ' ' .        ← apex (highest recorded sample)
//!  │     .           .
//!  │   .               .
//!  │ .                   ● prev (y > 0)
//! ─┼──────────────────────╳── impact (interpolated)
//!  │                       ○ curr (y <= 0, never recorded)
//! ```

use std::fmt;

use log::{debug, warn};

use crate::forces::AerodynamicForces;
use crate::integrator::SemiImplicitEuler;
use crate::types::{
    constants, ApexEvent, ImpactEvent, ProjectileState, SimulationParams, SimulationResult,
    TrajectorySample, Vec3,
};

/// Error type for rejected or failed simulations.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// A scalar parameter is outside its valid range.
    InvalidParameter { name: &'static str, reason: String },
    /// A parameter contains NaN or infinity.
    NonFinite { name: &'static str },
    /// The integration produced a non-finite state.
    Diverged { time: f64 },
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::InvalidParameter { name, reason } => {
                write!(f, "Invalid parameter `{}`: {}", name, reason)
            }
            SimulationError::NonFinite { name } => {
                write!(f, "Parameter `{}` is not finite", name)
            }
            SimulationError::Diverged { time } => {
                write!(f, "Simulation diverged at t={:.4}s", time)
            }
        }
    }
}

impl std::error::Error for SimulationError {}

fn require_finite_vec(name: &'static str, v: &Vec3) -> Result<(), SimulationError> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(SimulationError::NonFinite { name })
    }
}

fn require_positive(name: &'static str, value: f64) -> Result<(), SimulationError> {
    if !value.is_finite() {
        return Err(SimulationError::NonFinite { name });
    }
    if value <= 0.0 {
        return Err(SimulationError::InvalidParameter {
            name,
            reason: format!("must be > 0, got {}", value),
        });
    }
    Ok(())
}

fn require_non_negative(name: &'static str, value: f64) -> Result<(), SimulationError> {
    if !value.is_finite() {
        return Err(SimulationError::NonFinite { name });
    }
    if value < 0.0 {
        return Err(SimulationError::InvalidParameter {
            name,
            reason: format!("must be >= 0, got {}", value),
        });
    }
    Ok(())
}

/// Check every parameter before any sample is produced.
///
/// Returns the number of integration steps the run is allowed to take.
pub fn validate(params: &SimulationParams) -> Result<usize, SimulationError> {
    require_finite_vec("gravity", &params.gravity)?;
    require_finite_vec("wind", &params.wind)?;
    require_finite_vec("initial_position", &params.initial_position)?;
    require_finite_vec("initial_velocity", &params.initial_velocity)?;
    require_non_negative("drag_coefficient", params.drag_coefficient)?;
    require_non_negative("air_density", params.air_density)?;
    require_positive("projectile_area", params.projectile_area)?;
    require_positive("projectile_mass", params.projectile_mass)?;
    require_positive("time_step", params.time_step)?;
    require_positive("max_time", params.max_time)?;

    if params.initial_position.y < 0.0 {
        return Err(SimulationError::InvalidParameter {
            name: "initial_position",
            reason: format!("launch point is below ground (y={})", params.initial_position.y),
        });
    }

    let steps = (params.max_time / params.time_step + 1e-9).floor();
    if steps > constants::MAX_STEPS as f64 {
        return Err(SimulationError::InvalidParameter {
            name: "time_step",
            reason: format!(
                "{} steps needed to cover max_time={}s, limit is {}",
                steps,
                params.max_time,
                constants::MAX_STEPS
            ),
        });
    }

    Ok(steps as usize)
}

/// Impact angle in degrees below horizontal.
pub fn impact_angle_deg(velocity: &Vec3) -> f64 {
    velocity
        .y
        .abs()
        .atan2(velocity.horizontal_magnitude())
        .to_degrees()
}

/// Linear blend of two samples at `fraction` in `[0, 1]`.
///
/// The same formula localizes the ground impact and serves playback scrubbing.
pub fn lerp_sample(a: &TrajectorySample, b: &TrajectorySample, fraction: f64) -> TrajectorySample {
    TrajectorySample {
        time: a.time + (b.time - a.time) * fraction,
        position: a.position.lerp(&b.position, fraction),
        velocity: a.velocity.lerp(&b.velocity, fraction),
    }
}

/// Interpolate between two bracketing samples at an absolute time.
///
/// The time is clamped to the bracket.
pub fn interpolate_samples(a: &TrajectorySample, b: &TrajectorySample, time: f64) -> TrajectorySample {
    let span = b.time - a.time;
    if span.abs() < constants::EPSILON {
        return *a;
    }
    let fraction = ((time - a.time) / span).clamp(0.0, 1.0);
    lerp_sample(a, b, fraction)
}

/// Impact sample inside the step `before → after`, which ends below ground.
///
/// Position is interpolated to `y = 0`; velocity is the post-step velocity.
/// The time stays strictly after `before.time` even when the crossing is so
/// close to it that the interpolated time rounds back.
fn ground_crossing(before: &TrajectorySample, after: &TrajectorySample) -> TrajectorySample {
    let fraction = (0.0 - before.position.y) / (after.position.y - before.position.y);
    let mut hit = lerp_sample(before, after, fraction);
    hit.position.y = 0.0;
    hit.velocity = after.velocity;
    if hit.time <= before.time {
        hit.time = next_time_after(before.time);
    }
    hit
}

/// Smallest representable time greater than a non-negative `time`.
fn next_time_after(time: f64) -> f64 {
    f64::from_bits(time.to_bits() + 1)
}

/// Integrate a shot from its launch parameters.
///
/// Samples are spaced exactly `time_step` apart, except the final impact
/// sample which lands somewhere inside the last step. The run never covers
/// more than `max_time`; when the projectile is still airborne by then the
/// result carries no impact event.
pub fn solve(params: &SimulationParams) -> Result<SimulationResult, SimulationError> {
    let max_steps = validate(params)?;
    let dt = params.time_step;
    let forces = AerodynamicForces::from_params(params);

    let mut state = ProjectileState::new(params.initial_position, params.initial_velocity);
    let mut trajectory: Vec<TrajectorySample> = Vec::with_capacity((max_steps + 2).min(4096));
    let mut apex = ApexEvent {
        time: 0.0,
        position: state.pos,
    };
    let mut impact = None;

    for step in 0..=max_steps {
        let time = step as f64 * dt;
        let sample = TrajectorySample::new(time, state.pos, state.vel);
        trajectory.push(sample);

        if sample.position.y > apex.position.y {
            apex = ApexEvent {
                time,
                position: sample.position,
            };
        }

        if step == max_steps {
            break;
        }

        let next = SemiImplicitEuler::step(&state, &forces, dt).state;
        if !next.pos.is_finite() || !next.vel.is_finite() {
            return Err(SimulationError::Diverged { time: time + dt });
        }

        if next.pos.y <= 0.0 {
            let event = if state.pos.y > 0.0 {
                let after = TrajectorySample::new(time + dt, next.pos, next.vel);
                let hit = ground_crossing(&sample, &after);
                trajectory.push(hit);
                hit
            } else {
                // Launched from the ground without climbing.
                sample
            };

            impact = Some(ImpactEvent {
                time: event.time,
                position: event.position,
                velocity: event.velocity,
                angle: impact_angle_deg(&event.velocity),
            });
            break;
        }

        state = next;
    }

    match &impact {
        Some(hit) => debug!(
            "shot solved: {} samples, impact at t={:.3}s x={:.3} z={:.3}",
            trajectory.len(),
            hit.time,
            hit.position.x,
            hit.position.z
        ),
        None => warn!(
            "projectile still airborne after {:.3}s ({} samples)",
            params.max_time,
            trajectory.len()
        ),
    }

    Ok(SimulationResult {
        trajectory,
        apex,
        impact,
    })
}

// =============================================================================
// Result helpers
// =============================================================================

impl SimulationResult {
    /// Final recorded sample: the impact when one exists.
    pub fn last_sample(&self) -> Option<&TrajectorySample> {
        self.trajectory.last()
    }

    /// Whether the projectile reached the ground within `max_time`.
    pub fn landed(&self) -> bool {
        self.impact.is_some()
    }

    /// Time of the final sample.
    pub fn flight_time(&self) -> f64 {
        self.last_sample().map(|s| s.time).unwrap_or(0.0)
    }

    /// State at an arbitrary time, interpolated between the two bracketing
    /// samples. Times outside the recording clamp to its ends.
    pub fn sample_at(&self, time: f64) -> Option<TrajectorySample> {
        let first = self.trajectory.first()?;
        let last = self.trajectory.last()?;
        if time <= first.time {
            return Some(*first);
        }
        if time >= last.time {
            return Some(*last);
        }

        let upper = self.trajectory.partition_point(|s| s.time <= time);
        let a = &self.trajectory[upper - 1];
        let b = &self.trajectory[upper];
        Some(interpolate_samples(a, b, time))
    }

    /// Apex refined by fitting a parabola through the recorded apex sample and
    /// its two neighbours.
    ///
    /// Falls back to the recorded apex at the ends of the trajectory or when
    /// the three heights are not concave.
    pub fn refined_apex(&self) -> ApexEvent {
        let Some(idx) = self
            .trajectory
            .iter()
            .position(|s| s.time == self.apex.time)
        else {
            return self.apex;
        };
        if idx == 0 || idx + 1 >= self.trajectory.len() {
            return self.apex;
        }

        let (s0, s1, s2) = (
            &self.trajectory[idx - 1],
            &self.trajectory[idx],
            &self.trajectory[idx + 1],
        );
        let (t0, t1, t2) = (s0.time, s1.time, s2.time);
        let (y0, y1, y2) = (s0.position.y, s1.position.y, s2.position.y);

        let denom = (t0 - t1) * (t0 - t2) * (t1 - t2);
        if denom.abs() < constants::EPSILON {
            return self.apex;
        }
        let a = (t2 * (y1 - y0) + t1 * (y0 - y2) + t0 * (y2 - y1)) / denom;
        let b = (t2 * t2 * (y0 - y1) + t1 * t1 * (y2 - y0) + t0 * t0 * (y1 - y2)) / denom;
        let c = (t1 * t2 * (t1 - t2) * y0 + t2 * t0 * (t2 - t0) * y1 + t0 * t1 * (t0 - t1) * y2)
            / denom;
        if a >= 0.0 {
            return self.apex;
        }

        let t_vertex = (-b / (2.0 * a)).clamp(t0, t2);
        let y_vertex = a * t_vertex * t_vertex + b * t_vertex + c;
        match self.sample_at(t_vertex) {
            Some(s) => ApexEvent {
                time: t_vertex,
                position: Vec3::new(s.position.x, y_vertex.max(y1), s.position.z),
            },
            None => self.apex,
        }
    }
}

// =============================================================================
// Playback
// =============================================================================

/// Cursor a presentation layer advances through recorded samples, `stride`
/// samples per displayed frame.
#[derive(Debug, Clone)]
pub struct PlaybackCursor {
    index: usize,
    stride: usize,
    finished: bool,
}

impl PlaybackCursor {
    pub fn new(stride: usize) -> Self {
        Self {
            index: 0,
            stride: stride.max(1),
            finished: false,
        }
    }

    /// Cursor stride from a fractional speed multiplier (at least one sample).
    pub fn with_speed(multiplier: f64) -> Self {
        Self::new(multiplier.floor().max(1.0) as usize)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Move forward one frame and return the sample to display.
    ///
    /// Clamps to the last sample and marks the cursor finished once it is
    /// reached.
    pub fn advance<'a>(&mut self, trajectory: &'a [TrajectorySample]) -> Option<&'a TrajectorySample> {
        let last = trajectory.len().checked_sub(1)?;
        if !self.finished {
            self.index = (self.index + self.stride).min(last);
            self.finished = self.index == last;
        }
        trajectory.get(self.index)
    }

    pub fn reset(&mut self) {
        self.index = 0;
        self.finished = false;
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::launch::{theoretical_values, LaunchParams};
    use approx::assert_relative_eq;

    fn launch(speed: f64, angle_deg: f64) -> SimulationParams {
        let angle = angle_deg.to_radians();
        SimulationParams {
            initial_velocity: Vec3::new(speed * angle.cos(), speed * angle.sin(), 0.0),
            time_step: 0.01,
            ..SimulationParams::vacuum(Vec3::ZERO, Vec3::ZERO)
        }
    }

    #[test]
    fn test_reference_shot_matches_analytic() {
        let result = solve(&launch(10.0, 45.0)).unwrap();
        let impact = result.impact.expect("shot should land");
        let expected = theoretical_values(&LaunchParams::new(10.0, 45.0), constants::GRAVITY);

        assert!(
            (impact.position.x - expected.range).abs() < 0.1,
            "range {}",
            impact.position.x
        );
        assert!(
            (result.apex.position.y - expected.max_height).abs() < 0.1,
            "apex {}",
            result.apex.position.y
        );
        assert!(
            (impact.time - expected.flight_time).abs() < 0.1,
            "flight time {}",
            impact.time
        );
    }

    #[test]
    fn test_no_drag_analytic_grid() {
        let g = constants::GRAVITY;
        for &(speed, angle) in &[(15.0, 30.0), (25.0, 60.0), (40.0, 20.0)] {
            let mut params = launch(speed, angle);
            params.time_step = 0.001;
            let result = solve(&params).unwrap();
            let impact = result.impact.unwrap();

            let expected = theoretical_values(&LaunchParams::new(speed, angle), g);
            let (range, height) = (expected.range, expected.max_height);

            // Semi-implicit Euler error is O(dt)
            let tol = speed * speed / g * 0.01;
            assert!(
                (impact.position.x - range).abs() < tol,
                "v={} θ={}: range {} vs {}",
                speed,
                angle,
                impact.position.x,
                range
            );
            assert!(
                (result.apex.position.y - height).abs() < tol,
                "v={} θ={}: apex {} vs {}",
                speed,
                angle,
                result.apex.position.y,
                height
            );
        }
    }

    #[test]
    fn test_first_sample_is_initial_condition() {
        let mut params = launch(12.0, 50.0);
        params.initial_position = Vec3::new(1.0, 2.0, -0.5);
        let result = solve(&params).unwrap();

        let first = result.trajectory[0];
        assert_eq!(first.time, 0.0);
        assert_eq!(first.position, params.initial_position);
        assert_eq!(first.velocity, params.initial_velocity);
    }

    #[test]
    fn test_samples_strictly_increasing_and_evenly_spaced() {
        let params = SimulationParams {
            drag_coefficient: 0.47,
            air_density: 1.225,
            projectile_area: 0.03,
            projectile_mass: 0.6,
            wind: Vec3::new(-3.0, 0.0, 2.0),
            ..launch(20.0, 35.0)
        };
        let result = solve(&params).unwrap();
        let samples = &result.trajectory;

        for pair in samples.windows(2) {
            assert!(pair[0].time < pair[1].time);
        }
        // Every gap but the last is exactly one time step
        for pair in samples[..samples.len() - 1].windows(2) {
            assert_relative_eq!(pair[1].time - pair[0].time, params.time_step, epsilon = 1e-9);
        }
        let n = samples.len();
        assert!(samples[n - 1].time - samples[n - 2].time <= params.time_step + 1e-12);
    }

    #[test]
    fn test_impact_lies_on_ground() {
        for &(speed, angle) in &[(5.0, 10.0), (30.0, 75.0), (8.0, 45.0)] {
            let result = solve(&launch(speed, angle)).unwrap();
            let impact = result.impact.unwrap();
            assert_eq!(impact.position.y, 0.0);
            assert_eq!(result.last_sample().unwrap().position.y, 0.0);
            // No sample below ground
            assert!(result.trajectory.iter().all(|s| s.position.y >= 0.0));
        }
    }

    #[test]
    fn test_impact_angle() {
        assert_relative_eq!(impact_angle_deg(&Vec3::new(1.0, -1.0, 0.0)), 45.0, epsilon = 1e-9);
        assert_relative_eq!(impact_angle_deg(&Vec3::new(0.0, -3.0, 0.0)), 90.0, epsilon = 1e-9);
        assert_relative_eq!(impact_angle_deg(&Vec3::new(3.0, 0.0, 4.0)), 0.0, epsilon = 1e-9);

        let result = solve(&launch(10.0, 45.0)).unwrap();
        let angle = result.impact.unwrap().angle;
        assert!(angle > 40.0 && angle < 50.0, "impact angle {}", angle);
    }

    #[test]
    fn test_not_landed_within_max_time() {
        let mut params = launch(50.0, 80.0);
        params.max_time = 1.0;
        let result = solve(&params).unwrap();

        assert!(result.impact.is_none());
        assert!(!result.landed());
        let last = result.last_sample().unwrap();
        assert!(last.time <= params.max_time + 1e-9);
        assert!(last.position.y > 0.0);
        assert_eq!(result.trajectory.len(), 101);
    }

    #[test]
    fn test_rejects_invalid_parameters() {
        let bad_dt = SimulationParams {
            time_step: 0.0,
            ..launch(10.0, 45.0)
        };
        assert!(matches!(
            solve(&bad_dt),
            Err(SimulationError::InvalidParameter { name: "time_step", .. })
        ));

        let bad_mass = SimulationParams {
            projectile_mass: -1.0,
            ..launch(10.0, 45.0)
        };
        assert!(matches!(
            solve(&bad_mass),
            Err(SimulationError::InvalidParameter { name: "projectile_mass", .. })
        ));

        let nan_velocity = SimulationParams {
            initial_velocity: Vec3::new(f64::NAN, 1.0, 0.0),
            ..launch(10.0, 45.0)
        };
        assert_eq!(
            solve(&nan_velocity),
            Err(SimulationError::NonFinite { name: "initial_velocity" })
        );

        let inf_time = SimulationParams {
            max_time: f64::INFINITY,
            ..launch(10.0, 45.0)
        };
        assert_eq!(
            solve(&inf_time),
            Err(SimulationError::NonFinite { name: "max_time" })
        );

        let underground = SimulationParams {
            initial_position: Vec3::new(0.0, -1.0, 0.0),
            ..launch(10.0, 45.0)
        };
        assert!(solve(&underground).is_err());

        let too_fine = SimulationParams {
            time_step: 1e-9,
            max_time: 100.0,
            ..launch(10.0, 45.0)
        };
        assert!(solve(&too_fine).is_err());
    }

    #[test]
    fn test_diverging_state_is_an_error() {
        // Absurd drag on a feather-light body overflows within a few steps
        let params = SimulationParams {
            gravity: Vec3::ZERO,
            drag_coefficient: 1e6,
            air_density: 1.0,
            projectile_area: 1.0,
            projectile_mass: 1e-3,
            ..SimulationParams::vacuum(Vec3::new(0.0, 100.0, 0.0), Vec3::new(100.0, 0.0, 0.0))
        };
        match solve(&params) {
            Err(SimulationError::Diverged { time }) => {
                assert!(time > 0.0 && time < 1.0, "diverged at {}", time)
            }
            other => panic!("Expected Diverged, got {:?}", other),
        }
    }

    #[test]
    fn test_crossing_just_after_sample_keeps_time_order() {
        let before = TrajectorySample::new(1.0, Vec3::new(3.0, 1e-20, 0.0), Vec3::new(5.0, -2.0, 0.0));
        let after = TrajectorySample::new(1.01, Vec3::new(3.05, -0.02, 0.0), Vec3::new(5.0, -2.1, 0.0));

        let hit = ground_crossing(&before, &after);
        assert!(hit.time > before.time, "impact time {} not after {}", hit.time, before.time);
        assert!(hit.time < after.time);
        assert_eq!(hit.position.y, 0.0);
        assert_eq!(hit.velocity, after.velocity);

        let regular = ground_crossing(
            &TrajectorySample::new(1.0, Vec3::new(0.0, 0.01, 0.0), Vec3::ZERO),
            &TrajectorySample::new(1.01, Vec3::new(0.0, -0.01, 0.0), Vec3::ZERO),
        );
        assert!((regular.time - 1.005).abs() < 1e-12);
    }

    #[test]
    fn test_ground_launch_without_lift() {
        let params = SimulationParams::vacuum(Vec3::ZERO, Vec3::new(5.0, 0.0, 0.0));
        let result = solve(&params).unwrap();

        let impact = result.impact.unwrap();
        assert_eq!(impact.time, 0.0);
        assert_eq!(result.trajectory.len(), 1);
    }

    #[test]
    fn test_wind_drifts_projectile() {
        let calm = SimulationParams {
            drag_coefficient: 0.47,
            air_density: 1.225,
            projectile_area: 0.05,
            projectile_mass: 0.5,
            ..launch(20.0, 45.0)
        };
        let crosswind = SimulationParams {
            wind: Vec3::new(0.0, 0.0, 8.0),
            ..calm.clone()
        };

        let a = solve(&calm).unwrap().impact.unwrap();
        let b = solve(&crosswind).unwrap().impact.unwrap();

        assert!(a.position.z.abs() < 1e-9);
        assert!(b.position.z > 0.1, "crosswind drift {}", b.position.z);
    }

    #[test]
    fn test_sample_at_interpolates() {
        let result = solve(&launch(10.0, 45.0)).unwrap();
        let a = result.trajectory[10];
        let b = result.trajectory[11];

        let mid = result.sample_at((a.time + b.time) / 2.0).unwrap();
        assert_relative_eq!(mid.position.x, (a.position.x + b.position.x) / 2.0, epsilon = 1e-12);
        assert_relative_eq!(mid.position.y, (a.position.y + b.position.y) / 2.0, epsilon = 1e-12);

        let exact = result.sample_at(a.time).unwrap();
        assert_eq!(exact.position, a.position);

        let past_end = result.sample_at(1e6).unwrap();
        assert_eq!(past_end.position.y, 0.0);
    }

    #[test]
    fn test_refined_apex_is_not_lower() {
        let mut params = launch(10.0, 45.0);
        params.time_step = 0.05;
        let result = solve(&params).unwrap();

        let refined = result.refined_apex();
        let analytic = 100.0 * 0.5 / (2.0 * constants::GRAVITY);

        assert!(refined.position.y >= result.apex.position.y);
        assert!(
            refined.position.y <= analytic + 1e-6,
            "refined {} above analytic {}",
            refined.position.y,
            analytic
        );
    }

    #[test]
    fn test_playback_cursor_stride() {
        let result = solve(&launch(10.0, 45.0)).unwrap();
        let samples = &result.trajectory;

        let mut cursor = PlaybackCursor::with_speed(3.0);
        let first = cursor.advance(samples).unwrap();
        assert_eq!(first.time, samples[3].time);

        let mut frames = 1;
        while !cursor.is_finished() {
            cursor.advance(samples);
            frames += 1;
        }
        assert_eq!(cursor.index(), samples.len() - 1);
        assert_eq!(frames, (samples.len() - 1 + 2) / 3);

        // Stays on the last sample once finished
        let again = cursor.advance(samples).unwrap();
        assert_eq!(again.position.y, 0.0);

        cursor.reset();
        assert_eq!(cursor.index(), 0);
        assert!(PlaybackCursor::new(1).advance(&[]).is_none());
    }
}
