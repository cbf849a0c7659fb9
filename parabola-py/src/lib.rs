//! Python bindings for the parabola-core projectile engine.
//!
//! Provides a simple Python API:
//!
//! ```python
//! from parabola_physics import Shot, Vec3, check_ring_hit
//!
//! shot = Shot(20.0, 45.0, height=1.5)
//! print(f"Landed at {shot.impact()} after {shot.flight_time():.2f}s")
//!
//! for t, x, y, z in shot.samples():
//!     ...
//!
//! hit, zone, points = check_ring_hit(prev, curr, Vec3(30.0, 0.0, 0.0))
//! ```

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use parabola_core::collision;
use parabola_core::launch::{self, LaunchParams};
use parabola_core::solver::solve;
use parabola_core::targets::{HitResult, HoopTarget, RingTarget};
use parabola_core::types::{SimulationParams, SimulationResult, Vec3 as CoreVec3};

/// 3D vector for positions, velocities, etc.
#[pyclass]
#[derive(Clone, Copy)]
pub struct Vec3 {
    #[pyo3(get, set)]
    pub x: f64,
    #[pyo3(get, set)]
    pub y: f64,
    #[pyo3(get, set)]
    pub z: f64,
}

#[pymethods]
impl Vec3 {
    #[new]
    fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    fn __repr__(&self) -> String {
        format!("Vec3({:.4}, {:.4}, {:.4})", self.x, self.y, self.z)
    }

    fn magnitude(&self) -> f64 {
        CoreVec3::from(*self).magnitude()
    }

    fn to_tuple(&self) -> (f64, f64, f64) {
        (self.x, self.y, self.z)
    }
}

impl From<CoreVec3> for Vec3 {
    fn from(v: CoreVec3) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

impl From<Vec3> for CoreVec3 {
    fn from(v: Vec3) -> Self {
        CoreVec3::new(v.x, v.y, v.z)
    }
}

/// One solved shot.
///
/// The trajectory is computed on construction; invalid parameters raise
/// `ValueError`.
#[pyclass]
pub struct Shot {
    params: SimulationParams,
    result: SimulationResult,
}

#[pymethods]
impl Shot {
    #[new]
    #[pyo3(signature = (
        speed,
        angle_deg,
        azimuth_deg = 0.0,
        height = 0.0,
        gravity = 9.81,
        wind = None,
        drag_coefficient = 0.47,
        air_density = 1.225,
        area = 0.01,
        mass = 1.0,
        time_step = 0.01,
        max_time = 100.0
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        speed: f64,
        angle_deg: f64,
        azimuth_deg: f64,
        height: f64,
        gravity: f64,
        wind: Option<Vec3>,
        drag_coefficient: f64,
        air_density: f64,
        area: f64,
        mass: f64,
        time_step: f64,
        max_time: f64,
    ) -> PyResult<Self> {
        let launch = LaunchParams {
            speed,
            angle_deg,
            azimuth_deg,
            height,
        };
        let params = SimulationParams {
            gravity: CoreVec3::new(0.0, -gravity, 0.0),
            wind: wind.map(CoreVec3::from).unwrap_or(CoreVec3::ZERO),
            drag_coefficient,
            air_density,
            projectile_area: area,
            projectile_mass: mass,
            initial_position: launch.position(),
            initial_velocity: launch.velocity(),
            time_step,
            max_time,
        };
        let result = solve(&params).map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(Self { params, result })
    }

    /// Trajectory as a list of (t, x, y, z).
    fn samples(&self) -> Vec<(f64, f64, f64, f64)> {
        self.result
            .trajectory
            .iter()
            .map(|s| (s.time, s.position.x, s.position.y, s.position.z))
            .collect()
    }

    fn sample_count(&self) -> usize {
        self.result.trajectory.len()
    }

    /// Position at time `t`, interpolated between samples.
    fn position_at(&self, t: f64) -> Option<Vec3> {
        self.result.sample_at(t).map(|s| s.position.into())
    }

    /// Did the projectile reach the ground within `max_time`?
    fn landed(&self) -> bool {
        self.result.landed()
    }

    /// Ground impact position, or None.
    fn impact(&self) -> Option<Vec3> {
        self.result.impact.map(|i| i.position.into())
    }

    /// Impact angle in degrees below horizontal, or None.
    fn impact_angle(&self) -> Option<f64> {
        self.result.impact.map(|i| i.angle)
    }

    fn apex(&self) -> Vec3 {
        self.result.apex.position.into()
    }

    fn max_height(&self) -> f64 {
        self.result.apex.position.y
    }

    fn flight_time(&self) -> f64 {
        self.result.flight_time()
    }

    /// Horizontal distance from launch to the final sample.
    fn range(&self) -> f64 {
        self.result
            .last_sample()
            .map(|s| (s.position - self.params.initial_position).horizontal_magnitude())
            .unwrap_or(0.0)
    }

    /// Summary as dict for easy inspection.
    fn state_dict<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let dict = PyDict::new(py);
        dict.set_item("samples", self.result.trajectory.len())?;
        dict.set_item("landed", self.result.landed())?;
        dict.set_item("flight_time", self.flight_time())?;
        dict.set_item("max_height", self.max_height())?;
        dict.set_item("range", self.range())?;
        if let Some(impact) = &self.result.impact {
            dict.set_item("impact_x", impact.position.x)?;
            dict.set_item("impact_z", impact.position.z)?;
            dict.set_item("impact_speed", impact.velocity.magnitude())?;
            dict.set_item("impact_angle", impact.angle)?;
        }
        Ok(dict)
    }
}

fn hit_tuple(result: HitResult) -> (bool, String, u32) {
    (result.hit, result.zone, result.points)
}

/// Does the segment p1 -> p2 pass through the sphere?
#[pyfunction]
fn segment_hits_sphere(p1: Vec3, p2: Vec3, center: Vec3, radius: f64) -> bool {
    collision::segment_hits_sphere(&p1.into(), &p2.into(), &center.into(), radius)
}

/// Score one step against a standard 1/2/3 m ring target.
///
/// Returns (hit, zone, points).
#[pyfunction]
fn check_ring_hit(prev: Vec3, curr: Vec3, center: Vec3) -> (bool, String, u32) {
    let target = RingTarget::new("ring", center.into());
    hit_tuple(target.check(&prev.into(), &curr.into()))
}

/// Score one step against a regulation hoop standing at `position`.
///
/// Returns (hit, zone, points).
#[pyfunction]
fn check_hoop_score(prev: Vec3, curr: Vec3, position: Vec3) -> (bool, String, u32) {
    let target = HoopTarget::new("hoop", position.into());
    hit_tuple(target.check(&prev.into(), &curr.into()))
}

/// 45 degree launch speed that reaches `target`, or None.
#[pyfunction]
#[pyo3(signature = (target, launch_height = 0.0, gravity = 9.81))]
fn suggest_launch_speed(target: Vec3, launch_height: f64, gravity: f64) -> Option<f64> {
    launch::suggest_launch_speed(&target.into(), launch_height, gravity)
}

/// Python module definition.
#[pymodule]
fn parabola_physics(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<Vec3>()?;
    m.add_class::<Shot>()?;
    m.add_function(wrap_pyfunction!(segment_hits_sphere, m)?)?;
    m.add_function(wrap_pyfunction!(check_ring_hit, m)?)?;
    m.add_function(wrap_pyfunction!(check_hoop_score, m)?)?;
    m.add_function(wrap_pyfunction!(suggest_launch_speed, m)?)?;
    Ok(())
}
