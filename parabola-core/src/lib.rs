//! # Parabola Core
//!
//! Projectile physics for target-shooting games: fire a shot under any
//! gravity, wind and drag, find where it lands, check which targets it hit
//! and score it.
//!
//! ## Architecture
//!
//! - `types`: Core data structures (Vec3, simulation params, samples, events)
//! - `integrator`: Numerical integration (semi-implicit Euler)
//! - `forces`: Physical forces (gravity, quadratic drag against wind)
//! - `solver`: Fixed-step trajectory solver with impact localization
//! - `collision`: Swept segment vs. sphere tests
//! - `targets`: Target shapes, per-shape scoring, trajectory hit scan
//! - `motion`: Moving targets behind a position lookup
//! - `shot`: Shot records and miss feedback
//! - `rules`: Constraint / scoring-rule composition into game modes
//! - `session`: Session statistics, history, rounds and ranks
//! - `launch`: Launch inputs, presets and speed suggestions
//! - `presets`: YAML-based environment, projectile and stage loader
//!
//! ## Example
//!
//! ```ignore
//! use parabola_core::prelude::*;
//!
//! let launch = LaunchParams::new(20.0, 45.0).with_height(1.5);
//! let params = SimulationParams::from_launch(
//!     &launch,
//!     &EnvironmentPreset::default(),
//!     &projectile,
//!     0.01,
//!     30.0,
//! );
//! let result = solve(&params)?;
//! let hits = scan_hits(&result, &stage.targets, &StaticPositions, HitPolicy::First);
//! let shot = ShotRecord::new("shot-1", now_ms, "classic", &stage.id, params, result, hits)
//!     .scored(&GameMode::classic());
//! ```

pub mod collision;
pub mod forces;
pub mod integrator;
pub mod launch;
pub mod motion;
pub mod presets;
pub mod rules;
pub mod session;
pub mod shot;
pub mod solver;
pub mod targets;
pub mod types;

/// Everything needed to fire, scan and score a shot.
pub mod prelude {
    pub use crate::collision::segment_hits_sphere;
    pub use crate::launch::{LaunchParams, LAUNCH_PRESETS};
    pub use crate::motion::{AnimatedTargets, PositionLookup, StaticPositions, TargetMotion};
    pub use crate::presets::{EnvironmentPreset, PresetLoader, ProjectileProperties, Stage};
    pub use crate::rules::{score, GameMode};
    pub use crate::session::{Round, RoundRules, SessionStats, ShotHistory};
    pub use crate::shot::{analyze_shot, ShotFeedback, ShotRecord};
    pub use crate::solver::{solve, PlaybackCursor, SimulationError};
    pub use crate::targets::{check_hit, scan_hits, HitPolicy, HitResult, TargetSpec};
    pub use crate::types::{SimulationParams, SimulationResult, TrajectorySample, Vec3};
}
