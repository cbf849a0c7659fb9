//! Shot records.
//!
//! A [`ShotRecord`] bundles what went into a shot, what the solver produced,
//! a handful of derived flight numbers and the outcome. Field names serialize
//! in camelCase; telemetry and leaderboard consumers read them by name.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::collision::{closest_point_on_segment, distance_to_target};
use crate::rules::{self, GameMode};
use crate::solver::impact_angle_deg;
use crate::targets::HitResult;
use crate::types::{SimulationParams, SimulationResult, Vec3};

/// Distance under which a miss counts as "almost".
pub const NEAR_MISS_DISTANCE: f64 = 0.5;

/// One fired shot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShotRecord {
    pub id: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    pub mode_id: String,
    pub stage_id: String,

    pub params: SimulationParams,
    pub result: SimulationResult,

    pub max_height: f64,
    /// Horizontal distance from the launch point to the final sample.
    pub range: f64,
    pub flight_time: f64,
    pub impact_speed: f64,
    pub impact_angle: f64,

    pub hit: bool,
    pub score: i64,
    /// Targets this shot hit, in the order they were hit.
    #[serde(default)]
    pub hits: Vec<HitResult>,
}

impl ShotRecord {
    /// Build an unscored record, deriving the flight numbers from `result`.
    ///
    /// Without a ground impact the speed and angle are read from the last
    /// recorded sample.
    pub fn new(
        id: impl Into<String>,
        timestamp: u64,
        mode_id: impl Into<String>,
        stage_id: impl Into<String>,
        params: SimulationParams,
        result: SimulationResult,
        hits: Vec<HitResult>,
    ) -> Self {
        let launch = params.initial_position;
        let (range, final_velocity) = match result.last_sample() {
            Some(last) => ((last.position - launch).horizontal_magnitude(), last.velocity),
            None => (0.0, Vec3::ZERO),
        };
        let (impact_speed, impact_angle) = match &result.impact {
            Some(impact) => (impact.velocity.magnitude(), impact.angle),
            None => (final_velocity.magnitude(), impact_angle_deg(&final_velocity)),
        };
        let hits: Vec<HitResult> = hits.into_iter().filter(|h| h.hit).collect();

        Self {
            id: id.into(),
            timestamp,
            mode_id: mode_id.into(),
            stage_id: stage_id.into(),
            max_height: result.apex.position.y,
            range,
            flight_time: result.flight_time(),
            impact_speed,
            impact_angle,
            hit: !hits.is_empty(),
            score: 0,
            hits,
            params,
            result,
        }
    }

    /// Points earned from the targets themselves.
    pub fn target_points(&self) -> u32 {
        self.hits.iter().map(|h| h.points).sum()
    }

    /// Final form of the record, scored under `mode`.
    pub fn scored(mut self, mode: &GameMode) -> Self {
        self.score = rules::score(&self, mode);
        self
    }
}

// =============================================================================
// Feedback
// =============================================================================

/// How a shot compared to the target it was aimed at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShotFeedback {
    DirectHit,
    NearMiss { distance: f64 },
    Short { by: f64 },
    Long { by: f64 },
}

impl fmt::Display for ShotFeedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShotFeedback::DirectHit => write!(f, "Direct hit!"),
            ShotFeedback::NearMiss { .. } => write!(f, "So close! Almost a hit."),
            ShotFeedback::Short { by } => write!(f, "Missed short by {:.1} m", by),
            ShotFeedback::Long { by } => write!(f, "Missed long by {:.1} m", by),
        }
    }
}

/// Compare a shot's range with the horizontal distance to `target`.
pub fn analyze_shot(record: &ShotRecord, target: &Vec3) -> ShotFeedback {
    if record.hit {
        return ShotFeedback::DirectHit;
    }

    let target_distance = (*target - record.params.initial_position).horizontal_magnitude();
    let diff = record.range - target_distance;
    if diff.abs() < NEAR_MISS_DISTANCE {
        ShotFeedback::NearMiss {
            distance: diff.abs(),
        }
    } else if diff < 0.0 {
        ShotFeedback::Short { by: -diff }
    } else {
        ShotFeedback::Long { by: diff }
    }
}

/// How far the shot passed from a spherical target's surface at its closest.
///
/// Zero when the trajectory touches the target; `None` without samples.
pub fn miss_distance(result: &SimulationResult, center: &Vec3, radius: f64) -> Option<f64> {
    let samples = &result.trajectory;
    let first = samples.first()?;
    let single = distance_to_target(&first.position, center, radius);

    let closest = samples
        .windows(2)
        .map(|w| {
            let p = closest_point_on_segment(&w[0].position, &w[1].position, center);
            distance_to_target(&p, center, radius)
        })
        .fold(single, f64::min);
    Some(closest)
}

// =============================================================================
// Tests
// =============================================================================
