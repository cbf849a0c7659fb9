//! Target shapes and their scoring strategies.
//!
//! Every target is a variant of [`TargetSpec`] and is scored through one
//! entry point, [`check_hit`], from the segment travelled during a single
//! simulation step. Strategies are pure: same inputs, same [`HitResult`].
//!
//! [`scan_hits`] walks a whole trajectory against a set of targets, resolving
//! animated target positions through a [`PositionLookup`].

pub mod goal;
pub mod hoop;
pub mod range;
pub mod ring;

pub use goal::GoalTarget;
pub use hoop::HoopTarget;
pub use range::{RangeFace, RangeTarget};
pub use ring::{Ring, RingTable, RingTarget};

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::collision::segment_hits_sphere;
use crate::motion::PositionLookup;
use crate::types::{SimulationResult, Vec3};

// =============================================================================
// Hit Result
// =============================================================================

/// Outcome of checking one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HitResult {
    pub target_id: String,
    pub hit: bool,
    pub zone: String,
    pub points: u32,
}

impl HitResult {
    pub fn hit(target_id: &str, zone: impl Into<String>, points: u32) -> Self {
        Self {
            target_id: target_id.to_string(),
            hit: true,
            zone: zone.into(),
            points,
        }
    }

    pub fn miss(target_id: &str) -> Self {
        Self {
            target_id: target_id.to_string(),
            hit: false,
            zone: "miss".to_string(),
            points: 0,
        }
    }
}

// =============================================================================
// Sphere Target
// =============================================================================

/// Plain spherical hit volume worth a fixed number of points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SphereTarget {
    pub id: String,
    pub position: Vec3,
    pub radius: f64,
    pub points: u32,
}

impl SphereTarget {
    pub fn new(id: impl Into<String>, position: Vec3, radius: f64, points: u32) -> Self {
        Self {
            id: id.into(),
            position,
            radius,
            points,
        }
    }

    pub fn check(&self, prev: &Vec3, curr: &Vec3) -> HitResult {
        if segment_hits_sphere(prev, curr, &self.position, self.radius) {
            HitResult::hit(&self.id, "hit", self.points)
        } else {
            HitResult::miss(&self.id)
        }
    }
}

// =============================================================================
// Target Dispatch
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum TargetSpec {
    Sphere(SphereTarget),
    Ring(RingTarget),
    Hoop(HoopTarget),
    Goal(GoalTarget),
    RangeTarget(RangeTarget),
}

impl TargetSpec {
    pub fn id(&self) -> &str {
        match self {
            TargetSpec::Sphere(t) => &t.id,
            TargetSpec::Ring(t) => &t.id,
            TargetSpec::Hoop(t) => &t.id,
            TargetSpec::Goal(t) => &t.id,
            TargetSpec::RangeTarget(t) => &t.id,
        }
    }

    pub fn position(&self) -> Vec3 {
        match self {
            TargetSpec::Sphere(t) => t.position,
            TargetSpec::Ring(t) => t.position,
            TargetSpec::Hoop(t) => t.position,
            TargetSpec::Goal(t) => t.position,
            TargetSpec::RangeTarget(t) => t.position,
        }
    }

    /// Copy of this target moved to `position`.
    pub fn with_position(&self, position: Vec3) -> Self {
        let mut moved = self.clone();
        match &mut moved {
            TargetSpec::Sphere(t) => t.position = position,
            TargetSpec::Ring(t) => t.position = position,
            TargetSpec::Hoop(t) => t.position = position,
            TargetSpec::Goal(t) => t.position = position,
            TargetSpec::RangeTarget(t) => t.position = position,
        }
        moved
    }

    pub fn check(&self, prev: &Vec3, curr: &Vec3) -> HitResult {
        match self {
            TargetSpec::Sphere(t) => t.check(prev, curr),
            TargetSpec::Ring(t) => t.check(prev, curr),
            TargetSpec::Hoop(t) => t.check(prev, curr),
            TargetSpec::Goal(t) => t.check(prev, curr),
            TargetSpec::RangeTarget(t) => t.check(prev, curr),
        }
    }
}

impl From<SphereTarget> for TargetSpec {
    fn from(t: SphereTarget) -> Self {
        TargetSpec::Sphere(t)
    }
}

impl From<RingTarget> for TargetSpec {
    fn from(t: RingTarget) -> Self {
        TargetSpec::Ring(t)
    }
}

impl From<HoopTarget> for TargetSpec {
    fn from(t: HoopTarget) -> Self {
        TargetSpec::Hoop(t)
    }
}

impl From<GoalTarget> for TargetSpec {
    fn from(t: GoalTarget) -> Self {
        TargetSpec::Goal(t)
    }
}

impl From<RangeTarget> for TargetSpec {
    fn from(t: RangeTarget) -> Self {
        TargetSpec::RangeTarget(t)
    }
}

/// Score one simulation step against one target.
pub fn check_hit(prev: &Vec3, curr: &Vec3, target: &TargetSpec) -> HitResult {
    let result = target.check(prev, curr);
    if result.hit {
        trace!(
            "target {} hit: zone={} points={}",
            result.target_id,
            result.zone,
            result.points
        );
    }
    result
}

// =============================================================================
// Trajectory Scan
// =============================================================================

/// How many targets a single shot may score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HitPolicy {
    /// Stop at the first step that hits anything.
    #[default]
    First,
    /// Keep scanning; every target can be hit once.
    All,
}

/// Walk the trajectory step by step and collect target hits.
///
/// Each target is reported at most once, on the first step that hits it.
/// Target positions are looked up at the end time of each step; targets the
/// lookup doesn't know stay at their declared position. Hits are ordered by
/// the step they happened on, then by target order.
pub fn scan_hits(
    result: &SimulationResult,
    targets: &[TargetSpec],
    positions: &dyn PositionLookup,
    policy: HitPolicy,
) -> Vec<HitResult> {
    let samples = &result.trajectory;
    let mut hits = Vec::new();
    let mut done = vec![false; targets.len()];

    let steps: Vec<(usize, usize)> = if samples.len() == 1 {
        vec![(0, 0)]
    } else {
        (1..samples.len()).map(|i| (i - 1, i)).collect()
    };

    for (a, b) in steps {
        let prev = &samples[a].position;
        let curr = &samples[b].position;
        let time = samples[b].time;

        for (index, target) in targets.iter().enumerate() {
            if done[index] {
                continue;
            }
            let hit = match positions.position_of(target.id(), time) {
                Some(position) => check_hit(prev, curr, &target.with_position(position)),
                None => check_hit(prev, curr, target),
            };
            if hit.hit {
                done[index] = true;
                hits.push(hit);
            }
        }

        let all_done = done.iter().all(|d| *d);
        if all_done || (policy == HitPolicy::First && !hits.is_empty()) {
            break;
        }
    }

    debug!(
        "scanned {} samples against {} targets: {} hit",
        samples.len(),
        targets.len(),
        hits.len()
    );
    hits
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::StaticPositions;
    use crate::types::{ApexEvent, TrajectorySample};
    use std::collections::HashMap;

    /// Straight line along +X at 1.5 m, 1 m per sample.
    fn straight_run(len: usize) -> SimulationResult {
        let trajectory: Vec<TrajectorySample> = (0..len)
            .map(|i| {
                TrajectorySample::new(
                    i as f64 * 0.1,
                    Vec3::new(i as f64, 1.5, 0.0),
                    Vec3::new(10.0, 0.0, 0.0),
                )
            })
            .collect();
        let apex = ApexEvent {
            time: 0.0,
            position: trajectory[0].position,
        };
        SimulationResult {
            trajectory,
            apex,
            impact: None,
        }
    }

    fn sphere(id: &str, x: f64, points: u32) -> TargetSpec {
        SphereTarget::new(id, Vec3::new(x, 1.5, 0.0), 0.5, points).into()
    }

    #[test]
    fn test_check_hit_dispatches() {
        let ring: TargetSpec = RingTarget::new("r", Vec3::new(30.0, 0.0, 0.0)).into();
        let p = Vec3::new(30.0, 0.0, 0.0);
        assert_eq!(check_hit(&p, &p, &ring).points, 100);

        let s = sphere("s", 5.0, 40);
        let hit = check_hit(&Vec3::new(4.0, 1.5, 0.0), &Vec3::new(6.0, 1.5, 0.0), &s);
        assert_eq!(hit.zone, "hit");
        assert_eq!(hit.points, 40);
        assert_eq!(hit.target_id, "s");
    }

    #[test]
    fn test_miss_result() {
        let miss = HitResult::miss("x");
        assert!(!miss.hit);
        assert_eq!(miss.points, 0);
        assert_eq!(miss.zone, "miss");
    }

    #[test]
    fn test_with_position_moves_only_position() {
        let t = sphere("s", 5.0, 40);
        let moved = t.with_position(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(moved.position(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(moved.id(), "s");
        assert_eq!(t.position(), Vec3::new(5.0, 1.5, 0.0));
    }

    #[test]
    fn test_scan_first_policy_stops_early() {
        let run = straight_run(20);
        let targets = vec![sphere("far", 15.0, 10), sphere("near", 5.0, 20)];

        let hits = scan_hits(&run, &targets, &StaticPositions, HitPolicy::First);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].target_id, "near");
    }

    #[test]
    fn test_scan_all_policy_orders_by_step() {
        let run = straight_run(20);
        let targets = vec![sphere("far", 15.0, 10), sphere("near", 5.0, 20)];

        let hits = scan_hits(&run, &targets, &StaticPositions, HitPolicy::All);
        let ids: Vec<&str> = hits.iter().map(|h| h.target_id.as_str()).collect();
        assert_eq!(ids, vec!["near", "far"]);
    }

    #[test]
    fn test_scan_counts_each_target_once() {
        // Target spans several consecutive steps
        let run = straight_run(20);
        let big: TargetSpec = SphereTarget::new("big", Vec3::new(8.0, 1.5, 0.0), 3.0, 5).into();
        let hits = scan_hits(&run, &[big], &StaticPositions, HitPolicy::All);
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_scan_uses_position_lookup() {
        let run = straight_run(20);
        // Declared position is off the flight line; the lookup moves it onto it
        let target: TargetSpec = SphereTarget::new("mover", Vec3::new(10.0, 10.0, 0.0), 0.5, 30).into();

        let none = scan_hits(&run, &[target], &StaticPositions, HitPolicy::All);
        assert!(none.is_empty());

        let target: TargetSpec = SphereTarget::new("mover", Vec3::new(10.0, 10.0, 0.0), 0.5, 30).into();
        let mut lookup = HashMap::new();
        lookup.insert("mover".to_string(), Vec3::new(10.0, 1.5, 0.0));
        let hits = scan_hits(&run, &[target], &lookup, HitPolicy::All);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].points, 30);
    }

    #[test]
    fn test_single_sample_trajectory() {
        let run = straight_run(1);
        let target: TargetSpec = SphereTarget::new("s", Vec3::new(0.0, 1.5, 0.0), 0.5, 10).into();
        let hits = scan_hits(&run, &[target], &StaticPositions, HitPolicy::First);
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_target_spec_yaml_tagging() {
        let yaml = r#"
- type: ring
  id: r1
  position: { x: 30.0, y: 0.0, z: 0.0 }
- type: hoop
  id: h1
  position: { x: 15.0, y: 0.0, z: 0.0 }
- type: range-target
  id: t1
  position: { x: 25.0, y: 1.5, z: 0.0 }
  face: steel-plate
"#;
        let targets: Vec<TargetSpec> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(targets.len(), 3);
        match &targets[0] {
            TargetSpec::Ring(r) => assert_eq!(r.rings, RingTable::classic()),
            other => panic!("expected ring, got {:?}", other),
        }
        match &targets[1] {
            TargetSpec::Hoop(h) => assert!((h.rim_height - hoop::RIM_HEIGHT).abs() < 1e-12),
            other => panic!("expected hoop, got {:?}", other),
        }
        match &targets[2] {
            TargetSpec::RangeTarget(t) => assert_eq!(t.face, RangeFace::SteelPlate),
            other => panic!("expected range target, got {:?}", other),
        }
    }
}
