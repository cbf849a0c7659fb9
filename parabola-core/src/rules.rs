//! Constraint and scoring-rule composition.
//!
//! A [`GameMode`] is a list of pass/fail [`Constraint`]s and a list of
//! additive [`ScoringRule`]s. Scoring a shot:
//!
//! 1. a miss scores 0 and nothing else is evaluated
//! 2. any failed constraint scores 0 (no partial credit)
//! 3. otherwise the rule contributions are summed and rounded
//!
//! New modes are built by recombining constraints and rules; neither the
//! solver nor the target code knows about modes.

use std::fmt;

use log::debug;

use crate::shot::ShotRecord;

/// Default ceiling for low-angle play (m).
pub const DEFAULT_CEILING: f64 = 15.0;

// =============================================================================
// Traits
// =============================================================================

/// A pass/fail condition on a shot.
pub trait Constraint: fmt::Debug + Send + Sync {
    fn id(&self) -> &str;

    fn description(&self) -> String;

    /// `true` when the shot satisfies the constraint.
    fn check(&self, shot: &ShotRecord) -> bool;
}

/// An additive contribution to a shot's score.
pub trait ScoringRule: fmt::Debug + Send + Sync {
    fn id(&self) -> &str;

    fn evaluate(&self, shot: &ShotRecord) -> f64;
}

// =============================================================================
// Game Mode
// =============================================================================

#[derive(Debug)]
pub struct GameMode {
    pub id: String,
    pub name: String,
    pub description: String,
    pub constraints: Vec<Box<dyn Constraint>>,
    pub rules: Vec<Box<dyn ScoringRule>>,
}

impl GameMode {
    pub fn new(id: impl Into<String>, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            constraints: Vec::new(),
            rules: Vec::new(),
        }
    }

    pub fn with_constraint(mut self, constraint: impl Constraint + 'static) -> Self {
        self.constraints.push(Box::new(constraint));
        self
    }

    pub fn with_rule(mut self, rule: impl ScoringRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Free play: a hit is worth whatever the targets award.
    pub fn classic() -> Self {
        Self::new("classic", "Classic", "Hit the targets. Points come from the target zones.")
            .with_rule(TargetPointsRule)
    }

    /// Stay under the ceiling; the flatter the arc, the bigger the bonus.
    pub fn low_angle() -> Self {
        Self::new(
            "low-angle",
            "Low Angle",
            "Hit the target while keeping the apex under the ceiling.",
        )
        .with_constraint(CeilingConstraint::default())
        .with_rule(LowAngleBonusRule::default())
    }
}

/// Why a shot scored what it did.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    /// First constraint that failed, by id.
    pub failed_constraint: Option<String>,
    /// Rule id and contribution, in declaration order.
    pub contributions: Vec<(String, f64)>,
    pub total: i64,
}

/// Evaluate a shot under `mode`, keeping the intermediate results.
pub fn evaluate(shot: &ShotRecord, mode: &GameMode) -> ScoreBreakdown {
    let zero = |failed: Option<String>| ScoreBreakdown {
        failed_constraint: failed,
        contributions: Vec::new(),
        total: 0,
    };

    if !shot.hit {
        return zero(None);
    }

    if let Some(failed) = mode.constraints.iter().find(|c| !c.check(shot)) {
        debug!("shot {} failed constraint {} in mode {}", shot.id, failed.id(), mode.id);
        return zero(Some(failed.id().to_string()));
    }

    let contributions: Vec<(String, f64)> = mode
        .rules
        .iter()
        .map(|r| (r.id().to_string(), r.evaluate(shot)))
        .collect();
    let sum: f64 = contributions.iter().map(|(_, v)| v).sum();

    ScoreBreakdown {
        failed_constraint: None,
        contributions,
        total: sum.round() as i64,
    }
}

/// Final integer score of a shot under `mode`.
pub fn score(shot: &ShotRecord, mode: &GameMode) -> i64 {
    evaluate(shot, mode).total
}

// =============================================================================
// Built-in Constraints
// =============================================================================

/// Apex must not exceed `ceiling`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CeilingConstraint {
    pub ceiling: f64,
}

impl Default for CeilingConstraint {
    fn default() -> Self {
        Self {
            ceiling: DEFAULT_CEILING,
        }
    }
}

impl Constraint for CeilingConstraint {
    fn id(&self) -> &str {
        "low-angle-ceiling"
    }

    fn description(&self) -> String {
        format!("Projectile must stay below {} m.", self.ceiling)
    }

    fn check(&self, shot: &ShotRecord) -> bool {
        shot.max_height <= self.ceiling
    }
}

/// Impact must come in no steeper than `max_degrees`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaxImpactAngleConstraint {
    pub max_degrees: f64,
}

impl Constraint for MaxImpactAngleConstraint {
    fn id(&self) -> &str {
        "max-impact-angle"
    }

    fn description(&self) -> String {
        format!("Impact angle must not exceed {} degrees.", self.max_degrees)
    }

    fn check(&self, shot: &ShotRecord) -> bool {
        shot.impact_angle <= self.max_degrees
    }
}

/// Shot must carry at least `min_range` metres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinRangeConstraint {
    pub min_range: f64,
}

impl Constraint for MinRangeConstraint {
    fn id(&self) -> &str {
        "min-range"
    }

    fn description(&self) -> String {
        format!("Shot must travel at least {} m.", self.min_range)
    }

    fn check(&self, shot: &ShotRecord) -> bool {
        shot.range >= self.min_range
    }
}

// =============================================================================
// Built-in Rules
// =============================================================================

/// `base + max(0, (ceiling - max_height) * per_metre)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LowAngleBonusRule {
    pub ceiling: f64,
    pub base: f64,
    pub per_metre: f64,
}

impl Default for LowAngleBonusRule {
    fn default() -> Self {
        Self {
            ceiling: DEFAULT_CEILING,
            base: 100.0,
            per_metre: 10.0,
        }
    }
}

impl ScoringRule for LowAngleBonusRule {
    fn id(&self) -> &str {
        "low-angle-score"
    }

    fn evaluate(&self, shot: &ShotRecord) -> f64 {
        self.base + ((self.ceiling - shot.max_height) * self.per_metre).max(0.0)
    }
}

/// Sum of the points awarded by the targets hit.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TargetPointsRule;

impl ScoringRule for TargetPointsRule {
    fn id(&self) -> &str {
        "target-points"
    }

    fn evaluate(&self, shot: &ShotRecord) -> f64 {
        shot.target_points() as f64
    }
}

/// Fixed award for any scoring shot.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatRule {
    pub id: String,
    pub points: f64,
}

impl FlatRule {
    pub fn new(id: impl Into<String>, points: f64) -> Self {
        Self {
            id: id.into(),
            points,
        }
    }
}

impl ScoringRule for FlatRule {
    fn id(&self) -> &str {
        &self.id
    }

    fn evaluate(&self, _shot: &ShotRecord) -> f64 {
        self.points
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::targets::HitResult;
    use crate::types::{ApexEvent, SimulationParams, SimulationResult, Vec3};

    /// Record with hand-set flight numbers; the trajectory is irrelevant here.
    fn record(hit: bool, max_height: f64) -> ShotRecord {
        let result = SimulationResult {
            trajectory: Vec::new(),
            apex: ApexEvent {
                time: 0.0,
                position: Vec3::ZERO,
            },
            impact: None,
        };
        let hits = if hit {
            vec![HitResult::hit("t1", "bullseye", 100)]
        } else {
            vec![]
        };
        let mut shot = ShotRecord::new("s", 0, "m", "st", SimulationParams::default(), result, hits);
        shot.max_height = max_height;
        shot
    }

    #[derive(Debug)]
    struct Fixed(f64);

    impl ScoringRule for Fixed {
        fn id(&self) -> &str {
            "fixed"
        }

        fn evaluate(&self, _shot: &ShotRecord) -> f64 {
            self.0
        }
    }

    #[derive(Debug)]
    struct Never;

    impl Constraint for Never {
        fn id(&self) -> &str {
            "never"
        }

        fn description(&self) -> String {
            "always fails".to_string()
        }

        fn check(&self, _shot: &ShotRecord) -> bool {
            false
        }
    }

    #[test]
    fn test_low_angle_mode_scenarios() {
        let mode = GameMode::low_angle();

        // Hit with apex 10 m: 100 + (15 - 10) * 10
        assert_eq!(score(&record(true, 10.0), &mode), 150);
        // Apex above the ceiling
        assert_eq!(score(&record(true, 16.0), &mode), 0);
        // Miss
        assert_eq!(score(&record(false, 10.0), &mode), 0);
    }

    #[test]
    fn test_ceiling_is_inclusive() {
        let mode = GameMode::low_angle();
        assert_eq!(score(&record(true, 15.0), &mode), 100);
    }

    #[test]
    fn test_rules_are_summed_and_rounded() {
        let mode = GameMode::new("m", "M", "")
            .with_rule(Fixed(10.4))
            .with_rule(Fixed(20.3));
        assert_eq!(score(&record(true, 1.0), &mode), 31);

        let mode = GameMode::new("m", "M", "").with_rule(Fixed(0.5));
        assert_eq!(score(&record(true, 1.0), &mode), 1);
    }

    #[test]
    fn test_any_failed_constraint_zeroes() {
        let mode = GameMode::new("m", "M", "")
            .with_constraint(CeilingConstraint::default())
            .with_constraint(Never)
            .with_rule(Fixed(100.0));
        let breakdown = evaluate(&record(true, 1.0), &mode);
        assert_eq!(breakdown.total, 0);
        assert_eq!(breakdown.failed_constraint.as_deref(), Some("never"));
        assert!(breakdown.contributions.is_empty());
    }

    #[test]
    fn test_miss_skips_constraints() {
        let mode = GameMode::new("m", "M", "").with_constraint(Never);
        let breakdown = evaluate(&record(false, 1.0), &mode);
        assert_eq!(breakdown.total, 0);
        assert_eq!(breakdown.failed_constraint, None);
    }

    #[test]
    fn test_order_does_not_change_score() {
        let a = GameMode::new("a", "A", "")
            .with_rule(LowAngleBonusRule::default())
            .with_rule(TargetPointsRule)
            .with_rule(FlatRule::new("bonus", 7.0));
        let b = GameMode::new("b", "B", "")
            .with_rule(FlatRule::new("bonus", 7.0))
            .with_rule(TargetPointsRule)
            .with_rule(LowAngleBonusRule::default());
        let shot = record(true, 12.5);
        assert_eq!(score(&shot, &a), score(&shot, &b));
        assert_eq!(score(&shot, &a), 125 + 100 + 7);
    }

    #[test]
    fn test_classic_mode_uses_target_points() {
        assert_eq!(score(&record(true, 30.0), &GameMode::classic()), 100);
    }

    #[test]
    fn test_impact_angle_and_range_constraints() {
        let mut shot = record(true, 5.0);
        shot.impact_angle = 40.0;
        shot.range = 25.0;

        assert!(MaxImpactAngleConstraint { max_degrees: 45.0 }.check(&shot));
        assert!(!MaxImpactAngleConstraint { max_degrees: 30.0 }.check(&shot));
        assert!(MinRangeConstraint { min_range: 20.0 }.check(&shot));
        assert!(!MinRangeConstraint { min_range: 30.0 }.check(&shot));
    }

    #[test]
    fn test_breakdown_lists_contributions_in_order() {
        let mode = GameMode::new("m", "M", "")
            .with_rule(FlatRule::new("first", 1.0))
            .with_rule(FlatRule::new("second", 2.0));
        let breakdown = evaluate(&record(true, 1.0), &mode);
        let ids: Vec<&str> = breakdown.contributions.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second"]);
        assert_eq!(breakdown.total, 3);
    }
}
