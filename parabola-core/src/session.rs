//! Session and round bookkeeping.
//!
//! Everything here is a fold over finished [`ShotRecord`]s: running session
//! statistics, a bounded history and the round state for challenge play.
//! Timestamps and timers are plain milliseconds supplied by the caller.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::shot::ShotRecord;
use crate::targets::HitResult;

/// Shots kept in the history.
pub const HISTORY_CAPACITY: usize = 100;

pub const PRECISION_SHOTS: u32 = 5;
pub const TIMED_LIMIT_MS: u64 = 30_000;

// =============================================================================
// Session Stats
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub total_shots: u32,
    pub total_hits: u32,
    pub total_score: i64,
    /// Hits / shots in `[0, 1]`.
    pub accuracy: f64,
    pub current_streak: u32,
    pub best_streak: u32,
    pub start_time: u64,
    pub last_shot_time: u64,
}

impl SessionStats {
    pub fn new(start_time: u64) -> Self {
        Self {
            start_time,
            ..Self::default()
        }
    }

    pub fn record(&mut self, shot: &ShotRecord) {
        self.total_shots += 1;
        if shot.hit {
            self.total_hits += 1;
            self.current_streak += 1;
        } else {
            self.current_streak = 0;
        }
        self.best_streak = self.best_streak.max(self.current_streak);
        self.total_score += shot.score;
        self.accuracy = self.total_hits as f64 / self.total_shots as f64;
        self.last_shot_time = shot.timestamp;
    }

    /// Start over, keeping nothing but the new start time.
    pub fn reset(&mut self, start_time: u64) {
        *self = Self::new(start_time);
    }
}

// =============================================================================
// Shot History
// =============================================================================

/// Most recent shots, newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct ShotHistory {
    shots: VecDeque<ShotRecord>,
    capacity: usize,
}

impl Default for ShotHistory {
    fn default() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }
}

impl ShotHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            shots: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, shot: ShotRecord) {
        self.shots.push_front(shot);
        self.shots.truncate(self.capacity);
    }

    pub fn len(&self) -> usize {
        self.shots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shots.is_empty()
    }

    pub fn latest(&self) -> Option<&ShotRecord> {
        self.shots.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShotRecord> {
        self.shots.iter()
    }

    pub fn clear(&mut self) {
        self.shots.clear();
    }
}

// =============================================================================
// Rounds
// =============================================================================

/// When a challenge round ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum RoundRules {
    /// Fixed number of shots, no clock.
    Precision { max_shots: u32 },
    /// Unlimited shots against the clock.
    Timed { time_limit_ms: u64 },
}

impl RoundRules {
    pub fn precision() -> Self {
        RoundRules::Precision {
            max_shots: PRECISION_SHOTS,
        }
    }

    pub fn timed() -> Self {
        RoundRules::Timed {
            time_limit_ms: TIMED_LIMIT_MS,
        }
    }

    pub fn is_over(&self, shots_fired: u32, elapsed_ms: u64) -> bool {
        match *self {
            RoundRules::Precision { max_shots } => shots_fired >= max_shots,
            RoundRules::Timed { time_limit_ms } => elapsed_ms >= time_limit_ms,
        }
    }
}

/// Summary shown when a round ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalStats {
    pub score: i64,
    /// Shots that hit anything, in whole percent of shots fired.
    pub accuracy: u32,
    /// Shots that hit anything.
    pub hits: u32,
    /// Targets hit across all shots; one shot may hit several.
    pub targets_hit: u32,
    pub shots: u32,
    pub streak: u32,
}

/// One challenge round on a stage.
#[derive(Debug, Clone, PartialEq)]
pub struct Round {
    pub rules: RoundRules,
    pub stage_id: String,
    shots: u32,
    hit_shots: u32,
    hits: Vec<HitResult>,
    score: i64,
    elapsed_ms: u64,
    current_streak: u32,
    best_streak: u32,
    finished: Option<FinalStats>,
}

impl Round {
    pub fn start(rules: RoundRules, stage_id: impl Into<String>) -> Self {
        Self {
            rules,
            stage_id: stage_id.into(),
            shots: 0,
            hit_shots: 0,
            hits: Vec::new(),
            score: 0,
            elapsed_ms: 0,
            current_streak: 0,
            best_streak: 0,
            finished: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.finished.is_none()
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn shots(&self) -> u32 {
        self.shots
    }

    pub fn hits(&self) -> &[HitResult] {
        &self.hits
    }

    /// Remaining time for timed rounds.
    pub fn time_remaining_ms(&self) -> Option<u64> {
        match self.rules {
            RoundRules::Timed { time_limit_ms } => Some(time_limit_ms.saturating_sub(self.elapsed_ms)),
            RoundRules::Precision { .. } => None,
        }
    }

    /// Register a finished shot. Ignored once the round is over.
    pub fn register_shot(&mut self, shot: &ShotRecord) {
        if !self.is_active() {
            return;
        }
        self.shots += 1;
        if shot.hit {
            self.hit_shots += 1;
            self.hits.extend(shot.hits.iter().cloned());
            self.score += shot.score;
            self.current_streak += 1;
            self.best_streak = self.best_streak.max(self.current_streak);
        } else {
            self.current_streak = 0;
        }
        if self.rules.is_over(self.shots, self.elapsed_ms) {
            self.end();
        }
    }

    /// Advance the round clock. Only timed rounds can expire.
    pub fn tick(&mut self, delta_ms: u64) {
        if !self.is_active() {
            return;
        }
        self.elapsed_ms = self.elapsed_ms.saturating_add(delta_ms);
        if matches!(self.rules, RoundRules::Timed { .. }) && self.rules.is_over(self.shots, self.elapsed_ms) {
            self.end();
        }
    }

    /// Close the round; repeated calls return the same summary.
    pub fn end(&mut self) -> &FinalStats {
        let accuracy = if self.shots > 0 {
            (self.hit_shots as f64 / self.shots as f64 * 100.0).round() as u32
        } else {
            0
        };
        let summary = FinalStats {
            score: self.score,
            accuracy,
            hits: self.hit_shots,
            targets_hit: self.hits.len() as u32,
            shots: self.shots,
            streak: self.best_streak,
        };
        self.finished.get_or_insert(summary)
    }

    pub fn final_stats(&self) -> Option<&FinalStats> {
        self.finished.as_ref()
    }
}

// =============================================================================
// Rank
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rank {
    Rookie,
    Gunner,
    Sharpshooter,
    Deadeye,
    BallisticsMaster,
}

const RANK_THRESHOLDS: [(u64, Rank); 5] = [
    (0, Rank::Rookie),
    (1_000, Rank::Gunner),
    (5_000, Rank::Sharpshooter),
    (10_000, Rank::Deadeye),
    (25_000, Rank::BallisticsMaster),
];

impl Rank {
    pub fn for_xp(xp: u64) -> Self {
        RANK_THRESHOLDS
            .iter()
            .rev()
            .find(|(min, _)| xp >= *min)
            .map(|(_, rank)| *rank)
            .unwrap_or(Rank::Rookie)
    }

    /// XP needed for the next rank; `None` at the top.
    pub fn next_threshold(self) -> Option<u64> {
        RANK_THRESHOLDS
            .iter()
            .find(|(_, rank)| *rank > self)
            .map(|(min, _)| *min)
    }
}

// =============================================================================
// Tests
// =============================================================================
