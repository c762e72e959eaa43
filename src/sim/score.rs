//! Run scoring
//!
//! The displayed score is the maximum of two monotonic estimators:
//! whole-second time points accumulated incrementally, and a floor derived
//! from distance plus obstacle bonuses. Both are pure functions of the
//! accumulated state.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Points for `whole_seconds` of play
pub fn time_points(whole_seconds: u64, points_per_second: u64) -> u64 {
    whole_seconds.saturating_mul(points_per_second)
}

/// Distance-derived floor including obstacle bonuses
pub fn distance_floor(
    distance: f32,
    distance_multiplier: f32,
    obstacles_passed: u32,
    obstacle_bonus: u64,
) -> u64 {
    let distance_points = (distance * distance_multiplier).max(0.0).floor() as u64;
    distance_points.saturating_add((obstacles_passed as u64).saturating_mul(obstacle_bonus))
}

/// How the current score was earned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub time: u64,
    pub obstacles: u64,
    pub distance: u64,
    pub total: u64,
}

/// Current and best score for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub current: u64,
    pub high: u64,
    /// Nominal distance, independent of scroll speed
    pub distance: f32,
    pub obstacles_passed: u32,
    // === Tuning ===
    pub points_per_second: u64,
    pub obstacle_bonus: u64,
    pub distance_multiplier: f32,
    /// Game time since the run started
    elapsed: f32,
    /// Time not yet converted into whole-second points
    score_clock: f32,
}

impl Default for Score {
    fn default() -> Self {
        Self::with_multipliers(POINTS_PER_SECOND, OBSTACLE_BONUS, DISTANCE_MULTIPLIER)
    }
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_multipliers(
        points_per_second: u64,
        obstacle_bonus: u64,
        distance_multiplier: f32,
    ) -> Self {
        Self {
            current: 0,
            high: 0,
            distance: 0.0,
            obstacles_passed: 0,
            points_per_second,
            obstacle_bonus,
            distance_multiplier,
            elapsed: 0.0,
            score_clock: 0.0,
        }
    }

    /// Clear the run totals, keeping the high score and tuning
    pub fn reset(&mut self) {
        self.current = 0;
        self.distance = 0.0;
        self.obstacles_passed = 0;
        self.elapsed = 0.0;
        self.score_clock = 0.0;
    }

    /// Accrue time and distance for `dt` seconds of play
    pub fn update(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        self.elapsed += dt;
        self.distance += dt * DISTANCE_RATE;

        // Whole seconds only; the fraction carries over
        self.score_clock += dt;
        if self.score_clock >= 1.0 {
            let whole = self.score_clock.floor();
            self.current = self
                .current
                .saturating_add(time_points(whole as u64, self.points_per_second));
            self.score_clock -= whole;
        }

        self.current = self.current.max(self.floor());
    }

    /// Credit one passed obstacle
    pub fn add_obstacle_bonus(&mut self) {
        self.obstacles_passed += 1;
        self.current = self.current.saturating_add(self.obstacle_bonus);
    }

    /// Distance estimator for the current state
    pub fn floor(&self) -> u64 {
        distance_floor(
            self.distance,
            self.distance_multiplier,
            self.obstacles_passed,
            self.obstacle_bonus,
        )
    }

    pub fn is_new_high_score(&self) -> bool {
        self.current > self.high
    }

    /// Promote the current score to high score if it beats it
    pub fn update_high_score(&mut self) -> bool {
        if self.is_new_high_score() {
            self.high = self.current;
            true
        } else {
            false
        }
    }

    /// Game time since the run started (seconds)
    pub fn game_duration(&self) -> f32 {
        self.elapsed
    }

    pub fn breakdown(&self) -> ScoreBreakdown {
        ScoreBreakdown {
            time: time_points(self.elapsed as u64, self.points_per_second),
            obstacles: (self.obstacles_passed as u64).saturating_mul(self.obstacle_bonus),
            distance: (self.distance * self.distance_multiplier).max(0.0).floor() as u64,
            total: self.current,
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Score: {} (High: {}) | Distance: {:.1} | Obstacles: {} | Time: {}s",
            self.current,
            self.high,
            self.distance,
            self.obstacles_passed,
            self.elapsed as u64
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_new_score_is_empty() {
        let s = Score::new();
        assert_eq!(s.current, 0);
        assert_eq!(s.high, 0);
        assert_eq!(s.points_per_second, 10);
        assert_eq!(s.obstacle_bonus, 100);
    }

    #[test]
    fn test_time_points_accrue_per_whole_second() {
        let mut s = Score::with_multipliers(10, 100, 0.0);
        s.update(0.5);
        assert_eq!(s.current, 0);
        s.update(0.75);
        assert_eq!(s.current, 10);
        // 0.25 carried over
        s.update(0.75);
        assert_eq!(s.current, 20);
        s.update(2.5);
        assert_eq!(s.current, 40);
    }

    #[test]
    fn test_distance_floor_takes_over() {
        let mut s = Score::with_multipliers(10, 100, 5.0);
        s.update(0.5); // distance 5 -> floor 25
        assert_eq!(s.current, 25);
        assert!((s.distance - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_obstacle_bonus() {
        let mut s = Score::new();
        s.add_obstacle_bonus();
        s.add_obstacle_bonus();
        assert_eq!(s.obstacles_passed, 2);
        assert_eq!(s.current, 200);
        // Floor includes bonuses, so a tick never takes them away
        s.update(0.1);
        assert!(s.current >= 200);
    }

    #[test]
    fn test_pure_estimators() {
        assert_eq!(time_points(3, 10), 30);
        assert_eq!(distance_floor(12.9, 1.0, 2, 100), 212);
        assert_eq!(distance_floor(-3.0, 1.0, 0, 100), 0);
    }

    #[test]
    fn test_high_score() {
        let mut s = Score::new();
        s.high = 50;
        s.current = 40;
        assert!(!s.update_high_score());
        assert_eq!(s.high, 50);
        s.current = 60;
        assert!(s.is_new_high_score());
        assert!(s.update_high_score());
        assert_eq!(s.high, 60);
        assert!(!s.is_new_high_score());
    }

    #[test]
    fn test_reset_keeps_high_and_tuning() {
        let mut s = Score::with_multipliers(5, 50, 2.0);
        s.high = 999;
        s.update(3.0);
        s.add_obstacle_bonus();
        s.reset();
        assert_eq!(s.current, 0);
        assert_eq!(s.distance, 0.0);
        assert_eq!(s.obstacles_passed, 0);
        assert_eq!(s.game_duration(), 0.0);
        assert_eq!(s.high, 999);
        assert_eq!(s.obstacle_bonus, 50);
    }

    #[test]
    fn test_breakdown_and_display() {
        let mut s = Score::new();
        s.update(2.0);
        s.add_obstacle_bonus();
        let b = s.breakdown();
        assert_eq!(b.time, 20);
        assert_eq!(b.obstacles, 100);
        assert_eq!(b.distance, 20);
        assert_eq!(b.total, s.current);
        assert_eq!(
            s.to_string(),
            "Score: 120 (High: 0) | Distance: 20.0 | Obstacles: 1 | Time: 2s"
        );
    }

    #[derive(Debug, Clone)]
    enum Step {
        Tick(f32),
        Bonus,
    }

    fn step_strategy() -> impl Strategy<Value = Step> {
        prop_oneof![
            (0.0f32..2.0).prop_map(Step::Tick),
            Just(Step::Bonus),
        ]
    }

    proptest! {
        #[test]
        fn prop_score_never_decreases(steps in prop::collection::vec(step_strategy(), 1..200)) {
            let mut s = Score::new();
            let mut last = s.current;
            for step in steps {
                match step {
                    Step::Tick(dt) => s.update(dt),
                    Step::Bonus => s.add_obstacle_bonus(),
                }
                prop_assert!(s.current >= last);
                prop_assert!(s.current >= s.floor());
                last = s.current;
            }
        }
    }
}
