//! Obstacle spawner and difficulty progression
//!
//! Decides when, where and what to spawn as a function of accumulated game
//! time. Pacing, speed and the type mix escalate with time, while a
//! minimum interval and a jump-derived minimum gap keep every run
//! physically passable.
//!
//! The pacing rules are pure functions of `(params, game_time, sample)` so
//! they can be tested without a random source.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::obstacle::{Obstacle, ObstacleKind};
use super::player::JumpProfile;
use crate::config::{Config, ConfigError};
use crate::consts::*;

/// Cactus weights before birds appear (small, medium, large)
const CACTUS_WEIGHTS: [f32; 3] = [0.5, 0.3, 0.2];
/// Bird weights at full strength (low, mid, high)
const BIRD_WEIGHTS: [f32; 3] = [0.3, 0.2, 0.1];
/// Share of the total bird weight taken from each cactus; sums to 1
const CACTUS_GIVE: [f32; 3] = [0.4, 0.3, 0.3];

/// Closing speeds below this are treated as equal
const SPEED_EPSILON: f32 = 1e-3;

/// Difficulty and placement tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnerParams {
    /// Obstacles per second at game time zero
    pub base_rate: f32,
    /// Spawn rate ceiling
    pub max_rate: f32,
    /// Rate growth: `base * (1 + t * ramp / 10)`
    pub difficulty_ramp: f32,
    /// Spawn delay floor (seconds)
    pub min_interval: f32,
    /// Spawn delay ceiling (seconds)
    pub max_interval: f32,
    /// Multiplicative jitter range applied to the base interval
    pub jitter: (f32, f32),
    /// Horizontal gap bounds between consecutive obstacles
    pub min_gap: f32,
    pub max_gap: f32,
    /// Game time at which birds start appearing
    pub bird_start_time: f32,
    /// Seconds for bird weights to ramp from zero to full
    pub bird_ramp_window: f32,
    /// Speed multiplier growth per second of game time
    pub speed_ramp: f32,
    /// Speed multiplier ceiling
    pub speed_cap: f32,
}

impl Default for SpawnerParams {
    fn default() -> Self {
        Self {
            base_rate: 2.0,
            max_rate: 2.0 * MAX_SPAWN_RATE_FACTOR,
            difficulty_ramp: DIFFICULTY_RAMP,
            min_interval: MIN_SPAWN_INTERVAL,
            max_interval: MAX_SPAWN_INTERVAL,
            jitter: SPAWN_JITTER,
            min_gap: MIN_GAP,
            max_gap: MAX_GAP,
            bird_start_time: BIRD_START_TIME,
            bird_ramp_window: BIRD_RAMP_WINDOW,
            speed_ramp: SPEED_RAMP,
            speed_cap: SPEED_CAP,
        }
    }
}

impl SpawnerParams {
    /// Defaults scaled to a config; the gap floor is widened to one full
    /// jump at the base scroll speed when the default would be too short
    pub fn from_config(config: &Config) -> Self {
        let reach = config.jump_profile().reach(config.obstacle_speed);
        let min_gap = MIN_GAP.max(reach);
        Self {
            base_rate: config.spawn_rate,
            max_rate: config.spawn_rate * MAX_SPAWN_RATE_FACTOR,
            min_gap,
            max_gap: MAX_GAP.max(min_gap),
            ..Default::default()
        }
    }

    /// Check internal consistency and that `min_gap` fits one jump
    pub fn validate(&self, jump: &JumpProfile, base_speed: f32) -> Result<(), ConfigError> {
        for (field, value) in [
            ("base spawn rate", self.base_rate),
            ("max spawn rate", self.max_rate),
            ("min spawn interval", self.min_interval),
            ("max spawn interval", self.max_interval),
            ("min gap", self.min_gap),
            ("max gap", self.max_gap),
            ("speed cap", self.speed_cap),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositive { field });
            }
        }
        for (field, value) in [
            ("difficulty ramp", self.difficulty_ramp),
            ("speed ramp", self.speed_ramp),
            ("bird start time", self.bird_start_time),
            ("bird ramp window", self.bird_ramp_window),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Negative { field });
            }
        }
        if self.min_interval > self.max_interval {
            return Err(ConfigError::InvalidRange {
                field: "spawn interval",
                min: self.min_interval,
                max: self.max_interval,
            });
        }
        if self.min_gap > self.max_gap {
            return Err(ConfigError::InvalidRange {
                field: "gap",
                min: self.min_gap,
                max: self.max_gap,
            });
        }
        if !(self.jitter.0 > 0.0 && self.jitter.0 <= self.jitter.1 && self.jitter.1.is_finite()) {
            return Err(ConfigError::InvalidRange {
                field: "jitter",
                min: self.jitter.0,
                max: self.jitter.1,
            });
        }

        let required = jump.reach(base_speed);
        if self.min_gap + 1e-3 < required {
            return Err(ConfigError::GapTooSmall {
                min_gap: self.min_gap,
                required,
            });
        }
        Ok(())
    }
}

/// Spawn rate at `game_time`: linear ramp, capped
pub fn spawn_rate_at(params: &SpawnerParams, game_time: f32) -> f32 {
    let rate = params.base_rate * (1.0 + game_time * params.difficulty_ramp / 10.0);
    rate.min(params.max_rate)
}

/// Delay before the next spawn. `sample` is uniform in [0, 1).
pub fn spawn_delay(params: &SpawnerParams, game_time: f32, sample: f32) -> f32 {
    let base_interval = 1.0 / spawn_rate_at(params, game_time);
    let (lo, hi) = params.jitter;
    let factor = lo + sample * (hi - lo);
    (base_interval * factor).clamp(params.min_interval, params.max_interval)
}

/// Speed multiplier for obstacles spawned at `game_time`
pub fn speed_multiplier_at(params: &SpawnerParams, game_time: f32) -> f32 {
    (1.0 + game_time * params.speed_ramp).min(params.speed_cap)
}

/// Bird strength in [0, 1]
fn bird_strength(params: &SpawnerParams, game_time: f32) -> f32 {
    if game_time <= params.bird_start_time {
        return 0.0;
    }
    if params.bird_ramp_window <= 0.0 {
        return 1.0;
    }
    ((game_time - params.bird_start_time) / params.bird_ramp_window).min(1.0)
}

/// Ordered (kind, weight) table at `game_time`, restricted to `allowed`.
///
/// Before filtering the weights always sum to 1: bird weight is taken from
/// the cacti in fixed shares.
pub fn type_weights_at(
    params: &SpawnerParams,
    game_time: f32,
    allowed: &[ObstacleKind],
) -> Vec<(ObstacleKind, f32)> {
    let strength = bird_strength(params, game_time);
    let birds = BIRD_WEIGHTS.map(|w| w * strength);
    let bird_total: f32 = birds.iter().sum();

    let mut weights = [0.0f32; 6];
    for i in 0..3 {
        weights[i] = CACTUS_WEIGHTS[i] - bird_total * CACTUS_GIVE[i];
        weights[i + 3] = birds[i];
    }

    ObstacleKind::ALL
        .iter()
        .zip(weights)
        .filter(|(kind, _)| allowed.contains(kind))
        .map(|(kind, weight)| (*kind, weight))
        .collect()
}

/// Cumulative-weight draw. `sample` is uniform in [0, 1).
///
/// Returns the first kind whose cumulative weight reaches the draw.
/// Non-positive weights are never selected unless nothing else is left.
pub fn select_kind(weights: &[(ObstacleKind, f32)], sample: f32) -> Option<ObstacleKind> {
    let total: f32 = weights.iter().map(|(_, w)| w.max(0.0)).sum();
    if total <= 0.0 {
        return weights.first().map(|(kind, _)| *kind);
    }

    let r = sample * total;
    let mut cumulative = 0.0;
    for (kind, weight) in weights {
        if *weight <= 0.0 {
            continue;
        }
        cumulative += weight;
        if cumulative >= r {
            return Some(*kind);
        }
    }

    // Rounding left the draw just past the last bucket
    weights
        .iter()
        .rev()
        .find(|(_, w)| *w > 0.0)
        .map(|(kind, _)| *kind)
}

/// Clearance a kind demands from the jump, after hit-box forgiveness
pub fn required_clearance(kind: ObstacleKind, tolerance: f32) -> f32 {
    kind.top_elevation() - 2.0 * tolerance
}

/// Horizontal distance over which the shrunk hit boxes of the runner and
/// `kind` overlap while it scrolls past. Zero if either box shrinks away.
pub fn overlap_span(kind: ObstacleKind, tolerance: f32) -> f32 {
    let (width, height) = kind.dimensions();
    let runner = PLAYER_WIDTH - 2.0 * tolerance;
    let obstacle = width - 2.0 * tolerance;
    if runner <= 0.0
        || obstacle <= 0.0
        || PLAYER_HEIGHT - 2.0 * tolerance <= 0.0
        || height - 2.0 * tolerance <= 0.0
    {
        return 0.0;
    }
    runner + obstacle
}

/// True if some take-off clears `kind` scrolling at `scroll_speed`.
///
/// The arc has to stay above the kind's clearance for the whole time the
/// boxes overlap horizontally. Faster obstacles pass sooner, so the base
/// speed is the hardest case.
pub fn is_clearable(
    kind: ObstacleKind,
    jump: &JumpProfile,
    tolerance: f32,
    scroll_speed: f32,
) -> bool {
    let span = overlap_span(kind, tolerance);
    let clearance = required_clearance(kind, tolerance);
    if span <= 0.0 || clearance <= 0.0 {
        return true;
    }
    jump.time_above(clearance) >= span / scroll_speed
}

/// Kinds the given jump can clear at `scroll_speed`
pub fn clearable_kinds(
    jump: &JumpProfile,
    tolerance: f32,
    scroll_speed: f32,
) -> Vec<ObstacleKind> {
    ObstacleKind::ALL
        .into_iter()
        .filter(|kind| is_clearable(*kind, jump, tolerance, scroll_speed))
        .collect()
}

fn allowed_kinds_for(
    jump: &JumpProfile,
    tolerance: f32,
    scroll_speed: f32,
) -> Result<Vec<ObstacleKind>, ConfigError> {
    let allowed = clearable_kinds(jump, tolerance, scroll_speed);
    if allowed.is_empty() {
        return Err(ConfigError::NoClearableObstacles {
            max_height: jump.max_height(),
        });
    }
    if allowed.len() < ObstacleKind::ALL.len() {
        log::info!(
            "Jump ({:.2} high, {:.2}s airborne) limits obstacles to {:?}",
            jump.max_height(),
            jump.air_time(),
            allowed
        );
    }
    Ok(allowed)
}

/// Spawns, scrolls and evicts obstacles
#[derive(Debug, Clone)]
pub struct Spawner {
    params: SpawnerParams,
    /// Active obstacles; order is not significant
    obstacles: Vec<Obstacle>,
    game_time: f32,
    last_spawn_time: f32,
    next_spawn_delay: f32,
    screen_width: f32,
    ground_line: f32,
    base_speed: f32,
    jump: JumpProfile,
    tolerance: f32,
    allowed: Vec<ObstacleKind>,
    rng: Pcg32,
}

impl Spawner {
    /// Build a spawner for `config`, dropping kinds the jump cannot clear
    pub fn new(
        config: &Config,
        params: SpawnerParams,
        tolerance: f32,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let jump = config.jump_profile();
        params.validate(&jump, config.obstacle_speed)?;

        let tolerance = tolerance.max(0.0);
        let allowed = allowed_kinds_for(&jump, tolerance, config.obstacle_speed)?;

        let mut spawner = Self {
            params,
            obstacles: Vec::with_capacity(16),
            game_time: 0.0,
            last_spawn_time: 0.0,
            next_spawn_delay: 0.0,
            screen_width: config.screen_width as f32,
            ground_line: config.ground_line(),
            base_speed: config.obstacle_speed,
            jump,
            tolerance,
            allowed,
            rng: Pcg32::seed_from_u64(seed),
        };
        spawner.schedule_next_spawn();
        Ok(spawner)
    }

    /// Advance game time, spawn when due, scroll and evict
    pub fn update(&mut self, dt: f32) {
        self.game_time += dt;

        if self.game_time - self.last_spawn_time >= self.next_spawn_delay {
            self.spawn_obstacle();
            self.schedule_next_spawn();
        }

        for i in (0..self.obstacles.len()).rev() {
            self.obstacles[i].update(dt);
            if !self.obstacles[i].active {
                self.obstacles.swap_remove(i);
            }
        }
    }

    fn spawn_obstacle(&mut self) {
        self.last_spawn_time = self.game_time;

        let speed = self.base_speed * speed_multiplier_at(&self.params, self.game_time);
        let Some(x) = self.spawn_position(speed) else {
            log::debug!("Spawn skipped at t={:.2}: queue full", self.game_time);
            return;
        };
        let kind = self.select_kind();

        log::debug!(
            "Spawn {} at x={:.1} speed={:.1} t={:.2}",
            kind,
            x,
            speed,
            self.game_time
        );
        self.obstacles
            .push(Obstacle::new(kind, x, self.ground_line, speed));
    }

    fn schedule_next_spawn(&mut self) {
        let sample = self.rng.random::<f32>();
        self.next_spawn_delay = spawn_delay(&self.params, self.game_time, sample);
    }

    fn select_kind(&mut self) -> ObstacleKind {
        let weights = type_weights_at(&self.params, self.game_time, &self.allowed);
        let sample = self.rng.random::<f32>();
        select_kind(&weights, sample).unwrap_or(self.allowed[0])
    }

    /// Left edge for an obstacle of `speed`, or `None` when the off-screen
    /// queue already holds a full gap of obstacles.
    ///
    /// The gap floor is one full jump at the new obstacle's speed, plus the
    /// distance a faster newcomer closes on its predecessor before that one
    /// leaves the screen.
    fn spawn_position(&mut self, speed: f32) -> Option<f32> {
        let base_x = self.screen_width + SPAWN_MARGIN;

        let mut rightmost = base_x;
        let mut leader: Option<&Obstacle> = None;
        for obstacle in &self.obstacles {
            if obstacle.active
                && obstacle.x > self.screen_width - SPACING_LOOKAHEAD
                && obstacle.right() > rightmost
            {
                rightmost = obstacle.right();
                leader = Some(obstacle);
            }
        }

        if rightmost > base_x + self.params.max_gap {
            return None;
        }

        let closing = leader
            .filter(|prev| speed - prev.speed > SPEED_EPSILON && prev.speed > 0.0)
            .map(|prev| (speed - prev.speed) * prev.right() / prev.speed)
            .unwrap_or(0.0);

        let min_gap = self.params.min_gap.max(self.jump.reach(speed)) + closing;
        let max_gap = self.params.max_gap.max(min_gap);
        let gap = min_gap + self.rng.random::<f32>() * (max_gap - min_gap);

        Some(rightmost + gap)
    }

    /// Clear obstacles and restart the clock, keeping capacity
    pub fn reset(&mut self) {
        self.obstacles.clear();
        self.game_time = 0.0;
        self.last_spawn_time = 0.0;
        self.schedule_next_spawn();
    }

    /// Override pacing (base rate, max rate, ramp). Invalid values are
    /// rejected and the current pacing is kept.
    pub fn set_difficulty(
        &mut self,
        base_rate: f32,
        max_rate: f32,
        ramp: f32,
    ) -> Result<(), ConfigError> {
        let params = SpawnerParams {
            base_rate,
            max_rate,
            difficulty_ramp: ramp,
            ..self.params.clone()
        };
        params.validate(&self.jump, self.base_speed)?;
        self.params = params;
        Ok(())
    }

    /// Re-run the clearability filter for a new hit-box tolerance.
    ///
    /// Obstacles already spawned are kept. On error the previous tolerance
    /// and filter stay in place.
    pub fn set_collision_tolerance(&mut self, tolerance: f32) -> Result<(), ConfigError> {
        let tolerance = tolerance.max(0.0);
        self.allowed = allowed_kinds_for(&self.jump, tolerance, self.base_speed)?;
        self.tolerance = tolerance;
        Ok(())
    }

    /// Tolerance the obstacle filter was built for
    pub fn collision_tolerance(&self) -> f32 {
        self.tolerance
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn obstacles_mut(&mut self) -> &mut [Obstacle] {
        &mut self.obstacles
    }

    pub fn active_count(&self) -> usize {
        self.obstacles.len()
    }

    pub fn game_time(&self) -> f32 {
        self.game_time
    }

    pub fn params(&self) -> &SpawnerParams {
        &self.params
    }

    pub fn current_spawn_rate(&self) -> f32 {
        spawn_rate_at(&self.params, self.game_time)
    }

    pub fn speed_multiplier(&self) -> f32 {
        speed_multiplier_at(&self.params, self.game_time)
    }

    pub fn type_weights(&self) -> Vec<(ObstacleKind, f32)> {
        type_weights_at(&self.params, self.game_time, &self.allowed)
    }

    /// Kinds this spawner may produce
    pub fn allowed_kinds(&self) -> &[ObstacleKind] {
        &self.allowed
    }

    /// Scheduled delay between the last spawn and the next
    pub fn next_spawn_delay(&self) -> f32 {
        self.next_spawn_delay
    }

    /// Game time remaining until the next spawn
    pub fn next_spawn_in(&self) -> f32 {
        (self.next_spawn_delay - (self.game_time - self.last_spawn_time)).max(0.0)
    }
}
