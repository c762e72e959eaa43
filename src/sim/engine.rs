//! Game engine state machine
//!
//! Owns the phase, the score and the high-score store. Transitions are
//! gated by [`GamePhase::can_transition`]; illegal or same-phase requests
//! are silently ignored. Entering `Playing` resets the score, entering
//! `GameOver` finalizes it and persists a new high score.

use std::fmt;

use super::collision::{CollisionInfo, check_collision_with_tolerance, collision_info};
use super::geometry::Rect;
use super::obstacle::Obstacle;
use super::player::Player;
use super::score::Score;
use super::state::{GameEvent, GamePhase};
use crate::config::{Config, ConfigError};
use crate::consts::COLLISION_TOLERANCE;
use crate::highscores::{HighScoreError, HighScoreStore};

/// Called with `(from, to)` after every accepted transition
pub type StateChangeCallback = Box<dyn FnMut(GamePhase, GamePhase)>;

pub struct GameEngine {
    config: Config,
    phase: GamePhase,
    previous_phase: GamePhase,
    running: bool,
    game_over: bool,
    initialized: bool,
    /// Simulation time since the engine was created
    clock: f32,
    /// `clock` when the current run started
    start_time: f32,
    collision_tolerance: f32,
    score: Score,
    /// Set when the last finished run beat the previous best
    new_high_score: bool,
    store: Box<dyn HighScoreStore>,
    events: Vec<GameEvent>,
    on_state_change: Option<StateChangeCallback>,
}

impl fmt::Debug for GameEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameEngine")
            .field("phase", &self.phase)
            .field("previous_phase", &self.previous_phase)
            .field("clock", &self.clock)
            .field("score", &self.score)
            .finish_non_exhaustive()
    }
}

impl GameEngine {
    /// Validate `config` and load the stored high score.
    ///
    /// An unreadable store is logged and treated as an empty one.
    pub fn new(config: Config, store: Box<dyn HighScoreStore>) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut score = Score::new();
        score.high = match store.load() {
            Ok(high) => high,
            Err(e) => {
                log::warn!("Could not load high score, starting from 0: {}", e);
                0
            }
        };

        log::info!("Engine created: {}", config);

        Ok(Self {
            config,
            phase: GamePhase::Menu,
            previous_phase: GamePhase::Menu,
            running: false,
            game_over: false,
            initialized: false,
            clock: 0.0,
            start_time: 0.0,
            collision_tolerance: COLLISION_TOLERANCE,
            score,
            new_high_score: false,
            store,
            events: Vec::new(),
            on_state_change: None,
        })
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn previous_phase(&self) -> GamePhase {
        self.previous_phase
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn score(&self) -> &Score {
        &self.score
    }

    pub fn current_score(&self) -> u64 {
        self.score.current
    }

    pub fn high_score(&self) -> u64 {
        self.score.high
    }

    /// True from the end of a record-breaking run until the next run starts
    pub fn is_new_high_score(&self) -> bool {
        self.new_high_score
    }

    pub fn store(&self) -> &dyn HighScoreStore {
        &*self.store
    }

    pub fn set_state_change_callback(&mut self, callback: StateChangeCallback) {
        self.on_state_change = Some(callback);
    }

    pub fn set_collision_tolerance(&mut self, tolerance: f32) {
        self.collision_tolerance = tolerance.max(0.0);
    }

    pub fn collision_tolerance(&self) -> f32 {
        self.collision_tolerance
    }

    /// Take the events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Request a phase change.
    ///
    /// Returns `Ok(false)` when the request is illegal or targets the current
    /// phase; nothing changes and no callback fires. A failed high-score save
    /// is returned as an error after the transition has completed.
    pub fn transition_to(&mut self, to: GamePhase) -> Result<bool, HighScoreError> {
        let from = self.phase;
        if from == to {
            return Ok(false);
        }
        if !from.can_transition(to) {
            log::debug!("Rejected transition {} -> {}", from, to);
            return Ok(false);
        }

        self.previous_phase = from;
        self.phase = to;
        self.running = to == GamePhase::Playing;
        self.game_over = to == GamePhase::GameOver;

        let saved = match to {
            GamePhase::Playing => {
                self.initialized = true;
                self.start_time = self.clock;
                self.new_high_score = false;
                self.score.reset();
                Ok(())
            }
            GamePhase::GameOver => self.finalize_score().map(|_| ()),
            GamePhase::Menu => Ok(()),
        };

        log::info!("State transition: {} -> {}", from, to);
        self.events.push(GameEvent::PhaseChanged { from, to });
        if let Some(callback) = self.on_state_change.as_mut() {
            callback(from, to);
        }

        saved.map(|_| true)
    }

    /// Menu -> Playing
    pub fn start(&mut self) -> Result<bool, HighScoreError> {
        if self.phase != GamePhase::Menu {
            return Ok(false);
        }
        self.transition_to(GamePhase::Playing)
    }

    /// Playing -> Menu
    pub fn stop(&mut self) -> Result<bool, HighScoreError> {
        if self.phase != GamePhase::Playing {
            return Ok(false);
        }
        self.transition_to(GamePhase::Menu)
    }

    /// Playing -> GameOver
    pub fn trigger_game_over(&mut self) -> Result<bool, HighScoreError> {
        self.transition_to(GamePhase::GameOver)
    }

    /// GameOver -> Playing
    pub fn restart(&mut self) -> Result<bool, HighScoreError> {
        if self.phase != GamePhase::GameOver {
            return Ok(false);
        }
        self.transition_to(GamePhase::Playing)
    }

    /// Back to the menu with no run in progress
    pub fn reset(&mut self) -> Result<(), HighScoreError> {
        self.transition_to(GamePhase::Menu)?;
        self.start_time = 0.0;
        self.initialized = false;
        Ok(())
    }

    /// Detach the callback and mark the engine inactive for shutdown
    pub fn cleanup(&mut self) {
        self.running = false;
        self.game_over = false;
        self.initialized = false;
        self.on_state_change = None;
        self.events.clear();
    }

    /// Advance the clock; the score accrues only while playing
    pub fn update(&mut self, dt: f32) {
        self.clock += dt;
        if self.phase == GamePhase::Playing {
            self.score.update(dt);
        }
    }

    /// Game time of the current (or last) run
    pub fn game_duration(&self) -> f32 {
        if !self.initialized {
            return 0.0;
        }
        self.score.game_duration()
    }

    pub fn clock(&self) -> f32 {
        self.clock
    }

    pub fn start_time(&self) -> f32 {
        self.start_time
    }

    /// Tolerance-aware hit test with the engine's tolerance
    pub fn check_collision(&self, a: &Rect, b: &Rect) -> bool {
        check_collision_with_tolerance(a, b, self.collision_tolerance)
    }

    pub fn collision_info(&self, a: &Rect, b: &Rect) -> CollisionInfo {
        collision_info(a, b)
    }

    /// Credit one passed obstacle
    pub fn add_obstacle_bonus(&mut self) {
        self.score.add_obstacle_bonus();
    }

    /// Collision scan, then passed-obstacle credit.
    ///
    /// The first hit ends the run and stops the scan; no bonus is awarded
    /// on that tick. Credited obstacles are deactivated so they score once.
    /// Returns whether a collision happened.
    pub fn check_collisions(
        &mut self,
        player: &Player,
        obstacles: &mut [Obstacle],
    ) -> Result<bool, HighScoreError> {
        if self.phase != GamePhase::Playing {
            return Ok(false);
        }

        let player_bounds = player.bounds();
        let hit = obstacles
            .iter()
            .filter(|o| o.active)
            .find(|o| self.check_collision(&player_bounds, &o.bounds()))
            .map(|o| (o.kind, o.x));

        if let Some((kind, x)) = hit {
            log::info!("Collision with {} at x={:.1}", kind, x);
            self.events.push(GameEvent::Collision { kind });
            self.trigger_game_over()?;
            return Ok(true);
        }

        for obstacle in obstacles.iter_mut() {
            if obstacle.active && obstacle.right() < player.x {
                self.score.add_obstacle_bonus();
                self.events.push(GameEvent::ObstaclePassed {
                    kind: obstacle.kind,
                    bonus: self.score.obstacle_bonus,
                });
                obstacle.deactivate();
            }
        }
        Ok(false)
    }

    /// Promote and persist a record score. Returns whether it was a record.
    fn finalize_score(&mut self) -> Result<bool, HighScoreError> {
        if !self.score.update_high_score() {
            return Ok(false);
        }

        self.new_high_score = true;
        let high = self.score.high;
        log::info!("New high score: {}", high);
        self.events.push(GameEvent::NewHighScore { score: high });
        self.store.save(high)?;
        Ok(true)
    }
}
