//! The game aggregate driven once per frame
//!
//! `Game` owns the engine, the player, the spawner and the scenery, routes
//! decoded commands and produces a read-only [`Snapshot`] for rendering.

use serde::Serialize;

use super::engine::GameEngine;
use super::obstacle::ObstacleKind;
use super::player::Player;
use super::spawner::{Spawner, SpawnerParams};
use super::state::{GameEvent, GamePhase};
use crate::background::{Background, Cloud};
use crate::config::{Config, ConfigError};
use crate::consts::MAX_FRAME_DT;
use crate::highscores::{HighScoreError, HighScoreStore};

/// Decoded player intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Start from the menu, or jump while playing
    Jump,
    /// New run after game over
    Restart,
    Quit,
}

/// What the loop should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Obstacle as seen by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ObstacleView {
    pub kind: ObstacleKind,
    pub x: f32,
    pub y: f32,
    pub anim_frame: u8,
}

/// Player as seen by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlayerView {
    pub x: f32,
    pub y: f32,
    pub is_jumping: bool,
    pub anim_frame: u8,
}

/// Everything one frame needs to draw
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub player: PlayerView,
    pub obstacles: Vec<ObstacleView>,
    pub clouds: Vec<Cloud>,
    /// Hill height per screen column
    pub hills: Vec<f32>,
    pub score: u64,
    pub high_score: u64,
    pub new_high_score: bool,
    pub game_time: f32,
}

pub struct Game {
    config: Config,
    engine: GameEngine,
    player: Player,
    spawner: Spawner,
    background: Background,
}

impl Game {
    /// Build every subsystem for `config`; fails if the config is invalid
    /// or cannot produce a passable run.
    pub fn new(
        config: Config,
        store: Box<dyn HighScoreStore>,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        let engine = GameEngine::new(config.clone(), store)?;
        let params = SpawnerParams::from_config(&config);
        let spawner = Spawner::new(&config, params, engine.collision_tolerance(), seed)?;
        let player = Player::new(config.ground_line());
        let background = Background::new(
            config.screen_width,
            config.screen_height,
            seed.wrapping_add(1),
        );

        log::info!("Game created with seed {}", seed);

        Ok(Self {
            config,
            engine,
            player,
            spawner,
            background,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut GameEngine {
        &mut self.engine
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn spawner(&self) -> &Spawner {
        &self.spawner
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    pub fn phase(&self) -> GamePhase {
        self.engine.phase()
    }

    /// Change hit-box forgiveness for both collision checks and the
    /// spawner's clearability filter. Rejected if no obstacle kind would
    /// remain clearable.
    pub fn set_collision_tolerance(&mut self, tolerance: f32) -> Result<(), ConfigError> {
        self.spawner.set_collision_tolerance(tolerance)?;
        self.engine.set_collision_tolerance(tolerance);
        Ok(())
    }

    /// Bring the spawner in line with a tolerance set directly on the engine
    fn sync_collision_tolerance(&mut self) {
        let tolerance = self.engine.collision_tolerance();
        if tolerance == self.spawner.collision_tolerance() {
            return;
        }
        if let Err(e) = self.spawner.set_collision_tolerance(tolerance) {
            log::warn!("Collision tolerance {} rejected: {}", tolerance, e);
            self.engine
                .set_collision_tolerance(self.spawner.collision_tolerance());
        }
    }

    /// Advance one frame. `dt` is clamped so a stalled terminal cannot
    /// teleport obstacles through the player.
    pub fn tick(&mut self, dt: f32) -> Result<(), HighScoreError> {
        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        self.sync_collision_tolerance();

        if self.engine.phase() == GamePhase::Playing {
            self.player.update(dt, self.config.gravity);
            self.spawner.update(dt);
            self.background.update(dt);
            self.engine
                .check_collisions(&self.player, self.spawner.obstacles_mut())?;
        }

        self.engine.update(dt);
        Ok(())
    }

    /// Apply a decoded command. Commands that do not fit the phase are
    /// ignored.
    pub fn handle_command(&mut self, command: Command) -> Result<Flow, HighScoreError> {
        match command {
            Command::Quit => return Ok(Flow::Quit),
            Command::Jump => match self.engine.phase() {
                GamePhase::Menu => self.start()?,
                GamePhase::Playing => {
                    self.player.jump(self.config.jump_velocity);
                }
                GamePhase::GameOver => {}
            },
            Command::Restart => {
                if self.engine.phase() == GamePhase::GameOver {
                    self.restart()?;
                }
            }
        }
        Ok(Flow::Continue)
    }

    fn start(&mut self) -> Result<(), HighScoreError> {
        if self.engine.start()? {
            self.reset_world();
        }
        Ok(())
    }

    fn restart(&mut self) -> Result<(), HighScoreError> {
        if self.engine.restart()? {
            self.reset_world();
        }
        Ok(())
    }

    fn reset_world(&mut self) {
        self.player.reset();
        self.spawner.reset();
        self.background.reset();
    }

    /// Events queued since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.engine.drain_events()
    }

    /// Release callbacks before shutdown
    pub fn shutdown(&mut self) {
        self.engine.cleanup();
        log::info!("Game shut down");
    }

    pub fn snapshot(&self) -> Snapshot {
        let obstacles = self
            .spawner
            .obstacles()
            .iter()
            .filter(|o| o.active)
            .map(|o| ObstacleView {
                kind: o.kind,
                x: o.x,
                y: o.y,
                anim_frame: o.anim_frame,
            })
            .collect();

        let hills = (0..self.config.screen_width)
            .map(|x| self.background.hill_height_at(x as f32))
            .collect();

        Snapshot {
            phase: self.engine.phase(),
            player: PlayerView {
                x: self.player.x,
                y: self.player.y,
                is_jumping: self.player.is_jumping,
                anim_frame: self.player.anim_frame,
            },
            obstacles,
            clouds: self.background.clouds().to_vec(),
            hills,
            score: self.engine.current_score(),
            high_score: self.engine.high_score(),
            new_high_score: self.engine.is_new_high_score(),
            game_time: self.spawner.game_time(),
        }
    }
}
