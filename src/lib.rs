//! Dino Dash - an endless runner for the terminal
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, collisions, game state)
//! - `config`: Validated game configuration
//! - `highscores`: High score persistence
//! - `background`: Decorative parallax scenery
//! - `renderer`: Character-cell rendering through crossterm
//! - `platform`: Terminal setup and keyboard decoding

pub mod background;
pub mod config;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod sim;

pub use config::{Config, ConfigError};
pub use highscores::{HighScoreError, HighScoreStore, JsonFileStore, MemoryStore};
pub use sim::{Command, Game, GameEngine, GamePhase, Snapshot};

/// Game tuning constants
///
/// Distances are in screen units (one unit is one character cell), times in
/// seconds, speeds in units per second.
pub mod consts {
    /// Largest frame delta fed to the simulation; longer stalls are clamped
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Rows kept below the ground line for the ground itself and the hint line
    pub const GROUND_MARGIN: f32 = 3.0;

    /// Player defaults
    pub const PLAYER_X: f32 = 15.0;
    pub const PLAYER_WIDTH: f32 = 8.0;
    pub const PLAYER_HEIGHT: f32 = 6.0;
    pub const PLAYER_ANIM_FRAMES: u8 = 4;
    pub const PLAYER_ANIM_INTERVAL: f32 = 0.15;

    /// Bird wing flap
    pub const BIRD_ANIM_FRAMES: u8 = 2;
    pub const BIRD_ANIM_INTERVAL: f32 = 0.2;

    /// Hit-box shrink applied on every side of both boxes
    pub const COLLISION_TOLERANCE: f32 = 0.5;

    /// Scoring
    pub const POINTS_PER_SECOND: u64 = 10;
    pub const OBSTACLE_BONUS: u64 = 100;
    pub const DISTANCE_MULTIPLIER: f32 = 1.0;
    /// Nominal distance units credited per second of play
    pub const DISTANCE_RATE: f32 = 10.0;

    /// Spawn pacing
    pub const MAX_SPAWN_RATE_FACTOR: f32 = 3.0;
    pub const DIFFICULTY_RAMP: f32 = 0.1;
    pub const MIN_SPAWN_INTERVAL: f32 = 0.3;
    pub const MAX_SPAWN_INTERVAL: f32 = 2.5;
    pub const SPAWN_JITTER: (f32, f32) = (0.5, 1.5);

    /// Spawn placement
    pub const MIN_GAP: f32 = 15.0;
    pub const MAX_GAP: f32 = 45.0;
    /// Distance past the right edge where the first obstacle appears
    pub const SPAWN_MARGIN: f32 = 2.0;
    /// Obstacles closer than this to the right edge still constrain spacing
    pub const SPACING_LOOKAHEAD: f32 = 20.0;

    /// Bird introduction
    pub const BIRD_START_TIME: f32 = 5.0;
    pub const BIRD_RAMP_WINDOW: f32 = 10.0;

    /// Speed escalation: +10% every 5 seconds, capped
    pub const SPEED_RAMP: f32 = 0.1 / 5.0;
    pub const SPEED_CAP: f32 = 2.5;
}
