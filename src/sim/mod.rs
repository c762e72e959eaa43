//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and
//! deterministic:
//! - Elapsed time is passed in explicitly, never read from a clock
//! - Seeded RNG only
//! - No rendering or terminal dependencies

pub mod collision;
pub mod engine;
pub mod geometry;
pub mod obstacle;
pub mod player;
pub mod score;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{CollisionInfo, check_collision, check_collision_with_tolerance, collision_info};
pub use engine::{GameEngine, StateChangeCallback};
pub use geometry::Rect;
pub use obstacle::{Obstacle, ObstacleKind};
pub use player::{JumpProfile, Player};
pub use score::{Score, ScoreBreakdown};
pub use spawner::{Spawner, SpawnerParams};
pub use state::{GameEvent, GamePhase};
pub use tick::{Command, Flow, Game, ObstacleView, PlayerView, Snapshot};
