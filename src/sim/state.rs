//! Game phases and simulation events

use std::fmt;

use serde::{Deserialize, Serialize};

use super::obstacle::ObstacleKind;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for start
    #[default]
    Menu,
    /// Active run
    Playing,
    /// Run ended, waiting for restart or menu
    GameOver,
}

impl GamePhase {
    pub const ALL: [GamePhase; 3] = [GamePhase::Menu, GamePhase::Playing, GamePhase::GameOver];

    /// Whether `self -> to` is a legal transition. Same-phase moves are not.
    pub fn can_transition(self, to: GamePhase) -> bool {
        use GamePhase::*;
        matches!(
            (self, to),
            (Menu, Playing)
                | (Playing, GameOver)
                | (Playing, Menu)
                | (GameOver, Menu)
                | (GameOver, Playing)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Menu => "Menu",
            GamePhase::Playing => "Playing",
            GamePhase::GameOver => "GameOver",
        }
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Events emitted by the simulation for the shell (logging, effects)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PhaseChanged { from: GamePhase, to: GamePhase },
    /// An obstacle scrolled behind the player and was credited
    ObstaclePassed { kind: ObstacleKind, bonus: u64 },
    /// The player hit an obstacle
    Collision { kind: ObstacleKind },
    /// The finished run beat the stored high score
    NewHighScore { score: u64 },
}
