//! Obstacles that scroll toward the player

use std::fmt;

use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::consts::{BIRD_ANIM_FRAMES, BIRD_ANIM_INTERVAL};

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    CactusSmall,
    CactusMedium,
    CactusLarge,
    BirdLow,
    BirdMid,
    BirdHigh,
}

impl ObstacleKind {
    /// Every kind, in weight-table order
    pub const ALL: [ObstacleKind; 6] = [
        ObstacleKind::CactusSmall,
        ObstacleKind::CactusMedium,
        ObstacleKind::CactusLarge,
        ObstacleKind::BirdLow,
        ObstacleKind::BirdMid,
        ObstacleKind::BirdHigh,
    ];

    /// Hit-box size (width, height)
    pub fn dimensions(&self) -> (f32, f32) {
        match self {
            ObstacleKind::CactusSmall => (3.0, 3.0),
            ObstacleKind::CactusMedium => (3.0, 4.0),
            ObstacleKind::CactusLarge => (5.0, 5.0),
            ObstacleKind::BirdLow | ObstacleKind::BirdMid | ObstacleKind::BirdHigh => (4.0, 2.0),
        }
    }

    /// Height of the obstacle's top above the ground line.
    ///
    /// Cacti stand on the ground; birds hover at the runner's lower body,
    /// middle body and head.
    pub fn top_elevation(&self) -> f32 {
        match self {
            ObstacleKind::BirdLow => 3.0,
            ObstacleKind::BirdMid => 4.0,
            ObstacleKind::BirdHigh => 5.0,
            _ => self.dimensions().1,
        }
    }

    pub fn is_bird(&self) -> bool {
        matches!(
            self,
            ObstacleKind::BirdLow | ObstacleKind::BirdMid | ObstacleKind::BirdHigh
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ObstacleKind::CactusSmall => "CactusSmall",
            ObstacleKind::CactusMedium => "CactusMedium",
            ObstacleKind::CactusLarge => "CactusLarge",
            ObstacleKind::BirdLow => "BirdLow",
            ObstacleKind::BirdMid => "BirdMid",
            ObstacleKind::BirdHigh => "BirdHigh",
        }
    }
}

impl fmt::Display for ObstacleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An obstacle entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Leftward scroll speed, fixed at spawn
    pub speed: f32,
    /// Cleared once off-screen or credited; inactive obstacles are evicted
    pub active: bool,
    /// Wing frame for birds
    pub anim_frame: u8,
    anim_elapsed: f32,
}

impl Obstacle {
    pub fn new(kind: ObstacleKind, x: f32, ground_line: f32, speed: f32) -> Self {
        let (width, height) = kind.dimensions();
        Self {
            kind,
            x,
            y: ground_line - kind.top_elevation(),
            width,
            height,
            speed,
            active: true,
            anim_frame: 0,
            anim_elapsed: 0.0,
        }
    }

    /// Scroll left and deactivate once fully past the left edge
    pub fn update(&mut self, dt: f32) {
        if !self.active {
            return;
        }

        self.x -= self.speed * dt;

        if self.kind.is_bird() {
            self.anim_elapsed += dt;
            if self.anim_elapsed >= BIRD_ANIM_INTERVAL {
                self.anim_frame = (self.anim_frame + 1) % BIRD_ANIM_FRAMES;
                self.anim_elapsed = 0.0;
            }
        }

        if self.is_off_screen() {
            self.active = false;
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn is_off_screen(&self) -> bool {
        self.right() < 0.0
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}
