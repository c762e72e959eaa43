//! Terminal rendering
//!
//! Composes a [`Snapshot`] into a character frame and flushes the changes
//! through crossterm. Reads simulation state only; never mutates it.

pub mod frame;
pub mod sprites;

use std::io::{self, Write};

use crossterm::style::Color;

pub use frame::{Cell, FrameBuffer};

use crate::config::Config;
use crate::sim::{GamePhase, ObstacleKind, Snapshot};

const C_HUD: Color = Color::Yellow;
const C_RUNNER: Color = Color::Green;
const C_CACTUS: Color = Color::DarkGreen;
const C_BIRD: Color = Color::Magenta;
const C_CLOUD: Color = Color::White;
const C_HILL: Color = Color::DarkGrey;
const C_GROUND: Color = Color::DarkYellow;
const C_HINT: Color = Color::DarkGrey;
const C_TITLE: Color = Color::Cyan;
const C_ALERT: Color = Color::Red;

const TITLE: [&str; 3] = [
    "  ___  _             ___          _    ",
    " |   \\(_)_ _  ___   |   \\ __ _ __| |_  ",
    " | |) | | ' \\/ _ \\  | |) / _` (_-< ' \\ ",
];

pub struct Renderer {
    frame: FrameBuffer,
    unicode: bool,
    /// Row of the ground surface
    ground_row: i32,
}

impl Renderer {
    pub fn new(config: &Config) -> Self {
        Self {
            frame: FrameBuffer::new(config.screen_width, config.screen_height),
            unicode: config.use_unicode,
            ground_row: config.ground_line() as i32,
        }
    }

    /// Follow a terminal resize. The playfield keeps its size; the frame is
    /// reallocated and fully repainted.
    pub fn resize(&mut self, width: u16, height: u16) {
        log::debug!("Terminal resized to {}x{}", width, height);
        self.frame.resize(width, height);
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    /// Compose one frame for `snapshot`
    pub fn draw(&mut self, snapshot: &Snapshot) {
        self.frame.clear();
        match snapshot.phase {
            GamePhase::Menu => self.draw_menu(snapshot),
            GamePhase::Playing => {
                self.draw_world(snapshot);
                self.draw_hud(snapshot);
            }
            GamePhase::GameOver => {
                self.draw_world(snapshot);
                self.draw_hud(snapshot);
                self.draw_game_over(snapshot);
            }
        }
        self.draw_hint(snapshot.phase);
    }

    /// Flush the composed frame
    pub fn present(&mut self, out: &mut impl Write) -> io::Result<()> {
        self.frame.flush(out)
    }

    fn draw_world(&mut self, snapshot: &Snapshot) {
        self.draw_hills(&snapshot.hills);

        for cloud in &snapshot.clouds {
            let rows = sprites::cloud(cloud.variant, self.unicode);
            self.frame
                .put_sprite(cloud.x.round() as i32, cloud.y.round() as i32, rows, C_CLOUD);
        }

        self.draw_ground();

        for obstacle in &snapshot.obstacles {
            let rows = sprites::obstacle(obstacle.kind, obstacle.anim_frame, self.unicode);
            let color = match obstacle.kind {
                ObstacleKind::CactusSmall | ObstacleKind::CactusMedium | ObstacleKind::CactusLarge => {
                    C_CACTUS
                }
                _ => C_BIRD,
            };
            self.frame.put_sprite(
                obstacle.x.round() as i32,
                obstacle.y.round() as i32,
                rows,
                color,
            );
        }

        let player = &snapshot.player;
        let rows = sprites::runner(player.anim_frame, player.is_jumping, self.unicode);
        self.frame.put_sprite(
            player.x.round() as i32,
            player.y.round() as i32,
            &rows,
            C_RUNNER,
        );
    }

    fn draw_hills(&mut self, hills: &[f32]) {
        for (x, &here) in hills.iter().enumerate() {
            let left = if x > 0 { hills[x - 1] } else { here };
            let right = hills.get(x + 1).copied().unwrap_or(here);
            let ch = sprites::hill(left, here, right);
            let row = self.ground_row - here.round() as i32;
            self.frame.put(x as i32, row, ch, C_HILL);
        }
    }

    fn draw_ground(&mut self) {
        let ground = sprites::ground(self.unicode);
        for x in 0..self.frame.width() as i32 {
            self.frame.put(x, self.ground_row, ground, C_GROUND);
            if x % 7 == 3 {
                self.frame.put(x, self.ground_row + 1, '.', C_GROUND);
            }
        }
    }

    fn draw_hud(&mut self, snapshot: &Snapshot) {
        let left = format!("Score: {:>6}", snapshot.score);
        let right = format!("Hi: {:>6}", snapshot.high_score);
        self.frame.put_str(1, 0, &left, C_HUD);
        let x = self.frame.width() as i32 - right.chars().count() as i32 - 1;
        self.frame.put_str(x, 0, &right, C_HUD);
    }

    fn draw_menu(&mut self, snapshot: &Snapshot) {
        let top = (self.frame.height() as i32 / 2 - 5).max(1);
        for (i, row) in TITLE.iter().enumerate() {
            self.frame.put_centered(top + i as i32, row, C_TITLE);
        }
        self.frame
            .put_centered(top + 5, "Press SPACE to start", Color::White);
        self.frame.put_centered(
            top + 7,
            &format!("High score: {}", snapshot.high_score),
            C_HUD,
        );
        self.frame
            .put_centered(top + 9, "SPACE/UP jump   Q quit", C_HINT);
    }

    fn draw_game_over(&mut self, snapshot: &Snapshot) {
        let mid = self.frame.height() as i32 / 2 - 3;
        self.frame.put_centered(mid, "G A M E   O V E R", C_ALERT);
        self.frame.put_centered(
            mid + 2,
            &format!("Final score: {}", snapshot.score),
            Color::White,
        );
        if snapshot.new_high_score {
            self.frame.put_centered(mid + 3, "NEW HIGH SCORE!", C_HUD);
        }
    }

    fn draw_hint(&mut self, phase: GamePhase) {
        let hint = match phase {
            GamePhase::Menu => "SPACE start   Q quit",
            GamePhase::Playing => "SPACE/UP jump   Q quit",
            GamePhase::GameOver => "R restart   Q quit",
        };
        let row = self.frame.height() as i32 - 1;
        self.frame.put_centered(row, hint, C_HINT);
    }
}
