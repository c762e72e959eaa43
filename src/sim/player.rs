//! The player character
//!
//! The player never moves horizontally; the world scrolls past. Vertical
//! motion is a two-state machine (grounded / airborne) integrated with
//! position-then-gravity semi-implicit Euler so jump arcs are reproducible.

use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::consts::*;

/// Closed-form jump arc for a launch speed and gravity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JumpProfile {
    pub jump_velocity: f32,
    pub gravity: f32,
}

impl JumpProfile {
    pub fn new(jump_velocity: f32, gravity: f32) -> Self {
        Self {
            jump_velocity,
            gravity,
        }
    }

    /// Seconds from take-off to apex
    pub fn time_to_peak(&self) -> f32 {
        self.jump_velocity / self.gravity
    }

    /// Apex height above the ground
    pub fn max_height(&self) -> f32 {
        let t = self.time_to_peak();
        self.jump_velocity * t - 0.5 * self.gravity * t * t
    }

    /// Seconds from take-off to landing
    pub fn air_time(&self) -> f32 {
        2.0 * self.time_to_peak()
    }

    /// Horizontal distance the world scrolls during one jump
    pub fn reach(&self, scroll_speed: f32) -> f32 {
        self.air_time() * scroll_speed
    }

    /// Seconds the arc spends at or above `height`; zero if it never gets
    /// that high
    pub fn time_above(&self, height: f32) -> f32 {
        if height <= 0.0 {
            return self.air_time();
        }
        let discriminant = self.jump_velocity * self.jump_velocity - 2.0 * self.gravity * height;
        if discriminant < 0.0 {
            return 0.0;
        }
        2.0 * discriminant.sqrt() / self.gravity
    }
}

/// The player-controlled runner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Fixed horizontal position
    pub x: f32,
    /// Top of the sprite; `y <= ground_level` always
    pub y: f32,
    /// Vertical velocity, negative is upward
    pub velocity_y: f32,
    pub is_jumping: bool,
    pub is_running: bool,
    /// `y` when standing
    pub ground_level: f32,
    pub width: f32,
    pub height: f32,
    /// Running animation frame, frozen while airborne
    pub anim_frame: u8,
    /// Time accumulated toward the next animation frame
    anim_elapsed: f32,
    anim_interval: f32,
}

impl Player {
    /// Create a standing player whose feet rest on `ground_line`
    pub fn new(ground_line: f32) -> Self {
        let ground_level = ground_line - PLAYER_HEIGHT;
        Self {
            x: PLAYER_X,
            y: ground_level,
            velocity_y: 0.0,
            is_jumping: false,
            is_running: true,
            ground_level,
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            anim_frame: 0,
            anim_elapsed: 0.0,
            anim_interval: PLAYER_ANIM_INTERVAL,
        }
    }

    /// Put the player back on the ground for a new run
    pub fn reset(&mut self) {
        self.y = self.ground_level;
        self.velocity_y = 0.0;
        self.is_jumping = false;
        self.is_running = true;
        self.reset_animation();
    }

    pub fn is_on_ground(&self) -> bool {
        self.y >= self.ground_level && !self.is_jumping
    }

    /// Start a jump. Ignored unless grounded (no double jump, no buffering).
    pub fn jump(&mut self, jump_velocity: f32) -> bool {
        if !self.is_on_ground() {
            return false;
        }
        self.is_jumping = true;
        self.velocity_y = -jump_velocity;
        self.is_running = false;
        true
    }

    /// Advance physics and animation by `dt` seconds
    pub fn update(&mut self, dt: f32, gravity: f32) {
        if self.is_jumping {
            // Position from this tick's velocity, then gravity for the next
            self.y += self.velocity_y * dt;
            self.velocity_y += gravity * dt;

            if self.y >= self.ground_level {
                self.y = self.ground_level;
                self.velocity_y = 0.0;
                self.is_jumping = false;
                self.is_running = true;
            }
        } else if self.is_running {
            self.advance_animation(dt);
        }
    }

    /// Step the running cycle by elapsed time
    pub fn advance_animation(&mut self, elapsed: f32) {
        self.anim_elapsed += elapsed;
        if self.anim_elapsed >= self.anim_interval {
            self.anim_frame = (self.anim_frame + 1) % PLAYER_ANIM_FRAMES;
            self.anim_elapsed = 0.0;
        }
    }

    pub fn reset_animation(&mut self) {
        self.anim_frame = 0;
        self.anim_elapsed = 0.0;
    }

    pub fn set_animation_interval(&mut self, interval: f32) {
        self.anim_interval = interval;
    }

    pub fn animation_interval(&self) -> f32 {
        self.anim_interval
    }

    pub fn is_animating(&self) -> bool {
        self.is_running && !self.is_jumping
    }

    /// Height of the sprite's feet above the ground
    pub fn jump_height(&self) -> f32 {
        (self.ground_level - self.y).max(0.0)
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn player() -> Player {
        Player::new(20.0)
    }

    #[test]
    fn test_new_player_stands_on_ground() {
        let p = player();
        assert_eq!(p.ground_level, 14.0);
        assert_eq!(p.y, p.ground_level);
        assert!(p.is_on_ground());
        assert!(p.is_running);
        assert_eq!(p.bounds(), Rect::new(PLAYER_X, 14.0, 8.0, 6.0));
    }

    #[test]
    fn test_jump_from_ground() {
        let mut p = player();
        assert!(p.jump(25.0));
        assert!(p.is_jumping);
        assert!(!p.is_running);
        assert_eq!(p.velocity_y, -25.0);
        assert!(!p.is_on_ground());
    }

    #[test]
    fn test_jump_is_ignored_mid_air() {
        let mut p = player();
        p.jump(25.0);
        p.update(DT, 60.0);
        let velocity = p.velocity_y;
        assert!(!p.jump(25.0));
        assert_eq!(p.velocity_y, velocity);
    }

    #[test]
    fn test_position_uses_velocity_before_gravity() {
        let mut p = player();
        p.jump(20.0);
        p.update(0.1, 50.0);
        // y moves with -20, then velocity becomes -20 + 5
        assert!((p.y - (14.0 - 2.0)).abs() < 1e-5);
        assert!((p.velocity_y - (-15.0)).abs() < 1e-5);
    }

    #[test]
    fn test_landing_is_exact() {
        let mut p = player();
        p.jump(25.0);
        let mut ticks = 0;
        while p.is_jumping {
            p.update(DT, 60.0);
            assert!(p.y <= p.ground_level);
            ticks += 1;
            assert!(ticks < 1000, "never landed");
        }
        assert_eq!(p.y, p.ground_level);
        assert_eq!(p.velocity_y, 0.0);
        assert!(p.is_running);
        assert!(p.is_on_ground());
    }

    #[test]
    fn test_jump_peak_close_to_analytic() {
        let profile = JumpProfile::new(25.0, 60.0);
        let mut p = player();
        p.jump(profile.jump_velocity);
        let mut peak: f32 = 0.0;
        while p.is_jumping {
            p.update(1.0 / 240.0, profile.gravity);
            peak = peak.max(p.jump_height());
        }
        assert!((peak - profile.max_height()).abs() < 0.1);
    }

    #[test]
    fn test_animation_cycles_on_ground() {
        let mut p = player();
        p.update(0.1, 60.0);
        assert_eq!(p.anim_frame, 0);
        p.update(0.06, 60.0);
        assert_eq!(p.anim_frame, 1);
        for _ in 0..3 {
            p.update(0.15, 60.0);
        }
        assert_eq!(p.anim_frame, 0);
    }

    #[test]
    fn test_animation_frozen_while_airborne() {
        let mut p = player();
        p.update(0.15, 60.0);
        assert_eq!(p.anim_frame, 1);
        p.jump(25.0);
        p.update(0.2, 60.0);
        assert_eq!(p.anim_frame, 1);
        assert!(!p.is_animating());
    }

    #[test]
    fn test_reset_returns_to_ground() {
        let mut p = player();
        p.jump(25.0);
        p.update(0.1, 60.0);
        p.reset();
        assert_eq!(p.y, p.ground_level);
        assert_eq!(p.velocity_y, 0.0);
        assert!(p.is_on_ground());
        assert_eq!(p.anim_frame, 0);
    }

    #[test]
    fn test_jump_profile_reference_values() {
        let profile = JumpProfile::new(15.0, 50.0);
        assert!((profile.time_to_peak() - 0.3).abs() < 1e-6);
        assert!((profile.max_height() - 2.25).abs() < 1e-5);
        assert!((profile.air_time() - 0.6).abs() < 1e-6);
        assert!((profile.reach(10.0) - 6.0).abs() < 1e-5);
    }

    #[test]
    fn test_time_above_height() {
        let profile = JumpProfile::new(15.0, 50.0);
        assert!((profile.time_above(0.0) - profile.air_time()).abs() < 1e-6);
        // Above 2.0 from t=0.2 to t=0.4
        assert!((profile.time_above(2.0) - 0.2).abs() < 1e-5);
        assert!(profile.time_above(2.25).abs() < 1e-5);
        assert_eq!(profile.time_above(3.0), 0.0);
    }
}
