//! Game configuration
//!
//! A plain data struct that must pass [`Config::validate`] before any
//! simulation state is built from it. Invalid values are rejected, never
//! clamped.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::sim::JumpProfile;

/// Smallest playable screen
pub const MIN_SCREEN_WIDTH: u16 = 40;
pub const MIN_SCREEN_HEIGHT: u16 = 10;
/// Highest supported tick rate
pub const MAX_TARGET_FPS: u32 = 120;

/// Errors raised while building configuration or simulation state
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A field that must be strictly positive (and finite) was not
    NonPositive { field: &'static str },
    /// A rate or offset is negative or not a number
    Negative { field: &'static str },
    /// A field is below its minimum
    TooSmall {
        field: &'static str,
        min: u32,
        actual: u32,
    },
    /// A field is above its maximum
    TooLarge {
        field: &'static str,
        max: u32,
        actual: u32,
    },
    /// The configured minimum gap cannot be crossed with the configured jump
    GapTooSmall { min_gap: f32, required: f32 },
    /// Spawner bounds are inverted or empty (min > max)
    InvalidRange { field: &'static str, min: f32, max: f32 },
    /// The jump is too low to clear any obstacle kind
    NoClearableObstacles { max_height: f32 },
    /// Config file could not be read or written
    Io(String),
    /// Config file is not valid JSON
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonPositive { field } => write!(f, "{} must be positive", field),
            ConfigError::Negative { field } => write!(f, "{} must not be negative", field),
            ConfigError::TooSmall { field, min, actual } => {
                write!(f, "{} too small: {} (minimum {})", field, actual, min)
            }
            ConfigError::TooLarge { field, max, actual } => {
                write!(f, "{} too high: {} (maximum {})", field, actual, max)
            }
            ConfigError::GapTooSmall { min_gap, required } => write!(
                f,
                "minimum obstacle gap {:.2} is shorter than one jump ({:.2} units)",
                min_gap, required
            ),
            ConfigError::InvalidRange { field, min, max } => {
                write!(f, "{} range is invalid: [{}, {}]", field, min, max)
            }
            ConfigError::NoClearableObstacles { max_height } => write!(
                f,
                "jump height {:.2} cannot clear any obstacle",
                max_height
            ),
            ConfigError::Io(msg) => write!(f, "I/O error: {}", msg),
            ConfigError::Parse(msg) => write!(f, "parse error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e.to_string())
    }
}

/// Game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // === Screen ===
    pub screen_width: u16,
    pub screen_height: u16,

    // === Timing ===
    pub target_fps: u32,

    // === Physics ===
    /// Initial upward speed of a jump (units/s)
    pub jump_velocity: f32,
    /// Downward acceleration (units/s²)
    pub gravity: f32,
    /// Base obstacle scroll speed (units/s)
    pub obstacle_speed: f32,

    // === Gameplay ===
    /// Base spawn rate (obstacles/s)
    pub spawn_rate: f32,

    // === Rendering ===
    pub use_unicode: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            screen_width: 80,
            screen_height: 20,
            target_fps: 15,
            jump_velocity: 25.0,
            gravity: 60.0,
            obstacle_speed: 18.0,
            spawn_rate: 2.0,
            use_unicode: true,
        }
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field })
    }
}

impl Config {
    /// Check every field, reporting the first problem found
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.screen_width == 0 {
            return Err(ConfigError::NonPositive {
                field: "screen width",
            });
        }
        if self.screen_height == 0 {
            return Err(ConfigError::NonPositive {
                field: "screen height",
            });
        }
        if self.target_fps == 0 {
            return Err(ConfigError::NonPositive {
                field: "target FPS",
            });
        }
        positive("jump velocity", self.jump_velocity)?;
        positive("gravity", self.gravity)?;
        positive("obstacle speed", self.obstacle_speed)?;
        positive("spawn rate", self.spawn_rate)?;

        if self.screen_width < MIN_SCREEN_WIDTH {
            return Err(ConfigError::TooSmall {
                field: "screen width",
                min: MIN_SCREEN_WIDTH as u32,
                actual: self.screen_width as u32,
            });
        }
        if self.screen_height < MIN_SCREEN_HEIGHT {
            return Err(ConfigError::TooSmall {
                field: "screen height",
                min: MIN_SCREEN_HEIGHT as u32,
                actual: self.screen_height as u32,
            });
        }
        if self.target_fps > MAX_TARGET_FPS {
            return Err(ConfigError::TooLarge {
                field: "target FPS",
                max: MAX_TARGET_FPS,
                actual: self.target_fps,
            });
        }
        Ok(())
    }

    /// Wall-clock time between ticks
    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.target_fps.max(1) as f64)
    }

    /// Analytic jump arc for this configuration
    pub fn jump_profile(&self) -> JumpProfile {
        JumpProfile::new(self.jump_velocity, self.gravity)
    }

    /// Y of the ground line (obstacles stand on it)
    pub fn ground_line(&self) -> f32 {
        self.screen_height as f32 - crate::consts::GROUND_MARGIN
    }

    /// Load from a JSON file; missing fields take their defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&json)?;
        config.validate()?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Write as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Config saved to {}", path.display());
        Ok(())
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Config{{Screen: {}x{}, FPS: {}, Jump: {:.1}, Gravity: {:.1}, Speed: {:.1}, Spawn: {:.1}}}",
            self.screen_width,
            self.screen_height,
            self.target_fps,
            self.jump_velocity,
            self.gravity,
            self.obstacle_speed,
            self.spawn_rate
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.screen_width, 80);
        assert_eq!(config.target_fps, 15);
        assert!(config.use_unicode);
    }

    #[test]
    fn test_rejects_non_positive_fields() {
        let cases: Vec<(Box<dyn Fn(&mut Config)>, &str)> = vec![
            (Box::new(|c| c.screen_width = 0), "screen width"),
            (Box::new(|c| c.screen_height = 0), "screen height"),
            (Box::new(|c| c.target_fps = 0), "target FPS"),
            (Box::new(|c| c.jump_velocity = 0.0), "jump velocity"),
            (Box::new(|c| c.gravity = -1.0), "gravity"),
            (Box::new(|c| c.obstacle_speed = f32::NAN), "obstacle speed"),
            (Box::new(|c| c.spawn_rate = 0.0), "spawn rate"),
        ];
        for (mutate, field) in cases {
            let mut config = Config::default();
            mutate(&mut config);
            assert_eq!(config.validate(), Err(ConfigError::NonPositive { field }));
        }
    }

    #[test]
    fn test_range_limits() {
        let mut config = Config::default();
        config.screen_width = 39;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TooSmall { field: "screen width", .. })
        ));
        config.screen_width = 40;
        assert!(config.validate().is_ok());

        config.screen_height = 9;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TooSmall { field: "screen height", .. })
        ));
        config.screen_height = 10;

        config.target_fps = 121;
        assert!(matches!(config.validate(), Err(ConfigError::TooLarge { .. })));
        config.target_fps = 120;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let err = ConfigError::TooSmall {
            field: "screen width",
            min: 40,
            actual: 20,
        };
        assert_eq!(err.to_string(), "screen width too small: 20 (minimum 40)");
    }

    #[test]
    fn test_frame_duration() {
        let config = Config {
            target_fps: 20,
            ..Default::default()
        };
        assert_eq!(config.frame_duration(), Duration::from_millis(50));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = Config {
            target_fps: 30,
            use_unicode: false,
            ..Default::default()
        };
        config.save(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn test_load_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"gravity": 70.0}"#).unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.gravity, 70.0);
        assert_eq!(config.screen_width, 80);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"target_fps": 500}"#).unwrap();
        assert!(matches!(
            Config::load(&path),
            Err(ConfigError::TooLarge { .. })
        ));

        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(Config::load(&path), Err(ConfigError::Parse(_))));
    }
}
