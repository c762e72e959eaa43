//! High score persistence
//!
//! A single best score, read once at startup and written at most once per
//! run. The file store always rewrites the whole file.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Directory under the user's home holding the score file
pub const SCORE_DIR: &str = ".dino-dash";
/// Score file name
pub const SCORE_FILE: &str = "scores.json";

/// Errors from reading or writing the high score
#[derive(Debug, Clone, PartialEq)]
pub enum HighScoreError {
    Io(String),
    Parse(String),
    /// No home directory to place the default score file in
    NoHomeDir,
}

impl fmt::Display for HighScoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HighScoreError::Io(msg) => write!(f, "high score I/O error: {}", msg),
            HighScoreError::Parse(msg) => write!(f, "high score file is corrupt: {}", msg),
            HighScoreError::NoHomeDir => write!(f, "could not determine home directory"),
        }
    }
}

impl std::error::Error for HighScoreError {}

impl From<std::io::Error> for HighScoreError {
    fn from(e: std::io::Error) -> Self {
        HighScoreError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for HighScoreError {
    fn from(e: serde_json::Error) -> Self {
        HighScoreError::Parse(e.to_string())
    }
}

/// Where the best score lives between runs
pub trait HighScoreStore {
    /// Stored high score; 0 when nothing has been saved yet
    fn load(&self) -> Result<u64, HighScoreError>;

    /// Replace the stored high score
    fn save(&mut self, score: u64) -> Result<(), HighScoreError>;
}

/// On-disk layout of the score file
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct ScoreFile {
    high_score: u64,
}

/// JSON file store, `{"high_score": n}`
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `~/.dino-dash/scores.json`
    pub fn default_location() -> Result<Self, HighScoreError> {
        let home = dirs::home_dir().ok_or(HighScoreError::NoHomeDir)?;
        Ok(Self::new(home.join(SCORE_DIR).join(SCORE_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HighScoreStore for JsonFileStore {
    fn load(&self) -> Result<u64, HighScoreError> {
        if !self.path.exists() {
            log::info!("No high score file at {}", self.path.display());
            return Ok(0);
        }

        let json = fs::read_to_string(&self.path)?;
        let file: ScoreFile = serde_json::from_str(&json)?;
        log::info!(
            "Loaded high score {} from {}",
            file.high_score,
            self.path.display()
        );
        Ok(file.high_score)
    }

    fn save(&mut self, score: u64) -> Result<(), HighScoreError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }

        // Write aside then rename so a crash never leaves a torn file
        let json = serde_json::to_string(&ScoreFile { high_score: score })?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;

        log::info!("High score {} saved to {}", score, self.path.display());
        Ok(())
    }
}

/// In-memory store for tests and `--no-save`
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    high_score: u64,
    saves: u32,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new(high_score: u64) -> Self {
        Self {
            high_score,
            ..Default::default()
        }
    }

    /// A store whose writes always fail
    pub fn failing(high_score: u64) -> Self {
        Self {
            high_score,
            fail_writes: true,
            ..Default::default()
        }
    }

    /// Number of successful saves
    pub fn saves(&self) -> u32 {
        self.saves
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&self) -> Result<u64, HighScoreError> {
        Ok(self.high_score)
    }

    fn save(&mut self, score: u64) -> Result<(), HighScoreError> {
        if self.fail_writes {
            return Err(HighScoreError::Io("write disabled".to_string()));
        }
        self.high_score = score;
        self.saves += 1;
        Ok(())
    }
}

impl<S: HighScoreStore + ?Sized> HighScoreStore for Box<S> {
    fn load(&self) -> Result<u64, HighScoreError> {
        (**self).load()
    }

    fn save(&mut self, score: u64) -> Result<(), HighScoreError> {
        (**self).save(score)
    }
}
