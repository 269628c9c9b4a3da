use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::GAME_IDENTITY;

const APP_DIR_NAME: &str = "power-snake";
const SCORE_FILE_NAME: &str = "scores.json";

/// Durable storage for the best score of a game identity.
pub trait HighScoreStore {
    /// Loads the stored high score, `0` when none exists yet.
    fn load(&self) -> io::Result<u32>;

    /// Replaces the stored high score.
    fn save(&mut self, score: u32) -> io::Result<()>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ScoreFile {
    high_scores: BTreeMap<String, u32>,
}

/// Returns the platform-correct score file path.
#[must_use]
pub fn scores_path() -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(SCORE_FILE_NAME);
    base
}

/// JSON score file shared by every game identity, one entry per key.
#[derive(Debug, Clone)]
pub struct JsonScoreStore {
    path: PathBuf,
    key: String,
}

impl JsonScoreStore {
    /// Store at the default data-directory location.
    #[must_use]
    pub fn new() -> Self {
        Self::at_path(scores_path())
    }

    #[must_use]
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            key: GAME_IDENTITY.to_owned(),
        }
    }

    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for JsonScoreStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HighScoreStore for JsonScoreStore {
    /// Returns `Ok(0)` when the score file does not yet exist (first run) and
    /// `Err` when it exists but cannot be read or parsed.
    fn load(&self) -> io::Result<u32> {
        let file = read_score_file(&self.path)?;
        Ok(file.high_scores.get(&self.key).copied().unwrap_or(0))
    }

    /// Rewrites the file, keeping entries stored under other keys.
    fn save(&mut self, score: u32) -> io::Result<()> {
        let mut file = match read_score_file(&self.path) {
            Ok(file) => file,
            Err(error) if error.kind() == io::ErrorKind::InvalidData => ScoreFile::default(),
            Err(error) => return Err(error),
        };
        file.high_scores.insert(self.key.clone(), score);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&file)
            .map_err(|error| io::Error::new(io::ErrorKind::InvalidData, error))?;

        fs::write(&self.path, json)
    }
}

fn read_score_file(path: &Path) -> io::Result<ScoreFile> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(ScoreFile::default()),
        Err(e) => return Err(e),
    };

    serde_json::from_str::<ScoreFile>(&raw).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Volatile store, used by tests and when persistence is unavailable.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct MemoryScoreStore {
    pub high_score: u32,
    pub saves: u32,
}

impl HighScoreStore for MemoryScoreStore {
    fn load(&self) -> io::Result<u32> {
        Ok(self.high_score)
    }

    fn save(&mut self, score: u32) -> io::Result<()> {
        self.high_score = score;
        self.saves += 1;
        Ok(())
    }
}
