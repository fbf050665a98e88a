//! Campaign save record and leaderboard storage
//!
//! Features:
//! - JSON record with the legacy field names (`easyleft`, ...)
//! - Atomic writes (tmp → save)
//! - In-memory store for tests and headless hosts

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::highscores::HighScores;

/// Boss result remembered across sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Success {
    /// Boss not beaten or not reached yet
    #[default]
    Pending,
    /// Player survived the boss timer
    Escaped,
    /// Boss took the player's last life
    Defeated,
}

impl TryFrom<u8> for Success {
    type Error = PersistenceError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Success::Pending),
            1 => Ok(Success::Escaped),
            2 => Ok(Success::Defeated),
            _ => Err(PersistenceError::InvalidField {
                field: "success",
                value: value.to_string(),
            }),
        }
    }
}

impl From<Success> for u8 {
    fn from(success: Success) -> u8 {
        match success {
            Success::Pending => 0,
            Success::Escaped => 1,
            Success::Defeated => 2,
        }
    }
}

/// Persisted campaign progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveRecord {
    /// Run index of the next normal run (passed runs + 1)
    pub times: u32,
    #[serde(rename = "easyleft")]
    pub easy_left: u32,
    #[serde(rename = "mediumleft")]
    pub medium_left: u32,
    #[serde(rename = "hardleft")]
    pub hard_left: u32,
    pub success: Success,
}

#[derive(Debug)]
pub enum PersistenceError {
    Io(io::Error),
    Malformed(serde_json::Error),
    InvalidField { field: &'static str, value: String },
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "storage i/o failed: {err}"),
            Self::Malformed(err) => write!(f, "malformed save data: {err}"),
            Self::InvalidField { field, value } => {
                write!(f, "invalid value for `{field}`: {value}")
            }
        }
    }
}

impl std::error::Error for PersistenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Malformed(err) => Some(err),
            Self::InvalidField { .. } => None,
        }
    }
}

impl From<io::Error> for PersistenceError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err)
    }
}

/// Where the campaign record and leaderboard live
pub trait SaveStore {
    /// `None` when no campaign was ever saved
    fn load_record(&mut self) -> Result<Option<SaveRecord>, PersistenceError>;
    fn save_record(&mut self, record: &SaveRecord) -> Result<(), PersistenceError>;
    /// Empty board when none was saved
    fn load_leaderboard(&mut self) -> Result<HighScores, PersistenceError>;
    fn save_leaderboard(&mut self, board: &HighScores) -> Result<(), PersistenceError>;
}

/// JSON files in one directory
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    const RECORD_FILE: &'static str = "save.json";
    const LEADERBOARD_FILE: &'static str = "high_scores.json";

    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read<T: serde::de::DeserializeOwned>(&self, name: &str) -> Result<Option<T>, PersistenceError> {
        let path = self.dir.join(name);
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(serde_json::from_str(&json)?))
    }

    /// Write through a temp file so a crash never leaves a torn save
    fn write<T: Serialize>(&self, name: &str, value: &T) -> Result<(), PersistenceError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(name);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(value)?)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

impl SaveStore for JsonFileStore {
    fn load_record(&mut self) -> Result<Option<SaveRecord>, PersistenceError> {
        let record = self.read(Self::RECORD_FILE)?;
        if record.is_none() {
            log::info!("No save record in {}", self.dir.display());
        }
        Ok(record)
    }

    fn save_record(&mut self, record: &SaveRecord) -> Result<(), PersistenceError> {
        self.write(Self::RECORD_FILE, record)?;
        log::info!("Save record written (run {})", record.times);
        Ok(())
    }

    fn load_leaderboard(&mut self) -> Result<HighScores, PersistenceError> {
        Ok(self.read(Self::LEADERBOARD_FILE)?.unwrap_or_default())
    }

    fn save_leaderboard(&mut self, board: &HighScores) -> Result<(), PersistenceError> {
        self.write(Self::LEADERBOARD_FILE, board)?;
        log::info!("High scores saved ({} entries)", board.entries.len());
        Ok(())
    }
}

/// Volatile store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub record: Option<SaveRecord>,
    pub leaderboard: HighScores,
}

impl SaveStore for MemoryStore {
    fn load_record(&mut self) -> Result<Option<SaveRecord>, PersistenceError> {
        Ok(self.record)
    }

    fn save_record(&mut self, record: &SaveRecord) -> Result<(), PersistenceError> {
        self.record = Some(*record);
        Ok(())
    }

    fn load_leaderboard(&mut self) -> Result<HighScores, PersistenceError> {
        Ok(self.leaderboard.clone())
    }

    fn save_leaderboard(&mut self, board: &HighScores) -> Result<(), PersistenceError> {
        self.leaderboard = board.clone();
        Ok(())
    }
}
