//! Endless-run leaderboard
//!
//! Tracks the top 3 survival times, each tagged with a 2-letter name.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 3;

/// Letters in a leaderboard name
pub const NAME_LEN: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    WrongLength { len: usize },
    NotALetter { ch: char },
}

impl fmt::Display for NameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongLength { len } => {
                write!(f, "name must be {NAME_LEN} letters, got {len}")
            }
            Self::NotALetter { ch } => write!(f, "name may only contain A-Z, got {ch:?}"),
        }
    }
}

impl std::error::Error for NameError {}

/// Two upper-case ASCII letters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlayerName(String);

impl PlayerName {
    /// Validate and upper-case a name
    pub fn new(name: &str) -> Result<Self, NameError> {
        let len = name.chars().count();
        if len != NAME_LEN {
            return Err(NameError::WrongLength { len });
        }
        if let Some(ch) = name.chars().find(|c| !c.is_ascii_alphabetic()) {
            return Err(NameError::NotALetter { ch });
        }
        Ok(Self(name.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PlayerName {
    type Error = NameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<PlayerName> for String {
    fn from(name: PlayerName) -> String {
        name.0
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub name: PlayerName,
    /// Survival time in seconds
    pub time: f32,
}

/// High score leaderboard, sorted by descending time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(from = "StoredBoard")]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

/// Board as found on disk, possibly hand-edited
#[derive(Deserialize)]
struct StoredBoard {
    #[serde(default)]
    entries: Vec<HighScoreEntry>,
}

impl From<StoredBoard> for HighScores {
    fn from(stored: StoredBoard) -> Self {
        let mut entries = stored.entries;
        entries.sort_by(|a, b| b.time.total_cmp(&a.time));
        entries.truncate(MAX_HIGH_SCORES);
        Self { entries }
    }
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a time qualifies for the leaderboard
    pub fn qualifies(&self, time: f32) -> bool {
        if time <= 0.0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if time beats the lowest entry
        self.entries.last().map(|e| time > e.time).unwrap_or(true)
    }

    /// Get the rank a time would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, time: f32) -> Option<usize> {
        if !self.qualifies(time) {
            return None;
        }
        let rank = self.entries.iter().position(|e| time > e.time);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a new time to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_score(&mut self, name: PlayerName, time: f32) -> Option<usize> {
        if !self.qualifies(time) {
            return None;
        }

        let entry = HighScoreEntry { name, time };

        // Find insertion point (sorted descending by time)
        let pos = self.entries.iter().position(|e| time > e.time);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        // Trim to max size
        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the best time (if any)
    pub fn top_time(&self) -> Option<f32> {
        self.entries.first().map(|e| e.time)
    }
}
