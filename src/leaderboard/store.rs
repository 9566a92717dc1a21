//! File-backed leaderboard storage.
//!
//! Keeps the top scores in a single JSON file. All I/O errors are logged and
//! swallowed here; callers never see a failure, they just get an empty (or
//! unchanged) leaderboard.

use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use log::{error, warn};
use serde::{Serialize, Deserialize};
use uuid::Uuid;

use crate::config::leaderboard::LEADERBOARD_LIMIT;

/// One persisted leaderboard entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub id: String,
    pub name: String,
    pub score: u32,
    /// Unix timestamp in milliseconds of when the score was achieved.
    pub timestamp: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_combo: Option<u32>,
}

impl ScoreEntry {
    /// Build a new entry with a fresh unique id and the current timestamp.
    pub fn new(name: String, score: u32, max_combo: Option<u32>) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            score,
            timestamp,
            max_combo,
        }
    }
}

/// JSON-file store for the top scores.
pub struct LeaderboardStore {
    path: PathBuf,
}

impl LeaderboardStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the leaderboard, sorted by score descending and truncated to the
    /// configured limit. A missing or corrupt file yields an empty board.
    pub fn load(&self) -> Vec<ScoreEntry> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                error!("[Leaderboard] Failed to read {:?}: {}", self.path, e);
                return Vec::new();
            }
        };
        let mut entries: Vec<ScoreEntry> = match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("[Leaderboard] Corrupt leaderboard file {:?}: {}", self.path, e);
                return Vec::new();
            }
        };
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(LEADERBOARD_LIMIT);
        entries
    }

    /// Record a score. An existing player (matched by name) is only replaced
    /// when the new score is strictly better. The file is rewritten only if
    /// the entry actually made the top list.
    pub fn save_score(&self, entry: ScoreEntry) {
        let mut entries = self.load();

        if let Some(existing) = entries.iter_mut().find(|e| e.name == entry.name) {
            if entry.score > existing.score {
                *existing = entry.clone();
            }
        } else {
            entries.push(entry.clone());
        }

        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(LEADERBOARD_LIMIT);

        if entries.iter().any(|e| e.id == entry.id) {
            self.write(&entries);
        }
    }

    /// Remove every persisted score.
    pub fn clear(&self) {
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                error!("[Leaderboard] Failed to clear {:?}: {}", self.path, e);
            }
        }
    }

    fn write(&self, entries: &[ScoreEntry]) {
        let json = match serde_json::to_string(entries) {
            Ok(json) => json,
            Err(e) => {
                error!("[Leaderboard] Failed to serialize leaderboard: {}", e);
                return;
            }
        };
        if let Err(e) = fs::write(&self.path, json) {
            error!("[Leaderboard] Failed to write {:?}: {}", self.path, e);
        }
    }
}
