//! Leaderboard
//!
//! Persisted as a JSON array, keeps the 10 fastest games. Ties on time go
//! to the game with fewer moves; full ties keep the earlier entry first.

use serde::{Deserialize, Serialize};

use crate::sim::format_time;
use crate::storage::{KeyValueStore, StorageError};

/// Maximum number of scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Name recorded when the player leaves the field blank
pub const DEFAULT_PLAYER_NAME: &str = "Anônimo";

/// Shown in place of an empty leaderboard
pub const EMPTY_LEADERBOARD_MESSAGE: &str = "Ainda não há pontuações. Jogue uma partida!";

/// A single finished game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    #[serde(rename = "name")]
    pub player_name: String,
    /// Elapsed time as `MM:SS`
    #[serde(rename = "time")]
    pub formatted_time: String,
    #[serde(rename = "seconds")]
    pub elapsed_seconds: u32,
    #[serde(rename = "moves")]
    pub move_count: u32,
}

impl ScoreEntry {
    /// Build an entry, trimming the name and substituting the default when blank
    pub fn new(player_name: &str, elapsed_seconds: u32, move_count: u32) -> Self {
        let trimmed = player_name.trim();
        let player_name = if trimmed.is_empty() {
            DEFAULT_PLAYER_NAME
        } else {
            trimmed
        };
        Self {
            player_name: player_name.to_string(),
            formatted_time: format_time(elapsed_seconds),
            elapsed_seconds,
            move_count,
        }
    }

    fn rank_key(&self) -> (u32, u32) {
        (self.elapsed_seconds, self.move_count)
    }
}

/// Top-10 leaderboard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Leaderboard {
    pub entries: Vec<ScoreEntry>,
}

impl Leaderboard {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "musicalMemoryScores";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Parse stored JSON; anything unreadable counts as an empty board
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Leaderboard>(json) {
            Ok(mut board) => {
                board.normalize();
                board
            }
            Err(e) => {
                log::warn!("Discarding unreadable leaderboard: {}", e);
                Self::new()
            }
        }
    }

    pub fn to_json(&self) -> String {
        // Vec of plain structs with string/integer fields cannot fail to serialize
        serde_json::to_string(self).unwrap_or_else(|_| "[]".to_string())
    }

    /// Add a score, keep the list sorted and capped
    ///
    /// Returns the rank achieved (1-indexed), or `None` if the entry did not
    /// make the cut.
    pub fn add(&mut self, entry: ScoreEntry) -> Option<usize> {
        let key = entry.rank_key();
        // Insert after every entry that ranks equal or better
        let pos = self.entries.partition_point(|e| e.rank_key() <= key);
        self.entries.insert(pos, entry);
        self.entries.truncate(MAX_HIGH_SCORES);
        (pos < MAX_HIGH_SCORES).then_some(pos + 1)
    }

    /// Rank a finished game would achieve, without adding it
    pub fn potential_rank(&self, elapsed_seconds: u32, move_count: u32) -> Option<usize> {
        let pos = self
            .entries
            .partition_point(|e| e.rank_key() <= (elapsed_seconds, move_count));
        (pos < MAX_HIGH_SCORES).then_some(pos + 1)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fastest game (if any)
    pub fn best(&self) -> Option<&ScoreEntry> {
        self.entries.first()
    }

    /// Re-establish ordering and cap after loading foreign data
    fn normalize(&mut self) {
        self.entries.sort_by_key(ScoreEntry::rank_key);
        self.entries.truncate(MAX_HIGH_SCORES);
    }

    /// Load from a store; missing or malformed data yields an empty board
    pub fn load(store: &impl KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => {
                let board = Self::from_json(&json);
                log::info!("Loaded {} scores", board.entries.len());
                board
            }
            Ok(None) => {
                log::info!("No scores found, starting fresh");
                Self::new()
            }
            Err(e) => {
                log::warn!("Could not read scores: {}", e);
                Self::new()
            }
        }
    }

    pub fn save(&self, store: &mut impl KeyValueStore) -> Result<(), StorageError> {
        store.set(Self::STORAGE_KEY, &self.to_json())?;
        log::info!("Scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn entry(name: &str, seconds: u32, moves: u32) -> ScoreEntry {
        ScoreEntry::new(name, seconds, moves)
    }

    #[test]
    fn test_blank_name_defaults() {
        assert_eq!(entry("", 10, 7).player_name, "Anônimo");
        assert_eq!(entry("   ", 10, 7).player_name, "Anônimo");
        assert_eq!(entry("  Ana ", 10, 7).player_name, "Ana");
    }

    #[test]
    fn test_entry_formats_time() {
        assert_eq!(entry("a", 83, 9).formatted_time, "01:23");
    }

    #[test]
    fn test_sorted_by_time_then_moves() {
        let mut board = Leaderboard::new();
        assert_eq!(board.add(entry("slow", 90, 7)), Some(1));
        assert_eq!(board.add(entry("fast", 30, 12)), Some(1));
        assert_eq!(board.add(entry("tidy", 30, 8)), Some(1));
        assert_eq!(board.add(entry("tie", 30, 8)), Some(2));

        let names: Vec<&str> = board.entries.iter().map(|e| e.player_name.as_str()).collect();
        assert_eq!(names, vec!["tidy", "tie", "fast", "slow"]);
        assert_eq!(board.best().unwrap().player_name, "tidy");
    }

    #[test]
    fn test_capped_at_ten() {
        let mut board = Leaderboard::new();
        for i in 0..MAX_HIGH_SCORES as u32 {
            board.add(entry("p", 10 + i, 7));
        }
        assert_eq!(board.potential_rank(100, 7), None);
        assert_eq!(board.add(entry("late", 100, 7)), None);
        assert_eq!(board.entries.len(), MAX_HIGH_SCORES);

        assert_eq!(board.potential_rank(5, 7), Some(1));
        assert_eq!(board.add(entry("early", 5, 7)), Some(1));
        assert_eq!(board.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(board.entries.last().unwrap().elapsed_seconds, 18);
    }

    #[test]
    fn test_json_uses_storage_field_names() {
        let mut board = Leaderboard::new();
        board.add(entry("Ana", 42, 9));
        assert_eq!(
            board.to_json(),
            r#"[{"name":"Ana","time":"00:42","seconds":42,"moves":9}]"#
        );
    }

    #[test]
    fn test_malformed_json_is_empty() {
        assert!(Leaderboard::from_json("not json").is_empty());
        assert!(Leaderboard::from_json("null").is_empty());
        assert!(Leaderboard::from_json(r#"{"name":"x"}"#).is_empty());
    }

    #[test]
    fn test_loaded_data_is_normalized() {
        let json = r#"[
            {"name":"b","time":"00:50","seconds":50,"moves":7},
            {"name":"a","time":"00:20","seconds":20,"moves":7}
        ]"#;
        let board = Leaderboard::from_json(json);
        assert_eq!(board.entries[0].player_name, "a");
    }

    #[test]
    fn test_load_and_save_through_store() {
        let mut store = MemoryStore::new();
        assert!(Leaderboard::load(&store).is_empty());

        let mut board = Leaderboard::new();
        board.add(entry("", 61, 10));
        board.save(&mut store).unwrap();

        let loaded = Leaderboard::load(&store);
        assert_eq!(loaded, board);
        assert_eq!(loaded.entries[0].player_name, DEFAULT_PLAYER_NAME);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn stays_sorted_and_capped(
                scores in proptest::collection::vec((0u32..600, 7u32..60), 0..40)
            ) {
                let mut board = Leaderboard::new();
                for (seconds, moves) in scores {
                    board.add(ScoreEntry::new("p", seconds, moves));
                    prop_assert!(board.entries.len() <= MAX_HIGH_SCORES);
                    prop_assert!(board
                        .entries
                        .windows(2)
                        .all(|w| w[0].rank_key() <= w[1].rank_key()));
                }
            }
        }
    }
}
