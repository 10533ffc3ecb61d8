//! Top-five leaderboard plus the persisted best score
//!
//! Persisted through a key-value store, tracks the top 5 runs plus the
//! all-time best score as a separate scalar.

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, load_json, save_json};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 5;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Final score of the run
    pub score: u64,
    /// Distance travelled
    pub distance: f32,
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Storage key for the leaderboard list
    pub const STORAGE_KEY: &'static str = "city_runner_leaderboard";
    /// Storage key for the best score scalar
    pub const BEST_SCORE_KEY: &'static str = "city_runner_high_score";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score would make the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        self.entries.len() < MAX_HIGH_SCORES
            || self.entries.last().is_none_or(|lowest| score > lowest.score)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Record a finished run, keeping the list sorted descending and
    /// truncated to the top 5. Returns the rank achieved, if any.
    pub fn add_score(&mut self, score: u64, distance: f32) -> Option<usize> {
        self.entries.push(HighScoreEntry { score, distance });
        // Stable sort: earlier runs keep precedence on ties
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_HIGH_SCORES);

        let rank = self
            .entries
            .iter()
            .rposition(|e| e.score == score && e.distance == distance)
            .map(|i| i + 1);
        if let Some(rank) = rank {
            log::info!("Leaderboard: score {} ranked #{}", score, rank);
        }
        rank
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best run on the board
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Scores in rank order
    pub fn scores(&self) -> Vec<u64> {
        self.entries.iter().map(|e| e.score).collect()
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Load the leaderboard; missing or corrupt data yields an empty list
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match load_json::<Vec<HighScoreEntry>>(store, Self::STORAGE_KEY) {
            Ok(Some(mut entries)) => {
                entries.sort_by(|a, b| b.score.cmp(&a.score));
                entries.truncate(MAX_HIGH_SCORES);
                log::info!("Loaded {} high scores", entries.len());
                Self { entries }
            }
            Ok(None) => {
                log::info!("No high scores found, starting fresh");
                Self::new()
            }
            Err(e) => {
                log::warn!("Discarding unreadable leaderboard: {}", e);
                Self::new()
            }
        }
    }

    /// Save the leaderboard
    pub fn save(&self, store: &mut dyn KeyValueStore) {
        match save_json(store, Self::STORAGE_KEY, &self.entries) {
            Ok(()) => log::info!("High scores saved ({} entries)", self.entries.len()),
            Err(e) => log::warn!("Failed to save high scores: {}", e),
        }
    }

    /// Remove the persisted leaderboard
    pub fn clear_saved(store: &mut dyn KeyValueStore) {
        if let Err(e) = store.remove(Self::STORAGE_KEY) {
            log::warn!("Failed to clear high scores: {}", e);
        }
    }

    /// Load the best score scalar (0 when absent or unreadable)
    pub fn load_best(store: &dyn KeyValueStore) -> u64 {
        match load_json::<u64>(store, Self::BEST_SCORE_KEY) {
            Ok(best) => best.unwrap_or(0),
            Err(e) => {
                log::warn!("Discarding unreadable best score: {}", e);
                0
            }
        }
    }

    /// Save the best score scalar
    pub fn save_best(store: &mut dyn KeyValueStore, best: u64) {
        if let Err(e) = save_json(store, Self::BEST_SCORE_KEY, &best) {
            log::warn!("Failed to save best score: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_keeps_top_five_sorted_descending() {
        let mut scores = HighScores::new();
        for (i, s) in [500, 100, 900, 300, 700, 200].into_iter().enumerate() {
            scores.add_score(s, i as f32 * 10.0);
        }
        assert_eq!(scores.scores(), vec![900, 700, 500, 300, 200]);
    }

    #[test]
    fn test_add_score_reports_rank() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score(500, 50.0), Some(1));
        assert_eq!(scores.add_score(900, 90.0), Some(1));
        assert_eq!(scores.add_score(700, 70.0), Some(2));
        assert_eq!(scores.potential_rank(800), Some(2));
        for s in [600, 550] {
            scores.add_score(s, 1.0);
        }
        // Full board: lower than the last entry no longer qualifies
        assert!(!scores.qualifies(100));
        assert_eq!(scores.add_score(100, 1.0), None);
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
    }

    #[test]
    fn test_persisted_roundtrip() {
        let mut store = MemoryStore::new();
        let mut scores = HighScores::new();
        scores.add_score(1234, 98.7);
        scores.add_score(42, 3.0);
        scores.save(&mut store);

        let loaded = HighScores::load(&store);
        assert_eq!(loaded.entries, scores.entries);

        HighScores::clear_saved(&mut store);
        assert!(HighScores::load(&store).is_empty());
    }

    #[test]
    fn test_corrupt_leaderboard_degrades_to_empty() {
        let mut store = MemoryStore::new();
        store.set(HighScores::STORAGE_KEY, "[{\"score\":").unwrap();
        store.set(HighScores::BEST_SCORE_KEY, "banana").unwrap();
        assert!(HighScores::load(&store).is_empty());
        assert_eq!(HighScores::load_best(&store), 0);
    }

    #[test]
    fn test_best_score_roundtrip() {
        let mut store = MemoryStore::new();
        assert_eq!(HighScores::load_best(&store), 0);
        HighScores::save_best(&mut store, 7777);
        assert_eq!(HighScores::load_best(&store), 7777);
    }
}
