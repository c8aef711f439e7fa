//! High score leaderboard
//!
//! Finished runs are kept sorted by score, top 10. The view helpers sort
//! and rank entries for a leaderboard screen without drawing anything.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::platform::storage::{LeaderboardError, LeaderboardStore};
use crate::sim::{RunStats, World};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Name shown for records saved without one
pub const UNKNOWN_NAME: &str = "Unknown";

fn default_name() -> String {
    UNKNOWN_NAME.to_string()
}

fn default_stage() -> u32 {
    1
}

/// A single leaderboard record. Missing fields in stored JSON take
/// their defaults, so older records still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub score: u64,
    #[serde(default = "default_stage")]
    pub stage: u32,
    #[serde(default)]
    pub enemies_killed: u64,
}

impl LeaderboardEntry {
    pub fn new(name: impl Into<String>, stats: RunStats) -> Self {
        Self {
            name: name.into(),
            score: stats.score,
            stage: stats.stage,
            enemies_killed: stats.enemies_killed,
        }
    }
}

/// Column to sort the leaderboard view by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortKey {
    Name,
    #[default]
    Score,
    Stage,
    EnemiesKilled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn flipped(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

/// Current sort of the leaderboard view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState {
    pub key: SortKey,
    pub order: SortOrder,
}

impl SortState {
    /// Clicking the active column flips the order; a new column starts descending
    pub fn select(&mut self, key: SortKey) {
        if self.key == key {
            self.order = self.order.flipped();
        } else {
            self.key = key;
            self.order = SortOrder::Desc;
        }
    }
}

/// One row of the ranked view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardRow<'a> {
    /// 1-based position in the current sort
    pub rank: usize,
    pub entry: &'a LeaderboardEntry,
    /// Holds the best score on the board, whatever the sort
    pub is_top: bool,
}

/// High score leaderboard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build from raw records: sorted by score, trimmed to the top 10
    pub fn from_entries(mut entries: Vec<LeaderboardEntry>) -> Self {
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(MAX_HIGH_SCORES);
        Self { entries }
    }

    /// Check if a score would make the board
    pub fn qualifies(&self, score: u64) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Add an entry, keeping score order. Returns the 1-based rank, or
    /// `None` if it fell off the bottom.
    pub fn add_entry(&mut self, entry: LeaderboardEntry) -> Option<usize> {
        if !self.qualifies(entry.score) {
            return None;
        }
        // Ties go below existing records
        let pos = self
            .entries
            .iter()
            .position(|e| entry.score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(pos + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.iter().map(|e| e.score).max()
    }

    /// Entries ordered for display
    pub fn sorted(&self, sort: SortState) -> Vec<&LeaderboardEntry> {
        let mut view: Vec<&LeaderboardEntry> = self.entries.iter().collect();
        view.sort_by(|a, b| {
            let ord = compare(a, b, sort.key);
            match sort.order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });
        view
    }

    /// Ranked rows for display
    pub fn rows(&self, sort: SortState) -> Vec<LeaderboardRow<'_>> {
        let top = self.top_score();
        self.sorted(sort)
            .into_iter()
            .enumerate()
            .map(|(i, entry)| LeaderboardRow {
                rank: i + 1,
                entry,
                is_top: Some(entry.score) == top,
            })
            .collect()
    }
}

fn compare(a: &LeaderboardEntry, b: &LeaderboardEntry, key: SortKey) -> Ordering {
    match key {
        SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortKey::Score => a.score.cmp(&b.score),
        SortKey::Stage => a.stage.cmp(&b.stage),
        SortKey::EnemiesKilled => a.enemies_killed.cmp(&b.enemies_killed),
    }
}

/// What happened to the save attempt at the end of a run
#[derive(Debug)]
pub enum SaveOutcome {
    /// Stored; rank on the board if it made the top 10
    Saved { rank: Option<usize> },
    /// No name entered, nothing stored
    Skipped,
    /// The store failed; the run summary is still valid
    Failed(LeaderboardError),
}

/// End-of-run summary for the game-over screen
#[derive(Debug)]
pub struct RunSummary {
    pub stats: RunStats,
    pub save: SaveOutcome,
}

/// Record a finished run. Never fails: a broken store is reported in the
/// summary instead.
pub fn record_run(store: &mut dyn LeaderboardStore, name: &str, world: &World) -> RunSummary {
    let stats = world.stats();
    let name = name.trim();
    if name.is_empty() {
        log::info!("No name entered, run not saved");
        return RunSummary {
            stats,
            save: SaveOutcome::Skipped,
        };
    }

    let entry = LeaderboardEntry::new(name, stats);
    let save = match store.append(entry) {
        Ok(rank) => {
            log::info!("Run saved for {name} (score {}, rank {rank:?})", stats.score);
            SaveOutcome::Saved { rank }
        }
        Err(err) => {
            log::warn!("Leaderboard unavailable, run not saved: {err}");
            SaveOutcome::Failed(err)
        }
    };
    RunSummary { stats, save }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::storage::MemoryStore;

    fn entry(name: &str, score: u64, stage: u32, kills: u64) -> LeaderboardEntry {
        LeaderboardEntry {
            name: name.to_string(),
            score,
            stage,
            enemies_killed: kills,
        }
    }

    #[test]
    fn test_add_entry_keeps_order_and_caps() {
        let mut board = Leaderboard::new();
        for i in 1..=12u64 {
            board.add_entry(entry("p", i * 100, 1, 0));
        }
        assert_eq!(board.len(), MAX_HIGH_SCORES);
        assert_eq!(board.entries[0].score, 1200);
        assert_eq!(board.entries[9].score, 300);

        // Too low to make it
        assert_eq!(board.add_entry(entry("low", 50, 1, 0)), None);
        // Lands in the middle
        assert_eq!(board.add_entry(entry("mid", 750, 1, 0)), Some(6));
        assert_eq!(board.entries[9].score, 400);
    }

    #[test]
    fn test_ties_rank_below_existing() {
        let mut board = Leaderboard::new();
        board.add_entry(entry("first", 500, 1, 0));
        assert_eq!(board.add_entry(entry("second", 500, 1, 0)), Some(2));
        assert_eq!(board.entries[0].name, "first");
    }

    #[test]
    fn test_from_entries_sorts_and_trims() {
        let raw: Vec<_> = (0..15u64).map(|i| entry("x", i, 1, 0)).collect();
        let board = Leaderboard::from_entries(raw);
        assert_eq!(board.len(), 10);
        assert_eq!(board.entries[0].score, 14);
        assert_eq!(board.entries[9].score, 5);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let parsed: Vec<LeaderboardEntry> =
            serde_json::from_str(r#"[{"name":"ann","score":120},{"score":5}]"#).unwrap();
        assert_eq!(parsed[0], entry("ann", 120, 1, 0));
        assert_eq!(parsed[1].name, UNKNOWN_NAME);

        // Field names match the stored records
        let json = serde_json::to_string(&entry("bo", 1, 2, 3)).unwrap();
        assert!(json.contains("\"enemiesKilled\":3"));
    }

    #[test]
    fn test_sort_state_toggles() {
        let mut sort = SortState::default();
        assert_eq!(sort.key, SortKey::Score);
        assert_eq!(sort.order, SortOrder::Desc);

        sort.select(SortKey::Score);
        assert_eq!(sort.order, SortOrder::Asc);

        sort.select(SortKey::Name);
        assert_eq!(sort.key, SortKey::Name);
        assert_eq!(sort.order, SortOrder::Desc);
    }

    #[test]
    fn test_rows_by_column() {
        let board = Leaderboard::from_entries(vec![
            entry("bea", 300, 2, 40),
            entry("Al", 900, 4, 10),
            entry("cy", 100, 6, 25),
        ]);

        let by_name: Vec<&str> = board
            .sorted(SortState {
                key: SortKey::Name,
                order: SortOrder::Asc,
            })
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(by_name, vec!["Al", "bea", "cy"]);

        let rows = board.rows(SortState {
            key: SortKey::EnemiesKilled,
            order: SortOrder::Desc,
        });
        assert_eq!(rows[0].entry.name, "bea");
        assert_eq!(rows[0].rank, 1);
        // Top scorer is flagged wherever it lands
        assert!(rows[2].is_top);
        assert_eq!(rows[2].entry.name, "Al");
        assert!(!rows[0].is_top);

        let by_stage = board.sorted(SortState {
            key: SortKey::Stage,
            order: SortOrder::Desc,
        });
        assert_eq!(by_stage[0].stage, 6);
    }

    #[test]
    fn test_record_run_saves_and_skips() {
        let mut world = World::new(800.0, 600.0, 1);
        world.score = 420;
        world.stage = 3;
        world.enemies_killed = 17;

        let mut store = MemoryStore::default();
        let summary = record_run(&mut store, "  ace ", &world);
        assert!(matches!(summary.save, SaveOutcome::Saved { rank: Some(1) }));
        assert_eq!(summary.stats.score, 420);

        let saved = store.load_all().unwrap();
        assert_eq!(saved, vec![entry("ace", 420, 3, 17)]);

        let summary = record_run(&mut store, "   ", &world);
        assert!(matches!(summary.save, SaveOutcome::Skipped));
        assert_eq!(store.load_all().unwrap().len(), 1);
    }

    #[test]
    fn test_record_run_survives_broken_store() {
        let world = World::new(800.0, 600.0, 1);
        let mut store = MemoryStore::unavailable();
        let summary = record_run(&mut store, "ace", &world);
        assert!(matches!(
            summary.save,
            SaveOutcome::Failed(LeaderboardError::Unavailable(_))
        ));
        assert_eq!(summary.stats, world.stats());
    }
}
