//! Leaderboard persistence
//!
//! Records are stored as a JSON array of entries, the same shape on disk
//! and in browser LocalStorage.

use std::fs;
use std::path::{Path, PathBuf};

use crate::highscores::{Leaderboard, LeaderboardEntry};

/// Errors reading or writing the leaderboard
#[derive(thiserror::Error, Debug)]
pub enum LeaderboardError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored records are not valid JSON
    #[error("Corrupt leaderboard data: {0}")]
    Json(#[from] serde_json::Error),

    /// Backing store cannot be reached
    #[error("Leaderboard storage unavailable: {0}")]
    Unavailable(String),
}

/// Persisted leaderboard records
pub trait LeaderboardStore {
    /// All stored records, best first
    fn load_all(&self) -> Result<Vec<LeaderboardEntry>, LeaderboardError>;

    /// Store a record. Returns its rank if it made the board.
    fn append(&mut self, entry: LeaderboardEntry) -> Result<Option<usize>, LeaderboardError>;
}

/// In-memory store (tests, hosts without storage)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    board: Leaderboard,
    unavailable: bool,
}

impl MemoryStore {
    /// A store that fails every call
    pub fn unavailable() -> Self {
        Self {
            board: Leaderboard::new(),
            unavailable: true,
        }
    }

    fn check(&self) -> Result<(), LeaderboardError> {
        if self.unavailable {
            return Err(LeaderboardError::Unavailable("memory store disabled".into()));
        }
        Ok(())
    }
}

impl LeaderboardStore for MemoryStore {
    fn load_all(&self) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        self.check()?;
        Ok(self.board.entries.clone())
    }

    fn append(&mut self, entry: LeaderboardEntry) -> Result<Option<usize>, LeaderboardError> {
        self.check()?;
        Ok(self.board.add_entry(entry))
    }
}

/// JSON file on disk
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, board: &Leaderboard) -> Result<(), LeaderboardError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        // Write beside the target, then swap in
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_string_pretty(&board.entries)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl LeaderboardStore for JsonFileStore {
    fn load_all(&self) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        let entries: Vec<LeaderboardEntry> = serde_json::from_str(&json)?;
        Ok(Leaderboard::from_entries(entries).entries)
    }

    fn append(&mut self, entry: LeaderboardEntry) -> Result<Option<usize>, LeaderboardError> {
        let mut board = Leaderboard::from_entries(self.load_all()?);
        let rank = board.add_entry(entry);
        self.write(&board)?;
        log::info!(
            "Leaderboard saved to {} ({} entries)",
            self.path.display(),
            board.len()
        );
        Ok(rank)
    }
}

/// Browser LocalStorage (WASM only)
#[cfg(target_arch = "wasm32")]
pub struct LocalStorageStore {
    key: String,
}

#[cfg(target_arch = "wasm32")]
impl Default for LocalStorageStore {
    fn default() -> Self {
        Self {
            key: Self::STORAGE_KEY.to_string(),
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "leaderboard";

    fn storage() -> Result<web_sys::Storage, LeaderboardError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| LeaderboardError::Unavailable("no LocalStorage".into()))
    }
}

#[cfg(target_arch = "wasm32")]
fn js_error(err: wasm_bindgen::JsValue) -> LeaderboardError {
    LeaderboardError::Unavailable(format!("{err:?}"))
}

#[cfg(target_arch = "wasm32")]
impl LeaderboardStore for LocalStorageStore {
    fn load_all(&self) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        let storage = Self::storage()?;
        match storage.get_item(&self.key).map_err(js_error)? {
            Some(json) => {
                let entries: Vec<LeaderboardEntry> = serde_json::from_str(&json)?;
                Ok(Leaderboard::from_entries(entries).entries)
            }
            None => Ok(Vec::new()),
        }
    }

    fn append(&mut self, entry: LeaderboardEntry) -> Result<Option<usize>, LeaderboardError> {
        let mut board = Leaderboard::from_entries(self.load_all()?);
        let rank = board.add_entry(entry);
        let json = serde_json::to_string(&board.entries)?;
        Self::storage()?
            .set_item(&self.key, &json)
            .map_err(js_error)?;
        log::info!("Leaderboard saved ({} entries)", board.len());
        Ok(rank)
    }
}
