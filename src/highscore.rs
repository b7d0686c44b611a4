//! High-score persistence.
//!
//! The only persisted state is a single non-negative integer.  It is read
//! once at startup and written once per run, on entering `GameOver`.  The
//! default store keeps it in `saves/highscore.toml`:
//!
//! ```toml
//! cosmic_fusion_high_score = 4210
//! ```

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::{FusionError, FusionResult};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Read/write access to the persisted high score.
pub trait HighScoreStore: Send + Sync {
    /// Stored high score, or 0 if nothing usable is stored.
    fn read_high_score(&self) -> u64;

    fn write_high_score(&mut self, score: u64) -> FusionResult<()>;
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
struct HighScoreFile {
    cosmic_fusion_high_score: u64,
}

/// TOML file store under `saves/`.
#[derive(Debug, Clone)]
pub struct FileHighScoreStore {
    path: PathBuf,
}

impl Default for FileHighScoreStore {
    fn default() -> Self {
        Self::new(PathBuf::from("saves").join("highscore.toml"))
    }
}

impl FileHighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn storage_error(&self, reason: impl ToString) -> FusionError {
        FusionError::Storage {
            path: self.path.display().to_string(),
            reason: reason.to_string(),
        }
    }

    fn load(&self) -> FusionResult<u64> {
        let contents = fs::read_to_string(&self.path).map_err(|e| self.storage_error(e))?;
        let file: HighScoreFile = toml::from_str(&contents).map_err(|e| self.storage_error(e))?;
        Ok(file.cosmic_fusion_high_score)
    }
}

impl HighScoreStore for FileHighScoreStore {
    fn read_high_score(&self) -> u64 {
        if !self.path.exists() {
            return 0;
        }
        self.load().unwrap_or_else(|e| {
            warn!("{e}; treating high score as 0");
            0
        })
    }

    fn write_high_score(&mut self, score: u64) -> FusionResult<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|e| self.storage_error(e))?;
        }
        let serialized = toml::to_string(&HighScoreFile {
            cosmic_fusion_high_score: score,
        })
        .map_err(|e| self.storage_error(e))?;
        fs::write(&self.path, serialized).map_err(|e| self.storage_error(e))
    }
}

/// In-memory store for tests and headless runs.
///
/// Clones share the same value and counters, so a handle kept outside the
/// [`HighScoreStorage`] resource sees every access made through it.
#[derive(Debug, Default, Clone)]
pub struct MemoryHighScoreStore {
    value: Arc<AtomicU64>,
    reads: Arc<AtomicU32>,
    writes: Arc<AtomicU32>,
}

impl MemoryHighScoreStore {
    pub fn with_value(value: u64) -> Self {
        Self {
            value: Arc::new(AtomicU64::new(value)),
            ..Default::default()
        }
    }

    pub fn value(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }

    /// Number of reads served so far.
    pub fn reads(&self) -> u32 {
        self.reads.load(Ordering::Relaxed)
    }

    /// Number of successful writes.
    pub fn writes(&self) -> u32 {
        self.writes.load(Ordering::Relaxed)
    }
}

impl HighScoreStore for MemoryHighScoreStore {
    fn read_high_score(&self) -> u64 {
        self.reads.fetch_add(1, Ordering::Relaxed);
        self.value()
    }

    fn write_high_score(&mut self, score: u64) -> FusionResult<()> {
        self.value.store(score, Ordering::Relaxed);
        self.writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

/// The active store.  Defaults to [`FileHighScoreStore`].
#[derive(Resource)]
pub struct HighScoreStorage(pub Box<dyn HighScoreStore>);

impl Default for HighScoreStorage {
    fn default() -> Self {
        Self(Box::new(FileHighScoreStore::default()))
    }
}

impl HighScoreStorage {
    pub fn memory(value: u64) -> Self {
        Self::from_store(MemoryHighScoreStore::with_value(value))
    }

    pub fn from_store(store: impl HighScoreStore + 'static) -> Self {
        Self(Box::new(store))
    }

    pub fn read(&self) -> u64 {
        self.0.read_high_score()
    }

    pub fn write(&mut self, score: u64) -> FusionResult<()> {
        self.0.write_high_score(score)
    }
}
