//! Local playback progress bookkeeping
//!
//! Records the position of items watched on this device (downloads, offline
//! sessions) so they can be reconciled with the server later. Store methods
//! block; async callers run them on the blocking pool.

use std::fmt::Debug;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use jellyhome_model::ItemId;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::infra::repository::{RepositoryError, RepositoryResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalProgress {
    pub item_id: ItemId,
    pub position_ticks: i64,
    pub played: bool,
    pub updated_at: DateTime<Utc>,
}

impl LocalProgress {
    pub fn new(item_id: ItemId, position_ticks: i64) -> Self {
        Self {
            item_id,
            position_ticks,
            played: false,
            updated_at: Utc::now(),
        }
    }
}

pub trait ProgressStore: Send + Sync + Debug {
    fn load(&self) -> RepositoryResult<Vec<LocalProgress>>;

    /// Replace every stored record.
    fn save(&self, records: &[LocalProgress]) -> RepositoryResult<()>;
}

/// Records kept as a JSON array in a single file
#[derive(Debug, Clone)]
pub struct JsonProgressStore {
    path: PathBuf,
}

impl JsonProgressStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProgressStore for JsonProgressStore {
    fn load(&self) -> RepositoryResult<Vec<LocalProgress>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Vec::new());
            }
            Err(err) => return Err(err.into()),
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content).map_err(|e| {
            RepositoryError::Storage(format!(
                "corrupt progress file {}: {e}",
                self.path.display()
            ))
        })
    }

    fn save(&self, records: &[LocalProgress]) -> RepositoryResult<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        // Write next to the target and rename so readers never see a torn file
        let mut file = tempfile::NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut file, records)?;
        file.flush()?;
        file.persist(&self.path)
            .map_err(|e| RepositoryError::Storage(e.to_string()))?;
        Ok(())
    }
}

/// In-process store for sessions without local downloads
#[derive(Debug, Default)]
pub struct MemoryProgressStore {
    records: Mutex<Vec<LocalProgress>>,
}

impl MemoryProgressStore {
    pub fn new(records: Vec<LocalProgress>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }

    pub fn snapshot(&self) -> Vec<LocalProgress> {
        self.records.lock().clone()
    }
}

impl ProgressStore for MemoryProgressStore {
    fn load(&self) -> RepositoryResult<Vec<LocalProgress>> {
        Ok(self.records.lock().clone())
    }

    fn save(&self, records: &[LocalProgress]) -> RepositoryResult<()> {
        *self.records.lock() = records.to_vec();
        Ok(())
    }
}
