// SPDX-License-Identifier: MIT
//! `storage` — best-effort JSON snapshot of the board.
//!
//! The snapshot is a single document, the registry keyed by task id, written
//! after every accepted mutation. Durability is best effort: a failed save is
//! logged and counted but never blocks the in-memory mutation or the
//! broadcast. A missing or corrupt snapshot at startup falls back to a fresh
//! registry.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs;
use tracing::{debug, info, warn};

use crate::board::record::TaskRecord;
use crate::board::registry::TaskRegistry;

const SNAPSHOT_FILE: &str = "board.json";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("snapshot io: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot encode: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reads and writes the board snapshot under the daemon data dir.
#[derive(Debug, Clone)]
pub struct BoardStorage {
    snapshot_path: PathBuf,
}

impl BoardStorage {
    pub fn new(data_dir: &Path) -> Self {
        Self { snapshot_path: data_dir.join(SNAPSHOT_FILE) }
    }

    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }

    /// Load the registry for `range`, falling back to a fresh one.
    ///
    /// Absent file, unreadable file, and undecodable JSON all land on the
    /// fallback; the board must come up regardless of snapshot state.
    pub async fn load(&self, range: RangeInclusive<u32>) -> TaskRegistry {
        let content = match fs::read_to_string(&self.snapshot_path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %self.snapshot_path.display(), "no snapshot found, initializing a fresh board");
                return TaskRegistry::new(range);
            }
            Err(e) => {
                warn!(path = %self.snapshot_path.display(), err = %e, "could not read snapshot, initializing a fresh board");
                return TaskRegistry::new(range);
            }
        };

        match serde_json::from_str::<BTreeMap<u32, TaskRecord>>(&content) {
            Ok(records) => {
                let registry = TaskRegistry::from_records(range, records);
                info!(
                    path = %self.snapshot_path.display(),
                    tasks = registry.len(),
                    completed = registry.completed_count(),
                    "snapshot loaded"
                );
                registry
            }
            Err(e) => {
                warn!(path = %self.snapshot_path.display(), err = %e, "corrupt snapshot, initializing a fresh board");
                TaskRegistry::new(range)
            }
        }
    }

    /// Write the full registry. Atomic: tmp file, then rename.
    pub async fn save(&self, registry: &TaskRegistry) -> Result<(), StorageError> {
        let records: BTreeMap<u32, &TaskRecord> = registry.iter().collect();
        let json = serde_json::to_string_pretty(&records)?;

        if let Some(parent) = self.snapshot_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let tmp_path = self.snapshot_path.with_extension("json.tmp");
        fs::write(&tmp_path, json).await?;
        fs::rename(&tmp_path, &self.snapshot_path).await?;

        debug!(path = %self.snapshot_path.display(), tasks = registry.len(), "snapshot saved");
        Ok(())
    }
}
