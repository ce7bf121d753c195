//! Flat-file stores for the catalog, completion history and daily
//! selection.
//!
//! Reads degrade to empty rather than failing the request: a missing
//! or unparsable file yields no tasks / no history / no selection,
//! with a warning. Writes replace the whole file (best-effort
//! single-writer durability).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rota_core::model::{CatalogFile, CompletionRecord, DailySelection, Task};
use tracing::warn;

/// Read-only aggregation over the catalog partitions in one directory.
pub struct CatalogStore {
    dir: PathBuf,
}

impl CatalogStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Loads every `*.yaml`/`*.yml` partition and flattens the tasks.
    ///
    /// Partitions that fail to read or parse are skipped. Duplicate
    /// ids across partitions are not deduplicated.
    pub fn load_all(&self) -> Vec<Task> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(dir = %self.dir.display(), error = %e, "catalog directory unreadable; serving empty catalog");
                return Vec::new();
            }
        };

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| {
                matches!(
                    p.extension().and_then(|s| s.to_str()),
                    Some("yaml") | Some("yml")
                )
            })
            .collect();
        // Stable catalog order regardless of directory iteration order.
        paths.sort();

        let mut tasks = Vec::new();
        for path in paths {
            match load_partition(&path) {
                Ok(mut partition) => tasks.append(&mut partition),
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "skipping malformed catalog partition");
                }
            }
        }
        tasks
    }
}

fn load_partition(path: &Path) -> Result<Vec<Task>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read catalog partition {}", path.display()))?;
    let file: CatalogFile = serde_yaml::from_str(&text)
        .with_context(|| format!("parse catalog partition {}", path.display()))?;
    Ok(file.into_tasks())
}

/// Completion history file: a JSON array of records keyed by task id.
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Loads the history, degrading to empty on a missing or
    /// unparsable file.
    pub fn load(&self) -> Vec<CompletionRecord> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!(file = %self.path.display(), error = %e, "history unreadable; treating as empty");
                return Vec::new();
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(records) => records,
            Err(e) => {
                warn!(file = %self.path.display(), error = %e, "history unparsable; treating as empty");
                Vec::new()
            }
        }
    }

    /// Replaces the history file.
    pub fn save(&self, records: &[CompletionRecord]) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(records)?;
        std::fs::write(&self.path, bytes)
            .with_context(|| format!("write history {}", self.path.display()))
    }
}

/// Daily selection file: the day key plus the ordered entries.
pub struct SelectionStore {
    path: PathBuf,
}

impl SelectionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Loads the stored selection. A missing or unparsable file is
    /// reported as absent, which forces a recompute upstream.
    pub fn load(&self) -> Option<DailySelection> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(file = %self.path.display(), error = %e, "selection unreadable; recomputing");
                }
                return None;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(sel) => Some(sel),
            Err(e) => {
                warn!(file = %self.path.display(), error = %e, "selection unparsable; recomputing");
                None
            }
        }
    }

    /// Replaces the selection file.
    pub fn save(&self, selection: &DailySelection) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(selection)?;
        std::fs::write(&self.path, bytes)
            .with_context(|| format!("write selection {}", self.path.display()))
    }
}
