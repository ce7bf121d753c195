//! Service layer: ties the flat-file stores to the selection policy.
//!
//! Every operation that read-modify-writes the selection or the
//! history runs behind a single mutex, so a completion toggle can
//! never interleave with a reshuffle.

use std::collections::HashMap;

use chrono::{Duration, Local, NaiveDate, Utc};
use rota_core::api::TodayTask;
use rota_core::model::{CompletionRecord, DailySelection, Task};
use rota_core::policy;
use tokio::sync::Mutex;

use crate::config::DaemonConfig;
use crate::store::{CatalogStore, HistoryStore, SelectionStore};

/// Request-level service error.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The task id is not part of today's selection. Client error,
    /// not retried.
    #[error("task {0} is not part of today's selection")]
    NotFound(String),
    /// Persistence failure while writing state.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Main service implementing the daily rotation logic.
pub struct TaskService {
    catalog: CatalogStore,
    history: HistoryStore,
    selection: SelectionStore,
    max_daily: usize,
    exclusion: Duration,
    state_lock: Mutex<()>,
}

impl TaskService {
    pub fn new(config: &DaemonConfig) -> Self {
        Self {
            catalog: CatalogStore::new(&config.tasks_dir),
            history: HistoryStore::new(&config.history_path),
            selection: SelectionStore::new(&config.selection_path),
            max_daily: config.max_daily,
            exclusion: Duration::days(config.exclusion_days),
            state_lock: Mutex::new(()),
        }
    }

    /// Today's selection with resolved task details, recomputing first
    /// when the stored selection is stale, absent, or references a
    /// task no longer in the catalog.
    pub async fn today(&self) -> Result<Vec<TodayTask>, ServiceError> {
        let _guard = self.state_lock.lock().await;
        let catalog = self.catalog.load_all();
        let today = Local::now().date_naive();

        let selection = match self.selection.load() {
            Some(sel)
                if !policy::is_stale(Some(&sel), today)
                    && !policy::references_unknown_tasks(&sel, &catalog) =>
            {
                sel
            }
            _ => self.recompute(&catalog, today)?,
        };

        Ok(resolve(&selection, &catalog))
    }

    /// Forces a fresh draw regardless of staleness, discarding any
    /// in-progress completion flags. Completions already recorded stay
    /// in the history.
    pub async fn reshuffle(&self) -> Result<Vec<TodayTask>, ServiceError> {
        let _guard = self.state_lock.lock().await;
        let catalog = self.catalog.load_all();
        let today = Local::now().date_naive();

        let selection = self.recompute(&catalog, today)?;
        tracing::info!(count = selection.entries.len(), "selection reshuffled");
        Ok(resolve(&selection, &catalog))
    }

    /// Sets the completion flag for a task in today's selection.
    ///
    /// When transitioning to complete, the completion history record
    /// for the task is written or overwritten with the current
    /// timestamp. Setting the flag back to incomplete leaves the
    /// history untouched.
    pub async fn set_completion(
        &self,
        task_id: &str,
        completed: bool,
    ) -> Result<(), ServiceError> {
        let _guard = self.state_lock.lock().await;
        let catalog = self.catalog.load_all();
        let today = Local::now().date_naive();

        let mut selection = match self.selection.load() {
            Some(sel) if !policy::is_stale(Some(&sel), today) => sel,
            _ => self.recompute(&catalog, today)?,
        };

        policy::set_completion(&mut selection, task_id, completed)
            .map_err(|_| ServiceError::NotFound(task_id.to_string()))?;

        if completed {
            let mut history = self.history.load();
            policy::upsert_completion(&mut history, task_id, Utc::now());
            self.history.save(&history).map_err(ServiceError::Internal)?;
        }
        self.selection.save(&selection).map_err(ServiceError::Internal)?;

        Ok(())
    }

    /// The full flattened catalog.
    pub fn catalog(&self) -> Vec<Task> {
        self.catalog.load_all()
    }

    /// Raw completion records, for auditing and debugging.
    pub fn completion_history(&self) -> Vec<CompletionRecord> {
        self.history.load()
    }

    /// Computes and persists a new selection for `today`.
    ///
    /// Caller must hold the state lock.
    fn recompute(&self, catalog: &[Task], today: NaiveDate) -> Result<DailySelection, ServiceError> {
        let history = self.history.load();
        let eligible = policy::eligible_tasks(catalog, &history, Utc::now(), self.exclusion);
        let selection =
            policy::select_daily(eligible, self.max_daily, today, &mut rand::thread_rng());
        self.selection.save(&selection).map_err(ServiceError::Internal)?;
        Ok(selection)
    }
}

/// Resolves selection entries against the catalog.
///
/// Entries are guaranteed to reference known tasks on the read path
/// (a malformed selection is recomputed before we get here), but a
/// toggle racing an external catalog edit could still leave a gap, so
/// unknown ids are dropped rather than panicking.
fn resolve(selection: &DailySelection, catalog: &[Task]) -> Vec<TodayTask> {
    let by_id: HashMap<&str, &Task> = catalog.iter().map(|t| (t.id.as_str(), t)).collect();
    selection
        .entries
        .iter()
        .filter_map(|entry| {
            by_id.get(entry.id.as_str()).map(|task| TodayTask {
                id: task.id.clone(),
                category: task.category.clone(),
                title: task.title.clone(),
                description: task.description.clone(),
                completed: entry.completed,
            })
        })
        .collect()
}
