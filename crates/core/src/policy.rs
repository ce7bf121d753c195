//! Daily selection and rotation policy.
//!
//! Pure functions over the catalog, completion history and the stored
//! selection. All I/O and clock access stays with the caller so the
//! policy is trivially testable.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::model::{CompletionRecord, DailySelection, SelectionEntry, Task};

/// Default cap on the number of tasks drawn per day.
pub const DEFAULT_MAX_DAILY: usize = 8;

/// Default trailing exclusion window in days.
pub const DEFAULT_EXCLUSION_DAYS: i64 = 7;

/// Error raised when a completion toggle names a task outside the
/// current selection.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SelectionError {
    /// The task id is not part of the current daily selection.
    #[error("task {0} is not part of the current selection")]
    TaskNotSelected(String),
}

/// Returns the catalog tasks eligible for selection at `now`.
///
/// A task is excluded iff its latest completion timestamp lies inside
/// the rolling window ending at `now`, i.e. strictly newer than
/// `now - window`. A completion exactly `window` old makes the task
/// eligible again.
pub fn eligible_tasks(
    catalog: &[Task],
    history: &[CompletionRecord],
    now: DateTime<Utc>,
    window: Duration,
) -> Vec<Task> {
    let cutoff = now - window;

    // History is upserted per id, but tolerate duplicates: latest wins.
    let mut latest: HashMap<&str, DateTime<Utc>> = HashMap::new();
    for rec in history {
        let entry = latest.entry(rec.id.as_str()).or_insert(rec.completed_at);
        if rec.completed_at > *entry {
            *entry = rec.completed_at;
        }
    }

    catalog
        .iter()
        .filter(|task| match latest.get(task.id.as_str()) {
            Some(ts) => *ts <= cutoff,
            None => true,
        })
        .cloned()
        .collect()
}

/// Draws the day's selection: an unbiased random permutation of
/// `eligible` truncated to `max_count`, every entry incomplete.
///
/// Every call is an independent draw; no seeding or determinism is
/// guaranteed to callers.
pub fn select_daily<R: Rng>(
    eligible: Vec<Task>,
    max_count: usize,
    day: NaiveDate,
    rng: &mut R,
) -> DailySelection {
    let mut tasks = eligible;
    tasks.shuffle(rng);
    tasks.truncate(max_count);

    DailySelection {
        day,
        entries: tasks
            .into_iter()
            .map(|t| SelectionEntry {
                id: t.id,
                completed: false,
            })
            .collect(),
    }
}

/// Whether the stored selection must be recomputed for `today`.
///
/// Absence of a stored selection is treated identically to a day
/// mismatch.
pub fn is_stale(selection: Option<&DailySelection>, today: NaiveDate) -> bool {
    match selection {
        Some(sel) => sel.day != today,
        None => true,
    }
}

/// Whether the selection references a task id no longer in the catalog.
///
/// The caller is expected to force a recompute when this returns true.
pub fn references_unknown_tasks(selection: &DailySelection, catalog: &[Task]) -> bool {
    let known: HashSet<&str> = catalog.iter().map(|t| t.id.as_str()).collect();
    selection.entries.iter().any(|e| !known.contains(e.id.as_str()))
}

/// Sets the completion flag for `task_id` within the selection.
///
/// Fails with [`SelectionError::TaskNotSelected`] when the id is
/// absent; the selection is left untouched in that case. The flag set
/// is idempotent.
pub fn set_completion(
    selection: &mut DailySelection,
    task_id: &str,
    completed: bool,
) -> Result<(), SelectionError> {
    match selection.entries.iter_mut().find(|e| e.id == task_id) {
        Some(entry) => {
            entry.completed = completed;
            Ok(())
        }
        None => Err(SelectionError::TaskNotSelected(task_id.to_string())),
    }
}

/// Records a completion timestamp: replaces the existing record for
/// `task_id` or appends a new one. Never removes records; marking a
/// task incomplete later leaves its history untouched.
pub fn upsert_completion(
    history: &mut Vec<CompletionRecord>,
    task_id: &str,
    completed_at: DateTime<Utc>,
) {
    match history.iter_mut().find(|r| r.id == task_id) {
        Some(rec) => rec.completed_at = completed_at,
        None => history.push(CompletionRecord {
            id: task_id.to_string(),
            completed_at,
        }),
    }
}
