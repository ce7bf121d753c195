use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A single catalog task.
///
/// Tasks are owned by the catalog partitions on disk; the policy never
/// mutates them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    /// Stable id, unique within the catalog.
    pub id: String,
    /// Category label (the partition the task came from).
    pub category: String,
    /// Short human title.
    pub title: String,
    /// Free text; may embed inline code markup.
    pub description: String,
}

/// Latest completion timestamp for a task. At most one record per id;
/// upserts replace the timestamp rather than appending.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompletionRecord {
    /// Task id the record belongs to.
    pub id: String,
    /// When the task was last marked complete.
    pub completed_at: DateTime<Utc>,
}

/// One entry of the day's selection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectionEntry {
    /// Task id drawn from the eligible set.
    pub id: String,
    /// Whether the task has been completed today.
    pub completed: bool,
}

/// The active day's chosen subset.
///
/// Replaced wholesale on day rollover or reshuffle; mutated in place
/// when a completion flag is toggled.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailySelection {
    /// Day key used to detect staleness.
    pub day: NaiveDate,
    /// Ordered (id, completed) pairs for the day.
    pub entries: Vec<SelectionEntry>,
}

/// On-disk shape of one catalog partition (one YAML file per category).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    /// Category label applied to every task in the file.
    pub category: String,
    /// Tasks in this partition.
    #[serde(default)]
    pub tasks: Vec<CatalogTask>,
}

/// A task as written in a catalog partition (category comes from the file).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogTask {
    /// Stable id, unique within the catalog.
    pub id: String,
    /// Short human title.
    pub title: String,
    /// Free text; may embed inline code markup.
    pub description: String,
}

impl CatalogFile {
    /// Flattens the partition into tasks tagged with its category.
    ///
    /// Duplicate ids across partitions are not deduplicated here; the
    /// catalog maintainer is responsible for uniqueness.
    pub fn into_tasks(self) -> Vec<Task> {
        let category = self.category;
        self.tasks
            .into_iter()
            .map(|t| Task {
                id: t.id,
                category: category.clone(),
                title: t.title,
                description: t.description,
            })
            .collect()
    }
}
