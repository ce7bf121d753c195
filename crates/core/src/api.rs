use serde::{Deserialize, Serialize};

/// A selection entry resolved against the catalog, as served to the UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodayTask {
    /// Task id.
    pub id: String,
    /// Category label.
    pub category: String,
    /// Short human title.
    pub title: String,
    /// Free text; may embed inline code markup.
    pub description: String,
    /// Whether the task has been completed today.
    pub completed: bool,
}

/// Completion toggle request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteRequest {
    /// Task id within today's selection.
    pub task_id: String,
    /// Desired completion flag.
    pub completed: bool,
}

/// Completion toggle response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteResponse {
    /// Whether the toggle was applied.
    pub ok: bool,
    /// Optional detail for the caller.
    pub message: Option<String>,
}
