use std::path::PathBuf;

/// Daemon configuration, built once at startup and injected into the
/// service. No ambient globals.
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    /// Directory holding one YAML catalog partition per category.
    pub tasks_dir: PathBuf,
    /// Completion history file (JSON array of records).
    pub history_path: PathBuf,
    /// Daily selection file (JSON, includes the day key).
    pub selection_path: PathBuf,

    /// Cap on the number of tasks drawn per day.
    pub max_daily: usize,
    /// Trailing exclusion window in days.
    pub exclusion_days: i64,
}
