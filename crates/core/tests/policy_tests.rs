//! Integration tests for the selection policy.

use std::collections::HashSet;

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rota_core::model::{CompletionRecord, DailySelection, SelectionEntry, Task};
use rota_core::policy::{
    eligible_tasks, is_stale, references_unknown_tasks, select_daily, set_completion,
    upsert_completion, SelectionError, DEFAULT_MAX_DAILY,
};

fn task(id: &str, category: &str) -> Task {
    Task {
        id: id.into(),
        category: category.into(),
        title: format!("title for {id}"),
        description: format!("description for {id}"),
    }
}

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
}

fn record(id: &str, days_ago: i64) -> CompletionRecord {
    CompletionRecord {
        id: id.into(),
        completed_at: now() - Duration::days(days_ago),
    }
}

fn window() -> Duration {
    Duration::days(7)
}

#[test]
fn eligible_excludes_recent_completion() {
    // Scenario from the design notes: A completed 2 days ago is withheld.
    let catalog = vec![task("a", "x"), task("b", "x"), task("c", "y")];
    let history = vec![record("a", 2)];

    let eligible = eligible_tasks(&catalog, &history, now(), window());
    let ids: HashSet<&str> = eligible.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, HashSet::from(["b", "c"]));
}

#[test]
fn eligible_includes_completion_older_than_window() {
    let catalog = vec![task("a", "x")];
    let history = vec![record("a", 8)];

    let eligible = eligible_tasks(&catalog, &history, now(), window());
    assert_eq!(eligible.len(), 1);
}

#[test]
fn eligible_boundary_exactly_window_old_is_eligible() {
    // Rolling-window convention: strictly-newer-than-cutoff excludes, so
    // a completion exactly 7 days old is eligible again.
    let catalog = vec![task("a", "x")];
    let history = vec![record("a", 7)];

    let eligible = eligible_tasks(&catalog, &history, now(), window());
    assert_eq!(eligible.len(), 1);
}

#[test]
fn eligible_uses_latest_record_per_id() {
    let catalog = vec![task("a", "x")];
    // Duplicate records for one id: the newest one decides.
    let history = vec![record("a", 30), record("a", 1)];

    let eligible = eligible_tasks(&catalog, &history, now(), window());
    assert!(eligible.is_empty());
}

#[test]
fn eligible_ignores_history_for_unknown_ids() {
    let catalog = vec![task("a", "x")];
    let history = vec![record("gone", 1)];

    let eligible = eligible_tasks(&catalog, &history, now(), window());
    assert_eq!(eligible.len(), 1);
}

#[test]
fn select_respects_max_count_and_uniqueness() {
    let catalog: Vec<Task> = (0..20).map(|i| task(&format!("t{i}"), "x")).collect();
    let mut rng = StdRng::seed_from_u64(7);

    let sel = select_daily(catalog.clone(), DEFAULT_MAX_DAILY, day(), &mut rng);
    assert_eq!(sel.entries.len(), DEFAULT_MAX_DAILY);

    let ids: HashSet<&str> = sel.entries.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids.len(), sel.entries.len(), "no duplicate ids");

    let known: HashSet<&str> = catalog.iter().map(|t| t.id.as_str()).collect();
    assert!(ids.is_subset(&known), "only tasks from the eligible input");
}

#[test]
fn select_takes_all_when_eligible_below_max() {
    let catalog = vec![task("b", "x"), task("c", "y")];
    let mut rng = StdRng::seed_from_u64(1);

    let sel = select_daily(catalog.clone(), DEFAULT_MAX_DAILY, day(), &mut rng);
    assert_eq!(sel.entries.len(), 2);
    assert!(sel.entries.iter().all(|e| !e.completed));

    let ids: HashSet<&str> = sel.entries.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, HashSet::from(["b", "c"]));
}

#[test]
fn select_of_empty_eligible_is_empty() {
    let mut rng = StdRng::seed_from_u64(1);
    let sel = select_daily(Vec::new(), DEFAULT_MAX_DAILY, day(), &mut rng);
    assert!(sel.entries.is_empty());
    assert_eq!(sel.day, day());
}

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

#[test]
fn stale_when_no_selection_stored() {
    assert!(is_stale(None, day()));
}

#[test]
fn fresh_within_same_day_stale_after_rollover() {
    let sel = DailySelection {
        day: day(),
        entries: vec![],
    };
    assert!(!is_stale(Some(&sel), day()));
    assert!(is_stale(Some(&sel), day().succ_opt().unwrap()));
}

#[test]
fn unknown_reference_detected() {
    let catalog = vec![task("a", "x")];
    let sel = DailySelection {
        day: day(),
        entries: vec![
            SelectionEntry { id: "a".into(), completed: false },
            SelectionEntry { id: "gone".into(), completed: false },
        ],
    };
    assert!(references_unknown_tasks(&sel, &catalog));

    let ok = DailySelection {
        day: day(),
        entries: vec![SelectionEntry { id: "a".into(), completed: true }],
    };
    assert!(!references_unknown_tasks(&ok, &catalog));
}

#[test]
fn set_completion_toggles_in_place() {
    let mut sel = DailySelection {
        day: day(),
        entries: vec![SelectionEntry { id: "a".into(), completed: false }],
    };

    set_completion(&mut sel, "a", true).unwrap();
    assert!(sel.entries[0].completed);

    // Idempotent: setting the same flag again changes nothing.
    set_completion(&mut sel, "a", true).unwrap();
    assert!(sel.entries[0].completed);

    set_completion(&mut sel, "a", false).unwrap();
    assert!(!sel.entries[0].completed);
}

#[test]
fn set_completion_unknown_id_fails_without_mutation() {
    let mut sel = DailySelection {
        day: day(),
        entries: vec![SelectionEntry { id: "a".into(), completed: false }],
    };
    let before = sel.clone();

    let err = set_completion(&mut sel, "z", true).unwrap_err();
    assert_eq!(err, SelectionError::TaskNotSelected("z".into()));
    assert_eq!(sel, before);
}

#[test]
fn upsert_replaces_rather_than_appends() {
    let mut history = Vec::new();
    upsert_completion(&mut history, "a", now() - Duration::hours(1));
    upsert_completion(&mut history, "a", now());

    assert_eq!(history.len(), 1);
    assert_eq!(history[0].completed_at, now());

    upsert_completion(&mut history, "b", now());
    assert_eq!(history.len(), 2);
}

#[test]
fn selection_json_round_trip_preserves_order_and_flags() {
    let sel = DailySelection {
        day: day(),
        entries: vec![
            SelectionEntry { id: "c".into(), completed: true },
            SelectionEntry { id: "a".into(), completed: false },
            SelectionEntry { id: "b".into(), completed: false },
        ],
    };

    let bytes = serde_json::to_vec_pretty(&sel).unwrap();
    let reloaded: DailySelection = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(reloaded, sel);
}
