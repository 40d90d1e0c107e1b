//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose goal use-cases to Dart via FRB as plain envelopes.
//! - Own the single process-wide goal service for the mobile app.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Every caller shares one `GoalService`, so per-horizon write locks
//!   serialize all mutations issued by the UI.
//! - Timestamps cross the boundary as Unix epoch milliseconds.

use horizon_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    resolve_db_path, Goal, GoalService, GoalType, SqliteKvStore, StorageStats,
};
use log::error;
use once_cell::sync::OnceCell;

static GOAL_SERVICE: OnceCell<GoalService<SqliteKvStore>> = OnceCell::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Goal projection shown by list screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalItem {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    /// Horizon label (`today|week|month|year`).
    pub kind: String,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

/// List envelope for one horizon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalListResponse {
    pub ok: bool,
    pub items: Vec<GoalItem>,
    pub completed_count: u32,
    pub message: String,
}

/// Mutation envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalActionResponse {
    pub ok: bool,
    /// Goal as persisted after the mutation, when there is one.
    pub goal: Option<GoalItem>,
    pub message: String,
}

impl GoalActionResponse {
    fn success(message: impl Into<String>, goal: Option<&Goal>) -> Self {
        Self {
            ok: true,
            goal: goal.map(to_goal_item),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            goal: None,
            message: message.into(),
        }
    }
}

/// Per-horizon goal counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoalStatsResponse {
    pub today: u32,
    pub week: u32,
    pub month: u32,
    pub year: u32,
    pub total: u32,
}

/// Lists goals of one horizon in insertion order.
///
/// # FFI contract
/// - Never panics; unreadable stored data yields an empty list.
#[flutter_rust_bridge::frb(sync)]
pub fn goals_list(kind: String) -> GoalListResponse {
    let result = parse_kind(&kind).and_then(|kind| {
        with_goal_service(|service| Ok(service.list_goals(kind)))
    });
    match result {
        Ok(goals) => {
            let completed_count = goals.iter().filter(|goal| goal.completed).count();
            GoalListResponse {
                ok: true,
                completed_count: saturating_u32(completed_count),
                message: format!("{completed_count}/{} completed.", goals.len()),
                items: goals.iter().map(to_goal_item).collect(),
            }
        }
        Err(message) => GoalListResponse {
            ok: false,
            items: Vec::new(),
            completed_count: 0,
            message: format!("goals_list failed: {message}"),
        },
    }
}

/// Creates a goal from form input.
#[flutter_rust_bridge::frb(sync)]
pub fn goal_create(kind: String, title: String, description: Option<String>) -> GoalActionResponse {
    let result = parse_kind(&kind).and_then(|kind| {
        with_goal_service(|service| {
            service
                .create_goal(kind, &title, description.as_deref())
                .map_err(|err| err.to_string())
        })
    });
    match result {
        Ok(goal) => GoalActionResponse::success("Goal created.", Some(&goal)),
        Err(message) => report_failure("goal_create", message),
    }
}

/// Flips completion of one goal.
#[flutter_rust_bridge::frb(sync)]
pub fn goal_toggle(kind: String, id: String) -> GoalActionResponse {
    let result = parse_kind(&kind).and_then(|kind| {
        with_goal_service(|service| service.toggle_goal(kind, &id).map_err(|err| err.to_string()))
    });
    match result {
        Ok(goal) => GoalActionResponse::success("Goal updated.", Some(&goal)),
        Err(message) => report_failure("goal_toggle", message),
    }
}

/// Replaces title and description of one goal.
#[flutter_rust_bridge::frb(sync)]
pub fn goal_edit(
    kind: String,
    id: String,
    title: String,
    description: Option<String>,
) -> GoalActionResponse {
    let result = parse_kind(&kind).and_then(|kind| {
        with_goal_service(|service| {
            service
                .edit_goal(kind, &id, &title, description.as_deref())
                .map_err(|err| err.to_string())
        })
    });
    match result {
        Ok(goal) => GoalActionResponse::success("Goal updated.", Some(&goal)),
        Err(message) => report_failure("goal_edit", message),
    }
}

/// Deletes one goal; deleting a missing id still succeeds.
#[flutter_rust_bridge::frb(sync)]
pub fn goal_delete(kind: String, id: String) -> GoalActionResponse {
    let result = parse_kind(&kind).and_then(|kind| {
        with_goal_service(|service| service.delete_goal(kind, &id).map_err(|err| err.to_string()))
    });
    match result {
        Ok(true) => GoalActionResponse::success("Goal deleted.", None),
        Ok(false) => GoalActionResponse::success("Goal already absent.", None),
        Err(message) => report_failure("goal_delete", message),
    }
}

/// Removes every goal of one horizon.
#[flutter_rust_bridge::frb(sync)]
pub fn goals_clear(kind: String) -> GoalActionResponse {
    let result = parse_kind(&kind).and_then(|kind| {
        with_goal_service(|service| service.clear_goals(kind).map_err(|err| err.to_string()))
    });
    match result {
        Ok(()) => GoalActionResponse::success("Goals cleared.", None),
        Err(message) => report_failure("goals_clear", message),
    }
}

/// Removes every goal of every horizon.
#[flutter_rust_bridge::frb(sync)]
pub fn goals_clear_all() -> GoalActionResponse {
    match with_goal_service(|service| service.clear_all_goals().map_err(|err| err.to_string())) {
        Ok(()) => GoalActionResponse::success("All goals cleared.", None),
        Err(message) => report_failure("goals_clear_all", message),
    }
}

/// Goal counts per horizon; all zeros when storage cannot be read.
#[flutter_rust_bridge::frb(sync)]
pub fn goals_storage_stats() -> GoalStatsResponse {
    let stats = with_goal_service(|service| Ok(service.storage_stats())).unwrap_or_default();
    to_stats_response(stats)
}

fn with_goal_service<T>(
    f: impl FnOnce(&GoalService<SqliteKvStore>) -> Result<T, String>,
) -> Result<T, String> {
    let service = GOAL_SERVICE.get_or_try_init(|| {
        let db_path = resolve_db_path(None);
        SqliteKvStore::open(&db_path)
            .map(GoalService::with_store)
            .map_err(|err| format!("goal DB open failed at `{}`: {err}", db_path.display()))
    })?;
    f(service)
}

fn parse_kind(kind: &str) -> Result<GoalType, String> {
    kind.parse::<GoalType>().map_err(|err| err.to_string())
}

fn report_failure(operation: &str, message: String) -> GoalActionResponse {
    error!("event=ffi_call module=ffi status=error op={operation} error={message}");
    GoalActionResponse::failure(format!("{operation} failed: {message}"))
}

fn to_goal_item(goal: &Goal) -> GoalItem {
    GoalItem {
        id: goal.id.clone(),
        title: goal.title.clone(),
        description: goal.description.clone(),
        completed: goal.completed,
        kind: goal.kind.as_str().to_string(),
        created_at_ms: goal.created_at.timestamp_millis(),
        updated_at_ms: goal.updated_at.timestamp_millis(),
    }
}

fn to_stats_response(stats: StorageStats) -> GoalStatsResponse {
    GoalStatsResponse {
        today: saturating_u32(stats.today),
        week: saturating_u32(stats.week),
        month: saturating_u32(stats.month),
        year: saturating_u32(stats.year),
        total: saturating_u32(stats.total),
    }
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, goal_create, goal_delete, goal_edit, goal_toggle, goals_list,
        goals_storage_stats, init_logging, ping,
    };
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_bad_input() {
        assert!(!init_logging("info".to_string(), String::new()).is_empty());
        assert!(!init_logging("verbose".to_string(), "/tmp/logs".to_string()).is_empty());
    }

    #[test]
    fn unknown_horizon_is_reported_not_panicked() {
        let response = goal_create("decade".to_string(), "x".to_string(), None);
        assert!(!response.ok);
        assert!(response.message.contains("decade"));

        let listed = goals_list("fortnight".to_string());
        assert!(!listed.ok);
        assert!(listed.items.is_empty());
    }

    #[test]
    fn create_toggle_edit_delete_roundtrip() {
        let title = unique_token("ffi-goal");
        let created = goal_create("week".to_string(), format!("  {title}  "), None);
        assert!(created.ok, "{}", created.message);
        let item = created.goal.expect("created goal should be returned");
        assert_eq!(item.title, title);
        assert_eq!(item.kind, "week");
        assert!(!item.completed);

        let toggled = goal_toggle("week".to_string(), item.id.clone());
        assert!(toggled.ok, "{}", toggled.message);
        let toggled_item = toggled.goal.expect("toggled goal should be returned");
        assert!(toggled_item.completed);
        assert!(toggled_item.updated_at_ms >= item.updated_at_ms);

        let edited = goal_edit(
            "week".to_string(),
            item.id.clone(),
            format!("{title}-edited"),
            Some("notes".to_string()),
        );
        assert!(edited.ok, "{}", edited.message);

        let listed = goals_list("week".to_string());
        let stored = listed
            .items
            .iter()
            .find(|goal| goal.id == item.id)
            .expect("goal should be listed");
        assert_eq!(stored.title, format!("{title}-edited"));
        assert_eq!(stored.description.as_deref(), Some("notes"));
        assert!(stored.completed);

        assert!(goal_delete("week".to_string(), item.id.clone()).ok);
        assert!(goal_delete("week".to_string(), item.id.clone()).ok);
        let listed = goals_list("week".to_string());
        assert!(listed.items.iter().all(|goal| goal.id != item.id));
    }

    #[test]
    fn toggle_unknown_goal_fails_with_message() {
        let response = goal_toggle("year".to_string(), unique_token("missing"));
        assert!(!response.ok);
        assert!(response.message.contains("not found"));
    }

    #[test]
    fn stats_total_matches_horizon_sum() {
        let created = goal_create("month".to_string(), unique_token("stats"), None);
        assert!(created.ok, "{}", created.message);

        let stats = goals_storage_stats();
        assert!(stats.month >= 1);
        assert_eq!(
            stats.total,
            stats.today + stats.week + stats.month + stats.year
        );
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
