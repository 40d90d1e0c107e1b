//! Core domain logic for Horizon goals.
//! This crate is the single writer of persisted goal state.

pub mod config;
pub mod db;
pub mod kv;
pub mod logging;
pub mod model;
pub mod service;
pub mod storage;

pub use config::{resolve_db_path, DB_PATH_ENV};
pub use kv::{KeyValueStore, KvError, KvResult, MemoryKvStore, SqliteKvStore};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::goal::{new_goal_id, Goal, GoalId, GoalType, GoalValidationError, ParseGoalTypeError};
pub use service::goal_service::{GoalProgress, GoalService};
pub use storage::goal_storage::{GoalStorage, StorageError, StorageResult, StorageStats};

/// Minimal health-check API for front-end wiring checks.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
