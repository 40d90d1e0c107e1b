//! Runtime configuration shared by the FFI and CLI front ends.
//!
//! # Responsibility
//! - Resolve where the goal database lives.
//!
//! # Invariants
//! - Precedence is explicit path, then `HORIZON_DB_PATH`, then the default file
//!   in the OS temp directory.
//! - Blank values are ignored at every level.

use std::path::{Path, PathBuf};

/// Environment variable overriding the database location.
pub const DB_PATH_ENV: &str = "HORIZON_DB_PATH";
/// Default database file name.
pub const DEFAULT_DB_FILE_NAME: &str = "horizon_goals.sqlite3";

/// Resolves the database path from an explicit value, the environment, or the default.
pub fn resolve_db_path(explicit: Option<&Path>) -> PathBuf {
    let env_value = std::env::var(DB_PATH_ENV).ok();
    resolve_db_path_from(explicit, env_value.as_deref())
}

fn resolve_db_path_from(explicit: Option<&Path>, env_value: Option<&str>) -> PathBuf {
    if let Some(path) = explicit.filter(|path| !path.as_os_str().is_empty()) {
        return path.to_path_buf();
    }
    if let Some(raw) = env_value.map(str::trim).filter(|raw| !raw.is_empty()) {
        return PathBuf::from(raw);
    }
    std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)
}
