//! Key-value persistence providers.
//!
//! # Responsibility
//! - Define the string-keyed storage contract the goal store is written against.
//! - Provide a durable SQLite provider and an in-memory provider.
//!
//! # Invariants
//! - Providers have no transactionality beyond single calls; `multi_remove`
//!   applies all removals or none.
//! - Removing a missing key is not an error.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory_kv;
mod sqlite_kv;

pub use memory_kv::MemoryKvStore;
pub use sqlite_kv::SqliteKvStore;

pub type KvResult<T> = Result<T, KvError>;

/// Provider-level failure.
#[derive(Debug)]
pub enum KvError {
    Db(DbError),
    /// Provider refused the operation (read-only, quota, injected failure).
    Unavailable(String),
}

impl Display for KvError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Unavailable(message) => write!(f, "key-value store unavailable: {message}"),
        }
    }
}

impl Error for KvError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for KvError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for KvError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// String key to string value storage.
pub trait KeyValueStore: Send + Sync {
    fn get_item(&self, key: &str) -> KvResult<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> KvResult<()>;
    fn remove_item(&self, key: &str) -> KvResult<()>;
    fn multi_remove(&self, keys: &[&str]) -> KvResult<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    fn get_item(&self, key: &str) -> KvResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> KvResult<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> KvResult<()> {
        (**self).remove_item(key)
    }

    fn multi_remove(&self, keys: &[&str]) -> KvResult<()> {
        (**self).multi_remove(keys)
    }
}
