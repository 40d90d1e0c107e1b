//! Per-horizon goal storage over a key-value provider.
//!
//! # Responsibility
//! - Load, save and mutate the four category stores (one JSON array each).
//! - Report per-horizon counts and wipe categories.
//!
//! # Invariants
//! - Every mutation is a full load-modify-save of one category, executed while
//!   holding that category's write lock; concurrent writers cannot lose updates.
//! - Writes reject records whose `type` differs from the category, duplicate
//!   ids and records failing `Goal::validate`.
//! - Reads return every record that deserializes; duplicate ids and invalid
//!   records already on disk are logged, not dropped.
//! - `load_goals` never fails: an unreadable blob degrades to an empty list.
//! - Mutations refuse to overwrite a blob they cannot deserialize.

use crate::kv::{KeyValueStore, KvError};
use crate::model::goal::{Goal, GoalId, GoalType, GoalValidationError};
use log::{error, info, warn};
use serde::Serialize;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Mutex, MutexGuard, PoisonError};

pub type StorageResult<T> = Result<T, StorageError>;

/// Storage error for goal category operations.
#[derive(Debug)]
pub enum StorageError {
    /// Underlying provider rejected a write.
    Write { category: GoalType, source: KvError },
    /// Underlying provider failed on a read used by a mutation.
    Read { category: GoalType, source: KvError },
    /// Removing one category key failed.
    Clear { category: GoalType, source: KvError },
    /// Removing all category keys failed.
    ClearAll { source: KvError },
    /// Persisted blob cannot be decoded into goals.
    Corrupt { category: GoalType, message: String },
    /// Goals could not be encoded.
    Serialize {
        category: GoalType,
        source: serde_json::Error,
    },
    NotFound { category: GoalType, id: GoalId },
    DuplicateId { category: GoalType, id: GoalId },
    /// Record `type` does not match the category it is written to.
    CategoryMismatch {
        category: GoalType,
        id: GoalId,
        actual: GoalType,
    },
    Validation(GoalValidationError),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Write { category, source } => {
                write!(f, "failed to save {category} goals: {source}")
            }
            Self::Read { category, source } => {
                write!(f, "failed to load {category} goals: {source}")
            }
            Self::Clear { category, source } => {
                write!(f, "failed to clear {category} goals: {source}")
            }
            Self::ClearAll { source } => write!(f, "failed to clear all goals: {source}"),
            Self::Corrupt { category, message } => {
                write!(f, "stored {category} goals are unreadable: {message}")
            }
            Self::Serialize { category, source } => {
                write!(f, "failed to encode {category} goals: {source}")
            }
            Self::NotFound { category, id } => {
                write!(f, "goal with id {id} not found in {category}")
            }
            Self::DuplicateId { category, id } => {
                write!(f, "goal with id {id} already exists in {category}")
            }
            Self::CategoryMismatch {
                category,
                id,
                actual,
            } => write!(
                f,
                "goal {id} has type {actual} and cannot be stored in {category}"
            ),
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Write { source, .. }
            | Self::Read { source, .. }
            | Self::Clear { source, .. }
            | Self::ClearAll { source } => Some(source),
            Self::Serialize { source, .. } => Some(source),
            Self::Validation(err) => Some(err),
            Self::Corrupt { .. }
            | Self::NotFound { .. }
            | Self::DuplicateId { .. }
            | Self::CategoryMismatch { .. } => None,
        }
    }
}

impl From<GoalValidationError> for StorageError {
    fn from(value: GoalValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Goal counts per horizon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StorageStats {
    pub today: usize,
    pub week: usize,
    pub month: usize,
    pub year: usize,
    pub total: usize,
}

impl StorageStats {
    fn record(&mut self, kind: GoalType, count: usize) {
        match kind {
            GoalType::Today => self.today = count,
            GoalType::Week => self.week = count,
            GoalType::Month => self.month = count,
            GoalType::Year => self.year = count,
        }
        self.total = self.today + self.week + self.month + self.year;
    }
}

/// Durable CRUD over the four goal category stores.
pub struct GoalStorage<S: KeyValueStore> {
    kv: S,
    write_locks: [Mutex<()>; 4],
}

impl<S: KeyValueStore> GoalStorage<S> {
    pub fn new(kv: S) -> Self {
        Self {
            kv,
            write_locks: Default::default(),
        }
    }

    /// Borrows the underlying provider.
    pub fn kv(&self) -> &S {
        &self.kv
    }

    /// Loads all goals of one horizon in insertion order.
    ///
    /// Missing data yields an empty list. Read and decode failures are logged
    /// and also yield an empty list.
    pub fn load_goals(&self, kind: GoalType) -> Vec<Goal> {
        match self.read_category(kind) {
            Ok(goals) => goals,
            Err(err) => {
                warn!(
                    "event=goals_load module=storage status=degraded category={} error={}",
                    kind, err
                );
                Vec::new()
            }
        }
    }

    /// Looks up one goal, failing on unreadable data.
    pub fn find_goal(&self, kind: GoalType, id: &str) -> StorageResult<Option<Goal>> {
        Ok(self
            .read_category(kind)?
            .into_iter()
            .find(|goal| goal.id == id))
    }

    /// Replaces the whole category with `goals`.
    ///
    /// # Errors
    /// - `Validation`, `CategoryMismatch` or `DuplicateId` for invalid input;
    ///   nothing is written in that case.
    /// - `Write` when the provider rejects the write.
    pub fn save_goals(&self, kind: GoalType, goals: &[Goal]) -> StorageResult<()> {
        let _guard = self.lock_category(kind);
        check_category(kind, goals)?;
        self.write_category(kind, goals)
    }

    /// Appends `goal` to the category.
    pub fn add_goal(&self, kind: GoalType, goal: &Goal) -> StorageResult<()> {
        goal.validate()?;
        ensure_kind(kind, goal)?;

        let _guard = self.lock_category(kind);
        let mut goals = self.read_category(kind)?;
        if goals.iter().any(|existing| existing.id == goal.id) {
            return Err(StorageError::DuplicateId {
                category: kind,
                id: goal.id.clone(),
            });
        }
        goals.push(goal.clone());
        self.write_category(kind, &goals)
    }

    /// Replaces the stored goal with the same id.
    ///
    /// The stored `created_at` is kept and `updated_at` never moves backwards.
    /// Returns the record as persisted.
    ///
    /// # Errors
    /// - `NotFound` when no goal has this id; the store is left unchanged.
    pub fn update_goal(&self, kind: GoalType, goal: &Goal) -> StorageResult<Goal> {
        goal.validate()?;
        ensure_kind(kind, goal)?;

        let replacement = goal.clone();
        self.modify_goal(kind, &goal.id, move |stored| {
            let created_at = stored.created_at;
            let previous_update = stored.updated_at;
            *stored = replacement;
            stored.created_at = created_at;
            stored.touch(previous_update);
        })
    }

    /// Applies `mutate` to one stored goal under the category write lock.
    ///
    /// The goal id and type cannot be changed by `mutate`.
    pub fn modify_goal<F>(&self, kind: GoalType, id: &str, mutate: F) -> StorageResult<Goal>
    where
        F: FnOnce(&mut Goal),
    {
        let _guard = self.lock_category(kind);
        let mut goals = self.read_category(kind)?;
        let Some(stored) = goals.iter_mut().find(|goal| goal.id == id) else {
            return Err(StorageError::NotFound {
                category: kind,
                id: id.to_string(),
            });
        };

        mutate(stored);
        stored.id = id.to_string();
        stored.kind = kind;
        stored.validate()?;
        let updated = stored.clone();

        self.write_category(kind, &goals)?;
        Ok(updated)
    }

    /// Removes the goal with `id`. Returns whether anything was removed.
    ///
    /// A missing id is a no-op and leaves the stored blob untouched.
    pub fn delete_goal(&self, kind: GoalType, id: &str) -> StorageResult<bool> {
        let _guard = self.lock_category(kind);
        let mut goals = self.read_category(kind)?;
        let before = goals.len();
        goals.retain(|goal| goal.id != id);
        if goals.len() == before {
            info!(
                "event=goal_delete module=storage status=noop category={}",
                kind
            );
            return Ok(false);
        }
        self.write_category(kind, &goals)?;
        Ok(true)
    }

    /// Removes the category key.
    pub fn clear_goals(&self, kind: GoalType) -> StorageResult<()> {
        let _guard = self.lock_category(kind);
        self.kv.remove_item(kind.storage_key()).map_err(|source| {
            error!(
                "event=goals_clear module=storage status=error category={} error={}",
                kind, source
            );
            StorageError::Clear {
                category: kind,
                source,
            }
        })?;
        info!(
            "event=goals_clear module=storage status=ok category={}",
            kind
        );
        Ok(())
    }

    /// Removes all four category keys in one batch.
    pub fn clear_all_goals(&self) -> StorageResult<()> {
        let _guards: Vec<_> = GoalType::ALL
            .iter()
            .map(|kind| self.lock_category(*kind))
            .collect();
        let keys = GoalType::ALL.map(GoalType::storage_key);
        self.kv.multi_remove(&keys).map_err(|source| {
            error!(
                "event=goals_clear_all module=storage status=error error={}",
                source
            );
            StorageError::ClearAll { source }
        })?;
        info!("event=goals_clear_all module=storage status=ok");
        Ok(())
    }

    /// Counts goals per horizon.
    ///
    /// Counts go through `load_goals`, so an unreadable horizon counts as zero
    /// while the other horizons keep their real counts.
    pub fn storage_stats(&self) -> StorageStats {
        let mut stats = StorageStats::default();
        for kind in GoalType::ALL {
            stats.record(kind, self.load_goals(kind).len());
        }
        stats
    }

    fn lock_category(&self, kind: GoalType) -> MutexGuard<'_, ()> {
        self.write_locks[kind.index()]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn read_category(&self, kind: GoalType) -> StorageResult<Vec<Goal>> {
        let raw = self
            .kv
            .get_item(kind.storage_key())
            .map_err(|source| StorageError::Read {
                category: kind,
                source,
            })?;
        let Some(raw) = raw else {
            return Ok(Vec::new());
        };

        let goals: Vec<Goal> =
            serde_json::from_str(&raw).map_err(|err| StorageError::Corrupt {
                category: kind,
                message: err.to_string(),
            })?;
        if let Some(foreign) = goals.iter().find(|goal| goal.kind != kind) {
            return Err(StorageError::Corrupt {
                category: kind,
                message: format!("goal {} has type {}", foreign.id, foreign.kind),
            });
        }
        if let Err(err) = check_category(kind, &goals) {
            warn!(
                "event=goals_load module=storage status=inconsistent category={} count={} error={}",
                kind,
                goals.len(),
                err
            );
        }
        Ok(goals)
    }

    fn write_category(&self, kind: GoalType, goals: &[Goal]) -> StorageResult<()> {
        let payload = serde_json::to_string(goals).map_err(|source| StorageError::Serialize {
            category: kind,
            source,
        })?;

        self.kv
            .set_item(kind.storage_key(), &payload)
            .map_err(|source| {
                error!(
                    "event=goals_write module=storage status=error category={} count={} error={}",
                    kind,
                    goals.len(),
                    source
                );
                StorageError::Write {
                    category: kind,
                    source,
                }
            })?;

        info!(
            "event=goals_write module=storage status=ok category={} count={} bytes={}",
            kind,
            goals.len(),
            payload.len()
        );
        Ok(())
    }
}

fn ensure_kind(kind: GoalType, goal: &Goal) -> StorageResult<()> {
    if goal.kind != kind {
        return Err(StorageError::CategoryMismatch {
            category: kind,
            id: goal.id.clone(),
            actual: goal.kind,
        });
    }
    Ok(())
}

fn check_category(kind: GoalType, goals: &[Goal]) -> StorageResult<()> {
    let mut seen = HashSet::with_capacity(goals.len());
    for goal in goals {
        goal.validate()?;
        ensure_kind(kind, goal)?;
        if !seen.insert(goal.id.as_str()) {
            return Err(StorageError::DuplicateId {
                category: kind,
                id: goal.id.clone(),
            });
        }
    }
    Ok(())
}
