//! Goal use-case service.
//!
//! # Responsibility
//! - Turn raw front-end input (title/description text) into stored goals.
//! - Provide toggle/edit/delete/progress entry points for one horizon at a time.
//!
//! # Invariants
//! - Titles are trimmed and must be non-blank; blank descriptions become `None`.
//! - Toggle and edit run as a single locked read-modify-write in storage.

use crate::kv::KeyValueStore;
use crate::model::goal::{Goal, GoalType, GoalValidationError};
use crate::storage::goal_storage::{GoalStorage, StorageResult, StorageStats};
use chrono::Utc;
use log::info;

/// Completion summary for one horizon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GoalProgress {
    pub completed: usize,
    pub pending: usize,
    pub total: usize,
}

impl GoalProgress {
    pub fn from_goals(goals: &[Goal]) -> Self {
        let completed = goals.iter().filter(|goal| goal.completed).count();
        Self {
            completed,
            pending: goals.len() - completed,
            total: goals.len(),
        }
    }
}

/// Use-case service over an injected `GoalStorage`.
pub struct GoalService<S: KeyValueStore> {
    storage: GoalStorage<S>,
}

impl<S: KeyValueStore> GoalService<S> {
    pub fn new(storage: GoalStorage<S>) -> Self {
        Self { storage }
    }

    /// Convenience constructor wrapping a provider in fresh storage.
    pub fn with_store(kv: S) -> Self {
        Self::new(GoalStorage::new(kv))
    }

    pub fn storage(&self) -> &GoalStorage<S> {
        &self.storage
    }

    pub fn list_goals(&self, kind: GoalType) -> Vec<Goal> {
        self.storage.load_goals(kind)
    }

    /// Creates and stores a pending goal from user input.
    ///
    /// # Errors
    /// - `Validation(EmptyTitle)` when `title` is blank after trimming.
    pub fn create_goal(
        &self,
        kind: GoalType,
        title: &str,
        description: Option<&str>,
    ) -> StorageResult<Goal> {
        let title = normalize_title(title)?;
        let mut goal = Goal::new(kind, title);
        goal.description = normalize_description(description);

        self.storage.add_goal(kind, &goal)?;
        info!(
            "event=goal_create module=service status=ok category={} has_description={}",
            kind,
            goal.description.is_some()
        );
        Ok(goal)
    }

    /// Flips the completion flag of one goal.
    pub fn toggle_goal(&self, kind: GoalType, id: &str) -> StorageResult<Goal> {
        let now = Utc::now();
        self.storage
            .modify_goal(kind, id, |goal| goal.toggle_completed(now))
    }

    /// Replaces title and description of one goal.
    pub fn edit_goal(
        &self,
        kind: GoalType,
        id: &str,
        title: &str,
        description: Option<&str>,
    ) -> StorageResult<Goal> {
        let title = normalize_title(title)?;
        let description = normalize_description(description);
        let now = Utc::now();
        self.storage
            .modify_goal(kind, id, |goal| goal.edit(title, description, now))
    }

    /// Deletes one goal; `false` when it did not exist.
    pub fn delete_goal(&self, kind: GoalType, id: &str) -> StorageResult<bool> {
        self.storage.delete_goal(kind, id)
    }

    pub fn progress(&self, kind: GoalType) -> GoalProgress {
        GoalProgress::from_goals(&self.storage.load_goals(kind))
    }

    pub fn storage_stats(&self) -> StorageStats {
        self.storage.storage_stats()
    }

    pub fn clear_goals(&self, kind: GoalType) -> StorageResult<()> {
        self.storage.clear_goals(kind)
    }

    pub fn clear_all_goals(&self) -> StorageResult<()> {
        self.storage.clear_all_goals()
    }
}

fn normalize_title(title: &str) -> Result<String, GoalValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(GoalValidationError::EmptyTitle);
    }
    Ok(trimmed.to_string())
}

fn normalize_description(description: Option<&str>) -> Option<String> {
    description
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::{normalize_description, normalize_title};

    #[test]
    fn normalize_description_drops_blank_text() {
        assert_eq!(normalize_description(Some("   ")), None);
        assert_eq!(normalize_description(None), None);
        assert_eq!(
            normalize_description(Some(" stretch ")).as_deref(),
            Some("stretch")
        );
    }

    #[test]
    fn normalize_title_trims() {
        assert_eq!(normalize_title("  read  ").unwrap(), "read");
        assert!(normalize_title("\t\n").is_err());
    }
}
