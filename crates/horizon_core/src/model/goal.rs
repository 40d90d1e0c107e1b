//! Goal domain model.
//!
//! # Responsibility
//! - Define the persisted goal record and its horizon discriminator.
//! - Provide mutation helpers that keep timestamps monotonic.
//!
//! # Invariants
//! - `id` is non-empty and stable for the lifetime of a goal.
//! - `title` is non-empty after trimming.
//! - `updated_at >= created_at`, and `updated_at` never moves backwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Opaque goal identifier. Generated by callers; unique per horizon.
pub type GoalId = String;

/// Goal scoping period. Each horizon owns one independent category store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    Today,
    Week,
    Month,
    Year,
}

impl GoalType {
    /// All horizons in canonical order.
    ///
    /// Multi-horizon operations iterate (and lock) in this order.
    pub const ALL: [GoalType; 4] = [
        GoalType::Today,
        GoalType::Week,
        GoalType::Month,
        GoalType::Year,
    ];

    /// Stable lowercase label used on the wire and in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    /// Key-value storage key holding this horizon's goal array.
    pub fn storage_key(self) -> &'static str {
        match self {
            Self::Today => "goals_today",
            Self::Week => "goals_week",
            Self::Month => "goals_month",
            Self::Year => "goals_year",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Self::Today => 0,
            Self::Week => 1,
            Self::Month => 2,
            Self::Year => 3,
        }
    }
}

impl Display for GoalType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a horizon label cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseGoalTypeError(pub String);

impl Display for ParseGoalTypeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unsupported goal type `{}`; expected today|week|month|year",
            self.0
        )
    }
}

impl Error for ParseGoalTypeError {}

impl FromStr for GoalType {
    type Err = ParseGoalTypeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "today" => Ok(Self::Today),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            other => Err(ParseGoalTypeError(other.to_string())),
        }
    }
}

/// Validation error for goal invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoalValidationError {
    EmptyId,
    EmptyTitle,
    UpdatedBeforeCreated {
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    },
}

impl Display for GoalValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "goal id cannot be empty"),
            Self::EmptyTitle => write!(f, "goal title cannot be blank"),
            Self::UpdatedBeforeCreated {
                created_at,
                updated_at,
            } => write!(
                f,
                "updatedAt ({}) must be >= createdAt ({})",
                updated_at.to_rfc3339(),
                created_at.to_rfc3339()
            ),
        }
    }
}

impl Error for GoalValidationError {}

/// Persisted goal record.
///
/// Serialized with camelCase field names; timestamps are RFC 3339 strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: GoalId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub completed: bool,
    /// Serialized as `type` to match the stored schema.
    #[serde(rename = "type")]
    pub kind: GoalType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Goal {
    /// Creates a pending goal with a generated id and current timestamps.
    pub fn new(kind: GoalType, title: impl Into<String>) -> Self {
        Self::with_id(new_goal_id(), kind, title, Utc::now())
    }

    /// Creates a pending goal with a caller-provided id and creation time.
    ///
    /// Does not validate; writes through `GoalStorage` do.
    pub fn with_id(
        id: impl Into<GoalId>,
        kind: GoalType,
        title: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            completed: false,
            kind,
            created_at: now,
            updated_at: now,
        }
    }

    /// Checks record-level invariants.
    pub fn validate(&self) -> Result<(), GoalValidationError> {
        if self.id.trim().is_empty() {
            return Err(GoalValidationError::EmptyId);
        }
        if self.title.trim().is_empty() {
            return Err(GoalValidationError::EmptyTitle);
        }
        if self.updated_at < self.created_at {
            return Err(GoalValidationError::UpdatedBeforeCreated {
                created_at: self.created_at,
                updated_at: self.updated_at,
            });
        }
        Ok(())
    }

    /// Advances `updated_at` to `now` unless it is already later.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        if now > self.updated_at {
            self.updated_at = now;
        }
    }

    pub fn set_completed(&mut self, completed: bool, now: DateTime<Utc>) {
        self.completed = completed;
        self.touch(now);
    }

    pub fn toggle_completed(&mut self, now: DateTime<Utc>) {
        self.set_completed(!self.completed, now);
    }

    /// Replaces title and description (full replacement, not a patch).
    pub fn edit(
        &mut self,
        title: impl Into<String>,
        description: Option<String>,
        now: DateTime<Utc>,
    ) {
        self.title = title.into();
        self.description = description;
        self.touch(now);
    }
}

/// Generates a fresh goal id.
pub fn new_goal_id() -> GoalId {
    Uuid::new_v4().to_string()
}
