//! Goal category storage.
//!
//! # Responsibility
//! - Own all reads and writes of persisted goal state.
//! - Keep key layout and JSON encoding private to this module.

pub mod goal_storage;
