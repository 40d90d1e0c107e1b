//! Goal domain model.
//!
//! # Responsibility
//! - Define canonical data structures shared by storage, service and FFI.
//!
//! # Invariants
//! - Every goal belongs to exactly one horizon (`GoalType`).

pub mod goal;
