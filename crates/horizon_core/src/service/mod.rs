//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate storage calls into the entry points front ends use.
//! - Keep FFI/CLI layers decoupled from key layout and encoding.

pub mod goal_service;
