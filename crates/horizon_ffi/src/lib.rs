//! Flutter bridge for Horizon goals.
//!
//! Thin adapter over `horizon_core`; no business rules live here.

pub mod api;
