//! In-memory template tree and sibling ordering.
//!
//! # Responsibility
//! - Hold the session's authoritative copy of the hierarchy.
//! - Keep local mutations synchronous and independent of persistence.

pub mod arena;
pub mod ordering;
