//! Durable-store boundary for template trees.
//!
//! # Responsibility
//! - Define the adapter contract the workspace mirrors mutations through.
//! - Queue mirrored writes until the host sends them.
//! - Ship a SQLite-backed store and a local-only fallback.

pub mod adapter;
pub mod local_only;
pub mod outbox;
pub mod sqlite_store;
