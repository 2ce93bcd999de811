//! Template domain model.
//!
//! # Responsibility
//! - Define the part sum type and the hierarchy entities.
//! - Define nested records exchanged with persistence adapters.
//!
//! # Invariants
//! - Every entity is identified by a stable, caller-assigned id.
//! - Ownership is strictly tree-shaped; there is no re-parenting.

pub mod part;
pub mod template;
