//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate tree mutations, adapter mirroring and snapshot scheduling.
//! - Keep callers decoupled from storage details.

pub mod builder;
pub mod workspace;
