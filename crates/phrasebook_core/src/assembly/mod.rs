//! Selection tracking and text assembly.
//!
//! # Responsibility
//! - Track active sentences and fill values for the open subcategory.
//! - Render selections into grouped preview text and clipboard text.

pub mod render;
pub mod selection;
