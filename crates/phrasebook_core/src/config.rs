//! Session configuration.
//!
//! # Responsibility
//! - Hold timing intervals and default titles/labels for new entities.
//! - Deserialize partial configs, filling gaps from defaults.

use crate::model::part::PartDefaults;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Titles given to newly added entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateDefaults {
    pub category_title: String,
    pub category_description: String,
    pub subcategory_title: String,
    pub section_title: String,
    pub parts: PartDefaults,
}

impl Default for TemplateDefaults {
    fn default() -> Self {
        Self {
            category_title: "New category".to_string(),
            category_description: "Short description".to_string(),
            subcategory_title: "New topic".to_string(),
            section_title: "New group".to_string(),
            parts: PartDefaults::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhrasebookConfig {
    /// Trailing debounce of whole-tree snapshot writes.
    pub snapshot_debounce_ms: u64,
    /// How long the builder reports "copied" after a copy.
    pub copy_feedback_ms: u64,
    /// Lifetime of a transient notice.
    pub notice_ttl_ms: u64,
    pub defaults: TemplateDefaults,
}

impl PhrasebookConfig {
    pub fn snapshot_debounce(&self) -> Duration {
        Duration::from_millis(self.snapshot_debounce_ms)
    }

    pub fn copy_feedback(&self) -> Duration {
        Duration::from_millis(self.copy_feedback_ms)
    }

    pub fn notice_ttl(&self) -> Duration {
        Duration::from_millis(self.notice_ttl_ms)
    }
}

impl Default for PhrasebookConfig {
    fn default() -> Self {
        Self {
            snapshot_debounce_ms: 1000,
            copy_feedback_ms: 2000,
            notice_ttl_ms: 3000,
            defaults: TemplateDefaults::default(),
        }
    }
}
