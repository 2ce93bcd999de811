//! Template hierarchy entities and their persisted record shapes.
//!
//! # Responsibility
//! - Define the four container levels (category → subcategory → section →
//!   sentence) as arena entries linked by id.
//! - Define nested record shapes exchanged with sync adapters.
//!
//! # Invariants
//! - Every entity id is stable for the entity lifetime and never reused.
//! - A child belongs to exactly one parent; parent ids are immutable.
//! - `display_order` in records is the dense position within siblings.

use crate::model::part::Part;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type CategoryId = Uuid;
pub type SubcategoryId = Uuid;
pub type SectionId = Uuid;
pub type SentenceId = Uuid;

/// Top-level named group; root of one template tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub title: String,
    pub description: String,
    /// Children in display order.
    pub subcategories: Vec<SubcategoryId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subcategory {
    pub id: SubcategoryId,
    pub category_id: CategoryId,
    pub title: String,
    /// Children in display order.
    pub sections: Vec<SectionId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub id: SectionId,
    pub subcategory_id: SubcategoryId,
    pub title: String,
    /// Children in display order.
    pub sentences: Vec<SentenceId>,
}

/// Ordered list of parts. Never empty once stored in a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    pub id: SentenceId,
    pub section_id: SectionId,
    pub parts: Vec<Part>,
}

/// Persisted order of one sibling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderEntry {
    pub id: Uuid,
    pub display_order: i64,
}

/// Nested category record used by load and whole-tree snapshot paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub id: CategoryId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub display_order: i64,
    #[serde(default)]
    pub subcategories: Vec<SubcategoryRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubcategoryRecord {
    pub id: SubcategoryId,
    pub title: String,
    pub display_order: i64,
    #[serde(default)]
    pub sections: Vec<SectionRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRecord {
    pub id: SectionId,
    pub title: String,
    pub display_order: i64,
    #[serde(default)]
    pub sentences: Vec<SentenceRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceRecord {
    pub id: SentenceId,
    pub display_order: i64,
    /// Parts in sentence order.
    #[serde(default)]
    pub parts: Vec<Part>,
}
