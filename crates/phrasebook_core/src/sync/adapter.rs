//! Sync adapter contract between the in-memory tree and a durable store.
//!
//! # Responsibility
//! - Define one CRUD call per entity and level, plus reorder and whole-tree
//!   snapshot writes.
//! - Define the structured failure taxonomy callers react to.
//!
//! # Invariants
//! - Deletes cascade to every descendant in the store.
//! - Reorders rewrite the order of every sibling, not only moved ones.
//! - Unauthenticated callers either get a no-op `Ok` or
//!   `SyncError::NotAuthenticated`; both mean "keep local state only".

use crate::db::DbError;
use crate::model::part::Part;
use crate::model::template::{
    CategoryId, CategoryRecord, OrderEntry, SectionId, SentenceId, SubcategoryId,
};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Owner identity of a template tree.
pub type OwnerId = String;

/// Result type used by sync adapter calls.
pub type SyncResult<T> = Result<T, SyncError>;

/// Structured failure from a sync adapter call.
#[derive(Debug)]
pub enum SyncError {
    /// No signed-in owner for this store session.
    NotAuthenticated,
    /// Store cannot be reached.
    Unavailable(String),
    /// Target entity does not exist or belongs to another owner.
    NotFound(Uuid),
    /// Underlying storage failure.
    Store(DbError),
    /// Persisted data cannot be converted to a valid record.
    InvalidData(String),
}

/// Coarse failure class used for user-facing notices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncFailureKind {
    /// Store unreachable or caller unauthenticated; continue local-only.
    RemoteUnavailable,
    /// Any other structured failure.
    Unexpected,
}

impl SyncError {
    pub fn kind(&self) -> SyncFailureKind {
        match self {
            Self::NotAuthenticated | Self::Unavailable(_) => SyncFailureKind::RemoteUnavailable,
            Self::NotFound(_) | Self::Store(_) | Self::InvalidData(_) => {
                SyncFailureKind::Unexpected
            }
        }
    }

    /// Stable machine-readable code for logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotAuthenticated => "not_authenticated",
            Self::Unavailable(_) => "unavailable",
            Self::NotFound(_) => "not_found",
            Self::Store(_) => "store_error",
            Self::InvalidData(_) => "invalid_data",
        }
    }
}

impl Display for SyncError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAuthenticated => write!(f, "not authenticated"),
            Self::Unavailable(message) => write!(f, "template store unavailable: {message}"),
            Self::NotFound(id) => write!(f, "template entity not found in store: {id}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid stored template data: {message}"),
        }
    }
}

impl Error for SyncError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for SyncError {
    fn from(value: DbError) -> Self {
        Self::Store(value)
    }
}

impl From<rusqlite::Error> for SyncError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Store(DbError::Sqlite(value))
    }
}

/// Flat category row for create/update calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRow {
    pub id: CategoryId,
    pub title: String,
    pub description: String,
    pub display_order: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubcategoryRow {
    pub id: SubcategoryId,
    pub category_id: CategoryId,
    pub title: String,
    pub display_order: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionRow {
    pub id: SectionId,
    pub subcategory_id: SubcategoryId,
    pub title: String,
    pub display_order: i64,
}

/// Sentence row; `parts` replace the stored parts wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceRow {
    pub id: SentenceId,
    pub section_id: SectionId,
    pub display_order: i64,
    pub parts: Vec<Part>,
}

/// Durable store contract consumed by the template workspace.
pub trait SyncAdapter {
    /// Loads the full hierarchy of `owner_id`, ordered at every level.
    ///
    /// Returns an empty list when nothing is stored or the caller is not
    /// signed in as `owner_id`.
    fn load_tree(&self, owner_id: &str) -> SyncResult<Vec<CategoryRecord>>;

    fn create_category(&self, row: &CategoryRow) -> SyncResult<()>;
    fn update_category(&self, row: &CategoryRow) -> SyncResult<()>;
    /// Deletes a category and its whole subtree.
    fn delete_category(&self, id: CategoryId) -> SyncResult<()>;
    fn reorder_categories(&self, order: &[OrderEntry]) -> SyncResult<()>;

    fn create_subcategory(&self, row: &SubcategoryRow) -> SyncResult<()>;
    fn update_subcategory(&self, row: &SubcategoryRow) -> SyncResult<()>;
    fn delete_subcategory(&self, id: SubcategoryId) -> SyncResult<()>;
    fn reorder_subcategories(&self, category_id: CategoryId, order: &[OrderEntry])
        -> SyncResult<()>;

    fn create_section(&self, row: &SectionRow) -> SyncResult<()>;
    fn update_section(&self, row: &SectionRow) -> SyncResult<()>;
    fn delete_section(&self, id: SectionId) -> SyncResult<()>;
    fn reorder_sections(&self, subcategory_id: SubcategoryId, order: &[OrderEntry])
        -> SyncResult<()>;

    fn create_sentence(&self, row: &SentenceRow) -> SyncResult<()>;
    /// Updates order and replaces all parts of a sentence.
    fn update_sentence(&self, row: &SentenceRow) -> SyncResult<()>;
    fn delete_sentence(&self, id: SentenceId) -> SyncResult<()>;
    fn reorder_sentences(&self, section_id: SectionId, order: &[OrderEntry]) -> SyncResult<()>;

    /// Upserts the whole hierarchy, replacing each sentence's parts.
    fn save_full_structure(&self, tree: &[CategoryRecord]) -> SyncResult<()>;
}

/// Adapter call names used for logging and notices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOp {
    LoadTree,
    CreateCategory,
    UpdateCategory,
    DeleteCategory,
    ReorderCategories,
    CreateSubcategory,
    UpdateSubcategory,
    DeleteSubcategory,
    ReorderSubcategories,
    CreateSection,
    UpdateSection,
    DeleteSection,
    ReorderSections,
    CreateSentence,
    UpdateSentence,
    DeleteSentence,
    ReorderSentences,
    SaveFullStructure,
}

impl SyncOp {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LoadTree => "load_tree",
            Self::CreateCategory => "create_category",
            Self::UpdateCategory => "update_category",
            Self::DeleteCategory => "delete_category",
            Self::ReorderCategories => "reorder_categories",
            Self::CreateSubcategory => "create_subcategory",
            Self::UpdateSubcategory => "update_subcategory",
            Self::DeleteSubcategory => "delete_subcategory",
            Self::ReorderSubcategories => "reorder_subcategories",
            Self::CreateSection => "create_section",
            Self::UpdateSection => "update_section",
            Self::DeleteSection => "delete_section",
            Self::ReorderSections => "reorder_sections",
            Self::CreateSentence => "create_sentence",
            Self::UpdateSentence => "update_sentence",
            Self::DeleteSentence => "delete_sentence",
            Self::ReorderSentences => "reorder_sentences",
            Self::SaveFullStructure => "save_full_structure",
        }
    }

    /// User-facing failure notice text.
    pub fn failure_message(self) -> &'static str {
        match self {
            Self::LoadTree => "Failed to load templates",
            Self::CreateCategory => "Failed to add category",
            Self::UpdateCategory => "Failed to update category",
            Self::DeleteCategory => "Failed to delete category",
            Self::CreateSubcategory => "Failed to add subcategory",
            Self::UpdateSubcategory => "Failed to update subcategory",
            Self::DeleteSubcategory => "Failed to delete subcategory",
            Self::CreateSection => "Failed to add group",
            Self::UpdateSection => "Failed to update group",
            Self::DeleteSection => "Failed to delete group",
            Self::CreateSentence => "Failed to add sentence",
            Self::UpdateSentence => "Failed to update sentence",
            Self::DeleteSentence => "Failed to delete sentence",
            Self::ReorderCategories
            | Self::ReorderSubcategories
            | Self::ReorderSections
            | Self::ReorderSentences => "Failed to save new order",
            Self::SaveFullStructure => "Failed to save templates",
        }
    }

    /// User-facing success notice text, for calls that announce success.
    pub fn success_message(self) -> Option<&'static str> {
        match self {
            Self::CreateCategory => Some("Category added"),
            Self::DeleteCategory => Some("Category deleted"),
            Self::CreateSubcategory => Some("Subcategory added"),
            Self::DeleteSubcategory => Some("Subcategory deleted"),
            Self::CreateSection => Some("Group added"),
            Self::DeleteSection => Some("Group deleted"),
            _ => None,
        }
    }
}
