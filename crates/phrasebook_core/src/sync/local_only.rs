//! Adapter used when no durable store is configured.
//!
//! Loads nothing and reports every write as unauthenticated, so callers keep
//! working on local state only.

use crate::model::template::{
    CategoryId, CategoryRecord, OrderEntry, SectionId, SentenceId, SubcategoryId,
};
use crate::sync::adapter::{
    CategoryRow, SectionRow, SentenceRow, SubcategoryRow, SyncAdapter, SyncError, SyncResult,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalOnlyAdapter;

impl LocalOnlyAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl SyncAdapter for LocalOnlyAdapter {
    fn load_tree(&self, _owner_id: &str) -> SyncResult<Vec<CategoryRecord>> {
        Ok(Vec::new())
    }

    fn create_category(&self, _row: &CategoryRow) -> SyncResult<()> {
        Err(SyncError::NotAuthenticated)
    }

    fn update_category(&self, _row: &CategoryRow) -> SyncResult<()> {
        Err(SyncError::NotAuthenticated)
    }

    fn delete_category(&self, _id: CategoryId) -> SyncResult<()> {
        Err(SyncError::NotAuthenticated)
    }

    fn reorder_categories(&self, _order: &[OrderEntry]) -> SyncResult<()> {
        Err(SyncError::NotAuthenticated)
    }

    fn create_subcategory(&self, _row: &SubcategoryRow) -> SyncResult<()> {
        Err(SyncError::NotAuthenticated)
    }

    fn update_subcategory(&self, _row: &SubcategoryRow) -> SyncResult<()> {
        Err(SyncError::NotAuthenticated)
    }

    fn delete_subcategory(&self, _id: SubcategoryId) -> SyncResult<()> {
        Err(SyncError::NotAuthenticated)
    }

    fn reorder_subcategories(
        &self,
        _category_id: CategoryId,
        _order: &[OrderEntry],
    ) -> SyncResult<()> {
        Err(SyncError::NotAuthenticated)
    }

    fn create_section(&self, _row: &SectionRow) -> SyncResult<()> {
        Err(SyncError::NotAuthenticated)
    }

    fn update_section(&self, _row: &SectionRow) -> SyncResult<()> {
        Err(SyncError::NotAuthenticated)
    }

    fn delete_section(&self, _id: SectionId) -> SyncResult<()> {
        Err(SyncError::NotAuthenticated)
    }

    fn reorder_sections(
        &self,
        _subcategory_id: SubcategoryId,
        _order: &[OrderEntry],
    ) -> SyncResult<()> {
        Err(SyncError::NotAuthenticated)
    }

    fn create_sentence(&self, _row: &SentenceRow) -> SyncResult<()> {
        Err(SyncError::NotAuthenticated)
    }

    fn update_sentence(&self, _row: &SentenceRow) -> SyncResult<()> {
        Err(SyncError::NotAuthenticated)
    }

    fn delete_sentence(&self, _id: SentenceId) -> SyncResult<()> {
        Err(SyncError::NotAuthenticated)
    }

    fn reorder_sentences(&self, _section_id: SectionId, _order: &[OrderEntry]) -> SyncResult<()> {
        Err(SyncError::NotAuthenticated)
    }

    fn save_full_structure(&self, _tree: &[CategoryRecord]) -> SyncResult<()> {
        Err(SyncError::NotAuthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::LocalOnlyAdapter;
    use crate::sync::adapter::{SyncAdapter, SyncError, SyncFailureKind};
    use uuid::Uuid;

    #[test]
    fn loads_nothing_and_refuses_writes() {
        let adapter = LocalOnlyAdapter::new();
        assert!(adapter.load_tree("anyone").unwrap().is_empty());

        let err = adapter.delete_category(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, SyncError::NotAuthenticated));
        assert_eq!(err.kind(), SyncFailureKind::RemoteUnavailable);
        assert!(adapter.save_full_structure(&[]).is_err());
    }
}
