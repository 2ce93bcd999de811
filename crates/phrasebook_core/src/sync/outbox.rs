//! Queue of store writes waiting to be sent.
//!
//! # Responsibility
//! - Hold mirrored writes as owned values so local mutations can return
//!   before any adapter call runs.
//! - Replay queued writes in issue order against a sync adapter.
//!
//! # Invariants
//! - Writes leave the queue in the order they entered it.
//! - A sent write is never retried; its outcome is reported once.

use crate::model::template::{
    CategoryId, CategoryRecord, OrderEntry, SectionId, SentenceId, SubcategoryId,
};
use crate::sync::adapter::{
    CategoryRow, SectionRow, SentenceRow, SubcategoryRow, SyncAdapter, SyncOp, SyncResult,
};
use std::collections::VecDeque;

/// One adapter write, captured with everything needed to send it later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncWrite {
    CreateCategory(CategoryRow),
    UpdateCategory(CategoryRow),
    DeleteCategory(CategoryId),
    ReorderCategories(Vec<OrderEntry>),
    CreateSubcategory(SubcategoryRow),
    UpdateSubcategory(SubcategoryRow),
    DeleteSubcategory(SubcategoryId),
    ReorderSubcategories(CategoryId, Vec<OrderEntry>),
    CreateSection(SectionRow),
    UpdateSection(SectionRow),
    DeleteSection(SectionId),
    ReorderSections(SubcategoryId, Vec<OrderEntry>),
    CreateSentence(SentenceRow),
    UpdateSentence(SentenceRow),
    DeleteSentence(SentenceId),
    ReorderSentences(SectionId, Vec<OrderEntry>),
    SaveFullStructure(Vec<CategoryRecord>),
}

impl SyncWrite {
    pub fn op(&self) -> SyncOp {
        match self {
            Self::CreateCategory(_) => SyncOp::CreateCategory,
            Self::UpdateCategory(_) => SyncOp::UpdateCategory,
            Self::DeleteCategory(_) => SyncOp::DeleteCategory,
            Self::ReorderCategories(_) => SyncOp::ReorderCategories,
            Self::CreateSubcategory(_) => SyncOp::CreateSubcategory,
            Self::UpdateSubcategory(_) => SyncOp::UpdateSubcategory,
            Self::DeleteSubcategory(_) => SyncOp::DeleteSubcategory,
            Self::ReorderSubcategories(..) => SyncOp::ReorderSubcategories,
            Self::CreateSection(_) => SyncOp::CreateSection,
            Self::UpdateSection(_) => SyncOp::UpdateSection,
            Self::DeleteSection(_) => SyncOp::DeleteSection,
            Self::ReorderSections(..) => SyncOp::ReorderSections,
            Self::CreateSentence(_) => SyncOp::CreateSentence,
            Self::UpdateSentence(_) => SyncOp::UpdateSentence,
            Self::DeleteSentence(_) => SyncOp::DeleteSentence,
            Self::ReorderSentences(..) => SyncOp::ReorderSentences,
            Self::SaveFullStructure(_) => SyncOp::SaveFullStructure,
        }
    }

    /// Sends this write through `adapter`.
    pub fn send<A: SyncAdapter + ?Sized>(&self, adapter: &A) -> SyncResult<()> {
        match self {
            Self::CreateCategory(row) => adapter.create_category(row),
            Self::UpdateCategory(row) => adapter.update_category(row),
            Self::DeleteCategory(id) => adapter.delete_category(*id),
            Self::ReorderCategories(order) => adapter.reorder_categories(order),
            Self::CreateSubcategory(row) => adapter.create_subcategory(row),
            Self::UpdateSubcategory(row) => adapter.update_subcategory(row),
            Self::DeleteSubcategory(id) => adapter.delete_subcategory(*id),
            Self::ReorderSubcategories(parent, order) => {
                adapter.reorder_subcategories(*parent, order)
            }
            Self::CreateSection(row) => adapter.create_section(row),
            Self::UpdateSection(row) => adapter.update_section(row),
            Self::DeleteSection(id) => adapter.delete_section(*id),
            Self::ReorderSections(parent, order) => adapter.reorder_sections(*parent, order),
            Self::CreateSentence(row) => adapter.create_sentence(row),
            Self::UpdateSentence(row) => adapter.update_sentence(row),
            Self::DeleteSentence(id) => adapter.delete_sentence(*id),
            Self::ReorderSentences(parent, order) => adapter.reorder_sentences(*parent, order),
            Self::SaveFullStructure(tree) => adapter.save_full_structure(tree),
        }
    }
}

/// FIFO of writes not yet handed to the adapter.
#[derive(Debug, Clone, Default)]
pub struct Outbox {
    queue: VecDeque<SyncWrite>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, write: SyncWrite) {
        self.queue.push_back(write);
    }

    pub fn pop(&mut self) -> Option<SyncWrite> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Ops of the queued writes, oldest first.
    pub fn ops(&self) -> Vec<SyncOp> {
        self.queue.iter().map(SyncWrite::op).collect()
    }
}
