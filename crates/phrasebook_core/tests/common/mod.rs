#![allow(dead_code)]

use phrasebook_core::model::template::{CategoryRecord, OrderEntry};
use phrasebook_core::seed::starter_records;
use phrasebook_core::sync::adapter::{CategoryRow, SectionRow, SentenceRow, SubcategoryRow};
use phrasebook_core::{
    CategoryId, ManualClock, PhrasebookConfig, SectionId, SentenceId, SubcategoryId, SyncAdapter,
    SyncError, SyncOp, SyncResult, TemplateWorkspace,
};
use std::cell::RefCell;
use uuid::Uuid;

pub const OWNER: &str = "owner-1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Load(String),
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

impl Call {
    pub fn op(&self) -> SyncOp {
        match self {
            Self::Load(_) => SyncOp::LoadTree,
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
}

/// How a scripted adapter failure is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    NotAuthenticated,
    Offline,
    Missing,
}

impl Failure {
    fn to_error(self) -> SyncError {
        match self {
            Self::NotAuthenticated => SyncError::NotAuthenticated,
            Self::Offline => SyncError::Unavailable("offline".to_string()),
            Self::Missing => SyncError::NotFound(Uuid::nil()),
        }
    }
}

/// Adapter that records every call and fails on scripted ops.
#[derive(Debug, Default)]
pub struct RecordingAdapter {
    stored: Vec<CategoryRecord>,
    failures: Vec<(SyncOp, Failure)>,
    fail_all: Option<Failure>,
    calls: RefCell<Vec<Call>>,
}

impl RecordingAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stored(stored: Vec<CategoryRecord>) -> Self {
        Self {
            stored,
            ..Self::default()
        }
    }

    /// Store already holding a copy of the starter templates.
    pub fn stocked() -> Self {
        Self::with_stored(starter_records())
    }

    pub fn failing_on(mut self, op: SyncOp, failure: Failure) -> Self {
        self.failures.push((op, failure));
        self
    }

    /// Every write fails; loads still succeed.
    pub fn failing_all_writes(mut self, failure: Failure) -> Self {
        self.fail_all = Some(failure);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn ops(&self) -> Vec<SyncOp> {
        self.calls.borrow().iter().map(Call::op).collect()
    }

    pub fn count(&self, op: SyncOp) -> usize {
        self.calls.borrow().iter().filter(|call| call.op() == op).count()
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn last_snapshot(&self) -> Option<Vec<CategoryRecord>> {
        self.calls.borrow().iter().rev().find_map(|call| match call {
            Call::SaveFullStructure(records) => Some(records.clone()),
            _ => None,
        })
    }

    fn record(&self, call: Call) -> SyncResult<()> {
        let op = call.op();
        self.calls.borrow_mut().push(call);
        if let Some((_, failure)) = self.failures.iter().find(|(failing, _)| *failing == op) {
            return Err(failure.to_error());
        }
        match self.fail_all {
            Some(failure) => Err(failure.to_error()),
            None => Ok(()),
        }
    }
}

impl SyncAdapter for RecordingAdapter {
    fn load_tree(&self, owner_id: &str) -> SyncResult<Vec<CategoryRecord>> {
        self.calls.borrow_mut().push(Call::Load(owner_id.to_string()));
        if let Some((_, failure)) = self
            .failures
            .iter()
            .find(|(failing, _)| *failing == SyncOp::LoadTree)
        {
            return Err(failure.to_error());
        }
        Ok(self.stored.clone())
    }

    fn create_category(&self, row: &CategoryRow) -> SyncResult<()> {
        self.record(Call::CreateCategory(row.clone()))
    }

    fn update_category(&self, row: &CategoryRow) -> SyncResult<()> {
        self.record(Call::UpdateCategory(row.clone()))
    }

    fn delete_category(&self, id: CategoryId) -> SyncResult<()> {
        self.record(Call::DeleteCategory(id))
    }

    fn reorder_categories(&self, order: &[OrderEntry]) -> SyncResult<()> {
        self.record(Call::ReorderCategories(order.to_vec()))
    }

    fn create_subcategory(&self, row: &SubcategoryRow) -> SyncResult<()> {
        self.record(Call::CreateSubcategory(row.clone()))
    }

    fn update_subcategory(&self, row: &SubcategoryRow) -> SyncResult<()> {
        self.record(Call::UpdateSubcategory(row.clone()))
    }

    fn delete_subcategory(&self, id: SubcategoryId) -> SyncResult<()> {
        self.record(Call::DeleteSubcategory(id))
    }

    fn reorder_subcategories(
        &self,
        category_id: CategoryId,
        order: &[OrderEntry],
    ) -> SyncResult<()> {
        self.record(Call::ReorderSubcategories(category_id, order.to_vec()))
    }

    fn create_section(&self, row: &SectionRow) -> SyncResult<()> {
        self.record(Call::CreateSection(row.clone()))
    }

    fn update_section(&self, row: &SectionRow) -> SyncResult<()> {
        self.record(Call::UpdateSection(row.clone()))
    }

    fn delete_section(&self, id: SectionId) -> SyncResult<()> {
        self.record(Call::DeleteSection(id))
    }

    fn reorder_sections(
        &self,
        subcategory_id: SubcategoryId,
        order: &[OrderEntry],
    ) -> SyncResult<()> {
        self.record(Call::ReorderSections(subcategory_id, order.to_vec()))
    }

    fn create_sentence(&self, row: &SentenceRow) -> SyncResult<()> {
        self.record(Call::CreateSentence(row.clone()))
    }

    fn update_sentence(&self, row: &SentenceRow) -> SyncResult<()> {
        self.record(Call::UpdateSentence(row.clone()))
    }

    fn delete_sentence(&self, id: SentenceId) -> SyncResult<()> {
        self.record(Call::DeleteSentence(id))
    }

    fn reorder_sentences(&self, section_id: SectionId, order: &[OrderEntry]) -> SyncResult<()> {
        self.record(Call::ReorderSentences(section_id, order.to_vec()))
    }

    fn save_full_structure(&self, tree: &[CategoryRecord]) -> SyncResult<()> {
        self.record(Call::SaveFullStructure(tree.to_vec()))
    }
}

pub type TestWorkspace = TemplateWorkspace<RecordingAdapter, ManualClock>;

/// Opens a signed-in workspace over `adapter` with a manual clock.
pub fn open_workspace(adapter: RecordingAdapter) -> TestWorkspace {
    TemplateWorkspace::open(
        adapter,
        PhrasebookConfig::default(),
        Some(OWNER.to_string()),
        ManualClock::new(),
    )
}

/// Dense orders `0..n-1` in the given id order.
pub fn dense(ids: &[Uuid]) -> Vec<OrderEntry> {
    ids.iter()
        .enumerate()
        .map(|(index, id)| OrderEntry {
            id: *id,
            display_order: index as i64,
        })
        .collect()
}
