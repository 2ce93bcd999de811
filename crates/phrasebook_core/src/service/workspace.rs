//! Template workspace use-case service.
//!
//! # Responsibility
//! - Own the in-memory template tree of one session.
//! - Apply every structural mutation locally first, then queue its mirror
//!   write for the sync adapter.
//! - Send queued writes and debounced whole-tree snapshots from the host's
//!   poll path.
//!
//! # Invariants
//! - Mutations return before any adapter call runs.
//! - Adapter failures never roll back local state; they surface as notices.
//! - A signed-in owner's starter tree is saved ahead of its first mirrored
//!   write, so that write finds its rows.
//! - Persisted sibling orders are rewritten densely after moves and deletes.
//! - Snapshots are only scheduled for signed-in owners, and only after a
//!   local change.

use crate::config::PhrasebookConfig;
use crate::model::part::{Part, PartField, PartKind};
use crate::model::template::{CategoryId, CategoryRecord, SectionId, SentenceId, SubcategoryId};
use crate::notice::{Notice, NoticeBoard, NoticeLevel};
use crate::schedule::{Clock, Debouncer, SystemClock};
use crate::seed::starter_records;
use crate::sync::adapter::{
    CategoryRow, OwnerId, SectionRow, SentenceRow, SubcategoryRow, SyncAdapter, SyncFailureKind,
    SyncOp, SyncResult,
};
use crate::sync::outbox::{Outbox, SyncWrite};
use crate::tree::arena::{CascadeReport, TemplateTree, TreeResult};
use crate::tree::ordering::MoveDirection;
use log::{debug, info, warn};
use std::time::Instant;
use uuid::Uuid;

/// Session-scoped owner of a template tree and its sync adapter.
pub struct TemplateWorkspace<A, C = SystemClock> {
    adapter: A,
    clock: C,
    config: PhrasebookConfig,
    owner_id: Option<OwnerId>,
    tree: TemplateTree,
    notices: NoticeBoard,
    snapshot: Debouncer,
    outbox: Outbox,
    unsaved_starter: Option<Vec<CategoryRecord>>,
    showing_starter: bool,
}

impl<A: SyncAdapter> TemplateWorkspace<A, SystemClock> {
    /// Opens a workspace driven by wall-clock time.
    pub fn open_with_system_clock(
        adapter: A,
        config: PhrasebookConfig,
        owner_id: Option<OwnerId>,
    ) -> Self {
        Self::open(adapter, config, owner_id, SystemClock)
    }
}

impl<A: SyncAdapter, C: Clock> TemplateWorkspace<A, C> {
    /// Opens a workspace and loads the owner's tree.
    ///
    /// Falls back to the starter templates when nothing is stored, the
    /// caller is signed out, or the load fails.
    pub fn open(
        adapter: A,
        config: PhrasebookConfig,
        owner_id: Option<OwnerId>,
        clock: C,
    ) -> Self {
        let mut workspace = Self {
            notices: NoticeBoard::new(config.notice_ttl()),
            snapshot: Debouncer::new(config.snapshot_debounce()),
            adapter,
            clock,
            config,
            owner_id,
            tree: TemplateTree::new(),
            outbox: Outbox::new(),
            unsaved_starter: None,
            showing_starter: false,
        };
        workspace.load();
        workspace
    }

    fn load(&mut self) {
        let result = self
            .owner_id
            .as_deref()
            .map(|owner_id| self.adapter.load_tree(owner_id));
        let loaded = match result {
            Some(Ok(records)) => Some(records),
            Some(Err(err)) => {
                self.report_failure(SyncOp::LoadTree, &err.to_string(), err.code(), err.kind());
                None
            }
            None => None,
        };

        match loaded {
            Some(records) if !records.is_empty() => {
                self.tree = TemplateTree::from_records(records);
                self.showing_starter = false;
                info!(
                    "event=workspace_open module=workspace status=ok source=store entities={}",
                    self.tree.entity_count()
                );
            }
            _ => {
                let records = starter_records();
                if self.owner_id.is_some() {
                    self.unsaved_starter = Some(records.clone());
                }
                self.tree = TemplateTree::from_records(records);
                self.showing_starter = true;
                info!(
                    "event=workspace_open module=workspace status=ok source=starter entities={}",
                    self.tree.entity_count()
                );
            }
        }
    }

    pub fn tree(&self) -> &TemplateTree {
        &self.tree
    }

    pub fn config(&self) -> &PhrasebookConfig {
        &self.config
    }

    pub fn owner_id(&self) -> Option<&str> {
        self.owner_id.as_deref()
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn adapter_mut(&mut self) -> &mut A {
        &mut self.adapter
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Whether the tree is still the untouched starter set.
    pub fn is_showing_starter(&self) -> bool {
        self.showing_starter
    }

    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    /// Notices visible now, oldest first.
    pub fn active_notices(&self) -> Vec<&Notice> {
        self.notices.active(self.clock.now()).collect()
    }

    pub fn snapshot_pending(&self) -> bool {
        self.snapshot.is_pending()
    }

    pub fn snapshot_deadline(&self) -> Option<Instant> {
        self.snapshot.deadline()
    }

    pub(crate) fn now(&self) -> Instant {
        self.clock.now()
    }

    pub(crate) fn push_notice(&mut self, level: NoticeLevel, message: &str) {
        let now = self.clock.now();
        self.notices.push(level, message, now);
    }

    // Categories.

    pub fn add_category(&mut self) -> TreeResult<CategoryId> {
        let id = Uuid::new_v4();
        let defaults = &self.config.defaults;
        let display_order = self.tree.add_category(
            id,
            defaults.category_title.clone(),
            defaults.category_description.clone(),
        )?;
        let row = CategoryRow {
            id,
            title: defaults.category_title.clone(),
            description: defaults.category_description.clone(),
            display_order,
        };
        self.enqueue(SyncWrite::CreateCategory(row));
        self.touch();
        Ok(id)
    }

    pub fn rename_category(&mut self, id: CategoryId, title: &str) -> TreeResult<()> {
        self.tree.rename_category(id, title)?;
        self.sync_category(id)
    }

    pub fn update_category_description(
        &mut self,
        id: CategoryId,
        description: &str,
    ) -> TreeResult<()> {
        self.tree.set_category_description(id, description)?;
        self.sync_category(id)
    }

    pub fn delete_category(&mut self, id: CategoryId) -> TreeResult<CascadeReport> {
        let index = index_of(self.tree.category_ids(), id);
        let report = self.tree.remove_category(id)?;
        self.enqueue(SyncWrite::DeleteCategory(id));

        let order = self.tree.category_order();
        if index < order.len() {
            self.enqueue(SyncWrite::ReorderCategories(order));
        }
        self.touch();
        Ok(report)
    }

    pub fn move_category(&mut self, id: CategoryId, direction: MoveDirection) -> TreeResult<bool> {
        if !self.tree.move_category(id, direction)? {
            return Ok(false);
        }
        let order = self.tree.category_order();
        self.enqueue(SyncWrite::ReorderCategories(order));
        self.touch();
        Ok(true)
    }

    fn sync_category(&mut self, id: CategoryId) -> TreeResult<()> {
        let category = self.tree.require_category(id)?;
        let row = CategoryRow {
            id,
            title: category.title.clone(),
            description: category.description.clone(),
            display_order: position(self.tree.category_ids(), id),
        };
        self.enqueue(SyncWrite::UpdateCategory(row));
        self.touch();
        Ok(())
    }

    // Subcategories.

    pub fn add_subcategory(&mut self, category_id: CategoryId) -> TreeResult<SubcategoryId> {
        let id = Uuid::new_v4();
        let title = self.config.defaults.subcategory_title.clone();
        let display_order = self.tree.add_subcategory(category_id, id, title.clone())?;
        let row = SubcategoryRow {
            id,
            category_id,
            title,
            display_order,
        };
        self.enqueue(SyncWrite::CreateSubcategory(row));
        self.touch();
        Ok(id)
    }

    pub fn rename_subcategory(&mut self, id: SubcategoryId, title: &str) -> TreeResult<()> {
        self.tree.rename_subcategory(id, title)?;
        let subcategory = self.tree.require_subcategory(id)?;
        let category = self.tree.require_category(subcategory.category_id)?;
        let row = SubcategoryRow {
            id,
            category_id: subcategory.category_id,
            title: subcategory.title.clone(),
            display_order: position(&category.subcategories, id),
        };
        self.enqueue(SyncWrite::UpdateSubcategory(row));
        self.touch();
        Ok(())
    }

    pub fn delete_subcategory(&mut self, id: SubcategoryId) -> TreeResult<CascadeReport> {
        let category_id = self.tree.require_subcategory(id)?.category_id;
        let index = index_of(&self.tree.require_category(category_id)?.subcategories, id);
        let report = self.tree.remove_subcategory(id)?;
        self.enqueue(SyncWrite::DeleteSubcategory(id));

        let order = self.tree.subcategory_order(category_id)?;
        if index < order.len() {
            self.enqueue(SyncWrite::ReorderSubcategories(category_id, order));
        }
        self.touch();
        Ok(report)
    }

    pub fn move_subcategory(
        &mut self,
        id: SubcategoryId,
        direction: MoveDirection,
    ) -> TreeResult<bool> {
        if !self.tree.move_subcategory(id, direction)? {
            return Ok(false);
        }
        let category_id = self.tree.require_subcategory(id)?.category_id;
        let order = self.tree.subcategory_order(category_id)?;
        self.enqueue(SyncWrite::ReorderSubcategories(category_id, order));
        self.touch();
        Ok(true)
    }

    // Sections.

    pub fn add_section(&mut self, subcategory_id: SubcategoryId) -> TreeResult<SectionId> {
        let id = Uuid::new_v4();
        let title = self.config.defaults.section_title.clone();
        let display_order = self.tree.add_section(subcategory_id, id, title.clone())?;
        let row = SectionRow {
            id,
            subcategory_id,
            title,
            display_order,
        };
        self.enqueue(SyncWrite::CreateSection(row));
        self.touch();
        Ok(id)
    }

    pub fn rename_section(&mut self, id: SectionId, title: &str) -> TreeResult<()> {
        self.tree.rename_section(id, title)?;
        let section = self.tree.require_section(id)?;
        let subcategory = self.tree.require_subcategory(section.subcategory_id)?;
        let row = SectionRow {
            id,
            subcategory_id: section.subcategory_id,
            title: section.title.clone(),
            display_order: position(&subcategory.sections, id),
        };
        self.enqueue(SyncWrite::UpdateSection(row));
        self.touch();
        Ok(())
    }

    pub fn delete_section(&mut self, id: SectionId) -> TreeResult<CascadeReport> {
        let subcategory_id = self.tree.require_section(id)?.subcategory_id;
        let index = index_of(&self.tree.require_subcategory(subcategory_id)?.sections, id);
        let report = self.tree.remove_section(id)?;
        self.enqueue(SyncWrite::DeleteSection(id));

        let order = self.tree.section_order(subcategory_id)?;
        if index < order.len() {
            self.enqueue(SyncWrite::ReorderSections(subcategory_id, order));
        }
        self.touch();
        Ok(report)
    }

    pub fn move_section(&mut self, id: SectionId, direction: MoveDirection) -> TreeResult<bool> {
        if !self.tree.move_section(id, direction)? {
            return Ok(false);
        }
        let subcategory_id = self.tree.require_section(id)?.subcategory_id;
        let order = self.tree.section_order(subcategory_id)?;
        self.enqueue(SyncWrite::ReorderSections(subcategory_id, order));
        self.touch();
        Ok(true)
    }

    // Sentences.

    /// Appends a sentence holding one empty literal part.
    pub fn add_sentence(&mut self, section_id: SectionId) -> TreeResult<SentenceId> {
        let id = Uuid::new_v4();
        let parts = vec![Part::new(PartKind::Literal, &self.config.defaults.parts)];
        let display_order = self.tree.add_sentence(section_id, id, parts.clone())?;
        let row = SentenceRow {
            id,
            section_id,
            display_order,
            parts,
        };
        self.enqueue(SyncWrite::CreateSentence(row));
        self.touch();
        Ok(id)
    }

    pub fn delete_sentence(&mut self, id: SentenceId) -> TreeResult<CascadeReport> {
        let section_id = self.tree.require_sentence(id)?.section_id;
        let index = index_of(&self.tree.require_section(section_id)?.sentences, id);
        let report = self.tree.remove_sentence(id)?;
        self.enqueue(SyncWrite::DeleteSentence(id));

        let order = self.tree.sentence_order(section_id)?;
        if index < order.len() {
            self.enqueue(SyncWrite::ReorderSentences(section_id, order));
        }
        self.touch();
        Ok(report)
    }

    pub fn move_sentence(&mut self, id: SentenceId, direction: MoveDirection) -> TreeResult<bool> {
        if !self.tree.move_sentence(id, direction)? {
            return Ok(false);
        }
        let section_id = self.tree.require_sentence(id)?.section_id;
        let order = self.tree.sentence_order(section_id)?;
        self.enqueue(SyncWrite::ReorderSentences(section_id, order));
        self.touch();
        Ok(true)
    }

    // Parts.

    /// Appends a part of `kind` seeded from the configured defaults; returns
    /// its index.
    pub fn append_part(&mut self, sentence_id: SentenceId, kind: PartKind) -> TreeResult<usize> {
        let part = Part::new(kind, &self.config.defaults.parts);
        self.tree.append_part(sentence_id, part)?;
        let index = self.tree.require_sentence(sentence_id)?.parts.len() - 1;
        self.sync_sentence(sentence_id)?;
        Ok(index)
    }

    pub fn replace_part(
        &mut self,
        sentence_id: SentenceId,
        index: usize,
        part: Part,
    ) -> TreeResult<()> {
        self.tree.replace_part(sentence_id, index, part)?;
        self.sync_sentence(sentence_id)
    }

    /// Applies one editor-time field; returns `false` when the field does not
    /// apply to the part kind, in which case nothing is written.
    pub fn update_part_field(
        &mut self,
        sentence_id: SentenceId,
        index: usize,
        field: PartField,
    ) -> TreeResult<bool> {
        if !self.tree.update_part_field(sentence_id, index, field)? {
            debug!(
                "event=part_update module=workspace status=skip reason=field_not_applicable index={index}"
            );
            return Ok(false);
        }
        self.sync_sentence(sentence_id)?;
        Ok(true)
    }

    pub fn remove_part(&mut self, sentence_id: SentenceId, index: usize) -> TreeResult<Part> {
        let removed = self.tree.remove_part(sentence_id, index)?;
        self.sync_sentence(sentence_id)?;
        Ok(removed)
    }

    fn sync_sentence(&mut self, id: SentenceId) -> TreeResult<()> {
        let sentence = self.tree.require_sentence(id)?;
        let section = self.tree.require_section(sentence.section_id)?;
        let row = SentenceRow {
            id,
            section_id: sentence.section_id,
            display_order: position(&section.sentences, id),
            parts: sentence.parts.clone(),
        };
        self.enqueue(SyncWrite::UpdateSentence(row));
        self.touch();
        Ok(())
    }

    // Outgoing writes.

    /// Number of mirrored writes not yet sent to the adapter.
    pub fn pending_writes(&self) -> usize {
        self.outbox.len()
    }

    /// Ops of the queued writes, oldest first.
    pub fn pending_ops(&self) -> Vec<SyncOp> {
        self.outbox.ops()
    }

    /// Sends every queued write in issue order and turns each outcome into
    /// a log line and, where one applies, a notice.
    ///
    /// Returns how many writes were sent.
    pub fn flush_writes(&mut self) -> usize {
        let mut sent = 0;
        while let Some(write) = self.outbox.pop() {
            let result = write.send(&self.adapter);
            self.mirror(write.op(), result);
            sent += 1;
        }
        sent
    }

    /// Host tick: sends queued writes, then the snapshot once it is due.
    ///
    /// Returns how many adapter writes were attempted.
    pub fn poll(&mut self) -> usize {
        let sent = self.flush_writes();
        sent + usize::from(self.poll_snapshot())
    }

    /// Writes the pending snapshot when its debounce deadline has passed.
    ///
    /// Returns `true` when a snapshot write was attempted.
    pub fn poll_snapshot(&mut self) -> bool {
        if !self.snapshot.fire_if_due(self.clock.now()) {
            return false;
        }
        self.write_snapshot();
        true
    }

    /// Writes the pending snapshot immediately, ignoring the deadline.
    pub fn flush_snapshot(&mut self) -> bool {
        if !self.snapshot.cancel() {
            return false;
        }
        self.write_snapshot();
        true
    }

    /// Tears the session down.
    ///
    /// Writes already issued are still sent; only a pending snapshot is
    /// dropped unwritten. Returns the adapter so callers can keep using the
    /// store.
    pub fn shutdown(mut self) -> A {
        let sent = self.flush_writes();
        let dropped = self.snapshot.cancel();
        info!(
            "event=workspace_close module=workspace status=ok writes_sent={sent} snapshot_dropped={dropped}"
        );
        self.adapter
    }

    fn write_snapshot(&mut self) {
        self.flush_writes();
        let records = self.tree.to_records();
        let result = self.adapter.save_full_structure(&records);
        self.mirror(SyncOp::SaveFullStructure, result);
    }

    fn enqueue(&mut self, write: SyncWrite) {
        if let Some(starter) = self.unsaved_starter.take() {
            debug!(
                "event=starter_adopt module=workspace status=ok categories={}",
                starter.len()
            );
            self.outbox.push(SyncWrite::SaveFullStructure(starter));
        }
        self.outbox.push(write);
    }

    fn touch(&mut self) {
        self.showing_starter = false;
        if self.owner_id.is_some() {
            self.snapshot.arm(self.clock.now());
        }
    }

    fn mirror(&mut self, op: SyncOp, result: SyncResult<()>) {
        match result {
            Ok(()) => {
                debug!(
                    "event=sync_mirror module=workspace op={} status=ok",
                    op.as_str()
                );
                if let Some(message) = op.success_message() {
                    self.push_notice(NoticeLevel::Info, message);
                }
            }
            Err(err) => self.report_failure(op, &err.to_string(), err.code(), err.kind()),
        }
    }

    fn report_failure(&mut self, op: SyncOp, error: &str, code: &str, kind: SyncFailureKind) {
        warn!(
            "event=sync_mirror module=workspace op={} status=error error_code={code} error={error}",
            op.as_str()
        );
        let level = match kind {
            SyncFailureKind::RemoteUnavailable => NoticeLevel::Warning,
            SyncFailureKind::Unexpected => NoticeLevel::Error,
        };
        self.push_notice(level, op.failure_message());
    }
}

fn index_of(ids: &[Uuid], id: Uuid) -> usize {
    ids.iter().position(|current| *current == id).unwrap_or(ids.len())
}

fn position(ids: &[Uuid], id: Uuid) -> i64 {
    index_of(ids, id) as i64
}
