//! Builder use-case over one open subcategory.
//!
//! # Responsibility
//! - Track the browse/edit mode, the active sentences and their fill values.
//! - Render the preview and copy the assembled text to a clipboard.
//! - Gate structural edits of the open subcategory behind edit mode.
//!
//! # Invariants
//! - Selection and fills change only while browsing.
//! - Structural edits happen only while editing and only inside the open
//!   subcategory.
//! - Deleted sentences never stay selected.

use crate::assembly::render::{blocks_to_clipboard_text, render_preview, PreviewBlock};
use crate::assembly::selection::Selection;
use crate::clipboard::{Clipboard, ClipboardError};
use crate::model::part::{Part, PartField, PartKind};
use crate::model::template::{
    CategoryId, Section, SectionId, SentenceId, Subcategory, SubcategoryId,
};
use crate::notice::NoticeLevel;
use crate::schedule::{Clock, SystemClock};
use crate::service::workspace::TemplateWorkspace;
use crate::sync::adapter::SyncAdapter;
use crate::tree::arena::{CascadeReport, TreeError, TreeResult};
use crate::tree::ordering::MoveDirection;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;
use uuid::Uuid;

const COPY_SUCCESS_MESSAGE: &str = "Text copied to clipboard";
const COPY_FAILURE_MESSAGE: &str = "Failed to copy text";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderMode {
    Browsing,
    Editing,
}

/// Errors from builder operations.
#[derive(Debug)]
pub enum BuilderError {
    /// Structural edit attempted while browsing.
    EditModeRequired,
    /// Selection change attempted while editing.
    EditModeActive,
    /// Copy attempted with no active sentence.
    NothingSelected,
    /// Entity exists but lives outside the open subcategory.
    OutOfScope(Uuid),
    Tree(TreeError),
    Clipboard(ClipboardError),
}

impl Display for BuilderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EditModeRequired => write!(f, "operation requires edit mode"),
            Self::EditModeActive => write!(f, "selection is disabled in edit mode"),
            Self::NothingSelected => write!(f, "no sentence is selected"),
            Self::OutOfScope(id) => write!(f, "entity is outside the open subcategory: {id}"),
            Self::Tree(err) => write!(f, "{err}"),
            Self::Clipboard(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BuilderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Tree(err) => Some(err),
            Self::Clipboard(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TreeError> for BuilderError {
    fn from(value: TreeError) -> Self {
        Self::Tree(value)
    }
}

impl From<ClipboardError> for BuilderError {
    fn from(value: ClipboardError) -> Self {
        Self::Clipboard(value)
    }
}

pub type BuilderResult<T> = Result<T, BuilderError>;

impl<A: SyncAdapter, C: Clock> TemplateWorkspace<A, C> {
    /// Opens the builder on one subcategory, browsing with nothing selected.
    pub fn open_builder(
        &mut self,
        subcategory_id: SubcategoryId,
    ) -> TreeResult<BuilderView<'_, A, C>> {
        BuilderView::open(self, subcategory_id)
    }
}

/// Builder session borrowing the workspace it edits.
pub struct BuilderView<'ws, A, C = SystemClock> {
    workspace: &'ws mut TemplateWorkspace<A, C>,
    category_id: CategoryId,
    subcategory_id: SubcategoryId,
    mode: BuilderMode,
    selection: Selection,
    copied_until: Option<Instant>,
}

impl<'ws, A: SyncAdapter, C: Clock> BuilderView<'ws, A, C> {
    pub fn open(
        workspace: &'ws mut TemplateWorkspace<A, C>,
        subcategory_id: SubcategoryId,
    ) -> TreeResult<Self> {
        let category_id = workspace
            .tree()
            .require_subcategory(subcategory_id)?
            .category_id;
        info!("event=builder_open module=builder status=ok subcategory_id={subcategory_id}");
        Ok(Self {
            workspace,
            category_id,
            subcategory_id,
            mode: BuilderMode::Browsing,
            selection: Selection::new(),
            copied_until: None,
        })
    }

    pub fn workspace(&self) -> &TemplateWorkspace<A, C> {
        &*self.workspace
    }

    pub fn category_id(&self) -> CategoryId {
        self.category_id
    }

    pub fn subcategory_id(&self) -> SubcategoryId {
        self.subcategory_id
    }

    pub fn subcategory(&self) -> TreeResult<&Subcategory> {
        self.workspace.tree().require_subcategory(self.subcategory_id)
    }

    pub fn sections(&self) -> TreeResult<Vec<&Section>> {
        self.workspace.tree().sections_of(self.subcategory_id)
    }

    pub fn mode(&self) -> BuilderMode {
        self.mode
    }

    pub fn is_editing(&self) -> bool {
        self.mode == BuilderMode::Editing
    }

    /// Flips between browsing and editing; returns the new mode.
    ///
    /// The selection survives mode changes.
    pub fn toggle_mode(&mut self) -> BuilderMode {
        self.mode = match self.mode {
            BuilderMode::Browsing => BuilderMode::Editing,
            BuilderMode::Editing => BuilderMode::Browsing,
        };
        self.mode
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Adds or removes a sentence from the active set; returns whether it is
    /// active afterwards.
    pub fn toggle_selection(&mut self, sentence_id: SentenceId) -> BuilderResult<bool> {
        self.require_browsing()?;
        self.require_sentence_in_scope(sentence_id)?;
        Ok(self.selection.toggle(sentence_id))
    }

    pub fn set_fill_value(
        &mut self,
        sentence_id: SentenceId,
        part_index: usize,
        value: impl Into<String>,
    ) -> BuilderResult<()> {
        self.require_browsing()?;
        self.require_sentence_in_scope(sentence_id)?;
        let len = self.workspace.tree().require_sentence(sentence_id)?.parts.len();
        if part_index >= len {
            return Err(TreeError::PartOutOfRange {
                sentence_id,
                index: part_index,
                len,
            }
            .into());
        }
        self.selection.set_fill(sentence_id, part_index, value);
        Ok(())
    }

    pub fn can_copy(&self) -> bool {
        !self.selection.is_empty()
    }

    pub fn preview(&self) -> BuilderResult<Vec<PreviewBlock>> {
        Ok(render_preview(
            self.workspace.tree(),
            self.subcategory_id,
            &self.selection,
        )?)
    }

    pub fn clipboard_text(&self) -> BuilderResult<String> {
        Ok(blocks_to_clipboard_text(&self.preview()?))
    }

    /// Writes the assembled text to `clipboard` and starts the copied state.
    ///
    /// # Errors
    /// - `NothingSelected` when the active set is empty.
    /// - `Clipboard` when the write fails; a failure notice is pushed too.
    pub fn copy(&mut self, clipboard: &mut impl Clipboard) -> BuilderResult<String> {
        if !self.can_copy() {
            return Err(BuilderError::NothingSelected);
        }
        let text = self.clipboard_text()?;
        if let Err(err) = clipboard.write_text(&text) {
            warn!("event=builder_copy module=builder status=error error={err}");
            self.workspace
                .push_notice(NoticeLevel::Error, COPY_FAILURE_MESSAGE);
            return Err(err.into());
        }

        let now = self.workspace.now();
        self.copied_until = Some(now + self.workspace.config().copy_feedback());
        self.workspace
            .push_notice(NoticeLevel::Info, COPY_SUCCESS_MESSAGE);
        info!(
            "event=builder_copy module=builder status=ok sentences={} chars={}",
            self.selection.active_count(),
            text.chars().count()
        );
        Ok(text)
    }

    /// Whether the transient "copied" confirmation is still showing.
    pub fn is_copied(&self) -> bool {
        self.copied_until
            .is_some_and(|until| self.workspace.now() < until)
    }

    // Edit-mode operations.

    pub fn add_section(&mut self) -> BuilderResult<SectionId> {
        self.require_editing()?;
        Ok(self.workspace.add_section(self.subcategory_id)?)
    }

    pub fn rename_section(&mut self, id: SectionId, title: &str) -> BuilderResult<()> {
        self.require_editing()?;
        self.require_section_in_scope(id)?;
        Ok(self.workspace.rename_section(id, title)?)
    }

    pub fn delete_section(&mut self, id: SectionId) -> BuilderResult<CascadeReport> {
        self.require_editing()?;
        self.require_section_in_scope(id)?;
        let report = self.workspace.delete_section(id)?;
        for sentence_id in &report.sentences {
            self.selection.forget_sentence(*sentence_id);
        }
        Ok(report)
    }

    pub fn move_section(&mut self, id: SectionId, direction: MoveDirection) -> BuilderResult<bool> {
        self.require_editing()?;
        self.require_section_in_scope(id)?;
        Ok(self.workspace.move_section(id, direction)?)
    }

    pub fn add_sentence(&mut self, section_id: SectionId) -> BuilderResult<SentenceId> {
        self.require_editing()?;
        self.require_section_in_scope(section_id)?;
        Ok(self.workspace.add_sentence(section_id)?)
    }

    /// Deletes a sentence and drops it from the selection.
    pub fn delete_sentence(&mut self, id: SentenceId) -> BuilderResult<()> {
        self.require_editing()?;
        self.require_sentence_in_scope(id)?;
        self.workspace.delete_sentence(id)?;
        self.selection.forget_sentence(id);
        Ok(())
    }

    pub fn move_sentence(
        &mut self,
        id: SentenceId,
        direction: MoveDirection,
    ) -> BuilderResult<bool> {
        self.require_editing()?;
        self.require_sentence_in_scope(id)?;
        Ok(self.workspace.move_sentence(id, direction)?)
    }

    pub fn append_part(&mut self, sentence_id: SentenceId, kind: PartKind) -> BuilderResult<usize> {
        self.require_editing()?;
        self.require_sentence_in_scope(sentence_id)?;
        Ok(self.workspace.append_part(sentence_id, kind)?)
    }

    /// Commits a whole part, as the part configuration dialog does.
    ///
    /// Fills of the sentence are reset since the slot may change meaning.
    pub fn replace_part(
        &mut self,
        sentence_id: SentenceId,
        index: usize,
        part: Part,
    ) -> BuilderResult<()> {
        self.require_editing()?;
        self.require_sentence_in_scope(sentence_id)?;
        self.workspace.replace_part(sentence_id, index, part)?;
        self.selection.reset_fills(sentence_id);
        Ok(())
    }

    pub fn update_part_field(
        &mut self,
        sentence_id: SentenceId,
        index: usize,
        field: PartField,
    ) -> BuilderResult<bool> {
        self.require_editing()?;
        self.require_sentence_in_scope(sentence_id)?;
        Ok(self.workspace.update_part_field(sentence_id, index, field)?)
    }

    /// Removes a part; fills of the sentence are reset as indexes shift.
    pub fn remove_part(&mut self, sentence_id: SentenceId, index: usize) -> BuilderResult<Part> {
        self.require_editing()?;
        self.require_sentence_in_scope(sentence_id)?;
        let removed = self.workspace.remove_part(sentence_id, index)?;
        self.selection.reset_fills(sentence_id);
        Ok(removed)
    }

    /// Leaves the builder; selection and fills are discarded.
    pub fn close(self) {
        info!(
            "event=builder_close module=builder status=ok subcategory_id={} selected={}",
            self.subcategory_id,
            self.selection.active_count()
        );
    }

    fn require_browsing(&self) -> BuilderResult<()> {
        match self.mode {
            BuilderMode::Browsing => Ok(()),
            BuilderMode::Editing => Err(BuilderError::EditModeActive),
        }
    }

    fn require_editing(&self) -> BuilderResult<()> {
        match self.mode {
            BuilderMode::Editing => Ok(()),
            BuilderMode::Browsing => Err(BuilderError::EditModeRequired),
        }
    }

    fn require_section_in_scope(&self, id: SectionId) -> BuilderResult<()> {
        let section = self.workspace.tree().require_section(id)?;
        if section.subcategory_id != self.subcategory_id {
            return Err(BuilderError::OutOfScope(id));
        }
        Ok(())
    }

    fn require_sentence_in_scope(&self, id: SentenceId) -> BuilderResult<()> {
        let section_id = self.workspace.tree().require_sentence(id)?.section_id;
        self.require_section_in_scope(section_id)
            .map_err(|err| match err {
                BuilderError::OutOfScope(_) => BuilderError::OutOfScope(id),
                other => other,
            })
    }
}
