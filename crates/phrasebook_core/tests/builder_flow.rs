mod common;

use common::{open_workspace, RecordingAdapter, TestWorkspace};
use phrasebook_core::{
    BuilderError, BuilderMode, Clipboard, ClipboardError, MemoryClipboard, NoticeLevel, Part,
    PartField, PartKind, SyncOp, TreeError,
};
use std::time::Duration;
use uuid::Uuid;

struct BrokenClipboard;

impl Clipboard for BrokenClipboard {
    fn write_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::Unsupported)
    }
}

/// Ids of the first starter chain: (subcategory, section, sentence).
fn first_chain(workspace: &TestWorkspace, category_index: usize) -> (Uuid, Uuid, Uuid) {
    let tree = workspace.tree();
    let category = tree.category(tree.category_ids()[category_index]).unwrap();
    let subcategory = tree.subcategory(category.subcategories[0]).unwrap();
    let section = tree.section(subcategory.sections[0]).unwrap();
    (subcategory.id, section.id, section.sentences[0])
}

#[test]
fn builder_opens_browsing_with_nothing_selected() {
    let mut workspace = open_workspace(RecordingAdapter::stocked());
    let (sub, _, _) = first_chain(&workspace, 0);
    let mut builder = workspace.open_builder(sub).unwrap();

    assert_eq!(builder.mode(), BuilderMode::Browsing);
    assert!(builder.selection().is_empty());
    assert!(!builder.can_copy());
    assert_eq!(builder.clipboard_text().unwrap(), "");

    let mut clipboard = MemoryClipboard::new();
    assert!(matches!(
        builder.copy(&mut clipboard),
        Err(BuilderError::NothingSelected)
    ));
    assert!(clipboard.writes().is_empty());
}

#[test]
fn open_builder_rejects_unknown_subcategory() {
    let mut workspace = open_workspace(RecordingAdapter::stocked());
    let missing = Uuid::new_v4();
    assert!(matches!(
        workspace.open_builder(missing),
        Err(TreeError::SubcategoryNotFound(id)) if id == missing
    ));
}

#[test]
fn fills_replace_placeholders_in_preview() {
    let mut workspace = open_workspace(RecordingAdapter::stocked());
    let (sub, section, sentence) = first_chain(&workspace, 0);
    let mut builder = workspace.open_builder(sub).unwrap();

    assert!(builder.toggle_selection(sentence).unwrap());
    let preview = builder.preview().unwrap();
    assert_eq!(preview.len(), 1);
    assert_eq!(preview[0].section_id, section);
    assert_eq!(
        preview[0].lines[0].text,
        "The patient complains of pain in the [Area] for [Duration]."
    );

    builder.set_fill_value(sentence, 1, "back").unwrap();
    builder.set_fill_value(sentence, 3, "two days").unwrap();
    assert_eq!(
        builder.clipboard_text().unwrap(),
        "Symptoms\n• The patient complains of pain in the back for two days."
    );

    builder.set_fill_value(sentence, 3, "").unwrap();
    assert_eq!(
        builder.preview().unwrap()[0].lines[0].text,
        "The patient complains of pain in the back for [Duration]."
    );
}

#[test]
fn fill_outside_part_range_is_rejected() {
    let mut workspace = open_workspace(RecordingAdapter::stocked());
    let (sub, _, sentence) = first_chain(&workspace, 0);
    let mut builder = workspace.open_builder(sub).unwrap();

    assert!(matches!(
        builder.set_fill_value(sentence, 5, "x"),
        Err(BuilderError::Tree(TreeError::PartOutOfRange { index: 5, len: 5, .. }))
    ));
}

#[test]
fn modes_gate_selection_and_structure() {
    let mut workspace = open_workspace(RecordingAdapter::stocked());
    let (sub, _, sentence) = first_chain(&workspace, 0);
    let mut builder = workspace.open_builder(sub).unwrap();

    assert!(matches!(
        builder.add_section(),
        Err(BuilderError::EditModeRequired)
    ));
    builder.toggle_selection(sentence).unwrap();

    assert_eq!(builder.toggle_mode(), BuilderMode::Editing);
    assert!(matches!(
        builder.toggle_selection(sentence),
        Err(BuilderError::EditModeActive)
    ));
    assert!(matches!(
        builder.set_fill_value(sentence, 1, "head"),
        Err(BuilderError::EditModeActive)
    ));
    builder.add_section().unwrap();

    assert_eq!(builder.toggle_mode(), BuilderMode::Browsing);
    assert!(builder.selection().is_active(sentence));
}

#[test]
fn copy_writes_text_and_shows_feedback_briefly() {
    let mut workspace = open_workspace(RecordingAdapter::stocked());
    let (sub, _, sentence) = first_chain(&workspace, 0);
    let mut builder = workspace.open_builder(sub).unwrap();
    builder.toggle_selection(sentence).unwrap();

    let mut clipboard = MemoryClipboard::new();
    let text = builder.copy(&mut clipboard).unwrap();
    assert_eq!(clipboard.last(), Some(text.as_str()));
    assert!(text.starts_with("Symptoms\n• "));
    assert!(builder.is_copied());

    let latest = builder.workspace().notices().latest().unwrap();
    assert_eq!(latest.level, NoticeLevel::Info);
    assert_eq!(latest.message, "Text copied to clipboard");

    builder.workspace().clock().advance(Duration::from_millis(1999));
    assert!(builder.is_copied());
    builder.workspace().clock().advance(Duration::from_millis(1));
    assert!(!builder.is_copied());
}

#[test]
fn clipboard_failure_posts_error_notice() {
    let mut workspace = open_workspace(RecordingAdapter::stocked());
    let (sub, _, sentence) = first_chain(&workspace, 0);
    let mut builder = workspace.open_builder(sub).unwrap();
    builder.toggle_selection(sentence).unwrap();

    assert!(matches!(
        builder.copy(&mut BrokenClipboard),
        Err(BuilderError::Clipboard(ClipboardError::Unsupported))
    ));
    assert!(!builder.is_copied());

    let latest = builder.workspace().notices().latest().unwrap();
    assert_eq!(latest.level, NoticeLevel::Error);
    assert_eq!(latest.message, "Failed to copy text");
}

#[test]
fn deleting_sentences_drops_them_from_selection() {
    let mut workspace = open_workspace(RecordingAdapter::stocked());
    let (sub, section, sentence) = first_chain(&workspace, 0);
    let mut builder = workspace.open_builder(sub).unwrap();

    builder.toggle_mode();
    let extra = builder.add_sentence(section).unwrap();
    builder.toggle_mode();
    builder.toggle_selection(sentence).unwrap();
    builder.toggle_selection(extra).unwrap();
    builder.set_fill_value(sentence, 1, "chest").unwrap();

    builder.toggle_mode();
    builder.delete_sentence(sentence).unwrap();
    assert!(!builder.selection().is_active(sentence));
    assert!(builder.selection().fills().is_empty());
    assert!(builder.selection().is_active(extra));

    let report = builder.delete_section(section).unwrap();
    assert_eq!(report.sentences, vec![extra]);
    assert!(builder.selection().is_empty());
    builder.close();

    workspace.flush_writes();
    let ops = workspace.adapter().ops();
    assert!(ops.contains(&SyncOp::DeleteSentence));
    assert!(ops.contains(&SyncOp::DeleteSection));
}

#[test]
fn entities_outside_the_open_subcategory_are_refused() {
    let mut workspace = open_workspace(RecordingAdapter::stocked());
    let (sub, _, _) = first_chain(&workspace, 0);
    let (_, foreign_section, foreign_sentence) = first_chain(&workspace, 1);
    let mut builder = workspace.open_builder(sub).unwrap();

    assert!(matches!(
        builder.toggle_selection(foreign_sentence),
        Err(BuilderError::OutOfScope(id)) if id == foreign_sentence
    ));

    builder.toggle_mode();
    assert!(matches!(
        builder.rename_section(foreign_section, "Stolen"),
        Err(BuilderError::OutOfScope(id)) if id == foreign_section
    ));
    assert!(matches!(
        builder.remove_part(foreign_sentence, 0),
        Err(BuilderError::OutOfScope(id)) if id == foreign_sentence
    ));
}

#[test]
fn part_edits_reset_fills_of_that_sentence() {
    let mut workspace = open_workspace(RecordingAdapter::stocked());
    let (sub, _, sentence) = first_chain(&workspace, 0);
    let mut builder = workspace.open_builder(sub).unwrap();

    builder.toggle_selection(sentence).unwrap();
    builder.set_fill_value(sentence, 3, "a week").unwrap();

    builder.toggle_mode();
    builder
        .replace_part(sentence, 3, Part::free_text("Period"))
        .unwrap();
    builder.toggle_mode();

    assert!(builder.selection().is_active(sentence));
    assert_eq!(builder.selection().fills().get(sentence, 3), None);
    assert_eq!(
        builder.preview().unwrap()[0].lines[0].text,
        "The patient complains of pain in the [Area] for [Period]."
    );
}

#[test]
fn edits_in_builder_land_in_the_workspace_tree() {
    let mut workspace = open_workspace(RecordingAdapter::stocked());
    let (sub, _, _) = first_chain(&workspace, 0);
    let mut builder = workspace.open_builder(sub).unwrap();

    builder.toggle_mode();
    let section = builder.add_section().unwrap();
    builder.rename_section(section, "Plan").unwrap();
    let sentence = builder.add_sentence(section).unwrap();
    builder
        .update_part_field(sentence, 0, PartField::Text("Follow up in ".to_string()))
        .unwrap();
    let index = builder.append_part(sentence, PartKind::FreeText).unwrap();
    assert!(builder
        .update_part_field(sentence, index, PartField::Label("Interval".to_string()))
        .unwrap());
    assert!(builder
        .move_section(section, phrasebook_core::MoveDirection::Up)
        .unwrap());
    builder.close();

    let tree = workspace.tree();
    assert_eq!(tree.subcategory(sub).unwrap().sections[0], section);
    assert_eq!(tree.section(section).unwrap().title, "Plan");
    assert_eq!(
        tree.sentence(sentence).unwrap().parts,
        vec![
            Part::literal("Follow up in "),
            Part::FreeText {
                label: Some("Interval".to_string()),
                width: Some("w-24".to_string()),
                input_hint: None,
            },
        ]
    );
    assert!(workspace.snapshot_pending());
    assert_eq!(
        workspace.pending_ops(),
        vec![
            SyncOp::CreateSection,
            SyncOp::UpdateSection,
            SyncOp::CreateSentence,
            SyncOp::UpdateSentence,
            SyncOp::UpdateSentence,
            SyncOp::UpdateSentence,
            SyncOp::ReorderSections,
        ]
    );
}
