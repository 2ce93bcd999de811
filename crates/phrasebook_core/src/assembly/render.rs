//! Sentence assembly and preview/clipboard rendering.
//!
//! # Responsibility
//! - Concatenate sentence parts with user fills into plain text.
//! - Group active sentences into titled section blocks.
//! - Flatten blocks into the clipboard text format.
//!
//! # Invariants
//! - Section and sentence order follow the tree order.
//! - Sections without active sentences are omitted.
//! - Clipboard text is trimmed at both ends.

use crate::assembly::selection::{FillValues, Selection};
use crate::model::template::{SectionId, Sentence, SentenceId, SubcategoryId};
use crate::tree::arena::{TemplateTree, TreeResult};

/// Prefix of one sentence line in clipboard output.
pub const BULLET: &str = "• ";

/// One rendered sentence of a preview block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewLine {
    pub sentence_id: SentenceId,
    pub text: String,
}

/// Titled group of active sentences from one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewBlock {
    pub section_id: SectionId,
    pub title: String,
    pub lines: Vec<PreviewLine>,
}

/// Renders one sentence by concatenating its parts.
pub fn render_sentence(sentence: &Sentence, fills: &FillValues) -> String {
    sentence
        .parts
        .iter()
        .enumerate()
        .map(|(index, part)| part.render(fills.get(sentence.id, index)))
        .collect()
}

/// Renders the active sentences of a subcategory into section blocks.
pub fn render_preview(
    tree: &TemplateTree,
    subcategory_id: SubcategoryId,
    selection: &Selection,
) -> TreeResult<Vec<PreviewBlock>> {
    let blocks = tree
        .sections_of(subcategory_id)?
        .into_iter()
        .filter_map(|section| {
            let lines: Vec<PreviewLine> = section
                .sentences
                .iter()
                .filter(|id| selection.is_active(**id))
                .filter_map(|id| tree.sentence(*id))
                .map(|sentence| PreviewLine {
                    sentence_id: sentence.id,
                    text: render_sentence(sentence, selection.fills()),
                })
                .collect();
            if lines.is_empty() {
                return None;
            }
            Some(PreviewBlock {
                section_id: section.id,
                title: section.title.clone(),
                lines,
            })
        })
        .collect();
    Ok(blocks)
}

/// Flattens preview blocks into clipboard text.
///
/// Layout: section title line, one bullet line per sentence, one blank
/// line between blocks.
pub fn blocks_to_clipboard_text(blocks: &[PreviewBlock]) -> String {
    let mut text = String::new();
    for block in blocks {
        text.push_str(&block.title);
        text.push('\n');
        for line in &block.lines {
            text.push_str(BULLET);
            text.push_str(&line.text);
            text.push('\n');
        }
        text.push('\n');
    }
    text.trim().to_string()
}

/// Renders a subcategory selection straight to clipboard text.
pub fn to_clipboard_text(
    tree: &TemplateTree,
    subcategory_id: SubcategoryId,
    selection: &Selection,
) -> TreeResult<String> {
    let blocks = render_preview(tree, subcategory_id, selection)?;
    Ok(blocks_to_clipboard_text(&blocks))
}
