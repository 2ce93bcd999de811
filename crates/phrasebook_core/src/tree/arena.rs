//! In-memory template tree stored as an id-keyed arena.
//!
//! # Responsibility
//! - Own every category, subcategory, section and sentence of one session.
//! - Apply local structural mutations (add, rename, delete, move, part edits).
//! - Project the arena into nested records and back.
//!
//! # Invariants
//! - Child id lists are the single source of sibling order.
//! - Deleting an entity removes its whole subtree; nothing stays reachable.
//! - Every stored sentence holds at least one part.

use crate::model::part::{Part, PartField};
use crate::model::template::{
    Category, CategoryId, CategoryRecord, OrderEntry, Section, SectionId, SectionRecord, Sentence,
    SentenceId, SentenceRecord, Subcategory, SubcategoryId, SubcategoryRecord,
};
use crate::tree::ordering::{dense_order, move_sibling, MoveDirection};
use log::warn;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Result type used by tree operations.
pub type TreeResult<T> = Result<T, TreeError>;

/// Lookup and identity errors from tree operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// Id is already used by another entity in this tree.
    DuplicateId(Uuid),
    CategoryNotFound(CategoryId),
    SubcategoryNotFound(SubcategoryId),
    SectionNotFound(SectionId),
    SentenceNotFound(SentenceId),
    /// Part index is outside the sentence part list.
    PartOutOfRange {
        sentence_id: SentenceId,
        index: usize,
        len: usize,
    },
}

impl Display for TreeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateId(id) => write!(f, "template id already in use: {id}"),
            Self::CategoryNotFound(id) => write!(f, "category not found: {id}"),
            Self::SubcategoryNotFound(id) => write!(f, "subcategory not found: {id}"),
            Self::SectionNotFound(id) => write!(f, "section not found: {id}"),
            Self::SentenceNotFound(id) => write!(f, "sentence not found: {id}"),
            Self::PartOutOfRange {
                sentence_id,
                index,
                len,
            } => write!(
                f,
                "part index {index} out of range for sentence {sentence_id} with {len} parts"
            ),
        }
    }
}

impl Error for TreeError {}

/// Ids removed by one cascading delete, parent levels first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CascadeReport {
    pub categories: Vec<CategoryId>,
    pub subcategories: Vec<SubcategoryId>,
    pub sections: Vec<SectionId>,
    pub sentences: Vec<SentenceId>,
}

impl CascadeReport {
    pub fn removed_count(&self) -> usize {
        self.categories.len()
            + self.subcategories.len()
            + self.sections.len()
            + self.sentences.len()
    }
}

/// Arena holding one owner's template hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateTree {
    category_order: Vec<CategoryId>,
    categories: HashMap<CategoryId, Category>,
    subcategories: HashMap<SubcategoryId, Subcategory>,
    sections: HashMap<SectionId, Section>,
    sentences: HashMap<SentenceId, Sentence>,
}

impl TemplateTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a tree from nested records.
    ///
    /// Siblings are ordered by `display_order`; duplicate ids are skipped and
    /// sentences without parts are healed with one empty literal.
    pub fn from_records(records: Vec<CategoryRecord>) -> Self {
        let mut tree = Self::new();
        let mut records = records;
        records.sort_by_key(|record| record.display_order);
        for mut category in records {
            if tree
                .add_category(category.id, category.title, category.description)
                .is_err()
            {
                warn!(
                    "event=tree_load module=tree status=skip reason=duplicate_id id={}",
                    category.id
                );
                continue;
            }
            category.subcategories.sort_by_key(|record| record.display_order);
            for mut subcategory in category.subcategories {
                if tree
                    .add_subcategory(category.id, subcategory.id, subcategory.title)
                    .is_err()
                {
                    warn!(
                        "event=tree_load module=tree status=skip reason=duplicate_id id={}",
                        subcategory.id
                    );
                    continue;
                }
                subcategory.sections.sort_by_key(|record| record.display_order);
                for mut section in subcategory.sections {
                    if tree
                        .add_section(subcategory.id, section.id, section.title)
                        .is_err()
                    {
                        warn!(
                            "event=tree_load module=tree status=skip reason=duplicate_id id={}",
                            section.id
                        );
                        continue;
                    }
                    section.sentences.sort_by_key(|record| record.display_order);
                    for sentence in section.sentences {
                        if tree
                            .add_sentence(section.id, sentence.id, sentence.parts)
                            .is_err()
                        {
                            warn!(
                                "event=tree_load module=tree status=skip reason=duplicate_id id={}",
                                sentence.id
                            );
                        }
                    }
                }
            }
        }
        tree
    }

    /// Projects the tree into nested records with dense display orders.
    pub fn to_records(&self) -> Vec<CategoryRecord> {
        self.categories()
            .enumerate()
            .map(|(index, category)| CategoryRecord {
                id: category.id,
                title: category.title.clone(),
                description: category.description.clone(),
                display_order: index as i64,
                subcategories: self.subcategory_records(category),
            })
            .collect()
    }

    fn subcategory_records(&self, category: &Category) -> Vec<SubcategoryRecord> {
        category
            .subcategories
            .iter()
            .filter_map(|id| self.subcategories.get(id))
            .enumerate()
            .map(|(index, subcategory)| SubcategoryRecord {
                id: subcategory.id,
                title: subcategory.title.clone(),
                display_order: index as i64,
                sections: subcategory
                    .sections
                    .iter()
                    .filter_map(|id| self.sections.get(id))
                    .enumerate()
                    .map(|(index, section)| SectionRecord {
                        id: section.id,
                        title: section.title.clone(),
                        display_order: index as i64,
                        sentences: section
                            .sentences
                            .iter()
                            .filter_map(|id| self.sentences.get(id))
                            .enumerate()
                            .map(|(index, sentence)| SentenceRecord {
                                id: sentence.id,
                                display_order: index as i64,
                                parts: sentence.parts.clone(),
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.category_order.is_empty()
    }

    /// Total number of containers plus sentences held by the arena.
    pub fn entity_count(&self) -> usize {
        self.categories.len()
            + self.subcategories.len()
            + self.sections.len()
            + self.sentences.len()
    }

    /// Returns whether any level holds `id`.
    pub fn contains(&self, id: Uuid) -> bool {
        self.categories.contains_key(&id)
            || self.subcategories.contains_key(&id)
            || self.sections.contains_key(&id)
            || self.sentences.contains_key(&id)
    }

    pub fn category_ids(&self) -> &[CategoryId] {
        &self.category_order
    }

    /// Categories in display order.
    pub fn categories(&self) -> impl Iterator<Item = &Category> + '_ {
        self.category_order
            .iter()
            .filter_map(|id| self.categories.get(id))
    }

    pub fn category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.get(&id)
    }

    pub fn subcategory(&self, id: SubcategoryId) -> Option<&Subcategory> {
        self.subcategories.get(&id)
    }

    pub fn section(&self, id: SectionId) -> Option<&Section> {
        self.sections.get(&id)
    }

    pub fn sentence(&self, id: SentenceId) -> Option<&Sentence> {
        self.sentences.get(&id)
    }

    /// Subcategories of one category in display order.
    pub fn subcategories_of(&self, category_id: CategoryId) -> TreeResult<Vec<&Subcategory>> {
        let category = self.require_category(category_id)?;
        Ok(category
            .subcategories
            .iter()
            .filter_map(|id| self.subcategories.get(id))
            .collect())
    }

    /// Sections of one subcategory in display order.
    pub fn sections_of(&self, subcategory_id: SubcategoryId) -> TreeResult<Vec<&Section>> {
        let subcategory = self.require_subcategory(subcategory_id)?;
        Ok(subcategory
            .sections
            .iter()
            .filter_map(|id| self.sections.get(id))
            .collect())
    }

    /// Sentences of one section in display order.
    pub fn sentences_of(&self, section_id: SectionId) -> TreeResult<Vec<&Sentence>> {
        let section = self.require_section(section_id)?;
        Ok(section
            .sentences
            .iter()
            .filter_map(|id| self.sentences.get(id))
            .collect())
    }

    pub fn category_order(&self) -> Vec<OrderEntry> {
        dense_order(&self.category_order)
    }

    pub fn subcategory_order(&self, category_id: CategoryId) -> TreeResult<Vec<OrderEntry>> {
        Ok(dense_order(&self.require_category(category_id)?.subcategories))
    }

    pub fn section_order(&self, subcategory_id: SubcategoryId) -> TreeResult<Vec<OrderEntry>> {
        Ok(dense_order(&self.require_subcategory(subcategory_id)?.sections))
    }

    pub fn sentence_order(&self, section_id: SectionId) -> TreeResult<Vec<OrderEntry>> {
        Ok(dense_order(&self.require_section(section_id)?.sentences))
    }

    /// Appends a category; returns its display order.
    pub fn add_category(
        &mut self,
        id: CategoryId,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> TreeResult<i64> {
        self.ensure_unused(id)?;
        self.categories.insert(
            id,
            Category {
                id,
                title: title.into(),
                description: description.into(),
                subcategories: Vec::new(),
            },
        );
        self.category_order.push(id);
        Ok(self.category_order.len() as i64 - 1)
    }

    /// Appends a subcategory under `category_id`; returns its display order.
    pub fn add_subcategory(
        &mut self,
        category_id: CategoryId,
        id: SubcategoryId,
        title: impl Into<String>,
    ) -> TreeResult<i64> {
        self.ensure_unused(id)?;
        let category = self
            .categories
            .get_mut(&category_id)
            .ok_or(TreeError::CategoryNotFound(category_id))?;
        category.subcategories.push(id);
        let order = category.subcategories.len() as i64 - 1;
        self.subcategories.insert(
            id,
            Subcategory {
                id,
                category_id,
                title: title.into(),
                sections: Vec::new(),
            },
        );
        Ok(order)
    }

    /// Appends a section under `subcategory_id`; returns its display order.
    pub fn add_section(
        &mut self,
        subcategory_id: SubcategoryId,
        id: SectionId,
        title: impl Into<String>,
    ) -> TreeResult<i64> {
        self.ensure_unused(id)?;
        let subcategory = self
            .subcategories
            .get_mut(&subcategory_id)
            .ok_or(TreeError::SubcategoryNotFound(subcategory_id))?;
        subcategory.sections.push(id);
        let order = subcategory.sections.len() as i64 - 1;
        self.sections.insert(
            id,
            Section {
                id,
                subcategory_id,
                title: title.into(),
                sentences: Vec::new(),
            },
        );
        Ok(order)
    }

    /// Appends a sentence under `section_id`; returns its display order.
    ///
    /// An empty `parts` list is replaced by one empty literal.
    pub fn add_sentence(
        &mut self,
        section_id: SectionId,
        id: SentenceId,
        parts: Vec<Part>,
    ) -> TreeResult<i64> {
        self.ensure_unused(id)?;
        let section = self
            .sections
            .get_mut(&section_id)
            .ok_or(TreeError::SectionNotFound(section_id))?;
        section.sentences.push(id);
        let order = section.sentences.len() as i64 - 1;
        let mut sentence = Sentence {
            id,
            section_id,
            parts,
        };
        heal_empty_sentence(&mut sentence);
        self.sentences.insert(id, sentence);
        Ok(order)
    }

    pub fn rename_category(&mut self, id: CategoryId, title: impl Into<String>) -> TreeResult<()> {
        self.categories
            .get_mut(&id)
            .ok_or(TreeError::CategoryNotFound(id))?
            .title = title.into();
        Ok(())
    }

    pub fn set_category_description(
        &mut self,
        id: CategoryId,
        description: impl Into<String>,
    ) -> TreeResult<()> {
        self.categories
            .get_mut(&id)
            .ok_or(TreeError::CategoryNotFound(id))?
            .description = description.into();
        Ok(())
    }

    pub fn rename_subcategory(
        &mut self,
        id: SubcategoryId,
        title: impl Into<String>,
    ) -> TreeResult<()> {
        self.subcategories
            .get_mut(&id)
            .ok_or(TreeError::SubcategoryNotFound(id))?
            .title = title.into();
        Ok(())
    }

    pub fn rename_section(&mut self, id: SectionId, title: impl Into<String>) -> TreeResult<()> {
        self.sections
            .get_mut(&id)
            .ok_or(TreeError::SectionNotFound(id))?
            .title = title.into();
        Ok(())
    }

    /// Removes a category and its whole subtree.
    pub fn remove_category(&mut self, id: CategoryId) -> TreeResult<CascadeReport> {
        let category = self
            .categories
            .remove(&id)
            .ok_or(TreeError::CategoryNotFound(id))?;
        self.category_order.retain(|current| *current != id);

        let mut report = CascadeReport {
            categories: vec![id],
            ..CascadeReport::default()
        };
        for subcategory_id in category.subcategories {
            self.drop_subcategory_subtree(subcategory_id, &mut report);
        }
        Ok(report)
    }

    /// Removes a subcategory and its whole subtree.
    pub fn remove_subcategory(&mut self, id: SubcategoryId) -> TreeResult<CascadeReport> {
        let category_id = self.require_subcategory(id)?.category_id;
        if let Some(category) = self.categories.get_mut(&category_id) {
            category.subcategories.retain(|current| *current != id);
        }
        let mut report = CascadeReport::default();
        self.drop_subcategory_subtree(id, &mut report);
        Ok(report)
    }

    /// Removes a section and its sentences.
    pub fn remove_section(&mut self, id: SectionId) -> TreeResult<CascadeReport> {
        let subcategory_id = self.require_section(id)?.subcategory_id;
        if let Some(subcategory) = self.subcategories.get_mut(&subcategory_id) {
            subcategory.sections.retain(|current| *current != id);
        }
        let mut report = CascadeReport::default();
        self.drop_section_subtree(id, &mut report);
        Ok(report)
    }

    /// Removes a sentence and its parts.
    pub fn remove_sentence(&mut self, id: SentenceId) -> TreeResult<CascadeReport> {
        let sentence = self
            .sentences
            .remove(&id)
            .ok_or(TreeError::SentenceNotFound(id))?;
        if let Some(section) = self.sections.get_mut(&sentence.section_id) {
            section.sentences.retain(|current| *current != id);
        }
        Ok(CascadeReport {
            sentences: vec![id],
            ..CascadeReport::default()
        })
    }

    fn drop_subcategory_subtree(&mut self, id: SubcategoryId, report: &mut CascadeReport) {
        if let Some(subcategory) = self.subcategories.remove(&id) {
            report.subcategories.push(id);
            for section_id in subcategory.sections {
                self.drop_section_subtree(section_id, report);
            }
        }
    }

    fn drop_section_subtree(&mut self, id: SectionId, report: &mut CascadeReport) {
        if let Some(section) = self.sections.remove(&id) {
            report.sections.push(id);
            for sentence_id in section.sentences {
                if self.sentences.remove(&sentence_id).is_some() {
                    report.sentences.push(sentence_id);
                }
            }
        }
    }

    /// Moves a category one step; returns `true` when the order changed.
    pub fn move_category(&mut self, id: CategoryId, direction: MoveDirection) -> TreeResult<bool> {
        self.require_category(id)?;
        Ok(move_sibling(&mut self.category_order, &id, direction))
    }

    pub fn move_subcategory(
        &mut self,
        id: SubcategoryId,
        direction: MoveDirection,
    ) -> TreeResult<bool> {
        let category_id = self.require_subcategory(id)?.category_id;
        let category = self
            .categories
            .get_mut(&category_id)
            .ok_or(TreeError::CategoryNotFound(category_id))?;
        Ok(move_sibling(&mut category.subcategories, &id, direction))
    }

    pub fn move_section(&mut self, id: SectionId, direction: MoveDirection) -> TreeResult<bool> {
        let subcategory_id = self.require_section(id)?.subcategory_id;
        let subcategory = self
            .subcategories
            .get_mut(&subcategory_id)
            .ok_or(TreeError::SubcategoryNotFound(subcategory_id))?;
        Ok(move_sibling(&mut subcategory.sections, &id, direction))
    }

    pub fn move_sentence(&mut self, id: SentenceId, direction: MoveDirection) -> TreeResult<bool> {
        let section_id = self.require_sentence(id)?.section_id;
        let section = self
            .sections
            .get_mut(&section_id)
            .ok_or(TreeError::SectionNotFound(section_id))?;
        Ok(move_sibling(&mut section.sentences, &id, direction))
    }

    /// Appends a part to the end of a sentence.
    pub fn append_part(&mut self, sentence_id: SentenceId, part: Part) -> TreeResult<()> {
        self.sentence_mut(sentence_id)?.parts.push(part);
        Ok(())
    }

    /// Replaces the part at `index` wholesale.
    pub fn replace_part(
        &mut self,
        sentence_id: SentenceId,
        index: usize,
        part: Part,
    ) -> TreeResult<()> {
        let slot = self.part_mut(sentence_id, index)?;
        *slot = part;
        Ok(())
    }

    /// Applies one editor-time field to the part at `index`.
    ///
    /// Returns `false` when the field does not apply to that part kind.
    pub fn update_part_field(
        &mut self,
        sentence_id: SentenceId,
        index: usize,
        field: PartField,
    ) -> TreeResult<bool> {
        Ok(self.part_mut(sentence_id, index)?.update_field(field))
    }

    /// Removes the part at `index`.
    ///
    /// Removing the last part leaves one empty literal behind.
    pub fn remove_part(&mut self, sentence_id: SentenceId, index: usize) -> TreeResult<Part> {
        let sentence = self.sentence_mut(sentence_id)?;
        let len = sentence.parts.len();
        if index >= len {
            return Err(TreeError::PartOutOfRange {
                sentence_id,
                index,
                len,
            });
        }
        let removed = sentence.parts.remove(index);
        heal_empty_sentence(sentence);
        Ok(removed)
    }

    /// Replaces all parts of a sentence.
    pub fn set_parts(&mut self, sentence_id: SentenceId, parts: Vec<Part>) -> TreeResult<()> {
        let sentence = self.sentence_mut(sentence_id)?;
        sentence.parts = parts;
        heal_empty_sentence(sentence);
        Ok(())
    }

    fn ensure_unused(&self, id: Uuid) -> TreeResult<()> {
        if self.contains(id) {
            return Err(TreeError::DuplicateId(id));
        }
        Ok(())
    }

    pub(crate) fn require_category(&self, id: CategoryId) -> TreeResult<&Category> {
        self.categories.get(&id).ok_or(TreeError::CategoryNotFound(id))
    }

    pub(crate) fn require_subcategory(&self, id: SubcategoryId) -> TreeResult<&Subcategory> {
        self.subcategories
            .get(&id)
            .ok_or(TreeError::SubcategoryNotFound(id))
    }

    pub(crate) fn require_section(&self, id: SectionId) -> TreeResult<&Section> {
        self.sections.get(&id).ok_or(TreeError::SectionNotFound(id))
    }

    pub(crate) fn require_sentence(&self, id: SentenceId) -> TreeResult<&Sentence> {
        self.sentences.get(&id).ok_or(TreeError::SentenceNotFound(id))
    }

    fn sentence_mut(&mut self, id: SentenceId) -> TreeResult<&mut Sentence> {
        self.sentences
            .get_mut(&id)
            .ok_or(TreeError::SentenceNotFound(id))
    }

    fn part_mut(&mut self, sentence_id: SentenceId, index: usize) -> TreeResult<&mut Part> {
        let sentence = self.sentence_mut(sentence_id)?;
        let len = sentence.parts.len();
        sentence.parts.get_mut(index).ok_or(TreeError::PartOutOfRange {
            sentence_id,
            index,
            len,
        })
    }
}

fn heal_empty_sentence(sentence: &mut Sentence) {
    if sentence.parts.is_empty() {
        sentence.parts.push(Part::literal(""));
    }
}
