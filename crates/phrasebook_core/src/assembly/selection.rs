//! Use-time selection state for one open subcategory.
//!
//! # Invariants
//! - State is ephemeral and never persisted.
//! - Fill values are keyed by exact `(sentence, part index)` slot.

use crate::model::template::SentenceId;
use std::collections::{HashMap, HashSet};

/// Placeholder slot addressed by a fill value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FillKey {
    pub sentence_id: SentenceId,
    pub part_index: usize,
}

/// User-entered fill values for placeholder parts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FillValues {
    values: HashMap<FillKey, String>,
}

impl FillValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites the fill of one slot. Empty strings are stored as given.
    pub fn set(&mut self, sentence_id: SentenceId, part_index: usize, value: impl Into<String>) {
        self.values.insert(
            FillKey {
                sentence_id,
                part_index,
            },
            value.into(),
        );
    }

    pub fn get(&self, sentence_id: SentenceId, part_index: usize) -> Option<&str> {
        self.values
            .get(&FillKey {
                sentence_id,
                part_index,
            })
            .map(String::as_str)
    }

    /// Drops every fill belonging to one sentence.
    pub fn forget_sentence(&mut self, sentence_id: SentenceId) {
        self.values.retain(|key, _| key.sentence_id != sentence_id);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

/// Active sentence set plus fill values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    active: HashSet<SentenceId>,
    fills: FillValues,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or removes `sentence_id`; returns whether it is active afterwards.
    pub fn toggle(&mut self, sentence_id: SentenceId) -> bool {
        if self.active.remove(&sentence_id) {
            false
        } else {
            self.active.insert(sentence_id);
            true
        }
    }

    pub fn is_active(&self, sentence_id: SentenceId) -> bool {
        self.active.contains(&sentence_id)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn active_ids(&self) -> &HashSet<SentenceId> {
        &self.active
    }

    pub fn set_fill(
        &mut self,
        sentence_id: SentenceId,
        part_index: usize,
        value: impl Into<String>,
    ) {
        self.fills.set(sentence_id, part_index, value);
    }

    pub fn fills(&self) -> &FillValues {
        &self.fills
    }

    /// Drops the fills of one sentence but keeps it selected.
    pub fn reset_fills(&mut self, sentence_id: SentenceId) {
        self.fills.forget_sentence(sentence_id);
    }

    /// Forgets a deleted sentence: deselects it and drops its fills.
    pub fn forget_sentence(&mut self, sentence_id: SentenceId) {
        self.active.remove(&sentence_id);
        self.fills.forget_sentence(sentence_id);
    }

    pub fn clear(&mut self) {
        self.active.clear();
        self.fills.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::Selection;
    use uuid::Uuid;

    #[test]
    fn toggle_twice_restores_active_set() {
        let mut selection = Selection::new();
        let keep = Uuid::new_v4();
        let flip = Uuid::new_v4();
        selection.toggle(keep);
        let before = selection.active_ids().clone();

        assert!(selection.toggle(flip));
        assert!(!selection.toggle(flip));
        assert_eq!(selection.active_ids(), &before);
    }

    #[test]
    fn forget_sentence_drops_only_its_fills() {
        let mut selection = Selection::new();
        let gone = Uuid::new_v4();
        let kept = Uuid::new_v4();
        selection.toggle(gone);
        selection.set_fill(gone, 1, "a");
        selection.set_fill(gone, 3, "b");
        selection.set_fill(kept, 1, "c");

        selection.forget_sentence(gone);
        assert!(!selection.is_active(gone));
        assert_eq!(selection.fills().len(), 1);
        assert_eq!(selection.fills().get(kept, 1), Some("c"));
    }
}
