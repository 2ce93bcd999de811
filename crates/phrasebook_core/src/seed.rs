//! Starter templates shown when an owner has nothing stored yet.
//!
//! Every call mints fresh ids so a starter tree can be persisted without
//! colliding with an earlier copy.

use crate::model::part::Part;
use crate::model::template::{CategoryRecord, SectionRecord, SentenceRecord, SubcategoryRecord};
use uuid::Uuid;

/// Builds the starter hierarchy as nested records.
pub fn starter_records() -> Vec<CategoryRecord> {
    vec![
        category(
            0,
            "Medical summary",
            "Templates for visit summaries, discharge letters and referrals.",
            "Chief complaints",
            "Symptoms",
            vec![
                Part::literal("The patient complains of pain in the "),
                Part::choice("Area", "head,abdomen,back,chest"),
                Part::literal(" for "),
                free_text("Duration", "w-24", None),
                Part::literal("."),
            ],
        ),
        category(
            1,
            "Legal agreements",
            "Standard contracts, declarations and employment documents.",
            "Party details",
            "Identification",
            vec![
                Part::literal("This agreement was made and signed in "),
                free_text("City", "w-32", None),
                Part::literal(" on "),
                free_text("Date", "w-40", Some("date")),
                Part::literal("."),
            ],
        ),
    ]
}

fn category(
    display_order: i64,
    title: &str,
    description: &str,
    subcategory_title: &str,
    section_title: &str,
    parts: Vec<Part>,
) -> CategoryRecord {
    CategoryRecord {
        id: Uuid::new_v4(),
        title: title.to_string(),
        description: description.to_string(),
        display_order,
        subcategories: vec![SubcategoryRecord {
            id: Uuid::new_v4(),
            title: subcategory_title.to_string(),
            display_order: 0,
            sections: vec![SectionRecord {
                id: Uuid::new_v4(),
                title: section_title.to_string(),
                display_order: 0,
                sentences: vec![SentenceRecord {
                    id: Uuid::new_v4(),
                    display_order: 0,
                    parts,
                }],
            }],
        }],
    }
}

fn free_text(label: &str, width: &str, input_hint: Option<&str>) -> Part {
    Part::FreeText {
        label: Some(label.to_string()),
        width: Some(width.to_string()),
        input_hint: input_hint.map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::starter_records;
    use crate::model::part::PartKind;

    #[test]
    fn starter_records_hold_two_categories_with_one_sentence_each() {
        let records = starter_records();
        assert_eq!(records.len(), 2);
        for record in &records {
            let sentences = &record.subcategories[0].sections[0].sentences;
            assert_eq!(sentences.len(), 1);
            assert!(sentences[0]
                .parts
                .iter()
                .any(|part| part.kind() != PartKind::Literal));
        }
    }

    #[test]
    fn starter_ids_are_fresh_per_call() {
        assert_ne!(starter_records()[0].id, starter_records()[0].id);
    }
}
