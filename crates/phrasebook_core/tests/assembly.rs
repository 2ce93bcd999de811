use phrasebook_core::assembly::render::{render_preview, render_sentence};
use phrasebook_core::{to_clipboard_text, FillValues, Part, Selection, TemplateTree};
use serde_json::json;
use uuid::Uuid;

struct Builder {
    tree: TemplateTree,
    subcategory: Uuid,
}

impl Builder {
    fn new() -> Self {
        let mut tree = TemplateTree::new();
        let category = Uuid::new_v4();
        let subcategory = Uuid::new_v4();
        tree.add_category(category, "C", "").unwrap();
        tree.add_subcategory(category, subcategory, "S").unwrap();
        Self { tree, subcategory }
    }

    fn section(&mut self, title: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.tree.add_section(self.subcategory, id, title).unwrap();
        id
    }

    fn sentence(&mut self, section: Uuid, parts: Vec<Part>) -> Uuid {
        let id = Uuid::new_v4();
        self.tree.add_sentence(section, id, parts).unwrap();
        id
    }
}

fn greeting() -> Vec<Part> {
    vec![Part::literal("Hello "), Part::free_text("Name")]
}

#[test]
fn placeholders_render_label_until_filled() {
    let mut b = Builder::new();
    let section = b.section("Intro");
    let id = b.sentence(section, greeting());
    let sentence = b.tree.sentence(id).unwrap();

    let mut fills = FillValues::new();
    assert_eq!(render_sentence(sentence, &fills), "Hello [Name]");

    fills.set(id, 1, "");
    assert_eq!(render_sentence(sentence, &fills), "Hello [Name]");

    fills.set(id, 1, "Dana");
    assert_eq!(render_sentence(sentence, &fills), "Hello Dana");
}

#[test]
fn unlabeled_placeholders_fall_back_to_generic_labels() {
    let mut b = Builder::new();
    let section = b.section("Intro");
    let id = b.sentence(
        section,
        vec![
            Part::FreeText {
                label: None,
                width: None,
                input_hint: None,
            },
            Part::literal(" / "),
            Part::Choice {
                label: Some("  ".to_string()),
                options: "a,b".to_string(),
            },
        ],
    );

    let rendered = render_sentence(b.tree.sentence(id).unwrap(), &FillValues::new());
    assert_eq!(rendered, "[Field] / [List]");
}

#[test]
fn clipboard_text_groups_active_sentences_by_section() {
    let mut b = Builder::new();
    let first = b.section("Symptoms");
    let empty = b.section("Unused");
    let last = b.section("Plan");
    let a = b.sentence(first, greeting());
    let skipped = b.sentence(first, vec![Part::literal("not selected")]);
    let c = b.sentence(first, vec![Part::literal("Rest")]);
    b.sentence(empty, vec![Part::literal("never")]);
    let d = b.sentence(
        last,
        vec![
            Part::literal("Follow up in "),
            Part::choice("When", "1 week,2 weeks"),
        ],
    );

    let mut selection = Selection::new();
    for id in [d, c, a] {
        selection.toggle(id);
    }
    selection.set_fill(a, 1, "Dana");
    selection.set_fill(d, 1, "2 weeks");

    let blocks = render_preview(&b.tree, b.subcategory, &selection).unwrap();
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].section_id, first);
    assert!(blocks[0].lines.iter().all(|line| line.sentence_id != skipped));

    let text = to_clipboard_text(&b.tree, b.subcategory, &selection).unwrap();
    assert_eq!(
        text,
        "Symptoms\n• Hello Dana\n• Rest\n\nPlan\n• Follow up in 2 weeks"
    );
}

#[test]
fn empty_selection_renders_nothing() {
    let mut b = Builder::new();
    let section = b.section("Intro");
    b.sentence(section, greeting());

    let selection = Selection::new();
    assert!(render_preview(&b.tree, b.subcategory, &selection)
        .unwrap()
        .is_empty());
    assert_eq!(
        to_clipboard_text(&b.tree, b.subcategory, &selection).unwrap(),
        ""
    );
}

#[test]
fn choice_options_are_trimmed_and_blank_free() {
    let part = Part::choice("Area", " head, abdomen ,,back ");
    assert_eq!(part.options(), vec!["head", "abdomen", "back"]);
    assert!(Part::literal("x").options().is_empty());
}

#[test]
fn parts_use_a_tagged_wire_shape() {
    let parts = vec![
        Part::literal("Hi "),
        Part::FreeText {
            label: Some("Date".to_string()),
            width: Some("w-40".to_string()),
            input_hint: Some("date".to_string()),
        },
        Part::choice("Area", "head,back"),
    ];

    let value = serde_json::to_value(&parts).unwrap();
    assert_eq!(
        value,
        json!([
            {"type": "literal", "value": "Hi "},
            {"type": "free_text", "label": "Date", "width": "w-40", "input_hint": "date"},
            {"type": "choice", "label": "Area", "options": "head,back"}
        ])
    );

    let decoded: Part = serde_json::from_value(json!({"type": "free_text"})).unwrap();
    assert_eq!(
        decoded,
        Part::FreeText {
            label: None,
            width: None,
            input_hint: None
        }
    );
}
