//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `phrasebook_core` linkage without any store configured.
//! - Print the assembled text of the first starter subcategory with every
//!   sentence selected, so output stays deterministic.

use phrasebook_core::{LocalOnlyAdapter, PhrasebookConfig, TemplateWorkspace};

fn main() {
    println!("phrasebook_core ping={}", phrasebook_core::ping());
    println!("phrasebook_core version={}", phrasebook_core::core_version());

    let mut workspace = TemplateWorkspace::open_with_system_clock(
        LocalOnlyAdapter::new(),
        PhrasebookConfig::default(),
        None,
    );
    let Some(subcategory_id) = workspace
        .tree()
        .categories()
        .next()
        .and_then(|category| category.subcategories.first().copied())
    else {
        eprintln!("no starter subcategory available");
        std::process::exit(1);
    };

    let sentence_ids: Vec<_> = match workspace.tree().sections_of(subcategory_id) {
        Ok(sections) => sections
            .iter()
            .flat_map(|section| section.sentences.iter().copied())
            .collect(),
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    let mut builder = match workspace.open_builder(subcategory_id) {
        Ok(builder) => builder,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };
    for sentence_id in sentence_ids {
        if let Err(err) = builder.toggle_selection(sentence_id) {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }

    match builder.clipboard_text() {
        Ok(text) => println!("{text}"),
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
