//! Console views of the record store.

use std::fmt::Write as _;

use concept_breakdown_core::{CategoryKey, RecordStore};

const TOPIC_WIDTH: usize = 22;
const DETAILS_WIDTH: usize = 42;

/// Hierarchical listing: category, `- concept`, `   - component`.
pub fn render_listing(store: &RecordStore) -> String {
    let mut out = String::from("Database Contents:\n");
    for category in store.categories() {
        let _ = writeln!(out, "{}", category.topic);
        for concept in store.concepts_by_category(&CategoryKey::Id(category.id)) {
            let _ = writeln!(out, "- {}", concept.topic);
            for component in store.components_by_concept(concept.id) {
                let _ = writeln!(out, "   - {}", component.topic);
            }
        }
    }
    out
}

/// Per-category blocks with a bordered component table under each concept.
pub fn render_tables(store: &RecordStore) -> String {
    let border = format!(
        "+{}+{}+\n",
        "-".repeat(TOPIC_WIDTH + 2),
        "-".repeat(DETAILS_WIDTH + 2)
    );
    let mut out = String::from("Database Contents:\n");
    for category in store.categories() {
        let _ = writeln!(out, "\nCategory Name: {}", category.topic);
        let _ = writeln!(out, "Category ID: {}", category.id);
        for concept in store.concepts_by_category(&CategoryKey::Id(category.id)) {
            let _ = writeln!(out, "Concept ID: {}", concept.id);
            let _ = writeln!(
                out,
                "Concept Name and Details: {} | {}",
                concept.topic, concept.details
            );
            let components = store.components_by_concept(concept.id);
            if components.is_empty() {
                out.push_str("No components available for this concept.\n");
                continue;
            }
            out.push_str(&border);
            push_row(&mut out, "COMPONENTS", "DESCRIPTION");
            out.push_str(&border);
            for component in components {
                let mut lines = wrap_words(&component.details, DETAILS_WIDTH).into_iter();
                push_row(&mut out, &component.topic, &lines.next().unwrap_or_default());
                for line in lines {
                    push_row(&mut out, "", &line);
                }
            }
            out.push_str(&border);
        }
    }
    out
}

fn push_row(out: &mut String, topic: &str, details: &str) {
    let _ = writeln!(
        out,
        "| {topic:<tw$} | {details:<dw$} |",
        tw = TOPIC_WIDTH,
        dw = DETAILS_WIDTH
    );
}

/// Greedy word wrap. Words longer than `width` get a line of their own.
fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if !line.is_empty() && line.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}
