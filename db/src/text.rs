//! Line-oriented text format.
//!
//! One record per line, no header or footer:
//!
//! ```text
//! Category: <id>,<topic>
//! Concept: <id>,<topic>,<categoryTopic>,<details>
//! Component: <topic>,<details>
//! ```
//!
//! A `Component:` line belongs to the most recently accepted `Concept:`
//! line. Fields are split on commas with the last field taking the rest of
//! the line, so details may contain commas but topics may not. There is no
//! escaping.
//!
//! Parsing never aborts on a bad line. Each rejected line yields exactly one
//! [`LineDiagnostic`] and processing continues with the next line.
//!
//! # Example
//!
//! ```
//! use concept_breakdown_db::text::{parse_text, render_text};
//!
//! let input = "\
//! Category: 1,Design
//! Concept: 10,Wireframing,Design,Basics of wireframing
//! Component: Sketching,Paper-based low-fidelity drafts
//! ";
//! let load = parse_text(input);
//! assert!(load.diagnostics.is_empty());
//! assert_eq!(load.store.counts().components, 1);
//! assert_eq!(render_text(&load.store), input);
//! ```

use std::fmt;
use std::fmt::Write as _;
use std::path::Path;

use concept_breakdown_core::{
    CategoryKey, ComponentTarget, ConceptId, Diagnostic, EntityKind, NewConcept, RecordStore,
    StoreError,
};
use tracing::{debug, warn};

use crate::error::Result;

const CATEGORY_PREFIX: &str = "Category";
const CONCEPT_PREFIX: &str = "Concept";
const COMPONENT_PREFIX: &str = "Component";

/// Why a line was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineIssue {
    /// The line has no `:` separating the record type from its fields.
    MissingPrefix,
    /// The record type is not `Category`, `Concept`, or `Component`.
    UnknownRecordType(String),
    /// Fewer comma-separated fields than the record type needs.
    TooFewFields {
        kind: EntityKind,
        expected: usize,
        found: usize,
    },
    /// The id field is not an integer.
    InvalidId(String),
    /// A concept names a category that has not been seen.
    UnknownCategory(String),
    /// A component appears before any accepted concept.
    NoOwningConcept,
    /// The store refused the record (duplicate topic or id).
    Rejected(StoreError),
}

impl fmt::Display for LineIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineIssue::MissingPrefix => f.write_str("invalid line format (missing ':')"),
            LineIssue::UnknownRecordType(kind) => write!(f, "unknown record type '{kind}'"),
            LineIssue::TooFewFields {
                kind,
                expected,
                found,
            } => write!(f, "invalid {kind} format: expected {expected} fields, found {found}"),
            LineIssue::InvalidId(value) => write!(f, "invalid numeric id '{value}'"),
            LineIssue::UnknownCategory(topic) => {
                write!(f, "concept refers to unknown category '{topic}'")
            }
            LineIssue::NoOwningConcept => f.write_str("component has no preceding concept"),
            LineIssue::Rejected(err) => write!(f, "record rejected: {err}"),
        }
    }
}

/// A skipped line and the reason it was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineDiagnostic {
    /// 1-based line number.
    pub line: usize,
    /// The trimmed line content.
    pub content: String,
    pub issue: LineIssue,
}

impl fmt::Display for LineDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {} ({})", self.line, self.issue, self.content)
    }
}

impl From<LineDiagnostic> for Diagnostic {
    fn from(d: LineDiagnostic) -> Self {
        Diagnostic::new(Some(d.line), format!("{} ({})", d.issue, d.content))
    }
}

/// Result of parsing a text document.
#[derive(Debug, Clone, Default)]
pub struct TextLoad {
    pub store: RecordStore,
    pub diagnostics: Vec<LineDiagnostic>,
}

/// Parses a text document into a fresh store.
///
/// Blank lines are ignored.
pub fn parse_text(input: &str) -> TextLoad {
    let mut parser = LineParser::default();
    for (index, raw) in input.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if let Err(issue) = parser.parse_line(line) {
            let diagnostic = LineDiagnostic {
                line: index + 1,
                content: line.to_string(),
                issue,
            };
            warn!(line = diagnostic.line, "{}", diagnostic.issue);
            parser.diagnostics.push(diagnostic);
        }
    }
    debug!(
        categories = parser.store.counts().categories,
        concepts = parser.store.counts().concepts,
        components = parser.store.counts().components,
        skipped = parser.diagnostics.len(),
        "parsed text document"
    );
    TextLoad {
        store: parser.store,
        diagnostics: parser.diagnostics,
    }
}

/// Reads and parses a text file.
///
/// # Errors
///
/// Returns [`DbError::IoError`](crate::DbError::IoError) if the file cannot
/// be read. Malformed lines are reported in [`TextLoad::diagnostics`].
pub fn read_text_file(path: impl AsRef<Path>) -> Result<TextLoad> {
    let input = std::fs::read_to_string(path)?;
    Ok(parse_text(&input))
}

/// Renders a store in the text format.
///
/// Categories come first, then each concept followed by its components.
///
/// A topic containing a comma is written as is and does not load back
/// intact: the text after the comma shifts into the next field, so the
/// record is altered or rejected on the next parse along with the records
/// under it. Each such topic is logged at `warn` level, and
/// [`comma_topics`] lists them up front.
pub fn render_text(store: &RecordStore) -> String {
    for (kind, topic) in comma_topics(store) {
        warn!(%kind, topic = %topic, "topic contains ',' and will not load back");
    }
    let mut out = String::new();
    for category in store.categories() {
        let _ = writeln!(out, "{CATEGORY_PREFIX}: {},{}", category.id, category.topic);
    }
    for concept in store.concepts() {
        let category = store
            .find_category(concept.category)
            .map_or("", |c| c.topic.as_str());
        let _ = writeln!(
            out,
            "{CONCEPT_PREFIX}: {},{},{},{}",
            concept.id, concept.topic, category, concept.details
        );
        for component in store.components_by_concept(concept.id) {
            let _ = writeln!(
                out,
                "{COMPONENT_PREFIX}: {},{}",
                component.topic, component.details
            );
        }
    }
    out
}

/// Topics that the text format cannot represent.
pub fn comma_topics(store: &RecordStore) -> Vec<(EntityKind, String)> {
    let categories = store
        .categories()
        .iter()
        .map(|c| (EntityKind::Category, &c.topic));
    let concepts = store
        .concepts()
        .iter()
        .map(|c| (EntityKind::Concept, &c.topic));
    let components = store
        .components()
        .map(|c| (EntityKind::Component, &c.topic));
    categories
        .chain(concepts)
        .chain(components)
        .filter(|(_, topic)| topic.contains(','))
        .map(|(kind, topic)| (kind, topic.clone()))
        .collect()
}

#[derive(Default)]
struct LineParser {
    store: RecordStore,
    diagnostics: Vec<LineDiagnostic>,
    current_concept: Option<ConceptId>,
}

impl LineParser {
    fn parse_line(&mut self, line: &str) -> std::result::Result<(), LineIssue> {
        let (kind, body) = line.split_once(':').ok_or(LineIssue::MissingPrefix)?;
        match kind.trim() {
            CATEGORY_PREFIX => self.category(body),
            CONCEPT_PREFIX => {
                // A rejected concept line must not collect the components that follow it.
                self.current_concept = None;
                let id = self.concept(body)?;
                self.current_concept = Some(id);
                Ok(())
            }
            COMPONENT_PREFIX => self.component(body),
            other => Err(LineIssue::UnknownRecordType(other.to_string())),
        }
    }

    fn category(&mut self, body: &str) -> std::result::Result<(), LineIssue> {
        let [id, topic] = fields::<2>(EntityKind::Category, body)?;
        let id = parse_id(id)?;
        self.store
            .add_category(id, topic)
            .map(|_| ())
            .map_err(LineIssue::Rejected)
    }

    fn concept(&mut self, body: &str) -> std::result::Result<ConceptId, LineIssue> {
        let [id, topic, category, details] = fields::<4>(EntityKind::Concept, body)?;
        let id = parse_id(id)?;
        let concept = NewConcept::new(topic, CategoryKey::topic(category), details).with_id(id);
        self.store.add_concept(concept).map_err(|err| match err {
            StoreError::UnknownCategory(_) => LineIssue::UnknownCategory(category.to_string()),
            other => LineIssue::Rejected(other),
        })
    }

    fn component(&mut self, body: &str) -> std::result::Result<(), LineIssue> {
        let [topic, details] = fields::<2>(EntityKind::Component, body)?;
        let concept = self.current_concept.ok_or(LineIssue::NoOwningConcept)?;
        self.store
            .add_component(ComponentTarget::Concept(concept), topic, details)
            .map(|_| ())
            .map_err(LineIssue::Rejected)
    }
}

/// Splits `body` into exactly `N` trimmed fields; the last takes the rest.
fn fields<const N: usize>(
    kind: EntityKind,
    body: &str,
) -> std::result::Result<[&str; N], LineIssue> {
    let mut parts = [""; N];
    let mut found = 0;
    for (slot, part) in parts.iter_mut().zip(body.trim().splitn(N, ',')) {
        *slot = part.trim();
        found += 1;
    }
    if found < N {
        return Err(LineIssue::TooFewFields {
            kind,
            expected: N,
            found,
        });
    }
    Ok(parts)
}

fn parse_id(value: &str) -> std::result::Result<i64, LineIssue> {
    value
        .parse::<i64>()
        .map_err(|_| LineIssue::InvalidId(value.to_string()))
}
