//! JSON snapshot format.
//!
//! A snapshot holds the three record collections plus a format version and
//! the time it was written. Loading rebuilds the store through the normal
//! add operations, so a hand-edited snapshot that breaks an invariant (a
//! concept under a missing category, a duplicate topic) is refused instead
//! of producing an inconsistent store.
//!
//! ```json
//! {
//!   "format_version": "1",
//!   "saved_at": "2026-10-14T09:30:00+00:00",
//!   "categories": [{ "id": 1, "topic": "Design" }],
//!   "concepts": [{ "id": 10, "topic": "Wireframing", "category": 1, "details": "", "components": [1] }],
//!   "components": [{ "id": 1, "topic": "Sketching", "details": "", "concept": 10 }]
//! }
//! ```

use std::path::Path;

use chrono::Utc;
use concept_breakdown_core::{Category, Component, Concept, NewConcept, RecordStore};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DbError, Result};

/// Snapshot layout version written by [`to_snapshot`].
pub const FORMAT_VERSION: &str = "1";

/// Serialized form of a [`RecordStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub format_version: String,
    /// RFC 3339 timestamp of when the snapshot was taken.
    pub saved_at: String,
    pub categories: Vec<Category>,
    pub concepts: Vec<Concept>,
    /// Components grouped by concept, each group in attachment order.
    pub components: Vec<Component>,
}

/// Captures the current contents of `store`.
pub fn to_snapshot(store: &RecordStore) -> Snapshot {
    let components = store
        .concepts()
        .iter()
        .flat_map(|concept| store.components_by_concept(concept.id))
        .cloned()
        .collect();
    Snapshot {
        format_version: FORMAT_VERSION.to_string(),
        saved_at: Utc::now().to_rfc3339(),
        categories: store.categories().to_vec(),
        concepts: store.concepts().to_vec(),
        components,
    }
}

/// Rebuilds a store from a snapshot.
///
/// Each concept's `components` list is recomputed from the order of the
/// `components` array.
///
/// # Errors
///
/// Returns [`DbError::InvalidSnapshot`] for an unsupported version or any
/// record the store refuses.
pub fn from_snapshot(snapshot: Snapshot) -> Result<RecordStore> {
    if snapshot.format_version != FORMAT_VERSION {
        return Err(DbError::InvalidSnapshot(format!(
            "unsupported format version '{}'",
            snapshot.format_version
        )));
    }

    let mut store = RecordStore::new();
    for category in snapshot.categories {
        store
            .add_category(category.id, category.topic)
            .map_err(|err| DbError::InvalidSnapshot(err.to_string()))?;
    }
    for concept in snapshot.concepts {
        let new =
            NewConcept::new(concept.topic, concept.category, concept.details).with_id(concept.id);
        store
            .add_concept(new)
            .map_err(|err| DbError::InvalidSnapshot(format!("concept {}: {err}", concept.id)))?;
    }
    for component in snapshot.components {
        let id = component.id;
        store
            .restore_component(component)
            .map_err(|err| DbError::InvalidSnapshot(format!("component {id}: {err}")))?;
    }
    Ok(store)
}

/// Serializes `store` as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`DbError::JsonError`] if serialization fails.
pub fn render_json(store: &RecordStore) -> Result<String> {
    Ok(serde_json::to_string_pretty(&to_snapshot(store))?)
}

/// Parses a JSON snapshot. Empty or whitespace-only input is an empty store.
///
/// # Errors
///
/// Returns [`DbError::JsonError`] for malformed JSON, or
/// [`DbError::InvalidSnapshot`] as described in [`from_snapshot`].
pub fn parse_json(input: &str) -> Result<RecordStore> {
    if input.trim().is_empty() {
        debug!("empty snapshot, starting with an empty store");
        return Ok(RecordStore::new());
    }
    let snapshot: Snapshot = serde_json::from_str(input)?;
    from_snapshot(snapshot)
}

/// Reads and parses a JSON snapshot file.
///
/// # Errors
///
/// Returns [`DbError::IoError`] if the file cannot be read, otherwise as
/// [`parse_json`].
pub fn read_json_file(path: impl AsRef<Path>) -> Result<RecordStore> {
    let input = std::fs::read_to_string(path)?;
    parse_json(&input)
}
