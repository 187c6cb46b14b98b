//! Conversion between SQLite rows and record types.
//!
//! Row readers expect the column order of the `SELECT` lists below.
//! [`build_store`] feeds loaded rows back through the store's add
//! operations, so a database edited by hand into an inconsistent state is
//! reported instead of loaded.

use concept_breakdown_core::{
    Category, CategoryId, Component, ComponentId, Concept, ConceptId, NewConcept, RecordStore,
};
use rusqlite::Row;

use crate::error::{Result, SqliteError};

pub(crate) const CATEGORY_COLUMNS: &str = "id, topic";
pub(crate) const CONCEPT_COLUMNS: &str = "id, topic, category_id, details";
pub(crate) const COMPONENT_COLUMNS: &str = "id, topic, details, concept_id";

pub(crate) fn category_from_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: CategoryId(row.get(0)?),
        topic: row.get(1)?,
    })
}

/// Reads a concept without its component list.
pub(crate) fn concept_from_row(row: &Row<'_>) -> rusqlite::Result<Concept> {
    Ok(Concept {
        id: ConceptId(row.get(0)?),
        topic: row.get(1)?,
        category: CategoryId(row.get(2)?),
        details: row.get(3)?,
        components: Vec::new(),
    })
}

pub(crate) fn component_from_row(row: &Row<'_>) -> rusqlite::Result<Component> {
    Ok(Component {
        id: ComponentId(row.get(0)?),
        topic: row.get(1)?,
        details: row.get(2)?,
        concept: ConceptId(row.get(3)?),
    })
}

/// Rebuilds a store from loaded rows.
///
/// `components` must be ordered by concept and position so each concept's
/// list comes out in attachment order.
pub(crate) fn build_store(
    categories: Vec<Category>,
    concepts: Vec<Concept>,
    components: Vec<Component>,
) -> Result<RecordStore> {
    let mut store = RecordStore::new();
    for category in categories {
        store
            .add_category(category.id, category.topic)
            .map_err(|e| SqliteError::ConversionError(e.to_string()))?;
    }
    for concept in concepts {
        let id = concept.id;
        store
            .add_concept(
                NewConcept::new(concept.topic, concept.category, concept.details).with_id(id),
            )
            .map_err(|e| SqliteError::ConversionError(format!("concept {id}: {e}")))?;
    }
    for component in components {
        let id = component.id;
        store
            .restore_component(component)
            .map_err(|e| SqliteError::ConversionError(format!("component {id}: {e}")))?;
    }
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_store_keeps_component_order() {
        let store = build_store(
            vec![Category::new(1, "Design")],
            vec![Concept {
                id: ConceptId(10),
                topic: "Wireframing".into(),
                category: CategoryId(1),
                details: String::new(),
                components: Vec::new(),
            }],
            vec![
                Component {
                    id: ComponentId(7),
                    topic: "Second id, first position".into(),
                    details: String::new(),
                    concept: ConceptId(10),
                },
                Component {
                    id: ComponentId(3),
                    topic: "Later".into(),
                    details: String::new(),
                    concept: ConceptId(10),
                },
            ],
        )
        .unwrap();

        let concept = store.find_concept(ConceptId(10)).unwrap();
        assert_eq!(concept.components, vec![ComponentId(7), ComponentId(3)]);
    }

    #[test]
    fn test_build_store_rejects_orphan_component() {
        let err = build_store(
            Vec::new(),
            Vec::new(),
            vec![Component {
                id: ComponentId(1),
                topic: "Orphan".into(),
                details: String::new(),
                concept: ConceptId(5),
            }],
        )
        .unwrap_err();
        assert!(matches!(err, SqliteError::ConversionError(msg) if msg.contains("component 1")));
    }
}
