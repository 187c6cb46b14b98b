//! Integration tests for the concept-breakdown-sqlite crate.

use concept_breakdown_core::{
    CategoryCommand, CategoryId, ComponentCommand, ComponentTarget, ConceptCommand, ConceptId,
    DiagramCatalog, NewConcept, Persistence, RecordStore, Session,
};
use concept_breakdown_sqlite::{Migration, RecordQuery, SqliteBackend};
use rusqlite::Connection;

/// Builds the store from the example data file, plus a second category.
fn sample_store() -> RecordStore {
    let mut store = RecordStore::new();
    store.add_category(1, "Design").unwrap();
    store.add_category(2, "Research").unwrap();
    store
        .add_concept(
            NewConcept::new("Wireframing", CategoryId(1), "Basics of wireframing").with_id(10),
        )
        .unwrap();
    store
        .add_component_to_last_concept("Sketching", "Paper-based low-fidelity drafts")
        .unwrap();
    store
        .add_concept(
            NewConcept::new("Interviews", CategoryId(2), "Talking to users, in depth").with_id(20),
        )
        .unwrap();
    store.add_component_to_last_concept("Scripts", "Question lists").unwrap();
    store
        .add_component_to_concept(ConceptId(10), "Annotations", "Margin notes")
        .unwrap();
    store
}

fn row_count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
        .unwrap()
}

// ---------------------------------------------------------------------------
// Round trip through a database file
// ---------------------------------------------------------------------------

#[test]
fn test_save_all_then_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("study.db");
    let store = sample_store();

    let mut backend = SqliteBackend::open(&path, "cbt_").unwrap();
    backend.save_all(&store).unwrap();
    drop(backend);

    let mut reopened = SqliteBackend::open(&path, "cbt_").unwrap();
    assert!(reopened.exists());
    assert_eq!(reopened.load().unwrap().store, store);
}

#[test]
fn test_session_changes_reach_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("study.db");
    SqliteBackend::open(&path, "cbt_")
        .unwrap()
        .save_all(&RecordStore::new())
        .unwrap();

    let mut session = Session::new(
        SqliteBackend::open(&path, "cbt_").unwrap(),
        DiagramCatalog::standard(),
    );
    session.load_on_startup().unwrap();
    session
        .apply(CategoryCommand::Add { id: CategoryId(1), topic: "Design".into() }.into())
        .unwrap();
    session
        .apply(ConceptCommand::Add(NewConcept::new("Wireframing", CategoryId(1), "Basics")).into())
        .unwrap();
    session
        .apply(
            ComponentCommand::Add {
                target: ComponentTarget::LastConcept,
                topic: "Sketching".into(),
                details: "Drafts".into(),
            }
            .into(),
        )
        .unwrap();

    let conn = Connection::open(&path).unwrap();
    assert_eq!(row_count(&conn, "cbt_categories"), 1);
    assert_eq!(row_count(&conn, "cbt_concepts"), 1);
    assert_eq!(row_count(&conn, "cbt_components"), 1);

    session
        .apply(CategoryCommand::Delete { id: CategoryId(1) }.into())
        .unwrap();
    assert_eq!(row_count(&conn, "cbt_categories"), 0);
    assert_eq!(row_count(&conn, "cbt_concepts"), 0);
    // No orphaned component rows are left behind.
    assert_eq!(row_count(&conn, "cbt_components"), 0);
}

#[test]
fn test_missing_database_is_not_created_by_startup() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.db");
    let mut session = Session::new(
        SqliteBackend::open(&path, "cbt_").unwrap(),
        DiagramCatalog::standard(),
    );
    assert!(session.load_on_startup().is_err());
    assert!(!path.exists());
}

// ---------------------------------------------------------------------------
// Prefix isolation
// ---------------------------------------------------------------------------

#[test]
fn test_two_prefixes_share_one_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shared.db");

    let mut study = SqliteBackend::open(&path, "study_").unwrap();
    study.save_all(&sample_store()).unwrap();

    let mut scratch = SqliteBackend::open(&path, "scratch_").unwrap();
    assert!(scratch.load().unwrap().store.is_empty());
    assert_eq!(study.load().unwrap().store.counts().components, 3);

    let conn = Connection::open(&path).unwrap();
    let status = Migration::new(&conn, "study_").unwrap().status().unwrap();
    assert_eq!(status.category_count, 2);
    assert_eq!(status.concept_count, 2);
    assert_eq!(status.component_count, 3);
}

// ---------------------------------------------------------------------------
// Relationship queries
// ---------------------------------------------------------------------------

#[test]
fn test_relationship_getters() {
    let conn = Connection::open_in_memory().unwrap();
    Migration::new(&conn, "cbt_").unwrap().up().unwrap();
    let query = RecordQuery::new(&conn, "cbt_").unwrap();
    query.replace_all(&sample_store()).unwrap();

    let design = query.get_concepts_by_category(CategoryId(1)).unwrap();
    assert_eq!(design.len(), 1);
    assert_eq!(design[0].topic, "Wireframing");

    let topics: Vec<String> = query
        .get_components_by_concept(ConceptId(10))
        .unwrap()
        .into_iter()
        .map(|c| c.topic)
        .collect();
    assert_eq!(topics, vec!["Sketching", "Annotations"]);

    let interviews = query.get_concept(ConceptId(20)).unwrap().unwrap();
    assert_eq!(interviews.details, "Talking to users, in depth");
}

#[test]
fn test_down_then_load_recreates_tables() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("study.db");
    SqliteBackend::open(&path, "cbt_")
        .unwrap()
        .save_all(&sample_store())
        .unwrap();

    let conn = Connection::open(&path).unwrap();
    Migration::new(&conn, "cbt_").unwrap().down().unwrap();
    drop(conn);

    let mut backend = SqliteBackend::open(&path, "cbt_").unwrap();
    assert!(backend.load().unwrap().store.is_empty());
}
