//! Integration tests for the concept-breakdown-core crate.

use std::collections::HashSet;

use concept_breakdown_core::{
    CategoryCommand, CategoryId, CategoryKey, Command, ComponentCommand, ComponentKey,
    ComponentTarget, ConceptCommand, ConceptId, DIAGRAM_TYPES, DiagramCatalog, Loaded, NewConcept,
    PersistError, Persistence, RecordStore, Session, SessionError, SessionState, StoreError,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Keeps the last saved store, optionally failing every save.
#[derive(Default)]
struct MemoryBackend {
    saved: Option<RecordStore>,
    fail: bool,
}

impl Persistence for MemoryBackend {
    fn describe(&self) -> String {
        "memory".to_string()
    }

    fn exists(&self) -> bool {
        self.saved.is_some()
    }

    fn load(&mut self) -> Result<Loaded, PersistError> {
        Ok(Loaded::clean(self.saved.clone().unwrap_or_default()))
    }

    fn save_all(&mut self, store: &RecordStore) -> Result<(), PersistError> {
        if self.fail {
            return Err(PersistError::Io(std::io::Error::other("disk full")));
        }
        self.saved = Some(store.clone());
        Ok(())
    }
}

fn design_store() -> RecordStore {
    let mut store = RecordStore::new();
    store.add_category(1, "Design").unwrap();
    store
        .add_concept(
            NewConcept::new("Wireframing", CategoryKey::topic("Design"), "Basics of wireframing")
                .with_id(10),
        )
        .unwrap();
    store
        .add_component_to_last_concept("Sketching", "Paper-based low-fidelity drafts")
        .unwrap();
    store
}

fn session_over(store: RecordStore) -> Session<MemoryBackend> {
    let backend = MemoryBackend {
        saved: Some(store),
        fail: false,
    };
    let mut session = Session::new(backend, DiagramCatalog::standard());
    session.load_on_startup().unwrap();
    session
}

#[test]
fn test_end_to_end_cascade() {
    let mut session = session_over(design_store());
    let store = session.store().unwrap();
    let concept = store.find_concept(ConceptId(10)).unwrap();
    assert_eq!(concept.topic, "Wireframing");
    assert_eq!(concept.category, CategoryId(1));
    let components = store.components_by_concept(ConceptId(10));
    assert_eq!(components.len(), 1);
    assert_eq!(components[0].details, "Paper-based low-fidelity drafts");

    session
        .apply(CategoryCommand::Delete { id: CategoryId(1) }.into())
        .unwrap();
    let saved = session.backend().saved.as_ref().unwrap();
    assert_eq!(saved.counts().categories, 0);
    assert_eq!(saved.counts().concepts, 0);
    assert_eq!(saved.counts().components, 0);
}

#[test]
fn test_concept_needs_existing_category() {
    let mut session = session_over(RecordStore::new());
    let concept = NewConcept::new("Personas", CategoryKey::topic("Research"), "");
    let err = session.apply(ConceptCommand::Add(concept).into()).unwrap_err();
    assert!(matches!(err, SessionError::Store(StoreError::UnknownCategory(_))));
    assert!(session.backend().saved.as_ref().unwrap().is_empty());
}

#[test]
fn test_not_found_updates_and_deletes_change_nothing() {
    let mut session = session_over(design_store());
    let before = session.store().unwrap().clone();

    let commands: [Command; 6] = [
        CategoryCommand::Update { id: CategoryId(9), topic: "X".into() }.into(),
        CategoryCommand::Delete { id: CategoryId(9) }.into(),
        ConceptCommand::Update { id: ConceptId(9), topic: "X".into(), details: "Y".into() }.into(),
        ConceptCommand::Delete { id: ConceptId(9) }.into(),
        ComponentCommand::Update {
            key: ComponentKey::topic("Missing"),
            topic: "X".into(),
            details: "Y".into(),
        }
        .into(),
        ComponentCommand::Delete { key: ComponentKey::topic_in(ConceptId(10), "Missing") }.into(),
    ];
    for command in commands {
        match session.apply(command) {
            Err(SessionError::Store(err)) => assert!(err.is_not_found(), "{err}"),
            other => panic!("expected not found, got {other:?}"),
        }
    }
    assert_eq!(session.store().unwrap(), &before);
}

#[test]
fn test_failed_save_discards_change() {
    let mut session = session_over(design_store());
    let before = session.store().unwrap().clone();
    let failing = MemoryBackend {
        saved: Some(before.clone()),
        fail: true,
    };
    let mut session_failing = Session::new(failing, DiagramCatalog::standard());
    session_failing.load_on_startup().unwrap();

    let err = session_failing
        .apply(
            ComponentCommand::Add {
                target: ComponentTarget::Concept(ConceptId(10)),
                topic: "Annotations".into(),
                details: "Margin notes".into(),
            }
            .into(),
        )
        .unwrap_err();
    assert!(matches!(err, SessionError::Persist(_)));
    assert_eq!(session_failing.store().unwrap(), &before);

    // The healthy session is unaffected.
    session
        .apply(CategoryCommand::Add { id: CategoryId(2), topic: "Research".into() }.into())
        .unwrap();
    assert_eq!(session.store().unwrap().counts().categories, 2);
}

#[test]
fn test_missing_source_blocks_startup() {
    let mut session = Session::new(MemoryBackend::default(), DiagramCatalog::standard());
    assert!(matches!(
        session.load_on_startup(),
        Err(SessionError::SourceMissing(_))
    ));
    assert_eq!(session.state(), SessionState::Unloaded);
    assert!(matches!(
        session.apply(CategoryCommand::Add { id: CategoryId(1), topic: "Design".into() }.into()),
        Err(SessionError::NotLoaded)
    ));
}

#[test]
fn test_recommendations_cover_catalog() {
    let session = session_over(RecordStore::new());
    let mut rng = StdRng::seed_from_u64(42);
    let mut seen = HashSet::new();
    for _ in 0..10_000 {
        let name = session.recommend_diagram_with(&mut rng).unwrap();
        assert!(DIAGRAM_TYPES.contains(&name));
        seen.insert(name.to_string());
    }
    assert!(seen.len() > 1);
}
