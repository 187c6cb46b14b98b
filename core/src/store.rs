//! In-memory record store.
//!
//! [`RecordStore`] holds categories and concepts in insertion order and all
//! components in a single arena keyed by [`ComponentId`]. Concepts refer to
//! their components by id, so each component exists exactly once.
//!
//! Lookups are linear scans; the collections are small and insertion order
//! is the only ordering ever exposed.
//!
//! # Example
//!
//! ```
//! use concept_breakdown_core::{CategoryKey, NewConcept, RecordStore};
//!
//! let mut store = RecordStore::new();
//! let design = store.add_category(1, "Design").unwrap();
//! let concept = store
//!     .add_concept(
//!         NewConcept::new("Wireframing", CategoryKey::topic("Design"), "Basics").with_id(10),
//!     )
//!     .unwrap();
//! store
//!     .add_component_to_last_concept("Sketching", "Paper-based drafts")
//!     .unwrap();
//!
//! assert_eq!(store.components_by_concept(concept).len(), 1);
//!
//! // Deleting the category cascades to its concepts and their components.
//! store.delete_category(design).unwrap();
//! assert!(store.is_empty());
//! ```

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{Result, StoreError};
use crate::types::{
    Category, CategoryId, CategoryKey, Component, ComponentId, ComponentKey, ComponentTarget,
    Concept, ConceptId, EntityKind, NewConcept,
};

/// Record counts per collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreCounts {
    pub categories: usize,
    pub concepts: usize,
    pub components: usize,
}

/// What [`RecordStore::delete_category`] removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRemoval {
    pub category: Category,
    pub concepts: Vec<ConceptId>,
    pub components: Vec<ComponentId>,
}

/// What [`RecordStore::delete_concept`] removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConceptRemoval {
    pub concept: Concept,
    pub components: Vec<ComponentId>,
}

/// Categories, concepts, and components with their CRUD operations.
///
/// Every failing operation returns a [`StoreError`] and leaves the store
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordStore {
    categories: Vec<Category>,
    concepts: Vec<Concept>,
    components: BTreeMap<ComponentId, Component>,
    /// Highest component id allocated or restored so far.
    last_component_id: i64,
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore {
    pub fn new() -> Self {
        Self {
            categories: Vec::new(),
            concepts: Vec::new(),
            components: BTreeMap::new(),
            last_component_id: 0,
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// All categories in insertion order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// All concepts in insertion order.
    pub fn concepts(&self) -> &[Concept] {
        &self.concepts
    }

    /// All components in allocation order.
    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.components.values()
    }

    pub fn counts(&self) -> StoreCounts {
        StoreCounts {
            categories: self.categories.len(),
            concepts: self.concepts.len(),
            components: self.components.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.concepts.is_empty() && self.components.is_empty()
    }

    pub fn find_category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn find_category_by_topic(&self, topic: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.topic == topic)
    }

    /// Looks up a category by id or topic.
    pub fn resolve_category(&self, key: &CategoryKey) -> Option<&Category> {
        match key {
            CategoryKey::Id(id) => self.find_category(*id),
            CategoryKey::Topic(topic) => self.find_category_by_topic(topic),
        }
    }

    pub fn find_concept(&self, id: ConceptId) -> Option<&Concept> {
        self.concepts.iter().find(|c| c.id == id)
    }

    pub fn find_component(&self, id: ComponentId) -> Option<&Component> {
        self.components.get(&id)
    }

    /// First component (in allocation order) with the given topic.
    pub fn find_component_by_topic(&self, topic: &str) -> Option<&Component> {
        self.components.values().find(|c| c.topic == topic)
    }

    /// The most recently added concept.
    pub fn last_concept(&self) -> Option<&Concept> {
        self.concepts.last()
    }

    /// Concepts belonging to a category, in insertion order.
    ///
    /// Returns an empty list if the category does not exist.
    pub fn concepts_by_category(&self, key: &CategoryKey) -> Vec<&Concept> {
        let Some(category) = self.resolve_category(key) else {
            return Vec::new();
        };
        self.concepts
            .iter()
            .filter(|c| c.category == category.id)
            .collect()
    }

    /// Components owned by a concept, in attachment order.
    ///
    /// Returns an empty list if the concept does not exist.
    pub fn components_by_concept(&self, id: ConceptId) -> Vec<&Component> {
        self.find_concept(id)
            .map(|concept| {
                concept
                    .components
                    .iter()
                    .filter_map(|cid| self.components.get(cid))
                    .collect()
            })
            .unwrap_or_default()
    }

    // ------------------------------------------------------------------
    // Add
    // ------------------------------------------------------------------

    /// Appends a category.
    ///
    /// # Errors
    ///
    /// [`StoreError::DuplicateCategoryTopic`] if the topic is taken,
    /// [`StoreError::DuplicateId`] if the id is taken.
    pub fn add_category(
        &mut self,
        id: impl Into<CategoryId>,
        topic: impl Into<String>,
    ) -> Result<CategoryId> {
        let id = id.into();
        let topic = topic.into();
        if self.find_category_by_topic(&topic).is_some() {
            warn!(topic = %topic, "rejected category with duplicate topic");
            return Err(StoreError::DuplicateCategoryTopic(topic));
        }
        if self.find_category(id).is_some() {
            warn!(%id, "rejected category with duplicate id");
            return Err(StoreError::DuplicateId {
                kind: EntityKind::Category,
                id: id.get(),
            });
        }
        debug!(%id, topic = %topic, "category added");
        self.categories.push(Category { id, topic });
        Ok(id)
    }

    /// Appends a concept under an existing category.
    ///
    /// When `concept.id` is `None`, the next free id (one past the current
    /// maximum) is allocated and returned.
    ///
    /// # Errors
    ///
    /// [`StoreError::UnknownCategory`] if the category does not exist,
    /// [`StoreError::DuplicateId`] if an explicit id is taken, and
    /// [`StoreError::IdSpaceExhausted`] if no id is left after the maximum.
    pub fn add_concept(&mut self, concept: NewConcept) -> Result<ConceptId> {
        let Some(category) = self.resolve_category(&concept.category) else {
            warn!(
                category = %concept.category,
                topic = %concept.topic,
                "rejected concept for unknown category"
            );
            return Err(StoreError::UnknownCategory(concept.category.to_string()));
        };
        let category = category.id;

        let id = match concept.id {
            Some(id) if self.find_concept(id).is_some() => {
                warn!(%id, "rejected concept with duplicate id");
                return Err(StoreError::DuplicateId {
                    kind: EntityKind::Concept,
                    id: id.get(),
                });
            }
            Some(id) => id,
            None => self.next_concept_id()?,
        };

        debug!(%id, topic = %concept.topic, %category, "concept added");
        self.concepts.push(Concept {
            id,
            topic: concept.topic,
            category,
            details: concept.details,
            components: Vec::new(),
        });
        Ok(id)
    }

    /// Attaches a new component to a concept.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] for a missing explicit concept,
    /// [`StoreError::NoConcept`] for [`ComponentTarget::LastConcept`] on a
    /// store without concepts, [`StoreError::IdSpaceExhausted`] once the
    /// highest component id is `i64::MAX`.
    pub fn add_component(
        &mut self,
        target: ComponentTarget,
        topic: impl Into<String>,
        details: impl Into<String>,
    ) -> Result<ComponentId> {
        let index = match target {
            ComponentTarget::Concept(id) => self
                .concepts
                .iter()
                .position(|c| c.id == id)
                .ok_or_else(|| {
                    warn!(concept = %id, "cannot attach component, concept not found");
                    StoreError::not_found(EntityKind::Concept, id)
                })?,
            ComponentTarget::LastConcept => match self.concepts.len() {
                0 => {
                    warn!("cannot attach component, no concept exists");
                    return Err(StoreError::NoConcept);
                }
                n => n - 1,
            },
        };

        let id = self
            .last_component_id
            .checked_add(1)
            .map(ComponentId)
            .ok_or_else(|| exhausted(EntityKind::Component))?;
        self.last_component_id = id.get();

        let concept = &mut self.concepts[index];
        concept.components.push(id);
        let component = Component {
            id,
            topic: topic.into(),
            details: details.into(),
            concept: concept.id,
        };
        debug!(%id, topic = %component.topic, concept = %component.concept, "component added");
        self.components.insert(id, component);
        Ok(id)
    }

    pub fn add_component_to_concept(
        &mut self,
        concept: ConceptId,
        topic: impl Into<String>,
        details: impl Into<String>,
    ) -> Result<ComponentId> {
        self.add_component(ComponentTarget::Concept(concept), topic, details)
    }

    pub fn add_component_to_last_concept(
        &mut self,
        topic: impl Into<String>,
        details: impl Into<String>,
    ) -> Result<ComponentId> {
        self.add_component(ComponentTarget::LastConcept, topic, details)
    }

    /// Re-inserts a component that already has a persisted id.
    ///
    /// Used by backends that store component ids (JSON snapshots, SQLite).
    /// The component is appended to its concept's list, and later
    /// allocations continue past the highest id seen.
    pub fn restore_component(&mut self, component: Component) -> Result<ComponentId> {
        if self.components.contains_key(&component.id) {
            warn!(id = %component.id, "rejected component with duplicate id");
            return Err(StoreError::DuplicateId {
                kind: EntityKind::Component,
                id: component.id.get(),
            });
        }
        let concept = self
            .concepts
            .iter_mut()
            .find(|c| c.id == component.concept)
            .ok_or_else(|| missing(EntityKind::Concept, component.concept))?;
        concept.components.push(component.id);

        let id = component.id;
        self.last_component_id = self.last_component_id.max(id.get());
        self.components.insert(id, component);
        Ok(id)
    }

    // ------------------------------------------------------------------
    // Update
    // ------------------------------------------------------------------

    /// Renames a category.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] if no category has this id,
    /// [`StoreError::DuplicateCategoryTopic`] if another category already
    /// uses `new_topic`.
    pub fn update_category(&mut self, id: CategoryId, new_topic: impl Into<String>) -> Result<()> {
        let new_topic = new_topic.into();
        if self
            .categories
            .iter()
            .any(|c| c.topic == new_topic && c.id != id)
        {
            warn!(%id, topic = %new_topic, "rejected rename to duplicate topic");
            return Err(StoreError::DuplicateCategoryTopic(new_topic));
        }
        let category = self
            .categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| missing(EntityKind::Category, id))?;
        category.topic = new_topic;
        Ok(())
    }

    /// Rewrites a concept's topic and details.
    pub fn update_concept(
        &mut self,
        id: ConceptId,
        new_topic: impl Into<String>,
        new_details: impl Into<String>,
    ) -> Result<()> {
        let concept = self
            .concepts
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| missing(EntityKind::Concept, id))?;
        concept.topic = new_topic.into();
        concept.details = new_details.into();
        Ok(())
    }

    /// Rewrites the first component matching `key`.
    pub fn update_component(
        &mut self,
        key: &ComponentKey,
        new_topic: impl Into<String>,
        new_details: impl Into<String>,
    ) -> Result<ComponentId> {
        let component = self
            .components
            .values_mut()
            .find(|c| key.matches(c))
            .ok_or_else(|| missing(EntityKind::Component, key))?;
        component.topic = new_topic.into();
        component.details = new_details.into();
        Ok(component.id)
    }

    // ------------------------------------------------------------------
    // Delete
    // ------------------------------------------------------------------

    /// Removes a category, its concepts, and their components.
    pub fn delete_category(&mut self, id: CategoryId) -> Result<CategoryRemoval> {
        let index = self
            .categories
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| missing(EntityKind::Category, id))?;
        let category = self.categories.remove(index);

        let mut concepts = Vec::new();
        let mut components = Vec::new();
        self.concepts.retain(|concept| {
            if concept.category != id {
                return true;
            }
            concepts.push(concept.id);
            components.extend(concept.components.iter().copied());
            false
        });
        for cid in &components {
            self.components.remove(cid);
        }

        debug!(
            %id,
            concepts = concepts.len(),
            components = components.len(),
            "category deleted with cascade"
        );
        Ok(CategoryRemoval {
            category,
            concepts,
            components,
        })
    }

    /// Removes a concept and its components.
    pub fn delete_concept(&mut self, id: ConceptId) -> Result<ConceptRemoval> {
        let index = self
            .concepts
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| missing(EntityKind::Concept, id))?;
        let concept = self.concepts.remove(index);
        for cid in &concept.components {
            self.components.remove(cid);
        }
        debug!(%id, components = concept.components.len(), "concept deleted");
        Ok(ConceptRemoval {
            components: concept.components.clone(),
            concept,
        })
    }

    /// Removes every component matching `key`.
    ///
    /// An id key removes at most one component; a topic key removes all
    /// components with that topic (within the given concept, if any).
    pub fn delete_component(&mut self, key: &ComponentKey) -> Result<Vec<ComponentId>> {
        let removed: Vec<ComponentId> = self
            .components
            .values()
            .filter(|c| key.matches(c))
            .map(|c| c.id)
            .collect();
        if removed.is_empty() {
            return Err(missing(EntityKind::Component, key));
        }
        for id in &removed {
            self.components.remove(id);
        }
        for concept in &mut self.concepts {
            concept.components.retain(|cid| !removed.contains(cid));
        }
        debug!(count = removed.len(), "components deleted");
        Ok(removed)
    }

    fn next_concept_id(&self) -> Result<ConceptId> {
        let max = self.concepts.iter().map(|c| c.id.get()).max().unwrap_or(0);
        max.max(0)
            .checked_add(1)
            .map(ConceptId)
            .ok_or_else(|| exhausted(EntityKind::Concept))
    }
}

fn exhausted(kind: EntityKind) -> StoreError {
    warn!(%kind, "no id left to allocate");
    StoreError::IdSpaceExhausted(kind)
}

fn missing(kind: EntityKind, key: impl ToString) -> StoreError {
    let err = StoreError::not_found(kind, key);
    warn!("{err}");
    err
}

#[cfg(test)]
mod tests {
    use super::*;

    fn design_store() -> RecordStore {
        let mut store = RecordStore::new();
        store.add_category(1, "Design").unwrap();
        store
            .add_concept(
                NewConcept::new(
                    "Wireframing",
                    CategoryKey::topic("Design"),
                    "Basics of wireframing",
                )
                .with_id(10),
            )
            .unwrap();
        store
            .add_component_to_last_concept("Sketching", "Paper-based low-fidelity drafts")
            .unwrap();
        store
    }

    #[test]
    fn test_add_category_rejects_duplicate_topic() {
        let mut store = design_store();
        let before = store.clone();
        let err = store.add_category(2, "Design").unwrap_err();
        assert_eq!(err, StoreError::DuplicateCategoryTopic("Design".into()));
        assert_eq!(store, before);
    }

    #[test]
    fn test_add_category_rejects_duplicate_id() {
        let mut store = design_store();
        let err = store.add_category(1, "Research").unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId { kind: EntityKind::Category, id: 1 }));
        assert_eq!(store.counts().categories, 1);
    }

    #[test]
    fn test_add_concept_requires_existing_category() {
        let mut store = design_store();
        let before = store.clone();
        let err = store
            .add_concept(NewConcept::new("Personas", CategoryKey::topic("Research"), ""))
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownCategory(_)));
        assert_eq!(store, before);

        let err = store
            .add_concept(NewConcept::new("Personas", CategoryId(99), ""))
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownCategory(_)));
        assert_eq!(store, before);
    }

    #[test]
    fn test_add_concept_generates_ids() {
        let mut store = design_store();
        let a = store
            .add_concept(NewConcept::new("Prototyping", CategoryId(1), ""))
            .unwrap();
        let b = store
            .add_concept(NewConcept::new("Testing", CategoryId(1), ""))
            .unwrap();
        assert_eq!(a, ConceptId(11));
        assert_eq!(b, ConceptId(12));

        let mut empty = RecordStore::new();
        empty.add_category(1, "X").unwrap();
        let first = empty.add_concept(NewConcept::new("A", CategoryId(1), "")).unwrap();
        assert_eq!(first, ConceptId(1));
    }

    #[test]
    fn test_add_concept_rejects_duplicate_id() {
        let mut store = design_store();
        let err = store
            .add_concept(NewConcept::new("Other", CategoryId(1), "").with_id(10))
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId { kind: EntityKind::Concept, id: 10 }));
    }

    #[test]
    fn test_add_component_to_last_concept_without_concepts() {
        let mut store = RecordStore::new();
        assert_eq!(
            store.add_component_to_last_concept("A", "B").unwrap_err(),
            StoreError::NoConcept
        );
        assert!(store.is_empty());
    }

    #[test]
    fn test_add_component_to_explicit_concept() {
        let mut store = design_store();
        store
            .add_concept(NewConcept::new("Layout", CategoryId(1), "").with_id(20))
            .unwrap();
        let id = store
            .add_component_to_concept(ConceptId(10), "Annotations", "Notes on the sketch")
            .unwrap();
        let topics: Vec<_> = store
            .components_by_concept(ConceptId(10))
            .iter()
            .map(|c| c.topic.as_str())
            .collect();
        assert_eq!(topics, ["Sketching", "Annotations"]);
        assert_eq!(store.find_component(id).unwrap().concept, ConceptId(10));
        assert!(store.components_by_concept(ConceptId(20)).is_empty());

        let err = store
            .add_component_to_concept(ConceptId(99), "X", "Y")
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_update_category_renames_in_place() {
        let mut store = design_store();
        store.update_category(CategoryId(1), "UX Design").unwrap();
        assert_eq!(store.find_category(CategoryId(1)).unwrap().topic, "UX Design");
        // Concepts follow by id.
        assert_eq!(
            store.concepts_by_category(&CategoryKey::topic("UX Design")).len(),
            1
        );
        // Renaming to its own topic is allowed.
        store.update_category(CategoryId(1), "UX Design").unwrap();
    }

    #[test]
    fn test_update_category_rejects_taken_topic() {
        let mut store = design_store();
        store.add_category(2, "Research").unwrap();
        let before = store.clone();
        let err = store.update_category(CategoryId(2), "Design").unwrap_err();
        assert_eq!(err, StoreError::DuplicateCategoryTopic("Design".into()));
        assert_eq!(store, before);
    }

    #[test]
    fn test_update_component_by_scoped_topic() {
        let mut store = design_store();
        let id = store
            .update_component(
                &ComponentKey::topic_in(ConceptId(10), "Sketching"),
                "Sketches",
                "Updated",
            )
            .unwrap();
        let component = store.find_component(id).unwrap();
        assert_eq!(component.topic, "Sketches");
        assert_eq!(component.details, "Updated");
    }

    #[test]
    fn test_not_found_leaves_store_unchanged() {
        let mut store = design_store();
        let before = store.clone();

        assert!(store.update_category(CategoryId(9), "X").unwrap_err().is_not_found());
        assert!(store.update_concept(ConceptId(9), "X", "Y").unwrap_err().is_not_found());
        assert!(store
            .update_component(&ComponentKey::topic("Nope"), "X", "Y")
            .unwrap_err()
            .is_not_found());
        assert!(store.delete_category(CategoryId(9)).unwrap_err().is_not_found());
        assert!(store.delete_concept(ConceptId(9)).unwrap_err().is_not_found());
        assert!(store
            .delete_component(&ComponentKey::Id(ComponentId(42)))
            .unwrap_err()
            .is_not_found());
        assert!(store
            .delete_component(&ComponentKey::topic_in(ConceptId(9), "Sketching"))
            .unwrap_err()
            .is_not_found());

        assert_eq!(store, before);
    }

    #[test]
    fn test_delete_category_cascades() {
        let mut store = design_store();
        store.add_category(2, "Research").unwrap();
        store
            .add_concept(NewConcept::new("Interviews", CategoryId(2), "").with_id(30))
            .unwrap();
        store.add_component_to_last_concept("Scripts", "").unwrap();

        let removal = store.delete_category(CategoryId(1)).unwrap();
        assert_eq!(removal.category.topic, "Design");
        assert_eq!(removal.concepts, vec![ConceptId(10)]);
        assert_eq!(removal.components.len(), 1);

        assert_eq!(
            store.counts(),
            StoreCounts {
                categories: 1,
                concepts: 1,
                components: 1
            }
        );
        assert_eq!(store.find_component_by_topic("Scripts").unwrap().concept, ConceptId(30));
        assert!(store.find_component_by_topic("Sketching").is_none());
    }

    #[test]
    fn test_delete_concept_removes_components() {
        let mut store = design_store();
        let removal = store.delete_concept(ConceptId(10)).unwrap();
        assert_eq!(removal.components.len(), 1);
        assert_eq!(store.counts().components, 0);
        assert_eq!(store.counts().categories, 1);
    }

    #[test]
    fn test_delete_component_by_topic_removes_all_matches() {
        let mut store = design_store();
        store.add_component_to_last_concept("Sketching", "second").unwrap();
        store.add_component_to_last_concept("Grid", "").unwrap();

        let removed = store.delete_component(&ComponentKey::topic("Sketching")).unwrap();
        assert_eq!(removed.len(), 2);
        let concept = store.find_concept(ConceptId(10)).unwrap();
        assert_eq!(concept.components.len(), 1);
        assert_eq!(store.components_by_concept(ConceptId(10))[0].topic, "Grid");
    }

    #[test]
    fn test_component_ids_are_never_reused() {
        let mut store = design_store();
        let first = store.find_component_by_topic("Sketching").unwrap().id;
        store.delete_component(&ComponentKey::Id(first)).unwrap();
        let second = store.add_component_to_last_concept("Again", "").unwrap();
        assert!(second > first);
    }

    #[test]
    fn test_concept_ids_stop_at_i64_max() {
        let mut store = design_store();
        store
            .add_concept(NewConcept::new("Big", CategoryId(1), "x").with_id(i64::MAX))
            .unwrap();
        let before = store.clone();
        let err = store
            .add_concept(NewConcept::new("Next", CategoryId(1), ""))
            .unwrap_err();
        assert_eq!(err, StoreError::IdSpaceExhausted(EntityKind::Concept));
        assert_eq!(store, before);
    }

    #[test]
    fn test_restored_component_at_i64_max() {
        let mut store = design_store();
        let id = store
            .restore_component(Component {
                id: ComponentId(i64::MAX),
                topic: "Last".into(),
                details: String::new(),
                concept: ConceptId(10),
            })
            .unwrap();
        assert_eq!(id, ComponentId(i64::MAX));
        assert_eq!(store.components_by_concept(ConceptId(10)).len(), 2);

        let before = store.clone();
        let err = store.add_component_to_last_concept("More", "").unwrap_err();
        assert_eq!(err, StoreError::IdSpaceExhausted(EntityKind::Component));
        assert_eq!(store, before);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut store = RecordStore::new();
        store.add_category(3, "C").unwrap();
        store.add_category(1, "A").unwrap();
        store.add_category(2, "B").unwrap();
        let topics: Vec<_> = store.categories().iter().map(|c| c.topic.as_str()).collect();
        assert_eq!(topics, ["C", "A", "B"]);
    }

    #[test]
    fn test_concepts_by_unknown_category_is_empty() {
        let store = design_store();
        assert!(store.concepts_by_category(&CategoryKey::topic("Missing")).is_empty());
        assert!(store.components_by_concept(ConceptId(77)).is_empty());
    }
}
