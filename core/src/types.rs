//! Entity type definitions for study material.
//!
//! This module defines the three record types held by the
//! [`RecordStore`](crate::RecordStore): a [`Category`] groups [`Concept`]s,
//! and each concept owns an ordered list of [`Component`]s. The types are
//! designed for serialization with [`serde`] and round-trip through the text,
//! JSON, and SQLite backends.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Returns the raw integer value.
            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }
    };
}

record_id!(
    /// Caller-supplied identifier of a [`Category`].
    CategoryId
);
record_id!(
    /// Identifier of a [`Concept`], caller-supplied or generated by the store.
    ConceptId
);
record_id!(
    /// Store-allocated identifier of a [`Component`].
    ComponentId
);

/// Which of the three record collections an operation targets.
///
/// Parses case-insensitively from `"category"`, `"concept"`, or
/// `"component"`.
///
/// # Examples
///
/// ```
/// use concept_breakdown_core::EntityKind;
///
/// let kind: EntityKind = "Concept".parse().unwrap();
/// assert_eq!(kind, EntityKind::Concept);
/// assert!("book".parse::<EntityKind>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Category,
    Concept,
    Component,
}

impl EntityKind {
    /// Lowercase name used in prompts and diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Category => "category",
            EntityKind::Concept => "concept",
            EntityKind::Component => "component",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "category" => Ok(EntityKind::Category),
            "concept" => Ok(EntityKind::Concept),
            "component" => Ok(EntityKind::Component),
            other => Err(format!(
                "unknown record type '{other}' (expected concept, component, or category)"
            )),
        }
    }
}

/// Top-level grouping label for concepts.
///
/// Topics are unique among categories; concepts reference a category by
/// its [`CategoryId`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub topic: String,
}

impl Category {
    pub fn new(id: impl Into<CategoryId>, topic: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            topic: topic.into(),
        }
    }
}

/// A named idea belonging to exactly one category.
///
/// `components` lists the ids of the owned components in the order they
/// were attached. The component records themselves live in the store's
/// component arena.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Concept {
    pub id: ConceptId,
    pub topic: String,
    /// The owning category.
    pub category: CategoryId,
    pub details: String,
    /// Owned components in attachment order.
    #[serde(default)]
    pub components: Vec<ComponentId>,
}

/// A detail or sub-element belonging to exactly one concept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    pub id: ComponentId,
    pub topic: String,
    pub details: String,
    /// The owning concept.
    pub concept: ConceptId,
}

/// Addresses a category either by id or by its (unique) topic.
///
/// Text files and the console name categories by topic; the SQL schema and
/// the store itself use ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategoryKey {
    Id(CategoryId),
    Topic(String),
}

impl CategoryKey {
    pub fn topic(topic: impl Into<String>) -> Self {
        CategoryKey::Topic(topic.into())
    }
}

impl From<CategoryId> for CategoryKey {
    fn from(id: CategoryId) -> Self {
        CategoryKey::Id(id)
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryKey::Id(id) => write!(f, "id {id}"),
            CategoryKey::Topic(topic) => write!(f, "'{topic}'"),
        }
    }
}

/// Addresses one or more components.
///
/// `Topic` matches by the component's current topic, optionally restricted
/// to the components of a single concept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComponentKey {
    Id(ComponentId),
    Topic {
        concept: Option<ConceptId>,
        topic: String,
    },
}

impl ComponentKey {
    /// Matches any component with the given topic.
    pub fn topic(topic: impl Into<String>) -> Self {
        ComponentKey::Topic {
            concept: None,
            topic: topic.into(),
        }
    }

    /// Matches components with the given topic under one concept.
    pub fn topic_in(concept: ConceptId, topic: impl Into<String>) -> Self {
        ComponentKey::Topic {
            concept: Some(concept),
            topic: topic.into(),
        }
    }

    pub(crate) fn matches(&self, component: &Component) -> bool {
        match self {
            ComponentKey::Id(id) => component.id == *id,
            ComponentKey::Topic { concept, topic } => {
                component.topic == *topic && concept.is_none_or(|c| component.concept == c)
            }
        }
    }
}

impl fmt::Display for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentKey::Id(id) => write!(f, "id {id}"),
            ComponentKey::Topic {
                concept: Some(concept),
                topic,
            } => write!(f, "'{topic}' under concept {concept}"),
            ComponentKey::Topic {
                concept: None,
                topic,
            } => write!(f, "'{topic}'"),
        }
    }
}

/// Where a newly added component is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComponentTarget {
    /// An explicit concept.
    Concept(ConceptId),
    /// The most recently added concept.
    LastConcept,
}

/// Fields for a concept that has not been added yet.
///
/// When `id` is `None`, the store allocates the next free id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewConcept {
    pub id: Option<ConceptId>,
    pub topic: String,
    pub category: CategoryKey,
    pub details: String,
}

impl NewConcept {
    pub fn new(
        topic: impl Into<String>,
        category: impl Into<CategoryKey>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            topic: topic.into(),
            category: category.into(),
            details: details.into(),
        }
    }

    /// Sets an explicit id.
    pub fn with_id(mut self, id: impl Into<ConceptId>) -> Self {
        self.id = Some(id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_kind_parse_is_case_insensitive() {
        assert_eq!("CATEGORY".parse::<EntityKind>(), Ok(EntityKind::Category));
        assert_eq!(" component ".parse::<EntityKind>(), Ok(EntityKind::Component));
        assert!("".parse::<EntityKind>().is_err());
    }

    #[test]
    fn test_ids_serialize_transparently() {
        let concept = Concept {
            id: ConceptId(10),
            topic: "Wireframing".into(),
            category: CategoryId(1),
            details: "Basics".into(),
            components: vec![ComponentId(1)],
        };
        let json = serde_json::to_value(&concept).unwrap();
        assert_eq!(json["id"], 10);
        assert_eq!(json["category"], 1);
        assert_eq!(json["components"][0], 1);
    }

    #[test]
    fn test_component_key_scoped_match() {
        let component = Component {
            id: ComponentId(3),
            topic: "Sketching".into(),
            details: String::new(),
            concept: ConceptId(10),
        };
        assert!(ComponentKey::topic("Sketching").matches(&component));
        assert!(ComponentKey::topic_in(ConceptId(10), "Sketching").matches(&component));
        assert!(!ComponentKey::topic_in(ConceptId(11), "Sketching").matches(&component));
        assert!(ComponentKey::Id(ComponentId(3)).matches(&component));
        assert!(!ComponentKey::topic("sketching").matches(&component));
    }

    #[test]
    fn test_category_key_from_id() {
        let key: CategoryKey = CategoryId(4).into();
        assert_eq!(key, CategoryKey::Id(CategoryId(4)));
        assert_eq!(CategoryKey::topic("Design").to_string(), "'Design'");
    }
}
