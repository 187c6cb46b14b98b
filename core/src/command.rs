//! Typed mutation commands and their outcomes.
//!
//! A [`Command`] carries the strongly typed fields for one add, update, or
//! delete against one entity kind. [`RecordStore::apply`] dispatches it by
//! pattern matching and reports what happened as a [`Change`], which the
//! session hands to the persistence backend.

use std::fmt;

use serde::Serialize;

use crate::error::Result;
use crate::store::{CategoryRemoval, ConceptRemoval, RecordStore};
use crate::types::{
    CategoryId, ComponentId, ComponentKey, ComponentTarget, ConceptId, EntityKind, NewConcept,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryCommand {
    Add { id: CategoryId, topic: String },
    Update { id: CategoryId, topic: String },
    Delete { id: CategoryId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConceptCommand {
    Add(NewConcept),
    Update {
        id: ConceptId,
        topic: String,
        details: String,
    },
    Delete {
        id: ConceptId,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentCommand {
    Add {
        target: ComponentTarget,
        topic: String,
        details: String,
    },
    Update {
        key: ComponentKey,
        topic: String,
        details: String,
    },
    Delete {
        key: ComponentKey,
    },
}

/// A mutation against the record store.
///
/// # Examples
///
/// ```
/// use concept_breakdown_core::{CategoryCommand, CategoryId, Change, Command, RecordStore};
///
/// let mut store = RecordStore::new();
/// let change = store
///     .apply(Command::Category(CategoryCommand::Add {
///         id: CategoryId(1),
///         topic: "Design".into(),
///     }))
///     .unwrap();
/// assert_eq!(change, Change::CategoryAdded(CategoryId(1)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Category(CategoryCommand),
    Concept(ConceptCommand),
    Component(ComponentCommand),
}

impl Command {
    pub fn kind(&self) -> EntityKind {
        match self {
            Command::Category(_) => EntityKind::Category,
            Command::Concept(_) => EntityKind::Concept,
            Command::Component(_) => EntityKind::Component,
        }
    }
}

impl From<CategoryCommand> for Command {
    fn from(cmd: CategoryCommand) -> Self {
        Command::Category(cmd)
    }
}

impl From<ConceptCommand> for Command {
    fn from(cmd: ConceptCommand) -> Self {
        Command::Concept(cmd)
    }
}

impl From<ComponentCommand> for Command {
    fn from(cmd: ComponentCommand) -> Self {
        Command::Component(cmd)
    }
}

/// The effect of a successfully applied [`Command`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Change {
    CategoryAdded(CategoryId),
    CategoryUpdated(CategoryId),
    CategoryDeleted(CategoryRemoval),
    ConceptAdded(ConceptId),
    ConceptUpdated(ConceptId),
    ConceptDeleted(ConceptRemoval),
    ComponentAdded(ComponentId),
    ComponentUpdated(ComponentId),
    ComponentsDeleted(Vec<ComponentId>),
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Change::CategoryAdded(id) => write!(f, "Category {id} added."),
            Change::CategoryUpdated(id) => write!(f, "Category {id} updated."),
            Change::CategoryDeleted(removal) => write!(
                f,
                "Category {} removed ({} concept(s), {} component(s)).",
                removal.category.id,
                removal.concepts.len(),
                removal.components.len()
            ),
            Change::ConceptAdded(id) => write!(f, "Concept {id} added."),
            Change::ConceptUpdated(id) => write!(f, "Concept {id} updated."),
            Change::ConceptDeleted(removal) => write!(
                f,
                "Concept {} removed ({} component(s)).",
                removal.concept.id,
                removal.components.len()
            ),
            Change::ComponentAdded(id) => write!(f, "Component {id} added."),
            Change::ComponentUpdated(id) => write!(f, "Component {id} updated."),
            Change::ComponentsDeleted(ids) => write!(f, "{} component(s) removed.", ids.len()),
        }
    }
}

impl RecordStore {
    /// Applies a command and reports its effect.
    ///
    /// # Errors
    ///
    /// Propagates the [`StoreError`](crate::StoreError) of the underlying
    /// operation; the store is unchanged in that case.
    pub fn apply(&mut self, command: Command) -> Result<Change> {
        match command {
            Command::Category(cmd) => match cmd {
                CategoryCommand::Add { id, topic } => {
                    self.add_category(id, topic).map(Change::CategoryAdded)
                }
                CategoryCommand::Update { id, topic } => {
                    self.update_category(id, topic)?;
                    Ok(Change::CategoryUpdated(id))
                }
                CategoryCommand::Delete { id } => {
                    self.delete_category(id).map(Change::CategoryDeleted)
                }
            },
            Command::Concept(cmd) => match cmd {
                ConceptCommand::Add(concept) => self.add_concept(concept).map(Change::ConceptAdded),
                ConceptCommand::Update { id, topic, details } => {
                    self.update_concept(id, topic, details)?;
                    Ok(Change::ConceptUpdated(id))
                }
                ConceptCommand::Delete { id } => {
                    self.delete_concept(id).map(Change::ConceptDeleted)
                }
            },
            Command::Component(cmd) => match cmd {
                ComponentCommand::Add {
                    target,
                    topic,
                    details,
                } => self
                    .add_component(target, topic, details)
                    .map(Change::ComponentAdded),
                ComponentCommand::Update {
                    key,
                    topic,
                    details,
                } => self
                    .update_component(&key, topic, details)
                    .map(Change::ComponentUpdated),
                ComponentCommand::Delete { key } => {
                    self.delete_component(&key).map(Change::ComponentsDeleted)
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CategoryKey;

    #[test]
    fn test_apply_dispatches_by_kind() {
        let mut store = RecordStore::new();
        let commands: Vec<Command> = vec![
            CategoryCommand::Add {
                id: CategoryId(1),
                topic: "Design".into(),
            }
            .into(),
            ConceptCommand::Add(NewConcept::new("Wireframing", CategoryKey::topic("Design"), ""))
                .into(),
            ComponentCommand::Add {
                target: ComponentTarget::LastConcept,
                topic: "Sketching".into(),
                details: "".into(),
            }
            .into(),
        ];
        let kinds: Vec<_> = commands.iter().map(Command::kind).collect();
        assert_eq!(
            kinds,
            [EntityKind::Category, EntityKind::Concept, EntityKind::Component]
        );

        let changes: Vec<_> = commands
            .into_iter()
            .map(|c| store.apply(c).unwrap())
            .collect();
        assert_eq!(changes[0], Change::CategoryAdded(CategoryId(1)));
        assert_eq!(changes[1], Change::ConceptAdded(ConceptId(1)));
        assert_eq!(changes[2], Change::ComponentAdded(ComponentId(1)));
    }

    #[test]
    fn test_apply_delete_reports_cascade() {
        let mut store = RecordStore::new();
        store.add_category(1, "Design").unwrap();
        store
            .add_concept(NewConcept::new("Wireframing", CategoryId(1), ""))
            .unwrap();
        store.add_component_to_last_concept("Sketching", "").unwrap();

        let change = store
            .apply(CategoryCommand::Delete { id: CategoryId(1) }.into())
            .unwrap();
        assert_eq!(
            change.to_string(),
            "Category 1 removed (1 concept(s), 1 component(s))."
        );
    }

    #[test]
    fn test_apply_update_not_found() {
        let mut store = RecordStore::new();
        let err = store
            .apply(
                ConceptCommand::Update {
                    id: ConceptId(5),
                    topic: "X".into(),
                    details: "Y".into(),
                }
                .into(),
            )
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
