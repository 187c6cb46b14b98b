//! Core record types, store, and session façade for the Concept Breakdown
//! Tool.
//!
//! This crate defines the foundational pieces for organizing study material
//! as Categories → Concepts → Components:
//!
//! - [`Category`], [`Concept`], [`Component`]: the entity model, with
//!   id-based references between levels.
//! - [`RecordStore`]: the in-memory collections and their add, update,
//!   delete, and find operations. Deleting a category or a concept cascades
//!   to everything it owns.
//! - [`Command`] / [`Change`]: typed mutations and what they did.
//! - [`Persistence`]: the load/save boundary implemented by the text, JSON,
//!   and SQLite backends in sibling crates.
//! - [`Session`]: loads once, applies commands, and saves after each one.
//! - [`DiagramCatalog`]: random diagram-type recommendations.
//!
//! # Example
//!
//! ```
//! use concept_breakdown_core::*;
//!
//! let mut store = RecordStore::new();
//! store.add_category(1, "Design").unwrap();
//! store
//!     .add_concept(
//!         NewConcept::new("Wireframing", CategoryKey::topic("Design"), "Basics").with_id(10),
//!     )
//!     .unwrap();
//!
//! // Concepts under a missing category are refused.
//! let err = store
//!     .add_concept(NewConcept::new("Personas", CategoryKey::topic("Research"), ""))
//!     .unwrap_err();
//! assert!(matches!(err, StoreError::UnknownCategory(_)));
//! assert_eq!(store.concepts().len(), 1);
//! ```

mod command;
mod diagram;
mod error;
mod persist;
mod session;
mod store;
mod types;

pub use command::{CategoryCommand, Change, Command, ComponentCommand, ConceptCommand};
pub use diagram::{DIAGRAM_TYPES, DiagramCatalog};
pub use error::{PersistError, Result, SessionError, StoreError};
pub use persist::{Diagnostic, Loaded, Persistence};
pub use session::{LoadSummary, Session, SessionState};
pub use store::{CategoryRemoval, ConceptRemoval, RecordStore, StoreCounts};
pub use types::*;
