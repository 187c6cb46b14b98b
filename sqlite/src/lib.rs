//! SQLite storage backend for the Concept Breakdown Tool.
//!
//! This crate stores a [`RecordStore`](concept_breakdown_core::RecordStore)
//! in three prefixed tables (categories, concepts, components). It includes
//! migration lifecycle management, row conversion, a statement-per-operation
//! query interface, and a [`Persistence`](concept_breakdown_core::Persistence)
//! backend.
//!
//! # Architecture
//!
//! - **`schema`**: SQL generation with customizable table prefixes
//! - **`migration`**: lifecycle operations (up/down/status)
//! - **`convert`**: row readers and store reconstruction
//! - **`query`**: record access, one statement per store operation
//! - **`backend`**: the session-facing [`SqliteBackend`]
//!
//! # Quick start
//!
//! ```no_run
//! use concept_breakdown_core::{DiagramCatalog, Session};
//! use concept_breakdown_sqlite::SqliteBackend;
//!
//! let backend = SqliteBackend::open("study.db", "cbt_").unwrap();
//! let mut session = Session::new(backend, DiagramCatalog::standard());
//! let summary = session.load_on_startup().unwrap();
//! println!("{} concepts", summary.counts.concepts);
//! ```
//!
//! # Table prefix customization
//!
//! All table and index names are prefixed with a configurable string,
//! allowing multiple isolated stores within the same SQLite database.
//! Prefixes must contain only ASCII alphanumerics and underscores.

mod backend;
mod convert;
mod error;
mod migration;
mod query;
mod schema;

pub use backend::SqliteBackend;
pub use error::{Result, SqliteError};
pub use migration::{Migration, MigrationStatus};
pub use query::RecordQuery;
pub use schema::{generate_drop_sql, generate_schema_sql};
