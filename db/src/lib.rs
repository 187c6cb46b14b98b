//! File persistence for the Concept Breakdown Tool.
//!
//! This crate provides the text and JSON storage formats, the
//! backup-before-overwrite write path they share, the two file-based
//! [`Persistence`](concept_breakdown_core::Persistence) backends, and the
//! YAML tool configuration.
//!
//! # Quick start
//!
//! ```no_run
//! use concept_breakdown_core::{DiagramCatalog, Session};
//! use concept_breakdown_db::{StorageOverrides, TextBackend, ToolConfig};
//!
//! let config = ToolConfig::load("concept-breakdown.yml").unwrap();
//! let storage = config.resolve(&StorageOverrides::default()).unwrap();
//!
//! let backend = TextBackend::new(&storage.path).with_backup(storage.backup);
//! let mut session = Session::new(backend, DiagramCatalog::standard());
//! let summary = session.load_on_startup().unwrap();
//! for diagnostic in &summary.diagnostics {
//!     eprintln!("{diagnostic}");
//! }
//! ```

mod backend;
pub mod backup;
mod config;
mod error;
pub mod json;
pub mod text;

pub use backend::{JsonBackend, TextBackend};
pub use backup::{SaveOutcome, backup_path, write_with_backup, write_without_backup};
pub use config::{
    DEFAULT_DATA_PATH, DEFAULT_TABLE_PREFIX, LoggingConfig, ResolvedStorage, StorageConfig,
    StorageFormat, StorageOverrides, ToolConfig,
};
pub use error::{DbError, Result};
pub use json::{Snapshot, parse_json, render_json};
pub use text::{LineDiagnostic, LineIssue, TextLoad, parse_text, render_text};
