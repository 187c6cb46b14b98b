//! Load-then-command-then-save orchestration.
//!
//! A [`Session`] owns one [`Persistence`] backend and, once loaded, one
//! [`RecordStore`]. It moves from [`SessionState::Unloaded`] to
//! [`SessionState::Ready`] exactly once, on a successful startup load.
//! Every applied command is persisted immediately.
//!
//! # Example
//!
//! ```
//! use concept_breakdown_core::*;
//!
//! #[derive(Default)]
//! struct Memory {
//!     saved: Option<RecordStore>,
//! }
//!
//! impl Persistence for Memory {
//!     fn describe(&self) -> String {
//!         "memory".into()
//!     }
//!     fn exists(&self) -> bool {
//!         true
//!     }
//!     fn load(&mut self) -> Result<Loaded, PersistError> {
//!         Ok(Loaded::clean(self.saved.clone().unwrap_or_default()))
//!     }
//!     fn save_all(&mut self, store: &RecordStore) -> Result<(), PersistError> {
//!         self.saved = Some(store.clone());
//!         Ok(())
//!     }
//! }
//!
//! let mut session = Session::new(Memory::default(), DiagramCatalog::standard());
//! session.load_on_startup().unwrap();
//! session
//!     .apply(CategoryCommand::Add { id: CategoryId(1), topic: "Design".into() }.into())
//!     .unwrap();
//! assert_eq!(session.backend().saved.as_ref().unwrap().counts().categories, 1);
//! ```

use rand::Rng;
use tracing::{error, info, warn};

use crate::command::{Change, Command};
use crate::diagram::DiagramCatalog;
use crate::error::SessionError;
use crate::persist::{Diagnostic, Persistence};
use crate::store::{RecordStore, StoreCounts};

/// Lifecycle state of a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unloaded,
    Ready,
}

/// Outcome of [`Session::load_on_startup`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    pub source: String,
    pub counts: StoreCounts,
    pub diagnostics: Vec<Diagnostic>,
}

/// The session façade consumed by front ends.
pub struct Session<P> {
    backend: P,
    catalog: DiagramCatalog,
    store: Option<RecordStore>,
}

impl<P: Persistence> Session<P> {
    pub fn new(backend: P, catalog: DiagramCatalog) -> Self {
        Self {
            backend,
            catalog,
            store: None,
        }
    }

    pub fn state(&self) -> SessionState {
        if self.store.is_some() {
            SessionState::Ready
        } else {
            SessionState::Unloaded
        }
    }

    /// Loads the store from the backend.
    ///
    /// # Errors
    ///
    /// [`SessionError::SourceMissing`] if the backend's source does not
    /// exist, [`SessionError::AlreadyLoaded`] on a second call, or
    /// [`SessionError::Persist`] if reading fails.
    pub fn load_on_startup(&mut self) -> Result<LoadSummary, SessionError> {
        if self.store.is_some() {
            return Err(SessionError::AlreadyLoaded);
        }
        let source = self.backend.describe();
        if !self.backend.exists() {
            error!(%source, "startup data source not found");
            return Err(SessionError::SourceMissing(source));
        }

        let loaded = self.backend.load().inspect_err(|err| {
            error!(%source, error = %err, "startup load failed");
        })?;
        let counts = loaded.store.counts();
        if !loaded.diagnostics.is_empty() {
            warn!(%source, count = loaded.diagnostics.len(), "load completed with diagnostics");
        }
        info!(
            %source,
            categories = counts.categories,
            concepts = counts.concepts,
            components = counts.components,
            "store loaded"
        );
        self.store = Some(loaded.store);
        Ok(LoadSummary {
            source,
            counts,
            diagnostics: loaded.diagnostics,
        })
    }

    /// Applies a command and persists the result.
    ///
    /// If persisting fails, the store is restored to its state before the
    /// command and the error is returned.
    pub fn apply(&mut self, command: Command) -> Result<Change, SessionError> {
        let store = self.store.as_mut().ok_or(SessionError::NotLoaded)?;
        let before = store.clone();
        let change = store.apply(command)?;

        if let Err(err) = self.backend.persist(store, &change) {
            error!(error = %err, "save failed, discarding in-memory change");
            *store = before;
            return Err(err.into());
        }
        Ok(change)
    }

    /// Writes the whole store through the backend.
    pub fn save_all(&mut self) -> Result<(), SessionError> {
        let store = self.store.as_ref().ok_or(SessionError::NotLoaded)?;
        self.backend.save_all(store)?;
        Ok(())
    }

    /// The loaded store, or `None` before startup.
    pub fn store(&self) -> Option<&RecordStore> {
        self.store.as_ref()
    }

    pub fn backend(&self) -> &P {
        &self.backend
    }

    pub fn catalog(&self) -> &DiagramCatalog {
        &self.catalog
    }

    /// Recommends a diagram type using the thread-local RNG.
    pub fn recommend_diagram(&self) -> Option<&str> {
        self.recommend_diagram_with(&mut rand::thread_rng())
    }

    pub fn recommend_diagram_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
        self.catalog.pick(rng)
    }
}
