//! [`Persistence`] over a SQLite database.
//!
//! The connection is opened on first use, so checking [`exists`] never
//! creates an empty database file. Tables are created (if missing) before
//! the first read or write.
//!
//! [`exists`]: Persistence::exists

use std::path::{Path, PathBuf};

use concept_breakdown_core::{Change, Loaded, PersistError, Persistence, RecordStore};
use rusqlite::Connection;
use tracing::{debug, warn};

use crate::error::{Result, SqliteError};
use crate::migration::Migration;
use crate::query::RecordQuery;
use crate::schema::validate_prefix;

/// Stores records in prefixed SQLite tables.
///
/// [`persist`](Persistence::persist) turns each [`Change`] into the
/// matching statements inside one transaction instead of rewriting every
/// table.
///
/// # Examples
///
/// ```
/// use concept_breakdown_core::{CategoryCommand, CategoryId, DiagramCatalog, Session};
/// use concept_breakdown_sqlite::SqliteBackend;
/// use rusqlite::Connection;
///
/// let conn = Connection::open_in_memory().unwrap();
/// let backend = SqliteBackend::from_connection(conn, "cbt_").unwrap();
/// let mut session = Session::new(backend, DiagramCatalog::standard());
/// session.load_on_startup().unwrap();
/// session
///     .apply(CategoryCommand::Add { id: CategoryId(1), topic: "Design".into() }.into())
///     .unwrap();
/// ```
pub struct SqliteBackend {
    path: Option<PathBuf>,
    prefix: String,
    conn: Option<Connection>,
    migrated: bool,
}

impl SqliteBackend {
    /// Creates a backend for the database file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteError::InvalidPrefix`] if the prefix is invalid.
    pub fn open(path: impl Into<PathBuf>, prefix: impl Into<String>) -> Result<Self> {
        let prefix = prefix.into();
        validate_prefix(&prefix)?;
        Ok(Self {
            path: Some(path.into()),
            prefix,
            conn: None,
            migrated: false,
        })
    }

    /// Wraps an already open connection, such as an in-memory database.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteError::InvalidPrefix`] if the prefix is invalid.
    pub fn from_connection(conn: Connection, prefix: impl Into<String>) -> Result<Self> {
        let prefix = prefix.into();
        validate_prefix(&prefix)?;
        Ok(Self {
            path: None,
            prefix,
            conn: Some(conn),
            migrated: false,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Opens the connection if needed and makes sure the tables exist.
    fn ready(&mut self) -> Result<&Connection> {
        let conn = match self.conn.take() {
            Some(conn) => conn,
            None => {
                let path = self.path.as_deref().ok_or_else(|| {
                    SqliteError::MigrationError("backend has no database path".to_string())
                })?;
                debug!(path = %path.display(), "opening database");
                Connection::open(path)?
            }
        };
        let conn = self.conn.insert(conn);
        if !self.migrated {
            Migration::new(conn, self.prefix.as_str())?.up()?;
            self.migrated = true;
        }
        Ok(conn)
    }

    fn apply_change(query: &RecordQuery<'_>, store: &RecordStore, change: &Change) -> Result<()> {
        match change {
            Change::CategoryAdded(id) => {
                let category = store.find_category(*id).ok_or_else(|| missing_in_store(change))?;
                query.insert_category(category)
            }
            Change::CategoryUpdated(id) => {
                let category = store.find_category(*id).ok_or_else(|| missing_in_store(change))?;
                query.update_category(*id, &category.topic)
            }
            Change::CategoryDeleted(removal) => query.delete_category(removal.category.id),
            Change::ConceptAdded(id) => {
                let concept = store.find_concept(*id).ok_or_else(|| missing_in_store(change))?;
                query
                    .insert_concept(Some(*id), &concept.topic, concept.category, &concept.details)
                    .map(|_| ())
            }
            Change::ConceptUpdated(id) => {
                let concept = store.find_concept(*id).ok_or_else(|| missing_in_store(change))?;
                query.update_concept(*id, &concept.topic, &concept.details)
            }
            Change::ConceptDeleted(removal) => query.delete_concept(removal.concept.id),
            Change::ComponentAdded(id) => {
                let component = store.find_component(*id).ok_or_else(|| missing_in_store(change))?;
                query.insert_component(component)
            }
            Change::ComponentUpdated(id) => {
                let component = store.find_component(*id).ok_or_else(|| missing_in_store(change))?;
                query.update_component(*id, &component.topic, &component.details)
            }
            Change::ComponentsDeleted(ids) => {
                ids.iter().try_for_each(|id| query.delete_component(*id))
            }
        }
    }
}

fn missing_in_store(change: &Change) -> SqliteError {
    SqliteError::ConversionError(format!("record for change '{change}' is not in the store"))
}

impl Persistence for SqliteBackend {
    fn describe(&self) -> String {
        match &self.path {
            Some(path) => format!("SQLite database '{}'", path.display()),
            None => "SQLite database (open connection)".to_string(),
        }
    }

    fn exists(&self) -> bool {
        self.path.as_deref().is_none_or(Path::is_file)
    }

    fn load(&mut self) -> std::result::Result<Loaded, PersistError> {
        let prefix = self.prefix.clone();
        let conn = self.ready()?;
        let store = RecordQuery::new(conn, prefix)?.load_store()?;
        Ok(Loaded::clean(store))
    }

    fn save_all(&mut self, store: &RecordStore) -> std::result::Result<(), PersistError> {
        let prefix = self.prefix.clone();
        let conn = self.ready()?;
        RecordQuery::new(conn, prefix)?.replace_all(store)?;
        Ok(())
    }

    fn persist(
        &mut self,
        store: &RecordStore,
        change: &Change,
    ) -> std::result::Result<(), PersistError> {
        let prefix = self.prefix.clone();
        let conn = self.ready()?;
        let tx = conn.unchecked_transaction().map_err(SqliteError::from)?;
        {
            let query = RecordQuery::new(&tx, prefix)?;
            Self::apply_change(&query, store, change).inspect_err(|err| {
                warn!(%change, error = %err, "statement failed, rolling back");
            })?;
        }
        tx.commit().map_err(SqliteError::from)?;
        debug!(%change, "change persisted");
        Ok(())
    }
}
