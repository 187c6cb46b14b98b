//! Record access via SQLite queries.
//!
//! Provides [`RecordQuery`], with one parameterized statement (or one short
//! transaction) per store operation. Updates and deletes that touch no row
//! return [`SqliteError::NotFound`].
//!
//! Deletes cascade explicitly: components before their concept, concepts
//! before their category.
//!
//! # Example
//!
//! ```
//! use concept_breakdown_core::{Category, CategoryId};
//! use concept_breakdown_sqlite::{Migration, RecordQuery};
//! use rusqlite::Connection;
//!
//! let conn = Connection::open_in_memory().unwrap();
//! Migration::new(&conn, "cbt_").unwrap().up().unwrap();
//!
//! let query = RecordQuery::new(&conn, "cbt_").unwrap();
//! query.insert_category(&Category::new(1, "Design")).unwrap();
//! let id = query.insert_concept(None, "Wireframing", CategoryId(1), "Basics").unwrap();
//! assert_eq!(query.get_concepts_by_category(CategoryId(1)).unwrap()[0].id, id);
//!
//! query.delete_category(CategoryId(1)).unwrap();
//! assert!(query.get_concepts().unwrap().is_empty());
//! ```

use concept_breakdown_core::{
    Category, CategoryId, Component, ComponentId, Concept, ConceptId, EntityKind, RecordStore,
};
use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, info};

use crate::convert::{
    self, CATEGORY_COLUMNS, COMPONENT_COLUMNS, CONCEPT_COLUMNS, category_from_row,
    component_from_row, concept_from_row,
};
use crate::error::{Result, SqliteError};
use crate::schema::validate_prefix;

/// Query interface for reading and writing records in SQLite.
///
/// Wraps a borrowed connection (or transaction) and the table prefix.
/// Multi-statement operations open their own transaction unless the
/// connection is already inside one, in which case they join it.
pub struct RecordQuery<'a> {
    conn: &'a Connection,
    prefix: String,
}

impl<'a> RecordQuery<'a> {
    /// Creates a query interface for the given connection and table prefix.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteError::InvalidPrefix`] if the prefix is invalid.
    pub fn new(conn: &'a Connection, prefix: impl Into<String>) -> Result<Self> {
        let prefix = prefix.into();
        validate_prefix(&prefix)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn, prefix })
    }

    // ------------------------------------------------------------------
    // Categories
    // ------------------------------------------------------------------

    pub fn insert_category(&self, category: &Category) -> Result<()> {
        self.conn.execute(
            &format!("INSERT INTO {}categories (id, topic) VALUES (?1, ?2)", self.prefix),
            params![category.id.get(), category.topic],
        )?;
        debug!(id = %category.id, "category row inserted");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`SqliteError::NotFound`] if no row has this id.
    pub fn update_category(&self, id: CategoryId, topic: &str) -> Result<()> {
        let rows = self.conn.execute(
            &format!("UPDATE {}categories SET topic = ?2 WHERE id = ?1", self.prefix),
            params![id.get(), topic],
        )?;
        expect_row(rows, EntityKind::Category, id)
    }

    /// Deletes a category together with its concepts and their components.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteError::NotFound`] if no row has this id; nothing is
    /// deleted in that case.
    pub fn delete_category(&self, id: CategoryId) -> Result<()> {
        let p = &self.prefix;
        self.in_transaction(|conn| {
            let components = conn.execute(
                &format!(
                    "DELETE FROM {p}components WHERE concept_id IN \
                     (SELECT id FROM {p}concepts WHERE category_id = ?1)"
                ),
                params![id.get()],
            )?;
            let concepts = conn.execute(
                &format!("DELETE FROM {p}concepts WHERE category_id = ?1"),
                params![id.get()],
            )?;
            let rows = conn.execute(
                &format!("DELETE FROM {p}categories WHERE id = ?1"),
                params![id.get()],
            )?;
            expect_row(rows, EntityKind::Category, id)?;
            debug!(%id, concepts, components, "category rows deleted");
            Ok(())
        })
    }

    pub fn get_category(&self, id: CategoryId) -> Result<Option<Category>> {
        let category = self
            .conn
            .query_row(
                &format!(
                    "SELECT {CATEGORY_COLUMNS} FROM {}categories WHERE id = ?1",
                    self.prefix
                ),
                params![id.get()],
                category_from_row,
            )
            .optional()?;
        Ok(category)
    }

    /// All categories, ordered by id.
    pub fn get_categories(&self) -> Result<Vec<Category>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM {}categories ORDER BY id",
            self.prefix
        ))?;
        let rows = stmt
            .query_map([], category_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    // ------------------------------------------------------------------
    // Concepts
    // ------------------------------------------------------------------

    /// Inserts a concept and returns its id.
    ///
    /// With `id` set to `None` SQLite assigns the id, which is read back
    /// with `last_insert_rowid`.
    pub fn insert_concept(
        &self,
        id: Option<ConceptId>,
        topic: &str,
        category: CategoryId,
        details: &str,
    ) -> Result<ConceptId> {
        self.conn.execute(
            &format!(
                "INSERT INTO {}concepts (id, topic, category_id, details) VALUES (?1, ?2, ?3, ?4)",
                self.prefix
            ),
            params![id.map(ConceptId::get), topic, category.get(), details],
        )?;
        let id = id.unwrap_or(ConceptId(self.conn.last_insert_rowid()));
        debug!(%id, %category, "concept row inserted");
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns [`SqliteError::NotFound`] if no row has this id.
    pub fn update_concept(&self, id: ConceptId, topic: &str, details: &str) -> Result<()> {
        let rows = self.conn.execute(
            &format!(
                "UPDATE {}concepts SET topic = ?2, details = ?3 WHERE id = ?1",
                self.prefix
            ),
            params![id.get(), topic, details],
        )?;
        expect_row(rows, EntityKind::Concept, id)
    }

    /// Deletes a concept and its components.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteError::NotFound`] if no row has this id; nothing is
    /// deleted in that case.
    pub fn delete_concept(&self, id: ConceptId) -> Result<()> {
        let p = &self.prefix;
        self.in_transaction(|conn| {
            let components = conn.execute(
                &format!("DELETE FROM {p}components WHERE concept_id = ?1"),
                params![id.get()],
            )?;
            let rows = conn.execute(
                &format!("DELETE FROM {p}concepts WHERE id = ?1"),
                params![id.get()],
            )?;
            expect_row(rows, EntityKind::Concept, id)?;
            debug!(%id, components, "concept rows deleted");
            Ok(())
        })
    }

    /// Loads one concept with its component ids in position order.
    pub fn get_concept(&self, id: ConceptId) -> Result<Option<Concept>> {
        let concept = self
            .conn
            .query_row(
                &format!(
                    "SELECT {CONCEPT_COLUMNS} FROM {}concepts WHERE id = ?1",
                    self.prefix
                ),
                params![id.get()],
                concept_from_row,
            )
            .optional()?;
        concept.map(|c| self.with_component_ids(c)).transpose()
    }

    /// All concepts with their component ids, ordered by id.
    pub fn get_concepts(&self) -> Result<Vec<Concept>> {
        let concepts = self.select_concepts("", params![])?;
        concepts
            .into_iter()
            .map(|c| self.with_component_ids(c))
            .collect()
    }

    pub fn get_concepts_by_category(&self, category: CategoryId) -> Result<Vec<Concept>> {
        let concepts = self.select_concepts("WHERE category_id = ?1", params![category.get()])?;
        concepts
            .into_iter()
            .map(|c| self.with_component_ids(c))
            .collect()
    }

    // ------------------------------------------------------------------
    // Components
    // ------------------------------------------------------------------

    /// Inserts a component at the end of its concept's list.
    pub fn insert_component(&self, component: &Component) -> Result<()> {
        let p = &self.prefix;
        self.conn.execute(
            &format!(
                "INSERT INTO {p}components (id, topic, details, concept_id, position) \
                 VALUES (?1, ?2, ?3, ?4, \
                 (SELECT COALESCE(MAX(position), -1) + 1 FROM {p}components WHERE concept_id = ?4))"
            ),
            params![
                component.id.get(),
                component.topic,
                component.details,
                component.concept.get()
            ],
        )?;
        debug!(id = %component.id, concept = %component.concept, "component row inserted");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`SqliteError::NotFound`] if no row has this id.
    pub fn update_component(&self, id: ComponentId, topic: &str, details: &str) -> Result<()> {
        let rows = self.conn.execute(
            &format!(
                "UPDATE {}components SET topic = ?2, details = ?3 WHERE id = ?1",
                self.prefix
            ),
            params![id.get(), topic, details],
        )?;
        expect_row(rows, EntityKind::Component, id)
    }

    /// # Errors
    ///
    /// Returns [`SqliteError::NotFound`] if no row has this id.
    pub fn delete_component(&self, id: ComponentId) -> Result<()> {
        let rows = self.conn.execute(
            &format!("DELETE FROM {}components WHERE id = ?1", self.prefix),
            params![id.get()],
        )?;
        expect_row(rows, EntityKind::Component, id)
    }

    pub fn get_component(&self, id: ComponentId) -> Result<Option<Component>> {
        let component = self
            .conn
            .query_row(
                &format!(
                    "SELECT {COMPONENT_COLUMNS} FROM {}components WHERE id = ?1",
                    self.prefix
                ),
                params![id.get()],
                component_from_row,
            )
            .optional()?;
        Ok(component)
    }

    /// All components, grouped by concept and in position order.
    pub fn get_components(&self) -> Result<Vec<Component>> {
        self.select_components("", params![])
    }

    pub fn get_components_by_concept(&self, concept: ConceptId) -> Result<Vec<Component>> {
        self.select_components("WHERE concept_id = ?1", params![concept.get()])
    }

    // ------------------------------------------------------------------
    // Whole store
    // ------------------------------------------------------------------

    /// Reads every table and rebuilds a store.
    ///
    /// Categories and concepts come back ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteError::ConversionError`] if the rows break a store
    /// invariant.
    pub fn load_store(&self) -> Result<RecordStore> {
        let categories = self.get_categories()?;
        let concepts = self.select_concepts("", params![])?;
        let components = self.get_components()?;
        let store = convert::build_store(categories, concepts, components)?;
        let counts = store.counts();
        info!(
            categories = counts.categories,
            concepts = counts.concepts,
            components = counts.components,
            "store loaded from database"
        );
        Ok(store)
    }

    /// Replaces every row with the contents of `store`.
    pub fn replace_all(&self, store: &RecordStore) -> Result<()> {
        self.in_transaction(|conn| {
            let p = &self.prefix;
            conn.execute_batch(&format!(
                "DELETE FROM {p}components; DELETE FROM {p}concepts; DELETE FROM {p}categories;"
            ))?;
            let query = RecordQuery {
                conn,
                prefix: self.prefix.clone(),
            };
            for category in store.categories() {
                query.insert_category(category)?;
            }
            for concept in store.concepts() {
                query.insert_concept(
                    Some(concept.id),
                    &concept.topic,
                    concept.category,
                    &concept.details,
                )?;
                for component in store.components_by_concept(concept.id) {
                    query.insert_component(component)?;
                }
            }
            Ok(())
        })?;
        let counts = store.counts();
        info!(
            categories = counts.categories,
            concepts = counts.concepts,
            components = counts.components,
            "database rewritten"
        );
        Ok(())
    }

    /// Returns a reference to the underlying connection.
    pub fn connection(&self) -> &Connection {
        self.conn
    }

    fn select_concepts(
        &self,
        filter: &str,
        params: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<Concept>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {CONCEPT_COLUMNS} FROM {}concepts {filter} ORDER BY id",
            self.prefix
        ))?;
        let rows = stmt
            .query_map(params, concept_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn select_components(
        &self,
        filter: &str,
        params: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<Component>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {COMPONENT_COLUMNS} FROM {}components {filter} \
             ORDER BY concept_id, position, id",
            self.prefix
        ))?;
        let rows = stmt
            .query_map(params, component_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn with_component_ids(&self, mut concept: Concept) -> Result<Concept> {
        concept.components = self
            .get_components_by_concept(concept.id)?
            .into_iter()
            .map(|c| c.id)
            .collect();
        Ok(concept)
    }

    fn in_transaction<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        if !self.conn.is_autocommit() {
            return f(self.conn);
        }
        let tx = self.conn.unchecked_transaction()?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }
}

fn expect_row(rows: usize, kind: EntityKind, key: impl ToString) -> Result<()> {
    if rows == 0 {
        return Err(SqliteError::not_found(kind, key));
    }
    Ok(())
}
