//! Migration lifecycle operations for the SQLite schema.
//!
//! Provides [`Migration`] for creating and dropping the tables and for
//! reporting how many rows they hold. Mutation operations run inside a
//! transaction.
//!
//! # Example
//!
//! ```
//! use concept_breakdown_sqlite::Migration;
//! use rusqlite::Connection;
//!
//! let conn = Connection::open_in_memory().unwrap();
//! let migration = Migration::new(&conn, "cbt_").unwrap();
//!
//! migration.up().unwrap();
//! let status = migration.status().unwrap();
//! assert!(status.tables_exist);
//! assert_eq!(status.category_count, 0);
//!
//! migration.down().unwrap();
//! assert!(!migration.status().unwrap().tables_exist);
//! ```

use rusqlite::Connection;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Result, SqliteError};
use crate::schema::{generate_drop_sql, generate_schema_sql, validate_prefix};

/// Manages the lifecycle of the SQLite tables.
pub struct Migration<'a> {
    conn: &'a Connection,
    prefix: String,
}

impl<'a> Migration<'a> {
    /// Creates a migration manager for the given connection and table prefix.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteError::InvalidPrefix`] if the prefix contains invalid characters.
    pub fn new(conn: &'a Connection, prefix: impl Into<String>) -> Result<Self> {
        let prefix = prefix.into();
        validate_prefix(&prefix)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn, prefix })
    }

    /// Creates all tables and indexes.
    ///
    /// Uses `CREATE TABLE IF NOT EXISTS` so it is safe to call multiple times.
    pub fn up(&self) -> Result<()> {
        let sql = generate_schema_sql(&self.prefix)?;
        let tx = self.conn.unchecked_transaction()?;
        tx.execute_batch(&sql)
            .map_err(|e| SqliteError::MigrationError(format!("failed to create tables: {e}")))?;
        tx.commit()?;
        debug!(prefix = %self.prefix, "tables ready");
        Ok(())
    }

    /// Drops all tables, children first.
    ///
    /// Uses `DROP TABLE IF EXISTS` so it is safe to call when the tables do
    /// not exist.
    pub fn down(&self) -> Result<()> {
        let sql = generate_drop_sql(&self.prefix)?;
        let tx = self.conn.unchecked_transaction()?;
        tx.execute_batch(&sql)
            .map_err(|e| SqliteError::MigrationError(format!("failed to drop tables: {e}")))?;
        tx.commit()?;
        info!(prefix = %self.prefix, "tables dropped");
        Ok(())
    }

    /// Reports whether the tables exist and how many rows each holds.
    pub fn status(&self) -> Result<MigrationStatus> {
        if !self.tables_exist()? {
            return Ok(MigrationStatus::default());
        }

        Ok(MigrationStatus {
            tables_exist: true,
            category_count: self.count_rows("categories")?,
            concept_count: self.count_rows("concepts")?,
            component_count: self.count_rows("components")?,
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Checks whether all three tables exist.
    fn tables_exist(&self) -> Result<bool> {
        let mut stmt = self
            .conn
            .prepare("SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1")?;
        for table in ["categories", "concepts", "components"] {
            let name = format!("{}{table}", self.prefix);
            let count: i64 = stmt.query_row([&name], |row| row.get(0))?;
            if count == 0 {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Counts rows in a prefixed table.
    fn count_rows(&self, table: &str) -> Result<usize> {
        let full_table = format!("{}{}", self.prefix, table);
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT COUNT(*) FROM {full_table}"))?;
        let count: i64 = stmt.query_row([], |row| row.get(0))?;
        Ok(count as usize)
    }
}

/// Status of the current migration state.
///
/// Returned by [`Migration::status`]. All counts are zero when the tables
/// do not exist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationStatus {
    /// Whether the tables exist in the database.
    pub tables_exist: bool,
    pub category_count: usize,
    pub concept_count: usize,
    pub component_count: usize,
}
