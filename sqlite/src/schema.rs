//! SQL schema generation with customizable table prefixes.
//!
//! Generates the `CREATE TABLE` and `CREATE INDEX` statements for storing
//! the record store in SQLite. All table names are prefixed with a
//! configurable string so several stores can share one database file.
//!
//! # Table structure
//!
//! - `{prefix}categories`: id and unique topic
//! - `{prefix}concepts`: topic, details, and the owning category id
//! - `{prefix}components`: topic, details, the owning concept id, and the
//!   component's position within that concept
//!
//! Foreign keys are declared without `ON DELETE CASCADE`. Dependent rows
//! are removed explicitly by [`RecordQuery`](crate::RecordQuery), so a stray
//! `DELETE` on a parent fails instead of silently taking children with it.

use crate::error::{Result, SqliteError};

/// Validates that a table prefix contains only alphanumeric characters and underscores.
pub(crate) fn validate_prefix(prefix: &str) -> Result<()> {
    if prefix.is_empty() {
        return Err(SqliteError::InvalidPrefix(prefix.to_string()));
    }
    if !prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(SqliteError::InvalidPrefix(prefix.to_string()));
    }
    Ok(())
}

/// Generates the complete SQL schema for all tables with the given prefix.
///
/// # Errors
///
/// Returns [`SqliteError::InvalidPrefix`] if the prefix is empty or contains
/// characters other than alphanumerics and underscores.
///
/// # Examples
///
/// ```
/// let sql = concept_breakdown_sqlite::generate_schema_sql("study_").unwrap();
/// assert!(sql.contains("CREATE TABLE IF NOT EXISTS study_concepts"));
/// ```
pub fn generate_schema_sql(prefix: &str) -> Result<String> {
    validate_prefix(prefix)?;

    let sql = format!(
        r#"
CREATE TABLE IF NOT EXISTS {prefix}categories (
    id INTEGER PRIMARY KEY,
    topic TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS {prefix}concepts (
    id INTEGER PRIMARY KEY,
    topic TEXT NOT NULL,
    category_id INTEGER NOT NULL,
    details TEXT NOT NULL DEFAULT '',
    FOREIGN KEY (category_id) REFERENCES {prefix}categories(id)
);

CREATE TABLE IF NOT EXISTS {prefix}components (
    id INTEGER PRIMARY KEY,
    topic TEXT NOT NULL,
    details TEXT NOT NULL DEFAULT '',
    concept_id INTEGER NOT NULL,
    position INTEGER NOT NULL,
    FOREIGN KEY (concept_id) REFERENCES {prefix}concepts(id)
);

CREATE INDEX IF NOT EXISTS idx_{prefix}concepts_category ON {prefix}concepts(category_id);
CREATE INDEX IF NOT EXISTS idx_{prefix}components_concept ON {prefix}components(concept_id, position);
"#
    );

    Ok(sql)
}

/// Generates SQL to drop all tables in reverse dependency order.
///
/// # Errors
///
/// Returns [`SqliteError::InvalidPrefix`] if the prefix is invalid.
pub fn generate_drop_sql(prefix: &str) -> Result<String> {
    validate_prefix(prefix)?;

    let sql = format!(
        r#"
DROP TABLE IF EXISTS {prefix}components;
DROP TABLE IF EXISTS {prefix}concepts;
DROP TABLE IF EXISTS {prefix}categories;
"#
    );

    Ok(sql)
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use super::*;

    fn schema_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        conn.execute_batch(&generate_schema_sql("t_").unwrap()).unwrap();
        conn
    }

    #[test]
    fn test_valid_prefix() {
        assert!(validate_prefix("cbt_").is_ok());
        assert!(validate_prefix("study2").is_ok());
        assert!(validate_prefix("A_B_C").is_ok());
    }

    #[test]
    fn test_invalid_prefix() {
        assert!(validate_prefix("").is_err());
        assert!(validate_prefix("drop;--").is_err());
        assert!(validate_prefix("hello world").is_err());
        assert!(validate_prefix("test-prefix").is_err());
        assert!(validate_prefix("caf\u{e9}_").is_err());
    }

    #[test]
    fn test_generate_schema_sql_contains_tables() {
        let sql = generate_schema_sql("cbt_").unwrap();
        assert!(sql.contains("cbt_categories"));
        assert!(sql.contains("cbt_concepts"));
        assert!(sql.contains("cbt_components"));
        assert!(sql.contains("idx_cbt_concepts_category"));
        assert!(sql.contains("idx_cbt_components_concept"));
        assert!(!sql.contains("ON DELETE CASCADE"));
    }

    #[test]
    fn test_generate_drop_sql_children_first() {
        let sql = generate_drop_sql("cbt_").unwrap();
        let components = sql.find("cbt_components").unwrap();
        let concepts = sql.find("cbt_concepts").unwrap();
        let categories = sql.find("cbt_categories").unwrap();
        assert!(components < concepts && concepts < categories);
        assert!(generate_drop_sql("").is_err());
    }

    #[test]
    fn test_category_topic_is_unique() {
        let conn = schema_conn();
        conn.execute("INSERT INTO t_categories (id, topic) VALUES (1, 'Design')", [])
            .unwrap();
        assert!(conn
            .execute("INSERT INTO t_categories (id, topic) VALUES (2, 'Design')", [])
            .is_err());
    }

    #[test]
    fn test_foreign_keys_enforced_without_cascade() {
        let conn = schema_conn();
        assert!(conn
            .execute(
                "INSERT INTO t_concepts (id, topic, category_id, details) VALUES (1, 'x', 99, '')",
                [],
            )
            .is_err());

        conn.execute("INSERT INTO t_categories (id, topic) VALUES (1, 'Design')", [])
            .unwrap();
        conn.execute(
            "INSERT INTO t_concepts (id, topic, category_id, details) VALUES (10, 'Wireframing', 1, '')",
            [],
        )
        .unwrap();
        // The parent cannot be removed while it still has children.
        assert!(conn.execute("DELETE FROM t_categories WHERE id = 1", []).is_err());
    }
}
