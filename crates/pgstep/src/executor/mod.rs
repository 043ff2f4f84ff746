//! The injected SQL execution seam.
//!
//! [`SqlExecutor`] is the only way this crate touches a database: one method
//! that executes a statement string against one persistent session and
//! returns rows plus a row count. The production implementation is
//! [`PgExecutor`]; tests inject an in-memory fake. No retries, no statement
//! caching, no connection management. The session is owned by the caller.
//!
//! The single-statement DDL conveniences (`add_column`, `rename_table`, …)
//! live here as default methods. They are pass-throughs with no semantics of
//! their own and are deliberately not part of the version-tracking core.

pub mod postgres;

use std::collections::HashMap;

use async_trait::async_trait;

use crate::errors::Result;

pub use postgres::PgExecutor;

/// A single result row: column name → text value.
///
/// Values travel as text (simple-query protocol); `None` is SQL `NULL`.
#[derive(Clone, Debug, Default)]
pub struct SqlRow {
    values: HashMap<String, Option<String>>,
}

impl SqlRow {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column value. `None` represents SQL `NULL`.
    pub fn set(&mut self, column: impl Into<String>, value: Option<String>) {
        let _ = self.values.insert(column.into(), value);
    }

    /// Builder form of [`set`](Self::set) for non-null values.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(column, Some(value.into()));
        self
    }

    /// Text value of a column, or `None` if the column is absent or `NULL`.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(column).and_then(Option::as_deref)
    }
}

/// Outcome of executing one statement (or one batch) against the database.
#[derive(Clone, Debug, Default)]
pub struct StatementResult {
    /// Result rows, if the statement returned any.
    pub rows: Vec<SqlRow>,
    /// Rows returned or affected, as reported by the database.
    pub row_count: u64,
}

/// Executes SQL statements against one persistent database session.
///
/// Implementations must run a semicolon-separated batch as a single unit;
/// the cascading clear in [`DatabaseResetter`](crate::DatabaseResetter)
/// relies on this.
#[async_trait]
pub trait SqlExecutor: Send + Sync {
    /// Execute a statement (or batch) and return its rows and row count.
    async fn execute(&self, sql: &str) -> Result<StatementResult>;

    /// `ALTER TABLE <table> ADD COLUMN <column>`, where `column` carries the
    /// column name and type, e.g. `"nickname TEXT"`.
    async fn add_column(&self, table: &str, column: &str) -> Result<()> {
        let _ = self
            .execute(&format!("ALTER TABLE {table} ADD COLUMN {column}"))
            .await?;
        Ok(())
    }

    /// `ALTER TABLE <table> DROP COLUMN <column>`
    async fn drop_column(&self, table: &str, column: &str) -> Result<()> {
        let _ = self
            .execute(&format!("ALTER TABLE {table} DROP COLUMN {column}"))
            .await?;
        Ok(())
    }

    /// `ALTER TABLE <table> RENAME COLUMN <old> TO <new>`
    async fn rename_column(&self, table: &str, old_column: &str, new_column: &str) -> Result<()> {
        let _ = self
            .execute(&format!(
                "ALTER TABLE {table} RENAME COLUMN {old_column} TO {new_column}"
            ))
            .await?;
        Ok(())
    }

    /// `ALTER TABLE <table> ALTER COLUMN <column> TYPE <column_type>`
    async fn change_column_type(
        &self,
        table: &str,
        column: &str,
        column_type: &str,
    ) -> Result<()> {
        let _ = self
            .execute(&format!(
                "ALTER TABLE {table} ALTER COLUMN {column} TYPE {column_type}"
            ))
            .await?;
        Ok(())
    }

    /// `ALTER TABLE <old_table> RENAME TO <new_table>`
    async fn rename_table(&self, old_table: &str, new_table: &str) -> Result<()> {
        let _ = self
            .execute(&format!("ALTER TABLE {old_table} RENAME TO {new_table}"))
            .await?;
        Ok(())
    }

    /// `DROP TABLE <table> CASCADE`
    async fn drop_table(&self, table: &str) -> Result<()> {
        let _ = self.execute(&format!("DROP TABLE {table} CASCADE")).await?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
