//! Read-only catalog introspection for the active schema.

use std::sync::Arc;

use tracing::debug;

use crate::errors::Result;
use crate::executor::SqlExecutor;

/// Schema namespace introspected when none is configured.
pub const DEFAULT_SCHEMA: &str = "public";

/// Lists tables and columns from `information_schema`.
///
/// Listing is tolerant: a table that does not exist yields an empty column
/// list, never an error. Result order is whatever the catalog returns;
/// callers must not rely on it.
#[derive(Clone)]
pub struct SchemaInspector {
    executor: Arc<dyn SqlExecutor>,
    schema: String,
}

impl SchemaInspector {
    /// Create an inspector over the default `public` schema.
    pub fn new(executor: Arc<dyn SqlExecutor>) -> Self {
        Self {
            executor,
            schema: DEFAULT_SCHEMA.to_string(),
        }
    }

    /// Set the schema namespace to introspect.
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = schema.into();
        self
    }

    /// Names of the base tables currently present in the active schema.
    pub async fn list_tables(&self) -> Result<Vec<String>> {
        let result = self
            .executor
            .execute(&format!(
                "SELECT table_name FROM information_schema.tables \
                 WHERE table_schema = '{}' AND table_type = 'BASE TABLE'",
                self.schema
            ))
            .await?;
        let tables: Vec<String> = result
            .rows
            .iter()
            .filter_map(|row| row.get("table_name").map(str::to_string))
            .collect();
        debug!(schema = %self.schema, count = tables.len(), "listed base tables");
        Ok(tables)
    }

    /// Column names of one table. Empty if the table does not exist.
    pub async fn list_columns(&self, table: &str) -> Result<Vec<String>> {
        let result = self
            .executor
            .execute(&format!(
                "SELECT column_name FROM information_schema.columns \
                 WHERE table_schema = '{}' AND table_name = '{table}'",
                self.schema
            ))
            .await?;
        let columns: Vec<String> = result
            .rows
            .iter()
            .filter_map(|row| row.get("column_name").map(str::to_string))
            .collect();
        debug!(table, count = columns.len(), "listed columns");
        Ok(columns)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
