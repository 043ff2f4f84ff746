//! Database clearing and full reset.

use std::sync::Arc;

use tracing::info;

use crate::errors::Result;
use crate::executor::SqlExecutor;
use crate::inspect::SchemaInspector;
use crate::migration::Migration;

/// Recursively drops every user table, then rebuilds via a [`Migration`].
#[derive(Clone)]
pub struct DatabaseResetter {
    executor: Arc<dyn SqlExecutor>,
    inspector: SchemaInspector,
}

impl DatabaseResetter {
    /// Create a resetter over the default `public` schema.
    pub fn new(executor: Arc<dyn SqlExecutor>) -> Self {
        let inspector = SchemaInspector::new(Arc::clone(&executor));
        Self {
            executor,
            inspector,
        }
    }

    /// Scope clearing to a schema other than `public`.
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.inspector = self.inspector.with_schema(schema);
        self
    }

    /// Drop every table in the active schema until none remain. Returns the
    /// tables that existed when the outermost call started.
    ///
    /// Each pass batches one cascading drop per known table into a single
    /// statement, so no dependency ordering is needed. If tables survive a
    /// pass, the pass repeats on the remainder. Termination is guaranteed
    /// only while no other process is concurrently creating tables; there is
    /// no cap and no backoff.
    pub async fn clear_database(&self) -> Result<Vec<String>> {
        let tables = self.inspector.list_tables().await?;
        if tables.is_empty() {
            return Ok(tables);
        }

        let drops: String = tables
            .iter()
            .map(|table| format!("DROP TABLE {table} CASCADE;"))
            .collect();
        info!(count = tables.len(), "dropping tables");
        let _ = self.executor.execute(&drops).await?;

        let mut remaining = self.inspector.list_tables().await?;
        while !remaining.is_empty() {
            remaining = Box::pin(self.clear_database()).await?;
        }

        Ok(tables)
    }

    /// Clear every table, then run the supplied migration from scratch.
    ///
    /// No rollback: if the migration fails partway, the schema is left in
    /// whatever partial state it reached.
    pub async fn reset_database(&self, migration: &dyn Migration) -> Result<()> {
        let dropped = self.clear_database().await?;
        info!(dropped = dropped.len(), "database cleared, running migration");
        migration.migrate().await
    }
}
