//! The version store, owner of the single-row version table.
//!
//! The version table holds exactly one row `{ version: INTEGER }` once
//! bootstrapped. All writes to it are centralized here; no other component
//! touches it. Bootstrap is a check-then-act sequence, not an atomic unit:
//! concurrent bootstraps from independent sessions can race, and callers
//! needing mutual exclusion must layer an external advisory lock.

use std::sync::Arc;

use tracing::{debug, info};

use crate::errors::{MigrationError, Result};
use crate::executor::{SqlExecutor, SqlRow};
use crate::inspect::SchemaInspector;

/// Version-table name used when none is configured.
pub const DEFAULT_VERSION_TABLE: &str = "version";

/// Tracks the applied schema version in a single-row table.
#[derive(Clone)]
pub struct VersionStore {
    executor: Arc<dyn SqlExecutor>,
    inspector: SchemaInspector,
    table: String,
}

impl VersionStore {
    /// Create a store over the default table name (`version`) in the default
    /// `public` schema.
    pub fn new(executor: Arc<dyn SqlExecutor>) -> Self {
        let inspector = SchemaInspector::new(Arc::clone(&executor));
        Self {
            executor,
            inspector,
            table: DEFAULT_VERSION_TABLE.to_string(),
        }
    }

    /// Use a custom version-table name.
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Scope the existence check to a schema other than `public`.
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.inspector = self.inspector.with_schema(schema);
        self
    }

    /// Name of the version table this store owns.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// True iff the configured table name appears in the live table set.
    /// Case-sensitive exact match.
    pub async fn version_table_exists(&self) -> Result<bool> {
        let tables = self.inspector.list_tables().await?;
        Ok(tables.iter().any(|t| t == &self.table))
    }

    /// Ensure the version table exists and holds exactly one row.
    ///
    /// Idempotent from a single session: a missing table is created and
    /// seeded with version 0, an empty table is re-seeded, a one-row table is
    /// left alone. Postcondition in all cases: the table exists with exactly
    /// one row.
    pub async fn bootstrap(&self) -> Result<()> {
        if !self.version_table_exists().await? {
            let _ = self
                .executor
                .execute(&format!(
                    "CREATE TABLE IF NOT EXISTS {} ( version INTEGER )",
                    self.table
                ))
                .await?;
            let _ = self
                .executor
                .execute(&format!("INSERT INTO {} (version) VALUES (0)", self.table))
                .await?;
            info!(table = %self.table, "created version table, seeded version 0");
            return Ok(());
        }

        let current = self
            .executor
            .execute(&format!("SELECT * FROM {}", self.table))
            .await?;
        if current.row_count == 0 {
            let _ = self
                .executor
                .execute(&format!("INSERT INTO {} (version) VALUES (0)", self.table))
                .await?;
            info!(table = %self.table, "re-seeded empty version table with version 0");
        } else {
            debug!(table = %self.table, "version table already bootstrapped");
        }
        Ok(())
    }

    /// Current schema version. Bootstraps first, then requires the table to
    /// hold exactly one row.
    pub async fn get_version(&self) -> Result<u32> {
        self.bootstrap().await?;

        let result = self
            .executor
            .execute(&format!("SELECT * FROM {}", self.table))
            .await?;
        if result.row_count != 1 {
            return Err(MigrationError::CorruptVersionTable {
                rows: result.row_count,
            });
        }
        parse_version(&result.rows[0])
    }

    /// Overwrite the stored version unconditionally. Bootstraps first.
    pub async fn set_version(&self, version: u32) -> Result<()> {
        self.bootstrap().await?;

        let _ = self
            .executor
            .execute(&format!(
                "UPDATE {} SET version = {version}",
                self.table
            ))
            .await?;
        info!(table = %self.table, version, "set schema version");
        Ok(())
    }

    /// Increment the stored version by one and return the new value.
    ///
    /// The increment is a single statement (no read-then-write race on the
    /// increment itself), but the preceding bootstrap is a separate round
    /// trip, so the pair is not atomic across sessions.
    pub async fn increase_version(&self) -> Result<u32> {
        self.bootstrap().await?;

        let result = self
            .executor
            .execute(&format!(
                "UPDATE {} SET version = version + 1 RETURNING *",
                self.table
            ))
            .await?;
        let row = result
            .rows
            .first()
            .ok_or_else(|| MigrationError::storage("version increment returned no rows"))?;
        let version = parse_version(row)?;
        info!(table = %self.table, version, "increased schema version");
        Ok(version)
    }
}

fn parse_version(row: &SqlRow) -> Result<u32> {
    let value = row
        .get("version")
        .ok_or_else(|| MigrationError::storage("version column missing from version table row"))?;
    value.parse().map_err(|_| {
        MigrationError::storage(format!("version column held non-integer value '{value}'"))
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
