//! The migration capability contract.

use async_trait::async_trait;

use crate::errors::Result;

/// A procedure that brings the schema to its target shape.
///
/// Each concrete migration implements this single method and captures the
/// capabilities it needs, typically a [`VersionStore`](crate::VersionStore)
/// to branch on the current version and a
/// [`SqlExecutor`](crate::SqlExecutor) for the actual DDL. How the migration
/// sequences its steps is entirely caller-defined.
///
/// On failure the schema is left in whatever partial state the migration
/// reached; nothing here rolls back.
#[async_trait]
pub trait Migration: Send + Sync {
    /// Move the schema from its current version to the target version.
    async fn migrate(&self) -> Result<()>;
}
