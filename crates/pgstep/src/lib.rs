//! # pgstep
//!
//! Schema-version tracking and idempotent reset primitives for Postgres.
//!
//! - **[`SqlExecutor`]**: the narrow injected seam to the database. Execute
//!   a statement string, get back rows and a row count. [`PgExecutor`] is the
//!   production implementation over one `tokio_postgres` client.
//! - **[`VersionStore`]**: owns the single-row version table: idempotent
//!   bootstrap, read, write, and single-statement atomic increment.
//! - **[`SchemaInspector`]**: read-only table and column listings from
//!   `information_schema`.
//! - **[`DatabaseResetter`]**: cascading-drop fixpoint clear, then rebuild
//!   through a [`Migration`].
//! - **[`Migration`]**: the single-method contract each concrete migration
//!   implements.
//!
//! All operations run as sequential awaits over one shared session; there is
//! no internal parallelism and no built-in cross-process mutual exclusion.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use pgstep::{PgExecutor, VersionStore};
//!
//! let executor = Arc::new(PgExecutor::connect("host=db user=app dbname=app").await?);
//! let versions = VersionStore::new(executor);
//! if versions.get_version().await? < 1 {
//!     // apply DDL, then:
//!     versions.set_version(1).await?;
//! }
//! ```

#![deny(unsafe_code)]

pub mod errors;
pub mod executor;
pub mod inspect;
pub mod migration;
pub mod reset;
pub mod version;

pub use errors::{MigrationError, Result};
pub use executor::{PgExecutor, SqlExecutor, SqlRow, StatementResult};
pub use inspect::{SchemaInspector, DEFAULT_SCHEMA};
pub use migration::Migration;
pub use reset::DatabaseResetter;
pub use version::{VersionStore, DEFAULT_VERSION_TABLE};
