//! Error types for the schema toolkit.
//!
//! [`MigrationError`] is the single error type returned by every operation in
//! this crate. It distinguishes driver failures (anything the database
//! reported) from corruption of the version table's one-row invariant, so
//! callers can tell transient failure from external tampering.

use thiserror::Error;

/// Errors that can occur while tracking or evolving the schema.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// A statement failed in the underlying database driver.
    ///
    /// Connectivity, syntax, and constraint violations all surface here,
    /// carrying the driver's original message. Never retried.
    #[error("storage error: {message}")]
    Storage {
        /// The driver's message, passed through unchanged.
        message: String,
    },

    /// The version table did not hold exactly one row at read time.
    ///
    /// Indicates out-of-band tampering or a racing migrator, as opposed to
    /// a transient storage failure.
    #[error("version table holds {rows} rows, expected exactly 1")]
    CorruptVersionTable {
        /// Observed row count.
        rows: u64,
    },
}

impl MigrationError {
    /// Wrap a driver failure, preserving its message.
    pub fn storage(message: impl std::fmt::Display) -> Self {
        Self::Storage {
            message: message.to_string(),
        }
    }
}

/// Convenience type alias for schema toolkit results.
pub type Result<T> = std::result::Result<T, MigrationError>;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
