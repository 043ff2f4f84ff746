//! Postgres-backed [`SqlExecutor`] over one `tokio_postgres` client.
//!
//! Uses the simple-query protocol: values come back as text, and a
//! semicolon-separated batch runs as a single unit, which is what the
//! cascading clear needs. One client, one session; no pooling, no retries.

use async_trait::async_trait;
use tokio_postgres::{Client, NoTls, SimpleQueryMessage};
use tracing::{debug, error};

use super::{SqlExecutor, SqlRow, StatementResult};
use crate::errors::{MigrationError, Result};

/// [`SqlExecutor`] backed by a single `tokio_postgres::Client`.
pub struct PgExecutor {
    client: Client,
}

impl PgExecutor {
    /// Wrap an existing client. The caller keeps driving its connection task.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Connect with a libpq-style config string (e.g. `"host=db user=app
    /// dbname=app"`) and spawn the connection driver on the current runtime.
    pub async fn connect(config: &str) -> Result<Self> {
        let (client, connection) = tokio_postgres::connect(config, NoTls)
            .await
            .map_err(MigrationError::storage)?;
        let _ = tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!(error = %e, "postgres connection terminated");
            }
        });
        Ok(Self { client })
    }
}

#[async_trait]
impl SqlExecutor for PgExecutor {
    async fn execute(&self, sql: &str) -> Result<StatementResult> {
        debug!(sql, "executing statement");
        let messages = self
            .client
            .simple_query(sql)
            .await
            .map_err(MigrationError::storage)?;

        let mut result = StatementResult::default();
        for message in messages {
            match message {
                SimpleQueryMessage::Row(row) => {
                    let mut out = SqlRow::new();
                    for (idx, column) in row.columns().iter().enumerate() {
                        out.set(column.name(), row.get(idx).map(str::to_string));
                    }
                    result.rows.push(out);
                }
                SimpleQueryMessage::CommandComplete(count) => result.row_count += count,
                _ => {}
            }
        }
        Ok(result)
    }
}
