//! In-memory fake database for the integration tests.
//!
//! Implements [`SqlExecutor`] by interpreting exactly the statement shapes
//! the crate issues: catalog listings, version-table DDL/DML, and batched
//! cascading drops. Every statement is recorded so tests can assert on pass
//! structure, and drops can be scripted to leave survivors, standing in for
//! a pass whose drops only partially take effect.

// Shared across test binaries; not every binary uses every helper.
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use pgstep::{MigrationError, Result, SqlExecutor, SqlRow, StatementResult};

/// One fake table: column names plus integer rows (only the version table
/// ever stores rows).
#[derive(Clone, Debug, Default)]
struct FakeTable {
    columns: Vec<String>,
    rows: Vec<i64>,
}

#[derive(Debug, Default)]
struct FakeState {
    tables: BTreeMap<String, FakeTable>,
    /// Tables that survive the next N drop attempts.
    sticky: BTreeMap<String, u32>,
    /// Message for a one-shot scripted failure on the next statement.
    fail_next: Option<String>,
    log: Vec<String>,
}

/// In-memory [`SqlExecutor`] understanding the crate's statement shapes.
#[derive(Debug, Default)]
pub struct FakeDatabase {
    state: Mutex<FakeState>,
}

impl FakeDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a user table with the given columns.
    pub fn create_table(&self, name: &str, columns: &[&str]) {
        let mut state = self.state.lock().unwrap();
        let _ = state.tables.insert(
            name.to_string(),
            FakeTable {
                columns: columns.iter().map(ToString::to_string).collect(),
                rows: Vec::new(),
            },
        );
    }

    /// Make `table` survive the next `passes` drop attempts.
    pub fn survive_drops(&self, table: &str, passes: u32) {
        let _ = self
            .state
            .lock()
            .unwrap()
            .sticky
            .insert(table.to_string(), passes);
    }

    /// Fail the next statement with the given message.
    pub fn fail_next(&self, message: &str) {
        self.state.lock().unwrap().fail_next = Some(message.to_string());
    }

    /// Raw rows of a version table, for out-of-band tampering.
    pub fn version_rows(&self, table: &str) -> Vec<i64> {
        self.state
            .lock()
            .unwrap()
            .tables
            .get(table)
            .map(|t| t.rows.clone())
            .unwrap_or_default()
    }

    /// Overwrite the raw rows of a version table, bypassing the store.
    pub fn set_version_rows(&self, table: &str, rows: &[i64]) {
        let mut state = self.state.lock().unwrap();
        if let Some(t) = state.tables.get_mut(table) {
            t.rows = rows.to_vec();
        }
    }

    /// Names of all live tables.
    pub fn table_names(&self) -> Vec<String> {
        self.state.lock().unwrap().tables.keys().cloned().collect()
    }

    /// Every statement executed so far, in order.
    pub fn statements(&self) -> Vec<String> {
        self.state.lock().unwrap().log.clone()
    }

    /// Number of drop batches executed (one per clearing pass).
    pub fn drop_batches(&self) -> usize {
        self.state
            .lock()
            .unwrap()
            .log
            .iter()
            .filter(|sql| sql.starts_with("DROP TABLE "))
            .count()
    }
}

#[async_trait]
impl SqlExecutor for FakeDatabase {
    async fn execute(&self, sql: &str) -> Result<StatementResult> {
        let mut state = self.state.lock().unwrap();
        state.log.push(sql.to_string());

        if let Some(message) = state.fail_next.take() {
            return Err(MigrationError::storage(message));
        }

        if sql.starts_with("SELECT table_name FROM information_schema.tables") {
            let rows: Vec<SqlRow> = state
                .tables
                .keys()
                .map(|name| SqlRow::new().with("table_name", name.as_str()))
                .collect();
            return Ok(result_with(rows));
        }

        if sql.starts_with("SELECT column_name FROM information_schema.columns") {
            let table = quoted_after(sql, "table_name = '").unwrap_or_default();
            let rows: Vec<SqlRow> = state
                .tables
                .get(table)
                .map(|t| {
                    t.columns
                        .iter()
                        .map(|c| SqlRow::new().with("column_name", c.as_str()))
                        .collect()
                })
                .unwrap_or_default();
            return Ok(result_with(rows));
        }

        if let Some(rest) = sql.strip_prefix("CREATE TABLE IF NOT EXISTS ") {
            let (name, columns) = parse_create(rest)?;
            let _ = state
                .tables
                .entry(name.to_string())
                .or_insert(FakeTable {
                    columns,
                    rows: Vec::new(),
                });
            return Ok(StatementResult::default());
        }

        if let Some(rest) = sql.strip_prefix("CREATE TABLE ") {
            let (name, columns) = parse_create(rest)?;
            if state.tables.contains_key(name) {
                return Err(MigrationError::storage(format!(
                    "relation \"{name}\" already exists"
                )));
            }
            let _ = state.tables.insert(
                name.to_string(),
                FakeTable {
                    columns,
                    rows: Vec::new(),
                },
            );
            return Ok(StatementResult::default());
        }

        if let Some(rest) = sql.strip_prefix("INSERT INTO ") {
            let name = first_token(rest)?;
            let table = state
                .tables
                .get_mut(name)
                .ok_or_else(|| missing_relation(name))?;
            table.rows.push(0);
            return Ok(StatementResult {
                rows: Vec::new(),
                row_count: 1,
            });
        }

        if let Some(rest) = sql.strip_prefix("SELECT * FROM ") {
            let name = first_token(rest)?;
            let table = state.tables.get(name).ok_or_else(|| missing_relation(name))?;
            let rows: Vec<SqlRow> = table
                .rows
                .iter()
                .map(|v| SqlRow::new().with("version", v.to_string()))
                .collect();
            return Ok(result_with(rows));
        }

        if let Some(rest) = sql.strip_prefix("UPDATE ") {
            let name = first_token(rest)?;
            let table = state
                .tables
                .get_mut(name)
                .ok_or_else(|| missing_relation(name))?;
            if sql.contains("version + 1") {
                for row in &mut table.rows {
                    *row += 1;
                }
                let rows: Vec<SqlRow> = table
                    .rows
                    .iter()
                    .map(|v| SqlRow::new().with("version", v.to_string()))
                    .collect();
                return Ok(result_with(rows));
            }
            let value = sql
                .rsplit("= ")
                .next()
                .and_then(|v| v.trim().parse::<i64>().ok())
                .ok_or_else(|| MigrationError::storage(format!("cannot parse update: {sql}")))?;
            let count = table.rows.len() as u64;
            for row in &mut table.rows {
                *row = value;
            }
            return Ok(StatementResult {
                rows: Vec::new(),
                row_count: count,
            });
        }

        if sql.starts_with("DROP TABLE ") {
            let mut count = 0;
            for statement in sql.split(';').map(str::trim).filter(|s| !s.is_empty()) {
                let rest = statement
                    .strip_prefix("DROP TABLE ")
                    .ok_or_else(|| MigrationError::storage(format!("bad batch: {statement}")))?;
                let name = first_token(rest)?;
                if let Some(passes) = state.sticky.get_mut(name) {
                    if *passes > 0 {
                        *passes -= 1;
                        continue;
                    }
                }
                if state.tables.remove(name).is_some() {
                    count += 1;
                }
            }
            return Ok(StatementResult {
                rows: Vec::new(),
                row_count: count,
            });
        }

        Err(MigrationError::storage(format!(
            "fake database does not understand: {sql}"
        )))
    }
}

fn result_with(rows: Vec<SqlRow>) -> StatementResult {
    StatementResult {
        row_count: rows.len() as u64,
        rows,
    }
}

fn missing_relation(name: &str) -> MigrationError {
    MigrationError::storage(format!("relation \"{name}\" does not exist"))
}

fn first_token(rest: &str) -> Result<&str> {
    rest.split_whitespace()
        .next()
        .ok_or_else(|| MigrationError::storage("statement names no table"))
}

fn quoted_after<'a>(sql: &'a str, marker: &str) -> Option<&'a str> {
    let start = sql.find(marker)? + marker.len();
    let rest = &sql[start..];
    let end = rest.find('\'')?;
    Some(&rest[..end])
}

/// Parse `name ( col TYPE, col TYPE )` into the table name and column names.
fn parse_create(rest: &str) -> Result<(&str, Vec<String>)> {
    let name = first_token(rest)?;
    let open = rest
        .find('(')
        .ok_or_else(|| MigrationError::storage(format!("bad create: {rest}")))?;
    let close = rest
        .rfind(')')
        .ok_or_else(|| MigrationError::storage(format!("bad create: {rest}")))?;
    let columns = rest[open + 1..close]
        .split(',')
        .filter_map(|def| def.split_whitespace().next())
        .map(ToString::to_string)
        .collect();
    Ok((name, columns))
}
