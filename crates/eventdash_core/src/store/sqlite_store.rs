//! Database backend: many named tables inside one SQLite file.
//!
//! # Invariants
//! - Column order lives in `dashboard_tables.columns` (JSON array).
//! - Each row is one JSON object in `dashboard_rows.data`, ordered by
//!   `position`.
//! - `save` and `save_if_unchanged` run inside a single transaction.

use super::{sanitize_table_name, Revision, Row, StoreError, StoreResult, Table, TableStore};
use crate::db::{open_db, open_db_in_memory};
use log::{debug, info, warn};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::time::Instant;

/// SQLite-backed table store. Owns its connection for its whole lifetime.
pub struct SqliteTableStore {
    conn: Connection,
}

impl SqliteTableStore {
    /// Opens the database file, applying migrations first.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }

    /// Wraps an already migrated connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl TableStore for SqliteTableStore {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    fn load(&self, table: &str) -> StoreResult<Table> {
        let started_at = Instant::now();
        let loaded = read_table(&self.conn, table)?;
        debug!(
            "event=table_load module=store status=ok backend=sqlite table={} rows={} duration_ms={}",
            table,
            loaded.rows.len(),
            started_at.elapsed().as_millis()
        );
        Ok(loaded)
    }

    fn save(&self, table: &str, data: &Table) -> StoreResult<()> {
        let started_at = Instant::now();
        let tx = self.conn.unchecked_transaction()?;
        write_table(&tx, table, data)?;
        tx.commit()?;
        info!(
            "event=table_save module=store status=ok backend=sqlite table={} rows={} duration_ms={}",
            table,
            data.rows.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }

    fn save_if_unchanged(&self, table: &str, data: &Table, expected: Revision) -> StoreResult<()> {
        let started_at = Instant::now();
        let tx = self.conn.unchecked_transaction()?;
        let current = read_table(&tx, table)?;
        if current.revision() != expected {
            warn!(
                "event=table_save module=store status=conflict backend=sqlite table={} expected={} found={}",
                table,
                expected,
                current.revision()
            );
            return Err(StoreError::Conflict {
                table: table.to_string(),
            });
        }
        write_table(&tx, table, data)?;
        tx.commit()?;
        info!(
            "event=table_save module=store status=ok backend=sqlite table={} rows={} checked=true duration_ms={}",
            table,
            data.rows.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }
}

fn read_table(conn: &Connection, table: &str) -> StoreResult<Table> {
    let name = sanitize_table_name(table);
    let columns_json: Option<String> = conn
        .query_row(
            "SELECT columns FROM dashboard_tables WHERE name = ?1;",
            [name.as_str()],
            |row| row.get(0),
        )
        .optional()?;
    let Some(columns_json) = columns_json else {
        return Ok(Table::default());
    };

    let columns: Vec<String> =
        serde_json::from_str(&columns_json).map_err(|err| StoreError::Encoding {
            table: table.to_string(),
            message: format!("columns: {err}"),
        })?;

    let mut stmt = conn.prepare(
        "SELECT data FROM dashboard_rows
         WHERE table_name = ?1
         ORDER BY position ASC;",
    )?;
    let mut raw_rows = stmt.query([name.as_str()])?;
    let mut rows = Vec::new();
    while let Some(raw) = raw_rows.next()? {
        let data: String = raw.get(0)?;
        let row: Row = serde_json::from_str(&data).map_err(|err| StoreError::Encoding {
            table: table.to_string(),
            message: format!("row {}: {err}", rows.len()),
        })?;
        rows.push(row);
    }

    Ok(Table { columns, rows })
}

fn write_table(conn: &Connection, table: &str, data: &Table) -> StoreResult<()> {
    let name = sanitize_table_name(table);
    let encode_err = |err: serde_json::Error| StoreError::Encoding {
        table: table.to_string(),
        message: err.to_string(),
    };

    let columns_json = serde_json::to_string(&data.columns).map_err(encode_err)?;
    conn.execute(
        "INSERT INTO dashboard_tables (name, columns) VALUES (?1, ?2)
         ON CONFLICT (name) DO UPDATE SET
            columns = excluded.columns,
            updated_at = (strftime('%s', 'now') * 1000);",
        params![name, columns_json],
    )?;
    conn.execute(
        "DELETE FROM dashboard_rows WHERE table_name = ?1;",
        [name.as_str()],
    )?;

    let mut insert = conn.prepare(
        "INSERT INTO dashboard_rows (table_name, position, data) VALUES (?1, ?2, ?3);",
    )?;
    for (position, row) in data.rows.iter().enumerate() {
        let encoded = serde_json::to_string(row).map_err(encode_err)?;
        insert.execute(params![name, position as i64, encoded])?;
    }
    Ok(())
}
