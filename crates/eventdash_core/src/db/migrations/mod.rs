//! Ordered schema migrations for the table store database.
//!
//! # Invariants
//! - Versions strictly increase; a released script is never edited.
//! - All pending scripts apply in one transaction, so a failure leaves the
//!   schema at its previous version.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

/// `(version, script)` pairs in apply order.
const MIGRATIONS: &[(u32, &str)] = &[(1, include_str!("0001_tables.sql"))];

/// Newest schema version this build can write.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |(version, _)| *version)
}

/// Reads the applied schema version.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?)
}

/// Brings the schema up to [`latest_version`]; returns how many scripts ran.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<usize> {
    apply_scripts(conn, MIGRATIONS)
}

/// Runs every script in `scripts` newer than the stored version, all in one
/// transaction.
pub(crate) fn apply_scripts(conn: &mut Connection, scripts: &[(u32, &str)]) -> DbResult<usize> {
    let found = schema_version(conn)?;
    let supported = scripts.last().map_or(0, |(version, _)| *version);
    if found > supported {
        return Err(DbError::SchemaTooNew { found, supported });
    }

    let pending = scripts
        .iter()
        .filter(|(version, _)| *version > found)
        .collect::<Vec<_>>();
    if pending.is_empty() {
        return Ok(0);
    }

    let tx = conn.transaction()?;
    for (version, script) in &pending {
        tx.execute_batch(script)
            .and_then(|()| tx.pragma_update(None, "user_version", version))
            .map_err(|source| DbError::Migration {
                version: *version,
                source,
            })?;
        info!("event=db_migrate module=db status=ok version={version}");
    }
    tx.commit()?;
    Ok(pending.len())
}
