use eventdash_core::db::migrations::{latest_version, schema_version};
use eventdash_core::db::{open_db, open_db_in_memory, DbError};
use eventdash_core::{SqliteTableStore, StoreError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn).unwrap(), latest_version());
    assert_table_exists(&conn, "dashboard_tables");
    assert_table_exists(&conn, "dashboard_rows");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("eventdash.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first).unwrap(), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second).unwrap(), latest_version());
    assert_table_exists(&conn_second, "dashboard_rows");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::SchemaTooNew { found, supported } => {
            assert_eq!(found, 999);
            assert_eq!(supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn store_open_surfaces_schema_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = SqliteTableStore::open(&path).err().unwrap();
    assert!(matches!(
        err,
        StoreError::Db(DbError::SchemaTooNew { .. })
    ));
}

#[test]
fn deleting_table_entry_cascades_to_rows() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO dashboard_tables (name, columns) VALUES ('events', '[\"id\"]');",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO dashboard_rows (table_name, position, data)
         VALUES ('events', 0, '{\"id\":\"1\"}');",
        [],
    )
    .unwrap();

    conn.execute("DELETE FROM dashboard_tables WHERE name = 'events';", [])
        .unwrap();
    let remaining: i64 = conn
        .query_row("SELECT COUNT(*) FROM dashboard_rows;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(remaining, 0);
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
