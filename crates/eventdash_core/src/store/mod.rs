//! Named-table store adapters.
//!
//! # Responsibility
//! - Read and write whole named tables of text cells.
//! - Hide backend details (CSV files, SQLite) behind [`TableStore`].
//!
//! # Invariants
//! - `load` of a table that was never written returns an empty [`Table`].
//! - `save` replaces the full table; there is no partial update.
//! - Key columns are compared in canonical integer form (`"3.0"` == `"3"`).
//! - Writers race last-writer-wins unless they go through
//!   [`TableStore::save_if_unchanged`].

use crate::db::DbError;
use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

pub mod csv_store;
pub mod sqlite_store;

pub use csv_store::CsvTableStore;
pub use sqlite_store::SqliteTableStore;

/// One stored row: column name to cell text.
pub type Row = BTreeMap<String, String>;

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage transport and encoding errors.
#[derive(Debug)]
pub enum StoreError {
    Io {
        table: String,
        source: std::io::Error,
    },
    Csv {
        table: String,
        source: csv::Error,
    },
    Db(DbError),
    Encoding {
        table: String,
        message: String,
    },
    /// The table changed between the caller's read and its write.
    Conflict {
        table: String,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { table, source } => write!(f, "table `{table}` i/o failed: {source}"),
            Self::Csv { table, source } => write!(f, "table `{table}` csv failed: {source}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Encoding { table, message } => {
                write!(f, "table `{table}` holds undecodable data: {message}")
            }
            Self::Conflict { table } => write!(
                f,
                "table `{table}` was modified by another writer; reload and retry"
            ),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Db(err) => Some(err),
            Self::Encoding { .. } | Self::Conflict { .. } => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Content fingerprint of a table snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Revision(u64);

impl Display for Revision {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Full snapshot of one named table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(columns: &[&str]) -> Self {
        Self {
            columns: columns.iter().map(|column| column.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|existing| existing == column)
    }

    /// Appends any of `columns` that are absent. Existing order is kept.
    pub fn ensure_columns(&mut self, columns: &[&str]) {
        for column in columns {
            if !self.has_column(column) {
                self.columns.push(column.to_string());
            }
        }
    }

    /// Appends a row, registering columns the table has not seen yet.
    pub fn push_row(&mut self, row: Row) {
        for column in row.keys() {
            if !self.has_column(column) {
                self.columns.push(column.clone());
            }
        }
        self.rows.push(row);
    }

    /// Fingerprint used for stale-write detection.
    pub fn revision(&self) -> Revision {
        let mut hasher = DefaultHasher::new();
        self.columns.hash(&mut hasher);
        self.rows.hash(&mut hasher);
        Revision(hasher.finish())
    }
}

/// Reads one cell, treating an absent column as empty text.
pub fn cell<'a>(row: &'a Row, column: &str) -> &'a str {
    row.get(column).map(String::as_str).unwrap_or("")
}

/// Coerces identifier text to an integer.
///
/// Accepts `"5"`, `"5.0"` and padded forms. Fractions truncate toward zero;
/// anything non-numeric (including empty cells) becomes 0.
pub fn coerce_id(raw: &str) -> i64 {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<i64>() {
        return value;
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => value.trunc() as i64,
        _ => 0,
    }
}

/// Maps a table name to a filesystem/SQL-safe identifier.
pub fn sanitize_table_name(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    for (index, ch) in input.trim().chars().enumerate() {
        if ch.is_ascii_alphanumeric() {
            if index == 0 && ch.is_ascii_digit() {
                result.push('_');
            }
            result.push(ch.to_ascii_lowercase());
        } else {
            result.push('_');
        }
    }
    if result.is_empty() {
        "_".into()
    } else {
        result
    }
}

/// Whole-table storage contract shared by every backend.
pub trait TableStore {
    /// Short backend label used in logs.
    fn backend_name(&self) -> &'static str;

    /// Reads the full table. A table that does not exist yet is empty.
    fn load(&self, table: &str) -> StoreResult<Table>;

    /// Replaces the full table with `data`.
    fn save(&self, table: &str, data: &Table) -> StoreResult<()>;

    /// Replaces the table only if it still matches `expected`.
    ///
    /// The default implementation re-reads before writing; the two steps are
    /// not atomic. Backends with transactions override this.
    fn save_if_unchanged(&self, table: &str, data: &Table, expected: Revision) -> StoreResult<()> {
        let current = self.load(table)?;
        if current.revision() != expected {
            return Err(StoreError::Conflict {
                table: table.to_string(),
            });
        }
        self.save(table, data)
    }

    /// Removes rows whose `key_column` equals `key_value` after numeric
    /// coercion, and returns how many were removed.
    ///
    /// The key column of the remaining rows is rewritten in canonical integer
    /// form. Tables that are empty or lack the column are left untouched.
    fn delete_where(&self, table: &str, key_column: &str, key_value: i64) -> StoreResult<usize> {
        let mut data = self.load(table)?;
        if data.is_empty() || !data.has_column(key_column) {
            return Ok(0);
        }
        let expected = data.revision();

        let before = data.rows.len();
        let wanted = key_value.to_string();
        for row in &mut data.rows {
            let canonical = coerce_id(cell(row, key_column)).to_string();
            row.insert(key_column.to_string(), canonical);
        }
        data.rows.retain(|row| cell(row, key_column) != wanted);
        let removed = before - data.rows.len();

        self.save_if_unchanged(table, &data, expected)?;
        Ok(removed)
    }
}

impl<T: TableStore + ?Sized> TableStore for &T {
    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }

    fn load(&self, table: &str) -> StoreResult<Table> {
        (**self).load(table)
    }

    fn save(&self, table: &str, data: &Table) -> StoreResult<()> {
        (**self).save(table, data)
    }

    fn save_if_unchanged(&self, table: &str, data: &Table, expected: Revision) -> StoreResult<()> {
        (**self).save_if_unchanged(table, data, expected)
    }

    fn delete_where(&self, table: &str, key_column: &str, key_value: i64) -> StoreResult<usize> {
        (**self).delete_where(table, key_column, key_value)
    }
}

impl<T: TableStore + ?Sized> TableStore for Box<T> {
    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }

    fn load(&self, table: &str) -> StoreResult<Table> {
        (**self).load(table)
    }

    fn save(&self, table: &str, data: &Table) -> StoreResult<()> {
        (**self).save(table, data)
    }

    fn save_if_unchanged(&self, table: &str, data: &Table, expected: Revision) -> StoreResult<()> {
        (**self).save_if_unchanged(table, data, expected)
    }

    fn delete_where(&self, table: &str, key_column: &str, key_value: i64) -> StoreResult<usize> {
        (**self).delete_where(table, key_column, key_value)
    }
}
