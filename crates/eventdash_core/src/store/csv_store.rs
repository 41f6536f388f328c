//! Flat-file backend: one CSV file per table.
//!
//! # Invariants
//! - Table `name` lives at `<data_dir>/<sanitized name>.csv`.
//! - Saves go through a temp file plus rename, so readers never observe a
//!   half-written table.
//! - A missing file is an empty table.

use super::{sanitize_table_name, Row, StoreError, StoreResult, Table, TableStore};
use csv::{ReaderBuilder, Writer};
use log::{debug, error, info};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// CSV directory backend.
#[derive(Debug, Clone)]
pub struct CsvTableStore {
    data_dir: PathBuf,
}

impl CsvTableStore {
    /// Opens (and creates when missing) the data directory.
    pub fn open(data_dir: impl AsRef<Path>) -> StoreResult<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        fs::create_dir_all(&data_dir).map_err(|source| {
            error!(
                "event=store_open module=store status=error backend=csv error_code=create_dir_failed error={}",
                source
            );
            StoreError::Io {
                table: String::new(),
                source,
            }
        })?;
        info!(
            "event=store_open module=store status=ok backend=csv data_dir={}",
            data_dir.display()
        );
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the file backing `table`.
    pub fn table_path(&self, table: &str) -> PathBuf {
        self.data_dir
            .join(format!("{}.csv", sanitize_table_name(table)))
    }

    fn temp_path(&self, table: &str) -> PathBuf {
        self.data_dir
            .join(format!(".{}.csv.tmp", sanitize_table_name(table)))
    }
}

impl TableStore for CsvTableStore {
    fn backend_name(&self) -> &'static str {
        "csv"
    }

    fn load(&self, table: &str) -> StoreResult<Table> {
        let started_at = Instant::now();
        let path = self.table_path(table);
        if !path.exists() {
            debug!("event=table_load module=store status=absent backend=csv table={table}");
            return Ok(Table::default());
        }

        let csv_err = |source: csv::Error| StoreError::Csv {
            table: table.to_string(),
            source,
        };

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&path)
            .map_err(csv_err)?;
        let columns = reader
            .headers()
            .map_err(csv_err)?
            .iter()
            .map(|value| value.to_string())
            .collect::<Vec<_>>();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(csv_err)?;
            let mut row = Row::new();
            for (index, value) in record.iter().enumerate() {
                if let Some(column) = columns.get(index) {
                    row.insert(column.clone(), value.to_string());
                }
            }
            rows.push(row);
        }

        debug!(
            "event=table_load module=store status=ok backend=csv table={} rows={} duration_ms={}",
            table,
            rows.len(),
            started_at.elapsed().as_millis()
        );
        Ok(Table { columns, rows })
    }

    fn save(&self, table: &str, data: &Table) -> StoreResult<()> {
        let started_at = Instant::now();
        let temp_path = self.temp_path(table);
        let csv_err = |source: csv::Error| StoreError::Csv {
            table: table.to_string(),
            source,
        };

        let result = (|| -> StoreResult<()> {
            let mut writer = Writer::from_path(&temp_path).map_err(csv_err)?;
            if !data.columns.is_empty() {
                writer.write_record(&data.columns).map_err(csv_err)?;
            }
            for row in &data.rows {
                let record = data
                    .columns
                    .iter()
                    .map(|column| row.get(column).map(String::as_str).unwrap_or(""));
                writer.write_record(record).map_err(csv_err)?;
            }
            writer.flush().map_err(|source| StoreError::Io {
                table: table.to_string(),
                source,
            })?;
            drop(writer);

            fs::rename(&temp_path, self.table_path(table)).map_err(|source| StoreError::Io {
                table: table.to_string(),
                source,
            })
        })();

        match &result {
            Ok(()) => info!(
                "event=table_save module=store status=ok backend=csv table={} rows={} duration_ms={}",
                table,
                data.rows.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => {
                let _ = fs::remove_file(&temp_path);
                error!(
                    "event=table_save module=store status=error backend=csv table={} duration_ms={} error={}",
                    table,
                    started_at.elapsed().as_millis(),
                    err
                );
            }
        }
        result
    }
}
