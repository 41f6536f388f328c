//! Dashboard configuration file.
//!
//! # Responsibility
//! - Describe which backend holds the tables and where.
//! - Carry table names and logging settings.
//!
//! # Invariants
//! - Every field has a default; a missing file means all defaults.
//! - Unknown keys are rejected so typos do not silently fall back.

use crate::logging::default_log_level;
use crate::store::{CsvTableStore, SqliteTableStore, StoreResult, TableStore};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const DEFAULT_DATA_DIR: &str = "eventdash-data";
const DEFAULT_DATABASE: &str = "eventdash-data/eventdash.db";

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    Serialize(toml::ser::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "could not access config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "invalid config `{}`: {source}", path.display())
            }
            Self::Serialize(source) => write!(f, "could not render config: {source}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Serialize(source) => Some(source),
        }
    }
}

/// Storage backend selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// One CSV file per table under `data_dir`.
    #[default]
    Csv,
    /// All tables inside the SQLite file at `database`.
    Sqlite,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    pub backend: Backend,
    pub data_dir: PathBuf,
    pub database: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            database: PathBuf::from(DEFAULT_DATABASE),
        }
    }
}

/// Names of the three tables (worksheet or file stems).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TableNames {
    pub events: String,
    pub attendees: String,
    pub tasks: String,
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            events: "events".to_string(),
            attendees: "attendees".to_string(),
            tasks: "tasks".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: String,
    /// Absolute directory for rolling log files; logging stays off when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level().to_string(),
            dir: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    pub storage: StorageConfig,
    pub tables: TableNames,
    pub logging: LoggingConfig,
}

impl DashboardConfig {
    /// Loads `path`, returning defaults when the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Renders the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Rebases relative storage paths onto `base`.
    pub fn resolve_relative_to(mut self, base: &Path) -> Self {
        if self.storage.data_dir.is_relative() {
            self.storage.data_dir = base.join(&self.storage.data_dir);
        }
        if self.storage.database.is_relative() {
            self.storage.database = base.join(&self.storage.database);
        }
        self
    }

    /// Opens the configured backend.
    pub fn open_store(&self) -> StoreResult<Box<dyn TableStore>> {
        match self.storage.backend {
            Backend::Csv => Ok(Box::new(CsvTableStore::open(&self.storage.data_dir)?)),
            Backend::Sqlite => {
                if let Some(parent) = self.storage.database.parent() {
                    if !parent.as_os_str().is_empty() {
                        std::fs::create_dir_all(parent).map_err(|source| {
                            crate::store::StoreError::Io {
                                table: String::new(),
                                source,
                            }
                        })?;
                    }
                }
                Ok(Box::new(SqliteTableStore::open(&self.storage.database)?))
            }
        }
    }

    /// Writes a commented default config to `path`, creating parent dirs.
    pub fn write_default(path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let io_err = |source: std::io::Error| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(path, default_template()).map_err(io_err)
    }
}

/// Default config file body with every option commented out.
pub fn default_template() -> String {
    format!(
        "\
# eventdash configuration

[storage]
# Where tables live: \"csv\" (one file per table) or \"sqlite\".
# backend = \"csv\"
# data_dir = \"{DEFAULT_DATA_DIR}\"
# database = \"{DEFAULT_DATABASE}\"

[tables]
# events = \"events\"
# attendees = \"attendees\"
# tasks = \"tasks\"

[logging]
# level = \"{}\"
# dir = \"/absolute/path/to/logs\"
",
        default_log_level()
    )
}
