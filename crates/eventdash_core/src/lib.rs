//! Core logic for the EventDash event-management dashboard.
//!
//! Events, guest lists and task tracking over whole-table storage (CSV files
//! or SQLite), plus chart-ready aggregation.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod report;
pub mod repo;
pub mod service;
pub mod store;

pub use config::{Backend, ConfigError, DashboardConfig, TableNames};
pub use logging::{
    default_log_level, init_logging, init_logging_from, logging_status, LoggingError,
};
pub use model::attendee::{Attendee, RsvpStatus};
pub use model::event::{Event, EventId, NewEvent};
pub use model::task::{NewTask, Priority, Task, TaskStatus};
pub use model::Category;
pub use report::{BreakdownChart, CategorySlice, ChartKind, TimelineChart, TimelinePoint};
pub use repo::{CascadeReport, ErrorKind, RepoError, RepoResult};
pub use service::dashboard::EventDashboard;
pub use store::{
    CsvTableStore, Revision, Row, SqliteTableStore, StoreError, StoreResult, Table, TableStore,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
