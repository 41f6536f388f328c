//! Entity repositories over whole-table storage.
//!
//! # Responsibility
//! - Map stored rows to typed events, attendees and tasks.
//! - Implement append and status mutation as read-modify-write cycles.
//!
//! # Invariants
//! - Identifier columns are coerced to integers on every read.
//! - Every write goes through `save_if_unchanged` with the revision observed
//!   at load time; a concurrent change surfaces as a conflict.
//! - Repository APIs return typed errors; callers branch on [`ErrorKind`].

use crate::model::event::EventId;
use crate::store::StoreError;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod attendee_repo;
pub mod event_repo;
pub mod task_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Coarse failure category for caller branching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Backing store unreachable, unreadable or unwritable.
    Storage,
    /// Lookup by business key matched nothing.
    NotFound,
    /// Another writer changed the table between read and write.
    Conflict,
    /// A cascade delete stopped after some tables were already rewritten.
    PartialCascade,
    /// Stored rows rule out the requested write.
    InvalidData,
}

/// Rows removed by one cascade delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CascadeReport {
    pub event_id: EventId,
    pub events_removed: usize,
    pub attendees_removed: usize,
    pub tasks_removed: usize,
}

/// Repository error for dashboard persistence and lookups.
#[derive(Debug)]
pub enum RepoError {
    Store(StoreError),
    TaskNotFound {
        event_id: EventId,
        task_name: String,
    },
    PartialCascade {
        /// Steps that finished before the failure.
        completed: CascadeReport,
        failed_table: String,
        source: StoreError,
    },
    /// The largest stored id has no successor.
    IdsExhausted { table: String, max_id: EventId },
}

impl RepoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Store(StoreError::Conflict { .. }) => ErrorKind::Conflict,
            Self::Store(_) => ErrorKind::Storage,
            Self::TaskNotFound { .. } => ErrorKind::NotFound,
            Self::PartialCascade { .. } => ErrorKind::PartialCascade,
            Self::IdsExhausted { .. } => ErrorKind::InvalidData,
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::TaskNotFound {
                event_id,
                task_name,
            } => write!(f, "task `{task_name}` not found for event {event_id}"),
            Self::PartialCascade {
                completed,
                failed_table,
                source,
            } => write!(
                f,
                "delete of event {} stopped at table `{}` (removed {} event rows, {} attendees, {} tasks): {}",
                completed.event_id,
                failed_table,
                completed.events_removed,
                completed.attendees_removed,
                completed.tasks_removed,
                source
            ),
            Self::IdsExhausted { table, max_id } => write!(
                f,
                "table `{table}` already holds id {max_id}; no larger id is available"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::TaskNotFound { .. } | Self::IdsExhausted { .. } => None,
            Self::PartialCascade { source, .. } => Some(source),
        }
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}
