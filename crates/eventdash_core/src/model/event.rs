//! Event domain model.
//!
//! # Invariants
//! - `id` is a small positive integer, unique within the events table.
//! - New ids are assigned as `max(existing) + 1`, starting at 1.
//! - Date and time are opaque text; only reporting attempts to parse them.

use serde::{Deserialize, Serialize};

/// Integer identifier shared by events and the `event_id` foreign keys.
pub type EventId = i64;

/// Storage columns for the events table, in write order.
pub const EVENT_COLUMNS: [&str; 6] = ["id", "name", "date", "time", "location", "description"];

/// A scheduled happening that owns attendees and tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub name: String,
    /// ISO-like date text, e.g. `2025-06-01`.
    pub date: String,
    /// Time of day text, e.g. `18:30:00`.
    pub time: String,
    pub location: String,
    pub description: String,
}

/// Request model for creating an event; the id is assigned on insert.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewEvent {
    pub name: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub description: String,
}

impl NewEvent {
    pub fn new(name: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            date: date.into(),
            ..Self::default()
        }
    }

    pub fn time(mut self, time: impl Into<String>) -> Self {
        self.time = time.into();
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Materializes the event with its assigned id.
    pub fn into_event(self, id: EventId) -> Event {
        Event {
            id,
            name: self.name,
            date: self.date,
            time: self.time,
            location: self.location,
            description: self.description,
        }
    }
}
