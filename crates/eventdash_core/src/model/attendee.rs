//! Attendee (guest list) domain model.
//!
//! # Invariants
//! - Attendees have no identifier of their own; duplicates are allowed.
//! - `event_id` is not checked against the events table; orphans are tolerated.

use crate::model::event::EventId;
use crate::model::Category;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Storage columns for the attendees table, in write order.
pub const ATTENDEE_COLUMNS: [&str; 6] = ["event_id", "name", "email", "rsvp", "role", "dietary"];

/// Guest confirmation state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(into = "String", from = "String")]
pub enum RsvpStatus {
    #[default]
    Pending,
    Confirmed,
    Declined,
    /// Label written by another tool; kept as-is.
    Other(String),
}

impl Category for RsvpStatus {
    fn declared() -> Vec<Self> {
        vec![Self::Pending, Self::Confirmed, Self::Declined]
    }

    fn label(&self) -> &str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Declined => "Declined",
            Self::Other(value) => value.as_str(),
        }
    }

    fn from_label(label: &str) -> Self {
        let label = label.trim();
        match label {
            "Pending" => Self::Pending,
            "Confirmed" => Self::Confirmed,
            "Declined" => Self::Declined,
            _ => Self::Other(label.to_string()),
        }
    }
}

impl Display for RsvpStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for RsvpStatus {
    fn from(value: String) -> Self {
        Self::from_label(&value)
    }
}

impl From<RsvpStatus> for String {
    fn from(value: RsvpStatus) -> Self {
        value.label().to_string()
    }
}

/// A guest record tied to one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendee {
    pub event_id: EventId,
    pub name: String,
    pub email: String,
    pub rsvp: RsvpStatus,
    /// Free text such as `Guest` or `Speaker`.
    pub role: String,
    /// Free text dietary restrictions.
    pub dietary: String,
}

impl Attendee {
    pub fn new(event_id: EventId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            event_id,
            name: name.into(),
            email: email.into(),
            rsvp: RsvpStatus::default(),
            role: String::new(),
            dietary: String::new(),
        }
    }

    pub fn rsvp(mut self, rsvp: RsvpStatus) -> Self {
        self.rsvp = rsvp;
        self
    }

    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    pub fn dietary(mut self, dietary: impl Into<String>) -> Self {
        self.dietary = dietary.into();
        self
    }
}
