//! Attendee repository over the attendees table.
//!
//! # Invariants
//! - A table without an `event_id` column lists as empty.
//! - Appends keep every existing row verbatim.

use crate::model::attendee::{Attendee, RsvpStatus, ATTENDEE_COLUMNS};
use crate::model::event::EventId;
use crate::model::Category;
use crate::repo::RepoResult;
use crate::store::{cell, coerce_id, Row, TableStore};
use log::info;

/// Repository interface for attendees.
pub trait AttendeeRepository {
    /// Lists attendees, optionally only those of one event.
    fn list_attendees(&self, event_id: Option<EventId>) -> RepoResult<Vec<Attendee>>;
    fn add_attendee(&self, attendee: &Attendee) -> RepoResult<()>;
    /// Removes every attendee of `event_id`; returns rows removed.
    fn delete_for_event(&self, event_id: EventId) -> RepoResult<usize>;
}

/// Attendee repository backed by a named table.
pub struct TableAttendeeRepository<'s, S: TableStore + ?Sized> {
    store: &'s S,
    table: &'s str,
}

impl<'s, S: TableStore + ?Sized> TableAttendeeRepository<'s, S> {
    pub fn new(store: &'s S, table: &'s str) -> Self {
        Self { store, table }
    }
}

impl<S: TableStore + ?Sized> AttendeeRepository for TableAttendeeRepository<'_, S> {
    fn list_attendees(&self, event_id: Option<EventId>) -> RepoResult<Vec<Attendee>> {
        let data = self.store.load(self.table)?;
        if data.is_empty() || !data.has_column("event_id") {
            return Ok(Vec::new());
        }

        Ok(data
            .rows
            .iter()
            .map(parse_attendee_row)
            .filter(|attendee| event_id.map_or(true, |wanted| attendee.event_id == wanted))
            .collect())
    }

    fn add_attendee(&self, attendee: &Attendee) -> RepoResult<()> {
        let mut data = self.store.load(self.table)?;
        let expected = data.revision();
        data.ensure_columns(&ATTENDEE_COLUMNS);
        data.push_row(attendee_to_row(attendee));
        self.store.save_if_unchanged(self.table, &data, expected)?;

        info!(
            "event=attendee_add module=repo status=ok table={} event_id={} rows={}",
            self.table,
            attendee.event_id,
            data.len()
        );
        Ok(())
    }

    fn delete_for_event(&self, event_id: EventId) -> RepoResult<usize> {
        Ok(self.store.delete_where(self.table, "event_id", event_id)?)
    }
}

fn parse_attendee_row(row: &Row) -> Attendee {
    Attendee {
        event_id: coerce_id(cell(row, "event_id")),
        name: cell(row, "name").to_string(),
        email: cell(row, "email").to_string(),
        rsvp: RsvpStatus::from_label(cell(row, "rsvp")),
        role: cell(row, "role").to_string(),
        dietary: cell(row, "dietary").to_string(),
    }
}

fn attendee_to_row(attendee: &Attendee) -> Row {
    let mut row = Row::new();
    row.insert("event_id".to_string(), attendee.event_id.to_string());
    row.insert("name".to_string(), attendee.name.clone());
    row.insert("email".to_string(), attendee.email.clone());
    row.insert("rsvp".to_string(), attendee.rsvp.label().to_string());
    row.insert("role".to_string(), attendee.role.clone());
    row.insert("dietary".to_string(), attendee.dietary.clone());
    row
}
