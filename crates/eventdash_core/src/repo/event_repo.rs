//! Event repository over the events table.
//!
//! # Invariants
//! - Missing declared columns read as empty text.
//! - `add_event` assigns `max(id) + 1`, or 1 for an empty table, and rewrites
//!   the `id` column in canonical integer form.
//! - When `max(id)` is `i64::MAX` the add fails and nothing is written.

use crate::model::event::{Event, EventId, NewEvent, EVENT_COLUMNS};
use crate::repo::{RepoError, RepoResult};
use crate::store::{cell, coerce_id, Row, TableStore};
use log::{info, warn};

/// Repository interface for events.
pub trait EventRepository {
    fn list_events(&self) -> RepoResult<Vec<Event>>;
    fn get_event(&self, id: EventId) -> RepoResult<Option<Event>>;
    fn add_event(&self, event: NewEvent) -> RepoResult<Event>;
    /// Removes the event row(s) with `id`; returns rows removed.
    fn delete_event_row(&self, id: EventId) -> RepoResult<usize>;
}

/// Event repository backed by a named table.
pub struct TableEventRepository<'s, S: TableStore + ?Sized> {
    store: &'s S,
    table: &'s str,
}

impl<'s, S: TableStore + ?Sized> TableEventRepository<'s, S> {
    pub fn new(store: &'s S, table: &'s str) -> Self {
        Self { store, table }
    }
}

impl<S: TableStore + ?Sized> EventRepository for TableEventRepository<'_, S> {
    fn list_events(&self) -> RepoResult<Vec<Event>> {
        let data = self.store.load(self.table)?;
        Ok(data.rows.iter().map(parse_event_row).collect())
    }

    fn get_event(&self, id: EventId) -> RepoResult<Option<Event>> {
        Ok(self
            .list_events()?
            .into_iter()
            .find(|event| event.id == id))
    }

    fn add_event(&self, event: NewEvent) -> RepoResult<Event> {
        let mut data = self.store.load(self.table)?;
        let expected = data.revision();
        data.ensure_columns(&EVENT_COLUMNS);

        for row in &mut data.rows {
            let id = coerce_id(cell(row, "id"));
            row.insert("id".to_string(), id.to_string());
        }
        let new_id = match data.rows.iter().map(|row| coerce_id(cell(row, "id"))).max() {
            None => 1,
            Some(max_id) => max_id.checked_add(1).ok_or_else(|| {
                warn!(
                    "event=event_add module=repo status=error table={} error_code=ids_exhausted",
                    self.table
                );
                RepoError::IdsExhausted {
                    table: self.table.to_string(),
                    max_id,
                }
            })?,
        };

        let event = event.into_event(new_id);
        data.push_row(event_to_row(&event));
        self.store.save_if_unchanged(self.table, &data, expected)?;

        info!(
            "event=event_add module=repo status=ok table={} event_id={}",
            self.table, new_id
        );
        Ok(event)
    }

    fn delete_event_row(&self, id: EventId) -> RepoResult<usize> {
        Ok(self.store.delete_where(self.table, "id", id)?)
    }
}

fn parse_event_row(row: &Row) -> Event {
    Event {
        id: coerce_id(cell(row, "id")),
        name: cell(row, "name").to_string(),
        date: cell(row, "date").to_string(),
        time: cell(row, "time").to_string(),
        location: cell(row, "location").to_string(),
        description: cell(row, "description").to_string(),
    }
}

fn event_to_row(event: &Event) -> Row {
    let mut row = Row::new();
    row.insert("id".to_string(), event.id.to_string());
    row.insert("name".to_string(), event.name.clone());
    row.insert("date".to_string(), event.date.clone());
    row.insert("time".to_string(), event.time.clone());
    row.insert("location".to_string(), event.location.clone());
    row.insert("description".to_string(), event.description.clone());
    row
}
