//! Dashboard facade consumed by presentation layers.
//!
//! # Responsibility
//! - Expose every dashboard operation over one injected [`TableStore`].
//! - Orchestrate the cascade delete across the three tables.
//! - Feed repository snapshots into reporting.
//!
//! # Invariants
//! - No state is cached between calls; every call re-reads the store.
//! - Cascade delete runs events, then attendees, then tasks. A failure after
//!   the first step is reported as `PartialCascade` with the finished counts.

use crate::config::TableNames;
use crate::model::attendee::Attendee;
use crate::model::event::{Event, EventId, NewEvent};
use crate::model::task::{NewTask, Task, TaskStatus};
use crate::report::{
    build_timeline, rsvp_breakdown, task_status_breakdown, BreakdownChart, TimelineChart,
};
use crate::repo::attendee_repo::{AttendeeRepository, TableAttendeeRepository};
use crate::repo::event_repo::{EventRepository, TableEventRepository};
use crate::repo::task_repo::{TableTaskRepository, TaskRepository};
use crate::repo::{CascadeReport, RepoError, RepoResult};
use crate::store::TableStore;
use log::{error, info};

/// Entry point for dashboard use-cases.
pub struct EventDashboard<S: TableStore> {
    store: S,
    tables: TableNames,
}

impl<S: TableStore> EventDashboard<S> {
    /// Creates a dashboard over `store` with the default table names.
    pub fn new(store: S) -> Self {
        Self::with_tables(store, TableNames::default())
    }

    pub fn with_tables(store: S, tables: TableNames) -> Self {
        Self { store, tables }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn tables(&self) -> &TableNames {
        &self.tables
    }

    fn events(&self) -> TableEventRepository<'_, S> {
        TableEventRepository::new(&self.store, &self.tables.events)
    }

    fn attendees(&self) -> TableAttendeeRepository<'_, S> {
        TableAttendeeRepository::new(&self.store, &self.tables.attendees)
    }

    fn tasks(&self) -> TableTaskRepository<'_, S> {
        TableTaskRepository::new(&self.store, &self.tables.tasks)
    }

    pub fn list_events(&self) -> RepoResult<Vec<Event>> {
        self.events().list_events()
    }

    pub fn get_event(&self, id: EventId) -> RepoResult<Option<Event>> {
        self.events().get_event(id)
    }

    /// Creates an event and returns it with its assigned id.
    pub fn add_event(&self, event: NewEvent) -> RepoResult<Event> {
        self.events().add_event(event)
    }

    /// Deletes an event and every attendee and task that references it.
    ///
    /// Deleting an id that does not exist still sweeps orphaned rows that
    /// reference it; the report then shows `events_removed == 0`.
    pub fn delete_event(&self, id: EventId) -> RepoResult<CascadeReport> {
        let mut report = CascadeReport {
            event_id: id,
            events_removed: self.events().delete_event_row(id)?,
            ..CascadeReport::default()
        };

        report.attendees_removed = self
            .attendees()
            .delete_for_event(id)
            .map_err(|err| partial_cascade(report, &self.tables.attendees, err))?;
        report.tasks_removed = self
            .tasks()
            .delete_for_event(id)
            .map_err(|err| partial_cascade(report, &self.tables.tasks, err))?;

        info!(
            "event=event_delete module=service status=ok event_id={} events={} attendees={} tasks={}",
            id, report.events_removed, report.attendees_removed, report.tasks_removed
        );
        Ok(report)
    }

    pub fn list_attendees(&self, event_id: Option<EventId>) -> RepoResult<Vec<Attendee>> {
        self.attendees().list_attendees(event_id)
    }

    pub fn add_attendee(&self, attendee: &Attendee) -> RepoResult<()> {
        self.attendees().add_attendee(attendee)
    }

    pub fn list_tasks(&self, event_id: Option<EventId>) -> RepoResult<Vec<Task>> {
        self.tasks().list_tasks(event_id)
    }

    pub fn add_task(&self, task: NewTask) -> RepoResult<Task> {
        self.tasks().add_task(task)
    }

    /// Sets the status of every task named `task_name` in the event.
    ///
    /// Task names are not unique within an event; all matches are updated and
    /// the count is returned.
    pub fn update_task_status(
        &self,
        event_id: EventId,
        task_name: &str,
        status: &TaskStatus,
    ) -> RepoResult<usize> {
        self.tasks().update_task_status(event_id, task_name, status)
    }

    /// RSVP proportions for one event, `None` without attendees.
    pub fn rsvp_chart(&self, event_id: EventId) -> RepoResult<Option<BreakdownChart>> {
        let attendees = self.list_attendees(Some(event_id))?;
        Ok(rsvp_breakdown(&attendees))
    }

    /// Task counts by status for one event, `None` without tasks.
    pub fn task_status_chart(&self, event_id: EventId) -> RepoResult<Option<BreakdownChart>> {
        let tasks = self.list_tasks(Some(event_id))?;
        Ok(task_status_breakdown(&tasks))
    }

    /// Deadlines against the event date, `None` when the event or its tasks
    /// are missing.
    pub fn timeline_chart(&self, event_id: EventId) -> RepoResult<Option<TimelineChart>> {
        let Some(event) = self.get_event(event_id)? else {
            return Ok(None);
        };
        let tasks = self.list_tasks(Some(event_id))?;
        Ok(build_timeline(&event, &tasks))
    }
}

fn partial_cascade(completed: CascadeReport, failed_table: &str, err: RepoError) -> RepoError {
    error!(
        "event=event_delete module=service status=partial event_id={} failed_table={} error={}",
        completed.event_id, failed_table, err
    );
    match err {
        RepoError::Store(source) => RepoError::PartialCascade {
            completed,
            failed_table: failed_table.to_string(),
            source,
        },
        other => other,
    }
}
