//! Task repository over the tasks table.
//!
//! # Invariants
//! - Tasks are addressed by `(event_id, task_name)`; a status update applies
//!   to every matching row, not only the first.
//! - Status updates rewrite `event_id` in canonical integer form.

use crate::model::event::EventId;
use crate::model::task::{NewTask, Priority, Task, TaskStatus, TASK_COLUMNS};
use crate::model::Category;
use crate::repo::{RepoError, RepoResult};
use crate::store::{cell, coerce_id, Row, TableStore};
use log::{info, warn};

/// Repository interface for tasks.
pub trait TaskRepository {
    fn list_tasks(&self, event_id: Option<EventId>) -> RepoResult<Vec<Task>>;
    fn add_task(&self, task: NewTask) -> RepoResult<Task>;
    /// Sets `status` on every task named `task_name` under `event_id`.
    ///
    /// Returns the number of rows updated, or `TaskNotFound` when none match.
    fn update_task_status(
        &self,
        event_id: EventId,
        task_name: &str,
        status: &TaskStatus,
    ) -> RepoResult<usize>;
    fn delete_for_event(&self, event_id: EventId) -> RepoResult<usize>;
}

/// Task repository backed by a named table.
pub struct TableTaskRepository<'s, S: TableStore + ?Sized> {
    store: &'s S,
    table: &'s str,
}

impl<'s, S: TableStore + ?Sized> TableTaskRepository<'s, S> {
    pub fn new(store: &'s S, table: &'s str) -> Self {
        Self { store, table }
    }
}

impl<S: TableStore + ?Sized> TaskRepository for TableTaskRepository<'_, S> {
    fn list_tasks(&self, event_id: Option<EventId>) -> RepoResult<Vec<Task>> {
        let data = self.store.load(self.table)?;
        if data.is_empty() || !data.has_column("event_id") {
            return Ok(Vec::new());
        }

        Ok(data
            .rows
            .iter()
            .map(parse_task_row)
            .filter(|task| event_id.map_or(true, |wanted| task.event_id == wanted))
            .collect())
    }

    fn add_task(&self, task: NewTask) -> RepoResult<Task> {
        let mut data = self.store.load(self.table)?;
        let expected = data.revision();
        data.ensure_columns(&TASK_COLUMNS);

        let task = task.into_task();
        data.push_row(task_to_row(&task));
        self.store.save_if_unchanged(self.table, &data, expected)?;

        info!(
            "event=task_add module=repo status=ok table={} event_id={} rows={}",
            self.table,
            task.event_id,
            data.len()
        );
        Ok(task)
    }

    fn update_task_status(
        &self,
        event_id: EventId,
        task_name: &str,
        status: &TaskStatus,
    ) -> RepoResult<usize> {
        let mut data = self.store.load(self.table)?;
        let expected = data.revision();

        if data.has_column("event_id") {
            for row in &mut data.rows {
                let id = coerce_id(cell(row, "event_id"));
                row.insert("event_id".to_string(), id.to_string());
            }
        }

        let mut matched = 0;
        for row in &mut data.rows {
            if coerce_id(cell(row, "event_id")) == event_id && cell(row, "task_name") == task_name
            {
                row.insert("status".to_string(), status.label().to_string());
                matched += 1;
            }
        }

        if matched == 0 {
            warn!(
                "event=task_status_update module=repo status=not_found table={} event_id={}",
                self.table, event_id
            );
            return Err(RepoError::TaskNotFound {
                event_id,
                task_name: task_name.to_string(),
            });
        }

        data.ensure_columns(&["status"]);
        self.store.save_if_unchanged(self.table, &data, expected)?;
        info!(
            "event=task_status_update module=repo status=ok table={} event_id={} matched={}",
            self.table, event_id, matched
        );
        Ok(matched)
    }

    fn delete_for_event(&self, event_id: EventId) -> RepoResult<usize> {
        Ok(self.store.delete_where(self.table, "event_id", event_id)?)
    }
}

fn parse_task_row(row: &Row) -> Task {
    Task {
        event_id: coerce_id(cell(row, "event_id")),
        task_name: cell(row, "task_name").to_string(),
        status: TaskStatus::from_label(cell(row, "status")),
        deadline: cell(row, "deadline").to_string(),
        priority: Priority::from_label(cell(row, "priority")),
    }
}

fn task_to_row(task: &Task) -> Row {
    let mut row = Row::new();
    row.insert("event_id".to_string(), task.event_id.to_string());
    row.insert("task_name".to_string(), task.task_name.clone());
    row.insert("status".to_string(), task.status.label().to_string());
    row.insert("deadline".to_string(), task.deadline.clone());
    row.insert("priority".to_string(), task.priority.label().to_string());
    row
}
