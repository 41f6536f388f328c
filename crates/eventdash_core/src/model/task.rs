//! Task domain model.
//!
//! # Invariants
//! - A task is addressed by `(event_id, task_name)`; names may repeat within
//!   one event and status updates then apply to every match.
//! - `deadline` is opaque date text.

use crate::model::event::EventId;
use crate::model::Category;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Storage columns for the tasks table, in write order.
pub const TASK_COLUMNS: [&str; 5] = ["event_id", "task_name", "status", "deadline", "priority"];

/// Task lifecycle state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(into = "String", from = "String")]
pub enum TaskStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
    Delayed,
    Other(String),
}

impl TaskStatus {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl Category for TaskStatus {
    fn declared() -> Vec<Self> {
        vec![
            Self::NotStarted,
            Self::InProgress,
            Self::Completed,
            Self::Delayed,
        ]
    }

    fn label(&self) -> &str {
        match self {
            Self::NotStarted => "Not Started",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::Delayed => "Delayed",
            Self::Other(value) => value.as_str(),
        }
    }

    fn from_label(label: &str) -> Self {
        let label = label.trim();
        match label {
            "Not Started" => Self::NotStarted,
            "In Progress" => Self::InProgress,
            "Completed" => Self::Completed,
            "Delayed" => Self::Delayed,
            _ => Self::Other(label.to_string()),
        }
    }
}

impl Display for TaskStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for TaskStatus {
    fn from(value: String) -> Self {
        Self::from_label(&value)
    }
}

impl From<TaskStatus> for String {
    fn from(value: TaskStatus) -> Self {
        value.label().to_string()
    }
}

/// Task urgency. `Medium` when the caller does not pick one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(into = "String", from = "String")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Other(String),
}

impl Category for Priority {
    fn declared() -> Vec<Self> {
        vec![Self::Low, Self::Medium, Self::High]
    }

    fn label(&self) -> &str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Other(value) => value.as_str(),
        }
    }

    fn from_label(label: &str) -> Self {
        let label = label.trim();
        match label {
            "Low" => Self::Low,
            "Medium" => Self::Medium,
            "High" => Self::High,
            _ => Self::Other(label.to_string()),
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for Priority {
    fn from(value: String) -> Self {
        Self::from_label(&value)
    }
}

impl From<Priority> for String {
    fn from(value: Priority) -> Self {
        value.label().to_string()
    }
}

/// A to-do item tied to one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub event_id: EventId,
    pub task_name: String,
    pub status: TaskStatus,
    /// ISO-like date text.
    pub deadline: String,
    pub priority: Priority,
}

/// Request model for creating a task.
///
/// `priority = None` stores the default `Medium`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub event_id: EventId,
    pub task_name: String,
    pub status: TaskStatus,
    pub deadline: String,
    pub priority: Option<Priority>,
}

impl NewTask {
    pub fn new(event_id: EventId, task_name: impl Into<String>, deadline: impl Into<String>) -> Self {
        Self {
            event_id,
            task_name: task_name.into(),
            status: TaskStatus::default(),
            deadline: deadline.into(),
            priority: None,
        }
    }

    pub fn status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn into_task(self) -> Task {
        Task {
            event_id: self.event_id,
            task_name: self.task_name,
            status: self.status,
            deadline: self.deadline,
            priority: self.priority.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{NewTask, Priority, TaskStatus};
    use crate::model::Category;

    #[test]
    fn priority_defaults_to_medium() {
        let task = NewTask::new(1, "Book venue", "2025-05-01").into_task();
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.status, TaskStatus::NotStarted);
    }

    #[test]
    fn multi_word_labels_roundtrip() {
        for status in TaskStatus::declared() {
            assert_eq!(TaskStatus::from_label(status.label()), status);
        }
        assert_eq!(TaskStatus::InProgress.label(), "In Progress");
    }

    #[test]
    fn declared_order_is_stable() {
        assert_eq!(TaskStatus::Completed.rank(), Some(2));
        assert_eq!(Priority::High.rank(), Some(2));
    }
}
