//! Task deadlines against the event date on one date axis.

use crate::model::event::Event;
use crate::model::task::Task;
use crate::model::Category;
use chrono::NaiveDate;
use serde::Serialize;

pub const COMPLETED_COLOR: &str = "#4CAF50";
pub const OPEN_COLOR: &str = "#FF4B4B";
pub const REFERENCE_LABEL: &str = "Event Date";

/// One task marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelinePoint {
    pub task_name: String,
    pub deadline: NaiveDate,
    pub status: String,
    pub completed: bool,
    pub color: String,
    /// Positive when the deadline falls before the event date.
    pub days_before_event: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineChart {
    pub title: String,
    pub event_date: NaiveDate,
    pub reference_label: String,
    /// Sorted by deadline, then task name.
    pub points: Vec<TimelinePoint>,
    /// Tasks left out because their deadline did not parse.
    pub skipped: usize,
}

impl TimelineChart {
    /// Inclusive date range covering the reference line and every marker.
    pub fn axis_range(&self) -> (NaiveDate, NaiveDate) {
        self.points.iter().fold(
            (self.event_date, self.event_date),
            |(start, end), point| (start.min(point.deadline), end.max(point.deadline)),
        )
    }

    /// Tasks due after the event itself.
    pub fn overdue_points(&self) -> impl Iterator<Item = &TimelinePoint> {
        self.points.iter().filter(|point| point.days_before_event < 0)
    }
}

/// Builds the timeline for `event`.
///
/// Returns `None` when the event date does not parse or no task has a
/// parseable deadline.
pub fn build_timeline(event: &Event, tasks: &[Task]) -> Option<TimelineChart> {
    let event_date = parse_date(&event.date)?;

    let mut skipped = 0;
    let mut points = Vec::with_capacity(tasks.len());
    for task in tasks {
        let Some(deadline) = parse_date(&task.deadline) else {
            skipped += 1;
            continue;
        };
        let completed = task.status.is_completed();
        points.push(TimelinePoint {
            task_name: task.task_name.clone(),
            deadline,
            status: task.status.label().to_string(),
            completed,
            color: if completed { COMPLETED_COLOR } else { OPEN_COLOR }.to_string(),
            days_before_event: (event_date - deadline).num_days(),
        });
    }
    if points.is_empty() {
        return None;
    }

    points.sort_by(|left, right| {
        left.deadline
            .cmp(&right.deadline)
            .then_with(|| left.task_name.cmp(&right.task_name))
    });

    Some(TimelineChart {
        title: format!("Task Timeline: {}", event.name),
        event_date,
        reference_label: REFERENCE_LABEL.to_string(),
        points,
        skipped,
    })
}

/// Parses ISO-like date text, ignoring any trailing time part.
///
/// Accepts `2025-06-01`, `2025-06-01 18:00:00`, `2025-06-01T18:00` and
/// `2025/06/01`.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let date_part = text
        .trim()
        .split(['T', ' '])
        .next()
        .filter(|part| !part.is_empty())?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(date_part, "%Y/%m/%d"))
        .ok()
}
