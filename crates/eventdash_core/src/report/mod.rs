//! Chart-ready aggregation over attendees and tasks.
//!
//! # Responsibility
//! - Count categorical values per event (RSVP, task status).
//! - Correlate task deadlines against the event date.
//!
//! # Invariants
//! - Empty input yields `None` ("no chart"), never an empty chart.
//! - Category order is the declared enum order, then unknown labels
//!   alphabetically. Storage order and frequency never affect output order.
//! - Blank labels are not counted.

use crate::model::attendee::Attendee;
use crate::model::task::Task;
use crate::model::Category;
use serde::Serialize;

pub mod render;
pub mod timeline;

pub use timeline::{build_timeline, parse_date, TimelineChart, TimelinePoint};

/// Bar colors, cycled in category order.
pub const BAR_PALETTE: [&str; 3] = ["#FF4B4B", "#FFA500", "#4CAF50"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// Proportions of a whole (donut/pie).
    Pie,
    /// One bar per category, labeled with its count.
    Bar,
}

/// One category of a breakdown chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySlice {
    pub label: String,
    pub count: usize,
    /// Fraction of the chart total in `0.0..=1.0`.
    pub share: f64,
    /// Text drawn on the slice (percentage) or above the bar (count).
    pub annotation: String,
    pub color: Option<String>,
}

/// Counts grouped by one categorical field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownChart {
    pub kind: ChartKind,
    pub title: String,
    pub total: usize,
    pub categories: Vec<CategorySlice>,
}

impl BreakdownChart {
    pub fn count_of(&self, label: &str) -> usize {
        self.categories
            .iter()
            .find(|slice| slice.label == label)
            .map_or(0, |slice| slice.count)
    }

    pub fn labels(&self) -> Vec<&str> {
        self.categories
            .iter()
            .map(|slice| slice.label.as_str())
            .collect()
    }
}

/// Counts occurrences per category in deterministic order.
pub fn count_by<C: Category>(values: impl IntoIterator<Item = C>) -> Vec<(C, usize)> {
    let mut counts: Vec<(C, usize)> = Vec::new();
    for value in values {
        if value.label().trim().is_empty() {
            continue;
        }
        match counts.iter_mut().find(|(seen, _)| *seen == value) {
            Some((_, count)) => *count += 1,
            None => counts.push((value, 1)),
        }
    }

    counts.sort_by(|(left, _), (right, _)| match (left.rank(), right.rank()) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => left.label().cmp(right.label()),
    });
    counts
}

/// RSVP proportions for one event's attendees. `None` when there are none.
pub fn rsvp_breakdown(attendees: &[Attendee]) -> Option<BreakdownChart> {
    let counts = count_by(attendees.iter().map(|attendee| attendee.rsvp.clone()));
    build_breakdown(ChartKind::Pie, "RSVP Status", counts)
}

/// Task counts per status for one event. `None` when there are no tasks.
pub fn task_status_breakdown(tasks: &[Task]) -> Option<BreakdownChart> {
    let counts = count_by(tasks.iter().map(|task| task.status.clone()));
    build_breakdown(ChartKind::Bar, "Task Status", counts)
}

fn build_breakdown<C: Category>(
    kind: ChartKind,
    title: &str,
    counts: Vec<(C, usize)>,
) -> Option<BreakdownChart> {
    let total: usize = counts.iter().map(|(_, count)| count).sum();
    if total == 0 {
        return None;
    }

    let categories = counts
        .into_iter()
        .enumerate()
        .map(|(index, (category, count))| {
            let share = count as f64 / total as f64;
            let (annotation, color) = match kind {
                ChartKind::Pie => (format!("{:.1}%", share * 100.0), None),
                ChartKind::Bar => (
                    count.to_string(),
                    Some(BAR_PALETTE[index % BAR_PALETTE.len()].to_string()),
                ),
            };
            CategorySlice {
                label: category.label().to_string(),
                count,
                share,
                annotation,
                color,
            }
        })
        .collect();

    Some(BreakdownChart {
        kind,
        title: title.to_string(),
        total,
        categories,
    })
}
