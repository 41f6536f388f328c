//! Plain-text rendering of charts for terminals and logs-free previews.

use super::timeline::TimelineChart;
use super::{BreakdownChart, ChartKind};
use std::fmt::Write;

const BAR_WIDTH: usize = 30;

/// Renders a breakdown as horizontal bars.
///
/// Pie charts show the percentage annotation next to the count; bar charts
/// show the count annotation.
pub fn render_breakdown(chart: &BreakdownChart) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} (total {})", chart.title, chart.total);

    let label_width = chart
        .categories
        .iter()
        .map(|slice| slice.label.chars().count())
        .max()
        .unwrap_or(0);
    let max_count = chart
        .categories
        .iter()
        .map(|slice| slice.count)
        .max()
        .unwrap_or(0)
        .max(1);

    for slice in &chart.categories {
        let width = (slice.count * BAR_WIDTH).div_ceil(max_count);
        let bar = "#".repeat(width);
        let _ = match chart.kind {
            ChartKind::Pie => writeln!(
                out,
                "  {:<label_width$}  {:<BAR_WIDTH$}  {} ({})",
                slice.label, bar, slice.count, slice.annotation
            ),
            ChartKind::Bar => writeln!(
                out,
                "  {:<label_width$}  {:<BAR_WIDTH$}  {}",
                slice.label, bar, slice.annotation
            ),
        };
    }
    out
}

/// Renders a timeline as a date-ordered list with the event date inlined.
pub fn render_timeline(chart: &TimelineChart) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", chart.title);

    let mut reference_written = false;
    for point in &chart.points {
        if !reference_written && point.deadline > chart.event_date {
            write_reference(&mut out, chart);
            reference_written = true;
        }
        let marker = if point.completed { "[x]" } else { "[ ]" };
        let _ = writeln!(
            out,
            "  {}  {} {}  ({}, {})",
            point.deadline,
            marker,
            point.task_name,
            point.status,
            relative_days(point.days_before_event)
        );
    }
    if !reference_written {
        write_reference(&mut out, chart);
    }
    if chart.skipped > 0 {
        let _ = writeln!(out, "  ({} task(s) without a readable deadline)", chart.skipped);
    }
    out
}

fn write_reference(out: &mut String, chart: &TimelineChart) {
    let _ = writeln!(
        out,
        "  {}  ---- {} ----",
        chart.event_date, chart.reference_label
    );
}

fn relative_days(days_before_event: i64) -> String {
    match days_before_event {
        0 => "on the day".to_string(),
        1 => "1 day before".to_string(),
        -1 => "1 day after".to_string(),
        days if days > 0 => format!("{days} days before"),
        days => format!("{} days after", -days),
    }
}
