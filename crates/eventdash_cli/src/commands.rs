//! Command handlers: call the dashboard and print the outcome.

use anyhow::{Context, Result};
use eventdash_core::report::render::{render_breakdown, render_timeline};
use eventdash_core::{
    Attendee, DashboardConfig, ErrorKind, EventDashboard, EventId, NewEvent, NewTask, RepoError,
    TableStore, TaskStatus,
};
use std::path::Path;

pub fn config_init(path: &Path) -> Result<()> {
    if path.exists() {
        anyhow::bail!("config already exists at {}", path.display());
    }
    DashboardConfig::write_default(path)?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

pub fn config_show(path: &Path, config: &DashboardConfig) -> Result<()> {
    println!("# {}", path.display());
    print!("{}", config.to_toml()?);
    Ok(())
}

pub fn events_list<S: TableStore>(dashboard: &EventDashboard<S>) -> Result<()> {
    let events = dashboard.list_events()?;
    if events.is_empty() {
        println!("No events found. Create one with `eventdash events add`.");
        return Ok(());
    }
    let rows = events
        .iter()
        .map(|event| {
            vec![
                event.id.to_string(),
                event.name.clone(),
                event.date.clone(),
                event.time.clone(),
                event.location.clone(),
                event.description.clone(),
            ]
        })
        .collect::<Vec<_>>();
    print_table(
        &["id", "name", "date", "time", "location", "description"],
        &rows,
    );
    Ok(())
}

pub fn events_add<S: TableStore>(
    dashboard: &EventDashboard<S>,
    name: String,
    date: String,
    time: String,
    location: String,
    description: String,
) -> Result<()> {
    let event = dashboard.add_event(
        NewEvent::new(name, date)
            .time(time)
            .location(location)
            .description(description),
    )?;
    println!("Created event {} ({})", event.id, event.name);
    Ok(())
}

pub fn events_delete<S: TableStore>(dashboard: &EventDashboard<S>, id: EventId) -> Result<()> {
    match dashboard.delete_event(id) {
        Ok(report) if report.events_removed == 0 => {
            println!(
                "No event {id}; removed {} orphaned attendees and {} orphaned tasks",
                report.attendees_removed, report.tasks_removed
            );
            Ok(())
        }
        Ok(report) => {
            println!(
                "Deleted event {id} with {} attendees and {} tasks",
                report.attendees_removed, report.tasks_removed
            );
            Ok(())
        }
        Err(err) if err.kind() == ErrorKind::PartialCascade => {
            Err(err).context("event deleted but some related rows remain; rerun the delete")
        }
        Err(err) => Err(err.into()),
    }
}

pub fn attendees_list<S: TableStore>(
    dashboard: &EventDashboard<S>,
    event_id: Option<EventId>,
) -> Result<()> {
    let attendees = dashboard.list_attendees(event_id)?;
    if attendees.is_empty() {
        println!("No attendees found.");
        return Ok(());
    }
    let rows = attendees
        .iter()
        .map(|attendee| {
            vec![
                attendee.event_id.to_string(),
                attendee.name.clone(),
                attendee.email.clone(),
                attendee.rsvp.to_string(),
                attendee.role.clone(),
                attendee.dietary.clone(),
            ]
        })
        .collect::<Vec<_>>();
    print_table(
        &["event_id", "name", "email", "rsvp", "role", "dietary"],
        &rows,
    );
    Ok(())
}

pub fn attendees_add<S: TableStore>(
    dashboard: &EventDashboard<S>,
    attendee: &Attendee,
) -> Result<()> {
    warn_if_unknown_event(dashboard, attendee.event_id)?;
    dashboard.add_attendee(attendee)?;
    println!("Added {} to event {}", attendee.name, attendee.event_id);
    Ok(())
}

pub fn tasks_list<S: TableStore>(
    dashboard: &EventDashboard<S>,
    event_id: Option<EventId>,
) -> Result<()> {
    let tasks = dashboard.list_tasks(event_id)?;
    if tasks.is_empty() {
        println!("No tasks found.");
        return Ok(());
    }
    let rows = tasks
        .iter()
        .map(|task| {
            vec![
                task.event_id.to_string(),
                task.task_name.clone(),
                task.status.to_string(),
                task.deadline.clone(),
                task.priority.to_string(),
            ]
        })
        .collect::<Vec<_>>();
    print_table(
        &["event_id", "task_name", "status", "deadline", "priority"],
        &rows,
    );
    Ok(())
}

pub fn tasks_add<S: TableStore>(dashboard: &EventDashboard<S>, task: NewTask) -> Result<()> {
    warn_if_unknown_event(dashboard, task.event_id)?;
    let task = dashboard.add_task(task)?;
    println!(
        "Added task {} ({}, {} priority) to event {}",
        task.task_name, task.status, task.priority, task.event_id
    );
    Ok(())
}

pub fn tasks_update<S: TableStore>(
    dashboard: &EventDashboard<S>,
    event_id: EventId,
    task_name: &str,
    status: &TaskStatus,
) -> Result<()> {
    match dashboard.update_task_status(event_id, task_name, status) {
        Ok(1) => {
            println!("Updated {task_name} to {status}");
            Ok(())
        }
        Ok(matched) => {
            println!("Updated {matched} tasks named {task_name} to {status}");
            Ok(())
        }
        Err(err @ RepoError::TaskNotFound { .. }) => Err(err.into()),
        Err(err) => Err(err).context("task status was not saved"),
    }
}

pub fn chart_rsvp<S: TableStore>(
    dashboard: &EventDashboard<S>,
    event_id: EventId,
    json: bool,
) -> Result<()> {
    match dashboard.rsvp_chart(event_id)? {
        Some(chart) if json => println!("{}", serde_json::to_string_pretty(&chart)?),
        Some(chart) => print!("{}", render_breakdown(&chart)),
        None => println!("No attendee data yet."),
    }
    Ok(())
}

pub fn chart_tasks<S: TableStore>(
    dashboard: &EventDashboard<S>,
    event_id: EventId,
    json: bool,
) -> Result<()> {
    match dashboard.task_status_chart(event_id)? {
        Some(chart) if json => println!("{}", serde_json::to_string_pretty(&chart)?),
        Some(chart) => print!("{}", render_breakdown(&chart)),
        None => println!("No task data yet."),
    }
    Ok(())
}

pub fn chart_timeline<S: TableStore>(
    dashboard: &EventDashboard<S>,
    event_id: EventId,
    json: bool,
) -> Result<()> {
    match dashboard.timeline_chart(event_id)? {
        Some(chart) if json => println!("{}", serde_json::to_string_pretty(&chart)?),
        Some(chart) => print!("{}", render_timeline(&chart)),
        None => println!("No timeline: the event is missing or has no dated tasks."),
    }
    Ok(())
}

/// Orphaned rows are allowed, but the user most likely mistyped the id.
fn warn_if_unknown_event<S: TableStore>(
    dashboard: &EventDashboard<S>,
    event_id: EventId,
) -> Result<()> {
    if dashboard.get_event(event_id)?.is_none() {
        eprintln!("warning: no event with id {event_id}; saving anyway");
    }
    Ok(())
}

fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    let mut widths = headers
        .iter()
        .map(|header| header.chars().count())
        .collect::<Vec<_>>();
    for row in rows {
        for (index, value) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(index) {
                *width = (*width).max(value.chars().count());
            }
        }
    }

    let line = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };
    println!("{}", line(headers.to_vec()));
    for row in rows {
        println!("{}", line(row.iter().map(String::as_str).collect()));
    }
}
