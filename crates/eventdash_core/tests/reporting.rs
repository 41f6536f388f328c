use chrono::NaiveDate;
use eventdash_core::report::render::render_breakdown;
use eventdash_core::{
    Attendee, ChartKind, CsvTableStore, EventDashboard, NewEvent, NewTask, RsvpStatus,
    SqliteTableStore, TaskStatus,
};
use std::fs;

fn dashboard_with_event() -> EventDashboard<SqliteTableStore> {
    let dashboard = EventDashboard::new(SqliteTableStore::open_in_memory().unwrap());
    dashboard
        .add_event(NewEvent::new("Gala", "2025-06-01"))
        .unwrap();
    dashboard
}

#[test]
fn charts_are_absent_without_data() {
    let dashboard = dashboard_with_event();

    assert!(dashboard.rsvp_chart(1).unwrap().is_none());
    assert!(dashboard.task_status_chart(1).unwrap().is_none());
    assert!(dashboard.timeline_chart(1).unwrap().is_none());
    assert!(dashboard.timeline_chart(99).unwrap().is_none());
}

#[test]
fn rsvp_chart_counts_only_the_requested_event() {
    let dashboard = dashboard_with_event();
    for (event_id, rsvp) in [
        (1, RsvpStatus::Confirmed),
        (1, RsvpStatus::Confirmed),
        (1, RsvpStatus::Declined),
        (1, RsvpStatus::Pending),
        (2, RsvpStatus::Declined),
    ] {
        dashboard
            .add_attendee(&Attendee::new(event_id, "guest", "guest@x.com").rsvp(rsvp))
            .unwrap();
    }

    let chart = dashboard.rsvp_chart(1).unwrap().unwrap();
    assert_eq!(chart.kind, ChartKind::Pie);
    assert_eq!(chart.total, 4);
    assert_eq!(chart.labels(), vec!["Pending", "Confirmed", "Declined"]);
    assert_eq!(chart.count_of("Confirmed"), 2);
    assert_eq!(chart.count_of("Declined"), 1);
    assert_eq!(chart.categories[1].annotation, "50.0%");
    assert!((chart.categories.iter().map(|slice| slice.share).sum::<f64>() - 1.0).abs() < 1e-9);
}

#[test]
fn task_status_chart_omits_statuses_with_no_tasks() {
    let dashboard = dashboard_with_event();
    for (name, status) in [
        ("Venue", TaskStatus::Completed),
        ("Catering", TaskStatus::InProgress),
        ("Music", TaskStatus::InProgress),
    ] {
        dashboard
            .add_task(NewTask::new(1, name, "2025-05-20").status(status))
            .unwrap();
    }

    let chart = dashboard.task_status_chart(1).unwrap().unwrap();
    assert_eq!(chart.kind, ChartKind::Bar);
    assert_eq!(chart.labels(), vec!["In Progress", "Completed"]);
    assert_eq!(chart.categories[0].annotation, "2");
    assert_eq!(chart.categories[0].color.as_deref(), Some("#FF4B4B"));
    assert_eq!(chart.count_of("Not Started"), 0);

    let text = render_breakdown(&chart);
    assert!(text.starts_with("Task Status (total 3)"));
}

#[test]
fn unknown_statuses_from_storage_are_charted_after_known_ones() {
    let dir = tempfile::tempdir().unwrap();
    let store = CsvTableStore::open(dir.path()).unwrap();
    fs::write(
        store.table_path("tasks"),
        "event_id,task_name,status,deadline,priority\n\
         1,a,Blocked,2025-05-01,High\n\
         1,b,Delayed,2025-05-01,High\n\
         1,c,,2025-05-01,High\n",
    )
    .unwrap();

    let dashboard = EventDashboard::new(store);
    let chart = dashboard.task_status_chart(1).unwrap().unwrap();
    assert_eq!(chart.labels(), vec!["Delayed", "Blocked"]);
    assert_eq!(chart.total, 2);
}

#[test]
fn timeline_chart_orders_deadlines_and_marks_completion() {
    let dashboard = dashboard_with_event();
    dashboard
        .add_task(NewTask::new(1, "Thank-you notes", "2025-06-05"))
        .unwrap();
    dashboard
        .add_task(
            NewTask::new(1, "Book venue", "2025-05-01 00:00:00").status(TaskStatus::Completed),
        )
        .unwrap();
    dashboard
        .add_task(NewTask::new(1, "Decorations", "soon"))
        .unwrap();

    let chart = dashboard.timeline_chart(1).unwrap().unwrap();
    assert_eq!(chart.title, "Task Timeline: Gala");
    assert_eq!(chart.reference_label, "Event Date");
    assert_eq!(
        chart.event_date,
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    );
    assert_eq!(chart.skipped, 1);

    let names = chart
        .points
        .iter()
        .map(|point| point.task_name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["Book venue", "Thank-you notes"]);
    assert!(chart.points[0].completed);
    assert_eq!(chart.points[0].color, "#4CAF50");
    assert!(!chart.points[1].completed);
    assert_eq!(chart.points[1].color, "#FF4B4B");
    assert_eq!(chart.points[1].days_before_event, -4);
}

#[test]
fn charts_serialize_for_external_renderers() {
    let dashboard = dashboard_with_event();
    dashboard
        .add_attendee(&Attendee::new(1, "Ada", "ada@x.com"))
        .unwrap();

    let chart = dashboard.rsvp_chart(1).unwrap().unwrap();
    let json = serde_json::to_value(&chart).unwrap();
    assert_eq!(json["kind"], "pie");
    assert_eq!(json["title"], "RSVP Status");
    assert_eq!(json["categories"][0]["label"], "Pending");
    assert_eq!(json["categories"][0]["annotation"], "100.0%");
}
