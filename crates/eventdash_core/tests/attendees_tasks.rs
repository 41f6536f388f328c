use eventdash_core::{
    Attendee, CsvTableStore, ErrorKind, EventDashboard, NewTask, Priority, RepoError, RsvpStatus,
    SqliteTableStore, TableStore, TaskStatus,
};
use std::fs;

fn csv_dashboard(dir: &tempfile::TempDir) -> EventDashboard<CsvTableStore> {
    EventDashboard::new(CsvTableStore::open(dir.path()).unwrap())
}

#[test]
fn attendee_roundtrips_every_field() {
    let dashboard = EventDashboard::new(SqliteTableStore::open_in_memory().unwrap());
    let attendee = Attendee::new(1, "A", "a@x.com")
        .rsvp(RsvpStatus::Confirmed)
        .role("Guest")
        .dietary("none");
    dashboard.add_attendee(&attendee).unwrap();

    let listed = dashboard.list_attendees(Some(1)).unwrap();
    assert_eq!(listed, vec![attendee]);
}

#[test]
fn attendee_filter_matches_integer_and_float_ids() {
    let dir = tempfile::tempdir().unwrap();
    let dashboard = csv_dashboard(&dir);
    fs::write(
        dashboard.store().table_path("attendees"),
        "event_id,name,email,rsvp,role,dietary\n\
         5,Ada,ada@x.com,Confirmed,Guest,\n\
         5.0,Bob,bob@x.com,Pending,Speaker,vegan\n\
         6,Cy,cy@x.com,Declined,Guest,\n",
    )
    .unwrap();

    let names = dashboard
        .list_attendees(Some(5))
        .unwrap()
        .into_iter()
        .map(|attendee| attendee.name)
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["Ada", "Bob"]);
    assert_eq!(dashboard.list_attendees(None).unwrap().len(), 3);
    assert!(dashboard.list_attendees(Some(7)).unwrap().is_empty());
}

#[test]
fn attendee_table_without_event_id_lists_empty() {
    let dir = tempfile::tempdir().unwrap();
    let dashboard = csv_dashboard(&dir);
    fs::write(
        dashboard.store().table_path("attendees"),
        "name,email\nAda,ada@x.com\n",
    )
    .unwrap();

    assert!(dashboard.list_attendees(None).unwrap().is_empty());
    assert!(dashboard.list_attendees(Some(1)).unwrap().is_empty());
}

#[test]
fn unknown_rsvp_label_is_preserved() {
    let dir = tempfile::tempdir().unwrap();
    let dashboard = csv_dashboard(&dir);
    let attendee =
        Attendee::new(2, "Dee", "dee@x.com").rsvp(RsvpStatus::Other("Tentative".to_string()));
    dashboard.add_attendee(&attendee).unwrap();

    let raw = fs::read_to_string(dashboard.store().table_path("attendees")).unwrap();
    assert!(raw.contains(",Tentative,"));
    let listed = dashboard.list_attendees(Some(2)).unwrap();
    assert_eq!(listed[0].rsvp, RsvpStatus::Other("Tentative".to_string()));
}

#[test]
fn add_attendee_keeps_existing_rows_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let dashboard = csv_dashboard(&dir);
    let path = dashboard.store().table_path("attendees");
    fs::write(
        &path,
        "event_id,name,email,rsvp,role,dietary\n3.0,Ada,ada@x.com,Maybe,Guest,\n",
    )
    .unwrap();

    dashboard
        .add_attendee(&Attendee::new(3, "Bob", "bob@x.com"))
        .unwrap();

    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.contains("3.0,Ada,ada@x.com,Maybe,Guest,\n"));
    assert!(raw.contains("3,Bob,bob@x.com,Pending,,\n"));
}

#[test]
fn task_priority_defaults_to_medium() {
    let dashboard = EventDashboard::new(SqliteTableStore::open_in_memory().unwrap());
    let task = dashboard
        .add_task(NewTask::new(1, "Book venue", "2025-05-20"))
        .unwrap();
    assert_eq!(task.priority, Priority::Medium);
    assert_eq!(task.status, TaskStatus::NotStarted);

    let listed = dashboard.list_tasks(Some(1)).unwrap();
    assert_eq!(listed, vec![task]);
    assert_eq!(listed[0].priority.to_string(), "Medium");
}

#[test]
fn task_filter_matches_float_formatted_ids() {
    let dir = tempfile::tempdir().unwrap();
    let dashboard = csv_dashboard(&dir);
    fs::write(
        dashboard.store().table_path("tasks"),
        "event_id,task_name,status,deadline,priority\n\
         5.0,Setup,Not Started,2025-05-01,High\n\
         4,Music,Completed,2025-05-02,Low\n",
    )
    .unwrap();

    let tasks = dashboard.list_tasks(Some(5)).unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].event_id, 5);
    assert_eq!(tasks[0].priority, Priority::High);
}

#[test]
fn update_task_status_updates_every_matching_row() {
    let dir = tempfile::tempdir().unwrap();
    let dashboard = csv_dashboard(&dir);
    fs::write(
        dashboard.store().table_path("tasks"),
        "event_id,task_name,status,deadline,priority\n\
         2.0,Setup,Not Started,2025-05-01,High\n\
         2,Setup,Delayed,2025-05-03,Low\n\
         2,Catering,Not Started,2025-05-04,Medium\n\
         3,Setup,Not Started,2025-05-05,Medium\n",
    )
    .unwrap();

    let matched = dashboard
        .update_task_status(2, "Setup", &TaskStatus::Completed)
        .unwrap();
    assert_eq!(matched, 2);

    let tasks = dashboard.list_tasks(None).unwrap();
    let statuses = tasks
        .iter()
        .map(|task| (task.event_id, task.task_name.as_str(), task.status.clone()))
        .collect::<Vec<_>>();
    assert_eq!(
        statuses,
        vec![
            (2, "Setup", TaskStatus::Completed),
            (2, "Setup", TaskStatus::Completed),
            (2, "Catering", TaskStatus::NotStarted),
            (3, "Setup", TaskStatus::NotStarted),
        ]
    );

    let raw = fs::read_to_string(dashboard.store().table_path("tasks")).unwrap();
    assert!(raw.contains("\n2,Setup,Completed,2025-05-01,High\n"));
}

#[test]
fn update_task_status_reports_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let dashboard = csv_dashboard(&dir);
    dashboard
        .add_task(NewTask::new(1, "Setup", "2025-05-01"))
        .unwrap();
    let before = fs::read_to_string(dashboard.store().table_path("tasks")).unwrap();

    let err = dashboard
        .update_task_status(1, "setup", &TaskStatus::Completed)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    match err {
        RepoError::TaskNotFound {
            event_id,
            task_name,
        } => {
            assert_eq!(event_id, 1);
            assert_eq!(task_name, "setup");
        }
        other => panic!("unexpected error: {other}"),
    }

    let after = fs::read_to_string(dashboard.store().table_path("tasks")).unwrap();
    assert_eq!(after, before);
}

#[test]
fn update_on_empty_table_is_not_found() {
    let dashboard = EventDashboard::new(SqliteTableStore::open_in_memory().unwrap());
    let err = dashboard
        .update_task_status(1, "Setup", &TaskStatus::InProgress)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(dashboard.store().load("tasks").unwrap().is_empty());
}
