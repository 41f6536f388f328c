use eventdash_core::{
    Attendee, CascadeReport, CsvTableStore, ErrorKind, EventDashboard, NewEvent, NewTask,
    RepoError, Revision, SqliteTableStore, StoreError, StoreResult, Table, TableStore,
};
use std::cell::Cell;
use std::fs;

fn seed<S: TableStore>(dashboard: &EventDashboard<S>) {
    for name in ["Launch", "Retreat", "Gala"] {
        dashboard
            .add_event(NewEvent::new(name, "2025-06-01"))
            .unwrap();
    }
    for event_id in 1..=3 {
        dashboard
            .add_attendee(&Attendee::new(event_id, "Ada", "ada@x.com"))
            .unwrap();
        dashboard
            .add_attendee(&Attendee::new(event_id, "Bob", "bob@x.com"))
            .unwrap();
        dashboard
            .add_task(NewTask::new(event_id, "Setup", "2025-05-01"))
            .unwrap();
    }
}

#[test]
fn delete_event_removes_only_that_event_and_its_rows() {
    let dashboard = EventDashboard::new(SqliteTableStore::open_in_memory().unwrap());
    seed(&dashboard);

    let report = dashboard.delete_event(3).unwrap();
    assert_eq!(
        report,
        CascadeReport {
            event_id: 3,
            events_removed: 1,
            attendees_removed: 2,
            tasks_removed: 1,
        }
    );

    let event_ids = dashboard
        .list_events()
        .unwrap()
        .into_iter()
        .map(|event| event.id)
        .collect::<Vec<_>>();
    assert_eq!(event_ids, vec![1, 2]);
    assert!(dashboard.list_attendees(Some(3)).unwrap().is_empty());
    assert!(dashboard.list_tasks(Some(3)).unwrap().is_empty());
    assert_eq!(dashboard.list_attendees(None).unwrap().len(), 4);
    assert_eq!(dashboard.list_tasks(None).unwrap().len(), 2);
}

#[test]
fn delete_event_matches_float_formatted_foreign_keys() {
    let dir = tempfile::tempdir().unwrap();
    let store = CsvTableStore::open(dir.path()).unwrap();
    fs::write(
        store.table_path("events"),
        "id,name,date,time,location,description\n1,Launch,2025-06-01,,,\n3.0,Gala,2025-06-01,,,\n",
    )
    .unwrap();
    fs::write(
        store.table_path("attendees"),
        "event_id,name,email,rsvp,role,dietary\n3.0,Ada,ada@x.com,Pending,,\n1,Bob,bob@x.com,Pending,,\n",
    )
    .unwrap();

    let dashboard = EventDashboard::new(store);
    let report = dashboard.delete_event(3).unwrap();
    assert_eq!(report.events_removed, 1);
    assert_eq!(report.attendees_removed, 1);
    assert_eq!(report.tasks_removed, 0);
    assert!(!dashboard.store().table_path("tasks").exists());

    let remaining = dashboard.list_attendees(None).unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].name, "Bob");
}

#[test]
fn deleting_missing_event_sweeps_orphans() {
    let dashboard = EventDashboard::new(SqliteTableStore::open_in_memory().unwrap());
    dashboard
        .add_event(NewEvent::new("Launch", "2025-06-01"))
        .unwrap();
    dashboard
        .add_attendee(&Attendee::new(9, "Orphan", "orphan@x.com"))
        .unwrap();

    let report = dashboard.delete_event(9).unwrap();
    assert_eq!(report.events_removed, 0);
    assert_eq!(report.attendees_removed, 1);
    assert_eq!(dashboard.list_events().unwrap().len(), 1);
}

#[test]
fn delete_on_empty_store_is_a_no_op() {
    let dir = tempfile::tempdir().unwrap();
    let dashboard = EventDashboard::new(CsvTableStore::open(dir.path()).unwrap());

    let report = dashboard.delete_event(1).unwrap();
    assert_eq!(report, CascadeReport { event_id: 1, ..CascadeReport::default() });
    assert!(fs::read_dir(dir.path()).unwrap().next().is_none());
}

/// Store whose writes to one table fail once `broken` is set.
struct BrokenTable {
    inner: SqliteTableStore,
    broken: Cell<&'static str>,
}

impl BrokenTable {
    fn new() -> Self {
        Self {
            inner: SqliteTableStore::open_in_memory().unwrap(),
            broken: Cell::new(""),
        }
    }
}

impl TableStore for BrokenTable {
    fn backend_name(&self) -> &'static str {
        "broken"
    }

    fn load(&self, table: &str) -> StoreResult<Table> {
        self.inner.load(table)
    }

    fn save(&self, table: &str, data: &Table) -> StoreResult<()> {
        if table == self.broken.get() {
            return Err(StoreError::Io {
                table: table.to_string(),
                source: std::io::Error::other("disk full"),
            });
        }
        self.inner.save(table, data)
    }

    fn save_if_unchanged(&self, table: &str, data: &Table, expected: Revision) -> StoreResult<()> {
        if self.inner.load(table)?.revision() != expected {
            return Err(StoreError::Conflict {
                table: table.to_string(),
            });
        }
        self.save(table, data)
    }
}

#[test]
fn failure_mid_cascade_reports_completed_steps() {
    let dashboard = EventDashboard::new(BrokenTable::new());
    seed(&dashboard);
    dashboard.store().broken.set("tasks");

    let err = dashboard.delete_event(2).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PartialCascade);
    match err {
        RepoError::PartialCascade {
            completed,
            failed_table,
            ..
        } => {
            assert_eq!(completed.events_removed, 1);
            assert_eq!(completed.attendees_removed, 2);
            assert_eq!(completed.tasks_removed, 0);
            assert_eq!(failed_table, "tasks");
        }
        other => panic!("unexpected error: {other}"),
    }

    assert!(dashboard.get_event(2).unwrap().is_none());
    assert!(dashboard.list_attendees(Some(2)).unwrap().is_empty());
    assert_eq!(dashboard.list_tasks(Some(2)).unwrap().len(), 1);

    dashboard.store().broken.set("");
    let retry = dashboard.delete_event(2).unwrap();
    assert_eq!(retry.events_removed, 0);
    assert_eq!(retry.tasks_removed, 1);
}

#[test]
fn failure_on_first_step_is_a_plain_storage_error() {
    let dashboard = EventDashboard::new(BrokenTable::new());
    seed(&dashboard);
    dashboard.store().broken.set("events");

    let err = dashboard.delete_event(1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Storage);
    assert!(matches!(err, RepoError::Store(StoreError::Io { .. })));
    assert_eq!(dashboard.list_events().unwrap().len(), 3);
    assert_eq!(dashboard.list_attendees(Some(1)).unwrap().len(), 2);
}
