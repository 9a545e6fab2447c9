//! Store behaviour across the public API: persistence round trips, failed writes
//! and the projections built on top of the collection.

use chrono::NaiveDate;
use pretty_assertions::assert_eq;

use tasktracker::error::{StoreError, ValidationError};
use tasktracker::fields::{Priority, Status};
use tasktracker::filter::FilterCriteria;
use tasktracker::gateway::{FileGateway, MemoryGateway, PersistenceGateway};
use tasktracker::store::{EditState, TaskStore, HISTORY_KEY, TASKS_KEY};
use tasktracker::task::TaskFields;
use tasktracker::views;

fn may(day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(2024, 5, day)
}

fn fields(kind: &str, report: &str, status: Status, dependency: &str) -> TaskFields {
    TaskFields {
        kind: kind.into(),
        report: report.into(),
        description: format!("work on {report}"),
        date: may(1),
        status: Some(status),
        priority: Some(Priority::High),
        dependency: dependency.into(),
    }
}

#[test]
fn dependent_pair_survives_reload() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut store = TaskStore::open(FileGateway::new(dir.path())).unwrap();
        store.create(fields("Dev", "R1", Status::Pending, "")).unwrap();
        store.create(fields("Dev", "R2", Status::InProgress, "R1")).unwrap();
        assert!(store.take_persist_warning().is_none());
    }

    let mut store = TaskStore::open(FileGateway::new(dir.path())).unwrap();
    assert_eq!(store.list().len(), 2);
    assert_eq!(store.list()[1].dependency, "R1");
    assert_eq!(store.history().len(), 2);

    let r1 = store.list()[0].id.clone();
    let err = store.delete(&r1).unwrap_err();
    assert!(matches!(err, StoreError::DependencyConflict { ref dependents, .. } if dependents.len() == 1));

    let outcome = store.delete_cascade(&r1).unwrap();
    assert_eq!(outcome.removed.report, "R1");
    assert_eq!(store.list().len(), 1);
    assert!(!store.list()[0].has_dependency());

    let reloaded = TaskStore::open(FileGateway::new(dir.path())).unwrap();
    assert_eq!(reloaded.list(), store.list());
}

#[test]
fn delete_succeeds_once_dependent_is_gone() {
    let mut store = TaskStore::open(MemoryGateway::new()).unwrap();
    let r1 = store.create(fields("Dev", "R1", Status::Pending, "")).unwrap();
    let r2 = store.create(fields("Dev", "R2", Status::Pending, "R1")).unwrap();
    let before = store.list().to_vec();

    let err = store.delete(&r1.id).unwrap_err();
    assert_eq!(
        err,
        StoreError::DependencyConflict {
            id: r1.id.clone(),
            report: "R1".into(),
            dependents: vec![r2.id.clone()],
        }
    );
    assert_eq!(store.list(), &before[..]);

    store.delete(&r2.id).unwrap();
    store.delete(&r1.id).unwrap();
    assert_eq!(store.list().len(), 0);
}

#[test]
fn ids_stay_unique_after_reload() {
    let dir = tempfile::tempdir().unwrap();
    let mut first = TaskStore::open(FileGateway::new(dir.path())).unwrap();
    let a = first.create(fields("Dev", "A", Status::Pending, "")).unwrap();
    drop(first);

    let mut second = TaskStore::open(FileGateway::new(dir.path())).unwrap();
    let b = second.create(fields("Dev", "B", Status::Pending, "")).unwrap();
    assert_ne!(a.id, b.id);
    assert!(b.id.parse::<i64>().unwrap() > a.id.parse::<i64>().unwrap());
}

#[test]
fn failed_write_keeps_change_in_memory() {
    let mut store = TaskStore::open(MemoryGateway::with_quota(16)).unwrap();
    let task = store.create(fields("Dev", "R1", Status::Pending, "")).unwrap();

    assert!(store.take_persist_warning().is_some());
    assert!(store.take_persist_warning().is_none());
    assert_eq!(store.get(&task.id), Some(&task));
    assert!(store.gateway().get(TASKS_KEY).is_none());
}

#[test]
fn legacy_blob_with_free_text_values_loads() {
    let mut gateway = MemoryGateway::new();
    gateway.insert(
        TASKS_KEY,
        r#"[{"id":"1","type":"Dev","report":"R1","description":"d","date":"2024-05-01",
             "status":"Blocked","priority":"urgent"},
            {"id":"2","type":"","report":"R2","description":"d","date":"2024-05-03",
             "status":"In Progress","priority":"High","dependency":"R1"}]"#,
    );
    let store = TaskStore::open(gateway).unwrap();
    assert_eq!(store.list()[0].status, Status::Pending);
    assert_eq!(store.list()[0].priority, Priority::Urgent);
    assert_eq!(store.list()[0].dependency, "");

    let board = views::kanban(store.list(), None);
    assert_eq!(board.column(Status::Pending).count(), 1);
    assert_eq!(board.column(Status::InProgress).count(), 1);
    assert_eq!(board.total(), store.list().len());

    let rows = views::table_rows(store.list(), None, 50, views::DEFAULT_DATE_FORMAT);
    assert_eq!(rows[1].kind, views::UNCATEGORIZED);
    assert_eq!(rows[0].dependency, "None");
}

#[test]
fn corrupt_history_blocks_open() {
    let mut gateway = MemoryGateway::new();
    gateway.insert(HISTORY_KEY, "[{");
    assert!(TaskStore::open(gateway).is_err());
}

#[test]
fn edit_pointer_lifecycle() {
    let mut store = TaskStore::open(MemoryGateway::new()).unwrap();
    let a = store.create(fields("Dev", "A", Status::Pending, "")).unwrap();
    let b = store.create(fields("Dev", "B", Status::Pending, "")).unwrap();

    store.begin_edit(&a.id).unwrap();
    let labels: Vec<String> = store
        .dependency_candidates()
        .into_iter()
        .map(|o| o.label)
        .collect();
    assert_eq!(labels, vec!["None".to_string(), "B".to_string()]);

    // Saving a different task leaves the pointer alone.
    store.update(&b.id, fields("Dev", "B", Status::Completed, "")).unwrap();
    assert_eq!(store.edit_state(), &EditState::Editing(a.id.clone()));

    let err = store
        .update(&a.id, fields("Dev", "A", Status::Pending, "A"))
        .unwrap_err();
    assert_eq!(err, StoreError::Validation(ValidationError::SelfDependency));
    assert_eq!(store.editing_id(), Some(a.id.as_str()));

    store.delete(&a.id).unwrap();
    assert_eq!(store.edit_state(), &EditState::Idle);
}

#[test]
fn projections_agree_on_filtered_counts() {
    let mut store = TaskStore::open(MemoryGateway::new()).unwrap();
    store.create(fields("Dev", "A", Status::Pending, "")).unwrap();
    store.create(fields("Ops", "B", Status::Completed, "")).unwrap();
    let mut c = fields("Dev", "C", Status::Completed, "");
    c.date = may(20);
    store.create(c).unwrap();

    let criteria = FilterCriteria {
        kind: Some("Dev".into()),
        ..FilterCriteria::default()
    };
    let rows = views::table_rows(store.list(), Some(&criteria), 50, "%Y-%m-%d");
    let board = views::kanban(store.list(), Some(&criteria));
    let cal = views::calendar_month(store.list(), Some(&criteria), 2024, 5).unwrap();
    let today = NaiveDate::from_ymd_opt(2024, 5, 31).unwrap();
    let dash = views::dashboard(store.list(), Some(&criteria), store.history(), today, 3);

    let on_calendar: usize = cal
        .cells
        .iter()
        .map(|cell| match cell {
            views::CalendarCell::Day { entries, .. } => entries.len(),
            views::CalendarCell::Blank => 0,
        })
        .sum();
    assert_eq!(rows.len(), 2);
    assert_eq!(board.total(), 2);
    assert_eq!(on_calendar, 2);
    assert_eq!(dash.total, 2);
    assert_eq!(dash.completion_percent(), 50);
    assert_eq!(cal.day(20).map(<[_]>::len), Some(1));
}
