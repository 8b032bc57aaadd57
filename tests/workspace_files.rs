use chrono::NaiveDate;

use timeline_board::io::csv_export::export_csv;
use timeline_board::io::csv_import::import_csv;
use timeline_board::layout::layout_tasks;
use timeline_board::model::{TaskStatus, TimelineScale};
use timeline_board::source::{LocalSource, NewTask, TaskMutations, TaskSource};

fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, day).unwrap()
}

#[test]
fn file_backed_source_survives_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("workspace.json");

    let project_id = {
        let source = LocalSource::open(path.clone()).unwrap();
        let project = source.create_project("Garden").unwrap();
        source
            .create_task(
                &project.id,
                NewTask {
                    title: "Plant beans".into(),
                    description: "Row three".into(),
                    start_date: d(2),
                    end_date: d(9),
                    status: Some(TaskStatus::Blocked),
                },
            )
            .unwrap();
        project.id
    };

    let reopened = LocalSource::open(path.clone()).unwrap();
    let tasks = reopened.fetch_tasks(&project_id).unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "Plant beans");
    assert_eq!(tasks[0].status, Some(TaskStatus::Blocked));
    assert_eq!(tasks[0].date_range(), Some((d(2), d(9))));
}

#[test]
fn exported_csv_imports_into_another_project() {
    let dir = tempfile::tempdir().unwrap();
    let source = LocalSource::open(dir.path().join("workspace.json")).unwrap();
    let from = source.create_project("From").unwrap();
    let to = source.create_project("To").unwrap();

    for (title, start, end, status) in [
        ("Plan", 1, 3, TaskStatus::Done),
        ("Build", 4, 20, TaskStatus::InProgress),
    ] {
        source
            .create_task(
                &from.id,
                NewTask {
                    title: title.into(),
                    description: String::new(),
                    start_date: d(start),
                    end_date: d(end),
                    status: Some(status),
                },
            )
            .unwrap();
    }

    let csv_path = dir.path().join("tasks.csv");
    let original = source.fetch_tasks(&from.id).unwrap();
    assert_eq!(export_csv(&original, &csv_path).unwrap(), 2);

    let (imported, skipped) = import_csv(&csv_path, &to.id).unwrap();
    assert_eq!(skipped, 0);
    source.replace_tasks(&to.id, imported).unwrap();

    let copied = source.fetch_tasks(&to.id).unwrap();
    assert_eq!(copied.len(), 2);
    assert!(copied.iter().all(|t| t.project_id == to.id));
    assert!(copied[0].completed);
    assert_eq!(copied[1].status, Some(TaskStatus::InProgress));

    // Same dates give the same layout, whichever project they live in.
    let a = layout_tasks(&original, TimelineScale::Weekly, 100);
    let b = layout_tasks(&copied, TimelineScale::Weekly, 100);
    assert_eq!(a.periods, b.periods);
    let positions = |m: &timeline_board::layout::TimelineModel<'_>| {
        m.rows.iter().map(|r| r.position).collect::<Vec<_>>()
    };
    assert_eq!(positions(&a), positions(&b));
}

#[test]
fn renamed_and_deleted_projects_are_saved() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("workspace.json");

    let source = LocalSource::open(path.clone()).unwrap();
    let keep = source.create_project("Draft").unwrap();
    let scratch = source.create_project("Scratch").unwrap();
    source.rename_project(&keep.id, "  Roadmap ").unwrap();
    source.delete_project(&scratch.id).unwrap();
    assert!(source.rename_project(&scratch.id, "Gone").is_err());

    let reopened = LocalSource::open(path).unwrap();
    let projects = reopened.projects();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].name, "Roadmap");
}
