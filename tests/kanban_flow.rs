use std::cell::RefCell;
use std::rc::Rc;

use chrono::NaiveDate;

use timeline_board::kanban::{group_by_status, move_to_column};
use timeline_board::model::TaskStatus;
use timeline_board::source::local::Workspace;
use timeline_board::source::{LocalSource, NewTask, Snapshot, TaskMutations, TaskSource};

fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
}

fn new_task(title: &str, status: Option<TaskStatus>) -> NewTask {
    NewTask {
        title: title.to_string(),
        description: String::new(),
        start_date: d(1),
        end_date: d(4),
        status,
    }
}

#[test]
fn dragging_a_card_through_done_and_back() {
    let source = LocalSource::in_memory(Workspace::default());
    let project = source.create_project("Launch").unwrap();
    let task = source
        .create_task(&project.id, new_task("Write copy", Some(TaskStatus::InProgress)))
        .unwrap();

    let latest: Rc<RefCell<Option<Snapshot>>> = Rc::default();
    let sink = latest.clone();
    let _subscription = source.subscribe(
        &project.id,
        Box::new(move |snapshot| *sink.borrow_mut() = Some(snapshot)),
    );

    let board = source.board(&project.id).unwrap();
    let done = board.column("done").unwrap();
    let change = move_to_column(&task, done);
    source
        .update_status(&project.id, &change.task_id, change.status, change.completed)
        .unwrap();

    let snapshot = latest.borrow().clone().unwrap();
    assert_eq!(snapshot[0].status, Some(TaskStatus::Done));
    assert!(snapshot[0].completed);
    let groups = group_by_status(&snapshot, board.columns());
    assert_eq!(groups["done"].len(), 1);
    assert!(groups["in-progress"].is_empty());

    let todo = board.column("todo").unwrap();
    let change = move_to_column(&snapshot[0], todo);
    source
        .update_status(&project.id, &change.task_id, change.status, change.completed)
        .unwrap();

    let snapshot = latest.borrow().clone().unwrap();
    assert_eq!(snapshot[0].status, Some(TaskStatus::Todo));
    assert!(!snapshot[0].completed);
}

#[test]
fn tasks_without_status_show_up_in_todo() {
    let source = LocalSource::in_memory(Workspace::default());
    let project = source.create_project("Launch").unwrap();
    source.create_task(&project.id, new_task("Loose end", None)).unwrap();
    source
        .create_task(&project.id, new_task("Shipped", Some(TaskStatus::Done)))
        .unwrap();

    let tasks = source.fetch_tasks(&project.id).unwrap();
    let board = source.board(&project.id).unwrap();
    let groups = group_by_status(&tasks, board.columns());

    assert_eq!(groups["todo"].len(), 1);
    assert_eq!(groups["todo"][0].title, "Loose end");
    assert_eq!(groups["done"].len(), 1);
    assert!(groups["done"][0].completed);
}

#[test]
fn unsubscribing_stops_updates() {
    let source = LocalSource::in_memory(Workspace::default());
    let project = source.create_project("Launch").unwrap();

    let calls = Rc::new(RefCell::new(0));
    let counter = calls.clone();
    let subscription = source.subscribe(&project.id, Box::new(move |_| *counter.borrow_mut() += 1));

    source.create_task(&project.id, new_task("a", None)).unwrap();
    assert_eq!(*calls.borrow(), 1);

    subscription.unsubscribe();
    source.create_task(&project.id, new_task("b", None)).unwrap();
    assert_eq!(*calls.borrow(), 1);
    assert_eq!(source.listener_count(), 0);
}
