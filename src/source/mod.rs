//! Task data source and mutation surface.
//!
//! The timeline only ever reads immutable snapshots (`Rc<[Task]>`); all
//! writes go through [`TaskMutations`] and come back as a fresh snapshot to
//! every subscriber of the affected project.

pub mod local;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use chrono::NaiveDate;
use tracing::warn;

use crate::error::Result;
use crate::model::{Task, TaskStatus};

pub use local::LocalSource;

/// Shared immutable task list.
pub type Snapshot = Rc<[Task]>;

pub type ChangeListener = Box<dyn FnMut(Snapshot)>;

pub trait TaskSource {
    fn fetch_tasks(&self, project_id: &str) -> Result<Snapshot>;

    /// Call `on_change` with every new snapshot of the project until the
    /// returned handle is dropped.
    fn subscribe(&self, project_id: &str, on_change: ChangeListener) -> Subscription;
}

/// Field values for a new task.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: Option<TaskStatus>,
}

pub trait TaskMutations {
    fn create_task(&self, project_id: &str, task: NewTask) -> Result<Task>;
    fn update_task(&self, task: Task) -> Result<()>;
    fn delete_task(&self, project_id: &str, task_id: &str) -> Result<()>;
    fn toggle_completed(&self, project_id: &str, task_id: &str) -> Result<bool>;
    fn update_status(
        &self,
        project_id: &str,
        task_id: &str,
        status: TaskStatus,
        completed: bool,
    ) -> Result<()>;
}

struct ListenerEntry {
    id: u64,
    project_id: String,
    callback: ChangeListener,
}

/// Listener registry shared between a source and its subscriptions.
#[derive(Default)]
pub(crate) struct Listeners {
    next_id: u64,
    entries: Vec<ListenerEntry>,
    /// Nesting depth of [`dispatch`] calls currently running callbacks.
    dispatching: usize,
    /// Ids unsubscribed while their entry was out for dispatch.
    retired: Vec<u64>,
}

impl Listeners {
    pub(crate) fn add(&mut self, project_id: &str, callback: ChangeListener) -> u64 {
        self.next_id += 1;
        self.entries.push(ListenerEntry {
            id: self.next_id,
            project_id: project_id.to_string(),
            callback,
        });
        self.next_id
    }

    pub(crate) fn remove(&mut self, id: u64) {
        if self.dispatching > 0 {
            self.retired.push(id);
        }
        self.entries.retain(|e| e.id != id);
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Handle of an active subscription; unsubscribes when dropped.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    listeners: Weak<RefCell<Listeners>>,
}

impl Subscription {
    pub(crate) fn new(id: u64, listeners: &Rc<RefCell<Listeners>>) -> Self {
        Self {
            id,
            listeners: Rc::downgrade(listeners),
        }
    }

    pub fn unsubscribe(self) {}
}

/// Deliver `snapshot` to every listener of `project_id`.
///
/// Callbacks run without the registry borrowed, so they may subscribe or
/// drop subscriptions (their own included). Entries removed mid-dispatch are
/// not put back; entries added mid-dispatch are kept.
pub(crate) fn dispatch(listeners: &RefCell<Listeners>, project_id: &str, snapshot: &Snapshot) {
    let mut running = {
        let mut registry = listeners.borrow_mut();
        registry.dispatching += 1;
        std::mem::take(&mut registry.entries)
    };
    for entry in running.iter_mut().filter(|e| e.project_id == project_id) {
        let retired = listeners.borrow().retired.contains(&entry.id);
        if !retired {
            (entry.callback)(Rc::clone(snapshot));
        }
    }

    let mut registry = listeners.borrow_mut();
    registry.dispatching -= 1;
    running.retain(|e| !registry.retired.contains(&e.id));
    running.append(&mut registry.entries);
    registry.entries = running;
    if registry.dispatching == 0 {
        registry.retired.clear();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            match listeners.try_borrow_mut() {
                Ok(mut listeners) => listeners.remove(self.id),
                Err(_) => warn!(id = self.id, "Listener registry busy; subscription left active"),
            }
        }
    }
}
