use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use super::{
    dispatch, ChangeListener, Listeners, NewTask, Snapshot, Subscription, TaskMutations,
    TaskSource,
};
use crate::error::{Error, Result};
use crate::kanban::KanbanBoard;
use crate::model::{Project, Task, TaskStatus};

/// Everything the local source persists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Workspace {
    pub projects: Vec<Project>,
}

impl Workspace {
    fn project(&self, id: &str) -> Result<&Project> {
        self.projects
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| Error::ProjectNotFound(id.to_string()))
    }

    fn project_mut(&mut self, id: &str) -> Result<&mut Project> {
        self.projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| Error::ProjectNotFound(id.to_string()))
    }
}

/// In-process data source over a [`Workspace`], optionally saved to a JSON
/// file after every change.
pub struct LocalSource {
    workspace: RefCell<Workspace>,
    path: Option<PathBuf>,
    listeners: Rc<RefCell<Listeners>>,
}

impl LocalSource {
    pub fn in_memory(workspace: Workspace) -> Self {
        Self {
            workspace: RefCell::new(workspace),
            path: None,
            listeners: Rc::default(),
        }
    }

    /// Open the workspace file at `path`. A missing file starts empty; an
    /// unreadable one is an error so it is never silently overwritten.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let workspace = if path.exists() {
            crate::io::load_workspace(&path)?
        } else {
            info!(path = %path.display(), "No workspace file yet, starting empty");
            Workspace::default()
        };
        Ok(Self {
            workspace: RefCell::new(workspace),
            path: Some(path),
            listeners: Rc::default(),
        })
    }

    pub fn projects(&self) -> Vec<Project> {
        self.workspace.borrow().projects.clone()
    }

    pub fn project(&self, id: &str) -> Result<Project> {
        self.workspace.borrow().project(id).cloned()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn create_project(&self, name: &str) -> Result<Project> {
        let project = Project::new(name.trim());
        self.commit(|ws| {
            ws.projects.push(project.clone());
            Ok(())
        })?;
        Ok(project)
    }

    pub fn rename_project(&self, id: &str, name: &str) -> Result<()> {
        self.commit(|ws| {
            let project = ws.project_mut(id)?;
            project.name = name.trim().to_string();
            project.touch();
            Ok(())
        })
    }

    pub fn delete_project(&self, id: &str) -> Result<()> {
        self.commit(|ws| {
            let before = ws.projects.len();
            ws.projects.retain(|p| p.id != id);
            if ws.projects.len() == before {
                return Err(Error::ProjectNotFound(id.to_string()));
            }
            Ok(())
        })?;
        self.notify(id, Rc::from(Vec::new()));
        Ok(())
    }

    pub fn board(&self, project_id: &str) -> Result<KanbanBoard> {
        Ok(self.workspace.borrow().project(project_id)?.board.clone())
    }

    pub fn update_board(&self, project_id: &str, board: KanbanBoard) -> Result<()> {
        self.commit(|ws| {
            let project = ws.project_mut(project_id)?;
            project.board = board;
            project.touch();
            Ok(())
        })
    }

    /// Replace a project's tasks wholesale, e.g. after a CSV import.
    pub fn replace_tasks(&self, project_id: &str, tasks: Vec<Task>) -> Result<()> {
        self.mutate(project_id, |project| {
            let owner = project.id.clone();
            project.tasks = tasks
                .into_iter()
                .map(|mut t| {
                    t.project_id = owner.clone();
                    t
                })
                .collect();
            Ok(())
        })
    }

    /// Write the workspace to `path` (if file-backed).
    pub fn save(&self) -> Result<()> {
        match &self.path {
            Some(path) => crate::io::save_workspace(&self.workspace.borrow(), path),
            None => Ok(()),
        }
    }

    /// Apply `change` to the workspace and save it.
    ///
    /// If either step fails the workspace is restored, so memory never holds
    /// a change that is not on disk.
    fn commit<R>(&self, change: impl FnOnce(&mut Workspace) -> Result<R>) -> Result<R> {
        let before = self.workspace.borrow().clone();
        let changed = change(&mut self.workspace.borrow_mut());
        let result = changed.and_then(|value| self.save().map(|()| value));
        if let Err(e) = &result {
            warn!(error = %e, "Workspace change not applied");
            *self.workspace.borrow_mut() = before;
        }
        result
    }

    /// Apply `change` to a project, persist, and notify its subscribers.
    fn mutate<R>(
        &self,
        project_id: &str,
        change: impl FnOnce(&mut Project) -> Result<R>,
    ) -> Result<R> {
        let (result, snapshot) = self.commit(|ws| {
            let project = ws.project_mut(project_id)?;
            let result = change(project)?;
            project.touch();
            Ok((result, Snapshot::from(project.tasks.clone())))
        })?;
        self.notify(project_id, snapshot);
        Ok(result)
    }

    fn notify(&self, project_id: &str, snapshot: Snapshot) {
        dispatch(&self.listeners, project_id, &snapshot);
    }
}

impl TaskSource for LocalSource {
    fn fetch_tasks(&self, project_id: &str) -> Result<Snapshot> {
        let ws = self.workspace.borrow();
        Ok(Snapshot::from(ws.project(project_id)?.tasks.clone()))
    }

    fn subscribe(&self, project_id: &str, on_change: ChangeListener) -> Subscription {
        let id = self.listeners.borrow_mut().add(project_id, on_change);
        Subscription::new(id, &self.listeners)
    }
}

impl TaskMutations for LocalSource {
    fn create_task(&self, project_id: &str, new: NewTask) -> Result<Task> {
        self.mutate(project_id, |project| {
            let task = Task {
                id: Uuid::new_v4().to_string(),
                project_id: project.id.clone(),
                title: new.title,
                description: new.description,
                start_date: Some(new.start_date),
                end_date: Some(new.end_date),
                completed: new.status.as_ref().is_some_and(TaskStatus::is_done),
                status: new.status,
            };
            project.tasks.push(task.clone());
            Ok(task)
        })
    }

    fn update_task(&self, task: Task) -> Result<()> {
        let project_id = task.project_id.clone();
        self.mutate(&project_id, |project| {
            let slot = project
                .task_mut(&task.id)
                .ok_or_else(|| Error::TaskNotFound(task.id.clone()))?;
            *slot = task;
            Ok(())
        })
    }

    fn delete_task(&self, project_id: &str, task_id: &str) -> Result<()> {
        self.mutate(project_id, |project| {
            let before = project.tasks.len();
            project.tasks.retain(|t| t.id != task_id);
            if project.tasks.len() == before {
                return Err(Error::TaskNotFound(task_id.to_string()));
            }
            Ok(())
        })
    }

    fn toggle_completed(&self, project_id: &str, task_id: &str) -> Result<bool> {
        self.mutate(project_id, |project| {
            let task = project
                .task_mut(task_id)
                .ok_or_else(|| Error::TaskNotFound(task_id.to_string()))?;
            task.completed = !task.completed;
            Ok(task.completed)
        })
    }

    fn update_status(
        &self,
        project_id: &str,
        task_id: &str,
        status: TaskStatus,
        completed: bool,
    ) -> Result<()> {
        self.mutate(project_id, |project| {
            let task = project
                .task_mut(task_id)
                .ok_or_else(|| Error::TaskNotFound(task_id.to_string()))?;
            task.status = Some(status);
            task.completed = completed;
            Ok(())
        })
    }
}
