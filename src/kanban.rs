//! Kanban projection: files tasks into status columns.
//!
//! Independent of the timeline layout; it reads the same task snapshot.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::model::{Task, TaskStatus};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KanbanError {
    #[error("column '{0}' is a default column and cannot be removed")]
    DefaultColumn(String),
    #[error("column '{0}' not found")]
    ColumnNotFound(String),
    #[error("column title cannot be empty")]
    EmptyTitle,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KanbanColumn {
    pub id: String,
    pub title: String,
    pub status: TaskStatus,
    pub is_default: bool,
}

impl KanbanColumn {
    fn builtin(status: TaskStatus) -> Self {
        let title = match status {
            TaskStatus::Todo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Pending => "Pending",
            TaskStatus::Blocked => "Blocked",
            TaskStatus::Done => "Done",
            TaskStatus::Custom(_) => "Custom",
        };
        Self {
            id: status.key().to_string(),
            title: title.to_string(),
            status,
            is_default: true,
        }
    }
}

/// Ordered column set of a project's board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<KanbanColumn>", into = "Vec<KanbanColumn>")]
pub struct KanbanBoard {
    columns: Vec<KanbanColumn>,
}

impl Default for KanbanBoard {
    fn default() -> Self {
        Self {
            columns: TaskStatus::DEFAULTS
                .into_iter()
                .map(KanbanColumn::builtin)
                .collect(),
        }
    }
}

impl From<Vec<KanbanColumn>> for KanbanBoard {
    /// Stored boards are repaired so that every default column exists.
    fn from(mut columns: Vec<KanbanColumn>) -> Self {
        for (index, status) in TaskStatus::DEFAULTS.into_iter().enumerate() {
            match columns.iter_mut().find(|c| c.status == status) {
                Some(existing) => existing.is_default = true,
                None => {
                    let at = index.min(columns.len());
                    columns.insert(at, KanbanColumn::builtin(status));
                }
            }
        }
        Self { columns }
    }
}

impl From<KanbanBoard> for Vec<KanbanColumn> {
    fn from(board: KanbanBoard) -> Self {
        board.columns
    }
}

impl KanbanBoard {
    pub fn columns(&self) -> &[KanbanColumn] {
        &self.columns
    }

    pub fn column(&self, id: &str) -> Option<&KanbanColumn> {
        self.columns.iter().find(|c| c.id == id)
    }

    /// Append a custom column and return it.
    pub fn add_column(&mut self, title: &str) -> Result<&KanbanColumn, KanbanError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(KanbanError::EmptyTitle);
        }
        let id = format!("custom-{}", Uuid::new_v4().simple());
        self.columns.push(KanbanColumn {
            status: TaskStatus::Custom(id.clone()),
            id,
            title: title.to_string(),
            is_default: false,
        });
        Ok(&self.columns[self.columns.len() - 1])
    }

    pub fn rename_column(&mut self, id: &str, title: &str) -> Result<(), KanbanError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(KanbanError::EmptyTitle);
        }
        let column = self
            .columns
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| KanbanError::ColumnNotFound(id.to_string()))?;
        column.title = title.to_string();
        Ok(())
    }

    /// Remove a custom column. Tasks filed under it fall back to `todo`.
    pub fn remove_column(&mut self, id: &str) -> Result<KanbanColumn, KanbanError> {
        let index = self
            .columns
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| KanbanError::ColumnNotFound(id.to_string()))?;
        if self.columns[index].is_default {
            return Err(KanbanError::DefaultColumn(id.to_string()));
        }
        Ok(self.columns.remove(index))
    }
}

/// Group tasks by column id.
///
/// Every column appears in the result. Tasks without a status, or whose
/// status matches no column, land in `todo`.
pub fn group_by_status<'a>(
    tasks: &'a [Task],
    columns: &[KanbanColumn],
) -> HashMap<String, Vec<&'a Task>> {
    let mut groups: HashMap<String, Vec<&'a Task>> =
        columns.iter().map(|c| (c.id.clone(), Vec::new())).collect();
    let fallback = TaskStatus::Todo.key().to_string();

    for task in tasks {
        let status = task.effective_status();
        let column_id = columns
            .iter()
            .find(|c| c.status == status)
            .map(|c| c.id.clone())
            .unwrap_or_else(|| fallback.clone());
        groups.entry(column_id).or_default().push(task);
    }
    groups
}

/// The status/completion update produced by dropping a task onto a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub task_id: String,
    pub status: TaskStatus,
    pub completed: bool,
}

/// Moving into Done completes the task; moving anywhere else reopens it.
pub fn move_to_column(task: &Task, column: &KanbanColumn) -> StatusChange {
    StatusChange {
        task_id: task.id.clone(),
        status: column.status.clone(),
        completed: column.status.is_done(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn task(id: &str, status: Option<TaskStatus>) -> Task {
        let d = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut t = Task::new("p", id, d, d);
        t.id = id.to_string();
        t.status = status;
        t
    }

    #[test]
    fn missing_status_groups_under_todo() {
        let board = KanbanBoard::default();
        let tasks = vec![task("a", None), task("b", Some(TaskStatus::Blocked))];
        let groups = group_by_status(&tasks, board.columns());
        assert_eq!(groups["todo"].len(), 1);
        assert_eq!(groups["todo"][0].id, "a");
        assert_eq!(groups["blocked"][0].id, "b");
        assert!(groups["done"].is_empty());
        assert_eq!(groups.len(), 5);
    }

    #[test]
    fn default_columns_cannot_be_removed() {
        let mut board = KanbanBoard::default();
        for status in TaskStatus::DEFAULTS {
            assert_eq!(
                board.remove_column(status.key()),
                Err(KanbanError::DefaultColumn(status.key().to_string()))
            );
        }
        assert_eq!(board.columns().len(), 5);
    }

    #[test]
    fn custom_columns_can_be_added_renamed_and_removed() {
        let mut board = KanbanBoard::default();
        let id = board.add_column("Review").unwrap().id.clone();
        assert_eq!(board.columns().len(), 6);

        board.rename_column(&id, "Code Review").unwrap();
        assert_eq!(board.column(&id).unwrap().title, "Code Review");
        assert_eq!(board.rename_column(&id, "  "), Err(KanbanError::EmptyTitle));

        let tasks = vec![task("r", Some(TaskStatus::Custom(id.clone())))];
        assert_eq!(group_by_status(&tasks, board.columns())[&id].len(), 1);

        board.remove_column(&id).unwrap();
        assert_eq!(board.columns().len(), 5);
        // Orphaned tasks fall back to todo.
        assert_eq!(group_by_status(&tasks, board.columns())["todo"].len(), 1);
    }

    #[test]
    fn default_columns_can_be_renamed() {
        let mut board = KanbanBoard::default();
        board.rename_column("todo", "Backlog").unwrap();
        assert_eq!(board.column("todo").unwrap().title, "Backlog");
    }

    #[test]
    fn dropping_into_done_completes_and_back_reopens() {
        let board = KanbanBoard::default();
        let mut t = task("a", None);

        let change = move_to_column(&t, board.column("done").unwrap());
        assert_eq!(change.status, TaskStatus::Done);
        assert!(change.completed);
        t.status = Some(change.status);
        t.completed = change.completed;

        let change = move_to_column(&t, board.column("todo").unwrap());
        assert_eq!(change.status, TaskStatus::Todo);
        assert!(!change.completed);
    }

    #[test]
    fn stored_board_is_repaired() {
        let json = r#"[{"id":"custom-1","title":"QA","status":"custom-1","is_default":false}]"#;
        let board: KanbanBoard = serde_json::from_str(json).unwrap();
        assert_eq!(board.columns().len(), 6);
        let ids: Vec<_> = board.columns().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["todo", "in-progress", "pending", "blocked", "done", "custom-1"]);
    }
}
