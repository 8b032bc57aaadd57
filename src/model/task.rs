use std::fmt;
use std::ops::RangeInclusive;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Years a task date may fall in. Dates outside read as invalid, which keeps
/// all period arithmetic far away from chrono's representable limits.
pub const SUPPORTED_YEARS: RangeInclusive<i32> = 1000..=9999;

pub fn is_supported_date(date: NaiveDate) -> bool {
    SUPPORTED_YEARS.contains(&date.year())
}

/// Workflow status used by the Kanban board.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Pending,
    Blocked,
    Done,
    /// Status key of a user-defined board column.
    Custom(String),
}

impl TaskStatus {
    /// The five built-in statuses, in board order.
    pub const DEFAULTS: [TaskStatus; 5] = [
        TaskStatus::Todo,
        TaskStatus::InProgress,
        TaskStatus::Pending,
        TaskStatus::Blocked,
        TaskStatus::Done,
    ];

    pub fn key(&self) -> &str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Pending => "pending",
            TaskStatus::Blocked => "blocked",
            TaskStatus::Done => "done",
            TaskStatus::Custom(key) => key,
        }
    }

    pub fn from_key(key: &str) -> Self {
        match key.trim().to_lowercase().as_str() {
            "todo" | "to-do" | "to do" => TaskStatus::Todo,
            "in-progress" | "in progress" | "inprogress" => TaskStatus::InProgress,
            "pending" => TaskStatus::Pending,
            "blocked" => TaskStatus::Blocked,
            "done" => TaskStatus::Done,
            _ => TaskStatus::Custom(key.trim().to_string()),
        }
    }

    pub fn is_done(&self) -> bool {
        *self == TaskStatus::Done
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl Serialize for TaskStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

impl<'de> Deserialize<'de> for TaskStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;
        Ok(TaskStatus::from_key(&key))
    }
}

/// A single task as delivered by the data source.
///
/// Dates are optional: records coming from storage or an import may carry
/// garbage, and those tasks are filtered out before layout rather than
/// rejected at load time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    #[serde(default)]
    pub project_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, with = "lenient_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, with = "lenient_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

impl Task {
    /// Create a new task with a fresh id.
    pub fn new(
        project_id: impl Into<String>,
        title: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            project_id: project_id.into(),
            title: title.into(),
            description: String::new(),
            start_date: Some(start),
            end_date: Some(end),
            completed: false,
            status: None,
        }
    }

    /// The status the board files this task under.
    pub fn effective_status(&self) -> TaskStatus {
        self.status.clone().unwrap_or_default()
    }

    /// Both dates, if both parsed and lie in [`SUPPORTED_YEARS`].
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let usable = |date: Option<NaiveDate>| date.filter(|d| is_supported_date(*d));
        Some((usable(self.start_date)?, usable(self.end_date)?))
    }
}

/// Serde helper for optional dates that never fails the surrounding document.
mod lenient_date {
    use chrono::{DateTime, NaiveDate};
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(d) => serializer.serialize_str(&d.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::String(s) => parse(&s),
            _ => None,
        })
    }

    pub fn parse(s: &str) -> Option<NaiveDate> {
        let s = s.trim();
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
            .filter(|d| super::is_supported_date(*d))
    }
}

pub use lenient_date::parse as parse_date;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_keys_round_trip_through_from_key() {
        for status in TaskStatus::DEFAULTS {
            assert_eq!(TaskStatus::from_key(status.key()), status);
        }
        assert_eq!(
            TaskStatus::from_key("review"),
            TaskStatus::Custom("review".into())
        );
    }

    #[test]
    fn invalid_dates_deserialize_as_none() {
        let json = r#"{
            "id": "t1",
            "title": "Broken",
            "start_date": "not-a-date",
            "end_date": 42
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.start_date, None);
        assert_eq!(task.end_date, None);
        assert_eq!(task.date_range(), None);
        assert_eq!(task.effective_status(), TaskStatus::Todo);
    }

    #[test]
    fn rfc3339_timestamps_keep_the_date_part() {
        let json = r#"{
            "id": "t2",
            "title": "Timestamped",
            "start_date": "2024-01-05T09:30:00Z",
            "end_date": "2024-01-07",
            "status": "in-progress"
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.start_date, NaiveDate::from_ymd_opt(2024, 1, 5));
        assert_eq!(task.end_date, NaiveDate::from_ymd_opt(2024, 1, 7));
        assert_eq!(task.status, Some(TaskStatus::InProgress));
    }

    #[test]
    fn missing_status_is_not_serialized() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let task = Task::new("p", "Plain", d, d);
        let json = serde_json::to_string(&task).unwrap();
        assert!(!json.contains("status"));
        assert!(json.contains("\"2024-03-01\""));
    }
}
