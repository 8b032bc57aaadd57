use std::path::Path;

use chrono::NaiveDate;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::model::task::{is_supported_date, parse_date as parse_iso_date};
use crate::model::{Task, TaskStatus};

/// Map a free-form status cell to a task status.
fn parse_status(s: &str) -> Option<TaskStatus> {
    let status = match s.trim().to_lowercase().as_str() {
        "" => return None,
        "finished" | "done" | "complete" | "completed" => TaskStatus::Done,
        "in progress" | "in-progress" | "active" | "started" => TaskStatus::InProgress,
        "pending" | "waiting" | "on hold" => TaskStatus::Pending,
        "blocked" => TaskStatus::Blocked,
        "todo" | "to do" | "not started" | "not-started" | "new" | "planned" => TaskStatus::Todo,
        _ => TaskStatus::from_key(s),
    };
    Some(status)
}

/// Try parsing a date string with several common formats.
fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Some(d) = parse_iso_date(s) {
        return Some(d);
    }
    ["%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y/%m/%d"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .filter(|d| is_supported_date(*d))
}

fn parse_flag(s: &str) -> bool {
    matches!(s.trim().to_lowercase().as_str(), "yes" | "true" | "1" | "x" | "done")
}

/// Detect delimiter by checking the first line for common separators.
fn detect_delimiter(first_line: &str) -> u8 {
    let semicolons = first_line.matches(';').count();
    let commas = first_line.matches(',').count();
    let tabs = first_line.matches('\t').count();

    if semicolons >= commas && semicolons >= tabs {
        b';'
    } else if tabs >= commas {
        b'\t'
    } else {
        b','
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Title,
    Start,
    End,
    Status,
    Description,
    Completed,
}

/// Map a header to a column, ignoring case, spaces, hyphens and underscores.
fn header_to_column(header: &str) -> Option<Column> {
    let normalized = header.trim().to_lowercase().replace([' ', '-', '_'], "");
    match normalized.as_str() {
        "title" | "name" | "task" | "tasklabel" | "taskname" | "label" => Some(Column::Title),
        "start" | "startdate" | "from" | "begin" => Some(Column::Start),
        "end" | "enddate" | "to" | "finish" | "due" | "duedate" => Some(Column::End),
        "status" | "state" | "stage" => Some(Column::Status),
        "description" | "notes" | "details" => Some(Column::Description),
        "completed" | "complete" | "done" => Some(Column::Completed),
        _ => None,
    }
}

/// Parse CSV text into tasks for `project_id`.
///
/// Rows without a title are skipped. Rows with unusable dates are kept with
/// the date unset; the timeline leaves them out while the board still shows
/// them. Returns `(tasks, skipped_count)`.
pub fn parse_csv(content: &str, project_id: &str) -> Result<(Vec<Task>, usize)> {
    let first_line = content.lines().next().unwrap_or("");
    let delimiter = detect_delimiter(first_line);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let columns: Vec<Option<Column>> = headers.iter().map(header_to_column).collect();

    let has = |c: Column| columns.contains(&Some(c));
    if !has(Column::Title) || !has(Column::Start) || !has(Column::End) {
        return Err(Error::MissingColumns {
            found: headers.iter().map(str::to_string).collect(),
        });
    }

    let mut tasks = Vec::new();
    let mut skipped = 0usize;

    for (i, result) in reader.records().enumerate() {
        let row = i + 2;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                warn!(row, error = %e, "Skipping unreadable CSV row");
                skipped += 1;
                continue;
            }
        };

        let field = |wanted: Column| {
            columns
                .iter()
                .position(|c| *c == Some(wanted))
                .and_then(|idx| record.get(idx))
                .unwrap_or("")
        };

        let title = field(Column::Title);
        if title.is_empty() {
            skipped += 1;
            continue;
        }

        let start_date = parse_date(field(Column::Start));
        let end_date = parse_date(field(Column::End));
        if start_date.is_none() || end_date.is_none() {
            warn!(row, title, "CSV row has an unusable date; it will not appear on the timeline");
        }

        let status = parse_status(field(Column::Status));
        let completed = if has(Column::Completed) {
            parse_flag(field(Column::Completed))
        } else {
            status.as_ref().is_some_and(TaskStatus::is_done)
        };

        tasks.push(Task {
            id: Uuid::new_v4().to_string(),
            project_id: project_id.to_string(),
            title: title.to_string(),
            description: field(Column::Description).to_string(),
            start_date,
            end_date,
            completed,
            status,
        });
    }

    if tasks.is_empty() {
        return Err(Error::EmptyImport { skipped });
    }
    debug!(imported = tasks.len(), skipped, "CSV parsed");
    Ok((tasks, skipped))
}

/// Import tasks from a CSV file.
pub fn import_csv(path: &Path, project_id: &str) -> Result<(Vec<Task>, usize)> {
    let content = std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_csv(&content, project_id)
}
