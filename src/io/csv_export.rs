use std::io::Write;
use std::path::Path;

use chrono::NaiveDate;

use crate::error::{Error, Result};
use crate::model::Task;

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Write tasks as semicolon-delimited CSV matching the import format.
///
/// Columns: Title ; Start Date ; End Date ; Status ; Completed.
/// Unusable dates are written as empty cells. Returns the number of tasks written.
pub fn write_csv<W: Write>(tasks: &[Task], writer: W) -> Result<usize> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .from_writer(writer);

    wtr.write_record(["Title", "Start Date", "End Date", "Status", "Completed"])?;

    for task in tasks {
        let start = format_date(task.start_date);
        let end = format_date(task.end_date);
        let status = task.effective_status();
        let completed = if task.completed { "yes" } else { "no" };
        wtr.write_record([
            task.title.as_str(),
            start.as_str(),
            end.as_str(),
            status.key(),
            completed,
        ])?;
    }

    wtr.flush().map_err(|e| Error::Csv(e.into()))?;
    Ok(tasks.len())
}

/// Export tasks to a CSV file at `path`.
pub fn export_csv(tasks: &[Task], path: &Path) -> Result<usize> {
    let file = std::fs::File::create(path).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })?;
    write_csv(tasks, file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TaskStatus;

    #[test]
    fn writes_header_and_rows() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let mut done = Task::new("p", "Ship", d, d);
        done.status = Some(TaskStatus::Done);
        done.completed = true;
        let mut broken = Task::new("p", "Broken", d, d);
        broken.end_date = None;

        let mut out = Vec::new();
        let written = write_csv(&[done, broken], &mut out).unwrap();
        assert_eq!(written, 2);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "Title;Start Date;End Date;Status;Completed");
        assert_eq!(lines[1], "Ship;2024-01-05;2024-01-05;done;yes");
        assert_eq!(lines[2], "Broken;2024-01-05;;todo;no");
    }
}
