//! Timeline layout engine.
//!
//! Turns a task snapshot plus the current view state into a [`TimelineModel`]:
//! the period columns, the effective date span and one placement per task.
//! The model is recomputed from scratch on every change and borrows the tasks
//! it describes. Both the editable timeline and the read-only share view draw
//! from the same model through [`TimelineModel::bar_geometry`], so their
//! geometry cannot drift apart.

pub mod periods;
pub mod position;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::model::task::is_supported_date;
use crate::model::{DateSpan, Period, Task, TimelineScale};
use crate::state::ViewState;
pub use periods::{generate_periods, PeriodRange};
pub use position::{resolve_position, TaskPosition};

/// Narrowest a task bar is ever drawn, so degenerate ranges stay clickable.
pub const MIN_BAR_WIDTH: f32 = 20.0;

/// A task whose dates both parsed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledTask<'a> {
    pub task: &'a Task,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl<'a> ScheduledTask<'a> {
    pub fn from_task(task: &'a Task) -> Option<Self> {
        let (start, end) = task.date_range()?;
        Some(Self { task, start, end })
    }
}

/// One laid-out row.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskLayout<'a> {
    pub task: &'a Task,
    pub position: TaskPosition,
}

/// Horizontal placement of a bar inside the scrollable content, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarGeometry {
    pub left: f32,
    pub width: f32,
}

/// Render-ready timeline description.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineModel<'a> {
    pub scale: TimelineScale,
    pub periods: Vec<Period>,
    /// Effective boundary used for offset math; `None` when nothing is laid out.
    pub span: Option<DateSpan>,
    pub column_width: f32,
    pub rows: Vec<TaskLayout<'a>>,
    /// Number of input tasks left out because of unusable dates.
    pub dropped: usize,
}

impl<'a> TimelineModel<'a> {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Full scrollable width of the grid.
    pub fn content_width(&self) -> f32 {
        self.periods.len() as f32 * self.column_width
    }

    pub fn bar_geometry(&self, row: &TaskLayout<'_>) -> BarGeometry {
        let content = self.content_width();
        BarGeometry {
            left: (row.position.offset * content as f64) as f32,
            width: ((row.position.length * content as f64) as f32).max(MIN_BAR_WIDTH),
        }
    }

    pub fn row(&self, task_id: &str) -> Option<&TaskLayout<'a>> {
        self.rows.iter().find(|r| r.task.id == task_id)
    }

    /// Pixel position of the start of `date`, if it lies inside a period.
    pub fn date_x(&self, date: NaiveDate) -> Option<f32> {
        let index = self.periods.iter().position(|p| p.contains(date))?;
        let period = &self.periods[index];
        let days = (period.end - period.start).num_days() as f32 + 1.0;
        let into = (date - period.start).num_days() as f32;
        Some((index as f32 + into / days) * self.column_width)
    }
}

/// Zoomed column width: `round(base * zoom / 100)`.
pub fn column_width(scale: TimelineScale, zoom_percent: u16) -> f32 {
    (scale.base_column_width() * zoom_percent as f32 / 100.0).round()
}

/// Keep only tasks with two usable dates, logging each one left out.
pub fn schedulable(tasks: &[Task]) -> Vec<ScheduledTask<'_>> {
    tasks
        .iter()
        .filter_map(|task| {
            let scheduled = ScheduledTask::from_task(task);
            if scheduled.is_none() {
                let start_ok = task.start_date.is_some_and(is_supported_date);
                let field = if start_ok { "end_date" } else { "start_date" };
                warn!(task_id = %task.id, field, "Dropping task with invalid date from timeline");
            }
            scheduled
        })
        .collect()
}

/// Build the timeline for `tasks` at a fixed scale and zoom.
pub fn layout_tasks(tasks: &[Task], scale: TimelineScale, zoom_percent: u16) -> TimelineModel<'_> {
    let scheduled = schedulable(tasks);
    let dropped = tasks.len() - scheduled.len();
    let column_width = column_width(scale, zoom_percent);

    let Some(range) = generate_periods(&scheduled, scale) else {
        return TimelineModel {
            scale,
            periods: Vec::new(),
            span: None,
            column_width,
            rows: Vec::new(),
            dropped,
        };
    };

    let rows = scheduled
        .iter()
        .map(|s| TaskLayout {
            task: s.task,
            position: resolve_position(s, &range.periods, range.span, scale),
        })
        .collect();

    debug!(
        ?scale,
        periods = range.periods.len(),
        dropped,
        "Timeline layout rebuilt"
    );

    TimelineModel {
        scale,
        periods: range.periods,
        span: Some(range.span),
        column_width,
        rows,
        dropped,
    }
}

/// Build the model for the current view.
///
/// Returns `None` when the view is the Kanban board, which bypasses layout.
pub fn build_model<'a>(tasks: &'a [Task], view: &ViewState) -> Option<TimelineModel<'a>> {
    let scale = view.granularity.scale()?;
    Some(layout_tasks(tasks, scale, view.zoom_percent))
}
