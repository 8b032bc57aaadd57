//! Maps a task's date range onto the generated columns.

use super::ScheduledTask;
use crate::model::{DateSpan, Period, TimelineScale};

/// Where a task sits on the timeline, as fractions of the full content width.
///
/// `first_slot`/`slot_count` give the same placement in column units: days on
/// the daily scale, period indices on the weekly and monthly scales.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaskPosition {
    pub offset: f64,
    pub length: f64,
    pub first_slot: usize,
    pub slot_count: usize,
}

/// Resolve the placement of one task.
///
/// The daily scale uses exact day arithmetic against `span`; the weekly and
/// monthly scales snap to whole periods. Both floor the length at one slot.
pub fn resolve_position(
    task: &ScheduledTask<'_>,
    periods: &[Period],
    span: DateSpan,
    scale: TimelineScale,
) -> TaskPosition {
    match scale {
        TimelineScale::Daily => resolve_daily(task, span),
        TimelineScale::Weekly | TimelineScale::Monthly => resolve_bucketed(task, periods),
    }
}

fn resolve_daily(task: &ScheduledTask<'_>, span: DateSpan) -> TaskPosition {
    let total_days = span.days();
    let last = total_days - 1;
    let start_days = (task.start - span.start).num_days().clamp(0, last);
    let end_days = (task.end - span.start).num_days().clamp(0, last);
    let duration = (end_days - start_days + 1).max(1);

    TaskPosition {
        offset: start_days as f64 / total_days as f64,
        length: duration as f64 / total_days as f64,
        first_slot: start_days as usize,
        slot_count: duration as usize,
    }
}

fn resolve_bucketed(task: &ScheduledTask<'_>, periods: &[Period]) -> TaskPosition {
    let total = periods.len().max(1);
    // Unmatched boundaries fall back to the first column, and an unmatched
    // end to the start column.
    let start_index = periods
        .iter()
        .position(|p| p.contains(task.start))
        .unwrap_or(0);
    let end_index = periods
        .iter()
        .position(|p| p.contains(task.end))
        .unwrap_or(start_index)
        .max(start_index);
    let count = end_index - start_index + 1;

    TaskPosition {
        offset: start_index as f64 / total as f64,
        length: count as f64 / total as f64,
        first_slot: start_index,
        slot_count: count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::periods::generate_periods;
    use crate::model::Task;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn task(start: NaiveDate, end: NaiveDate) -> Task {
        Task::new("p", "t", start, end)
    }

    fn place(all: &[Task], index: usize, scale: TimelineScale) -> TaskPosition {
        let scheduled: Vec<_> = all.iter().filter_map(ScheduledTask::from_task).collect();
        let range = generate_periods(&scheduled, scale).unwrap();
        resolve_position(&scheduled[index], &range.periods, range.span, scale)
    }

    #[test]
    fn daily_positions_are_exact_to_the_day() {
        let all = [task(d(2024, 1, 1), d(2024, 1, 3)), task(d(2024, 1, 5), d(2024, 1, 5))];

        let first = place(&all, 0, TimelineScale::Daily);
        assert_eq!(first.offset, 0.0);
        assert!((first.length - 3.0 / 5.0).abs() < 1e-9);
        assert_eq!((first.first_slot, first.slot_count), (0, 3));

        let second = place(&all, 1, TimelineScale::Daily);
        assert!((second.offset - 4.0 / 5.0).abs() < 1e-9);
        assert!((second.length - 1.0 / 5.0).abs() < 1e-9);
    }

    #[test]
    fn same_day_task_is_one_day_long() {
        let all = [task(d(2024, 2, 10), d(2024, 2, 10))];
        let pos = place(&all, 0, TimelineScale::Daily);
        assert_eq!(pos.slot_count, 1);
        assert_eq!(pos.length, 1.0);
    }

    #[test]
    fn reversed_dates_floor_to_one_slot() {
        let all = [
            task(d(2024, 1, 1), d(2024, 1, 20)),
            task(d(2024, 1, 12), d(2024, 1, 8)),
        ];
        let daily = place(&all, 1, TimelineScale::Daily);
        assert_eq!(daily.slot_count, 1);
        assert!(daily.length > 0.0);

        let weekly = place(&all, 1, TimelineScale::Weekly);
        assert_eq!(weekly.slot_count, 1);
        assert!(weekly.length > 0.0);
    }

    #[test]
    fn weekly_task_spans_every_week_it_touches() {
        // Friday 2024-01-26 to Friday 2024-02-02 crosses the Sunday 2024-01-28.
        let all = [task(d(2024, 1, 26), d(2024, 2, 2))];
        let pos = place(&all, 0, TimelineScale::Weekly);
        assert_eq!((pos.first_slot, pos.slot_count), (0, 2));
        assert_eq!(pos.length, 1.0);
    }

    #[test]
    fn task_ending_on_a_saturday_stays_in_its_week() {
        // 2024-01-13 is the Saturday closing the week that starts 2024-01-07.
        let all = [
            task(d(2024, 1, 7), d(2024, 1, 13)),
            task(d(2024, 1, 14), d(2024, 1, 20)),
        ];
        let first = place(&all, 0, TimelineScale::Weekly);
        assert_eq!((first.first_slot, first.slot_count), (0, 1));
        let second = place(&all, 1, TimelineScale::Weekly);
        assert_eq!((second.first_slot, second.slot_count), (1, 1));
    }

    #[test]
    fn unmatched_end_falls_back_to_start_column() {
        let periods = [Period {
            scale: TimelineScale::Monthly,
            start: d(2024, 3, 1),
            end: d(2024, 3, 31),
        }];
        let outside = task(d(2024, 3, 10), d(2024, 5, 2));
        let scheduled = ScheduledTask::from_task(&outside).unwrap();
        let span = DateSpan { start: d(2024, 3, 1), end: d(2024, 3, 31) };
        let pos = resolve_position(&scheduled, &periods, span, TimelineScale::Monthly);
        assert_eq!((pos.first_slot, pos.slot_count), (0, 1));
    }

    #[test]
    fn unmatched_start_falls_back_to_first_column() {
        let periods = [
            Period { scale: TimelineScale::Monthly, start: d(2024, 3, 1), end: d(2024, 3, 31) },
            Period { scale: TimelineScale::Monthly, start: d(2024, 4, 1), end: d(2024, 4, 30) },
        ];
        let early = task(d(2024, 1, 10), d(2024, 4, 2));
        let scheduled = ScheduledTask::from_task(&early).unwrap();
        let span = DateSpan { start: d(2024, 3, 1), end: d(2024, 4, 30) };
        let pos = resolve_position(&scheduled, &periods, span, TimelineScale::Monthly);
        assert_eq!((pos.first_slot, pos.slot_count), (0, 2));
    }

    #[test]
    fn monthly_positions_are_period_fractions() {
        let all = [
            task(d(2024, 1, 15), d(2024, 1, 20)),
            task(d(2024, 2, 27), d(2024, 4, 1)),
        ];
        let pos = place(&all, 1, TimelineScale::Monthly);
        assert_eq!((pos.first_slot, pos.slot_count), (1, 3));
        assert!((pos.offset - 0.25).abs() < 1e-9);
        assert!((pos.length - 0.75).abs() < 1e-9);
    }
}
