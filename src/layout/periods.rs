//! Period generation: turns the date extent of a task set into timeline columns.

use chrono::{Days, Months, NaiveDate};

use super::ScheduledTask;
use crate::model::timeline::{end_of_month, end_of_week, start_of_month, start_of_week};
use crate::model::{DateSpan, Period, TimelineScale};

/// Columns plus the effective boundary used for offset math.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodRange {
    pub periods: Vec<Period>,
    /// Raw extent widened to whole weeks or months where the scale asks for it.
    pub span: DateSpan,
}

/// Raw `[min, max]` over both date fields of every task.
///
/// A task's end can precede its own start (mid-edit), and one task's end can
/// exceed another's start, so every field takes part in both min and max.
pub fn task_extent(tasks: &[ScheduledTask<'_>]) -> Option<DateSpan> {
    let dates = tasks.iter().flat_map(|t| [t.start, t.end]);
    let start = dates.clone().min()?;
    let end = dates.max()?;
    Some(DateSpan { start, end })
}

/// Generate the ordered periods covering `tasks` at `scale`.
///
/// Returns `None` for an empty task set; otherwise at least one period.
pub fn generate_periods(tasks: &[ScheduledTask<'_>], scale: TimelineScale) -> Option<PeriodRange> {
    let raw = task_extent(tasks)?;
    let span = match scale {
        TimelineScale::Daily => raw,
        TimelineScale::Weekly => DateSpan {
            start: start_of_week(raw.start),
            end: end_of_week(raw.end),
        },
        TimelineScale::Monthly => DateSpan {
            start: start_of_month(raw.start),
            end: end_of_month(raw.end),
        },
    };

    let mut periods = Vec::new();
    let mut cursor = span.start;
    loop {
        let (end, next) = match scale {
            TimelineScale::Daily => (cursor, cursor.checked_add_days(Days::new(1))),
            TimelineScale::Weekly => (
                cursor.checked_add_days(Days::new(6)).unwrap_or(NaiveDate::MAX),
                cursor.checked_add_days(Days::new(7)),
            ),
            TimelineScale::Monthly => (end_of_month(cursor), cursor.checked_add_months(Months::new(1))),
        };
        periods.push(Period { scale, start: cursor, end });
        match next {
            Some(next) if next > cursor && next <= span.end => cursor = next,
            _ => break,
        }
    }

    Some(PeriodRange { periods, span })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Task;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn tasks(ranges: &[(NaiveDate, NaiveDate)]) -> Vec<Task> {
        ranges
            .iter()
            .enumerate()
            .map(|(i, (s, e))| {
                let mut t = Task::new("p", format!("task {i}"), *s, *e);
                t.id = format!("t{i}");
                t
            })
            .collect()
    }

    fn scheduled(tasks: &[Task]) -> Vec<ScheduledTask<'_>> {
        tasks.iter().filter_map(ScheduledTask::from_task).collect()
    }

    #[test]
    fn empty_input_has_no_periods() {
        assert_eq!(generate_periods(&[], TimelineScale::Daily), None);
    }

    #[test]
    fn daily_periods_cover_every_day_inclusive() {
        let ts = tasks(&[(d(2024, 1, 1), d(2024, 1, 3)), (d(2024, 1, 5), d(2024, 1, 5))]);
        let range = generate_periods(&scheduled(&ts), TimelineScale::Daily).unwrap();
        assert_eq!(range.periods.len(), 5);
        assert_eq!(range.span, DateSpan { start: d(2024, 1, 1), end: d(2024, 1, 5) });
        assert!(range.periods.iter().all(|p| p.start == p.end));
    }

    #[test]
    fn extent_flattens_start_and_end_of_every_task() {
        // Second task starts earlier but the first one ends later.
        let ts = tasks(&[(d(2024, 1, 10), d(2024, 1, 30)), (d(2024, 1, 2), d(2024, 1, 12))]);
        let extent = task_extent(&scheduled(&ts)).unwrap();
        assert_eq!(extent, DateSpan { start: d(2024, 1, 2), end: d(2024, 1, 30) });
    }

    #[test]
    fn reversed_task_still_contributes_both_dates() {
        let ts = tasks(&[(d(2024, 1, 9), d(2024, 1, 4))]);
        let extent = task_extent(&scheduled(&ts)).unwrap();
        assert_eq!(extent, DateSpan { start: d(2024, 1, 4), end: d(2024, 1, 9) });
    }

    #[test]
    fn weekly_widens_to_whole_weeks() {
        // 2024-01-29 is a Monday, 2024-02-02 a Friday: one Sunday-aligned week.
        let ts = tasks(&[(d(2024, 1, 29), d(2024, 2, 2))]);
        let range = generate_periods(&scheduled(&ts), TimelineScale::Weekly).unwrap();
        assert_eq!(range.span, DateSpan { start: d(2024, 1, 28), end: d(2024, 2, 3) });
        assert_eq!(range.periods.len(), 1);
        assert_eq!(range.periods[0].end, d(2024, 2, 3));
    }

    #[test]
    fn weekly_span_crossing_a_sunday_yields_two_weeks() {
        let ts = tasks(&[(d(2024, 1, 26), d(2024, 2, 2))]);
        let range = generate_periods(&scheduled(&ts), TimelineScale::Weekly).unwrap();
        assert_eq!(range.periods.len(), 2);
        assert_eq!(range.periods[1].start, d(2024, 1, 28));
    }

    #[test]
    fn monthly_widens_to_whole_months() {
        let ts = tasks(&[(d(2023, 11, 20), d(2024, 2, 3))]);
        let range = generate_periods(&scheduled(&ts), TimelineScale::Monthly).unwrap();
        assert_eq!(range.span, DateSpan { start: d(2023, 11, 1), end: d(2024, 2, 29) });
        let starts: Vec<_> = range.periods.iter().map(|p| p.start).collect();
        assert_eq!(starts, vec![d(2023, 11, 1), d(2023, 12, 1), d(2024, 1, 1), d(2024, 2, 1)]);
        assert_eq!(range.periods[2].end, d(2024, 1, 31));
    }

    #[test]
    fn single_day_task_produces_one_period_at_every_scale() {
        let ts = tasks(&[(d(2024, 6, 15), d(2024, 6, 15))]);
        for scale in [TimelineScale::Daily, TimelineScale::Weekly, TimelineScale::Monthly] {
            let range = generate_periods(&scheduled(&ts), scale).unwrap();
            assert_eq!(range.periods.len(), 1, "{scale:?}");
        }
    }

    #[test]
    fn calendar_edge_dates_end_the_loop_instead_of_overflowing() {
        let last = Task::new("p", "last", NaiveDate::MAX, NaiveDate::MAX);
        let first = Task::new("p", "first", NaiveDate::MIN, NaiveDate::MIN);
        fn edge(task: &Task) -> ScheduledTask<'_> {
            ScheduledTask {
                task,
                start: task.start_date.unwrap(),
                end: task.end_date.unwrap(),
            }
        }
        for scale in [TimelineScale::Daily, TimelineScale::Weekly, TimelineScale::Monthly] {
            let range = generate_periods(&[edge(&last)], scale).unwrap();
            assert_eq!(range.periods.len(), 1, "{scale:?}");
            assert!(range.periods[0].contains(NaiveDate::MAX), "{scale:?}");

            let range = generate_periods(&[edge(&first)], scale).unwrap();
            assert_eq!(range.periods.len(), 1, "{scale:?}");
            assert!(range.periods[0].contains(NaiveDate::MIN), "{scale:?}");
        }
    }
}
