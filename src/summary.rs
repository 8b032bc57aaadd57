//! Project summaries and the debounce that keeps them current.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use tracing::trace;

use crate::error::{Error, Result};
use crate::model::Task;

/// Produces a human-readable digest of a project's tasks.
pub trait Summarizer {
    fn summarize(&self, project_name: &str, tasks: &[Task]) -> Result<String>;
}

/// Deterministic progress digest: counts, completion and date span.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProgressSummarizer;

impl Summarizer for ProgressSummarizer {
    fn summarize(&self, project_name: &str, tasks: &[Task]) -> Result<String> {
        if tasks.is_empty() {
            return Err(Error::Summary(format!("'{project_name}' has no tasks")));
        }

        let done = tasks.iter().filter(|t| t.completed).count();
        let percent = done * 100 / tasks.len();

        let mut by_status: BTreeMap<String, usize> = BTreeMap::new();
        for task in tasks {
            *by_status.entry(task.effective_status().to_string()).or_default() += 1;
        }

        let start = tasks.iter().filter_map(Task::date_range).map(|(s, _)| s).min();
        let end = tasks.iter().filter_map(Task::date_range).map(|(_, e)| e).max();
        let undated = tasks.iter().filter(|t| t.date_range().is_none()).count();

        let mut out = format!(
            "{project_name}: {done} of {} tasks complete ({percent}%).",
            tasks.len()
        );
        if let (Some(start), Some(end)) = (start, end) {
            out.push_str(&format!(
                " Scheduled {} to {}.",
                start.format("%Y-%m-%d"),
                end.format("%Y-%m-%d")
            ));
        }
        let statuses: Vec<String> = by_status
            .iter()
            .map(|(status, n)| format!("{status}: {n}"))
            .collect();
        out.push_str(&format!(" By status: {}.", statuses.join(", ")));
        if undated > 0 {
            out.push_str(&format!(" {undated} without valid dates."));
        }
        Ok(out)
    }
}

pub type Generation = u64;

/// Trailing-edge debounce for summary requests.
///
/// Every [`schedule`](Self::schedule) cancels what was pending and restarts
/// the delay under a new generation. A result computed for an older
/// generation is rejected by [`accept`](Self::accept).
#[derive(Debug, Clone)]
pub struct SummaryDebouncer {
    delay: Duration,
    generation: Generation,
    due: Option<(Generation, Instant)>,
}

impl SummaryDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: 0,
            due: None,
        }
    }

    pub fn schedule(&mut self, now: Instant) -> Generation {
        self.generation += 1;
        self.due = Some((self.generation, now + self.delay));
        trace!(generation = self.generation, "Summary rescheduled");
        self.generation
    }

    pub fn cancel(&mut self) {
        self.due = None;
    }

    pub fn is_pending(&self) -> bool {
        self.due.is_some()
    }

    /// Time left before the pending request fires.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.due.map(|(_, at)| at.saturating_duration_since(now))
    }

    /// Fire the pending request once its delay has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<Generation> {
        match self.due {
            Some((generation, at)) if now >= at => {
                self.due = None;
                Some(generation)
            }
            _ => None,
        }
    }

    pub fn accept(&self, generation: Generation) -> bool {
        generation == self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TaskStatus;
    use chrono::NaiveDate;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    #[test]
    fn progress_digest() {
        let mut a = Task::new("p", "A", d(1), d(4));
        a.completed = true;
        a.status = Some(TaskStatus::Done);
        let b = Task::new("p", "B", d(3), d(10));
        let mut c = Task::new("p", "C", d(2), d(2));
        c.end_date = None;

        let text = ProgressSummarizer.summarize("Launch", &[a, b, c]).unwrap();
        assert_eq!(
            text,
            "Launch: 1 of 3 tasks complete (33%). Scheduled 2024-03-01 to 2024-03-10. \
             By status: done: 1, todo: 2. 1 without valid dates."
        );
    }

    #[test]
    fn undated_project_skips_the_schedule() {
        let mut a = Task::new("p", "A", d(1), d(4));
        a.start_date = None;

        let text = ProgressSummarizer.summarize("Loose", &[a]).unwrap();
        assert_eq!(
            text,
            "Loose: 0 of 1 tasks complete (0%). By status: todo: 1. 1 without valid dates."
        );
    }

    #[test]
    fn empty_project_has_no_summary() {
        assert!(matches!(
            ProgressSummarizer.summarize("Empty", &[]),
            Err(Error::Summary(_))
        ));
    }

    #[test]
    fn rescheduling_restarts_the_delay() {
        let t0 = Instant::now();
        let mut debounce = SummaryDebouncer::new(Duration::from_millis(500));
        debounce.schedule(t0);
        let second = debounce.schedule(t0 + Duration::from_millis(400));

        assert_eq!(debounce.poll(t0 + Duration::from_millis(600)), None);
        assert_eq!(debounce.poll(t0 + Duration::from_millis(900)), Some(second));
        assert_eq!(debounce.poll(t0 + Duration::from_millis(1000)), None);
        assert!(!debounce.is_pending());
    }

    #[test]
    fn stale_results_are_rejected() {
        let t0 = Instant::now();
        let mut debounce = SummaryDebouncer::new(Duration::from_millis(100));
        let first = debounce.schedule(t0);
        let fired = debounce.poll(t0 + Duration::from_millis(100)).unwrap();
        assert_eq!(fired, first);

        debounce.schedule(t0 + Duration::from_millis(150));
        assert!(!debounce.accept(first));
    }

    #[test]
    fn cancel_drops_the_pending_request() {
        let t0 = Instant::now();
        let mut debounce = SummaryDebouncer::new(Duration::from_millis(100));
        debounce.schedule(t0);
        assert_eq!(debounce.remaining(t0), Some(Duration::from_millis(100)));
        debounce.cancel();
        assert_eq!(debounce.poll(t0 + Duration::from_secs(1)), None);
    }
}
