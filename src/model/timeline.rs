use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// What the main view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Daily,
    #[default]
    Weekly,
    Monthly,
    Kanban,
}

impl Granularity {
    pub const ALL: [Granularity; 4] = [
        Granularity::Daily,
        Granularity::Weekly,
        Granularity::Monthly,
        Granularity::Kanban,
    ];

    /// The timeline scale for this granularity; `None` for the board.
    pub fn scale(self) -> Option<TimelineScale> {
        match self {
            Granularity::Daily => Some(TimelineScale::Daily),
            Granularity::Weekly => Some(TimelineScale::Weekly),
            Granularity::Monthly => Some(TimelineScale::Monthly),
            Granularity::Kanban => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Granularity::Daily => "Daily",
            Granularity::Weekly => "Weekly",
            Granularity::Monthly => "Monthly",
            Granularity::Kanban => "Kanban",
        }
    }
}

/// Bucket size of a timeline column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimelineScale {
    Daily,
    Weekly,
    Monthly,
}

impl TimelineScale {
    /// Unzoomed column width in pixels. Wider buckets carry longer labels.
    pub fn base_column_width(self) -> f32 {
        match self {
            TimelineScale::Daily => 40.0,
            TimelineScale::Weekly => 96.0,
            TimelineScale::Monthly => 140.0,
        }
    }
}

/// One timeline column: a day, a Sunday-aligned week or a calendar month.
///
/// `start` and `end` are both inclusive; a daily period has `start == end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub scale: TimelineScale,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Column label.
    pub fn label(&self) -> String {
        match self.scale {
            TimelineScale::Daily => self.start.format("%a %-d").to_string(),
            TimelineScale::Weekly => self.start.format("%b %-d").to_string(),
            TimelineScale::Monthly => self.start.format("%b %Y").to_string(),
        }
    }

    /// Secondary label drawn above the first column of each month in the
    /// daily and weekly headers.
    pub fn group_label(&self, previous: Option<&Period>) -> Option<String> {
        if self.scale == TimelineScale::Monthly {
            return None;
        }
        let new_month = previous
            .map(|p| p.start.month() != self.start.month() || p.start.year() != self.start.year())
            .unwrap_or(true);
        new_month.then(|| self.start.format("%b %Y").to_string())
    }

    pub fn is_weekend(&self) -> bool {
        self.scale == TimelineScale::Daily && self.start.weekday().num_days_from_monday() >= 5
    }
}

/// Inclusive date span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateSpan {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateSpan {
    /// Number of calendar days covered, never less than one.
    pub fn days(&self) -> i64 {
        ((self.end - self.start).num_days() + 1).max(1)
    }
}

/// Sunday on or before `date`, saturating at the earliest representable date.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    date.checked_sub_days(Days::new(date.weekday().num_days_from_sunday() as u64))
        .unwrap_or(NaiveDate::MIN)
}

/// Saturday on or after `date`, saturating at the latest representable date.
pub fn end_of_week(date: NaiveDate) -> NaiveDate {
    start_of_week(date)
        .checked_add_days(Days::new(6))
        .unwrap_or(NaiveDate::MAX)
}

pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn end_of_month(date: NaiveDate) -> NaiveDate {
    let (y, m) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(y, m, 1)
        .and_then(|first| first.pred_opt())
        .unwrap_or(date)
}
