//! Inclusive range of calendar days.

use std::fmt;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Inclusive date range `[start, end]` a view covers. `start <= end` always
/// holds, deserialized ranges included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawDateRange")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Deserialize)]
struct RawDateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl From<RawDateRange> for DateRange {
    fn from(raw: RawDateRange) -> Self {
        DateRange::new(raw.start, raw.end)
    }
}

impl DateRange {
    /// Build a range, swapping the bounds if they arrive reversed.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        if end < start {
            DateRange { start: end, end: start }
        } else {
            DateRange { start, end }
        }
    }

    pub fn single(day: NaiveDate) -> Self {
        DateRange { start: day, end: day }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        day >= self.start && day <= self.end
    }

    /// Number of days in the range, counting both ends.
    pub fn len_days(&self) -> usize {
        ((self.end - self.start).num_days().max(0) + 1) as usize
    }

    /// Every day from `start` to `end`, in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let start = self.start;
        (0..self.len_days() as u64).map(move |offset| start + Days::new(offset))
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}..{}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}
