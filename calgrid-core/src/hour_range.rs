//! Visible hour window of a timeline day.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::LayoutConfig;
use crate::event::CalendarEvent;
use crate::time_math::hour_of;

/// Last representable hour: 24..=29 stand for 00:00-05:00 of the next day.
pub const MAX_HOUR: i32 = 29;

/// Largest carry cutoff that keeps carried hours within [`MAX_HOUR`].
pub const MIDNIGHT_CARRY_LIMIT: u32 = 6;

/// Inclusive `[min, max]` hour window, `min < max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HourRange {
    pub min: i32,
    pub max: i32,
}

impl HourRange {
    pub fn new(min: i32, max: i32) -> Self {
        HourRange { min, max }
    }

    pub fn span(&self) -> i32 {
        self.max - self.min
    }

    pub fn contains_hour(&self, hour: i32) -> bool {
        hour >= self.min && hour <= self.max
    }

    /// Hour labels from `min` to `max`, both included.
    pub fn hours(&self) -> impl Iterator<Item = i32> + use<> {
        self.min..=self.max
    }

    /// Smallest window covering both ranges.
    pub fn union(&self, other: &HourRange) -> HourRange {
        HourRange {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

impl fmt::Display for HourRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.min, self.max)
    }
}

/// Derive the hours to show for `day` from its timed events.
///
/// Falls back to the configured working-hours window when the day has no
/// timed events, and widens short windows to `min_span_hours`.
pub fn compute_hour_range<'a, I>(events: I, day: NaiveDate, config: &LayoutConfig) -> HourRange
where
    I: IntoIterator<Item = &'a CalendarEvent>,
{
    match raw_bounds(events, day, config) {
        Some((min, max)) => enforce_min_span(min, max, config.min_span_hours),
        None => config.fallback_range(),
    }
}

/// Shared window for a week timeline: the union of each day's range,
/// counting only days that have timed events.
pub fn compute_week_hour_range<'a, I, D>(events: I, days: D, config: &LayoutConfig) -> HourRange
where
    I: IntoIterator<Item = &'a CalendarEvent>,
    I::IntoIter: Clone,
    D: IntoIterator<Item = NaiveDate>,
{
    let events = events.into_iter();

    days.into_iter()
        .filter_map(|day| {
            raw_bounds(events.clone(), day, config)
                .map(|(min, max)| enforce_min_span(min, max, config.min_span_hours))
        })
        .reduce(|acc, range| acc.union(&range))
        .unwrap_or_else(|| config.fallback_range())
}

/// Earliest start hour and latest end hour of the day's timed events.
fn raw_bounds<'a, I>(events: I, day: NaiveDate, config: &LayoutConfig) -> Option<(i32, i32)>
where
    I: IntoIterator<Item = &'a CalendarEvent>,
{
    events
        .into_iter()
        .filter(|event| event.is_timed_on(day))
        .map(|event| {
            let start = hour_of(event.start) as i32;
            let end_dt = event.end.unwrap_or(event.start);
            let mut end = hour_of(end_dt) as i32;

            if end_dt.date() > day && hour_of(end_dt) < config.midnight_carry_cutoff {
                end += 24;
            }

            trace!(id = %event.id, start, end, "hour bounds");
            (start, end.max(start))
        })
        .reduce(|(lo, hi), (start, end)| (lo.min(start), hi.max(end)))
}

/// Re-center windows narrower than `span` around their midpoint, keeping
/// the result inside `[0, MAX_HOUR]`.
fn enforce_min_span(min: i32, max: i32, span: i32) -> HourRange {
    if max - min >= span {
        return HourRange::new(min.max(0), max.min(MAX_HOUR));
    }

    let mut lo = (min + max - span).div_euclid(2);
    let mut hi = lo + span;

    if lo < 0 {
        hi -= lo;
        lo = 0;
    }
    if hi > MAX_HOUR {
        lo = (lo - (hi - MAX_HOUR)).max(0);
        hi = MAX_HOUR;
    }

    HourRange::new(lo, hi)
}
