//! Position of the live "now" marker.
//!
//! The marker is a pure function of an injected `now`; the caller re-runs it
//! on its own timer (see `LayoutConfig::now_refresh`).

use chrono::{Days, NaiveDate, NaiveDateTime};

use crate::hour_range::HourRange;
use crate::time_math::{fractional_hour, hour_of};

/// Hours from the top of `hour_range` to `now`, or `None` when the current
/// hour lies outside the window.
pub fn current_offset(hour_range: &HourRange, now: NaiveDateTime) -> Option<f64> {
    let hour = hour_of(now) as i32;
    hour_range
        .contains_hour(hour)
        .then(|| fractional_hour(now) - f64::from(hour_range.min))
}

/// Like [`current_offset`], but only for `day`'s timeline.
///
/// Early hours of the following day count as 24..=29 so the marker can sit in
/// a window that runs past midnight.
pub fn current_offset_on_day(
    day: NaiveDate,
    hour_range: &HourRange,
    now: NaiveDateTime,
) -> Option<f64> {
    if now.date() == day {
        return current_offset(hour_range, now);
    }

    let next_day = day.checked_add_days(Days::new(1))?;
    if now.date() != next_day {
        return None;
    }

    let carried = hour_of(now) as i32 + 24;
    hour_range
        .contains_hour(carried)
        .then(|| fractional_hour(now) + 24.0 - f64::from(hour_range.min))
}
