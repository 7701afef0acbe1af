//! Timeline geometry for positioned events.
//!
//! Vertical values are in hours from the top of the visible window,
//! horizontal values are fractions of the day column's width. Converting
//! them to pixels is up to the renderer.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::columns::ColumnAssignment;
use crate::config::LayoutConfig;
use crate::event::CalendarEvent;
use crate::hour_range::HourRange;
use crate::time_math::{hours_from, start_of_day};

/// Box of one event inside a day column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EventGeometry {
    pub top_hours: f64,
    pub height_hours: f64,
    pub left_fraction: f64,
    pub width_fraction: f64,
}

impl EventGeometry {
    pub fn bottom_hours(&self) -> f64 {
        self.top_hours + self.height_hours
    }
}

pub fn position_event(
    event: &CalendarEvent,
    assignment: &ColumnAssignment,
    hour_range: &HourRange,
    config: &LayoutConfig,
) -> EventGeometry {
    let width_fraction = 1.0 / assignment.total_columns.max(1) as f64;

    EventGeometry {
        top_hours: hours_from(event.start, hour_range.min),
        height_hours: event.duration_hours().max(config.min_height_hours),
        left_fraction: assignment.column as f64 * width_fraction,
        width_fraction,
    }
}

/// Date-time under a click `offset_hours` below the top of `day`'s timeline,
/// snapped down to `config.snap_minutes`.
///
/// Offsets outside the window are clamped to it; hours past 24 land on the
/// following day.
pub fn time_at_offset(
    day: NaiveDate,
    hour_range: &HourRange,
    offset_hours: f64,
    config: &LayoutConfig,
) -> NaiveDateTime {
    let offset = if offset_hours.is_nan() {
        0.0
    } else {
        offset_hours.clamp(0.0, f64::from(hour_range.span()))
    };

    let minutes = ((f64::from(hour_range.min) + offset) * 60.0).floor() as i64;
    let snap = i64::from(config.snap_minutes.max(1));
    let snapped = minutes - minutes.rem_euclid(snap);

    start_of_day(day) + Duration::minutes(snapped)
}
