//! Numeric helpers over dates and times.
//!
//! All values are taken as given: no timezone conversion happens here.

use chrono::{Datelike, Days, Duration, Months, NaiveDate, NaiveDateTime, Timelike, Weekday};

/// Duration assumed for events without an end.
pub const DEFAULT_EVENT_MINUTES: i64 = 60;

pub fn hour_of(dt: NaiveDateTime) -> u32 {
    dt.hour()
}

pub fn minute_of(dt: NaiveDateTime) -> u32 {
    dt.minute()
}

/// Hour plus minutes as a fraction, e.g. 09:30 -> 9.5. Seconds are ignored.
pub fn fractional_hour(dt: NaiveDateTime) -> f64 {
    f64::from(hour_of(dt)) + f64::from(minute_of(dt)) / 60.0
}

/// Offset in hours of `dt` below `base_hour` on the same timeline column.
pub fn hours_from(dt: NaiveDateTime, base_hour: i32) -> f64 {
    fractional_hour(dt) - f64::from(base_hour)
}

/// Missing end means start + 60 minutes; an end before start collapses to start.
pub fn effective_end(start: NaiveDateTime, end: Option<NaiveDateTime>) -> NaiveDateTime {
    match end {
        Some(end) if end >= start => end,
        Some(_) => start,
        None => start + Duration::minutes(DEFAULT_EVENT_MINUTES),
    }
}

/// Length of the event in hours, never negative.
pub fn duration_hours(start: NaiveDateTime, end: Option<NaiveDateTime>) -> f64 {
    let seconds = (effective_end(start, end) - start).num_seconds();
    seconds as f64 / 3600.0
}

pub fn is_on_day(dt: NaiveDateTime, day: NaiveDate) -> bool {
    dt.date() == day
}

/// Whether the event ends on a later calendar day than it starts.
pub fn crosses_midnight(start: NaiveDateTime, end: Option<NaiveDateTime>) -> bool {
    effective_end(start, end).date() > start.date()
}

pub fn start_of_day(day: NaiveDate) -> NaiveDateTime {
    day.and_time(chrono::NaiveTime::MIN)
}

pub fn start_of_month(day: NaiveDate) -> NaiveDate {
    day - Days::new(u64::from(day.day0()))
}

pub fn end_of_month(day: NaiveDate) -> NaiveDate {
    start_of_month(day) + Months::new(1) - Days::new(1)
}

/// First day of the week containing `day`, for weeks beginning on `week_start`.
pub fn start_of_week(day: NaiveDate, week_start: Weekday) -> NaiveDate {
    let offset = (7 + day.weekday().num_days_from_monday() - week_start.num_days_from_monday()) % 7;
    day - Days::new(u64::from(offset))
}

/// Last day of the week containing `day`.
pub fn end_of_week(day: NaiveDate, week_start: Weekday) -> NaiveDate {
    start_of_week(day, week_start) + Days::new(6)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(h: u32, m: u32) -> NaiveDateTime {
        date(2025, 3, 20).and_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_fractional_hour() {
        assert_eq!(fractional_hour(at(9, 30)), 9.5);
        assert_eq!(fractional_hour(at(0, 0)), 0.0);
        assert_eq!(hours_from(at(9, 15), 8), 1.25);
    }

    #[test]
    fn test_duration_hours() {
        assert_eq!(duration_hours(at(9, 0), Some(at(10, 30))), 1.5);
        assert_eq!(duration_hours(at(9, 0), None), 1.0);
        assert_eq!(duration_hours(at(9, 0), Some(at(8, 0))), 0.0);
        assert_eq!(duration_hours(at(9, 0), Some(at(9, 0))), 0.0);
    }

    #[test]
    fn test_crosses_midnight() {
        let next_day = date(2025, 3, 21).and_hms_opt(1, 0, 0).unwrap();
        assert!(crosses_midnight(at(23, 0), Some(next_day)));
        assert!(!crosses_midnight(at(22, 0), Some(at(23, 0))));
        assert!(crosses_midnight(at(23, 30), None));
    }

    #[test]
    fn test_month_bounds() {
        assert_eq!(start_of_month(date(2024, 2, 17)), date(2024, 2, 1));
        assert_eq!(end_of_month(date(2024, 2, 17)), date(2024, 2, 29));
        assert_eq!(end_of_month(date(2025, 12, 3)), date(2025, 12, 31));
    }

    #[test]
    fn test_week_bounds() {
        // 2025-03-20 is a Thursday
        assert_eq!(start_of_week(date(2025, 3, 20), Weekday::Sun), date(2025, 3, 16));
        assert_eq!(start_of_week(date(2025, 3, 20), Weekday::Mon), date(2025, 3, 17));
        assert_eq!(start_of_week(date(2025, 3, 16), Weekday::Sun), date(2025, 3, 16));
        assert_eq!(end_of_week(date(2025, 3, 20), Weekday::Mon), date(2025, 3, 23));
    }
}
