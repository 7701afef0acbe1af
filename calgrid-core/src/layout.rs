//! Render-ready layouts for each view.
//!
//! These compose the shared primitives: month and week grids come from
//! [`group_by_day`], day and week timelines from the hour range, column
//! packing and positioning passes. Everything borrows the caller's events.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::debug;

use crate::columns::assign_columns;
use crate::config::LayoutConfig;
use crate::date_range::DateRange;
use crate::event::{CalendarEvent, EventId};
use crate::hour_range::{HourRange, compute_hour_range, compute_week_hour_range};
use crate::month::group_by_day;
use crate::now_indicator::current_offset_on_day;
use crate::position::{EventGeometry, position_event};
use crate::time_math::{end_of_week, start_of_week};
use crate::view_state::{Granularity, ViewState};

/// Event shown inside a grid cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionedMonthEvent<'a> {
    pub event: &'a CalendarEvent,
    /// Row inside the cell, from the top.
    pub slot: usize,
    /// Start time as `HH:MM`, `None` for all-day events.
    pub time_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthCell<'a> {
    pub date: NaiveDate,
    /// False for the leading/trailing days borrowed from adjacent months.
    pub in_anchor_month: bool,
    pub is_today: bool,
    pub visible: Vec<PositionedMonthEvent<'a>>,
    pub overflow_count: usize,
    pub overflow_events: Vec<&'a CalendarEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthGrid<'a> {
    pub range: DateRange,
    pub cells: Vec<MonthCell<'a>>,
}

impl<'a> MonthGrid<'a> {
    /// Cells split into week rows.
    pub fn rows(&self) -> impl Iterator<Item = &[MonthCell<'a>]> {
        self.cells.chunks(7)
    }

    pub fn cell(&self, date: NaiveDate) -> Option<&MonthCell<'a>> {
        self.cells.iter().find(|cell| cell.date == date)
    }
}

/// Timed event with its column and box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionedEvent<'a> {
    pub event: &'a CalendarEvent,
    pub column: usize,
    pub total_columns: usize,
    #[serde(flatten)]
    pub geometry: EventGeometry,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayTimeline<'a> {
    pub day: NaiveDate,
    pub hour_range: HourRange,
    pub all_day_events: Vec<&'a CalendarEvent>,
    /// In start order, ties by id.
    pub positioned: Vec<PositionedEvent<'a>>,
    pub current_time_offset: Option<f64>,
}

impl<'a> DayTimeline<'a> {
    pub fn get(&self, id: &EventId) -> Option<&PositionedEvent<'a>> {
        self.positioned.iter().find(|p| &p.event.id == id)
    }
}

/// Seven day columns sharing one hour range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekTimeline<'a> {
    pub range: DateRange,
    pub hour_range: HourRange,
    pub days: Vec<DayTimeline<'a>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "lowercase")]
pub enum ViewLayout<'a> {
    Month(MonthGrid<'a>),
    Week(WeekTimeline<'a>),
    Day(DayTimeline<'a>),
}

/// Lay out `events` for the view's granularity.
pub fn layout<'a>(
    events: &'a [CalendarEvent],
    view: &ViewState,
    config: &LayoutConfig,
    now: NaiveDateTime,
) -> ViewLayout<'a> {
    match view.granularity() {
        Granularity::Month => ViewLayout::Month(month_grid(events, view, config, now.date())),
        Granularity::Week => ViewLayout::Week(week_timeline(events, view, config, now)),
        Granularity::Day => ViewLayout::Day(day_timeline(events, view.anchor(), config, now)),
    }
}

/// Grid cells over the view's visible range.
///
/// Month views cap cells at `month_max_per_day`; any other granularity is
/// drawn as bordered day cells capped at `day_cell_max_per_day`.
pub fn month_grid<'a>(
    events: &'a [CalendarEvent],
    view: &ViewState,
    config: &LayoutConfig,
    today: NaiveDate,
) -> MonthGrid<'a> {
    let range = view.visible_range();
    let max_per_day = match view.granularity() {
        Granularity::Month => config.month_max_per_day,
        Granularity::Week | Granularity::Day => config.day_cell_max_per_day,
    };
    let anchor = view.anchor();

    let buckets = group_by_day(events, range.start(), range.end(), max_per_day);
    let cells: Vec<MonthCell<'a>> = buckets
        .into_iter()
        .map(|(date, bucket)| MonthCell {
            date,
            in_anchor_month: date.year() == anchor.year() && date.month() == anchor.month(),
            is_today: date == today,
            visible: bucket
                .visible
                .iter()
                .enumerate()
                .map(|(slot, &event)| PositionedMonthEvent {
                    event,
                    slot,
                    time_label: (!event.all_day).then(|| event.start.format("%H:%M").to_string()),
                })
                .collect(),
            overflow_count: bucket.overflow_count(),
            overflow_events: bucket.overflow,
        })
        .collect();

    debug!(%range, cells = cells.len(), max_per_day, "built month grid");

    MonthGrid { range, cells }
}

/// Timeline of a single day with its own hour range.
pub fn day_timeline<'a>(
    events: &'a [CalendarEvent],
    day: NaiveDate,
    config: &LayoutConfig,
    now: NaiveDateTime,
) -> DayTimeline<'a> {
    let hour_range = compute_hour_range(events, day, config);
    build_day(events, day, hour_range, config, now)
}

/// Timeline of the week containing the view's anchor.
///
/// When `now` falls in the early hours of a visible day, that day's own
/// column carries the marker and the carried band of the day before does not.
/// The previous day still shows it if the current hour is outside the window.
pub fn week_timeline<'a>(
    events: &'a [CalendarEvent],
    view: &ViewState,
    config: &LayoutConfig,
    now: NaiveDateTime,
) -> WeekTimeline<'a> {
    let range = DateRange::new(
        start_of_week(view.anchor(), view.week_start()),
        end_of_week(view.anchor(), view.week_start()),
    );
    let hour_range = compute_week_hour_range(events, range.days(), config);

    let mut days: Vec<DayTimeline<'a>> = range
        .days()
        .map(|day| build_day(events, day, hour_range, config, now))
        .collect();

    for i in 1..days.len() {
        if days[i].day == now.date() && days[i].current_time_offset.is_some() {
            days[i - 1].current_time_offset = None;
        }
    }

    debug!(%range, %hour_range, "built week timeline");

    WeekTimeline {
        range,
        hour_range,
        days,
    }
}

fn build_day<'a>(
    events: &'a [CalendarEvent],
    day: NaiveDate,
    hour_range: HourRange,
    config: &LayoutConfig,
    now: NaiveDateTime,
) -> DayTimeline<'a> {
    let all_day_events: Vec<&CalendarEvent> = events
        .iter()
        .filter(|event| event.all_day && event.start_date() == day)
        .collect();

    let timed: HashMap<&EventId, &CalendarEvent> = events
        .iter()
        .filter(|event| event.is_timed_on(day))
        .map(|event| (&event.id, event))
        .collect();

    let columns = assign_columns(timed.values().copied(), config.column_mode);

    let positioned: Vec<PositionedEvent<'a>> = columns
        .iter()
        .filter_map(|assignment| {
            let event = *timed.get(&assignment.event_id)?;
            Some(PositionedEvent {
                event,
                column: assignment.column,
                total_columns: assignment.total_columns,
                geometry: position_event(event, assignment, &hour_range, config),
            })
        })
        .collect();

    let current_time_offset = current_offset_on_day(day, &hour_range, now);

    debug!(
        %day,
        %hour_range,
        timed = positioned.len(),
        all_day = all_day_events.len(),
        columns = columns.total_columns(),
        "built day timeline"
    );

    DayTimeline {
        day,
        hour_range,
        all_day_events,
        positioned,
        current_time_offset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        date(d).and_hms_opt(h, m, 0).unwrap()
    }

    fn make_events() -> Vec<CalendarEvent> {
        vec![
            CalendarEvent::new("a", at(20, 9, 0)).with_end(at(20, 10, 0)),
            CalendarEvent::new("b", at(20, 9, 30)).with_end(at(20, 11, 0)),
            CalendarEvent::new("c", at(20, 14, 0)).with_end(at(20, 15, 0)),
            CalendarEvent::new("holiday", at(20, 0, 0)).all_day(),
            CalendarEvent::new("d", at(18, 18, 0)).with_end(at(18, 19, 0)),
        ]
    }

    #[test]
    fn test_day_timeline_separates_all_day_lane() {
        let events = make_events();
        let config = LayoutConfig::default();
        let timeline = day_timeline(&events, date(20), &config, at(20, 10, 30));

        assert_eq!(timeline.hour_range, HourRange::new(8, 16));
        assert_eq!(timeline.all_day_events.len(), 1);
        assert_eq!(timeline.positioned.len(), 3);
        assert_eq!(timeline.current_time_offset, Some(2.5));

        let b = timeline.get(&EventId::from("b")).unwrap();
        assert_eq!(b.column, 1);
        assert_eq!(b.geometry.left_fraction, 0.5);
        assert_eq!(b.geometry.top_hours, 1.5);
    }

    #[test]
    fn test_day_timeline_hides_marker_on_other_days() {
        let events = make_events();
        let config = LayoutConfig::default();
        let timeline = day_timeline(&events, date(20), &config, at(21, 10, 0));

        assert_eq!(timeline.current_time_offset, None);
    }

    #[test]
    fn test_month_grid_marks_cells() {
        let events = make_events();
        let config = LayoutConfig::default();
        let view = ViewState::new(date(20), Granularity::Month);
        let grid = month_grid(&events, &view, &config, date(18));

        assert_eq!(grid.rows().count(), 6);
        assert!(grid.rows().all(|row| row.len() == 7));

        let leading = grid.cell(NaiveDate::from_ymd_opt(2025, 2, 23).unwrap()).unwrap();
        assert!(!leading.in_anchor_month);

        let today = grid.cell(date(18)).unwrap();
        assert!(today.is_today);
        assert_eq!(today.visible[0].time_label.as_deref(), Some("18:00"));

        // holiday (00:00) then a (09:00); b and c overflow
        let busy = grid.cell(date(20)).unwrap();
        assert_eq!(busy.visible.len(), 2);
        assert_eq!(busy.visible[0].event.id.as_str(), "holiday");
        assert_eq!(busy.visible[0].time_label, None);
        assert_eq!(busy.visible[1].slot, 1);
        assert_eq!(busy.overflow_count, 2);
    }

    #[test]
    fn test_week_grid_uses_day_cell_cap() {
        let events = make_events();
        let config = LayoutConfig::default();
        let view = ViewState::new(date(20), Granularity::Week);
        let grid = month_grid(&events, &view, &config, date(18));

        assert_eq!(grid.cells.len(), 7);
        assert_eq!(grid.cell(date(20)).unwrap().visible.len(), 3);
        assert_eq!(grid.cell(date(20)).unwrap().overflow_count, 1);
    }

    #[test]
    fn test_week_timeline_shares_hour_range() {
        let events = make_events();
        let config = LayoutConfig::default();
        let view = ViewState::new(date(20), Granularity::Week).with_week_start(Weekday::Mon);
        let week = week_timeline(&events, &view, &config, at(18, 18, 30));

        assert_eq!(week.range, DateRange::new(date(17), date(23)));
        assert_eq!(week.days.len(), 7);
        // 18th: 18..19 widens to 14..22, 20th: 8..16
        assert_eq!(week.hour_range, HourRange::new(8, 22));
        assert!(week.days.iter().all(|d| d.hour_range == week.hour_range));

        let tuesday = &week.days[1];
        assert_eq!(tuesday.day, date(18));
        assert_eq!(tuesday.current_time_offset, Some(10.5));
        assert_eq!(tuesday.positioned[0].geometry.top_hours, 10.0);
    }

    #[test]
    fn test_week_start_comes_from_config() {
        let events = make_events();
        let config = LayoutConfig {
            week_start: Weekday::Mon,
            ..LayoutConfig::default()
        };
        let view = ViewState::from_config(date(20), Granularity::Week, &config);

        let week = week_timeline(&events, &view, &config, at(18, 18, 30));
        assert_eq!(week.range, DateRange::new(date(17), date(23)));
        assert_eq!(week.days[0].day, date(17));

        let grid = month_grid(&events, &view, &config, date(18));
        assert_eq!(grid.cells[0].date, date(17));
    }

    #[test]
    fn test_week_marker_is_drawn_once_past_midnight() {
        let config = LayoutConfig::default();
        let view = ViewState::new(date(20), Granularity::Week).with_week_start(Weekday::Mon);
        let events = vec![
            CalendarEvent::new("early", at(18, 0, 0)).with_end(at(18, 1, 0)),
            CalendarEvent::new("late", at(18, 23, 0)).with_end(at(19, 5, 0)),
        ];

        // Tuesday 0..29 is the whole window, so 01:00 Wednesday fits both
        // Wednesday's own hours and Tuesday's carried ones
        let week = week_timeline(&events, &view, &config, at(19, 1, 0));
        assert_eq!(week.hour_range, HourRange::new(0, 29));

        let markers: Vec<_> = week
            .days
            .iter()
            .filter_map(|d| d.current_time_offset.map(|offset| (d.day, offset)))
            .collect();
        assert_eq!(markers, vec![(date(19), 1.0)]);
    }

    #[test]
    fn test_week_marker_stays_in_carried_band_when_next_day_cannot_show_it() {
        let config = LayoutConfig::default();
        let view = ViewState::new(date(20), Granularity::Week).with_week_start(Weekday::Mon);
        let events = vec![CalendarEvent::new("late", at(18, 23, 0)).with_end(at(19, 1, 0))];

        // 23..25 widens to 20..28; 00:30 is only visible as Tuesday's 24:30
        let week = week_timeline(&events, &view, &config, at(19, 0, 30));
        assert_eq!(week.hour_range, HourRange::new(20, 28));
        assert_eq!(week.days[1].current_time_offset, Some(4.5));
        assert_eq!(week.days[2].current_time_offset, None);
    }

    #[test]
    fn test_layout_dispatches_on_granularity() {
        let events = make_events();
        let config = LayoutConfig::default();
        let now = at(20, 9, 0);

        let mut view = ViewState::new(date(20), Granularity::Day);
        assert!(matches!(layout(&events, &view, &config, now), ViewLayout::Day(_)));

        view.set_granularity(Granularity::Week);
        assert!(matches!(layout(&events, &view, &config, now), ViewLayout::Week(_)));

        view.set_granularity(Granularity::Month);
        assert!(matches!(layout(&events, &view, &config, now), ViewLayout::Month(_)));
    }

    #[test]
    fn test_layout_serializes_to_json() {
        let events = make_events();
        let config = LayoutConfig::default();
        let view = ViewState::new(date(20), Granularity::Day);
        let json = serde_json::to_value(layout(&events, &view, &config, at(20, 9, 0))).unwrap();

        assert_eq!(json["view"], "day");
        assert_eq!(json["positioned"][0]["top_hours"], 1.0);
        assert_eq!(json["hour_range"]["min"], 8);
    }
}
