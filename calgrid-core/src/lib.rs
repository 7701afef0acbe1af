//! Calendar time-grid layout engine.
//!
//! Turns a list of events and a view state into render-ready geometry:
//! - month/week grids with per-day caps and "+N more" overflow
//! - day/week timelines with a dynamic hour window, side-by-side columns for
//!   overlapping events, and a "now" marker
//!
//! Every layout function is pure; the current time is always passed in.

pub mod columns;
pub mod config;
pub mod date_range;
pub mod error;
pub mod event;
pub mod hour_range;
pub mod layout;
pub mod month;
pub mod now_indicator;
pub mod position;
pub mod time_math;
pub mod view_state;

pub use columns::{ColumnAssignment, ColumnLayout, ColumnMode, assign_columns};
pub use config::LayoutConfig;
pub use date_range::DateRange;
pub use error::{CalGridError, CalGridResult};
pub use event::{CalendarEvent, EventId, EventType};
pub use hour_range::{HourRange, compute_hour_range, compute_week_hour_range};
pub use layout::{
    DayTimeline, MonthCell, MonthGrid, PositionedEvent, PositionedMonthEvent, ViewLayout,
    WeekTimeline, day_timeline, layout, month_grid, week_timeline,
};
pub use month::{DayBucket, group_by_day};
pub use now_indicator::{current_offset, current_offset_on_day};
pub use position::{EventGeometry, position_event, time_at_offset};
pub use view_state::{Granularity, ViewState};
