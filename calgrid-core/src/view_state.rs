//! Calendar navigation state.
//!
//! A [`ViewState`] is owned by one calendar instance and only changes through
//! the navigation methods. Layout reads it, never writes it.

use std::fmt;
use std::str::FromStr;

use chrono::{Days, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::LayoutConfig;
use crate::date_range::DateRange;
use crate::error::{CalGridError, CalGridResult};
use crate::time_math::{end_of_month, end_of_week, start_of_month, start_of_week};

/// Zoom level of the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Month,
    Week,
    Day,
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Granularity::Month => write!(f, "month"),
            Granularity::Week => write!(f, "week"),
            Granularity::Day => write!(f, "day"),
        }
    }
}

impl FromStr for Granularity {
    type Err = CalGridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "month" => Ok(Granularity::Month),
            "week" => Ok(Granularity::Week),
            "day" => Ok(Granularity::Day),
            _ => Err(CalGridError::InvalidGranularity(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    anchor: NaiveDate,
    granularity: Granularity,
    week_start: Weekday,
}

impl ViewState {
    /// New view with weeks starting on Sunday.
    pub fn new(anchor: NaiveDate, granularity: Granularity) -> Self {
        ViewState {
            anchor,
            granularity,
            week_start: Weekday::Sun,
        }
    }

    /// New view with weeks starting on `config.week_start`.
    pub fn from_config(anchor: NaiveDate, granularity: Granularity, config: &LayoutConfig) -> Self {
        ViewState::new(anchor, granularity).with_week_start(config.week_start)
    }

    pub fn with_week_start(mut self, week_start: Weekday) -> Self {
        self.week_start = week_start;
        self
    }

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn week_start(&self) -> Weekday {
        self.week_start
    }

    /// Step forward one month, week or day. Month steps land on the 1st.
    pub fn next(&mut self) {
        self.anchor = match self.granularity {
            Granularity::Month => start_of_month(self.anchor) + Months::new(1),
            Granularity::Week => self.anchor + Days::new(7),
            Granularity::Day => self.anchor + Days::new(1),
        };
        debug!(anchor = %self.anchor, granularity = %self.granularity, "navigated forward");
    }

    /// Step back one month, week or day. Month steps land on the 1st.
    pub fn previous(&mut self) {
        self.anchor = match self.granularity {
            Granularity::Month => start_of_month(self.anchor) - Months::new(1),
            Granularity::Week => self.anchor - Days::new(7),
            Granularity::Day => self.anchor - Days::new(1),
        };
        debug!(anchor = %self.anchor, granularity = %self.granularity, "navigated back");
    }

    /// Jump to the caller's current date, keeping the granularity.
    pub fn today(&mut self, today: NaiveDate) {
        self.jump_to(today);
    }

    pub fn jump_to(&mut self, date: NaiveDate) {
        self.anchor = date;
    }

    pub fn set_granularity(&mut self, granularity: Granularity) {
        self.granularity = granularity;
    }

    /// Parse and apply a granularity name ("month", "week" or "day").
    pub fn set_granularity_str(&mut self, granularity: &str) -> CalGridResult<()> {
        self.granularity = granularity.parse()?;
        Ok(())
    }

    /// Days the current view shows.
    ///
    /// Month views cover whole weeks, so the range includes the trailing
    /// days of the previous month and the leading days of the next one.
    pub fn visible_range(&self) -> DateRange {
        match self.granularity {
            Granularity::Month => DateRange::new(
                start_of_week(start_of_month(self.anchor), self.week_start),
                end_of_week(end_of_month(self.anchor), self.week_start),
            ),
            Granularity::Week => DateRange::new(
                start_of_week(self.anchor, self.week_start),
                end_of_week(self.anchor, self.week_start),
            ),
            Granularity::Day => DateRange::single(self.anchor),
        }
    }
}
