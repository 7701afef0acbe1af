//! Event records consumed by the layout engine.
//!
//! Events arrive from the caller already expanded (no recurrence) and with
//! timestamps on a single timeline. The engine only reads them.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::time_math;

/// Opaque event identifier, unique within one input set.
///
/// Ordered so it can break ties between events starting at the same time.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    pub fn new(id: impl Into<String>) -> Self {
        EventId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EventId {
    fn from(id: &str) -> Self {
        EventId(id.to_string())
    }
}

impl From<String> for EventId {
    fn from(id: String) -> Self {
        EventId(id)
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of activity. Only used by callers for coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Meetup,
    Workshop,
    Social,
    Meeting,
    Deadline,
    #[default]
    #[serde(other)]
    Other,
}

/// A calendar event as handed to the layout engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: EventId,
    #[serde(default)]
    pub title: Option<String>,
    pub start: NaiveDateTime,
    /// Missing end means a one hour event for positioning purposes.
    #[serde(default)]
    pub end: Option<NaiveDateTime>,
    #[serde(default)]
    pub all_day: bool,
    #[serde(default)]
    pub event_type: EventType,
}

impl CalendarEvent {
    pub fn new(id: impl Into<EventId>, start: NaiveDateTime) -> Self {
        CalendarEvent {
            id: id.into(),
            title: None,
            start,
            end: None,
            all_day: false,
            event_type: EventType::default(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_end(mut self, end: NaiveDateTime) -> Self {
        self.end = Some(end);
        self
    }

    pub fn with_type(mut self, event_type: EventType) -> Self {
        self.event_type = event_type;
        self
    }

    /// Mark the event as all-day.
    pub fn all_day(mut self) -> Self {
        self.all_day = true;
        self
    }

    /// Calendar day the event starts on. Grid views bucket by this day only.
    pub fn start_date(&self) -> NaiveDate {
        self.start.date()
    }

    /// End used for layout: the given end, or start + 60 minutes.
    /// An end before the start collapses to the start.
    pub fn effective_end(&self) -> NaiveDateTime {
        time_math::effective_end(self.start, self.end)
    }

    pub fn duration_hours(&self) -> f64 {
        time_math::duration_hours(self.start, self.end)
    }

    /// True when an explicit end lies before the start.
    pub fn is_degenerate(&self) -> bool {
        self.end.is_some_and(|end| end < self.start)
    }

    /// Whether this event belongs on the timeline of `day`.
    pub fn is_timed_on(&self, day: NaiveDate) -> bool {
        !self.all_day && self.start_date() == day
    }
}

impl fmt::Display for CalendarEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => write!(f, "{}", title),
            _ => write!(f, "Untitled"),
        }
    }
}
