//! Per-day buckets for month and week grids.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::date_range::DateRange;
use crate::event::CalendarEvent;

/// Events of one grid cell, split at the display cap.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DayBucket<'a> {
    pub visible: Vec<&'a CalendarEvent>,
    pub overflow: Vec<&'a CalendarEvent>,
}

impl DayBucket<'_> {
    /// Count for the "+N more" affordance.
    pub fn overflow_count(&self) -> usize {
        self.overflow.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty() && self.overflow.is_empty()
    }

    pub fn len(&self) -> usize {
        self.visible.len() + self.overflow.len()
    }
}

/// Bucket events by start day over `[range_start, range_end]`.
///
/// Every day in the range gets a bucket. A multi-day event only appears on
/// the day it starts. Buckets are sorted by start time; events starting at
/// the same moment keep their input order.
pub fn group_by_day<'a, I>(
    events: I,
    range_start: NaiveDate,
    range_end: NaiveDate,
    max_per_day: usize,
) -> BTreeMap<NaiveDate, DayBucket<'a>>
where
    I: IntoIterator<Item = &'a CalendarEvent>,
{
    let range = DateRange::new(range_start, range_end);

    let mut by_day: BTreeMap<NaiveDate, Vec<&'a CalendarEvent>> =
        range.days().map(|day| (day, Vec::new())).collect();

    for event in events {
        if let Some(bucket) = by_day.get_mut(&event.start_date()) {
            bucket.push(event);
        }
    }

    let buckets: BTreeMap<NaiveDate, DayBucket<'a>> = by_day
        .into_iter()
        .map(|(day, mut day_events)| {
            day_events.sort_by_key(|event| event.start);
            let overflow = day_events.split_off(max_per_day.min(day_events.len()));
            (
                day,
                DayBucket {
                    visible: day_events,
                    overflow,
                },
            )
        })
        .collect();

    debug!(
        %range,
        max_per_day,
        hidden = buckets.values().map(DayBucket::overflow_count).sum::<usize>(),
        "grouped events by day"
    );

    buckets
}
