//! Side-by-side column packing for overlapping timed events.
//!
//! Events of one day are placed greedily: sorted by start (ties by id), each
//! event takes the leftmost column whose last occupant has already ended and
//! did not start at the same instant. Two events sharing a column therefore
//! never overlap in time, and a zero-length event is never stacked on top of
//! another event with the same start.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::event::{CalendarEvent, EventId};

/// How `total_columns` is counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColumnMode {
    /// Every event shares the number of columns opened for the whole day.
    #[default]
    DayWide,
    /// Events only share the column count of their own overlap cluster, so a
    /// lone event after a busy morning gets the full width back.
    PerCluster,
}

/// Horizontal slot of one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnAssignment {
    pub event_id: EventId,
    pub column: usize,
    pub total_columns: usize,
}

/// Column assignments for one day, in placement order.
#[derive(Debug, Clone, Default)]
pub struct ColumnLayout {
    assignments: Vec<ColumnAssignment>,
    by_id: BTreeMap<EventId, usize>,
    total_columns: usize,
}

impl ColumnLayout {
    pub fn get(&self, id: &EventId) -> Option<&ColumnAssignment> {
        self.by_id.get(id).map(|&i| &self.assignments[i])
    }

    /// Assignments sorted by start time, ties by id.
    pub fn iter(&self) -> impl Iterator<Item = &ColumnAssignment> {
        self.assignments.iter()
    }

    /// Columns opened for the whole day.
    pub fn total_columns(&self) -> usize {
        self.total_columns
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

/// Pack one day's timed events into columns.
///
/// All-day events are not part of the timeline and are skipped.
pub fn assign_columns<'a, I>(events: I, mode: ColumnMode) -> ColumnLayout
where
    I: IntoIterator<Item = &'a CalendarEvent>,
{
    let mut timed: Vec<&CalendarEvent> = events
        .into_iter()
        .filter(|event| {
            if event.all_day {
                warn!(id = %event.id, "all-day event passed to column packing, skipping");
            }
            !event.all_day
        })
        .collect();

    timed.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.id.cmp(&b.id)));

    // (start, end) of the latest event in each column
    let mut occupants: Vec<(NaiveDateTime, NaiveDateTime)> = Vec::new();
    // (column, cluster) per placed event
    let mut placements: Vec<(usize, usize)> = Vec::with_capacity(timed.len());
    let mut cluster_widths: Vec<usize> = Vec::new();
    let mut cluster_end: Option<NaiveDateTime> = None;
    let mut previous_start: Option<NaiveDateTime> = None;

    for event in &timed {
        if event.is_degenerate() {
            warn!(id = %event.id, "event ends before it starts, treating as zero length");
        }

        let start = event.start;
        let end = event.effective_end();

        // Events starting together are drawn at the same top, even at zero length
        match cluster_end {
            Some(current) if start < current || previous_start == Some(start) => {
                cluster_end = Some(current.max(end));
            }
            _ => {
                cluster_widths.push(0);
                cluster_end = Some(end);
            }
        }
        previous_start = Some(start);

        let free = occupants.iter().position(|&(occupant_start, occupant_end)| {
            occupant_end <= start && occupant_start < start
        });
        let column = match free {
            Some(free) => {
                occupants[free] = (start, end);
                free
            }
            None => {
                occupants.push((start, end));
                occupants.len() - 1
            }
        };

        let cluster = cluster_widths.len() - 1;
        cluster_widths[cluster] = cluster_widths[cluster].max(column + 1);
        placements.push((column, cluster));

        trace!(id = %event.id, column, cluster, "placed event");
    }

    let total_columns = occupants.len();

    let assignments: Vec<ColumnAssignment> = timed
        .iter()
        .zip(&placements)
        .map(|(event, &(column, cluster))| ColumnAssignment {
            event_id: event.id.clone(),
            column,
            total_columns: match mode {
                ColumnMode::DayWide => total_columns,
                ColumnMode::PerCluster => cluster_widths[cluster],
            },
        })
        .collect();

    let by_id = assignments
        .iter()
        .enumerate()
        .map(|(i, assignment)| (assignment.event_id.clone(), i))
        .collect();

    debug!(
        events = assignments.len(),
        columns = total_columns,
        clusters = cluster_widths.len(),
        ?mode,
        "assigned columns"
    );

    ColumnLayout {
        assignments,
        by_id,
        total_columns,
    }
}
