// Onset quantization: timed note events -> cylinder pin grid
//
// Pipeline, leaf first:
// - onset.rs: collapse near-simultaneous onsets into groups
// - gaps.rs: median inter-onset gap, the unit for "long rest"
// - rows.rs: place groups on rows, skipping rows for long rests, within budget
// - grid.rs: project each placed event through the pitch table into a cell
//
// `quantize` is a pure function of its inputs. Re-running it is the only way
// to rebuild a grid.

pub mod gaps;
pub mod grid;
pub mod onset;
pub mod params;
pub mod pitch_table;
pub mod rows;

pub use gaps::*;
pub use grid::*;
pub use onset::*;
pub use params::*;
pub use pitch_table::*;
pub use rows::*;

use std::borrow::Cow;

use serde::Serialize;

use crate::note::{self, NoteEvent};

/// Counters describing what one run absorbed. They never change the grid.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Diagnostics {
    pub total_events: usize,
    pub onset_groups: usize,
    pub typical_gap_ticks: u64,
    pub placed_groups: usize,
    /// Groups dropped after the row budget ran out
    pub truncated_groups: usize,
    /// Events inside the truncated groups
    pub truncated_events: usize,
    /// Placed events whose pitch has no lane
    pub dropped_events: usize,
    pub empty_rows_inserted: usize,
    /// Rows from 0 through the last placed row
    pub rows_used: usize,
}

impl Diagnostics {
    pub fn is_truncated(&self) -> bool {
        self.truncated_groups > 0
    }
}

/// Result of one quantization run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quantization {
    pub grid: Grid,
    pub diagnostics: Diagnostics,
}

/// Quantize `events` into a `row_capacity x column_count` grid.
///
/// `events` should already be tick-sorted; an unsorted slice is stably
/// sorted into a private copy first. Empty input yields an all-empty grid.
pub fn quantize(events: &[NoteEvent], params: &QuantizeParams) -> Quantization {
    let events: Cow<'_, [NoteEvent]> = if note::is_tick_sorted(events) {
        Cow::Borrowed(events)
    } else {
        log::debug!("Input events not tick-sorted, sorting a copy");
        let mut sorted = events.to_vec();
        note::sort_events(&mut sorted);
        Cow::Owned(sorted)
    };

    let groups = cluster_onsets(&events, params.jitter_ticks());
    let typical_gap = typical_gap_ticks(&groups, params.ticks_per_quarter());
    let assignment = allocate_rows(&groups, typical_gap, params);
    let (grid, dropped_events) =
        populate_grid(&groups, &assignment, params.pitch_table(), params.row_capacity());

    let placed = assignment.placed_groups();
    let truncated_events: usize = groups[placed..].iter().map(|g| g.events.len()).sum();

    let diagnostics = Diagnostics {
        total_events: events.len(),
        onset_groups: groups.len(),
        typical_gap_ticks: typical_gap,
        placed_groups: placed,
        truncated_groups: assignment.truncated_groups,
        truncated_events,
        dropped_events,
        empty_rows_inserted: assignment.empty_rows_inserted,
        rows_used: assignment.rows_used(),
    };

    log::debug!(
        "Quantized {} events into {} onset groups (typical gap {} ticks, {} silent rows)",
        diagnostics.total_events,
        diagnostics.onset_groups,
        typical_gap,
        diagnostics.empty_rows_inserted,
    );
    if dropped_events > 0 {
        log::debug!("Dropped {} events with pitches outside the pitch table", dropped_events);
    }
    if diagnostics.is_truncated() {
        log::warn!(
            "Row budget of {} exhausted: dropped {} onset groups ({} events)",
            params.row_capacity(),
            diagnostics.truncated_groups,
            truncated_events,
        );
    }

    Quantization { grid, diagnostics }
}
