// Row allocation: map onset groups onto a fixed number of cylinder rows
//
// Groups are walked in time order. Each placed group takes the next row; a
// gap that is long compared to the typical gap first skips silent rows so a
// rest is felt as a rest. Once the row budget is spent the remaining groups
// are dropped (truncation), which is reported but not an error.

use serde::Serialize;

use super::onset::OnsetGroup;
use super::params::QuantizeParams;

/// Row assigned to each placed onset group.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RowAssignment {
    /// `rows[i]` is the row of group `i`; only the first `rows.len()` groups
    /// were placed.
    pub rows: Vec<usize>,
    /// Groups dropped because the row budget ran out
    pub truncated_groups: usize,
    /// Silent rows inserted ahead of long gaps
    pub empty_rows_inserted: usize,
}

impl RowAssignment {
    pub fn placed_groups(&self) -> usize {
        self.rows.len()
    }

    /// Rows from 0 through the last placed row.
    pub fn rows_used(&self) -> usize {
        self.rows.last().map_or(0, |&r| r + 1)
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated_groups > 0
    }
}

/// Assign rows to `groups` (time-ordered) within `params.row_capacity()`.
pub fn allocate_rows(
    groups: &[OnsetGroup],
    typical_gap_ticks: u64,
    params: &QuantizeParams,
) -> RowAssignment {
    let mut assignment = RowAssignment::default();
    let Some(first) = groups.first() else {
        return assignment;
    };

    let capacity = params.row_capacity();
    let typical = typical_gap_ticks.max(1);
    let threshold = typical as f64 * params.gap_multiplier();

    let mut cursor = 0usize;
    let mut previous_tick = first.start_tick;
    assignment.rows.push(cursor);

    for (index, group) in groups.iter().enumerate().skip(1) {
        let gap = group.start_tick.saturating_sub(previous_tick);

        let mut skipped = 0usize;
        if params.inserts_empty_rows() && gap as f64 > threshold {
            let empty_rows = usize::try_from((gap / typical).saturating_sub(1)).unwrap_or(usize::MAX);
            // Keep at least one row free for the group itself.
            let remaining = capacity - (cursor + 1);
            skipped = empty_rows.min(remaining.saturating_sub(1));
        }

        let next = cursor + skipped + 1;
        if next >= capacity {
            assignment.truncated_groups = groups.len() - index;
            break;
        }

        cursor = next;
        previous_tick = group.start_tick;
        assignment.empty_rows_inserted += skipped;
        assignment.rows.push(cursor);
    }

    assignment
}
