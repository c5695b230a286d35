// Human- and machine-readable views of a finished grid

use serde::Serialize;

use crate::quantize::{Diagnostics, Grid, PitchTable};

/// One line per active pin: `Row r, PitchIndex p (MIDI n): k notes`.
pub fn cell_lines(grid: &Grid, pitch_table: &PitchTable) -> Vec<String> {
    grid.active_cells()
        .map(|(row, col)| {
            let count = grid.notes_at(row, col).len();
            let pitch = pitch_table
                .pitch_at(col)
                .map_or_else(|| "?".to_string(), |p| p.to_string());
            format!(
                "Row {}, PitchIndex {} (MIDI {}): {} note{}",
                row,
                col,
                pitch,
                count,
                if count == 1 { "" } else { "s" }
            )
        })
        .collect()
}

/// The pin pattern, one text line per row: `o` active, `.` empty.
pub fn render_ascii(grid: &Grid) -> String {
    let width = grid.row_count().saturating_sub(1).to_string().len();
    let mut out = String::new();
    for row in 0..grid.row_count() {
        out.push_str(&format!("{:>width$} ", row, width = width));
        for cell in grid.row(row) {
            out.push(if cell.is_empty() { '.' } else { 'o' });
        }
        out.push('\n');
    }
    out
}

/// Short multi-line summary of a run's counters.
pub fn summary(diagnostics: &Diagnostics) -> String {
    let mut out = format!(
        "{} events in {} onset groups, typical gap {} ticks\n\
         {} groups placed on {} rows ({} silent rows)\n",
        diagnostics.total_events,
        diagnostics.onset_groups,
        diagnostics.typical_gap_ticks,
        diagnostics.placed_groups,
        diagnostics.rows_used,
        diagnostics.empty_rows_inserted,
    );
    if diagnostics.dropped_events > 0 {
        out.push_str(&format!(
            "{} events dropped (pitch outside table)\n",
            diagnostics.dropped_events
        ));
    }
    if diagnostics.is_truncated() {
        out.push_str(&format!(
            "TRUNCATED: {} groups ({} events) did not fit\n",
            diagnostics.truncated_groups, diagnostics.truncated_events
        ));
    }
    out
}

/// Pretty JSON for the layout side.
pub fn to_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}
