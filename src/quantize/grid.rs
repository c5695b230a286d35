// The pin grid: rows are time slots around the cylinder, columns are pitch lanes

use serde::Serialize;

use crate::note::NoteEvent;

use super::onset::OnsetGroup;
use super::pitch_table::PitchTable;
use super::rows::RowAssignment;

/// `row_count x column_count` cells, each an ordered list of the events
/// that land on that pin.
///
/// Built only by [`populate_grid`]; read-only afterwards. Out-of-range
/// queries read as empty cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grid {
    row_count: usize,
    column_count: usize,
    /// Row-major, `row_count * column_count` entries
    cells: Vec<Vec<NoteEvent>>,
}

impl Grid {
    /// All-empty grid.
    pub(crate) fn empty(row_count: usize, column_count: usize) -> Self {
        Self {
            row_count,
            column_count,
            cells: vec![Vec::new(); row_count * column_count],
        }
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// Whether the pin at (row, col) is active.
    pub fn has_note(&self, row: usize, col: usize) -> bool {
        !self.notes_at(row, col).is_empty()
    }

    /// Events on the pin at (row, col), in onset order.
    pub fn notes_at(&self, row: usize, col: usize) -> &[NoteEvent] {
        match self.index(row, col) {
            Some(i) => &self.cells[i],
            None => &[],
        }
    }

    /// The cells of one row, one per column.
    pub fn row(&self, row: usize) -> &[Vec<NoteEvent>] {
        if row >= self.row_count {
            return &[];
        }
        let start = row * self.column_count;
        &self.cells[start..start + self.column_count]
    }

    /// Active pins as (row, col), row by row.
    pub fn active_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let columns = self.column_count;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| !cell.is_empty())
            .map(move |(i, _)| (i / columns, i % columns))
    }

    /// Total events placed on the grid.
    pub fn note_count(&self) -> usize {
        self.cells.iter().map(Vec::len).sum()
    }

    /// True if no pin is active.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Vec::is_empty)
    }

    fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.row_count && col < self.column_count).then(|| row * self.column_count + col)
    }

    fn push(&mut self, row: usize, col: usize, event: NoteEvent) {
        if let Some(i) = self.index(row, col) {
            self.cells[i].push(event);
        }
    }
}

/// Build a fresh grid from placed onset groups.
///
/// Each event of a placed group goes to `(its group's row, column_of(pitch))`.
/// Events whose pitch has no column are dropped; the count of those is
/// returned alongside the grid.
pub fn populate_grid(
    groups: &[OnsetGroup],
    assignment: &RowAssignment,
    pitch_table: &PitchTable,
    row_count: usize,
) -> (Grid, usize) {
    let mut grid = Grid::empty(row_count, pitch_table.len());
    let mut dropped = 0usize;

    for (group, &row) in groups.iter().zip(&assignment.rows) {
        for &event in &group.events {
            match pitch_table.column_of(event.pitch) {
                Some(col) => grid.push(row, col, event),
                None => dropped += 1,
            }
        }
    }

    (grid, dropped)
}
