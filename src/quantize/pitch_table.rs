// Pitch table: allowed MIDI pitches and their pin-lane columns

use serde::{Deserialize, Serialize};

use super::params::ParamsError;

/// Default pin lanes: a 16-entry C-major set spanning C4..D6.
pub const DEFAULT_PITCHES: [u8; 16] = [
    60, 62, 64, 65, 67, 69, 71,
    72, 74, 76, 77, 79, 81, 83, 84, 86,
];

/// Ordered set of distinct pitches. Column `i` plays `pitches[i]`.
///
/// A pitch that is not in the table has no column; it is never snapped to a
/// neighbouring lane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct PitchTable {
    pitches: Vec<u8>,
}

impl PitchTable {
    /// Build a table from an ordered pitch list. Fails on an empty list or
    /// a repeated pitch.
    pub fn new(pitches: Vec<u8>) -> Result<Self, ParamsError> {
        if pitches.is_empty() {
            return Err(ParamsError::EmptyPitchTable);
        }
        for (i, &p) in pitches.iter().enumerate() {
            if pitches[..i].contains(&p) {
                return Err(ParamsError::DuplicatePitch(p));
            }
        }
        Ok(Self { pitches })
    }

    /// Column of `pitch`, or None if the pitch has no lane.
    pub fn column_of(&self, pitch: u8) -> Option<usize> {
        self.pitches.iter().position(|&p| p == pitch)
    }

    /// Pitch played by `column`.
    pub fn pitch_at(&self, column: usize) -> Option<u8> {
        self.pitches.get(column).copied()
    }

    pub fn contains(&self, pitch: u8) -> bool {
        self.column_of(pitch).is_some()
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.pitches.len()
    }

    /// Always false for a constructed table; kept for the `len` convention.
    pub fn is_empty(&self) -> bool {
        self.pitches.is_empty()
    }

    pub fn pitches(&self) -> &[u8] {
        &self.pitches
    }
}

impl Default for PitchTable {
    fn default() -> Self {
        Self {
            pitches: DEFAULT_PITCHES.to_vec(),
        }
    }
}

impl TryFrom<Vec<u8>> for PitchTable {
    type Error = ParamsError;

    fn try_from(pitches: Vec<u8>) -> Result<Self, Self::Error> {
        Self::new(pitches)
    }
}

impl From<PitchTable> for Vec<u8> {
    fn from(table: PitchTable) -> Self {
        table.pitches
    }
}
