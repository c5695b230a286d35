// Quantization parameters, validated once per run

use serde::Serialize;

use super::pitch_table::PitchTable;

/// Ticks per quarter note assumed when the source carries no time division.
pub const DEFAULT_TICKS_PER_QUARTER: u32 = 480;

/// Empty-row threshold as a multiple of the typical gap.
pub const DEFAULT_GAP_MULTIPLIER: f64 = 1.75;

/// Error type for parameter construction
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParamsError {
    #[error("row capacity must be at least 1")]
    ZeroRowCapacity,

    #[error("pitch table must contain at least one pitch")]
    EmptyPitchTable,

    #[error("pitch {0} appears more than once in the pitch table")]
    DuplicatePitch(u8),

    #[error("jitter tolerance must be at least 1 tick")]
    ZeroJitter,

    #[error("ticks per quarter note must be positive")]
    ZeroTicksPerQuarter,

    #[error("gap multiplier must be finite, got {0}")]
    NonFiniteGapMultiplier(f64),
}

/// Immutable inputs of one quantization run.
///
/// Fields are private so that every instance has passed validation:
/// `row_capacity >= 1`, `jitter_ticks >= 1`, `ticks_per_quarter >= 1`,
/// finite `gap_multiplier`, and a non-empty, duplicate-free pitch table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuantizeParams {
    row_capacity: usize,
    pitch_table: PitchTable,
    jitter_ticks: u64,
    gap_multiplier: f64,
    ticks_per_quarter: u32,
}

impl QuantizeParams {
    /// Parameters with the default jitter (`max(1, tpq / 240)`) and the
    /// default gap multiplier.
    pub fn new(
        row_capacity: usize,
        pitch_table: PitchTable,
        ticks_per_quarter: u32,
    ) -> Result<Self, ParamsError> {
        if row_capacity == 0 {
            return Err(ParamsError::ZeroRowCapacity);
        }
        if ticks_per_quarter == 0 {
            return Err(ParamsError::ZeroTicksPerQuarter);
        }
        Ok(Self {
            row_capacity,
            pitch_table,
            jitter_ticks: default_jitter_ticks(ticks_per_quarter),
            gap_multiplier: DEFAULT_GAP_MULTIPLIER,
            ticks_per_quarter,
        })
    }

    pub fn with_jitter_ticks(mut self, jitter_ticks: u64) -> Result<Self, ParamsError> {
        if jitter_ticks == 0 {
            return Err(ParamsError::ZeroJitter);
        }
        self.jitter_ticks = jitter_ticks;
        Ok(self)
    }

    /// A multiplier `<= 0` disables empty-row insertion.
    pub fn with_gap_multiplier(mut self, gap_multiplier: f64) -> Result<Self, ParamsError> {
        if !gap_multiplier.is_finite() {
            return Err(ParamsError::NonFiniteGapMultiplier(gap_multiplier));
        }
        self.gap_multiplier = gap_multiplier;
        Ok(self)
    }

    pub fn row_capacity(&self) -> usize {
        self.row_capacity
    }

    pub fn column_count(&self) -> usize {
        self.pitch_table.len()
    }

    pub fn pitch_table(&self) -> &PitchTable {
        &self.pitch_table
    }

    pub fn jitter_ticks(&self) -> u64 {
        self.jitter_ticks
    }

    pub fn gap_multiplier(&self) -> f64 {
        self.gap_multiplier
    }

    pub fn ticks_per_quarter(&self) -> u32 {
        self.ticks_per_quarter
    }

    /// Whether large gaps get silent rows.
    pub fn inserts_empty_rows(&self) -> bool {
        self.gap_multiplier > 0.0
    }
}

/// Collapse only micro jitter: about 2 ms at 120 BPM.
pub fn default_jitter_ticks(ticks_per_quarter: u32) -> u64 {
    (ticks_per_quarter as u64 / 240).max(1)
}
