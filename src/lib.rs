// Music Box - MIDI onset quantization for pin-cylinder music boxes
// Main library entry point

pub mod batch;
pub mod config;
pub mod midi;
pub mod note;
pub mod pipeline;
pub mod quantize;
pub mod report;

pub use note::NoteEvent;
pub use pipeline::{quantize_file, FileQuantization, PipelineError};
pub use quantize::{quantize, Diagnostics, Grid, PitchTable, QuantizeParams, Quantization};
