// MIDI input: Standard MIDI Files -> tick-sorted note events

pub mod parser;

pub use parser::*;

use std::path::PathBuf;

/// Error type for obtaining note events from a MIDI source
#[derive(Debug, thiserror::Error)]
pub enum MidiError {
    #[error("MIDI input unavailable at {}: {source}", .path.display())]
    InputUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed MIDI file {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: midly::Error,
    },
}

pub type Result<T> = std::result::Result<T, MidiError>;
