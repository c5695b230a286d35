// Timed note events, the input of every quantization run

use serde::{Deserialize, Serialize};

/// A single note onset.
///
/// Only `tick` and `pitch` drive quantization. The other fields ride along
/// so the grid's consumer can still see what was played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NoteEvent {
    /// Absolute onset in source ticks
    pub tick: u64,
    /// MIDI key number
    pub pitch: u8,
    #[serde(default = "default_velocity")]
    pub velocity: u8,
    #[serde(default)]
    pub duration_ticks: u64,
    #[serde(default)]
    pub channel: u8,
}

impl NoteEvent {
    pub fn new(tick: u64, pitch: u8) -> Self {
        Self {
            tick,
            pitch,
            velocity: default_velocity(),
            duration_ticks: 0,
            channel: 0,
        }
    }
}

/// Stable sort by onset tick. Events sharing a tick keep their relative order.
pub fn sort_events(events: &mut [NoteEvent]) {
    events.sort_by_key(|e| e.tick);
}

/// True if `events` is in non-decreasing tick order.
pub fn is_tick_sorted(events: &[NoteEvent]) -> bool {
    events.windows(2).all(|w| w[0].tick <= w[1].tick)
}

fn default_velocity() -> u8 {
    100
}
