// MIDI file parser with sustain pedal support

use std::collections::BTreeMap;
use std::path::Path;

use crate::note::{self, NoteEvent};

use super::{MidiError, Result};

/// Note events of one file plus its time division.
#[derive(Debug, Clone)]
pub struct MidiSource {
    /// All tracks merged, stably sorted by onset tick
    pub events: Vec<NoteEvent>,
    /// Ticks per quarter note, or None for SMPTE-timed files
    pub ticks_per_quarter: Option<u32>,
}

/// Read and parse a MIDI file.
pub fn parse_midi(path: &Path) -> Result<MidiSource> {
    let data = std::fs::read(path).map_err(|source| MidiError::InputUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    parse_midi_bytes(&data).map_err(|source| MidiError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse an in-memory Standard MIDI File.
pub fn parse_midi_bytes(data: &[u8]) -> std::result::Result<MidiSource, midly::Error> {
    let smf = midly::Smf::parse(data)?;

    let ticks_per_quarter = match smf.header.timing {
        midly::Timing::Metrical(tpq) => Some(tpq.as_int() as u32),
        midly::Timing::Timecode(..) => None,
    };

    let mut events: Vec<NoteEvent> = Vec::new();
    for track in &smf.tracks {
        collect_track(track, &mut events);
    }

    note::sort_events(&mut events);
    log::debug!(
        "Parsed {} notes from {} tracks (ticks per quarter: {:?})",
        events.len(),
        smf.tracks.len(),
        ticks_per_quarter
    );

    Ok(MidiSource {
        events,
        ticks_per_quarter,
    })
}

/// Sounding notes keyed by (channel, pitch): (velocity, start_tick).
/// Ordered maps keep the emitted order independent of hashing.
type HeldNotes = BTreeMap<(u8, u8), (u8, u64)>;

fn collect_track(track: &[midly::TrackEvent<'_>], notes: &mut Vec<NoteEvent>) {
    let mut current_tick: u64 = 0;
    let mut active: HeldNotes = BTreeMap::new();
    // Released while the pedal was down
    let mut sustained: HeldNotes = BTreeMap::new();
    let mut sustain_on: BTreeMap<u8, bool> = BTreeMap::new();

    for event in track {
        current_tick += event.delta.as_int() as u64;

        let midly::TrackEventKind::Midi { channel, message } = event.kind else {
            continue;
        };
        let ch = channel.as_int();

        match message {
            midly::MidiMessage::NoteOn { key, vel } if vel.as_int() > 0 => {
                let pitch = key.as_int();
                // Re-strike closes the previous note on this key
                if let Some(held) = sustained.remove(&(ch, pitch)) {
                    notes.push(finish(ch, pitch, held, current_tick));
                }
                if let Some(held) = active.remove(&(ch, pitch)) {
                    notes.push(finish(ch, pitch, held, current_tick));
                }
                active.insert((ch, pitch), (vel.as_int(), current_tick));
            }
            midly::MidiMessage::NoteOn { key, .. } | midly::MidiMessage::NoteOff { key, .. } => {
                let pitch = key.as_int();
                if let Some(held) = active.remove(&(ch, pitch)) {
                    if sustain_on.get(&ch).copied().unwrap_or(false) {
                        sustained.insert((ch, pitch), held);
                    } else {
                        notes.push(finish(ch, pitch, held, current_tick));
                    }
                }
            }
            // CC64 = damper/sustain pedal
            midly::MidiMessage::Controller { controller, value } if controller.as_int() == 64 => {
                let is_on = value.as_int() >= 32;
                let was_on = sustain_on.insert(ch, is_on).unwrap_or(false);
                if was_on && !is_on {
                    let released: Vec<(u8, u8)> =
                        sustained.range((ch, 0)..=(ch, u8::MAX)).map(|(k, _)| *k).collect();
                    for key in released {
                        if let Some(held) = sustained.remove(&key) {
                            notes.push(finish(key.0, key.1, held, current_tick));
                        }
                    }
                }
            }
            _ => {}
        }
    }

    // Anything still sounding ends with the track
    for ((ch, pitch), held) in active.into_iter().chain(sustained) {
        notes.push(finish(ch, pitch, held, current_tick));
    }
}

fn finish(channel: u8, pitch: u8, (velocity, start): (u8, u64), end_tick: u64) -> NoteEvent {
    NoteEvent {
        tick: start,
        pitch,
        velocity,
        duration_ticks: end_tick.saturating_sub(start),
        channel,
    }
}
