// Onset clustering: collapse near-simultaneous note starts into groups

use serde::Serialize;

use crate::note::NoteEvent;

/// Events that start together, within the jitter tolerance of `start_tick`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OnsetGroup {
    /// Tick of the first event in the group
    pub start_tick: u64,
    /// Events in input order
    pub events: Vec<NoteEvent>,
}

impl OnsetGroup {
    fn open(event: NoteEvent) -> Self {
        Self {
            start_tick: event.tick,
            events: vec![event],
        }
    }
}

/// Group a tick-sorted event list into onset groups.
///
/// The window is anchored at the group's first event: an event joins the
/// open group while `tick <= start_tick + jitter_ticks` and opens a new group
/// otherwise. Anchoring to the previous event instead would let a dense run
/// of onsets drift arbitrarily far.
pub fn cluster_onsets(events: &[NoteEvent], jitter_ticks: u64) -> Vec<OnsetGroup> {
    let mut groups: Vec<OnsetGroup> = Vec::new();

    for &event in events {
        match groups.last_mut() {
            Some(group) if event.tick <= group.start_tick.saturating_add(jitter_ticks) => {
                group.events.push(event);
            }
            _ => groups.push(OnsetGroup::open(event)),
        }
    }

    groups
}
