// End-to-end: real SMF files on disk -> quantized grids

use std::path::{Path, PathBuf};

use midly::num::{u4, u7, u15, u28};
use midly::{Format, Header, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind};

use musicbox_lib::config::Config;
use musicbox_lib::midi::MidiError;
use musicbox_lib::{batch, quantize_file, report, PipelineError, PitchTable};

/// Write a single-track file of (onset tick, pitch) notes, each 60 ticks long.
fn write_notes(dir: &Path, name: &str, tpq: u16, notes: &[(u32, u8)]) -> PathBuf {
    let mut timeline: Vec<(u32, MidiMessage)> = Vec::new();
    for &(tick, pitch) in notes {
        timeline.push((tick, MidiMessage::NoteOn { key: u7::new(pitch), vel: u7::new(100) }));
        timeline.push((tick + 60, MidiMessage::NoteOff { key: u7::new(pitch), vel: u7::new(0) }));
    }
    timeline.sort_by_key(|(tick, _)| *tick);

    let mut track: Vec<TrackEvent<'static>> = Vec::new();
    let mut last = 0;
    for (tick, message) in timeline {
        track.push(TrackEvent {
            delta: u28::new(tick - last),
            kind: TrackEventKind::Midi { channel: u4::new(0), message },
        });
        last = tick;
    }
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(midly::MetaMessage::EndOfTrack),
    });

    let mut smf = Smf::new(Header::new(Format::SingleTrack, Timing::Metrical(u15::new(tpq))));
    smf.tracks.push(track);
    let mut buf = Vec::new();
    smf.write(&mut buf).unwrap();

    let path = dir.join(name);
    std::fs::write(&path, buf).unwrap();
    path
}

fn col(pitch: u8) -> usize {
    PitchTable::default().column_of(pitch).unwrap()
}

#[test]
fn chord_and_melody_fill_expected_pins() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_notes(
        dir.path(),
        "waltz.mid",
        480,
        &[(0, 60), (0, 64), (0, 67), (480, 62), (960, 64), (1440, 65)],
    );

    let file = quantize_file(&path, &Config::default()).unwrap();
    let grid = &file.result.grid;
    assert_eq!(grid.row_count(), 25);
    assert_eq!(grid.column_count(), 16);
    for pitch in [60, 64, 67] {
        assert!(grid.has_note(0, col(pitch)));
    }
    assert!(grid.has_note(1, col(62)));
    assert!(grid.has_note(2, col(64)));
    assert!(grid.has_note(3, col(65)));
    assert_eq!(file.result.diagnostics.rows_used, 4);
}

#[test]
fn small_cylinder_truncates_and_reports() {
    let dir = tempfile::tempdir().unwrap();
    let notes: Vec<(u32, u8)> = (0..5).map(|i| (i * 240, 60 + 2 * i as u8)).collect();
    let path = write_notes(dir.path(), "scale.mid", 480, &notes);

    let config = Config {
        row_capacity: 2,
        ..Config::default()
    };
    let file = quantize_file(&path, &config).unwrap();
    assert_eq!(file.result.grid.note_count(), 2);
    assert_eq!(file.result.diagnostics.truncated_groups, 3);
    assert!(report::summary(&file.result.diagnostics).contains("TRUNCATED"));
}

#[test]
fn out_of_table_pitch_keeps_its_row() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_notes(
        dir.path(),
        "chromatic.mid",
        480,
        &[(0, 60), (480, 61), (960, 62)],
    );

    let file = quantize_file(&path, &Config::default()).unwrap();
    assert_eq!(file.result.diagnostics.dropped_events, 1);
    assert!(file.result.grid.has_note(2, col(62)));
    assert!(file.result.grid.row(1).iter().all(Vec::is_empty));
}

#[test]
fn rerunning_a_file_is_identical() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_notes(dir.path(), "etude.mid", 96, &[(0, 72), (1, 76), (48, 74), (400, 79)]);
    let config = Config::default();
    let first = quantize_file(&path, &config).unwrap();
    let second = quantize_file(&path, &config).unwrap();
    assert_eq!(first.result, second.result);
}

#[test]
fn json_export_round_trips_through_serde_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_notes(dir.path(), "tiny.mid", 480, &[(0, 60)]);
    let file = quantize_file(&path, &Config::default()).unwrap();

    let json = report::to_json(&file).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["grid"]["row_count"], 25);
    assert_eq!(value["params"]["ticks_per_quarter"], 480);
    assert_eq!(value["diagnostics"]["placed_groups"], 1);
}

#[test]
fn unreadable_input_is_the_only_failure() {
    let dir = tempfile::tempdir().unwrap();
    let good = write_notes(dir.path(), "good.mid", 480, &[(0, 60)]);
    let missing = dir.path().join("gone.mid");

    let err = quantize_file(&missing, &Config::default()).unwrap_err();
    assert!(matches!(err, PipelineError::Midi(MidiError::InputUnavailable { .. })));

    let results = batch::quantize_files(&[good, missing], &Config::default(), 2);
    assert!(results[0].is_ok());
    assert!(!results[1].is_ok());
}
