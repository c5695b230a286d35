// File-level quantization: MIDI file -> parameters -> grid

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::midi::{self, MidiError};
use crate::quantize::{self, ParamsError, QuantizeParams, Quantization};

/// Error type for quantizing a file
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Midi(#[from] MidiError),

    #[error("Invalid quantization parameters: {0}")]
    Params(#[from] ParamsError),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

/// One file's grid plus the parameters that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct FileQuantization {
    pub path: PathBuf,
    pub params: QuantizeParams,
    #[serde(flatten)]
    pub result: Quantization,
}

/// Parse `path` and quantize its notes under `config`.
///
/// Only a missing, unreadable or malformed file (or an invalid config) is an
/// error. Truncation and out-of-table pitches show up in the diagnostics.
pub fn quantize_file(path: &Path, config: &Config) -> Result<FileQuantization> {
    let source = midi::parse_midi(path)?;
    let params = config.params_for(source.ticks_per_quarter)?;
    let result = quantize::quantize(&source.events, &params);

    log::info!(
        "{}: {} notes -> {} rows used of {}",
        path.display(),
        result.grid.note_count(),
        result.diagnostics.rows_used,
        params.row_capacity(),
    );

    Ok(FileQuantization {
        path: path.to_path_buf(),
        params,
        result,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::midi::parser::tests::{off, on, smf_bytes};

    #[test]
    fn quantizes_a_file_with_its_own_time_division() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tune.mid");
        std::fs::write(
            &path,
            smf_bytes(960, &[vec![
                (0, 0, on(60)),
                (960, 0, off(60)),
                (0, 0, on(62)),
                (960, 0, off(62)),
                (0, 0, on(64)),
                (960, 0, off(64)),
            ]]),
        )
        .unwrap();

        let file = quantize_file(&path, &Config::default()).unwrap();
        assert_eq!(file.params.ticks_per_quarter(), 960);
        assert_eq!(file.result.diagnostics.typical_gap_ticks, 960);
        assert!(file.result.grid.has_note(0, 0));
        assert!(file.result.grid.has_note(1, 1));
        assert!(file.result.grid.has_note(2, 2));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = quantize_file(&dir.path().join("nope.mid"), &Config::default()).unwrap_err();
        assert!(matches!(err, PipelineError::Midi(MidiError::InputUnavailable { .. })));
    }

    #[test]
    fn invalid_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tune.mid");
        std::fs::write(&path, smf_bytes(480, &[vec![(0, 0, on(60))]])).unwrap();
        let config = Config {
            pitch_table: Vec::new(),
            ..Config::default()
        };
        let err = quantize_file(&path, &config).unwrap_err();
        assert!(matches!(err, PipelineError::Params(ParamsError::EmptyPitchTable)));
    }
}
