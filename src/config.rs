// Configuration management for Music Box

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::quantize::{
    ParamsError, PitchTable, QuantizeParams, DEFAULT_GAP_MULTIPLIER, DEFAULT_PITCHES,
    DEFAULT_TICKS_PER_QUARTER,
};

/// Quantizer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Number of pin rows around the cylinder
    #[serde(default = "default_row_capacity")]
    pub row_capacity: usize,

    /// Allowed pitches, one pin lane per entry, in lane order
    #[serde(default = "default_pitch_table")]
    pub pitch_table: Vec<u8>,

    /// Onsets this close to a group's first onset share its row.
    /// Unset means `max(1, ticks_per_quarter / 240)` for each file.
    #[serde(default)]
    pub jitter_ticks: Option<u64>,

    /// Gaps longer than this multiple of the typical gap get silent rows.
    /// Zero or negative disables silent rows.
    #[serde(default = "default_gap_multiplier")]
    pub gap_multiplier: f64,

    /// Time division assumed for files without one
    #[serde(default = "default_ticks_per_quarter")]
    pub default_ticks_per_quarter: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            row_capacity: default_row_capacity(),
            pitch_table: default_pitch_table(),
            jitter_ticks: None,
            gap_multiplier: default_gap_multiplier(),
            default_ticks_per_quarter: default_ticks_per_quarter(),
        }
    }
}

impl Config {
    /// Load config from disk or return default
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            match Self::load(path) {
                Ok(config) => return config,
                Err(e) => {
                    log::warn!("Failed to load config {}: {:#}", path.display(), e);
                }
            }
        }

        Self::default()
    }

    /// Load config from disk
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save config to disk
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;

        Ok(())
    }

    /// Get the default config file path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("musicbox")
            .join("config.toml")
    }

    /// Quantization parameters for a source with the given time division.
    /// `None` falls back to `default_ticks_per_quarter`.
    pub fn params_for(&self, ticks_per_quarter: Option<u32>) -> Result<QuantizeParams, ParamsError> {
        let tpq = ticks_per_quarter
            .filter(|&t| t > 0)
            .unwrap_or(self.default_ticks_per_quarter);
        let table = PitchTable::new(self.pitch_table.clone())?;

        let mut params =
            QuantizeParams::new(self.row_capacity, table, tpq)?.with_gap_multiplier(self.gap_multiplier)?;
        if let Some(jitter) = self.jitter_ticks {
            params = params.with_jitter_ticks(jitter)?;
        }
        Ok(params)
    }
}

fn default_row_capacity() -> usize {
    25
}

fn default_pitch_table() -> Vec<u8> {
    DEFAULT_PITCHES.to_vec()
}

fn default_gap_multiplier() -> f64 {
    DEFAULT_GAP_MULTIPLIER
}

fn default_ticks_per_quarter() -> u32 {
    DEFAULT_TICKS_PER_QUARTER
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config: Config = toml::from_str("row_capacity = 5").unwrap();
        assert_eq!(config.row_capacity, 5);
        assert_eq!(config.pitch_table, DEFAULT_PITCHES.to_vec());
        assert_eq!(config.gap_multiplier, 1.75);
        assert_eq!(config.jitter_ticks, None);
        assert_eq!(config.default_ticks_per_quarter, 480);
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            row_capacity: 12,
            pitch_table: vec![48, 50, 52],
            jitter_ticks: Some(8),
            gap_multiplier: 0.0,
            default_ticks_per_quarter: 96,
        };
        config.save(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn unreadable_config_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "row_capacity = \"many\"").unwrap();
        assert_eq!(Config::load_or_default(&path), Config::default());
        assert_eq!(Config::load_or_default(&dir.path().join("absent.toml")), Config::default());
    }

    #[test]
    fn params_use_source_division_when_present() {
        let config = Config::default();
        let params = config.params_for(Some(960)).unwrap();
        assert_eq!(params.ticks_per_quarter(), 960);
        assert_eq!(params.jitter_ticks(), 4);

        let params = config.params_for(None).unwrap();
        assert_eq!(params.ticks_per_quarter(), 480);
        assert_eq!(params.jitter_ticks(), 2);
    }

    #[test]
    fn explicit_jitter_overrides_derived_jitter() {
        let config = Config {
            jitter_ticks: Some(30),
            ..Config::default()
        };
        assert_eq!(config.params_for(Some(960)).unwrap().jitter_ticks(), 30);
    }

    #[test]
    fn invalid_config_values_surface_as_params_errors() {
        let config = Config {
            pitch_table: vec![60, 60],
            ..Config::default()
        };
        assert_eq!(config.params_for(None).unwrap_err(), ParamsError::DuplicatePitch(60));

        let config = Config {
            row_capacity: 0,
            ..Config::default()
        };
        assert_eq!(config.params_for(None).unwrap_err(), ParamsError::ZeroRowCapacity);
    }
}
