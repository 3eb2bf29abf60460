//! Session configuration
//!
//! Every value here is fixed when a session starts. Defaults mirror the
//! classic capture setup: 44.1 kHz mono, 1024-sample blocks.

use crate::pitch::portal::{default_portals, PortalFrequency};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Block size must be at least 2 samples (got {0})")]
    BlockSize(usize),

    #[error("Sample rate must be non-zero")]
    SampleRate,

    #[error("Only mono capture is supported (got {0} channels)")]
    Channels(u16),

    #[error("History capacity must be at least 1")]
    HistoryCapacity,

    #[error("Ring buffer must hold at least one block")]
    RingBlocks,

    #[error("Portal frequency table is empty")]
    EmptyPortalTable,

    #[error("{name} must be finite and positive (got {value})")]
    NotPositive { name: &'static str, value: f64 },

    #[error("{name} must be finite and non-negative (got {value})")]
    Negative { name: &'static str, value: f64 },
}

/// Where and how recordings are written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RecordingConfig {
    /// Directory the numbered WAV files land in
    pub directory: PathBuf,

    /// File name prefix, files are named `<prefix>_<n>.wav`
    pub file_prefix: String,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            file_prefix: "sirius_audio".to_string(),
        }
    }
}

/// Pitch monitor session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Sample rate in Hz
    pub sample_rate: u32,

    /// Samples per analysed block (N)
    pub block_size: usize,

    /// Channel count, only 1 is accepted
    pub channels: u16,

    /// Peak amplitude below which a block counts as silence
    pub amplitude_threshold: f64,

    /// Spectral bins below this frequency are ignored
    pub low_cutoff_hz: f64,

    /// Frequencies below this map to the silence label
    pub note_floor_hz: f64,

    /// Number of past frequencies kept in the rolling history (H)
    pub history_capacity: usize,

    /// Concert pitch used for note mapping
    pub reference_a4: f64,

    /// Distance in Hz at which portal strength reaches zero
    pub portal_falloff_hz: f64,

    /// Reference frequency table
    pub portals: Vec<PortalFrequency>,

    /// Capture ring buffer size, in blocks
    pub ring_blocks: usize,

    pub recording: RecordingConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            block_size: 1024,
            channels: 1,
            amplitude_threshold: 0.01,
            low_cutoff_hz: 50.0,
            note_floor_hz: 50.0,
            history_capacity: 100,
            reference_a4: 440.0,
            portal_falloff_hz: 50.0,
            portals: default_portals(),
            ring_blocks: 8,
            recording: RecordingConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Parse and validate a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: SessionConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Check every invariant the analysis path relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate == 0 {
            return Err(ConfigError::SampleRate);
        }
        if self.block_size < 2 {
            return Err(ConfigError::BlockSize(self.block_size));
        }
        if self.channels != 1 {
            return Err(ConfigError::Channels(self.channels));
        }
        if self.history_capacity == 0 {
            return Err(ConfigError::HistoryCapacity);
        }
        if self.ring_blocks == 0 {
            return Err(ConfigError::RingBlocks);
        }
        if self.portals.is_empty() {
            return Err(ConfigError::EmptyPortalTable);
        }

        require_positive("reference_a4", self.reference_a4)?;
        require_positive("portal_falloff_hz", self.portal_falloff_hz)?;
        require_non_negative("amplitude_threshold", self.amplitude_threshold)?;
        require_non_negative("low_cutoff_hz", self.low_cutoff_hz)?;
        require_non_negative("note_floor_hz", self.note_floor_hz)?;
        for portal in &self.portals {
            require_positive("portal frequency", portal.frequency)?;
        }

        Ok(())
    }

    /// Width of one spectral bin in Hz (R / N)
    pub fn bin_resolution_hz(&self) -> f64 {
        self.sample_rate as f64 / self.block_size as f64
    }

    /// Time covered by one block
    pub fn block_duration(&self) -> Duration {
        Duration::from_secs_f64(self.block_size as f64 / self.sample_rate as f64)
    }

    /// Ring buffer capacity in samples
    pub fn ring_capacity(&self) -> usize {
        self.block_size * self.ring_blocks
    }
}

fn require_positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

fn require_non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { name, value })
    }
}
