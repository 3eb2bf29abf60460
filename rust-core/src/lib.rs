//! Sirius Audio - Real-Time Pitch Detection Core
//!
//! Windowed spectral analysis of live audio blocks, dominant-frequency
//! estimation, note naming, and portal-frequency scoring, with a shared
//! state snapshot that display and recording consumers read.

// Suppress PyO3 non-local impl warnings (harmless macro-generated code)
#![cfg_attr(feature = "python", allow(non_local_definitions))]

pub mod audio;
pub mod block;
pub mod config;
pub mod pipeline;
pub mod pitch;
pub mod spectrum;
pub mod state;

#[cfg(feature = "python")]
pub mod python_bindings;

pub use audio::{PitchMonitor, RecordingSink};
pub use block::{AnalysisError, AudioBlock, ContractViolation};
pub use config::{ConfigError, SessionConfig};
pub use pipeline::{PitchPipeline, PitchReading};
pub use pitch::{NoteLabel, NoteMapper, PitchEstimator, PortalScorer};
pub use spectrum::SpectralAnalyzer;
pub use state::{AnalysisSnapshot, AnalysisState, StateReader};
