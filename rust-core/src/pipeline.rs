//! Block intake and the per-block analysis chain
//!
//! `submit_block` is the single entry point capture code calls. It runs
//! spectrum → dominant frequency → note + portal score and publishes the
//! result to the shared [`AnalysisState`].

use crate::block::{AnalysisError, AudioBlock};
use crate::config::{ConfigError, SessionConfig};
use crate::pitch::{NoteLabel, NoteMapper, PitchEstimator, PortalScore, PortalScorer};
use crate::spectrum::SpectralAnalyzer;
use crate::state::{AnalysisSnapshot, AnalysisState, StateReader};
use std::sync::Arc;

/// Result of analysing one accepted block
#[derive(Debug, Clone, PartialEq)]
pub struct PitchReading {
    pub frequency: f64,
    pub note: NoteLabel,
    pub portal: PortalScore,
}

pub struct PitchPipeline {
    analyzer: SpectralAnalyzer,
    estimator: PitchEstimator,
    mapper: NoteMapper,
    scorer: PortalScorer,
    state: AnalysisState,
}

impl PitchPipeline {
    /// Build a pipeline for one session; the config is validated first
    pub fn new(config: &SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        log::debug!(
            "Pitch pipeline: {} samples @ {} Hz ({:.2} Hz/bin), history {}",
            config.block_size,
            config.sample_rate,
            config.bin_resolution_hz(),
            config.history_capacity
        );

        Ok(Self {
            analyzer: SpectralAnalyzer::new(config.block_size, config.sample_rate),
            estimator: PitchEstimator::from_config(config),
            mapper: NoteMapper::from_config(config),
            scorer: PortalScorer::from_config(config),
            state: AnalysisState::new(config.history_capacity),
        })
    }

    /// Analyse one block and publish the result
    ///
    /// A block of the wrong size or rate is rejected and the state is left
    /// untouched. Anything numerically odd inside a well-formed block
    /// degrades to silence instead of failing.
    pub fn submit_block(&mut self, block: &AudioBlock<'_>) -> Result<PitchReading, AnalysisError> {
        let frequency = match self.analyzer.analyze(block) {
            Ok(spectrum) => self.estimator.estimate(&spectrum, block),
            Err(e) => {
                log::warn!("Rejected audio block: {}", e);
                return Err(e);
            }
        };

        let note = self.mapper.to_note(frequency);
        let portal = self.scorer.score(frequency);

        self.state
            .update(frequency, note, portal.strength, portal.closest.clone());

        Ok(PitchReading {
            frequency,
            note,
            portal,
        })
    }

    /// Convenience for callers holding bare samples at the session rate
    pub fn submit_samples(&mut self, samples: &[f64]) -> Result<PitchReading, AnalysisError> {
        let block = AudioBlock::new(samples, self.analyzer.sample_rate());
        self.submit_block(&block)
    }

    pub fn snapshot(&self) -> Arc<AnalysisSnapshot> {
        self.state.snapshot()
    }

    pub fn reader(&self) -> StateReader {
        self.state.reader()
    }

    pub fn block_size(&self) -> usize {
        self.analyzer.block_size()
    }

    pub fn sample_rate(&self) -> u32 {
        self.analyzer.sample_rate()
    }

    pub fn note_mapper(&self) -> &NoteMapper {
        &self.mapper
    }

    pub fn portal_scorer(&self) -> &PortalScorer {
        &self.scorer
    }
}
