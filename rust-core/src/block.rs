//! Audio block intake contract
//!
//! A block is one fixed-size chunk of mono samples at the session rate.
//! Anything else is rejected at the boundary, before analysis starts.

use thiserror::Error;

/// Structural mismatch between a delivered block and the session
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractViolation {
    #[error("block has {actual} samples, session expects {expected}")]
    BlockLength { expected: usize, actual: usize },

    #[error("block sample rate is {actual} Hz, session runs at {expected} Hz")]
    SampleRate { expected: u32, actual: u32 },
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("Input contract violation: {0}")]
    InputContractViolation(#[from] ContractViolation),
}

/// One block of mono samples, borrowed for the duration of an analysis call
#[derive(Debug, Clone, Copy)]
pub struct AudioBlock<'a> {
    samples: &'a [f64],
    sample_rate: u32,
}

impl<'a> AudioBlock<'a> {
    pub fn new(samples: &'a [f64], sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn samples(&self) -> &'a [f64] {
        self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Largest absolute sample value. NaN samples are ignored.
    pub fn peak(&self) -> f64 {
        self.samples.iter().fold(0.0_f64, |peak, &s| peak.max(s.abs()))
    }

    /// Verify the block matches the session's block size and sample rate
    pub fn check(&self, block_size: usize, sample_rate: u32) -> Result<(), AnalysisError> {
        if self.samples.len() != block_size {
            return Err(ContractViolation::BlockLength {
                expected: block_size,
                actual: self.samples.len(),
            }
            .into());
        }
        if self.sample_rate != sample_rate {
            return Err(ContractViolation::SampleRate {
                expected: sample_rate,
                actual: self.sample_rate,
            }
            .into());
        }
        Ok(())
    }
}
