//! Block spectral analyzer
//!
//! Hann window + real FFT magnitude for one fixed-size block

use super::fft::FftEngine;
use super::windowing::{apply_window_into, hann_window};
use crate::block::{AnalysisError, AudioBlock};

/// One-sided magnitude spectrum of a single block
///
/// Borrows the analyzer's output buffer and is only valid until the next
/// call to [`SpectralAnalyzer::analyze`].
#[derive(Debug, Clone, Copy)]
pub struct Spectrum<'a> {
    magnitudes: &'a [f64],
    resolution_hz: f64,
}

impl<'a> Spectrum<'a> {
    pub fn new(magnitudes: &'a [f64], resolution_hz: f64) -> Self {
        Self {
            magnitudes,
            resolution_hz,
        }
    }

    pub fn magnitudes(&self) -> &'a [f64] {
        self.magnitudes
    }

    /// Bin spacing in Hz (R / N)
    pub fn resolution_hz(&self) -> f64 {
        self.resolution_hz
    }

    pub fn len(&self) -> usize {
        self.magnitudes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.magnitudes.is_empty()
    }

    pub fn frequency_of(&self, bin: usize) -> f64 {
        bin as f64 * self.resolution_hz
    }

    /// (frequency Hz, magnitude) pairs in ascending frequency order
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64)> + 'a {
        let resolution = self.resolution_hz;
        self.magnitudes
            .iter()
            .enumerate()
            .map(move |(k, &mag)| (k as f64 * resolution, mag))
    }
}

/// Real-time spectrum analyzer for one session
///
/// Window coefficients, FFT plan and buffers are built once; `analyze` only
/// touches preallocated memory.
pub struct SpectralAnalyzer {
    block_size: usize,
    sample_rate: u32,
    window: Vec<f64>,
    fft_engine: FftEngine,
    magnitudes: Vec<f64>,
}

impl SpectralAnalyzer {
    pub fn new(block_size: usize, sample_rate: u32) -> Self {
        let fft_engine = FftEngine::new(block_size);
        let magnitudes = vec![0.0; fft_engine.num_bins()];

        Self {
            block_size,
            sample_rate,
            window: hann_window(block_size),
            fft_engine,
            magnitudes,
        }
    }

    /// Window and transform one block
    ///
    /// Blocks of the wrong length or rate are rejected, never padded.
    pub fn analyze(&mut self, block: &AudioBlock<'_>) -> Result<Spectrum<'_>, AnalysisError> {
        block.check(self.block_size, self.sample_rate)?;

        apply_window_into(block.samples(), &self.window, self.fft_engine.input_mut());
        self.fft_engine.magnitudes_into(&mut self.magnitudes);

        Ok(Spectrum::new(&self.magnitudes, self.resolution_hz()))
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Get number of frequency bins
    pub fn num_bins(&self) -> usize {
        self.fft_engine.num_bins()
    }

    pub fn resolution_hz(&self) -> f64 {
        self.fft_engine.bin_to_hz(1, self.sample_rate as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::ContractViolation;
    use std::f64::consts::PI;

    fn sine(freq_hz: f64, len: usize, sample_rate: u32) -> Vec<f64> {
        (0..len)
            .map(|n| 0.5 * (2.0 * PI * freq_hz * n as f64 / sample_rate as f64).sin())
            .collect()
    }

    #[test]
    fn test_analyzer_basic() {
        let mut analyzer = SpectralAnalyzer::new(1024, 44_100);
        let signal = sine(1000.0, 1024, 44_100);

        let spectrum = analyzer.analyze(&AudioBlock::new(&signal, 44_100)).unwrap();

        assert_eq!(spectrum.len(), 513);

        let (peak_freq, _) = spectrum
            .bins()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
            .unwrap();

        assert!((peak_freq - 1000.0).abs() <= spectrum.resolution_hz());
    }

    #[test]
    fn test_window_suppresses_dc_step() {
        let mut analyzer = SpectralAnalyzer::new(512, 8000);
        let signal = vec![1.0; 512];

        let spectrum = analyzer.analyze(&AudioBlock::new(&signal, 8000)).unwrap();

        // Hann sums to (N-1)/2; leakage past the main lobe is tiny
        assert!((spectrum.magnitudes()[0] - 255.5).abs() < 1e-6);
        assert!(spectrum.magnitudes()[5] < 0.05);
    }

    #[test]
    fn test_deterministic() {
        let mut analyzer = SpectralAnalyzer::new(256, 8000);
        let signal = sine(440.0, 256, 8000);

        let first = analyzer
            .analyze(&AudioBlock::new(&signal, 8000))
            .unwrap()
            .magnitudes()
            .to_vec();
        let second = analyzer
            .analyze(&AudioBlock::new(&signal, 8000))
            .unwrap()
            .magnitudes()
            .to_vec();

        assert_eq!(first, second);
    }

    #[test]
    fn test_rejects_wrong_length() {
        let mut analyzer = SpectralAnalyzer::new(1024, 44_100);
        let signal = vec![0.0; 512];

        let err = analyzer
            .analyze(&AudioBlock::new(&signal, 44_100))
            .unwrap_err();

        assert_eq!(
            err,
            AnalysisError::InputContractViolation(ContractViolation::BlockLength {
                expected: 1024,
                actual: 512,
            })
        );
    }

    #[test]
    fn test_frequency_axis() {
        let analyzer = SpectralAnalyzer::new(1024, 48_000);
        assert_eq!(analyzer.num_bins(), 513);
        assert!((analyzer.resolution_hz() - 46.875).abs() < 1e-12);
    }
}
