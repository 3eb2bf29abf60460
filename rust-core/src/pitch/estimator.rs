//! Dominant-frequency estimation
//!
//! Picks the strongest bin of a windowed spectrum after a fixed amplitude
//! gate and a low-frequency exclusion band. This is a monophonic
//! dominant-bin heuristic: a strong overtone can win over a weaker
//! fundamental, and the result is quantized to the bin grid.

use crate::block::AudioBlock;
use crate::config::SessionConfig;
use crate::spectrum::Spectrum;

/// Frequency reported for silent or pitchless blocks
pub const SILENCE_HZ: f64 = 0.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchEstimator {
    /// Peak amplitude below which the block is silence
    amplitude_threshold: f64,

    /// Bins below this frequency are never selected
    low_cutoff_hz: f64,
}

impl Default for PitchEstimator {
    fn default() -> Self {
        Self::new(0.01, 50.0)
    }
}

impl PitchEstimator {
    pub fn new(amplitude_threshold: f64, low_cutoff_hz: f64) -> Self {
        Self {
            amplitude_threshold,
            low_cutoff_hz,
        }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(config.amplitude_threshold, config.low_cutoff_hz)
    }

    pub fn amplitude_threshold(&self) -> f64 {
        self.amplitude_threshold
    }

    pub fn low_cutoff_hz(&self) -> f64 {
        self.low_cutoff_hz
    }

    /// True when the block's peak amplitude is under the gate
    pub fn is_silent(&self, block: &AudioBlock<'_>) -> bool {
        block.peak() < self.amplitude_threshold
    }

    /// Dominant frequency of `spectrum` in Hz, or [`SILENCE_HZ`]
    ///
    /// Ties go to the lowest bin. Never fails: a gated block, an empty
    /// search range or a spectrum without a positive finite maximum all give
    /// silence.
    pub fn estimate(&self, spectrum: &Spectrum<'_>, block: &AudioBlock<'_>) -> f64 {
        if self.is_silent(block) {
            return SILENCE_HZ;
        }

        let resolution = spectrum.resolution_hz();
        if !(resolution.is_finite() && resolution > 0.0) {
            return SILENCE_HZ;
        }

        let first = self.first_bin(resolution);
        let magnitudes = spectrum.magnitudes();
        if first >= magnitudes.len() {
            return SILENCE_HZ;
        }

        let mut best: Option<(usize, f64)> = None;
        for (offset, &mag) in magnitudes[first..].iter().enumerate() {
            if !mag.is_finite() {
                continue;
            }
            match best {
                Some((_, best_mag)) if mag <= best_mag => {}
                _ => best = Some((first + offset, mag)),
            }
        }

        // An all-zero search range has no peak to report
        match best {
            Some((bin, mag)) if mag > 0.0 => spectrum.frequency_of(bin),
            _ => SILENCE_HZ,
        }
    }

    /// Index of the first bin whose centre frequency is at or above the cutoff
    fn first_bin(&self, resolution_hz: f64) -> usize {
        if self.low_cutoff_hz <= 0.0 {
            return 0;
        }
        // Small slack so a cutoff landing exactly on a bin keeps that bin
        let bins = self.low_cutoff_hz / resolution_hz - 1e-9;
        if bins.is_finite() {
            bins.ceil().max(0.0) as usize
        } else {
            usize::MAX
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectrum::SpectralAnalyzer;
    use std::f64::consts::PI;

    const RATE: u32 = 44_100;
    const N: usize = 1024;

    fn sine(freq_hz: f64, amplitude: f64) -> Vec<f64> {
        (0..N)
            .map(|n| amplitude * (2.0 * PI * freq_hz * n as f64 / RATE as f64).sin())
            .collect()
    }

    fn detect(estimator: &PitchEstimator, samples: &[f64]) -> f64 {
        let mut analyzer = SpectralAnalyzer::new(N, RATE);
        let block = AudioBlock::new(samples, RATE);
        let spectrum = analyzer.analyze(&block).unwrap();
        estimator.estimate(&spectrum, &block)
    }

    #[test]
    fn test_silent_block_returns_zero() {
        let estimator = PitchEstimator::default();
        assert_eq!(detect(&estimator, &vec![0.0; N]), SILENCE_HZ);

        // Loud enough to have a clear peak, but under the gate
        assert_eq!(detect(&estimator, &sine(440.0, 0.009)), SILENCE_HZ);
    }

    #[test]
    fn test_zero_energy_is_silence_without_gate() {
        let estimator = PitchEstimator::new(0.0, 50.0);
        assert_eq!(detect(&estimator, &vec![0.0; N]), SILENCE_HZ);

        // A two-sample Hann window is all zeros, so nothing survives it
        let mut analyzer = SpectralAnalyzer::new(2, RATE);
        let samples = [0.7, -0.7];
        let block = AudioBlock::new(&samples, RATE);
        let spectrum = analyzer.analyze(&block).unwrap();
        assert_eq!(
            PitchEstimator::new(0.0, 0.0).estimate(&spectrum, &block),
            SILENCE_HZ
        );
    }

    #[test]
    fn test_gate_threshold_is_inclusive() {
        let estimator = PitchEstimator::new(0.5, 50.0);
        let mut samples = vec![0.0; N];
        samples[100] = 0.5;
        assert!(!estimator.is_silent(&AudioBlock::new(&samples, RATE)));
        samples[100] = 0.499;
        assert!(estimator.is_silent(&AudioBlock::new(&samples, RATE)));
    }

    #[test]
    fn test_sine_within_one_bin() {
        let estimator = PitchEstimator::default();
        let resolution = RATE as f64 / N as f64;

        for &f in &[60.0, 110.0, 261.63, 440.0, 528.0, 1000.0, 4321.0, 15_000.0] {
            let detected = detect(&estimator, &sine(f, 0.5));
            assert!(
                (detected - f).abs() <= resolution,
                "expected ~{} Hz, got {} Hz",
                f,
                detected
            );
        }
    }

    #[test]
    fn test_low_frequency_exclusion() {
        let estimator = PitchEstimator::default();

        // Large DC offset plus a quieter tone: DC must not win
        let samples: Vec<f64> = sine(880.0, 0.2).iter().map(|s| s + 0.6).collect();
        let detected = detect(&estimator, &samples);
        assert!((detected - 880.0).abs() <= RATE as f64 / N as f64);
    }

    #[test]
    fn test_first_bin_rounds_up() {
        let estimator = PitchEstimator::default();
        let resolution = RATE as f64 / N as f64;

        // 50 Hz falls between bin 1 (43 Hz) and bin 2 (86 Hz)
        assert_eq!(estimator.first_bin(resolution), 2);

        let exact = PitchEstimator::new(0.01, 2.0 * resolution);
        assert_eq!(exact.first_bin(resolution), 2);

        assert_eq!(PitchEstimator::new(0.01, 0.0).first_bin(resolution), 0);
    }

    #[test]
    fn test_cutoff_above_nyquist_is_silence() {
        let estimator = PitchEstimator::new(0.01, 30_000.0);
        assert_eq!(detect(&estimator, &sine(440.0, 0.5)), SILENCE_HZ);
    }

    #[test]
    fn test_tie_breaks_to_lowest_bin() {
        let estimator = PitchEstimator::new(0.01, 0.0);
        let magnitudes = [0.0, 3.0, 1.0, 3.0, 2.0];
        let spectrum = Spectrum::new(&magnitudes, 10.0);
        let samples = [0.5; 8];
        let block = AudioBlock::new(&samples, 80);

        assert_eq!(estimator.estimate(&spectrum, &block), 10.0);
    }

    #[test]
    fn test_non_finite_bins_never_win() {
        let estimator = PitchEstimator::new(0.01, 0.0);
        let samples = [0.5; 8];
        let block = AudioBlock::new(&samples, 80);

        let magnitudes = [0.0, f64::NAN, f64::INFINITY, 2.0, 1.0];
        let spectrum = Spectrum::new(&magnitudes, 10.0);
        assert_eq!(estimator.estimate(&spectrum, &block), 30.0);

        let magnitudes = [f64::NAN; 4];
        let spectrum = Spectrum::new(&magnitudes, 10.0);
        assert_eq!(estimator.estimate(&spectrum, &block), SILENCE_HZ);
    }
}
