//! FFT engine using realfft for real-valued signals
//!
//! Plans once and reuses its buffers, so the per-block path never allocates

use num_complex::Complex;
use realfft::{RealFftPlanner, RealToComplex};
use std::sync::Arc;

/// FFT engine for real-valued signals
pub struct FftEngine {
    /// FFT size (number of samples)
    fft_size: usize,

    /// Real FFT processor
    r2c: Arc<dyn RealToComplex<f64>>,

    /// Reusable input buffer (the transform clobbers it)
    input_buffer: Vec<f64>,

    /// Reusable output buffer (complex spectrum)
    output_buffer: Vec<Complex<f64>>,

    scratch: Vec<Complex<f64>>,
}

impl FftEngine {
    /// Create new FFT engine
    ///
    /// # Arguments
    /// * `fft_size` - FFT size (number of samples)
    pub fn new(fft_size: usize) -> Self {
        let mut planner = RealFftPlanner::<f64>::new();
        let r2c = planner.plan_fft_forward(fft_size);

        let input_buffer = r2c.make_input_vec();
        let output_buffer = r2c.make_output_vec();
        let scratch = r2c.make_scratch_vec();

        Self {
            fft_size,
            r2c,
            input_buffer,
            output_buffer,
            scratch,
        }
    }

    /// Time-domain input for the next transform
    pub fn input_mut(&mut self) -> &mut [f64] {
        &mut self.input_buffer
    }

    /// Transform the current input and write |X[k]| for k = 0..=fft_size/2
    ///
    /// `out` must hold `num_bins()` values. A failed transform leaves an
    /// all-zero spectrum, which downstream code reads as silence.
    pub fn magnitudes_into(&mut self, out: &mut [f64]) {
        let result = self.r2c.process_with_scratch(
            &mut self.input_buffer,
            &mut self.output_buffer,
            &mut self.scratch,
        );

        if let Err(e) = result {
            log::error!("FFT processing failed: {}", e);
            out.fill(0.0);
            return;
        }

        for (mag, c) in out.iter_mut().zip(&self.output_buffer) {
            *mag = c.norm();
        }
    }

    /// Get FFT size
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Get number of frequency bins (fft_size/2 + 1 for real FFT)
    pub fn num_bins(&self) -> usize {
        self.fft_size / 2 + 1
    }

    /// Convert bin index to Hz
    pub fn bin_to_hz(&self, bin: usize, sample_rate: f64) -> f64 {
        bin as f64 * sample_rate / self.fft_size as f64
    }
}
