//! Spectral analysis with FFT

pub mod analysis;
pub mod fft;
pub mod windowing;

pub use analysis::{SpectralAnalyzer, Spectrum};
pub use fft::FftEngine;
pub use windowing::hann_window;
