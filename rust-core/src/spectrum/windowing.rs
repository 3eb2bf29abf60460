//! Window functions for spectral analysis
//!
//! Applied to each block before the FFT to reduce spectral leakage

use std::f64::consts::PI;

/// Generate Hann window coefficients
///
/// w[n] = 0.5 - 0.5*cos(2πn/(M-1)), symmetric, zero at both ends.
/// Lengths below 2 have no taper and return all ones.
pub fn hann_window(length: usize) -> Vec<f64> {
    if length < 2 {
        return vec![1.0; length];
    }

    let m = length as f64;
    (0..length)
        .map(|n| {
            let angle = 2.0 * PI * n as f64 / (m - 1.0);
            0.5 - 0.5 * angle.cos()
        })
        .collect()
}

/// Multiply `signal` by `window` into `out`, sample by sample
///
/// All three slices are expected to have the same length; extra samples in
/// the longer slices are left untouched.
pub fn apply_window_into(signal: &[f64], window: &[f64], out: &mut [f64]) {
    for ((dst, &s), &w) in out.iter_mut().zip(signal).zip(window) {
        *dst = s * w;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hann_shape() {
        let length = 161;
        let hann = hann_window(length);

        assert_eq!(hann.len(), length);

        // Zero at the edges, symmetric, unity at the centre
        assert!(hann[0].abs() < 1e-12);
        assert!(hann[length - 1].abs() < 1e-12);
        assert!((hann[10] - hann[length - 11]).abs() < 1e-12);
        assert!((hann[length / 2] - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_degenerate_lengths() {
        assert!(hann_window(0).is_empty());
        assert_eq!(hann_window(1), vec![1.0]);
    }

    #[test]
    fn test_apply_window_into() {
        let signal = vec![1.0; 100];
        let window = hann_window(100);
        let mut out = vec![0.0; 100];

        apply_window_into(&signal, &window, &mut out);

        assert_eq!(out, window);
        assert!(out[0] < 0.01);
        assert!(out[99] < 0.01);
    }
}
