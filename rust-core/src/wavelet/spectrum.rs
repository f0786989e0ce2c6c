//! Wavelet amplitude and phase spectrum
//!
//! Display-oriented view of a wavelet's frequency content: the wavelet is
//! centered on its time-zero sample, transformed, and reported as
//! amplitude and phase-in-degrees over the positive-frequency bins.

use num_complex::Complex;

use crate::transform::{MixedRadixFft, TransformError};
use crate::wavelet::model::Wavelet;
use crate::wavelet::pad::pad_sync;

/// Amplitude/phase spectrum over `transform_len / 2 + 1` bins
#[derive(Debug, Clone, PartialEq)]
pub struct WaveletSpectrum {
    /// Bin magnitudes |X[k]|
    pub amplitude: Vec<f64>,
    /// Bin phases in degrees, 0 where the bin is exactly zero
    pub phase_degrees: Vec<f64>,
}

impl Wavelet {
    /// Compute the wavelet's amplitude and phase spectrum
    ///
    /// # Arguments
    /// * `transform_len` - Transform length, >= the wavelet length; finer
    ///   lengths give finer frequency resolution
    ///
    /// # Returns
    /// Spectrum over the positive-frequency bins, or an error when
    /// `transform_len` cannot be factored by the engine
    pub fn spectrum(&self, transform_len: usize) -> Result<WaveletSpectrum, TransformError> {
        assert!(
            transform_len >= self.num_samples(),
            "transform length {} shorter than wavelet ({} samples)",
            transform_len,
            self.num_samples()
        );

        let mut fft = MixedRadixFft::new();
        let mut padded = vec![0.0; transform_len];
        let mut bins = vec![Complex::new(0.0, 0.0); transform_len];
        pad_sync(
            self.samples(),
            0,
            &mut padded,
            self.num_samples(),
            self.time_zero_index(),
        );
        fft.forward(&padded, &mut bins)?;

        let num_bins = transform_len / 2 + 1;
        let mut amplitude = Vec::with_capacity(num_bins);
        let mut phase_degrees = Vec::with_capacity(num_bins);
        let deg = -180.0 / std::f64::consts::PI;
        for bin in &bins[..num_bins] {
            amplitude.push(bin.norm());
            if bin.re == 0.0 && bin.im == 0.0 {
                phase_degrees.push(0.0);
            } else {
                phase_degrees.push(deg * bin.im.atan2(bin.re));
            }
        }
        Ok(WaveletSpectrum {
            amplitude,
            phase_degrees,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wavelet::model::TimeUnit;
    use approx::assert_relative_eq;

    #[test]
    fn test_spike_at_time_zero_is_flat_zero_phase() {
        // A unit spike on the time-zero sample is an all-pass wavelet
        let w = Wavelet::new(
            vec![0.0, 0.0, 1.0, 0.0, 0.0],
            2.0,
            -4.0,
            TimeUnit::Milliseconds,
        );
        let spectrum = w.spectrum(16).unwrap();
        assert_eq!(spectrum.amplitude.len(), 9);
        for k in 0..9 {
            assert_relative_eq!(spectrum.amplitude[k], 1.0, epsilon = 1e-12);
            assert!(spectrum.phase_degrees[k].abs() < 1e-9);
        }
    }

    #[test]
    fn test_symmetric_wavelet_has_zero_phase() {
        let w = Wavelet::new(
            vec![0.2, -0.5, 1.0, -0.5, 0.2],
            2.0,
            -4.0,
            TimeUnit::Milliseconds,
        );
        let spectrum = w.spectrum(60).unwrap();
        assert_eq!(spectrum.amplitude.len(), 31);
        // Centered symmetric wavelets transform to purely real spectra,
        // so every bin phase is 0 or 180 degrees
        for (k, &phase) in spectrum.phase_degrees.iter().enumerate() {
            let wrapped = phase.abs() % 180.0;
            let off = wrapped.min(180.0 - wrapped);
            assert!(off < 1e-6, "bin {}: phase {}", k, phase);
        }
        // DC bin is the coefficient sum
        assert_relative_eq!(spectrum.amplitude[0], 0.4, epsilon = 1e-12);
    }

    #[test]
    fn test_unsupported_length_rejected() {
        let w = Wavelet::new(vec![1.0, 0.5], 2.0, 0.0, TimeUnit::Milliseconds);
        assert!(w.spectrum(17).is_err());
    }
}
