//! Frequency-domain wavelet filtering of seismic traces
//!
//! Convolves a zero-phase-centered wavelet against trace segments via
//! forward FFT, bin-wise complex multiply and inverse FFT, then rescales
//! the result back to the input RMS level. The filter reshapes spectral
//! content without changing trace amplitude.

use log::debug;
use num_complex::Complex;
use thiserror::Error;

use crate::transform::{size_fft, MixedRadixFft, TransformError};
use crate::wavelet::model::{TimeUnit, Wavelet};
use crate::wavelet::pad::pad_sync;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error(
        "the wavelet sample rate ({wavelet_ms} msec) does not match \
         the seismic sample rate ({trace_ms} msec)"
    )]
    SampleRateMismatch { wavelet_ms: f64, trace_ms: f64 },

    #[error(transparent)]
    Transform(#[from] TransformError),
}

/// Cached wavelet spectrum and scratch buffers, all sized to the current
/// transform length. Rebuilt wholesale whenever that length changes; the
/// reuse is purely to avoid per-trace heap churn.
struct SpectrumCache {
    /// Transform length the buffers are sized for (0 = unset)
    size: usize,
    wavelet_spectrum: Vec<Complex<f64>>,
    segment_spectrum: Vec<Complex<f64>>,
    product: Vec<Complex<f64>>,
    inverse_out: Vec<Complex<f64>>,
    /// Real-valued scratch: padded segment on the way in, filtered
    /// samples on the way out
    padded: Vec<f64>,
}

impl SpectrumCache {
    fn new() -> Self {
        Self {
            size: 0,
            wavelet_spectrum: Vec::new(),
            segment_spectrum: Vec::new(),
            product: Vec::new(),
            inverse_out: Vec::new(),
            padded: Vec::new(),
        }
    }

    /// Reallocate every buffer at the new length. The old contents are
    /// never read back after a size change, so nothing is copied forward.
    fn resize(&mut self, size: usize) {
        let zero = Complex::new(0.0, 0.0);
        self.wavelet_spectrum = vec![zero; size];
        self.segment_spectrum = vec![zero; size];
        self.product = vec![zero; size];
        self.inverse_out = vec![zero; size];
        self.padded = vec![0.0; size];
        self.size = size;
    }
}

/// Stateful wavelet filter bound to one wavelet
///
/// Owns its transform tables and spectrum cache, so construct one
/// instance per worker for parallel trace processing; the `&mut self`
/// methods make shared concurrent use a compile error rather than a race.
pub struct WaveletFilter {
    wavelet: Option<Wavelet>,
    fft: MixedRadixFft,
    cache: SpectrumCache,
}

impl WaveletFilter {
    /// Create a filter for the given wavelet
    ///
    /// `None` builds a pass-through filter that returns traces unchanged;
    /// an absent wavelet is a convenience default, not an error.
    pub fn new(wavelet: Option<Wavelet>) -> Self {
        Self {
            wavelet,
            fft: MixedRadixFft::new(),
            cache: SpectrumCache::new(),
        }
    }

    pub fn wavelet(&self) -> Option<&Wavelet> {
        self.wavelet.as_ref()
    }

    /// Check that the trace sample interval matches the wavelet's
    ///
    /// # Arguments
    /// * `sample_interval` - Trace sample interval, in `unit`
    /// * `unit` - Unit of the interval
    ///
    /// # Returns
    /// `SampleRateMismatch` when the millisecond-converted intervals
    /// differ. Always Ok for a pass-through filter.
    pub fn check_sample_rate(
        &self,
        sample_interval: f64,
        unit: TimeUnit,
    ) -> Result<(), FilterError> {
        let Some(wavelet) = &self.wavelet else {
            return Ok(());
        };
        let trace_ms = unit.to_milliseconds(sample_interval);
        if trace_ms != wavelet.sample_interval() {
            return Err(FilterError::SampleRateMismatch {
                wavelet_ms: wavelet.sample_interval(),
                trace_ms,
            });
        }
        Ok(())
    }

    /// Filter a trace, checking the sample rate first
    ///
    /// # Arguments
    /// * `trace` - Full trace sample buffer
    /// * `count` - Number of samples to filter
    /// * `start` - Index of the first sample to filter
    /// * `sample_interval` - Trace sample interval, in `unit`
    /// * `unit` - Unit of the interval
    ///
    /// # Returns
    /// A buffer the length of `trace` with `[start, start + count)`
    /// replaced by the filtered samples and everything else unchanged.
    pub fn filter_trace(
        &mut self,
        trace: &[f64],
        count: usize,
        start: usize,
        sample_interval: f64,
        unit: TimeUnit,
    ) -> Result<Vec<f64>, FilterError> {
        self.check_sample_rate(sample_interval, unit)?;
        self.filter_samples(trace, count, start)
    }

    /// Filter a trace without the sample-rate check
    ///
    /// Same contract as [`filter_trace`](Self::filter_trace) for callers
    /// that have already validated the sample interval.
    ///
    /// # Panics
    /// Panics when `start + count` exceeds the trace length.
    pub fn filter_samples(
        &mut self,
        trace: &[f64],
        count: usize,
        start: usize,
    ) -> Result<Vec<f64>, FilterError> {
        assert!(
            start + count <= trace.len(),
            "filter window [{}, {}) exceeds trace length {}",
            start,
            start + count,
            trace.len()
        );

        let Some(wavelet) = &self.wavelet else {
            return Ok(trace.to_vec());
        };
        if count == 0 {
            return Ok(trace.to_vec());
        }

        let num_samples = wavelet.num_samples();
        let time_zero = wavelet.time_zero_index();
        let full_len = trace.len();

        // The transform must cover the linear-convolution output of the
        // window with the wavelet, or tail energy aliases into the head.
        let nfft = size_fft(count + 2 * (num_samples - 1));
        if nfft != self.cache.size {
            debug!(
                "rebuilding spectrum cache: {} -> {} points",
                self.cache.size, nfft
            );
            self.cache.resize(nfft);
            pad_sync(
                wavelet.samples(),
                0,
                &mut self.cache.padded,
                num_samples,
                time_zero,
            );
            self.fft
                .forward(&self.cache.padded, &mut self.cache.wavelet_spectrum)?;
        }

        // Borrow real neighboring samples where the trace has them, up to
        // the ideal filter half-width on each side.
        let pre_pad = (num_samples as isize - time_zero - 1)
            .min(start as isize)
            .max(0) as usize;
        let post_pad = time_zero
            .min((full_len - count - start) as isize)
            .max(0) as usize;

        pad_sync(
            trace,
            start - pre_pad,
            &mut self.cache.padded,
            count + pre_pad + post_pad,
            pre_pad as isize,
        );
        let input_rms = rms(&self.cache.padded);

        self.fft
            .forward(&self.cache.padded, &mut self.cache.segment_spectrum)?;
        for i in 0..nfft {
            self.cache.product[i] = self.cache.wavelet_spectrum[i] * self.cache.segment_spectrum[i];
        }
        self.fft
            .inverse(&self.cache.product, &mut self.cache.inverse_out)?;
        for i in 0..nfft {
            self.cache.padded[i] = self.cache.inverse_out[i].re;
        }

        // Restore the pre-filter amplitude level. A zero output RMS means
        // the segment transformed to silence; there is nothing to rescale.
        let output_rms = rms(&self.cache.padded);
        let scale = if output_rms > 0.0 {
            input_rms / output_rms
        } else {
            1.0
        };

        let mut filtered = trace.to_vec();
        for i in 0..count {
            filtered[start + i] = self.cache.padded[i] * scale;
        }
        Ok(filtered)
    }
}

/// Root-mean-square of a sample buffer
fn rms(x: &[f64]) -> f64 {
    (x.iter().map(|&v| v * v).sum::<f64>() / x.len() as f64).sqrt()
}
