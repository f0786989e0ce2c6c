//! Wavelet value type
//!
//! A wavelet is a short, immutable sample sequence with a sample interval
//! and a start time locating its "time zero" sample. Where it comes from
//! (file, Ricker generator, ...) is the caller's business.

/// Time unit for sample intervals and start times
///
/// Intervals are normalized to milliseconds at construction so mixed-unit
/// callers compare cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Seconds,
    Milliseconds,
    Microseconds,
}

impl TimeUnit {
    /// Convert a value in this unit to milliseconds
    pub fn to_milliseconds(self, value: f64) -> f64 {
        match self {
            TimeUnit::Seconds => value * 1000.0,
            TimeUnit::Milliseconds => value,
            TimeUnit::Microseconds => value / 1000.0,
        }
    }
}

/// Immutable seismic wavelet
#[derive(Debug, Clone, PartialEq)]
pub struct Wavelet {
    samples: Vec<f64>,
    /// Sample interval in milliseconds
    sample_interval: f64,
    /// Time of the first sample in milliseconds (<= 0 for a wavelet whose
    /// time zero lies inside the sequence)
    time_start: f64,
    /// Index of the time-zero sample: round(-time_start / sample_interval)
    time_zero_index: isize,
}

impl Wavelet {
    /// Create a wavelet
    ///
    /// # Arguments
    /// * `samples` - Wavelet amplitudes (must be non-empty)
    /// * `sample_interval` - Time between samples, in `unit`
    /// * `time_start` - Time of the first sample, in `unit`
    /// * `unit` - Unit of the two time values
    ///
    /// # Panics
    /// Panics when `samples` is empty or `sample_interval` is not positive.
    pub fn new(samples: Vec<f64>, sample_interval: f64, time_start: f64, unit: TimeUnit) -> Self {
        assert!(!samples.is_empty(), "wavelet must have at least one sample");
        assert!(sample_interval > 0.0, "sample interval must be positive");

        let sample_interval = unit.to_milliseconds(sample_interval);
        let time_start = unit.to_milliseconds(time_start);
        let time_zero_index = (-time_start / sample_interval).round() as isize;

        Self {
            samples,
            sample_interval,
            time_start,
            time_zero_index,
        }
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn num_samples(&self) -> usize {
        self.samples.len()
    }

    /// Sample interval in milliseconds
    pub fn sample_interval(&self) -> f64 {
        self.sample_interval
    }

    /// Time of the first sample in milliseconds
    pub fn time_start(&self) -> f64 {
        self.time_start
    }

    /// Index of the sample at time zero
    ///
    /// Negative when the wavelet starts after time zero; the padding
    /// utility accepts that as an anchor left of the sequence.
    pub fn time_zero_index(&self) -> isize {
        self.time_zero_index
    }
}
