//! Seismic Wavelet Core - Frequency-Domain Trace Filtering
//!
//! Mixed-radix FFT engine and zero-phase wavelet filter for seismic trace
//! data. The transform handles arbitrary composite lengths (prime factors
//! up to 13), and the filter performs amplitude-preserving frequency-domain
//! convolution of a wavelet against trace segments.
//!
//! Filters own mutable transform tables and a cached wavelet spectrum, so
//! construct one [`WaveletFilter`] per worker thread when processing traces
//! in parallel; none of this state is shareable without a lock.

pub mod transform;
pub mod wavelet;

pub use transform::{size_fft, MixedRadixFft, TransformError};
pub use wavelet::{FilterError, TimeUnit, Wavelet, WaveletFilter, WaveletSpectrum};
