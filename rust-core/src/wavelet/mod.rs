//! Wavelet model and trace filtering

pub mod filter;
pub mod model;
pub mod pad;
pub mod spectrum;

pub use filter::{FilterError, WaveletFilter};
pub use model::{TimeUnit, Wavelet};
pub use pad::pad_sync;
pub use spectrum::WaveletSpectrum;
