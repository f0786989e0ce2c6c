//! Arbitrary-length discrete Fourier transforms

pub mod engine;
pub mod sizing;

pub use engine::{MixedRadixFft, TransformError, MAX_FACTORS, MAX_RADIX};
pub use sizing::size_fft;
