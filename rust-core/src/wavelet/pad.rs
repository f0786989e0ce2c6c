//! Circular zero-padding with anchor alignment
//!
//! Places a finite sample sequence into a larger zero-padded buffer so
//! that a designated anchor sample lands at index 0, wrapping the samples
//! before the anchor around to the end of the buffer. Centering a
//! symmetric filter this way keeps frequency-domain convolution
//! zero-phase: the output is not shifted in time.

/// Copy `used_len` samples of `src` (starting at `src_offset`) into `dst`,
/// aligned so that the sample at relative position `anchor` lands at
/// `dst[0]`. Samples before the anchor wrap to the tail of `dst`;
/// everything else is zero-filled.
///
/// A negative `anchor` zero-fills the leading `-anchor` slots instead,
/// for sequences whose nominal time zero lies before their first sample.
///
/// The caller must ensure the placed samples fit: `used_len` plus any
/// leading zero-fill must not exceed `dst.len()`.
pub fn pad_sync(src: &[f64], src_offset: usize, dst: &mut [f64], used_len: usize, anchor: isize) {
    let leno = dst.len();
    let mut j = 0usize;

    // Leading zeros for a negative anchor
    let mut i = anchor;
    while i < 0 {
        dst[j] = 0.0;
        i += 1;
        j += 1;
    }

    // Samples at and after the anchor
    let mut i = i as usize;
    while i < used_len {
        dst[j] = src[src_offset + i];
        i += 1;
        j += 1;
    }

    // Zero-fill until the destination wraps
    while i < leno && j < leno {
        dst[j] = 0.0;
        i += 1;
        j += 1;
    }

    // Wrap: samples before the anchor land at the tail
    let mut i = 0usize;
    while i < used_len && j < leno {
        dst[j] = src[src_offset + i];
        i += 1;
        j += 1;
    }

    // Remaining slots
    while j < leno {
        dst[j] = 0.0;
        j += 1;
    }
}
