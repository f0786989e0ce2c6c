//! Transform length selection
//!
//! FFT-based convolution needs a transform at least as long as the linear
//! convolution output, but the engine is fastest on lengths built from
//! small primes. The selector balances the two.

/// Choose the smallest efficient transform length >= `min_len`
///
/// Starting from the power-of-two ceiling `p`, the candidates `3p/4`,
/// `5p/8` and `9p/16` are accepted when still >= `min_len`; the smallest
/// accepted candidate wins. Every returned length factors entirely into
/// 2, 3 and 5.
pub fn size_fft(min_len: usize) -> usize {
    let mut p = 2usize;
    while p < min_len {
        p <<= 1;
    }
    let mut size = p;
    for alt in [p / 4 * 3, p / 8 * 5, p / 16 * 9] {
        if alt >= min_len {
            size = alt;
        }
    }
    size
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_sizes() {
        assert_eq!(size_fft(1), 2);
        assert_eq!(size_fft(2), 2);
        assert_eq!(size_fft(3), 3);
        assert_eq!(size_fft(70), 72);
        assert_eq!(size_fft(96), 96);
        assert_eq!(size_fft(100), 128);
        assert_eq!(size_fft(513), 576);
    }

    #[test]
    fn test_lower_bound_and_monotonic() {
        let mut prev = 0;
        for n in 1..3000 {
            let s = size_fft(n);
            assert!(s >= n, "size_fft({}) = {} below minimum", n, s);
            assert!(s >= prev, "size_fft not monotonic at {}", n);
            prev = s;
        }
    }

    #[test]
    fn test_only_small_prime_factors() {
        for n in 1..3000 {
            let mut r = size_fft(n);
            for f in [2, 3, 5] {
                while r % f == 0 {
                    r /= f;
                }
            }
            assert_eq!(r, 1, "size_fft({}) has a factor outside {{2,3,5}}", n);
        }
    }
}
