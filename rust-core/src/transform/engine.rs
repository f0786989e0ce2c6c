//! Mixed-radix FFT engine for arbitrary composite transform lengths
//!
//! Generalized Cooley-Tukey decomposition: the length N is factored into
//! small primes and one butterfly pass runs per factor. This handles any
//! N whose prime factors are all <= 13, not just powers of two.

use num_complex::Complex;
use std::f64::consts::PI;
use thiserror::Error;

/// Largest prime factor the butterfly scratch registers can hold.
pub const MAX_RADIX: usize = 13;

/// Maximum number of prime factors the reorder tables can hold.
pub const MAX_FACTORS: usize = 19;

/// Errors for transform lengths the engine cannot decompose
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformError {
    #[error("transform length must be nonzero")]
    ZeroLength,

    #[error("unsupported transform length {len}: prime factor {factor} exceeds 13")]
    FactorTooLarge { len: usize, factor: usize },

    #[error("unsupported transform length {len}: more than 19 prime factors")]
    TooManyFactors { len: usize },
}

/// Twiddle-factor sign convention for a butterfly pass
#[derive(Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Inverse,
}

/// Mixed-radix FFT engine with lazily built factor and trig tables
///
/// Tables are valid only for the most recent transform length; a call with
/// a different length rebuilds them before any butterfly runs. The engine
/// is plain mutable state, so one instance per thread (see crate docs).
pub struct MixedRadixFft {
    /// Last configured transform length (0 = unset)
    size: usize,

    /// Number of prime factors of `size`
    factor_count: usize,

    /// Prime factors of `size`, ascending
    factors: [usize; MAX_FACTORS],

    /// Suffix products: strides[0] = size, strides[k] = strides[k-1] / factors[k-1]
    strides: [usize; MAX_FACTORS + 1],

    /// Mixed-radix counter digits used by the reorder pass
    digits: [usize; MAX_FACTORS],

    /// Sine table over a full period at resolution 1/size, with either a
    /// quarter-period extension (size % 4 == 0) or a separate cosine block
    trig: Vec<f64>,

    /// Offset into `trig` where the cosine view starts
    cos_index: usize,
}

impl MixedRadixFft {
    /// Create an engine with no tables built yet
    pub fn new() -> Self {
        Self {
            size: 0,
            factor_count: 0,
            factors: [0; MAX_FACTORS],
            strides: [0; MAX_FACTORS + 1],
            digits: [0; MAX_FACTORS],
            trig: Vec::new(),
            cos_index: 0,
        }
    }

    /// Currently configured transform length (0 = unset)
    pub fn size(&self) -> usize {
        self.size
    }

    /// Forward transform of a real-valued signal
    ///
    /// # Arguments
    /// * `input` - Real samples, length N
    /// * `out` - Complex output, length N
    ///
    /// # Returns
    /// `X[k] = sum_j input[j] * exp(+2*pi*i*j*k/N)`, or an error when N
    /// cannot be factored within the engine's limits
    pub fn forward(
        &mut self,
        input: &[f64],
        out: &mut [Complex<f64>],
    ) -> Result<(), TransformError> {
        assert_eq!(input.len(), out.len(), "input/output length mismatch");
        self.setup(input.len())?;
        self.reorder_real(input, out);
        self.butterflies(out, Direction::Forward);
        Ok(())
    }

    /// Inverse transform of a complex spectrum
    ///
    /// # Arguments
    /// * `input` - Complex spectrum, length N
    /// * `out` - Complex output, length N
    ///
    /// # Returns
    /// `x[j] = (1/N) * sum_k input[k] * exp(-2*pi*i*j*k/N)`, or an error
    /// when N cannot be factored within the engine's limits
    pub fn inverse(
        &mut self,
        input: &[Complex<f64>],
        out: &mut [Complex<f64>],
    ) -> Result<(), TransformError> {
        assert_eq!(input.len(), out.len(), "input/output length mismatch");
        let n = input.len();
        self.setup(n)?;
        self.reorder_complex(input, out);
        self.butterflies(out, Direction::Inverse);
        let scale = 1.0 / n as f64;
        for v in out.iter_mut() {
            *v *= scale;
        }
        Ok(())
    }

    /// Factor `n` and rebuild the trig tables if `n` differs from the
    /// cached size. No state is committed when factoring fails.
    fn setup(&mut self, n: usize) -> Result<(), TransformError> {
        if n == self.size {
            return Ok(());
        }
        if n == 0 {
            return Err(TransformError::ZeroLength);
        }

        // Trial division from 2 upward; each factor records the product of
        // the factors still to come, which drives both the reorder counter
        // and the butterfly strides.
        let mut factors = [0usize; MAX_FACTORS];
        let mut strides = [0usize; MAX_FACTORS + 1];
        let mut count = 0usize;
        strides[0] = n;
        let mut rem = n;
        let mut f = 2usize;
        while rem > 1 {
            if rem % f == 0 {
                if count == MAX_FACTORS {
                    return Err(TransformError::TooManyFactors { len: n });
                }
                if f > MAX_RADIX {
                    return Err(TransformError::FactorTooLarge { len: n, factor: f });
                }
                rem /= f;
                factors[count] = f;
                strides[count + 1] = rem;
                count += 1;
            } else {
                f += 1;
            }
        }

        self.build_trig(n);
        self.size = n;
        self.factor_count = count;
        self.factors = factors;
        self.strides = strides;
        Ok(())
    }

    /// Fill the sine table for length `n` in O(n) using quarter/half-wave
    /// symmetry, and set up the cosine view. When n is a multiple of 4 the
    /// cosine is the sine table shifted by a quarter period; otherwise a
    /// separate cosine block is filled after the sine block.
    fn build_trig(&mut self, n: usize) {
        let table_len = if n % 4 == 0 { 5 * n / 4 + 1 } else { 2 * n + 1 };
        self.trig.clear();
        self.trig.resize(table_len, 0.0);
        let step = 2.0 * PI / n as f64;

        if n % 2 == 0 {
            for j in 0..=n / 4 {
                let s = (step * j as f64).sin();
                self.trig[j] = s;
                self.trig[n / 2 - j] = s;
                self.trig[n / 2 + j] = -s;
                self.trig[n - j] = -s;
                self.trig[n + j] = s;
            }
        } else {
            for j in 0..=n / 2 {
                let s = (step * j as f64).sin();
                self.trig[j] = s;
                self.trig[n - j] = -s;
            }
        }

        if n % 4 == 0 {
            self.cos_index = n / 4;
        } else {
            if n % 2 == 0 {
                for j in 0..=n / 4 {
                    let c = (step * j as f64).cos();
                    self.trig[n + j] = c;
                    self.trig[n + n / 2 - j] = -c;
                    self.trig[n + n / 2 + j] = -c;
                    self.trig[n + n - j] = c;
                }
            } else {
                for j in 0..=n / 2 {
                    let c = (step * j as f64).cos();
                    self.trig[n + j] = c;
                    self.trig[n + n - j] = c;
                }
            }
            self.cos_index = n;
        }
    }

    /// Advance the mixed-radix counter by one and return the next source
    /// index. Digit `d` wraps at `factors[d]`, carrying into digit `d + 1`;
    /// this generalizes bit-reversal to composite lengths.
    fn next_reorder_index(&mut self, src: usize) -> usize {
        let mut src = src + self.strides[1];
        let mut d = 0;
        loop {
            self.digits[d] += 1;
            if self.digits[d] < self.factors[d] {
                return src;
            }
            self.digits[d] = 0;
            src -= self.strides[d];
            src += self.strides[d + 2];
            d += 1;
        }
    }

    fn reorder_real(&mut self, input: &[f64], out: &mut [Complex<f64>]) {
        let n = self.size;
        self.digits[..self.factor_count].fill(0);
        out[0] = Complex::new(input[0], 0.0);
        let mut src = 0usize;
        for i in 1..n {
            src = self.next_reorder_index(src);
            out[i] = Complex::new(input[src], 0.0);
        }
    }

    fn reorder_complex(&mut self, input: &[Complex<f64>], out: &mut [Complex<f64>]) {
        let n = self.size;
        self.digits[..self.factor_count].fill(0);
        out[0] = input[0];
        let mut src = 0usize;
        for i in 1..n {
            src = self.next_reorder_index(src);
            out[i] = input[src];
        }
    }

    /// Run one butterfly pass per prime factor, outer to inner.
    ///
    /// The first two radix-2 stages of a forward transform are unrolled:
    /// stage one needs no twiddles at all, and stage two fills in the
    /// imaginary parts that later stages read, exploiting the fact that a
    /// real-input first stage produces purely real intermediates. The
    /// inverse transform takes complex input, so every radix-2 stage uses
    /// the general twiddle form there.
    fn butterflies(&mut self, data: &mut [Complex<f64>], dir: Direction) {
        let n = self.size;
        for s in 0..self.factor_count {
            let radix = self.factors[s];
            if radix == 2 && dir == Direction::Forward && s == 0 {
                let mut ipt = 0;
                while ipt < n {
                    let a = data[ipt].re;
                    data[ipt].re += data[ipt + 1].re;
                    data[ipt + 1].re = a - data[ipt + 1].re;
                    ipt += 2;
                }
            } else if radix == 2 && dir == Direction::Forward && s == 1 {
                let mut ipt = 0;
                while ipt < n {
                    let a = data[ipt].re;
                    data[ipt].re += data[ipt + 2].re;
                    data[ipt + 2].re = a - data[ipt + 2].re;
                    data[ipt + 1].im = data[ipt + 3].re;
                    data[ipt + 3].im = -data[ipt + 3].re;
                    data[ipt + 3].re = data[ipt + 1].re;
                    ipt += 4;
                }
            } else if radix == 2 {
                self.radix2_pass(data, s, dir);
            } else {
                self.general_radix_pass(data, s, dir);
            }
        }
    }

    /// General twiddle-factor radix-2 butterfly for one stage.
    fn radix2_pass(&self, data: &mut [Complex<f64>], s: usize, dir: Direction) {
        let n = self.size;
        let half = n / 2;
        let bfstep = n / self.strides[s + 1];
        let di = n / self.strides[s];
        let mut wloc = 0usize;
        let mut istrt = 0usize;
        while wloc < half {
            let cosw = self.trig[self.cos_index + wloc];
            let sinw = self.trig[wloc];
            let mut bfloc = istrt;
            while bfloc < n {
                let a = data[bfloc];
                let b = data[bfloc + di];
                let t = match dir {
                    Direction::Forward => Complex::new(
                        b.re * cosw - b.im * sinw,
                        b.im * cosw + b.re * sinw,
                    ),
                    Direction::Inverse => Complex::new(
                        b.re * cosw + b.im * sinw,
                        b.im * cosw - b.re * sinw,
                    ),
                };
                data[bfloc] = a + t;
                data[bfloc + di] = a - t;
                bfloc += bfstep;
            }
            wloc += self.strides[s + 1];
            istrt += 1;
        }
    }

    /// Radix-r butterfly for r in 3..=13 using a Goertzel-style recurrence.
    ///
    /// Each group walks the r points top-down accumulating the r-1 twiddle
    /// multiplications in the `w1`/`w2` delay registers, then writes back
    /// r combined outputs. Register size is bound by MAX_RADIX.
    fn general_radix_pass(&self, data: &mut [Complex<f64>], s: usize, dir: Direction) {
        let n = self.size;
        let radix = self.factors[s];
        let radix2 = 2 * radix;
        let dw = n / radix;
        let bfstep = n / self.strides[s + 1];
        let di = n / self.strides[s];

        let mut wf = [0.0f64; 2 * MAX_RADIX];
        let mut w1 = [0.0f64; 2 * MAX_RADIX];
        let mut w2 = [0.0f64; 2 * MAX_RADIX];

        let mut wloc = 0usize;
        let mut istrt = 0usize;
        while wloc < dw {
            let mut bfloc = istrt;
            while bfloc < n {
                let mut ipt = bfloc + radix * di - di;
                let top = data[ipt];
                ipt -= di;
                let next = data[ipt];
                let mut w = wloc;
                let mut j = 0;
                while j < radix2 {
                    wf[j] = 2.0 * self.trig[self.cos_index + w];
                    wf[j + 1] = self.trig[w];
                    w2[j] = top.re;
                    w2[j + 1] = top.im;
                    w1[j] = next.re + wf[j] * w2[j];
                    w1[j + 1] = next.im + wf[j] * w2[j + 1];
                    w += dw;
                    j += 2;
                }

                while ipt >= bfloc + di {
                    ipt -= di;
                    let p = data[ipt];
                    let mut j = 0;
                    while j < radix2 {
                        let t = p.re + w1[j] * wf[j] - w2[j];
                        w2[j] = w1[j];
                        w1[j] = t;
                        let t = p.im + w1[j + 1] * wf[j] - w2[j + 1];
                        w2[j + 1] = w1[j + 1];
                        w1[j + 1] = t;
                        j += 2;
                    }
                }

                let mut ipt = bfloc;
                let mut j = 0;
                while j < radix2 {
                    let (re, im) = match dir {
                        Direction::Forward => (
                            w1[j] - 0.5 * wf[j] * w2[j] - wf[j + 1] * w2[j + 1],
                            w1[j + 1] - 0.5 * wf[j] * w2[j + 1] + wf[j + 1] * w2[j],
                        ),
                        Direction::Inverse => (
                            w1[j] - 0.5 * wf[j] * w2[j] + wf[j + 1] * w2[j + 1],
                            w1[j + 1] - 0.5 * wf[j] * w2[j + 1] - wf[j + 1] * w2[j],
                        ),
                    };
                    data[ipt] = Complex::new(re, im);
                    ipt += di;
                    j += 2;
                }
                bfloc += bfstep;
            }
            wloc += self.strides[s + 1];
            istrt += 1;
        }
    }
}

impl Default for MixedRadixFft {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_signal(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| (0.3 * i as f64).sin() + 0.5 * (1.1 * i as f64).cos())
            .collect()
    }

    fn naive_dft(x: &[Complex<f64>], sign: f64) -> Vec<Complex<f64>> {
        let n = x.len();
        (0..n)
            .map(|k| {
                x.iter()
                    .enumerate()
                    .map(|(j, &v)| {
                        let w = sign * 2.0 * PI * (j * k) as f64 / n as f64;
                        v * Complex::new(w.cos(), w.sin())
                    })
                    .sum()
            })
            .collect()
    }

    #[test]
    fn test_forward_matches_naive_dft() {
        let mut fft = MixedRadixFft::new();

        for n in [2, 3, 4, 5, 6, 8, 9, 12, 15, 16, 20, 36, 60, 96, 120] {
            let x = test_signal(n);
            let mut out = vec![Complex::new(0.0, 0.0); n];
            fft.forward(&x, &mut out).unwrap();

            let xc: Vec<Complex<f64>> = x.iter().map(|&v| Complex::new(v, 0.0)).collect();
            let reference = naive_dft(&xc, 1.0);
            for (k, (got, expected)) in out.iter().zip(reference.iter()).enumerate() {
                assert!(
                    (got - expected).norm() < 1e-8,
                    "n={}, bin {}: {} vs {}",
                    n,
                    k,
                    got,
                    expected
                );
            }
        }
    }

    #[test]
    fn test_inverse_matches_naive_dft() {
        let mut fft = MixedRadixFft::new();

        for n in [2, 3, 4, 6, 9, 12, 15, 20, 36, 60] {
            let x: Vec<Complex<f64>> = (0..n)
                .map(|i| Complex::new((0.7 * i as f64).sin(), (0.4 * i as f64).cos()))
                .collect();
            let mut out = vec![Complex::new(0.0, 0.0); n];
            fft.inverse(&x, &mut out).unwrap();

            let reference = naive_dft(&x, -1.0);
            for (got, expected) in out.iter().zip(reference.iter()) {
                assert!((got - expected / n as f64).norm() < 1e-10, "n={}", n);
            }
        }
    }

    #[test]
    fn test_round_trip() {
        let mut fft = MixedRadixFft::new();

        // Composite, odd, repeated-prime and large-prime-factor sizes
        for n in [2, 3, 7, 11, 13, 26, 39, 121, 169, 360, 1001] {
            let x = test_signal(n);
            let mut spectrum = vec![Complex::new(0.0, 0.0); n];
            let mut rt = vec![Complex::new(0.0, 0.0); n];
            fft.forward(&x, &mut spectrum).unwrap();
            fft.inverse(&spectrum, &mut rt).unwrap();

            for (got, &expected) in rt.iter().zip(x.iter()) {
                assert!((got.re - expected).abs() < 1e-9, "n={}", n);
                assert!(got.im.abs() < 1e-9, "n={}", n);
            }
        }
    }

    #[test]
    fn test_impulse_spectrum() {
        let mut fft = MixedRadixFft::new();

        // Delta at index 0 transforms to all ones
        let n = 12;
        let mut x = vec![0.0; n];
        x[0] = 1.0;
        let mut out = vec![Complex::new(0.0, 0.0); n];
        fft.forward(&x, &mut out).unwrap();
        for v in &out {
            assert!((v.re - 1.0).abs() < 1e-12 && v.im.abs() < 1e-12);
        }

        // Delta at index 1 picks out the positive-exponent kernel
        let n = 8;
        let mut x = vec![0.0; n];
        x[1] = 1.0;
        let mut out = vec![Complex::new(0.0, 0.0); n];
        fft.forward(&x, &mut out).unwrap();
        let expected = Complex::new((PI / 4.0).cos(), (PI / 4.0).sin());
        assert!((out[1] - expected).norm() < 1e-12);
    }

    #[test]
    fn test_rejects_large_prime_factor() {
        let mut fft = MixedRadixFft::new();
        let mut out = vec![Complex::new(0.0, 0.0); 17];

        let err = fft.forward(&vec![0.0; 17], &mut out).unwrap_err();
        assert_eq!(err, TransformError::FactorTooLarge { len: 17, factor: 17 });

        // 34 = 2 * 17 fails the same way after dividing out the 2
        let mut out = vec![Complex::new(0.0, 0.0); 34];
        let err = fft.forward(&vec![0.0; 34], &mut out).unwrap_err();
        assert_eq!(err, TransformError::FactorTooLarge { len: 34, factor: 17 });
    }

    #[test]
    fn test_rejects_too_many_factors() {
        let mut fft = MixedRadixFft::new();
        let n = 1 << 20;
        let mut out = vec![Complex::new(0.0, 0.0); n];
        let err = fft.forward(&vec![0.0; n], &mut out).unwrap_err();
        assert_eq!(err, TransformError::TooManyFactors { len: n });
    }

    #[test]
    fn test_rejects_zero_length() {
        let mut fft = MixedRadixFft::new();
        let mut out: Vec<Complex<f64>> = Vec::new();
        assert_eq!(fft.forward(&[], &mut out), Err(TransformError::ZeroLength));
    }

    #[test]
    fn test_accepts_all_small_primes() {
        // 2 * 3 * 5 * 7 * 11 * 13
        let mut fft = MixedRadixFft::new();
        let n = 30030;
        let x = test_signal(n);
        let mut spectrum = vec![Complex::new(0.0, 0.0); n];
        let mut rt = vec![Complex::new(0.0, 0.0); n];
        fft.forward(&x, &mut spectrum).unwrap();
        fft.inverse(&spectrum, &mut rt).unwrap();
        for (got, &expected) in rt.iter().zip(x.iter()) {
            assert!((got.re - expected).abs() < 1e-8);
        }
    }

    #[test]
    fn test_failed_setup_leaves_engine_usable() {
        let mut fft = MixedRadixFft::new();
        let x = test_signal(12);
        let mut out = vec![Complex::new(0.0, 0.0); 12];
        fft.forward(&x, &mut out).unwrap();

        let mut bad = vec![Complex::new(0.0, 0.0); 17];
        assert!(fft.forward(&vec![0.0; 17], &mut bad).is_err());

        // Tables for the previous size survive the failed call
        assert_eq!(fft.size(), 12);
        let mut out2 = vec![Complex::new(0.0, 0.0); 12];
        fft.forward(&x, &mut out2).unwrap();
        for (a, b) in out.iter().zip(out2.iter()) {
            assert_eq!(a, b);
        }
    }
}
