//! # Fast Fourier Transform (FFT) Module
//!
//! In-place radix-2 decimation-in-time FFT driven entirely by precomputed
//! [`Tables`]. A frame goes through two steps:
//!
//! 1. [`load_frame`] scales each raw sample by the gain and the window, and
//!    writes it straight into its bit-reversed slot of the transform buffer.
//! 2. [`transform`] runs the butterfly stages in place, smallest span first.
//!
//! Because the reordering happens while loading, the butterfly stages need no
//! separate permutation pass. Neither step allocates, and neither branches on
//! sample values.

use crate::tables::Tables;
use rustfft::num_complex::Complex32;
use std::num::NonZeroU32;

/// Windows `samples` and scatters them into `buffer` in bit-reversed order.
///
/// Sample `i` becomes `samples[i] · gain · window[i]` (real part, imaginary
/// part zero) at slot `bit_reversed[i]`. Positions past the end of `samples`
/// are zero-filled, and samples past `N` are ignored, so every slot of the
/// buffer is rewritten on each call.
///
/// # Panics
/// * If `buffer.len()` differs from the transform size of `tables`
pub fn load_frame(samples: &[i16], gain: NonZeroU32, tables: &Tables, buffer: &mut [Complex32]) {
    assert_eq!(buffer.len(), tables.len(), "transform buffer does not match tables");

    let gain = gain.get() as f32;
    let live = samples.len().min(tables.len());
    let slots = tables.bit_reversed();
    let window = tables.window();

    for i in 0..live {
        let x = f32::from(samples[i]) * gain * window[i];
        buffer[slots[i]] = Complex32::new(x, 0.0);
    }
    // zero padding
    for &slot in &slots[live..] {
        buffer[slot] = Complex32::new(0.0, 0.0);
    }
}

/// Runs the forward transform in place over a bit-reversed buffer.
///
/// On return, `buffer[k]` holds bin `k` of the unnormalized DFT. The result
/// is a pure function of the input: identical buffers give bit-identical
/// output.
///
/// At stage `s` the butterfly span is `2^s`. Each of the `2^s` blocks uses one
/// twiddle factor, `W[g · butterflies[s]]` for block `g`, and combines the
/// pairs `(g + b·2^(s+1), g + b·2^(s+1) + 2^s)` for every butterfly `b` in the
/// block. A stage completes before the next one starts.
///
/// # Panics
/// * If `buffer.len()` differs from the transform size of `tables`
pub fn transform(buffer: &mut [Complex32], tables: &Tables) {
    assert_eq!(buffer.len(), tables.len(), "transform buffer does not match tables");

    let twiddles = tables.twiddles();
    for (stage, (blocks, butterflies)) in tables.schedule().iter().enumerate() {
        let span = 1 << stage;
        let step = span << 1;
        for block in 0..blocks {
            let w = twiddles[block * butterflies];
            for butterfly in 0..butterflies {
                let top = block + butterfly * step;
                let bottom = top + span;
                let a = buffer[top];
                let t = w * buffer[bottom];
                buffer[top] = a + t;
                buffer[bottom] = a - t;
            }
        }
    }
}

/// Inverse transform of a natural-order spectrum into `out`.
///
/// Uses the conjugation identity `ifft(X) = conj(fft(conj(X))) / N`, so the
/// same tables and butterfly stages serve both directions. Applying
/// [`transform`] and then this function reproduces the original samples
/// within floating point tolerance.
///
/// # Panics
/// * If `spectrum` or `out` differ in length from the transform size
pub fn inverse(spectrum: &[Complex32], tables: &Tables, out: &mut [Complex32]) {
    assert_eq!(spectrum.len(), tables.len(), "spectrum does not match tables");
    assert_eq!(out.len(), tables.len(), "output buffer does not match tables");

    for (value, &slot) in spectrum.iter().zip(tables.bit_reversed()) {
        out[slot] = value.conj();
    }
    transform(out, tables);

    let scale = 1.0 / tables.len() as f32;
    for value in out.iter_mut() {
        *value = value.conj() * scale;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::configure;
    use crate::window::WindowKind;
    use rustfft::FftPlanner;

    const UNITY: NonZeroU32 = NonZeroU32::MIN;

    fn test_signal(n: usize) -> Vec<i16> {
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let x = 9000.0 * (2.0 * std::f32::consts::PI * 5.0 * t).sin()
                    + 4000.0 * (2.0 * std::f32::consts::PI * 37.0 * t + 0.3).cos()
                    + (i % 7) as f32 * 100.0;
                x as i16
            })
            .collect()
    }

    fn forward(samples: &[i16], tables: &Tables) -> Vec<Complex32> {
        let mut buffer = vec![Complex32::new(0.0, 0.0); tables.len()];
        load_frame(samples, UNITY, tables, &mut buffer);
        transform(&mut buffer, tables);
        buffer
    }

    #[test]
    fn load_frame_scatters_into_bit_reversed_slots() {
        let tables = configure(8, WindowKind::Rectangular).unwrap();
        let mut buffer = vec![Complex32::new(f32::NAN, f32::NAN); 8];
        load_frame(&[10, 11, 12, 13, 14, 15, 16, 17], UNITY, &tables, &mut buffer);
        let re: Vec<f32> = buffer.iter().map(|c| c.re).collect();
        assert_eq!(re, vec![10.0, 14.0, 12.0, 16.0, 11.0, 15.0, 13.0, 17.0]);
        assert!(buffer.iter().all(|c| c.im == 0.0));
    }

    #[test]
    fn short_frames_are_zero_padded() {
        let tables = configure(8, WindowKind::Rectangular).unwrap();
        let mut buffer = vec![Complex32::new(f32::NAN, f32::NAN); 8];
        load_frame(&[1, 2, 3], NonZeroU32::new(2).unwrap(), &tables, &mut buffer);
        assert_eq!(buffer[0].re, 2.0);
        assert_eq!(buffer[4].re, 4.0);
        assert_eq!(buffer[2].re, 6.0);
        for slot in [6, 1, 5, 3, 7] {
            assert_eq!(buffer[slot], Complex32::new(0.0, 0.0));
        }
    }

    #[test]
    fn long_frames_use_the_first_n_samples() {
        let tables = configure(4, WindowKind::Rectangular).unwrap();
        let mut buffer = vec![Complex32::new(0.0, 0.0); 4];
        load_frame(&[1, 2, 3, 4, 99, 99], UNITY, &tables, &mut buffer);
        let re: Vec<f32> = buffer.iter().map(|c| c.re).collect();
        assert_eq!(re, vec![1.0, 3.0, 2.0, 4.0]);
    }

    #[test]
    fn window_is_applied_per_natural_index() {
        let tables = configure(16, WindowKind::Hann).unwrap();
        let mut buffer = vec![Complex32::new(0.0, 0.0); 16];
        load_frame(&[1000; 16], UNITY, &tables, &mut buffer);
        for i in 0..16 {
            let expected = 1000.0 * tables.window()[i];
            assert_eq!(buffer[tables.bit_reversed()[i]].re, expected);
        }
    }

    #[test]
    fn matches_rustfft() {
        for n in [2, 4, 8, 32, 512, 2048] {
            let tables = configure(n, WindowKind::Rectangular).unwrap();
            let samples = test_signal(n);
            let ours = forward(&samples, &tables);

            let mut reference: Vec<Complex32> =
                samples.iter().map(|&s| Complex32::new(f32::from(s), 0.0)).collect();
            FftPlanner::new().plan_fft_forward(n).process(&mut reference);

            let peak = reference.iter().map(|c| c.norm()).fold(0.0, f32::max);
            for (k, (a, b)) in ours.iter().zip(&reference).enumerate() {
                assert!(
                    (a - b).norm() <= peak * 1e-5 + 1e-3,
                    "N = {n}, bin {k}: {a} vs {b}"
                );
            }
        }
    }

    #[test]
    fn impulse_has_a_flat_spectrum() {
        let tables = configure(64, WindowKind::Rectangular).unwrap();
        let mut samples = vec![0; 64];
        samples[0] = 1;
        for bin in forward(&samples, &tables) {
            assert!((bin - Complex32::new(1.0, 0.0)).norm() < 1e-6);
        }
    }

    #[test]
    fn forward_is_deterministic() {
        let tables = configure(512, WindowKind::Blackman).unwrap();
        let samples = test_signal(512);
        let first = forward(&samples, &tables);
        for _ in 0..3 {
            let again = forward(&samples, &tables);
            let same = first
                .iter()
                .zip(&again)
                .all(|(a, b)| a.re.to_bits() == b.re.to_bits() && a.im.to_bits() == b.im.to_bits());
            assert!(same);
        }
    }

    #[test]
    fn inverse_round_trips() {
        for n in [2, 16, 512] {
            let tables = configure(n, WindowKind::Rectangular).unwrap();
            let samples = test_signal(n);
            let spectrum = forward(&samples, &tables);

            let mut restored = vec![Complex32::new(0.0, 0.0); n];
            inverse(&spectrum, &tables, &mut restored);
            for (i, (value, &sample)) in restored.iter().zip(&samples).enumerate() {
                assert!((value.re - f32::from(sample)).abs() < 0.5, "N = {n}, sample {i}");
                assert!(value.im.abs() < 0.5, "N = {n}, sample {i}");
            }
        }
    }
}
