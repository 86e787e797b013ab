//! # Transform Tables
//!
//! Everything the per-frame pipeline needs that depends only on the transform
//! size and the window: the stage schedule, the bit-reversal permutation, the
//! twiddle factors and the window coefficients. [`configure`] builds them once;
//! the resulting [`Tables`] are immutable and shared by reference with every
//! frame.

use crate::error::ConfigError;
use crate::window::WindowKind;
use rustfft::num_complex::Complex32;

/// Default transform length used by the analyzer.
pub const TRANSFORM_SIZE: usize = 512;
const _: () = assert!(TRANSFORM_SIZE.is_power_of_two() && TRANSFORM_SIZE >= 2);

/// A validated transform length: a power of two no smaller than 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransformSize(usize);

impl TransformSize {
    pub fn new(size: usize) -> Result<Self, ConfigError> {
        if size < 2 || !size.is_power_of_two() {
            return Err(ConfigError::InvalidTransformSize { size });
        }
        Ok(Self(size))
    }

    /// Number of complex points `N`.
    pub fn get(self) -> usize {
        self.0
    }

    /// Number of butterfly stages, `log2(N)`.
    pub fn stages(self) -> usize {
        self.0.trailing_zeros() as usize
    }

    /// Number of usable spectrum bins, `N / 2`.
    pub fn bins(self) -> usize {
        self.0 / 2
    }
}

impl Default for TransformSize {
    fn default() -> Self {
        Self(TRANSFORM_SIZE)
    }
}

/// Per-stage access pattern of the radix-2 transform.
///
/// At stage `s` there are `2^s` blocks, one per distinct twiddle factor, and
/// each block holds `N / 2^(s+1)` butterflies. Every stage therefore performs
/// exactly `N / 2` butterflies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageSchedule {
    blocks: Vec<usize>,
    butterflies: Vec<usize>,
}

impl StageSchedule {
    fn new(size: TransformSize) -> Self {
        let n = size.get();
        let (blocks, butterflies) = (0..size.stages())
            .map(|stage| (1usize << stage, n >> (stage + 1)))
            .unzip();
        Self { blocks, butterflies }
    }

    /// Blocks per stage.
    pub fn blocks(&self) -> &[usize] {
        &self.blocks
    }

    /// Butterflies per block, per stage.
    pub fn butterflies(&self) -> &[usize] {
        &self.butterflies
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// `(blocks, butterflies_per_block)` for each stage, first stage first.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.blocks.iter().copied().zip(self.butterflies.iter().copied())
    }
}

/// Precomputed, read-only constants for one transform size and window.
#[derive(Debug, Clone, PartialEq)]
pub struct Tables {
    size: TransformSize,
    window_kind: WindowKind,
    schedule: StageSchedule,
    bit_reversed: Vec<usize>,
    twiddles: Vec<Complex32>,
    window: Vec<f32>,
}

/// Builds the tables for `transform_size` points using `window_kind`.
///
/// Calling this again with the same arguments reproduces identical tables.
///
/// # Errors
/// * [`ConfigError::InvalidTransformSize`] if `transform_size` is not a power
///   of two or is smaller than 2.
pub fn configure(transform_size: usize, window_kind: WindowKind) -> Result<Tables, ConfigError> {
    let size = TransformSize::new(transform_size)?;
    let tables = Tables::new(size, window_kind);
    log::debug!(
        "[TABLES] Built {} stage tables for N = {} with {} window",
        tables.schedule.len(),
        size.get(),
        window_kind
    );
    Ok(tables)
}

impl Tables {
    pub fn new(size: TransformSize, window_kind: WindowKind) -> Self {
        Self {
            size,
            window_kind,
            schedule: StageSchedule::new(size),
            bit_reversed: bit_reversal_table(size),
            twiddles: twiddle_table(size),
            window: window_kind.coefficients(size.get()),
        }
    }

    pub fn size(&self) -> TransformSize {
        self.size
    }

    /// Number of complex points `N`.
    pub fn len(&self) -> usize {
        self.size.get()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn window_kind(&self) -> WindowKind {
        self.window_kind
    }

    pub fn schedule(&self) -> &StageSchedule {
        &self.schedule
    }

    /// Entry `i` is the buffer slot that natural sample `i` is written to.
    pub fn bit_reversed(&self) -> &[usize] {
        &self.bit_reversed
    }

    /// `N / 2` roots of unity; entry `k` is `e^(-2πik/N)`.
    pub fn twiddles(&self) -> &[Complex32] {
        &self.twiddles
    }

    pub fn window(&self) -> &[f32] {
        &self.window
    }
}

fn bit_reversal_table(size: TransformSize) -> Vec<usize> {
    let shift = usize::BITS as usize - size.stages();
    (0..size.get()).map(|i| i.reverse_bits() >> shift).collect()
}

fn twiddle_table(size: TransformSize) -> Vec<Complex32> {
    let n = size.get() as f64;
    (0..size.bins())
        .map(|k| {
            let angle = -2.0 * std::f64::consts::PI * k as f64 / n;
            Complex32::new(angle.cos() as f32, angle.sin() as f32)
        })
        .collect()
}
