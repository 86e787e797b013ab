//! # Peak Readout
//!
//! Helpers for turning a bin array into frequencies: the bin-to-Hz mapping
//! used by the renderer's cursor, the strongest bin of a frame, and a
//! sub-bin estimate of that peak's frequency.

use crate::spectrum::{ExtractOptions, SpectrumBin};

/// The strongest bin found in a spectrum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    pub bin: usize,
    /// Level of the bin in decibels.
    pub level_db: f32,
}

/// Centre frequency in Hz of `bin` for a transform of `transform_size` points.
pub fn bin_frequency(bin: usize, sample_rate: u32, transform_size: usize) -> f32 {
    bin as f32 * sample_rate as f32 / transform_size as f32
}

/// Frequency spacing between adjacent bins, `sample_rate / N`.
pub fn bin_width(sample_rate: u32, transform_size: usize) -> f32 {
    bin_frequency(1, sample_rate, transform_size)
}

/// Finds the loudest bin of a frame extracted with `options`.
///
/// Bins are ranked by [`ExtractOptions::level_db`], so this works in every
/// output mode. When `skip_dc` is set, bin 0 is ignored. Returns `None` for
/// an empty spectrum or one where every candidate sits at the decibel floor.
pub fn dominant_bin(
    bins: &[SpectrumBin],
    options: &ExtractOptions,
    skip_dc: bool,
) -> Option<Peak> {
    let floor = options.decibel_floor();
    bins.iter()
        .enumerate()
        .skip(usize::from(skip_dc))
        .map(|(bin, b)| (bin, options.level_db(b)))
        .filter(|&(_, level)| level > floor)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(bin, level_db)| Peak { bin, level_db })
}

/// Refines a peak to a fractional bin position.
///
/// Fits a parabola through the decibel levels of the peak and its two
/// neighbours. Falls back to the integer bin at the spectrum edges or when
/// a neighbour is silent.
pub fn refine(bins: &[SpectrumBin], options: &ExtractOptions, peak: Peak) -> f32 {
    let k = peak.bin;
    if k == 0 || k + 1 >= bins.len() {
        return k as f32;
    }

    let floor = options.decibel_floor();
    let y1 = options.level_db(&bins[k - 1]);
    let y2 = options.level_db(&bins[k]);
    let y3 = options.level_db(&bins[k + 1]);
    if y1 <= floor || y3 <= floor || !y2.is_finite() {
        return k as f32;
    }

    let denominator = 2.0 * y2 - y1 - y3;
    if denominator.abs() < 1e-6 {
        return k as f32;
    }

    let shift = (y3 - y1) / (2.0 * denominator);
    if shift.is_finite() && shift.abs() <= 0.5 {
        k as f32 + shift
    } else {
        k as f32
    }
}
