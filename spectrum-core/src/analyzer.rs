//! # Frame Analyzer
//!
//! Ties the pipeline together. [`AnalyzerConfig`] is the serializable
//! description of a pipeline; [`Analyzer`] owns the per-frame buffers and runs
//! window → transform → extract over each captured frame, borrowing the
//! shared [`Tables`].

use crate::error::ConfigError;
use crate::fft;
use crate::spectrum::{
    self, DEFAULT_MAGNITUDE_FLOOR, ExtractOptions, Normalization, OutputMode, SpectrumBin,
};
use crate::tables::{self, TRANSFORM_SIZE, Tables};
use crate::window::WindowKind;
use rustfft::num_complex::Complex32;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

/// Default microphone sample rate in Hz.
pub const SAMPLE_RATE: u32 = 48_000;

/// Default number of samples delivered by the capture device per frame.
pub const CAPTURE_GRAIN: usize = 768;

/// Serializable pipeline settings.
///
/// Every field has a default, so a config file only needs the fields it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyzerConfig {
    /// Transform length `N`; a power of two.
    pub transform_size: usize,
    /// Capture sample rate in Hz, used for the bin-to-frequency mapping.
    pub sample_rate: u32,
    /// Samples per capture grain.
    pub capture_grain: usize,
    pub window: WindowKind,
    pub output: OutputMode,
    pub normalization: Normalization,
    /// Smallest magnitude fed to the decibel conversion.
    pub magnitude_floor: f32,
    /// Initial microphone sensitivity multiplier.
    pub gain: NonZeroU32,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            transform_size: TRANSFORM_SIZE,
            sample_rate: SAMPLE_RATE,
            capture_grain: CAPTURE_GRAIN,
            window: WindowKind::default(),
            output: OutputMode::default(),
            normalization: Normalization::default(),
            magnitude_floor: DEFAULT_MAGNITUDE_FLOOR,
            gain: NonZeroU32::MIN,
        }
    }
}

impl AnalyzerConfig {
    /// Checks every field, reporting the first invalid one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        tables::TransformSize::new(self.transform_size)?;
        if self.sample_rate == 0 {
            return Err(ConfigError::InvalidArgument {
                arg: "sample_rate",
                reason: "must be positive",
            });
        }
        if self.capture_grain == 0 {
            return Err(ConfigError::InvalidArgument {
                arg: "capture_grain",
                reason: "must be positive",
            });
        }
        if !(self.magnitude_floor.is_finite() && self.magnitude_floor > 0.0) {
            return Err(ConfigError::InvalidArgument {
                arg: "magnitude_floor",
                reason: "must be a positive finite number",
            });
        }
        Ok(())
    }

    /// Validates the config and builds its tables.
    pub fn build_tables(&self) -> Result<Tables, ConfigError> {
        self.validate()?;
        tables::configure(self.transform_size, self.window)
    }

    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            mode: self.output,
            normalization: self.normalization,
            magnitude_floor: self.magnitude_floor,
        }
    }
}

/// Analyzes one frame using caller-owned buffers.
///
/// `buffer` must hold `N` values and `bins` `N/2` values; both are fully
/// overwritten. `raw_samples` shorter than `N` are zero-padded.
///
/// # Panics
/// * If `buffer` is not `N` long or `bins` is not `N/2` long
pub fn analyze_frame(
    raw_samples: &[i16],
    gain: NonZeroU32,
    tables: &Tables,
    options: &ExtractOptions,
    buffer: &mut [Complex32],
    bins: &mut [SpectrumBin],
) {
    assert_eq!(bins.len(), tables.size().bins(), "bins must hold N/2 values");
    fft::load_frame(raw_samples, gain, tables, buffer);
    fft::transform(buffer, tables);
    spectrum::extract(buffer, options, bins);
}

/// Owns the per-frame buffers for one pipeline.
///
/// Buffers are sized once from the tables and reused every frame; nothing is
/// allocated by [`Analyzer::analyze_frame`].
#[derive(Debug)]
pub struct Analyzer<'t> {
    tables: &'t Tables,
    options: ExtractOptions,
    buffer: Vec<Complex32>,
    bins: Vec<SpectrumBin>,
}

impl<'t> Analyzer<'t> {
    pub fn new(tables: &'t Tables, options: ExtractOptions) -> Self {
        let size = tables.size();
        Self {
            tables,
            options,
            buffer: vec![Complex32::new(0.0, 0.0); size.get()],
            bins: vec![SpectrumBin::default(); size.bins()],
        }
    }

    pub fn tables(&self) -> &Tables {
        self.tables
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Runs the full pipeline on one captured frame and returns `N/2` bins.
    pub fn analyze_frame(&mut self, raw_samples: &[i16], gain: NonZeroU32) -> &[SpectrumBin] {
        analyze_frame(
            raw_samples,
            gain,
            self.tables,
            &self.options,
            &mut self.buffer,
            &mut self.bins,
        );
        &self.bins
    }

    /// Bins of the most recent frame.
    pub fn bins(&self) -> &[SpectrumBin] {
        &self.bins
    }

    /// Transform buffer of the most recent frame, in natural bin order.
    pub fn transformed(&self) -> &[Complex32] {
        &self.buffer
    }
}
