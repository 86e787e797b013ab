//! # Spectrum Extraction
//!
//! Converts a transformed buffer into per-bin magnitude, phase and decibel
//! values. Only the first `N/2` bins are produced: for real input the upper
//! half mirrors the lower half and carries no new information.

use crate::error::ConfigError;
use rustfft::num_complex::Complex32;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Default magnitude clamp before the logarithm, giving a -120 dB floor.
pub const DEFAULT_MAGNITUDE_FLOOR: f32 = 1e-6;

/// Which values the extractor writes into each [`SpectrumBin`].
///
/// Fields a mode does not select are written as `0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputMode {
    /// `magnitude = |X[k]|` and `phase`.
    #[default]
    MagnitudePhase,
    /// Single-sided amplitude in `magnitude` (doubled for every bin except
    /// DC) and `phase`.
    AmplitudePhase,
    /// `decibels` only.
    Decibels,
    /// Magnitude, phase and decibels.
    Full,
}

impl OutputMode {
    fn writes_phase(self) -> bool {
        !matches!(self, OutputMode::Decibels)
    }

    /// Whether `magnitude` carries a value in this mode.
    pub fn writes_magnitude(self) -> bool {
        !matches!(self, OutputMode::Decibels)
    }

    fn writes_decibels(self) -> bool {
        matches!(self, OutputMode::Decibels | OutputMode::Full)
    }
}

impl FromStr for OutputMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "magnitude-phase" | "magnitude" => Ok(OutputMode::MagnitudePhase),
            "amplitude-phase" | "amplitude" => Ok(OutputMode::AmplitudePhase),
            "decibels" | "db" => Ok(OutputMode::Decibels),
            "full" => Ok(OutputMode::Full),
            _ => Err(ConfigError::UnknownSelector {
                arg: "output",
                name: s.to_string(),
            }),
        }
    }
}

/// Amplitude convention applied to the magnitudes.
///
/// `PerLength` divides every magnitude by `N`, which is equivalent to
/// pre-dividing each input sample by `N` before the transform. A full-scale
/// on-bin sinusoid of amplitude `A` then reads about `A / 2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Normalization {
    /// Magnitudes as produced by the unnormalized transform.
    Raw,
    /// Magnitudes divided by the transform length.
    #[default]
    PerLength,
}

impl FromStr for Normalization {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "raw" | "none" => Ok(Normalization::Raw),
            "per-length" | "n" => Ok(Normalization::PerLength),
            _ => Err(ConfigError::UnknownSelector {
                arg: "normalization",
                name: s.to_string(),
            }),
        }
    }
}

/// Options for [`extract`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractOptions {
    pub mode: OutputMode,
    pub normalization: Normalization,
    /// Smallest magnitude fed to the logarithm. See
    /// [`ExtractOptions::effective_floor`] for out-of-range values.
    pub magnitude_floor: f32,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            mode: OutputMode::default(),
            normalization: Normalization::default(),
            magnitude_floor: DEFAULT_MAGNITUDE_FLOOR,
        }
    }
}

impl ExtractOptions {
    /// The clamp actually applied before the logarithm.
    ///
    /// A floor at or below zero becomes `f32::MIN_POSITIVE`; a NaN or
    /// infinite floor falls back to [`DEFAULT_MAGNITUDE_FLOOR`]. Decibel
    /// values are therefore always finite.
    pub fn effective_floor(&self) -> f32 {
        if self.magnitude_floor.is_finite() {
            self.magnitude_floor.max(f32::MIN_POSITIVE)
        } else {
            DEFAULT_MAGNITUDE_FLOOR
        }
    }

    /// The decibel value reported for a silent bin.
    pub fn decibel_floor(&self) -> f32 {
        20.0 * self.effective_floor().log10()
    }

    /// Level of `bin` in decibels, read from whichever field this mode
    /// writes: `decibels` in [`OutputMode::Decibels`], the magnitude
    /// otherwise.
    pub fn level_db(&self, bin: &SpectrumBin) -> f32 {
        if self.mode.writes_magnitude() {
            20.0 * bin.magnitude.max(self.effective_floor()).log10()
        } else {
            bin.decibels
        }
    }
}

/// One usable frequency slot of the spectrum.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SpectrumBin {
    /// Magnitude (or single-sided amplitude), after normalization.
    pub magnitude: f32,
    /// Phase in radians, in `[-π, π]`.
    pub phase: f32,
    /// `20·log10(magnitude)`, clamped at the configured floor.
    pub decibels: f32,
}

/// Fills `bins` from the first `bins.len()` entries of a transformed buffer.
///
/// `bins` is normally `N/2` long. The buffer is only read.
///
/// # Panics
/// * If `bins` is longer than half of `buffer`
pub fn extract(buffer: &[Complex32], options: &ExtractOptions, bins: &mut [SpectrumBin]) {
    assert!(
        bins.len() <= buffer.len() / 2,
        "only the lower half of the spectrum is usable"
    );

    let scale = match options.normalization {
        Normalization::Raw => 1.0,
        Normalization::PerLength => 1.0 / buffer.len() as f32,
    };
    let mode = options.mode;
    let floor = options.effective_floor();

    for (k, (bin, value)) in bins.iter_mut().zip(buffer).enumerate() {
        let mut magnitude = value.norm() * scale; // .norm() is sqrt(re^2 + im^2)
        if mode == OutputMode::AmplitudePhase && k != 0 {
            magnitude *= 2.0;
        }

        *bin = SpectrumBin {
            magnitude: if mode.writes_magnitude() { magnitude } else { 0.0 },
            phase: if mode.writes_phase() { value.arg() } else { 0.0 },
            decibels: if mode.writes_decibels() {
                20.0 * magnitude.max(floor).log10()
            } else {
                0.0
            },
        };
    }
}
