//! # Window Functions
//!
//! Analysis windows applied to each frame before the transform. A window
//! tapers the frame edges towards zero, trading main-lobe width for lower
//! spectral leakage. All supported windows except the rectangular one are
//! members of the generalized cosine family:
//!
//! `w[i] = a0 - a1·cos(2πi/(N-1)) + a2·cos(4πi/(N-1)) - a3·cos(6πi/(N-1))`

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Selects the analysis window used by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WindowKind {
    /// No tapering: every coefficient is 1.
    #[default]
    Rectangular,
    Hann,
    Hamming,
    Blackman,
    BlackmanHarris,
    BlackmanNuttall,
}

impl WindowKind {
    /// Every supported window, in selector order.
    pub const ALL: [WindowKind; 6] = [
        WindowKind::Rectangular,
        WindowKind::Hann,
        WindowKind::Hamming,
        WindowKind::Blackman,
        WindowKind::BlackmanHarris,
        WindowKind::BlackmanNuttall,
    ];

    /// The selector name accepted by [`FromStr`] and used in config files.
    pub fn name(self) -> &'static str {
        match self {
            WindowKind::Rectangular => "rectangular",
            WindowKind::Hann => "hann",
            WindowKind::Hamming => "hamming",
            WindowKind::Blackman => "blackman",
            WindowKind::BlackmanHarris => "blackman-harris",
            WindowKind::BlackmanNuttall => "blackman-nuttall",
        }
    }

    /// Generalized cosine coefficients `[a0, a1, a2, a3]`.
    fn cosine_terms(self) -> [f64; 4] {
        match self {
            WindowKind::Rectangular => [1.0, 0.0, 0.0, 0.0],
            WindowKind::Hann => [0.5, 0.5, 0.0, 0.0],
            WindowKind::Hamming => [0.53836, 0.46164, 0.0, 0.0],
            WindowKind::Blackman => [0.42, 0.5, 0.08, 0.0],
            WindowKind::BlackmanHarris => [0.35875, 0.48829, 0.14128, 0.01168],
            WindowKind::BlackmanNuttall => [0.3635819, 0.4891775, 0.1365995, 0.0106411],
        }
    }

    /// Computes `len` window coefficients, each in `[0, 1]`.
    ///
    /// Coefficients are evaluated in double precision and then stored as
    /// `f32`. A length-1 window is the single coefficient 1.
    pub fn coefficients(self, len: usize) -> Vec<f32> {
        if self == WindowKind::Rectangular || len < 2 {
            return vec![1.0; len];
        }

        let a = self.cosine_terms();
        let denominator = (len - 1) as f64;
        (0..len)
            .map(|i| {
                let phase = 2.0 * std::f64::consts::PI * i as f64 / denominator;
                #[rustfmt::skip]
                let w = a[0]
                    - a[1] * phase.cos()
                    + a[2] * (2.0 * phase).cos()
                    - a[3] * (3.0 * phase).cos();
                // Blackman-family endpoints land a hair below zero
                w.clamp(0.0, 1.0) as f32
            })
            .collect()
    }
}

impl fmt::Display for WindowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WindowKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        match wanted.as_str() {
            "rect" | "flat" | "none" => return Ok(WindowKind::Rectangular),
            "hanning" => return Ok(WindowKind::Hann),
            _ => {}
        }
        WindowKind::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownWindow { name: s.to_string() })
    }
}
