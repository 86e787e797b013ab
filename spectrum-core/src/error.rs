//! # Error Types
//!
//! Setup-time errors raised while building the analysis pipeline. Nothing in
//! the per-frame path returns an error: once [`crate::tables::configure`]
//! succeeds, every frame is a total function of its samples.

use std::fmt;

/// Validation errors raised while configuring the pipeline.
///
/// These are fatal: the caller must not proceed to frame processing.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The transform size is not a power of two, or is smaller than 2.
    InvalidTransformSize {
        /// The rejected size.
        size: usize,
    },
    /// The window selector did not name a supported window.
    UnknownWindow {
        /// The rejected selector.
        name: String,
    },
    /// The output mode or normalization selector was not recognized.
    UnknownSelector {
        /// Which option was being parsed.
        arg: &'static str,
        /// The rejected selector.
        name: String,
    },
    /// Any other configuration value is out of range.
    InvalidArgument {
        /// Name of the argument.
        arg: &'static str,
        /// Human readable reason.
        reason: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidTransformSize { size } => {
                write!(f, "Transform size {size} is not a power of two >= 2.")
            }
            ConfigError::UnknownWindow { name } => write!(f, "Unknown window `{name}`."),
            ConfigError::UnknownSelector { arg, name } => {
                write!(f, "Unknown value `{name}` for `{arg}`.")
            }
            ConfigError::InvalidArgument { arg, reason } => {
                write!(f, "Invalid argument `{arg}`: {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
