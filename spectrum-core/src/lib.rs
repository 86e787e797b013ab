// spectrum-core/src/lib.rs

//! The core logic for the live spectrum analyzer.
//! This crate is responsible for microphone capture, the precomputed
//! transform tables, the radix-2 FFT and spectrum extraction. It is
//! completely headless and contains no rendering code.

pub mod analyzer;
pub mod audio;
pub mod error;
pub mod fft;
pub mod peak;
pub mod spectrum;
pub mod tables;
pub mod window;

pub use analyzer::{Analyzer, AnalyzerConfig, analyze_frame};
pub use error::ConfigError;
pub use spectrum::{ExtractOptions, Normalization, OutputMode, SpectrumBin};
pub use tables::{Tables, TransformSize, configure};
pub use window::WindowKind;
