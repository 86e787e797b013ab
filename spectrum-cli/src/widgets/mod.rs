//! # Widgets Module
//!
//! Drawing primitives used by the main display.

pub mod spectrum_bars;
