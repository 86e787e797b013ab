//! # UI Module
//!
//! This module contains the terminal UI components for the spectrum analyzer.

pub mod controls;
pub mod main_display;
pub mod terminal;
