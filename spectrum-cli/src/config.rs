//! Analyzer config loading.
//!
//! The effective config is the file given by `--config` (or the defaults),
//! with any command-line flags applied on top.

use crate::cli::Args;
use anyhow::{Context, Result, anyhow};
use spectrum_core::AnalyzerConfig;
use std::fs;
use std::num::NonZeroU32;
use std::path::Path;

/// Loads an analyzer config from a JSON file.
pub fn load_config(path: &Path) -> Result<AnalyzerConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading config `{}`", path.display()))?;
    let config = serde_json::from_str(&data)
        .with_context(|| format!("parsing config `{}`", path.display()))?;
    Ok(config)
}

/// Builds the effective config from the arguments and validates it.
pub fn resolve(args: &Args) -> Result<AnalyzerConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => AnalyzerConfig::default(),
    };

    if let Some(window) = &args.window {
        config.window = window.parse()?;
    }
    if let Some(size) = args.size {
        config.transform_size = size;
    }
    if let Some(gain) = args.gain {
        config.gain = NonZeroU32::new(gain).ok_or_else(|| anyhow!("gain must be at least 1"))?;
    }
    if let Some(output) = &args.output {
        config.output = output.parse()?;
    }
    if let Some(normalization) = &args.normalization {
        config.normalization = normalization.parse()?;
    }

    config.validate()?;
    Ok(config)
}
