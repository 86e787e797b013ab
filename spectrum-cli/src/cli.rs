//! Command-line argument parsing.

use clap::Parser;
use std::path::PathBuf;

/// Command line arguments
#[derive(Parser, Debug, Default)]
#[command(name = "spectrum")]
#[command(about = "Live microphone spectrum analyzer", long_about = None)]
pub struct Args {
    /// JSON analyzer config; flags below override its fields
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Analysis window: rectangular, hann, hamming, blackman, blackman-harris, blackman-nuttall
    #[arg(long, value_name = "WINDOW")]
    pub window: Option<String>,

    /// Transform size (power of two)
    #[arg(long, value_name = "POINTS")]
    pub size: Option<usize>,

    /// Initial microphone sensitivity
    #[arg(long, value_name = "GAIN")]
    pub gain: Option<u32>,

    /// Output values: magnitude-phase, amplitude-phase, decibels, full
    #[arg(long, value_name = "MODE")]
    pub output: Option<String>,

    /// Magnitude scaling: raw or per-length
    #[arg(long, value_name = "SCALING")]
    pub normalization: Option<String>,

    /// Number of bars (one per bin, starting at DC), limited by the terminal width
    #[arg(long, value_name = "BARS", default_value = "96")]
    pub columns: usize,

    /// Stop after this many frames (0 runs until `q`)
    #[arg(long, value_name = "FRAMES", default_value = "0")]
    pub frames: u64,

    /// Print the effective config as JSON and exit
    #[arg(long)]
    pub dump_config: bool,
}
