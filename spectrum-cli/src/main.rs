//! # Spectrum - Live Microphone Spectrum Analyzer
//!
//! Terminal frontend for `spectrum-core`. It captures the microphone, runs
//! one analysis per captured grain and redraws a bar chart of the spectrum.
//!
//! ## Architecture
//! - **Audio Thread**: cpal callback cutting the input into fixed grains
//! - **Input Thread**: turns raw-mode key events into operator commands
//! - **Main Thread**: owns the analyzer, applies commands and draws frames
//! - **Communication**: Crossbeam channels between the three

mod cli;
mod config;
mod ui;
mod widgets;

use anyhow::{Context, Result};
use clap::Parser;
use cpal::traits::StreamTrait;
use crossbeam_channel::{Receiver, Sender};
use crossterm::event::{self, Event};
use spectrum_core::audio::{self, CaptureSettings};
use spectrum_core::{Analyzer, AnalyzerConfig, Tables};
use std::io;
use std::thread;
use std::time::Duration;
use ui::controls::{Command, Controls};
use ui::main_display::{self, DisplayData};
use ui::terminal::{Term, TerminalSession};

/// Captured grains waiting for analysis; older grains are dropped beyond this.
const FRAME_QUEUE: usize = 4;

/// Longest wait for a terminal event in one poll.
const INPUT_POLL: Duration = Duration::from_millis(100);

/// Main entry point for the analyzer.
///
/// Setup failures (bad configuration, no microphone) are fatal: they are
/// logged and returned, which releases anything already acquired.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = cli::Args::parse();
    log::info!("[MAIN] Starting spectrum analyzer...");

    let config = config::resolve(&args).inspect_err(|e| log::error!("[MAIN] {e:#}"))?;
    if args.dump_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let tables = config
        .build_tables()
        .context("invalid analyzer configuration")
        .inspect_err(|e| log::error!("[MAIN] {e:#}"))?;

    let (frame_tx, frame_rx) = crossbeam_channel::bounded::<Vec<i16>>(FRAME_QUEUE);
    let settings = CaptureSettings {
        sample_rate: config.sample_rate,
        grain: config.capture_grain,
    };
    let (stream, sample_rate) = audio::start_capture(frame_tx, settings)
        .context("microphone unavailable")
        .inspect_err(|e| log::error!("[MAIN] Fatal error starting audio: {e:#}"))?;
    log::info!("[MAIN] Audio capture started at {} Hz", sample_rate);

    let (command_tx, command_rx) = crossbeam_channel::unbounded();
    // the session restores the terminal before anything below logs
    let result = TerminalSession::enter()
        .context("setting up the terminal")
        .and_then(|mut session| {
            spawn_input_thread(command_tx);
            let terminal = session.terminal();
            run_frame_loop(terminal, &args, &config, &tables, sample_rate, frame_rx, command_rx)
        });
    match &result {
        Ok(LoopExit::Quit) => log::info!("[INPUT] Quit requested"),
        Ok(LoopExit::FrameLimit(frames)) => log::info!("[MAIN] Drew {} frames", frames),
        Ok(LoopExit::CaptureClosed) => log::warn!("[MAIN] Audio channel closed"),
        Err(e) => log::error!("[MAIN] {e:#}"),
    }

    log::info!("[MAIN] Stopping stream and exiting...");
    if let Err(e) = stream.pause() {
        log::warn!("[MAIN] Error pausing stream: {}", e);
    }
    drop(stream);
    result.map(|_| ())
}

/// Forwards key presses as commands until the frame loop hangs up.
fn spawn_input_thread(sender: Sender<Command>) {
    thread::spawn(move || {
        if let Err(e) = forward_keys(&sender) {
            log::error!("[INPUT] Failed to read terminal events: {}", e);
        }
    });
}

fn forward_keys(sender: &Sender<Command>) -> io::Result<()> {
    loop {
        if event::poll(INPUT_POLL)? {
            if let Event::Key(key) = event::read()? {
                if let Some(command) = Command::from_key(key) {
                    if sender.send(command).is_err() {
                        return Ok(());
                    }
                }
            }
        }
    }
}

/// Why the frame loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopExit {
    Quit,
    FrameLimit(u64),
    CaptureClosed,
}

/// Analyzes and draws every captured grain until quit, frame limit or
/// capture shutdown.
fn run_frame_loop(
    terminal: &mut Term,
    args: &cli::Args,
    config: &AnalyzerConfig,
    tables: &Tables,
    sample_rate: u32,
    frame_rx: Receiver<Vec<i16>>,
    command_rx: Receiver<Command>,
) -> Result<LoopExit> {
    let mut analyzer = Analyzer::new(tables, config.extract_options());
    let columns = args.columns.clamp(1, tables.size().bins());
    let mut controls = Controls::new(config.gain, columns);

    let mut frames = 0u64;
    let never = crossbeam_channel::never();
    let mut input_open = true;

    loop {
        let commands = if input_open { &command_rx } else { &never };
        crossbeam_channel::select! {
            recv(frame_rx) -> msg => match msg {
                Ok(grain) => {
                    let options = *analyzer.options();
                    let bins = analyzer.analyze_frame(&grain, controls.gain());
                    let view = DisplayData {
                        bins,
                        controls: &controls,
                        options,
                        sample_rate,
                        transform_size: tables.len(),
                        window: tables.window_kind(),
                        columns,
                    };
                    terminal
                        .draw(|f| main_display::render(f, &view))
                        .context("drawing frame")?;

                    frames += 1;
                    if args.frames != 0 && frames >= args.frames {
                        return Ok(LoopExit::FrameLimit(frames));
                    }
                }
                Err(_) => return Ok(LoopExit::CaptureClosed),
            },
            recv(commands) -> msg => match msg {
                Ok(command) => {
                    if !controls.apply(command) {
                        return Ok(LoopExit::Quit);
                    }
                    log::debug!(
                        "[INPUT] {:?}, gain = {}, cursor = {}",
                        command,
                        controls.gain(),
                        controls.cursor()
                    );
                }
                // input thread gone: keep drawing until the frame limit
                Err(_) => input_open = false,
            },
        }
    }
}
