//! # Audio Capture Module
//!
//! This module handles real-time microphone capture using CPAL (Cross-Platform
//! Audio Library). It is the capture side of the analyzer: it opens the input
//! device once at startup and streams fixed-size grains of mono 16-bit signed
//! samples to the analysis thread.
//!
//! ## Features
//! - Automatic input device selection
//! - Mono or first-channel capture from multi-channel devices
//! - 16-bit integer or 32-bit float device formats, converted to `i16`
//! - Fixed-size grains delivered over a channel
//!
//! Failing to open the device is fatal: it is reported once as a
//! [`CaptureError`] and never retried.

use anyhow::{Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat, SizedSample, SupportedStreamConfigRange};
use crossbeam_channel::Sender;
use std::fmt;

/// Capture settings: the requested rate and the grain size per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureSettings {
    pub sample_rate: u32,
    pub grain: usize,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            sample_rate: crate::analyzer::SAMPLE_RATE,
            grain: crate::analyzer::CAPTURE_GRAIN,
        }
    }
}

/// The capture device could not be brought up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// The host reports no default input device.
    NoInputDevice,
    /// The device offers no 16-bit or 32-bit float input format.
    NoSupportedFormat,
    /// The stream could not be built or started.
    Stream {
        /// Driver message.
        reason: String,
    },
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::NoInputDevice => write!(f, "No input device available"),
            CaptureError::NoSupportedFormat => {
                write!(f, "No suitable i16 or f32 input format found")
            }
            CaptureError::Stream { reason } => write!(f, "Input stream unavailable: {reason}"),
        }
    }
}

impl std::error::Error for CaptureError {}

/// Starts capture from the default input device.
///
/// Every `settings.grain` samples are sent as one frame through `sender`.
/// Frames are dropped, not queued, when the receiver falls behind.
///
/// # Returns
/// * `Ok((stream, sample_rate))` - Live stream handle and the actual sample rate
/// * `Err(e)` - A [`CaptureError`] (with context) if the device cannot be opened
pub fn start_capture(
    sender: Sender<Vec<i16>>,
    settings: CaptureSettings,
) -> Result<(cpal::Stream, u32)> {
    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .ok_or(CaptureError::NoInputDevice)?;

    let name = device.name().unwrap_or_else(|_| "<unnamed>".to_string());
    log::info!("[AUDIO] Using audio input device: {}", name);

    let configs = device
        .supported_input_configs()
        .map_err(stream_error)
        .with_context(|| format!("querying formats of `{name}`"))?
        .collect::<Vec<_>>();
    let supported = find_supported_config(configs, settings.sample_rate)
        .ok_or(CaptureError::NoSupportedFormat)
        .with_context(|| format!("selecting a format on `{name}`"))?;

    let rate = settings.sample_rate.clamp(
        supported.min_sample_rate().0,
        supported.max_sample_rate().0,
    );
    let supported = supported.with_sample_rate(cpal::SampleRate(rate));
    let format = supported.sample_format();
    let config: cpal::StreamConfig = supported.into();

    if rate != settings.sample_rate {
        log::warn!(
            "[AUDIO] Requested {} Hz but the device only offers {} Hz",
            settings.sample_rate,
            rate
        );
    }
    log::info!(
        "[AUDIO] Capturing {:?} at {} Hz, {} channel(s), {} samples per grain",
        format,
        rate,
        config.channels,
        settings.grain
    );

    let stream = match format {
        SampleFormat::I16 => build_stream::<i16>(&device, &config, sender, settings.grain),
        SampleFormat::F32 => build_stream::<f32>(&device, &config, sender, settings.grain),
        _ => Err(CaptureError::NoSupportedFormat.into()),
    }?;

    stream.play().map_err(stream_error)?;

    Ok((stream, rate))
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    sender: Sender<Vec<i16>>,
    grain: usize,
) -> Result<cpal::Stream>
where
    T: SizedSample,
    i16: FromSample<T>,
{
    let channels = usize::from(config.channels.max(1));
    let err_fn = |err| log::error!("[AUDIO] An error occurred on the audio stream: {}", err);

    // Accumulates samples from the callback until a full grain is available.
    let mut pending: Vec<i16> = Vec::with_capacity(grain * 2);

    let stream = device
        .build_input_stream(
            config,
            move |data: &[T], _: &cpal::InputCallbackInfo| {
                pending.extend(data.iter().step_by(channels).map(|&s| s.to_sample::<i16>()));

                while pending.len() >= grain {
                    let frame = pending[..grain].to_vec();
                    // Drop the frame if the analysis thread is behind.
                    let _ = sender.try_send(frame);
                    pending.drain(..grain);
                }
            },
            err_fn,
            None,
        )
        .map_err(stream_error)?;

    Ok(stream)
}

fn stream_error(err: impl fmt::Display) -> CaptureError {
    CaptureError::Stream {
        reason: err.to_string(),
    }
}

/// Picks the input format closest to `target_rate`.
///
/// Only `i16` and `f32` formats are considered. Among formats equally close
/// to the rate, mono beats multi-channel and native `i16` beats `f32`.
fn find_supported_config(
    configs: Vec<SupportedStreamConfigRange>,
    target_rate: u32,
) -> Option<SupportedStreamConfigRange> {
    configs
        .into_iter()
        .filter(|c| matches!(c.sample_format(), SampleFormat::I16 | SampleFormat::F32))
        .min_by_key(|c| {
            let in_range = (c.min_sample_rate().0..=c.max_sample_rate().0).contains(&target_rate);
            let rate_distance = if in_range {
                0
            } else {
                let min_diff = c.min_sample_rate().0.abs_diff(target_rate);
                let max_diff = c.max_sample_rate().0.abs_diff(target_rate);
                min_diff.min(max_diff)
            };
            (
                rate_distance,
                c.channels() != 1,
                c.sample_format() != SampleFormat::I16,
            )
        })
}
