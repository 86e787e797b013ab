//! # Spectrum Bars Widget
//!
//! Draws the lower end of the spectrum as a bar chart, one bar per bin
//! starting at DC. Bar heights use a decibel scale relative to the loudest
//! drawn bin, so quiet and loud frames both fill the chart.

use spectrum_core::{ExtractOptions, SpectrumBin};
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Style};
use tui::widgets::{BarChart, Block, Widget};

/// Decibel range between a full-height bar and an empty one.
const DYNAMIC_RANGE_DB: f32 = 60.0;

/// Bar value of a bin at the top level.
pub const FULL_SCALE: u64 = 100;

/// Converts the first `columns` bins into bar values in `0..=FULL_SCALE`.
///
/// A frame whose loudest bin sits at the decibel floor yields all zeros.
pub fn bar_values(bins: &[SpectrumBin], columns: usize, options: &ExtractOptions) -> Vec<u64> {
    let levels: Vec<f32> = bins.iter().take(columns).map(|b| options.level_db(b)).collect();
    let top = levels.iter().copied().fold(f32::NEG_INFINITY, f32::max);

    if !top.is_finite() || top <= options.decibel_floor() {
        return vec![0; levels.len()];
    }
    let bottom = top - DYNAMIC_RANGE_DB;
    levels
        .iter()
        .map(|&level| {
            let fraction = ((level - bottom) / DYNAMIC_RANGE_DB).clamp(0.0, 1.0);
            (fraction * FULL_SCALE as f32).round() as u64
        })
        .collect()
}

/// Bar chart over the first `columns` bins of a spectrum, one cell wide per bin.
pub struct SpectrumBars<'a> {
    values: Vec<u64>,
    block: Option<Block<'a>>,
}

impl<'a> SpectrumBars<'a> {
    pub fn new(bins: &[SpectrumBin], columns: usize, options: &ExtractOptions) -> Self {
        Self {
            values: bar_values(bins, columns, options),
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl Widget for SpectrumBars<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let data: Vec<(&str, u64)> = self.values.iter().map(|&v| ("", v)).collect();
        let mut chart = BarChart::default()
            .data(&data)
            .bar_width(1)
            .bar_gap(0)
            .max(FULL_SCALE)
            .bar_style(Style::default().fg(Color::Cyan));
        if let Some(block) = self.block {
            chart = chart.block(block);
        }
        chart.render(area, buf);
    }
}
