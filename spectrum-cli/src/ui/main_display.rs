//! # Main Display Module
//!
//! Composes one frame of the analyzer: the spectrum bars under a title with
//! the transform settings, the cursor with its frequency readout, the
//! dominant peak and the optional menu.

use crate::ui::controls::Controls;
use crate::widgets::spectrum_bars::SpectrumBars;
use spectrum_core::{ExtractOptions, SpectrumBin, WindowKind, peak};
use tui::Frame;
use tui::backend::Backend;
use tui::layout::{Constraint, Direction, Layout};
use tui::style::{Color, Modifier, Style};
use tui::text::{Span, Spans};
use tui::widgets::{Block, Borders, Paragraph};

/// Rows taken by the menu when it is visible.
const MENU_LINES: u16 = 4;

/// Everything the view needs for one frame.
#[derive(Debug, Clone, Copy)]
pub struct DisplayData<'a> {
    pub bins: &'a [SpectrumBin],
    pub controls: &'a Controls,
    pub options: ExtractOptions,
    pub sample_rate: u32,
    pub transform_size: usize,
    pub window: WindowKind,
    /// Requested number of bars; fewer are drawn on a narrow terminal.
    pub columns: usize,
}

/// Draws the full frame.
pub fn render<B: Backend>(f: &mut Frame<'_, B>, data: &DisplayData<'_>) {
    let info_height = if data.controls.menu_visible() { 2 + MENU_LINES } else { 2 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(info_height)])
        .split(f.size());

    let block = Block::default()
        .title(Span::styled(
            title(data),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL);
    let columns = data
        .columns
        .min(data.bins.len())
        .min(usize::from(block.inner(chunks[0]).width));
    let cursor = data.controls.cursor().min(columns.saturating_sub(1));

    f.render_widget(SpectrumBars::new(data.bins, columns, &data.options).block(block), chunks[0]);

    // the marker sits under the bar, one cell in from the chart border
    let mut lines = vec![
        Spans::from(format!("{}^", " ".repeat(cursor + 1))),
        Spans::from(readout_line(data, cursor)),
    ];
    if data.controls.menu_visible() {
        lines.extend(menu_lines(data).into_iter().map(Spans::from));
    }
    f.render_widget(Paragraph::new(lines), chunks[1]);
}

fn title(data: &DisplayData<'_>) -> String {
    format!(
        " {} point Radix-2 FFT, {} window, {:.2} Hz per bin ",
        data.transform_size,
        data.window,
        peak::bin_width(data.sample_rate, data.transform_size)
    )
}

fn readout_line(data: &DisplayData<'_>, cursor: usize) -> String {
    let cursor_freq = peak::bin_frequency(cursor, data.sample_rate, data.transform_size);
    let mut line = format!("freq = {:.2} Hz", cursor_freq);

    if let Some(found) = peak::dominant_bin(data.bins, &data.options, true) {
        let bin = peak::refine(data.bins, &data.options, found);
        let hz = bin * peak::bin_width(data.sample_rate, data.transform_size);
        line.push_str(&format!("   peak = {:.2} Hz (bin {})", hz, found.bin));
    }
    line
}

fn menu_lines(data: &DisplayData<'_>) -> Vec<String> {
    vec![
        format!("  - Microphone sensitivity : {}  (+ / -)", data.controls.gain()),
        "  - Show/hide this menu : m".to_string(),
        "  - Use < and > to move the cursor".to_string(),
        "  - Use q to exit".to_string(),
    ]
}
