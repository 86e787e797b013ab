//! # Controls
//!
//! Operator input for the analyzer: microphone sensitivity, the frequency
//! cursor and the menu toggle. Commands arrive as raw-mode key events, so a
//! held arrow key keeps moving the cursor through key repeat.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::num::NonZeroU32;

/// A single operator command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    GainUp,
    GainDown,
    CursorLeft,
    CursorRight,
    ToggleMenu,
    Quit,
}

impl Command {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' | '=' | 'k' => Some(Command::GainUp),
            '-' | 'j' => Some(Command::GainDown),
            '<' | ',' | 'h' => Some(Command::CursorLeft),
            '>' | '.' | 'l' => Some(Command::CursorRight),
            'm' => Some(Command::ToggleMenu),
            'q' => Some(Command::Quit),
            _ => None,
        }
    }

    /// Maps a terminal key event to a command. Key releases are ignored.
    pub fn from_key(key: KeyEvent) -> Option<Self> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return (key.code == KeyCode::Char('c')).then_some(Command::Quit);
        }
        match key.code {
            KeyCode::Char(c) => Self::from_char(c),
            KeyCode::Left => Some(Command::CursorLeft),
            KeyCode::Right => Some(Command::CursorRight),
            KeyCode::Up => Some(Command::GainUp),
            KeyCode::Down => Some(Command::GainDown),
            KeyCode::Esc => Some(Command::Quit),
            _ => None,
        }
    }
}

/// Mutable operator state, updated between frames.
#[derive(Debug, Clone, PartialEq)]
pub struct Controls {
    gain: NonZeroU32,
    cursor: usize,
    columns: usize,
    menu_visible: bool,
}

impl Controls {
    /// `columns` is the number of drawn bars; the cursor stays on one of them.
    pub fn new(gain: NonZeroU32, columns: usize) -> Self {
        Self {
            gain,
            cursor: 0,
            columns: columns.max(1),
            menu_visible: true,
        }
    }

    pub fn gain(&self) -> NonZeroU32 {
        self.gain
    }

    /// Bar (and bin) index under the cursor.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn menu_visible(&self) -> bool {
        self.menu_visible
    }

    /// Applies one command. Returns `false` when the operator asked to quit.
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::GainUp => {
                self.gain = self.gain.saturating_add(1);
            }
            Command::GainDown => {
                // never below 1
                self.gain = NonZeroU32::new(self.gain.get() - 1).unwrap_or(NonZeroU32::MIN);
            }
            Command::CursorLeft => self.cursor = self.cursor.saturating_sub(1),
            Command::CursorRight => self.cursor = (self.cursor + 1).min(self.columns - 1),
            Command::ToggleMenu => self.menu_visible = !self.menu_visible,
            Command::Quit => return false,
        }
        true
    }
}
