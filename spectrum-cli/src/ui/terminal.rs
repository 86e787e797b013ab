//! Raw-mode alternate-screen session for the analyzer view.

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use std::io::{self, Stdout};
use tui::Terminal;
use tui::backend::CrosstermBackend;

pub type Term = Terminal<CrosstermBackend<Stdout>>;

/// Owns the terminal while the analyzer is drawing.
///
/// Entering switches to raw mode and the alternate screen; dropping the
/// session restores the cursor, the main screen and cooked mode, also when
/// the frame loop exits with an error.
pub struct TerminalSession {
    terminal: Term,
}

impl TerminalSession {
    pub fn enter() -> io::Result<Self> {
        let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        enable_raw_mode()?;
        // from here on, Drop undoes whatever part of the setup succeeded
        let mut session = Self { terminal };
        execute!(io::stdout(), EnterAlternateScreen)?;
        session.terminal.hide_cursor()?;
        session.terminal.clear()?;
        Ok(session)
    }

    pub fn terminal(&mut self) -> &mut Term {
        &mut self.terminal
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}
