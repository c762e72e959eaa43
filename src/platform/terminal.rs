//! Raw mode and alternate screen, restored on drop

use std::io::{self, Write};

use crossterm::{cursor, execute, terminal};

/// Puts the terminal into game mode for its lifetime
pub struct TerminalGuard {
    active: bool,
}

impl TerminalGuard {
    pub fn enter(out: &mut impl Write) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(
            out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::DisableLineWrap,
        )?;
        Ok(Self { active: true })
    }

    /// Restore the terminal now instead of at drop
    pub fn leave(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        let mut out = io::stdout();
        execute!(
            out,
            terminal::LeaveAlternateScreen,
            cursor::Show,
            terminal::EnableLineWrap,
        )?;
        terminal::disable_raw_mode()
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = self.leave() {
            log::error!("Failed to restore terminal: {}", e);
        }
    }
}

/// Current terminal size (columns, rows)
pub fn size() -> io::Result<(u16, u16)> {
    terminal::size()
}
