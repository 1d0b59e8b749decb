//! The editor's terminal session (raw mode and the alternate screen, put back
//! on every exit path) and the crossterm key source.

use std::io::{self, Write, stdout};

use anyhow::Result;
use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use tracing::debug;

pub mod keys;
pub use keys::{CrosstermKeys, map_key_event};

/// Screen operations the editor needs from its terminal.
pub trait TerminalBackend {
    /// Raw mode plus the alternate screen. Idempotent.
    fn enter(&mut self) -> Result<()>;
    /// Undo `enter`; a no-op when not entered.
    fn leave(&mut self) -> Result<()>;
    fn set_title(&mut self, title: &str) -> Result<()>;
    /// `(columns, rows)`.
    fn size(&self) -> Result<(u16, u16)>;
}

/// Stdout through crossterm.
#[derive(Debug, Default)]
pub struct CrosstermBackend {
    raw: bool,
}

impl CrosstermBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the session is currently in raw mode on the alternate screen.
    pub fn is_raw(&self) -> bool {
        self.raw
    }

    /// Enter the editor screen for as long as the returned guard lives.
    pub fn enter_guard(&mut self) -> Result<TerminalGuard<'_>> {
        self.enter()?;
        Ok(TerminalGuard(self))
    }
}

fn open_screen(out: &mut impl Write) -> io::Result<()> {
    execute!(out, EnterAlternateScreen, Hide)
}

fn close_screen(out: &mut impl Write) -> io::Result<()> {
    execute!(out, Show, LeaveAlternateScreen)
}

impl TerminalBackend for CrosstermBackend {
    fn enter(&mut self) -> Result<()> {
        if self.raw {
            return Ok(());
        }
        terminal::enable_raw_mode()?;
        open_screen(&mut stdout())?;
        self.raw = true;
        debug!(target: "runtime", "terminal_entered");
        Ok(())
    }

    fn leave(&mut self) -> Result<()> {
        if !self.raw {
            return Ok(());
        }
        // Clear the flag first so a failed restore is not retried from Drop.
        self.raw = false;
        close_screen(&mut stdout())?;
        terminal::disable_raw_mode()?;
        debug!(target: "runtime", "terminal_left");
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        execute!(stdout(), SetTitle(title))?;
        Ok(())
    }

    fn size(&self) -> Result<(u16, u16)> {
        Ok(terminal::size()?)
    }
}

impl Drop for CrosstermBackend {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

/// Puts the terminal back when dropped, including during a panic unwind.
pub struct TerminalGuard<'a>(&'a mut CrosstermBackend);

impl Drop for TerminalGuard<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.0.leave() {
            debug!(target: "runtime", error = %e, "terminal_restore_failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_backend_is_cooked() {
        let backend = CrosstermBackend::new();
        assert!(!backend.is_raw());
    }

    #[test]
    fn leave_without_enter_is_noop() {
        let mut backend = CrosstermBackend::new();
        backend.leave().unwrap();
        assert!(!backend.is_raw());
    }

    #[test]
    fn screen_switch_sequences() {
        let mut out = Vec::new();
        open_screen(&mut out).unwrap();
        let opened = String::from_utf8_lossy(&out).into_owned();
        assert!(opened.contains("\x1b[?1049h"));
        assert!(opened.contains("\x1b[?25l"));

        out.clear();
        close_screen(&mut out).unwrap();
        let closed = String::from_utf8_lossy(&out);
        assert!(closed.contains("\x1b[?1049l"));
        assert!(closed.contains("\x1b[?25h"));
    }
}
