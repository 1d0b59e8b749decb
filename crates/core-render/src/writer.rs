//! Terminal writer: an ordered batch of primitive terminal operations built
//! per frame and flushed once.
//!
//! Invariants:
//! * Commands preserve ordering; no flushing mid-frame.
//! * All positions are absolute (0,0) origin; caller ensures bounds.
//! * Writer owns no global state; it is a short-lived object per frame.

use anyhow::Result;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use std::io::Write;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    MoveTo(u16, u16),
    /// Clear from the cursor to the end of the current line.
    ClearLine,
    Print(String),
    Foreground(Color),
    ResetColor,
    Reverse,
    ResetAttributes,
    HideCursor,
    ShowCursor,
}

#[derive(Debug, Default)]
pub struct Writer {
    cmds: Vec<Command>,
}

impl Writer {
    pub fn new() -> Self {
        Self { cmds: Vec::new() }
    }
    pub fn move_to(&mut self, x: u16, y: u16) {
        self.cmds.push(Command::MoveTo(x, y));
    }
    pub fn clear_line(&mut self) {
        self.cmds.push(Command::ClearLine);
    }
    pub fn print<S: Into<String>>(&mut self, s: S) {
        let s: String = s.into();
        if s.is_empty() {
            return;
        }
        // Merge adjacent prints so a styled row is one command per run.
        if let Some(Command::Print(prev)) = self.cmds.last_mut() {
            prev.push_str(&s);
        } else {
            self.cmds.push(Command::Print(s));
        }
    }
    pub fn push(&mut self, cmd: Command) {
        self.cmds.push(cmd);
    }
    pub fn commands(&self) -> &[Command] {
        &self.cmds
    }

    /// Concatenation of every printed string, ignoring styling.
    pub fn text(&self) -> String {
        self.cmds
            .iter()
            .filter_map(|c| match c {
                Command::Print(s) => Some(s.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn flush_to<W: Write>(self, out: &mut W) -> Result<()> {
        for c in self.cmds {
            match c {
                Command::MoveTo(x, y) => queue!(out, MoveTo(x, y))?,
                Command::ClearLine => queue!(out, Clear(ClearType::UntilNewLine))?,
                Command::Print(s) => queue!(out, Print(s))?,
                Command::Foreground(color) => queue!(out, SetForegroundColor(color))?,
                Command::ResetColor => queue!(out, ResetColor)?,
                Command::Reverse => queue!(out, SetAttribute(Attribute::Reverse))?,
                Command::ResetAttributes => queue!(out, SetAttribute(Attribute::Reset))?,
                Command::HideCursor => queue!(out, Hide)?,
                Command::ShowCursor => queue!(out, Show)?,
            }
        }
        out.flush()?;
        Ok(())
    }
}
