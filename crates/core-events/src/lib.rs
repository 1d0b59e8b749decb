//! Logical key events and the key source boundary.
//!
//! Raw terminal bytes are decoded elsewhere (see `core-terminal`); everything
//! above this crate reasons only about `KeyEvent` values. A `KeySource` blocks
//! until the next logical key is available, which is also how the interpreter
//! reads the extra target character of `f`/`t` commands mid-dispatch.

use std::collections::VecDeque;
use std::fmt;

use anyhow::Result;

/// A single logical key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyEvent {
    pub const fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    /// Unmodified printable character.
    pub const fn char(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::empty())
    }

    /// `Ctrl-<c>`; `c` is expected in lowercase.
    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CTRL)
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::empty())
    }

    /// Returns the character if this is a printable key without Ctrl/Alt.
    pub fn printable(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(c)
                if !self.mods.intersects(KeyModifiers::CTRL | KeyModifiers::ALT)
                    && !c.is_control() =>
            {
                Some(c)
            }
            _ => None,
        }
    }

    /// True when this is `Ctrl-<c>`.
    pub fn is_ctrl(&self, c: char) -> bool {
        self.mods.contains(KeyModifiers::CTRL) && self.code == KeyCode::Char(c)
    }
}

/// Normalized logical key codes consumed by the interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Delete,
    Tab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: u8 {
        const CTRL = 0b0000_0001;
        const ALT  = 0b0000_0010;
        const SHIFT= 0b0000_0100;
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}{:?}", self.code, self.mods)
    }
}

/// Blocking producer of logical keys.
pub trait KeySource {
    /// Wait for and return the next key.
    fn read_key(&mut self) -> Result<KeyEvent>;
}

/// Pre-recorded key sequence. Used by tests and by scripted sessions; reading
/// past the end is an error rather than a hang.
#[derive(Debug, Default, Clone)]
pub struct ScriptedKeys {
    keys: VecDeque<KeyEvent>,
}

impl ScriptedKeys {
    pub fn new<I: IntoIterator<Item = KeyEvent>>(keys: I) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }

    /// Build a script from plain text; `\n` maps to Enter and `\x1b` to Esc.
    pub fn from_text(text: &str) -> Self {
        Self::new(text.chars().map(|c| match c {
            '\n' | '\r' => KeyEvent::plain(KeyCode::Enter),
            '\x1b' => KeyEvent::plain(KeyCode::Esc),
            '\t' => KeyEvent::plain(KeyCode::Tab),
            c => KeyEvent::char(c),
        }))
    }

    pub fn push(&mut self, key: KeyEvent) {
        self.keys.push_back(key);
    }

    pub fn remaining(&self) -> usize {
        self.keys.len()
    }
}

impl KeySource for ScriptedKeys {
    fn read_key(&mut self) -> Result<KeyEvent> {
        self.keys
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("scripted key source exhausted"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_event_display() {
        let k = KeyEvent::ctrl('x');
        let s = format!("{}", k);
        assert!(s.contains("Char"));
        assert!(s.contains("CTRL"));
    }

    #[test]
    fn printable_excludes_ctrl_chords() {
        assert_eq!(KeyEvent::char('a').printable(), Some('a'));
        assert_eq!(KeyEvent::ctrl('a').printable(), None);
        assert_eq!(KeyEvent::plain(KeyCode::Enter).printable(), None);
        assert!(KeyEvent::ctrl('q').is_ctrl('q'));
        assert!(!KeyEvent::char('q').is_ctrl('q'));
    }

    #[test]
    fn scripted_keys_drain_in_order_then_error() {
        let mut keys = ScriptedKeys::from_text("a\n\x1b");
        assert_eq!(keys.read_key().unwrap(), KeyEvent::char('a'));
        assert_eq!(keys.read_key().unwrap().code, KeyCode::Enter);
        assert_eq!(keys.read_key().unwrap().code, KeyCode::Esc);
        assert!(keys.read_key().is_err());
    }
}
