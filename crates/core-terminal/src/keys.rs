//! crossterm events -> logical `KeyEvent`s.

use anyhow::Result;
use core_events::{KeyCode, KeyEvent, KeyModifiers, KeySource};
use crossterm::event::{
    self, Event as CEvent, KeyCode as CKeyCode, KeyEvent as CKeyEvent,
    KeyEventKind as CKeyEventKind, KeyModifiers as CKeyModifiers,
};
use tracing::trace;

/// Map a crossterm key event. Key releases and unsupported codes (media,
/// function keys, bare modifiers) yield `None`.
pub fn map_key_event(event: &CKeyEvent) -> Option<KeyEvent> {
    if matches!(event.kind, CKeyEventKind::Release) {
        return None;
    }
    let code = map_key_code(&event.code)?;
    Some(KeyEvent::new(code, map_modifiers(event.modifiers)))
}

fn map_key_code(code: &CKeyCode) -> Option<KeyCode> {
    let mapped = match code {
        CKeyCode::Char(c) => KeyCode::Char(*c),
        CKeyCode::Enter => KeyCode::Enter,
        CKeyCode::Esc => KeyCode::Esc,
        CKeyCode::Backspace => KeyCode::Backspace,
        CKeyCode::Tab | CKeyCode::BackTab => KeyCode::Tab,
        CKeyCode::Up => KeyCode::Up,
        CKeyCode::Down => KeyCode::Down,
        CKeyCode::Left => KeyCode::Left,
        CKeyCode::Right => KeyCode::Right,
        CKeyCode::Home => KeyCode::Home,
        CKeyCode::End => KeyCode::End,
        CKeyCode::PageUp => KeyCode::PageUp,
        CKeyCode::PageDown => KeyCode::PageDown,
        CKeyCode::Delete => KeyCode::Delete,
        _ => return None,
    };
    Some(mapped)
}

fn map_modifiers(mods: CKeyModifiers) -> KeyModifiers {
    let mut out = KeyModifiers::empty();
    if mods.contains(CKeyModifiers::CONTROL) {
        out |= KeyModifiers::CTRL;
    }
    if mods.contains(CKeyModifiers::ALT) {
        out |= KeyModifiers::ALT;
    }
    if mods.contains(CKeyModifiers::SHIFT) {
        out |= KeyModifiers::SHIFT;
    }
    out
}

/// Blocking key source over the crossterm event queue. Resize events are
/// remembered for the caller and otherwise skipped.
#[derive(Debug, Default)]
pub struct CrosstermKeys {
    resized: Option<(u16, u16)>,
}

impl CrosstermKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent terminal size reported since the last call.
    pub fn take_resize(&mut self) -> Option<(u16, u16)> {
        self.resized.take()
    }
}

impl KeySource for CrosstermKeys {
    fn read_key(&mut self) -> Result<KeyEvent> {
        loop {
            match event::read()? {
                CEvent::Key(key) => {
                    if let Some(mapped) = map_key_event(&key) {
                        trace!(target: "runtime", key = %mapped, "key");
                        return Ok(mapped);
                    }
                }
                CEvent::Resize(w, h) => {
                    trace!(target: "runtime", w, h, "resize");
                    self.resized = Some((w, h));
                }
                _ => {}
            }
        }
    }
}
