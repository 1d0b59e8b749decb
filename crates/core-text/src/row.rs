//! Row storage and render derivation.

use std::borrow::Cow;

/// Tab stop width used when expanding tabs into render bytes.
pub const TAB_STOP: usize = 4;

/// Highlight class attached to one render byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Highlight {
    #[default]
    Normal,
    Comment,
    BlockComment,
    KeywordPrimary,
    KeywordSecondary,
    String,
    Number,
    SearchMatch,
}

impl Highlight {
    pub fn is_comment(self) -> bool {
        matches!(self, Highlight::Comment | Highlight::BlockComment)
    }
}

/// One logical line of the buffer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    /// Position in the row store; renumbered on insert/delete.
    pub index: usize,
    pub raw: Vec<u8>,
    pub render: Vec<u8>,
    /// One class per `render` byte.
    pub hl: Vec<Highlight>,
    /// A block comment is still open at the end of this row.
    pub open_comment: bool,
}

impl Row {
    pub fn new(index: usize, raw: impl Into<Vec<u8>>) -> Self {
        let mut row = Self {
            index,
            raw: raw.into(),
            ..Self::default()
        };
        row.update_render();
        row
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.raw)
    }

    /// Rebuild `render` from `raw` and reset `hl` to `Normal` at the new
    /// length. Highlighting is repainted by the caller's syntax engine.
    pub fn update_render(&mut self) {
        let tabs = self.raw.iter().filter(|&&b| b == b'\t').count();
        let mut render = Vec::with_capacity(self.raw.len() + tabs * (TAB_STOP - 1));
        for &b in &self.raw {
            if b == b'\t' {
                render.push(b' ');
                while render.len() % TAB_STOP != 0 {
                    render.push(b' ');
                }
            } else {
                render.push(b);
            }
        }
        self.render = render;
        self.hl.clear();
        self.hl.resize(self.render.len(), Highlight::Normal);
    }

    /// Render column of raw column `cx`.
    pub fn cx_to_rx(&self, cx: usize) -> usize {
        let mut rx = 0;
        for &b in self.raw.iter().take(cx) {
            if b == b'\t' {
                rx += (TAB_STOP - 1) - (rx % TAB_STOP);
            }
            rx += 1;
        }
        rx
    }

    /// Raw column whose render span contains render column `rx`.
    pub fn rx_to_cx(&self, rx: usize) -> usize {
        let mut cur_rx = 0;
        for (cx, &b) in self.raw.iter().enumerate() {
            if b == b'\t' {
                cur_rx += (TAB_STOP - 1) - (cur_rx % TAB_STOP);
            }
            cur_rx += 1;
            if cur_rx > rx {
                return cx;
            }
        }
        self.raw.len()
    }

    pub fn insert_byte(&mut self, at: usize, b: u8) {
        let at = at.min(self.raw.len());
        self.raw.insert(at, b);
        self.update_render();
    }

    pub fn append(&mut self, bytes: &[u8]) {
        self.raw.extend_from_slice(bytes);
        self.update_render();
    }

    pub fn delete_byte(&mut self, at: usize) -> bool {
        if at >= self.raw.len() {
            return false;
        }
        self.raw.remove(at);
        self.update_render();
        true
    }

    /// Remove `[start, end)` clamped to the row. Returns whether anything changed.
    pub fn delete_span(&mut self, start: usize, end: usize) -> bool {
        let end = end.min(self.raw.len());
        if start >= end {
            return false;
        }
        self.raw.drain(start..end);
        self.update_render();
        true
    }

    /// Keep `[0, at)` and return the removed tail.
    pub fn split_off(&mut self, at: usize) -> Vec<u8> {
        let at = at.min(self.raw.len());
        let tail = self.raw.split_off(at);
        self.update_render();
        tail
    }
}
