//! Cursor-relative edit operations built on the row store primitives.
//!
//! Each takes the cursor by `&mut Position` and leaves it where the edit
//! places it. Out-of-range cursors make the operation a no-op.

use core_text::{Position, motion, normalize};
use tracing::trace;

use crate::Buffer;

impl Buffer {
    /// Insert `b` before the cursor; typing on the virtual row past the end
    /// creates it first.
    pub fn insert_char(&mut self, pos: &mut Position, b: u8) {
        if pos.row == self.len() {
            self.insert_row(self.len(), Vec::new());
        }
        if self.row_insert_byte(pos.row, pos.col, b) {
            pos.col += 1;
        }
    }

    /// Split the row at the cursor (column 0 opens an empty row above).
    pub fn insert_newline(&mut self, pos: &mut Position) {
        if pos.row > self.len() {
            return;
        }
        if pos.col == 0 || pos.row == self.len() {
            self.insert_row(pos.row, Vec::new());
        } else if let Some(tail) = self.row_split_off(pos.row, pos.col) {
            self.insert_row(pos.row + 1, tail);
        }
        pos.row += 1;
        pos.col = 0;
    }

    /// Backspace: delete before the cursor, merging into the previous row at column 0.
    pub fn delete_char_before(&mut self, pos: &mut Position) {
        if pos.row >= self.len() || (pos.col == 0 && pos.row == 0) {
            return;
        }
        if pos.col > 0 {
            self.row_delete_byte(pos.row, pos.col - 1);
            pos.col -= 1;
        } else {
            let prev_len = self.row_len(pos.row - 1);
            let moved = self.rows()[pos.row].raw.clone();
            self.row_append(pos.row - 1, &moved);
            self.delete_row(pos.row);
            pos.row -= 1;
            pos.col = prev_len;
        }
    }

    /// `x`: delete the byte under the cursor, or the whole row when the
    /// cursor is past its last byte.
    pub fn delete_char_at(&mut self, pos: &mut Position) {
        if pos.row >= self.len() {
            return;
        }
        if pos.col < self.row_len(pos.row) {
            self.row_delete_byte(pos.row, pos.col);
        } else {
            self.delete_row(pos.row);
        }
        pos.clamp_to(self.rows());
    }

    /// Delete up to `count` rows starting at the cursor row.
    pub fn delete_lines(&mut self, pos: &mut Position, count: usize) -> usize {
        let deleted = self.delete_rows(pos.row, pos.row.saturating_add(count.max(1)));
        pos.clamp_to(self.rows());
        deleted
    }

    /// `cw`/`dw`: delete `[cursor, endOfWord)`.
    pub fn delete_to_word_end(&mut self, pos: &mut Position) -> bool {
        let Some(row) = self.row(pos.row) else {
            return false;
        };
        let end = motion::end_of_word(&row.raw, pos.col);
        self.row_delete_span(pos.row, pos.col, end)
    }

    /// `ciw`: delete `[startOfWord, endOfWord)` and park the cursor at its start.
    pub fn delete_surrounding_word(&mut self, pos: &mut Position) -> bool {
        let Some(row) = self.row(pos.row) else {
            return false;
        };
        let start = motion::start_of_word(&row.raw, pos.col);
        let end = motion::end_of_word(&row.raw, pos.col);
        let changed = self.row_delete_span(pos.row, start, end);
        pos.col = start;
        changed
    }

    /// Column one past the end of a `df`/`dt` deletion, if `target` occurs at
    /// or after the cursor.
    pub fn till_target(&self, pos: Position, target: u8, inclusive: bool) -> Option<usize> {
        let row = self.row(pos.row)?;
        let i = motion::find_byte(&row.raw, pos.col, target)?;
        let end = if inclusive { i + 1 } else { i };
        (end > pos.col).then_some(end)
    }

    /// Normalize two marks into `(start, end_exclusive)` clamped to the
    /// buffer. The later mark is inclusive.
    fn clamp_span(&self, a: Position, b: Position) -> Option<(Position, Position)> {
        if self.is_empty() {
            return None;
        }
        let (start, end) = normalize(a, b);
        if start.row >= self.len() {
            return None;
        }
        let last = self.len() - 1;
        let end = if end.row > last {
            Position::new(last, self.row_len(last))
        } else {
            Position::new(end.row, (end.col + 1).min(self.row_len(end.row)))
        };
        let start = Position::new(start.row, start.col.min(self.row_len(start.row)));
        Some((start, end))
    }

    /// Text of the span between two marks (inclusive), rows joined by `\n`.
    pub fn span_text(&self, a: Position, b: Position) -> Vec<u8> {
        let Some((start, end)) = self.clamp_span(a, b) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for y in start.row..=end.row {
            let raw = &self.rows()[y].raw;
            let from = if y == start.row { start.col } else { 0 };
            let to = if y == end.row { end.col } else { raw.len() };
            if from < to {
                out.extend_from_slice(&raw[from..to]);
            }
            if y < end.row {
                out.push(b'\n');
            }
        }
        out
    }

    /// Delete the span between two marks (inclusive). Multi-row spans delete
    /// the enclosed rows and join the head remainder with the tail remainder.
    /// Returns the cursor position (the span start).
    pub fn delete_span(&mut self, a: Position, b: Position) -> Option<Position> {
        let (start, end) = self.clamp_span(a, b)?;
        trace!(target: "state.buffer", ?start, ?end, "delete_span");
        if start.row == end.row {
            self.row_delete_span(start.row, start.col, end.col);
            return Some(start);
        }
        let tail = self.rows()[end.row].raw[end.col..].to_vec();
        self.delete_rows(start.row + 1, end.row + 1);
        let head_len = self.row_len(start.row);
        self.row_delete_span(start.row, start.col, head_len);
        if !tail.is_empty() {
            self.row_append(start.row, &tail);
        }
        Some(start)
    }

    /// Type `text` at the cursor; `\n` splits rows.
    pub fn insert_text(&mut self, pos: &mut Position, text: &[u8]) {
        for &b in text {
            if b == b'\n' {
                self.insert_newline(pos);
            } else {
                self.insert_char(pos, b);
            }
        }
    }

    /// `p`: open an empty row below the cursor row and type `text` there.
    pub fn paste_below(&mut self, pos: &mut Position, text: &[u8]) {
        let at = if self.is_empty() {
            0
        } else {
            (pos.row + 1).min(self.len())
        };
        self.insert_row(at, Vec::new());
        *pos = Position::new(at, 0);
        self.insert_text(pos, text);
    }
}
