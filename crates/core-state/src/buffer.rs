//! Row store.
//!
//! Owns every `Row` plus the syntax engine that paints them. Each primitive
//! re-derives render/highlight for the rows it touched before returning,
//! bumps the dirty counter and, with a parse-tree backend, asks for a
//! (throttled or immediate) re-parse.

use std::time::Instant;

use core_syntax::{Reparse, SyntaxEngine};
use core_text::{Highlight, Row};
use tracing::trace;

#[derive(Debug, Default)]
pub struct Buffer {
    rows: Vec<Row>,
    syntax: SyntaxEngine,
    dirty: u64,
}

/// Highlight of one row saved before a search-match overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedHighlight {
    pub row: usize,
    pub hl: Vec<Highlight>,
}

impl Buffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_lines<I, L>(lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Vec<u8>>,
    {
        let mut buf = Self::new();
        buf.replace_lines(lines);
        buf
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, at: usize) -> Option<&Row> {
        self.rows.get(at)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row_len(&self, at: usize) -> usize {
        self.rows.get(at).map_or(0, Row::len)
    }

    pub fn dirty(&self) -> u64 {
        self.dirty
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty > 0
    }

    pub fn mark_clean(&mut self) {
        self.dirty = 0;
    }

    pub fn mark_dirty(&mut self) {
        self.dirty += 1;
    }

    pub fn syntax(&self) -> &SyntaxEngine {
        &self.syntax
    }

    /// Rows joined by `\n`, each row newline-terminated.
    pub fn to_text(&self) -> Vec<u8> {
        let total = self.rows.iter().map(|r| r.len() + 1).sum();
        let mut out = Vec::with_capacity(total);
        for row in &self.rows {
            out.extend_from_slice(&row.raw);
            out.push(b'\n');
        }
        out
    }

    pub fn any_row_contains(&self, b: u8) -> bool {
        self.rows.iter().any(|r| r.raw.contains(&b))
    }

    /// Install a new engine: immediate re-parse and full repaint.
    pub fn set_syntax(&mut self, engine: SyntaxEngine) {
        self.syntax = engine;
        self.reparse(Reparse::Immediate);
        self.repaint_all();
    }

    /// Replace the whole content (load). Does not touch the dirty counter.
    pub fn replace_lines<I, L>(&mut self, lines: I)
    where
        I: IntoIterator<Item = L>,
        L: Into<Vec<u8>>,
    {
        self.rows = lines
            .into_iter()
            .enumerate()
            .map(|(i, l)| Row::new(i, l))
            .collect();
        self.reparse(Reparse::Immediate);
        self.repaint_all();
    }

    /// Deep copy of every row.
    pub fn snapshot_rows(&self) -> Vec<Row> {
        self.rows.clone()
    }

    /// Install rows from an undo snapshot; always re-parses and repaints.
    pub fn restore_rows(&mut self, rows: Vec<Row>) {
        self.rows = rows;
        self.renumber(0);
        self.dirty += 1;
        self.reparse(Reparse::Immediate);
        self.repaint_all();
    }

    /// Insert a row at `at` (`0..=len`); out of range is a no-op.
    pub fn insert_row(&mut self, at: usize, text: impl Into<Vec<u8>>) -> bool {
        if at > self.rows.len() {
            return false;
        }
        self.rows.insert(at, Row::new(at, text));
        self.renumber(at + 1);
        self.edited(at, Reparse::Throttled);
        true
    }

    pub fn delete_row(&mut self, at: usize) -> bool {
        if at >= self.rows.len() {
            return false;
        }
        self.rows.remove(at);
        self.renumber(at);
        self.edited(at, Reparse::Throttled);
        true
    }

    /// Delete rows `[start, end)` clamped to the buffer.
    pub fn delete_rows(&mut self, start: usize, end: usize) -> usize {
        let end = end.min(self.rows.len());
        if start >= end {
            return 0;
        }
        self.rows.drain(start..end);
        self.renumber(start);
        self.edited(start, Reparse::Throttled);
        end - start
    }

    pub fn row_insert_byte(&mut self, row: usize, at: usize, b: u8) -> bool {
        let Some(r) = self.rows.get_mut(row) else {
            return false;
        };
        r.insert_byte(at, b);
        self.edited(row, Reparse::Throttled);
        true
    }

    pub fn row_append(&mut self, row: usize, bytes: &[u8]) -> bool {
        let Some(r) = self.rows.get_mut(row) else {
            return false;
        };
        r.append(bytes);
        self.edited(row, Reparse::Throttled);
        true
    }

    pub fn row_delete_byte(&mut self, row: usize, at: usize) -> bool {
        let Some(r) = self.rows.get_mut(row) else {
            return false;
        };
        if !r.delete_byte(at) {
            return false;
        }
        self.edited(row, Reparse::Throttled);
        true
    }

    /// Delete `[start, end)` within one row. Forces an immediate re-parse.
    pub fn row_delete_span(&mut self, row: usize, start: usize, end: usize) -> bool {
        let Some(r) = self.rows.get_mut(row) else {
            return false;
        };
        if !r.delete_span(start, end) {
            return false;
        }
        self.edited(row, Reparse::Immediate);
        true
    }

    /// Truncate `row` at `at` and return the removed tail.
    pub fn row_split_off(&mut self, row: usize, at: usize) -> Option<Vec<u8>> {
        let r = self.rows.get_mut(row)?;
        let tail = r.split_off(at);
        self.edited(row, Reparse::Throttled);
        Some(tail)
    }

    /// Paint `[rx, rx+len)` of `row` as a search match, returning what it replaced.
    pub fn overlay_match(&mut self, row: usize, rx: usize, len: usize) -> Option<SavedHighlight> {
        let r = self.rows.get_mut(row)?;
        let saved = SavedHighlight {
            row,
            hl: r.hl.clone(),
        };
        let end = (rx + len).min(r.hl.len());
        if rx < end {
            r.hl[rx..end].fill(Highlight::SearchMatch);
        }
        Some(saved)
    }

    pub fn restore_highlight(&mut self, saved: SavedHighlight) {
        if let Some(r) = self.rows.get_mut(saved.row)
            && r.hl.len() == saved.hl.len()
        {
            r.hl = saved.hl;
        }
    }

    fn renumber(&mut self, from: usize) {
        for (i, row) in self.rows.iter_mut().enumerate().skip(from) {
            row.index = i;
        }
    }

    fn edited(&mut self, row: usize, mode: Reparse) {
        self.dirty += 1;
        if self.reparse(mode) {
            self.repaint_all();
        } else {
            self.repaint_from(row);
        }
    }

    fn reparse(&mut self, mode: Reparse) -> bool {
        if !self.syntax.uses_tree() {
            return false;
        }
        let text = self.to_text();
        self.syntax.reparse(&text, mode, Instant::now())
    }

    fn repaint_all(&mut self) {
        let mut carry = false;
        for row in &mut self.rows {
            carry = self.syntax.paint(row, carry);
        }
    }

    /// Repaint `start`, then keep going while the open-comment state changes.
    fn repaint_from(&mut self, start: usize) {
        let mut next = Some(start);
        let mut painted = 0usize;
        while let Some(i) = next.take() {
            if i >= self.rows.len() {
                break;
            }
            let carry = i > 0 && self.rows[i - 1].open_comment;
            let row = &mut self.rows[i];
            let before = row.open_comment;
            let after = self.syntax.paint(row, carry);
            painted += 1;
            if after != before {
                next = Some(i + 1);
            }
        }
        trace!(target: "state.buffer", start, painted, "repaint");
    }
}
