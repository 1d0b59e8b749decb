//! Literal substring search over rendered rows.

use core_text::{Position, Row, is_word_byte};

use crate::buffer::{Buffer, SavedHighlight};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl Direction {
    fn step(self) -> isize {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }
}

/// The committed search used by `n`/`N`.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub query: Option<Vec<u8>>,
    /// Row of the last match; `None` starts before the first row.
    pub last_row: Option<usize>,
    pub direction: Direction,
}

fn find_in(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Scan rows after `from` in `dir`, wrapping, visiting every row once.
/// Returns the row and render column of the first match.
pub fn find_from(
    rows: &[Row],
    needle: &[u8],
    from: Option<usize>,
    dir: Direction,
) -> Option<(usize, usize)> {
    let n = rows.len() as isize;
    if n == 0 {
        return None;
    }
    let before_first = match dir {
        Direction::Forward => -1,
        Direction::Backward => n,
    };
    let mut current = from.map_or(before_first, |r| r as isize);
    for _ in 0..n {
        current = (current + dir.step()).rem_euclid(n);
        let row = &rows[current as usize];
        if let Some(rx) = find_in(&row.render, needle) {
            return Some((current as usize, rx));
        }
    }
    None
}

impl SearchState {
    /// Continue the committed search; moves `cursor` on a hit.
    pub fn next(&mut self, rows: &[Row], cursor: &mut Position) -> bool {
        let Some(query) = self.query.as_deref() else {
            return false;
        };
        match find_from(rows, query, self.last_row, self.direction) {
            Some((row, rx)) => {
                self.last_row = Some(row);
                *cursor = Position::new(row, rows[row].rx_to_cx(rx));
                true
            }
            None => false,
        }
    }
}

/// Word (alnum or `_`) under the cursor, if the cursor sits on one.
pub fn word_under_cursor(rows: &[Row], cursor: Position) -> Option<Vec<u8>> {
    let raw = &rows.get(cursor.row)?.raw;
    if !is_word_byte(*raw.get(cursor.col)?) {
        return None;
    }
    let mut start = cursor.col;
    while start > 0 && is_word_byte(raw[start - 1]) {
        start -= 1;
    }
    let mut end = cursor.col;
    while end < raw.len() && is_word_byte(raw[end]) {
        end += 1;
    }
    Some(raw[start..end].to_vec())
}

/// Keys that drive the incremental search prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStep {
    Confirm,
    Cancel,
    Forward,
    Backward,
    Edit,
}

/// Per-prompt state of an incremental search.
#[derive(Debug, Default)]
pub struct IncrementalSearch {
    last_match: Option<usize>,
    direction: Direction,
    saved: Option<SavedHighlight>,
}

impl IncrementalSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_match(&self) -> Option<usize> {
        self.last_match
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Undo the previous overlay, then search for `query` according to `step`.
    pub fn step(&mut self, buffer: &mut Buffer, cursor: &mut Position, query: &[u8], step: SearchStep) {
        if let Some(saved) = self.saved.take() {
            buffer.restore_highlight(saved);
        }
        match step {
            SearchStep::Confirm | SearchStep::Cancel => return,
            SearchStep::Forward => self.direction = Direction::Forward,
            SearchStep::Backward => self.direction = Direction::Backward,
            SearchStep::Edit => {
                self.last_match = None;
                self.direction = Direction::Forward;
            }
        }
        if self.last_match.is_none() {
            self.direction = Direction::Forward;
        }
        let Some((row, rx)) = find_from(buffer.rows(), query, self.last_match, self.direction)
        else {
            return;
        };
        self.last_match = Some(row);
        *cursor = Position::new(row, buffer.rows()[row].rx_to_cx(rx));
        self.saved = buffer.overlay_match(row, rx, query.len());
    }
}
