//! Cursor motion helpers.
//!
//! Pure functions over a row slice and a `Position`; they never mutate rows.
//! Every motion leaves `col` clamped to `[0, len(row)]`.

use crate::{CharClass, Position, Row};

fn row_len(rows: &[Row], row: usize) -> usize {
    rows.get(row).map_or(0, Row::len)
}

/// Move left one byte, wrapping to the end of the previous row.
pub fn left(rows: &[Row], pos: &mut Position) {
    if pos.col > 0 {
        pos.col -= 1;
    } else if pos.row > 0 {
        pos.row -= 1;
        pos.col = row_len(rows, pos.row);
    }
    pos.clamp_to(rows);
}

/// Move right one byte; from the end of a row wrap to the start of the next
/// (which may be the virtual row past the end of the buffer).
pub fn right(rows: &[Row], pos: &mut Position) {
    if let Some(row) = rows.get(pos.row) {
        if pos.col < row.len() {
            pos.col += 1;
        } else if pos.col == row.len() {
            pos.row += 1;
            pos.col = 0;
        }
    }
    pos.clamp_to(rows);
}

pub fn up(rows: &[Row], pos: &mut Position) {
    if pos.row > 0 {
        pos.row -= 1;
    }
    pos.clamp_to(rows);
}

pub fn down(rows: &[Row], pos: &mut Position) {
    if pos.row + 1 < rows.len() {
        pos.row += 1;
    }
    pos.clamp_to(rows);
}

pub fn line_start(_rows: &[Row], pos: &mut Position) {
    pos.col = 0;
}

/// Past the last byte (Insert-mode End, append).
pub fn line_end(rows: &[Row], pos: &mut Position) {
    if pos.row < rows.len() {
        pos.col = row_len(rows, pos.row);
    }
}

/// On the last byte (Normal/Visual `$`); 0 on an empty row.
pub fn line_last(rows: &[Row], pos: &mut Position) {
    if pos.row < rows.len() {
        pos.col = row_len(rows, pos.row).saturating_sub(1);
    }
}

pub fn buffer_start(rows: &[Row], pos: &mut Position) {
    pos.row = 0;
    pos.clamp_to(rows);
}

pub fn buffer_end(rows: &[Row], pos: &mut Position) {
    pos.row = rows.len().saturating_sub(1);
    pos.clamp_to(rows);
}

/// First column of the same-class run containing `col`.
pub fn start_of_word(raw: &[u8], col: usize) -> usize {
    if col >= raw.len() {
        return col.min(raw.len());
    }
    let class = CharClass::of(raw[col]);
    let mut x = col;
    while x > 0 && CharClass::of(raw[x - 1]) == class {
        x -= 1;
    }
    x
}

/// One past the last column of the same-class run containing `col`.
pub fn end_of_word(raw: &[u8], col: usize) -> usize {
    if col >= raw.len() {
        return col.min(raw.len());
    }
    let class = CharClass::of(raw[col]);
    let mut x = col;
    while x < raw.len() && CharClass::of(raw[x]) == class {
        x += 1;
    }
    x
}

/// Skip the run under the cursor, then any whitespace; at end of row continue
/// on the next row's first non-blank. On the last row stop at its end.
pub fn word_forward(rows: &[Row], pos: &mut Position) {
    let Some(row) = rows.get(pos.row) else {
        return;
    };
    let raw = &row.raw;
    pos.col = end_of_word(raw, pos.col);
    while pos.col < raw.len() && CharClass::of(raw[pos.col]) == CharClass::Whitespace {
        pos.col += 1;
    }
    if pos.col >= raw.len() && pos.row + 1 < rows.len() {
        pos.row += 1;
        pos.col = 0;
        let next = &rows[pos.row].raw;
        while pos.col < next.len() && CharClass::of(next[pos.col]) == CharClass::Whitespace {
            pos.col += 1;
        }
    }
    pos.clamp_to(rows);
}

fn brace_pair(b: u8) -> Option<(u8, isize)> {
    match b {
        b'{' => Some((b'}', 1)),
        b'(' => Some((b')', 1)),
        b'[' => Some((b']', 1)),
        b'}' => Some((b'{', -1)),
        b')' => Some((b'(', -1)),
        b']' => Some((b'[', -1)),
        _ => None,
    }
}

/// Jump from a bracket to its partner, counting nesting across rows.
/// Returns `false` (cursor untouched) when not on a bracket or unmatched.
pub fn matching_brace(rows: &[Row], pos: &mut Position) -> bool {
    let Some(&current) = rows.get(pos.row).and_then(|r| r.raw.get(pos.col)) else {
        return false;
    };
    let Some((target, dir)) = brace_pair(current) else {
        return false;
    };
    let mut depth = 1usize;
    let mut y = pos.row as isize;
    let mut x = pos.col as isize + dir;
    while y >= 0 && (y as usize) < rows.len() {
        let raw = &rows[y as usize].raw;
        if x < 0 {
            y -= 1;
            if y >= 0 {
                x = rows[y as usize].len() as isize - 1;
            }
            continue;
        }
        if x as usize >= raw.len() {
            y += 1;
            x = 0;
            continue;
        }
        let b = raw[x as usize];
        if b == target {
            depth -= 1;
            if depth == 0 {
                *pos = Position::new(y as usize, x as usize);
                return true;
            }
        } else if b == current {
            depth += 1;
        }
        x += dir;
    }
    false
}

/// First index `>= from` holding `target`.
pub fn find_byte(raw: &[u8], from: usize, target: u8) -> Option<usize> {
    raw.get(from..)?
        .iter()
        .position(|&b| b == target)
        .map(|i| i + from)
}

/// Plain `f`/`t`: search after the cursor; `t` stops one column short.
pub fn find_char(rows: &[Row], pos: &mut Position, target: u8, till: bool) -> bool {
    let Some(row) = rows.get(pos.row) else {
        return false;
    };
    match find_byte(&row.raw, pos.col + 1, target) {
        Some(i) => {
            pos.col = if till { i - 1 } else { i };
            true
        }
        None => false,
    }
}
