//! Row-oriented text primitives shared by every editor layer.
//!
//! A buffer is an ordered `Vec<Row>`; each row owns its raw bytes plus the
//! derived render bytes (tabs expanded) and one highlight class per render
//! byte. Columns are byte offsets: one byte is one visual cell.

pub mod class;
pub mod motion;
pub mod row;

pub use class::{CharClass, is_separator, is_word_byte};
pub use row::{Highlight, Row, TAB_STOP};

/// A cursor or mark inside a buffer: row index plus raw byte column.
///
/// `row` may equal the row count (one past the last row); `col` is clamped to
/// the row length by every motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub const fn origin() -> Self {
        Self { row: 0, col: 0 }
    }

    /// Clamp `col` to the length of `row` (0 when past the last row).
    pub fn clamp_to(&mut self, rows: &[Row]) {
        let len = rows.get(self.row).map_or(0, Row::len);
        if self.col > len {
            self.col = len;
        }
    }
}

/// Order two marks in row-major order.
pub fn normalize(a: Position, b: Position) -> (Position, Position) {
    if a <= b { (a, b) } else { (b, a) }
}
