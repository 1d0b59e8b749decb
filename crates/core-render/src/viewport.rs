//! Visible window into the buffer, scrolled on render columns.
//!
//! * `first_line` / `first_col` are the topmost buffer row and leftmost
//!   render column drawn.
//! * `height` / `width` cover buffer text only (status and message bars are
//!   excluded by the caller).

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub first_line: usize,
    pub first_col: usize,
    pub height: usize,
    pub width: usize,
}

impl Viewport {
    pub fn new(first_line: usize, first_col: usize, height: usize, width: usize) -> Self {
        Self {
            first_line,
            first_col,
            height,
            width,
        }
    }

    /// Shift the window the minimum amount that keeps `(line, rx)` visible.
    pub fn scroll_to(&mut self, line: usize, rx: usize) {
        if line < self.first_line {
            self.first_line = line;
        }
        if self.height > 0 && line >= self.first_line + self.height {
            self.first_line = line + 1 - self.height;
        }
        if rx < self.first_col {
            self.first_col = rx;
        }
        if self.width > 0 && rx >= self.first_col + self.width {
            self.first_col = rx + 1 - self.width;
        }
    }

    pub fn contains_line(&self, line: usize) -> bool {
        line >= self.first_line && line < self.first_line + self.height
    }
}
