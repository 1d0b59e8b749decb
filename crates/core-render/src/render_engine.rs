//! Full-frame composition.
//!
//! Every refresh repaints the whole screen: `height - 2` text rows, the
//! inverted status bar, then the message bar. Rows are emitted row-major with
//! an explicit `MoveTo` each, so a line longer than the terminal can never
//! wrap into the next one.

use std::io::Write;

use anyhow::Result;
use core_state::EditorState;
use core_text::{Row, normalize};
use crossterm::style::Color;
use tracing::trace;

use crate::status::{compose_status, format_status, message_line};
use crate::style::{control_symbol, highlight_color};
use crate::viewport::Viewport;
use crate::writer::{Command, Writer};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Rows reserved below the text area (status bar + message bar).
const CHROME_ROWS: u16 = 2;

/// Owns the horizontal scroll; the vertical one lives in `EditorState`
/// because paging and search restore it.
#[derive(Debug, Default)]
pub struct RenderEngine {
    col_offset: usize,
}

impl RenderEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn col_offset(&self) -> usize {
        self.col_offset
    }

    pub fn render<W: Write>(
        &mut self,
        state: &mut EditorState,
        cols: u16,
        rows: u16,
        out: &mut W,
    ) -> Result<()> {
        self.compose(state, cols, rows).flush_to(out)
    }

    /// Build the frame for a `cols` x `rows` terminal. Updates
    /// `state.row_offset` and `state.screen_rows` as a side effect.
    pub fn compose(&mut self, state: &mut EditorState, cols: u16, rows: u16) -> Writer {
        state.tick_ephemeral();
        let text_rows = rows.saturating_sub(CHROME_ROWS);
        let width = cols as usize;
        state.screen_rows = (text_rows as usize).max(1);

        let mut vp = Viewport::new(state.row_offset, self.col_offset, text_rows as usize, width);
        vp.scroll_to(state.cursor.row, state.rx());
        state.row_offset = vp.first_line;
        self.col_offset = vp.first_col;
        trace!(
            target: "render",
            row_offset = vp.first_line,
            col_offset = vp.first_col,
            "compose"
        );

        let mut w = Writer::new();
        w.push(Command::HideCursor);
        let selection = state.selection.map(|s| normalize(s.start, s.end));
        for y in 0..text_rows {
            w.move_to(0, y);
            let filerow = vp.first_line + y as usize;
            match state.buffer.row(filerow) {
                Some(row) => {
                    let span = selection.and_then(|(start, end)| {
                        selected_render_span(row, start.row, start.col, end.row, end.col)
                    });
                    draw_row(&mut w, row, &vp, span);
                }
                None if state.buffer.is_empty() && y == text_rows / 3 => {
                    draw_welcome(&mut w, width);
                }
                None => w.print("~"),
            }
            w.clear_line();
        }

        w.move_to(0, text_rows);
        w.push(Command::Reverse);
        w.print(format_status(&compose_status(state), width));
        w.push(Command::ResetAttributes);

        w.move_to(0, text_rows + 1);
        w.print(message_line(state, width));
        w.clear_line();

        let cy = state.cursor.row.saturating_sub(vp.first_line);
        let cx = state.rx().saturating_sub(vp.first_col);
        w.move_to(clamp_u16(cx), clamp_u16(cy));
        w.push(Command::ShowCursor);
        w
    }
}

fn clamp_u16(v: usize) -> u16 {
    u16::try_from(v).unwrap_or(u16::MAX)
}

fn draw_welcome(w: &mut Writer, width: usize) {
    let welcome = format!("Dim editor -- version {VERSION}");
    let shown: String = welcome.chars().take(width).collect();
    let mut padding = (width - shown.len()) / 2;
    if padding > 0 {
        w.print("~");
        padding -= 1;
    }
    w.print(" ".repeat(padding));
    w.print(shown);
}

/// Half-open render-column range of `row` covered by the inclusive raw
/// selection `(start_row, start_col) ..= (end_row, end_col)`.
fn selected_render_span(
    row: &Row,
    start_row: usize,
    start_col: usize,
    end_row: usize,
    end_col: usize,
) -> Option<(usize, usize)> {
    if row.index < start_row || row.index > end_row {
        return None;
    }
    let lo = if row.index == start_row {
        row.cx_to_rx(start_col)
    } else {
        0
    };
    let hi = if row.index == end_row {
        row.cx_to_rx(end_col + 1)
    } else {
        row.render.len()
    };
    (lo < hi).then_some((lo, hi))
}

/// Emit the visible slice of one row. Style changes flush the pending byte
/// run so multi-byte text inside a run stays intact.
fn draw_row(w: &mut Writer, row: &Row, vp: &Viewport, selection: Option<(usize, usize)>) {
    let end = (vp.first_col + vp.width).min(row.render.len());
    let mut run: Vec<u8> = Vec::new();
    let mut current: Option<Color> = None;
    let mut selected = false;

    for rx in vp.first_col..end {
        let b = row.render[rx];
        let in_sel = selection.is_some_and(|(lo, hi)| rx >= lo && rx < hi);
        if in_sel != selected {
            flush_run(w, &mut run);
            if in_sel {
                w.push(Command::Reverse);
            } else {
                w.push(Command::ResetAttributes);
                current = None;
            }
            selected = in_sel;
        }

        if let Some(sym) = control_symbol(b) {
            flush_run(w, &mut run);
            w.push(Command::Reverse);
            w.print(sym.to_string());
            w.push(Command::ResetAttributes);
            current = None;
            if selected {
                w.push(Command::Reverse);
            }
            continue;
        }

        let color = highlight_color(row.hl.get(rx).copied().unwrap_or_default());
        if color != current {
            flush_run(w, &mut run);
            w.push(match color {
                Some(c) => Command::Foreground(c),
                None => Command::ResetColor,
            });
            current = color;
        }
        run.push(b);
    }
    flush_run(w, &mut run);
    if current.is_some() {
        w.push(Command::ResetColor);
    }
    if selected {
        w.push(Command::ResetAttributes);
    }
}

fn flush_run(w: &mut Writer, run: &mut Vec<u8>) {
    if !run.is_empty() {
        w.print(String::from_utf8_lossy(run).into_owned());
        run.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_state::Buffer;

    fn engine_frame(lines: &[&str], cols: u16, rows: u16) -> (EditorState, Writer) {
        let mut st = EditorState::new(Buffer::from_lines(lines.iter().copied()));
        let w = RenderEngine::new().compose(&mut st, cols, rows);
        (st, w)
    }

    #[test]
    fn screen_rows_exclude_chrome() {
        let (st, _) = engine_frame(&["a"], 40, 12);
        assert_eq!(st.screen_rows, 10);
    }

    #[test]
    fn empty_buffer_shows_welcome() {
        let mut st = EditorState::new(Buffer::new());
        let w = RenderEngine::new().compose(&mut st, 60, 11);
        assert!(w.text().contains(&format!("Dim editor -- version {VERSION}")));
    }

    #[test]
    fn past_end_rows_are_tildes() {
        let (_, w) = engine_frame(&["only"], 20, 5);
        assert_eq!(w.text().matches('~').count(), 2);
    }

    #[test]
    fn control_bytes_are_inverted() {
        let (_, w) = engine_frame(&["a\x01b"], 20, 4);
        let cmds = w.commands();
        let pos = cmds
            .iter()
            .position(|c| *c == Command::Print("A".into()))
            .expect("control symbol printed");
        assert_eq!(cmds[pos - 1], Command::Reverse);
        assert_eq!(cmds[pos + 1], Command::ResetAttributes);
    }

    #[test]
    fn selection_span_covers_whole_tab() {
        let row = Row::new(0, "\tx");
        assert_eq!(selected_render_span(&row, 0, 0, 0, 0), Some((0, 4)));
        assert_eq!(selected_render_span(&row, 0, 1, 0, 1), Some((4, 5)));
        assert_eq!(selected_render_span(&row, 1, 0, 2, 0), None);
    }
}
