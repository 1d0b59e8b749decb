//! Status bar composition.
//!
//! Two stages, as with the rest of the frame:
//! 1. `compose_status` produces ordered `StatusSegment`s from editor state.
//! 2. `format_status` lays them out into a bar exactly `width` columns wide:
//!    left segments first, right segments flush against the right edge when
//!    they fit, spaces in between.
//!
//! Layout: `<name> - <n> lines <MODE> [(modified)] [<pending>]` on the left,
//! `<filetype|no ft> | <row>/<rows>` on the right.

use core_state::{EditorState, Mode};

const NAME_WIDTH: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusSegment {
    FileName(String),
    LineCount(usize),
    Mode(&'static str),
    Modified,
    /// Count and operator typed so far, e.g. `3d`.
    Pending(String),
    FileType(Option<String>),
    /// 1-based cursor row over the row count.
    Position { row_1: usize, rows: usize },
}

impl StatusSegment {
    fn is_right(&self) -> bool {
        matches!(self, Self::FileType(_) | Self::Position { .. })
    }
}

pub fn compose_status(state: &EditorState) -> Vec<StatusSegment> {
    let mut out = Vec::with_capacity(7);
    out.push(StatusSegment::FileName(state.display_name()));
    out.push(StatusSegment::LineCount(state.buffer.len()));
    out.push(StatusSegment::Mode(mode_label(state.mode)));
    if state.is_dirty() {
        out.push(StatusSegment::Modified);
    }
    let pending = pending_label(state);
    if !pending.is_empty() {
        out.push(StatusSegment::Pending(pending));
    }
    out.push(StatusSegment::FileType(state.filetype().map(str::to_owned)));
    out.push(StatusSegment::Position {
        row_1: state.cursor.row + 1,
        rows: state.buffer.len(),
    });
    out
}

fn mode_label(mode: Mode) -> &'static str {
    match mode {
        Mode::Normal => "NORMAL",
        Mode::Insert => "INSERT",
        Mode::Visual => "VISUAL",
    }
}

fn pending_label(state: &EditorState) -> String {
    let mut s = String::new();
    if state.pending.count > 0 {
        s.push_str(&state.pending.count.to_string());
    }
    if let Some(prefix) = state.pending.prefix {
        s.push(prefix.as_char());
    }
    s
}

pub fn format_status(segments: &[StatusSegment], width: usize) -> String {
    let mut left = String::with_capacity(width);
    let mut right = String::new();
    for seg in segments {
        let target = if seg.is_right() { &mut right } else { &mut left };
        match seg {
            StatusSegment::FileName(name) => {
                target.extend(name.chars().take(NAME_WIDTH));
            }
            StatusSegment::LineCount(n) => {
                target.push_str(&format!(" - {n} lines"));
            }
            StatusSegment::Mode(m) => {
                target.push(' ');
                target.push_str(m);
            }
            StatusSegment::Modified => target.push_str(" (modified)"),
            StatusSegment::Pending(p) => {
                target.push(' ');
                target.push_str(p);
            }
            StatusSegment::FileType(ft) => {
                target.push_str(ft.as_deref().unwrap_or("no ft"));
            }
            StatusSegment::Position { row_1, rows } => {
                target.push_str(&format!(" | {row_1}/{rows}"));
            }
        }
    }

    let mut bar: String = left.chars().take(width).collect();
    let mut len = bar.chars().count();
    let rlen = right.chars().count();
    while len < width {
        if width - len == rlen {
            bar.push_str(&right);
            break;
        }
        bar.push(' ');
        len += 1;
    }
    bar
}

/// Message bar text, truncated to `width`; empty when nothing is live.
pub fn message_line(state: &EditorState, width: usize) -> String {
    state
        .status_message()
        .map(|m| m.chars().take(width).collect())
        .unwrap_or_default()
}
