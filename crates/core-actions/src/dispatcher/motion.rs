//! Cursor movement semantics.
//!
//! Every motion ends with the column clamp; in Visual mode the end mark then
//! follows the cursor.

use core_state::{EditorState, Mode};
use core_text::motion;

use super::DispatchResult;
use crate::MotionKind;

pub(crate) fn handle_motion(kind: MotionKind, count: usize, state: &mut EditorState) -> DispatchResult {
    for _ in 0..count.max(1) {
        apply_once(kind, state);
    }
    finish(state);
    DispatchResult::dirty()
}

pub(crate) fn handle_match_brace(state: &mut EditorState) -> DispatchResult {
    let rows = state.buffer.rows();
    if !motion::matching_brace(rows, &mut state.cursor) {
        return DispatchResult::clean();
    }
    finish(state);
    DispatchResult::dirty()
}

fn finish(state: &mut EditorState) {
    state.clamp_cursor();
    if state.mode == Mode::Visual {
        state.set_visual_end();
    }
}

fn apply_once(kind: MotionKind, state: &mut EditorState) {
    let rows = state.buffer.rows();
    let pos = &mut state.cursor;
    match kind {
        MotionKind::Left => motion::left(rows, pos),
        MotionKind::Right => motion::right(rows, pos),
        MotionKind::Up => motion::up(rows, pos),
        MotionKind::Down => motion::down(rows, pos),
        MotionKind::WordForward => motion::word_forward(rows, pos),
        MotionKind::LineStart => motion::line_start(rows, pos),
        MotionKind::LineEnd => motion::line_end(rows, pos),
        MotionKind::LineLast => motion::line_last(rows, pos),
        MotionKind::BufferStart => motion::buffer_start(rows, pos),
        MotionKind::BufferEnd => motion::buffer_end(rows, pos),
        MotionKind::PageUp | MotionKind::PageDown => page(kind, state),
    }
}

/// Jump to the top (or bottom) of the screen, then step a full screen.
fn page(kind: MotionKind, state: &mut EditorState) {
    let screen = state.screen_rows.max(1);
    let rows = state.buffer.rows();
    if kind == MotionKind::PageUp {
        state.cursor.row = state.row_offset.min(rows.len());
    } else {
        state.cursor.row = (state.row_offset + screen - 1).min(rows.len());
    }
    for _ in 0..screen {
        if kind == MotionKind::PageUp {
            motion::up(rows, &mut state.cursor);
        } else {
            motion::down(rows, &mut state.cursor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_state::Buffer;
    use core_text::Position;

    #[test]
    fn counted_motion_repeats() {
        let mut st = EditorState::new(Buffer::from_lines(["a", "b", "c", "d"]));
        handle_motion(MotionKind::Down, 2, &mut st);
        assert_eq!(st.cursor, Position::new(2, 0));
        handle_motion(MotionKind::Down, 10, &mut st);
        assert_eq!(st.cursor, Position::new(3, 0));
    }

    #[test]
    fn visual_end_follows_motion() {
        let mut st = EditorState::new(Buffer::from_lines(["hello world"]));
        st.start_visual();
        handle_motion(MotionKind::WordForward, 1, &mut st);
        let sel = st.selection.unwrap();
        assert_eq!(sel.start, Position::origin());
        assert_eq!(sel.end, Position::new(0, 6));
    }

    #[test]
    fn brace_failure_is_clean() {
        let mut st = EditorState::new(Buffer::from_lines(["(x"]));
        assert_eq!(handle_match_brace(&mut st), DispatchResult::clean());
        assert_eq!(st.cursor, Position::origin());
    }

    #[test]
    fn page_down_moves_by_screen() {
        let lines: Vec<String> = (0..50).map(|i| i.to_string()).collect();
        let mut st = EditorState::new(Buffer::from_lines(lines));
        st.screen_rows = 10;
        handle_motion(MotionKind::PageDown, 1, &mut st);
        assert_eq!(st.cursor.row, 19);
        st.row_offset = 10;
        handle_motion(MotionKind::PageUp, 1, &mut st);
        assert_eq!(st.cursor.row, 0);
    }
}
