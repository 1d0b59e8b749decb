//! Text mutation: Insert-mode typing, Normal-mode deletions, operators and
//! the clipboard.

use anyhow::Result;
use core_state::{EditorState, Mode};
use core_text::{TAB_STOP, motion};
use tracing::trace;

use super::DispatchResult;
use crate::{EditKind, Host, Operator, OperatorTarget};

pub(crate) fn handle_edit(kind: EditKind, state: &mut EditorState) -> DispatchResult {
    let buf = &mut state.buffer;
    let pos = &mut state.cursor;
    match kind {
        EditKind::InsertChar(c) => {
            let mut utf8 = [0u8; 4];
            for &b in c.encode_utf8(&mut utf8).as_bytes() {
                buf.insert_char(pos, b);
            }
        }
        EditKind::Newline => buf.insert_newline(pos),
        EditKind::Backspace => buf.delete_char_before(pos),
        EditKind::DeleteForward => {
            motion::right(buf.rows(), pos);
            buf.delete_char_before(pos);
        }
        EditKind::Tab => {
            if buf.any_row_contains(b'\t') {
                buf.insert_char(pos, b'\t');
            } else {
                for _ in 0..TAB_STOP {
                    buf.insert_char(pos, b' ');
                }
            }
        }
    }
    DispatchResult::dirty()
}

fn finish_operator(op: Operator, state: &mut EditorState) {
    state.clamp_cursor();
    if op.enters_insert() {
        state.set_mode(Mode::Insert);
    }
}

pub(crate) fn handle_operator(
    op: Operator,
    target: OperatorTarget,
    state: &mut EditorState,
) -> DispatchResult {
    state.push_undo_snapshot();
    let changed = match target {
        OperatorTarget::WordEnd => state.buffer.delete_to_word_end(&mut state.cursor),
        OperatorTarget::InnerWord => state.buffer.delete_surrounding_word(&mut state.cursor),
    };
    trace!(target: "actions.dispatch", ?op, ?target, changed, "operator");
    finish_operator(op, state);
    DispatchResult::dirty()
}

/// `f`/`t`, optionally under `c`/`d`. Reads the target byte from the host.
pub(crate) fn handle_find_char(
    till: bool,
    op: Option<Operator>,
    state: &mut EditorState,
    host: &mut dyn Host,
) -> Result<DispatchResult> {
    let key = host.read_key()?;
    let Some(target) = key.printable().filter(char::is_ascii) else {
        return Ok(DispatchResult::clean());
    };
    let target = target as u8;
    let Some(op) = op else {
        let moved = motion::find_char(state.buffer.rows(), &mut state.cursor, target, till);
        return Ok(if moved {
            DispatchResult::dirty()
        } else {
            DispatchResult::clean()
        });
    };
    let Some(end) = state.buffer.till_target(state.cursor, target, !till) else {
        return Ok(DispatchResult::clean());
    };
    state.push_undo_snapshot();
    let (row, col) = (state.cursor.row, state.cursor.col);
    state.buffer.row_delete_span(row, col, end);
    finish_operator(op, state);
    Ok(DispatchResult::dirty())
}

pub(crate) fn handle_delete_chars(count: usize, state: &mut EditorState) -> DispatchResult {
    if state.cursor.row >= state.buffer.len() {
        return DispatchResult::clean();
    }
    state.push_undo_snapshot();
    for _ in 0..count.max(1) {
        state.buffer.delete_char_at(&mut state.cursor);
    }
    state.clamp_cursor();
    DispatchResult::dirty()
}

pub(crate) fn handle_delete_lines(count: usize, state: &mut EditorState) -> DispatchResult {
    if state.cursor.row >= state.buffer.len() {
        return DispatchResult::clean();
    }
    state.push_undo_snapshot();
    let deleted = state.buffer.delete_lines(&mut state.cursor, count);
    trace!(target: "actions.dispatch", count, deleted, "delete_lines");
    state.clamp_cursor();
    DispatchResult::dirty()
}

pub(crate) fn handle_yank_line(state: &mut EditorState) -> DispatchResult {
    let Some(row) = state.buffer.row(state.cursor.row) else {
        return DispatchResult::clean();
    };
    state.clipboard = row.raw.clone();
    let msg = format!("Yanked line: {} chars", state.clipboard.len());
    state.set_status(msg);
    DispatchResult::dirty()
}

pub(crate) fn handle_paste(state: &mut EditorState) -> DispatchResult {
    if state.clipboard.is_empty() {
        state.set_status("Clipboard is empty");
        return DispatchResult::dirty();
    }
    state.push_undo_snapshot();
    let text = state.clipboard.clone();
    state.buffer.paste_below(&mut state.cursor, &text);
    state.clamp_cursor();
    DispatchResult::dirty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_state::Buffer;
    use core_text::Position;

    fn texts(state: &EditorState) -> Vec<String> {
        state.buffer.rows().iter().map(|r| r.text().into_owned()).collect()
    }

    #[test]
    fn tab_follows_buffer_convention() {
        let mut st = EditorState::new(Buffer::from_lines(["x"]));
        handle_edit(EditKind::Tab, &mut st);
        assert_eq!(texts(&st), vec!["    x"]);
        let mut st = EditorState::new(Buffer::from_lines(["\ty", "x"]));
        st.cursor = Position::new(1, 0);
        handle_edit(EditKind::Tab, &mut st);
        assert_eq!(texts(&st), vec!["\ty", "\tx"]);
    }

    #[test]
    fn delete_forward_merges_at_row_end() {
        let mut st = EditorState::new(Buffer::from_lines(["ab", "cd"]));
        st.cursor = Position::new(0, 2);
        handle_edit(EditKind::DeleteForward, &mut st);
        assert_eq!(texts(&st), vec!["abcd"]);
        assert_eq!(st.cursor, Position::new(0, 2));
        handle_edit(EditKind::DeleteForward, &mut st);
        assert_eq!(texts(&st), vec!["abd"]);
    }

    #[test]
    fn change_word_enters_insert() {
        let mut st = EditorState::new(Buffer::from_lines(["foo bar"]));
        handle_operator(Operator::Change, OperatorTarget::WordEnd, &mut st);
        assert_eq!(texts(&st), vec![" bar"]);
        assert_eq!(st.mode, Mode::Insert);
        assert_eq!(st.undo_depth(), 1);
    }

    #[test]
    fn x_with_count_uses_one_snapshot() {
        let mut st = EditorState::new(Buffer::from_lines(["abcdef"]));
        st.cursor.col = 1;
        handle_delete_chars(3, &mut st);
        assert_eq!(texts(&st), vec!["aef"]);
        assert_eq!(st.undo_depth(), 1);
    }

    #[test]
    fn yank_then_paste_below() {
        let mut st = EditorState::new(Buffer::from_lines(["one", "two"]));
        handle_paste(&mut st);
        assert_eq!(st.status_message(), Some("Clipboard is empty"));
        assert_eq!(st.undo_depth(), 0);
        handle_yank_line(&mut st);
        assert_eq!(st.status_message(), Some("Yanked line: 3 chars"));
        st.cursor = Position::new(1, 0);
        handle_paste(&mut st);
        assert_eq!(texts(&st), vec!["one", "two", "one"]);
        assert_eq!(st.undo_depth(), 1);
    }
}
