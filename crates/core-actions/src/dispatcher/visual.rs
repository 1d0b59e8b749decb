//! Visual selection consumers. Marks are normalized here, never before.

use core_state::{EditorState, Mode};

use super::DispatchResult;

pub(crate) fn handle_yank(state: &mut EditorState) -> DispatchResult {
    let Some(sel) = state.selection else {
        state.set_mode(Mode::Normal);
        return DispatchResult::dirty();
    };
    state.clipboard = state.buffer.span_text(sel.start, sel.end);
    let msg = format!("Yanked {} chars", state.clipboard.len());
    state.set_status(msg);
    state.set_mode(Mode::Normal);
    DispatchResult::dirty()
}

pub(crate) fn handle_delete(state: &mut EditorState) -> DispatchResult {
    let Some(sel) = state.selection else {
        state.set_mode(Mode::Normal);
        return DispatchResult::dirty();
    };
    state.push_undo_snapshot();
    if let Some(start) = state.buffer.delete_span(sel.start, sel.end) {
        state.cursor = start;
    }
    state.set_mode(Mode::Normal);
    state.clamp_cursor();
    DispatchResult::dirty()
}
