//! Undo dispatch. There is no redo.

use core_state::EditorState;

use super::DispatchResult;

pub(crate) fn handle_undo(state: &mut EditorState) -> DispatchResult {
    let before = state.buffer.len();
    if state.undo() {
        let after = state.buffer.len();
        tracing::trace!(target: "actions.dispatch", op = "undo", buffer_changed = (before != after), "undo");
        state.clamp_cursor();
        DispatchResult::buffer_replaced()
    } else {
        DispatchResult::dirty()
    }
}
