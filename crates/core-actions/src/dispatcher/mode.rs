//! Mode transitions.
//!
//! Leaving Insert pushes an undo snapshot so the typed run can be undone as
//! one step.

use core_state::{EditorState, Mode};
use core_text::motion;

use super::DispatchResult;
use crate::ModeChange;

pub(crate) fn handle_mode_change(mc: ModeChange, state: &mut EditorState) -> DispatchResult {
    match mc {
        ModeChange::EnterInsert => state.set_mode(Mode::Insert),
        ModeChange::AppendEnd => {
            motion::line_end(state.buffer.rows(), &mut state.cursor);
            state.set_mode(Mode::Insert);
        }
        ModeChange::OpenBelow => {
            let at = (state.cursor.row + 1).min(state.buffer.len());
            state.buffer.insert_row(at, Vec::new());
            state.cursor = core_text::Position::new(at, 0);
            state.set_mode(Mode::Insert);
        }
        ModeChange::LeaveInsert => {
            state.push_undo_snapshot();
            state.set_mode(Mode::Normal);
        }
        ModeChange::DoubleTapEscape => {
            state.buffer.delete_char_before(&mut state.cursor);
            state.push_undo_snapshot();
            state.set_mode(Mode::Normal);
        }
        ModeChange::EnterVisual => state.start_visual(),
        ModeChange::LeaveVisual => state.set_mode(Mode::Normal),
    }
    DispatchResult::dirty()
}
