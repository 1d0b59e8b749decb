//! Dispatcher applying `Action` to mutable editor state.
//!
//! Decomposed by concern:
//! * `motion`  - cursor movement, count repetition, visual end mark
//! * `mode`    - Normal / Insert / Visual transitions
//! * `edit`    - text mutation (insert, delete, operators, paste)
//! * `visual`  - selection yank / delete
//! * `search`  - incremental prompt, `n`/`N`, `*`
//! * `command` - ex command line, save, quit
//! * `undo`    - snapshot restore
//!
//! Destructive actions push an undo snapshot immediately before mutating.

use anyhow::Result;
use core_state::EditorState;
use tracing::debug;

use crate::{Action, Host};

mod command;
mod command_parser;
mod edit;
mod mode;
mod motion;
mod search;
mod undo;
mod visual;

pub use command_parser::{CommandParser, ParsedCommand};

/// Result of dispatching a single `Action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchResult {
    pub dirty: bool,
    pub quit: bool,
    /// The whole buffer was replaced (`:e`, undo).
    pub buffer_replaced: bool,
}

impl DispatchResult {
    pub fn dirty() -> Self {
        Self {
            dirty: true,
            quit: false,
            buffer_replaced: false,
        }
    }
    pub fn clean() -> Self {
        Self {
            dirty: false,
            quit: false,
            buffer_replaced: false,
        }
    }
    pub fn quit() -> Self {
        Self {
            dirty: true,
            quit: true,
            buffer_replaced: false,
        }
    }
    pub fn buffer_replaced() -> Self {
        Self {
            dirty: true,
            quit: false,
            buffer_replaced: true,
        }
    }
}

/// Apply an action to editor state. Returns whether a render is needed
/// (`dirty`) or the editor should exit (`quit`).
pub fn dispatch(action: Action, state: &mut EditorState, host: &mut dyn Host) -> Result<DispatchResult> {
    debug!(target: "actions.dispatch", ?action, mode = state.mode.as_str(), "dispatch");
    let result = match action {
        Action::Motion { kind, count } => motion::handle_motion(kind, count, state),
        Action::MatchBrace => motion::handle_match_brace(state),
        Action::FindChar { till, op } => return edit::handle_find_char(till, op, state, host),
        Action::ModeChange(mc) => mode::handle_mode_change(mc, state),
        Action::Edit(kind) => edit::handle_edit(kind, state),
        Action::ApplyOperator { op, target } => edit::handle_operator(op, target, state),
        Action::DeleteChars { count } => edit::handle_delete_chars(count, state),
        Action::DeleteLines { count } => edit::handle_delete_lines(count, state),
        Action::YankLine => edit::handle_yank_line(state),
        Action::Paste => edit::handle_paste(state),
        Action::VisualYank => visual::handle_yank(state),
        Action::VisualDelete => visual::handle_delete(state),
        Action::Undo => undo::handle_undo(state),
        Action::SearchPrompt => return search::handle_prompt(state, host),
        Action::SearchNext(direction) => search::handle_next(direction, state),
        Action::SearchWord => search::handle_word(state),
        Action::CommandLine => return command::handle_command_line(state, host),
        Action::Save => return command::handle_save(state, host),
        Action::Quit => command::handle_quit(state),
    };
    Ok(result)
}
