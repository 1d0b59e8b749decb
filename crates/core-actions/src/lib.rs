//! Modal command interpreter.
//!
//! Keys flow through two stages: `key_translator` folds counts, prefixes and
//! the Insert-mode double-tap escape into a single `Action`, then
//! `dispatcher::dispatch` applies it to the `EditorState`. Commands that
//! need more input (the `f`/`t` target, prompts) pull it from the `Host`
//! mid-dispatch; that blocking read is the only suspension point.

use std::time::Instant;

use anyhow::Result;
use core_events::{KeyEvent, KeySource};
use core_state::{Direction, EditorState};
use tracing::trace;

pub mod dispatcher;
pub mod io_ops;
pub mod key_translator;
pub mod prompt;

pub use dispatcher::{DispatchResult, dispatch};
pub use io_ops::{FsLineStore, IoError, LineStore};
pub use key_translator::translate_key;

/// Cursor motions. Counted motions repeat the single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionKind {
    Left,
    Right,
    Up,
    Down,
    WordForward,
    LineStart,
    /// Past the last byte.
    LineEnd,
    /// On the last byte.
    LineLast,
    BufferStart,
    BufferEnd,
    PageUp,
    PageDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeChange {
    EnterInsert,
    /// `a`/`A`: move past the last byte, then Insert.
    AppendEnd,
    /// `o`: open a row below, then Insert.
    OpenBelow,
    /// Esc / Ctrl-L: snapshot, back to Normal.
    LeaveInsert,
    /// Second half of the escape sequence: drop the speculative byte first.
    DoubleTapEscape,
    EnterVisual,
    LeaveVisual,
}

/// Insert-mode text mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    InsertChar(char),
    Newline,
    Backspace,
    /// Delete key: step right, then backspace.
    DeleteForward,
    Tab,
}

/// Operator carried by a `c`/`d` prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Change,
    Delete,
}

impl Operator {
    pub fn enters_insert(self) -> bool {
        matches!(self, Operator::Change)
    }
}

/// Span an operator applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorTarget {
    /// `cw`/`dw`: cursor to end of word.
    WordEnd,
    /// `ciw`: the whole word under the cursor.
    InnerWord,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Motion { kind: MotionKind, count: usize },
    ModeChange(ModeChange),
    Edit(EditKind),
    ApplyOperator { op: Operator, target: OperatorTarget },
    /// `f`/`t`; the target byte is read from the host during dispatch.
    FindChar { till: bool, op: Option<Operator> },
    DeleteChars { count: usize },
    DeleteLines { count: usize },
    YankLine,
    Paste,
    MatchBrace,
    VisualYank,
    VisualDelete,
    Undo,
    SearchPrompt,
    SearchNext(Direction),
    SearchWord,
    CommandLine,
    Save,
    Quit,
}

/// What the interpreter needs from its surroundings: keys, a way to redraw
/// while a prompt is open, and file access.
pub trait Host: KeySource {
    fn refresh(&mut self, state: &mut EditorState) -> Result<()>;
    fn line_store(&mut self) -> &mut dyn LineStore;
}

/// Translate and dispatch one key.
pub fn handle_key(state: &mut EditorState, host: &mut dyn Host, key: KeyEvent) -> Result<DispatchResult> {
    handle_key_at(state, host, key, Instant::now())
}

/// `handle_key` with an explicit clock reading for the escape window.
pub fn handle_key_at(
    state: &mut EditorState,
    host: &mut dyn Host,
    key: KeyEvent,
    now: Instant,
) -> Result<DispatchResult> {
    let action = translate_key(state, &key, now);
    trace!(target: "actions.translate", %key, mode = state.mode.as_str(), ?action, "translated");
    if !matches!(action, Some(Action::Quit)) {
        state.rearm_quit();
    }
    match action {
        Some(action) => dispatch(action, state, host),
        None => Ok(DispatchResult::dirty()),
    }
}
