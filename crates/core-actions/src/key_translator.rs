//! Stateful key -> `Action` translation.
//!
//! All translation state lives on `EditorState` (`pending` prefix/count and
//! `pending_escape`), so the translator itself is a free function.
//!
//! Normal mode precedence:
//! * digits accumulate the count (`0` only once a count is started)
//! * a pending prefix resolves against the next key
//! * `c`/`d`/`g`/`y` become the pending prefix, keeping the count
//! * everything else maps directly; the pending state is consumed either way

use std::time::Instant;

use core_events::{KeyCode, KeyEvent};
use core_state::{Direction, EditorState, Mode, PendingEscape, Prefix};
use tracing::trace;

use crate::{Action, EditKind, ModeChange, MotionKind, Operator, OperatorTarget};

pub fn translate_key(state: &mut EditorState, key: &KeyEvent, now: Instant) -> Option<Action> {
    match state.mode {
        Mode::Normal => translate_normal(state, key),
        Mode::Insert => translate_insert(state, key, now),
        Mode::Visual => translate_visual(key),
    }
}

/// Movement keys shared by Normal and Visual mode.
fn movement(key: &KeyEvent) -> Option<MotionKind> {
    let kind = match key.code {
        KeyCode::Left => MotionKind::Left,
        KeyCode::Right => MotionKind::Right,
        KeyCode::Up => MotionKind::Up,
        KeyCode::Down => MotionKind::Down,
        KeyCode::Home => MotionKind::LineStart,
        KeyCode::End => MotionKind::LineLast,
        KeyCode::PageUp => MotionKind::PageUp,
        KeyCode::PageDown => MotionKind::PageDown,
        _ => match key.printable()? {
            'h' => MotionKind::Left,
            'l' => MotionKind::Right,
            'k' => MotionKind::Up,
            'j' => MotionKind::Down,
            'w' => MotionKind::WordForward,
            '0' => MotionKind::LineStart,
            '$' => MotionKind::LineLast,
            'G' => MotionKind::BufferEnd,
            _ => return None,
        },
    };
    Some(kind)
}

fn prefix_for(c: char) -> Option<Prefix> {
    match c {
        'c' => Some(Prefix::Change),
        'd' => Some(Prefix::Delete),
        'g' => Some(Prefix::Go),
        'y' => Some(Prefix::Yank),
        _ => None,
    }
}

fn translate_normal(state: &mut EditorState, key: &KeyEvent) -> Option<Action> {
    if key.is_ctrl('s') {
        state.pending.clear();
        return Some(Action::Save);
    }
    if key.is_ctrl('q') {
        state.pending.clear();
        return Some(Action::Quit);
    }
    let ch = key.printable();
    if let Some(d) = ch.and_then(|c| c.to_digit(10))
        && (d != 0 || state.pending.count > 0)
    {
        state.pending.push_digit(d);
        trace!(target: "actions.translate", count = state.pending.count, "count_digit");
        return None;
    }
    let pending = state.pending;
    state.pending.clear();
    let count = pending.count_or_one();

    if let Some(prefix) = pending.prefix
        && let Some(action) = resolve_prefix(state, prefix, pending.count, key)
    {
        return action;
    }
    if let Some(p) = ch.and_then(prefix_for) {
        state.pending.prefix = Some(p);
        state.pending.count = pending.count;
        return None;
    }

    if let Some(kind) = movement(key) {
        return Some(Action::Motion { kind, count });
    }
    let action = match ch? {
        'i' => Action::ModeChange(ModeChange::EnterInsert),
        'a' | 'A' => Action::ModeChange(ModeChange::AppendEnd),
        'o' => Action::ModeChange(ModeChange::OpenBelow),
        'v' => Action::ModeChange(ModeChange::EnterVisual),
        'x' => Action::DeleteChars { count },
        'p' => Action::Paste,
        'u' => Action::Undo,
        '%' => Action::MatchBrace,
        '/' => Action::SearchPrompt,
        'n' => Action::SearchNext(Direction::Forward),
        'N' => Action::SearchNext(Direction::Backward),
        '*' => Action::SearchWord,
        ':' => Action::CommandLine,
        'f' => Action::FindChar { till: false, op: None },
        't' => Action::FindChar { till: true, op: None },
        _ => return None,
    };
    Some(action)
}

/// Resolve the key following a prefix. `Some(result)` consumes the key;
/// `None` lets it fall through to plain Normal-mode handling.
fn resolve_prefix(
    state: &mut EditorState,
    prefix: Prefix,
    count: usize,
    key: &KeyEvent,
) -> Option<Option<Action>> {
    let ch = key.printable()?;
    let op = match prefix {
        Prefix::Change | Prefix::ChangeInner => Some(Operator::Change),
        Prefix::Delete => Some(Operator::Delete),
        Prefix::Go | Prefix::Yank => None,
    };
    let resolved = match (prefix, ch) {
        (Prefix::Delete, 'd') => Some(Action::DeleteLines {
            count: count.max(1),
        }),
        (Prefix::Yank, 'y') => Some(Action::YankLine),
        (Prefix::Go, 'g') => Some(Action::Motion {
            kind: MotionKind::BufferStart,
            count: 1,
        }),
        (Prefix::Change, 'i') => {
            state.pending.prefix = Some(Prefix::ChangeInner);
            None
        }
        (Prefix::ChangeInner, 'w') => Some(Action::ApplyOperator {
            op: Operator::Change,
            target: OperatorTarget::InnerWord,
        }),
        (Prefix::Change | Prefix::Delete, 'w') => op.map(|op| Action::ApplyOperator {
            op,
            target: OperatorTarget::WordEnd,
        }),
        (Prefix::Go | Prefix::Yank, 'w') => None,
        (Prefix::Change | Prefix::Delete, 'f' | 't') => Some(Action::FindChar {
            till: ch == 't',
            op,
        }),
        _ => return None,
    };
    Some(resolved)
}

fn translate_insert(state: &mut EditorState, key: &KeyEvent, now: Instant) -> Option<Action> {
    if let Some(esc) = state.settings.escape_char
        && key.printable() == Some(esc)
    {
        let timeout = state.settings.escape_timeout;
        let armed = state
            .pending_escape
            .is_some_and(|p| p.key == esc && now.saturating_duration_since(p.at) < timeout);
        if armed {
            state.pending_escape = None;
            return Some(Action::ModeChange(ModeChange::DoubleTapEscape));
        }
        state.pending_escape = Some(PendingEscape { key: esc, at: now });
        return Some(Action::Edit(EditKind::InsertChar(esc)));
    }
    state.pending_escape = None;

    if key.is_ctrl('q') {
        return Some(Action::Quit);
    }
    if key.is_ctrl('s') {
        return Some(Action::Save);
    }
    if key.is_ctrl('h') {
        return Some(Action::Edit(EditKind::Backspace));
    }
    if key.is_ctrl('l') {
        return Some(Action::ModeChange(ModeChange::LeaveInsert));
    }
    if key.is_ctrl('f') {
        return Some(Action::SearchPrompt);
    }
    let motion = |kind| Some(Action::Motion { kind, count: 1 });
    match key.code {
        KeyCode::Enter => Some(Action::Edit(EditKind::Newline)),
        KeyCode::Esc => Some(Action::ModeChange(ModeChange::LeaveInsert)),
        KeyCode::Backspace => Some(Action::Edit(EditKind::Backspace)),
        KeyCode::Delete => Some(Action::Edit(EditKind::DeleteForward)),
        KeyCode::Tab => Some(Action::Edit(EditKind::Tab)),
        KeyCode::Left => motion(MotionKind::Left),
        KeyCode::Right => motion(MotionKind::Right),
        KeyCode::Up => motion(MotionKind::Up),
        KeyCode::Down => motion(MotionKind::Down),
        KeyCode::Home => motion(MotionKind::LineStart),
        KeyCode::End => motion(MotionKind::LineEnd),
        KeyCode::PageUp => motion(MotionKind::PageUp),
        KeyCode::PageDown => motion(MotionKind::PageDown),
        KeyCode::Char(_) => key.printable().map(|c| Action::Edit(EditKind::InsertChar(c))),
    }
}

fn translate_visual(key: &KeyEvent) -> Option<Action> {
    if key.code == KeyCode::Esc {
        return Some(Action::ModeChange(ModeChange::LeaveVisual));
    }
    if let Some(kind) = movement(key) {
        return Some(Action::Motion { kind, count: 1 });
    }
    let action = match key.printable()? {
        'v' => Action::ModeChange(ModeChange::LeaveVisual),
        'y' => Action::VisualYank,
        'x' | 'd' => Action::VisualDelete,
        '%' => Action::MatchBrace,
        _ => return None,
    };
    Some(action)
}
