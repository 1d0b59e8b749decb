//! Search: incremental `/` prompt, `n`/`N` continuation and `*`.

use anyhow::Result;
use core_events::KeyCode;
use core_state::{Direction, EditorState, IncrementalSearch, SearchStep, search};
use tracing::debug;

use super::DispatchResult;
use crate::{Host, prompt};

const PROMPT: &str = "Search: %s (Use ESC/Arrows/Enter)";

pub(crate) fn handle_prompt(state: &mut EditorState, host: &mut dyn Host) -> Result<DispatchResult> {
    let saved_cursor = state.cursor;
    let saved_offset = state.row_offset;
    let mut inc = IncrementalSearch::new();
    let query = prompt::collect(state, host, PROMPT, |st, query, key| {
        let step = match key.code {
            KeyCode::Enter => SearchStep::Confirm,
            KeyCode::Esc => SearchStep::Cancel,
            KeyCode::Right | KeyCode::Down => SearchStep::Forward,
            KeyCode::Left | KeyCode::Up => SearchStep::Backward,
            _ => SearchStep::Edit,
        };
        inc.step(&mut st.buffer, &mut st.cursor, query.as_bytes(), step);
    })?;
    match query {
        Some(q) => {
            debug!(target: "actions.dispatch", query = %q, row = ?inc.last_match(), "search_confirmed");
            state.search.query = Some(q.into_bytes());
            state.search.last_row = inc.last_match();
            state.search.direction = inc.direction();
        }
        None => {
            state.cursor = saved_cursor;
            state.row_offset = saved_offset;
        }
    }
    state.clamp_cursor();
    Ok(DispatchResult::dirty())
}

pub(crate) fn handle_next(direction: Direction, state: &mut EditorState) -> DispatchResult {
    state.search.direction = direction;
    let rows = state.buffer.rows();
    if state.search.next(rows, &mut state.cursor) {
        DispatchResult::dirty()
    } else {
        DispatchResult::clean()
    }
}

/// `*`: search forward from the cursor row for the word under the cursor.
pub(crate) fn handle_word(state: &mut EditorState) -> DispatchResult {
    let Some(word) = search::word_under_cursor(state.buffer.rows(), state.cursor) else {
        return DispatchResult::clean();
    };
    state.search.query = Some(word);
    state.search.last_row = Some(state.cursor.row);
    handle_next(Direction::Forward, state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_state::Buffer;
    use core_text::Position;

    #[test]
    fn star_jumps_to_next_row_with_word() {
        let mut st = EditorState::new(Buffer::from_lines(["foo x", "bar", "x foo", "foo"]));
        handle_word(&mut st);
        assert_eq!(st.cursor, Position::new(2, 2));
        handle_next(Direction::Forward, &mut st);
        assert_eq!(st.cursor, Position::new(3, 0));
        handle_next(Direction::Backward, &mut st);
        assert_eq!(st.cursor, Position::new(2, 2));
    }

    #[test]
    fn star_on_punctuation_is_noop() {
        let mut st = EditorState::new(Buffer::from_lines(["(foo)"]));
        assert_eq!(handle_word(&mut st), DispatchResult::clean());
        assert!(st.search.query.is_none());
    }

    #[test]
    fn star_wraps_to_own_row() {
        let mut st = EditorState::new(Buffer::from_lines(["a foo", "b"]));
        st.cursor.col = 3;
        handle_word(&mut st);
        assert_eq!(st.cursor, Position::new(0, 2));
    }
}
