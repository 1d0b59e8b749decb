//! Line input collected in the message bar.
//!
//! The template's `%s` is replaced by the text typed so far. The callback sees
//! the text and the key after every keystroke, confirm and cancel included.

use anyhow::Result;
use core_events::{KeyCode, KeyEvent};
use core_state::EditorState;

use crate::Host;

pub fn collect<F>(
    state: &mut EditorState,
    host: &mut dyn Host,
    template: &str,
    mut on_key: F,
) -> Result<Option<String>>
where
    F: FnMut(&mut EditorState, &str, &KeyEvent),
{
    let mut input = String::new();
    loop {
        state.set_status(template.replacen("%s", &input, 1));
        host.refresh(state)?;
        let key = host.read_key()?;
        match key.code {
            KeyCode::Backspace | KeyCode::Delete => {
                input.pop();
            }
            _ if key.is_ctrl('h') => {
                input.pop();
            }
            KeyCode::Esc => {
                state.ephemeral_status = None;
                on_key(state, &input, &key);
                return Ok(None);
            }
            KeyCode::Enter if !input.is_empty() => {
                state.ephemeral_status = None;
                on_key(state, &input, &key);
                return Ok(Some(input));
            }
            _ => {
                if let Some(c) = key.printable().filter(char::is_ascii) {
                    input.push(c);
                }
            }
        }
        on_key(state, &input, &key);
    }
}

/// `collect` without a per-key callback.
pub fn collect_line(state: &mut EditorState, host: &mut dyn Host, template: &str) -> Result<Option<String>> {
    collect(state, host, template, |_, _, _| {})
}
