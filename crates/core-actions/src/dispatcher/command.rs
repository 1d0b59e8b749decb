//! Ex command line (`:q`, `:w`, `:wq`, `:e`), save and quit.

use std::path::PathBuf;

use anyhow::Result;
use core_state::EditorState;
use tracing::info;

use super::DispatchResult;
use super::command_parser::{CommandParser, ParsedCommand};
use crate::io_ops::{open_file, write_file};
use crate::{Host, prompt};

pub(crate) fn handle_command_line(state: &mut EditorState, host: &mut dyn Host) -> Result<DispatchResult> {
    let Some(raw) = prompt::collect_line(state, host, "ex: %s")? else {
        return Ok(DispatchResult::dirty());
    };
    let parsed = CommandParser::parse(&raw);
    info!(target: "actions.dispatch", command = ?parsed, "ex_command");
    let result = match parsed {
        ParsedCommand::Quit => DispatchResult::quit(),
        ParsedCommand::Write => {
            save(state, host)?;
            DispatchResult::dirty()
        }
        ParsedCommand::WriteQuit => {
            if save(state, host)? {
                DispatchResult::quit()
            } else {
                DispatchResult::dirty()
            }
        }
        ParsedCommand::Edit(Some(path)) => handle_edit(path, state, host),
        ParsedCommand::Edit(None) => match prompt::collect_line(state, host, "Open file: %s")? {
            Some(path) => handle_edit(PathBuf::from(path), state, host),
            None => DispatchResult::dirty(),
        },
        ParsedCommand::Unknown(cmd) => {
            state.set_status(format!("Unknown command: {cmd}"));
            DispatchResult::dirty()
        }
    };
    Ok(result)
}

fn handle_edit(path: PathBuf, state: &mut EditorState, host: &mut dyn Host) -> DispatchResult {
    if open_file(state, host.line_store(), path) {
        DispatchResult::buffer_replaced()
    } else {
        DispatchResult::dirty()
    }
}

pub(crate) fn handle_save(state: &mut EditorState, host: &mut dyn Host) -> Result<DispatchResult> {
    save(state, host)?;
    Ok(DispatchResult::dirty())
}

/// Save, prompting for a file name when the buffer has none. `Ok(false)`
/// when the prompt was aborted or the write failed.
fn save(state: &mut EditorState, host: &mut dyn Host) -> Result<bool> {
    if state.file_name.is_none() {
        let Some(name) = prompt::collect_line(state, host, "Save as: %s")? else {
            state.set_status("Save aborted!");
            return Ok(false);
        };
        state.file_name = Some(PathBuf::from(name));
        state.select_syntax();
    }
    Ok(write_file(state, host.line_store()))
}

/// Ctrl-Q: a dirty buffer needs `quit_times` extra presses.
pub(crate) fn handle_quit(state: &mut EditorState) -> DispatchResult {
    if state.is_dirty() && state.quit_remaining > 0 {
        let msg = format!(
            "WARNING!!! File has unsaved changes. Press Ctrl-Q {} more times to quit.",
            state.quit_remaining
        );
        state.set_status(msg);
        state.quit_remaining -= 1;
        return DispatchResult::dirty();
    }
    DispatchResult::quit()
}
