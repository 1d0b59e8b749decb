mod common;
use common::*;

use std::path::PathBuf;

use core_events::{KeyCode, KeyEvent};
use core_state::Direction;
use core_text::Highlight;
use pretty_assertions::assert_eq;

#[test]
fn search_prompt_confirms_and_n_continues() {
    let mut h = Harness::new(&["one", "two needle", "three", "needle four"]);
    h.keys("/need\n");
    assert_eq!(h.cursor(), (1, 4));
    assert_eq!(h.state.search.query.as_deref(), Some(&b"need"[..]));
    assert!(h.host.refreshes >= 5);
    assert!(
        h.state
            .buffer
            .rows()
            .iter()
            .all(|r| !r.hl.contains(&Highlight::SearchMatch))
    );
    h.keys("n");
    assert_eq!(h.cursor(), (3, 0));
    h.keys("n");
    assert_eq!(h.cursor(), (1, 4));
    h.keys("N");
    assert_eq!(h.cursor(), (3, 0));
    assert_eq!(h.state.search.direction, Direction::Backward);
}

#[test]
fn search_arrows_step_through_matches() {
    let mut h = Harness::new(&["ab", "ab", "ab"]);
    for c in "/ab".chars() {
        h.queue(KeyEvent::char(c));
    }
    h.queue(KeyEvent::plain(KeyCode::Down))
        .queue(KeyEvent::plain(KeyCode::Down))
        .queue(KeyEvent::plain(KeyCode::Up))
        .code(KeyCode::Enter);
    assert_eq!(h.cursor(), (1, 0));
}

#[test]
fn search_escape_restores_cursor() {
    let mut h = Harness::new(&["abc", "xyz"]);
    h.keys("l/xy\x1b");
    assert_eq!(h.cursor(), (0, 1));
    assert!(h.state.search.query.is_none());
    assert!(h.state.status_message().is_none());
}

#[test]
fn star_searches_word_under_cursor() {
    let mut h = Harness::new(&["let value = 1;", "other", "print(value)"]);
    h.keys("w*");
    assert_eq!(h.cursor(), (2, 6));
}

#[test]
fn ex_write_uses_file_name() {
    let mut h = Harness::new(&["a", "b"]);
    h.state.file_name = Some(PathBuf::from("out.txt"));
    h.state.buffer.mark_dirty();
    h.keys(":w\n");
    assert_eq!(h.host.store.files[&PathBuf::from("out.txt")], b"a\nb\n");
    assert!(!h.state.is_dirty());
    assert_eq!(h.state.status_message(), Some("4 bytes written to disk"));
}

#[test]
fn save_prompts_for_name_and_selects_profile() {
    let mut h = Harness::new(&["int x;"]);
    h.queue(KeyEvent::ctrl('s')).keys("main.c\n");
    assert_eq!(h.state.file_name, Some(PathBuf::from("main.c")));
    assert_eq!(h.state.filetype(), Some("c"));
    assert!(h.host.store.files.contains_key(&PathBuf::from("main.c")));
}

#[test]
fn save_as_cancel_aborts() {
    let mut h = Harness::new(&["x"]);
    h.keys(":w\n\x1b");
    assert_eq!(h.state.status_message(), Some("Save aborted!"));
    assert!(h.host.store.files.is_empty());
}

#[test]
fn save_failure_keeps_dirty() {
    let mut h = Harness::new(&["x"]);
    h.state.file_name = Some(PathBuf::from("ro.txt"));
    h.state.buffer.mark_dirty();
    h.host.store.fail_writes = true;
    h.key(KeyEvent::ctrl('s'));
    assert!(h.state.is_dirty());
    assert!(
        h.state
            .status_message()
            .is_some_and(|m| m.starts_with("Can't save! I/O error: "))
    );
}

#[test]
fn wq_failed_save_does_not_quit() {
    let mut h = Harness::new(&["xy"]);
    h.state.file_name = Some(PathBuf::from("ro.txt"));
    h.host.store.fail_writes = true;
    h.keys("x:wq\n");
    assert!(!h.last.quit);
    assert!(h.state.is_dirty());
    assert!(
        h.state
            .status_message()
            .is_some_and(|m| m.starts_with("Can't save! I/O error: "))
    );
}

#[test]
fn wq_aborted_save_as_does_not_quit() {
    let mut h = Harness::new(&["xy"]);
    h.keys("x:wq\n\x1b");
    assert!(!h.last.quit);
    assert!(h.state.is_dirty());
    assert_eq!(h.state.status_message(), Some("Save aborted!"));
}

#[test]
fn ex_edit_replaces_buffer_and_keeps_undo() {
    let mut h = Harness::new(&["old"]);
    h.host
        .store
        .files
        .insert(PathBuf::from("new.py"), b"# hi\nx = 1\n".to_vec());
    h.keys("x");
    assert_eq!(h.state.undo_depth(), 1);
    h.keys(":e new.py\n");
    assert_eq!(h.lines(), vec!["# hi", "x = 1"]);
    assert!(h.last.buffer_replaced);
    assert_eq!(h.state.filetype(), Some("python"));
    assert_eq!(h.state.undo_depth(), 1);
    assert!(!h.state.is_dirty());
}

#[test]
fn ex_edit_missing_file_keeps_buffer() {
    let mut h = Harness::new(&["keep"]);
    h.keys(":e\nmissing.txt\n");
    assert_eq!(h.lines(), vec!["keep"]);
    assert_eq!(h.state.status_message(), Some("Can't open file: missing.txt"));
}

#[test]
fn unknown_ex_command_reports() {
    let mut h = Harness::new(&["x"]);
    h.keys(":frobnicate\n");
    assert_eq!(h.state.status_message(), Some("Unknown command: frobnicate"));
}

#[test]
fn ex_quit_and_write_quit() {
    let mut h = Harness::new(&["x"]);
    h.keys(":q\n");
    assert!(h.last.quit);
    let mut h = Harness::new(&["x"]);
    h.state.file_name = Some(PathBuf::from("f.txt"));
    h.keys(":wq\n");
    assert!(h.last.quit);
    assert!(h.host.store.files.contains_key(&PathBuf::from("f.txt")));
}

#[test]
fn ctrl_q_counts_down_on_dirty_buffer() {
    let mut h = Harness::new(&["x"]);
    h.keys("x");
    for remaining in [3, 2, 1] {
        h.key(KeyEvent::ctrl('q'));
        assert!(!h.last.quit);
        let expected = format!(
            "WARNING!!! File has unsaved changes. Press Ctrl-Q {remaining} more times to quit."
        );
        assert_eq!(h.state.status_message(), Some(expected.as_str()));
    }
    h.key(KeyEvent::ctrl('q'));
    assert!(h.last.quit);
}

#[test]
fn other_key_rearms_quit_countdown() {
    let mut h = Harness::new(&["ab"]);
    h.keys("x");
    h.key(KeyEvent::ctrl('q'));
    h.key(KeyEvent::ctrl('q'));
    assert_eq!(h.state.quit_remaining, 1);
    h.keys("l");
    assert_eq!(h.state.quit_remaining, 3);
}

#[test]
fn clean_buffer_quits_immediately() {
    let mut h = Harness::new(&["x"]);
    h.key(KeyEvent::ctrl('q'));
    assert!(h.last.quit);
}
