mod common;
use common::*;

use core_state::Mode;
use core_text::Position;
use pretty_assertions::assert_eq;

#[test]
fn delete_columns_two_to_four() {
    let mut h = Harness::new(&["abcdefg"]);
    h.keys("llvll");
    let sel = h.state.selection.expect("selection");
    assert_eq!(sel.start, Position::new(0, 2));
    assert_eq!(sel.end, Position::new(0, 4));
    h.keys("d");
    assert_eq!(h.lines(), vec!["abfg"]);
    assert_eq!(h.cursor(), (0, 2));
    assert_eq!(h.state.mode, Mode::Normal);
    assert!(h.state.selection.is_none());
    assert_eq!(h.state.undo_depth(), 1);
}

#[test]
fn backwards_selection_is_normalized_on_use() {
    let mut h = Harness::new(&["abcdefg"]);
    h.keys("$vhhx");
    assert_eq!(h.lines(), vec!["abcd"]);
    assert_eq!(h.cursor(), (0, 4));
}

#[test]
fn multi_row_delete_then_paste_restores() {
    let original = ["head line", "middle", "tail line", "after"];
    let mut h = Harness::new(&original);
    h.keys("5lvjjhhy");
    assert_eq!(h.state.clipboard, b"line\nmiddle\ntail");
    assert_eq!(h.state.status_message(), Some("Yanked 16 chars"));
    assert_eq!(h.state.mode, Mode::Normal);
    assert_eq!(h.cursor(), (2, 3));
    h.keys("gg05lvjjhhd");
    assert_eq!(h.lines(), vec!["head  line", "after"]);
    assert_eq!(h.cursor(), (0, 5));
    let text = h.state.clipboard.clone();
    let mut pos = h.state.cursor;
    h.state.buffer.insert_text(&mut pos, &text);
    assert_eq!(h.lines(), original);
}

#[test]
fn v_exits_without_side_effects() {
    let mut h = Harness::new(&["abc"]);
    h.keys("vlv");
    assert_eq!(h.state.mode, Mode::Normal);
    assert_eq!(h.lines(), vec!["abc"]);
    assert!(h.state.clipboard.is_empty());
    assert_eq!(h.state.undo_depth(), 0);
}

#[test]
fn brace_match_extends_selection() {
    let mut h = Harness::new(&["f(x, y)"]);
    h.keys("lv%");
    let sel = h.state.selection.expect("selection");
    assert_eq!(sel.end, Position::new(0, 6));
    h.keys("y");
    assert_eq!(h.state.clipboard, b"(x, y)");
}
