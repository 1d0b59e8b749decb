use core_text::{Position, Row};
use tracing::trace;

/// Full copy of the rows and cursor taken just before a destructive edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoSnapshot {
    pub rows: Vec<Row>,
    pub cursor: Position,
}

/// Unbounded LIFO of snapshots. No redo: a popped snapshot is gone.
#[derive(Debug, Default)]
pub struct UndoStack {
    snapshots: Vec<UndoSnapshot>,
}

impl UndoStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn push(&mut self, rows: Vec<Row>, cursor: Position) {
        let lines = rows.len();
        self.snapshots.push(UndoSnapshot { rows, cursor });
        trace!(target: "state.undo", depth = self.snapshots.len(), lines, row = cursor.row, col = cursor.col, "push_snapshot");
    }

    pub fn pop(&mut self) -> Option<UndoSnapshot> {
        let snap = self.snapshots.pop();
        trace!(target: "state.undo", depth = self.snapshots.len(), restored = snap.is_some(), "undo_pop");
        snap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifo_order() {
        let mut stack = UndoStack::new();
        assert!(stack.pop().is_none());
        stack.push(vec![Row::new(0, b"a".to_vec())], Position::new(0, 0));
        stack.push(vec![Row::new(0, b"b".to_vec())], Position::new(0, 1));
        assert_eq!(stack.depth(), 2);
        let top = stack.pop().unwrap();
        assert_eq!(top.rows[0].raw, b"b");
        assert_eq!(top.cursor, Position::new(0, 1));
        assert_eq!(stack.pop().unwrap().rows[0].raw, b"a");
        assert!(stack.is_empty());
    }
}
