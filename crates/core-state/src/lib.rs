//! Editor state: the row store, cursor, mode, pending command, visual marks,
//! clipboard, undo stack and search state for a single buffer.
//!
//! `EditorState` is the one owned session threaded through the interpreter;
//! nothing here is global. Ephemeral status messages live here too and are
//! drawn by `core-render`.
//!
//! Undo is snapshot based: callers push a full copy of the rows plus the
//! cursor immediately before each destructive edit, and `undo` swaps the
//! newest copy back in. There is no redo and no coalescing.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use core_config::ConfigFile;
use core_syntax::{ProfileRegistry, SyntaxEngine};
use core_text::Position;
use tracing::{debug, info};

pub mod buffer;
pub mod edit;
pub mod search;
pub mod undo;

pub use buffer::{Buffer, SavedHighlight};
pub use search::{Direction, IncrementalSearch, SearchState, SearchStep};
pub use undo::{UndoSnapshot, UndoStack};

/// Current editor mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    Insert,
    /// Character-wise selection between two marks.
    Visual,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Normal => "NORMAL",
            Mode::Insert => "INSERT",
            Mode::Visual => "VISUAL",
        }
    }
}

/// Buffered Normal-mode prefix key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prefix {
    Change,
    Delete,
    Go,
    Yank,
    /// `c` followed by `i`.
    ChangeInner,
}

impl Prefix {
    pub fn as_char(self) -> char {
        match self {
            Prefix::Change => 'c',
            Prefix::Delete => 'd',
            Prefix::Go => 'g',
            Prefix::Yank => 'y',
            Prefix::ChangeInner => 'i',
        }
    }
}

/// Pending prefix plus repeat count (0 = unset, treated as 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PendingCommand {
    pub prefix: Option<Prefix>,
    pub count: usize,
}

impl PendingCommand {
    pub fn push_digit(&mut self, digit: u32) {
        self.count = self.count.saturating_mul(10).saturating_add(digit as usize);
    }

    pub fn count_or_one(&self) -> usize {
        self.count.max(1)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.prefix.is_none() && self.count == 0
    }
}

/// Visual marks; `end` follows the cursor. Never stored normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisualSelection {
    pub start: Position,
    pub end: Position,
}

/// First half of a double-tap escape typed in Insert mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingEscape {
    pub key: char,
    pub at: Instant,
}

/// Runtime knobs resolved from the configuration file.
#[derive(Debug, Clone)]
pub struct EditorSettings {
    pub escape_char: Option<char>,
    pub escape_timeout: Duration,
    pub reparse_interval: Duration,
    pub message_ttl: Duration,
    pub quit_times: u8,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self::from_config(&ConfigFile::default())
    }
}

impl EditorSettings {
    pub fn from_config(cfg: &ConfigFile) -> Self {
        Self {
            escape_char: cfg.input.escape_char(),
            escape_timeout: cfg.input.escape_timeout(),
            reparse_interval: cfg.syntax.reparse_interval(),
            message_ttl: cfg.status.message_ttl(),
            quit_times: cfg.status.quit_times,
        }
    }
}

/// Ephemeral status message container.
#[derive(Debug, Clone)]
pub struct EphemeralMessage {
    pub text: String,
    pub expires_at: Instant,
}

pub struct EditorState {
    pub buffer: Buffer,
    pub cursor: Position,
    pub mode: Mode,
    pub pending: PendingCommand,
    pub selection: Option<VisualSelection>,
    pub clipboard: Vec<u8>,
    undo: UndoStack,
    pub search: SearchState,
    pub file_name: Option<PathBuf>,
    pub ephemeral_status: Option<EphemeralMessage>,
    pub settings: EditorSettings,
    pub profiles: ProfileRegistry,
    pub pending_escape: Option<PendingEscape>,
    /// Ctrl-Q presses still required to quit a dirty buffer.
    pub quit_remaining: u8,
    /// Text rows on screen; PageUp/PageDown step this far.
    pub screen_rows: usize,
    /// First visible row, maintained by the renderer.
    pub row_offset: usize,
}

impl EditorState {
    pub fn new(buffer: Buffer) -> Self {
        Self::with_settings(buffer, EditorSettings::default(), ProfileRegistry::builtin())
    }

    pub fn with_settings(buffer: Buffer, settings: EditorSettings, profiles: ProfileRegistry) -> Self {
        let quit_remaining = settings.quit_times;
        Self {
            buffer,
            cursor: Position::origin(),
            mode: Mode::Normal,
            pending: PendingCommand::default(),
            selection: None,
            clipboard: Vec::new(),
            undo: UndoStack::new(),
            search: SearchState::default(),
            file_name: None,
            ephemeral_status: None,
            settings,
            profiles,
            pending_escape: None,
            quit_remaining,
            screen_rows: 24,
            row_offset: 0,
        }
    }

    /// Switch mode. Pending prefix/count never survive a transition; marks
    /// only exist in Visual mode.
    pub fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            debug!(target: "state.mode", from = self.mode.as_str(), to = mode.as_str(), "mode_change");
        }
        self.mode = mode;
        self.pending.clear();
        self.pending_escape = None;
        if mode != Mode::Visual {
            self.selection = None;
        }
    }

    pub fn start_visual(&mut self) {
        self.set_mode(Mode::Visual);
        self.selection = Some(VisualSelection {
            start: self.cursor,
            end: self.cursor,
        });
    }

    pub fn set_visual_end(&mut self) {
        if let Some(sel) = &mut self.selection {
            sel.end = self.cursor;
        }
    }

    pub fn push_undo_snapshot(&mut self) {
        self.undo.push(self.buffer.snapshot_rows(), self.cursor);
    }

    /// Pop one snapshot; reports "Nothing to undo" when the stack is empty.
    pub fn undo(&mut self) -> bool {
        match self.undo.pop() {
            Some(snap) => {
                self.buffer.restore_rows(snap.rows);
                self.cursor = snap.cursor;
                true
            }
            None => {
                self.set_status("Nothing to undo");
                false
            }
        }
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.depth()
    }

    /// Set an ephemeral status message with a fixed timeout duration.
    pub fn set_ephemeral<S: Into<String>>(&mut self, msg: S, ttl: Duration) {
        self.ephemeral_status = Some(EphemeralMessage {
            text: msg.into(),
            expires_at: Instant::now() + ttl,
        });
    }

    /// Ephemeral message with the configured lifetime.
    pub fn set_status<S: Into<String>>(&mut self, msg: S) {
        let ttl = self.settings.message_ttl;
        self.set_ephemeral(msg, ttl);
    }

    /// Tick ephemeral status; returns true if message expired and was cleared.
    pub fn tick_ephemeral(&mut self) -> bool {
        if let Some(m) = &self.ephemeral_status
            && Instant::now() >= m.expires_at
        {
            self.ephemeral_status = None;
            return true;
        }
        false
    }

    pub fn status_message(&self) -> Option<&str> {
        self.ephemeral_status.as_ref().map(|m| m.text.as_str())
    }

    /// Render column of the cursor.
    pub fn rx(&self) -> usize {
        self.buffer
            .row(self.cursor.row)
            .map_or(0, |r| r.cx_to_rx(self.cursor.col))
    }

    pub fn clamp_cursor(&mut self) {
        if self.cursor.row > self.buffer.len() {
            self.cursor.row = self.buffer.len();
        }
        self.cursor.clamp_to(self.buffer.rows());
    }

    pub fn filetype(&self) -> Option<&str> {
        self.buffer.syntax().filetype()
    }

    pub fn is_dirty(&self) -> bool {
        self.buffer.is_dirty()
    }

    pub fn display_name(&self) -> String {
        self.file_name
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "[No Name]".to_string())
    }

    pub fn rearm_quit(&mut self) {
        self.quit_remaining = self.settings.quit_times;
    }

    /// Pick the profile for the current file name and rebind the engine.
    pub fn select_syntax(&mut self) {
        let name = self
            .file_name
            .as_deref()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned());
        let Some(profile) = name.as_deref().and_then(|n| self.profiles.select(n)) else {
            self.buffer.set_syntax(SyntaxEngine::none());
            return;
        };
        let engine = SyntaxEngine::new(Arc::clone(&profile), self.settings.reparse_interval);
        let message = if engine.uses_tree() {
            format!("Tree-sitter highlighting enabled for {}", profile.name)
        } else {
            format!("Regex highlighting enabled for {}", profile.name)
        };
        self.buffer.set_syntax(engine);
        self.set_status(message);
    }

    /// Replace the buffer content with freshly loaded lines. The undo
    /// history is kept.
    pub fn load(&mut self, path: PathBuf, lines: Vec<Vec<u8>>) {
        info!(target: "state.buffer", path = %path.display(), lines = lines.len(), "buffer_loaded");
        self.buffer.replace_lines(lines);
        self.buffer.mark_clean();
        self.cursor = Position::origin();
        self.row_offset = 0;
        self.selection = None;
        self.search.last_row = None;
        self.file_name = Some(path);
        self.select_syntax();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_text::Highlight;
    use pretty_assertions::assert_eq;

    fn texts(state: &EditorState) -> Vec<String> {
        state
            .buffer
            .rows()
            .iter()
            .map(|r| r.text().into_owned())
            .collect()
    }

    #[test]
    fn pending_count_accumulates_and_clears() {
        let mut p = PendingCommand::default();
        assert_eq!(p.count_or_one(), 1);
        p.push_digit(1);
        p.push_digit(2);
        assert_eq!(p.count_or_one(), 12);
        p.prefix = Some(Prefix::Delete);
        assert!(!p.is_empty());
        p.clear();
        assert!(p.is_empty());
        p.count = usize::MAX;
        p.push_digit(9);
        assert_eq!(p.count, usize::MAX);
    }

    #[test]
    fn mode_transitions_clear_pending_and_marks() {
        let mut st = EditorState::new(Buffer::from_lines(["abc"]));
        st.pending.count = 3;
        st.cursor.col = 1;
        st.start_visual();
        assert_eq!(st.mode, Mode::Visual);
        assert_eq!(st.pending, PendingCommand::default());
        st.cursor.col = 2;
        st.set_visual_end();
        let sel = st.selection.unwrap();
        assert_eq!((sel.start.col, sel.end.col), (1, 2));
        st.set_mode(Mode::Normal);
        assert!(st.selection.is_none());
    }

    #[test]
    fn undo_restores_rows_and_cursor() {
        let mut st = EditorState::new(Buffer::from_lines(["hello", "world"]));
        st.cursor = Position::new(1, 2);
        st.push_undo_snapshot();
        let mut pos = st.cursor;
        st.buffer.delete_lines(&mut pos, 1);
        st.cursor = Position::origin();
        assert_eq!(texts(&st), vec!["hello"]);
        assert!(st.undo());
        assert_eq!(texts(&st), vec!["hello", "world"]);
        assert_eq!(st.cursor, Position::new(1, 2));
        assert!(st.is_dirty());
        assert!(!st.undo());
        assert_eq!(st.status_message(), Some("Nothing to undo"));
    }

    #[test]
    fn load_selects_profile_and_resets_cursor() {
        let mut st = EditorState::new(Buffer::new());
        st.cursor = Position::new(4, 4);
        st.load(PathBuf::from("/tmp/demo.c"), vec![b"int x;".to_vec(), b"// c".to_vec()]);
        assert_eq!(st.cursor, Position::origin());
        assert_eq!(st.filetype(), Some("c"));
        assert!(!st.is_dirty());
        assert_eq!(
            st.status_message(),
            Some("Tree-sitter highlighting enabled for c")
        );
        assert!(st.buffer.rows()[1].hl.iter().all(|h| *h == Highlight::Comment));
        st.file_name = Some(PathBuf::from("notes.txt"));
        st.select_syntax();
        assert_eq!(st.filetype(), None);
        assert!(st.buffer.rows()[1].hl.iter().all(|h| *h == Highlight::Normal));
    }

    #[test]
    fn rx_follows_tabs() {
        let mut st = EditorState::new(Buffer::from_lines(["\tx"]));
        st.cursor = Position::new(0, 1);
        assert_eq!(st.rx(), 4);
        st.cursor = Position::new(3, 0);
        assert_eq!(st.rx(), 0);
        st.clamp_cursor();
        assert_eq!(st.cursor, Position::new(1, 0));
    }

    #[test]
    fn ephemeral_messages_expire() {
        let mut st = EditorState::new(Buffer::new());
        st.set_ephemeral("gone", Duration::ZERO);
        assert!(st.tick_ephemeral());
        assert!(st.status_message().is_none());
        st.set_status("stays");
        assert!(!st.tick_ephemeral());
        assert_eq!(st.display_name(), "[No Name]");
    }
}
