#![allow(dead_code)] // Shared across many integration tests; each test binary uses a subset of helpers.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Result;
use core_actions::io_ops::{decode_lines, encode_rows};
use core_actions::{DispatchResult, Host, IoError, LineStore, handle_key_at};
use core_events::{KeyCode, KeyEvent, KeySource, ScriptedKeys};
use core_state::{Buffer, EditorState};
use core_text::Row;

/// In-memory files keyed by path.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub files: HashMap<PathBuf, Vec<u8>>,
    pub fail_writes: bool,
}

impl LineStore for MemoryStore {
    fn load_lines(&mut self, path: &Path) -> Result<Vec<Vec<u8>>, IoError> {
        match self.files.get(path) {
            Some(content) => Ok(decode_lines(content)),
            None => Err(IoError::Open {
                path: path.to_path_buf(),
                source: io::Error::from(io::ErrorKind::NotFound),
            }),
        }
    }

    fn save_lines(&mut self, path: &Path, rows: &[Row]) -> Result<usize, IoError> {
        if self.fail_writes {
            return Err(IoError::Write {
                path: path.to_path_buf(),
                source: io::Error::from(io::ErrorKind::PermissionDenied),
            });
        }
        let content = encode_rows(rows);
        let len = content.len();
        self.files.insert(path.to_path_buf(), content);
        Ok(len)
    }
}

/// Host fed from a key script; counts redraws requested by prompts.
#[derive(Debug, Default)]
pub struct ScriptedHost {
    pub keys: ScriptedKeys,
    pub store: MemoryStore,
    pub refreshes: usize,
}

impl KeySource for ScriptedHost {
    fn read_key(&mut self) -> Result<KeyEvent> {
        self.keys.read_key()
    }
}

impl Host for ScriptedHost {
    fn refresh(&mut self, _state: &mut EditorState) -> Result<()> {
        self.refreshes += 1;
        Ok(())
    }

    fn line_store(&mut self) -> &mut dyn LineStore {
        &mut self.store
    }
}

pub struct Harness {
    pub state: EditorState,
    pub host: ScriptedHost,
    pub now: Instant,
    pub last: DispatchResult,
}

impl Harness {
    pub fn new(lines: &[&str]) -> Self {
        Self {
            state: EditorState::new(Buffer::from_lines(lines.iter().copied())),
            host: ScriptedHost::default(),
            now: Instant::now(),
            last: DispatchResult::clean(),
        }
    }

    /// Feed text keys (`\x1b` = Esc, `\n` = Enter), one second apart so the
    /// Insert-mode escape window never triggers by accident.
    pub fn keys(&mut self, text: &str) -> &mut Self {
        for key in collect(ScriptedKeys::from_text(text)) {
            self.host.keys.push(key);
        }
        self.run(Duration::from_secs(1))
    }

    /// Queue a key without running it, for scripts that a prompt will read.
    pub fn queue(&mut self, key: KeyEvent) -> &mut Self {
        self.host.keys.push(key);
        self
    }

    pub fn key(&mut self, key: KeyEvent) -> &mut Self {
        self.host.keys.push(key);
        self.run(Duration::from_secs(1))
    }

    pub fn code(&mut self, code: KeyCode) -> &mut Self {
        self.key(KeyEvent::plain(code))
    }

    /// Single key at an explicit offset from the previous one.
    pub fn key_after(&mut self, key: KeyEvent, gap: Duration) -> &mut Self {
        self.host.keys.push(key);
        self.run(gap)
    }

    fn run(&mut self, gap: Duration) -> &mut Self {
        while self.host.keys.remaining() > 0 {
            let key = self.host.read_key().expect("scripted key");
            self.now += gap;
            self.last = handle_key_at(&mut self.state, &mut self.host, key, self.now)
                .expect("dispatch");
            if self.last.quit {
                break;
            }
        }
        self
    }

    pub fn lines(&self) -> Vec<String> {
        self.state
            .buffer
            .rows()
            .iter()
            .map(|r| r.text().into_owned())
            .collect()
    }

    pub fn cursor(&self) -> (usize, usize) {
        (self.state.cursor.row, self.state.cursor.col)
    }
}

fn collect(mut keys: ScriptedKeys) -> Vec<KeyEvent> {
    let mut out = Vec::new();
    while let Ok(k) = keys.read_key() {
        out.push(k);
    }
    out
}
