//! Line store collaborator and the open/save commands built on it.
//!
//! Synchronous. Loading strips `\n`/`\r\n`; saving joins rows with `\n` and
//! always writes a trailing newline. Failures never touch the live buffer.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use core_state::EditorState;
use core_text::Row;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum IoError {
    #[error("cannot open {path}: {source}")]
    Open { path: PathBuf, source: io::Error },
    #[error("cannot read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("cannot write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

impl IoError {
    /// Underlying OS error.
    pub fn io(&self) -> &io::Error {
        match self {
            IoError::Open { source, .. }
            | IoError::Read { source, .. }
            | IoError::Write { source, .. } => source,
        }
    }
}

pub trait LineStore {
    /// Newline-stripped lines of `path`.
    fn load_lines(&mut self, path: &Path) -> Result<Vec<Vec<u8>>, IoError>;
    /// Write rows newline-joined; returns the byte count.
    fn save_lines(&mut self, path: &Path, rows: &[Row]) -> Result<usize, IoError>;
}

/// Rows as written to disk.
pub fn encode_rows(rows: &[Row]) -> Vec<u8> {
    let mut out = Vec::with_capacity(rows.iter().map(|r| r.len() + 1).sum());
    for row in rows {
        out.extend_from_slice(&row.raw);
        out.push(b'\n');
    }
    out
}

/// Split file content into lines, dropping `\n` and a preceding `\r`.
pub fn decode_lines(content: &[u8]) -> Vec<Vec<u8>> {
    if content.is_empty() {
        return Vec::new();
    }
    let body = content.strip_suffix(b"\n").unwrap_or(content);
    body.split(|&b| b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line).to_vec())
        .collect()
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FsLineStore;

impl LineStore for FsLineStore {
    fn load_lines(&mut self, path: &Path) -> Result<Vec<Vec<u8>>, IoError> {
        let content = fs::read(path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => IoError::Open {
                path: path.to_path_buf(),
                source,
            },
            _ => IoError::Read {
                path: path.to_path_buf(),
                source,
            },
        })?;
        Ok(decode_lines(&content))
    }

    fn save_lines(&mut self, path: &Path, rows: &[Row]) -> Result<usize, IoError> {
        let content = encode_rows(rows);
        fs::write(path, &content).map_err(|source| IoError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(content.len())
    }
}

/// Replace the buffer with `path`. On failure the current buffer stays and a
/// status message reports the error.
pub fn open_file(state: &mut EditorState, store: &mut dyn LineStore, path: PathBuf) -> bool {
    match store.load_lines(&path) {
        Ok(lines) => {
            state.load(path, lines);
            true
        }
        Err(e) => {
            error!(target: "io", error = %e, "file_open_error");
            state.set_status(format!("Can't open file: {}", path.display()));
            false
        }
    }
}

/// Write the buffer to its file name; the name must already be set.
pub fn write_file(state: &mut EditorState, store: &mut dyn LineStore) -> bool {
    let Some(path) = state.file_name.clone() else {
        return false;
    };
    match store.save_lines(&path, state.buffer.rows()) {
        Ok(bytes) => {
            state.buffer.mark_clean();
            info!(target: "io", path = %path.display(), bytes, "file_written");
            state.set_status(format!("{bytes} bytes written to disk"));
            true
        }
        Err(e) => {
            error!(target: "io", error = %e, "file_write_error");
            state.set_status(format!("Can't save! I/O error: {}", e.io()));
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_state::Buffer;
    use std::io::Write;

    #[test]
    fn decode_strips_line_endings() {
        assert_eq!(
            decode_lines(b"line1\r\nline2\nline3\r\n"),
            vec![b"line1".to_vec(), b"line2".to_vec(), b"line3".to_vec()]
        );
        assert_eq!(decode_lines(b"a\n\n"), vec![b"a".to_vec(), Vec::new()]);
        assert_eq!(decode_lines(b"no newline"), vec![b"no newline".to_vec()]);
        assert!(decode_lines(b"").is_empty());
    }

    #[test]
    fn open_file_loads_and_clears_dirty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.py");
        {
            let mut f = fs::File::create(&path).unwrap();
            write!(f, "def f():\n\treturn 1\n").unwrap();
        }
        let mut state = EditorState::new(Buffer::from_lines(["old"]));
        state.buffer.mark_dirty();
        assert!(open_file(&mut state, &mut FsLineStore, path.clone()));
        assert_eq!(state.buffer.len(), 2);
        assert_eq!(state.buffer.rows()[1].raw, b"\treturn 1");
        assert!(!state.is_dirty());
        assert_eq!(state.file_name.as_deref(), Some(path.as_path()));
        assert_eq!(state.filetype(), Some("python"));
    }

    #[test]
    fn open_missing_file_keeps_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = EditorState::new(Buffer::from_lines(["keep"]));
        assert!(!open_file(&mut state, &mut FsLineStore, dir.path().join("nope.txt")));
        assert_eq!(state.buffer.rows()[0].raw, b"keep");
        assert!(state.file_name.is_none());
        assert!(state.status_message().unwrap().starts_with("Can't open file: "));
    }

    #[test]
    fn write_file_reports_bytes_and_marks_clean() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let mut state = EditorState::new(Buffer::from_lines(["a", "b"]));
        state.buffer.mark_dirty();
        state.file_name = Some(path.clone());
        assert!(write_file(&mut state, &mut FsLineStore));
        assert!(!state.is_dirty());
        assert_eq!(fs::read(&path).unwrap(), b"a\nb\n");
        assert_eq!(state.status_message(), Some("4 bytes written to disk"));
    }

    #[test]
    fn write_failure_keeps_dirty() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = EditorState::new(Buffer::from_lines(["a"]));
        state.buffer.mark_dirty();
        state.file_name = Some(dir.path().join("missing").join("out.txt"));
        assert!(!write_file(&mut state, &mut FsLineStore));
        assert!(state.is_dirty());
        assert!(state.status_message().unwrap().starts_with("Can't save! I/O error: "));
    }

    #[test]
    fn write_without_name_is_refused() {
        let mut state = EditorState::new(Buffer::from_lines(["x"]));
        state.buffer.mark_dirty();
        assert!(!write_file(&mut state, &mut FsLineStore));
        assert!(state.is_dirty());
    }
}
