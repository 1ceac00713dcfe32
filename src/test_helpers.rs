//! Test utilities: temporary log files and misbehaving cursor stores.

use crate::cursor::{Cursor, CursorStore};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// A log file in its own temp directory, cleaned up on drop.
pub struct TempLogFile {
    path: PathBuf,
    _dir: tempfile::TempDir,
}

impl TempLogFile {
    /// Creates an empty log file.
    pub fn new() -> std::io::Result<Self> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("factorio-current.log");
        File::create(&path)?;
        Ok(Self { path, _dir: dir })
    }

    /// Creates a log file with the given initial content (written verbatim,
    /// no trailing newline added).
    pub fn with_content(content: &str) -> std::io::Result<Self> {
        let log = Self::new()?;
        log.append(content)?;
        Ok(log)
    }

    /// Appends raw text to the log, as the game process would.
    pub fn append(&self, content: &str) -> std::io::Result<()> {
        self.append_bytes(content.as_bytes())
    }

    /// Appends raw bytes, for exercising non-UTF-8 log content.
    pub fn append_bytes(&self, content: &[u8]) -> std::io::Result<()> {
        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        file.write_all(content)?;
        file.flush()
    }

    /// Replaces the whole file content, simulating log rotation.
    pub fn replace(&self, content: &str) -> std::io::Result<()> {
        std::fs::write(&self.path, content)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Cursor store whose `save` always fails, for verifying that persistence
/// failures do not fail the read.
#[derive(Default)]
pub struct FailingSaveStore {
    cursor: Mutex<Option<Cursor>>,
}

impl FailingSaveStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CursorStore for FailingSaveStore {
    fn load(&self) -> Cursor {
        self.cursor.lock().unwrap().unwrap_or_default()
    }

    fn save(&self, _cursor: &Cursor) -> std::io::Result<()> {
        Err(std::io::Error::other("cursor storage unavailable"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_log_file_creation() {
        let log = TempLogFile::new().unwrap();
        assert!(log.path().exists());
    }

    #[test]
    fn test_with_content_writes_verbatim() {
        let log = TempLogFile::with_content("line\n").unwrap();
        let content = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(content, "line\n");
    }

    #[test]
    fn test_append() {
        let log = TempLogFile::new().unwrap();
        log.append("one\n").unwrap();
        log.append("two\n").unwrap();

        let content = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(content, "one\ntwo\n");
    }

    #[test]
    fn test_replace_shrinks_file() {
        let log = TempLogFile::with_content("long initial content\n").unwrap();
        log.replace("b\n").unwrap();

        let content = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(content, "b\n");
    }

    #[test]
    fn test_failing_save_store() {
        let store = FailingSaveStore::new();
        assert_eq!(store.load(), Cursor::default());
        assert!(store.save(&Cursor::default()).is_err());
    }
}
