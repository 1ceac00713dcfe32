//! Persisted read position for the log file.
//!
//! The cursor is the only state carried across invocations: how far into the
//! log we have already read, and the file modification time we saw when that
//! offset was recorded. Loading is infallible by contract (missing or corrupt
//! state degrades to the zero cursor), saving is allowed to fail and callers
//! treat that as best-effort.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Byte offset + observed modification time marking how much of the log has
/// been consumed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    /// Byte position up to which content has already been read.
    pub offset: u64,
    /// Modification time of the log file (milliseconds since the Unix epoch)
    /// at the moment `offset` was recorded.
    pub mtime_ms: u64,
}

/// Load/save pair for the [`Cursor`], injected into `read_new` so tests can
/// supply in-memory fakes instead of touching real files.
///
/// `Send + Sync` so a store can be held across await points inside a spawned
/// task, as [`ChatStream`](crate::ChatStream) does.
pub trait CursorStore: Send + Sync {
    /// Returns the persisted cursor, or the zero cursor if none was saved
    /// yet or the saved state is unreadable. Never fails.
    fn load(&self) -> Cursor;

    /// Persists the cursor, overwriting any previous value.
    fn save(&self, cursor: &Cursor) -> std::io::Result<()>;
}

/// Cursor store backed by a small JSON file.
///
/// Saves are atomic: the new cursor is written to a sibling temp file and
/// renamed over the old one, so a crash mid-save leaves the previous cursor
/// intact rather than a half-written file.
#[derive(Debug, Clone)]
pub struct JsonCursorStore {
    path: PathBuf,
}

impl JsonCursorStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CursorStore for JsonCursorStore {
    fn load(&self) -> Cursor {
        match fs::read_to_string(&self.path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
            Err(_) => Cursor::default(),
        }
    }

    fn save(&self, cursor: &Cursor) -> std::io::Result<()> {
        let json = serde_json::to_string(cursor)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// In-memory cursor store, for tests and callers that manage their own
/// persistence.
#[derive(Debug, Default)]
pub struct MemoryCursorStore {
    cursor: Mutex<Option<Cursor>>,
}

impl MemoryCursorStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CursorStore for MemoryCursorStore {
    fn load(&self) -> Cursor {
        self.cursor.lock().unwrap().unwrap_or_default()
    }

    fn save(&self, cursor: &Cursor) -> std::io::Result<()> {
        *self.cursor.lock().unwrap() = Some(*cursor);
        Ok(())
    }
}
