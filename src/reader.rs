//! Incremental consumption of the log file.
//!
//! `read_new` is the core operation: read everything appended since the
//! cursor, detect rotation, and persist the advanced cursor. Delivery is
//! at-least-once: a failed cursor save or a detected rotation re-delivers
//! lines rather than losing them.

use crate::cursor::{Cursor, CursorStore};
use crate::error::Result;
use std::path::Path;
use std::time::UNIX_EPOCH;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tracing::warn;

/// Result of a single `read_new` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TailRead {
    /// Lines appended since the last call (empty and whitespace-only lines
    /// filtered out).
    pub lines: Vec<String>,
    /// The cursor as of this read. For an existing file it has already been
    /// persisted to the store (unless the save failed, in which case the next
    /// call re-reads the same range); for a missing file it is the previous
    /// cursor, untouched.
    pub cursor: Cursor,
}

/// Reads the lines appended to `path` since the cursor held by `store`, then
/// persists the advanced cursor.
///
/// A missing file yields zero lines and leaves the cursor untouched. A file
/// whose modification time went backward, or whose size shrank below the
/// cursor offset, is treated as rotated and re-read from the beginning; the
/// possible re-delivery of early lines is intentional, the alternative being
/// to miss the rotation entirely. I/O errors on an existing file propagate.
pub async fn read_new<P: AsRef<Path>>(path: P, store: &dyn CursorStore) -> Result<TailRead> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(TailRead {
            lines: Vec::new(),
            cursor: store.load(),
        });
    }

    let mut file = File::open(path).await?;
    let metadata = file.metadata().await?;
    let size = metadata.len();
    let mtime_ms = mtime_millis(&metadata);

    let previous = store.load();
    let start = if rotation_detected(size, mtime_ms, &previous) {
        0
    } else {
        previous.offset
    };

    let lines = match bytes_to_read(size, start) {
        Some(count) => {
            file.seek(std::io::SeekFrom::Start(start)).await?;
            let mut buf = Vec::with_capacity(count as usize);
            file.take(count).read_to_end(&mut buf).await?;
            split_lines(&String::from_utf8_lossy(&buf))
        }
        None => Vec::new(),
    };

    // Persisted even when nothing new was read, so an unchanged file is an
    // idempotent no-op on the next call. Save failure is best-effort: the
    // caller still gets its lines, the next call re-reads the same range.
    let cursor = Cursor {
        offset: size,
        mtime_ms,
    };
    if let Err(e) = store.save(&cursor) {
        warn!(error = %e, "failed to persist log cursor, next read will re-deliver");
    }

    Ok(TailRead { lines, cursor })
}

/// A shrunk or un-advanced file cannot be the same log stream continuing;
/// the old offset is no longer meaningful. Best-effort heuristic: a rewrite
/// to exactly the old size with a backdated mtime evades it.
fn rotation_detected(size: u64, mtime_ms: u64, cursor: &Cursor) -> bool {
    mtime_ms < cursor.mtime_ms || size < cursor.offset
}

fn bytes_to_read(size: u64, start: u64) -> Option<u64> {
    if size <= start { None } else { Some(size - start) }
}

/// Split content by newline, dropping empty and whitespace-only lines but
/// preserving internal whitespace of the rest.
fn split_lines(content: &str) -> Vec<String> {
    content
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.to_string())
        .collect()
}

fn mtime_millis(metadata: &std::fs::Metadata) -> u64 {
    metadata
        .modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
