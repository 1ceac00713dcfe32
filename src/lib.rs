//! Incremental reader for Factorio's rotating server log.
//!
//! The game appends to `factorio-current.log` and occasionally rotates it.
//! This crate reads only the lines appended since the last call, persisting a
//! byte-offset + mtime cursor between invocations, and extracts player chat
//! while filtering out lines this tool printed into the game itself.
//!
//! Delivery is at-least-once: a detected rotation re-reads the file from the
//! start, and a failed cursor save re-delivers the same range on the next
//! call. Lines are never silently dropped.
//!
//! # Example
//!
//! ```rust,no_run
//! use factorio_tail::{JsonCursorStore, SelfMarkers, extract_chat_messages, read_new};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = JsonCursorStore::new(factorio_tail::default_cursor_path());
//!     let read = read_new("factorio-current.log", &store).await?;
//!
//!     let markers = SelfMarkers::default();
//!     for msg in extract_chat_messages(read.lines.iter().map(String::as_str), &markers) {
//!         println!("{}: {}", msg.player, msg.text);
//!     }
//!
//!     Ok(())
//! }
//! ```

// Internal modules - not part of public API
mod chat;
mod cursor;
mod error;
mod paths;
mod reader;
mod stream;
mod watcher;

#[cfg(test)]
mod test_helpers;

// Public API exports
pub use chat::{ChatMessage, SelfMarkers, extract_chat_messages};
pub use cursor::{Cursor, CursorStore, JsonCursorStore, MemoryCursorStore};
pub use error::{Error, Result};
pub use paths::{default_cursor_path, default_log_path};
pub use reader::{TailRead, read_new};
pub use stream::ChatStream;

use std::path::Path;

/// Creates a stream of chat message batches from the log at `path`.
///
/// One batch is produced per detected log change that contained chat lines,
/// after filtering through `markers`. The stream resumes from the cursor held
/// by `store`, so content consumed by a previous run is not replayed.
///
/// # Example
///
/// ```rust,no_run
/// use factorio_tail::{MemoryCursorStore, SelfMarkers, watch_chat};
/// use tokio_stream::StreamExt;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let mut chat = watch_chat(
///         "factorio-current.log",
///         MemoryCursorStore::new(),
///         SelfMarkers::default(),
///     )?;
///
///     while let Some(batch) = chat.next().await {
///         for msg in batch? {
///             println!("{}: {}", msg.player, msg.text);
///         }
///     }
///
///     Ok(())
/// }
/// ```
pub fn watch_chat<P, S>(path: P, store: S, markers: SelfMarkers) -> Result<ChatStream>
where
    P: AsRef<Path>,
    S: CursorStore + 'static,
{
    ChatStream::new(path, store, markers)
}
