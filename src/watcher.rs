//! Filesystem change notifications for the log file.
//!
//! Watches the log's parent directory rather than the file itself: rotation
//! replaces the file, and a watch on the old inode would go quiet exactly
//! when something interesting happens.

use crate::error::Result;
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::Path;
use tokio::sync::mpsc;

/// Watches the directory containing the log file and reports events that
/// touch the log itself.
pub(crate) struct LogWatcher {
    _watcher: RecommendedWatcher,
    events: mpsc::UnboundedReceiver<notify::Result<Event>>,
    file_name: String,
}

impl LogWatcher {
    /// Starts watching the parent directory of `log_path`. The file itself
    /// does not need to exist yet.
    pub(crate) fn new(log_path: &Path) -> Result<Self> {
        let file_name = log_path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();

        let (tx, rx) = mpsc::unbounded_channel();
        let mut watcher = RecommendedWatcher::new(
            move |res| {
                let _ = tx.send(res);
            },
            Config::default(),
        )?;

        let watch_dir = log_path.parent().unwrap_or(log_path);
        watcher.watch(watch_dir, RecursiveMode::NonRecursive)?;

        Ok(Self {
            _watcher: watcher,
            events: rx,
            file_name,
        })
    }

    /// Waits for the next event that touches the log file. Events for other
    /// files in the directory are discarded. Returns `None` when the watcher
    /// backend shuts down.
    pub(crate) async fn log_changed(&mut self) -> Option<notify::Result<()>> {
        loop {
            match self.events.recv().await? {
                Ok(event) => {
                    if event_touches(&event, &self.file_name) {
                        return Some(Ok(()));
                    }
                }
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

/// Whether any path in the event names the watched file.
fn event_touches(event: &Event, file_name: &str) -> bool {
    event.paths.iter().any(|path| {
        path.file_name()
            .map(|name| name.to_string_lossy() == file_name)
            .unwrap_or(false)
    })
}
