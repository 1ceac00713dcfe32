//! Live chat stream over the rotating log.
//!
//! Wraps the pull-based reader in a notify-driven loop: one `read_new` up
//! front to drain whatever the cursor has not yet seen, then one per
//! filesystem event touching the log. Because the cursor store is threaded
//! through, a restarted stream resumes where the previous one stopped instead
//! of replaying the whole file.

use crate::chat::{ChatMessage, SelfMarkers, extract_chat_messages};
use crate::cursor::CursorStore;
use crate::error::{Error, Result};
use crate::reader::read_new;
use crate::watcher::LogWatcher;
use futures::Stream;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::error;

/// A stream of chat message batches, one batch per detected log change.
///
/// Batches are never empty; log changes that produce no new chat (the common
/// case) are swallowed. Dropping the stream shuts the background task down.
pub struct ChatStream {
    receiver: mpsc::UnboundedReceiver<Result<Vec<ChatMessage>>>,
    shutdown: Option<oneshot::Sender<()>>,
    _task: JoinHandle<()>,
}

impl ChatStream {
    /// Starts tailing `path` for chat, resuming from the cursor in `store`.
    pub fn new<P, S>(path: P, store: S, markers: SelfMarkers) -> Result<Self>
    where
        P: AsRef<Path>,
        S: CursorStore + 'static,
    {
        let path = path.as_ref().to_path_buf();
        let (tx, rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let task = tokio::spawn(async move {
            if let Err(e) = tail_task(path, store, markers, tx, shutdown_rx).await {
                error!(error = %e, "chat tail task failed");
            }
        });

        Ok(ChatStream {
            receiver: rx,
            shutdown: Some(shutdown_tx),
            _task: task,
        })
    }

    #[cfg(test)]
    pub(crate) fn is_closed(&self) -> bool {
        self.receiver.is_closed()
    }
}

impl Drop for ChatStream {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

impl Stream for ChatStream {
    type Item = Result<Vec<ChatMessage>>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.receiver).poll_recv(cx)
    }
}

async fn tail_task<S: CursorStore>(
    path: PathBuf,
    store: S,
    markers: SelfMarkers,
    tx: mpsc::UnboundedSender<Result<Vec<ChatMessage>>>,
    mut shutdown: oneshot::Receiver<()>,
) -> Result<()> {
    // Drain content the cursor has not seen yet before waiting on events.
    if !drain_once(&path, &store, &markers, &tx).await {
        return Ok(());
    }

    let mut watcher = LogWatcher::new(&path)?;

    loop {
        tokio::select! {
            _ = &mut shutdown => break,

            changed = watcher.log_changed() => {
                match changed {
                    Some(Ok(())) => {
                        if !drain_once(&path, &store, &markers, &tx).await {
                            break;
                        }
                    }
                    Some(Err(e)) => {
                        let _ = tx.send(Err(Error::Watcher(e)));
                        break;
                    }
                    // Watcher backend closed.
                    None => break,
                }
            }
        }
    }

    Ok(())
}

/// Reads new lines once and forwards any chat found. Returns `false` when the
/// loop should stop (read error already reported, or receiver gone).
async fn drain_once(
    path: &Path,
    store: &dyn CursorStore,
    markers: &SelfMarkers,
    tx: &mpsc::UnboundedSender<Result<Vec<ChatMessage>>>,
) -> bool {
    match read_new(path, store).await {
        Ok(read) => {
            let messages =
                extract_chat_messages(read.lines.iter().map(String::as_str), markers);
            if messages.is_empty() {
                !tx.is_closed()
            } else {
                tx.send(Ok(messages)).is_ok()
            }
        }
        Err(e) => {
            let _ = tx.send(Err(e));
            false
        }
    }
}
