//! Filesystem watcher wrapped into a single-slot coalescing channel.
//!
//! The notify backend can emit bursts of modify events for one logical
//! append. Consumers only care that "the file changed since the last drain",
//! so the channel holds one slot and extra notifications are dropped at
//! enqueue time. `wait_for_msg` has exactly one consumer; `finish` (via the
//! shutdown handle) wakes a blocked consumer with the `None` sentinel.

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::Ordering;
use tokio::sync::{Notify, mpsc};
use tracing::{debug, info, warn};

/// Marker delivered for each coalesced change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileChange;

/// Handle that stops the watcher task from outside. Cloneable so the owner
/// of the manager task and the run teardown path can both hold it.
#[derive(Clone, Debug)]
pub struct WatcherShutdown {
    notify: Arc<Notify>,
}

impl WatcherShutdown {
    pub fn signal(&self) {
        self.notify.notify_one();
    }
}

pub struct WatcherManager {
    // Held for its Drop: dropping unregisters the OS watch.
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<FileChange>,
    shutdown: Arc<Notify>,
    path: PathBuf,
}

impl WatcherManager {
    /// Watch `path` for data changes. Fails if the OS watcher cannot be
    /// registered; callers treat that as degraded (heartbeat-only) mode.
    pub fn start(path: impl AsRef<Path>) -> anyhow::Result<(Self, WatcherShutdown)> {
        let path = path.as_ref().to_path_buf();
        let (tx, rx) = mpsc::channel::<FileChange>(1);

        let mut watcher =
            notify::recommended_watcher(move |res: Result<Event, notify::Error>| match res {
                Ok(event) if is_data_change(&event) => match tx.try_send(FileChange) {
                    Ok(()) => {
                        core_events::WAKEUP_SENDS.fetch_add(1, Ordering::Relaxed);
                    }
                    Err(mpsc::error::TrySendError::Full(_)) => {
                        // Coalesced: a wakeup is already pending.
                        core_events::WAKEUP_DROPS.fetch_add(1, Ordering::Relaxed);
                    }
                    Err(mpsc::error::TrySendError::Closed(_)) => {}
                },
                Ok(_) => {}
                Err(e) => warn!(target: "watch.fs", error = %e, "watcher_event_error"),
            })?;
        watcher.watch(&path, RecursiveMode::NonRecursive)?;
        info!(target: "watch.fs", path = %path.display(), "watch_started");

        let notify = Arc::new(Notify::new());
        let shutdown = WatcherShutdown {
            notify: notify.clone(),
        };
        Ok((
            Self {
                _watcher: watcher,
                rx,
                shutdown: notify,
                path,
            },
            shutdown,
        ))
    }

    /// Block until one change arrives, or `None` once `finish` was signalled.
    /// Sole-consumer contract: exactly one task may call this.
    pub async fn wait_for_msg(&mut self) -> Option<FileChange> {
        tokio::select! {
            biased;
            _ = self.shutdown.notified() => {
                debug!(target: "watch.fs", path = %self.path.display(), "watch_finished");
                None
            }
            msg = self.rx.recv() => msg,
        }
    }
}

/// Appends show up as modify/create depending on platform; metadata-only
/// events (access time) must not trigger drains.
fn is_data_change(event: &Event) -> bool {
    matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Any
    )
}
