//! Per-run producer plumbing: the reader task and the watcher task.
//!
//! Each run gets one reader task that owns its `RunReader` for the task's
//! whole life. The loop requests work by enqueuing a `ReadCmd`; at most one
//! command is buffered, so re-requests while a read is in flight coalesce
//! instead of piling up. Reads execute under `spawn_blocking` (they touch
//! the filesystem) and their batches flow back to the loop as messages.
//!
//! The watcher task loops `wait_for_msg` and forwards coalesced change
//! wakeups as `Msg::FileChanged`; signalling its shutdown handle releases
//! the blocked wait with the `None` sentinel and ends the task.

use crate::msg::Msg;
use core_events::RunKey;
use core_reader::{CHUNK_MAX_RECORDS, CHUNK_TIME_BUDGET, RunReader};
use core_watch::{WatcherManager, WatcherShutdown};
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use tokio::sync::mpsc;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadCmd {
    Chunk,
    Drain,
}

pub struct RunStream {
    key: RunKey,
    path: PathBuf,
    cmd_tx: mpsc::Sender<ReadCmd>,
    watcher_shutdown: Option<WatcherShutdown>,
}

impl RunStream {
    /// Spawn the reader task for `path` and return its handle.
    pub fn spawn(key: RunKey, path: PathBuf, tx: mpsc::Sender<Msg>) -> Self {
        let (cmd_tx, mut cmd_rx) = mpsc::channel::<ReadCmd>(1);
        let task_key = key.clone();
        let task_path = path.clone();

        tokio::spawn(async move {
            let mut reader = Some(RunReader::open(&task_path));
            while let Some(cmd) = cmd_rx.recv().await {
                let Some(taken) = reader.take() else { break };
                let key_for_msg = task_key.clone();
                let joined = tokio::task::spawn_blocking(move || {
                    let mut r = taken;
                    let msg = match cmd {
                        ReadCmd::Chunk => Msg::Chunked {
                            run_key: key_for_msg,
                            batch: r.read_chunk(CHUNK_MAX_RECORDS, CHUNK_TIME_BUDGET),
                        },
                        ReadCmd::Drain => Msg::Batched {
                            run_key: key_for_msg,
                            batch: r.read_available(),
                        },
                    };
                    (r, msg)
                })
                .await;
                match joined {
                    Ok((r, msg)) => {
                        core_events::BATCHES_DELIVERED.fetch_add(1, Ordering::Relaxed);
                        reader = Some(r);
                        if tx.send(msg).await.is_err() {
                            break;
                        }
                    }
                    Err(join_err) => {
                        warn!(
                            target: "model.stream",
                            run = task_key.as_str(),
                            ?join_err,
                            "reader_task_join_failed"
                        );
                        break;
                    }
                }
            }
            if let Some(mut r) = reader {
                r.close();
            }
            debug!(target: "model.stream", run = task_key.as_str(), "reader_task_stopped");
        });

        Self {
            key,
            path,
            cmd_tx,
            watcher_shutdown: None,
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Request one backfill chunk. A request already in flight coalesces.
    pub fn request_chunk(&self) {
        self.request(ReadCmd::Chunk);
    }

    /// Request one live drain. A request already in flight coalesces.
    pub fn request_drain(&self) {
        self.request(ReadCmd::Drain);
    }

    fn request(&self, cmd: ReadCmd) {
        match self.cmd_tx.try_send(cmd) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                debug!(target: "model.stream", run = self.key.as_str(), ?cmd, "read_coalesced");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {}
        }
    }

    pub fn watcher_running(&self) -> bool {
        self.watcher_shutdown.is_some()
    }

    /// Start the filesystem watcher task. Failure is degraded mode, not
    /// fatal; the heartbeat still drives drains.
    pub fn start_watcher(&mut self, tx: mpsc::Sender<Msg>) -> anyhow::Result<()> {
        if self.watcher_shutdown.is_some() {
            return Ok(());
        }
        let (mut manager, shutdown) = WatcherManager::start(&self.path)?;
        self.watcher_shutdown = Some(shutdown);
        let key = self.key.clone();
        tokio::spawn(async move {
            while manager.wait_for_msg().await.is_some() {
                let msg = Msg::FileChanged {
                    run_key: key.clone(),
                };
                if tx.send(msg).await.is_err() {
                    break;
                }
            }
            debug!(target: "model.stream", run = key.as_str(), "watcher_task_stopped");
        });
        Ok(())
    }

    pub fn stop_watcher(&mut self) {
        if let Some(shutdown) = self.watcher_shutdown.take() {
            shutdown.signal();
        }
    }
}

impl Drop for RunStream {
    fn drop(&mut self) {
        // Dropping cmd_tx closes the reader task; the watcher needs an
        // explicit nudge out of its blocked wait.
        self.stop_watcher();
    }
}
