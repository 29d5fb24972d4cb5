//! Top-level message type consumed by the event loop.

use core_events::{BatchedRecords, ChunkedBatch, KeyMsg, MouseMsg, RunKey, WindowSizeMsg};
use std::path::PathBuf;
use std::time::SystemTime;

/// One run log discovered in the watched directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunListing {
    pub key: RunKey,
    pub path: PathBuf,
    pub modified: SystemTime,
}

#[derive(Debug, Clone)]
pub enum Msg {
    /// One bounded backfill step finished for a run.
    Chunked { run_key: RunKey, batch: ChunkedBatch },
    /// One live drain finished for a run.
    Batched {
        run_key: RunKey,
        batch: BatchedRecords,
    },
    /// Shared heartbeat timer fired.
    Heartbeat,
    /// The run's log file changed on disk.
    FileChanged { run_key: RunKey },
    /// Result of validating a run log before streaming it (workspace
    /// selection path).
    ReaderOpened {
        run_key: RunKey,
        result: Result<(), String>,
    },
    /// Run-directory listing (workspace startup and refresh).
    RunDirs { entries: Vec<RunListing> },
    Key(KeyMsg),
    Mouse(MouseMsg),
    WindowSize(WindowSizeMsg),
    /// Sidebar animation frame ticks.
    LeftSidebarAnimation,
    RightSidebarAnimation,
}
