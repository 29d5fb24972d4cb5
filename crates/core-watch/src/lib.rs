//! Change detection for live run logs: a filesystem watcher wrapped into a
//! cooperative message channel, and a heartbeat timer that keeps drains
//! flowing when the watcher is quiet (or failed to start).

pub mod heartbeat;
pub mod watcher;

pub use heartbeat::HeartbeatManager;
pub use watcher::{FileChange, WatcherManager, WatcherShutdown};
