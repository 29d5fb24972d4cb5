//! Run-directory scanner: lists `*.runlog` files and re-lists periodically
//! so runs started after the dashboard appear without a restart.

use core_model::{Msg, RunListing};
use std::path::Path;
use std::time::{Duration, SystemTime};
use tokio::sync::mpsc::Sender;
use tokio::task::JoinHandle;
use tracing::warn;

pub const RUN_LOG_EXTENSION: &str = "runlog";
const RESCAN_INTERVAL: Duration = Duration::from_secs(5);

pub fn list_run_logs(dir: &Path) -> std::io::Result<Vec<RunListing>> {
    let mut out = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some(RUN_LOG_EXTENSION) {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let modified = entry
            .metadata()
            .and_then(|m| m.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);
        out.push(RunListing {
            key: stem.to_string(),
            path,
            modified,
        });
    }
    Ok(out)
}

/// Scan immediately, then on an interval, until the loop channel closes.
pub fn spawn_scanner(dir: std::path::PathBuf, tx: Sender<Msg>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let scan_dir = dir.clone();
            let listed = tokio::task::spawn_blocking(move || list_run_logs(&scan_dir)).await;
            match listed {
                Ok(Ok(entries)) => {
                    if tx.send(Msg::RunDirs { entries }).await.is_err() {
                        break;
                    }
                }
                Ok(Err(e)) => {
                    warn!(target: "scan", dir = %dir.display(), error = %e, "run_dir_scan_failed");
                }
                Err(join_err) => {
                    warn!(target: "scan", ?join_err, "run_dir_scan_join_failed");
                    break;
                }
            }
            tokio::time::sleep(RESCAN_INTERVAL).await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_only_runlog_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.runlog"), b"x").unwrap();
        std::fs::write(dir.path().join("b.runlog"), b"x").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();

        let mut listed = list_run_logs(dir.path()).unwrap();
        listed.sort_by(|a, b| a.key.cmp(&b.key));
        let keys: Vec<&str> = listed.iter().map(|l| l.key.as_str()).collect();
        assert_eq!(keys, ["a", "b"]);
    }

    #[test]
    fn missing_dir_is_an_error() {
        assert!(list_run_logs(Path::new("/definitely/not/here")).is_err());
    }
}
