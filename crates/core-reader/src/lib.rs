//! Bridge from the record store to the UI message stream.
//!
//! Two producer commands drive all ingestion:
//! - `read_chunk`: one bounded backfill step (record cap or time budget),
//!   re-issued by the loop while `has_more` holds;
//! - `read_available`: a live drain that reads until the first
//!   end-of-available-data, used in response to watcher and heartbeat
//!   wakeups.
//!
//! Both decode wire records into `RecordMsg`s. Consecutive history records
//! are coalesced into one `HistoryUpdate` so a chart ingests each batch's
//! series atomically instead of point by point.

pub mod decode;

use core_events::{BackfillProgress, BatchedRecords, ChunkedBatch, RecordMsg};
use core_store::{LiveStore, StoreError};
use decode::{HistoryAccumulator, decode_record};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Default record cap for one backfill step.
pub const CHUNK_MAX_RECORDS: usize = 2_000;
/// Default wall-clock budget for one backfill step.
pub const CHUNK_TIME_BUDGET: Duration = Duration::from_millis(50);

pub struct RunReader {
    store: LiveStore,
    progress: BackfillProgress,
    bad_header_logged: bool,
}

impl RunReader {
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self {
            store: LiveStore::open(path),
            progress: BackfillProgress::default(),
            bad_header_logged: false,
        }
    }

    pub fn path(&self) -> &Path {
        self.store.path()
    }

    pub fn progress(&self) -> BackfillProgress {
        self.progress
    }

    pub fn close(&mut self) {
        self.store.close();
    }

    /// One bounded backfill step. `has_more` is true iff the step stopped on
    /// its budget, i.e. end-of-available-data was not reached.
    pub fn read_chunk(&mut self, max_records: usize, budget: Duration) -> ChunkedBatch {
        let started = Instant::now();
        let mut msgs = Vec::new();
        let mut history = HistoryAccumulator::default();
        let mut has_more = false;
        let mut read = 0usize;

        loop {
            if read >= max_records || started.elapsed() >= budget {
                has_more = true;
                break;
            }
            match self.store.read_next() {
                Ok(Some(record)) => {
                    read += 1;
                    self.progress.records += 1;
                    decode_record(record, &mut history, &mut msgs);
                }
                Ok(None) => break,
                Err(e) => {
                    if let Some(msg) = self.error_msg(e) {
                        msgs.push(msg);
                    }
                    break;
                }
            }
        }

        history.flush(&mut msgs);
        self.progress.bytes = self.store.offset().unwrap_or(0);
        debug!(
            target: "reader.backfill",
            records = read,
            has_more,
            total_records = self.progress.records,
            "chunk_read"
        );
        ChunkedBatch {
            msgs,
            has_more,
            progress: self.progress,
        }
    }

    /// Drain everything currently available, in one shot.
    pub fn read_available(&mut self) -> BatchedRecords {
        let mut msgs = Vec::new();
        let mut history = HistoryAccumulator::default();

        loop {
            match self.store.read_next() {
                Ok(Some(record)) => {
                    self.progress.records += 1;
                    decode_record(record, &mut history, &mut msgs);
                }
                Ok(None) => break,
                Err(e) => {
                    if let Some(msg) = self.error_msg(e) {
                        msgs.push(msg);
                    }
                    break;
                }
            }
        }

        history.flush(&mut msgs);
        self.progress.bytes = self.store.offset().unwrap_or(0);
        BatchedRecords { msgs }
    }

    /// Translate a read failure into an error message, or `None` for
    /// conditions the stream can recover from. A bad header is reported
    /// once and then retried silently; the run stays in its loading state
    /// until a valid header appears.
    fn error_msg(&mut self, e: StoreError) -> Option<RecordMsg> {
        match &e {
            StoreError::BadHeader(_) => {
                if !self.bad_header_logged {
                    self.bad_header_logged = true;
                    warn!(
                        target: "reader.backfill",
                        path = %self.store.path().display(),
                        error = %e,
                        "bad_header_retrying"
                    );
                }
                None
            }
            StoreError::TransientUnavailable => None,
            _ => {
                warn!(
                    target: "reader.backfill",
                    path = %self.store.path().display(),
                    error = %e,
                    "read_failed"
                );
                Some(RecordMsg::Error(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_store::{MAGIC, Record, VERSION};
    use std::collections::BTreeMap;
    use std::io::Write;

    fn write_log(records: &[Record]) -> tempfile::NamedTempFile {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(&MAGIC).unwrap();
        tmp.write_all(&VERSION.to_le_bytes()).unwrap();
        for record in records {
            let payload = serde_json::to_vec(record).unwrap();
            tmp.write_all(&(payload.len() as u32).to_le_bytes()).unwrap();
            tmp.write_all(&crc32fast::hash(&payload).to_le_bytes()).unwrap();
            tmp.write_all(&payload).unwrap();
        }
        tmp.flush().unwrap();
        tmp
    }

    fn history(step: f64, name: &str, value: f64) -> Record {
        let mut values = BTreeMap::new();
        values.insert(name.to_string(), value);
        Record::History { step, values }
    }

    #[test]
    fn chunk_cap_sets_has_more() {
        let records: Vec<Record> = (0..10).map(|i| history(i as f64, "loss", 0.5)).collect();
        let tmp = write_log(&records);
        let mut reader = RunReader::open(tmp.path());

        let first = reader.read_chunk(4, Duration::from_secs(5));
        assert!(first.has_more);
        assert_eq!(first.progress.records, 4);

        let second = reader.read_chunk(100, Duration::from_secs(5));
        assert!(!second.has_more, "end-of-data clears has_more");
        assert_eq!(second.progress.records, 10);
    }

    #[test]
    fn consecutive_history_records_coalesce() {
        let records = vec![
            history(0.0, "loss", 1.0),
            history(1.0, "loss", 0.5),
            Record::Exit { exit_code: 0 },
        ];
        let tmp = write_log(&records);
        let mut reader = RunReader::open(tmp.path());
        let batch = reader.read_available();

        assert_eq!(batch.msgs.len(), 2);
        match &batch.msgs[0] {
            RecordMsg::History(update) => {
                assert_eq!(update.metrics.len(), 1);
                let (title, points) = &update.metrics[0];
                assert_eq!(title, "loss");
                assert_eq!(points.xs, vec![0.0, 1.0]);
                assert_eq!(points.ys, vec![1.0, 0.5]);
            }
            other => panic!("expected coalesced history, got {other:?}"),
        }
        assert_eq!(batch.msgs[1], RecordMsg::FileComplete { exit_code: 0 });
    }

    #[test]
    fn bad_header_is_not_fatal() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"NOTALOG!").unwrap();
        tmp.flush().unwrap();

        let mut reader = RunReader::open(tmp.path());
        let batch = reader.read_chunk(100, Duration::from_secs(1));
        assert!(batch.msgs.is_empty(), "bad header must not fail the run");
        assert!(!batch.has_more);
        // Retry is permitted; the answer stays quiet until the file changes.
        let again = reader.read_available();
        assert!(again.msgs.is_empty());
    }

    #[test]
    fn corrupt_tail_yields_error_msg() {
        let tmp = write_log(&[history(0.0, "loss", 1.0)]);
        let mut f = std::fs::OpenOptions::new()
            .append(true)
            .open(tmp.path())
            .unwrap();
        // A complete frame with a wrong checksum.
        let bogus = br#"{"type":"exit","exit_code":0}"#;
        f.write_all(&(bogus.len() as u32).to_le_bytes()).unwrap();
        f.write_all(&1u32.to_le_bytes()).unwrap();
        f.write_all(bogus).unwrap();
        f.flush().unwrap();

        let mut reader = RunReader::open(tmp.path());
        let batch = reader.read_available();
        assert!(matches!(batch.msgs.last(), Some(RecordMsg::Error(_))));
    }
}
