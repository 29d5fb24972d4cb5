//! `LiveStore`: tail a run log that may still be growing.
//!
//! Opening succeeds even when the writer has not created or finished the
//! header yet; header verification is retried lazily on each read until it
//! passes. `read_next` returns `Ok(None)` for "no complete record right
//! now" so the caller can poll again after a watcher or heartbeat wakeup.

use crate::framing::FrameReader;
use crate::record::{DecodedPayload, decode_payload};
use crate::{Record, StoreError};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

enum TailState {
    /// File not yet opened or header not yet flushed by the writer.
    Opening,
    /// Header verified; streaming frames.
    Streaming(FrameReader),
    Closed,
}

pub struct LiveStore {
    path: PathBuf,
    state: TailState,
    records_read: u64,
}

impl LiveStore {
    /// Create a tail reader for `path`. The file does not need to exist yet.
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            state: TailState::Opening,
            records_read: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    /// Byte offset of the next unconsumed frame, once streaming.
    pub fn offset(&self) -> Option<u64> {
        match &self.state {
            TailState::Streaming(reader) => Some(reader.offset()),
            _ => None,
        }
    }

    /// Next complete record, `Ok(None)` when no further data is available
    /// right now (the file may still grow), or an error.
    pub fn read_next(&mut self) -> Result<Option<Record>, StoreError> {
        loop {
            match &mut self.state {
                TailState::Closed => return Err(StoreError::Closed),
                TailState::Opening => {
                    let mut file = match File::open(&self.path) {
                        Ok(f) => f,
                        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                            debug!(target: "store.tail", path = %self.path.display(), "log_missing");
                            return Ok(None);
                        }
                        Err(e) => return Err(e.into()),
                    };
                    if !FrameReader::verify_header(&mut file)? {
                        return Ok(None);
                    }
                    info!(target: "store.tail", path = %self.path.display(), "header_verified");
                    self.state = TailState::Streaming(FrameReader::new(file));
                }
                TailState::Streaming(reader) => {
                    let Some(payload) = reader.read_frame()? else {
                        return Ok(None);
                    };
                    let offset = reader.offset();
                    match decode_payload(&payload) {
                        Ok(DecodedPayload::Known(record)) => {
                            self.records_read += 1;
                            return Ok(Some(record));
                        }
                        Ok(DecodedPayload::Unknown(tag)) => {
                            debug!(target: "store.tail", tag = tag.as_str(), "record_skipped_unknown");
                            // Skip and keep reading.
                        }
                        Err(e) => {
                            return Err(StoreError::Corrupt {
                                offset,
                                reason: format!("payload decode: {e}"),
                            });
                        }
                    }
                }
            }
        }
    }

    /// Idempotent. Subsequent reads return `Err(Closed)`.
    pub fn close(&mut self) {
        if !matches!(self.state, TailState::Closed) {
            debug!(
                target: "store.tail",
                path = %self.path.display(),
                records = self.records_read,
                "store_closed"
            );
            self.state = TailState::Closed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framing::{MAGIC, VERSION};
    use std::io::Write;

    fn append_record(file: &mut impl Write, record: &Record) {
        let payload = serde_json::to_vec(record).unwrap();
        file.write_all(&(payload.len() as u32).to_le_bytes()).unwrap();
        file.write_all(&crc32fast::hash(&payload).to_le_bytes()).unwrap();
        file.write_all(&payload).unwrap();
    }

    #[test]
    fn missing_file_then_header_then_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.runlog");
        let mut store = LiveStore::open(&path);

        // Nothing on disk yet: transient, poll again later.
        assert!(store.read_next().unwrap().is_none());

        // Writer creates the file but flushes only part of the header.
        let mut f = File::create(&path).unwrap();
        f.write_all(&MAGIC[..3]).unwrap();
        f.flush().unwrap();
        assert!(store.read_next().unwrap().is_none());

        // Header completes, then one record arrives.
        f.write_all(&MAGIC[3..]).unwrap();
        f.write_all(&VERSION.to_le_bytes()).unwrap();
        append_record(
            &mut f,
            &Record::Exit { exit_code: 0 },
        );
        f.flush().unwrap();

        assert_eq!(
            store.read_next().unwrap(),
            Some(Record::Exit { exit_code: 0 })
        );
        assert!(store.read_next().unwrap().is_none());
        assert_eq!(store.records_read(), 1);
    }

    #[test]
    fn close_is_idempotent_and_sticky() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = LiveStore::open(dir.path().join("b.runlog"));
        store.close();
        store.close();
        assert!(matches!(store.read_next(), Err(StoreError::Closed)));
    }

    #[test]
    fn bad_header_is_surfaced_not_consumed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.runlog");
        std::fs::write(&path, b"GARBAGE!").unwrap();
        let mut store = LiveStore::open(&path);
        assert!(matches!(store.read_next(), Err(StoreError::BadHeader(_))));
        // Still permitted to retry; the answer does not change until the
        // file does.
        assert!(matches!(store.read_next(), Err(StoreError::BadHeader(_))));
    }

    #[test]
    fn unknown_records_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("d.runlog");
        let mut f = File::create(&path).unwrap();
        f.write_all(&MAGIC).unwrap();
        f.write_all(&VERSION.to_le_bytes()).unwrap();
        let unknown = br#"{"type":"artifact","digest":"abc"}"#;
        f.write_all(&(unknown.len() as u32).to_le_bytes()).unwrap();
        f.write_all(&crc32fast::hash(unknown).to_le_bytes()).unwrap();
        f.write_all(unknown).unwrap();
        append_record(&mut f, &Record::Exit { exit_code: 2 });
        f.flush().unwrap();

        let mut store = LiveStore::open(&path);
        assert_eq!(
            store.read_next().unwrap(),
            Some(Record::Exit { exit_code: 2 })
        );
    }
}
