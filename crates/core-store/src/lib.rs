//! On-disk run log access: framing, wire records, and the live tail reader.
//!
//! A run log is append-only. The writer may flush at any byte boundary, so the
//! reader must treat a truncated trailing frame as "no further data right
//! now" and re-read from the same offset on the next poll. Nothing here ever
//! consumes a partial frame.
//!
//! Invariants:
//! - The committed offset only advances past fully validated frames.
//! - A CRC or length violation at a finalized position is corruption, not EOF.
//! - `LiveStore::close` is idempotent; reads after close fail with `Closed`.

pub mod framing;
pub mod live;
pub mod record;

pub use framing::{FRAME_HEADER_LEN, HEADER_LEN, MAGIC, MAX_RECORD_LEN, VERSION};
pub use live::LiveStore;
pub use record::Record;

use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// File missing or shorter than the fixed header. Retry silently.
    #[error("run log not available yet")]
    TransientUnavailable,
    /// Eight header bytes are present but are not a run log header.
    #[error("bad run log header: {0}")]
    BadHeader(String),
    /// Length or checksum violation at a finalized position.
    #[error("corrupt record at offset {offset}: {reason}")]
    Corrupt { offset: u64, reason: String },
    /// The store was closed by the owner.
    #[error("store closed")]
    Closed,
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl StoreError {
    /// True for conditions the caller should retry on the next poll rather
    /// than surface.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::TransientUnavailable)
    }
}
