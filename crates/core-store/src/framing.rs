//! Frame-level reader for the run log.
//!
//! Layout: an 8-byte file header (`MAGIC` + little-endian version), then a
//! sequence of frames `[u32 payload_len][u32 crc32(payload)][payload]`.
//! The reader tracks a committed offset and only advances it past frames
//! whose length, checksum, and payload are fully present and valid. Any
//! short read seeks back to the committed offset so the same bytes are
//! retried once the writer appends more.

use crate::StoreError;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use tracing::{debug, warn};

pub const MAGIC: [u8; 6] = *b"RUNLOG";
pub const VERSION: u16 = 1;
/// Magic + version.
pub const HEADER_LEN: u64 = 8;
/// Per-frame length + checksum prefix.
pub const FRAME_HEADER_LEN: u64 = 8;
/// Upper bound on a single payload; anything larger is corruption, not data.
pub const MAX_RECORD_LEN: u32 = 16 * 1024 * 1024;

/// Reads validated frames from an open log file, never consuming a partial
/// trailing frame.
pub struct FrameReader {
    file: File,
    /// Offset of the next unconsumed byte; only moves past whole frames.
    offset: u64,
}

impl FrameReader {
    /// Caller has already verified the file header; `offset` starts just
    /// past it.
    pub fn new(file: File) -> Self {
        Self {
            file,
            offset: HEADER_LEN,
        }
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Verify the fixed header at offset 0 of `file`.
    ///
    /// `Ok(false)` means the writer has not flushed a full header yet and the
    /// caller should retry later. `Err(BadHeader)` means eight bytes exist
    /// and they are not ours.
    pub fn verify_header(file: &mut File) -> Result<bool, StoreError> {
        file.seek(SeekFrom::Start(0))?;
        let mut buf = [0u8; HEADER_LEN as usize];
        match file.read_exact(&mut buf) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                debug!(target: "store.tail", "header_incomplete");
                return Ok(false);
            }
            Err(e) => return Err(e.into()),
        }
        if buf[..MAGIC.len()] != MAGIC {
            return Err(StoreError::BadHeader(format!(
                "magic mismatch: {:02x?}",
                &buf[..MAGIC.len()]
            )));
        }
        let version = u16::from_le_bytes([buf[6], buf[7]]);
        if version != VERSION {
            return Err(StoreError::BadHeader(format!(
                "unsupported version {version}"
            )));
        }
        Ok(true)
    }

    /// Read the next complete frame payload, or `Ok(None)` when the file has
    /// no further complete frame right now.
    pub fn read_frame(&mut self) -> Result<Option<Vec<u8>>, StoreError> {
        let start = self.offset;
        self.file.seek(SeekFrom::Start(start))?;

        let mut header = [0u8; FRAME_HEADER_LEN as usize];
        if !self.read_fully(&mut header)? {
            return Ok(None);
        }
        let len = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
        let expected_crc = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);

        // A complete frame header with an impossible length cannot become
        // valid by appending bytes.
        if len == 0 || len > MAX_RECORD_LEN {
            return Err(StoreError::Corrupt {
                offset: start,
                reason: format!("frame length {len} out of range"),
            });
        }

        let mut payload = vec![0u8; len as usize];
        if !self.read_fully(&mut payload)? {
            return Ok(None);
        }

        let actual_crc = crc32fast::hash(&payload);
        if actual_crc != expected_crc {
            warn!(
                target: "store.tail",
                offset = start,
                expected = expected_crc,
                actual = actual_crc,
                "frame_crc_mismatch"
            );
            return Err(StoreError::Corrupt {
                offset: start,
                reason: format!("crc mismatch: expected {expected_crc:#010x}, got {actual_crc:#010x}"),
            });
        }

        self.offset = start + FRAME_HEADER_LEN + len as u64;
        Ok(Some(payload))
    }

    /// Fill `buf` from the current position. On a short read, rewind to the
    /// committed offset and report `false` so the caller retries later.
    fn read_fully(&mut self, buf: &mut [u8]) -> Result<bool, StoreError> {
        match self.file.read_exact(buf) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                self.file.seek(SeekFrom::Start(self.offset))?;
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }
}
