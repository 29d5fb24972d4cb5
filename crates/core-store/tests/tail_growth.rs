//! End-to-end tail behavior against a log that grows between polls,
//! mimicking a training process appending while the dashboard reads.

use core_store::{LiveStore, MAGIC, Record, StoreError, VERSION};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;

fn frame_bytes(record: &Record) -> Vec<u8> {
    let payload = serde_json::to_vec(record).unwrap();
    let mut out = Vec::with_capacity(payload.len() + 8);
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    out.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());
    out.extend_from_slice(&payload);
    out
}

fn history(step: f64, name: &str, value: f64) -> Record {
    let mut values = BTreeMap::new();
    values.insert(name.to_string(), value);
    Record::History { step, values }
}

#[test]
fn interleaved_appends_and_polls() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("train.runlog");
    let mut writer = File::create(&path).unwrap();
    writer.write_all(&MAGIC).unwrap();
    writer.write_all(&VERSION.to_le_bytes()).unwrap();
    writer.flush().unwrap();

    let mut store = LiveStore::open(&path);
    assert!(store.read_next().unwrap().is_none());

    for step in 0..5 {
        writer
            .write_all(&frame_bytes(&history(step as f64, "loss", 1.0 / (step + 1) as f64)))
            .unwrap();
    }
    writer.flush().unwrap();

    let mut steps = Vec::new();
    while let Some(record) = store.read_next().unwrap() {
        if let Record::History { step, .. } = record {
            steps.push(step);
        }
    }
    assert_eq!(steps, vec![0.0, 1.0, 2.0, 3.0, 4.0]);

    // Writer appends a frame in two flushes; the half-written tail must not
    // surface until complete.
    let tail = frame_bytes(&history(5.0, "loss", 0.1));
    let (head, rest) = tail.split_at(5);
    writer.write_all(head).unwrap();
    writer.flush().unwrap();
    assert!(store.read_next().unwrap().is_none());

    writer.write_all(rest).unwrap();
    writer.flush().unwrap();
    match store.read_next().unwrap() {
        Some(Record::History { step, .. }) => assert_eq!(step, 5.0),
        other => panic!("expected completed frame, got {other:?}"),
    }

    store.close();
    assert!(matches!(store.read_next(), Err(StoreError::Closed)));
}
