//! Wire shape of run log records.
//!
//! Payloads are tagged JSON documents. Unknown variants must not fail the
//! stream, so the reader first tries the known enum and falls back to
//! `Record::Unknown` when only the tag is unrecognized (malformed JSON is
//! still corruption; that distinction is made by the caller in `framing`).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Record {
    /// Run identity, emitted once near the start of the log.
    Run {
        id: String,
        #[serde(default)]
        project: String,
        #[serde(default)]
        display_name: String,
        #[serde(default)]
        config: BTreeMap<String, serde_json::Value>,
    },
    /// Scalar metric values logged at one step.
    History {
        step: f64,
        values: BTreeMap<String, f64>,
    },
    /// System telemetry sample (gauges keyed by hierarchical metric name).
    Stats {
        /// Unix seconds.
        timestamp: f64,
        values: BTreeMap<String, f64>,
    },
    /// Host environment facts captured at run start.
    SystemInfo {
        #[serde(default)]
        values: BTreeMap<String, serde_json::Value>,
    },
    /// Latest run summary (overwrites prior summaries).
    Summary {
        #[serde(default)]
        values: BTreeMap<String, serde_json::Value>,
    },
    /// Terminal record: the writer is done with the log.
    Exit { exit_code: i32 },
}

/// Outcome of payload decoding: known record, tolerated unknown, or malformed.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedPayload {
    Known(Record),
    /// Valid JSON object whose `type` tag we do not understand. Skipped.
    Unknown(String),
}

/// Decode one frame payload. Malformed JSON (or a non-object document) is an
/// error; a well-formed document with an unrecognized tag is tolerated so
/// newer writers do not break older readers.
pub fn decode_payload(payload: &[u8]) -> Result<DecodedPayload, serde_json::Error> {
    match serde_json::from_slice::<Record>(payload) {
        Ok(record) => Ok(DecodedPayload::Known(record)),
        Err(enum_err) => {
            // Distinguish "unknown tag" from "broken document" by re-parsing
            // as a generic object and inspecting the tag.
            let value: serde_json::Value = serde_json::from_slice(payload).map_err(|_| enum_err)?;
            match value.get("type").and_then(|t| t.as_str()) {
                Some(tag) => Ok(DecodedPayload::Unknown(tag.to_string())),
                None => Err(serde_json::from_slice::<Record>(b"!").unwrap_err()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_round_trips() {
        let mut values = BTreeMap::new();
        values.insert("train/loss".to_string(), 0.25);
        let rec = Record::History { step: 7.0, values };
        let bytes = serde_json::to_vec(&rec).unwrap();
        assert_eq!(decode_payload(&bytes).unwrap(), DecodedPayload::Known(rec));
    }

    #[test]
    fn unknown_tag_is_tolerated() {
        let bytes = br#"{"type":"telemetry_v9","values":{}}"#;
        match decode_payload(bytes).unwrap() {
            DecodedPayload::Unknown(tag) => assert_eq!(tag, "telemetry_v9"),
            other => panic!("expected unknown, got {other:?}"),
        }
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(decode_payload(b"{\"type\":").is_err());
        assert!(decode_payload(b"[1,2,3]").is_err());
    }

    #[test]
    fn exit_record_tag() {
        let bytes = br#"{"type":"exit","exit_code":1}"#;
        assert_eq!(
            decode_payload(bytes).unwrap(),
            DecodedPayload::Known(Record::Exit { exit_code: 1 })
        );
    }
}
