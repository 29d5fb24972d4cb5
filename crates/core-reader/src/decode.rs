//! Wire record → UI message translation.

use core_events::{
    HistoryUpdate, MetricPoints, RecordMsg, RunInfo, StatsUpdate, SummaryUpdate, SystemInfoUpdate,
};
use core_store::Record;
use std::collections::BTreeMap;

/// Collects consecutive history records into one `HistoryUpdate`.
///
/// Flushed whenever a non-history record interleaves, preserving the relative
/// order of history data and state transitions (an `Exit` must not be
/// reordered ahead of the samples that preceded it).
#[derive(Default)]
pub struct HistoryAccumulator {
    order: Vec<String>,
    points: BTreeMap<String, MetricPoints>,
}

impl HistoryAccumulator {
    fn push(&mut self, step: f64, values: BTreeMap<String, f64>) {
        for (name, value) in values {
            let entry = self.points.entry(name.clone()).or_insert_with(|| {
                self.order.push(name);
                MetricPoints::default()
            });
            entry.xs.push(step);
            entry.ys.push(value);
        }
    }

    pub fn flush(&mut self, out: &mut Vec<RecordMsg>) {
        if self.order.is_empty() {
            return;
        }
        let mut metrics = Vec::with_capacity(self.order.len());
        for name in self.order.drain(..) {
            if let Some(points) = self.points.remove(&name) {
                metrics.push((name, points));
            }
        }
        out.push(RecordMsg::History(HistoryUpdate { metrics }));
    }
}

/// Translate one record. History records are buffered in `history`; anything
/// else flushes the buffer first so ordering is preserved.
pub fn decode_record(record: Record, history: &mut HistoryAccumulator, out: &mut Vec<RecordMsg>) {
    match record {
        Record::History { step, values } => history.push(step, values),
        Record::Run {
            id,
            project,
            display_name,
            config,
        } => {
            history.flush(out);
            out.push(RecordMsg::Run(RunInfo {
                id,
                project,
                display_name,
                config: stringify_pairs(config),
            }));
        }
        Record::Stats { timestamp, values } => {
            history.flush(out);
            out.push(RecordMsg::Stats(StatsUpdate {
                timestamp,
                metrics: values.into_iter().collect(),
            }));
        }
        Record::SystemInfo { values } => {
            history.flush(out);
            out.push(RecordMsg::SystemInfo(SystemInfoUpdate {
                pairs: stringify_pairs(values),
            }));
        }
        Record::Summary { values } => {
            history.flush(out);
            out.push(RecordMsg::Summary(SummaryUpdate {
                pairs: stringify_pairs(values),
            }));
        }
        Record::Exit { exit_code } => {
            history.flush(out);
            out.push(RecordMsg::FileComplete { exit_code });
        }
    }
}

fn stringify_pairs(values: BTreeMap<String, serde_json::Value>) -> Vec<(String, String)> {
    values
        .into_iter()
        .map(|(k, v)| {
            let rendered = match v {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            (k, rendered)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_flushes_pending_history_first() {
        let mut history = HistoryAccumulator::default();
        let mut out = Vec::new();

        let mut values = BTreeMap::new();
        values.insert("acc".to_string(), 0.9);
        decode_record(Record::History { step: 3.0, values }, &mut history, &mut out);
        decode_record(Record::Exit { exit_code: 0 }, &mut history, &mut out);

        assert!(matches!(out[0], RecordMsg::History(_)));
        assert!(matches!(out[1], RecordMsg::FileComplete { exit_code: 0 }));
    }

    #[test]
    fn config_values_render_without_json_quotes() {
        let mut config = BTreeMap::new();
        config.insert(
            "optimizer".to_string(),
            serde_json::Value::String("adamw".into()),
        );
        config.insert("lr".to_string(), serde_json::json!(0.001));
        let mut history = HistoryAccumulator::default();
        let mut out = Vec::new();
        decode_record(
            Record::Run {
                id: "r1".into(),
                project: "p".into(),
                display_name: "first".into(),
                config,
            },
            &mut history,
            &mut out,
        );

        let RecordMsg::Run(info) = &out[0] else {
            panic!("expected run message");
        };
        assert!(info.config.contains(&("optimizer".to_string(), "adamw".to_string())));
        assert!(info.config.contains(&("lr".to_string(), "0.001".to_string())));
    }

    #[test]
    fn metric_arrays_stay_parallel() {
        let mut history = HistoryAccumulator::default();
        let mut out = Vec::new();
        for step in 0..4 {
            let mut values = BTreeMap::new();
            values.insert("loss".to_string(), step as f64 * 0.1);
            if step % 2 == 0 {
                values.insert("acc".to_string(), 1.0 - step as f64 * 0.1);
            }
            decode_record(
                Record::History {
                    step: step as f64,
                    values,
                },
                &mut history,
                &mut out,
            );
        }
        history.flush(&mut out);

        let RecordMsg::History(update) = &out[0] else {
            panic!("expected history");
        };
        for (name, points) in &update.metrics {
            assert_eq!(points.xs.len(), points.ys.len(), "series {name}");
        }
        let loss = update.metrics.iter().find(|(n, _)| n == "loss").unwrap();
        assert_eq!(loss.1.xs, vec![0.0, 1.0, 2.0, 3.0]);
        let acc = update.metrics.iter().find(|(n, _)| n == "acc").unwrap();
        assert_eq!(acc.1.xs, vec![0.0, 2.0]);
    }
}
