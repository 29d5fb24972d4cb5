//! End-to-end single-run pipeline: a run log on disk streams through the
//! reader task into the run state machine and its grids, exactly as the
//! event loop would drive it.

use core_config::Config;
use core_events::WindowSizeMsg;
use core_model::{Msg, Run, RunState};
use core_store::{MAGIC, Record, VERSION};
use std::collections::BTreeMap;
use std::io::Write;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout;

fn append_record(out: &mut impl Write, record: &Record) {
    let payload = serde_json::to_vec(record).unwrap();
    out.write_all(&(payload.len() as u32).to_le_bytes()).unwrap();
    out.write_all(&crc32fast::hash(&payload).to_le_bytes()).unwrap();
    out.write_all(&payload).unwrap();
}

fn write_run_log(path: &std::path::Path, exit_code: i32) {
    let mut f = std::fs::File::create(path).unwrap();
    f.write_all(&MAGIC).unwrap();
    f.write_all(&VERSION.to_le_bytes()).unwrap();

    append_record(
        &mut f,
        &Record::Run {
            id: "exp-41".into(),
            project: "mnist".into(),
            display_name: "lr-sweep-41".into(),
            config: BTreeMap::from([(
                "lr".to_string(),
                serde_json::json!(0.001),
            )]),
        },
    );
    for step in 0..50 {
        let mut values = BTreeMap::new();
        values.insert("train/loss".to_string(), 1.0 / (step + 1) as f64);
        values.insert("train/acc".to_string(), 1.0 - 1.0 / (step + 2) as f64);
        append_record(&mut f, &Record::History { step: step as f64, values });
    }
    append_record(
        &mut f,
        &Record::Stats {
            timestamp: 1_700_000_000.0,
            values: BTreeMap::from([("gpu.0.temp".to_string(), 61.0)]),
        },
    );
    append_record(
        &mut f,
        &Record::Summary {
            values: BTreeMap::from([(
                "best_loss".to_string(),
                serde_json::json!(0.02),
            )]),
        },
    );
    append_record(&mut f, &Record::Exit { exit_code });
    f.flush().unwrap();
}

async fn pump_until<F: Fn(&Run) -> bool>(
    run: &mut Run,
    rx: &mut mpsc::Receiver<Msg>,
    done: F,
) {
    for _ in 0..200 {
        if done(run) {
            return;
        }
        let msg = timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("pipeline must keep producing messages")
            .expect("channel must stay open while the run is live");
        run.update(msg);
    }
    panic!("pipeline did not settle");
}

#[tokio::test(flavor = "multi_thread")]
async fn backfill_flows_from_disk_to_grids() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("exp-41.runlog");
    write_run_log(&path, 0);

    let (tx, mut rx) = mpsc::channel::<Msg>(256);
    let mut run = Run::new("exp-41".to_string(), path, tx, Config::default(), None);
    run.update(Msg::WindowSize(WindowSizeMsg {
        width: 220,
        height: 60,
    }));

    pump_until(&mut run, &mut rx, |r| {
        r.backfill_done() && r.state().is_terminal()
    })
    .await;

    assert_eq!(run.state(), RunState::Finished);
    assert_eq!(run.metrics().len(), 2);
    let loss = run
        .metrics()
        .chart_by_title("train/loss")
        .expect("loss chart exists");
    let series = loss.series("Default").expect("single-run series");
    assert_eq!(series.len(), 50);
    assert_eq!(run.overview().display_name(), "lr-sweep-41");
}

#[tokio::test(flavor = "multi_thread")]
async fn nonzero_exit_fails_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("exp-9.runlog");
    write_run_log(&path, 7);

    let (tx, mut rx) = mpsc::channel::<Msg>(256);
    let mut run = Run::new("exp-9".to_string(), path, tx, Config::default(), None);
    run.update(Msg::WindowSize(WindowSizeMsg {
        width: 220,
        height: 60,
    }));

    pump_until(&mut run, &mut rx, |r| r.state().is_terminal()).await;
    assert_eq!(run.state(), RunState::Failed);
}
