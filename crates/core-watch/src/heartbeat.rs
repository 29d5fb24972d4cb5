//! Generation-guarded one-shot heartbeat timer.
//!
//! Each `start`/`reset` arms a fresh sleep task that captures the current
//! generation. When the sleep fires it re-loads the generation: a mismatch
//! means a newer arm (or `stop`) superseded this timer and the callback is
//! discarded. The live predicate is evaluated at fire time, not arm time.
//!
//! Invariants:
//! - At most one armed timer can ever reach the send: every arm and every
//!   stop bumps the generation, staling all earlier timers.
//! - After `stop`, no heartbeat is delivered: a pre-stop timer that is
//!   already past its sleep still fails the generation compare.
//! - The send is non-blocking; a full channel drops the beat with a warning
//!   (the next wakeup supersedes it).

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

pub struct HeartbeatManager<M> {
    interval: Duration,
    tx: mpsc::Sender<M>,
    beat: M,
    live: Arc<dyn Fn() -> bool + Send + Sync>,
    generation: Arc<AtomicU64>,
}

impl<M: Clone + Send + 'static> HeartbeatManager<M> {
    pub fn new(
        interval: Duration,
        tx: mpsc::Sender<M>,
        beat: M,
        live: impl Fn() -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            interval,
            tx,
            beat,
            live: Arc::new(live),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Arm the timer. Any previously armed timer becomes stale.
    pub fn start(&self) {
        self.arm();
    }

    /// Identical to `start`; named for call sites that re-arm after activity.
    pub fn reset(&self) {
        self.arm();
    }

    /// Invalidate all in-flight timers. No heartbeat fires until the next
    /// `start`/`reset`.
    pub fn stop(&self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        trace!(target: "watch.heartbeat", generation, "heartbeat_stopped");
    }

    fn arm(&self) {
        let armed = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let generation = self.generation.clone();
        let tx = self.tx.clone();
        let beat = self.beat.clone();
        let live = self.live.clone();
        let interval = self.interval;

        tokio::spawn(async move {
            tokio::time::sleep(interval).await;
            let current = generation.load(Ordering::SeqCst);
            if current != armed {
                trace!(target: "watch.heartbeat", armed, current, "heartbeat_stale");
                return;
            }
            if !live() {
                debug!(target: "watch.heartbeat", "heartbeat_skipped_not_live");
                return;
            }
            match tx.try_send(beat) {
                Ok(()) => {
                    core_events::WAKEUP_SENDS.fetch_add(1, Ordering::Relaxed);
                }
                Err(mpsc::error::TrySendError::Full(_)) => {
                    core_events::WAKEUP_DROPS.fetch_add(1, Ordering::Relaxed);
                    warn!(target: "watch.heartbeat", "heartbeat_dropped_channel_full");
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {}
            }
        });
    }
}
