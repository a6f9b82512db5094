//! Tokio-backed tick source
//!
//! Timelines are single-threaded, so every repetition is spawned with
//! [`tokio::task::spawn_local`]. Scheduling must therefore happen inside a
//! [`tokio::task::LocalSet`] (for example via `LocalSet::run_until`).

use crate::animation::driver::{CancelHandle, Scheduler};
use crate::animation::timeline::Timeline;
use std::cell::Cell;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Runs each repetition as a local task driven by `tokio::time::interval`
#[derive(Debug, Default)]
pub struct TokioScheduler {
    spawned: Cell<usize>,
}

impl TokioScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of repetitions spawned so far
    pub fn spawned(&self) -> usize {
        self.spawned.get()
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, interval_ms: u64, mut callback: Box<dyn FnMut()>) -> CancelHandle {
        let handle = CancelHandle::new();
        let cancelled = handle.clone();
        let period = Duration::from_millis(interval_ms.max(1));
        self.spawned.set(self.spawned.get() + 1);

        tokio::task::spawn_local(async move {
            // first tick lands one period from now, not immediately
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                if cancelled.is_cancelled() {
                    break;
                }
                callback();
                if cancelled.is_cancelled() {
                    break;
                }
            }
            log::trace!("tick task every {:?} finished", period);
        });

        handle
    }
}

/// Play `timeline` and wait for it to finish.
///
/// Returns `true` once the done callback fires, and `false` when playback
/// never started (empty timeline) or was stopped or restarted elsewhere.
pub async fn play(timeline: &Timeline) -> bool {
    let (done_tx, done_rx) = oneshot::channel();
    timeline.play(move || {
        let _ = done_tx.send(());
    });
    done_rx.await.is_ok()
}
