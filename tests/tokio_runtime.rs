#![cfg(feature = "tokio-runtime")]

use prate::prelude::*;
use prate::runtime;
use std::cell::Cell;
use std::rc::Rc;
use tokio::task::LocalSet;

/// The toast choreography on real timers, shortened to keep the test quick
#[tokio::test]
async fn test_toast_on_tokio_timers() {
    LocalSet::new()
        .run_until(async {
            let opacity = Rc::new(Cell::new(0.0));
            let position = Rc::new(Cell::new((12, 668)));
            let o = opacity.clone();
            let p = position.clone();
            let q = position.clone();
            let props = Properties::new()
                .with_opacity(move |a| o.set(a))
                .with_position(move |x, y| p.set((x, y)))
                .with_position_source(move || q.get());

            let config = EngineConfig {
                tick_interval_ms: 2,
                toast: ToastTimings {
                    fade_in_ms: 20,
                    rise_ms: 20,
                    hold_ms: 10,
                    fade_out_ms: 10,
                    sink_ms: 20,
                    travel: 30,
                },
                ..EngineConfig::default()
            };

            let scheduler = Rc::new(TokioScheduler::new());
            let timeline = toast_timeline(&props, scheduler, &config);
            assert!(runtime::play(&timeline).await);

            assert_eq!(timeline.state(), PlaybackState::Done);
            assert_eq!(opacity.get(), 0.0);
            assert_eq!(position.get(), (12, 698));
        })
        .await;
}

#[tokio::test]
async fn test_stop_resolves_play_as_unfinished() {
    LocalSet::new()
        .run_until(async {
            let scheduler = Rc::new(TokioScheduler::new());
            let timeline = Rc::new(Timeline::new(scheduler, 1));
            timeline.append_wait(10_000);

            let stopper = timeline.clone();
            tokio::task::spawn_local(async move {
                tokio::time::sleep(std::time::Duration::from_millis(20)).await;
                stopper.stop();
            });

            assert!(!runtime::play(&timeline).await);
            assert_eq!(timeline.state(), PlaybackState::Idle);
        })
        .await;
}
