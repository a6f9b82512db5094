use prate::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

/// Playback tests driven by the virtual clock.
/// These follow a pop-up from its plan document to its last frame.
#[cfg(test)]
mod plan_playback {
    use super::*;

    #[derive(Debug, Default)]
    struct Frames {
        opacity: Vec<f64>,
        positions: Vec<(i32, i32)>,
        current: (i32, i32),
    }

    fn recorded_window(start: (i32, i32)) -> (Properties, Rc<RefCell<Frames>>) {
        let frames = Rc::new(RefCell::new(Frames {
            current: start,
            ..Frames::default()
        }));
        let a = frames.clone();
        let b = frames.clone();
        let c = frames.clone();
        let props = Properties::new()
            .with_opacity(move |alpha| a.borrow_mut().opacity.push(alpha))
            .with_position(move |x, y| {
                let mut frames = b.borrow_mut();
                frames.positions.push((x, y));
                frames.current = (x, y);
            })
            .with_position_source(move || c.borrow().current);
        (props, frames)
    }

    const TOAST_PLAN: &str = r#"{
        "tick-interval-ms": 10,
        "plan": [
            ["alpha;0.2s;linear;(0,1)", "offset_from;0.2s;outexpo;(0,-50)"],
            "wait;1s",
            ["alpha;0.1s;linear;(1,0)", "offset;0.2s;linear;(0,50)"]
        ]
    }"#;

    #[test]
    fn test_document_plays_to_completion() {
        let (props, frames) = recorded_window((500, 500));
        let scheduler = Rc::new(ManualScheduler::new());
        let document = PlanDocument::from_json(TOAST_PLAN).unwrap();
        let timeline = document.build_timeline(&props, scheduler.clone(), &EngineConfig::default());

        assert_eq!(timeline.interval_ms(), 10);
        assert_eq!(timeline.len(), 3);
        assert_eq!(timeline.duration_ms(), 1400);

        let done = Rc::new(RefCell::new(0));
        let d = done.clone();
        timeline.play(move || *d.borrow_mut() += 1);

        scheduler.run_until_idle(5_000);
        assert_eq!(*done.borrow(), 1);
        assert_eq!(timeline.state(), PlaybackState::Done);
        assert_eq!(scheduler.now_ms(), 1400);

        let frames = frames.borrow();
        // the first group rises into place, the last one sinks 50px
        let (_, first_y) = frames.positions[0];
        assert!(first_y > 500 && first_y < 550);
        assert!(frames.positions.contains(&(500, 500)));
        assert_eq!(frames.current, (500, 550));
        assert_eq!(frames.opacity.last(), Some(&0.0));

        // 20 + 10 opacity frames, frozen after each alpha finished
        assert_eq!(frames.opacity.len(), 30);
        // 20 frames rising, 20 sinking
        assert_eq!(frames.positions.len(), 40);
    }

    #[test]
    fn test_stop_then_replay() {
        let (props, frames) = recorded_window((0, 0));
        let scheduler = Rc::new(ManualScheduler::new());
        let plan = Plan::new().then("move;100ms;linear;(0,0);(100,0)").then("wait;1s");
        let timeline = build_timeline(&props, &plan, scheduler.clone(), &EngineConfig::default());

        let done = Rc::new(RefCell::new(false));
        let d = done.clone();
        timeline.play(move || *d.borrow_mut() = true);
        scheduler.advance(50);
        timeline.stop();
        scheduler.advance(5_000);

        assert!(!*done.borrow());
        assert_eq!(timeline.state(), PlaybackState::Idle);
        assert_eq!(frames.borrow().current, (50, 0));

        let d = done.clone();
        timeline.play(move || *d.borrow_mut() = true);
        scheduler.run_until_idle(5_000);
        assert!(*done.borrow());
        assert_eq!(frames.borrow().current, (100, 0));
    }

    #[test]
    fn test_legacy_move_semantics_from_config() {
        let (props, frames) = recorded_window((7, 7));
        let scheduler = Rc::new(ManualScheduler::new());
        let config = EngineConfig::from_json_str(r#"{ "move-semantics": "legacy" }"#).unwrap();
        let plan = Plan::new().then("move;50ms;linear;(0,0);(30,60)");
        let timeline = build_timeline(&props, &plan, scheduler.clone(), &config);

        timeline.play(|| {});
        scheduler.run_until_idle(1_000);

        let frames = frames.borrow();
        assert!(frames.positions.iter().all(|p| *p == (30, 60)));
        assert_eq!(frames.positions.len(), 10);
    }

    #[test]
    fn test_plan_with_nothing_valid_never_plays() {
        let (props, frames) = recorded_window((0, 0));
        let scheduler = Rc::new(ManualScheduler::new());
        let plan = Plan::from_json(r#"["fly;1s", ["alpha;?;linear;(0,1)"], 12]"#).unwrap();
        let timeline = build_timeline(&props, &plan, scheduler.clone(), &EngineConfig::default());

        let called = Rc::new(RefCell::new(false));
        let c = called.clone();
        timeline.play(move || *c.borrow_mut() = true);

        assert!(timeline.is_empty());
        assert_eq!(scheduler.pending(), 0);
        assert_eq!(timeline.state(), PlaybackState::Idle);
        assert!(!*called.borrow());
        assert!(frames.borrow().opacity.is_empty());
    }

    #[test]
    fn test_toast_preset_with_custom_timings() {
        let (props, frames) = recorded_window((1628, 668));
        let scheduler = Rc::new(ManualScheduler::new());
        let mut config = AnimationProfile::Balanced.resolve();
        config.toast = ToastTimings {
            hold_ms: 100,
            travel: 20,
            ..ToastTimings::default()
        };

        let timeline = toast_timeline(&props, scheduler.clone(), &config);
        assert_eq!(timeline.interval_ms(), 16);
        timeline.play(|| {});
        scheduler.run_until_idle(10_000);

        assert_eq!(timeline.state(), PlaybackState::Done);
        assert_eq!(frames.borrow().current, (1628, 688));
    }
}
