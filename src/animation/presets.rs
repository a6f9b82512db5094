//! Ready-made pop-up motions.
//!
//! Offsets are resolved against the live position when the tween starts, so
//! the same preset works wherever the window was placed.

use crate::animation::driver::Scheduler;
use crate::animation::interpolation::EaseFunction;
use crate::animation::timeline::Timeline;
use crate::animation::tweening::{Properties, Tween};
use crate::core::config::EngineConfig;
use crate::core::geo::Position;
use std::rc::Rc;

/// Rise into the current position from `distance` pixels below it
pub fn move_up_here(properties: Properties, distance: i32, duration_ms: u64, ease: EaseFunction) -> Tween {
    Tween::offset_from(properties, Position::new(0, -distance), duration_ms, ease)
}

/// Rise `distance` pixels from the current position
pub fn move_up(properties: Properties, distance: i32, duration_ms: u64, ease: EaseFunction) -> Tween {
    Tween::offset(properties, Position::new(0, -distance), duration_ms, ease)
}

/// Sink into the current position from `distance` pixels above it
pub fn move_down_here(
    properties: Properties,
    distance: i32,
    duration_ms: u64,
    ease: EaseFunction,
) -> Tween {
    Tween::offset_from(properties, Position::new(0, distance), duration_ms, ease)
}

/// Sink `distance` pixels from the current position
pub fn move_down(properties: Properties, distance: i32, duration_ms: u64, ease: EaseFunction) -> Tween {
    Tween::offset(properties, Position::new(0, distance), duration_ms, ease)
}

/// The standard toast: fade in while rising into place, hold, then fade out
/// while sinking away.
pub fn toast_timeline(
    properties: &Properties,
    scheduler: Rc<dyn Scheduler>,
    config: &EngineConfig,
) -> Timeline {
    let timings = &config.toast;
    let timeline = Timeline::with_config(scheduler, config);

    timeline.append(Tween::fade_in(
        properties.clone(),
        timings.fade_in_ms,
        EaseFunction::Linear,
    ));
    timeline.join(move_up_here(
        properties.clone(),
        timings.travel,
        timings.rise_ms,
        EaseFunction::OutExpo,
    ));
    timeline.append_wait(timings.hold_ms);
    timeline.append(Tween::fade_out(
        properties.clone(),
        timings.fade_out_ms,
        EaseFunction::Linear,
    ));
    timeline.join(move_down(
        properties.clone(),
        timings.travel,
        timings.sink_ms,
        EaseFunction::Linear,
    ));

    timeline
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::driver::ManualScheduler;
    use crate::animation::tweening::{Motion, Tweenable};
    use std::cell::Cell;

    #[test]
    fn test_preset_directions() {
        let props = Properties::new();
        let delta = |tween: Tween| match *tween.motion() {
            Motion::Offset { delta, .. } => ("offset", delta),
            Motion::OffsetFrom { delta, .. } => ("offset_from", delta),
            _ => unreachable!(),
        };

        let linear = EaseFunction::Linear;
        assert_eq!(delta(move_up_here(props.clone(), 100, 10, linear)), ("offset_from", Position::new(0, -100)));
        assert_eq!(delta(move_up(props.clone(), 100, 10, linear)), ("offset", Position::new(0, -100)));
        assert_eq!(delta(move_down_here(props.clone(), 100, 10, linear)), ("offset_from", Position::new(0, 100)));
        assert_eq!(delta(move_down(props, 100, 10, linear)), ("offset", Position::new(0, 100)));
    }

    #[test]
    fn test_move_up_here_ends_at_live_position() {
        let position = Rc::new(Cell::new((40, 500)));
        let p = position.clone();
        let q = position.clone();
        let props = Properties::new()
            .with_position(move |x, y| p.set((x, y)))
            .with_position_source(move || q.get());

        let mut tween = move_up_here(props, 100, 10, EaseFunction::OutExpo);
        tween.ready(5);
        tween.tick();
        assert!(position.get().1 < 600 && position.get().1 > 500);
        tween.tick();
        assert_eq!(position.get(), (40, 500));
    }

    #[test]
    fn test_toast_layout() {
        let scheduler = Rc::new(ManualScheduler::new());
        let timeline = toast_timeline(&Properties::new(), scheduler, &EngineConfig::default());

        assert_eq!(timeline.len(), 3);
        assert_eq!(
            timeline.dump(),
            "step 1: group of 2 in 600ms\n\
             \x20 - alpha 0 -> 1 in 600ms\n\
             \x20 - offset_from (0,-100) in 600ms (outexpo)\n\
             step 2: wait 4000ms\n\
             step 3: group of 2 in 600ms\n\
             \x20 - alpha 1 -> 0 in 450ms\n\
             \x20 - offset by (0,100) in 600ms\n"
        );
        assert_eq!(timeline.duration_ms(), 5200);
    }

    #[test]
    fn test_toast_round_trip_position() {
        let opacity = Rc::new(Cell::new(-1.0));
        let position = Rc::new(Cell::new((100, 300)));
        let o = opacity.clone();
        let p = position.clone();
        let q = position.clone();
        let props = Properties::new()
            .with_opacity(move |a| o.set(a))
            .with_position(move |x, y| p.set((x, y)))
            .with_position_source(move || q.get());

        let scheduler = Rc::new(ManualScheduler::new());
        let timeline = toast_timeline(&props, scheduler.clone(), &EngineConfig::default());
        let done = Rc::new(Cell::new(false));
        let d = done.clone();
        timeline.play(move || d.set(true));

        scheduler.advance(600);
        assert_eq!(opacity.get(), 1.0);
        assert_eq!(position.get(), (100, 300));

        scheduler.run_until_idle(10_000);
        assert!(done.get());
        assert_eq!(opacity.get(), 0.0);
        assert_eq!(position.get(), (100, 400));
    }
}
