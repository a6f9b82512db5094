use crate::animation::interpolation::{lerp, EaseFunction};
use crate::core::constants::{DEFAULT_TICK_INTERVAL_MS, MIN_TICKS};
use crate::core::geo::Position;
use std::fmt;
use std::rc::Rc;

/// Capability shared by everything a timeline can run as one step
pub trait Tweenable {
    /// Arm the unit for a run at the given tick interval (clamped to >= 1ms)
    fn ready(&mut self, interval_ms: u64);

    /// Advance by one tick
    fn tick(&mut self);

    /// Nominal duration in milliseconds
    fn duration_ms(&self) -> u64;

    /// Whether the unit reached its final tick since the last `ready`
    fn is_finished(&self) -> bool;
}

/// Number of ticks needed to cover `duration_ms` at `interval_ms`
pub fn ticks_for(duration_ms: u64, interval_ms: u64) -> u64 {
    (duration_ms / interval_ms.max(1)).max(MIN_TICKS)
}

/// Tick budget of a single run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickCounter {
    pub total: u64,
    pub elapsed: u64,
}

impl TickCounter {
    pub fn armed(duration_ms: u64, interval_ms: u64) -> Self {
        Self {
            total: ticks_for(duration_ms, interval_ms),
            elapsed: 0,
        }
    }

    /// Count one tick and return the new elapsed value
    pub fn advance(&mut self) -> u64 {
        self.elapsed += 1;
        self.elapsed
    }

    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.total
    }

    /// Linear progress; exactly `1.0` once complete
    pub fn progress(&self) -> f64 {
        if self.is_complete() {
            1.0
        } else {
            self.elapsed as f64 / self.total as f64
        }
    }
}

type OpacitySetter = Rc<dyn Fn(f64)>;
type PositionSetter = Rc<dyn Fn(i32, i32)>;
type PositionGetter = Rc<dyn Fn() -> (i32, i32)>;

/// Caller-owned property bindings a tween drives.
///
/// The engine never owns the animated object; it only calls these. Any
/// binding left unset degrades to a no-op setter (or the origin, for the
/// position source).
#[derive(Clone, Default)]
pub struct Properties {
    opacity: Option<OpacitySetter>,
    position: Option<PositionSetter>,
    position_source: Option<PositionGetter>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_opacity(mut self, setter: impl Fn(f64) + 'static) -> Self {
        self.opacity = Some(Rc::new(setter));
        self
    }

    pub fn with_position(mut self, setter: impl Fn(i32, i32) + 'static) -> Self {
        self.position = Some(Rc::new(setter));
        self
    }

    pub fn with_position_source(mut self, getter: impl Fn() -> (i32, i32) + 'static) -> Self {
        self.position_source = Some(Rc::new(getter));
        self
    }

    pub fn has_opacity(&self) -> bool {
        self.opacity.is_some()
    }

    pub fn has_position(&self) -> bool {
        self.position.is_some()
    }

    pub fn has_position_source(&self) -> bool {
        self.position_source.is_some()
    }

    pub fn set_opacity(&self, alpha: f64) {
        if let Some(setter) = &self.opacity {
            setter(alpha);
        }
    }

    pub fn set_position(&self, position: Position) {
        if let Some(setter) = &self.position {
            setter(position.x, position.y);
        }
    }

    /// Sample the live position of the target
    pub fn position(&self) -> Position {
        self.position_source
            .as_ref()
            .map(|getter| Position::from(getter()))
            .unwrap_or(Position::ORIGIN)
    }
}

impl fmt::Debug for Properties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Properties")
            .field("opacity", &self.has_opacity())
            .field("position", &self.has_position())
            .field("position_source", &self.has_position_source())
            .finish()
    }
}

/// What a tween does with its progress
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    /// Occupies time and touches nothing
    Wait,
    /// Opacity from `from` to `to`
    Alpha {
        from: f64,
        to: f64,
        ease: EaseFunction,
    },
    /// Absolute move; `from: None` starts at the live position sampled on `ready`
    Move {
        from: Option<Position>,
        to: Position,
        ease: EaseFunction,
    },
    /// Move by `delta` away from the live position sampled on `ready`
    Offset { delta: Position, ease: EaseFunction },
    /// Move into the live position sampled on `ready`, starting `delta` away from it
    OffsetFrom { delta: Position, ease: EaseFunction },
}

impl Motion {
    pub fn ease(&self) -> EaseFunction {
        match self {
            Motion::Wait => EaseFunction::Linear,
            Motion::Alpha { ease, .. }
            | Motion::Move { ease, .. }
            | Motion::Offset { ease, .. }
            | Motion::OffsetFrom { ease, .. } => *ease,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Motion::Wait => "wait",
            Motion::Alpha { .. } => "alpha",
            Motion::Move { .. } => "move",
            Motion::Offset { .. } => "offset",
            Motion::OffsetFrom { .. } => "offset_from",
        }
    }
}

/// The atomic timed interpolation
pub struct Tween {
    duration_ms: u64,
    motion: Motion,
    properties: Properties,
    counter: TickCounter,
    span: Option<(Position, Position)>,
    finished: bool,
    on_completed: Option<Box<dyn FnMut()>>,
}

impl Tween {
    /// Create a tween; durations below one millisecond are raised to one
    pub fn new(properties: Properties, motion: Motion, duration_ms: u64) -> Self {
        let duration_ms = duration_ms.max(1);
        let span = match motion {
            Motion::Move {
                from: Some(from),
                to,
                ..
            } => Some((from, to)),
            _ => None,
        };

        Self {
            duration_ms,
            motion,
            properties,
            counter: TickCounter::armed(duration_ms, DEFAULT_TICK_INTERVAL_MS),
            span,
            finished: false,
            on_completed: None,
        }
    }

    pub fn wait(duration_ms: u64) -> Self {
        Self::new(Properties::default(), Motion::Wait, duration_ms)
    }

    pub fn alpha(
        properties: Properties,
        from: f64,
        to: f64,
        duration_ms: u64,
        ease: EaseFunction,
    ) -> Self {
        Self::new(properties, Motion::Alpha { from, to, ease }, duration_ms)
    }

    pub fn fade_in(properties: Properties, duration_ms: u64, ease: EaseFunction) -> Self {
        Self::alpha(properties, 0.0, 1.0, duration_ms, ease)
    }

    pub fn fade_out(properties: Properties, duration_ms: u64, ease: EaseFunction) -> Self {
        Self::alpha(properties, 1.0, 0.0, duration_ms, ease)
    }

    pub fn move_to(
        properties: Properties,
        from: Position,
        to: Position,
        duration_ms: u64,
        ease: EaseFunction,
    ) -> Self {
        let motion = Motion::Move {
            from: Some(from),
            to,
            ease,
        };
        Self::new(properties, motion, duration_ms)
    }

    /// Move from wherever the target is when this tween starts
    pub fn move_from_current(
        properties: Properties,
        to: Position,
        duration_ms: u64,
        ease: EaseFunction,
    ) -> Self {
        let motion = Motion::Move {
            from: None,
            to,
            ease,
        };
        Self::new(properties, motion, duration_ms)
    }

    pub fn offset(
        properties: Properties,
        delta: Position,
        duration_ms: u64,
        ease: EaseFunction,
    ) -> Self {
        Self::new(properties, Motion::Offset { delta, ease }, duration_ms)
    }

    pub fn offset_from(
        properties: Properties,
        delta: Position,
        duration_ms: u64,
        ease: EaseFunction,
    ) -> Self {
        Self::new(properties, Motion::OffsetFrom { delta, ease }, duration_ms)
    }

    /// Attach a callback fired once per run, after the final update
    pub fn with_on_completed(mut self, on_completed: impl FnMut() + 'static) -> Self {
        self.on_completed = Some(Box::new(on_completed));
        self
    }

    pub fn set_on_completed(&mut self, on_completed: Option<Box<dyn FnMut()>>) {
        self.on_completed = on_completed;
    }

    pub fn motion(&self) -> &Motion {
        &self.motion
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn counter(&self) -> TickCounter {
        self.counter
    }

    /// Endpoints of a positional tween, once known
    pub fn span(&self) -> Option<(Position, Position)> {
        self.span
    }

    fn warn_missing_bindings(&self) {
        let props = &self.properties;
        match self.motion {
            Motion::Wait => {}
            Motion::Alpha { .. } if !props.has_opacity() => {
                log::warn!("{} has no opacity setter, it will only take time", self);
            }
            Motion::Alpha { .. } => {}
            Motion::Move { from, .. } => {
                if !props.has_position() {
                    log::warn!("{} has no position setter, it will only take time", self);
                }
                if from.is_none() && !props.has_position_source() {
                    log::warn!("{} has no position source, starting from the origin", self);
                }
            }
            Motion::Offset { .. } | Motion::OffsetFrom { .. } => {
                if !props.has_position() {
                    log::warn!("{} has no position setter, it will only take time", self);
                }
                if !props.has_position_source() {
                    log::warn!("{} has no position source, offsetting the origin", self);
                }
            }
        }
    }

    fn resolve_span(&mut self) {
        self.span = match self.motion {
            Motion::Move { from, to, .. } => {
                Some((from.unwrap_or_else(|| self.properties.position()), to))
            }
            Motion::Offset { delta, .. } => {
                let current = self.properties.position();
                Some((current, current + delta))
            }
            Motion::OffsetFrom { delta, .. } => {
                let current = self.properties.position();
                Some((current - delta, current))
            }
            Motion::Wait | Motion::Alpha { .. } => None,
        };
    }

    fn update(&self, progress: f64) {
        match self.motion {
            Motion::Wait => {}
            Motion::Alpha { from, to, ease } => {
                self.properties.set_opacity(lerp(from, to, ease.apply(progress)));
            }
            Motion::Move { ease, .. } | Motion::Offset { ease, .. } | Motion::OffsetFrom { ease, .. } => {
                if let Some((from, to)) = self.span {
                    let t = ease.apply(progress);
                    let x = lerp(from.x as f64, to.x as f64, t).round() as i32;
                    let y = lerp(from.y as f64, to.y as f64, t).round() as i32;
                    self.properties.set_position(Position::new(x, y));
                }
            }
        }
    }
}

impl Tweenable for Tween {
    fn ready(&mut self, interval_ms: u64) {
        self.counter = TickCounter::armed(self.duration_ms, interval_ms);
        self.finished = false;
        self.warn_missing_bindings();
        self.resolve_span();
    }

    fn tick(&mut self) {
        // Completed tweens stay frozen until re-armed
        if self.finished {
            return;
        }

        self.counter.advance();
        if self.counter.is_complete() {
            self.update(1.0);
            self.finished = true;
            log::trace!("tween finished: {}", self);
            if let Some(on_completed) = self.on_completed.as_mut() {
                on_completed();
            }
        } else {
            self.update(self.counter.progress());
        }
    }

    fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    fn is_finished(&self) -> bool {
        self.finished
    }
}

impl fmt::Display for Tween {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.motion {
            Motion::Wait => return write!(f, "wait {}ms", self.duration_ms),
            Motion::Alpha { from, to, .. } => {
                write!(f, "alpha {} -> {} in {}ms", from, to, self.duration_ms)?
            }
            Motion::Move { to, .. } => match self.span {
                Some((from, to)) => write!(f, "move {} -> {} in {}ms", from, to, self.duration_ms)?,
                None => write!(f, "move (current) -> {} in {}ms", to, self.duration_ms)?,
            },
            Motion::Offset { delta, .. } => {
                write!(f, "offset by {} in {}ms", delta, self.duration_ms)?
            }
            Motion::OffsetFrom { delta, .. } => {
                write!(f, "offset_from {} in {}ms", delta, self.duration_ms)?
            }
        }

        let ease = self.motion.ease();
        if ease != EaseFunction::Linear {
            write!(f, " ({})", ease)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Tween {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tween")
            .field("duration_ms", &self.duration_ms)
            .field("motion", &self.motion)
            .field("counter", &self.counter)
            .field("span", &self.span)
            .field("finished", &self.finished)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    fn recording_opacity() -> (Properties, Rc<RefCell<Vec<f64>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        let props = Properties::new().with_opacity(move |a| sink.borrow_mut().push(a));
        (props, log)
    }

    #[test]
    fn test_tick_budget() {
        assert_eq!(ticks_for(500, 5), 100);
        assert_eq!(ticks_for(3, 5), 1);
        assert_eq!(ticks_for(0, 5), 1);
        assert_eq!(ticks_for(10, 0), 10);
    }

    #[test]
    fn test_progress_reaches_one_exactly_once() {
        let (props, log) = recording_opacity();
        let completions = Rc::new(Cell::new(0));
        let done = completions.clone();
        let mut tween = Tween::alpha(props, 0.0, 1.0, 20, EaseFunction::OutBack)
            .with_on_completed(move || done.set(done.get() + 1));

        tween.ready(5);
        for _ in 0..4 {
            tween.tick();
        }

        let log = log.borrow();
        assert_eq!(log.len(), 4);
        assert_eq!(*log.last().unwrap(), 1.0);
        assert_eq!(log.iter().filter(|a| **a == 1.0).count(), 1);
        assert_eq!(completions.get(), 1);
        assert!(tween.is_finished());
    }

    #[test]
    fn test_finished_tween_is_frozen() {
        let (props, log) = recording_opacity();
        let completions = Rc::new(Cell::new(0));
        let done = completions.clone();
        let mut tween = Tween::fade_in(props, 10, EaseFunction::Linear)
            .with_on_completed(move || done.set(done.get() + 1));

        tween.ready(5);
        for _ in 0..6 {
            tween.tick();
        }

        assert_eq!(*log.borrow(), vec![0.5, 1.0]);
        assert_eq!(completions.get(), 1);
        assert_eq!(tween.counter().elapsed, 2);
    }

    #[test]
    fn test_ready_rearms_for_replay() {
        let (props, log) = recording_opacity();
        let mut tween = Tween::fade_out(props, 10, EaseFunction::Linear);

        tween.ready(5);
        tween.tick();
        tween.tick();
        tween.ready(5);
        assert!(!tween.is_finished());
        tween.tick();
        tween.tick();

        assert_eq!(*log.borrow(), vec![0.5, 0.0, 0.5, 0.0]);
    }

    #[test]
    fn test_zero_duration_and_interval_are_clamped() {
        let (props, log) = recording_opacity();
        let mut tween = Tween::fade_in(props, 0, EaseFunction::Linear);
        assert_eq!(tween.duration_ms(), 1);

        tween.ready(0);
        assert_eq!(tween.counter().total, 1);
        tween.tick();
        assert_eq!(*log.borrow(), vec![1.0]);
    }

    #[test]
    fn test_move_rounds_positions() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        let props = Properties::new().with_position(move |x, y| sink.borrow_mut().push((x, y)));
        let mut tween = Tween::move_to(
            props,
            Position::new(0, 0),
            Position::new(10, 5),
            15,
            EaseFunction::Linear,
        );

        tween.ready(5);
        for _ in 0..3 {
            tween.tick();
        }

        assert_eq!(*log.borrow(), vec![(3, 2), (7, 3), (10, 5)]);
    }

    #[test]
    fn test_offset_resolves_at_ready_time() {
        let live = Rc::new(Cell::new((10, 10)));
        let source = live.clone();
        let sink = live.clone();
        let props = Properties::new()
            .with_position(move |x, y| sink.set((x, y)))
            .with_position_source(move || source.get());

        let mut tween = Tween::offset(props, Position::new(0, -100), 10, EaseFunction::Linear);
        // the target moves after construction but before the tween starts
        live.set((50, 200));
        tween.ready(5);
        assert_eq!(
            tween.span(),
            Some((Position::new(50, 200), Position::new(50, 100)))
        );

        tween.tick();
        tween.tick();
        assert_eq!(live.get(), (50, 100));
    }

    #[test]
    fn test_offset_from_ends_at_current_position() {
        let props = Properties::new().with_position_source(|| (300, 400));
        let mut tween = Tween::offset_from(props, Position::new(0, -100), 600, EaseFunction::OutExpo);

        tween.ready(5);
        assert_eq!(
            tween.span(),
            Some((Position::new(300, 500), Position::new(300, 400)))
        );
    }

    #[test]
    fn test_missing_bindings_are_noops() {
        let mut tween = Tween::offset(Properties::new(), Position::new(5, 5), 10, EaseFunction::Linear);
        tween.ready(5);
        tween.tick();
        tween.tick();
        assert!(tween.is_finished());
        assert_eq!(
            tween.span(),
            Some((Position::ORIGIN, Position::new(5, 5)))
        );
    }

    #[test]
    fn test_descriptions() {
        let props = Properties::new();
        assert_eq!(Tween::wait(4000).to_string(), "wait 4000ms");
        assert_eq!(
            Tween::alpha(props.clone(), 0.0, 1.0, 500, EaseFunction::Linear).to_string(),
            "alpha 0 -> 1 in 500ms"
        );
        assert_eq!(
            Tween::move_to(
                props.clone(),
                Position::new(0, 0),
                Position::new(100, 0),
                500,
                EaseFunction::Linear
            )
            .to_string(),
            "move (0,0) -> (100,0) in 500ms"
        );
        assert_eq!(
            Tween::offset(props, Position::new(0, 100), 600, EaseFunction::OutExpo).to_string(),
            "offset by (0,100) in 600ms (outexpo)"
        );
    }
}
