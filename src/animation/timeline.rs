//! Sequential composition of tween steps.

use crate::animation::driver::{Scheduler, TickDriver};
use crate::animation::group::{Step, TweenGroup};
use crate::animation::tweening::{Tween, Tweenable};
use crate::core::config::EngineConfig;
use std::cell::{Cell, Ref, RefCell};
use std::fmt::Write as _;
use std::rc::{Rc, Weak};

/// Where a timeline is in its playback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    /// Running the slot at this index
    Running(usize),
    Done,
}

type DoneCallback = Rc<RefCell<Option<Box<dyn FnOnce()>>>>;

struct TimelineInner {
    steps: RefCell<Vec<Step>>,
    driver: TickDriver,
    state: Cell<PlaybackState>,
}

/// An ordered list of slots, each run to completion before the next starts.
///
/// Built with [`append`](Timeline::append) (new sequential slot) and
/// [`join`](Timeline::join) (run alongside the newest slot). Playback is an
/// explicit `Idle -> Running(i) -> Done` sequencer advanced by the tick
/// driver's own budget, not by member completion callbacks.
///
/// Property bindings are called from inside tick callbacks. They may read
/// the timeline and may [`stop`](Timeline::stop) it; while a slot is being
/// armed or ticked it is lent out and reads as an empty group. Bindings
/// must not append, join or clear the timeline that is driving them.
pub struct Timeline {
    inner: Rc<TimelineInner>,
}

impl Timeline {
    pub fn new(scheduler: Rc<dyn Scheduler>, interval_ms: u64) -> Self {
        Self {
            inner: Rc::new(TimelineInner {
                steps: RefCell::new(Vec::new()),
                driver: TickDriver::new(scheduler, interval_ms),
                state: Cell::new(PlaybackState::Idle),
            }),
        }
    }

    pub fn with_config(scheduler: Rc<dyn Scheduler>, config: &EngineConfig) -> Self {
        Self::new(scheduler, config.tick_interval_ms())
    }

    pub fn interval_ms(&self) -> u64 {
        self.inner.driver.interval_ms()
    }

    /// Push a new sequential slot; empty groups are ignored
    pub fn append(&self, step: impl Into<Step>) {
        let step = step.into();
        if step.is_empty() {
            return;
        }
        self.inner.steps.borrow_mut().push(step);
    }

    /// Merge into the newest slot so it runs in parallel with it.
    ///
    /// A bare tween slot becomes a two-member group; an existing group gains
    /// a member. On an empty timeline this behaves like `append`.
    pub fn join(&self, step: impl Into<Step>) {
        let step = step.into();
        if step.is_empty() {
            return;
        }

        let mut steps = self.inner.steps.borrow_mut();
        let merged = match steps.pop() {
            Some(last) => last.join(step),
            None => step,
        };
        steps.push(merged);
    }

    pub fn append_wait(&self, duration_ms: u64) {
        self.append(Tween::wait(duration_ms));
    }

    /// Remove every slot, stopping playback first
    pub fn clear(&self) {
        self.stop();
        self.inner.steps.borrow_mut().clear();
    }

    pub fn len(&self) -> usize {
        self.inner.steps.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.steps.borrow().is_empty()
    }

    pub fn state(&self) -> PlaybackState {
        self.inner.state.get()
    }

    pub fn is_playing(&self) -> bool {
        matches!(self.state(), PlaybackState::Running(_))
    }

    /// Borrow the slots for inspection
    pub fn steps(&self) -> Ref<'_, Vec<Step>> {
        self.inner.steps.borrow()
    }

    /// Total nominal duration of one run, in milliseconds
    pub fn duration_ms(&self) -> u64 {
        self.inner
            .steps
            .borrow()
            .iter()
            .map(|step| step.duration_ms())
            .fold(0, u64::saturating_add)
    }

    /// Run every slot in order, then call `on_done`.
    ///
    /// Does nothing on an empty timeline. Playing again while running
    /// restarts from the first slot without calling the earlier `on_done`.
    pub fn play(&self, on_done: impl FnOnce() + 'static) {
        let total = self.len();
        if total == 0 {
            return;
        }

        if self.is_playing() {
            log::debug!("restarting timeline");
            self.inner.driver.stop();
        }

        log::debug!("playing timeline:\n{}", self.dump());
        let on_done: DoneCallback = Rc::new(RefCell::new(Some(Box::new(on_done))));
        advance(&self.inner, 0, total, on_done);
    }

    /// Cancel playback; properties keep whatever the last tick set
    pub fn stop(&self) {
        self.inner.driver.stop();
        if self.is_playing() {
            log::debug!("timeline stopped at {:?}", self.state());
            self.inner.state.set(PlaybackState::Idle);
        }
    }

    /// Human-readable listing of every slot and group member
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for (index, step) in self.inner.steps.borrow().iter().enumerate() {
            let _ = writeln!(out, "step {}: {}", index + 1, step);
            if let Step::Group(group) = step {
                for tween in group.members() {
                    let _ = writeln!(out, "  - {}", tween);
                }
            }
        }
        out
    }
}

impl Drop for Timeline {
    fn drop(&mut self) {
        self.inner.driver.stop();
    }
}

fn advance(inner: &Rc<TimelineInner>, index: usize, total: usize, on_done: DoneCallback) {
    let interval_ms = inner.driver.interval_ms();
    let armed = if index >= total {
        None
    } else {
        with_step(inner, index, |step| {
            step.ready(interval_ms);
            log::debug!("step {} started: {}", index + 1, step);
            step.duration_ms()
        })
    };

    let Some(duration_ms) = armed else {
        inner.state.set(PlaybackState::Done);
        log::info!("timeline finished after {} steps", index);
        let callback = on_done.borrow_mut().take();
        if let Some(callback) = callback {
            callback();
        }
        return;
    };

    inner.state.set(PlaybackState::Running(index));

    let ticking: Weak<TimelineInner> = Rc::downgrade(inner);
    let finishing = ticking.clone();
    inner.driver.start(
        move || {
            if let Some(inner) = ticking.upgrade() {
                with_step(&inner, index, |step| step.tick());
            }
        },
        move || {
            if let Some(inner) = finishing.upgrade() {
                advance(&inner, index + 1, total, on_done);
            }
        },
        duration_ms,
    );
}

/// Run `f` on slot `index` with the slot list released, so user callbacks
/// reached from `f` can read the timeline.
fn with_step<R>(
    inner: &TimelineInner,
    index: usize,
    f: impl FnOnce(&mut Step) -> R,
) -> Option<R> {
    let mut step = {
        let mut steps = inner.steps.borrow_mut();
        let slot = steps.get_mut(index)?;
        std::mem::replace(slot, Step::Group(TweenGroup::new()))
    };

    let result = f(&mut step);

    // stored slots are never empty, so an empty one is still our placeholder
    if let Some(slot) = inner.steps.borrow_mut().get_mut(index) {
        if slot.is_empty() {
            *slot = step;
        }
    }
    Some(result)
}
