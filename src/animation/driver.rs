//! Periodic tick sources.
//!
//! A [`Scheduler`] is the one primitive the engine consumes from its host:
//! a repeating, cancelable millisecond timer. [`TickDriver`] turns it into a
//! bounded run of `n` ticks followed by one completion callback.
//! [`ManualScheduler`] is a virtual-clock implementation for deterministic
//! playback and tests.

use crate::animation::tweening::ticks_for;
use crate::core::constants::DEFAULT_TICK_INTERVAL_MS;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Shared cancellation flag for one scheduled repetition
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Rc<Cell<bool>>);

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// Repeating, cancelable timer supplied by the host environment.
///
/// Implementations call `callback` every `interval_ms` until the returned
/// handle is cancelled. They must never invoke the callback from inside
/// `schedule` itself.
pub trait Scheduler {
    fn schedule(&self, interval_ms: u64, callback: Box<dyn FnMut()>) -> CancelHandle;
}

/// Drives a fixed number of ticks at a fixed interval, then completes once
pub struct TickDriver {
    interval_ms: u64,
    scheduler: Rc<dyn Scheduler>,
    current: Rc<RefCell<Option<CancelHandle>>>,
    // bumped by every start and stop; a run only completes while it is current
    generation: Rc<Cell<u64>>,
}

impl TickDriver {
    pub fn new(scheduler: Rc<dyn Scheduler>, interval_ms: u64) -> Self {
        Self {
            interval_ms: interval_ms.max(1),
            scheduler,
            current: Rc::new(RefCell::new(None)),
            generation: Rc::new(Cell::new(0)),
        }
    }

    pub fn with_default_interval(scheduler: Rc<dyn Scheduler>) -> Self {
        Self::new(scheduler, DEFAULT_TICK_INTERVAL_MS)
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// Start a run of `duration_ms / interval` ticks (at least one).
    ///
    /// Any run already in progress is cancelled first. `on_completed` fires
    /// after the last `on_tick`, once the repetition has been cancelled, so it
    /// may start the next run on this same driver. If `on_tick` stops or
    /// restarts the driver, this run ends there and `on_completed` never fires.
    pub fn start<T, C>(&self, mut on_tick: T, on_completed: C, duration_ms: u64)
    where
        T: FnMut() + 'static,
        C: FnOnce() + 'static,
    {
        self.stop();

        let total = ticks_for(duration_ms, self.interval_ms);
        let mut elapsed = 0u64;
        let mut on_completed = Some(on_completed);
        let current = self.current.clone();
        let generation = self.generation.clone();
        let run = generation.get();

        let handle = self.scheduler.schedule(
            self.interval_ms,
            Box::new(move || {
                elapsed += 1;
                log::trace!("tick {}/{}", elapsed, total);
                on_tick();
                if generation.get() != run || elapsed < total {
                    return;
                }

                if let Some(handle) = current.borrow_mut().take() {
                    handle.cancel();
                }
                if let Some(on_completed) = on_completed.take() {
                    on_completed();
                }
            }),
        );

        *self.current.borrow_mut() = Some(handle);
    }

    /// Cancel the pending repetition, if any
    pub fn stop(&self) {
        self.generation.set(self.generation.get().wrapping_add(1));
        if let Some(handle) = self.current.borrow_mut().take() {
            handle.cancel();
        }
    }

    pub fn is_running(&self) -> bool {
        self.current
            .borrow()
            .as_ref()
            .map(|handle| !handle.is_cancelled())
            .unwrap_or(false)
    }
}

impl Drop for TickDriver {
    fn drop(&mut self) {
        self.stop();
    }
}

struct ManualTask {
    handle: CancelHandle,
    interval_ms: u64,
    due_ms: u64,
    callback: Rc<RefCell<Box<dyn FnMut()>>>,
}

/// A scheduler with a virtual clock that only moves when told to
#[derive(Default)]
pub struct ManualScheduler {
    now_ms: Cell<u64>,
    tasks: RefCell<Vec<ManualTask>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms.get()
    }

    /// Number of live repetitions
    pub fn pending(&self) -> usize {
        self.tasks
            .borrow()
            .iter()
            .filter(|task| !task.handle.is_cancelled())
            .count()
    }

    /// Move the clock forward, firing every callback that falls due.
    ///
    /// Returns the number of callbacks fired.
    pub fn advance(&self, ms: u64) -> usize {
        let target = self.now_ms.get() + ms;
        let mut fired = 0;

        while let Some((due_ms, callback)) = self.next_due(target) {
            self.now_ms.set(due_ms);
            let mut callback = callback.borrow_mut();
            (&mut **callback)();
            fired += 1;
        }

        self.now_ms.set(target);
        self.tasks
            .borrow_mut()
            .retain(|task| !task.handle.is_cancelled());
        fired
    }

    /// Advance one millisecond at a time until nothing is scheduled or
    /// `limit_ms` have elapsed. Returns the number of callbacks fired.
    pub fn run_until_idle(&self, limit_ms: u64) -> usize {
        let mut fired = 0;
        let mut spent = 0;
        while self.pending() > 0 && spent < limit_ms {
            fired += self.advance(1);
            spent += 1;
        }
        fired
    }

    fn next_due(&self, target: u64) -> Option<(u64, Rc<RefCell<Box<dyn FnMut()>>>)> {
        let mut tasks = self.tasks.borrow_mut();
        let task = tasks
            .iter_mut()
            .filter(|task| !task.handle.is_cancelled() && task.due_ms <= target)
            .min_by_key(|task| task.due_ms)?;

        let due_ms = task.due_ms;
        task.due_ms += task.interval_ms;
        Some((due_ms, task.callback.clone()))
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, interval_ms: u64, callback: Box<dyn FnMut()>) -> CancelHandle {
        let interval_ms = interval_ms.max(1);
        let handle = CancelHandle::new();
        self.tasks.borrow_mut().push(ManualTask {
            handle: handle.clone(),
            interval_ms,
            due_ms: self.now_ms.get() + interval_ms,
            callback: Rc::new(RefCell::new(callback)),
        });
        handle
    }
}
