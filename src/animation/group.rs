//! Parallel composition and timeline slots.

use crate::animation::tweening::{TickCounter, Tween, Tweenable};
use crate::core::constants::DEFAULT_TICK_INTERVAL_MS;
use std::fmt;

/// Tweens started together and advanced by one shared tick count.
///
/// Every member is ticked on every group tick for the whole group duration;
/// members that finish early stay frozen at their final value.
pub struct TweenGroup {
    members: Vec<Tween>,
    duration_ms: u64,
    counter: TickCounter,
    finished: bool,
    on_completed: Option<Box<dyn FnMut()>>,
}

impl TweenGroup {
    pub fn new() -> Self {
        Self {
            members: Vec::new(),
            duration_ms: 0,
            counter: TickCounter::default(),
            finished: false,
            on_completed: None,
        }
    }

    /// Add a member; the group duration becomes the longest member duration
    pub fn push(&mut self, tween: Tween) {
        self.duration_ms = self.duration_ms.max(tween.duration_ms());
        self.members.push(tween);
        self.counter = TickCounter::armed(self.duration_ms, DEFAULT_TICK_INTERVAL_MS);
    }

    pub fn with_member(mut self, tween: Tween) -> Self {
        self.push(tween);
        self
    }

    pub fn with_on_completed(mut self, on_completed: impl FnMut() + 'static) -> Self {
        self.on_completed = Some(Box::new(on_completed));
        self
    }

    pub fn members(&self) -> &[Tween] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn counter(&self) -> TickCounter {
        self.counter
    }
}

impl Default for TweenGroup {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<Tween> for TweenGroup {
    fn from_iter<I: IntoIterator<Item = Tween>>(iter: I) -> Self {
        let mut group = TweenGroup::new();
        for tween in iter {
            group.push(tween);
        }
        group
    }
}

impl Tweenable for TweenGroup {
    fn ready(&mut self, interval_ms: u64) {
        self.counter = TickCounter::armed(self.duration_ms, interval_ms);
        self.finished = false;
        for member in &mut self.members {
            member.ready(interval_ms);
        }
    }

    fn tick(&mut self) {
        if self.finished {
            return;
        }

        self.counter.advance();
        for member in &mut self.members {
            member.tick();
        }

        if self.counter.is_complete() {
            self.finished = true;
            if let Some(on_completed) = self.on_completed.as_mut() {
                on_completed();
            }
        }
    }

    fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    fn is_finished(&self) -> bool {
        self.finished
    }
}

impl fmt::Display for TweenGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "group of {} in {}ms",
            self.members.len(),
            self.duration_ms
        )
    }
}

impl fmt::Debug for TweenGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TweenGroup")
            .field("members", &self.members)
            .field("duration_ms", &self.duration_ms)
            .field("counter", &self.counter)
            .field("finished", &self.finished)
            .finish()
    }
}

/// One sequential slot of a timeline
#[derive(Debug)]
pub enum Step {
    Single(Tween),
    Group(TweenGroup),
}

impl Step {
    /// Merge `other` into this slot so both run in parallel
    pub fn join(self, other: Step) -> Step {
        let mut group = match self {
            Step::Single(tween) => TweenGroup::new().with_member(tween),
            Step::Group(group) => group,
        };
        match other {
            Step::Single(tween) => group.push(tween),
            Step::Group(other) => {
                for tween in other.members {
                    group.push(tween);
                }
            }
        }
        Step::Group(group)
    }

    /// An empty group has nothing to run
    pub fn is_empty(&self) -> bool {
        match self {
            Step::Single(_) => false,
            Step::Group(group) => group.is_empty(),
        }
    }

    pub fn as_group(&self) -> Option<&TweenGroup> {
        match self {
            Step::Group(group) => Some(group),
            Step::Single(_) => None,
        }
    }

    pub fn as_tween(&self) -> Option<&Tween> {
        match self {
            Step::Single(tween) => Some(tween),
            Step::Group(_) => None,
        }
    }

    /// Tweens in this slot, in declaration order
    pub fn tweens(&self) -> &[Tween] {
        match self {
            Step::Single(tween) => std::slice::from_ref(tween),
            Step::Group(group) => group.members(),
        }
    }
}

impl From<Tween> for Step {
    fn from(tween: Tween) -> Self {
        Step::Single(tween)
    }
}

impl From<TweenGroup> for Step {
    fn from(group: TweenGroup) -> Self {
        Step::Group(group)
    }
}

impl Tweenable for Step {
    fn ready(&mut self, interval_ms: u64) {
        match self {
            Step::Single(tween) => tween.ready(interval_ms),
            Step::Group(group) => group.ready(interval_ms),
        }
    }

    fn tick(&mut self) {
        match self {
            Step::Single(tween) => tween.tick(),
            Step::Group(group) => group.tick(),
        }
    }

    fn duration_ms(&self) -> u64 {
        match self {
            Step::Single(tween) => tween.duration_ms(),
            Step::Group(group) => group.duration_ms(),
        }
    }

    fn is_finished(&self) -> bool {
        match self {
            Step::Single(tween) => tween.is_finished(),
            Step::Group(group) => group.is_finished(),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Single(tween) => write!(f, "{}", tween),
            Step::Group(group) => write!(f, "{}", group),
        }
    }
}
