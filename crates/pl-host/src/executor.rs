//! The `Executor` trait: the outside world performing started activities.

use rustc_hash::{FxHashMap, FxHashSet};

use pl_core::{Outcome, Tick};

/// When and how a started activity will finish.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Completion {
    pub at:      Tick,
    pub outcome: Outcome,
}

/// Models whatever carries out activities once the planner starts them.
///
/// The host calls [`on_started`](Self::on_started) for every `Started` event
/// and queues the returned completion as an acknowledgement.  Returning
/// `None` leaves the activity running until someone else acknowledges it.
///
/// A completion due at or before the start tick is delivered on the next
/// tick.
pub trait Executor {
    fn on_started(&mut self, activity: &str, now: Tick) -> Option<Completion>;

    /// The activity lost its resources and went back to `Wait`.  Its queued
    /// completion has already been cancelled by the host.
    fn on_preempted(&mut self, _activity: &str, _now: Tick) {}
}

/// An [`Executor`] that never completes anything.
///
/// Useful when acknowledgements are scripted up front or pushed by the caller.
pub struct NoopExecutor;

impl Executor for NoopExecutor {
    fn on_started(&mut self, _activity: &str, _now: Tick) -> Option<Completion> {
        None
    }
}

/// Every activity takes a fixed number of ticks.
///
/// Per-activity durations override the default; activities marked with
/// [`failing`](Self::failing) complete with [`Outcome::Failed`].
#[derive(Clone, Debug, Default)]
pub struct FixedDurations {
    default:   Option<u64>,
    durations: FxHashMap<String, u64>,
    failing:   FxHashSet<String>,
}

impl FixedDurations {
    /// `default = None` leaves activities without an explicit duration
    /// running forever.
    pub fn new(default: Option<u64>) -> Self {
        Self { default, ..Self::default() }
    }

    pub fn with(mut self, activity: impl Into<String>, ticks: u64) -> Self {
        self.durations.insert(activity.into(), ticks);
        self
    }

    pub fn failing(mut self, activity: impl Into<String>) -> Self {
        self.failing.insert(activity.into());
        self
    }

    pub fn duration_of(&self, activity: &str) -> Option<u64> {
        self.durations.get(activity).copied().or(self.default)
    }
}

impl Executor for FixedDurations {
    fn on_started(&mut self, activity: &str, now: Tick) -> Option<Completion> {
        let ticks = self.duration_of(activity)?;
        let outcome = if self.failing.contains(activity) {
            Outcome::Failed
        } else {
            Outcome::Done
        };
        Some(Completion { at: now + ticks, outcome })
    }
}
