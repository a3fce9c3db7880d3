//! `Activity`: one plan step: what gates it, what it needs, where it is.

use pl_core::{ActivityState, PoolId, RuleId, Tick, TimeWindow};

/// A registered activity.
///
/// The definition half (priority, windows, rules, pools) is fixed at
/// registration.  The lifecycle half (state and timestamps) is only changed
/// through [`ActivityTable`](crate::ActivityTable) transitions.
#[derive(Clone, Debug)]
pub struct Activity {
    name:          String,
    priority:      i32,
    start_window:  TimeWindow,
    finish_window: TimeWindow,
    rules:         Vec<RuleId>,
    /// One entry per required instance; a pool may appear more than once.
    pools:         Vec<PoolId>,

    state:           ActivityState,
    started_at:      Option<Tick>,
    finished_at:     Option<Tick>,
    last_transition: Option<Tick>,
}

impl Activity {
    /// A waiting activity with priority 0, no windows, rules or resources.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name:            name.into(),
            priority:        0,
            start_window:    TimeWindow::UNBOUNDED,
            finish_window:   TimeWindow::UNBOUNDED,
            rules:           Vec::new(),
            pools:           Vec::new(),
            state:           ActivityState::Wait,
            started_at:      None,
            finished_at:     None,
            last_transition: None,
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_start_window(mut self, window: TimeWindow) -> Self {
        self.start_window = window;
        self
    }

    pub fn with_finish_window(mut self, window: TimeWindow) -> Self {
        self.finish_window = window;
        self
    }

    pub fn with_rules(mut self, rules: Vec<RuleId>) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_pools(mut self, pools: Vec<PoolId>) -> Self {
        self.pools = pools;
        self
    }

    // ── Definition ────────────────────────────────────────────────────────

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn start_window(&self) -> TimeWindow {
        self.start_window
    }

    pub fn finish_window(&self) -> TimeWindow {
        self.finish_window
    }

    pub fn rules(&self) -> &[RuleId] {
        &self.rules
    }

    pub fn pools(&self) -> &[PoolId] {
        &self.pools
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    #[inline]
    pub fn state(&self) -> ActivityState {
        self.state
    }

    /// Tick of the current start, cleared again by preemption.
    pub fn started_at(&self) -> Option<Tick> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<Tick> {
        self.finished_at
    }

    pub fn last_transition(&self) -> Option<Tick> {
        self.last_transition
    }

    pub(crate) fn set_started(&mut self, now: Tick) {
        self.state = ActivityState::Started;
        self.started_at = Some(now);
        self.last_transition = Some(now);
    }

    pub(crate) fn set_terminal(&mut self, state: ActivityState, now: Tick) {
        debug_assert!(state.is_terminal());
        self.state = state;
        self.finished_at = Some(now);
        self.last_transition = Some(now);
    }

    pub(crate) fn set_waiting(&mut self, now: Tick) {
        self.state = ActivityState::Wait;
        self.started_at = None;
        self.last_transition = Some(now);
    }
}
