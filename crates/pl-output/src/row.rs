//! Plain data row types written by output backends.

/// One line of the event log.
///
/// `pool` and `instance` are empty for events that carry no claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRow {
    pub tick:     u64,
    pub activity: String,
    /// Event label: `start`, `done`, `fail`, `preempt`, `expire`, `assign`,
    /// `release`, `revoke`, or `reject` for refused messages.
    pub event:    &'static str,
    pub pool:     String,
    pub instance: String,
    /// Free text: the preempting activity, or the rejection reason.
    pub detail:   String,
}

/// Summary of one processed tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummaryRow {
    pub tick:          u64,
    pub transitions:   u64,
    pub passes:        u32,
    pub facts_changed: u64,
    pub rejected:      u64,
    /// `None` when the planner had nothing to wait for.
    pub next_wake:     Option<u64>,
}

/// An activity's state when the run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalStateRow {
    pub activity:    String,
    pub state:       &'static str,
    pub started_at:  Option<u64>,
    pub finished_at: Option<u64>,
}
