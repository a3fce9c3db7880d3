//! What the planner reports back to its caller.

use pl_core::{ActivityId, Outcome, Tick};
use pl_resource::Claim;

/// One observable change made by the planner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlanEvent {
    /// `Wait → Started`.
    Started { activity: ActivityId, at: Tick },
    /// `Started → Done | Failed` on acknowledgement.
    Finished { activity: ActivityId, outcome: Outcome, at: Tick },
    /// `Started → Wait` after losing resources to `by`.
    Preempted { activity: ActivityId, by: ActivityId, at: Tick },
    /// `Wait → Failed` because the start window closed.
    Expired { activity: ActivityId, at: Tick },
    /// A resource instance was bound.
    Assigned { claim: Claim, at: Tick },
    /// A resource instance was returned on a terminal transition.
    Released { claim: Claim, at: Tick },
    /// A resource instance was taken away by preemption.
    Revoked { claim: Claim, by: ActivityId, at: Tick },
}

impl PlanEvent {
    /// The activity the event is about.
    pub fn activity(&self) -> ActivityId {
        match *self {
            PlanEvent::Started { activity, .. }
            | PlanEvent::Finished { activity, .. }
            | PlanEvent::Preempted { activity, .. }
            | PlanEvent::Expired { activity, .. } => activity,
            PlanEvent::Assigned { claim, .. }
            | PlanEvent::Released { claim, .. }
            | PlanEvent::Revoked { claim, .. } => claim.activity,
        }
    }

    pub fn at(&self) -> Tick {
        match *self {
            PlanEvent::Started { at, .. }
            | PlanEvent::Finished { at, .. }
            | PlanEvent::Preempted { at, .. }
            | PlanEvent::Expired { at, .. }
            | PlanEvent::Assigned { at, .. }
            | PlanEvent::Released { at, .. }
            | PlanEvent::Revoked { at, .. } => at,
        }
    }

    /// Short lowercase label, as written to the event log.
    pub fn kind(&self) -> &'static str {
        match self {
            PlanEvent::Started { .. } => "start",
            PlanEvent::Finished { outcome: Outcome::Done, .. } => "done",
            PlanEvent::Finished { outcome: Outcome::Failed, .. } => "fail",
            PlanEvent::Preempted { .. } => "preempt",
            PlanEvent::Expired { .. } => "expire",
            PlanEvent::Assigned { .. } => "assign",
            PlanEvent::Released { .. } => "release",
            PlanEvent::Revoked { .. } => "revoke",
        }
    }

    /// The resource claim carried by assignment-type events.
    pub fn claim(&self) -> Option<Claim> {
        match *self {
            PlanEvent::Assigned { claim, .. }
            | PlanEvent::Released { claim, .. }
            | PlanEvent::Revoked { claim, .. } => Some(claim),
            _ => None,
        }
    }

    /// `true` for events that change an activity's state.
    pub fn is_transition(&self) -> bool {
        matches!(
            self,
            PlanEvent::Started { .. }
                | PlanEvent::Finished { .. }
                | PlanEvent::Preempted { .. }
                | PlanEvent::Expired { .. }
        )
    }
}

/// Result of one [`Planner::process_changes`](crate::Planner::process_changes) call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Whether any activity changed state during the call.
    pub changed:   bool,
    /// Earliest future tick at which a time-gated transition could become
    /// possible.  `None` when only facts or acknowledgements can unblock
    /// anything.
    pub next_wake: Option<Tick>,
    /// Fixpoint passes run, including the final one that changed nothing.
    pub passes:    u32,
    /// Everything that happened, in order.
    pub events:    Vec<PlanEvent>,
}

impl TickOutcome {
    /// Number of state transitions among `events`.
    pub fn transitions(&self) -> usize {
        self.events.iter().filter(|e| e.is_transition()).count()
    }

    /// Activities started during the call, in start order.
    pub fn started(&self) -> impl Iterator<Item = ActivityId> + '_ {
        self.events.iter().filter_map(|e| match *e {
            PlanEvent::Started { activity, .. } => Some(activity),
            _ => None,
        })
    }
}
