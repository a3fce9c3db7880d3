//! `ActivityTable`: every activity of the plan, in registration order.

use std::cmp::Reverse;

use rustc_hash::FxHashMap;

use pl_core::{ActivityId, ActivityState, Outcome, PlanError, PlanResult, Tick};

use crate::Activity;

/// Dense activity storage indexed by `ActivityId`.
#[derive(Default)]
pub struct ActivityTable {
    activities: Vec<Activity>,
    index:      FxHashMap<String, ActivityId>,
    /// Ids sorted by (priority desc, registration order).
    scan_order: Vec<ActivityId>,
}

impl ActivityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `activity`.  Fails with [`PlanError::DuplicateId`] if its name
    /// is taken.
    pub fn add(&mut self, activity: Activity) -> PlanResult<ActivityId> {
        if self.index.contains_key(activity.name()) {
            return Err(PlanError::DuplicateId {
                kind: "activity",
                id:   activity.name().to_owned(),
            });
        }
        let id = ActivityId::try_from(self.activities.len())
            .map_err(|_| PlanError::Config("too many activities".to_owned()))?;
        self.index.insert(activity.name().to_owned(), id);
        self.activities.push(activity);

        let activities = &self.activities;
        self.scan_order.push(id);
        self.scan_order
            .sort_by_key(|&a| (Reverse(activities[a.index()].priority()), a));
        Ok(id)
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    pub fn id(&self, name: &str) -> PlanResult<ActivityId> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| PlanError::UnknownActivity(name.to_owned()))
    }

    pub fn get(&self, id: ActivityId) -> Option<&Activity> {
        self.activities.get(id.index())
    }

    /// Name of `id`, or its numeric form if unregistered.
    pub fn name(&self, id: ActivityId) -> String {
        self.get(id)
            .map_or_else(|| id.to_string(), |a| a.name().to_owned())
    }

    pub fn state_of(&self, id: ActivityId) -> Option<ActivityState> {
        self.get(id).map(Activity::state)
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    /// `(id, activity)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (ActivityId, &Activity)> {
        self.activities
            .iter()
            .enumerate()
            .map(|(i, a)| (ActivityId(i as u32), a))
    }

    /// The order in which the planner examines activities: highest priority
    /// first, registration order within a priority.
    pub fn scan_order(&self) -> &[ActivityId] {
        &self.scan_order
    }

    /// Number of activities currently in `state`.
    pub fn count_in(&self, state: ActivityState) -> usize {
        self.activities.iter().filter(|a| a.state() == state).count()
    }

    // ── Transitions ───────────────────────────────────────────────────────

    /// `Wait → Started`.  Returns `false` (and changes nothing) from any
    /// other state.
    pub fn start(&mut self, id: ActivityId, now: Tick) -> bool {
        let Some(a) = self.activities.get_mut(id.index()) else {
            return false;
        };
        if a.state() != ActivityState::Wait {
            return false;
        }
        a.set_started(now);
        tracing::debug!(activity = %a.name(), tick = now.0, "wait -> started");
        true
    }

    /// `Started → Done | Failed` on an external acknowledgement.
    ///
    /// Fails with [`PlanError::InvalidAcknowledgement`] unless the activity is
    /// `Started`; the activity is left untouched in that case.
    pub fn finish(&mut self, id: ActivityId, outcome: Outcome, now: Tick) -> PlanResult<()> {
        let a = self
            .activities
            .get_mut(id.index())
            .ok_or_else(|| PlanError::UnknownActivity(id.to_string()))?;
        if a.state() != ActivityState::Started {
            return Err(PlanError::InvalidAcknowledgement {
                activity: a.name().to_owned(),
                state:    a.state(),
                at:       now,
            });
        }
        let to = outcome.terminal_state();
        a.set_terminal(to, now);
        tracing::debug!(activity = %a.name(), tick = now.0, "started -> {to}");
        Ok(())
    }

    /// `Started → Wait` after the activity lost its resources.
    ///
    /// Terminal activities keep their state; returns whether the state
    /// changed.
    pub fn preempt(&mut self, id: ActivityId, now: Tick) -> bool {
        let Some(a) = self.activities.get_mut(id.index()) else {
            return false;
        };
        if a.state() != ActivityState::Started {
            return false;
        }
        a.set_waiting(now);
        tracing::debug!(activity = %a.name(), tick = now.0, "started -> wait (preempted)");
        true
    }

    /// `Wait → Failed` for an activity whose start window has closed.
    pub fn expire(&mut self, id: ActivityId, now: Tick) -> bool {
        let Some(a) = self.activities.get_mut(id.index()) else {
            return false;
        };
        if a.state() != ActivityState::Wait {
            return false;
        }
        a.set_terminal(ActivityState::Failed, now);
        tracing::debug!(activity = %a.name(), tick = now.0, "wait -> failed (start window closed)");
        true
    }
}
