//! The `Planner` struct and its decision-tick loop.

use std::fmt;

use pl_activity::{ActivityTable, PrecedenceConstraintSet};
use pl_core::{
    ActivityId, ActivityState, DeadlinePolicy, Outcome, PlanError, PlanResult, PlannerConfig,
    Scalar, Tick,
};
use pl_resource::{Acquisition, Claim, Grant, ResourcePool};
use pl_rules::{FactBase, PredicateCatalog, RuleCatalog, Scope};

use crate::{PlanEvent, TickOutcome};

// ── Assignment ────────────────────────────────────────────────────────────────

/// A resource claim with every id resolved to its name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Assignment<'a> {
    pub pool:     &'a str,
    pub instance: &'a str,
    pub activity: &'a str,
}

impl fmt::Display for Assignment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "activity {} holds instance {} of pool {}",
            self.activity, self.instance, self.pool
        )
    }
}

// ── Planner ───────────────────────────────────────────────────────────────────

/// The planner: catalogs, resources, activities and facts of one plan.
///
/// Single writer: every mutation goes through `&mut self`, either from the
/// host delivering facts and acknowledgements or from
/// [`process_changes`](Self::process_changes).
///
/// Create via [`PlannerBuilder`](crate::PlannerBuilder).
pub struct Planner {
    pub(crate) config:     PlannerConfig,
    pub(crate) loaded_at:  Tick,
    pub(crate) predicates: PredicateCatalog,
    pub(crate) rules:      RuleCatalog,
    pub(crate) resources:  ResourcePool,
    pub(crate) activities: ActivityTable,
    pub(crate) precedence: PrecedenceConstraintSet,
    pub(crate) facts:      FactBase,
}

impl Planner {
    // ── Decision tick ─────────────────────────────────────────────────────

    /// Run the planner for tick `now` until nothing more can change.
    pub fn process_changes(&mut self, now: Tick) -> PlanResult<TickOutcome> {
        let mut events = Vec::new();
        let mut changed = false;

        if self.config.deadline_policy == DeadlinePolicy::Fail {
            changed |= self.expire_overdue(now, &mut events);
        }

        let mut passes = 0;
        loop {
            if passes == self.config.max_passes {
                tracing::warn!(
                    tick = now.0,
                    max_passes = self.config.max_passes,
                    "pass limit reached before the plan settled"
                );
                break;
            }
            passes += 1;
            let pass_changed = self.scan_pass(now, &mut events)?;
            tracing::trace!(tick = now.0, pass = passes, changed = pass_changed, "pass done");
            if !pass_changed {
                break;
            }
            changed = true;
        }

        let next_wake = self.next_wake(now)?;
        Ok(TickOutcome { changed, next_wake, passes, events })
    }

    fn expire_overdue(&mut self, now: Tick, events: &mut Vec<PlanEvent>) -> bool {
        let overdue: Vec<ActivityId> = self
            .activities
            .iter()
            .filter(|(_, a)| a.state() == ActivityState::Wait && a.start_window().has_closed(now))
            .map(|(id, _)| id)
            .collect();
        for &id in &overdue {
            if self.activities.expire(id, now) {
                events.push(PlanEvent::Expired { activity: id, at: now });
            }
        }
        !overdue.is_empty()
    }

    /// One scan over every waiting activity.  Returns whether anything started.
    fn scan_pass(&mut self, now: Tick, events: &mut Vec<PlanEvent>) -> PlanResult<bool> {
        let order = self.activities.scan_order().to_vec();
        let mut changed = false;
        for id in order {
            if self.activities.state_of(id) != Some(ActivityState::Wait) {
                continue;
            }
            if self.try_start(id, now, events)? {
                changed = true;
            }
        }
        Ok(changed)
    }

    /// Check every gate for `id` and start it if all pass.
    fn try_start(&mut self, id: ActivityId, now: Tick, events: &mut Vec<PlanEvent>) -> PlanResult<bool> {
        let Some(activity) = self.activities.get(id) else {
            return Err(PlanError::UnknownActivity(id.to_string()));
        };

        if !activity.start_window().contains(now) {
            return Ok(false);
        }
        if !self.precedence.all_satisfied(id, &self.activities, now) {
            return Ok(false);
        }

        let scope = Scope {
            now,
            loaded_at: self.loaded_at,
            activity: id,
            activity_name: activity.name(),
            facts: &self.facts,
        };
        for &rule in activity.rules() {
            if !self.rules.is_satisfied(rule, &self.predicates, &scope)? {
                return Ok(false);
            }
        }

        let grant = if activity.pools().is_empty() {
            Grant::default()
        } else {
            let pools = activity.pools().to_vec();
            let priority = activity.priority();
            match self
                .resources
                .try_acquire(id, &pools, priority, self.config.preemption)?
            {
                Acquisition::Granted(g) => g,
                Acquisition::Blocked { .. } => return Ok(false),
            }
        };

        for p in grant.preempted {
            for claim in p.revoked {
                events.push(PlanEvent::Revoked { claim, by: id, at: now });
            }
            if self.activities.preempt(p.victim, now) {
                events.push(PlanEvent::Preempted { activity: p.victim, by: id, at: now });
            }
        }

        self.activities.start(id, now);
        events.push(PlanEvent::Started { activity: id, at: now });
        for claim in grant.bound {
            events.push(PlanEvent::Assigned { claim, at: now });
        }
        Ok(true)
    }

    /// Earliest tick after `now` at which some `Wait` activity could become
    /// eligible without any fact or acknowledgement arriving.
    fn next_wake(&self, now: Tick) -> PlanResult<Option<Tick>> {
        let mut wake: Option<Tick> = None;
        let mut consider = |t: Option<Tick>| {
            if let Some(t) = t.filter(|&t| t > now) {
                wake = Some(wake.map_or(t, |w| w.min(t)));
            }
        };

        for (id, a) in self.activities.iter() {
            if a.state() != ActivityState::Wait {
                continue;
            }
            let window = a.start_window();
            if window.has_closed(now) {
                continue;
            }
            consider(window.opens_after(now));
            consider(self.precedence.next_opening(id, &self.activities, now));

            let scope = Scope {
                now,
                loaded_at: self.loaded_at,
                activity: id,
                activity_name: a.name(),
                facts: &self.facts,
            };
            for &rule in a.rules() {
                consider(self.rules.next_change(rule, &self.predicates, &scope)?);
            }

            if self.config.deadline_policy == DeadlinePolicy::Fail {
                consider(window.hi.map(|hi| hi.offset(1)));
            }
        }
        Ok(wake)
    }

    // ── Host inputs ───────────────────────────────────────────────────────

    /// Apply an external acknowledgement for activity `name`.
    ///
    /// Fails with [`PlanError::InvalidAcknowledgement`] unless the activity is
    /// `Started`, and with [`PlanError::UnknownActivity`] for an unknown name.
    /// Either way nothing changes; the caller reports the error and drops the
    /// acknowledgement.
    pub fn acknowledge(&mut self, name: &str, outcome: Outcome, now: Tick) -> PlanResult<Vec<PlanEvent>> {
        let id = self.activities.id(name).inspect_err(|e| {
            tracing::warn!(activity = name, tick = now.0, error = %e, "acknowledgement rejected");
        })?;
        self.acknowledge_id(id, outcome, now)
    }

    /// [`acknowledge`](Self::acknowledge) by id.
    pub fn acknowledge_id(&mut self, id: ActivityId, outcome: Outcome, now: Tick) -> PlanResult<Vec<PlanEvent>> {
        if let Err(e) = self.activities.finish(id, outcome, now) {
            tracing::warn!(activity = %self.activities.name(id), tick = now.0, error = %e, "acknowledgement rejected");
            return Err(e);
        }
        if let Some(a) = self.activities.get(id) {
            let window = a.finish_window();
            if !window.contains(now) {
                tracing::warn!(
                    activity = %a.name(),
                    tick = now.0,
                    window = %window,
                    "acknowledged outside the finish window"
                );
            }
        }

        let mut events = vec![PlanEvent::Finished { activity: id, outcome, at: now }];
        if self.config.release_on_terminal {
            for claim in self.resources.release(id) {
                events.push(PlanEvent::Released { claim, at: now });
            }
        }
        Ok(events)
    }

    /// Update a fact.  Returns whether its value changed.
    pub fn set_fact(&mut self, name: impl Into<String>, value: impl Into<Scalar>) -> bool {
        self.facts.set(name, value)
    }

    // ── Observation ───────────────────────────────────────────────────────

    pub fn state_of(&self, name: &str) -> PlanResult<ActivityState> {
        let id = self.activities.id(name)?;
        self.activities
            .state_of(id)
            .ok_or_else(|| PlanError::UnknownActivity(name.to_owned()))
    }

    /// Every current assignment, ordered by pool then instance.
    pub fn assignments(&self) -> Vec<Assignment<'_>> {
        self.resources
            .assignments()
            .into_iter()
            .map(|c| self.resolve(c))
            .collect()
    }

    /// What activity `name` currently holds.
    pub fn held_by(&self, name: &str) -> PlanResult<Vec<Assignment<'_>>> {
        let id = self.activities.id(name)?;
        Ok(self
            .resources
            .held_by(id)
            .into_iter()
            .map(|c| self.resolve(c))
            .collect())
    }

    /// Name of the activity holding `instance` of `pool`, if any.
    pub fn holder_of(&self, pool: &str, instance: &str) -> PlanResult<Option<&str>> {
        let pid = self.resources.pool_id(pool)?;
        let iid = self.resources.instance_id(pool, instance)?;
        Ok(self
            .resources
            .holder(pid, iid)
            .and_then(|a| self.activities.get(a))
            .map(|a| a.name()))
    }

    /// Resolve the ids in `claim` to names.
    pub fn resolve(&self, claim: Claim) -> Assignment<'_> {
        Assignment {
            pool:     self.resources.pool_name(claim.pool).unwrap_or("?"),
            instance: self
                .resources
                .instance_name(claim.pool, claim.instance)
                .unwrap_or("?"),
            activity: self
                .activities
                .get(claim.activity)
                .map_or("?", |a| a.name()),
        }
    }

    /// Name of activity `id`.
    pub fn activity_name(&self, id: ActivityId) -> Option<&str> {
        self.activities.get(id).map(|a| a.name())
    }

    pub fn activity_id(&self, name: &str) -> PlanResult<ActivityId> {
        self.activities.id(name)
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn loaded_at(&self) -> Tick {
        self.loaded_at
    }

    pub fn activities(&self) -> &ActivityTable {
        &self.activities
    }

    pub fn resources(&self) -> &ResourcePool {
        &self.resources
    }

    pub fn rules(&self) -> &RuleCatalog {
        &self.rules
    }

    pub fn predicates(&self) -> &PredicateCatalog {
        &self.predicates
    }

    pub fn precedence(&self) -> &PrecedenceConstraintSet {
        &self.precedence
    }

    pub fn facts(&self) -> &FactBase {
        &self.facts
    }

    /// `true` once every activity is `Done` or `Failed`.
    pub fn is_settled(&self) -> bool {
        self.activities.iter().all(|(_, a)| a.state().is_terminal())
    }
}
