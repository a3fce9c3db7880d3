//! Temporal ordering constraints between activities.
//!
//! A constraint `source → dest` gates the *start* of `dest`:
//!
//! | Relation       | `dest` may start when                                        |
//! |----------------|--------------------------------------------------------------|
//! | `FinishStart`  | `source` is `Done` and `now − source.finish ∈ [min, max]`    |
//! | `StartStart`   | `source` has started and `now − source.start ∈ [min, max]`   |
//! | `FinishFinish` | every projected pair of finishes lies `[min, max]` apart     |
//!
//! Lags are tick counts; [`UNBOUNDED_LAG`] means no upper bound.
//!
//! # FinishFinish projection
//!
//! A `Wait` or `Failed` source blocks.  A `Done` source finished at exactly
//! its finish tick.  A `Started` source will finish somewhere in
//! `[max(now, minfinish), maxfinish]`, and so will `dest` once started; an
//! open `maxfinish` projects to `Tick::MAX`.  Once `now` is past either
//! activity's `maxfinish` the projection is empty and the check fails for
//! good.
//!
//! The check passes iff *every* pair of finishes drawn from the two intervals
//! has a lag inside `[min, max]`, so starting `dest` can never rule out a
//! conforming finish.  Lower bounds rise with `now` while upper bounds stay
//! put, so a check that fails only because a lower bound is still too low
//! opens by time alone; [`PrecedenceConstraint::opens_at`] reports that tick.

use std::fmt;
use std::str::FromStr;

use rustc_hash::FxHashMap;

use pl_core::{ActivityId, ActivityState, PlanError, PlanResult, Tick, TimeWindow};

use crate::{Activity, ActivityTable};

/// Upper lag bound meaning "no limit".
pub const UNBOUNDED_LAG: u64 = u64::MAX;

// ── Relation ──────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Relation {
    FinishStart,
    StartStart,
    FinishFinish,
}

impl Relation {
    pub fn as_str(self) -> &'static str {
        match self {
            Relation::FinishStart => "fs",
            Relation::StartStart => "ss",
            Relation::FinishFinish => "ff",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Relation {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "fs" | "finishstart" => Ok(Relation::FinishStart),
            "ss" | "startstart" => Ok(Relation::StartStart),
            "ff" | "finishfinish" => Ok(Relation::FinishFinish),
            _ => Err(PlanError::InvalidParameter {
                name:   "relation".to_owned(),
                reason: format!("expected fs, ss or ff, found {s:?}"),
            }),
        }
    }
}

// ── PrecedenceConstraint ──────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct PrecedenceConstraint {
    pub source:   ActivityId,
    pub dest:     ActivityId,
    pub relation: Relation,
    pub min_lag:  u64,
    /// [`UNBOUNDED_LAG`] for no upper bound.
    pub max_lag:  u64,
}

impl PrecedenceConstraint {
    pub fn new(source: ActivityId, dest: ActivityId, relation: Relation) -> Self {
        Self { source, dest, relation, min_lag: 0, max_lag: UNBOUNDED_LAG }
    }

    pub fn with_lags(mut self, min_lag: u64, max_lag: u64) -> Self {
        self.min_lag = min_lag;
        self.max_lag = max_lag;
        self
    }

    #[inline]
    fn lag_ok(&self, lag: u64) -> bool {
        lag >= self.min_lag && lag <= self.max_lag
    }

    /// The tick at which the source event happened, for FS / SS.
    fn anchor(&self, source: &Activity) -> Option<Tick> {
        match self.relation {
            Relation::FinishStart => (source.state() == ActivityState::Done)
                .then(|| source.finished_at())
                .flatten(),
            Relation::StartStart => source
                .state()
                .has_started()
                .then(|| source.started_at())
                .flatten(),
            Relation::FinishFinish => None,
        }
    }

    /// Does this constraint currently allow `dest` to start?
    pub fn check(&self, source: &Activity, dest: &Activity, now: Tick) -> bool {
        match self.relation {
            Relation::FinishStart | Relation::StartStart => self
                .anchor(source)
                .and_then(|t| now.since(t))
                .is_some_and(|lag| self.lag_ok(lag)),
            Relation::FinishFinish => self.check_finish_finish(source, dest, now),
        }
    }

    fn check_finish_finish(&self, source: &Activity, dest: &Activity, now: Tick) -> bool {
        let (Some((s_lo, s_hi)), Some((d_lo, d_hi))) = (
            source_finish(source, now),
            projected_finish(dest.finish_window(), now),
        ) else {
            return false;
        };

        // Lag = dest finish − source finish ranges over [d_lo − s_hi, d_hi − s_lo].
        let lag_lo = i128::from(d_lo.0) - i128::from(s_hi.0);
        let lag_hi = i128::from(d_hi.0) - i128::from(s_lo.0);
        lag_lo >= i128::from(self.min_lag)
            && (self.max_lag == UNBOUNDED_LAG || lag_hi <= i128::from(self.max_lag))
    }

    /// Earliest tick after `now` at which this constraint opens with no
    /// state change, if it is closed now and time alone can open it.
    ///
    /// FS and SS open once the minimum lag has elapsed.  FF opens once the
    /// rising lower bounds of the projection clear the lag window.
    pub fn opens_at(&self, source: &Activity, dest: &Activity, now: Tick) -> Option<Tick> {
        let t = match self.relation {
            Relation::FinishStart | Relation::StartStart => self.anchor(source)?.offset(self.min_lag),
            Relation::FinishFinish => self.finish_finish_opens_at(source, dest, now)?,
        };
        (t > now).then_some(t)
    }

    fn finish_finish_opens_at(&self, source: &Activity, dest: &Activity, now: Tick) -> Option<Tick> {
        let (_, s_hi) = source_finish(source, now)?;
        let (_, d_hi) = projected_finish(dest.finish_window(), now)?;
        if s_hi == Tick::MAX {
            return None;
        }
        let mut at = now.offset(1);

        // dest's earliest finish must reach s_hi + min.
        let floor = s_hi.offset(self.min_lag);
        if dest.finish_window().lo.is_none_or(|lo| lo < floor) {
            at = at.max(floor);
        }
        // A running source's earliest finish must reach d_hi − max.
        if self.max_lag != UNBOUNDED_LAG && source.state() == ActivityState::Started {
            let floor = Tick(d_hi.0.saturating_sub(self.max_lag));
            if source.finish_window().lo.is_none_or(|lo| lo < floor) {
                at = at.max(floor);
            }
        }
        self.check_finish_finish(source, dest, at).then_some(at)
    }
}

/// Where `source` will finish, as seen at `now`.  `None` while it has not
/// started, once it failed, or when it is already past its `maxfinish`.
fn source_finish(source: &Activity, now: Tick) -> Option<(Tick, Tick)> {
    match source.state() {
        ActivityState::Done => source.finished_at().map(|f| (f, f)),
        ActivityState::Started => projected_finish(source.finish_window(), now),
        ActivityState::Wait | ActivityState::Failed => None,
    }
}

/// `[max(now, lo), hi]`, or `None` once `now` is past `hi`.
fn projected_finish(window: TimeWindow, now: Tick) -> Option<(Tick, Tick)> {
    let lo = window.lo.map_or(now, |l| l.max(now));
    let hi = window.hi.unwrap_or(Tick::MAX);
    (lo <= hi).then_some((lo, hi))
}

// ── PrecedenceConstraintSet ───────────────────────────────────────────────────

/// All constraints of a plan, indexed by destination.
#[derive(Default)]
pub struct PrecedenceConstraintSet {
    constraints: Vec<PrecedenceConstraint>,
    incoming:    FxHashMap<ActivityId, Vec<usize>>,
}

impl PrecedenceConstraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `c` after validating it against `activities`.
    ///
    /// Fails with [`PlanError::UnknownActivity`] if either end is not
    /// registered and with [`PlanError::InvalidConstraint`] for a self-loop
    /// or `min_lag > max_lag`.
    pub fn add(&mut self, c: PrecedenceConstraint, activities: &ActivityTable) -> PlanResult<()> {
        for end in [c.source, c.dest] {
            if activities.get(end).is_none() {
                return Err(PlanError::UnknownActivity(end.to_string()));
            }
        }
        let invalid = |reason: String| PlanError::InvalidConstraint {
            source_activity: activities.name(c.source),
            dest:            activities.name(c.dest),
            reason,
        };
        if c.source == c.dest {
            return Err(invalid("an activity cannot precede itself".to_owned()));
        }
        if c.min_lag > c.max_lag {
            return Err(invalid(format!("min_lag {} exceeds max_lag {}", c.min_lag, c.max_lag)));
        }
        self.incoming.entry(c.dest).or_default().push(self.constraints.len());
        self.constraints.push(c);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PrecedenceConstraint> {
        self.constraints.iter()
    }

    /// Constraints whose destination is `dest`.
    pub fn incoming(&self, dest: ActivityId) -> impl Iterator<Item = &PrecedenceConstraint> {
        self.incoming
            .get(&dest)
            .into_iter()
            .flatten()
            .map(move |&i| &self.constraints[i])
    }

    /// Check one constraint against the current activity states.
    pub fn check(&self, c: &PrecedenceConstraint, activities: &ActivityTable, now: Tick) -> bool {
        match (activities.get(c.source), activities.get(c.dest)) {
            (Some(source), Some(dest)) => c.check(source, dest, now),
            _ => false,
        }
    }

    /// `true` iff every constraint into `dest` passes.
    pub fn all_satisfied(&self, dest: ActivityId, activities: &ActivityTable, now: Tick) -> bool {
        self.incoming(dest).all(|c| self.check(c, activities, now))
    }

    /// Earliest tick after `now` at which a currently failing constraint into
    /// `dest` opens by time alone.
    pub fn next_opening(
        &self,
        dest:       ActivityId,
        activities: &ActivityTable,
        now:        Tick,
    ) -> Option<Tick> {
        self.incoming(dest)
            .filter(|c| !self.check(c, activities, now))
            .filter_map(|c| {
                c.opens_at(activities.get(c.source)?, activities.get(c.dest)?, now)
            })
            .min()
    }
}
