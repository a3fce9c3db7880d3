//! Unit tests for pl-activity.

use pl_core::{ActivityId, ActivityState, Outcome, PlanError, Tick, TimeWindow};

use crate::{
    Activity, ActivityTable, PrecedenceConstraint, PrecedenceConstraintSet, Relation,
    UNBOUNDED_LAG,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Table with activities `a` and `b` (ids 0 and 1).
fn pair() -> (ActivityTable, ActivityId, ActivityId) {
    let mut t = ActivityTable::new();
    let a = t.add(Activity::new("a")).unwrap();
    let b = t.add(Activity::new("b")).unwrap();
    (t, a, b)
}

fn run_to_done(t: &mut ActivityTable, id: ActivityId, start: u64, finish: u64) {
    assert!(t.start(id, Tick(start)));
    t.finish(id, Outcome::Done, Tick(finish)).unwrap();
}

// ── ActivityTable ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod table {
    use super::*;

    #[test]
    fn ids_follow_registration_order() {
        let (t, a, b) = pair();
        assert_eq!(a, ActivityId(0));
        assert_eq!(b, ActivityId(1));
        assert_eq!(t.id("b"), Ok(b));
        assert_eq!(t.name(a), "a");
        assert_eq!(t.id("zzz"), Err(PlanError::UnknownActivity("zzz".into())));
    }

    #[test]
    fn duplicate_name_rejected() {
        let (mut t, _, _) = pair();
        assert_eq!(
            t.add(Activity::new("a")),
            Err(PlanError::DuplicateId { kind: "activity", id: "a".into() })
        );
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn scan_order_is_priority_then_registration() {
        let mut t = ActivityTable::new();
        let low = t.add(Activity::new("low").with_priority(1)).unwrap();
        let high1 = t.add(Activity::new("high1").with_priority(5)).unwrap();
        let mid = t.add(Activity::new("mid").with_priority(3)).unwrap();
        let high2 = t.add(Activity::new("high2").with_priority(5)).unwrap();
        assert_eq!(t.scan_order(), &[high1, high2, mid, low]);
    }

    #[test]
    fn new_activity_waits() {
        let (t, a, _) = pair();
        let act = t.get(a).unwrap();
        assert_eq!(act.state(), ActivityState::Wait);
        assert_eq!(act.started_at(), None);
        assert_eq!(act.last_transition(), None);
        assert_eq!(t.count_in(ActivityState::Wait), 2);
    }
}

// ── Transitions ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod transitions {
    use super::*;

    #[test]
    fn start_then_finish() {
        let (mut t, a, _) = pair();
        assert!(t.start(a, Tick(3)));
        assert_eq!(t.state_of(a), Some(ActivityState::Started));
        assert_eq!(t.get(a).unwrap().started_at(), Some(Tick(3)));

        t.finish(a, Outcome::Failed, Tick(7)).unwrap();
        let act = t.get(a).unwrap();
        assert_eq!(act.state(), ActivityState::Failed);
        assert_eq!(act.finished_at(), Some(Tick(7)));
        assert_eq!(act.last_transition(), Some(Tick(7)));
    }

    #[test]
    fn start_is_refused_outside_wait() {
        let (mut t, a, _) = pair();
        run_to_done(&mut t, a, 1, 2);
        assert!(!t.start(a, Tick(3)));
        assert_eq!(t.state_of(a), Some(ActivityState::Done));
    }

    #[test]
    fn finish_from_wait_is_invalid_ack() {
        let (mut t, a, _) = pair();
        let err = t.finish(a, Outcome::Done, Tick(4)).unwrap_err();
        assert_eq!(
            err,
            PlanError::InvalidAcknowledgement {
                activity: "a".into(),
                state:    ActivityState::Wait,
                at:       Tick(4),
            }
        );
        assert_eq!(t.state_of(a), Some(ActivityState::Wait));
    }

    #[test]
    fn second_ack_is_invalid() {
        let (mut t, a, _) = pair();
        run_to_done(&mut t, a, 1, 2);
        assert!(matches!(
            t.finish(a, Outcome::Failed, Tick(3)),
            Err(PlanError::InvalidAcknowledgement { state: ActivityState::Done, .. })
        ));
    }

    #[test]
    fn preempt_returns_to_wait_and_clears_start() {
        let (mut t, a, _) = pair();
        t.start(a, Tick(2));
        assert!(t.preempt(a, Tick(5)));
        let act = t.get(a).unwrap();
        assert_eq!(act.state(), ActivityState::Wait);
        assert_eq!(act.started_at(), None);
        assert_eq!(act.last_transition(), Some(Tick(5)));
    }

    #[test]
    fn preempt_leaves_terminal_state_alone() {
        let (mut t, a, _) = pair();
        run_to_done(&mut t, a, 1, 2);
        assert!(!t.preempt(a, Tick(3)));
        assert_eq!(t.state_of(a), Some(ActivityState::Done));
    }

    #[test]
    fn expire_only_from_wait() {
        let (mut t, a, b) = pair();
        t.start(b, Tick(1));
        assert!(t.expire(a, Tick(9)));
        assert!(!t.expire(b, Tick(9)));
        assert_eq!(t.state_of(a), Some(ActivityState::Failed));
        assert_eq!(t.state_of(b), Some(ActivityState::Started));
    }
}

// ── Relation ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod relation {
    use super::*;

    #[test]
    fn parses_short_and_long_names() {
        assert_eq!("fs".parse::<Relation>(), Ok(Relation::FinishStart));
        assert_eq!("StartStart".parse::<Relation>(), Ok(Relation::StartStart));
        assert_eq!("finish_finish".parse::<Relation>(), Ok(Relation::FinishFinish));
        assert_eq!(" FF ".parse::<Relation>(), Ok(Relation::FinishFinish));
        assert!(matches!(
            "sf".parse::<Relation>(),
            Err(PlanError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn displays_short_name() {
        assert_eq!(Relation::FinishStart.to_string(), "fs");
    }
}

// ── PrecedenceConstraintSet ───────────────────────────────────────────────────

#[cfg(test)]
mod precedence {
    use super::*;

    fn fs(a: ActivityId, b: ActivityId, min: u64, max: u64) -> PrecedenceConstraint {
        PrecedenceConstraint::new(a, b, Relation::FinishStart).with_lags(min, max)
    }

    #[test]
    fn add_validates() {
        let (t, a, b) = pair();
        let mut set = PrecedenceConstraintSet::new();

        assert!(matches!(
            set.add(fs(a, a, 0, 1), &t),
            Err(PlanError::InvalidConstraint { .. })
        ));
        assert_eq!(
            set.add(fs(a, b, 5, 2), &t),
            Err(PlanError::InvalidConstraint {
                source_activity: "a".into(),
                dest:            "b".into(),
                reason:          "min_lag 5 exceeds max_lag 2".into(),
            })
        );
        assert!(matches!(
            set.add(fs(a, ActivityId(9), 0, 1), &t),
            Err(PlanError::UnknownActivity(_))
        ));
        assert!(set.is_empty());

        set.add(fs(a, b, 0, 1), &t).unwrap();
        assert_eq!(set.incoming(b).count(), 1);
        assert_eq!(set.incoming(a).count(), 0);
    }

    #[test]
    fn finish_start_lag_window() {
        // A→B, minLag 3, maxLag 10.
        let (mut t, a, b) = pair();
        let mut set = PrecedenceConstraintSet::new();
        set.add(fs(a, b, 3, 10), &t).unwrap();

        assert!(!set.all_satisfied(b, &t, Tick(0)), "blocked while A waits");
        t.start(a, Tick(1));
        assert!(!set.all_satisfied(b, &t, Tick(20)), "blocked while A runs");
        t.finish(a, Outcome::Done, Tick(5)).unwrap();

        assert!(!set.all_satisfied(b, &t, Tick(5)));
        assert!(!set.all_satisfied(b, &t, Tick(7)));
        assert!(set.all_satisfied(b, &t, Tick(8)));
        assert!(set.all_satisfied(b, &t, Tick(15)));
        assert!(!set.all_satisfied(b, &t, Tick(16)));
    }

    #[test]
    fn finish_start_needs_done_not_failed() {
        let (mut t, a, b) = pair();
        let mut set = PrecedenceConstraintSet::new();
        set.add(fs(a, b, 0, UNBOUNDED_LAG), &t).unwrap();
        t.start(a, Tick(1));
        t.finish(a, Outcome::Failed, Tick(2)).unwrap();
        assert!(!set.all_satisfied(b, &t, Tick(50)));
    }

    #[test]
    fn start_start_counts_from_start() {
        let (mut t, a, b) = pair();
        let mut set = PrecedenceConstraintSet::new();
        set.add(PrecedenceConstraint::new(a, b, Relation::StartStart).with_lags(2, 4), &t)
            .unwrap();

        assert!(!set.all_satisfied(b, &t, Tick(3)));
        t.start(a, Tick(3));
        assert!(!set.all_satisfied(b, &t, Tick(4)));
        assert!(set.all_satisfied(b, &t, Tick(5)));
        t.finish(a, Outcome::Failed, Tick(6)).unwrap();
        assert!(set.all_satisfied(b, &t, Tick(7)), "a failed source has still started");
        assert!(!set.all_satisfied(b, &t, Tick(8)));
    }

    #[test]
    fn preempted_source_no_longer_counts_as_started() {
        let (mut t, a, b) = pair();
        let mut set = PrecedenceConstraintSet::new();
        set.add(PrecedenceConstraint::new(a, b, Relation::StartStart), &t).unwrap();
        t.start(a, Tick(1));
        assert!(set.all_satisfied(b, &t, Tick(1)));
        t.preempt(a, Tick(2));
        assert!(!set.all_satisfied(b, &t, Tick(2)));
    }

    #[test]
    fn next_opening_reports_min_lag_expiry() {
        let (mut t, a, b) = pair();
        let mut set = PrecedenceConstraintSet::new();
        set.add(fs(a, b, 3, 10), &t).unwrap();

        assert_eq!(set.next_opening(b, &t, Tick(0)), None, "source not done yet");
        run_to_done(&mut t, a, 1, 5);
        assert_eq!(set.next_opening(b, &t, Tick(6)), Some(Tick(8)));
        assert_eq!(set.next_opening(b, &t, Tick(9)), None, "already open");
        assert_eq!(set.next_opening(b, &t, Tick(20)), None, "closed for good");
    }

    #[test]
    fn finish_finish_blocks_on_waiting_source() {
        let (t, a, b) = pair();
        let mut set = PrecedenceConstraintSet::new();
        set.add(PrecedenceConstraint::new(a, b, Relation::FinishFinish), &t).unwrap();
        assert!(!set.all_satisfied(b, &t, Tick(1)));
    }

    #[test]
    fn finish_finish_with_running_source() {
        let mut t = ActivityTable::new();
        let a = t
            .add(Activity::new("a").with_finish_window(TimeWindow::between(Tick(8), Tick(10))))
            .unwrap();
        let b = t
            .add(Activity::new("b").with_finish_window(TimeWindow::between(Tick(12), Tick(14))))
            .unwrap();
        t.start(a, Tick(1));
        let ff = |min, max| PrecedenceConstraint::new(a, b, Relation::FinishFinish).with_lags(min, max);

        // At T5: a finishes in [8, 10], b in [12, 14]; lags span [2, 6].
        let mut exact = PrecedenceConstraintSet::new();
        exact.add(ff(2, 6), &t).unwrap();
        assert!(exact.all_satisfied(b, &t, Tick(5)));

        // Lag 6 is possible, so [0, 5] waits until a cannot finish before T9.
        let mut tight = PrecedenceConstraintSet::new();
        tight.add(ff(0, 5), &t).unwrap();
        assert!(!tight.all_satisfied(b, &t, Tick(5)));
        assert_eq!(tight.next_opening(b, &t, Tick(5)), Some(Tick(9)));
        assert!(tight.all_satisfied(b, &t, Tick(9)));

        // Lag 2 is possible, and by the time b cannot finish before T13 a is
        // already overdue: [3, 9] never opens.
        let mut late = PrecedenceConstraintSet::new();
        late.add(ff(3, 9), &t).unwrap();
        assert!(!late.all_satisfied(b, &t, Tick(5)));
        assert_eq!(late.next_opening(b, &t, Tick(5)), None);
    }

    #[test]
    fn finish_finish_waits_on_unbounded_source() {
        let (mut t, a, b) = pair();
        let mut set = PrecedenceConstraintSet::new();
        set.add(PrecedenceConstraint::new(a, b, Relation::FinishFinish), &t).unwrap();
        t.start(a, Tick(1));
        assert!(!set.all_satisfied(b, &t, Tick(3)), "a may still finish after b");
        assert_eq!(set.next_opening(b, &t, Tick(3)), None);
        t.finish(a, Outcome::Done, Tick(4)).unwrap();
        assert!(set.all_satisfied(b, &t, Tick(4)));
    }

    #[test]
    fn finish_finish_with_done_source() {
        let mut t = ActivityTable::new();
        let a = t.add(Activity::new("a")).unwrap();
        let b = t
            .add(Activity::new("b").with_finish_window(TimeWindow::new(None, Some(Tick(6)))))
            .unwrap();
        run_to_done(&mut t, a, 1, 4);
        let ff = |min, max| PrecedenceConstraint::new(a, b, Relation::FinishFinish).with_lags(min, max);

        // b finishes in [5, 6]: lag to a's finish at T4 is 1 or 2.
        let mut never = PrecedenceConstraintSet::new();
        never.add(ff(3, 9), &t).unwrap();
        for now in 5..=8 {
            assert!(!never.all_satisfied(b, &t, Tick(now)), "T{now}");
        }
        assert_eq!(never.next_opening(b, &t, Tick(5)), None);

        let mut ok = PrecedenceConstraintSet::new();
        ok.add(ff(1, 9), &t).unwrap();
        assert!(ok.all_satisfied(b, &t, Tick(5)));
        assert!(!ok.all_satisfied(b, &t, Tick(7)), "past b's maxfinish");

        let mut later = PrecedenceConstraintSet::new();
        later.add(ff(2, 9), &t).unwrap();
        assert!(!later.all_satisfied(b, &t, Tick(5)));
        assert_eq!(later.next_opening(b, &t, Tick(5)), Some(Tick(6)));
        assert!(later.all_satisfied(b, &t, Tick(6)));
    }
}
