//! Unit tests for pl-core primitives.

#[cfg(test)]
mod ids {
    use crate::{ActivityId, PoolId, RuleId};

    #[test]
    fn index_roundtrip() {
        let id = ActivityId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(ActivityId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering_follows_registration() {
        assert!(ActivityId(0) < ActivityId(1));
        assert!(RuleId(100) > RuleId(99));
    }

    #[test]
    fn display() {
        assert_eq!(PoolId(7).to_string(), "PoolId(7)");
    }
}

#[cfg(test)]
mod time {
    use crate::{Tick, TimeWindow};

    #[test]
    fn tick_arithmetic() {
        let t = Tick(10);
        assert_eq!(t + 5, Tick(15));
        assert_eq!(t.offset(3), Tick(13));
        assert_eq!(Tick(15).since(Tick(10)), Some(5));
        assert_eq!(Tick(10).since(Tick(15)), None);
    }

    #[test]
    fn offset_saturates() {
        assert_eq!(Tick::MAX.offset(1), Tick::MAX);
        assert_eq!(Tick(u64::MAX - 1) + 10, Tick::MAX);
    }

    #[test]
    fn unbounded_window_contains_everything() {
        let w = TimeWindow::UNBOUNDED;
        assert!(w.contains(Tick(0)));
        assert!(w.contains(Tick::MAX));
        assert!(w.is_unbounded());
        assert!(!w.has_closed(Tick::MAX));
    }

    #[test]
    fn closed_window_bounds_are_inclusive() {
        let w = TimeWindow::between(Tick(3), Tick(5));
        assert!(!w.contains(Tick(2)));
        assert!(w.contains(Tick(3)));
        assert!(w.contains(Tick(5)));
        assert!(!w.contains(Tick(6)));
    }

    #[test]
    fn opens_after_only_reports_future_bounds() {
        let w = TimeWindow::between(Tick(3), Tick(5));
        assert_eq!(w.opens_after(Tick(1)), Some(Tick(3)));
        assert_eq!(w.opens_after(Tick(3)), None);
        assert_eq!(TimeWindow::UNBOUNDED.opens_after(Tick(0)), None);
    }

    #[test]
    fn has_closed_after_upper_bound() {
        let w = TimeWindow::new(None, Some(Tick(4)));
        assert!(!w.has_closed(Tick(4)));
        assert!(w.has_closed(Tick(5)));
    }

    #[test]
    fn well_formed() {
        assert!(TimeWindow::at(Tick(2)).is_well_formed());
        assert!(!TimeWindow::between(Tick(5), Tick(2)).is_well_formed());
        assert!(TimeWindow::new(Some(Tick(9)), None).is_well_formed());
    }

    #[test]
    fn window_display() {
        assert_eq!(TimeWindow::between(Tick(1), Tick(2)).to_string(), "[T1, T2]");
        assert_eq!(TimeWindow::new(Some(Tick(1)), None).to_string(), "[T1, ∞)");
    }
}

#[cfg(test)]
mod scalar {
    use crate::{Parameters, PlanError, Scalar};

    #[test]
    fn parameters_are_queryable_in_any_insert_order() {
        let params = Parameters::new()
            .with("threshold", 3.0)
            .with("fact", "rain")
            .with("alpha", 1.0);
        assert_eq!(params.real("threshold").unwrap(), 3.0);
        assert_eq!(params.text("fact").unwrap(), "rain");
        let names: Vec<&str> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["alpha", "fact", "threshold"]);
    }

    #[test]
    fn typed_getters_reject_wrong_kind() {
        let params = Parameters::new().with("fact", "rain");
        match params.real("fact") {
            Err(PlanError::InvalidParameter { name, reason }) => {
                assert_eq!(name, "fact");
                assert!(reason.contains("text"), "{reason}");
            }
            other => panic!("expected InvalidParameter, got {other:?}"),
        }
        assert!(params.text("missing").is_err());
    }

    #[test]
    fn real_or_defaults_only_when_absent() {
        let params = Parameters::new().with("fact", "rain");
        assert_eq!(params.real_or("threshold", 2.5).unwrap(), 2.5);
        assert!(params.real_or("fact", 0.0).is_err());
    }

    #[test]
    fn insert_replaces() {
        let mut params = Parameters::new();
        assert!(params.insert("x", 1.0).is_none());
        assert_eq!(params.insert("x", 2.0), Some(Scalar::Real(1.0)));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn scalar_conversions() {
        assert_eq!(Scalar::from(4i64), Scalar::Real(4.0));
        assert_eq!(Scalar::from("a").as_text(), Some("a"));
        assert_eq!(Scalar::from(1.5).as_real(), Some(1.5));
        assert_eq!(Scalar::from("a").as_real(), None);
    }
}

#[cfg(test)]
mod state {
    use crate::{ActivityState, Outcome};

    #[test]
    fn display_is_lowercase() {
        assert_eq!(ActivityState::Wait.to_string(), "wait");
        assert_eq!(ActivityState::Started.to_string(), "started");
        assert_eq!(ActivityState::Done.to_string(), "done");
        assert_eq!(ActivityState::Failed.to_string(), "failed");
    }

    #[test]
    fn terminal_states() {
        assert!(!ActivityState::Wait.is_terminal());
        assert!(!ActivityState::Started.is_terminal());
        assert!(ActivityState::Done.is_terminal());
        assert!(ActivityState::Failed.is_terminal());
    }

    #[test]
    fn outcome_parses_protocol_words() {
        assert_eq!("done".parse::<Outcome>().unwrap(), Outcome::Done);
        assert_eq!("fail".parse::<Outcome>().unwrap(), Outcome::Failed);
        assert_eq!(" failed ".parse::<Outcome>().unwrap(), Outcome::Failed);
        assert!("finished".parse::<Outcome>().is_err());
        assert_eq!(Outcome::Failed.terminal_state(), ActivityState::Failed);
    }
}

#[cfg(test)]
mod config {
    use crate::{DeadlinePolicy, PlannerConfig};

    #[test]
    fn defaults() {
        let cfg = PlannerConfig::default();
        assert_eq!(cfg.max_passes, 64);
        assert!(cfg.release_on_terminal);
        assert!(cfg.preemption);
        assert_eq!(cfg.deadline_policy, DeadlinePolicy::KeepWaiting);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn zero_passes_rejected() {
        let cfg = PlannerConfig { max_passes: 0, ..PlannerConfig::default() };
        assert!(cfg.validate().is_err());
    }
}
