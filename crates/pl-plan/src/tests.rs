//! Unit tests for pl-plan.

use std::io::Write;

use serde::Deserialize;

use pl_core::{ActivityState, DeadlinePolicy, Outcome, PlanError, PlannerConfig, Tick};
use pl_rules::{PredicateFactory, from_fn};

use crate::{LoadError, load_config, load_config_str, load_plan, load_plan_str, load_plan_str_with};

// ── Fixtures ──────────────────────────────────────────────────────────────────

const FARM: &str = r#"
loaded_at = 7

[facts]
rain = 12.0

[[predicates]]
id   = "predUsingPlanTimeStamp"
type = "plan_elapsed"
parameters = { threshold = 3 }

[[predicates]]
id   = "dry"
type = "fact_compare"
parameters = { fact = "rain", op = "<", value = 5 }

[[rules]]
id         = "r1"
predicates = ["predUsingPlanTimeStamp"]

[[rules]]
id         = "harvest_ok"
predicates = "predUsingPlanTimeStamp, dry"

[[pools]]
name      = "Farmer"
instances = ["Bob"]

[[activities]]
id        = "activity1"
rules     = ["r1"]
resources = ["Farmer"]

[[activities]]
id        = "harvest"
rules     = "harvest_ok"
resources = "Farmer"
maxstart  = 40

[[precedences]]
source   = "activity1"
dest     = "harvest"
relation = "finish_start"
min_lag  = 1
"#;

fn load_err(text: &str) -> LoadError {
    match load_plan_str(text).and_then(|b| Ok(b.build()?)) {
        Ok(_) => panic!("expected the plan to be rejected"),
        Err(e) => e,
    }
}

// ── Plan loading ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod plan {
    use super::*;

    #[test]
    fn farm_plan_runs() {
        let mut p = load_plan_str(FARM).unwrap().build().unwrap();
        assert_eq!(p.loaded_at(), Tick(7));
        assert_eq!(p.rules().len(), 2);

        for t in 7..10 {
            p.process_changes(Tick(t)).unwrap();
            assert_eq!(p.state_of("activity1").unwrap(), ActivityState::Wait);
        }
        p.process_changes(Tick(10)).unwrap();
        assert_eq!(p.state_of("activity1").unwrap(), ActivityState::Started);
        assert_eq!(p.holder_of("Farmer", "Bob").unwrap(), Some("activity1"));

        p.acknowledge("activity1", Outcome::Done, Tick(11)).unwrap();
        p.process_changes(Tick(12)).unwrap();
        assert_eq!(p.state_of("harvest").unwrap(), ActivityState::Wait, "still raining");

        p.set_fact("rain", 0.0);
        p.process_changes(Tick(13)).unwrap();
        assert_eq!(p.state_of("harvest").unwrap(), ActivityState::Started);
    }

    #[test]
    fn empty_document_is_an_empty_plan() {
        let p = load_plan_str("").unwrap().build().unwrap();
        assert!(p.activities().is_empty());
        assert_eq!(p.config(), &PlannerConfig::default());
    }

    #[test]
    fn planner_section_sets_config() {
        let p = load_plan_str("[planner]\ndeadline_policy = \"fail\"\nmax_passes = 5\n")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(p.config().deadline_policy, DeadlinePolicy::Fail);
        assert_eq!(p.config().max_passes, 5);
        assert!(p.config().preemption);
    }

    #[test]
    fn fixed_start_is_shorthand() {
        let p = load_plan_str("[[activities]]\nid = \"a\"\nstart = 4\n")
            .unwrap()
            .build()
            .unwrap();
        let id = p.activity_id("a").unwrap();
        let window = p.activities().get(id).unwrap().start_window();
        assert_eq!(window.lo, Some(Tick(4)));
        assert_eq!(window.hi, Some(Tick(4)));
    }

    #[test]
    fn fixed_start_conflicts_with_bounds() {
        let err = load_err("[[activities]]\nid = \"a\"\nstart = 4\nminstart = 2\n");
        assert!(matches!(err, LoadError::Plan(PlanError::InvalidParameter { .. })));
    }

    #[test]
    fn unknown_predicate_kind() {
        let err = load_err("[[predicates]]\nid = \"p\"\ntype = \"moon_phase\"\n");
        assert!(matches!(err, LoadError::Plan(PlanError::UnknownPredicateKind(k)) if k == "moon_phase"));
    }

    #[test]
    fn bad_parameter_names_the_predicate() {
        let err = load_err("[[predicates]]\nid = \"late\"\ntype = \"plan_elapsed\"\n");
        match err {
            LoadError::Plan(PlanError::InvalidParameter { name, .. }) => {
                assert_eq!(name, "late.threshold");
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn dangling_references_fail_at_build() {
        let err = load_err("[[rules]]\nid = \"r\"\npredicates = [\"ghost\"]\n");
        assert!(matches!(err, LoadError::Plan(PlanError::UnknownPredicate(_))));

        let err = load_err("[[activities]]\nid = \"a\"\nresources = [\"Tractor\"]\n");
        assert!(matches!(err, LoadError::Plan(PlanError::UnknownPool(_))));

        let err = load_err(
            "[[activities]]\nid = \"a\"\n[[precedences]]\nsource = \"a\"\ndest = \"b\"\nrelation = \"ss\"\n",
        );
        assert!(matches!(err, LoadError::Plan(PlanError::UnknownActivity(_))));
    }

    #[test]
    fn bad_relation_is_rejected() {
        let err = load_err(
            "[[activities]]\nid = \"a\"\n[[activities]]\nid = \"b\"\n\
             [[precedences]]\nsource = \"a\"\ndest = \"b\"\nrelation = \"sf\"\n",
        );
        assert!(matches!(err, LoadError::Plan(PlanError::InvalidParameter { .. })));
    }

    #[test]
    fn unknown_field_is_a_parse_error() {
        assert!(matches!(
            load_plan_str("[[activities]]\nid = \"a\"\npriorty = 3\n"),
            Err(LoadError::Toml(_))
        ));
    }

    #[test]
    fn custom_predicate_kinds() {
        let mut factory = PredicateFactory::with_builtins();
        factory.register("always", |_| Ok(Box::new(from_fn(|_| true))));
        let mut p = load_plan_str_with(
            "[[predicates]]\nid = \"p\"\ntype = \"always\"\n\
             [[rules]]\nid = \"r\"\npredicates = \"p\"\n\
             [[activities]]\nid = \"a\"\nrules = [\"r\"]\n",
            &factory,
        )
        .unwrap()
        .build()
        .unwrap();
        p.process_changes(Tick(0)).unwrap();
        assert_eq!(p.state_of("a").unwrap(), ActivityState::Started);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FARM.as_bytes()).unwrap();
        let p = load_plan(file.path()).unwrap().build().unwrap();
        assert_eq!(p.activities().len(), 2);

        assert!(matches!(
            load_plan(std::path::Path::new("/definitely/not/here.toml")),
            Err(LoadError::Io(_))
        ));
    }
}

// ── Configuration ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod config {
    use super::*;

    #[derive(Deserialize)]
    struct RunConfig {
        #[serde(default)]
        planner: PlannerConfig,
        label:   String,
    }

    #[test]
    fn planner_config_defaults_fill_gaps() {
        let cfg: PlannerConfig = load_config_str("release_on_terminal = false\n").unwrap();
        assert!(!cfg.release_on_terminal);
        assert_eq!(cfg.max_passes, 64);
        assert_eq!(cfg.deadline_policy, DeadlinePolicy::KeepWaiting);
    }

    #[test]
    fn nested_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "label = \"spring\"\n[planner]\npreemption = false").unwrap();
        let cfg: RunConfig = load_config(file.path()).unwrap();
        assert_eq!(cfg.label, "spring");
        assert!(!cfg.planner.preemption);
    }

    #[test]
    fn bad_policy_is_a_parse_error() {
        let r: Result<PlannerConfig, _> = load_config_str("deadline_policy = \"panic\"\n");
        assert!(matches!(r, Err(LoadError::Toml(_))));
    }
}
