//! Fluent builder for constructing a [`Planner`].

use pl_activity::{
    Activity, ActivityTable, PrecedenceConstraint, PrecedenceConstraintSet, Relation,
    UNBOUNDED_LAG,
};
use pl_core::{Parameters, PlanError, PlanResult, PlannerConfig, Scalar, Tick, TimeWindow};
use pl_resource::ResourcePool;
use pl_rules::{FactBase, Predicate, PredicateCatalog, RuleCatalog};

use crate::Planner;

// ── Definitions ───────────────────────────────────────────────────────────────

/// An activity as written in a plan: everything is referenced by name.
#[derive(Clone, Debug, PartialEq)]
pub struct ActivityDef {
    pub name:          String,
    pub priority:      i32,
    pub start_window:  TimeWindow,
    pub finish_window: TimeWindow,
    pub rules:         Vec<String>,
    /// Pool names, one per required instance.
    pub resources:     Vec<String>,
}

impl ActivityDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name:          name.into(),
            priority:      0,
            start_window:  TimeWindow::UNBOUNDED,
            finish_window: TimeWindow::UNBOUNDED,
            rules:         Vec::new(),
            resources:     Vec::new(),
        }
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn start_window(mut self, window: TimeWindow) -> Self {
        self.start_window = window;
        self
    }

    pub fn finish_window(mut self, window: TimeWindow) -> Self {
        self.finish_window = window;
        self
    }

    pub fn rule(mut self, rule: impl Into<String>) -> Self {
        self.rules.push(rule.into());
        self
    }

    pub fn resource(mut self, pool: impl Into<String>) -> Self {
        self.resources.push(pool.into());
        self
    }
}

/// A precedence constraint between two named activities.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrecedenceDef {
    pub source:   String,
    pub dest:     String,
    pub relation: Relation,
    pub min_lag:  u64,
    pub max_lag:  u64,
}

impl PrecedenceDef {
    /// A constraint with lag `[0, ∞)`.
    pub fn new(source: impl Into<String>, dest: impl Into<String>, relation: Relation) -> Self {
        Self {
            source: source.into(),
            dest: dest.into(),
            relation,
            min_lag: 0,
            max_lag: UNBOUNDED_LAG,
        }
    }

    pub fn lags(mut self, min_lag: u64, max_lag: u64) -> Self {
        self.min_lag = min_lag;
        self.max_lag = max_lag;
        self
    }
}

struct PredicateDef {
    name:   String,
    func:   Box<dyn Predicate>,
    params: Parameters,
}

// ── PlannerBuilder ────────────────────────────────────────────────────────────

/// Collects a plan by name and resolves it into a [`Planner`].
///
/// Nothing is checked until [`build`](Self::build), which registers
/// everything in dependency order (predicates, rules, pools, activities,
/// precedences) and fails on the first malformed reference.  A planner that
/// builds successfully has no dangling names.
///
/// # Optional inputs (have defaults)
///
/// | Method          | Default             |
/// |-----------------|---------------------|
/// | `.loaded_at(t)` | `Tick(0)`           |
/// | `.fact(n, v)`   | empty fact base     |
pub struct PlannerBuilder {
    config:      PlannerConfig,
    loaded_at:   Tick,
    predicates:  Vec<PredicateDef>,
    rules:       Vec<(String, Vec<String>)>,
    pools:       Vec<(String, Vec<String>)>,
    activities:  Vec<ActivityDef>,
    precedences: Vec<PrecedenceDef>,
    facts:       Vec<(String, Scalar)>,
}

impl PlannerBuilder {
    pub fn new(config: PlannerConfig) -> Self {
        Self {
            config,
            loaded_at:   Tick::ZERO,
            predicates:  Vec::new(),
            rules:       Vec::new(),
            pools:       Vec::new(),
            activities:  Vec::new(),
            precedences: Vec::new(),
            facts:       Vec::new(),
        }
    }

    /// Replace the planner configuration.
    pub fn config(mut self, config: PlannerConfig) -> Self {
        self.config = config;
        self
    }

    /// Tick at which the plan counts as loaded (seen by predicates as
    /// `EvalContext::loaded_at`).
    pub fn loaded_at(mut self, t: Tick) -> Self {
        self.loaded_at = t;
        self
    }

    pub fn predicate<P: Predicate>(
        self,
        name:   impl Into<String>,
        func:   P,
        params: Parameters,
    ) -> Self {
        self.predicate_boxed(name, Box::new(func), params)
    }

    pub fn predicate_boxed(
        mut self,
        name:   impl Into<String>,
        func:   Box<dyn Predicate>,
        params: Parameters,
    ) -> Self {
        self.predicates.push(PredicateDef { name: name.into(), func, params });
        self
    }

    /// A rule over the named predicates.  An empty list always holds.
    pub fn rule<I, S>(mut self, name: impl Into<String>, predicates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rules
            .push((name.into(), predicates.into_iter().map(Into::into).collect()));
        self
    }

    /// A pool with the given instance names, registered in order.
    pub fn pool<I, S>(mut self, name: impl Into<String>, instances: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pools
            .push((name.into(), instances.into_iter().map(Into::into).collect()));
        self
    }

    pub fn activity(mut self, def: ActivityDef) -> Self {
        self.activities.push(def);
        self
    }

    pub fn precedence(mut self, def: PrecedenceDef) -> Self {
        self.precedences.push(def);
        self
    }

    /// Initial value of a fact.
    pub fn fact(mut self, name: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.facts.push((name.into(), value.into()));
        self
    }

    /// Resolve every name and return a ready planner.
    pub fn build(self) -> PlanResult<Planner> {
        self.config.validate()?;

        // ── Predicates and rules ──────────────────────────────────────────
        let mut predicates = PredicateCatalog::new();
        for p in self.predicates {
            predicates.register_boxed(p.name, p.func, p.params)?;
        }
        let mut rules = RuleCatalog::new();
        for (name, preds) in &self.rules {
            rules.register(name.as_str(), preds, &predicates)?;
        }

        // ── Pools ─────────────────────────────────────────────────────────
        let mut resources = ResourcePool::new();
        for (name, instances) in &self.pools {
            resources.add_pool(name.as_str())?;
            for inst in instances {
                resources.add_instance(name, inst.as_str())?;
            }
        }

        // ── Activities ────────────────────────────────────────────────────
        let mut activities = ActivityTable::new();
        for def in self.activities {
            for (what, w) in [("start", def.start_window), ("finish", def.finish_window)] {
                if !w.is_well_formed() {
                    return Err(PlanError::InvalidParameter {
                        name:   format!("{}.{what}", def.name),
                        reason: format!("empty {what} window {w}"),
                    });
                }
            }
            let rule_ids = def
                .rules
                .iter()
                .map(|r| rules.id(r))
                .collect::<PlanResult<Vec<_>>>()?;
            let pool_ids = def
                .resources
                .iter()
                .map(|p| resources.pool_id(p))
                .collect::<PlanResult<Vec<_>>>()?;
            activities.add(
                Activity::new(def.name)
                    .with_priority(def.priority)
                    .with_start_window(def.start_window)
                    .with_finish_window(def.finish_window)
                    .with_rules(rule_ids)
                    .with_pools(pool_ids),
            )?;
        }

        // ── Precedences ───────────────────────────────────────────────────
        let mut precedence = PrecedenceConstraintSet::new();
        for def in &self.precedences {
            let source = activities.id(&def.source)?;
            let dest = activities.id(&def.dest)?;
            precedence.add(
                PrecedenceConstraint::new(source, dest, def.relation)
                    .with_lags(def.min_lag, def.max_lag),
                &activities,
            )?;
        }

        let mut facts = FactBase::new();
        for (name, value) in self.facts {
            facts.set(name, value);
        }

        tracing::info!(
            predicates = predicates.len(),
            rules = rules.len(),
            pools = resources.pool_count(),
            activities = activities.len(),
            precedences = precedence.len(),
            loaded_at = self.loaded_at.0,
            "plan loaded"
        );

        Ok(Planner {
            config: self.config,
            loaded_at: self.loaded_at,
            predicates,
            rules,
            resources,
            activities,
            precedence,
            facts,
        })
    }
}
