//! Plan file → `PlannerBuilder`.

use std::path::Path;

use pl_activity::{Relation, UNBOUNDED_LAG};
use pl_core::{PlanError, PlanResult, Tick, TimeWindow};
use pl_planner::{ActivityDef, PlannerBuilder, PrecedenceDef};
use pl_rules::PredicateFactory;

use crate::{LoadResult, PlanDocument};

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a plan file using the built-in predicate kinds.
pub fn load_plan(path: &Path) -> LoadResult<PlannerBuilder> {
    let text = std::fs::read_to_string(path)?;
    load_plan_str(&text)
}

/// Like [`load_plan`] but from TOML text.
pub fn load_plan_str(text: &str) -> LoadResult<PlannerBuilder> {
    load_plan_str_with(text, &PredicateFactory::with_builtins())
}

/// Like [`load_plan_str`] with a caller-supplied factory, so plans can use
/// custom predicate kinds.
pub fn load_plan_str_with(text: &str, factory: &PredicateFactory) -> LoadResult<PlannerBuilder> {
    let doc: PlanDocument = toml::from_str(text)?;
    Ok(builder_from_document(doc, factory)?)
}

/// Translate a parsed document.  Predicate kinds and parameters are checked
/// here; name references are left to [`PlannerBuilder::build`].
pub fn builder_from_document(
    doc:     PlanDocument,
    factory: &PredicateFactory,
) -> PlanResult<PlannerBuilder> {
    tracing::info!(
        predicates = doc.predicates.len(),
        rules = doc.rules.len(),
        pools = doc.pools.len(),
        activities = doc.activities.len(),
        precedences = doc.precedences.len(),
        "plan file parsed"
    );

    let mut b = PlannerBuilder::new(doc.planner).loaded_at(Tick(doc.loaded_at));

    for (name, value) in doc.facts {
        b = b.fact(name, value);
    }

    for p in doc.predicates {
        let func = factory.build(&p.kind, &p.parameters).map_err(|e| match e {
            PlanError::InvalidParameter { name, reason } => PlanError::InvalidParameter {
                name: format!("{}.{name}", p.id),
                reason,
            },
            other => other,
        })?;
        b = b.predicate_boxed(p.id, func, p.parameters);
    }

    for r in doc.rules {
        b = b.rule(r.id, r.predicates.names());
    }

    for pool in doc.pools {
        b = b.pool(pool.name, pool.instances.names());
    }

    for a in doc.activities {
        let start = window(&a.id, "start", a.minstart, a.maxstart, a.start)?;
        let finish = window(&a.id, "finish", a.minfinish, a.maxfinish, a.finish)?;
        let mut def = ActivityDef::new(a.id)
            .priority(a.priority)
            .start_window(start)
            .finish_window(finish);
        for rule in a.rules.names() {
            def = def.rule(rule);
        }
        for pool in a.resources.names() {
            def = def.resource(pool);
        }
        b = b.activity(def);
    }

    for c in doc.precedences {
        let relation: Relation = c.relation.parse()?;
        b = b.precedence(
            PrecedenceDef::new(c.source, c.dest, relation)
                .lags(c.min_lag, c.max_lag.unwrap_or(UNBOUNDED_LAG)),
        );
    }

    Ok(b)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// `start = t` is shorthand for `minstart = maxstart = t`; mixing the two
/// forms is rejected.
fn window(
    owner: &str,
    what:  &str,
    min:   Option<u64>,
    max:   Option<u64>,
    exact: Option<u64>,
) -> PlanResult<TimeWindow> {
    match exact {
        None => Ok(TimeWindow::new(min.map(Tick), max.map(Tick))),
        Some(t) if min.is_none() && max.is_none() => Ok(TimeWindow::at(Tick(t))),
        Some(_) => Err(PlanError::InvalidParameter {
            name:   format!("{owner}.{what}"),
            reason: format!("`{what}` cannot be combined with min{what} / max{what}"),
        }),
    }
}
