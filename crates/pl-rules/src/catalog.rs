//! `PredicateCatalog`: registered predicates, addressable by name or id.

use rustc_hash::FxHashMap;

use pl_core::{Parameters, PlanError, PlanResult, PredicateId, RuleId, Tick};

use crate::{EvalContext, Predicate, Scope};

struct Entry {
    name:   String,
    params: Parameters,
    func:   Box<dyn Predicate>,
}

/// Predicates in registration order.  Immutable once registered.
#[derive(Default)]
pub struct PredicateCatalog {
    entries: Vec<Entry>,
    index:   FxHashMap<String, PredicateId>,
}

impl PredicateCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `func` under `name` with its parameters.
    ///
    /// Fails with [`PlanError::DuplicateId`] if `name` is taken.
    pub fn register<P: Predicate>(
        &mut self,
        name:   impl Into<String>,
        func:   P,
        params: Parameters,
    ) -> PlanResult<PredicateId> {
        self.register_boxed(name, Box::new(func), params)
    }

    pub fn register_boxed(
        &mut self,
        name:   impl Into<String>,
        func:   Box<dyn Predicate>,
        params: Parameters,
    ) -> PlanResult<PredicateId> {
        let name = name.into();
        if self.index.contains_key(&name) {
            return Err(PlanError::DuplicateId { kind: "predicate", id: name });
        }
        let id = PredicateId::try_from(self.entries.len())
            .map_err(|_| PlanError::Config("too many predicates".to_owned()))?;
        self.index.insert(name.clone(), id);
        self.entries.push(Entry { name, params, func });
        Ok(id)
    }

    /// Resolve a predicate name.
    pub fn id(&self, name: &str) -> PlanResult<PredicateId> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| PlanError::UnknownPredicate(name.to_owned()))
    }

    pub fn name(&self, id: PredicateId) -> Option<&str> {
        self.entries.get(id.index()).map(|e| e.name.as_str())
    }

    pub fn params(&self, id: PredicateId) -> Option<&Parameters> {
        self.entries.get(id.index()).map(|e| &e.params)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Evaluate predicate `id` for the activity in `scope`, on behalf of `rule`.
    pub fn evaluate(&self, id: PredicateId, scope: &Scope<'_>, rule: RuleId) -> PlanResult<bool> {
        let entry = self.entry(id)?;
        let ctx = EvalContext::new(scope, rule, &entry.params);
        let holds = entry.func.evaluate(&ctx);
        tracing::trace!(
            predicate = %entry.name,
            activity = scope.activity_name,
            tick = scope.now.0,
            holds,
            "predicate evaluated"
        );
        Ok(holds)
    }

    /// Time hint from predicate `id`; see [`Predicate::next_change`].
    pub fn next_change(
        &self,
        id:    PredicateId,
        scope: &Scope<'_>,
        rule:  RuleId,
    ) -> PlanResult<Option<Tick>> {
        let entry = self.entry(id)?;
        let ctx = EvalContext::new(scope, rule, &entry.params);
        Ok(entry.func.next_change(&ctx).filter(|&t| t > scope.now))
    }

    fn entry(&self, id: PredicateId) -> PlanResult<&Entry> {
        self.entries
            .get(id.index())
            .ok_or_else(|| PlanError::UnknownPredicate(id.to_string()))
    }
}
