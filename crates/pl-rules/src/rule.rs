//! `RuleCatalog`: named conjunctions of predicates.

use rustc_hash::FxHashMap;

use pl_core::{PlanError, PlanResult, PredicateId, RuleId, Tick};

use crate::{PredicateCatalog, Scope};

struct Rule {
    name:       String,
    predicates: Vec<PredicateId>,
}

/// Rules in registration order.
///
/// A rule holds iff every predicate it references holds.  A rule with no
/// predicates always holds.
#[derive(Default)]
pub struct RuleCatalog {
    rules: Vec<Rule>,
    index: FxHashMap<String, RuleId>,
}

impl RuleCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register rule `name` over the named predicates.
    ///
    /// Fails with [`PlanError::DuplicateId`] if `name` is taken and with
    /// [`PlanError::UnknownPredicate`] if any predicate is not in
    /// `predicates`.  Nothing is registered on failure.
    pub fn register<S: AsRef<str>>(
        &mut self,
        name:            impl Into<String>,
        predicate_names: &[S],
        predicates:      &PredicateCatalog,
    ) -> PlanResult<RuleId> {
        let name = name.into();
        if self.index.contains_key(&name) {
            return Err(PlanError::DuplicateId { kind: "rule", id: name });
        }
        let ids = predicate_names
            .iter()
            .map(|p| predicates.id(p.as_ref()))
            .collect::<PlanResult<Vec<_>>>()?;

        let id = RuleId::try_from(self.rules.len())
            .map_err(|_| PlanError::Config("too many rules".to_owned()))?;
        self.index.insert(name.clone(), id);
        self.rules.push(Rule { name, predicates: ids });
        Ok(id)
    }

    pub fn id(&self, name: &str) -> PlanResult<RuleId> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| PlanError::UnknownRule(name.to_owned()))
    }

    pub fn name(&self, id: RuleId) -> Option<&str> {
        self.rules.get(id.index()).map(|r| r.name.as_str())
    }

    /// Predicate ids referenced by `id`, in declaration order.
    pub fn predicates_of(&self, id: RuleId) -> Option<&[PredicateId]> {
        self.rules.get(id.index()).map(|r| r.predicates.as_slice())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Short-circuiting AND over the rule's predicates.
    pub fn is_satisfied(
        &self,
        id:         RuleId,
        predicates: &PredicateCatalog,
        scope:      &Scope<'_>,
    ) -> PlanResult<bool> {
        for &p in self.rule(id)?.predicates.iter() {
            if !predicates.evaluate(p, scope, id)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Earliest tick after `scope.now` at which the rule could start to hold
    /// through the passage of time alone.
    ///
    /// The rule cannot hold before every currently false predicate has
    /// flipped, so this is the latest of their hints.  `None` if the rule
    /// already holds or if some false predicate has no time hint (it waits on
    /// a fact instead).
    pub fn next_change(
        &self,
        id:         RuleId,
        predicates: &PredicateCatalog,
        scope:      &Scope<'_>,
    ) -> PlanResult<Option<Tick>> {
        let mut latest: Option<Tick> = None;
        let mut any_false = false;
        for &p in self.rule(id)?.predicates.iter() {
            if predicates.evaluate(p, scope, id)? {
                continue;
            }
            any_false = true;
            match predicates.next_change(p, scope, id)? {
                Some(t) => latest = Some(latest.map_or(t, |l| l.max(t))),
                None => return Ok(None),
            }
        }
        Ok(if any_false { latest } else { None })
    }

    fn rule(&self, id: RuleId) -> PlanResult<&Rule> {
        self.rules
            .get(id.index())
            .ok_or_else(|| PlanError::UnknownRule(id.to_string()))
    }
}
