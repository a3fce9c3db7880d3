//! `PredicateFactory`: maps a plan file's predicate `type` to a constructor.

use rustc_hash::FxHashMap;

use pl_core::{Parameters, PlanError, PlanResult};

use crate::kinds::{Constant, FactCompare, FactEquals, PlanElapsed, TimeBetween};
use crate::Predicate;

/// Builds a boxed predicate from its registered parameters.
pub type PredicateCtor = Box<dyn Fn(&Parameters) -> PlanResult<Box<dyn Predicate>> + Send + Sync>;

/// Registry of predicate kinds available to plan files.
///
/// [`PredicateFactory::default`] knows every kind in [`crate::kinds`].
/// Applications add their own with [`register`][Self::register]; registering
/// an existing kind name replaces it.
pub struct PredicateFactory {
    kinds: FxHashMap<String, PredicateCtor>,
}

impl Default for PredicateFactory {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl PredicateFactory {
    /// A factory with no kinds at all.
    pub fn empty() -> Self {
        Self { kinds: FxHashMap::default() }
    }

    pub fn with_builtins() -> Self {
        let mut factory = Self::empty();
        factory.register(Constant::KIND, |p| Ok(Box::new(Constant::from_params(p)?)));
        factory.register(PlanElapsed::KIND, |p| Ok(Box::new(PlanElapsed::from_params(p)?)));
        factory.register(FactCompare::KIND, |p| Ok(Box::new(FactCompare::from_params(p)?)));
        factory.register(FactEquals::KIND, |p| Ok(Box::new(FactEquals::from_params(p)?)));
        factory.register(TimeBetween::KIND, |p| Ok(Box::new(TimeBetween::from_params(p)?)));
        factory
    }

    pub fn register<F>(&mut self, kind: impl Into<String>, ctor: F)
    where
        F: Fn(&Parameters) -> PlanResult<Box<dyn Predicate>> + Send + Sync + 'static,
    {
        self.kinds.insert(kind.into(), Box::new(ctor));
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.kinds.contains_key(kind)
    }

    /// Construct a predicate of `kind` from `params`.
    pub fn build(&self, kind: &str, params: &Parameters) -> PlanResult<Box<dyn Predicate>> {
        let ctor = self
            .kinds
            .get(kind)
            .ok_or_else(|| PlanError::UnknownPredicateKind(kind.to_owned()))?;
        ctor(params)
    }
}
