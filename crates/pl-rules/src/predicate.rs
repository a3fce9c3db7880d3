//! The `Predicate` trait: the main extension point for plan authors.

use pl_core::{ActivityId, Parameters, RuleId, Tick};

use crate::FactBase;

/// Everything about the candidate activity that does not depend on which
/// predicate is being evaluated.  Built once per activity per pass.
#[derive(Clone, Copy)]
pub struct Scope<'a> {
    /// Current simulation tick.
    pub now: Tick,
    /// Tick at which the plan was loaded into the planner.
    pub loaded_at: Tick,
    pub activity: ActivityId,
    pub activity_name: &'a str,
    pub facts: &'a FactBase,
}

/// Read-only input handed to [`Predicate::evaluate`].
pub struct EvalContext<'a> {
    pub now: Tick,
    pub loaded_at: Tick,
    /// The activity whose eligibility is being decided.
    pub activity: ActivityId,
    pub activity_name: &'a str,
    /// The rule that referenced this predicate.
    pub rule: RuleId,
    pub facts: &'a FactBase,
    /// The parameters registered with this predicate.
    pub params: &'a Parameters,
}

impl<'a> EvalContext<'a> {
    #[inline]
    pub fn new(scope: &Scope<'a>, rule: RuleId, params: &'a Parameters) -> Self {
        Self {
            now: scope.now,
            loaded_at: scope.loaded_at,
            activity: scope.activity,
            activity_name: scope.activity_name,
            rule,
            facts: scope.facts,
            params,
        }
    }

    /// Ticks since the plan was loaded, or `None` before the load time.
    #[inline]
    pub fn elapsed_since_load(&self) -> Option<u64> {
        self.now.since(self.loaded_at)
    }
}

/// A named boolean test over facts, time and static parameters.
///
/// # Contract
///
/// - Must be a pure function of the [`EvalContext`]: the planner evaluates
///   the same predicate several times per tick and relies on getting the same
///   answer while nothing changes.
/// - Must not block or perform I/O.
///
/// # Example
///
/// ```rust,ignore
/// struct RainBelow(f64);
///
/// impl Predicate for RainBelow {
///     fn evaluate(&self, ctx: &EvalContext<'_>) -> bool {
///         ctx.facts.real("rain").is_some_and(|mm| mm < self.0)
///     }
/// }
/// ```
pub trait Predicate: Send + Sync + 'static {
    fn evaluate(&self, ctx: &EvalContext<'_>) -> bool;

    /// The earliest tick after `ctx.now` at which `evaluate` may return a
    /// different answer through the passage of time alone.
    ///
    /// Default: `None` (the answer only changes when facts change).
    fn next_change(&self, _ctx: &EvalContext<'_>) -> Option<Tick> {
        None
    }
}

/// Adapter turning a closure into a [`Predicate`].  Build with [`from_fn`].
pub struct FnPredicate<F>(F);

impl<F> Predicate for FnPredicate<F>
where
    F: Fn(&EvalContext<'_>) -> bool + Send + Sync + 'static,
{
    #[inline]
    fn evaluate(&self, ctx: &EvalContext<'_>) -> bool {
        (self.0)(ctx)
    }
}

/// Wrap `f` as a [`Predicate`] with no time hint.
pub fn from_fn<F>(f: F) -> FnPredicate<F>
where
    F: Fn(&EvalContext<'_>) -> bool + Send + Sync + 'static,
{
    FnPredicate(f)
}
