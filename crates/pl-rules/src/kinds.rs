//! Built-in predicate kinds.
//!
//! Each kind can be constructed directly or from its registered
//! [`Parameters`] via `from_params`, which is what [`PredicateFactory`]
//! calls for plan files.
//!
//! | Kind            | Parameters                                  | Holds when                          |
//! |-----------------|---------------------------------------------|-------------------------------------|
//! | `constant`      | `value` (real ≠ 0 or `"true"`/`"false"`)    | always / never                      |
//! | `plan_elapsed`  | `threshold` (ticks)                         | `now - loaded_at >= threshold`      |
//! | `fact_compare`  | `fact`, `value`, `op` (default `">="`)      | `facts[fact] op value`              |
//! | `fact_equals`   | `fact`, `value` (real or text)              | `facts[fact] == value`              |
//! | `time_between`  | `from`, `until` (ticks, either optional)    | `from <= now <= until`              |
//!
//! [`PredicateFactory`]: crate::PredicateFactory

use std::fmt;
use std::str::FromStr;

use pl_core::{Parameters, PlanError, PlanResult, Scalar, Tick};

use crate::{EvalContext, Predicate};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Read a tick count; fractional values round up so a wait is never cut short.
fn ticks_param(params: &Parameters, name: &str) -> PlanResult<u64> {
    let v = params.real(name)?;
    if !v.is_finite() || v < 0.0 {
        return Err(PlanError::InvalidParameter {
            name:   name.to_owned(),
            reason: format!("expected a non-negative tick count, found {v}"),
        });
    }
    Ok(v.ceil() as u64)
}

fn optional_ticks_param(params: &Parameters, name: &str) -> PlanResult<Option<u64>> {
    if params.contains(name) { ticks_param(params, name).map(Some) } else { Ok(None) }
}

// ── Constant ──────────────────────────────────────────────────────────────────

/// A predicate with a fixed answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Constant(pub bool);

impl Constant {
    pub const KIND: &'static str = "constant";

    pub fn from_params(params: &Parameters) -> PlanResult<Self> {
        match params.get("value") {
            Some(Scalar::Real(v)) => Ok(Constant(*v != 0.0)),
            Some(Scalar::Text(s)) => match s.trim() {
                "true" => Ok(Constant(true)),
                "false" => Ok(Constant(false)),
                other => Err(PlanError::InvalidParameter {
                    name:   "value".to_owned(),
                    reason: format!("expected \"true\" or \"false\", found {other:?}"),
                }),
            },
            None => Err(PlanError::InvalidParameter {
                name:   "value".to_owned(),
                reason: "missing".to_owned(),
            }),
        }
    }
}

impl Predicate for Constant {
    #[inline]
    fn evaluate(&self, _ctx: &EvalContext<'_>) -> bool {
        self.0
    }
}

// ── PlanElapsed ───────────────────────────────────────────────────────────────

/// Holds once at least `threshold` ticks have passed since the plan was
/// loaded.  With `loaded_at = 7` and `threshold = 3` it is false at ticks
/// 7, 8 and 9 and true from tick 10 on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlanElapsed {
    pub threshold: u64,
}

impl PlanElapsed {
    pub const KIND: &'static str = "plan_elapsed";

    pub fn from_params(params: &Parameters) -> PlanResult<Self> {
        Ok(Self { threshold: ticks_param(params, "threshold")? })
    }

    fn opens_at(&self, ctx: &EvalContext<'_>) -> Tick {
        ctx.loaded_at + self.threshold
    }
}

impl Predicate for PlanElapsed {
    fn evaluate(&self, ctx: &EvalContext<'_>) -> bool {
        ctx.now >= self.opens_at(ctx)
    }

    fn next_change(&self, ctx: &EvalContext<'_>) -> Option<Tick> {
        let at = self.opens_at(ctx);
        (at > ctx.now).then_some(at)
    }
}

// ── Comparison ────────────────────────────────────────────────────────────────

/// Numeric comparison operator used by [`FactCompare`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Comparison {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl Comparison {
    #[inline]
    pub fn apply(self, lhs: f64, rhs: f64) -> bool {
        match self {
            Comparison::Lt => lhs < rhs,
            Comparison::Le => lhs <= rhs,
            Comparison::Gt => lhs > rhs,
            Comparison::Ge => lhs >= rhs,
            Comparison::Eq => lhs == rhs,
            Comparison::Ne => lhs != rhs,
        }
    }
}

impl FromStr for Comparison {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "<" => Ok(Comparison::Lt),
            "<=" => Ok(Comparison::Le),
            ">" => Ok(Comparison::Gt),
            ">=" => Ok(Comparison::Ge),
            "==" | "=" => Ok(Comparison::Eq),
            "!=" => Ok(Comparison::Ne),
            other => Err(PlanError::InvalidParameter {
                name:   "op".to_owned(),
                reason: format!("unknown comparison {other:?}"),
            }),
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Comparison::Lt => "<",
            Comparison::Le => "<=",
            Comparison::Gt => ">",
            Comparison::Ge => ">=",
            Comparison::Eq => "==",
            Comparison::Ne => "!=",
        })
    }
}

// ── FactCompare ───────────────────────────────────────────────────────────────

/// Compares a real-valued fact with a constant.  False while the fact is
/// unknown or not a real.
#[derive(Clone, Debug, PartialEq)]
pub struct FactCompare {
    pub fact:  String,
    pub op:    Comparison,
    pub value: f64,
}

impl FactCompare {
    pub const KIND: &'static str = "fact_compare";

    pub fn from_params(params: &Parameters) -> PlanResult<Self> {
        let op = if params.contains("op") {
            params.text("op")?.parse()?
        } else {
            Comparison::Ge
        };
        Ok(Self {
            fact:  params.text("fact")?.to_owned(),
            op,
            value: params.real("value")?,
        })
    }
}

impl Predicate for FactCompare {
    fn evaluate(&self, ctx: &EvalContext<'_>) -> bool {
        ctx.facts
            .real(&self.fact)
            .is_some_and(|v| self.op.apply(v, self.value))
    }
}

// ── FactEquals ────────────────────────────────────────────────────────────────

/// Holds while a fact equals a constant of either kind.
#[derive(Clone, Debug, PartialEq)]
pub struct FactEquals {
    pub fact:  String,
    pub value: Scalar,
}

impl FactEquals {
    pub const KIND: &'static str = "fact_equals";

    pub fn from_params(params: &Parameters) -> PlanResult<Self> {
        let value = params.get("value").cloned().ok_or_else(|| PlanError::InvalidParameter {
            name:   "value".to_owned(),
            reason: "missing".to_owned(),
        })?;
        Ok(Self { fact: params.text("fact")?.to_owned(), value })
    }
}

impl Predicate for FactEquals {
    fn evaluate(&self, ctx: &EvalContext<'_>) -> bool {
        ctx.facts.get(&self.fact) == Some(&self.value)
    }
}

// ── TimeBetween ───────────────────────────────────────────────────────────────

/// Holds while `now` lies in `[from, until]`; either bound may be absent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeBetween {
    pub from:  Option<Tick>,
    pub until: Option<Tick>,
}

impl TimeBetween {
    pub const KIND: &'static str = "time_between";

    pub fn from_params(params: &Parameters) -> PlanResult<Self> {
        let from = optional_ticks_param(params, "from")?.map(Tick);
        let until = optional_ticks_param(params, "until")?.map(Tick);
        if let (Some(f), Some(u)) = (from, until) {
            if f > u {
                return Err(PlanError::InvalidParameter {
                    name:   "from".to_owned(),
                    reason: format!("from {f} is after until {u}"),
                });
            }
        }
        Ok(Self { from, until })
    }
}

impl Predicate for TimeBetween {
    fn evaluate(&self, ctx: &EvalContext<'_>) -> bool {
        self.from.is_none_or(|f| ctx.now >= f) && self.until.is_none_or(|u| ctx.now <= u)
    }

    fn next_change(&self, ctx: &EvalContext<'_>) -> Option<Tick> {
        match (self.from, self.until) {
            (Some(f), _) if ctx.now < f => Some(f),
            (_, Some(u)) if ctx.now <= u && u < Tick::MAX => Some(u + 1),
            _ => None,
        }
    }
}
