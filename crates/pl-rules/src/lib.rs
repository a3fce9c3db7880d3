//! `pl-rules` — predicates over external facts and the rules built from them.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                     |
//! |---------------|--------------------------------------------------------------|
//! | [`facts`]     | `FactBase`: latest value of every fact pushed by the host    |
//! | [`predicate`] | `Predicate` trait, `EvalContext`, `Scope`, `FnPredicate`      |
//! | [`kinds`]     | Built-in predicate kinds (`Constant`, `PlanElapsed`, …)      |
//! | [`factory`]   | `PredicateFactory`: kind name → constructor                  |
//! | [`catalog`]   | `PredicateCatalog`                                           |
//! | [`rule`]      | `RuleCatalog`                                                |
//!
//! # Evaluation model
//!
//! A rule is a conjunction of predicate ids.  The planner builds one
//! [`Scope`] per candidate activity and asks the [`RuleCatalog`] whether each
//! of the activity's rules holds; the rule catalog in turn asks the
//! [`PredicateCatalog`], which hands every predicate an [`EvalContext`]
//! carrying its own registered parameters.
//!
//! Predicates may also announce the next tick at which their answer can flip
//! ([`Predicate::next_change`]).  The planner folds those hints into the
//! wake-up time it reports to the host.

pub mod catalog;
pub mod facts;
pub mod factory;
pub mod kinds;
pub mod predicate;
pub mod rule;


pub use catalog::PredicateCatalog;
pub use facts::FactBase;
pub use factory::{PredicateCtor, PredicateFactory};
pub use kinds::{Comparison, Constant, FactCompare, FactEquals, PlanElapsed, TimeBetween};
pub use predicate::{EvalContext, FnPredicate, Predicate, Scope, from_fn};
pub use rule::RuleCatalog;
