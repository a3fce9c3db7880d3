//! `pl-activity` — activities, their lifecycle and the temporal relations
//! between them.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                   |
//! |----------------|------------------------------------------------------------|
//! | [`activity`]   | `Activity`: definition plus runtime lifecycle record       |
//! | [`table`]      | `ActivityTable`: registration, lookup, scan order, transitions |
//! | [`precedence`] | `Relation`, `PrecedenceConstraint`, `PrecedenceConstraintSet` |
//!
//! # State machine
//!
//! ```text
//! Wait ──start──▶ Started ──finish(ack)──▶ Done | Failed
//!   │  ▲             │
//!   │  └──preempt────┘
//!   └──expire (DeadlinePolicy::Fail)──▶ Failed
//! ```
//!
//! The table enforces these edges; any other transition request is refused.
//! Deciding *when* to start, preempt or expire is the planner's job.

pub mod activity;
pub mod precedence;
pub mod table;

#[cfg(test)]
mod tests;

pub use activity::Activity;
pub use precedence::{PrecedenceConstraint, PrecedenceConstraintSet, Relation, UNBOUNDED_LAG};
pub use table::ActivityTable;

pub use pl_core::{ActivityState, Outcome};
