//! Planner error type.
//!
//! Load-time variants (`Unknown*`, `DuplicateId`, `InvalidParameter`,
//! `InvalidConstraint`, `UnknownPredicateKind`, `Config`) mean the plan is
//! malformed and construction must stop.  `InvalidAcknowledgement` is the one
//! runtime variant: the caller reports it and drops the event.
//!
//! Sub-crates that add I/O concerns wrap `PlanError` in their own enum via a
//! `#[from]` variant.

use thiserror::Error;

use crate::{ActivityState, Tick};

/// The error type shared by all `pl-*` crates.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    #[error("unknown predicate {0:?}")]
    UnknownPredicate(String),

    #[error("unknown predicate kind {0:?}")]
    UnknownPredicateKind(String),

    #[error("unknown rule {0:?}")]
    UnknownRule(String),

    #[error("unknown activity {0:?}")]
    UnknownActivity(String),

    #[error("unknown resource pool {0:?}")]
    UnknownPool(String),

    #[error("unknown instance {instance:?} in pool {pool:?}")]
    UnknownResourceInstance { pool: String, instance: String },

    #[error("duplicate {kind} id {id:?}")]
    DuplicateId { kind: &'static str, id: String },

    #[error("invalid parameter {name:?}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("invalid precedence constraint {source_activity:?} -> {dest:?}: {reason}")]
    InvalidConstraint {
        source_activity: String,
        dest:            String,
        reason:          String,
    },

    #[error("acknowledgement for {activity:?} at {at} rejected: activity is {state}")]
    InvalidAcknowledgement {
        activity: String,
        state:    ActivityState,
        at:       Tick,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for all `pl-*` crates.
pub type PlanResult<T> = Result<T, PlanError>;
