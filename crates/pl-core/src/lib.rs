//! `pl-core` — foundational types for the `rust_plan` activity planner.
//!
//! This crate is a dependency of every other `pl-*` crate.  It has no `pl-*`
//! dependencies and minimal external ones (only `thiserror`, plus optional
//! `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`ids`]     | `ActivityId`, `RuleId`, `PredicateId`, `PoolId`, `InstanceId` |
//! | [`time`]    | `Tick`, `TimeWindow`                                        |
//! | [`scalar`]  | `Scalar` (`Real` / `Text`), `Parameters`                    |
//! | [`state`]   | `ActivityState`, `Outcome`                                  |
//! | [`config`]  | `PlannerConfig`, `DeadlinePolicy`                           |
//! | [`error`]   | `PlanError`, `PlanResult`                                   |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to value and config types.  |

pub mod config;
pub mod error;
pub mod ids;
pub mod scalar;
pub mod state;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{DeadlinePolicy, PlannerConfig};
pub use error::{PlanError, PlanResult};
pub use ids::{ActivityId, InstanceId, PoolId, PredicateId, RuleId};
pub use scalar::{Parameters, Scalar};
pub use state::{ActivityState, Outcome};
pub use time::{Tick, TimeWindow};
