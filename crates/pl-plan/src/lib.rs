//! `pl-plan` — turns a TOML plan file into a [`PlannerBuilder`].
//!
//! # Crate layout
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`document`] | Serde model of the plan file                              |
//! | [`loader`]   | `load_plan`, `load_plan_str`, `load_plan_str_with`        |
//! | [`config`]   | `load_config`, `load_config_str`                          |
//! | [`error`]    | `LoadError`, `LoadResult<T>`                              |
//!
//! The loader only parses and translates.  Every cross-reference (rule →
//! predicate, activity → rule / pool, precedence → activity) is checked by
//! [`PlannerBuilder::build`], so a plan that loads but references an unknown
//! name fails there, before simulation starts.
//!
//! [`PlannerBuilder`]: pl_planner::PlannerBuilder
//! [`PlannerBuilder::build`]: pl_planner::PlannerBuilder::build

pub mod config;
pub mod document;
pub mod error;
pub mod loader;

#[cfg(test)]
mod tests;

pub use config::{load_config, load_config_str};
pub use document::PlanDocument;
pub use error::{LoadError, LoadResult};
pub use loader::{builder_from_document, load_plan, load_plan_str, load_plan_str_with};
