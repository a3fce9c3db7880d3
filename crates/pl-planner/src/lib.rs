//! `pl-planner` — decides, once per decision tick, which waiting activities
//! start.
//!
//! # Decision tick
//!
//! ```text
//! process_changes(now):
//!   ① Deadlines  — under DeadlinePolicy::Fail, Wait activities whose start
//!                  window has closed move to Failed.
//!   ② Passes     — scan Wait activities by (priority desc, registration);
//!                  for each, check in order:
//!                    start window → precedence → rules → resources
//!                  and start it if every gate passes.  Resources go last
//!                  because acquiring them is the only gate with side
//!                  effects (binding, preemption).
//!                  Repeat until a pass changes nothing or
//!                  PlannerConfig::max_passes is reached.
//!   ③ Wake hint  — earliest future tick at which some Wait activity could
//!                  become eligible through time alone.
//! ```
//!
//! Completion is never inferred: `Started` activities leave that state only
//! through [`Planner::acknowledge`] or by being preempted.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use pl_planner::{ActivityDef, PlannerBuilder};
//!
//! let mut planner = PlannerBuilder::new(PlannerConfig::default())
//!     .pool("Farmer", ["Bob"])
//!     .activity(ActivityDef::new("A").resource("Farmer"))
//!     .activity(ActivityDef::new("B").resource("Farmer"))
//!     .build()?;
//! let outcome = planner.process_changes(Tick(1))?;
//! ```

pub mod builder;
pub mod event;
pub mod planner;


pub use builder::{ActivityDef, PlannerBuilder, PrecedenceDef};
pub use event::{PlanEvent, TickOutcome};
pub use planner::{Assignment, Planner};
