//! `pl-host` — a thin discrete-event host around the planner.
//!
//! # Step
//!
//! ```text
//! step(now):
//!   ① Facts     — deliver every Fact message queued for ticks ≤ now.
//!   ② Acks      — deliver queued acknowledgements; rejected ones are
//!                 reported to the observer and dropped.
//!   ③ Plan      — Planner::process_changes(now).
//!   ④ Observe   — forward every event to the HostObserver.
//!   ⑤ Execute   — hand each started activity to the Executor, which may
//!                 schedule its completion; completions it scheduled for
//!                 preempted activities are cancelled.
//!   ⑥ Advance   — now + 1, or (event-driven) the earlier of the next queued
//!                 message and the planner's wake hint.
//! ```
//!
//! # Quick-start
//!
//! ```rust,ignore
//! let planner = load_plan(path)?.build()?;
//! let mut host = HostBuilder::new(planner)
//!     .config(HostConfig { end_tick: Tick(48), event_driven: true, ..HostConfig::default() })
//!     .executor(FixedDurations::new(Some(3)))
//!     .fact(Tick(5), "rain", 8.0)
//!     .build()?;
//! host.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod executor;
pub mod host;
pub mod message;
pub mod observer;


pub use builder::HostBuilder;
pub use config::HostConfig;
pub use error::{HostError, HostResult};
pub use executor::{Completion, Executor, FixedDurations, NoopExecutor};
pub use host::{Host, StepReport};
pub use message::{HostMessage, MessageQueue, Origin};
pub use observer::{HostObserver, NoopObserver};
