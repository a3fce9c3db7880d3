//! Host observer trait for progress reporting and data collection.

use pl_core::{PlanError, Tick};
use pl_planner::{PlanEvent, Planner};

use crate::{HostMessage, StepReport};

/// Callbacks invoked by [`Host::step`][crate::Host::step] and
/// [`Host::run`][crate::Host::run].
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  Hooks that receive the planner get it
/// read-only, for resolving ids to names or inspecting state.
///
/// # Example: transition printer
///
/// ```rust,ignore
/// struct Printer;
///
/// impl HostObserver for Printer {
///     fn on_event(&mut self, planner: &Planner, event: &PlanEvent) {
///         if event.is_transition() {
///             let name = planner.activity_name(event.activity()).unwrap_or("?");
///             println!("{}: {name} {}", event.at(), event.kind());
///         }
///     }
/// }
/// ```
pub trait HostObserver {
    /// Called at the start of each processed tick, before any delivery.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called for every planner event, in order: acknowledgement results
    /// first, then everything `process_changes` produced.
    fn on_event(&mut self, _planner: &Planner, _event: &PlanEvent) {}

    /// Called when the planner refused a message.  The message is dropped.
    fn on_rejected(&mut self, _tick: Tick, _message: &HostMessage, _error: &PlanError) {}

    /// Called at the end of each processed tick.
    fn on_tick_end(&mut self, _report: &StepReport) {}

    /// Called once after the final tick.
    fn on_run_end(&mut self, _final_tick: Tick, _planner: &Planner) {}
}

/// A [`HostObserver`] that does nothing.
pub struct NoopObserver;

impl HostObserver for NoopObserver {}
