//! Host run configuration.

use pl_core::Tick;

use crate::{HostError, HostResult};

/// When the host runs and how it advances time.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HostConfig {
    /// First tick processed.
    pub start_tick: Tick,

    /// The run stops before processing this tick (exclusive upper bound).
    pub end_tick: Tick,

    /// Jump straight to the next tick at which something can happen (a
    /// queued message or the planner's wake hint) instead of stepping one
    /// tick at a time.  The run ends early once nothing is scheduled.
    pub event_driven: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            start_tick:   Tick::ZERO,
            end_tick:     Tick(100),
            event_driven: false,
        }
    }
}

impl HostConfig {
    pub fn validate(&self) -> HostResult<()> {
        if self.end_tick < self.start_tick {
            return Err(HostError::Config(format!(
                "end_tick {} is before start_tick {}",
                self.end_tick, self.start_tick
            )));
        }
        Ok(())
    }
}
