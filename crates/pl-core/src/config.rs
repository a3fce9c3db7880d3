//! Planner configuration.
//!
//! Typically loaded from a TOML file by `pl-plan` and handed to
//! `PlannerBuilder::new`.  Every field has a default, so an empty file is a
//! valid configuration.

/// What happens to a `Wait` activity whose `maxstart` has passed.
///
/// The planner does not pick a policy on its own; the default keeps the
/// activity pending, which matches a plan with no deadline semantics.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DeadlinePolicy {
    /// Leave the activity in `Wait` indefinitely.  It can never start again
    /// because its start window is closed, but it is not failed either.
    #[default]
    KeepWaiting,
    /// Move the activity straight to `Failed` on the first tick after
    /// `maxstart`.
    Fail,
}

/// Tunables for `Planner::process_changes`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlannerConfig {
    /// Upper bound on fixpoint passes per tick.  A pass that changes nothing
    /// ends the tick earlier.
    pub max_passes: u32,

    /// Release held resources when an activity reaches `Done` / `Failed`.
    /// When `false` the resources stay bound until the holder is preempted.
    pub release_on_terminal: bool,

    /// Allow a higher-priority request to revoke a lower-priority holder.
    pub preemption: bool,

    /// Behaviour for `Wait` activities past their `maxstart`.
    pub deadline_policy: DeadlinePolicy,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_passes:          64,
            release_on_terminal: true,
            preemption:          true,
            deadline_policy:     DeadlinePolicy::KeepWaiting,
        }
    }
}

impl PlannerConfig {
    /// Reject settings the planner cannot run with.
    pub fn validate(&self) -> crate::PlanResult<()> {
        if self.max_passes == 0 {
            return Err(crate::PlanError::Config("max_passes must be > 0".to_owned()));
        }
        Ok(())
    }
}
