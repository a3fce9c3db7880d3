//! Activity lifecycle states and acknowledgement outcomes.

use std::fmt;
use std::str::FromStr;

use crate::PlanError;

// ── ActivityState ─────────────────────────────────────────────────────────────

/// Lifecycle state of an activity.
///
/// ```text
/// Wait ──start──▶ Started ──ack──▶ Done | Failed
///   ▲                │
///   └───preempted────┘
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ActivityState {
    #[default]
    Wait,
    Started,
    Done,
    Failed,
}

impl ActivityState {
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, ActivityState::Done | ActivityState::Failed)
    }

    /// `true` once the activity has left `Wait` through a start transition.
    #[inline]
    pub fn has_started(self) -> bool {
        !matches!(self, ActivityState::Wait)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActivityState::Wait => "wait",
            ActivityState::Started => "started",
            ActivityState::Done => "done",
            ActivityState::Failed => "failed",
        }
    }
}

impl fmt::Display for ActivityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Outcome ───────────────────────────────────────────────────────────────────

/// The result carried by an external acknowledgement.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Outcome {
    Done,
    #[cfg_attr(feature = "serde", serde(alias = "fail"))]
    Failed,
}

impl Outcome {
    /// The terminal state this outcome moves a started activity into.
    pub fn terminal_state(self) -> ActivityState {
        match self {
            Outcome::Done => ActivityState::Done,
            Outcome::Failed => ActivityState::Failed,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Outcome::Done => "done",
            Outcome::Failed => "fail",
        })
    }
}

impl FromStr for Outcome {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "done" => Ok(Outcome::Done),
            "fail" | "failed" => Ok(Outcome::Failed),
            other => Err(PlanError::InvalidParameter {
                name:   "outcome".to_owned(),
                reason: format!("expected \"done\" or \"fail\", found {other:?}"),
            }),
        }
    }
}
