//! Simulation time model.
//!
//! # Design
//!
//! Time is a monotonically increasing `Tick` counter owned by the host.  The
//! planner never advances time itself; it is told `now` on every call.
//!
//! Using an integer tick as the canonical time unit means all window and lag
//! arithmetic is exact (no floating-point drift) and comparisons are O(1).

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);
    pub const MAX: Tick = Tick(u64::MAX);

    /// Return the tick `n` steps after `self`, saturating at `Tick::MAX`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0.saturating_add(n))
    }

    /// Ticks elapsed from `earlier` to `self`, or `None` if `earlier` is later.
    #[inline]
    pub fn since(self, earlier: Tick) -> Option<u64> {
        self.0.checked_sub(earlier.0)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        self.offset(rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── TimeWindow ────────────────────────────────────────────────────────────────

/// A closed interval `[lo, hi]` of ticks; either bound may be open-ended.
///
/// Used for both the start window (`minstart`/`maxstart`) and the finish
/// window (`minfinish`/`maxfinish`) of an activity.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeWindow {
    pub lo: Option<Tick>,
    pub hi: Option<Tick>,
}

impl TimeWindow {
    /// A window with no bounds: every tick is inside.
    pub const UNBOUNDED: TimeWindow = TimeWindow { lo: None, hi: None };

    pub fn new(lo: Option<Tick>, hi: Option<Tick>) -> Self {
        Self { lo, hi }
    }

    pub fn between(lo: Tick, hi: Tick) -> Self {
        Self { lo: Some(lo), hi: Some(hi) }
    }

    /// The degenerate window `[t, t]` (a fixed `start` / `finish`).
    pub fn at(t: Tick) -> Self {
        Self::between(t, t)
    }

    pub fn is_unbounded(&self) -> bool {
        self.lo.is_none() && self.hi.is_none()
    }

    /// `false` when both bounds are set and `lo > hi`.
    pub fn is_well_formed(&self) -> bool {
        match (self.lo, self.hi) {
            (Some(lo), Some(hi)) => lo <= hi,
            _ => true,
        }
    }

    #[inline]
    pub fn contains(&self, t: Tick) -> bool {
        self.lo.is_none_or(|lo| t >= lo) && self.hi.is_none_or(|hi| t <= hi)
    }

    /// The lower bound if it still lies in the future of `now`.
    #[inline]
    pub fn opens_after(&self, now: Tick) -> Option<Tick> {
        self.lo.filter(|&lo| lo > now)
    }

    /// `true` once `now` has moved past the upper bound.
    #[inline]
    pub fn has_closed(&self, now: Tick) -> bool {
        self.hi.is_some_and(|hi| now > hi)
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.lo, self.hi) {
            (Some(lo), Some(hi)) => write!(f, "[{lo}, {hi}]"),
            (Some(lo), None) => write!(f, "[{lo}, ∞)"),
            (None, Some(hi)) => write!(f, "(-∞, {hi}]"),
            (None, None) => f.write_str("(-∞, ∞)"),
        }
    }
}
