//! Strongly typed, zero-cost identifier wrappers.
//!
//! Every catalog hands out dense ids in registration order, so an id doubles
//! as a `Vec` index and as the registration rank used for tie-breaking.
//! The inner integer is `pub`, but callers should prefer `.index()`.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of an activity in the `ActivityTable`.
    pub struct ActivityId(u32);
}

typed_id! {
    /// Index of a rule in the `RuleCatalog`.
    pub struct RuleId(u32);
}

typed_id! {
    /// Index of a predicate in the `PredicateCatalog`.
    pub struct PredicateId(u32);
}

typed_id! {
    /// Index of a named resource pool.
    pub struct PoolId(u32);
}

typed_id! {
    /// Index of a resource instance within its pool.
    pub struct InstanceId(u32);
}
