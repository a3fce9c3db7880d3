//! The unique token for a resource instance, and the plain record of who
//! holds it.

use std::fmt;

use pl_core::{ActivityId, InstanceId, PoolId};

/// Ownership of one resource instance.
///
/// Minted once per instance by `ResourcePool::add_instance` and never
/// cloned.  Whoever owns the `Lease` value owns the instance.
#[derive(Debug, PartialEq, Eq)]
pub struct Lease {
    pool:     PoolId,
    instance: InstanceId,
}

impl Lease {
    pub(crate) fn mint(pool: PoolId, instance: InstanceId) -> Self {
        Self { pool, instance }
    }

    #[inline]
    pub fn pool(&self) -> PoolId {
        self.pool
    }

    #[inline]
    pub fn instance(&self) -> InstanceId {
        self.instance
    }
}

/// A copyable description of "activity holds instance of pool", used for
/// events and introspection.  Holding a `Claim` grants nothing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Claim {
    pub pool:     PoolId,
    pub instance: InstanceId,
    pub activity: ActivityId,
}

impl fmt::Display for Claim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} holds {} of {}", self.activity, self.instance, self.pool)
    }
}
