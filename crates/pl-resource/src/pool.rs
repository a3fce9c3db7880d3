//! `ResourcePool`: pools, instances, holdings and the contention policy.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use pl_core::{ActivityId, InstanceId, PlanError, PlanResult, PoolId};

use crate::{Claim, Lease};

// ── Internal storage ──────────────────────────────────────────────────────────

struct Holding {
    activity: ActivityId,
    priority: i32,
    lease:    Lease,
}

struct Pool {
    name:      String,
    /// Instance names indexed by `InstanceId`.
    instances: Vec<String>,
    index:     FxHashMap<String, InstanceId>,
    /// Unbound leases keyed by instance, so the lowest id is handed out first.
    free:      BTreeMap<InstanceId, Lease>,
    /// Bound leases in acquisition order.
    held:      Vec<Holding>,
}

impl Pool {
    fn held_count(&self, activity: ActivityId) -> usize {
        self.held.iter().filter(|h| h.activity == activity).count()
    }
}

// ── Results ───────────────────────────────────────────────────────────────────

/// An activity that lost its resources to a higher-priority request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Preemption {
    pub victim:  ActivityId,
    /// Every lease the victim held, in every pool.
    pub revoked: Vec<Claim>,
}

/// A successful acquisition.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Grant {
    /// One claim per requested pool entry.
    pub bound:     Vec<Claim>,
    /// Holders revoked to make room, in revocation order.
    pub preempted: Vec<Preemption>,
}

/// Result of [`ResourcePool::try_acquire`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Acquisition {
    Granted(Grant),
    /// Nothing was bound or revoked; `pool` is the first pool that could not
    /// be satisfied.
    Blocked { pool: PoolId },
}

impl Acquisition {
    pub fn is_granted(&self) -> bool {
        matches!(self, Acquisition::Granted(_))
    }
}

// ── ResourcePool ──────────────────────────────────────────────────────────────

/// All resource pools of a plan.
///
/// See the [crate docs](crate) for the contention policy.
#[derive(Default)]
pub struct ResourcePool {
    pools: Vec<Pool>,
    index: FxHashMap<String, PoolId>,
}

impl ResourcePool {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Registration ──────────────────────────────────────────────────────

    pub fn add_pool(&mut self, name: impl Into<String>) -> PlanResult<PoolId> {
        let name = name.into();
        if self.index.contains_key(&name) {
            return Err(PlanError::DuplicateId { kind: "pool", id: name });
        }
        let id = PoolId::try_from(self.pools.len())
            .map_err(|_| PlanError::Config("too many pools".to_owned()))?;
        self.index.insert(name.clone(), id);
        self.pools.push(Pool {
            name,
            instances: Vec::new(),
            index:     FxHashMap::default(),
            free:      BTreeMap::new(),
            held:      Vec::new(),
        });
        Ok(id)
    }

    /// Add instance `instance` to pool `pool`, minting its lease.
    ///
    /// Fails with [`PlanError::UnknownPool`] if the pool is missing and with
    /// [`PlanError::DuplicateId`] if the pool already has that instance.
    pub fn add_instance(&mut self, pool: &str, instance: impl Into<String>) -> PlanResult<InstanceId> {
        let pid = self.pool_id(pool)?;
        let p = &mut self.pools[pid.index()];
        let instance = instance.into();
        if p.index.contains_key(&instance) {
            return Err(PlanError::DuplicateId {
                kind: "instance",
                id:   format!("{pool}/{instance}"),
            });
        }
        let iid = InstanceId::try_from(p.instances.len())
            .map_err(|_| PlanError::Config(format!("too many instances in pool {pool:?}")))?;
        p.index.insert(instance.clone(), iid);
        p.instances.push(instance);
        p.free.insert(iid, Lease::mint(pid, iid));
        Ok(iid)
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    pub fn pool_id(&self, name: &str) -> PlanResult<PoolId> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| PlanError::UnknownPool(name.to_owned()))
    }

    pub fn instance_id(&self, pool: &str, instance: &str) -> PlanResult<InstanceId> {
        let pid = self.pool_id(pool)?;
        self.pools[pid.index()]
            .index
            .get(instance)
            .copied()
            .ok_or_else(|| PlanError::UnknownResourceInstance {
                pool:     pool.to_owned(),
                instance: instance.to_owned(),
            })
    }

    pub fn pool_name(&self, pool: PoolId) -> Option<&str> {
        self.pools.get(pool.index()).map(|p| p.name.as_str())
    }

    pub fn instance_name(&self, pool: PoolId, instance: InstanceId) -> Option<&str> {
        self.pools
            .get(pool.index())
            .and_then(|p| p.instances.get(instance.index()))
            .map(String::as_str)
    }

    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }

    pub fn instance_count(&self, pool: PoolId) -> usize {
        self.pools.get(pool.index()).map_or(0, |p| p.instances.len())
    }

    pub fn free_count(&self, pool: PoolId) -> usize {
        self.pools.get(pool.index()).map_or(0, |p| p.free.len())
    }

    /// The activity currently holding `instance` of `pool`, if any.
    pub fn holder(&self, pool: PoolId, instance: InstanceId) -> Option<ActivityId> {
        self.pools
            .get(pool.index())?
            .held
            .iter()
            .find(|h| h.lease.instance() == instance)
            .map(|h| h.activity)
    }

    /// Everything `activity` holds, ordered by pool then instance.
    pub fn held_by(&self, activity: ActivityId) -> Vec<Claim> {
        let mut claims: Vec<Claim> = self
            .pools
            .iter()
            .flat_map(|p| p.held.iter())
            .filter(|h| h.activity == activity)
            .map(claim_of)
            .collect();
        claims.sort_unstable();
        claims
    }

    /// Every current (instance, holder) pair, ordered by pool then instance.
    pub fn assignments(&self) -> Vec<Claim> {
        let mut claims: Vec<Claim> = self
            .pools
            .iter()
            .flat_map(|p| p.held.iter())
            .map(claim_of)
            .collect();
        claims.sort_unstable();
        claims
    }

    // ── Acquisition ───────────────────────────────────────────────────────

    /// Request one instance of `pool` for `activity`.
    pub fn request(
        &mut self,
        activity: ActivityId,
        pool:     PoolId,
        priority: i32,
    ) -> PlanResult<Acquisition> {
        self.try_acquire(activity, &[pool], priority, true)
    }

    /// Acquire one instance per entry of `pools` (a pool listed twice needs
    /// two instances), all or nothing.
    ///
    /// With `allow_preemption`, strictly lower-priority holders may be
    /// revoked as described in the [crate docs](crate).  Victims are only
    /// revoked once the whole request is known to succeed.
    pub fn try_acquire(
        &mut self,
        activity:         ActivityId,
        pools:            &[PoolId],
        priority:         i32,
        allow_preemption: bool,
    ) -> PlanResult<Acquisition> {
        let mut demand: BTreeMap<PoolId, usize> = BTreeMap::new();
        for &pid in pools {
            if pid.index() >= self.pools.len() {
                return Err(PlanError::UnknownPool(pid.to_string()));
            }
            *demand.entry(pid).or_default() += 1;
        }

        // ── Plan: decide victims without touching any lease ───────────────
        let mut victims: Vec<ActivityId> = Vec::new();
        for (&pid, &need) in &demand {
            let pool = &self.pools[pid.index()];
            let freed: usize = victims.iter().map(|&v| pool.held_count(v)).sum();
            let available = pool.free.len() + freed;
            if available >= need {
                continue;
            }
            if !allow_preemption {
                return Ok(Acquisition::Blocked { pool: pid });
            }

            let contenders: Vec<&Holding> = pool
                .held
                .iter()
                .filter(|h| h.activity != activity && !victims.contains(&h.activity))
                .collect();
            if contenders.iter().any(|h| h.priority > priority) {
                return Ok(Acquisition::Blocked { pool: pid });
            }

            // Lowest priority first; on ties the latest-registered goes first.
            let mut candidates: Vec<(i32, ActivityId)> = contenders
                .iter()
                .filter(|h| h.priority < priority)
                .map(|h| (h.priority, h.activity))
                .collect();
            candidates.sort_unstable_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));
            candidates.dedup_by_key(|c| c.1);

            let mut shortfall = need - available;
            for (_, victim) in candidates {
                if shortfall == 0 {
                    break;
                }
                shortfall = shortfall.saturating_sub(pool.held_count(victim));
                victims.push(victim);
            }
            if shortfall > 0 {
                return Ok(Acquisition::Blocked { pool: pid });
            }
        }

        // ── Commit ────────────────────────────────────────────────────────
        let mut grant = Grant::default();
        for victim in victims {
            let revoked = self.take_all(victim);
            for c in &revoked {
                tracing::debug!(
                    pool = self.pool_name(c.pool).unwrap_or("?"),
                    instance = self.instance_name(c.pool, c.instance).unwrap_or("?"),
                    victim = %victim,
                    by = %activity,
                    "resource revoked"
                );
            }
            grant.preempted.push(Preemption { victim, revoked });
        }

        for (pid, need) in demand {
            let pool = &mut self.pools[pid.index()];
            for _ in 0..need {
                let Some((instance, lease)) = pool.free.pop_first() else {
                    debug_assert!(false, "planned acquisition found pool {} exhausted", pool.name);
                    break;
                };
                tracing::debug!(
                    pool = %pool.name,
                    instance = %pool.instances[instance.index()],
                    activity = %activity,
                    "resource bound"
                );
                pool.held.push(Holding { activity, priority, lease });
                grant.bound.push(Claim { pool: pid, instance, activity });
            }
        }

        Ok(Acquisition::Granted(grant))
    }

    /// Free every instance held by `activity`.  Returns what was released.
    pub fn release(&mut self, activity: ActivityId) -> Vec<Claim> {
        let released = self.take_all(activity);
        for c in &released {
            tracing::debug!(
                pool = self.pool_name(c.pool).unwrap_or("?"),
                instance = self.instance_name(c.pool, c.instance).unwrap_or("?"),
                activity = %activity,
                "resource released"
            );
        }
        released
    }

    /// Move every lease held by `activity` back to its pool's free list.
    fn take_all(&mut self, activity: ActivityId) -> Vec<Claim> {
        let mut claims = Vec::new();
        for pool in &mut self.pools {
            if pool.held_count(activity) == 0 {
                continue;
            }
            let (gone, kept): (Vec<Holding>, Vec<Holding>) = std::mem::take(&mut pool.held)
                .into_iter()
                .partition(|h| h.activity == activity);
            pool.held = kept;
            for h in gone {
                claims.push(claim_of(&h));
                pool.free.insert(h.lease.instance(), h.lease);
            }
        }
        claims
    }
}

fn claim_of(h: &Holding) -> Claim {
    Claim {
        pool:     h.lease.pool(),
        instance: h.lease.instance(),
        activity: h.activity,
    }
}
