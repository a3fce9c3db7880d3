//! `pl-resource` — named pools of interchangeable, exclusively held resources.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                  |
//! |------------|-----------------------------------------------------------|
//! | [`lease`]  | `Lease` (the unique token for one instance), `Claim`      |
//! | [`pool`]   | `ResourcePool`, `Acquisition`, `Grant`, `Preemption`      |
//!
//! # Mutual exclusion
//!
//! `add_instance` mints exactly one [`Lease`] per instance.  `Lease` is not
//! `Clone`; it sits either in its pool's free list or inside the single
//! holding that owns it, and binding or releasing moves it between the two.
//! Two activities holding the same instance is therefore unrepresentable.
//!
//! # Contention policy
//!
//! 1. Free instances are handed out lowest `InstanceId` first.
//! 2. When a pool has no free instance, and every holder's priority is at
//!    most the requester's, holders with *strictly lower* priority may be
//!    preempted, lowest priority first.
//! 3. Among equally low holders, the latest-registered activity (largest
//!    `ActivityId`) is preempted first; the earliest-registered keeps its
//!    resource.  A holder with the requester's own priority is never
//!    preempted.
//! 4. A preempted activity loses every lease it holds, in every pool.
//! 5. Multi-pool requests are all-or-nothing: the whole acquisition is planned
//!    before anything is bound or revoked.

pub mod lease;
pub mod pool;


pub use lease::{Claim, Lease};
pub use pool::{Acquisition, Grant, Preemption, ResourcePool};
