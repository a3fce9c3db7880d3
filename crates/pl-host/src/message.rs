//! Messages from the outside world and the per-tick queue holding them.

use std::collections::BTreeMap;
use std::fmt;

use pl_core::{Outcome, Scalar, Tick};

/// Input delivered to the planner by the host.
#[derive(Clone, Debug, PartialEq)]
pub enum HostMessage {
    /// An activity finished in the outside world.
    Ack { activity: String, outcome: Outcome },
    /// A fact changed value.
    Fact { name: String, value: Scalar },
}

impl HostMessage {
    pub fn ack(activity: impl Into<String>, outcome: Outcome) -> Self {
        HostMessage::Ack { activity: activity.into(), outcome }
    }

    pub fn fact(name: impl Into<String>, value: impl Into<Scalar>) -> Self {
        HostMessage::Fact { name: name.into(), value: value.into() }
    }
}

impl fmt::Display for HostMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostMessage::Ack { activity, outcome } => write!(f, "ack {activity} {outcome}"),
            HostMessage::Fact { name, value } => write!(f, "fact {name} = {value}"),
        }
    }
}

/// Who put a message in the queue.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Origin {
    /// Scripted up front or pushed by the caller.
    External,
    /// A completion the [`Executor`](crate::Executor) scheduled.
    Executor,
}

struct Queued {
    message: HostMessage,
    origin:  Origin,
}

/// Messages keyed by the tick at which they are delivered.
///
/// Messages for the same tick keep their insertion order.
#[derive(Default)]
pub struct MessageQueue {
    inner: BTreeMap<Tick, Vec<Queued>>,
    total: usize,
}

impl MessageQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an external message.
    pub fn push(&mut self, at: Tick, message: HostMessage) {
        self.push_from(at, message, Origin::External);
    }

    pub fn push_from(&mut self, at: Tick, message: HostMessage, origin: Origin) {
        self.inner.entry(at).or_default().push(Queued { message, origin });
        self.total += 1;
    }

    /// Remove and return every message due at or before `now`, oldest tick
    /// first.
    pub fn drain_through(&mut self, now: Tick) -> Vec<HostMessage> {
        let later = match now.0.checked_add(1) {
            Some(next) => self.inner.split_off(&Tick(next)),
            None => BTreeMap::new(),
        };
        let due = std::mem::replace(&mut self.inner, later);
        let messages: Vec<HostMessage> = due.into_values().flatten().map(|q| q.message).collect();
        self.total -= messages.len();
        messages
    }

    /// Tick of the earliest queued message.
    pub fn next_tick(&self) -> Option<Tick> {
        self.inner.keys().next().copied()
    }

    /// Drop the executor-scheduled acknowledgements for `activity`.
    /// External acknowledgements stay queued.  Returns how many were dropped.
    pub fn cancel_scheduled_acks(&mut self, activity: &str) -> usize {
        let mut dropped = 0;
        for messages in self.inner.values_mut() {
            let before = messages.len();
            messages.retain(|q| {
                q.origin != Origin::Executor
                    || !matches!(&q.message, HostMessage::Ack { activity: a, .. } if a == activity)
            });
            dropped += before - messages.len();
        }
        self.inner.retain(|_, v| !v.is_empty());
        self.total -= dropped;
        dropped
    }

    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
