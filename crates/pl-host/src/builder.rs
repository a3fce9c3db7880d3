//! Fluent builder for constructing a [`Host`].

use pl_core::{Outcome, Scalar, Tick};
use pl_planner::Planner;

use crate::{Executor, Host, HostConfig, HostMessage, HostResult, MessageQueue, NoopExecutor};

/// Fluent builder for [`Host<E>`].
///
/// # Optional inputs (have defaults)
///
/// | Method                | Default                 |
/// |-----------------------|-------------------------|
/// | `.config(c)`          | `HostConfig::default()` |
/// | `.executor(e)`        | `NoopExecutor`          |
/// | `.ack(t, name, o)`    | no scripted acks        |
/// | `.fact(t, name, v)`   | no scripted facts       |
pub struct HostBuilder<E: Executor = NoopExecutor> {
    planner:  Planner,
    config:   HostConfig,
    executor: E,
    queue:    MessageQueue,
}

impl HostBuilder<NoopExecutor> {
    pub fn new(planner: Planner) -> Self {
        Self {
            planner,
            config:   HostConfig::default(),
            executor: NoopExecutor,
            queue:    MessageQueue::new(),
        }
    }
}

impl<E: Executor> HostBuilder<E> {
    pub fn config(mut self, config: HostConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the executor.
    pub fn executor<E2: Executor>(self, executor: E2) -> HostBuilder<E2> {
        HostBuilder {
            planner: self.planner,
            config: self.config,
            executor,
            queue: self.queue,
        }
    }

    /// Script a message for delivery at tick `at`.
    pub fn message(mut self, at: Tick, message: HostMessage) -> Self {
        self.queue.push(at, message);
        self
    }

    pub fn ack(self, at: Tick, activity: impl Into<String>, outcome: Outcome) -> Self {
        self.message(at, HostMessage::ack(activity, outcome))
    }

    pub fn fact(self, at: Tick, name: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.message(at, HostMessage::fact(name, value))
    }

    /// Validate the configuration and return a ready-to-run [`Host`].
    pub fn build(self) -> HostResult<Host<E>> {
        self.config.validate()?;
        Ok(Host::new(self.config, self.planner, self.executor, self.queue))
    }
}
