//! The `Host` struct and its step loop.

use pl_core::{Outcome, Scalar, Tick};
use pl_planner::{PlanEvent, Planner, TickOutcome};

use crate::{Executor, HostConfig, HostMessage, HostObserver, HostResult, MessageQueue, Origin};

// ── StepReport ────────────────────────────────────────────────────────────────

/// What happened during one processed tick.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StepReport {
    pub tick:          Tick,
    /// Fact messages that changed a value.
    pub facts_changed: usize,
    /// Acknowledgements the planner accepted.
    pub acknowledged:  usize,
    /// Messages the planner refused.
    pub rejected:      usize,
    /// Result of `process_changes` for this tick.
    pub outcome:       TickOutcome,
}

impl StepReport {
    /// State transitions this tick: accepted acknowledgements plus planner
    /// transitions.
    pub fn transitions(&self) -> usize {
        self.acknowledged + self.outcome.transitions()
    }
}

// ── Host ──────────────────────────────────────────────────────────────────────

/// Drives a [`Planner`] through simulated time.
///
/// Create via [`HostBuilder`][crate::HostBuilder].
pub struct Host<E: Executor> {
    /// Run window and time-advance mode.
    pub config: HostConfig,

    /// The planner being driven.  Observers receive it read-only.
    pub planner: Planner,

    /// Carries out started activities.
    pub executor: E,

    /// Pending facts and acknowledgements keyed by delivery tick.
    queue: MessageQueue,

    /// The next tick to process.
    now: Tick,
}

impl<E: Executor> Host<E> {
    pub(crate) fn new(config: HostConfig, planner: Planner, executor: E, queue: MessageQueue) -> Self {
        Self { now: config.start_tick, config, planner, executor, queue }
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Run until `config.end_tick`, or until nothing remains scheduled in
    /// event-driven mode.
    pub fn run<O: HostObserver>(&mut self, observer: &mut O) -> HostResult<()> {
        let mut processed = 0u64;
        while self.now < self.config.end_tick {
            self.step(observer)?;
            processed += 1;
        }
        tracing::info!(
            ticks_processed = processed,
            final_tick = self.now.0,
            settled = self.planner.is_settled(),
            "run finished"
        );
        observer.on_run_end(self.now, &self.planner);
        Ok(())
    }

    /// Process the current tick and advance the clock.
    pub fn step<O: HostObserver>(&mut self, observer: &mut O) -> HostResult<StepReport> {
        let now = self.now;
        observer.on_tick_start(now);

        let mut report = StepReport { tick: now, ..StepReport::default() };

        // ── Deliver facts, then acknowledgements ──────────────────────────
        let (facts, acks): (Vec<HostMessage>, Vec<HostMessage>) = self
            .queue
            .drain_through(now)
            .into_iter()
            .partition(|m| matches!(m, HostMessage::Fact { .. }));

        for message in facts {
            if let HostMessage::Fact { name, value } = message {
                tracing::debug!(fact = %name, %value, tick = now.0, "fact delivered");
                if self.planner.set_fact(name, value) {
                    report.facts_changed += 1;
                }
            }
        }

        for message in &acks {
            let HostMessage::Ack { activity, outcome } = message else {
                continue;
            };
            match self.planner.acknowledge(activity, *outcome, now) {
                Ok(events) => {
                    report.acknowledged += 1;
                    for event in &events {
                        observer.on_event(&self.planner, event);
                    }
                }
                Err(e) => {
                    report.rejected += 1;
                    observer.on_rejected(now, message, &e);
                }
            }
        }

        // ── Plan ──────────────────────────────────────────────────────────
        let outcome = self.planner.process_changes(now)?;

        // ── Observe and execute ───────────────────────────────────────────
        for event in &outcome.events {
            observer.on_event(&self.planner, event);
            match *event {
                PlanEvent::Started { activity, .. } => {
                    let Some(name) = self.planner.activity_name(activity) else {
                        continue;
                    };
                    if let Some(done) = self.executor.on_started(name, now) {
                        let at = done.at.max(now + 1);
                        tracing::debug!(activity = name, at = at.0, outcome = %done.outcome, "completion scheduled");
                        self.queue
                            .push_from(at, HostMessage::ack(name, done.outcome), Origin::Executor);
                    }
                }
                PlanEvent::Preempted { activity, .. } => {
                    let Some(name) = self.planner.activity_name(activity) else {
                        continue;
                    };
                    let dropped = self.queue.cancel_scheduled_acks(name);
                    tracing::debug!(activity = name, dropped, "queued completions cancelled");
                    self.executor.on_preempted(name, now);
                }
                _ => {}
            }
        }

        report.outcome = outcome;
        tracing::trace!(
            tick = now.0,
            transitions = report.transitions(),
            rejected = report.rejected,
            "tick processed"
        );
        observer.on_tick_end(&report);

        self.now = self.following_tick(now, &report.outcome);
        Ok(report)
    }

    /// Queue `message` for delivery at `at`.  Messages for ticks already
    /// processed are delivered at the next step.
    pub fn push(&mut self, at: Tick, message: HostMessage) {
        self.queue.push(at, message);
    }

    pub fn push_ack(&mut self, at: Tick, activity: impl Into<String>, outcome: Outcome) {
        self.push(at, HostMessage::ack(activity, outcome));
    }

    pub fn push_fact(&mut self, at: Tick, name: impl Into<String>, value: impl Into<Scalar>) {
        self.push(at, HostMessage::fact(name, value));
    }

    /// The next tick [`step`](Self::step) will process.
    pub fn now(&self) -> Tick {
        self.now
    }

    /// `false` once [`run`](Self::run) would stop.
    pub fn is_running(&self) -> bool {
        self.now < self.config.end_tick
    }

    pub fn pending_messages(&self) -> usize {
        self.queue.len()
    }

    // ── Time advance ──────────────────────────────────────────────────────

    fn following_tick(&self, now: Tick, outcome: &TickOutcome) -> Tick {
        let next = now + 1;
        if !self.config.event_driven {
            return next;
        }
        // A tick cut short by the pass limit may still have work left.
        if outcome.changed && outcome.passes >= self.planner.config().max_passes {
            return next;
        }
        let end = self.config.end_tick.max(next);
        match [self.queue.next_tick(), outcome.next_wake].into_iter().flatten().min() {
            Some(t) => t.max(next).min(end),
            None => end,
        }
    }
}
