//! `PlanOutputObserver<W>` bridges `HostObserver` to an `OutputWriter`.

use pl_core::{PlanError, Tick};
use pl_host::{HostMessage, HostObserver, StepReport};
use pl_planner::{PlanEvent, Planner};

use crate::row::{EventRow, FinalStateRow, TickSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`HostObserver`] that writes the event log, tick summaries and final
/// activity states to any [`OutputWriter`].
///
/// Events are buffered for the current tick and written in one batch at the
/// end of it.  Errors from the writer are stored because `HostObserver`
/// methods have no return value; check with [`take_error`][Self::take_error]
/// after `host.run()` returns.
pub struct PlanOutputObserver<W: OutputWriter> {
    writer:     W,
    pending:    Vec<EventRow>,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> PlanOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, pending: Vec::new(), last_error: None }
    }

    /// Take the stored write error (if any).  `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }

    fn flush_pending(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let rows = std::mem::take(&mut self.pending);
        let result = self.writer.write_events(&rows);
        self.store_err(result);
    }
}

fn event_row(planner: &Planner, event: &PlanEvent) -> EventRow {
    let name = |id| planner.activity_name(id).unwrap_or("?").to_owned();
    let (pool, instance) = match event.claim() {
        Some(claim) => {
            let a = planner.resolve(claim);
            (a.pool.to_owned(), a.instance.to_owned())
        }
        None => (String::new(), String::new()),
    };
    let detail = match *event {
        PlanEvent::Preempted { by, .. } | PlanEvent::Revoked { by, .. } => format!("by {}", name(by)),
        _ => String::new(),
    };
    EventRow {
        tick: event.at().0,
        activity: name(event.activity()),
        event: event.kind(),
        pool,
        instance,
        detail,
    }
}

impl<W: OutputWriter> HostObserver for PlanOutputObserver<W> {
    fn on_event(&mut self, planner: &Planner, event: &PlanEvent) {
        self.pending.push(event_row(planner, event));
    }

    fn on_rejected(&mut self, tick: Tick, message: &HostMessage, error: &PlanError) {
        let activity = match message {
            HostMessage::Ack { activity, .. } => activity.clone(),
            HostMessage::Fact { .. } => String::new(),
        };
        self.pending.push(EventRow {
            tick: tick.0,
            activity,
            event: "reject",
            pool: String::new(),
            instance: String::new(),
            detail: error.to_string(),
        });
    }

    fn on_tick_end(&mut self, report: &StepReport) {
        self.flush_pending();
        let row = TickSummaryRow {
            tick:          report.tick.0,
            transitions:   report.transitions() as u64,
            passes:        report.outcome.passes,
            facts_changed: report.facts_changed as u64,
            rejected:      report.rejected as u64,
            next_wake:     report.outcome.next_wake.map(|t| t.0),
        };
        let result = self.writer.write_tick_summary(&row);
        self.store_err(result);
    }

    fn on_run_end(&mut self, _final_tick: Tick, planner: &Planner) {
        self.flush_pending();
        let rows: Vec<FinalStateRow> = planner
            .activities()
            .iter()
            .map(|(_, a)| FinalStateRow {
                activity:    a.name().to_owned(),
                state:       a.state().as_str(),
                started_at:  a.started_at().map(|t| t.0),
                finished_at: a.finished_at().map(|t| t.0),
            })
            .collect();
        let result = self.writer.write_final_states(&rows);
        self.store_err(result);
        let result = self.writer.finish();
        self.store_err(result);
    }
}
