//! The `OutputWriter` trait implemented by backend writers.

use crate::{EventRow, FinalStateRow, OutputResult, TickSummaryRow};

/// Sink for run output.
///
/// Errors are surfaced to the caller through
/// [`PlanOutputObserver::take_error`][crate::PlanOutputObserver::take_error].
pub trait OutputWriter {
    /// Write a batch of event rows.
    fn write_events(&mut self, rows: &[EventRow]) -> OutputResult<()>;

    /// Write one tick summary row.
    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()>;

    /// Write the end-of-run state of every activity.
    fn write_final_states(&mut self, rows: &[FinalStateRow]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent; safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
