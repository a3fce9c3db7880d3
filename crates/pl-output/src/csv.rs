//! CSV output backend.

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{EventRow, FinalStateRow, OutputResult, TickSummaryRow};

fn opt(v: Option<u64>) -> String {
    v.map(|t| t.to_string()).unwrap_or_default()
}

/// Writes run output to three CSV files.
pub struct CsvWriter {
    events:    Writer<File>,
    summaries: Writer<File>,
    finals:    Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Create the CSV files in `dir` (which must exist) and write the header
    /// rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut events = Writer::from_path(dir.join("events.csv"))?;
        events.write_record(["tick", "activity", "event", "pool", "instance", "detail"])?;

        let mut summaries = Writer::from_path(dir.join("tick_summaries.csv"))?;
        summaries.write_record(["tick", "transitions", "passes", "facts_changed", "rejected", "next_wake"])?;

        let mut finals = Writer::from_path(dir.join("final_states.csv"))?;
        finals.write_record(["activity", "state", "started_at", "finished_at"])?;

        Ok(Self { events, summaries, finals, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_events(&mut self, rows: &[EventRow]) -> OutputResult<()> {
        for row in rows {
            let tick = row.tick.to_string();
            self.events.write_record([
                tick.as_str(),
                row.activity.as_str(),
                row.event,
                row.pool.as_str(),
                row.instance.as_str(),
                row.detail.as_str(),
            ])?;
        }
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            row.transitions.to_string(),
            row.passes.to_string(),
            row.facts_changed.to_string(),
            row.rejected.to_string(),
            opt(row.next_wake),
        ])?;
        Ok(())
    }

    fn write_final_states(&mut self, rows: &[FinalStateRow]) -> OutputResult<()> {
        for row in rows {
            self.finals.write_record(&[
                row.activity.clone(),
                row.state.to_owned(),
                opt(row.started_at),
                opt(row.finished_at),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.events.flush()?;
        self.summaries.flush()?;
        self.finals.flush()?;
        Ok(())
    }
}
