//! `pl-output` — run output for the planner host.
//!
//! [`CsvWriter`] creates three files in the output directory:
//!
//! | File                 | One row per                                   |
//! |----------------------|-----------------------------------------------|
//! | `events.csv`         | planner event or rejected message             |
//! | `tick_summaries.csv` | processed tick                                |
//! | `final_states.csv`   | activity, written once when the run ends      |
//!
//! Writers implement [`OutputWriter`] and are driven by
//! [`PlanOutputObserver`], which implements `pl_host::HostObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use pl_output::{CsvWriter, PlanOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = PlanOutputObserver::new(writer);
//! host.run(&mut obs)?;
//! if let Some(e) = obs.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::PlanOutputObserver;
pub use row::{EventRow, FinalStateRow, TickSummaryRow};
pub use writer::OutputWriter;
