//! `rvo-output` — trajectory export for the rust_rvo simulator.
//!
//! | Backend | Files created                                   |
//! |---------|-------------------------------------------------|
//! | CSV     | `agent_snapshots.csv`, `step_summaries.csv`     |
//!
//! Backends implement [`OutputWriter`] and are driven by
//! [`TrajectoryObserver`], which implements `rvo_sim::SimObserver`.  The
//! files are an export for plotting and analysis; nothing reads them back.
//!
//! # Usage
//!
//! ```rust,ignore
//! use rvo_output::{CsvWriter, TrajectoryObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = TrajectoryObserver::new(writer);
//! sim.run_steps(500, &mut obs);
//! if let Some(e) = obs.take_error() { eprintln!("output error: {e}"); }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::TrajectoryObserver;
pub use row::{AgentSnapshotRow, StepSummaryRow};
pub use writer::OutputWriter;
