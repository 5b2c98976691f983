//! `TrajectoryObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use rvo_agent::AgentStore;
use rvo_core::Step;
use rvo_sim::SimObserver;

use crate::row::{AgentSnapshotRow, StepSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that records every snapshot and step summary through
/// an [`OutputWriter`].
///
/// `SimObserver` methods return nothing, so the first write error is kept
/// and can be collected with [`take_error`][Self::take_error] once the run
/// is over.  Later rows are still attempted.
pub struct TrajectoryObserver<W: OutputWriter> {
    writer:     W,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> TrajectoryObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// The stored write error, if any.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for TrajectoryObserver<W> {
    fn on_step_end(&mut self, step: Step, global_time: f32) {
        let row = StepSummaryRow { step: step.0, global_time };
        let result = self.writer.write_step_summary(&row);
        self.store_err(result);
    }

    fn on_snapshot(&mut self, step: Step, global_time: f32, agents: &AgentStore) {
        let rows: Vec<AgentSnapshotRow> = agents
            .states()
            .map(|s| AgentSnapshotRow {
                agent_id: s.id.0,
                step:     step.0,
                time:     global_time,
                x:        s.position.x,
                y:        s.position.y,
                vx:       s.velocity.x,
                vy:       s.velocity.y,
            })
            .collect();

        if !rows.is_empty() {
            let result = self.writer.write_snapshots(&rows);
            self.store_err(result);
        }
    }

    fn on_run_end(&mut self, _final_step: Step) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
