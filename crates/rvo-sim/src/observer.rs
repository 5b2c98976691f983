//! Simulation observer trait for progress reporting and data collection.

use rvo_agent::AgentStore;
use rvo_core::Step;

use crate::StepPhase;

/// Callbacks invoked by [`Sim::step_observed`][crate::Sim::step_observed]
/// and [`Sim::run_steps`][crate::Sim::run_steps].
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter { interval: u64 }
///
/// impl SimObserver for ProgressPrinter {
///     fn on_step_end(&mut self, step: Step, global_time: f32) {
///         if step.0 % self.interval == 0 {
///             println!("{step}: t = {global_time:.2} s");
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each step, before the agent tree is built.
    fn on_step_start(&mut self, _step: Step) {}

    /// Called on every phase transition within a step, ending with
    /// `StepPhase::Idle`.
    fn on_phase(&mut self, _step: Step, _phase: StepPhase) {}

    /// Called after new velocities and positions have been applied.
    ///
    /// `global_time` already includes this step.
    fn on_step_end(&mut self, _step: Step, _global_time: f32) {}

    /// Called at snapshot intervals (every `config.snapshot_interval_steps`
    /// steps) with read-only access to the post-step agent state.
    fn on_snapshot(&mut self, _step: Step, _global_time: f32, _agents: &AgentStore) {}

    /// Called once after the last step of [`Sim::run_steps`][crate::Sim::run_steps].
    fn on_run_end(&mut self, _final_step: Step) {}
}

/// A [`SimObserver`] that does nothing.  Used by [`Sim::step`][crate::Sim::step].
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
