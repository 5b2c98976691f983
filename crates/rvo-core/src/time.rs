//! Simulation time model.
//!
//! # Design
//!
//! Time advances in discrete steps of fixed duration.  `Step` counts how many
//! steps have completed; `SimClock` pairs that counter with the step duration
//! and an accumulated global time:
//!
//!   global_time = Σ time_step over all completed steps
//!
//! The step duration may change between steps (`set_time_step`), so
//! `global_time` is accumulated rather than derived from the counter.

use std::fmt;

// ── Step ──────────────────────────────────────────────────────────────────────

/// An absolute step counter.  `Step(0)` is the state before the first step.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Step(pub u64);

impl Step {
    pub const ZERO: Step = Step(0);
}

impl std::ops::Add<u64> for Step {
    type Output = Step;
    #[inline]
    fn add(self, rhs: u64) -> Step {
        Step(self.0 + rhs)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Step counter, step duration, and accumulated simulated seconds.
///
/// `SimClock` is cheap to copy and holds no heap data.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Seconds of simulated time covered by one step.
    pub time_step: f32,
    /// Simulated seconds elapsed since the clock was created.
    pub global_time: f32,
    /// Number of completed steps.
    pub current_step: Step,
}

impl SimClock {
    /// Create a clock at time zero with the given step duration.
    pub fn new(time_step: f32) -> Self {
        Self {
            time_step,
            global_time: 0.0,
            current_step: Step::ZERO,
        }
    }

    /// Record one completed step.
    #[inline]
    pub fn advance(&mut self) {
        self.global_time += self.time_step;
        self.current_step = self.current_step + 1;
    }

    #[inline]
    pub fn inv_time_step(&self) -> f32 {
        1.0 / self.time_step
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (t = {:.3} s, dt = {} s)", self.current_step, self.global_time, self.time_step)
    }
}
