//! Agent parameters and top-level simulation configuration.
//!
//! Both types validate themselves: a parameter set that passes
//! [`AgentParams::validate`] satisfies every numeric precondition of the
//! avoidance code (positive radius, speed, and horizons).

use crate::{RvoError, RvoResult};

// ── AgentParams ───────────────────────────────────────────────────────────────

/// Per-agent avoidance parameters.
///
/// Used both as the simulator-wide defaults for `Sim::add_agent` and as the
/// explicit override passed to `Sim::add_agent_with`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentParams {
    /// Search radius for neighbouring agents.
    pub neighbor_dist: f32,
    /// Cap on the number of agent neighbours taken into account.
    pub max_neighbors: usize,
    /// Look-ahead (seconds) for reciprocal avoidance of other agents.
    pub time_horizon: f32,
    /// Look-ahead (seconds) for avoidance of static obstacles.
    pub time_horizon_obst: f32,
    /// Radius of the agent's disk.
    pub radius: f32,
    /// Upper bound on the length of any velocity the agent is given.
    pub max_speed: f32,
}

impl AgentParams {
    /// Check every field against the avoidance preconditions.
    pub fn validate(&self) -> RvoResult<()> {
        non_negative("neighbor_dist", self.neighbor_dist)?;
        positive("time_horizon", self.time_horizon)?;
        positive("time_horizon_obst", self.time_horizon_obst)?;
        positive("radius", self.radius)?;
        positive("max_speed", self.max_speed)?;
        Ok(())
    }

    /// Radius inside which obstacle edges can produce a constraint.
    #[inline]
    pub fn obstacle_range(&self) -> f32 {
        self.time_horizon_obst * self.max_speed + self.radius
    }
}

impl Default for AgentParams {
    /// Crowd-scale values: 15 m search radius, 10
    /// neighbours, 10 s horizons, 1.5 m radius, 2 m/s.
    fn default() -> Self {
        Self {
            neighbor_dist:     15.0,
            max_neighbors:     10,
            time_horizon:      10.0,
            time_horizon_obst: 10.0,
            radius:            1.5,
            max_speed:         2.0,
        }
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Typically built in code or loaded from JSON by a demo binary (with the
/// `serde` feature) and passed to `rvo_sim::SimBuilder`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Seconds per step.  Must be positive.  Default: 0.25.
    pub time_step: f32,

    /// Parameters given to agents added without explicit overrides.
    pub agent_defaults: AgentParams,

    /// Worker thread count for the compute phase.  `None` uses Rayon's
    /// global pool (all logical cores).  Ignored without the `parallel`
    /// feature.  Results do not depend on this value.
    pub num_threads: Option<usize>,

    /// Report a snapshot to the observer every N steps.  0 disables
    /// snapshots; 1 reports every step.
    pub snapshot_interval_steps: u64,
}

impl SimConfig {
    pub fn validate(&self) -> RvoResult<()> {
        positive("time_step", self.time_step)?;
        self.agent_defaults.validate()?;
        if self.num_threads == Some(0) {
            return Err(RvoError::Config("num_threads must be at least 1".into()));
        }
        Ok(())
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            time_step:               0.25,
            agent_defaults:          AgentParams::default(),
            num_threads:             None,
            snapshot_interval_steps: 1,
        }
    }
}

// ── Validation helpers ────────────────────────────────────────────────────────

/// Reject zero, negative, NaN, and infinite values.
pub(crate) fn positive(name: &'static str, value: f32) -> RvoResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(RvoError::InvalidParameter { name, value, reason: "must be positive and finite" })
    }
}

pub(crate) fn non_negative(name: &'static str, value: f32) -> RvoResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(RvoError::InvalidParameter { name, value, reason: "must be non-negative and finite" })
    }
}

/// Validate a step duration supplied after construction.
pub fn validate_time_step(time_step: f32) -> RvoResult<()> {
    positive("time_step", time_step)
}
