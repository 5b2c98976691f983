//! Plain data row types written by output backends.

/// Kinematic state of one agent after a given step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentSnapshotRow {
    pub agent_id: u32,
    pub step:     u64,
    /// Simulated seconds at the end of `step`.
    pub time:     f32,
    pub x:        f32,
    pub y:        f32,
    pub vx:       f32,
    pub vy:       f32,
}

/// One line per completed step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepSummaryRow {
    pub step:        u64,
    pub global_time: f32,
}
