//! Simulator error type.
//!
//! Sub-crates either return `RvoError` directly or wrap it as one variant of
//! their own enum (see `rvo_sim::SimError`).

use thiserror::Error;

use crate::AgentId;

/// The top-level error type for `rvo-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum RvoError {
    #[error("agent {0} not found")]
    InvalidHandle(AgentId),

    #[error("obstacle needs at least 3 vertices, got {vertices}")]
    InvalidObstacle { vertices: usize },

    #[error("obstacle edge leaving vertex {vertex} has zero length")]
    DegenerateEdge { vertex: usize },

    #[error("invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name:   &'static str,
        value:  f32,
        reason: &'static str,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for all `rvo-*` crates.
pub type RvoResult<T> = Result<T, RvoError>;
