//! `rvo-core` — foundational types for the `rust_rvo` simulator.
//!
//! This crate is a dependency of every other `rvo-*` crate.  It has no
//! `rvo-*` dependencies and a single required external one (`thiserror`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`vector`]      | `Vector2`, `det`, `left_of`, point–segment distance   |
//! | [`ids`]         | `AgentId`, `ObstacleId`, `VertexId`                   |
//! | [`time`]        | `Step`, `SimClock`                                    |
//! | [`config`]      | `AgentParams`, `SimConfig`                            |
//! | [`error`]       | `RvoError`, `RvoResult`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod ids;
pub mod time;
pub mod vector;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{AgentParams, SimConfig};
pub use error::{RvoError, RvoResult};
pub use ids::{AgentId, ObstacleId, VertexId};
pub use time::{SimClock, Step};
pub use vector::{RVO_EPSILON, Vector2, det, dist_sq_point_segment, left_of};
