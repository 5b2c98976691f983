//! `rvo-orca` — per-agent velocity selection.
//!
//! Given one agent, its neighbours, and the obstacle edges around it, this
//! crate builds the half-plane constraints of optimal reciprocal collision
//! avoidance and solves for the admissible velocity closest to the agent's
//! preference.  Everything here is a pure function of its inputs; the
//! simulator decides who the neighbours are and when results are applied.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                 |
//! |---------------|----------------------------------------------------------|
//! | [`line`]      | `Line` (directed half-plane boundary)                    |
//! | [`agent`]     | Reciprocal agent–agent constraint                        |
//! | [`obstacle`]  | One-sided agent–obstacle constraints                     |
//! | [`lp`]        | Incremental 1-D / 2-D programs and the 3-D relaxation    |
//! | [`velocity`]  | `AgentView`, `Body`, `OrcaLines`, `compute_new_velocity` |

pub mod agent;
pub mod line;
pub mod lp;
pub mod obstacle;
pub mod velocity;


pub use line::Line;
pub use lp::{Infeasible, linear_program1, linear_program2, linear_program3, solve};
pub use velocity::{AgentView, Body, OrcaLines, compute_new_velocity, orca_lines};
