//! `rvo-sim` — step loop orchestrator for the rust_rvo simulator.
//!
//! # Step state machine
//!
//! ```text
//! Idle → IndexBuild → Compute → Apply → Idle
//!
//!   IndexBuild: snapshot agent positions into a balanced kd-tree.
//!   Compute:    per agent: neighbours + obstacle edges → half-planes →
//!                linear program → new velocity (parallel with `parallel`).
//!                Nothing is written; results go to a buffer.
//!   Apply:      velocity[i] = buffer[i]; position[i] += velocity[i] · dt;
//!                global time += dt.
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs the compute phase on Rayon (default).             |
//! | `serde`    | Derives `Serialize`/`Deserialize` on public types.     |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use rvo_core::{SimConfig, Vector2};
//! use rvo_sim::Sim;
//!
//! let mut sim = Sim::new(SimConfig::default())?;
//! let a = sim.add_agent(Vector2::new(-5.0, 0.0))?;
//! sim.set_agent_pref_velocity(a, Vector2::new(1.0, 0.0))?;
//! sim.step();
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod sim;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use sim::{Sim, StepPhase};
