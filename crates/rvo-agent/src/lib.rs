//! `rvo-agent` — Structure-of-Arrays agent storage for the `rust_rvo` simulator.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`store`]   | `AgentStore` (SoA arrays), `AgentState` (per-agent view)  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `AgentState`.          |

pub mod store;


pub use store::{AgentState, AgentStore};
