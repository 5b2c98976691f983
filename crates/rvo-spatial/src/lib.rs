//! `rvo-spatial` — neighbour lookup for agents and obstacle edges.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                    |
//! |--------------|-------------------------------------------------------------|
//! | [`kdtree`]   | `AgentTree` (balanced kd-tree over agent positions)         |
//! | [`obstacle`] | `ObstacleSet`, `ObstacleVertex` (closed polygon loops)      |
//! | [`index`]    | `ObstacleIndex` (R-tree over edges), `NearbyEdge`           |
//!
//! Both indices are immutable once built.  The simulator rebuilds the agent
//! tree every step and the obstacle index on request; neither is updated in
//! place.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `ObstacleVertex`.       |

pub mod index;
pub mod kdtree;
pub mod obstacle;


pub use index::{NearbyEdge, ObstacleIndex};
pub use kdtree::AgentTree;
pub use obstacle::{ObstacleSet, ObstacleVertex};
