//! Handles for agents, obstacles and obstacle vertices.
//!
//! Every handle is a `u32` index into a dense array owned by the simulator,
//! assigned in insertion order and never reused.  Handles are totally
//! ordered, which the neighbour queries rely on to break distance ties.

use std::fmt;

macro_rules! handle {
    ($(#[$attr:meta])* $name:ident) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(pub u32);

        impl $name {
            /// Never handed out; `Default` returns it.
            pub const INVALID: $name = $name(u32::MAX);

            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;

            fn try_from(n: usize) -> Result<$name, Self::Error> {
                u32::try_from(n).map($name)
            }
        }
    };
}

handle! {
    /// Handle of an agent.
    AgentId
}

handle! {
    /// Handle of one obstacle polygon.
    ObstacleId
}

handle! {
    /// Index of an obstacle vertex.  Vertex `v` is also the start of the
    /// directed edge `v → next(v)`, so this doubles as an edge id.
    VertexId
}
