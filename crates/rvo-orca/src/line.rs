//! Directed half-plane boundary in velocity space.

use rvo_core::{Vector2, det};

/// A half-plane constraint.  Admissible velocities lie on the left of
/// `direction` (looking along it from `point`).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Line {
    /// Any point on the boundary.
    pub point:     Vector2,
    /// Unit direction along the boundary.
    pub direction: Vector2,
}

impl Line {
    #[inline]
    pub fn new(point: Vector2, direction: Vector2) -> Self {
        Self { point, direction }
    }

    /// Signed distance by which `v` breaks the constraint.  Positive means
    /// `v` is on the forbidden (right) side.
    #[inline]
    pub fn penetration(&self, v: Vector2) -> f32 {
        det(self.direction, self.point - v)
    }

    #[inline]
    pub fn is_violated_by(&self, v: Vector2) -> bool {
        self.penetration(v) > 0.0
    }
}
