//! Two-dimensional vector type and the planar geometry helpers the avoidance
//! code is built on.
//!
//! `Vector2` uses `f32` throughout.  Positions, velocities, and half-plane
//! directions all share the type; there is no separate point type.

use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// Threshold below which two line directions are treated as parallel and a
/// vector length is treated as zero.
pub const RVO_EPSILON: f32 = 0.000_01;

/// A 2-D vector with exact `(x, y)` semantics.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

impl Vector2 {
    pub const ZERO: Vector2 = Vector2 { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn dot(self, other: Vector2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Squared length.
    #[inline]
    pub fn abs_sq(self) -> f32 {
        self.dot(self)
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.abs_sq().sqrt()
    }

    /// Unit vector in the same direction.  The zero vector maps to itself.
    #[inline]
    pub fn normalize(self) -> Vector2 {
        let len = self.length();
        if len > 0.0 { self / len } else { Vector2::ZERO }
    }

    /// Counter-clockwise perpendicular, `(-y, x)`.
    #[inline]
    pub fn perp(self) -> Vector2 {
        Vector2::new(-self.y, self.x)
    }

    #[inline]
    pub fn distance_sq(self, other: Vector2) -> f32 {
        (self - other).abs_sq()
    }

    /// Scale down to `max_length` if longer; otherwise return unchanged.
    #[inline]
    pub fn clamp_length(self, max_length: f32) -> Vector2 {
        if self.abs_sq() > max_length * max_length {
            self.normalize() * max_length
        } else {
            self
        }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// 2-D cross product (determinant of the 2×2 matrix with columns `a`, `b`).
#[inline]
pub fn det(a: Vector2, b: Vector2) -> f32 {
    a.x * b.y - a.y * b.x
}

/// Positive when `c` lies to the left of the directed line `a → b`.
#[inline]
pub fn left_of(a: Vector2, b: Vector2, c: Vector2) -> f32 {
    det(a - c, b - a)
}

/// Squared distance from point `c` to the segment `a–b`.
pub fn dist_sq_point_segment(a: Vector2, b: Vector2, c: Vector2) -> f32 {
    let ab = b - a;
    let len_sq = ab.abs_sq();
    if len_sq == 0.0 {
        return (c - a).abs_sq();
    }
    let r = (c - a).dot(ab) / len_sq;
    if r < 0.0 {
        (c - a).abs_sq()
    } else if r > 1.0 {
        (c - b).abs_sq()
    } else {
        (c - (a + ab * r)).abs_sq()
    }
}

// ── Operators ─────────────────────────────────────────────────────────────────

impl Add for Vector2 {
    type Output = Vector2;
    #[inline]
    fn add(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector2 {
    type Output = Vector2;
    #[inline]
    fn sub(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Vector2 {
    type Output = Vector2;
    #[inline]
    fn neg(self) -> Vector2 {
        Vector2::new(-self.x, -self.y)
    }
}

impl Mul<f32> for Vector2 {
    type Output = Vector2;
    #[inline]
    fn mul(self, s: f32) -> Vector2 {
        Vector2::new(self.x * s, self.y * s)
    }
}

impl Mul<Vector2> for f32 {
    type Output = Vector2;
    #[inline]
    fn mul(self, v: Vector2) -> Vector2 {
        Vector2::new(self * v.x, self * v.y)
    }
}

impl Div<f32> for Vector2 {
    type Output = Vector2;
    #[inline]
    fn div(self, s: f32) -> Vector2 {
        Vector2::new(self.x / s, self.y / s)
    }
}

impl AddAssign for Vector2 {
    #[inline]
    fn add_assign(&mut self, rhs: Vector2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl SubAssign for Vector2 {
    #[inline]
    fn sub_assign(&mut self, rhs: Vector2) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

// ── Boundary conversions ──────────────────────────────────────────────────────

impl From<[f32; 2]> for Vector2 {
    #[inline]
    fn from(a: [f32; 2]) -> Self {
        Vector2::new(a[0], a[1])
    }
}

impl From<Vector2> for [f32; 2] {
    #[inline]
    fn from(v: Vector2) -> Self {
        [v.x, v.y]
    }
}

impl From<(f32, f32)> for Vector2 {
    #[inline]
    fn from((x, y): (f32, f32)) -> Self {
        Vector2::new(x, y)
    }
}

impl fmt::Display for Vector2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.x, self.y)
    }
}
