//! Obstacle polygons stored as closed loops of directed edges.
//!
//! Every vertex `v` of a polygon owns the edge `v → next(v)`.  Polygons wound
//! counter-clockwise are solid (agents stay outside); clockwise polygons
//! confine agents inside.
//!
//! Vertices are only ever appended, so a `VertexId` stays valid for the
//! lifetime of the set and can be captured by an [`ObstacleIndex`] built
//! earlier.
//!
//! [`ObstacleIndex`]: crate::ObstacleIndex

use log::debug;
use rvo_core::{ObstacleId, RvoError, RvoResult, Vector2, VertexId, left_of};

/// One corner of an obstacle polygon.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObstacleVertex {
    pub point:    Vector2,
    /// Unit direction of the edge leaving this vertex.
    pub unit_dir: Vector2,
    /// `left_of(prev, point, next) >= 0`.
    pub convex:   bool,
    pub next:     VertexId,
    pub prev:     VertexId,
    pub obstacle: ObstacleId,
}

/// Append-only arena of obstacle vertices.
#[derive(Clone, Debug, Default)]
pub struct ObstacleSet {
    vertices: Vec<ObstacleVertex>,
    polygons: usize,
}

impl ObstacleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a closed polygon and return its handle.
    ///
    /// Needs at least three finite points with no two consecutive ones equal
    /// (the last and first included).  Simplicity (no self-crossing) is the
    /// caller's responsibility.
    pub fn add_polygon(&mut self, points: &[Vector2]) -> RvoResult<ObstacleId> {
        if points.len() < 3 {
            return Err(RvoError::InvalidObstacle { vertices: points.len() });
        }
        if let Some(bad) = points.iter().find(|p| !p.is_finite()) {
            let value = if bad.x.is_finite() { bad.y } else { bad.x };
            return Err(RvoError::InvalidParameter {
                name: "obstacle vertex",
                value,
                reason: "must be finite",
            });
        }
        let n = points.len();
        if let Some(vertex) = (0..n).find(|&i| points[i] == points[(i + 1) % n]) {
            return Err(RvoError::DegenerateEdge { vertex });
        }

        let overflow = || RvoError::Config("obstacle handle space exhausted".into());
        let obstacle = ObstacleId::try_from(self.polygons).map_err(|_| overflow())?;
        let base = self.vertices.len();
        u32::try_from(base + n).map_err(|_| overflow())?;

        let id = |i: usize| VertexId((base + i) as u32);
        for i in 0..n {
            let prev = (i + n - 1) % n;
            let next = (i + 1) % n;
            self.vertices.push(ObstacleVertex {
                point:    points[i],
                unit_dir: (points[next] - points[i]).normalize(),
                convex:   left_of(points[prev], points[i], points[next]) >= 0.0,
                next:     id(next),
                prev:     id(prev),
                obstacle,
            });
        }
        self.polygons += 1;

        debug!("obstacle {obstacle}: {n} vertices starting at {}", id(0));
        Ok(obstacle)
    }

    /// Total vertex (and edge) count across all polygons.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn obstacle_count(&self) -> usize {
        self.polygons
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// All vertices, indexed by `VertexId`.
    #[inline]
    pub fn vertices(&self) -> &[ObstacleVertex] {
        &self.vertices
    }

    pub fn vertex(&self, id: VertexId) -> Option<&ObstacleVertex> {
        self.vertices.get(id.index())
    }
}
