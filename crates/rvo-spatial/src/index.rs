//! R-tree over obstacle edges.
//!
//! Each entry is one directed edge `v → next(v)` keyed by its start vertex.
//! The tree is bulk-loaded from the edges present at build time; vertices
//! added to the [`ObstacleSet`] afterwards stay invisible until the next
//! build.

use log::debug;
use rstar::{AABB, PointDistance, RTree, RTreeObject};
use rvo_core::{RVO_EPSILON, Vector2, VertexId, dist_sq_point_segment, left_of};

use crate::ObstacleSet;

// ── R-tree edge entry ─────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct EdgeEntry {
    a:  Vector2,
    b:  Vector2,
    id: VertexId,
}

impl RTreeObject for EdgeEntry {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.a.into(), self.b.into())
    }
}

impl PointDistance for EdgeEntry {
    /// Exact squared distance from the point to the segment.
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        dist_sq_point_segment(self.a, self.b, Vector2::from(*point))
    }
}

/// An edge returned by [`ObstacleIndex::nearby_edges`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NearbyEdge {
    /// Start vertex of the edge.
    pub vertex:  VertexId,
    /// Squared distance from the query point to the segment.
    pub dist_sq: f32,
}

// ── ObstacleIndex ─────────────────────────────────────────────────────────────

/// Immutable spatial index over every obstacle edge known at build time.
#[derive(Default)]
pub struct ObstacleIndex {
    tree: RTree<EdgeEntry>,
}

impl ObstacleIndex {
    /// Index every edge currently in `set`.
    ///
    /// Time complexity: O(E log E) bulk load, where E = edges.
    pub fn build(set: &ObstacleSet) -> Self {
        let vertices = set.vertices();
        let entries: Vec<EdgeEntry> = vertices
            .iter()
            .enumerate()
            .map(|(i, v)| EdgeEntry {
                a:  v.point,
                b:  vertices[v.next.index()].point,
                id: VertexId(i as u32),
            })
            .collect();
        debug!("obstacle index: {} edges from {} polygons", entries.len(), set.obstacle_count());
        Self { tree: RTree::bulk_load(entries) }
    }

    /// Number of indexed edges.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Edges whose segment lies strictly within `radius` of `point`, in no
    /// particular order.
    pub fn nearby_edges(&self, point: Vector2, radius: f32) -> Vec<NearbyEdge> {
        if self.is_empty() || radius.is_nan() || radius <= 0.0 {
            return Vec::new();
        }
        let range_sq = radius * radius;
        let query: [f32; 2] = point.into();
        self.tree
            .locate_within_distance(query, range_sq)
            .filter_map(|e| {
                let dist_sq = e.distance_2(&query);
                (dist_sq < range_sq).then_some(NearbyEdge { vertex: e.id, dist_sq })
            })
            .collect()
    }

    /// Edges an agent at `point` can collide with inside `radius`, ordered by
    /// `(squared distance, vertex id)`.
    ///
    /// Edges seen from their interior side are dropped: the adjoining
    /// front-facing edges already produce the constraint.
    pub fn facing_edges(&self, set: &ObstacleSet, point: Vector2, radius: f32) -> Vec<NearbyEdge> {
        let vertices = set.vertices();
        let mut edges: Vec<NearbyEdge> = self
            .nearby_edges(point, radius)
            .into_iter()
            .filter(|e| {
                let v = &vertices[e.vertex.index()];
                left_of(v.point, vertices[v.next.index()].point, point) < 0.0
            })
            .collect();
        edges.sort_unstable_by(|x, y| x.dist_sq.total_cmp(&y.dist_sq).then(x.vertex.cmp(&y.vertex)));
        edges
    }

    /// `true` if a disk of `radius` can sweep the segment `q1 → q2` without
    /// touching any indexed edge.
    ///
    /// Touching at exactly `radius` counts as blocked.
    pub fn query_visibility(&self, q1: Vector2, q2: Vector2, radius: f32) -> bool {
        // Any blocking edge passes within `half + r` of the sweep midpoint.
        let r = radius.max(0.0);
        let mid = (q1 + q2) * 0.5;
        let reach = (q2 - q1).length() * 0.5 + r + RVO_EPSILON;
        let r_sq = r * r;
        self.tree
            .locate_within_distance(mid.into(), reach * reach)
            .all(|e| dist_sq_segment_segment(q1, q2, e.a, e.b) > r_sq)
    }
}

/// Squared distance between segments `p1–p2` and `q1–q2` (0 if they cross).
fn dist_sq_segment_segment(p1: Vector2, p2: Vector2, q1: Vector2, q2: Vector2) -> f32 {
    let d1 = left_of(p1, p2, q1);
    let d2 = left_of(p1, p2, q2);
    let d3 = left_of(q1, q2, p1);
    let d4 = left_of(q1, q2, p2);
    if d1 * d2 < 0.0 && d3 * d4 < 0.0 {
        return 0.0;
    }
    dist_sq_point_segment(p1, p2, q1)
        .min(dist_sq_point_segment(p1, p2, q2))
        .min(dist_sq_point_segment(q1, q2, p1))
        .min(dist_sq_point_segment(q1, q2, p2))
}
