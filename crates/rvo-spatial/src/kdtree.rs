//! Balanced kd-tree over agent positions.
//!
//! # Layout
//!
//! Agents are reordered into `order` so that every node covers a contiguous
//! slice `order[begin..end]`.  Internal nodes split their slice at the median
//! of the wider bounding-box axis; slices of at most [`MAX_LEAF_SIZE`] agents
//! become leaves.  Construction is O(n log n) thanks to
//! `select_nth_unstable_by`.
//!
//! # Determinism
//!
//! Query results are fully ordered by `(squared distance, AgentId)`, so the
//! answer never depends on how the tree happened to be split.

use std::cmp::Ordering;

use rvo_core::{AgentId, Vector2};

/// Largest slice stored in a leaf.
pub const MAX_LEAF_SIZE: usize = 10;

const NO_CHILD: u32 = u32::MAX;

#[derive(Clone, Debug)]
struct Node {
    begin: u32,
    end:   u32,
    left:  u32,
    right: u32,
    min:   Vector2,
    max:   Vector2,
}

impl Node {
    #[inline]
    fn is_leaf(&self) -> bool {
        self.left == NO_CHILD
    }

    /// Squared distance from `p` to the node's bounding box (0 inside).
    #[inline]
    fn dist_sq(&self, p: Vector2) -> f32 {
        let dx = (self.min.x - p.x).max(0.0) + (p.x - self.max.x).max(0.0);
        let dy = (self.min.y - p.y).max(0.0) + (p.y - self.max.y).max(0.0);
        dx * dx + dy * dy
    }
}

/// Immutable snapshot of agent positions for radius-bounded k-nearest
/// queries.  Rebuilt from scratch at the start of every step.
#[derive(Clone, Debug, Default)]
pub struct AgentTree {
    positions: Vec<Vector2>,
    order:     Vec<u32>,
    nodes:     Vec<Node>,
}

impl AgentTree {
    /// Build a tree over `positions`; agent `i` is `positions[i]`.
    pub fn build(positions: &[Vector2]) -> Self {
        let mut tree = Self {
            positions: positions.to_vec(),
            order:     (0..positions.len() as u32).collect(),
            nodes:     Vec::with_capacity(2 * positions.len() / MAX_LEAF_SIZE + 1),
        };
        if !positions.is_empty() {
            tree.build_range(0, positions.len());
        }
        tree
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    fn build_range(&mut self, begin: usize, end: usize) -> u32 {
        let mut min = self.positions[self.order[begin] as usize];
        let mut max = min;
        for &i in &self.order[begin + 1..end] {
            let p = self.positions[i as usize];
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }

        let idx = self.nodes.len() as u32;
        self.nodes.push(Node {
            begin: begin as u32,
            end: end as u32,
            left: NO_CHILD,
            right: NO_CHILD,
            min,
            max,
        });

        if end - begin > MAX_LEAF_SIZE {
            let split_x = max.x - min.x > max.y - min.y;
            let mid = begin + (end - begin) / 2;
            let positions = &self.positions;
            let key = |i: &u32| {
                let p = positions[*i as usize];
                if split_x { p.x } else { p.y }
            };
            self.order[begin..end].select_nth_unstable_by(mid - begin, |a, b| {
                key(a).total_cmp(&key(b)).then(a.cmp(b))
            });

            let left = self.build_range(begin, mid);
            let right = self.build_range(mid, end);
            let node = &mut self.nodes[idx as usize];
            node.left = left;
            node.right = right;
        }
        idx
    }

    /// Up to `max_count` agents strictly within `radius` of `point`, nearest
    /// first, ties broken by ascending handle.  `exclude` (normally the
    /// querying agent) is never returned.
    pub fn nearest_within(
        &self,
        point: Vector2,
        radius: f32,
        max_count: usize,
        exclude: Option<AgentId>,
    ) -> Vec<(AgentId, f32)> {
        let mut found = Vec::with_capacity(max_count.min(self.len()));
        if max_count == 0 || self.nodes.is_empty() || radius.is_nan() || radius <= 0.0 {
            return found;
        }
        let query = Query {
            point,
            range_sq: radius * radius,
            max_count,
            exclude: exclude.map(|a| a.0),
        };
        self.query_node(0, &query, &mut found);
        found
    }

    fn query_node(&self, node: u32, q: &Query, found: &mut Vec<(AgentId, f32)>) {
        let n = &self.nodes[node as usize];
        if n.is_leaf() {
            for &i in &self.order[n.begin as usize..n.end as usize] {
                if Some(i) == q.exclude {
                    continue;
                }
                let d = self.positions[i as usize].distance_sq(q.point);
                if d < q.range_sq {
                    q.offer(found, AgentId(i), d);
                }
            }
            return;
        }

        let dl = self.nodes[n.left as usize].dist_sq(q.point);
        let dr = self.nodes[n.right as usize].dist_sq(q.point);
        let (first, d_first, second, d_second) =
            if dl <= dr { (n.left, dl, n.right, dr) } else { (n.right, dr, n.left, dl) };

        if q.may_contain(found, d_first) {
            self.query_node(first, q, found);
        }
        if q.may_contain(found, d_second) {
            self.query_node(second, q, found);
        }
    }
}

struct Query {
    point:     Vector2,
    range_sq:  f32,
    max_count: usize,
    exclude:   Option<u32>,
}

impl Query {
    /// Whether a box at squared distance `d` can still improve `found`.
    ///
    /// A full list only admits equal-distance candidates with a smaller
    /// handle, so the bound is inclusive there.
    #[inline]
    fn may_contain(&self, found: &[(AgentId, f32)], d: f32) -> bool {
        if d >= self.range_sq {
            return false;
        }
        match found.last() {
            Some(&(_, worst)) if found.len() == self.max_count => d <= worst,
            _ => true,
        }
    }

    /// Insert `(id, d)` keeping `found` sorted and at most `max_count` long.
    fn offer(&self, found: &mut Vec<(AgentId, f32)>, id: AgentId, d: f32) {
        let before = |e: &(AgentId, f32)| {
            e.1.total_cmp(&d).then(e.0.cmp(&id)) == Ordering::Less
        };
        if found.len() == self.max_count {
            match found.last() {
                Some(last) if !before(last) => {}
                _ => return,
            }
            found.pop();
        }
        let at = found.partition_point(before);
        found.insert(at, (id, d));
    }
}
