//! One-sided agent–obstacle constraints.
//!
//! Obstacles do not move, so the agent takes the whole correction.  Each
//! nearby edge `v1 → v2` yields at most one line.  The cases, in order:
//!
//! 1. the edge is already covered by an earlier obstacle line: skip;
//! 2. the agent overlaps a vertex or the segment: hard line through zero;
//! 3. otherwise build the truncated cone (cut-off segment plus two legs) and
//!    project the current velocity onto its closest boundary part.
//!
//! Legs at a reflex vertex extend the cut-off line.  A leg that would point
//! into the neighbouring edge is replaced by that edge ("foreign" leg) and
//! never produces a line itself, so agents cannot slip between two edges.

use rvo_core::{RVO_EPSILON, Vector2, VertexId, det};
use rvo_spatial::ObstacleVertex;

use crate::{Body, Line};

/// Constraint on `me` from the edge starting at `edge`, or `None` when no
/// line is needed.
///
/// `existing` are the obstacle lines already emitted for this agent.
pub fn obstacle_line(
    me: &Body,
    vertices: &[ObstacleVertex],
    edge: VertexId,
    time_horizon_obst: f32,
    existing: &[Line],
) -> Option<Line> {
    let inv_th = 1.0 / time_horizon_obst;
    let radius = me.radius;

    let mut v1 = &vertices[edge.index()];
    let mut v2 = &vertices[v1.next.index()];

    let rel_pos1 = v1.point - me.position;
    let rel_pos2 = v2.point - me.position;

    // Both cut-off centres already deep inside an earlier line.
    let covered = existing.iter().any(|line| {
        det(rel_pos1 * inv_th - line.point, line.direction) - inv_th * radius >= -RVO_EPSILON
            && det(rel_pos2 * inv_th - line.point, line.direction) - inv_th * radius
                >= -RVO_EPSILON
    });
    if covered {
        return None;
    }

    let dist_sq1 = rel_pos1.abs_sq();
    let dist_sq2 = rel_pos2.abs_sq();
    let radius_sq = radius * radius;

    let obstacle_vector = v2.point - v1.point;
    let s = (-rel_pos1).dot(obstacle_vector) / obstacle_vector.abs_sq();
    let dist_sq_line = (-rel_pos1 - obstacle_vector * s).abs_sq();

    // ── Collisions ────────────────────────────────────────────────────────
    if s < 0.0 && dist_sq1 <= radius_sq {
        // Left vertex; ignored if reflex.
        return v1.convex.then(|| Line::new(Vector2::ZERO, rel_pos1.perp().normalize()));
    }
    if s > 1.0 && dist_sq2 <= radius_sq {
        // Right vertex; ignored if reflex or owned by the next edge.
        return (v2.convex && det(rel_pos2, v2.unit_dir) >= 0.0)
            .then(|| Line::new(Vector2::ZERO, rel_pos2.perp().normalize()));
    }
    if (0.0..1.0).contains(&s) && dist_sq_line <= radius_sq {
        return Some(Line::new(Vector2::ZERO, -v1.unit_dir));
    }

    // ── Legs ──────────────────────────────────────────────────────────────
    let (mut left_leg, mut right_leg);
    if s < 0.0 && dist_sq_line <= radius_sq {
        // Seen obliquely: the left vertex alone defines the obstacle.
        if !v1.convex {
            return None;
        }
        v2 = v1;
        (left_leg, right_leg) = tangent_legs(rel_pos1, dist_sq1, radius);
    } else if s > 1.0 && dist_sq_line <= radius_sq {
        // Seen obliquely: the right vertex alone defines the obstacle.
        if !v2.convex {
            return None;
        }
        v1 = v2;
        (left_leg, right_leg) = tangent_legs(rel_pos2, dist_sq2, radius);
    } else {
        left_leg = if v1.convex {
            tangent_legs(rel_pos1, dist_sq1, radius).0
        } else {
            -v1.unit_dir
        };
        right_leg = if v2.convex {
            tangent_legs(rel_pos2, dist_sq2, radius).1
        } else {
            v1.unit_dir
        };
    }
    let single_vertex = std::ptr::eq(v1, v2);

    // Foreign legs.
    let left_neighbor = &vertices[v1.prev.index()];
    let mut left_foreign = false;
    let mut right_foreign = false;
    if v1.convex && det(left_leg, -left_neighbor.unit_dir) >= 0.0 {
        left_leg = -left_neighbor.unit_dir;
        left_foreign = true;
    }
    if v2.convex && det(right_leg, v2.unit_dir) <= 0.0 {
        right_leg = v2.unit_dir;
        right_foreign = true;
    }

    // ── Projection of the current velocity ────────────────────────────────
    let left_cutoff = (v1.point - me.position) * inv_th;
    let right_cutoff = (v2.point - me.position) * inv_th;
    let cutoff_vec = right_cutoff - left_cutoff;

    let t = if single_vertex {
        0.5
    } else {
        (me.velocity - left_cutoff).dot(cutoff_vec) / cutoff_vec.abs_sq()
    };
    let t_left = (me.velocity - left_cutoff).dot(left_leg);
    let t_right = (me.velocity - right_cutoff).dot(right_leg);

    if (t < 0.0 && t_left < 0.0) || (single_vertex && t_left < 0.0 && t_right < 0.0) {
        return Some(cutoff_circle_line(me.velocity, left_cutoff, radius * inv_th));
    }
    if t > 1.0 && t_right < 0.0 {
        return Some(cutoff_circle_line(me.velocity, right_cutoff, radius * inv_th));
    }

    let dist_sq_cutoff = if t < 0.0 || t > 1.0 || single_vertex {
        f32::INFINITY
    } else {
        (me.velocity - (left_cutoff + cutoff_vec * t)).abs_sq()
    };
    let dist_sq_left = if t_left < 0.0 {
        f32::INFINITY
    } else {
        (me.velocity - (left_cutoff + left_leg * t_left)).abs_sq()
    };
    let dist_sq_right = if t_right < 0.0 {
        f32::INFINITY
    } else {
        (me.velocity - (right_cutoff + right_leg * t_right)).abs_sq()
    };

    let offset = |direction: Vector2| direction.perp() * (radius * inv_th);
    if dist_sq_cutoff <= dist_sq_left && dist_sq_cutoff <= dist_sq_right {
        let direction = -v1.unit_dir;
        Some(Line::new(left_cutoff + offset(direction), direction))
    } else if dist_sq_left <= dist_sq_right {
        if left_foreign {
            return None;
        }
        Some(Line::new(left_cutoff + offset(left_leg), left_leg))
    } else {
        if right_foreign {
            return None;
        }
        let direction = -right_leg;
        Some(Line::new(right_cutoff + offset(direction), direction))
    }
}

/// Left and right tangent directions from the agent to a disk of `radius`
/// around the relative vertex position `rel`.
fn tangent_legs(rel: Vector2, dist_sq: f32, radius: f32) -> (Vector2, Vector2) {
    let leg = (dist_sq - radius * radius).sqrt();
    let left = Vector2::new(rel.x * leg - rel.y * radius, rel.x * radius + rel.y * leg) / dist_sq;
    let right = Vector2::new(rel.x * leg + rel.y * radius, -rel.x * radius + rel.y * leg) / dist_sq;
    (left, right)
}

fn cutoff_circle_line(velocity: Vector2, centre: Vector2, scaled_radius: f32) -> Line {
    let unit_w = (velocity - centre).normalize();
    Line::new(centre + unit_w * scaled_radius, Vector2::new(unit_w.y, -unit_w.x))
}
