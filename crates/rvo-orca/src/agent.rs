//! Reciprocal agent–agent constraint.
//!
//! The velocity obstacle of `other` relative to `me` is a cone truncated by
//! a circle of radius `r/τ` around `p/τ` (p = relative position, r =
//! combined radius, τ = time horizon).  The constraint line is placed half
//! way along the smallest change `u` that takes the relative velocity out of
//! the obstacle, so each side of the pair does half the work.

use rvo_core::{AgentId, Vector2, det};

use crate::{Body, Line};

/// Constraint on `me` induced by `other`.
///
/// `inv_time_step` is used instead of the horizon when the two disks already
/// overlap, so the pair separates within one step.
pub fn agent_line(me: &Body, other: &Body, time_horizon: f32, inv_time_step: f32) -> Line {
    let rel_pos = other.position - me.position;
    let rel_vel = me.velocity - other.velocity;
    let dist_sq = rel_pos.abs_sq();
    let combined_radius = me.radius + other.radius;
    let combined_radius_sq = combined_radius * combined_radius;

    let (direction, u) = if dist_sq > combined_radius_sq {
        let inv_time_horizon = 1.0 / time_horizon;
        // Vector from cut-off centre to relative velocity.
        let w = rel_vel - rel_pos * inv_time_horizon;
        let w_len_sq = w.abs_sq();
        let dot1 = w.dot(rel_pos);

        if dot1 < 0.0 && dot1 * dot1 > combined_radius_sq * w_len_sq {
            // Project on cut-off circle.
            let w_len = w_len_sq.sqrt();
            let unit_w = w / w_len;
            let direction = Vector2::new(unit_w.y, -unit_w.x);
            (direction, unit_w * (combined_radius * inv_time_horizon - w_len))
        } else {
            // Project on legs.
            let leg = (dist_sq - combined_radius_sq).sqrt();
            let direction = if det(rel_pos, w) > 0.0 {
                // Left leg.
                Vector2::new(
                    rel_pos.x * leg - rel_pos.y * combined_radius,
                    rel_pos.x * combined_radius + rel_pos.y * leg,
                ) / dist_sq
            } else {
                // Right leg.
                -Vector2::new(
                    rel_pos.x * leg + rel_pos.y * combined_radius,
                    -rel_pos.x * combined_radius + rel_pos.y * leg,
                ) / dist_sq
            };
            let u = direction * rel_vel.dot(direction) - rel_vel;
            (direction, u)
        }
    } else {
        // Already overlapping: cut-off circle for one time step.
        let w = rel_vel - rel_pos * inv_time_step;
        let w_len = w.length();
        let unit_w = if w_len > 0.0 { w / w_len } else { separation_axis(me.id, other.id) };
        let direction = Vector2::new(unit_w.y, -unit_w.x);
        (direction, unit_w * (combined_radius * inv_time_step - w_len))
    };

    Line::new(me.velocity + u * 0.5, direction)
}

/// Push direction for two coincident agents moving identically.  The lower
/// handle goes left, the higher one right, so the pair splits.
fn separation_axis(me: AgentId, other: AgentId) -> Vector2 {
    if me < other { Vector2::new(-1.0, 0.0) } else { Vector2::new(1.0, 0.0) }
}
