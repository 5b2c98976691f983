//! Linear programs over half-planes inside the max-speed disk.
//!
//! * [`linear_program1`] optimises along a single line, clipped by the disk
//!   and by every earlier line.
//! * [`linear_program2`] adds lines one at a time (incremental 2-D LP).  Each
//!   violated line moves the optimum onto itself via `linear_program1`.
//! * [`linear_program3`] takes over when the 2-D program is infeasible: it
//!   minimises the largest penetration of the agent lines while obstacle
//!   lines stay hard.
//!
//! All three are deterministic functions of their inputs; line order matters
//! and is fixed by the caller (obstacle lines first).

use rvo_core::{RVO_EPSILON, Vector2, det};

use crate::Line;

/// The 2-D program ran out of room at `line`.
///
/// `partial` is the best velocity found for `lines[..line]`; it is the
/// starting point for [`linear_program3`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Infeasible {
    pub line:    usize,
    pub partial: Vector2,
}

/// Optimise on `lines[line_no]` subject to the disk of `radius` and to
/// `lines[..line_no]`.
///
/// With `direction_opt`, `opt` is a unit direction and the result is the
/// feasible point furthest along it; otherwise the result is the feasible
/// point closest to `opt`.  `None` when the feasible interval is empty.
pub fn linear_program1(
    lines: &[Line],
    line_no: usize,
    radius: f32,
    opt: Vector2,
    direction_opt: bool,
) -> Option<Vector2> {
    let line = &lines[line_no];
    let dot = line.point.dot(line.direction);
    let discriminant = dot * dot + radius * radius - line.point.abs_sq();
    if discriminant < 0.0 {
        // The line misses the disk entirely.
        return None;
    }

    let sqrt_disc = discriminant.sqrt();
    let mut t_left = -dot - sqrt_disc;
    let mut t_right = -dot + sqrt_disc;

    for prev in &lines[..line_no] {
        let denominator = det(line.direction, prev.direction);
        let numerator = det(prev.direction, line.point - prev.point);

        if denominator.abs() <= RVO_EPSILON {
            // Parallel: either `prev` excludes the whole line or none of it.
            if numerator < 0.0 {
                return None;
            }
            continue;
        }

        let t = numerator / denominator;
        if denominator >= 0.0 {
            t_right = t_right.min(t);
        } else {
            t_left = t_left.max(t);
        }
        if t_left > t_right {
            return None;
        }
    }

    let t = if direction_opt {
        if opt.dot(line.direction) > 0.0 { t_right } else { t_left }
    } else {
        let t = line.direction.dot(opt - line.point);
        if t < t_left {
            t_left
        } else if t > t_right {
            t_right
        } else {
            t
        }
    };
    Some(line.point + line.direction * t)
}

/// Incremental 2-D program: the point of the disk satisfying every line
/// that is closest to `opt` (or furthest along it with `direction_opt`).
pub fn linear_program2(
    lines: &[Line],
    radius: f32,
    opt: Vector2,
    direction_opt: bool,
) -> Result<Vector2, Infeasible> {
    let mut result = if direction_opt {
        opt * radius
    } else {
        opt.clamp_length(radius)
    };

    for (i, line) in lines.iter().enumerate() {
        if line.is_violated_by(result) {
            match linear_program1(lines, i, radius, opt, direction_opt) {
                Some(v) => result = v,
                None => return Err(Infeasible { line: i, partial: result }),
            }
        }
    }
    Ok(result)
}

/// 3-D relaxation, starting from the failure reported by
/// [`linear_program2`].
///
/// `lines[..obstacle_count]` are never relaxed.  Always returns a velocity
/// inside the disk.
pub fn linear_program3(
    lines: &[Line],
    obstacle_count: usize,
    begin_line: usize,
    radius: f32,
    mut result: Vector2,
) -> Vector2 {
    let mut distance = 0.0_f32;
    let mut proj_lines: Vec<Line> = Vec::with_capacity(lines.len());

    for i in begin_line..lines.len() {
        let line_i = &lines[i];
        if line_i.penetration(result) <= distance {
            // Already no worse than the current worst penetration.
            continue;
        }

        proj_lines.clear();
        proj_lines.extend_from_slice(&lines[..obstacle_count]);

        // Empty when `i` is itself an obstacle line.
        for line_j in &lines[obstacle_count.min(i)..i] {
            let determinant = det(line_i.direction, line_j.direction);
            let point = if determinant.abs() <= RVO_EPSILON {
                if line_i.direction.dot(line_j.direction) > 0.0 {
                    // Same direction: `line_j` adds nothing.
                    continue;
                }
                // Opposite direction: bisect.
                (line_i.point + line_j.point) * 0.5
            } else {
                line_i.point
                    + line_i.direction
                        * (det(line_j.direction, line_i.point - line_j.point) / determinant)
            };
            proj_lines.push(Line::new(point, (line_j.direction - line_i.direction).normalize()));
        }

        // Push as far as possible into the admissible side of `line_i`.
        if let Ok(v) = linear_program2(&proj_lines, radius, line_i.direction.perp(), true) {
            result = v;
        }
        distance = line_i.penetration(result);
    }
    // Projected-line round-off can leave the point just outside the disk.
    result.clamp_length(radius)
}

/// Full solve: the 2-D program, falling back to the relaxation when it is
/// infeasible.
pub fn solve(lines: &[Line], obstacle_count: usize, max_speed: f32, pref: Vector2) -> Vector2 {
    match linear_program2(lines, max_speed, pref, false) {
        Ok(v) => v,
        Err(Infeasible { line, partial }) => {
            log::trace!("2-D program infeasible at line {line} of {}; relaxing", lines.len());
            linear_program3(lines, obstacle_count, line, max_speed, partial)
        }
    }
}
