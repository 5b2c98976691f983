//! Per-agent entry point: gather constraints, then solve.

use rvo_core::{AgentId, AgentParams, Vector2, VertexId};
use rvo_spatial::ObstacleVertex;

use crate::agent::agent_line;
use crate::lp::solve;
use crate::obstacle::obstacle_line;
use crate::Line;

/// Minimal kinematic view of an agent, as seen by its neighbours.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Body {
    pub id:       AgentId,
    pub position: Vector2,
    pub velocity: Vector2,
    pub radius:   f32,
}

/// Everything the constraint builder needs to know about the agent whose
/// velocity is being chosen.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AgentView {
    pub id:            AgentId,
    pub position:      Vector2,
    pub velocity:      Vector2,
    pub pref_velocity: Vector2,
    pub params:        AgentParams,
}

impl AgentView {
    #[inline]
    pub fn body(&self) -> Body {
        Body {
            id:       self.id,
            position: self.position,
            velocity: self.velocity,
            radius:   self.params.radius,
        }
    }
}

/// Ordered constraint list for one agent.  `lines[..obstacle_count]` come
/// from obstacles and are never relaxed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OrcaLines {
    pub lines:          Vec<Line>,
    pub obstacle_count: usize,
}

impl OrcaLines {
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn agent_lines(&self) -> &[Line] {
        &self.lines[self.obstacle_count..]
    }
}

/// Build the constraints for `agent`.
///
/// `edges` must be the facing obstacle edges ordered nearest first and
/// `neighbors` the agent neighbours ordered nearest first; obstacle lines
/// are emitted before agent lines.
pub fn orca_lines<I>(
    agent: &AgentView,
    vertices: &[ObstacleVertex],
    edges: &[VertexId],
    neighbors: I,
    inv_time_step: f32,
) -> OrcaLines
where
    I: IntoIterator<Item = Body>,
{
    let me = agent.body();
    let mut lines = Vec::with_capacity(edges.len() + agent.params.max_neighbors);

    for &edge in edges {
        if let Some(line) =
            obstacle_line(&me, vertices, edge, agent.params.time_horizon_obst, &lines)
        {
            lines.push(line);
        }
    }
    let obstacle_count = lines.len();

    lines.extend(
        neighbors
            .into_iter()
            .map(|other| agent_line(&me, &other, agent.params.time_horizon, inv_time_step)),
    );

    OrcaLines { lines, obstacle_count }
}

/// The admissible velocity closest to `agent.pref_velocity`, never longer
/// than `max_speed`.
pub fn compute_new_velocity(agent: &AgentView, lines: &OrcaLines) -> Vector2 {
    solve(&lines.lines, lines.obstacle_count, agent.params.max_speed, agent.pref_velocity)
}
