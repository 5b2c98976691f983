//! Fluent builder for constructing a [`Sim`].

use log::debug;
use rvo_agent::AgentStore;
use rvo_core::{AgentParams, SimClock, SimConfig, Vector2};
use rvo_spatial::{ObstacleIndex, ObstacleSet};

use crate::{Sim, SimResult, StepPhase};

/// One agent queued for insertion at build time.
struct PendingAgent {
    position: Vector2,
    params:   Option<AgentParams>,
    velocity: Vector2,
}

/// Fluent builder for [`Sim`].
///
/// # Required inputs
///
/// - [`SimConfig`]: time step, default agent parameters, thread count, …
///
/// # Optional inputs
///
/// | Method                  | Effect                                           |
/// |-------------------------|--------------------------------------------------|
/// | `.agent(p)`             | Agent at `p` with the default parameters          |
/// | `.agent_with(p, a, v)`  | Agent with explicit parameters and velocity       |
/// | `.obstacle(vertices)`   | Polygon obstacle, indexed before `build` returns  |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(SimConfig::default())
///     .agent(Vector2::new(-10.0, 0.0))
///     .agent(Vector2::new(10.0, 0.0))
///     .obstacle(vec![(-1.0, -1.0).into(), (1.0, -1.0).into(), (0.0, 1.0).into()])
///     .build()?;
/// sim.step();
/// ```
pub struct SimBuilder {
    config:    SimConfig,
    agents:    Vec<PendingAgent>,
    obstacles: Vec<Vec<Vector2>>,
}

impl SimBuilder {
    pub fn new(config: SimConfig) -> Self {
        Self { config, agents: Vec::new(), obstacles: Vec::new() }
    }

    /// Queue an agent with `config.agent_defaults` and zero velocity.
    pub fn agent(mut self, position: Vector2) -> Self {
        self.agents.push(PendingAgent { position, params: None, velocity: Vector2::ZERO });
        self
    }

    /// Queue an agent with explicit parameters and initial velocity.
    pub fn agent_with(mut self, position: Vector2, params: AgentParams, velocity: Vector2) -> Self {
        self.agents.push(PendingAgent { position, params: Some(params), velocity });
        self
    }

    /// Queue a polygon obstacle.  Obstacles given here are processed by
    /// `build`; later ones need [`Sim::process_obstacles`].
    pub fn obstacle(mut self, vertices: Vec<Vector2>) -> Self {
        self.obstacles.push(vertices);
        self
    }

    /// Validate everything and return a ready-to-step [`Sim`].
    ///
    /// Agents receive handles in the order they were queued.
    pub fn build(self) -> SimResult<Sim> {
        self.config.validate()?;

        #[cfg(feature = "parallel")]
        let pool = match self.config.num_threads {
            Some(n) => Some(rayon::ThreadPoolBuilder::new().num_threads(n).build()?),
            None => None,
        };

        let mut sim = Sim {
            clock:          SimClock::new(self.config.time_step),
            agents:         AgentStore::with_capacity(self.agents.len()),
            obstacles:      ObstacleSet::new(),
            obstacle_index: ObstacleIndex::default(),
            phase:          StepPhase::Idle,
            config:         self.config,
            #[cfg(feature = "parallel")]
            pool,
        };

        for a in self.agents {
            let params = a.params.unwrap_or(sim.config.agent_defaults);
            sim.add_agent_with(a.position, params, a.velocity)?;
        }
        if !self.obstacles.is_empty() {
            for polygon in &self.obstacles {
                sim.add_obstacle(polygon)?;
            }
            sim.process_obstacles();
        }

        debug!(
            "sim ready: {} agents, {} obstacle vertices, dt = {}",
            sim.agent_count(),
            sim.obstacle_vertex_count(),
            sim.time_step()
        );
        Ok(sim)
    }
}
