//! The `Sim` struct and its step loop.

use log::{debug, trace};
use rvo_agent::AgentStore;
use rvo_core::{
    AgentId, AgentParams, ObstacleId, RvoError, RvoResult, SimClock, SimConfig, Step, Vector2,
    VertexId, config::validate_time_step,
};
use rvo_orca::{AgentView, Body, compute_new_velocity, orca_lines};
use rvo_spatial::{AgentTree, ObstacleIndex, ObstacleSet};

use crate::{NoopObserver, SimObserver};

// ── StepPhase ─────────────────────────────────────────────────────────────────

/// Where a step currently is.  Outside of [`Sim::step`] the phase is always
/// `Idle`; observers see the transitions through [`SimObserver::on_phase`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StepPhase {
    #[default]
    Idle,
    /// Building the agent kd-tree snapshot.
    IndexBuild,
    /// Computing every new velocity from the frozen snapshot.
    Compute,
    /// Writing velocities and advancing positions.
    Apply,
}

// ── Per-step read-only view ───────────────────────────────────────────────────

/// Everything the compute phase reads.  Shared by reference across worker
/// threads; nothing in here is mutated until the apply phase.
struct ComputeCtx<'a> {
    agents:        &'a AgentStore,
    tree:          &'a AgentTree,
    obstacles:     &'a ObstacleSet,
    index:         &'a ObstacleIndex,
    inv_time_step: f32,
}

impl ComputeCtx<'_> {
    fn new_velocity(&self, i: usize) -> Vector2 {
        let agents = self.agents;
        let id = AgentId(i as u32);
        let view = AgentView {
            id,
            position:      agents.position[i],
            velocity:      agents.velocity[i],
            pref_velocity: agents.pref_velocity[i],
            params:        agents.params[i],
        };

        let edges: Vec<VertexId> = self
            .index
            .facing_edges(self.obstacles, view.position, view.params.obstacle_range())
            .into_iter()
            .map(|e| e.vertex)
            .collect();

        let neighbors = self
            .tree
            .nearest_within(view.position, view.params.neighbor_dist, view.params.max_neighbors, Some(id))
            .into_iter()
            .map(|(other, _)| {
                let j = other.index();
                Body {
                    id:       other,
                    position: agents.position[j],
                    velocity: agents.velocity[j],
                    radius:   agents.params[j].radius,
                }
            });

        let lines = orca_lines(&view, self.obstacles.vertices(), &edges, neighbors, self.inv_time_step);
        compute_new_velocity(&view, &lines)
    }
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// `Sim` owns every agent and obstacle and drives the step state machine:
///
/// 1. **IndexBuild**: snapshot agent positions into a fresh [`AgentTree`].
/// 2. **Compute** (parallel with the `parallel` feature): for every agent,
///    gather neighbours and obstacle edges, build constraints, and solve.
///    Results land in a buffer indexed by handle; no agent is touched.
/// 3. **Apply** (sequential): copy the buffer into the velocities and move
///    every agent by `velocity * time_step`.
///
/// Obstacles added with [`add_obstacle`](Self::add_obstacle) are ignored by
/// avoidance until [`process_obstacles`](Self::process_obstacles) rebuilds
/// the obstacle index.  Stepping in between is allowed and not detected.
///
/// Create via [`Sim::new`] or [`SimBuilder`][crate::SimBuilder].
pub struct Sim {
    pub(crate) config:         SimConfig,
    pub(crate) clock:          SimClock,
    pub(crate) agents:         AgentStore,
    pub(crate) obstacles:      ObstacleSet,
    pub(crate) obstacle_index: ObstacleIndex,
    pub(crate) phase:          StepPhase,
    /// Dedicated pool when `config.num_threads` is set.
    #[cfg(feature = "parallel")]
    pub(crate) pool:           Option<rayon::ThreadPool>,
}

impl Sim {
    /// Validate `config` and create an empty simulator.
    pub fn new(config: SimConfig) -> crate::SimResult<Self> {
        crate::SimBuilder::new(config).build()
    }

    // ── Clock ─────────────────────────────────────────────────────────────

    pub fn time_step(&self) -> f32 {
        self.clock.time_step
    }

    /// Change the step duration for subsequent steps.
    pub fn set_time_step(&mut self, time_step: f32) -> RvoResult<()> {
        validate_time_step(time_step)?;
        self.clock.time_step = time_step;
        self.config.time_step = time_step;
        Ok(())
    }

    /// Sum of all step durations applied so far.
    pub fn global_time(&self) -> f32 {
        self.clock.global_time
    }

    /// Index of the next step to run (the number of steps completed).
    pub fn current_step(&self) -> Step {
        self.clock.current_step
    }

    pub fn phase(&self) -> StepPhase {
        self.phase
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    // ── Agents ────────────────────────────────────────────────────────────

    pub fn agent_count(&self) -> usize {
        self.agents.count
    }

    /// Read-only access to the full agent arrays.
    pub fn agents(&self) -> &AgentStore {
        &self.agents
    }

    pub fn agent_defaults(&self) -> &AgentParams {
        &self.config.agent_defaults
    }

    /// Replace the parameters given to agents added by
    /// [`add_agent`](Self::add_agent).  Existing agents are unaffected.
    pub fn set_agent_defaults(&mut self, params: AgentParams) -> RvoResult<()> {
        params.validate()?;
        self.config.agent_defaults = params;
        Ok(())
    }

    /// Add an agent with the default parameters and zero velocity.
    pub fn add_agent(&mut self, position: Vector2) -> RvoResult<AgentId> {
        let params = self.config.agent_defaults;
        self.add_agent_with(position, params, Vector2::ZERO)
    }

    /// Add an agent with explicit parameters and initial velocity.
    pub fn add_agent_with(
        &mut self,
        position: Vector2,
        params: AgentParams,
        velocity: Vector2,
    ) -> RvoResult<AgentId> {
        params.validate()?;
        finite("agent position", position)?;
        finite("agent velocity", velocity)?;
        self.agents.push(position, params, velocity)
    }

    pub fn agent_position(&self, agent: AgentId) -> RvoResult<Vector2> {
        self.agents.position_of(agent)
    }

    pub fn agent_velocity(&self, agent: AgentId) -> RvoResult<Vector2> {
        self.agents.velocity_of(agent)
    }

    pub fn agent_pref_velocity(&self, agent: AgentId) -> RvoResult<Vector2> {
        self.agents.pref_velocity_of(agent)
    }

    pub fn agent_params(&self, agent: AgentId) -> RvoResult<AgentParams> {
        self.agents.params_of(agent)
    }

    pub fn set_agent_pref_velocity(&mut self, agent: AgentId, pref: Vector2) -> RvoResult<()> {
        self.agents.check(agent)?;
        finite("preferred velocity", pref)?;
        self.agents.set_pref_velocity(agent, pref)
    }

    pub fn set_agent_position(&mut self, agent: AgentId, position: Vector2) -> RvoResult<()> {
        self.agents.check(agent)?;
        finite("agent position", position)?;
        self.agents.set_position(agent, position)
    }

    pub fn set_agent_velocity(&mut self, agent: AgentId, velocity: Vector2) -> RvoResult<()> {
        self.agents.check(agent)?;
        finite("agent velocity", velocity)?;
        self.agents.set_velocity(agent, velocity)
    }

    pub fn set_agent_params(&mut self, agent: AgentId, params: AgentParams) -> RvoResult<()> {
        self.agents.check(agent)?;
        params.validate()?;
        self.agents.set_params(agent, params)
    }

    // ── Obstacles ─────────────────────────────────────────────────────────

    /// Add a polygon obstacle.
    ///
    /// Counter-clockwise vertex order keeps agents out; clockwise order
    /// keeps them in.  Not considered by avoidance until
    /// [`process_obstacles`](Self::process_obstacles).
    pub fn add_obstacle(&mut self, vertices: &[Vector2]) -> RvoResult<ObstacleId> {
        self.obstacles.add_polygon(vertices)
    }

    /// Rebuild the obstacle index from every obstacle added so far.
    pub fn process_obstacles(&mut self) {
        self.obstacle_index = ObstacleIndex::build(&self.obstacles);
    }

    pub fn obstacles(&self) -> &ObstacleSet {
        &self.obstacles
    }

    /// Total number of obstacle vertices, whether processed or not.
    pub fn obstacle_vertex_count(&self) -> usize {
        self.obstacles.vertex_count()
    }

    pub fn obstacle_vertex(&self, vertex: VertexId) -> Option<Vector2> {
        self.obstacles.vertex(vertex).map(|v| v.point)
    }

    pub fn next_obstacle_vertex(&self, vertex: VertexId) -> Option<VertexId> {
        self.obstacles.vertex(vertex).map(|v| v.next)
    }

    pub fn prev_obstacle_vertex(&self, vertex: VertexId) -> Option<VertexId> {
        self.obstacles.vertex(vertex).map(|v| v.prev)
    }

    pub fn obstacle_vertex_is_convex(&self, vertex: VertexId) -> Option<bool> {
        self.obstacles.vertex(vertex).map(|v| v.convex)
    }

    /// Whether a disk of `radius` can travel from `p1` to `p2` without
    /// touching a processed obstacle.
    pub fn query_visibility(&self, p1: Vector2, p2: Vector2, radius: f32) -> bool {
        self.obstacle_index.query_visibility(p1, p2, radius)
    }

    // ── Stepping ──────────────────────────────────────────────────────────

    /// Advance the simulation by one time step.
    pub fn step(&mut self) {
        self.step_observed(&mut NoopObserver);
    }

    /// Advance by one time step, reporting to `observer`.
    pub fn step_observed<O: SimObserver>(&mut self, observer: &mut O) {
        let step = self.clock.current_step;
        observer.on_step_start(step);

        // ── IndexBuild ────────────────────────────────────────────────────
        self.enter(StepPhase::IndexBuild, step, observer);
        let tree = AgentTree::build(&self.agents.position);

        // ── Compute ───────────────────────────────────────────────────────
        self.enter(StepPhase::Compute, step, observer);
        let velocities = self.compute_velocities(&tree);
        drop(tree);

        // ── Apply ─────────────────────────────────────────────────────────
        self.enter(StepPhase::Apply, step, observer);
        self.agents.apply(&velocities, self.clock.time_step);
        self.clock.advance();

        self.enter(StepPhase::Idle, step, observer);
        let now = self.clock.global_time;
        observer.on_step_end(step, now);
        let interval = self.config.snapshot_interval_steps;
        if interval > 0 && step.0 % interval == 0 {
            observer.on_snapshot(step, now, &self.agents);
        }
    }

    /// Run exactly `n` steps, then call [`SimObserver::on_run_end`].
    pub fn run_steps<O: SimObserver>(&mut self, n: u64, observer: &mut O) {
        debug!("running {n} steps for {} agents from {}", self.agents.count, self.clock.current_step);
        for _ in 0..n {
            self.step_observed(observer);
        }
        observer.on_run_end(self.clock.current_step);
    }

    fn enter<O: SimObserver>(&mut self, phase: StepPhase, step: Step, observer: &mut O) {
        trace!("{step}: {phase:?}");
        self.phase = phase;
        observer.on_phase(step, phase);
    }

    /// New velocity for every agent, in handle order.
    ///
    /// With the `parallel` Cargo feature this runs on Rayon (or on the
    /// dedicated pool when `num_threads` was set).  Each result depends only
    /// on the frozen snapshot, so the output is identical for any thread
    /// count.
    fn compute_velocities(&self, tree: &AgentTree) -> Vec<Vector2> {
        let ctx = ComputeCtx {
            agents:        &self.agents,
            tree,
            obstacles:     &self.obstacles,
            index:         &self.obstacle_index,
            inv_time_step: self.clock.inv_time_step(),
        };
        let n = self.agents.count;

        #[cfg(not(feature = "parallel"))]
        {
            (0..n).map(|i| ctx.new_velocity(i)).collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            let run = || -> Vec<Vector2> {
                (0..n).into_par_iter().map(|i| ctx.new_velocity(i)).collect()
            };
            match &self.pool {
                Some(pool) => pool.install(run),
                None => run(),
            }
        }
    }
}

fn finite(name: &'static str, v: Vector2) -> RvoResult<()> {
    if v.is_finite() {
        Ok(())
    } else {
        let value = if v.x.is_finite() { v.y } else { v.x };
        Err(RvoError::InvalidParameter { name, value, reason: "must be finite" })
    }
}
