//! Core agent storage.
//!
//! Every `Vec` field of [`AgentStore`] has exactly `count` elements and the
//! `AgentId` value is the index into all of them:
//!
//! ```ignore
//! let pos = store.position[agent.index()];  // O(1), cache-friendly
//! ```
//!
//! The compute phase reads the whole store through `&AgentStore` from many
//! threads at once; only the single-threaded apply phase takes `&mut`.

use rvo_core::{AgentId, AgentParams, RvoError, RvoResult, Vector2};

// ── AgentState ────────────────────────────────────────────────────────────────

/// Owned copy of one agent's state, as handed to observers and writers.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentState {
    pub id:            AgentId,
    pub position:      Vector2,
    pub velocity:      Vector2,
    pub pref_velocity: Vector2,
    pub params:        AgentParams,
}

// ── AgentStore ────────────────────────────────────────────────────────────────

/// Structure-of-Arrays storage for all agent state.
///
/// Agents are only ever appended, so handles stay dense and stable for the
/// lifetime of the store.
#[derive(Clone, Debug, Default)]
pub struct AgentStore {
    /// Number of agents.  Equals the length of every SoA `Vec`.
    pub count: usize,

    /// Centre of each agent's disk.
    pub position: Vec<Vector2>,

    /// Velocity applied during the most recent step (or the initial one).
    pub velocity: Vec<Vector2>,

    /// Velocity the agent would take with nobody around.  Starts at zero.
    pub pref_velocity: Vec<Vector2>,

    /// Avoidance parameters, fixed per agent unless explicitly replaced.
    pub params: Vec<AgentParams>,
}

impl AgentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate room for `capacity` agents.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            count:         0,
            position:      Vec::with_capacity(capacity),
            velocity:      Vec::with_capacity(capacity),
            pref_velocity: Vec::with_capacity(capacity),
            params:        Vec::with_capacity(capacity),
        }
    }

    /// `true` if there are no agents.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Iterator over all `AgentId`s in ascending index order.
    pub fn agent_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        (0..self.count as u32).map(AgentId)
    }

    /// Append an agent and return its handle.
    ///
    /// `params` must already be validated; the store itself does not inspect
    /// them.  Fails only when the handle space (`u32`) is exhausted.
    pub fn push(
        &mut self,
        position: Vector2,
        params: AgentParams,
        velocity: Vector2,
    ) -> RvoResult<AgentId> {
        let id = AgentId::try_from(self.count)
            .map_err(|_| RvoError::Config("agent handle space exhausted".into()))?;
        self.position.push(position);
        self.velocity.push(velocity);
        self.pref_velocity.push(Vector2::ZERO);
        self.params.push(params);
        self.count += 1;
        Ok(id)
    }

    /// `Ok(index)` if `agent` refers to a stored agent.
    #[inline]
    pub fn check(&self, agent: AgentId) -> RvoResult<usize> {
        let i = agent.index();
        if i < self.count { Ok(i) } else { Err(RvoError::InvalidHandle(agent)) }
    }

    // ── Checked accessors ─────────────────────────────────────────────────

    pub fn position_of(&self, agent: AgentId) -> RvoResult<Vector2> {
        Ok(self.position[self.check(agent)?])
    }

    pub fn velocity_of(&self, agent: AgentId) -> RvoResult<Vector2> {
        Ok(self.velocity[self.check(agent)?])
    }

    pub fn pref_velocity_of(&self, agent: AgentId) -> RvoResult<Vector2> {
        Ok(self.pref_velocity[self.check(agent)?])
    }

    pub fn params_of(&self, agent: AgentId) -> RvoResult<AgentParams> {
        Ok(self.params[self.check(agent)?])
    }

    pub fn set_position(&mut self, agent: AgentId, position: Vector2) -> RvoResult<()> {
        let i = self.check(agent)?;
        self.position[i] = position;
        Ok(())
    }

    pub fn set_velocity(&mut self, agent: AgentId, velocity: Vector2) -> RvoResult<()> {
        let i = self.check(agent)?;
        self.velocity[i] = velocity;
        Ok(())
    }

    pub fn set_pref_velocity(&mut self, agent: AgentId, pref: Vector2) -> RvoResult<()> {
        let i = self.check(agent)?;
        self.pref_velocity[i] = pref;
        Ok(())
    }

    pub fn set_params(&mut self, agent: AgentId, params: AgentParams) -> RvoResult<()> {
        let i = self.check(agent)?;
        self.params[i] = params;
        Ok(())
    }

    /// Snapshot one agent.
    pub fn state(&self, agent: AgentId) -> RvoResult<AgentState> {
        let i = self.check(agent)?;
        Ok(AgentState {
            id:            agent,
            position:      self.position[i],
            velocity:      self.velocity[i],
            pref_velocity: self.pref_velocity[i],
            params:        self.params[i],
        })
    }

    /// Snapshots of all agents in handle order.
    pub fn states(&self) -> impl Iterator<Item = AgentState> + '_ {
        (0..self.count).map(move |i| AgentState {
            id:            AgentId(i as u32),
            position:      self.position[i],
            velocity:      self.velocity[i],
            pref_velocity: self.pref_velocity[i],
            params:        self.params[i],
        })
    }

    // ── Apply phase ───────────────────────────────────────────────────────

    /// Commit a full set of new velocities and advance every position by
    /// `velocity * dt`.
    ///
    /// `new_velocities` is indexed by agent; its length must equal `count`.
    pub fn apply(&mut self, new_velocities: &[Vector2], dt: f32) {
        debug_assert_eq!(new_velocities.len(), self.count);
        for ((pos, vel), &new) in self
            .position
            .iter_mut()
            .zip(self.velocity.iter_mut())
            .zip(new_velocities)
        {
            *vel = new;
            *pos += new * dt;
        }
    }
}
