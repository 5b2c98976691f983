//! circle — agents spaced on a ring walk to the antipodal point.
//!
//! Every path crosses the centre at roughly the same moment, which is the
//! classic stress case for reciprocal avoidance.  A perfectly symmetric ring
//! can stall in the middle, so preferred velocities get a tiny seeded nudge
//! each step.  Pass a JSON `SimConfig` path as the first argument to override
//! the built-in parameters.
//!
//! ```text
//! RUST_LOG=debug cargo run --release -p circle [config.json]
//! ```

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use log::{info, warn};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use rvo_core::{AgentId, AgentParams, SimConfig, Vector2};
use rvo_output::{CsvWriter, TrajectoryObserver};
use rvo_sim::{Sim, SimBuilder, SimObserver};

// ── Constants ─────────────────────────────────────────────────────────────────

const AGENT_COUNT:   usize = 12;
const RING_RADIUS:   f32   = 25.0;
const MAX_STEPS:     u64   = 10_000;
const SEED:          u64   = 7;
const NUDGE:         f32   = 1e-4;
const OUTPUT_DIR:    &str  = "output/circle";

fn default_config() -> SimConfig {
    SimConfig {
        time_step: 0.05,
        agent_defaults: AgentParams {
            neighbor_dist:     25.0,
            max_neighbors:     30,
            time_horizon:      12.0,
            time_horizon_obst: 6.0,
            radius:            0.5,
            max_speed:         0.3,
        },
        num_threads:             None,
        snapshot_interval_steps: 20,
    }
}

fn load_config() -> Result<SimConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {path}"))
        }
        None => Ok(default_config()),
    }
}

/// Head for the goal, slowing down inside the last unit of distance.
fn steer(sim: &mut Sim, goals: &[Vector2], rng: &mut SmallRng) -> Result<()> {
    for (i, &goal) in goals.iter().enumerate() {
        let agent = AgentId(i as u32);
        let mut pref = goal - sim.agent_position(agent)?;
        if pref.abs_sq() > 1.0 {
            pref = pref.normalize();
        }
        let angle = rng.gen_range(0.0..std::f32::consts::TAU);
        pref += Vector2::new(angle.cos(), angle.sin()) * rng.gen_range(0.0..NUDGE);
        sim.set_agent_pref_velocity(agent, pref)?;
    }
    Ok(())
}

fn arrived_count(sim: &Sim, goals: &[Vector2]) -> usize {
    let radius = sim.agent_defaults().radius;
    sim.agents()
        .position
        .iter()
        .zip(goals)
        .filter(|(p, g)| p.distance_sq(**g) <= radius * radius)
        .count()
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::init();

    let config = load_config()?;
    println!("=== circle — {AGENT_COUNT} agents on a ring of radius {RING_RADIUS} ===");

    let mut builder = SimBuilder::new(config);
    let mut goals = Vec::with_capacity(AGENT_COUNT);
    for i in 0..AGENT_COUNT {
        let angle = std::f32::consts::TAU * i as f32 / AGENT_COUNT as f32;
        let start = Vector2::new(angle.cos(), angle.sin()) * RING_RADIUS;
        builder = builder.agent(start);
        goals.push(-start);
    }
    let mut sim = builder.build()?;

    let writer = CsvWriter::new(Path::new(OUTPUT_DIR))?;
    let mut obs = TrajectoryObserver::new(writer);

    let mut rng = SmallRng::seed_from_u64(SEED);
    let t0 = Instant::now();
    let mut steps = 0;
    while arrived_count(&sim, &goals) < AGENT_COUNT && steps < MAX_STEPS {
        steer(&mut sim, &goals, &mut rng)?;
        sim.step_observed(&mut obs);
        steps += 1;
        if steps % 500 == 0 {
            info!("{}: t = {:.1} s", sim.current_step(), sim.global_time());
        }
    }
    obs.on_run_end(sim.current_step());
    if let Some(e) = obs.take_error() {
        eprintln!("output error: {e}");
    }

    let arrived = arrived_count(&sim, &goals);
    println!(
        "{arrived}/{AGENT_COUNT} agents arrived after {steps} steps ({:.2} s simulated, {:.3} s wall)",
        sim.global_time(),
        t0.elapsed().as_secs_f64()
    );
    if arrived < AGENT_COUNT {
        warn!("stopped at the step limit with {} agents still en route", AGENT_COUNT - arrived);
    }
    println!("Trajectories written to {OUTPUT_DIR}/");
    Ok(())
}
