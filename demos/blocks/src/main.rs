//! blocks — four groups try to swap corners through the gaps between four
//! square obstacles.
//!
//! A 5×5 block of agents starts in each corner and heads for the opposite
//! corner.  Preferred velocities get a tiny random nudge each step so
//! perfectly symmetric standoffs break.  The run stops when every agent is
//! home or after `MAX_STEPS`, and reports how many made it.  Pass a JSON
//! `SimConfig` path as the first argument to override the built-in
//! parameters.

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

const SEED:       u64  = 42;
const MAX_STEPS:  u64  = 6_000;
const NUDGE:      f32  = 1e-4;
const OUTPUT_DIR: &str = "output/blocks";

fn default_config() -> SimConfig {
    SimConfig {
        time_step: 0.25,
        agent_defaults: AgentParams {
            neighbor_dist:     15.0,
            max_neighbors:     10,
            time_horizon:      5.0,
            time_horizon_obst: 5.0,
            radius:            2.0,
            max_speed:         2.0,
        },
        num_threads:             None,
        snapshot_interval_steps: 4,
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

/// The four obstacles, counter-clockwise, one per quadrant.
fn obstacles() -> [Vec<Vector2>; 4] {
    let square = |x0: f32, y0: f32, x1: f32, y1: f32| {
        vec![
            Vector2::new(x0, y0),
            Vector2::new(x1, y0),
            Vector2::new(x1, y1),
            Vector2::new(x0, y1),
        ]
    };
    [
        square(10.0, 10.0, 40.0, 40.0),
        square(-40.0, 10.0, -10.0, 40.0),
        square(-40.0, -40.0, -10.0, -10.0),
        square(10.0, -40.0, 40.0, -10.0),
    ]
}

fn build() -> Result<(Sim, Vec<Vector2>)> {
    let mut builder = SimBuilder::new(load_config()?);
    let mut goals = Vec::new();
    for i in 0..5 {
        for j in 0..5 {
            let (dx, dy) = (55.0 + i as f32 * 10.0, 55.0 + j as f32 * 10.0);
            for (sx, sy) in [(1.0, 1.0), (-1.0, 1.0), (1.0, -1.0), (-1.0, -1.0)] {
                builder = builder.agent(Vector2::new(sx * dx, sy * dy));
                goals.push(Vector2::new(-sx * 75.0, -sy * 75.0));
            }
        }
    }
    for polygon in obstacles() {
        builder = builder.obstacle(polygon);
    }
    Ok((builder.build()?, goals))
}

fn steer(sim: &mut Sim, goals: &[Vector2], rng: &mut SmallRng) -> Result<()> {
    for (i, &goal) in goals.iter().enumerate() {
        let agent = AgentId(i as u32);
        let mut pref = goal - sim.agent_position(agent)?;
        if pref.abs_sq() > 1.0 {
            pref = pref.normalize();
        }
        let angle = rng.gen_range(0.0..std::f32::consts::TAU);
        let dist = rng.gen_range(0.0..NUDGE);
        pref += Vector2::new(angle.cos(), angle.sin()) * dist;
        sim.set_agent_pref_velocity(agent, pref)?;
    }
    Ok(())
}

fn arrived_count(sim: &Sim, goals: &[Vector2]) -> usize {
    sim.agents()
        .position
        .iter()
        .zip(goals)
        .filter(|(p, g)| p.distance_sq(**g) <= 20.0 * 20.0)
        .count()
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::init();

    let (mut sim, goals) = build()?;
    println!(
        "=== blocks — {} agents, {} obstacle vertices ===",
        sim.agent_count(),
        sim.obstacle_vertex_count()
    );

    let mut rng = SmallRng::seed_from_u64(SEED);
    let mut obs = TrajectoryObserver::new(CsvWriter::new(Path::new(OUTPUT_DIR))?);

    let t0 = Instant::now();
    let mut steps = 0;
    while arrived_count(&sim, &goals) < goals.len() && steps < MAX_STEPS {
        steer(&mut sim, &goals, &mut rng)?;
        sim.step_observed(&mut obs);
        steps += 1;
        if steps % 100 == 0 {
            info!("{}: t = {:.1} s", sim.current_step(), sim.global_time());
        }
    }
    obs.on_run_end(sim.current_step());
    if let Some(e) = obs.take_error() {
        eprintln!("output error: {e}");
    }

    let arrived = arrived_count(&sim, &goals);
    println!(
        "{arrived}/{} agents arrived after {steps} steps ({:.2} s simulated)",
        goals.len(),
        sim.global_time()
    );
    if arrived < goals.len() {
        warn!("stopped at the step limit with {} agents still en route", goals.len() - arrived);
    }
    println!("Wall time {:.3} s; trajectories in {OUTPUT_DIR}/", t0.elapsed().as_secs_f64());
    Ok(())
}
