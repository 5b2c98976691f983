//! Integration tests for rvo-sim.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rvo_agent::AgentStore;
use rvo_core::{AgentId, AgentParams, RvoError, SimConfig, Step, Vector2, VertexId, dist_sq_point_segment};

use crate::{Sim, SimBuilder, SimError, SimObserver, StepPhase};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn test_config(time_step: f32) -> SimConfig {
    SimConfig {
        time_step,
        agent_defaults: small_params(),
        num_threads: Some(1),
        snapshot_interval_steps: 1,
    }
}

fn small_params() -> AgentParams {
    AgentParams {
        neighbor_dist:     5.0,
        max_neighbors:     10,
        time_horizon:      5.0,
        time_horizon_obst: 2.0,
        radius:            0.5,
        max_speed:         1.0,
    }
}

fn v(x: f32, y: f32) -> Vector2 {
    Vector2::new(x, y)
}

/// Axis-aligned square centred on the origin, counter-clockwise.
fn ccw_square(half: f32) -> Vec<Vector2> {
    vec![v(-half, -half), v(half, -half), v(half, half), v(-half, half)]
}

/// Unit-speed (or slower near the goal) preferred velocity towards `goal`.
fn steer(sim: &mut Sim, agent: AgentId, goal: Vector2) {
    let mut pref = goal - sim.agent_position(agent).unwrap();
    if pref.abs_sq() > 1.0 {
        pref = pref.normalize();
    }
    sim.set_agent_pref_velocity(agent, pref).unwrap();
}

/// Smallest ratio of centre distance to combined radius over all pairs.
fn min_clearance_ratio(sim: &Sim) -> f32 {
    let agents = sim.agents();
    let mut worst = f32::INFINITY;
    for i in 0..agents.count {
        for j in (i + 1)..agents.count {
            let d = agents.position[i].distance_sq(agents.position[j]).sqrt();
            let r = agents.params[i].radius + agents.params[j].radius;
            worst = worst.min(d / r);
        }
    }
    worst
}

/// 4×4 grid of agents, each heading for the point mirrored through the
/// origin so every path crosses the centre.
fn crossing_grid(num_threads: Option<usize>) -> (Sim, Vec<Vector2>) {
    let mut config = test_config(0.1);
    config.num_threads = num_threads;
    let mut builder = SimBuilder::new(config);
    let mut goals = Vec::new();
    for row in 0..4 {
        for col in 0..4 {
            let p = v(col as f32 * 6.0 - 9.0, row as f32 * 6.0 - 9.0);
            builder = builder.agent(p);
            goals.push(-p);
        }
    }
    (builder.build().unwrap(), goals)
}

fn run_to_goals(sim: &mut Sim, goals: &[Vector2], steps: usize) {
    for _ in 0..steps {
        for (i, &goal) in goals.iter().enumerate() {
            steer(sim, AgentId(i as u32), goal);
        }
        sim.step();
    }
}

/// Records every callback in order.
#[derive(Default)]
struct Recorder {
    events:    Vec<String>,
    phases:    Vec<StepPhase>,
    snapshots: Vec<(Step, usize)>,
    run_end:   Option<Step>,
}

impl SimObserver for Recorder {
    fn on_step_start(&mut self, step: Step) {
        self.events.push(format!("start {step}"));
    }

    fn on_phase(&mut self, _step: Step, phase: StepPhase) {
        self.phases.push(phase);
    }

    fn on_step_end(&mut self, step: Step, global_time: f32) {
        self.events.push(format!("end {step} {global_time}"));
    }

    fn on_snapshot(&mut self, step: Step, _global_time: f32, agents: &AgentStore) {
        self.snapshots.push((step, agents.count));
    }

    fn on_run_end(&mut self, final_step: Step) {
        self.run_end = Some(final_step);
    }
}

// ── SimBuilder validation ─────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;

    #[test]
    fn builds_empty_sim() {
        let sim = Sim::new(test_config(0.25)).unwrap();
        assert_eq!(sim.agent_count(), 0);
        assert_eq!(sim.obstacle_vertex_count(), 0);
        assert_eq!(sim.current_step(), Step::ZERO);
        assert_eq!(sim.global_time(), 0.0);
        assert_eq!(sim.phase(), StepPhase::Idle);
    }

    #[test]
    fn non_positive_time_step_rejected() {
        for dt in [0.0, -0.1, f32::NAN] {
            let result = Sim::new(test_config(dt));
            assert!(matches!(
                result,
                Err(SimError::Core(RvoError::InvalidParameter { name: "time_step", .. }))
            ));
        }
    }

    #[test]
    fn zero_threads_rejected() {
        let mut config = test_config(0.25);
        config.num_threads = Some(0);
        assert!(matches!(Sim::new(config), Err(SimError::Core(RvoError::Config(_)))));
    }

    #[test]
    fn invalid_defaults_rejected() {
        let mut config = test_config(0.25);
        config.agent_defaults.radius = 0.0;
        assert!(Sim::new(config).is_err());
    }

    #[test]
    fn queued_agents_get_sequential_handles() {
        let custom = AgentParams { radius: 0.2, ..small_params() };
        let sim = SimBuilder::new(test_config(0.25))
            .agent(v(0.0, 0.0))
            .agent_with(v(3.0, 0.0), custom, v(0.5, 0.0))
            .agent(v(6.0, 0.0))
            .build()
            .unwrap();
        assert_eq!(sim.agent_count(), 3);
        assert_eq!(sim.agent_position(AgentId(1)).unwrap(), v(3.0, 0.0));
        assert_eq!(sim.agent_velocity(AgentId(1)).unwrap(), v(0.5, 0.0));
        assert_eq!(sim.agent_params(AgentId(1)).unwrap().radius, 0.2);
        assert_eq!(sim.agent_params(AgentId(2)).unwrap(), small_params());
    }

    #[test]
    fn queued_obstacles_are_processed() {
        let sim = SimBuilder::new(test_config(0.25)).obstacle(ccw_square(1.0)).build().unwrap();
        assert_eq!(sim.obstacle_vertex_count(), 4);
        assert!(!sim.query_visibility(v(-5.0, 0.0), v(5.0, 0.0), 0.1));
    }

    #[test]
    fn bad_queued_obstacle_fails_build() {
        let result = SimBuilder::new(test_config(0.25))
            .obstacle(vec![v(0.0, 0.0), v(1.0, 0.0)])
            .build();
        assert!(matches!(
            result,
            Err(SimError::Core(RvoError::InvalidObstacle { vertices: 2 }))
        ));
    }
}

// ── Agent and obstacle API ────────────────────────────────────────────────────

#[cfg(test)]
mod api_tests {
    use super::*;

    #[test]
    fn unknown_handle_rejected_everywhere() {
        let mut sim = Sim::new(test_config(0.25)).unwrap();
        sim.add_agent(v(0.0, 0.0)).unwrap();
        let ghost = AgentId(1);
        assert!(matches!(sim.agent_position(ghost), Err(RvoError::InvalidHandle(_))));
        assert!(matches!(sim.agent_velocity(ghost), Err(RvoError::InvalidHandle(_))));
        assert!(matches!(sim.agent_params(ghost), Err(RvoError::InvalidHandle(_))));
        assert!(matches!(
            sim.set_agent_pref_velocity(ghost, v(1.0, 0.0)),
            Err(RvoError::InvalidHandle(_))
        ));
        assert!(matches!(
            sim.set_agent_position(ghost, v(1.0, 0.0)),
            Err(RvoError::InvalidHandle(_))
        ));
        // Handle checked before the value.
        assert!(matches!(
            sim.set_agent_velocity(ghost, v(f32::NAN, 0.0)),
            Err(RvoError::InvalidHandle(_))
        ));
    }

    #[test]
    fn pref_velocity_round_trips() {
        let mut sim = Sim::new(test_config(0.25)).unwrap();
        let a = sim.add_agent_with(v(0.0, 0.0), small_params(), v(0.2, 0.1)).unwrap();
        assert_eq!(sim.agent_pref_velocity(a).unwrap(), Vector2::ZERO);
        sim.set_agent_pref_velocity(a, v(0.3, -0.7)).unwrap();
        assert_eq!(sim.agent_pref_velocity(a).unwrap(), v(0.3, -0.7));
        // The current velocity only changes on a step.
        assert_eq!(sim.agent_velocity(a).unwrap(), v(0.2, 0.1));
        assert_eq!(sim.agent_position(a).unwrap(), v(0.0, 0.0));
    }

    #[test]
    fn non_finite_values_rejected() {
        let mut sim = Sim::new(test_config(0.25)).unwrap();
        let a = sim.add_agent(v(0.0, 0.0)).unwrap();
        assert!(matches!(
            sim.set_agent_pref_velocity(a, v(f32::INFINITY, 0.0)),
            Err(RvoError::InvalidParameter { .. })
        ));
        assert!(sim.add_agent(v(0.0, f32::NAN)).is_err());
        assert_eq!(sim.agent_count(), 1);
    }

    #[test]
    fn invalid_params_rejected() {
        let mut sim = Sim::new(test_config(0.25)).unwrap();
        let a = sim.add_agent(v(0.0, 0.0)).unwrap();
        let bad = AgentParams { max_speed: -1.0, ..small_params() };
        assert!(sim.set_agent_params(a, bad).is_err());
        assert!(sim.add_agent_with(v(1.0, 0.0), bad, Vector2::ZERO).is_err());
        assert!(sim.set_agent_defaults(bad).is_err());
        assert_eq!(sim.agent_params(a).unwrap(), small_params());
    }

    #[test]
    fn defaults_apply_to_later_agents_only() {
        let mut sim = Sim::new(test_config(0.25)).unwrap();
        let a = sim.add_agent(v(0.0, 0.0)).unwrap();
        let bigger = AgentParams { radius: 2.0, ..small_params() };
        sim.set_agent_defaults(bigger).unwrap();
        let b = sim.add_agent(v(10.0, 0.0)).unwrap();
        assert_eq!(sim.agent_params(a).unwrap().radius, 0.5);
        assert_eq!(sim.agent_params(b).unwrap().radius, 2.0);
    }

    #[test]
    fn degenerate_obstacle_rejected() {
        let mut sim = Sim::new(test_config(0.25)).unwrap();
        assert!(matches!(
            sim.add_obstacle(&[v(0.0, 0.0)]),
            Err(RvoError::InvalidObstacle { vertices: 1 })
        ));
        let mut repeated = ccw_square(1.0);
        let first = repeated[0];
        repeated.insert(1, first);
        assert!(matches!(
            sim.add_obstacle(&repeated),
            Err(RvoError::DegenerateEdge { vertex: 0 })
        ));
        assert_eq!(sim.obstacle_vertex_count(), 0);
    }

    #[test]
    fn obstacle_introspection() {
        let mut sim = Sim::new(test_config(0.25)).unwrap();
        sim.add_obstacle(&ccw_square(1.0)).unwrap();
        let mut cw = ccw_square(10.0);
        cw.reverse();
        sim.add_obstacle(&cw).unwrap();
        sim.process_obstacles();

        assert_eq!(sim.obstacle_vertex_count(), 8);
        assert_eq!(sim.obstacle_vertex(VertexId(2)), Some(v(1.0, 1.0)));
        assert_eq!(sim.next_obstacle_vertex(VertexId(3)), Some(VertexId(0)));
        assert_eq!(sim.prev_obstacle_vertex(VertexId(0)), Some(VertexId(3)));
        assert_eq!(sim.next_obstacle_vertex(VertexId(7)), Some(VertexId(4)));
        assert_eq!(sim.obstacle_vertex_is_convex(VertexId(0)), Some(true));
        assert_eq!(sim.obstacle_vertex_is_convex(VertexId(5)), Some(false));
        assert_eq!(sim.obstacle_vertex(VertexId(8)), None);
        assert_eq!(sim.next_obstacle_vertex(VertexId(8)), None);
    }

    #[test]
    fn visibility_queries() {
        let sim = SimBuilder::new(test_config(0.25)).obstacle(ccw_square(1.0)).build().unwrap();
        // Straight through the square.
        assert!(!sim.query_visibility(v(-5.0, 0.0), v(5.0, 0.0), 0.0));
        // Well clear above it.
        assert!(sim.query_visibility(v(-5.0, 3.0), v(5.0, 3.0), 0.5));
        // Clear for a point, blocked for a wide disk.
        assert!(sim.query_visibility(v(-5.0, 1.5), v(5.0, 1.5), 0.0));
        assert!(!sim.query_visibility(v(-5.0, 1.5), v(5.0, 1.5), 1.0));
    }

    #[test]
    fn time_step_can_change_between_steps() {
        let mut sim = Sim::new(test_config(0.25)).unwrap();
        sim.step();
        assert!(sim.set_time_step(0.0).is_err());
        sim.set_time_step(0.5).unwrap();
        sim.step();
        assert_eq!(sim.current_step(), Step(2));
        assert!((sim.global_time() - 0.75).abs() < 1e-6);
        assert_eq!(sim.config().time_step, 0.5);
    }
}

// ── Stepping behaviour ────────────────────────────────────────────────────────

#[cfg(test)]
mod step_tests {
    use super::*;

    #[test]
    fn isolated_agent_follows_preference() {
        let mut sim = Sim::new(test_config(0.25)).unwrap();
        let a = sim.add_agent(v(0.0, 0.0)).unwrap();
        sim.set_agent_pref_velocity(a, v(0.5, 0.0)).unwrap();
        sim.step();
        assert_eq!(sim.agent_velocity(a).unwrap(), v(0.5, 0.0));
        assert_eq!(sim.agent_position(a).unwrap(), v(0.125, 0.0));
    }

    #[test]
    fn preference_clamped_to_max_speed() {
        let mut sim = Sim::new(test_config(0.25)).unwrap();
        let a = sim.add_agent(v(0.0, 0.0)).unwrap();
        sim.set_agent_pref_velocity(a, v(3.0, 4.0)).unwrap();
        sim.step();
        let vel = sim.agent_velocity(a).unwrap();
        assert!((vel.length() - 1.0).abs() < 1e-5);
        assert!((vel.x - 0.6).abs() < 1e-5 && (vel.y - 0.8).abs() < 1e-5);
    }

    #[test]
    fn empty_sim_still_advances_clock() {
        let mut sim = Sim::new(test_config(0.25)).unwrap();
        for _ in 0..4 {
            sim.step();
        }
        assert_eq!(sim.current_step(), Step(4));
        assert_eq!(sim.global_time(), 1.0);
    }

    #[test]
    fn head_on_pair_is_point_symmetric() {
        let mut sim = SimBuilder::new(test_config(0.25))
            .agent(v(-5.0, 0.0))
            .agent(v(5.0, 0.0))
            .build()
            .unwrap();
        let (a, b) = (AgentId(0), AgentId(1));
        sim.set_agent_pref_velocity(a, v(1.0, 0.0)).unwrap();
        sim.set_agent_pref_velocity(b, v(-1.0, 0.0)).unwrap();

        let mut dodged = false;
        for _ in 0..100 {
            sim.step();
            let pa = sim.agent_position(a).unwrap();
            let pb = sim.agent_position(b).unwrap();
            assert!((pa + pb).length() < 1e-4, "asymmetric: {pa} vs {pb}");
            assert!(pa.distance_sq(pb) >= 0.99 * 0.99);
            dodged |= pa.y.abs() > 0.1;
        }
        assert!(dodged);
        assert!(sim.agent_position(a).unwrap().x > 5.0);
        assert!(sim.agent_position(b).unwrap().x < -5.0);
    }

    #[test]
    fn crossing_agents_never_overlap() {
        let (mut sim, goals) = crossing_grid(Some(1));
        for _ in 0..300 {
            run_to_goals(&mut sim, &goals, 1);
            let ratio = min_clearance_ratio(&sim);
            assert!(ratio >= 0.95, "overlap at {}: ratio {ratio}", sim.current_step());
        }
    }

    #[test]
    fn random_crowd_never_overlaps() {
        let mut rng = SmallRng::seed_from_u64(11);
        let mut sim = Sim::new(test_config(0.1)).unwrap();
        let mut goals = Vec::new();
        while sim.agent_count() < 24 {
            let p = v(rng.gen_range(-15.0..15.0), rng.gen_range(-15.0..15.0));
            let free = sim.agents().position.iter().all(|q| q.distance_sq(p) > 2.0 * 2.0);
            if free {
                sim.add_agent(p).unwrap();
                goals.push(v(rng.gen_range(-15.0..15.0), rng.gen_range(-15.0..15.0)));
            }
        }
        for _ in 0..300 {
            run_to_goals(&mut sim, &goals, 1);
            assert!(min_clearance_ratio(&sim) >= 0.95);
        }
    }

    #[test]
    fn results_independent_of_thread_count() {
        let runs: Vec<Vec<Vector2>> = [Some(1), Some(4), None]
            .into_iter()
            .map(|threads| {
                let (mut sim, goals) = crossing_grid(threads);
                run_to_goals(&mut sim, &goals, 80);
                sim.agents().position.clone()
            })
            .collect();
        for other in &runs[1..] {
            for (p, q) in runs[0].iter().zip(other) {
                assert_eq!(p.x.to_bits(), q.x.to_bits());
                assert_eq!(p.y.to_bits(), q.y.to_bits());
            }
        }
    }

    #[test]
    fn agent_added_mid_run_participates() {
        let mut sim = Sim::new(test_config(0.25)).unwrap();
        let a = sim.add_agent(v(-4.0, 0.0)).unwrap();
        sim.set_agent_pref_velocity(a, v(1.0, 0.0)).unwrap();
        sim.step();
        let b = sim.add_agent(v(1.0, 0.0)).unwrap();
        sim.set_agent_pref_velocity(b, v(-1.0, 0.0)).unwrap();
        sim.step();
        // Reciprocal avoidance bends both paths off the axis.
        assert!(sim.agent_velocity(a).unwrap().y != 0.0);
        assert!(sim.agent_velocity(b).unwrap().y != 0.0);
    }

    #[test]
    fn overlapping_crowd_respects_max_speed() {
        // 6×5 grid at 0.3 spacing: every agent starts overlapping its
        // neighbours, which drives the solver into the relaxed program.
        let mut builder = SimBuilder::new(test_config(0.1));
        let mut goals = Vec::new();
        for row in 0..5 {
            for col in 0..6 {
                let p = v(col as f32 * 0.3 - 0.75, row as f32 * 0.3 - 0.6);
                builder = builder.agent(p);
                goals.push(-p * 10.0);
            }
        }
        let mut sim = builder.build().unwrap();
        for _ in 0..200 {
            run_to_goals(&mut sim, &goals, 1);
            let agents = sim.agents();
            for (i, vel) in agents.velocity.iter().enumerate() {
                let max_speed = agents.params[i].max_speed;
                assert!(
                    vel.length() <= max_speed + 1e-5,
                    "agent {i} at {} moving at {}",
                    sim.current_step(),
                    vel.length()
                );
            }
        }
    }

    #[test]
    fn circle_scenario_stays_separated() {
        let config = SimConfig {
            time_step: 0.25,
            agent_defaults: AgentParams::default(),
            num_threads: None,
            snapshot_interval_steps: 0,
        };
        let mut builder = SimBuilder::new(config);
        let mut goals = Vec::new();
        let n = 12;
        for i in 0..n {
            let angle = i as f32 * std::f32::consts::TAU / n as f32;
            let p = v(angle.cos(), angle.sin()) * 20.0;
            builder = builder.agent(p);
            goals.push(-p);
        }
        let mut sim = builder.build().unwrap();
        let max_speed = AgentParams::default().max_speed;

        // A perfectly symmetric ring can stall in the centre; a small seeded
        // nudge on each preference breaks the tie.
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..1000 {
            for (i, &goal) in goals.iter().enumerate() {
                let agent = AgentId(i as u32);
                steer(&mut sim, agent, goal);
                let angle = rng.gen_range(0.0..std::f32::consts::TAU);
                let nudge = v(angle.cos(), angle.sin()) * rng.gen_range(0.0..1e-4);
                let pref = sim.agent_pref_velocity(agent).unwrap() + nudge;
                sim.set_agent_pref_velocity(agent, pref).unwrap();
            }
            sim.step();
            assert!(min_clearance_ratio(&sim) >= 0.95, "overlap at {}", sim.current_step());
            for vel in &sim.agents().velocity {
                assert!(vel.length() <= max_speed + 1e-5, "too fast: {vel}");
            }
        }
        for (i, &goal) in goals.iter().enumerate() {
            let p = sim.agent_position(AgentId(i as u32)).unwrap();
            assert!(p.distance_sq(goal) < 40.0 * 40.0, "agent {i} lost ground at {p}");
        }
    }
}

// ── Obstacles in the step loop ────────────────────────────────────────────────

#[cfg(test)]
mod obstacle_tests {
    use super::*;

    fn min_edge_distance(sim: &Sim, p: Vector2) -> f32 {
        let set = sim.obstacles();
        set.vertices()
            .iter()
            .map(|vx| {
                let next = set.vertices()[vx.next.index()].point;
                dist_sq_point_segment(vx.point, next, p).sqrt()
            })
            .fold(f32::INFINITY, f32::min)
    }

    #[test]
    fn agent_stays_outside_solid_square() {
        let mut sim = SimBuilder::new(test_config(0.1)).obstacle(ccw_square(1.0)).build().unwrap();
        let a = sim.add_agent(v(-5.0, 0.2)).unwrap();
        for _ in 0..200 {
            steer(&mut sim, a, v(5.0, 0.2));
            sim.step();
            let p = sim.agent_position(a).unwrap();
            assert!(!(p.x.abs() < 1.0 && p.y.abs() < 1.0), "inside at {p}");
            assert!(min_edge_distance(&sim, p) >= 0.5 - 1e-3, "touching at {p}");
        }
    }

    #[test]
    fn clockwise_polygon_confines() {
        let mut walls = ccw_square(5.0);
        walls.reverse();
        let mut sim = SimBuilder::new(test_config(0.1)).obstacle(walls).build().unwrap();
        let a = sim.add_agent(v(0.0, 0.0)).unwrap();
        sim.set_agent_pref_velocity(a, v(1.0, 0.3)).unwrap();
        for _ in 0..200 {
            sim.step();
            let p = sim.agent_position(a).unwrap();
            assert!(p.x.abs() <= 4.5 + 1e-3 && p.y.abs() <= 4.5 + 1e-3, "escaped to {p}");
        }
    }

    #[test]
    fn colinear_vertex_on_face_holds() {
        // Bottom face split at (0, -1); the agent is driven straight at the
        // split vertex.
        let box_poly = vec![v(-1.0, -1.0), v(0.0, -1.0), v(1.0, -1.0), v(1.0, 1.0), v(-1.0, 1.0)];
        let mut sim = SimBuilder::new(test_config(0.1)).obstacle(box_poly).build().unwrap();
        let a = sim.add_agent(v(0.0, -4.0)).unwrap();
        for _ in 0..200 {
            steer(&mut sim, a, v(0.0, 4.0));
            sim.step();
            let p = sim.agent_position(a).unwrap();
            assert!(min_edge_distance(&sim, p) >= 0.5 - 1e-3, "touching at {p}");
        }
        let vel = sim.agent_velocity(a).unwrap();
        assert!(vel.y <= 1e-3, "still pushing into the face: {vel}");
        assert!(sim.agent_position(a).unwrap().y < -1.0);
    }

    #[test]
    fn agent_pressed_into_pocket_keeps_clearance() {
        // Solid U open at the top; the pocket is 2 wide, 4 deep.
        let u_poly = vec![
            v(-3.0, -3.0),
            v(3.0, -3.0),
            v(3.0, 3.0),
            v(1.0, 3.0),
            v(1.0, -1.0),
            v(-1.0, -1.0),
            v(-1.0, 3.0),
            v(-3.0, 3.0),
        ];
        let mut sim = SimBuilder::new(test_config(0.1)).obstacle(u_poly).build().unwrap();
        let a = sim.add_agent(v(0.3, 6.0)).unwrap();
        for _ in 0..300 {
            steer(&mut sim, a, v(0.3, -4.0));
            sim.step();
            let p = sim.agent_position(a).unwrap();
            assert!(min_edge_distance(&sim, p) >= 0.5 - 1e-3, "touching at {p}");
        }
        let p = sim.agent_position(a).unwrap();
        assert!(p.x.abs() < 1.0 && p.y > -1.0, "left the pocket: {p}");
    }

    #[test]
    fn unprocessed_obstacle_is_ignored() {
        let mut sim = Sim::new(test_config(0.25)).unwrap();
        sim.add_obstacle(&ccw_square(1.0)).unwrap();
        let a = sim.add_agent(v(-5.0, 0.0)).unwrap();
        sim.set_agent_pref_velocity(a, v(1.0, 0.0)).unwrap();

        assert!(sim.query_visibility(v(-5.0, 0.0), v(5.0, 0.0), 0.5));
        for _ in 0..40 {
            sim.step();
        }
        assert_eq!(sim.agent_position(a).unwrap(), v(5.0, 0.0));

        sim.process_obstacles();
        assert!(!sim.query_visibility(v(-5.0, 0.0), v(5.0, 0.0), 0.5));
    }
}

// ── Observer callbacks ────────────────────────────────────────────────────────

#[cfg(test)]
mod observer_tests {
    use super::*;

    #[test]
    fn phases_reported_in_order() {
        let mut sim = Sim::new(test_config(0.25)).unwrap();
        sim.add_agent(v(0.0, 0.0)).unwrap();
        let mut rec = Recorder::default();
        sim.step_observed(&mut rec);
        assert_eq!(
            rec.phases,
            vec![StepPhase::IndexBuild, StepPhase::Compute, StepPhase::Apply, StepPhase::Idle]
        );
        assert_eq!(rec.events, vec!["start S0".to_string(), "end S0 0.25".to_string()]);
        assert_eq!(sim.phase(), StepPhase::Idle);
    }

    #[test]
    fn snapshots_follow_interval() {
        let mut config = test_config(0.25);
        config.snapshot_interval_steps = 3;
        let mut sim = Sim::new(config).unwrap();
        sim.add_agent(v(0.0, 0.0)).unwrap();
        sim.add_agent(v(5.0, 0.0)).unwrap();
        let mut rec = Recorder::default();
        sim.run_steps(10, &mut rec);
        let steps: Vec<u64> = rec.snapshots.iter().map(|(s, _)| s.0).collect();
        assert_eq!(steps, vec![0, 3, 6, 9]);
        assert!(rec.snapshots.iter().all(|&(_, n)| n == 2));
        assert_eq!(rec.run_end, Some(Step(10)));
        assert_eq!(rec.phases.len(), 40);
    }

    #[test]
    fn zero_interval_disables_snapshots() {
        let mut config = test_config(0.25);
        config.snapshot_interval_steps = 0;
        let mut sim = Sim::new(config).unwrap();
        let mut rec = Recorder::default();
        sim.run_steps(5, &mut rec);
        assert!(rec.snapshots.is_empty());
        assert_eq!(rec.run_end, Some(Step(5)));
    }
}
