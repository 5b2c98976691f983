//! Unit tests for rvo-core primitives.

#[cfg(test)]
mod ids {
    use crate::{AgentId, ObstacleId, VertexId};

    #[test]
    fn index_roundtrip() {
        let id = AgentId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(AgentId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering() {
        assert!(AgentId(0) < AgentId(1));
        assert!(VertexId(100) > VertexId(99));
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(AgentId::INVALID.0, u32::MAX);
        assert_eq!(ObstacleId::INVALID.0, u32::MAX);
        assert_eq!(VertexId::default(), VertexId::INVALID);
    }

    #[test]
    fn display() {
        assert_eq!(AgentId(7).to_string(), "AgentId(7)");
    }
}

#[cfg(test)]
mod vector {
    use crate::{Vector2, det, dist_sq_point_segment, left_of};

    #[test]
    fn arithmetic() {
        let a = Vector2::new(1.0, 2.0);
        let b = Vector2::new(3.0, -1.0);
        assert_eq!(a + b, Vector2::new(4.0, 1.0));
        assert_eq!(a - b, Vector2::new(-2.0, 3.0));
        assert_eq!(-a, Vector2::new(-1.0, -2.0));
        assert_eq!(a * 2.0, Vector2::new(2.0, 4.0));
        assert_eq!(2.0 * a, a * 2.0);
        assert_eq!(b / 2.0, Vector2::new(1.5, -0.5));
        assert_eq!(a.dot(b), 1.0);
    }

    #[test]
    fn normalize_and_length() {
        let v = Vector2::new(3.0, 4.0);
        assert_eq!(v.length(), 5.0);
        assert!((v.normalize().length() - 1.0).abs() < 1e-6);
        assert_eq!(Vector2::ZERO.normalize(), Vector2::ZERO);
    }

    #[test]
    fn clamp_length() {
        let v = Vector2::new(3.0, 4.0);
        assert_eq!(v.clamp_length(10.0), v);
        assert!((v.clamp_length(1.0).length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn det_sign_follows_orientation() {
        let x = Vector2::new(1.0, 0.0);
        let y = Vector2::new(0.0, 1.0);
        assert_eq!(det(x, y), 1.0);
        assert_eq!(det(y, x), -1.0);
        assert_eq!(x.perp(), y);
    }

    #[test]
    fn left_of_detects_side() {
        let a = Vector2::new(0.0, 0.0);
        let b = Vector2::new(1.0, 0.0);
        assert!(left_of(a, b, Vector2::new(0.5, 1.0)) > 0.0);
        assert!(left_of(a, b, Vector2::new(0.5, -1.0)) < 0.0);
        assert_eq!(left_of(a, b, Vector2::new(2.0, 0.0)), 0.0);
    }

    #[test]
    fn point_segment_distance_regions() {
        let a = Vector2::new(0.0, 0.0);
        let b = Vector2::new(4.0, 0.0);
        // Beyond `a`, beyond `b`, and over the interior.
        assert_eq!(dist_sq_point_segment(a, b, Vector2::new(-3.0, 4.0)), 25.0);
        assert_eq!(dist_sq_point_segment(a, b, Vector2::new(5.0, 0.0)), 1.0);
        assert_eq!(dist_sq_point_segment(a, b, Vector2::new(2.0, 3.0)), 9.0);
        // Degenerate segment collapses to a point.
        assert_eq!(dist_sq_point_segment(a, a, Vector2::new(0.0, 2.0)), 4.0);
    }

    #[test]
    fn array_conversion() {
        let v: Vector2 = [1.5, -2.0].into();
        let back: [f32; 2] = v.into();
        assert_eq!(back, [1.5, -2.0]);
    }
}

#[cfg(test)]
mod time {
    use crate::{SimClock, Step};

    #[test]
    fn step_arithmetic() {
        let s = Step(10);
        assert_eq!(s + 5, Step(15));
        assert_eq!(Step::ZERO + 1, Step(1));
        assert!(s < s + 1);
    }

    #[test]
    fn clock_accumulates_global_time() {
        let mut clock = SimClock::new(0.25);
        assert_eq!(clock.global_time, 0.0);
        clock.advance();
        clock.advance();
        assert_eq!(clock.current_step, Step(2));
        assert_eq!(clock.global_time, 0.5);

        clock.time_step = 1.0;
        clock.advance();
        assert_eq!(clock.global_time, 1.5);
    }
}

#[cfg(test)]
mod config {
    use crate::{AgentParams, RvoError, SimConfig};

    #[test]
    fn defaults_are_valid() {
        assert!(AgentParams::default().validate().is_ok());
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_radius() {
        let p = AgentParams { radius: 0.0, ..AgentParams::default() };
        assert!(matches!(
            p.validate(),
            Err(RvoError::InvalidParameter { name: "radius", .. })
        ));
    }

    #[test]
    fn rejects_non_positive_speed_and_horizons() {
        for p in [
            AgentParams { max_speed: 0.0, ..AgentParams::default() },
            AgentParams { time_horizon: -1.0, ..AgentParams::default() },
            AgentParams { time_horizon_obst: f32::NAN, ..AgentParams::default() },
        ] {
            assert!(matches!(p.validate(), Err(RvoError::InvalidParameter { .. })), "{p:?}");
        }
    }

    #[test]
    fn zero_neighbor_dist_is_allowed() {
        let p = AgentParams { neighbor_dist: 0.0, max_neighbors: 0, ..AgentParams::default() };
        assert!(p.validate().is_ok());
        let p = AgentParams { neighbor_dist: -1.0, ..AgentParams::default() };
        assert!(p.validate().is_err());
    }

    #[test]
    fn config_rejects_bad_time_step_and_threads() {
        let c = SimConfig { time_step: 0.0, ..SimConfig::default() };
        assert!(c.validate().is_err());
        let c = SimConfig { num_threads: Some(0), ..SimConfig::default() };
        assert!(matches!(c.validate(), Err(RvoError::Config(_))));
    }

    #[test]
    fn obstacle_range() {
        let p = AgentParams {
            radius: 0.5,
            max_speed: 2.0,
            time_horizon_obst: 3.0,
            ..AgentParams::default()
        };
        assert_eq!(p.obstacle_range(), 6.5);
    }
}
