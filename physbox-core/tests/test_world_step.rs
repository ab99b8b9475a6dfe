//! Stepping and collision-order tests for the world

use glam::DVec2;
use physbox_core::tests::test_helpers::{approx_eq, approx_vec, run_steps, spec_at, world_with_gravity};
use physbox_core::{BodySpec, ObstacleSpec, World, WorldConfig, DEFAULT_DT};

#[test]
fn test_equal_masses_swap_velocities() {
    let mut world = world_with_gravity(0.0);
    let a = world
        .add_body(spec_at(DVec2::new(-0.25, 5.0), DVec2::new(1.0, 0.0), 1.0))
        .unwrap();
    let b = world
        .add_body(spec_at(DVec2::new(0.25, 5.0), DVec2::new(-1.0, 0.0), 1.0))
        .unwrap();

    let report = world.step(0.01);

    assert_eq!(report.pair_collisions, 1);
    assert!(approx_vec(world.body(a).unwrap().velocity, DVec2::new(-1.0, 0.0), 1e-9));
    assert!(approx_vec(world.body(b).unwrap().velocity, DVec2::new(1.0, 0.0), 1e-9));
}

#[test]
fn test_pair_resolved_once_per_step() {
    let mut world = world_with_gravity(0.0);
    world
        .add_body(spec_at(DVec2::new(0.0, 5.0), DVec2::new(0.5, 0.0), 1.0))
        .unwrap();
    world
        .add_body(spec_at(DVec2::new(0.6, 5.0), DVec2::ZERO, 1.0))
        .unwrap();
    world
        .add_body(spec_at(DVec2::new(10.0, 5.0), DVec2::ZERO, 1.0))
        .unwrap();

    let report = world.step(0.01);
    assert_eq!(report.pair_collisions, 1);
}

#[test]
fn test_ground_clamps_to_exact_zero() {
    let mut world = world_with_gravity(0.0);
    let id = world
        .add_body(spec_at(DVec2::new(0.0, 0.001), DVec2::new(0.0, -1.0), 0.5))
        .unwrap();

    let report = world.step(0.01);
    let body = world.body(id).unwrap();

    assert_eq!(report.ground_contacts, 1);
    assert_eq!(body.position.y, 0.0);
    assert!(approx_eq(body.velocity.y, 0.5, 1e-12));
}

#[test]
fn test_resting_body_is_fixed_point() {
    let mut world = world_with_gravity(0.0);
    let id = world
        .add_body(spec_at(DVec2::new(2.0, 0.0), DVec2::ZERO, 0.8))
        .unwrap();

    run_steps(&mut world, DEFAULT_DT, 10);
    let body = world.body(id).unwrap();

    assert_eq!(body.position, DVec2::new(2.0, 0.0));
    assert_eq!(body.velocity, DVec2::ZERO);
}

#[test]
fn test_bounce_keeps_elasticity_fraction() {
    let mut world = world_with_gravity(9.8);
    let id = world
        .add_body(spec_at(DVec2::new(0.0, 0.02), DVec2::new(0.0, -3.0), 0.8))
        .unwrap();

    let dt = DEFAULT_DT;
    let pre_contact = -3.0 - 9.8 * dt;
    world.step(dt);
    let body = world.body(id).unwrap();

    assert_eq!(body.position.y, 0.0);
    assert!(approx_eq(body.velocity.y, -0.8 * pre_contact, 1e-12));
}

#[test]
fn test_trail_keeps_most_recent_positions() {
    let mut world = World::with_config(WorldConfig {
        gravity: 0.0,
        drag: 0.0,
        trail_capacity: 5,
    });
    let id = world
        .add_body(spec_at(DVec2::new(0.0, 10.0), DVec2::new(1.0, 0.0), 1.0))
        .unwrap();

    run_steps(&mut world, 1.0, 12);
    let trail: Vec<f64> = world.body(id).unwrap().trail().map(|p| p.x).collect();

    assert_eq!(trail, vec![8.0, 9.0, 10.0, 11.0, 12.0]);
}

#[test]
fn test_default_trail_capacity_is_bounded() {
    let mut world = world_with_gravity(9.8);
    let id = world.add_body(BodySpec::default()).unwrap();

    run_steps(&mut world, DEFAULT_DT, 250);
    let body = world.body(id).unwrap();

    assert_eq!(body.trail_capacity(), 100);
    assert_eq!(body.trail_len(), 100);
}

#[test]
fn test_obstacle_boundary_is_open() {
    let mut world = world_with_gravity(0.0);
    world.add_obstacle(ObstacleSpec {
        position: DVec2::new(0.0, 5.0),
        size: DVec2::new(2.0, 2.0),
    });
    // (2 + 1) / 2 = 1.5 from the center on x
    let id = world
        .add_body(spec_at(DVec2::new(1.5, 5.0), DVec2::ZERO, 1.0))
        .unwrap();

    let report = world.step(0.01);

    assert_eq!(report.obstacle_collisions, 0);
    assert!(!world.obstacles()[0].collides_with(world.body(id).unwrap()));
}

#[test]
fn test_obstacle_reflects_falling_body() {
    let mut world = world_with_gravity(0.0);
    world.add_obstacle(ObstacleSpec {
        position: DVec2::new(0.0, 5.0),
        size: DVec2::new(2.0, 1.0),
    });
    let id = world
        .add_body(spec_at(DVec2::new(0.0, 6.05), DVec2::new(0.0, -6.0), 1.0))
        .unwrap();

    let report = world.step(0.01);

    assert_eq!(report.obstacle_collisions, 1);
    assert!(approx_vec(world.body(id).unwrap().velocity, DVec2::new(0.0, 6.0), 1e-12));
}

#[test]
fn test_pause_freezes_everything() {
    let mut world = world_with_gravity(9.8);
    let id = world
        .add_body(spec_at(DVec2::new(1.0, 8.0), DVec2::new(2.0, 1.0), 0.8))
        .unwrap();
    world.set_paused(true);

    for _ in 0..30 {
        let report = world.step(DEFAULT_DT);
        assert_eq!(report.total(), 0);
    }
    let body = world.body(id).unwrap();

    assert_eq!(world.time(), 0.0);
    assert_eq!(body.position, DVec2::new(1.0, 8.0));
    assert_eq!(body.velocity, DVec2::new(2.0, 1.0));
    assert_eq!(body.trail_len(), 0);
}

#[test]
fn test_free_fall_one_second() {
    let mut world = world_with_gravity(9.8);
    let id = world
        .add_body(spec_at(DVec2::new(0.0, 10.0), DVec2::ZERO, 1.0))
        .unwrap();

    let mut collisions = 0;
    for _ in 0..60 {
        collisions += world.step(1.0 / 60.0).total();
    }
    let y = world.body(id).unwrap().position.y;

    assert_eq!(collisions, 0);
    assert!(approx_eq(world.time(), 1.0, 1e-9));
    // Semi-implicit Euler lands slightly below the analytic 5.1
    assert!(approx_eq(y, 5.1, 0.1));
    assert!(approx_eq(y, 10.0 - 9.8 * 61.0 / 120.0, 1e-9));
}

#[test]
fn test_coincident_bodies_do_not_produce_nan() {
    let mut world = world_with_gravity(0.0);
    let a = world
        .add_body(spec_at(DVec2::new(3.0, 3.0), DVec2::new(1.0, 0.0), 1.0))
        .unwrap();
    let b = world
        .add_body(spec_at(DVec2::new(3.0, 3.0), DVec2::new(1.0, 0.0), 1.0))
        .unwrap();

    let report = world.step(0.01);

    assert_eq!(report.degenerate_pairs, 1);
    assert_eq!(report.pair_collisions, 0);
    assert!(world.body(a).unwrap().velocity.is_finite());
    assert!(world.body(b).unwrap().velocity.is_finite());
}

#[test]
fn test_identical_worlds_stay_identical() {
    fn build() -> World {
        let mut world = World::new();
        for i in 0..6 {
            let x = i as f64 * 0.7 - 2.0;
            world
                .add_body(spec_at(DVec2::new(x, 4.0 + i as f64), DVec2::new(-x, 1.0), 0.9))
                .unwrap();
        }
        world.add_obstacle(ObstacleSpec {
            position: DVec2::new(0.0, 2.0),
            size: DVec2::new(3.0, 0.5),
        });
        world
    }

    let mut first = build();
    let mut second = build();
    run_steps(&mut first, DEFAULT_DT, 500);
    run_steps(&mut second, DEFAULT_DT, 500);

    for (a, b) in first.bodies().iter().zip(second.bodies()) {
        assert_eq!(a.position, b.position);
        assert_eq!(a.velocity, b.velocity);
    }
}

#[test]
fn test_bodies_never_end_below_ground() {
    let mut world = World::new();
    for i in 0..10 {
        world
            .add_body(spec_at(
                DVec2::new(i as f64 - 5.0, 1.0 + i as f64),
                DVec2::new(0.0, -20.0),
                0.6,
            ))
            .unwrap();
    }

    for _ in 0..300 {
        world.step(DEFAULT_DT);
        assert!(world.bodies().iter().all(|b| b.position.y >= 0.0));
    }
}

#[test]
fn test_large_trail_capacity_allocates_lazily() {
    let mut world = World::with_config(WorldConfig {
        trail_capacity: 1_000_000_000_000,
        ..WorldConfig::default()
    });
    let id = world.add_body(BodySpec::default()).unwrap();
    world.step(DEFAULT_DT);
    assert_eq!(world.body(id).unwrap().trail_len(), 1);
}

#[test]
fn test_obstacle_corner_uses_diagonal_normal() {
    let mut world = world_with_gravity(0.0);
    world.add_obstacle(ObstacleSpec {
        position: DVec2::ZERO,
        size: DVec2::new(2.0, 2.0),
    });
    let id = world
        .add_body(spec_at(DVec2::new(1.2, 1.2), DVec2::new(-1.0, -1.0), 0.5))
        .unwrap();

    let report = world.step(0.01);

    // n = (1, 1) is not normalised, so v_n = dot(v, n) * n = (-2, -2)
    assert_eq!(report.obstacle_collisions, 1);
    assert!(approx_vec(world.body(id).unwrap().velocity, DVec2::new(2.0, 2.0), 1e-12));
}
