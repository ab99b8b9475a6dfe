//! Scene file parsing, analysis and headless runs

use glam::DVec2;
use physbox_core::tests::test_helpers::approx_eq;
use physbox_core::{
    analyze_scene, build_simulation_context, parse_scene, run_scene, step_simulation, Color,
    SceneError, Shape,
};

const BOUNCING: &str = r#"
# three balls and a shelf
world gravity = 9.8 drag = 0.0 trail = 20
body at (0.0, 10.0) mass 1.0
body at (3.0, 4.0) mass 2.5 velocity (-1.0, 2.0) elasticity 0.5 shape triangle color (10, 20, 30)
body at (8.0, 0.5) mass 1.0 velocity (0.0, -2.0)
obstacle at (0.0, 2.0) size (4.0, 0.5)
simulate dt = 0.01 steps = 250
"#;

#[test]
fn test_parse_full_scene() {
    let scene = parse_scene(BOUNCING).expect("scene should parse");

    assert_eq!(scene.world.config.gravity, 9.8);
    assert_eq!(scene.world.config.drag, 0.0);
    assert_eq!(scene.world.config.trail_capacity, 20);
    assert_eq!(scene.bodies.len(), 3);
    assert_eq!(scene.obstacles.len(), 1);
    assert_eq!(scene.simulate.dt, 0.01);
    assert_eq!(scene.simulate.steps, 250);

    let second = &scene.bodies[1].spec;
    assert_eq!(second.mass, 2.5);
    assert_eq!(second.position, DVec2::new(3.0, 4.0));
    assert_eq!(second.velocity, DVec2::new(-1.0, 2.0));
    assert_eq!(second.elasticity, 0.5);
    assert_eq!(second.shape, Shape::Triangle);
    assert_eq!(second.color, Color::rgb(10, 20, 30));

    let first = &scene.bodies[0].spec;
    assert_eq!(first.velocity, DVec2::ZERO);
    assert_eq!(first.shape, Shape::Circle);
    assert_eq!(first.color, Color::palette(0));
    assert_eq!(scene.obstacles[0].spec.size, DVec2::new(4.0, 0.5));
}

#[test]
fn test_world_and_simulate_are_optional() {
    let scene = parse_scene("body at (0, 1) mass 1").unwrap();
    assert_eq!(scene.world.config.gravity, 9.8);
    assert_eq!(scene.world.config.drag, 0.1);
    assert_eq!(scene.simulate.steps, 600);
    assert!(approx_eq(scene.simulate.dt, 1.0 / 60.0, 1e-15));
}

#[test]
fn test_parse_errors_point_at_line() {
    let source = "body at (0, 1) mass 1\nbody at (2, 3)\n";
    let err = parse_scene(source).unwrap_err();
    assert!(err.to_string().contains("mass"));
    let span = err.span().expect("error should carry a span");
    assert_eq!(span.line_number(source), 2);
}

#[test]
fn test_rejects_malformed_lines() {
    let bad = [
        "ball at (0, 0) mass 1",
        "body at (0, 0, 0) mass 1",
        "body at (0, x) mass 1",
        "body at (0, 0) mass 1 shape hexagon",
        "body at (0, 0) mass 1 color (300, 0, 0)",
        "body at (0, 0) mass 1 mass 2",
        "body at (0, 0) mass 1 spin 3",
        "obstacle at (1, 1)",
        "simulate dt = 0.01 steps = -3",
        "world gravity = 9.8\nworld drag = 0.2",
        "body at (0, 0 mass 1",
    ];
    for source in bad {
        assert!(parse_scene(source).is_err(), "should reject: {}", source);
    }
}

#[test]
fn test_analyzer_errors_and_warnings() {
    let scene = parse_scene(
        r#"
world gravity = -1.0
body at (0, -1) mass 0 elasticity 1.5
body at (0, -1) mass 1
body at (5, 5) mass 1
obstacle at (5, 5) size (1, 1)
obstacle at (9, 9) size (-1, 1)
simulate dt = 0 steps = 10
"#,
    )
    .unwrap();

    let diagnostics = analyze_scene(&scene);
    let errors: Vec<_> = diagnostics.errors().map(|d| d.message.clone()).collect();
    let warnings: Vec<_> = diagnostics.warnings().map(|d| d.message.clone()).collect();

    assert!(errors.iter().any(|m| m.contains("gravity")));
    assert!(errors.iter().any(|m| m.contains("mass")));
    assert!(errors.iter().any(|m| m.contains("dt")));
    assert!(errors.iter().any(|m| m.contains("size")));
    assert!(warnings.iter().any(|m| m.contains("elasticity")));
    assert!(warnings.iter().any(|m| m.contains("below the ground")));
    assert!(warnings.iter().any(|m| m.contains("share a position")));
    assert!(warnings.iter().any(|m| m.contains("inside an obstacle")));
}

#[test]
fn test_clean_scene_has_no_diagnostics() {
    let scene = parse_scene(BOUNCING).unwrap();
    assert!(analyze_scene(&scene).is_empty());
}

#[test]
fn test_invalid_scene_is_not_built() {
    let err = build_simulation_context("body at (0, 1) mass -2").unwrap_err();
    assert!(matches!(err, SceneError::Invalid(_)));
    assert!(err.to_string().contains("1 error"));
}

#[test]
fn test_step_simulation_stops_at_step_count() {
    let mut ctx = build_simulation_context("body at (0, 5) mass 1\nsimulate dt = 0.1 steps = 3").unwrap();
    assert!(!step_simulation(&mut ctx));
    assert!(!step_simulation(&mut ctx));
    assert!(step_simulation(&mut ctx));
    assert!(step_simulation(&mut ctx));
    assert_eq!(ctx.current_step, 3);
    assert!(approx_eq(ctx.world.time(), 0.3, 1e-12));
}

#[test]
fn test_run_scene_reports_final_state() {
    let result = run_scene(BOUNCING).expect("run should succeed");

    assert_eq!(result.steps, 250);
    assert!(approx_eq(result.time, 2.5, 1e-9));
    assert_eq!(result.bodies.len(), 3);
    assert!(result.bodies.iter().all(|b| b.position.y >= 0.0));
    assert!(result.collisions.ground_contacts > 0);
    let energy: f64 = result.bodies.iter().map(|b| b.kinetic_energy).sum();
    assert!(approx_eq(energy, result.total_kinetic_energy, 1e-12));
}

#[test]
fn test_run_scene_is_deterministic() {
    let first = run_scene(BOUNCING).unwrap();
    let second = run_scene(BOUNCING).unwrap();
    assert_eq!(first.bodies, second.bodies);
    assert_eq!(first.collisions, second.collisions);
}

#[test]
fn test_bundled_scene_is_clean() {
    let source = include_str!("../../scenes/bouncing.scene");
    let scene = parse_scene(source).expect("bundled scene should parse");
    assert_eq!(scene.bodies.len(), 3);
    assert_eq!(scene.obstacles.len(), 2);
    assert!(!analyze_scene(&scene).has_errors());
}

#[test]
fn test_oversized_trail_is_rejected() {
    for trail in ["18446744073709551615", "1000000000000", "10001"] {
        let source = format!("world trail = {}\nbody at (0, 5) mass 1", trail);
        let err = build_simulation_context(&source).unwrap_err();
        assert!(matches!(err, SceneError::Invalid(_)), "trail {} accepted", trail);
        assert!(err.to_string().contains("trail length"), "{}", err);
    }

    let ctx = build_simulation_context("world trail = 10000\nbody at (0, 5) mass 1").unwrap();
    assert_eq!(ctx.world.bodies()[0].trail_capacity(), 10_000);
}

#[test]
fn test_context_accumulates_collisions() {
    let mut ctx = build_simulation_context(BOUNCING).unwrap();
    while !step_simulation(&mut ctx) {}
    let result = run_scene(BOUNCING).unwrap();
    assert_eq!(ctx.collisions, result.collisions);
    assert!(ctx.collisions.total() > 0);
}
