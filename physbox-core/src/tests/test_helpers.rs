//! Test helper utilities for physbox tests

use crate::body::BodySpec;
use crate::world::{World, WorldConfig};
use glam::DVec2;

/// Check if two floating point values are approximately equal within tolerance
pub fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}

/// Component-wise [`approx_eq`]
pub fn approx_vec(a: DVec2, b: DVec2, tol: f64) -> bool {
    approx_eq(a.x, b.x, tol) && approx_eq(a.y, b.y, tol)
}

/// World with the given gravity and no drag
pub fn world_with_gravity(gravity: f64) -> World {
    World::with_config(WorldConfig {
        gravity,
        drag: 0.0,
        ..WorldConfig::default()
    })
}

/// Body spec at `position` moving with `velocity`, unit mass
pub fn spec_at(position: DVec2, velocity: DVec2, elasticity: f64) -> BodySpec {
    BodySpec {
        position,
        velocity,
        elasticity,
        ..BodySpec::default()
    }
}

/// Step `world` `n` times with a fixed `dt`
pub fn run_steps(world: &mut World, dt: f64, n: usize) {
    for _ in 0..n {
        world.step(dt);
    }
}
