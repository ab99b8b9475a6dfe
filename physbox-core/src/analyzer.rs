//! Static checks on parsed scenes
//!
//! Errors are conditions the world would reject or that break its
//! assumptions; warnings are legal but probably unintended setups.

use crate::ast::Scene;
use crate::body::MAX_TRAIL_CAPACITY;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::obstacle::{Obstacle, ObstacleId, BODY_DIAMETER};

/// Analyze a scene and return diagnostics
pub fn analyze_scene(scene: &Scene) -> Diagnostics {
    let mut diagnostics = Diagnostics::new();

    let config = &scene.world.config;
    if !(config.gravity >= 0.0) {
        diagnostics.push(Diagnostic::error(
            format!("gravity must be non-negative, got {}", config.gravity),
            scene.world.span,
        ));
    }
    if !(config.drag >= 0.0) {
        diagnostics.push(Diagnostic::error(
            format!("drag must be non-negative, got {}", config.drag),
            scene.world.span,
        ));
    }

    if config.trail_capacity > MAX_TRAIL_CAPACITY {
        diagnostics.push(Diagnostic::error(
            format!(
                "trail length {} exceeds the maximum of {}",
                config.trail_capacity, MAX_TRAIL_CAPACITY
            ),
            scene.world.span,
        ));
    }

    if !(scene.simulate.dt > 0.0) {
        diagnostics.push(Diagnostic::error(
            format!("dt must be positive, got {}", scene.simulate.dt),
            scene.simulate.span,
        ));
    }

    for obstacle in &scene.obstacles {
        let size = obstacle.spec.size;
        if size.x < 0.0 || size.y < 0.0 {
            diagnostics.push(Diagnostic::error(
                format!("obstacle size must be non-negative, got ({}, {})", size.x, size.y),
                obstacle.span,
            ));
        }
    }

    // Obstacles rebuilt only for their contact predicate
    let placed: Vec<Obstacle> = scene
        .obstacles
        .iter()
        .enumerate()
        .map(|(i, decl)| Obstacle::new(ObstacleId::new(i as u64), decl.spec))
        .collect();

    for (i, body) in scene.bodies.iter().enumerate() {
        let spec = &body.spec;
        if !(spec.mass.is_finite() && spec.mass > 0.0) {
            diagnostics.push(Diagnostic::error(
                format!("body {} has non-positive mass {}", i + 1, spec.mass),
                body.span,
            ));
        }
        if !(0.0..=1.0).contains(&spec.elasticity) {
            let note = if spec.elasticity > 1.0 { "; collisions will add energy" } else { "" };
            diagnostics.push(Diagnostic::warning(
                format!("body {} has elasticity {} outside [0, 1]{}", i + 1, spec.elasticity, note),
                body.span,
            ));
        }
        if spec.position.y < 0.0 {
            diagnostics.push(Diagnostic::warning(
                format!("body {} starts below the ground and will be clamped to y = 0", i + 1),
                body.span,
            ));
        }
        if placed.iter().any(|o| o.contains_point(spec.position)) {
            diagnostics.push(Diagnostic::warning(
                format!("body {} starts inside an obstacle", i + 1),
                body.span,
            ));
        }
        for (j, other) in scene.bodies.iter().enumerate().skip(i + 1) {
            let distance = spec.position.distance(other.spec.position);
            if distance == 0.0 {
                diagnostics.push(Diagnostic::warning(
                    format!("bodies {} and {} share a position and will never collide", i + 1, j + 1),
                    other.span,
                ));
            } else if distance < BODY_DIAMETER {
                diagnostics.push(Diagnostic::warning(
                    format!("bodies {} and {} start overlapping", i + 1, j + 1),
                    other.span,
                ));
            }
        }
    }

    diagnostics
}
