//! Collision response for the three kinds of contact: ground, body-body and
//! body-obstacle.
//!
//! Detection lives with the caller ([`crate::World::step`] and
//! [`crate::Obstacle::collides_with`]); these functions only change
//! velocities (and, for the ground, the height).

use crate::body::Body;
use crate::obstacle::Obstacle;
use crate::vector::elementwise_sign;
use glam::DVec2;

/// Result of resolving a body pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairOutcome {
    Resolved,
    /// The bodies share a position, so there is no line of centers
    Degenerate,
}

/// Clamp a body onto the ground plane and bounce it.
///
/// Returns `true` when the body was touching or below the ground.
pub fn resolve_ground(body: &mut Body) -> bool {
    if body.position.y > 0.0 {
        return false;
    }
    body.position.y = 0.0;
    body.velocity.y = -body.velocity.y * body.elasticity;
    true
}

/// Velocities two point masses would have after a perfectly elastic
/// collision along their line of centers.
///
/// `None` when the positions coincide.
pub fn elastic_velocities(
    (ma, pa, va): (f64, DVec2, DVec2),
    (mb, pb, vb): (f64, DVec2, DVec2),
) -> Option<(DVec2, DVec2)> {
    let d = pa - pb;
    let dist_sq = d.length_squared();
    if dist_sq == 0.0 {
        return None;
    }
    let total = ma + mb;
    let va_new = va - (2.0 * mb / total) * (va - vb).dot(d) / dist_sq * d;
    let vb_new = vb - (2.0 * ma / total) * (vb - va).dot(-d) / dist_sq * (-d);
    Some((va_new, vb_new))
}

/// Resolve a body-body contact.
///
/// Each body moves from its current velocity toward the elastic result by
/// its own elasticity: `v + (v_elastic - v) * e`.
pub fn resolve_pair(a: &mut Body, b: &mut Body) -> PairOutcome {
    let Some((va_new, vb_new)) = elastic_velocities(
        (a.mass(), a.position, a.velocity),
        (b.mass(), b.position, b.velocity),
    ) else {
        return PairOutcome::Degenerate;
    };

    a.velocity += (va_new - a.velocity) * a.elasticity;
    b.velocity += (vb_new - b.velocity) * b.elasticity;
    PairOutcome::Resolved
}

/// Reflect the velocity component along the separating axes and keep the
/// tangential part.
pub fn resolve_obstacle(body: &mut Body, obstacle: &Obstacle) {
    let normal = elementwise_sign(body.position - obstacle.position);
    let v_normal = body.velocity.dot(normal) * normal;
    let v_tangent = body.velocity - v_normal;
    body.velocity = v_tangent - v_normal * body.elasticity;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{BodyId, BodySpec};
    use crate::obstacle::{ObstacleId, ObstacleSpec};

    fn body(position: DVec2, velocity: DVec2, mass: f64, elasticity: f64) -> Body {
        Body::new(
            BodyId::new(0),
            BodySpec {
                mass,
                position,
                velocity,
                elasticity,
                ..BodySpec::default()
            },
            10,
        )
        .unwrap()
    }

    #[test]
    fn unequal_masses_conserve_momentum() {
        let mut a = body(DVec2::new(-0.25, 0.0), DVec2::new(2.0, 0.0), 3.0, 1.0);
        let mut b = body(DVec2::new(0.25, 0.0), DVec2::new(-1.0, 0.0), 1.0, 1.0);
        let before = a.momentum() + b.momentum();
        let energy_before = a.kinetic_energy() + b.kinetic_energy();

        assert_eq!(resolve_pair(&mut a, &mut b), PairOutcome::Resolved);

        let after = a.momentum() + b.momentum();
        let energy_after = a.kinetic_energy() + b.kinetic_energy();
        assert!((before - after).length() < 1e-12);
        assert!((energy_before - energy_after).abs() < 1e-12);
    }

    #[test]
    fn zero_elasticity_keeps_velocity() {
        let mut a = body(DVec2::new(-0.25, 0.0), DVec2::new(1.0, 0.0), 1.0, 0.0);
        let mut b = body(DVec2::new(0.25, 0.0), DVec2::new(-1.0, 0.0), 1.0, 0.0);
        resolve_pair(&mut a, &mut b);
        assert_eq!(a.velocity, DVec2::new(1.0, 0.0));
        assert_eq!(b.velocity, DVec2::new(-1.0, 0.0));
    }

    #[test]
    fn coincident_bodies_are_skipped() {
        let mut a = body(DVec2::new(1.0, 1.0), DVec2::new(1.0, 0.0), 1.0, 1.0);
        let mut b = body(DVec2::new(1.0, 1.0), DVec2::new(0.0, 3.0), 1.0, 1.0);
        assert_eq!(resolve_pair(&mut a, &mut b), PairOutcome::Degenerate);
        assert_eq!(a.velocity, DVec2::new(1.0, 0.0));
        assert_eq!(b.velocity, DVec2::new(0.0, 3.0));
    }

    #[test]
    fn obstacle_reflects_normal_component_only() {
        let obstacle = Obstacle::new(
            ObstacleId::new(0),
            ObstacleSpec {
                position: DVec2::ZERO,
                size: DVec2::new(4.0, 4.0),
            },
        );
        // Directly above the center: only y is a separating axis.
        let mut b = body(DVec2::new(0.0, 2.0), DVec2::new(3.0, -4.0), 1.0, 0.5);
        resolve_obstacle(&mut b, &obstacle);
        assert_eq!(b.velocity, DVec2::new(3.0, 2.0));
    }

    #[test]
    fn ground_clamps_and_bounces() {
        let mut b = body(DVec2::new(0.0, -0.01), DVec2::new(1.0, -5.0), 1.0, 0.8);
        assert!(resolve_ground(&mut b));
        assert_eq!(b.position.y, 0.0);
        assert!((b.velocity.y - 4.0).abs() < 1e-12);
        assert_eq!(b.velocity.x, 1.0);
    }
}
