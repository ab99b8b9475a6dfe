use crate::body::{BodySpec, Color, Shape, DEFAULT_ELASTICITY};
use glam::DVec2;
use rand::Rng;

/// A unit-mass circle somewhere above the ground, moving in a random
/// direction, with a random color.
pub fn random_body_spec<R: Rng>(rng: &mut R) -> BodySpec {
    BodySpec {
        mass: 1.0,
        position: DVec2::new(rng.gen_range(-5.0..5.0), rng.gen_range(5.0..15.0)),
        velocity: DVec2::new(rng.gen_range(-5.0..5.0), rng.gen_range(-5.0..5.0)),
        shape: Shape::Circle,
        color: Color::random(rng),
        elasticity: DEFAULT_ELASTICITY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn stays_in_spawn_box() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let spec = random_body_spec(&mut rng);
            assert!((-5.0..5.0).contains(&spec.position.x));
            assert!((5.0..15.0).contains(&spec.position.y));
            assert!((-5.0..5.0).contains(&spec.velocity.x));
            assert!((-5.0..5.0).contains(&spec.velocity.y));
            assert_eq!(spec.mass, 1.0);
        }
    }

    #[test]
    fn same_seed_same_body() {
        let a = random_body_spec(&mut StdRng::seed_from_u64(42));
        let b = random_body_spec(&mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
