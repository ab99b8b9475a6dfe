//! Constant-acceleration (SUVAT) formulas in two and three dimensions.

use glam::{DVec2, DVec3};

/// `v = v0 + a t`
pub fn velocity_at_time(v0: DVec2, a: DVec2, t: f64) -> DVec2 {
    v0 + a * t
}

pub fn velocity_at_time_3d(v0: DVec3, a: DVec3, t: f64) -> DVec3 {
    v0 + a * t
}

/// `x = x0 + v0 t + a t^2 / 2`
pub fn position_at_time(x0: DVec2, v0: DVec2, a: DVec2, t: f64) -> DVec2 {
    x0 + v0 * t + a * (0.5 * t * t)
}

pub fn position_at_time_3d(x0: DVec3, v0: DVec3, a: DVec3, t: f64) -> DVec3 {
    x0 + v0 * t + a * (0.5 * t * t)
}

/// Speed per axis after a displacement, `sqrt(v0^2 + 2 a dx)`.
///
/// `None` if the displacement is unreachable on any axis.
pub fn velocity_at_displacement(v0: DVec2, a: DVec2, dx: DVec2) -> Option<DVec2> {
    let radicand = v0 * v0 + 2.0 * a * dx;
    (radicand.min_element() >= 0.0).then(|| DVec2::new(radicand.x.sqrt(), radicand.y.sqrt()))
}

pub fn velocity_at_displacement_3d(v0: DVec3, a: DVec3, dx: DVec3) -> Option<DVec3> {
    let radicand = v0 * v0 + 2.0 * a * dx;
    (radicand.min_element() >= 0.0)
        .then(|| DVec3::new(radicand.x.sqrt(), radicand.y.sqrt(), radicand.z.sqrt()))
}
