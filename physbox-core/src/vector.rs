//! Small vector helpers on top of `glam`'s f64 vectors.
//!
//! `glam` already covers add, subtract, scale, dot, cross and length; the
//! functions here are the handful of derived quantities the sandbox and its
//! formula helpers need.

use glam::{DVec2, DVec3};

/// Component-wise sign with `sign(0) == 0`.
///
/// `DVec2::signum` maps `0.0` to `1.0`, which would turn a body sitting
/// exactly on an obstacle's center line into a diagonal reflection.
pub fn elementwise_sign(v: DVec2) -> DVec2 {
    DVec2::new(sign(v.x), sign(v.y))
}

fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Angle between two vectors in degrees.
///
/// Returns `None` when either vector has zero length.
pub fn angle_between(a: DVec2, b: DVec2) -> Option<f64> {
    let denom = a.length() * b.length();
    if denom == 0.0 {
        return None;
    }
    let cos = (a.dot(b) / denom).clamp(-1.0, 1.0);
    Some(cos.acos().to_degrees())
}

/// Work done by a constant force over a displacement.
pub fn work(force: DVec2, displacement: DVec2) -> f64 {
    force.dot(displacement)
}

/// Area of the parallelogram spanned by two 2D vectors.
pub fn parallelogram_area(a: DVec2, b: DVec2) -> f64 {
    a.perp_dot(b).abs()
}

/// Magnitude of the torque `r x F`.
pub fn torque(lever: DVec3, force: DVec3) -> f64 {
    lever.cross(force).length()
}

/// Volume of the parallelepiped with edges `length`, `width`, `height`.
pub fn parallelepiped_volume(length: DVec3, width: DVec3, height: DVec3) -> f64 {
    length.dot(width.cross(height)).abs()
}
