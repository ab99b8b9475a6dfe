use crate::body::Body;
use glam::DVec2;
use std::fmt;

/// Implicit diameter of every body. Used both for body-body contact and to
/// inflate obstacles.
pub const BODY_DIAMETER: f64 = 1.0;

/// Stable handle to an obstacle inside a [`crate::World`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObstacleId(u64);

impl ObstacleId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObstacleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "obstacle#{}", self.0)
    }
}

/// Center and extent of an obstacle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstacleSpec {
    pub position: DVec2,
    /// Width and height
    pub size: DVec2,
}

impl Default for ObstacleSpec {
    fn default() -> Self {
        Self {
            position: DVec2::new(0.0, 5.0),
            size: DVec2::new(2.0, 1.0),
        }
    }
}

/// A static axis-aligned rectangle
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    id: ObstacleId,
    pub position: DVec2,
    pub size: DVec2,
}

impl Obstacle {
    pub fn new(id: ObstacleId, spec: ObstacleSpec) -> Self {
        Self {
            id,
            position: spec.position,
            size: spec.size,
        }
    }

    pub fn id(&self) -> ObstacleId {
        self.id
    }

    pub fn spec(&self) -> ObstacleSpec {
        ObstacleSpec {
            position: self.position,
            size: self.size,
        }
    }

    /// Half extents after inflating by the body diameter
    pub fn contact_half_extents(&self) -> DVec2 {
        (self.size + DVec2::splat(BODY_DIAMETER)) / 2.0
    }

    /// Whether a point lies strictly inside the inflated rectangle
    pub fn contains_point(&self, point: DVec2) -> bool {
        let offset = (point - self.position).abs();
        let half = self.contact_half_extents();
        offset.x < half.x && offset.y < half.y
    }

    /// Open-interval test: a body exactly on the inflated edge does not collide.
    pub fn collides_with(&self, body: &Body) -> bool {
        self.contains_point(body.position)
    }
}
