use glam::DVec2;
use rand::Rng;
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Trail length kept for each body unless configured otherwise
pub const DEFAULT_TRAIL_CAPACITY: usize = 100;

/// Longest trail a scene may ask for
pub const MAX_TRAIL_CAPACITY: usize = 10_000;

/// Restitution given to bodies that do not specify one
pub const DEFAULT_ELASTICITY: f64 = 0.8;

/// Errors raised while building or editing a body
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BodyError {
    #[error("mass must be a positive finite number, got {0}")]
    InvalidMass(f64),
}

/// Stable handle to a body inside a [`crate::World`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(u64);

impl BodyId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "body#{}", self.0)
    }
}

/// How a body is drawn. Has no effect on the physics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Shape {
    #[default]
    Circle,
    Square,
    Triangle,
    Arrow,
}

impl Shape {
    pub const ALL: [Shape; 4] = [Shape::Circle, Shape::Square, Shape::Triangle, Shape::Arrow];

    pub fn name(self) -> &'static str {
        match self {
            Shape::Circle => "circle",
            Shape::Square => "square",
            Shape::Triangle => "triangle",
            Shape::Arrow => "arrow",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown shape '{0}', expected circle, square, triangle or arrow")]
pub struct UnknownShape(pub String);

impl FromStr for Shape {
    type Err = UnknownShape;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Shape::ALL
            .into_iter()
            .find(|shape| shape.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownShape(s.trim().to_string()))
    }
}

/// RGB color of a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::rgb(rng.gen(), rng.gen(), rng.gen())
    }

    /// Deterministic color for the `index`-th body of a scene
    pub fn palette(index: usize) -> Self {
        const PALETTE: [Color; 8] = [
            Color::rgb(230, 57, 70),
            Color::rgb(29, 53, 87),
            Color::rgb(69, 123, 157),
            Color::rgb(42, 157, 143),
            Color::rgb(233, 196, 106),
            Color::rgb(244, 162, 97),
            Color::rgb(131, 56, 236),
            Color::rgb(58, 134, 255),
        ];
        PALETTE[index % PALETTE.len()]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::palette(0)
    }
}

/// Everything needed to create a body
#[derive(Debug, Clone, PartialEq)]
pub struct BodySpec {
    pub mass: f64,
    pub position: DVec2,
    pub velocity: DVec2,
    pub shape: Shape,
    pub color: Color,
    pub elasticity: f64,
}

impl Default for BodySpec {
    fn default() -> Self {
        Self {
            mass: 1.0,
            position: DVec2::new(0.0, 10.0),
            velocity: DVec2::ZERO,
            shape: Shape::Circle,
            color: Color::default(),
            elasticity: DEFAULT_ELASTICITY,
        }
    }
}

/// Property changes applied to an existing body. `None` leaves a field alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BodyEdit {
    pub mass: Option<f64>,
    pub position: Option<DVec2>,
    pub velocity: Option<DVec2>,
    pub elasticity: Option<f64>,
    pub shape: Option<Shape>,
    pub color: Option<Color>,
}

fn validate_mass(mass: f64) -> Result<f64, BodyError> {
    if mass.is_finite() && mass > 0.0 {
        Ok(mass)
    } else {
        Err(BodyError::InvalidMass(mass))
    }
}

/// A movable point mass
#[derive(Debug, Clone)]
pub struct Body {
    id: BodyId,
    mass: f64,
    pub position: DVec2,
    pub velocity: DVec2,
    pub shape: Shape,
    pub color: Color,
    /// Coefficient of restitution. Values above 1 add energy on every contact.
    pub elasticity: f64,
    trail: VecDeque<DVec2>,
    trail_capacity: usize,
    initial_position: DVec2,
    work_done: f64,
}

impl Body {
    pub fn new(id: BodyId, spec: BodySpec, trail_capacity: usize) -> Result<Self, BodyError> {
        let mass = validate_mass(spec.mass)?;
        Ok(Self {
            id,
            mass,
            position: spec.position,
            velocity: spec.velocity,
            shape: spec.shape,
            color: spec.color,
            elasticity: spec.elasticity,
            trail: VecDeque::new(),
            trail_capacity,
            initial_position: spec.position,
            work_done: 0.0,
        })
    }

    pub fn id(&self) -> BodyId {
        self.id
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn set_mass(&mut self, mass: f64) -> Result<(), BodyError> {
        self.mass = validate_mass(mass)?;
        Ok(())
    }

    /// Recent positions, oldest first
    pub fn trail(&self) -> impl ExactSizeIterator<Item = DVec2> + '_ {
        self.trail.iter().copied()
    }

    pub fn trail_len(&self) -> usize {
        self.trail.len()
    }

    pub fn trail_capacity(&self) -> usize {
        self.trail_capacity
    }

    pub fn clear_trail(&mut self) {
        self.trail.clear();
    }

    pub fn initial_position(&self) -> DVec2 {
        self.initial_position
    }

    pub fn work_done(&self) -> f64 {
        self.work_done
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.velocity.length_squared()
    }

    pub fn momentum(&self) -> DVec2 {
        self.mass * self.velocity
    }

    /// Gravitational potential energy relative to the starting height
    pub fn potential_energy(&self, gravity: f64) -> f64 {
        self.mass * gravity * (self.position.y - self.initial_position.y)
    }

    /// Advance one fixed step with semi-implicit Euler.
    ///
    /// Gravity and drag are velocity deltas computed from the current state;
    /// nothing is carried over between steps except position and velocity.
    pub fn integrate(&mut self, dt: f64, gravity: f64, drag: f64) {
        let old_velocity = self.velocity;

        self.velocity.y -= gravity * dt;
        self.velocity -= drag * self.velocity * dt;
        self.position += self.velocity * dt;

        self.push_trail(self.position);

        let impulse = self.mass * (self.velocity - old_velocity);
        self.work_done += impulse.dot(self.velocity * dt);
    }

    fn push_trail(&mut self, point: DVec2) {
        self.trail.push_back(point);
        while self.trail.len() > self.trail_capacity {
            self.trail.pop_front();
        }
    }

    /// Apply an edit. Either every field changes or none does.
    pub fn apply_edit(&mut self, edit: &BodyEdit) -> Result<(), BodyError> {
        if let Some(mass) = edit.mass {
            self.mass = validate_mass(mass)?;
        }
        if let Some(position) = edit.position {
            self.position = position;
            self.trail.clear();
        }
        if let Some(velocity) = edit.velocity {
            self.velocity = velocity;
        }
        if let Some(elasticity) = edit.elasticity {
            self.elasticity = elasticity;
        }
        if let Some(shape) = edit.shape {
            self.shape = shape;
        }
        if let Some(color) = edit.color {
            self.color = color;
        }
        Ok(())
    }
}
