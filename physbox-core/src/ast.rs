//! Parsed form of a scene file

use crate::body::BodySpec;
use crate::diagnostics::Span;
use crate::obstacle::ObstacleSpec;
use crate::world::{WorldConfig, DEFAULT_DT};

/// Number of steps a headless run takes when the scene does not say
pub const DEFAULT_STEPS: usize = 600;

/// Global parameters: `world gravity = g drag = k trail = n`
#[derive(Debug, Clone, PartialEq)]
pub struct WorldDecl {
    pub config: WorldConfig,
    pub span: Option<Span>,
}

/// `body at (x, y) mass m [velocity (vx, vy)] [elasticity e] [shape s] [color (r, g, b)]`
#[derive(Debug, Clone, PartialEq)]
pub struct BodyDecl {
    pub spec: BodySpec,
    pub span: Option<Span>,
}

/// `obstacle at (x, y) size (w, h)`
#[derive(Debug, Clone, PartialEq)]
pub struct ObstacleDecl {
    pub spec: ObstacleSpec,
    pub span: Option<Span>,
}

/// `simulate dt = x steps = n`
#[derive(Debug, Clone, PartialEq)]
pub struct SimulateDecl {
    pub dt: f64,
    pub steps: usize,
    pub span: Option<Span>,
}

impl Default for SimulateDecl {
    fn default() -> Self {
        Self {
            dt: DEFAULT_DT,
            steps: DEFAULT_STEPS,
            span: None,
        }
    }
}

/// A whole scene file
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub world: WorldDecl,
    pub bodies: Vec<BodyDecl>,
    pub obstacles: Vec<ObstacleDecl>,
    pub simulate: SimulateDecl,
}
