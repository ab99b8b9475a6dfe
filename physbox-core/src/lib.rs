//! Core of the physbox sandbox: point masses falling under gravity and drag,
//! bouncing off the ground, static obstacles and each other.

pub mod analyzer;
pub mod ast;
pub mod body;
pub mod collision;
pub mod command;
pub mod constants;
pub mod diagnostics;
pub mod kinematics;
pub mod obstacle;
pub mod parser;
pub mod runtime;
pub mod spawn;
pub mod vector;
pub mod world;

pub use analyzer::analyze_scene;
pub use ast::Scene;
pub use body::{
    Body, BodyEdit, BodyError, BodyId, BodySpec, Color, Shape, DEFAULT_TRAIL_CAPACITY,
    MAX_TRAIL_CAPACITY,
};
pub use command::{Applied, Command, CommandQueue};
pub use diagnostics::{Diagnostic, DiagnosticSeverity, Diagnostics, Span};
pub use obstacle::{Obstacle, ObstacleId, ObstacleSpec, BODY_DIAMETER};
pub use parser::{parse_scene, ParseError};
pub use runtime::{
    build_simulation_context, build_world, get_body_states, run_scene, step_simulation,
    BodyState, SceneError, SimulationContext, SimulationResult,
};
pub use spawn::random_body_spec;
pub use world::{StepReport, World, WorldConfig, WorldError, DEFAULT_DT};

// Test helpers module (public for integration tests)
pub mod tests;
