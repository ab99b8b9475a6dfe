use crate::analyzer::analyze_scene;
use crate::ast::{Scene, SimulateDecl};
use crate::body::{Body, BodyId, Shape};
use crate::diagnostics::Diagnostics;
use crate::parser::{parse_scene, ParseError};
use crate::world::{StepReport, World, WorldError};
use glam::DVec2;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("scene has {} error(s), first: {}", .0.errors().count(), first_error(.0))]
    Invalid(Diagnostics),
    #[error(transparent)]
    World(#[from] WorldError),
}

fn first_error(diagnostics: &Diagnostics) -> String {
    diagnostics
        .errors()
        .next()
        .map(|d| d.message.clone())
        .unwrap_or_default()
}

/// A world built from a scene, plus how the scene asks to be run
#[derive(Debug)]
pub struct SimulationContext {
    pub world: World,
    pub simulate: SimulateDecl,
    pub current_step: usize,
    /// Contacts summed over every step taken so far
    pub collisions: StepReport,
    /// Warnings left over after a successful build
    pub diagnostics: Diagnostics,
}

/// Snapshot of one body, for printing and comparisons
#[derive(Debug, Clone, PartialEq)]
pub struct BodyState {
    pub id: BodyId,
    pub shape: Shape,
    pub position: DVec2,
    pub velocity: DVec2,
    pub kinetic_energy: f64,
    pub momentum: DVec2,
    pub work_done: f64,
}

impl From<&Body> for BodyState {
    fn from(body: &Body) -> Self {
        Self {
            id: body.id(),
            shape: body.shape,
            position: body.position,
            velocity: body.velocity,
            kinetic_energy: body.kinetic_energy(),
            momentum: body.momentum(),
            work_done: body.work_done(),
        }
    }
}

/// Final result of a headless run
#[derive(Debug, Clone)]
pub struct SimulationResult {
    pub time: f64,
    pub steps: usize,
    pub bodies: Vec<BodyState>,
    pub total_kinetic_energy: f64,
    pub total_momentum: DVec2,
    pub collisions: StepReport,
}

/// Build a World from a parsed scene
pub fn build_world(scene: &Scene) -> Result<World, SceneError> {
    let mut world = World::with_config(scene.world.config);
    for body in &scene.bodies {
        world.add_body(body.spec.clone())?;
    }
    for obstacle in &scene.obstacles {
        world.add_obstacle(obstacle.spec);
    }
    debug!(
        bodies = world.bodies().len(),
        obstacles = world.obstacles().len(),
        "world built from scene"
    );
    Ok(world)
}

/// Parse, check and build a scene
pub fn build_simulation_context(source: &str) -> Result<SimulationContext, SceneError> {
    let scene = parse_scene(source)?;
    let diagnostics = analyze_scene(&scene);
    if diagnostics.has_errors() {
        return Err(SceneError::Invalid(diagnostics));
    }
    let world = build_world(&scene)?;
    Ok(SimulationContext {
        world,
        simulate: scene.simulate,
        current_step: 0,
        collisions: StepReport::default(),
        diagnostics,
    })
}

/// Advance one step. Returns `true` once the scene's step count is reached.
pub fn step_simulation(ctx: &mut SimulationContext) -> bool {
    if ctx.current_step >= ctx.simulate.steps {
        return true;
    }
    ctx.collisions += ctx.world.step(ctx.simulate.dt);
    ctx.current_step += 1;
    ctx.current_step >= ctx.simulate.steps
}

pub fn get_body_states(world: &World) -> Vec<BodyState> {
    world.bodies().iter().map(BodyState::from).collect()
}

/// Main entry point for headless runs: build the scene and step it to the end
pub fn run_scene(source: &str) -> Result<SimulationResult, SceneError> {
    let mut ctx = build_simulation_context(source)?;
    while !step_simulation(&mut ctx) {}
    Ok(SimulationResult {
        time: ctx.world.time(),
        steps: ctx.current_step,
        bodies: get_body_states(&ctx.world),
        total_kinetic_energy: ctx.world.total_kinetic_energy(),
        total_momentum: ctx.world.total_momentum(),
        collisions: ctx.collisions,
    })
}
