use crate::body::{Body, BodyEdit, BodyError, BodyId, BodySpec, DEFAULT_TRAIL_CAPACITY};
use crate::collision::{resolve_ground, resolve_obstacle, resolve_pair, PairOutcome};
use crate::obstacle::{Obstacle, ObstacleId, ObstacleSpec, BODY_DIAMETER};
use glam::DVec2;
use thiserror::Error;
use tracing::{debug, trace};

/// Fixed step the sandbox runs at
pub const DEFAULT_DT: f64 = 1.0 / 60.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorldError {
    #[error("no body with id {0}")]
    UnknownBody(BodyId),
    #[error("no obstacle with id {0}")]
    UnknownObstacle(ObstacleId),
    #[error(transparent)]
    Body(#[from] BodyError),
}

/// Global parameters a world starts with
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldConfig {
    /// Downward acceleration magnitude
    pub gravity: f64,
    /// Linear air-resistance coefficient
    pub drag: f64,
    pub trail_capacity: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            gravity: 9.8,
            drag: 0.1,
            trail_capacity: DEFAULT_TRAIL_CAPACITY,
        }
    }
}

/// Collision counts from one call to [`World::step`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    pub ground_contacts: usize,
    pub pair_collisions: usize,
    pub obstacle_collisions: usize,
    /// Pairs closer than the contact distance that shared a position
    pub degenerate_pairs: usize,
}

impl StepReport {
    pub fn total(&self) -> usize {
        self.ground_contacts + self.pair_collisions + self.obstacle_collisions
    }
}

impl std::ops::AddAssign for StepReport {
    fn add_assign(&mut self, other: Self) {
        self.ground_contacts += other.ground_contacts;
        self.pair_collisions += other.pair_collisions;
        self.obstacle_collisions += other.obstacle_collisions;
        self.degenerate_pairs += other.degenerate_pairs;
    }
}

/// The simulated world: bodies, obstacles and the global parameters
#[derive(Debug)]
pub struct World {
    bodies: Vec<Body>,
    obstacles: Vec<Obstacle>,
    time: f64,
    gravity: f64,
    drag: f64,
    paused: bool,
    trail_capacity: usize,
    next_body_id: u64,
    next_obstacle_id: u64,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    pub fn new() -> Self {
        Self::with_config(WorldConfig::default())
    }

    pub fn with_config(config: WorldConfig) -> Self {
        Self {
            bodies: Vec::new(),
            obstacles: Vec::new(),
            time: 0.0,
            gravity: config.gravity,
            drag: config.drag,
            paused: false,
            trail_capacity: config.trail_capacity,
            next_body_id: 0,
            next_obstacle_id: 0,
        }
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id() == id)
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.iter_mut().find(|b| b.id() == id)
    }

    pub fn obstacle(&self, id: ObstacleId) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.id() == id)
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn gravity(&self) -> f64 {
        self.gravity
    }

    pub fn set_gravity(&mut self, gravity: f64) {
        self.gravity = gravity;
    }

    pub fn drag(&self) -> f64 {
        self.drag
    }

    pub fn set_drag(&mut self, drag: f64) {
        self.drag = drag;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Flip the pause flag and return the new value
    pub fn toggle_paused(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    pub fn config(&self) -> WorldConfig {
        WorldConfig {
            gravity: self.gravity,
            drag: self.drag,
            trail_capacity: self.trail_capacity,
        }
    }

    pub fn add_body(&mut self, spec: BodySpec) -> Result<BodyId, WorldError> {
        let id = BodyId::new(self.next_body_id);
        let body = Body::new(id, spec, self.trail_capacity)?;
        self.next_body_id += 1;
        debug!(%id, mass = body.mass(), x = body.position.x, y = body.position.y, "body added");
        self.bodies.push(body);
        Ok(id)
    }

    pub fn remove_body(&mut self, id: BodyId) -> Result<Body, WorldError> {
        let idx = self
            .bodies
            .iter()
            .position(|b| b.id() == id)
            .ok_or(WorldError::UnknownBody(id))?;
        debug!(%id, "body removed");
        Ok(self.bodies.remove(idx))
    }

    pub fn edit_body(&mut self, id: BodyId, edit: &BodyEdit) -> Result<(), WorldError> {
        let body = self.body_mut(id).ok_or(WorldError::UnknownBody(id))?;
        body.apply_edit(edit)?;
        debug!(%id, ?edit, "body edited");
        Ok(())
    }

    pub fn add_obstacle(&mut self, spec: ObstacleSpec) -> ObstacleId {
        let id = ObstacleId::new(self.next_obstacle_id);
        self.next_obstacle_id += 1;
        debug!(%id, x = spec.position.x, y = spec.position.y, "obstacle added");
        self.obstacles.push(Obstacle::new(id, spec));
        id
    }

    pub fn remove_obstacle(&mut self, id: ObstacleId) -> Result<Obstacle, WorldError> {
        let idx = self
            .obstacles
            .iter()
            .position(|o| o.id() == id)
            .ok_or(WorldError::UnknownObstacle(id))?;
        debug!(%id, "obstacle removed");
        Ok(self.obstacles.remove(idx))
    }

    /// Replace an obstacle's placement. Only valid between steps.
    pub fn edit_obstacle(&mut self, id: ObstacleId, spec: ObstacleSpec) -> Result<(), WorldError> {
        let obstacle = self
            .obstacles
            .iter_mut()
            .find(|o| o.id() == id)
            .ok_or(WorldError::UnknownObstacle(id))?;
        obstacle.position = spec.position;
        obstacle.size = spec.size;
        debug!(%id, "obstacle edited");
        Ok(())
    }

    /// Drop every body and obstacle and rewind the clock. Parameters are kept.
    pub fn reset(&mut self) {
        self.bodies.clear();
        self.obstacles.clear();
        self.time = 0.0;
        debug!("world reset");
    }

    pub fn total_kinetic_energy(&self) -> f64 {
        self.bodies.iter().map(Body::kinetic_energy).sum()
    }

    pub fn total_momentum(&self) -> DVec2 {
        self.bodies.iter().map(Body::momentum).sum()
    }

    /// Advance the world by one fixed step.
    ///
    /// Bodies are integrated first, then contacts are resolved once in the
    /// order ground, body pairs, obstacles, using the new positions. Nothing
    /// happens while paused.
    pub fn step(&mut self, dt: f64) -> StepReport {
        let mut report = StepReport::default();
        if self.paused {
            return report;
        }

        self.time += dt;
        for body in &mut self.bodies {
            body.integrate(dt, self.gravity, self.drag);
        }

        for body in &mut self.bodies {
            if resolve_ground(body) {
                trace!(id = %body.id(), "ground contact");
                report.ground_contacts += 1;
            }
        }

        for i in 0..self.bodies.len() {
            let (head, tail) = self.bodies.split_at_mut(i + 1);
            let a = &mut head[i];
            for b in tail.iter_mut() {
                if a.position.distance(b.position) >= BODY_DIAMETER {
                    continue;
                }
                match resolve_pair(a, b) {
                    PairOutcome::Resolved => {
                        trace!(a = %a.id(), b = %b.id(), "pair collision");
                        report.pair_collisions += 1;
                    }
                    PairOutcome::Degenerate => {
                        trace!(a = %a.id(), b = %b.id(), "coincident bodies, skipped");
                        report.degenerate_pairs += 1;
                    }
                }
            }
        }

        for body in &mut self.bodies {
            for obstacle in &self.obstacles {
                if obstacle.collides_with(body) {
                    resolve_obstacle(body, obstacle);
                    trace!(id = %body.id(), obstacle = %obstacle.id(), "obstacle collision");
                    report.obstacle_collisions += 1;
                }
            }
        }

        report
    }
}
