//! Deferred world mutations.
//!
//! The front end never touches the body and obstacle collections while a
//! step is running. It pushes [`Command`]s instead, and the queue is drained
//! into the world between steps.

use crate::body::{BodyEdit, BodyId, BodySpec};
use crate::obstacle::{ObstacleId, ObstacleSpec};
use crate::world::{World, WorldError};
use std::collections::VecDeque;
use tracing::warn;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    AddBody(BodySpec),
    RemoveBody(BodyId),
    EditBody(BodyId, BodyEdit),
    AddObstacle(ObstacleSpec),
    RemoveObstacle(ObstacleId),
    EditObstacle(ObstacleId, ObstacleSpec),
    SetGravity(f64),
    SetDrag(f64),
    SetPaused(bool),
    TogglePaused,
    Reset,
}

/// What a successfully applied command produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    BodyAdded(BodyId),
    ObstacleAdded(ObstacleId),
    Done,
}

impl Command {
    pub fn apply(self, world: &mut World) -> Result<Applied, WorldError> {
        match self {
            Command::AddBody(spec) => world.add_body(spec).map(Applied::BodyAdded),
            Command::RemoveBody(id) => world.remove_body(id).map(|_| Applied::Done),
            Command::EditBody(id, edit) => world.edit_body(id, &edit).map(|_| Applied::Done),
            Command::AddObstacle(spec) => Ok(Applied::ObstacleAdded(world.add_obstacle(spec))),
            Command::RemoveObstacle(id) => world.remove_obstacle(id).map(|_| Applied::Done),
            Command::EditObstacle(id, spec) => world.edit_obstacle(id, spec).map(|_| Applied::Done),
            Command::SetGravity(gravity) => {
                world.set_gravity(gravity);
                Ok(Applied::Done)
            }
            Command::SetDrag(drag) => {
                world.set_drag(drag);
                Ok(Applied::Done)
            }
            Command::SetPaused(paused) => {
                world.set_paused(paused);
                Ok(Applied::Done)
            }
            Command::TogglePaused => {
                world.toggle_paused();
                Ok(Applied::Done)
            }
            Command::Reset => {
                world.reset();
                Ok(Applied::Done)
            }
        }
    }
}

/// FIFO of pending commands
#[derive(Debug, Default)]
pub struct CommandQueue {
    pending: VecDeque<Command>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: Command) {
        self.pending.push_back(command);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Apply every pending command in submission order.
    ///
    /// A failing command does not stop the ones after it; each result is
    /// returned in order.
    pub fn apply(&mut self, world: &mut World) -> Vec<Result<Applied, WorldError>> {
        self.pending
            .drain(..)
            .map(|command| {
                let result = command.apply(world);
                if let Err(e) = &result {
                    warn!(error = %e, "command rejected");
                }
                result
            })
            .collect()
    }
}
