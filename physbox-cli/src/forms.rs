//! Text-field forms behind the sandbox dialogs.
//!
//! Dialog fields are free text. Everything is parsed and validated here, so a
//! rejected form produces a message for the user and never a command.

use physbox_core::{Body, BodyEdit, BodySpec, Color, Obstacle, ObstacleSpec, Shape};
use glam::DVec2;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("{field}: '{text}' is not a number")]
    NotANumber { field: &'static str, text: String },
    #[error("{field}: {reason}")]
    InvalidValue { field: &'static str, reason: &'static str },
}

fn parse_field(field: &'static str, text: &str) -> Result<f64, FormError> {
    let value = text
        .trim()
        .parse::<f64>()
        .map_err(|_| FormError::NotANumber {
            field,
            text: text.to_string(),
        })?;
    if !value.is_finite() {
        return Err(FormError::InvalidValue {
            field,
            reason: "must be finite",
        });
    }
    Ok(value)
}

fn format_field(value: f64) -> String {
    format!("{:.3}", value)
}

/// Fields of the spawn and edit-properties dialogs
#[derive(Debug, Clone, PartialEq)]
pub struct BodyForm {
    pub mass: String,
    pub x: String,
    pub y: String,
    pub vx: String,
    pub vy: String,
    pub elasticity: f64,
    pub shape: Shape,
}

impl Default for BodyForm {
    fn default() -> Self {
        Self {
            mass: "1.0".into(),
            x: "0.0".into(),
            y: "10.0".into(),
            vx: "0.0".into(),
            vy: "0.0".into(),
            elasticity: physbox_core::body::DEFAULT_ELASTICITY,
            shape: Shape::Circle,
        }
    }
}

impl BodyForm {
    pub fn from_body(body: &Body) -> Self {
        Self {
            mass: format_field(body.mass()),
            x: format_field(body.position.x),
            y: format_field(body.position.y),
            vx: format_field(body.velocity.x),
            vy: format_field(body.velocity.y),
            elasticity: body.elasticity,
            shape: body.shape,
        }
    }

    fn mass(&self) -> Result<f64, FormError> {
        let mass = parse_field("Mass", &self.mass)?;
        if mass <= 0.0 {
            return Err(FormError::InvalidValue {
                field: "Mass",
                reason: "must be greater than zero",
            });
        }
        Ok(mass)
    }

    fn position(&self) -> Result<DVec2, FormError> {
        Ok(DVec2::new(
            parse_field("X Position", &self.x)?,
            parse_field("Y Position", &self.y)?,
        ))
    }

    fn velocity(&self) -> Result<DVec2, FormError> {
        Ok(DVec2::new(
            parse_field("X Velocity", &self.vx)?,
            parse_field("Y Velocity", &self.vy)?,
        ))
    }

    pub fn to_spec(&self, color: Color) -> Result<BodySpec, FormError> {
        Ok(BodySpec {
            mass: self.mass()?,
            position: self.position()?,
            velocity: self.velocity()?,
            shape: self.shape,
            color,
            elasticity: self.elasticity,
        })
    }

    pub fn to_edit(&self) -> Result<BodyEdit, FormError> {
        Ok(BodyEdit {
            mass: Some(self.mass()?),
            position: Some(self.position()?),
            velocity: Some(self.velocity()?),
            elasticity: Some(self.elasticity),
            shape: Some(self.shape),
            color: None,
        })
    }
}

/// Fields of the obstacle editor
#[derive(Debug, Clone, PartialEq)]
pub struct ObstacleForm {
    pub x: String,
    pub y: String,
    pub width: String,
    pub height: String,
}

impl Default for ObstacleForm {
    fn default() -> Self {
        Self::from_spec(ObstacleSpec::default())
    }
}

impl ObstacleForm {
    pub fn from_spec(spec: ObstacleSpec) -> Self {
        Self {
            x: format_field(spec.position.x),
            y: format_field(spec.position.y),
            width: format_field(spec.size.x),
            height: format_field(spec.size.y),
        }
    }

    pub fn from_obstacle(obstacle: &Obstacle) -> Self {
        Self::from_spec(obstacle.spec())
    }

    pub fn to_spec(&self) -> Result<ObstacleSpec, FormError> {
        let position = DVec2::new(parse_field("X Position", &self.x)?, parse_field("Y Position", &self.y)?);
        let width = parse_field("Width", &self.width)?;
        let height = parse_field("Height", &self.height)?;
        if width < 0.0 {
            return Err(FormError::InvalidValue {
                field: "Width",
                reason: "must not be negative",
            });
        }
        if height < 0.0 {
            return Err(FormError::InvalidValue {
                field: "Height",
                reason: "must not be negative",
            });
        }
        Ok(ObstacleSpec {
            position,
            size: DVec2::new(width, height),
        })
    }
}
