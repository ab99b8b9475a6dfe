use crate::ast::{BodyDecl, ObstacleDecl, Scene, SimulateDecl, WorldDecl};
use crate::body::{BodySpec, Color, Shape};
use crate::diagnostics::Span;
use crate::obstacle::ObstacleSpec;
use crate::world::WorldConfig;
use glam::DVec2;
use thiserror::Error;

/// Parse error with optional span information
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("{message}")]
    SyntaxError {
        message: String,
        span: Option<Span>,
    },
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Option<Span>) -> Self {
        Self::SyntaxError {
            message: message.into(),
            span,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Self::SyntaxError { span, .. } => *span,
        }
    }
}

/// Helper to track byte offsets while parsing
struct ParseContext {
    line_offsets: Vec<usize>, // Byte offset of start of each line
    len: usize,
}

impl ParseContext {
    fn new(source: &str) -> Self {
        let mut line_offsets = vec![0];
        for (offset, ch) in source.char_indices() {
            if ch == '\n' {
                line_offsets.push(offset + 1);
            }
        }
        Self {
            line_offsets,
            len: source.len(),
        }
    }

    /// Span covering line `line` (0-indexed), newline included
    fn full_line_span(&self, line: usize) -> Span {
        let start = self.line_offsets.get(line).copied().unwrap_or(self.len);
        let end = self.line_offsets.get(line + 1).copied().unwrap_or(self.len);
        Span::new(start, end)
    }
}

/// Parse a scene file
pub fn parse_scene(source: &str) -> Result<Scene, ParseError> {
    let ctx = ParseContext::new(source);
    let mut world = None;
    let mut bodies = Vec::new();
    let mut obstacles = Vec::new();
    let mut simulate = None;

    for (i, raw) in source.lines().enumerate() {
        let line = raw.trim();
        let span = Some(ctx.full_line_span(i));

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (keyword, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        match keyword {
            "world" => {
                if world.is_some() {
                    return Err(ParseError::new("Duplicate 'world' declaration", span));
                }
                world = Some(parse_world(rest, span)?);
            }
            "body" => bodies.push(parse_body(rest, bodies.len(), span)?),
            "obstacle" => obstacles.push(parse_obstacle(rest, span)?),
            "simulate" => {
                if simulate.is_some() {
                    return Err(ParseError::new("Duplicate 'simulate' declaration", span));
                }
                simulate = Some(parse_simulate(rest, span)?);
            }
            other => {
                return Err(ParseError::new(format!("Unexpected token: {}", other), span));
            }
        }
    }

    Ok(Scene {
        world: world.unwrap_or(WorldDecl {
            config: WorldConfig::default(),
            span: None,
        }),
        bodies,
        obstacles,
        simulate: simulate.unwrap_or_default(),
    })
}

/// A value following a key: a bare word or a parenthesised tuple
#[derive(Debug, Clone, PartialEq)]
enum Value<'a> {
    Word(&'a str),
    Tuple(Vec<&'a str>),
}

/// Split `key value key = value key (a, b)` into key/value pairs
fn parse_pairs<'a>(rest: &'a str, span: Option<Span>) -> Result<Vec<(&'a str, Value<'a>)>, ParseError> {
    let mut tokens = Vec::new();
    let bytes = rest.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b' ' | b'\t' | b'=' => i += 1,
            b'(' => {
                let close = rest[i..].find(')').ok_or_else(|| {
                    ParseError::new(format!("Expected ')' after '{}'", &rest[i..]), span)
                })?;
                let inner = &rest[i + 1..i + close];
                tokens.push(Value::Tuple(inner.split(',').map(str::trim).collect()));
                i += close + 1;
            }
            b')' => return Err(ParseError::new("Unmatched ')'", span)),
            _ => {
                let start = i;
                while i < bytes.len() && !matches!(bytes[i], b' ' | b'\t' | b'=' | b'(' | b')') {
                    i += 1;
                }
                tokens.push(Value::Word(&rest[start..i]));
            }
        }
    }

    let mut pairs: Vec<(&str, Value)> = Vec::new();
    let mut iter = tokens.into_iter();
    while let Some(key) = iter.next() {
        let Value::Word(key) = key else {
            return Err(ParseError::new("Expected a keyword before '('", span));
        };
        let value = iter
            .next()
            .ok_or_else(|| ParseError::new(format!("Missing value for '{}'", key), span))?;
        if pairs.iter().any(|(k, _)| *k == key) {
            return Err(ParseError::new(format!("Duplicate key '{}'", key), span));
        }
        pairs.push((key, value));
    }
    Ok(pairs)
}

fn number(key: &str, value: &Value, span: Option<Span>) -> Result<f64, ParseError> {
    match value {
        Value::Word(text) => text
            .parse::<f64>()
            .map_err(|_| ParseError::new(format!("Invalid number for '{}': {}", key, text), span)),
        Value::Tuple(_) => Err(ParseError::new(format!("Expected a number for '{}'", key), span)),
    }
}

fn vec2(key: &str, value: &Value, span: Option<Span>) -> Result<DVec2, ParseError> {
    let Value::Tuple(parts) = value else {
        return Err(ParseError::new(format!("Expected (x, y) for '{}'", key), span));
    };
    if parts.len() != 2 {
        return Err(ParseError::new(
            format!("Expected two components for '{}'", key),
            span,
        ));
    }
    let x = number(key, &Value::Word(parts[0]), span)?;
    let y = number(key, &Value::Word(parts[1]), span)?;
    Ok(DVec2::new(x, y))
}

fn color(value: &Value, span: Option<Span>) -> Result<Color, ParseError> {
    let Value::Tuple(parts) = value else {
        return Err(ParseError::new("Expected (r, g, b) for 'color'", span));
    };
    if parts.len() != 3 {
        return Err(ParseError::new("Expected three components for 'color'", span));
    }
    let mut channels = [0u8; 3];
    for (channel, part) in channels.iter_mut().zip(parts) {
        *channel = part.parse::<u8>().map_err(|_| {
            ParseError::new(format!("Color channel must be 0-255, got {}", part), span)
        })?;
    }
    Ok(Color::rgb(channels[0], channels[1], channels[2]))
}

fn unknown_key(decl: &str, key: &str, span: Option<Span>) -> ParseError {
    ParseError::new(format!("Unknown key '{}' in {} declaration", key, decl), span)
}

/// Parse a world declaration: `world gravity = g drag = k [trail = n]`
fn parse_world(rest: &str, span: Option<Span>) -> Result<WorldDecl, ParseError> {
    let mut config = WorldConfig::default();
    for (key, value) in parse_pairs(rest, span)? {
        match key {
            "gravity" => config.gravity = number(key, &value, span)?,
            "drag" => config.drag = number(key, &value, span)?,
            "trail" => {
                let Value::Word(text) = value else {
                    return Err(ParseError::new("Expected an integer for 'trail'", span));
                };
                config.trail_capacity = text.parse::<usize>().map_err(|_| {
                    ParseError::new(format!("Invalid trail length: {}", text), span)
                })?;
            }
            other => return Err(unknown_key("world", other, span)),
        }
    }
    Ok(WorldDecl { config, span })
}

/// Parse a body declaration: `body at (x, y) mass m ...`
fn parse_body(rest: &str, index: usize, span: Option<Span>) -> Result<BodyDecl, ParseError> {
    let mut spec = BodySpec {
        color: Color::palette(index),
        ..BodySpec::default()
    };
    let mut has_position = false;
    let mut has_mass = false;

    for (key, value) in parse_pairs(rest, span)? {
        match key {
            "at" => {
                spec.position = vec2(key, &value, span)?;
                has_position = true;
            }
            "mass" => {
                spec.mass = number(key, &value, span)?;
                has_mass = true;
            }
            "velocity" => spec.velocity = vec2(key, &value, span)?,
            "elasticity" => spec.elasticity = number(key, &value, span)?,
            "shape" => {
                let Value::Word(name) = value else {
                    return Err(ParseError::new("Expected a shape name", span));
                };
                spec.shape = name
                    .parse::<Shape>()
                    .map_err(|e| ParseError::new(e.to_string(), span))?;
            }
            "color" => spec.color = color(&value, span)?,
            other => return Err(unknown_key("body", other, span)),
        }
    }

    if !has_position {
        return Err(ParseError::new("Expected 'at' in body declaration", span));
    }
    if !has_mass {
        return Err(ParseError::new("Expected 'mass' in body declaration", span));
    }
    Ok(BodyDecl { spec, span })
}

/// Parse an obstacle declaration: `obstacle at (x, y) size (w, h)`
fn parse_obstacle(rest: &str, span: Option<Span>) -> Result<ObstacleDecl, ParseError> {
    let mut position = None;
    let mut size = None;
    for (key, value) in parse_pairs(rest, span)? {
        match key {
            "at" => position = Some(vec2(key, &value, span)?),
            "size" => size = Some(vec2(key, &value, span)?),
            other => return Err(unknown_key("obstacle", other, span)),
        }
    }
    let position =
        position.ok_or_else(|| ParseError::new("Expected 'at' in obstacle declaration", span))?;
    let size = size.ok_or_else(|| ParseError::new("Expected 'size' in obstacle declaration", span))?;
    Ok(ObstacleDecl {
        spec: ObstacleSpec { position, size },
        span,
    })
}

/// Parse a simulate declaration: `simulate dt = x steps = n`
fn parse_simulate(rest: &str, span: Option<Span>) -> Result<SimulateDecl, ParseError> {
    let mut decl = SimulateDecl {
        span,
        ..SimulateDecl::default()
    };
    for (key, value) in parse_pairs(rest, span)? {
        match key {
            "dt" => decl.dt = number(key, &value, span)?,
            "steps" => {
                let Value::Word(text) = value else {
                    return Err(ParseError::new("Expected an integer for 'steps'", span));
                };
                decl.steps = text
                    .parse::<usize>()
                    .map_err(|_| ParseError::new(format!("Invalid step count: {}", text), span))?;
            }
            other => return Err(unknown_key("simulate", other, span)),
        }
    }
    Ok(decl)
}
