//! Path building, SVG path-data parsing and measurement

use crate::error::PaintError;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Segments used when flattening curves for measurement
const CURVE_SEGMENTS: usize = 24;

/// A 2D point
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[repr(C)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    fn distance(self, other: Point) -> f32 {
        ((other.x - self.x).powi(2) + (other.y - self.y).powi(2)).sqrt()
    }
}

/// Path command (absolute coordinates)
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    QuadTo {
        control: Point,
        end: Point,
    },
    CubicTo {
        control1: Point,
        control2: Point,
        end: Point,
    },
    Close,
}

/// Dash pattern that reveals the first `visible` units of a stroke
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StrokeDash {
    pub visible: f32,
    pub hidden: f32,
    pub total: f32,
}

/// A 2D path composed of commands
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    commands: SmallVec<[PathCommand; 16]>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Parse SVG path data (the `d` attribute).
    ///
    /// Supports `M L H V C Q Z` in absolute and relative form, implicit
    /// command repetition, and compact numbers such as `10.5-11.25` or
    /// `0.5.5`.
    pub fn parse_svg(data: &str) -> Result<Path, PaintError> {
        let mut lexer = Lexer::new(data);
        let mut builder = PathBuilder::new();
        let mut command: Option<char> = None;
        let mut subpath_start = Point::ZERO;

        loop {
            lexer.skip_separators();
            let Some(next) = lexer.peek() else {
                break;
            };

            if next.is_ascii_alphabetic() {
                lexer.bump();
                command = Some(next);
                if matches!(next, 'Z' | 'z') {
                    builder = builder.close();
                    builder.current = subpath_start;
                    continue;
                }
            } else if command.is_none() {
                return Err(lexer.error("path data must start with a command"));
            }

            let Some(cmd) = command else {
                continue;
            };
            let relative = cmd.is_ascii_lowercase();
            let origin = if relative { builder.current } else { Point::ZERO };

            match cmd.to_ascii_uppercase() {
                'M' => {
                    let p = lexer.point(origin)?;
                    builder = builder.move_to(p.x, p.y);
                    subpath_start = p;
                    // Extra coordinate pairs after a move are implicit line-tos
                    command = Some(if relative { 'l' } else { 'L' });
                }
                'L' => {
                    let p = lexer.point(origin)?;
                    builder = builder.line_to(p.x, p.y);
                }
                'H' => {
                    let x = lexer.number()? + origin.x;
                    let y = builder.current.y;
                    builder = builder.line_to(x, y);
                }
                'V' => {
                    let y = lexer.number()? + origin.y;
                    let x = builder.current.x;
                    builder = builder.line_to(x, y);
                }
                'C' => {
                    let c1 = lexer.point(origin)?;
                    let c2 = lexer.point(origin)?;
                    let end = lexer.point(origin)?;
                    builder = builder.cubic_to(c1.x, c1.y, c2.x, c2.y, end.x, end.y);
                }
                'Q' => {
                    let c = lexer.point(origin)?;
                    let end = lexer.point(origin)?;
                    builder = builder.quad_to(c.x, c.y, end.x, end.y);
                }
                other => {
                    return Err(lexer.error(&format!("unsupported command '{other}'")));
                }
            }
        }

        let path = builder.build();
        tracing::trace!(commands = path.commands.len(), "parsed svg path");
        Ok(path)
    }

    /// Total stroke length of the path
    pub fn length(&self) -> f32 {
        let mut total = 0.0;
        let mut current = Point::ZERO;
        let mut start = Point::ZERO;

        for command in &self.commands {
            match *command {
                PathCommand::MoveTo(p) => {
                    current = p;
                    start = p;
                }
                PathCommand::LineTo(p) => {
                    total += current.distance(p);
                    current = p;
                }
                PathCommand::QuadTo { control, end } => {
                    total += flattened_length(|t| quad_point(current, control, end, t));
                    current = end;
                }
                PathCommand::CubicTo {
                    control1,
                    control2,
                    end,
                } => {
                    total +=
                        flattened_length(|t| cubic_point(current, control1, control2, end, t));
                    current = end;
                }
                PathCommand::Close => {
                    total += current.distance(start);
                    current = start;
                }
            }
        }

        total
    }

    /// Dash pattern drawing `path_length` (0.0 to 1.0) of the stroke
    pub fn stroke_dash(&self, path_length: f32) -> StrokeDash {
        let total = self.length();
        let visible = total * path_length.clamp(0.0, 1.0);
        StrokeDash {
            visible,
            hidden: total - visible,
            total,
        }
    }
}

fn flattened_length(sample: impl Fn(f32) -> Point) -> f32 {
    let mut length = 0.0;
    let mut prev = sample(0.0);
    for i in 1..=CURVE_SEGMENTS {
        let p = sample(i as f32 / CURVE_SEGMENTS as f32);
        length += prev.distance(p);
        prev = p;
    }
    length
}

fn quad_point(p0: Point, p1: Point, p2: Point, t: f32) -> Point {
    let mt = 1.0 - t;
    Point::new(
        mt * mt * p0.x + 2.0 * mt * t * p1.x + t * t * p2.x,
        mt * mt * p0.y + 2.0 * mt * t * p1.y + t * t * p2.y,
    )
}

fn cubic_point(p0: Point, p1: Point, p2: Point, p3: Point, t: f32) -> Point {
    let mt = 1.0 - t;
    let a = mt * mt * mt;
    let b = 3.0 * mt * mt * t;
    let c = 3.0 * mt * t * t;
    let d = t * t * t;
    Point::new(
        a * p0.x + b * p1.x + c * p2.x + d * p3.x,
        a * p0.y + b * p1.y + c * p2.y + d * p3.y,
    )
}

/// Builder for constructing paths
pub struct PathBuilder {
    path: Path,
    current: Point,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self {
            path: Path::new(),
            current: Point::ZERO,
        }
    }

    pub fn move_to(mut self, x: f32, y: f32) -> Self {
        let point = Point::new(x, y);
        self.path.commands.push(PathCommand::MoveTo(point));
        self.current = point;
        self
    }

    pub fn line_to(mut self, x: f32, y: f32) -> Self {
        let point = Point::new(x, y);
        self.path.commands.push(PathCommand::LineTo(point));
        self.current = point;
        self
    }

    pub fn quad_to(mut self, cx: f32, cy: f32, x: f32, y: f32) -> Self {
        let end = Point::new(x, y);
        self.path.commands.push(PathCommand::QuadTo {
            control: Point::new(cx, cy),
            end,
        });
        self.current = end;
        self
    }

    pub fn cubic_to(mut self, c1x: f32, c1y: f32, c2x: f32, c2y: f32, x: f32, y: f32) -> Self {
        let end = Point::new(x, y);
        self.path.commands.push(PathCommand::CubicTo {
            control1: Point::new(c1x, c1y),
            control2: Point::new(c2x, c2y),
            end,
        });
        self.current = end;
        self
    }

    pub fn close(mut self) -> Self {
        self.path.commands.push(PathCommand::Close);
        self
    }

    pub fn build(self) -> Path {
        self.path
    }
}

impl Default for PathBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Tokenizer over SVG path data
struct Lexer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_separators(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() || c == ',' {
                self.bump();
            } else {
                break;
            }
        }
    }

    fn error(&self, message: &str) -> PaintError {
        PaintError::InvalidPath {
            offset: self.pos,
            message: message.to_string(),
        }
    }

    fn number(&mut self) -> Result<f32, PaintError> {
        self.skip_separators();
        let start = self.pos;
        let bytes = self.src.as_bytes();
        let mut end = start;
        let mut seen_dot = false;
        let mut seen_exp = false;

        if end < bytes.len() && (bytes[end] == b'-' || bytes[end] == b'+') {
            end += 1;
        }
        while end < bytes.len() {
            match bytes[end] {
                b'0'..=b'9' => end += 1,
                b'.' if !seen_dot && !seen_exp => {
                    seen_dot = true;
                    end += 1;
                }
                b'e' | b'E' if !seen_exp => {
                    seen_exp = true;
                    end += 1;
                    if end < bytes.len() && (bytes[end] == b'-' || bytes[end] == b'+') {
                        end += 1;
                    }
                }
                _ => break,
            }
        }

        let text = &self.src[start..end];
        let value = text
            .parse::<f32>()
            .map_err(|_| self.error("expected a number"))?;
        self.pos = end;
        Ok(value)
    }

    fn point(&mut self, origin: Point) -> Result<Point, PaintError> {
        let x = self.number()?;
        let y = self.number()?;
        Ok(Point::new(origin.x + x, origin.y + y))
    }
}
