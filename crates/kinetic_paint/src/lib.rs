//! Kinetic Paint
//!
//! Leaf crate with the drawing primitives the motion runtime animates:
//!
//! - [`Color`]: RGBA colors parsed from CSS text, mixed the way browsers
//!   blend animated colors
//! - [`Path`]: vector paths parsed from SVG path data, measurable so a
//!   stroke can be drawn progressively

pub mod color;
pub mod error;
pub mod path;

pub use color::Color;
pub use error::PaintError;
pub use path::{Path, PathBuilder, PathCommand, Point, StrokeDash};
