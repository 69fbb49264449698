//! Paint error types

use thiserror::Error;

/// Errors raised while parsing paint inputs
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PaintError {
    #[error("invalid color '{0}'")]
    InvalidColor(String),

    #[error("invalid path data at byte {offset}: {message}")]
    InvalidPath { offset: usize, message: String },
}
