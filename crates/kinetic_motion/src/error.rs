//! Motion error types

use thiserror::Error;

/// Errors raised while mounting or querying a motion scene
#[derive(Debug, Error)]
pub enum MotionError {
    #[error("layout failed: {0}")]
    Layout(#[from] taffy::TaffyError),

    #[error("no element with id '{0}'")]
    UnknownNode(String),

    #[error("element id '{0}' is used more than once")]
    DuplicateNode(String),

    #[error("unknown property '{0}'")]
    UnknownProperty(String),

    #[error("property '{property}' of '{node}' is not a {expected}")]
    ValueKind {
        node: String,
        property: &'static str,
        expected: &'static str,
    },
}

/// Result type alias for motion operations
pub type Result<T> = std::result::Result<T, MotionError>;
