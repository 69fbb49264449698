//! Error types for kinetic_app

use thiserror::Error;

/// Kinetic application errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Paint error: {0}")]
    Paint(#[from] kinetic_paint::PaintError),

    #[error("Motion error: {0}")]
    Motion(#[from] kinetic_motion::MotionError),

    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Config serialize error: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for kinetic_app operations
pub type Result<T> = std::result::Result<T, AppError>;
