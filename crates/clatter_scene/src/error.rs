//! Error types for the playground

use clatter_audio::AudioError;
use clatter_physics::PhysicsError;
use thiserror::Error;

/// Playground errors
#[derive(Debug, Error)]
pub enum SceneError {
    /// Physics world rejected an operation
    #[error(transparent)]
    Physics(#[from] PhysicsError),

    /// Audio backend failure
    #[error(transparent)]
    Audio(#[from] AudioError),

    /// Configuration file or value rejected
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for playground operations
pub type Result<T> = std::result::Result<T, SceneError>;
