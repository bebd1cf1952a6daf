//! Error types for the physics world

use thiserror::Error;

/// Physics world errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    /// Rigid body not found
    #[error("Rigid body not found: {0:?}")]
    BodyNotFound(crate::body::RigidBodyHandle),

    /// The same body was named twice in one bulk operation
    #[error("Rigid body listed more than once: {0:?}")]
    DuplicateBody(crate::body::RigidBodyHandle),

    /// Fixed timestep was zero, negative or not finite
    #[error("Invalid fixed timestep: {0}")]
    InvalidTimestep(f32),

    /// Shape dimensions were not strictly positive
    #[error("Invalid collision shape: {0}")]
    InvalidShape(String),

    /// Contact material coefficients out of range
    #[error("Invalid contact material: {0}")]
    InvalidMaterial(String),

    /// No default contact material registered before stepping
    #[error("No default contact material registered")]
    MissingDefaultContactMaterial,

    /// Forces and impulses cannot move a body with zero mass
    #[error("Body {0:?} is static and cannot receive forces or impulses")]
    StaticBody(crate::body::RigidBodyHandle),

    /// Invalid configuration
    #[error("Invalid physics configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for physics operations
pub type Result<T> = std::result::Result<T, PhysicsError>;
