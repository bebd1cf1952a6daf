//! Collision shapes

use crate::error::{PhysicsError, Result};
use glam::Vec3;
use rapier3d::prelude as rapier;
use serde::{Deserialize, Serialize};

/// Collision shape attached to a rigid body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ColliderShape {
    /// Infinite plane through the body origin, solid below its local +Y normal
    Plane,
    /// Sphere with radius
    Sphere {
        radius: f32,
    },
    /// Box with half-extents
    Box {
        half_extents: [f32; 3],
    },
}

impl ColliderShape {
    /// Create a sphere shape
    pub fn sphere(radius: f32) -> Self {
        Self::Sphere { radius }
    }

    /// Create a box shape from half-extents
    pub fn cuboid(hx: f32, hy: f32, hz: f32) -> Self {
        Self::Box {
            half_extents: [hx, hy, hz],
        }
    }

    /// Create a box shape from full size
    pub fn from_size(width: f32, height: f32, depth: f32) -> Self {
        Self::Box {
            half_extents: [width * 0.5, height * 0.5, depth * 0.5],
        }
    }

    /// Half-extents of a box, if this is one
    pub fn half_extents(&self) -> Option<Vec3> {
        match self {
            Self::Box { half_extents } => Some(Vec3::from_array(*half_extents)),
            _ => None,
        }
    }

    /// Every dimension must be finite and strictly positive
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Plane => Ok(()),
            Self::Sphere { radius } => {
                if radius.is_finite() && *radius > 0.0 {
                    Ok(())
                } else {
                    Err(PhysicsError::InvalidShape(format!(
                        "sphere radius must be > 0, got {}",
                        radius
                    )))
                }
            }
            Self::Box { half_extents } => {
                if half_extents.iter().all(|e| e.is_finite() && *e > 0.0) {
                    Ok(())
                } else {
                    Err(PhysicsError::InvalidShape(format!(
                        "box half-extents must be > 0, got {:?}",
                        half_extents
                    )))
                }
            }
        }
    }

    /// Build a Rapier shared shape
    pub(crate) fn to_rapier(self) -> rapier::SharedShape {
        match self {
            Self::Plane => rapier::SharedShape::halfspace(rapier::Vector::y_axis()),
            Self::Sphere { radius } => rapier::SharedShape::ball(radius),
            Self::Box { half_extents } => {
                rapier::SharedShape::cuboid(half_extents[0], half_extents[1], half_extents[2])
            }
        }
    }
}
