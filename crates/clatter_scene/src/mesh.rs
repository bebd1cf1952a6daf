//! Visual meshes handed to the render host

use clatter_physics::BodyPose;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Identifies a mesh within the render host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(pub u64);

/// Primitive families that share one geometry each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Sphere,
    Box,
    Plane,
}

/// Unit-sized tessellated geometry, scaled per instance
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
    Box {
        width: f32,
        height: f32,
        depth: f32,
    },
    /// Lies in the local XY plane
    Plane { width: f32, height: f32 },
}

impl Geometry {
    /// Unit sphere, 20x20 segments
    pub fn unit_sphere() -> Self {
        Self::Sphere {
            radius: 1.0,
            width_segments: 20,
            height_segments: 20,
        }
    }

    /// Unit cube
    pub fn unit_box() -> Self {
        Self::Box {
            width: 1.0,
            height: 1.0,
            depth: 1.0,
        }
    }

    /// Primitive this geometry was built from
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Self::Sphere { .. } => PrimitiveKind::Sphere,
            Self::Box { .. } => PrimitiveKind::Box,
            Self::Plane { .. } => PrimitiveKind::Plane,
        }
    }
}

/// Physically based surface shared by many meshes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceMaterial {
    /// Base color (linear RGB)
    pub color: [f32; 3],
    pub metalness: f32,
    pub roughness: f32,
    /// Strength of the environment reflection
    pub env_map_intensity: f32,
}

impl Default for SurfaceMaterial {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            metalness: 0.3,
            roughness: 0.4,
            env_map_intensity: 0.5,
        }
    }
}

impl SurfaceMaterial {
    /// Material of the floor
    pub fn floor() -> Self {
        Self {
            color: [0.47, 0.47, 0.47],
            ..Self::default()
        }
    }
}

/// One drawable instance
#[derive(Debug, Clone)]
pub struct VisualMesh {
    pub id: MeshId,
    pub geometry: Arc<Geometry>,
    pub material: Arc<SurfaceMaterial>,
    /// Encodes radius or width/height/depth on top of the unit geometry
    pub scale: Vec3,
    pub position: Vec3,
    pub rotation: Quat,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl VisualMesh {
    /// Create a mesh at the origin with unit scale
    pub fn new(id: MeshId, geometry: Arc<Geometry>, material: Arc<SurfaceMaterial>) -> Self {
        Self {
            id,
            geometry,
            material,
            scale: Vec3::ONE,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            cast_shadow: false,
            receive_shadow: false,
        }
    }

    /// Set scale
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Set position
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Set rotation
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set shadow flags
    pub fn with_shadows(mut self, cast: bool, receive: bool) -> Self {
        self.cast_shadow = cast;
        self.receive_shadow = receive;
        self
    }

    /// Primitive kind of the geometry
    pub fn kind(&self) -> PrimitiveKind {
        self.geometry.kind()
    }

    /// Copy a body pose onto the mesh
    pub fn set_pose(&mut self, pose: BodyPose) {
        self.position = pose.position;
        self.rotation = pose.rotation;
    }

    /// Current pose
    pub fn pose(&self) -> BodyPose {
        BodyPose {
            position: self.position,
            rotation: self.rotation,
        }
    }
}
