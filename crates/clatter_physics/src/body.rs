//! Rigid body descriptions and handles

use crate::collider::ColliderShape;
use crate::material::MaterialId;
use glam::{Quat, Vec3};
use rapier3d::na::{Quaternion, UnitQuaternion};
use rapier3d::prelude as rapier;

/// Handle to a rigid body in the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RigidBodyHandle(pub(crate) rapier::RigidBodyHandle);

impl RigidBodyHandle {
    /// Create from raw Rapier handle
    pub fn from_raw(handle: rapier::RigidBodyHandle) -> Self {
        Self(handle)
    }

    /// Get the raw Rapier handle
    pub fn raw(&self) -> rapier::RigidBodyHandle {
        self.0
    }
}

/// Whether the integrator is currently skipping a body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepState {
    /// Simulated every step
    Awake,
    /// Skipped until a contact or force wakes it
    Asleep,
}

/// Position and orientation of a body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyPose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for BodyPose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

/// Description for creating a rigid body
#[derive(Debug, Clone, PartialEq)]
pub struct RigidBodyDesc {
    /// Mass in kg; 0 makes the body static
    pub mass: f32,
    /// Collision shape
    pub shape: ColliderShape,
    /// Initial position
    pub position: Vec3,
    /// Initial rotation
    pub rotation: Quat,
    /// Initial linear velocity
    pub linear_velocity: Vec3,
    /// Surface material, `None` falls back to the default contact material
    pub material: Option<MaterialId>,
    /// Can this body sleep when inactive
    pub can_sleep: bool,
    /// Enable continuous collision detection
    pub ccd_enabled: bool,
}

impl Default for RigidBodyDesc {
    fn default() -> Self {
        Self {
            mass: 1.0,
            shape: ColliderShape::sphere(0.5),
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            linear_velocity: Vec3::ZERO,
            material: None,
            can_sleep: true,
            ccd_enabled: false,
        }
    }
}

impl RigidBodyDesc {
    /// Create a static body description
    pub fn fixed(shape: ColliderShape) -> Self {
        Self {
            mass: 0.0,
            shape,
            ..Default::default()
        }
    }

    /// Create a dynamic body description
    pub fn dynamic(mass: f32, shape: ColliderShape) -> Self {
        Self {
            mass,
            shape,
            ..Default::default()
        }
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

    /// Set linear velocity
    pub fn with_linear_velocity(mut self, velocity: Vec3) -> Self {
        self.linear_velocity = velocity;
        self
    }

    /// Set material
    pub fn with_material(mut self, material: MaterialId) -> Self {
        self.material = Some(material);
        self
    }

    /// Enable CCD
    pub fn with_ccd(mut self, enabled: bool) -> Self {
        self.ccd_enabled = enabled;
        self
    }

    /// Whether this description yields an immovable body
    pub fn is_static(&self) -> bool {
        self.mass == 0.0
    }

    /// Build a Rapier rigid body builder
    pub(crate) fn to_rapier_builder(&self) -> rapier::RigidBodyBuilder {
        let body_type = if self.is_static() {
            rapier::RigidBodyType::Fixed
        } else {
            rapier::RigidBodyType::Dynamic
        };

        rapier::RigidBodyBuilder::new(body_type)
            .position(rapier::Isometry::from_parts(
                rapier::Translation::new(self.position.x, self.position.y, self.position.z),
                to_rotation(self.rotation),
            ))
            .linvel(to_vector(self.linear_velocity))
            .ccd_enabled(self.ccd_enabled)
            .can_sleep(self.can_sleep)
    }
}

pub(crate) fn to_vector(v: Vec3) -> rapier::Vector<f32> {
    rapier::Vector::new(v.x, v.y, v.z)
}

pub(crate) fn from_vector(v: &rapier::Vector<f32>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

/// Normalizes on the way in, so callers may pass a slightly drifted quaternion.
pub(crate) fn to_rotation(q: Quat) -> UnitQuaternion<f32> {
    UnitQuaternion::from_quaternion(Quaternion::new(q.w, q.x, q.y, q.z))
}

pub(crate) fn from_rotation(rot: &UnitQuaternion<f32>) -> Quat {
    Quat::from_xyzw(rot.i, rot.j, rot.k, rot.w)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_mass_is_static() {
        assert!(RigidBodyDesc::fixed(ColliderShape::Plane).is_static());
        assert!(!RigidBodyDesc::dynamic(1.0, ColliderShape::sphere(1.0)).is_static());
    }

    #[test]
    fn test_rotation_round_trip_normalizes() {
        let q = Quat::from_xyzw(0.0, 0.0, 0.0, 2.0);
        let back = from_rotation(&to_rotation(q));
        assert_relative_eq!(back.length(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(back.w, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_builder_defaults() {
        let desc = RigidBodyDesc::dynamic(1.0, ColliderShape::cuboid(0.5, 0.5, 0.5))
            .with_position(Vec3::new(1.0, 4.0, 1.0));
        assert_eq!(desc.rotation, Quat::IDENTITY);
        assert_eq!(desc.material, None);
        assert_eq!(desc.position, Vec3::new(1.0, 4.0, 1.0));
    }
}
