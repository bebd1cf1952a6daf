//! Clatter Physics - Rapier 3D rigid-body world
//!
//! Owns every rigid body of the playground, steps them at a fixed rate and
//! reports new contacts together with how hard they hit.
//!
//! # Features
//!
//! - Static (mass 0) and dynamic bodies with plane, sphere and box shapes
//! - Fixed-timestep stepping with a bounded number of catch-up substeps
//! - Contact materials resolved per pair with a mandatory default
//! - Per-body collision subscriptions with impact speed along the contact normal
//! - Sleeping of bodies that have come to rest
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                 PhysicsWorld                     │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────┐  │
//! │  │ RigidBodySet│  │ ColliderSet │  │Materials│  │
//! │  └─────────────┘  └─────────────┘  └─────────┘  │
//! │  ┌─────────────────────────────────────────────┐│
//! │  │           PhysicsPipeline                   ││
//! │  │  (integration, collision, solver)           ││
//! │  └─────────────────────────────────────────────┘│
//! └─────────────────────────────────────────────────┘
//!                        │ step()
//!                        ▼
//!              ┌───────────────────┐
//!              │ CollisionHandler  │  one call per subscribed body
//!              └───────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use clatter_physics::prelude::*;
//!
//! let mut world = PhysicsWorld::new(PhysicsConfig::default())?;
//! world.add_body(RigidBodyDesc::fixed(ColliderShape::Plane))?;
//!
//! let ball = world.add_body(
//!     RigidBodyDesc::dynamic(1.0, ColliderShape::sphere(0.5))
//!         .with_position(Vec3::new(0.0, 3.0, 0.0)),
//! )?;
//! world.subscribe_collisions(ball)?;
//!
//! let mut on_hit = |event: &CollisionEvent| println!("{}", event.impact_velocity_along_normal);
//! world.step(1.0 / 60.0, 1.0 / 60.0, 3, &mut on_hit)?;
//! ```

pub mod body;
pub mod collider;
pub mod config;
pub mod error;
pub mod events;
pub mod material;
pub mod world;

pub mod prelude {
    //! Common imports for physics functionality
    pub use crate::body::{BodyPose, RigidBodyDesc, RigidBodyHandle, SleepState};
    pub use crate::collider::ColliderShape;
    pub use crate::config::PhysicsConfig;
    pub use crate::error::{PhysicsError, Result};
    pub use crate::events::{CollisionEvent, CollisionHandler, EventCollector, NullHandler};
    pub use crate::material::{ContactMaterial, ContactMaterialTable, MaterialId};
    pub use crate::world::PhysicsWorld;
    pub use glam::{Quat, Vec3};
}

pub use prelude::*;
